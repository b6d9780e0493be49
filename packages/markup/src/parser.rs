use crate::error::{ParseError, ParseResult};
use crate::lexer::{lex, SpannedToken, Token, TokenSpan};
use crate::node::{NodeId, Tree};

/// Recursive-descent parser turning markup into a [`Tree`]
pub struct Parser<'src> {
    tokens: Vec<SpannedToken<'src>>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let tokens = lex(source)
            .map(|result| {
                result.map_err(|e| ParseError::LexError {
                    span: e.span,
                    message: e.message,
                })
            })
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Parse a complete document: exactly one root element
    pub fn parse_document(&mut self) -> ParseResult<Tree> {
        self.expect(Token::Open, "'<'")?;
        let (name, _) = self.expect_name()?;
        let mut tree = Tree::new(name);
        let root = tree.root();
        self.parse_element_rest(&mut tree, root, name)?;

        if let Some(extra) = self.peek() {
            return Err(ParseError::UnexpectedToken {
                span: extra.span,
                expected: "end of input".to_string(),
                found: extra.token.describe(),
            });
        }
        Ok(tree)
    }

    /// Parse attributes and children of an element whose `<name` was consumed
    fn parse_element_rest(&mut self, tree: &mut Tree, node: NodeId, name: &str) -> ParseResult<()> {
        loop {
            let next = self.next_token("attribute, '>' or '/>'")?;
            match next.token {
                Token::SelfClose => return Ok(()),
                Token::Close => break,
                Token::Name(attr) => {
                    self.expect(Token::Eq, "'='")?;
                    let value = self.expect_quoted()?;
                    tree.set_attr(node, attr, decode_entities(value));
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        span: next.span,
                        expected: "attribute, '>' or '/>'".to_string(),
                        found: other.describe(),
                    });
                }
            }
        }

        loop {
            let next = self.next_token("child element or closing tag")?;
            match next.token {
                Token::Open => {
                    let (child_name, _) = self.expect_name()?;
                    let child = tree.append_element(node, child_name);
                    self.parse_element_rest(tree, child, child_name)?;
                }
                Token::OpenEnd => {
                    let (closing, span) = self.expect_name()?;
                    if closing != name {
                        return Err(ParseError::MismatchedTag {
                            span,
                            expected: name.to_string(),
                            found: closing.to_string(),
                        });
                    }
                    self.expect(Token::Close, "'>'")?;
                    return Ok(());
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        span: next.span,
                        expected: "child element or closing tag (text content is not supported)"
                            .to_string(),
                        found: other.describe(),
                    });
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&SpannedToken<'src>> {
        self.tokens.get(self.pos)
    }

    fn next_token(&mut self, expected: &str) -> ParseResult<SpannedToken<'src>> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, token: Token<'src>, expected: &str) -> ParseResult<TokenSpan> {
        let next = self.next_token(expected)?;
        if next.token == token {
            Ok(next.span)
        } else {
            Err(ParseError::UnexpectedToken {
                span: next.span,
                expected: expected.to_string(),
                found: next.token.describe(),
            })
        }
    }

    fn expect_name(&mut self) -> ParseResult<(&'src str, TokenSpan)> {
        let next = self.next_token("element name")?;
        match next.token {
            Token::Name(name) => Ok((name, next.span)),
            other => Err(ParseError::UnexpectedToken {
                span: next.span,
                expected: "element name".to_string(),
                found: other.describe(),
            }),
        }
    }

    fn expect_quoted(&mut self) -> ParseResult<&'src str> {
        let next = self.next_token("quoted value")?;
        match next.token {
            Token::Quoted(value) => Ok(value),
            other => Err(ParseError::UnexpectedToken {
                span: next.span,
                expected: "quoted value".to_string(),
                found: other.describe(),
            }),
        }
    }
}

/// Parse markup into a tree
pub fn parse(source: &str) -> ParseResult<Tree> {
    let tree = Parser::new(source)?.parse_document()?;
    tracing::trace!(nodes = tree.arena_len(), "parsed markup");
    Ok(tree)
}

/// Decode the predefined entities and numeric character references.
/// Unknown or malformed references are kept verbatim.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Selector;

    #[test]
    fn test_parse_base_grid() {
        let tree = parse(r#"<grid name="foo" space="5px" type="mainGrid"><content/></grid>"#).unwrap();
        let root = tree.root();
        assert_eq!(tree.tag(root), "grid");
        assert_eq!(tree.attributes(root).len(), 3);
        assert!(tree.attr_is(root, "space", "5px"));
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.tag(tree.children(root)[0]), "content");
    }

    #[test]
    fn test_parse_nested_with_whitespace() {
        let source = r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <grid type="mainGrid">
                <content>
                    <row>
                        <cell type="module"><content path='path.to.module1'/></cell>
                        <cell type="module"><content path="path.to.module2"/></cell>
                    </row>
                </content>
            </grid>
        "#;
        let tree = parse(source).unwrap();
        let cells = tree.select_descendants(tree.root(), &Selector::tag("cell"));
        assert_eq!(cells.len(), 2);
        let content = tree.children(cells[0])[0];
        assert!(tree.attr_is(content, "path", "path.to.module1"));
    }

    #[test]
    fn test_parse_entities() {
        let tree = parse(r#"<grid name="a &amp; b &lt;c&gt; &quot;d&quot; &#65;&#x42; &bogus;"/>"#).unwrap();
        assert!(tree.attr_is(tree.root(), "name", "a & b <c> \"d\" AB &bogus;"));
    }

    #[test]
    fn test_parse_mismatched_tag() {
        let err = parse("<grid><content></row></grid>").unwrap_err();
        match err {
            ParseError::MismatchedTag { expected, found, .. } => {
                assert_eq!(expected, "content");
                assert_eq!(found, "row");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_text_content() {
        assert!(matches!(
            parse("<grid>hello</grid>"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_trailing_elements() {
        assert!(matches!(
            parse("<grid/><grid/>"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_parse_unterminated() {
        assert!(matches!(
            parse("<grid><content>"),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_parse_lex_error() {
        assert!(matches!(parse("<grid % />"), Err(ParseError::LexError { .. })));
    }
}
