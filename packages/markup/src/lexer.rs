//! Lexer for layout markup using logos
//!
//! Whitespace between tags, the `<?xml ... ?>` prolog and comments are
//! skipped. Anything that is not markup (stray text) surfaces as a `Name`
//! or a lexer error and is rejected by the parser.

use logos::Logos;

/// Token types for layout markup
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"<\?[^>]*\?>")]
#[logos(skip r"<!--([^-]|-[^-])*-->")]
pub enum Token<'src> {
    #[token("</")]
    OpenEnd,

    #[token("/>")]
    SelfClose,

    #[token("<")]
    Open,

    #[token(">")]
    Close,

    #[token("=")]
    Eq,

    #[regex(r"[A-Za-z_:][A-Za-z0-9_:.\-]*", |lex| lex.slice())]
    Name(&'src str),

    // Quotes are stripped, entities are decoded by the parser
    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len()-1]
    })]
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        &s[1..s.len()-1]
    })]
    Quoted(&'src str),
}

impl<'src> Token<'src> {
    /// Human-readable form used in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::OpenEnd => "'</'".to_string(),
            Token::SelfClose => "'/>'".to_string(),
            Token::Open => "'<'".to_string(),
            Token::Close => "'>'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::Name(name) => format!("name '{}'", name),
            Token::Quoted(value) => format!("string \"{}\"", value),
        }
    }
}

/// Span information for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

/// A token with its span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: TokenSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub span: TokenSpan,
    pub message: String,
}

/// Lex markup into tokens with spans
pub fn lex(source: &str) -> impl Iterator<Item = Result<SpannedToken<'_>, LexError>> + '_ {
    Token::lexer(source).spanned().map(|(result, span)| {
        let span = TokenSpan {
            start: span.start,
            end: span.end,
        };
        match result {
            Ok(token) => Ok(SpannedToken { token, span }),
            Err(_) => Err(LexError {
                span,
                message: "Unexpected character".to_string(),
            }),
        }
    })
}
