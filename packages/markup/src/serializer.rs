use crate::node::{NodeId, Tree};

/// Serializer converts a tree back to markup
///
/// The compact form (the default) writes no whitespace between elements and
/// is what gets persisted. The indented form is meant for humans and parses
/// back to the same tree.
pub struct Serializer {
    indent_level: usize,
    indent_string: Option<String>,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_string: None,
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent_level: 0,
            indent_string: Some(indent.to_string()),
        }
    }

    /// Serialize the whole tree
    pub fn serialize(&mut self, tree: &Tree) -> String {
        self.serialize_node(tree, tree.root())
    }

    /// Serialize one element and its subtree
    pub fn serialize_node(&mut self, tree: &Tree, node: NodeId) -> String {
        let mut output = String::new();
        self.indent_level = 0;
        self.write_element(tree, node, &mut output);
        output
    }

    fn write_element(&mut self, tree: &Tree, node: NodeId, output: &mut String) {
        let tag = tree.tag(node);
        output.push('<');
        output.push_str(tag);
        for (name, value) in tree.attributes(node) {
            output.push(' ');
            output.push_str(name);
            output.push_str("=\"");
            escape_into(&value.to_string(), output);
            output.push('"');
        }

        let children = tree.children(node);
        if children.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        self.indent_level += 1;
        for child in children {
            self.write_newline(output);
            self.write_element(tree, *child, output);
        }
        self.indent_level -= 1;
        self.write_newline(output);
        output.push_str("</");
        output.push_str(tag);
        output.push('>');
    }

    fn write_newline(&self, output: &mut String) {
        if let Some(indent) = &self.indent_string {
            output.push('\n');
            for _ in 0..self.indent_level {
                output.push_str(indent);
            }
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a tree to compact markup
pub fn serialize(tree: &Tree) -> String {
    Serializer::new().serialize(tree)
}

fn escape_into(value: &str, output: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_serialize_empty_elements_self_close() {
        let mut tree = Tree::new("grid");
        let root = tree.root();
        tree.set_attr(root, "name", "foo");
        tree.set_attr(root, "space", "5px");
        tree.set_attr(root, "type", "mainGrid");
        let content = tree.create_element("content");
        tree.append_child(root, content).unwrap();

        assert_eq!(
            serialize(&tree),
            r#"<grid name="foo" space="5px" type="mainGrid"><content/></grid>"#
        );
    }

    #[test]
    fn test_serialize_typed_values() {
        let mut tree = Tree::new("cell");
        let root = tree.root();
        tree.set_attr(root, "relativeSize", 0.5);
        tree.set_attr(root, "hasPlaceholders", true);
        tree.set_attr(root, "count", 3u32);
        assert_eq!(
            serialize(&tree),
            r#"<cell relativeSize="0.5" hasPlaceholders="true" count="3"/>"#
        );
    }

    #[test]
    fn test_serialize_escapes_and_reparses() {
        let mut tree = Tree::new("content");
        let root = tree.root();
        tree.set_attr(root, "text", r#"<b>"fish" & chips</b>"#);
        let markup = serialize(&tree);
        assert_eq!(
            markup,
            r#"<content text="&lt;b&gt;&quot;fish&quot; &amp; chips&lt;/b&gt;"/>"#
        );
        assert_eq!(parse(&markup).unwrap(), tree);
    }

    #[test]
    fn test_indented_output() {
        let tree = parse(r#"<grid><content><row/></content></grid>"#).unwrap();
        let pretty = Serializer::with_indent("  ").serialize(&tree);
        assert_eq!(pretty, "<grid>\n  <content>\n    <row/>\n  </content>\n</grid>");
        assert_eq!(parse(&pretty).unwrap(), tree);
    }

    #[test]
    fn test_serialize_subtree() {
        let tree = parse(r#"<grid><content><row><cell type="module"><content/></cell></row></content></grid>"#)
            .unwrap();
        let row = tree.children(tree.children(tree.root())[0])[0];
        assert_eq!(
            Serializer::new().serialize_node(&tree, row),
            r#"<row><cell type="module"><content/></cell></row>"#
        );
    }
}
