//! Grid flavour of the markup codecs: `_` attribute marker, `row`/`cell` always arrays

use crate::errors::EditorError;
use crate::grid::Grid;
use crate::kinds::{CELL_TAG, GRID_TAG, ROW_TAG};
use dashgrid_markup::{clone_tree, parse, serialize, ObjectCodec, Serializer};
use serde_json::Value;

/// Object codec configured for the grid format
pub fn grid_codec() -> ObjectCodec {
    ObjectCodec::new().with_array_tags([ROW_TAG, CELL_TAG])
}

impl Grid {
    pub fn from_text(source: &str) -> Result<Self, EditorError> {
        let tree = parse(source)?;
        Ok(Grid::from_tree(tree)?)
    }

    /// Compact markup, the persisted form
    pub fn to_text(&self) -> String {
        serialize(self.tree())
    }

    pub fn to_pretty_text(&self, indent: &str) -> String {
        Serializer::with_indent(indent).serialize(self.tree())
    }

    pub fn from_object(object: &Value) -> Result<Self, EditorError> {
        let tree = grid_codec().encode(GRID_TAG, object)?;
        Ok(Grid::from_tree(tree)?)
    }

    pub fn to_object(&self) -> Value {
        grid_codec().to_object(self.tree())
    }

    /// Object form of a single node and its subtree
    pub fn node_to_object(&self, node: dashgrid_markup::NodeId) -> Value {
        grid_codec().decode(self.tree(), node)
    }

    /// Independent copy obtained through a text round trip
    pub fn try_clone(&self) -> Result<Self, EditorError> {
        Ok(Grid::from_tree(clone_tree(self.tree())?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_grid_object_form() {
        let grid = Grid::create("foo", None);
        assert_eq!(
            grid.to_object(),
            json!({ "_name": "foo", "_space": "5px", "_type": "mainGrid", "content": {} })
        );
    }

    #[test]
    fn test_from_object_round_trip() {
        let object = json!({
            "_name": "foo",
            "_space": "5px",
            "_type": "mainGrid",
            "content": {
                "row": [
                    { "cell": [ { "_type": "module", "content": { "_path": "a.b" } } ] }
                ]
            }
        });
        let grid = Grid::from_object(&object).unwrap();
        assert_eq!(
            grid.to_text(),
            concat!(
                r#"<grid name="foo" space="5px" type="mainGrid"><content>"#,
                r#"<row><cell type="module"><content path="a.b"/></cell></row>"#,
                "</content></grid>"
            )
        );
        assert_eq!(grid.to_object(), object);
    }

    #[test]
    fn test_from_text_errors() {
        assert!(matches!(Grid::from_text("<grid>"), Err(EditorError::Parse(_))));
        assert!(matches!(
            Grid::from_text(r#"<grid type="module"/>"#),
            Err(EditorError::Manipulator(_))
        ));
        assert!(matches!(Grid::from_object(&json!([])), Err(EditorError::Codec(_))));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut grid = Grid::create("foo", None);
        let copy = grid.try_clone().unwrap();
        assert_eq!(copy, grid);

        grid.add_row(grid.root(), None).unwrap();
        assert_ne!(copy, grid);
        assert_eq!(copy.rows_of(copy.root()).len(), 0);
    }
}
