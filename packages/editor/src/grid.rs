//! # Grid
//!
//! A [`Tree`] whose root is the `mainGrid` container. The manipulator
//! operations are spread over several `impl Grid` blocks:
//!
//! ```text
//! grid.rs          construction, typed accessors, lookups
//! algebra.rs       add_row / add_cell / convert_leaf_to_container
//! normalize.rs     clean_grid
//! placeholders.rs  add / remove / clean placeholders
//! navigation.rs    nearest grid, content moves, ids
//! codec.rs         text and object conversions, clone
//! ```
//!
//! All operations take [`NodeId`] handles into the grid's own tree.

use crate::errors::{ManipulatorError, ManipulatorResult};
use crate::kinds::*;
use dashgrid_markup::{NodeId, Selector, Tree};

/// Spacing used when none is given
pub const DEFAULT_SPACE: u32 = 5;

#[derive(Debug, PartialEq)]
pub struct Grid {
    tree: Tree,
}

impl Grid {
    /// `<grid name=".." space="{space}px" type="mainGrid"><content/></grid>`
    pub fn create(name: &str, space: Option<u32>) -> Self {
        let mut tree = Tree::new(GRID_TAG);
        let root = tree.root();
        tree.set_attr(root, NAME_ATTR, name);
        tree.set_attr(root, SPACE_ATTR, format!("{}px", space.unwrap_or(DEFAULT_SPACE)));
        tree.set_attr(root, TYPE_ATTR, NodeType::MainGrid.as_str());
        tree.append_element(root, CONTENT_TAG);
        tracing::debug!(name, "created base grid");
        Self { tree }
    }

    /// Wrap a tree whose root is a `mainGrid`
    pub fn from_tree(tree: Tree) -> ManipulatorResult<Self> {
        let root = tree.root();
        if !tree.attr_is(root, TYPE_ATTR, NodeType::MainGrid.as_str()) {
            return Err(ManipulatorError::InvalidType(format!(
                "Cannot load a grid with a root of type <{}>. Should be <mainGrid>",
                type_label(&tree, root)
            )));
        }
        Ok(Self { tree })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn name(&self) -> Option<String> {
        self.tree.attr(self.root(), NAME_ATTR).map(|v| v.to_string())
    }

    /// Whether the placeholder overlay is currently applied
    pub fn has_placeholders(&self) -> bool {
        self.tree
            .attr(self.root(), HAS_PLACEHOLDERS_ATTR)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------

    pub fn node_type(&self, node: NodeId) -> Option<NodeType> {
        self.tree
            .attr(node, TYPE_ATTR)
            .and_then(|v| v.as_str())
            .and_then(NodeType::parse)
    }

    pub(crate) fn is_type(&self, node: NodeId, node_type: NodeType) -> bool {
        self.node_type(node) == Some(node_type)
    }

    pub fn is_container(&self, node: NodeId) -> bool {
        self.node_type(node).map_or(false, NodeType::is_container)
    }

    /// Text of the `type` attribute for error messages
    pub(crate) fn type_label(&self, node: NodeId) -> String {
        type_label(&self.tree, node)
    }

    /// The `content` child of a container or cell
    pub fn content_of(&self, node: NodeId) -> Option<NodeId> {
        self.tree.first_child_matching(node, &Selector::tag(CONTENT_TAG))
    }

    /// Rows of a container, in order
    pub fn rows_of(&self, node: NodeId) -> Vec<NodeId> {
        match self.content_of(node) {
            Some(content) => self.tree.select_children(content, &Selector::tag(ROW_TAG)),
            None => Vec::new(),
        }
    }

    pub fn cells_of(&self, row: NodeId) -> Vec<NodeId> {
        self.tree.select_children(row, &Selector::tag(CELL_TAG))
    }

    /// Descendant (or root) carrying the given `id` attribute
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.root();
        if self.tree.attr_is(root, ID_ATTR, id) {
            return Some(root);
        }
        self.tree
            .select_descendants(root, &Selector::any().with_attr(ID_ATTR, id))
            .into_iter()
            .next()
    }

    /// The `id` attribute of a node, if set
    pub fn id_of(&self, node: NodeId) -> Option<String> {
        self.tree.attr(node, ID_ATTR).map(|v| v.to_string())
    }
}

fn type_label(tree: &Tree, node: NodeId) -> String {
    tree.attr(node, TYPE_ATTR)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_markup::parse;

    #[test]
    fn test_create_base_grid() {
        let grid = Grid::create("foo", Some(5));
        assert_eq!(
            dashgrid_markup::serialize(grid.tree()),
            r#"<grid name="foo" space="5px" type="mainGrid"><content/></grid>"#
        );
        assert_eq!(grid.name().as_deref(), Some("foo"));
        assert!(grid.is_container(grid.root()));
        assert!(!grid.has_placeholders());
    }

    #[test]
    fn test_default_space() {
        let grid = Grid::create("bar", None);
        assert!(grid.tree().attr_is(grid.root(), SPACE_ATTR, "5px"));
        let grid = Grid::create("bar", Some(12));
        assert!(grid.tree().attr_is(grid.root(), SPACE_ATTR, "12px"));
    }

    #[test]
    fn test_from_tree_requires_main_grid() {
        let tree = parse(r#"<grid type="grid"><content/></grid>"#).unwrap();
        assert_eq!(
            Grid::from_tree(tree).unwrap_err(),
            ManipulatorError::InvalidType(
                "Cannot load a grid with a root of type <grid>. Should be <mainGrid>".to_string()
            )
        );

        let tree = parse("<grid><content/></grid>").unwrap();
        assert!(matches!(Grid::from_tree(tree), Err(ManipulatorError::InvalidType(_))));
    }

    #[test]
    fn test_lookups() {
        let tree = parse(concat!(
            r#"<grid type="mainGrid" id="g-1"><content>"#,
            r#"<row id="g-2"><cell type="module" id="g-3"><content/></cell></row>"#,
            "</content></grid>"
        ))
        .unwrap();
        let grid = Grid::from_tree(tree).unwrap();
        let rows = grid.rows_of(grid.root());
        assert_eq!(rows.len(), 1);
        let cells = grid.cells_of(rows[0]);
        assert_eq!(grid.node_type(cells[0]), Some(NodeType::Module));

        assert_eq!(grid.find_by_id("g-1"), Some(grid.root()));
        assert_eq!(grid.find_by_id("g-3"), Some(cells[0]));
        assert_eq!(grid.find_by_id("g-9"), None);
        assert_eq!(grid.id_of(rows[0]).as_deref(), Some("g-2"));
    }
}
