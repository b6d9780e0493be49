//! Primitive structural edits: rows, cells and leaf conversion

use crate::errors::{ManipulatorError, ManipulatorResult};
use crate::grid::Grid;
use crate::kinds::*;
use dashgrid_markup::NodeId;

impl Grid {
    /// Add an empty row to `node`, at the end or right before `before_row`.
    ///
    /// A module node is first converted into a grid holding its previous
    /// content in a single cell; that is only possible without `before_row`.
    pub fn add_row(&mut self, node: NodeId, before_row: Option<NodeId>) -> ManipulatorResult<NodeId> {
        if !self.is_container(node) {
            if before_row.is_some() {
                return Err(ManipulatorError::Inconsistency(
                    "Cannot insert before a row if there is no row".to_string(),
                ));
            }
            self.convert_leaf_to_container(node)?;
        }

        let content = self.content_of(node).ok_or_else(|| {
            ManipulatorError::Inconsistency("The 'node' has no content to hold rows".to_string())
        })?;

        if let Some(before) = before_row {
            if self.tree().parent(before) != Some(content) {
                return Err(ManipulatorError::Inconsistency(
                    "The 'beforeRow' must be a child of the content of the 'node'".to_string(),
                ));
            }
        }

        let tree = self.tree_mut();
        let row = tree.create_element(ROW_TAG);
        match before_row {
            Some(before) => tree.insert_before(content, row, before)?,
            None => tree.append_child(content, row)?,
        }
        tracing::debug!(%node, %row, "added row");
        Ok(row)
    }

    /// Add a cell of `cell_type` to `row`, at the end or right before `before_cell`.
    ///
    /// The cell holds `content` when given, or a fresh empty content node.
    pub fn add_cell(
        &mut self,
        row: NodeId,
        cell_type: &str,
        before_cell: Option<NodeId>,
        content: Option<NodeId>,
    ) -> ManipulatorResult<NodeId> {
        let cell_type = NodeType::parse_cell_type(cell_type).ok_or_else(|| {
            ManipulatorError::InvalidType(format!(
                "Cannot add cell of type <{}>. Should be <grid>, <module> or <placeholder>",
                cell_type
            ))
        })?;

        if self.tree().tag(row) != ROW_TAG {
            return Err(ManipulatorError::Inconsistency(format!(
                "Cannot add a cell to <{}>. Should be <row>",
                self.tree().tag(row)
            )));
        }

        if let Some(before) = before_cell {
            if self.tree().parent(before) != Some(row) {
                return Err(ManipulatorError::Inconsistency(
                    "The 'beforeCell' must be a child of 'row'".to_string(),
                ));
            }
        }

        let tree = self.tree_mut();
        let cell = tree.create_element(CELL_TAG);
        tree.set_attr(cell, TYPE_ATTR, cell_type.as_str());
        let content = match content {
            Some(existing) => existing,
            None => tree.create_element(CONTENT_TAG),
        };
        tree.append_child(cell, content)?;
        match before_cell {
            Some(before) => tree.insert_before(row, cell, before)?,
            None => tree.append_child(row, cell)?,
        }
        tracing::debug!(%row, %cell, cell_type = cell_type.as_str(), "added cell");
        Ok(cell)
    }

    /// Turn a module node into a grid whose only cell holds the previous content
    pub fn convert_leaf_to_container(&mut self, node: NodeId) -> ManipulatorResult<()> {
        if !self.is_type(node, NodeType::Module) {
            return Err(ManipulatorError::InvalidType(format!(
                "Cannot convert node of type <{}> to a grid. Should be <module>",
                self.type_label(node)
            )));
        }

        let previous = self.content_of(node);
        let tree = self.tree_mut();
        if let Some(content) = previous {
            tree.detach(content);
        }
        tree.set_attr(node, TYPE_ATTR, NodeType::Grid.as_str());
        let fresh = tree.create_element(CONTENT_TAG);
        tree.append_child(node, fresh)?;

        let row = self.add_row(node, None)?;
        self.add_cell(row, NodeType::Module.as_str(), None, previous)?;
        tracing::debug!(%node, "converted module to grid");
        Ok(())
    }
}
