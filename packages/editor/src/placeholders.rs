//! # Placeholder Overlay
//!
//! Drop targets shown while the layout is being rearranged. Adding them puts
//! a placeholder row around every row and a placeholder cell around every
//! cell, recursively:
//!
//! ```text
//! <row type="placeholder"><cell type="placeholder"><content/></cell></row>
//! <row>
//!   <cell type="placeholder"><content/></cell>
//!   <cell type="module">...</cell>
//!   <cell type="placeholder"><content/></cell>
//! </row>
//! <row type="placeholder"><cell type="placeholder"><content/></cell></row>
//! ```
//!
//! Removing them keeps the ones that received a module in the meantime and
//! normalizes every grid cell left behind. The root carries
//! `hasPlaceholders="true"` while the overlay is applied.

use crate::errors::{ManipulatorError, ManipulatorResult};
use crate::grid::Grid;
use crate::kinds::*;
use dashgrid_markup::{NodeId, Selector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceholderOptions {
    /// Convert module cells to grids so they get drop targets inside them too
    pub modules_into_grids: bool,
}

impl Default for PlaceholderOptions {
    fn default() -> Self {
        Self {
            modules_into_grids: true,
        }
    }
}

impl Grid {
    pub fn add_placeholders(&mut self, root: NodeId) -> ManipulatorResult<()> {
        self.add_placeholders_with(root, PlaceholderOptions::default())
    }

    pub fn add_placeholders_with(&mut self, root: NodeId, options: PlaceholderOptions) -> ManipulatorResult<()> {
        if !self.is_type(root, NodeType::MainGrid) {
            return Err(ManipulatorError::InvalidType(format!(
                "Cannot add placeholders in grid of type <{}>. Should be <mainGrid>",
                self.type_label(root)
            )));
        }
        if self.flagged(root) {
            return Err(ManipulatorError::InvalidState(
                "Cannot add placeholders in a grid which already has them".to_string(),
            ));
        }

        self.add_rows_placeholders(root, options.modules_into_grids)?;
        self.tree_mut().set_attr(root, HAS_PLACEHOLDERS_ATTR, true);
        tracing::debug!(modules_into_grids = options.modules_into_grids, "added placeholders");
        Ok(())
    }

    fn add_rows_placeholders(&mut self, grid: NodeId, modules_into_grids: bool) -> ManipulatorResult<()> {
        if !self.is_container(grid) {
            return Err(ManipulatorError::InvalidType(format!(
                "Cannot add rows placeholders in node of type <{}>. Should be <grid> or <mainGrid>",
                self.type_label(grid)
            )));
        }

        for row in self.rows_of(grid) {
            if self.is_type(row, NodeType::Placeholder) {
                continue;
            }
            let placeholder = self.add_placeholder_row(grid, Some(row))?;
            self.add_cells_placeholders(row, modules_into_grids)?;
            self.add_cells_placeholders(placeholder, modules_into_grids)?;
        }
        let placeholder = self.add_placeholder_row(grid, None)?;
        self.add_cells_placeholders(placeholder, modules_into_grids)
    }

    fn add_placeholder_row(&mut self, grid: NodeId, before: Option<NodeId>) -> ManipulatorResult<NodeId> {
        let row = self.add_row(grid, before)?;
        self.tree_mut().set_attr(row, TYPE_ATTR, NodeType::Placeholder.as_str());
        Ok(row)
    }

    fn add_cells_placeholders(&mut self, row: NodeId, modules_into_grids: bool) -> ManipulatorResult<()> {
        for cell in self.cells_of(row) {
            match self.node_type(cell) {
                Some(NodeType::Placeholder) => continue,
                Some(NodeType::Module) if modules_into_grids => {
                    self.add_placeholder_cell(row, Some(cell))?;
                    self.convert_leaf_to_container(cell)?;
                    // the wrapped module must not be converted again
                    self.add_rows_placeholders(cell, false)?;
                }
                Some(NodeType::Grid) => {
                    self.add_placeholder_cell(row, Some(cell))?;
                    self.add_rows_placeholders(cell, modules_into_grids)?;
                }
                _ => {
                    self.add_placeholder_cell(row, Some(cell))?;
                }
            }
        }
        self.add_placeholder_cell(row, None)?;
        Ok(())
    }

    fn add_placeholder_cell(&mut self, row: NodeId, before: Option<NodeId>) -> ManipulatorResult<NodeId> {
        self.add_cell(row, NodeType::Placeholder.as_str(), before, None)
    }

    /// Remove the overlay, keeping placeholders that now hold a module
    pub fn remove_placeholders(&mut self, root: NodeId) -> ManipulatorResult<()> {
        if !self.is_type(root, NodeType::MainGrid) {
            return Err(ManipulatorError::InvalidType(format!(
                "Cannot remove placeholders in grid of type <{}>. Should be <mainGrid>",
                self.type_label(root)
            )));
        }
        if !self.flagged(root) {
            return Err(ManipulatorError::InvalidState(
                "Cannot remove placeholders from a grid which has none".to_string(),
            ));
        }

        let placeholder = NodeType::Placeholder.as_str();
        let module_cells = Selector::tag(CELL_TAG).with_attr(TYPE_ATTR, NodeType::Module.as_str());

        let rows = self
            .tree()
            .select_descendants(root, &Selector::tag(ROW_TAG).with_attr(TYPE_ATTR, placeholder));
        for row in rows {
            if self.tree().select_descendants(row, &module_cells).is_empty() {
                self.tree_mut().detach(row);
            }
        }

        let cells = self
            .tree()
            .select_descendants(root, &Selector::tag(CELL_TAG).with_attr(TYPE_ATTR, placeholder));
        for cell in cells {
            if self.tree().select_descendants(cell, &module_cells).is_empty() {
                self.tree_mut().detach(cell);
            }
        }

        // what is left was repurposed by a drop
        let kept = self
            .tree()
            .select_descendants(root, &Selector::any().with_attr(TYPE_ATTR, placeholder));
        for node in kept {
            self.tree_mut().remove_attr(node, TYPE_ATTR);
        }

        let grids = self
            .tree()
            .select_descendants(root, &Selector::tag(CELL_TAG).with_attr(TYPE_ATTR, NodeType::Grid.as_str()));
        for cell in grids.into_iter().rev() {
            if self.tree().is_attached(cell) && self.is_type(cell, NodeType::Grid) {
                self.clean_grid(cell)?;
            }
        }

        self.tree_mut().remove_attr(root, HAS_PLACEHOLDERS_ATTR);
        tracing::debug!("removed placeholders");
        Ok(())
    }

    /// Remove then add the overlay again, to resync drop targets after an edit
    pub fn clean_placeholders(&mut self, root: NodeId) -> ManipulatorResult<()> {
        self.clean_placeholders_with(root, PlaceholderOptions::default())
    }

    pub fn clean_placeholders_with(&mut self, root: NodeId, options: PlaceholderOptions) -> ManipulatorResult<()> {
        self.remove_placeholders(root)?;
        self.add_placeholders_with(root, options)
    }

    fn flagged(&self, root: NodeId) -> bool {
        self.tree()
            .attr(root, HAS_PLACEHOLDERS_ATTR)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
