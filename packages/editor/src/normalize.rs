//! # Normalizer
//!
//! `clean_grid` restores the canonical minimal shape of a container after
//! removals, then walks up to the enclosing container and does the same.
//!
//! One pass over the direct rows of the container removes, until nothing
//! changes:
//!
//! - cells without any child
//! - `grid` cells whose content has no rows left
//! - rows without cells
//! - regular rows holding nothing but placeholder cells (more than one)
//!
//! Then, when exactly one row remains:
//!
//! ```text
//! (a) grid > row > cell          => grid takes the cell's type and content
//! (b) X > row > cell[type=grid]  => the inner rows replace the row
//! (c) row > grid > row > cells   => the cells replace the grid in the outer row
//! ```
//!
//! `mainGrid` is never collapsed (a) nor promoted (c): it has no parent row.

use crate::errors::{ManipulatorError, ManipulatorResult};
use crate::grid::Grid;
use crate::kinds::*;
use dashgrid_markup::NodeId;

impl Grid {
    /// Normalize `node` and then every enclosing container
    pub fn clean_grid(&mut self, node: NodeId) -> ManipulatorResult<()> {
        if !self.is_container(node) {
            return Err(ManipulatorError::InvalidType(format!(
                "Cannot clean node of type <{}>. Should be <grid> or <mainGrid>",
                self.type_label(node)
            )));
        }

        let mut parent_grid = self.get_nearest_grid(node, false);

        loop {
            self.remove_dead_rows(node);

            let rows = self.rows_of(node);
            let &[row] = rows.as_slice() else { break };
            let cells = self.cells_of(row);

            if self.is_type(node, NodeType::Grid) && cells.len() == 1 {
                self.adopt_cell(node, cells[0])?;
                continue;
            }

            if cells.len() == 1 && self.is_type(cells[0], NodeType::Grid) {
                self.splice_rows(node, row, cells[0])?;
                continue;
            }

            if self.is_type(node, NodeType::Grid) {
                if let Some(parent_row) = self.sole_cell_row(node) {
                    self.promote_cells(node, parent_row, &cells)?;
                    parent_grid = parent_grid.and_then(|g| self.get_nearest_grid(g, false));
                }
            }
            break;
        }

        match parent_grid {
            Some(parent) if self.is_container(parent) => self.clean_grid(parent),
            Some(parent) => {
                tracing::warn!(%parent, "enclosing node is no longer a grid, stopping");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Drop empty cells and rows until a full pass changes nothing
    fn remove_dead_rows(&mut self, node: NodeId) {
        loop {
            let mut changed = false;

            for row in self.rows_of(node) {
                for cell in self.cells_of(row) {
                    if self.is_dead_cell(cell) {
                        tracing::trace!(%cell, "removing empty cell");
                        self.tree_mut().detach(cell);
                        changed = true;
                    }
                }

                let cells = self.cells_of(row);
                let only_placeholders = !self.is_type(row, NodeType::Placeholder)
                    && cells.len() > 1
                    && cells.iter().all(|c| self.is_type(*c, NodeType::Placeholder));
                if cells.is_empty() || only_placeholders {
                    tracing::trace!(%row, only_placeholders, "removing row");
                    self.tree_mut().detach(row);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }

    fn is_dead_cell(&self, cell: NodeId) -> bool {
        if !self.tree().has_children(cell) {
            return true;
        }
        self.is_type(cell, NodeType::Grid)
            && self
                .content_of(cell)
                .map_or(true, |content| !self.tree().has_children(content))
    }

    /// Rule (a): replace the node's content by the content of its only cell
    fn adopt_cell(&mut self, node: NodeId, cell: NodeId) -> ManipulatorResult<()> {
        tracing::debug!(%node, %cell, "collapsing single cell into its grid");
        let cell_type = self.tree().attr(cell, TYPE_ATTR).cloned();
        let inner = self.content_of(cell);
        let current = self.content_of(node);

        let tree = self.tree_mut();
        match cell_type {
            Some(value) => tree.set_attr(node, TYPE_ATTR, value),
            None => {
                tree.remove_attr(node, TYPE_ATTR);
            }
        }
        if let Some(current) = current {
            tree.detach(current);
        }
        if let Some(inner) = inner {
            tree.append_child(node, inner)?;
        }
        Ok(())
    }

    /// Rule (b): lift the rows of a lone grid cell one level up
    fn splice_rows(&mut self, node: NodeId, row: NodeId, cell: NodeId) -> ManipulatorResult<()> {
        tracing::debug!(%node, %cell, "flattening lone grid cell");
        let content = self.content_of(node).ok_or_else(|| {
            ManipulatorError::Inconsistency("A grid with rows must have a content".to_string())
        })?;
        for inner in self.rows_of(cell) {
            self.tree_mut().insert_before(content, inner, row)?;
        }
        self.tree_mut().detach(row);
        Ok(())
    }

    /// The parent row of a cell, when the cell is alone in it
    fn sole_cell_row(&self, cell: NodeId) -> Option<NodeId> {
        if self.tree().tag(cell) != CELL_TAG {
            return None;
        }
        let row = self.tree().parent(cell)?;
        (self.cells_of(row).len() == 1).then_some(row)
    }

    /// Rule (c): move the cells of `node` into the row holding `node`
    fn promote_cells(&mut self, node: NodeId, parent_row: NodeId, cells: &[NodeId]) -> ManipulatorResult<()> {
        tracing::debug!(%node, count = cells.len(), "promoting cells into parent row");
        for cell in cells {
            self.tree_mut().insert_before(parent_row, *cell, node)?;
        }
        self.tree_mut().detach(node);
        Ok(())
    }
}
