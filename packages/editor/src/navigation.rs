//! Navigation helpers and the content moves used by drag-and-drop

use crate::errors::{ManipulatorError, ManipulatorResult};
use crate::grid::Grid;
use crate::kinds::*;
use dashgrid_markup::NodeId;

impl Grid {
    /// First container among the ancestors of `node`, or `node` itself
    /// when `include_current` is set.
    ///
    /// The root has no ancestors: `get_nearest_grid(root, false)` is `None`,
    /// while `get_nearest_grid(root, true)` returns the root, which is a
    /// `mainGrid`.
    pub fn get_nearest_grid(&self, node: NodeId, include_current: bool) -> Option<NodeId> {
        let start = if include_current {
            Some(node)
        } else {
            self.tree().parent(node)
        };
        std::iter::successors(start, |n| self.tree().parent(*n)).find(|n| self.is_container(*n))
    }

    /// Detach a content node from its cell and normalize the grid it leaves
    pub fn remove_content_node(&mut self, content: NodeId, skip_clean: bool) -> ManipulatorResult<()> {
        let holder = self
            .tree()
            .parent(content)
            .filter(|cell| self.tree().tag(*cell) == CELL_TAG);
        if holder.is_none() {
            return Err(ManipulatorError::Inconsistency(
                "The content to remove must be held by a cell".to_string(),
            ));
        }

        let grid = self.get_nearest_grid(content, false);
        self.tree_mut().detach(content);
        tracing::debug!(%content, skip_clean, "removed content");

        match grid {
            Some(grid) if !skip_clean => self.clean_grid(grid),
            _ => Ok(()),
        }
    }

    /// Drop `content` into a placeholder cell, which becomes a module.
    ///
    /// The grid the content came from is normalized afterwards.
    pub fn move_content_to_placeholder(
        &mut self,
        content: NodeId,
        placeholder: NodeId,
    ) -> ManipulatorResult<()> {
        if self.tree().tag(placeholder) != CELL_TAG || !self.is_type(placeholder, NodeType::Placeholder) {
            return Err(ManipulatorError::InvalidType(format!(
                "Cannot move content in a cell of type <{}>. Should be <placeholder>",
                self.type_label(placeholder)
            )));
        }

        let origin = self.get_nearest_grid(content, false);

        let tree = self.tree_mut();
        tree.append_child(placeholder, content)?;
        let previous: Vec<NodeId> = tree
            .children(placeholder)
            .iter()
            .copied()
            .filter(|c| *c != content)
            .collect();
        for child in previous {
            tree.detach(child);
        }
        tree.set_attr(placeholder, TYPE_ATTR, NodeType::Module.as_str());
        tracing::debug!(%content, %placeholder, "moved content into placeholder");

        match origin {
            Some(grid) if self.tree().is_attached(grid) && self.is_container(grid) => self.clean_grid(grid),
            _ => Ok(()),
        }
    }
}
