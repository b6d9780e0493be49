//! # Grid Mutations
//!
//! Serializable edits applied to a [`Grid`], addressing nodes by their `id`
//! attribute so they can travel between the editor and its callers.
//!
//! ## Mutation Semantics
//!
//! ### AddRow / AddCell
//! - Return the id of the created node (ids are assigned after every apply)
//! - `before_*` references must be siblings in the target collection
//!
//! ### SetAttribute
//! - Any attribute except `type`, `id` and `hasPlaceholders`, which only
//!   the grid operations may change
//!
//! ### RemoveContent / MoveContent
//! - The drag-and-drop completion flow; both normalize the grid left behind
//! - A placeholder becomes a module only through `MoveContent`
//!
//! ### Design mode
//! - `EnterDesignMode` / `ExitDesignMode` add and remove the placeholder
//!   overlay, `RefreshPlaceholders` does both

use crate::errors::ManipulatorError;
use crate::grid::Grid;
use crate::kinds::{HAS_PLACEHOLDERS_ATTR, ID_ATTR, TYPE_ATTR};
use crate::placeholders::PlaceholderOptions;
use dashgrid_markup::{AttrValue, NodeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Add a row to a grid (or to a module cell, converting it)
    AddRow {
        node_id: String,
        #[serde(default)]
        before_row_id: Option<String>,
    },

    /// Add a cell with a fresh content to a row
    AddCell {
        row_id: String,
        cell_type: String,
        #[serde(default)]
        before_cell_id: Option<String>,
    },

    /// Set an attribute value
    SetAttribute {
        node_id: String,
        name: String,
        value: AttrValue,
    },

    /// Detach a content node from its cell
    RemoveContent {
        content_id: String,
        #[serde(default)]
        skip_clean: bool,
    },

    /// Drop a content node into a placeholder cell
    MoveContent {
        content_id: String,
        placeholder_id: String,
    },

    /// Normalize a grid and its enclosing grids
    CleanGrid { node_id: String },

    EnterDesignMode {
        #[serde(default)]
        options: PlaceholderOptions,
    },

    ExitDesignMode,

    RefreshPlaceholders {
        #[serde(default)]
        options: PlaceholderOptions,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Attribute '{0}' is managed by the grid and cannot be set directly")]
    ProtectedAttribute(String),

    #[error(transparent)]
    Manipulator(#[from] ManipulatorError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,

    /// Id of the row or cell created by the mutation
    pub created: Option<String>,
}

/// Attributes only the grid operations may write
const PROTECTED_ATTRIBUTES: [&str; 3] = [TYPE_ATTR, ID_ATTR, HAS_PLACEHOLDERS_ATTR];

impl Mutation {
    /// Apply to the grid, returning the node created, if any
    pub fn apply(&self, grid: &mut Grid) -> Result<Option<NodeId>, MutationError> {
        match self {
            Mutation::AddRow { node_id, before_row_id } => {
                let node = lookup(grid, node_id)?;
                let before = lookup_optional(grid, before_row_id.as_deref())?;
                Ok(Some(grid.add_row(node, before)?))
            }

            Mutation::AddCell { row_id, cell_type, before_cell_id } => {
                let row = lookup(grid, row_id)?;
                let before = lookup_optional(grid, before_cell_id.as_deref())?;
                Ok(Some(grid.add_cell(row, cell_type, before, None)?))
            }

            Mutation::SetAttribute { node_id, name, value } => {
                if PROTECTED_ATTRIBUTES.contains(&name.as_str()) {
                    return Err(MutationError::ProtectedAttribute(name.clone()));
                }
                let node = lookup(grid, node_id)?;
                grid.tree_mut().set_attr(node, name.as_str(), value.clone());
                Ok(None)
            }

            Mutation::RemoveContent { content_id, skip_clean } => {
                let content = lookup(grid, content_id)?;
                grid.remove_content_node(content, *skip_clean)?;
                Ok(None)
            }

            Mutation::MoveContent { content_id, placeholder_id } => {
                let content = lookup(grid, content_id)?;
                let placeholder = lookup(grid, placeholder_id)?;
                grid.move_content_to_placeholder(content, placeholder)?;
                Ok(None)
            }

            Mutation::CleanGrid { node_id } => {
                let node = lookup(grid, node_id)?;
                grid.clean_grid(node)?;
                Ok(None)
            }

            Mutation::EnterDesignMode { options } => {
                grid.add_placeholders_with(grid.root(), *options)?;
                Ok(None)
            }

            Mutation::ExitDesignMode => {
                grid.remove_placeholders(grid.root())?;
                Ok(None)
            }

            Mutation::RefreshPlaceholders { options } => {
                grid.clean_placeholders_with(grid.root(), *options)?;
                Ok(None)
            }
        }
    }
}

fn lookup(grid: &Grid, id: &str) -> Result<NodeId, MutationError> {
    grid.find_by_id(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))
}

fn lookup_optional(grid: &Grid, id: Option<&str>) -> Result<Option<NodeId>, MutationError> {
    id.map(|id| lookup(grid, id)).transpose()
}
