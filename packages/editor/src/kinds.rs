//! Tags, attribute names and node types of the grid format

use serde::{Deserialize, Serialize};
use std::fmt;

pub const GRID_TAG: &str = "grid";
pub const CONTENT_TAG: &str = "content";
pub const ROW_TAG: &str = "row";
pub const CELL_TAG: &str = "cell";

pub const TYPE_ATTR: &str = "type";
pub const ID_ATTR: &str = "id";
pub const NAME_ATTR: &str = "name";
pub const SPACE_ATTR: &str = "space";
pub const HAS_PLACEHOLDERS_ATTR: &str = "hasPlaceholders";

/// Value of the `type` attribute on grids, cells and placeholder rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    MainGrid,
    Grid,
    Module,
    Placeholder,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::MainGrid => "mainGrid",
            NodeType::Grid => "grid",
            NodeType::Module => "module",
            NodeType::Placeholder => "placeholder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mainGrid" => Some(NodeType::MainGrid),
            "grid" => Some(NodeType::Grid),
            "module" => Some(NodeType::Module),
            "placeholder" => Some(NodeType::Placeholder),
            _ => None,
        }
    }

    /// Containers accept rows directly
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::MainGrid | NodeType::Grid)
    }

    /// Types a cell may carry
    pub fn parse_cell_type(value: &str) -> Option<Self> {
        Self::parse(value).filter(|t| *t != NodeType::MainGrid)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
