//! # Document Handle
//!
//! A GridDocument is one persisted grid and its editing state.
//! Documents can be:
//! - **Memory-backed**: built in memory or from a string
//! - **File-backed**: loaded from disk, saved back in place
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Parse → Edit → Save
//!   ↓      ↓       ↓      ↓
//! File   Grid  Mutations File
//! ```

use crate::grid::Grid;
use crate::{EditorError, Mutation, MutationResult};
use dashgrid_markup::NodeId;
use serde_json::Value;
use std::path::PathBuf;

/// Arena size below which detached nodes are left alone
const COMPACT_MIN_ARENA: usize = 256;

/// Editable grid document
#[derive(Debug)]
pub struct GridDocument {
    /// Path to source file (if any)
    pub path: PathBuf,

    /// Current version number (increments on each applied mutation)
    pub version: u64,

    storage: DocumentStorage,
}

/// Storage backend for a document
#[derive(Debug)]
pub enum DocumentStorage {
    Memory { grid: Grid },

    File { grid: Grid, dirty: bool },
}

impl GridDocument {
    /// Fresh memory-backed document holding an empty base grid
    pub fn new(path: PathBuf, name: &str, space: Option<u32>) -> Self {
        let mut grid = Grid::create(name, space);
        grid.set_ids(grid.root());
        Self {
            path,
            version: 0,
            storage: DocumentStorage::Memory { grid },
        }
    }

    /// Create document from markup (memory-backed)
    pub fn from_source(path: PathBuf, source: &str) -> Result<Self, EditorError> {
        let mut grid = Grid::from_text(source)?;
        grid.set_ids(grid.root());
        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::Memory { grid },
        })
    }

    /// Load document from file (file-backed)
    pub fn load(path: PathBuf) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(&path)?;
        let mut grid = Grid::from_text(&source)?;
        let assigned = grid.set_ids(grid.root());
        tracing::debug!(path = %path.display(), assigned, "loaded grid");
        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::File {
                grid,
                // ids added on load are not on disk yet
                dirty: assigned > 0,
            },
        })
    }

    pub fn grid(&self) -> &Grid {
        match &self.storage {
            DocumentStorage::Memory { grid } | DocumentStorage::File { grid, .. } => grid,
        }
    }

    fn grid_mut(&mut self) -> &mut Grid {
        match &mut self.storage {
            DocumentStorage::Memory { grid } | DocumentStorage::File { grid, .. } => grid,
        }
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let grid = self.grid_mut();
        let created = mutation.apply(grid)?;
        grid.set_ids(grid.root());
        let created = created.and_then(|node: NodeId| grid.id_of(node));

        let tree = grid.tree_mut();
        let (arena, attached) = (tree.arena_len(), tree.attached_len());
        if arena > COMPACT_MIN_ARENA && arena > 2 * attached {
            tree.compact();
            tracing::debug!(arena, attached, "compacted grid");
        }

        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }
        self.version += 1;
        tracing::debug!(version = self.version, ?mutation, "applied mutation");

        Ok(MutationResult {
            version: self.version,
            created,
        })
    }

    /// Whether the placeholder overlay is applied
    pub fn in_design_mode(&self) -> bool {
        self.grid().has_placeholders()
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            _ => false,
        }
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let source = self.to_source();
        match &mut self.storage {
            DocumentStorage::File { dirty, .. } => {
                std::fs::write(&self.path, source)?;
                *dirty = false;
                Ok(())
            }
            _ => Err(EditorError::NotFileBacked),
        }
    }

    /// Compact markup of the current grid
    pub fn to_source(&self) -> String {
        self.grid().to_text()
    }

    pub fn to_object(&self) -> Value {
        self.grid().to_object()
    }
}
