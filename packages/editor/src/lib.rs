//! # Dashgrid Editor
//!
//! Grid tree manipulator for dashboard layouts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ markup: text/object ↔ element tree          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: grid rules on top of the tree       │
//! │  - Row/cell algebra and leaf conversion     │
//! │  - Normalizer restoring the minimal shape   │
//! │  - Placeholder overlay for drag-and-drop    │
//! │  - Documents and serializable mutations     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Tree shape
//!
//! ```text
//! grid[type=mainGrid]
//! └── content
//!     └── row*            (type=placeholder while in design mode)
//!         └── cell*       type = module | grid | placeholder
//!             └── content (rows again when type=grid)
//! ```
//!
//! Every operation is synchronous and works in place; a [`Grid`] has one
//! owner at a time.
//!
//! ## Usage
//!
//! ```rust
//! use dashgrid_editor::Grid;
//!
//! let mut grid = Grid::create("dashboard", Some(5));
//! let row = grid.add_row(grid.root(), None)?;
//! let cell = grid.add_cell(row, "module", None, None)?;
//!
//! // a second row on the module turns it into a nested grid
//! grid.add_row(cell, None)?;
//! grid.clean_grid(cell)?;
//!
//! grid.add_placeholders(grid.root())?;
//! grid.remove_placeholders(grid.root())?;
//! # Ok::<(), dashgrid_editor::ManipulatorError>(())
//! ```

mod algebra;
mod codec;
mod document;
mod errors;
mod grid;
mod ids;
pub mod kinds;
mod mutations;
mod navigation;
mod normalize;
mod placeholders;

pub use codec::grid_codec;
pub use document::{DocumentStorage, GridDocument};
pub use errors::{EditorError, ManipulatorError, ManipulatorResult};
pub use grid::{Grid, DEFAULT_SPACE};
pub use ids::{get_grid_seed, IdGenerator};
pub use kinds::NodeType;
pub use mutations::{Mutation, MutationError, MutationResult};
pub use placeholders::PlaceholderOptions;

// Re-export the tree types callers need to hold handles
pub use dashgrid_markup::{AttrValue, NodeId, Selector, Tree};
