//! Error types for the editor

use dashgrid_markup::{CodecError, ParseError, TreeError};
use thiserror::Error;

/// Contract violations raised by the grid manipulator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManipulatorError {
    /// A node was asked to become, or to hold, a disallowed type
    #[error("InvalidType: {0}")]
    InvalidType(String),

    /// A structural precondition does not hold
    #[error("Inconsistency: {0}")]
    Inconsistency(String),

    /// The tree is not in the state the operation expects
    #[error("InvalidState: {0}")]
    InvalidState(String),
}

impl ManipulatorError {
    pub fn message(&self) -> &str {
        match self {
            ManipulatorError::InvalidType(msg)
            | ManipulatorError::Inconsistency(msg)
            | ManipulatorError::InvalidState(msg) => msg,
        }
    }
}

impl From<TreeError> for ManipulatorError {
    fn from(e: TreeError) -> Self {
        ManipulatorError::Inconsistency(e.to_string())
    }
}

pub type ManipulatorResult<T> = Result<T, ManipulatorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Grid error: {0}")]
    Manipulator(#[from] ManipulatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Document is not file-backed")]
    NotFileBacked,
}
