//! # dashgrid markup
//!
//! Element tree plus the two codecs used at the persistence boundary:
//!
//! ```text
//!   markup text  --parse-->  Tree  --ObjectCodec::decode-->  object (JSON)
//!   markup text  <--serialize--  Tree  <--ObjectCodec::encode--  object
//! ```
//!
//! Nothing here knows about grids; the layout rules live in `dashgrid-editor`.

pub mod error;
pub mod lexer;
pub mod node;
pub mod object;
pub mod parser;
pub mod serializer;

pub use error::{CodecError, ParseError, ParseResult, TreeError};
#[cfg(feature = "pretty-errors")]
pub use error::format_parse_error;
pub use node::{AttrValue, NodeId, Selector, Tree};
pub use object::{infer_value, ObjectCodec};
pub use parser::{parse, Parser};
pub use serializer::{serialize, Serializer};

/// Copy a tree by printing it and parsing the text back.
///
/// The result shares nothing with the input and carries no detached
/// leftovers from earlier edits.
pub fn clone_tree(tree: &Tree) -> ParseResult<Tree> {
    parse(&serialize(tree))
}
