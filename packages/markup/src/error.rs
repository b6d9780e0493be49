//! Error types for the markup layer

use crate::lexer::TokenSpan;
use crate::node::NodeId;
use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location and context
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: TokenSpan,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Mismatched closing tag at {span:?}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        span: TokenSpan,
        expected: String,
        found: String,
    },

    #[error("Lexer error at {span:?}: {message}")]
    LexError { span: TokenSpan, message: String },
}

impl ParseError {
    pub fn span(&self) -> Option<TokenSpan> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::MismatchedTag { span, .. } => Some(*span),
            ParseError::LexError { span, .. } => Some(*span),
        }
    }

    fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
            ParseError::UnexpectedEof { expected } => format!("expected {}", expected),
            ParseError::MismatchedTag { expected, .. } => format!("expected </{}>", expected),
            ParseError::LexError { message, .. } => message.clone(),
        }
    }
}

/// Errors raised while converting between the object form and a tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("Expected an object for element <{tag}>")]
    NotAnObject { tag: String },

    #[error("Attribute '{name}' must hold a scalar value")]
    InvalidAttribute { name: String },

    #[error("Element <{tag}> cannot hold a text value")]
    UnsupportedValue { tag: String },

    #[error("Element names cannot be empty")]
    EmptyTag,
}

/// Structural misuse of the element tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("Node {node} is not a child of {parent}")]
    NotAChild { parent: NodeId, node: NodeId },

    #[error("Moving node {node} there would create a cycle")]
    CycleDetected { node: NodeId },

    #[error("The root element cannot be moved")]
    RootNotMovable,
}

/// Pretty-print a parse error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_parse_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error.span().unwrap_or(TokenSpan {
        start: source.len().saturating_sub(1),
        end: source.len(),
    });

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, filename, span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_color(Color::Red)
                .with_message(error.label()),
        )
        .finish()
        .write((filename, Source::from(source)), &mut output);

    match written {
        Ok(()) => String::from_utf8(output).unwrap_or_else(|_| error.to_string()),
        Err(_) => error.to_string(),
    }
}
