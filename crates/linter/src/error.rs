//! Error types for the lint core
//!
//! Expected absence (no ancestor, no references, no match) is never an
//! error; these types only cover caller contract violations and structural
//! inconsistencies, which fail the whole file.

use oxc_span::Span;
use thiserror::Error;

/// Node Index construction failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error(
        "{child_kind} at {}..{} is not inside its parent {parent_kind} at {}..{}",
        child.start, child.end, parent.start, parent.end
    )]
    ChildOutsideParent {
        child_kind: &'static str,
        child: Span,
        parent_kind: &'static str,
        parent: Span,
    },
    #[error("span {}..{} is outside the source text (length {len})", span.start, span.end)]
    SpanOutOfBounds { span: Span, len: usize },
}

/// Selector compilation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("malformed selector `{pattern}` at offset {position}: {message}")]
    Malformed {
        pattern: String,
        position: usize,
        message: String,
    },
    #[error("unknown node type `{kind}` in selector `{pattern}`")]
    UnknownKind { pattern: String, kind: String },
}

/// Text patch failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error(
        "overlapping edits: {}..{} and {}..{}",
        first.start, first.end, second.start, second.end
    )]
    OverlappingEdits { first: Span, second: Span },
    #[error("edit {}..{} is out of bounds (source length {len})", span.start, span.end)]
    OutOfBounds { span: Span, len: usize },
    #[error("edit {}..{} does not fall on character boundaries", span.start, span.end)]
    NotCharBoundary { span: Span },
    #[error("edit {}..{} has its start after its end", span.start, span.end)]
    InvertedRange { span: Span },
}

/// Configuration failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse JSON config: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("Unknown rule `{0}`")]
    UnknownRule(String),
    #[error("Invalid setting for rule `{rule}`: {setting}")]
    InvalidSetting { rule: String, setting: String },
    #[error("Invalid options for rule `{rule}`: {source}")]
    InvalidOptions {
        rule: String,
        source: serde_json::Error,
    },
}

/// Any failure that aborts the analysis of a file
#[derive(Error, Debug)]
pub enum LintError {
    #[error("failed to parse source: {}", .0.join("; "))]
    Parse(Vec<String>),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
