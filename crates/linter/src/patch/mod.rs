//! Text Patch Engine
//!
//! Edits are anchored to byte ranges of the original source and applied in
//! one pass. Overlapping or malformed edit sets are rejected as a whole.

mod collapse;
mod relocate;

use std::fmt;

use oxc_span::Span;

use crate::error::PatchError;
use crate::index::{NodeId, NodeIndex};

pub use collapse::collapse_to_single_line;
pub use relocate::move_statement;
pub(crate) use relocate::leading_comment_start;

/// A single text edit (replacement of a byte range of the original source)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// Insertion at an offset
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::replace(Span::new(offset, offset), text)
    }

    /// Deletion of a range
    pub fn delete(span: Span) -> Self {
        Self::replace(span, "")
    }

    /// Whether the two edits touch a common byte. Insertions at the boundary
    /// of another edit do not overlap it.
    pub fn overlaps(&self, other: &TextEdit) -> bool {
        self.span.start < other.span.end && other.span.start < self.span.end
    }

    fn validate(&self, source: &str) -> Result<(), PatchError> {
        let span = self.span;
        if span.start > span.end {
            return Err(PatchError::InvertedRange { span });
        }
        if span.end as usize > source.len() {
            return Err(PatchError::OutOfBounds {
                span,
                len: source.len(),
            });
        }
        if !source.is_char_boundary(span.start as usize) || !source.is_char_boundary(span.end as usize)
        {
            return Err(PatchError::NotCharBoundary { span });
        }
        Ok(())
    }
}

impl fmt::Display for TextEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{} -> {:?}",
            self.span.start, self.span.end, self.replacement
        )
    }
}

/// Apply `edits` to `source`.
///
/// Edits are sorted by start offset (insertions at the same offset keep
/// their given order). Any overlap, inverted range, out-of-bounds range or
/// range splitting a character fails the whole application.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String, PatchError> {
    for edit in edits {
        edit.validate(source)?;
    }

    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.span.start, edit.span.end));

    for window in sorted.windows(2) {
        if window[1].span.start < window[0].span.end {
            return Err(PatchError::OverlappingEdits {
                first: window[0].span,
                second: window[1].span,
            });
        }
    }

    let mut result = String::with_capacity(source.len());
    let mut last_pos = 0usize;
    for edit in sorted {
        result.push_str(&source[last_pos..edit.span.start as usize]);
        result.push_str(&edit.replacement);
        last_pos = edit.span.end as usize;
    }
    result.push_str(&source[last_pos..]);

    tracing::trace!(edits = edits.len(), "applied text edits");
    Ok(result)
}

/// Whitespace prefix of the line containing the start of `node`
pub fn compute_indent<'s>(index: &NodeIndex<'s>, node: NodeId) -> &'s str {
    indent_at(index, index.span(node).start)
}

pub(crate) fn indent_at<'s>(index: &NodeIndex<'s>, offset: u32) -> &'s str {
    let line_start = index.line_start(offset);
    let line = &index.source()[line_start as usize..offset as usize];
    let width = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..width]
}
