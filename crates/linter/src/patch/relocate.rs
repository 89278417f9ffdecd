use oxc_span::Span;

use super::{indent_at, TextEdit};
use crate::error::PatchError;
use crate::index::{Direction, NodeId, NodeIndex};

/// Start of the comment block directly above `start`: comments that begin
/// their own line and are not separated from the code by a blank line
pub(crate) fn leading_comment_start(index: &NodeIndex<'_>, start: u32) -> u32 {
    let source = index.source();
    let mut start = start;
    for token in index.tokens_around_span(Span::new(start, start), Direction::Before) {
        if !token.is_comment() {
            break;
        }
        let gap = &source[token.span.end as usize..start as usize];
        if !gap.trim().is_empty() || gap.matches('\n').count() > 1 {
            break;
        }
        let line_start = index.line_start(token.span.start);
        if !source[line_start as usize..token.span.start as usize].trim().is_empty() {
            break;
        }
        start = token.span.start;
    }
    start
}

/// Move a statement so that it starts on the line containing `target`.
///
/// Produces a deletion of the statement's lines (with its leading comment
/// block) and an insertion at the start of the target line, re-indented to
/// that line. When nothing but whitespace precedes the statement, the
/// deletion starts at byte 0, which can leave extra blank lines behind.
///
/// Fails with [`PatchError::OverlappingEdits`] if the target lies inside the
/// moved text.
pub fn move_statement(
    index: &NodeIndex<'_>,
    node: NodeId,
    target: u32,
) -> Result<Vec<TextEdit>, PatchError> {
    let source = index.source();
    let mut span = index.span(node);
    if source[span.end as usize..].starts_with(';') {
        span.end += 1;
    }
    let start = leading_comment_start(index, span.start);

    let line_start = index.line_start(start);
    let prefix_is_blank = source[line_start as usize..start as usize].trim().is_empty();
    let line_end = index.line_end(span.end);
    let suffix_is_blank = source[span.end as usize..line_end as usize].trim().is_empty();

    let mut delete = Span::new(
        if prefix_is_blank { line_start } else { start },
        span.end,
    );
    if suffix_is_blank {
        if (line_end as usize) < source.len() {
            delete.end = line_end + 1;
        } else if prefix_is_blank && delete.start > 0 {
            // Last line of the file: take the preceding line break instead.
            delete.start -= 1;
        }
    }
    if source[..start as usize].trim().is_empty() {
        delete.start = 0;
    }

    let insert_at = index.line_start(target);
    if delete.start < insert_at && insert_at < delete.end {
        return Err(PatchError::OverlappingEdits {
            first: delete,
            second: Span::new(insert_at, insert_at),
        });
    }

    let indent = indent_at(index, index.line_end(insert_at).min(first_code(source, insert_at)));
    let moved = &source[start as usize..span.end as usize];
    tracing::trace!(from = span.start, to = insert_at, "moving statement");
    Ok(vec![
        TextEdit::delete(delete),
        TextEdit::insert(insert_at, format!("{indent}{moved}\n")),
    ])
}

/// First non-blank offset at or after `from` on the same line
fn first_code(source: &str, from: u32) -> u32 {
    let rest = &source[from as usize..];
    let width = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    from + width as u32
}
