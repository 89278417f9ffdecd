//! Lexical tokens around nodes
//!
//! The parser does not expose its token stream, so the index re-lexes the
//! source once. Comments come from the parser's comment list and literal-like
//! nodes (strings, numbers, templates, regular expressions, JSX text) from
//! the tree, both as opaque tokens; what is left between them is only words,
//! punctuators and whitespace, which a small scanner handles reliably.

use oxc_span::Span;
use rustc_hash::FxHashMap;

/// Token category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and keywords
    Word,
    /// Operators and punctuation
    Punctuator,
    /// String, number, template, regex or JSX text
    Literal,
    LineComment,
    BlockComment,
}

/// A lexical token of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Whether a line break separates this token from the previous one
    pub newline_before: bool,
}

impl Token {
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start as usize..self.span.end as usize]
    }

    /// Check if this is the given punctuator
    pub fn is_punctuator(&self, source: &str, value: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text(source) == value
    }
}

/// Which side of a node to read tokens from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

const PUNCTUATORS: &[&str] = &[
    "...", "===", "!==", "**=", "<<=", "&&=", "||=", "??=", "=>", "==", "!=", "<=", ">=", "&&",
    "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "**", "<<",
];

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'#' || b >= 0x80
}

/// Split `source` into tokens. `opaque` maps the start offset of each
/// comment and literal-like node to its end offset and token kind.
pub(crate) fn tokenize(source: &str, opaque: &FxHashMap<u32, (u32, TokenKind)>) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut newline_before = false;

    let push = |tokens: &mut Vec<Token>, kind: TokenKind, start: usize, end: usize, nl: &mut bool| {
        tokens.push(Token {
            kind,
            span: Span::new(start as u32, end as u32),
            newline_before: *nl,
        });
        *nl = false;
    };

    while pos < bytes.len() {
        if let Some(&(end, kind)) = opaque.get(&(pos as u32)) {
            let end = (end as usize).max(pos + 1).min(bytes.len());
            push(&mut tokens, kind, pos, end, &mut newline_before);
            pos = end;
            continue;
        }

        match bytes[pos] {
            b'\n' => {
                newline_before = true;
                pos += 1;
            }
            b' ' | b'\t' | b'\r' | 0x0b | 0x0c => pos += 1,
            b'"' | b'\'' => {
                let end = scan_string(bytes, pos);
                push(&mut tokens, TokenKind::Literal, pos, end, &mut newline_before);
                pos = end;
            }
            b'`' => {
                let end = scan_template(bytes, pos);
                push(&mut tokens, TokenKind::Literal, pos, end, &mut newline_before);
                pos = end;
            }
            b if is_word_byte(b) => {
                let mut end = pos + 1;
                while end < bytes.len() && is_word_byte(bytes[end]) {
                    end += 1;
                }
                push(&mut tokens, TokenKind::Word, pos, end, &mut newline_before);
                pos = end;
            }
            _ => {
                let rest = &source[pos..];
                let len = PUNCTUATORS
                    .iter()
                    .find(|p| rest.starts_with(**p))
                    .map_or(1, |p| p.len());
                push(&mut tokens, TokenKind::Punctuator, pos, pos + len, &mut newline_before);
                pos += len;
            }
        }
    }

    tokens
}

fn scan_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' => return pos,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

fn scan_template(bytes: &[u8], start: usize) -> usize {
    let mut pos = start + 1;
    let mut depth = 0usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'`' if depth == 0 => return pos + 1,
            b'$' if depth == 0 && bytes.get(pos + 1) == Some(&b'{') => {
                depth = 1;
                pos += 2;
            }
            b'{' if depth > 0 => {
                depth += 1;
                pos += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                pos += 1;
            }
            b'"' | b'\'' if depth > 0 => pos = scan_string(bytes, pos),
            b'`' => pos = scan_template(bytes, pos),
            _ => pos += 1,
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source, &FxHashMap::default())
            .into_iter()
            .map(|t| (t.kind, t.text(source).to_string()))
            .collect()
    }

    #[test]
    fn test_words_and_punctuators() {
        let tokens = kinds("const a = (b) => b ?? 1;");
        let texts: Vec<_> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            texts,
            vec!["const", "a", "=", "(", "b", ")", "=>", "b", "??", "1", ";"]
        );
    }

    #[test]
    fn test_comments_are_taken_from_opaque_spans() {
        let source = "a // it's\n/* block */ b";
        let mut opaque = FxHashMap::default();
        opaque.insert(2, (9, TokenKind::LineComment));
        opaque.insert(10, (21, TokenKind::BlockComment));
        let tokens: Vec<_> = tokenize(source, &opaque)
            .into_iter()
            .map(|t| (t.kind, t.text(source)))
            .collect();
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Word, "a"),
                (TokenKind::LineComment, "// it's"),
                (TokenKind::BlockComment, "/* block */"),
                (TokenKind::Word, "b"),
            ]
        );
    }

    #[test]
    fn test_strings_hide_comment_markers() {
        let tokens = kinds(r#"x = "// not a comment";"#);
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::LineComment));
        assert_eq!(tokens[2].0, TokenKind::Literal);
    }

    #[test]
    fn test_newline_before() {
        let source = "a,\nb";
        let tokens = tokenize(source, &FxHashMap::default());
        assert!(!tokens[1].newline_before);
        assert!(tokens[2].newline_before);
    }

    #[test]
    fn test_opaque_spans() {
        let source = "<p>don't</p>";
        let mut opaque = FxHashMap::default();
        opaque.insert(3, (8, TokenKind::Literal));
        let tokens = tokenize(source, &opaque);
        let literal = tokens.iter().find(|t| t.kind == TokenKind::Literal).unwrap();
        assert_eq!(literal.text(source), "don't");
    }

    #[test]
    fn test_template_with_nested_braces() {
        let tokens = kinds("`a ${ {b: 1}.b } c` + d");
        assert_eq!(tokens[0].0, TokenKind::Literal);
        assert_eq!(tokens[0].1, "`a ${ {b: 1}.b } c`");
        assert_eq!(tokens[1].1, "+");
    }
}
