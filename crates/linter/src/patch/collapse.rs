use crate::index::{NodeId, NodeIndex, NodeKind};

/// Member separator and whether members lose their own trailing delimiter
fn layout(kind: NodeKind) -> Option<(&'static str, bool)> {
    match kind {
        NodeKind::ObjectExpression => Some((", ", true)),
        NodeKind::TSTypeLiteral | NodeKind::TSInterfaceBody => Some(("; ", true)),
        NodeKind::BlockStatement | NodeKind::FunctionBody => Some((" ", false)),
        _ => None,
    }
}

fn is_filler(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || c == ',' || c == ';')
}

/// Render a braced construct on one line: `{ a: 1, b: 2 }` for objects,
/// `{ a: string; b: number }` for type members, `{ a(); b(); }` for blocks.
///
/// Returns `None` when the node cannot be collapsed: it is not a braced
/// construct, it contains comments, one of its members spans several lines,
/// or the text between members is not just delimiters.
pub fn collapse_to_single_line(index: &NodeIndex<'_>, node: NodeId) -> Option<String> {
    let (separator, strip_delimiters) = layout(index.kind(node))?;
    if index.has_comments(node) {
        return None;
    }
    let span = index.span(node);
    let text = index.text(node);
    if !text.starts_with('{') || !text.ends_with('}') || text.len() < 2 {
        return None;
    }

    let source = index.source();
    let mut members = Vec::with_capacity(index.children(node).len());
    let mut cursor = span.start as usize + 1;
    for member in index.children(node) {
        let member_span = index.span(*member);
        if !is_filler(source.get(cursor..member_span.start as usize)?) {
            return None;
        }
        cursor = member_span.end as usize;

        let member_text = index.text(*member);
        if member_text.contains('\n') {
            return None;
        }
        let member_text = if strip_delimiters {
            member_text.trim_end_matches([',', ';']).trim_end()
        } else {
            member_text.trim_end()
        };
        members.push(member_text);
    }
    if !is_filler(source.get(cursor..span.end as usize - 1)?) {
        return None;
    }

    if members.is_empty() {
        return Some("{}".to_string());
    }
    Some(format!("{{ {} }}", members.join(separator)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_support::with_index;

    fn collapse_first(source: &str, kind: NodeKind) -> Option<String> {
        with_index(source, |index| {
            let node = index.nodes_of_kind(kind).next().unwrap();
            collapse_to_single_line(index, node)
        })
    }

    #[test]
    fn test_collapse_object() {
        assert_eq!(
            collapse_first("const foo = {\n  a: 1\n}", NodeKind::ObjectExpression).as_deref(),
            Some("{ a: 1 }")
        );
        assert_eq!(
            collapse_first("const foo = {\n  a: 1,\n  ...rest,\n}", NodeKind::ObjectExpression)
                .as_deref(),
            Some("{ a: 1, ...rest }")
        );
    }

    #[test]
    fn test_refuse_comments() {
        assert_eq!(
            collapse_first("const foo = {\n  // note\n  a: 1\n}", NodeKind::ObjectExpression),
            None
        );
        assert_eq!(
            collapse_first("const foo = {\n  a: /* x */ 1\n}", NodeKind::ObjectExpression),
            None
        );
    }

    #[test]
    fn test_refuse_multiline_member() {
        let source = "const foo = {\n  a: {\n    b: 1\n  }\n}";
        assert_eq!(collapse_first(source, NodeKind::ObjectExpression), None);
    }

    #[test]
    fn test_collapse_type_members() {
        assert_eq!(
            collapse_first("type T = {\n  a: string;\n  b?: number\n}", NodeKind::TSTypeLiteral)
                .as_deref(),
            Some("{ a: string; b?: number }")
        );
        assert_eq!(
            collapse_first("interface I {\n  a: string,\n}", NodeKind::TSInterfaceBody).as_deref(),
            Some("{ a: string }")
        );
    }

    #[test]
    fn test_collapse_block() {
        assert_eq!(
            collapse_first("if (x) {\n  a();\n  b();\n}", NodeKind::BlockStatement).as_deref(),
            Some("{ a(); b(); }")
        );
    }

    #[test]
    fn test_collapse_empty() {
        assert_eq!(
            collapse_first("const foo = {\n\n}", NodeKind::ObjectExpression).as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn test_unsupported_kind() {
        assert_eq!(collapse_first("foo(\n  1\n)", NodeKind::CallExpression), None);
    }
}
