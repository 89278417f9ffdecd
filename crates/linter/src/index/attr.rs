//! Scalar and structural attributes of nodes, as seen by selectors

use std::borrow::Cow;

use super::{Field, NodeId, NodeIndex, NodeKind};

/// Value reached by an attribute path
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue<'i> {
    Node(NodeId),
    List(&'i [NodeId]),
    Str(Cow<'i, str>),
    Num(f64),
    Bool(bool),
    Null,
}

impl AttrValue<'_> {
    /// Scalar rendering used for comparisons; nodes and lists have none
    pub fn as_scalar(&self) -> Option<Cow<'_, str>> {
        match self {
            AttrValue::Str(s) => Some(Cow::Borrowed(s.as_ref())),
            AttrValue::Num(n) => Some(Cow::Owned(format_number(*n))),
            AttrValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            AttrValue::Null => Some(Cow::Borrowed("null")),
            AttrValue::Node(_) | AttrValue::List(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Num(n) => Some(*n),
            AttrValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn parse_numeric_literal(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('_', "");
    let cleaned = cleaned.trim_end_matches('n');
    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return cleaned.parse().ok(),
    };
    i64::from_str_radix(&cleaned[2..], radix).ok().map(|n| n as f64)
}

impl<'s> NodeIndex<'s> {
    /// One attribute of a node. Built-in attributes (`type`, `name`, `value`,
    /// `raw`, `operator`, `kind`, `start`, `end`) win over flags, which win
    /// over named fields.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<AttrValue<'_>> {
        let kind = self.kind(id);
        let builtin = match name {
            "type" => Some(AttrValue::Str(Cow::Borrowed(kind.type_name()))),
            "name" if kind.is_identifier() => Some(AttrValue::Str(Cow::Borrowed(self.text(id)))),
            "value" if kind.is_literal() => Some(self.literal_value(id)),
            "raw" if kind.is_literal() || kind == NodeKind::TemplateLiteral => {
                Some(AttrValue::Str(Cow::Borrowed(self.text(id))))
            }
            "operator" => self.operator(id).map(|op| AttrValue::Str(Cow::Borrowed(op))),
            "kind" if kind == NodeKind::VariableDeclaration => self
                .declaration_keyword(id)
                .map(|keyword| AttrValue::Str(Cow::Borrowed(keyword))),
            "start" => Some(AttrValue::Num(f64::from(self.span(id).start))),
            "end" => Some(AttrValue::Num(f64::from(self.span(id).end))),
            _ => None,
        };
        if builtin.is_some() {
            return builtin;
        }
        if let Some(flag) = self.flag(id, name) {
            return Some(AttrValue::Bool(flag));
        }
        match self.field(id, name)? {
            Field::Node(node) => Some(AttrValue::Node(*node)),
            Field::List(items) => Some(AttrValue::List(items)),
        }
    }

    /// Follow a dotted attribute path from a node. Any missing step yields
    /// `None`.
    pub fn resolve_path<S: AsRef<str>>(&self, id: NodeId, path: &[S]) -> Option<AttrValue<'_>> {
        let mut current = AttrValue::Node(id);
        for segment in path {
            let segment = segment.as_ref();
            current = match current {
                AttrValue::Node(node) => self.attribute(node, segment)?,
                AttrValue::List(items) => match segment {
                    "length" => AttrValue::Num(items.len() as f64),
                    _ => AttrValue::Node(*items.get(segment.parse::<usize>().ok()?)?),
                },
                AttrValue::Str(s) if segment == "length" => {
                    AttrValue::Num(s.chars().count() as f64)
                }
                _ => return None,
            };
        }
        Some(current)
    }

    fn literal_value(&self, id: NodeId) -> AttrValue<'_> {
        let raw = self.text(id);
        match self.kind(id) {
            NodeKind::StringLiteral => {
                let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
                AttrValue::Str(Cow::Borrowed(inner))
            }
            NodeKind::NumericLiteral => {
                parse_numeric_literal(raw).map_or(AttrValue::Null, AttrValue::Num)
            }
            NodeKind::BooleanLiteral => AttrValue::Bool(raw == "true"),
            NodeKind::NullLiteral => AttrValue::Null,
            _ => AttrValue::Str(Cow::Borrowed(raw)),
        }
    }

    /// Operator text of a unary, binary, logical or assignment expression
    fn operator(&self, id: NodeId) -> Option<&'s str> {
        if self.kind(id) == NodeKind::UnaryExpression {
            let argument = self.field_node(id, "argument")?;
            let before = self.source.get(self.span(id).start as usize..self.span(argument).start as usize)?;
            let operator = before.trim().trim_end_matches('(').trim();
            return (!operator.is_empty()).then_some(operator);
        }
        if !matches!(
            self.kind(id),
            NodeKind::BinaryExpression | NodeKind::LogicalExpression | NodeKind::AssignmentExpression
        ) {
            return None;
        }
        let left = self.field_node(id, "left")?;
        let right = self.field_node(id, "right")?;
        let between = self.source.get(self.span(left).end as usize..self.span(right).start as usize)?;
        let operator = between.trim().trim_start_matches(')').trim_end_matches('(').trim();
        (!operator.is_empty()).then_some(operator)
    }

    /// `var`, `let`, `const`, `using` or `await using`
    fn declaration_keyword(&self, id: NodeId) -> Option<&'s str> {
        let text = self.text(id);
        let text = text.strip_prefix("declare").map_or(text, str::trim_start);
        if text.starts_with("await") {
            return Some("await using");
        }
        let end = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        Some(&text[..end]).filter(|keyword| !keyword.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::with_index;
    use super::*;

    #[test]
    fn test_params_length() {
        with_index("function f(a, b, c) {}", |index| {
            let func = index.nodes_of_kind(NodeKind::FunctionDeclaration).next().unwrap();
            assert_eq!(index.resolve_path(func, &["params", "length"]), Some(AttrValue::Num(3.0)));
            assert_eq!(
                index.resolve_path(func, &["id", "name"]),
                Some(AttrValue::Str(Cow::Borrowed("f")))
            );
        });
    }

    #[test]
    fn test_list_index_path() {
        with_index("function f(first, second) {}", |index| {
            let func = index.nodes_of_kind(NodeKind::FunctionDeclaration).next().unwrap();
            let param = index.resolve_path(func, &["params", "1"]).unwrap();
            let AttrValue::Node(param) = param else {
                panic!("expected a node");
            };
            assert_eq!(index.text(param), "second");
            assert!(index.resolve_path(func, &["params", "2"]).is_none());
        });
    }

    #[test]
    fn test_missing_path_is_none() {
        with_index("function f() {}", |index| {
            let func = index.nodes_of_kind(NodeKind::FunctionDeclaration).next().unwrap();
            assert!(index.resolve_path(func, &["returnType", "typeAnnotation"]).is_none());
            assert!(index.resolve_path(func, &["nope"]).is_none());
            assert!(index.resolve_path(func, &["async", "length"]).is_none());
        });
    }

    #[test]
    fn test_literal_values() {
        with_index("const a = 'hi', b = 0x10, c = true, d = null;", |index| {
            let values: Vec<_> = index
                .ids()
                .filter(|id| index.kind(*id).is_literal())
                .map(|id| index.attribute(id, "value").unwrap())
                .collect();
            assert_eq!(
                values,
                vec![
                    AttrValue::Str(Cow::Borrowed("hi")),
                    AttrValue::Num(16.0),
                    AttrValue::Bool(true),
                    AttrValue::Null,
                ]
            );
        });
    }

    #[test]
    fn test_operator_and_kind() {
        with_index("let x = (a) + b;", |index| {
            let binary = index.nodes_of_kind(NodeKind::BinaryExpression).next().unwrap();
            assert_eq!(
                index.attribute(binary, "operator"),
                Some(AttrValue::Str(Cow::Borrowed("+")))
            );
            let decl = index.nodes_of_kind(NodeKind::VariableDeclaration).next().unwrap();
            assert_eq!(
                index.attribute(decl, "kind"),
                Some(AttrValue::Str(Cow::Borrowed("let")))
            );
        });
    }

    #[test]
    fn test_member_callee_path() {
        with_index("console.log(1);\nobj?.[key];", |index| {
            let call = index.nodes_of_kind(NodeKind::CallExpression).next().unwrap();
            assert_eq!(
                index.resolve_path(call, &["callee", "type"]),
                Some(AttrValue::Str(Cow::Borrowed("MemberExpression")))
            );
            assert_eq!(
                index.resolve_path(call, &["callee", "object", "name"]),
                Some(AttrValue::Str(Cow::Borrowed("console")))
            );
            assert_eq!(
                index.resolve_path(call, &["callee", "property", "name"]),
                Some(AttrValue::Str(Cow::Borrowed("log")))
            );
            assert_eq!(index.resolve_path(call, &["callee", "computed"]), Some(AttrValue::Bool(false)));

            let computed = index.nodes_of_kind(NodeKind::MemberExpression).nth(1).unwrap();
            assert_eq!(index.attribute(computed, "computed"), Some(AttrValue::Bool(true)));
            assert_eq!(index.attribute(computed, "optional"), Some(AttrValue::Bool(true)));
            assert_eq!(
                index.resolve_path(computed, &["property", "name"]),
                Some(AttrValue::Str(Cow::Borrowed("key")))
            );
        });
    }

    #[test]
    fn test_unary_and_spread() {
        with_index("const a = typeof x;\nconst b = !(y);\nf(...args);", |index| {
            let operators: Vec<_> = index
                .nodes_of_kind(NodeKind::UnaryExpression)
                .map(|id| index.attribute(id, "operator").unwrap())
                .collect();
            assert_eq!(
                operators,
                vec![
                    AttrValue::Str(Cow::Borrowed("typeof")),
                    AttrValue::Str(Cow::Borrowed("!")),
                ]
            );
            let spread = index.nodes_of_kind(NodeKind::SpreadElement).next().unwrap();
            assert_eq!(
                index.resolve_path(spread, &["argument", "name"]),
                Some(AttrValue::Str(Cow::Borrowed("args")))
            );
        });
    }

    #[test]
    fn test_flags() {
        with_index("const f = async () => 1;", |index| {
            let arrow = index
                .nodes_of_kind(NodeKind::ArrowFunctionExpression)
                .next()
                .unwrap();
            assert_eq!(index.attribute(arrow, "async"), Some(AttrValue::Bool(true)));
            assert_eq!(index.attribute(arrow, "expression"), Some(AttrValue::Bool(true)));
        });
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(AttrValue::Num(3.0).as_scalar().as_deref(), Some("3"));
        assert_eq!(AttrValue::Num(2.5).as_scalar().as_deref(), Some("2.5"));
        assert_eq!(AttrValue::List(&[]).as_scalar(), None);
    }
}
