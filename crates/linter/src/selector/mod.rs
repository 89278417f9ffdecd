//! Selector Matcher
//!
//! A small CSS-like query language over the [`NodeIndex`]:
//! `FunctionDeclaration[params.length>2]`,
//! `ArrowFunctionExpression > BlockStatement`,
//! `ExportNamedDeclaration[source] ExportSpecifier`.

mod cache;
mod parser;

use std::borrow::Cow;

use crate::error::SelectorError;
use crate::index::{AttrValue, NodeId, NodeIndex};

pub use cache::SelectorCache;

/// Relation between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A > B`
    Child,
    /// `A B`
    Descendant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl Literal {
    fn as_scalar(&self) -> Cow<'_, str> {
        match self {
            Literal::Str(s) => Cow::Borrowed(s),
            Literal::Num(n) => Cow::Owned(crate::index::format_number(*n)),
            Literal::Bool(true) => Cow::Borrowed("true"),
            Literal::Bool(false) => Cow::Borrowed("false"),
            Literal::Null => Cow::Borrowed("null"),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Literal::Num(n) => Some(*n),
            Literal::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// `[path]` or `[path op literal]`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub path: Vec<String>,
    pub test: Option<(Operator, Literal)>,
}

impl Predicate {
    fn holds(&self, value: Option<&AttrValue<'_>>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some((operator, literal)) = &self.test else {
            return *value != AttrValue::Null;
        };
        match operator {
            Operator::Eq => equals(value, literal),
            Operator::Ne => !equals(value, literal),
            ordering => match (value.as_number(), literal.as_number()) {
                (Some(left), Some(right)) => match ordering {
                    Operator::Gt => left > right,
                    Operator::Lt => left < right,
                    Operator::Ge => left >= right,
                    _ => left <= right,
                },
                _ => false,
            },
        }
    }
}

fn equals(value: &AttrValue<'_>, literal: &Literal) -> bool {
    if let (AttrValue::Num(left), Some(right)) = (value, literal.as_number()) {
        return *left == right;
    }
    value
        .as_scalar()
        .is_some_and(|scalar| scalar == literal.as_scalar())
}

/// Kind filter plus predicates, all of which must hold
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    /// ESTree type name, `None` for `*` or a bare attribute list
    pub kind: Option<&'static str>,
    pub predicates: Vec<Predicate>,
}

impl Compound {
    fn matches(&self, index: &NodeIndex<'_>, id: NodeId) -> bool {
        if self
            .kind
            .is_some_and(|kind| index.kind(id).type_name() != kind)
        {
            return false;
        }
        self.predicates
            .iter()
            .all(|predicate| predicate.holds(index.resolve_path(id, &predicate.path).as_ref()))
    }
}

/// A compiled selector, reusable across nodes and files
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pattern: String,
    compounds: Vec<Compound>,
    /// `combinators[i]` relates `compounds[i]` to `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

impl Selector {
    pub fn compile(pattern: &str) -> Result<Self, SelectorError> {
        parser::parse(pattern)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compound the matched node itself must satisfy
    pub fn subject(&self) -> &Compound {
        &self.compounds[self.compounds.len() - 1]
    }

    pub fn matches(&self, index: &NodeIndex<'_>, id: NodeId) -> bool {
        self.matches_at(index, id, self.compounds.len() - 1)
    }

    fn matches_at(&self, index: &NodeIndex<'_>, id: NodeId, position: usize) -> bool {
        if !self.compounds[position].matches(index, id) {
            return false;
        }
        if position == 0 {
            return true;
        }
        match self.combinators[position - 1] {
            Combinator::Child => index
                .parent(id)
                .is_some_and(|parent| self.matches_at(index, parent, position - 1)),
            Combinator::Descendant => index
                .ancestors(id)
                .skip(1)
                .any(|ancestor| self.matches_at(index, ancestor, position - 1)),
        }
    }

    /// Match and return the values of the subject's attribute paths
    pub fn captures<'i>(
        &self,
        index: &'i NodeIndex<'_>,
        id: NodeId,
    ) -> Option<Vec<(String, AttrValue<'i>)>> {
        if !self.matches(index, id) {
            return None;
        }
        Some(
            self.subject()
                .predicates
                .iter()
                .filter_map(|predicate| {
                    let value = index.resolve_path(id, &predicate.path)?;
                    Some((predicate.path.join("."), value))
                })
                .collect(),
        )
    }

    /// Every matching node under `root`, in pre-order
    pub fn match_all<'a>(
        &'a self,
        index: &'a NodeIndex<'a>,
        root: NodeId,
    ) -> impl Iterator<Item = NodeId> + 'a {
        index
            .descendants(root)
            .filter(move |id| self.matches(index, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_support::with_index;
    use crate::index::NodeKind;

    fn names(index: &NodeIndex<'_>, selector: &str) -> Vec<String> {
        let selector = Selector::compile(selector).unwrap();
        selector
            .match_all(index, index.root())
            .map(|id| index.text(id).to_string())
            .collect()
    }

    #[test]
    fn test_params_length_predicate() {
        let source = "function three(a, b, c) {}\nfunction two(a, b) {}";
        with_index(source, |index| {
            let selector = Selector::compile("FunctionDeclaration[params.length>2]").unwrap();
            let functions: Vec<_> = index.nodes_of_kind(NodeKind::FunctionDeclaration).collect();
            assert!(selector.matches(index, functions[0]));
            assert!(!selector.matches(index, functions[1]));
        });
    }

    #[test]
    fn test_child_combinator() {
        let source = "const f = () => { return 1; };\nfunction g() { return 2; }";
        with_index(source, |index| {
            assert_eq!(
                names(index, "ArrowFunctionExpression > BlockStatement").len(),
                1
            );
            assert_eq!(names(index, "FunctionDeclaration > BlockStatement").len(), 1);
        });
    }

    #[test]
    fn test_descendant_combinator() {
        let source = "function f() { if (a) { return 1; } }\nif (b) { g(); }";
        with_index(source, |index| {
            assert_eq!(
                names(index, "FunctionDeclaration ReturnStatement"),
                vec!["return 1;"]
            );
            assert!(names(index, "FunctionDeclaration CallExpression").is_empty());
        });
    }

    #[test]
    fn test_string_and_flag_predicates() {
        let source = "foo(1);\nbar(2);\nconst h = async () => 1;";
        with_index(source, |index| {
            assert_eq!(
                names(index, "CallExpression[callee.name='foo']"),
                vec!["foo(1)"]
            );
            assert_eq!(names(index, "CallExpression[callee.name!=foo]"), vec!["bar(2)"]);
            assert_eq!(names(index, "ArrowFunctionExpression[async=true]").len(), 1);
            assert_eq!(names(index, "[kind=const]").len(), 1);
        });
    }

    #[test]
    fn test_member_expression_predicates() {
        let source = "console.log(1);\nlogger.info(2);\nclass C { #count = 0; read() { return this.#count; } }\nf(...rest);";
        with_index(source, |index| {
            assert_eq!(
                names(index, "CallExpression[callee.object.name='console']"),
                vec!["console.log(1)"]
            );
            assert_eq!(
                names(index, "MemberExpression[object.name='console']"),
                vec!["console.log"]
            );
            assert_eq!(names(index, "MemberExpression > PrivateIdentifier"), vec!["#count"]);
            assert_eq!(names(index, "CallExpression > SpreadElement"), vec!["...rest"]);
        });
    }

    #[test]
    fn test_ordering_on_non_numbers_is_false() {
        with_index("foo(1);", |index| {
            assert!(names(index, "CallExpression[callee.name>1]").is_empty());
            assert!(names(index, "CallExpression[callee.name<1]").is_empty());
            assert_eq!(names(index, "CallExpression[arguments.0.value>=1]").len(), 1);
        });
    }

    #[test]
    fn test_missing_path_never_matches() {
        with_index("function f() {}", |index| {
            assert!(names(index, "FunctionDeclaration[returnType]").is_empty());
            assert!(names(index, "FunctionDeclaration[returnType.x=1]").is_empty());
            assert!(names(index, "FunctionDeclaration[returnType.x!=1]").is_empty());
            assert_eq!(names(index, "FunctionDeclaration[body]").len(), 1);
        });
    }

    #[test]
    fn test_matching_is_deterministic() {
        let source = "function a(x, y, z) {}\nconst b = (x) => x;";
        with_index(source, |index| {
            let selector = Selector::compile("*[params.length>=1]").unwrap();
            let first: Vec<_> = selector.match_all(index, index.root()).collect();
            let second: Vec<_> = selector.match_all(index, index.root()).collect();
            assert_eq!(first, second);
            assert_eq!(first.len(), 2);
        });
    }

    #[test]
    fn test_captures() {
        with_index("function f(a, b, c) {}", |index| {
            let selector = Selector::compile("FunctionDeclaration[params.length>2]").unwrap();
            let func = index.nodes_of_kind(NodeKind::FunctionDeclaration).next().unwrap();
            let captures = selector.captures(index, func).unwrap();
            assert_eq!(
                captures,
                vec![("params.length".to_string(), AttrValue::Num(3.0))]
            );
        });
    }
}
