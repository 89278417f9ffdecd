//! Node Index
//!
//! An append-only arena over one parsed file. Parent and child links are
//! node ids, so any node can answer ancestor, sibling and descendant queries
//! without re-walking the tree from the root.

mod attr;
mod builder;
mod kind;
mod token;

use std::cell::OnceCell;

use oxc_ast::ast::Program;
use oxc_ast_visit::Visit;
use oxc_semantic::Scoping;
use oxc_span::Span;
use oxc_syntax::symbol::SymbolId;
use rustc_hash::FxHashMap;

pub use attr::AttrValue;
pub(crate) use attr::format_number;
pub use kind::NodeKind;
pub use token::{Direction, Token, TokenKind};

use crate::error::IndexError;
use builder::IndexBuilder;

/// Index of a node in its [`NodeIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named child slot of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Node(NodeId),
    List(Vec<NodeId>),
}

/// One node of the parsed tree
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Half-open byte range in the original source
    pub span: Span,
    pub parent: Option<NodeId>,
    /// Children in source order
    pub children: Vec<NodeId>,
    fields: Vec<(&'static str, Field)>,
    flags: Vec<(&'static str, bool)>,
    /// Declared symbol for binding identifiers, resolved symbol for references
    symbol: Option<SymbolId>,
}

impl SyntaxNode {
    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }
}

/// Arena of [`SyntaxNode`]s for one file
#[derive(Debug)]
pub struct NodeIndex<'s> {
    source: &'s str,
    nodes: Vec<SyntaxNode>,
    /// Start offset to end offset and kind of comments and literal-like nodes
    opaque: FxHashMap<u32, (u32, TokenKind)>,
    tokens: OnceCell<Vec<Token>>,
}

impl<'s> NodeIndex<'s> {
    /// Build the index for `program`.
    ///
    /// `scoping` should come from running `SemanticBuilder` on the same
    /// program; without it identifiers carry no symbols and the scope
    /// resolver finds no references.
    pub fn build(
        program: &Program<'_>,
        source: &'s str,
        scoping: Option<&Scoping>,
    ) -> Result<Self, IndexError> {
        let mut builder = IndexBuilder::new(source.len(), scoping);
        builder.visit_program(program);
        if let Some(error) = builder.error {
            return Err(error);
        }
        for comment in program.comments.iter() {
            let kind = if comment.is_line() {
                TokenKind::LineComment
            } else {
                TokenKind::BlockComment
            };
            builder
                .opaque
                .insert(comment.span.start, (comment.span.end, kind));
        }
        tracing::trace!(
            nodes = builder.nodes.len(),
            comments = program.comments.len(),
            "built node index"
        );
        Ok(Self {
            source,
            nodes: builder.nodes,
            opaque: builder.opaque,
            tokens: OnceCell::new(),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_raw_parts(source: &'s str, nodes: Vec<SyntaxNode>) -> Self {
        Self {
            source,
            nodes,
            opaque: FxHashMap::default(),
            tokens: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The `Program` node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn symbol(&self, id: NodeId) -> Option<SymbolId> {
        self.node(id).symbol
    }

    /// Source text of a node
    pub fn text(&self, id: NodeId) -> &'s str {
        self.span_text(self.span(id))
    }

    pub fn span_text(&self, span: Span) -> &'s str {
        &self.source[span.start as usize..span.end as usize]
    }

    /// All node ids in source (pre-)order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.kind == kind)
            .map(|(position, _)| NodeId::new(position))
    }

    pub fn field(&self, id: NodeId, name: &str) -> Option<&Field> {
        self.node(id)
            .fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Single-node field, `None` if absent or a list
    pub fn field_node(&self, id: NodeId, name: &str) -> Option<NodeId> {
        match self.field(id, name)? {
            Field::Node(node) => Some(*node),
            Field::List(_) => None,
        }
    }

    /// List field, empty if absent
    pub fn field_nodes(&self, id: NodeId, name: &str) -> &[NodeId] {
        match self.field(id, name) {
            Some(Field::List(items)) => items,
            _ => &[],
        }
    }

    pub fn flag(&self, id: NodeId, name: &str) -> Option<bool> {
        self.node(id)
            .flags
            .iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, value)| *value)
    }

    pub fn first_child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id).iter().copied().find(|child| self.kind(*child) == kind)
    }

    /// The node itself, then its parent, then its grandparent, up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, 's> {
        Ancestors {
            index: self,
            next: Some(id),
            budget: self.nodes.len(),
        }
    }

    /// Nearest strict ancestor of the given kind, at most `max_depth` hops up
    pub fn find_ancestor_of_kind(
        &self,
        id: NodeId,
        kind: NodeKind,
        max_depth: Option<usize>,
    ) -> Option<NodeId> {
        self.find_ancestor(id, max_depth, |node| node.kind == kind)
    }

    pub fn find_ancestor(
        &self,
        id: NodeId,
        max_depth: Option<usize>,
        predicate: impl Fn(&SyntaxNode) -> bool,
    ) -> Option<NodeId> {
        self.ancestors(id)
            .skip(1)
            .take(max_depth.unwrap_or(usize::MAX))
            .find(|ancestor| predicate(self.node(*ancestor)))
    }

    /// Pre-order walk of the subtree rooted at `id`, including `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_, 's> {
        Descendants {
            index: self,
            stack: vec![id],
            budget: self.nodes.len(),
        }
    }

    /// Position of a node among its parent's children
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let position = self.index_in_parent(id)?;
        position
            .checked_sub(1)
            .map(|prev| self.children(parent)[prev])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let position = self.index_in_parent(id)?;
        self.children(parent).get(position + 1).copied()
    }

    /// The statement (direct child of a statement list) containing `id`
    pub fn statement_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|candidate| {
            self.parent(*candidate)
                .is_some_and(|parent| self.kind(parent).is_statement_container())
        })
    }

    /// Smallest node whose span contains `offset`
    pub fn node_at(&self, offset: u32) -> Option<NodeId> {
        let mut current = self.root();
        if !contains(self.span(current), offset) {
            return None;
        }
        'descend: loop {
            for child in self.children(current) {
                if contains(self.span(*child), offset) {
                    current = *child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Tokens of the whole file, computed on first use
    pub fn tokens(&self) -> &[Token] {
        self.tokens
            .get_or_init(|| token::tokenize(self.source, &self.opaque))
    }

    /// Tokens following (or preceding, nearest first) a node
    pub fn tokens_around(
        &self,
        id: NodeId,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = &Token> + '_> {
        self.tokens_around_span(self.span(id), direction)
    }

    pub fn tokens_around_span(
        &self,
        span: Span,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = &Token> + '_> {
        let tokens = self.tokens();
        match direction {
            Direction::After => {
                let first = tokens.partition_point(|token| token.span.start < span.end);
                Box::new(tokens[first..].iter())
            }
            Direction::Before => {
                let end = tokens.partition_point(|token| token.span.end <= span.start);
                Box::new(tokens[..end].iter().rev())
            }
        }
    }

    /// First token on the given side of a node accepted by `filter`,
    /// skipping the ones `skip` rejects
    pub fn find_token(
        &self,
        id: NodeId,
        direction: Direction,
        skip: impl Fn(&Token) -> bool,
    ) -> Option<&Token> {
        self.tokens_around(id, direction).find(|token| !skip(token))
    }

    /// Tokens fully inside `span`
    pub fn tokens_in(&self, span: Span) -> &[Token] {
        let tokens = self.tokens();
        let first = tokens.partition_point(|token| token.span.start < span.start);
        let end = tokens.partition_point(|token| token.span.end <= span.end);
        &tokens[first..end.max(first)]
    }

    /// Comments fully inside `span`
    pub fn comments_in(&self, span: Span) -> impl Iterator<Item = &Token> + '_ {
        self.tokens_in(span).iter().filter(|token| token.is_comment())
    }

    pub fn has_comments(&self, id: NodeId) -> bool {
        self.comments_in(self.span(id)).next().is_some()
    }

    /// Offset of the first byte of the line containing `offset`
    pub fn line_start(&self, offset: u32) -> u32 {
        let offset = (offset as usize).min(self.source.len());
        self.source[..offset].rfind('\n').map_or(0, |newline| newline as u32 + 1)
    }

    /// Offset of the line break ending the line containing `offset`, or the
    /// end of the file
    pub fn line_end(&self, offset: u32) -> u32 {
        let offset = (offset as usize).min(self.source.len());
        self.source[offset..]
            .find('\n')
            .map_or(self.source.len() as u32, |newline| (offset + newline) as u32)
    }
}

fn contains(span: Span, offset: u32) -> bool {
    span.start <= offset && offset < span.end
}

/// Lazy walk from a node to the root
pub struct Ancestors<'i, 's> {
    index: &'i NodeIndex<'s>,
    next: Option<NodeId>,
    budget: usize,
}

impl Iterator for Ancestors<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        if self.budget == 0 {
            self.next = None;
            return None;
        }
        self.budget -= 1;
        self.next = self.index.parent(current);
        Some(current)
    }
}

/// Lazy pre-order walk over a subtree, driven by an explicit stack
pub struct Descendants<'i, 's> {
    index: &'i NodeIndex<'s>,
    stack: Vec<NodeId>,
    budget: usize,
}

impl Iterator for Descendants<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.budget == 0 {
            return None;
        }
        let current = self.stack.pop()?;
        self.budget -= 1;
        self.stack
            .extend(self.index.children(current).iter().rev().copied());
        Some(current)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_semantic::SemanticBuilder;
    use oxc_span::SourceType;

    use super::NodeIndex;

    /// Parse `source` as TSX, run semantic analysis and hand the index to `f`
    pub(crate) fn with_index<R>(source: &str, f: impl FnOnce(&NodeIndex<'_>) -> R) -> R {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::tsx()).parse();
        assert!(ret.errors.is_empty(), "parse errors: {:?}", ret.errors);
        let semantic = SemanticBuilder::new().build(&ret.program);
        let index = NodeIndex::build(&ret.program, source, Some(semantic.semantic.scoping()))
            .expect("index should build");
        f(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::with_index;
    use super::*;

    fn raw_node(kind: NodeKind, start: u32, end: u32, parent: Option<u32>) -> SyntaxNode {
        SyntaxNode {
            kind,
            span: Span::new(start, end),
            parent: parent.map(NodeId),
            children: Vec::new(),
            fields: Vec::new(),
            flags: Vec::new(),
            symbol: None,
        }
    }

    #[test]
    fn test_parent_links() {
        with_index("function foo(a, b) { return a; }", |index| {
            let func = index
                .nodes_of_kind(NodeKind::FunctionDeclaration)
                .next()
                .unwrap();
            assert_eq!(index.parent(func), Some(index.root()));
            let ret = index.nodes_of_kind(NodeKind::ReturnStatement).next().unwrap();
            assert_eq!(
                index.find_ancestor_of_kind(ret, NodeKind::FunctionDeclaration, None),
                Some(func)
            );
        });
    }

    #[test]
    fn test_find_ancestor_respects_max_depth() {
        with_index("function foo() { return 1; }", |index| {
            let literal = index.nodes_of_kind(NodeKind::NumericLiteral).next().unwrap();
            // literal -> return -> body -> function
            assert!(index
                .find_ancestor_of_kind(literal, NodeKind::FunctionDeclaration, Some(2))
                .is_none());
            assert!(index
                .find_ancestor_of_kind(literal, NodeKind::FunctionDeclaration, Some(3))
                .is_some());
        });
    }

    #[test]
    fn test_find_ancestor_missing_is_none() {
        with_index("const a = 1;", |index| {
            let literal = index.nodes_of_kind(NodeKind::NumericLiteral).next().unwrap();
            assert!(index
                .find_ancestor_of_kind(literal, NodeKind::FunctionDeclaration, None)
                .is_none());
        });
    }

    #[test]
    fn test_ancestor_search_terminates_on_cycle() {
        let mut a = raw_node(NodeKind::BlockStatement, 0, 10, Some(1));
        let mut b = raw_node(NodeKind::BlockStatement, 0, 10, Some(0));
        a.children.push(NodeId(1));
        b.children.push(NodeId(0));
        let index = NodeIndex::from_raw_parts("0123456789", vec![a, b]);

        assert!(index
            .find_ancestor_of_kind(NodeId(0), NodeKind::Program, None)
            .is_none());
        assert_eq!(index.ancestors(NodeId(0)).count(), 2);
        assert_eq!(index.descendants(NodeId(0)).count(), 2);
    }

    #[test]
    fn test_ancestor_chain_is_restartable() {
        with_index("if (a) { b(); }", |index| {
            let call = index.nodes_of_kind(NodeKind::CallExpression).next().unwrap();
            let first: Vec<_> = index.ancestors(call).collect();
            let second: Vec<_> = index.ancestors(call).collect();
            assert_eq!(first, second);
            assert_eq!(first.first(), Some(&call));
            assert_eq!(first.last(), Some(&index.root()));
        });
    }

    #[test]
    fn test_named_fields() {
        with_index("foo(1, 'two', three)", |index| {
            let call = index.nodes_of_kind(NodeKind::CallExpression).next().unwrap();
            let callee = index.field_node(call, "callee").unwrap();
            assert_eq!(index.text(callee), "foo");
            let args = index.field_nodes(call, "arguments");
            assert_eq!(args.len(), 3);
            assert_eq!(index.text(args[1]), "'two'");
        });
    }

    #[test]
    fn test_shorthand_property_fields() {
        with_index("const o = { a };", |index| {
            let prop = index.nodes_of_kind(NodeKind::ObjectProperty).next().unwrap();
            let key = index.field_node(prop, "key").unwrap();
            let value = index.field_node(prop, "value").unwrap();
            assert_ne!(key, value);
            assert_eq!(index.kind(value), NodeKind::IdentifierReference);
            assert_eq!(index.flag(prop, "shorthand"), Some(true));
        });
    }

    #[test]
    fn test_expression_arrow_body() {
        with_index("const f = (x) => x + 1;\nconst g = (x) => { return x; };", |index| {
            assert_eq!(index.nodes_of_kind(NodeKind::ExpressionBody).count(), 1);
            assert_eq!(index.nodes_of_kind(NodeKind::FunctionBody).count(), 1);
        });
    }

    #[test]
    fn test_children_inside_parent() {
        with_index("const x = { a: [1, 2], b: () => ({ c: 3 }) };", |index| {
            for id in index.ids() {
                for child in index.children(id) {
                    let (outer, inner) = (index.span(id), index.span(*child));
                    assert!(outer.start <= inner.start && inner.end <= outer.end);
                }
            }
        });
    }

    #[test]
    fn test_tokens_around() {
        let source = "const o = {\n  a: 1, // one\n  b: 2\n};";
        with_index(source, |index| {
            let first = index.nodes_of_kind(NodeKind::ObjectProperty).next().unwrap();
            let after: Vec<_> = index
                .tokens_around(first, Direction::After)
                .take(2)
                .map(|token| token.text(source))
                .collect();
            assert_eq!(after, vec![",", "// one"]);

            let before = index.tokens_around(first, Direction::Before).next().unwrap();
            assert_eq!(before.text(source), "{");

            let next_code = index
                .find_token(first, Direction::After, |token| {
                    token.is_comment() || token.is_punctuator(source, ",")
                })
                .unwrap();
            assert_eq!(next_code.text(source), "b");
            assert!(next_code.newline_before);
        });
    }

    #[test]
    fn test_comments_in_node() {
        let source = "const o = {\n  // note\n  a: 1\n};\nconst p = { b: 2 };";
        with_index(source, |index| {
            let objects: Vec<_> = index.nodes_of_kind(NodeKind::ObjectExpression).collect();
            assert!(index.has_comments(objects[0]));
            assert!(!index.has_comments(objects[1]));
        });
    }

    #[test]
    fn test_comment_tokens_come_from_parser() {
        let source = "const a = <p>// text</p>; // it's\n/* b */ const r = /\\/\\//;";
        with_index(source, |index| {
            let comments: Vec<_> = index
                .tokens()
                .iter()
                .filter(|token| token.is_comment())
                .map(|token| (token.kind, token.text(source)))
                .collect();
            assert_eq!(
                comments,
                vec![
                    (TokenKind::LineComment, "// it's"),
                    (TokenKind::BlockComment, "/* b */"),
                ]
            );
            let last = index.tokens().last().unwrap();
            assert_eq!(last.text(source), ";");
        });
    }

    #[test]
    fn test_statement_of_and_siblings() {
        with_index("a();\nb();\nc();", |index| {
            let calls: Vec<_> = index.nodes_of_kind(NodeKind::CallExpression).collect();
            let stmt = index.statement_of(calls[1]).unwrap();
            assert_eq!(index.kind(stmt), NodeKind::ExpressionStatement);
            let prev = index.prev_sibling(stmt).unwrap();
            assert_eq!(index.text(prev), "a();");
            let next = index.next_sibling(stmt).unwrap();
            assert_eq!(index.text(next), "c();");
        });
    }

    #[test]
    fn test_node_at() {
        with_index("let value = foo(bar);", |index| {
            let node = index.node_at(17).unwrap();
            assert_eq!(index.text(node), "bar");
        });
    }

    #[test]
    fn test_line_helpers() {
        with_index("a();\n  b();", |index| {
            assert_eq!(index.line_start(9), 5);
            assert_eq!(index.line_end(1), 4);
            assert_eq!(index.line_end(7), 11);
        });
    }
}
