//! Arena construction from an oxc program
//!
//! Nodes are appended in `enter_node` order, which is source order. Named
//! fields are recorded as spans on entry and resolved to node ids on exit,
//! once the node's subtree exists.

use std::collections::VecDeque;

use oxc_ast::ast::FunctionType;
use oxc_ast::AstKind;
use oxc_ast_visit::Visit;
use oxc_semantic::Scoping;
use oxc_span::{GetSpan, Span};
use oxc_syntax::symbol::SymbolId;
use rustc_hash::FxHashMap;

use super::{Field, NodeId, NodeKind, SyntaxNode, TokenKind};
use crate::error::IndexError;

enum PendingField {
    One(Span),
    List(Vec<Span>),
    /// First direct child of the given kind
    ChildOfKind(NodeKind),
}

struct Description {
    kind: NodeKind,
    fields: Vec<(&'static str, PendingField)>,
    flags: Vec<(&'static str, bool)>,
    symbol: Option<SymbolId>,
}

impl Description {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            flags: Vec::new(),
            symbol: None,
        }
    }

    fn one(&mut self, name: &'static str, span: Span) {
        self.fields.push((name, PendingField::One(span)));
    }

    fn opt(&mut self, name: &'static str, span: Option<Span>) {
        if let Some(span) = span {
            self.one(name, span);
        }
    }

    fn list(&mut self, name: &'static str, spans: impl IntoIterator<Item = Span>) {
        self.fields
            .push((name, PendingField::List(spans.into_iter().collect())));
    }

    fn child_of_kind(&mut self, name: &'static str, kind: NodeKind) {
        self.fields.push((name, PendingField::ChildOfKind(kind)));
    }

    fn flag(&mut self, name: &'static str, value: bool) {
        self.flags.push((name, value));
    }
}

pub(super) struct IndexBuilder<'c> {
    source_len: usize,
    scoping: Option<&'c Scoping>,
    pub(super) nodes: Vec<SyntaxNode>,
    pending: Vec<Vec<(&'static str, PendingField)>>,
    stack: Vec<NodeId>,
    pub(super) opaque: FxHashMap<u32, (u32, TokenKind)>,
    pub(super) error: Option<IndexError>,
}

impl<'c> IndexBuilder<'c> {
    pub(super) fn new(source_len: usize, scoping: Option<&'c Scoping>) -> Self {
        Self {
            source_len,
            scoping,
            nodes: Vec::new(),
            pending: Vec::new(),
            stack: Vec::new(),
            opaque: FxHashMap::default(),
            error: None,
        }
    }

    fn record_error(&mut self, error: IndexError) {
        if self.error.is_none() {
            tracing::debug!(%error, "node index is inconsistent");
            self.error = Some(error);
        }
    }

    fn resolve_reference(&self, reference_id: Option<oxc_syntax::reference::ReferenceId>) -> Option<SymbolId> {
        let scoping = self.scoping?;
        scoping.get_reference(reference_id?).symbol_id()
    }

    fn parent_flag(&self, parent: Option<NodeId>, kind: NodeKind, flag: &str) -> bool {
        parent.is_some_and(|parent| {
            let node = &self.nodes[parent.index()];
            node.kind == kind && node.flags.iter().any(|(name, value)| *name == flag && *value)
        })
    }

    fn describe(&self, kind: &AstKind<'_>, parent: Option<NodeId>) -> Description {
        let mut d = Description::new(NodeKind::Unknown);
        match kind {
            AstKind::Program(program) => {
                d.kind = NodeKind::Program;
                d.list("body", program.body.iter().map(GetSpan::span));
            }
            AstKind::IdentifierReference(ident) => {
                d.kind = NodeKind::IdentifierReference;
                d.symbol = self.resolve_reference(ident.reference_id.get());
            }
            AstKind::BindingIdentifier(ident) => {
                d.kind = NodeKind::BindingIdentifier;
                d.symbol = ident.symbol_id.get();
            }
            AstKind::IdentifierName(_) => d.kind = NodeKind::IdentifierName,
            AstKind::StringLiteral(_) => d.kind = NodeKind::StringLiteral,
            AstKind::NumericLiteral(_) => d.kind = NodeKind::NumericLiteral,
            AstKind::BooleanLiteral(_) => d.kind = NodeKind::BooleanLiteral,
            AstKind::NullLiteral(_) => d.kind = NodeKind::NullLiteral,
            AstKind::RegExpLiteral(_) => d.kind = NodeKind::RegExpLiteral,
            AstKind::TemplateLiteral(template) => {
                d.kind = NodeKind::TemplateLiteral;
                d.list("expressions", template.expressions.iter().map(GetSpan::span));
            }
            AstKind::BlockStatement(block) => {
                d.kind = NodeKind::BlockStatement;
                d.list("body", block.body.iter().map(GetSpan::span));
            }
            AstKind::ExpressionStatement(stmt) => {
                d.kind = NodeKind::ExpressionStatement;
                d.one("expression", stmt.expression.span());
            }
            AstKind::IfStatement(stmt) => {
                d.kind = NodeKind::IfStatement;
                d.one("test", stmt.test.span());
                d.one("consequent", stmt.consequent.span());
                d.opt("alternate", stmt.alternate.as_ref().map(GetSpan::span));
            }
            AstKind::ReturnStatement(stmt) => {
                d.kind = NodeKind::ReturnStatement;
                d.opt("argument", stmt.argument.as_ref().map(GetSpan::span));
            }
            AstKind::ForStatement(stmt) => {
                d.kind = NodeKind::ForStatement;
                d.one("body", stmt.body.span());
            }
            AstKind::WhileStatement(stmt) => {
                d.kind = NodeKind::WhileStatement;
                d.one("test", stmt.test.span());
                d.one("body", stmt.body.span());
            }
            AstKind::VariableDeclaration(decl) => {
                d.kind = NodeKind::VariableDeclaration;
                d.list("declarations", decl.declarations.iter().map(|it| it.span));
            }
            AstKind::VariableDeclarator(decl) => {
                d.kind = NodeKind::VariableDeclarator;
                d.one("id", decl.id.span());
                d.opt("init", decl.init.as_ref().map(GetSpan::span));
            }
            AstKind::Function(func) => {
                d.kind = match func.r#type {
                    FunctionType::FunctionDeclaration => NodeKind::FunctionDeclaration,
                    FunctionType::FunctionExpression => NodeKind::FunctionExpression,
                    _ => NodeKind::TSDeclareFunction,
                };
                d.opt("id", func.id.as_ref().map(|id| id.span));
                d.list("params", func.params.items.iter().map(|param| param.span));
                d.opt("body", func.body.as_ref().map(|body| body.span));
                d.opt("returnType", func.return_type.as_ref().map(|ty| ty.span));
                d.flag("async", func.r#async);
                d.flag("generator", func.generator);
            }
            AstKind::FunctionBody(body) => {
                d.kind = if self.parent_flag(parent, NodeKind::ArrowFunctionExpression, "expression") {
                    NodeKind::ExpressionBody
                } else {
                    NodeKind::FunctionBody
                };
                d.list("body", body.statements.iter().map(GetSpan::span));
            }
            AstKind::FormalParameters(params) => {
                d.kind = NodeKind::FormalParameters;
                d.list("items", params.items.iter().map(|param| param.span));
            }
            AstKind::FormalParameter(param) => {
                d.kind = NodeKind::FormalParameter;
                d.one("pattern", param.pattern.span());
            }
            AstKind::Class(class) => {
                d.kind = NodeKind::Class;
                d.opt("id", class.id.as_ref().map(|id| id.span));
            }
            AstKind::ArrowFunctionExpression(arrow) => {
                d.kind = NodeKind::ArrowFunctionExpression;
                d.list("params", arrow.params.items.iter().map(|param| param.span));
                d.one("body", arrow.body.span);
                d.opt("returnType", arrow.return_type.as_ref().map(|ty| ty.span));
                d.flag("async", arrow.r#async);
                d.flag("expression", arrow.expression);
            }
            AstKind::CallExpression(call) => {
                d.kind = NodeKind::CallExpression;
                d.one("callee", call.callee.span());
                d.list("arguments", call.arguments.iter().map(GetSpan::span));
                d.flag("optional", call.optional);
            }
            AstKind::NewExpression(new) => {
                d.kind = NodeKind::NewExpression;
                d.one("callee", new.callee.span());
                d.list("arguments", new.arguments.iter().map(GetSpan::span));
            }
            AstKind::ObjectExpression(object) => {
                d.kind = NodeKind::ObjectExpression;
                d.list("properties", object.properties.iter().map(GetSpan::span));
            }
            AstKind::ObjectProperty(prop) => {
                d.kind = NodeKind::ObjectProperty;
                d.one("key", prop.key.span());
                d.one("value", prop.value.span());
                d.flag("shorthand", prop.shorthand);
                d.flag("computed", prop.computed);
                d.flag("method", prop.method);
            }
            AstKind::ArrayExpression(array) => {
                d.kind = NodeKind::ArrayExpression;
                d.list("elements", array.elements.iter().map(GetSpan::span));
            }
            AstKind::ConditionalExpression(cond) => {
                d.kind = NodeKind::ConditionalExpression;
                d.one("test", cond.test.span());
                d.one("consequent", cond.consequent.span());
                d.one("alternate", cond.alternate.span());
            }
            AstKind::BinaryExpression(binary) => {
                d.kind = NodeKind::BinaryExpression;
                d.one("left", binary.left.span());
                d.one("right", binary.right.span());
            }
            AstKind::LogicalExpression(logical) => {
                d.kind = NodeKind::LogicalExpression;
                d.one("left", logical.left.span());
                d.one("right", logical.right.span());
            }
            AstKind::AssignmentExpression(assign) => {
                d.kind = NodeKind::AssignmentExpression;
                d.one("left", assign.left.span());
                d.one("right", assign.right.span());
            }
            AstKind::ParenthesizedExpression(paren) => {
                d.kind = NodeKind::ParenthesizedExpression;
                d.one("expression", paren.expression.span());
            }
            AstKind::StaticMemberExpression(member) => {
                d.kind = NodeKind::MemberExpression;
                d.one("object", member.object.span());
                d.one("property", member.property.span);
                d.flag("computed", false);
                d.flag("optional", member.optional);
            }
            AstKind::ComputedMemberExpression(member) => {
                d.kind = NodeKind::MemberExpression;
                d.one("object", member.object.span());
                d.one("property", member.expression.span());
                d.flag("computed", true);
                d.flag("optional", member.optional);
            }
            AstKind::PrivateFieldExpression(member) => {
                d.kind = NodeKind::MemberExpression;
                d.one("object", member.object.span());
                d.one("property", member.field.span);
                d.flag("computed", false);
                d.flag("optional", member.optional);
            }
            AstKind::PrivateIdentifier(_) => d.kind = NodeKind::PrivateIdentifier,
            AstKind::SpreadElement(spread) => {
                d.kind = NodeKind::SpreadElement;
                d.one("argument", spread.argument.span());
            }
            AstKind::UnaryExpression(unary) => {
                d.kind = NodeKind::UnaryExpression;
                d.one("argument", unary.argument.span());
            }
            AstKind::ImportDeclaration(import) => {
                d.kind = NodeKind::ImportDeclaration;
                let specifiers = import
                    .specifiers
                    .as_ref()
                    .map(|specifiers| specifiers.iter().map(GetSpan::span).collect::<Vec<_>>())
                    .unwrap_or_default();
                d.list("specifiers", specifiers);
                d.one("source", import.source.span);
            }
            AstKind::ImportSpecifier(spec) => {
                d.kind = NodeKind::ImportSpecifier;
                d.one("imported", spec.imported.span());
                d.one("local", spec.local.span);
            }
            AstKind::ImportDefaultSpecifier(spec) => {
                d.kind = NodeKind::ImportDefaultSpecifier;
                d.one("local", spec.local.span);
            }
            AstKind::ImportNamespaceSpecifier(spec) => {
                d.kind = NodeKind::ImportNamespaceSpecifier;
                d.one("local", spec.local.span);
            }
            AstKind::ExportNamedDeclaration(export) => {
                d.kind = NodeKind::ExportNamedDeclaration;
                d.opt("declaration", export.declaration.as_ref().map(GetSpan::span));
                d.list("specifiers", export.specifiers.iter().map(|spec| spec.span));
                d.opt("source", export.source.as_ref().map(|source| source.span));
            }
            AstKind::ExportDefaultDeclaration(export) => {
                d.kind = NodeKind::ExportDefaultDeclaration;
                d.one("declaration", export.declaration.span());
            }
            AstKind::ExportAllDeclaration(export) => {
                d.kind = NodeKind::ExportAllDeclaration;
                d.opt("exported", export.exported.as_ref().map(GetSpan::span));
                d.one("source", export.source.span);
            }
            AstKind::ExportSpecifier(spec) => {
                d.kind = NodeKind::ExportSpecifier;
                d.one("local", spec.local.span());
                d.one("exported", spec.exported.span());
            }
            AstKind::TSTypeAliasDeclaration(alias) => {
                d.kind = NodeKind::TSTypeAliasDeclaration;
                d.one("id", alias.id.span);
                d.one("typeAnnotation", alias.type_annotation.span());
            }
            AstKind::TSInterfaceDeclaration(interface) => {
                d.kind = NodeKind::TSInterfaceDeclaration;
                d.one("id", interface.id.span);
                d.one("body", interface.body.span);
            }
            AstKind::TSInterfaceBody(body) => {
                d.kind = NodeKind::TSInterfaceBody;
                d.list("body", body.body.iter().map(GetSpan::span));
            }
            AstKind::TSPropertySignature(sig) => {
                d.kind = NodeKind::TSPropertySignature;
                d.one("key", sig.key.span());
                d.opt("typeAnnotation", sig.type_annotation.as_ref().map(|ty| ty.span));
                d.flag("optional", sig.optional);
                d.flag("readonly", sig.readonly);
                d.flag("computed", sig.computed);
            }
            AstKind::TSTypeLiteral(literal) => {
                d.kind = NodeKind::TSTypeLiteral;
                d.list("members", literal.members.iter().map(GetSpan::span));
            }
            AstKind::TSTypeReference(reference) => {
                d.kind = NodeKind::TSTypeReference;
                d.one("typeName", reference.type_name.span());
                d.child_of_kind("typeArguments", NodeKind::TSTypeParameterInstantiation);
            }
            AstKind::TSQualifiedName(name) => {
                d.kind = NodeKind::TSQualifiedName;
                d.one("left", name.left.span());
                d.one("right", name.right.span);
            }
            AstKind::TSTypeAnnotation(annotation) => {
                d.kind = NodeKind::TSTypeAnnotation;
                d.one("typeAnnotation", annotation.type_annotation.span());
            }
            AstKind::TSTypeParameterInstantiation(instantiation) => {
                d.kind = NodeKind::TSTypeParameterInstantiation;
                d.list("params", instantiation.params.iter().map(GetSpan::span));
            }
            AstKind::TSUnionType(union) => {
                d.kind = NodeKind::TSUnionType;
                d.list("types", union.types.iter().map(GetSpan::span));
            }
            AstKind::TSAsExpression(cast) => {
                d.kind = NodeKind::TSAsExpression;
                d.one("expression", cast.expression.span());
                d.one("typeAnnotation", cast.type_annotation.span());
            }
            AstKind::TSSatisfiesExpression(cast) => {
                d.kind = NodeKind::TSSatisfiesExpression;
                d.one("expression", cast.expression.span());
                d.one("typeAnnotation", cast.type_annotation.span());
            }
            AstKind::TSNonNullExpression(non_null) => {
                d.kind = NodeKind::TSNonNullExpression;
                d.one("expression", non_null.expression.span());
            }
            AstKind::TSEnumDeclaration(decl) => {
                d.kind = NodeKind::TSEnumDeclaration;
                d.one("id", decl.id.span);
            }
            AstKind::TSAnyKeyword(_) => d.kind = NodeKind::TSAnyKeyword,
            AstKind::TSUnknownKeyword(_) => d.kind = NodeKind::TSUnknownKeyword,
            AstKind::TSNeverKeyword(_) => d.kind = NodeKind::TSNeverKeyword,
            AstKind::TSVoidKeyword(_) => d.kind = NodeKind::TSVoidKeyword,
            AstKind::TSStringKeyword(_) => d.kind = NodeKind::TSStringKeyword,
            AstKind::TSNumberKeyword(_) => d.kind = NodeKind::TSNumberKeyword,
            AstKind::TSBooleanKeyword(_) => d.kind = NodeKind::TSBooleanKeyword,
            AstKind::TSNullKeyword(_) => d.kind = NodeKind::TSNullKeyword,
            AstKind::TSUndefinedKeyword(_) => d.kind = NodeKind::TSUndefinedKeyword,
            AstKind::JSXElement(element) => {
                d.kind = NodeKind::JSXElement;
                d.one("openingElement", element.opening_element.span);
                d.list("children", element.children.iter().map(GetSpan::span));
            }
            AstKind::JSXFragment(fragment) => {
                d.kind = NodeKind::JSXFragment;
                d.list("children", fragment.children.iter().map(GetSpan::span));
            }
            AstKind::JSXOpeningElement(opening) => {
                d.kind = NodeKind::JSXOpeningElement;
                d.one("name", opening.name.span());
                d.list("attributes", opening.attributes.iter().map(GetSpan::span));
            }
            AstKind::JSXText(_) => d.kind = NodeKind::JSXText,
            AstKind::JSXExpressionContainer(container) => {
                d.kind = NodeKind::JSXExpressionContainer;
                d.one("expression", container.expression.span());
            }
            _ => {}
        }
        d
    }

    /// Outermost descendant of `owner` whose span is exactly `span`
    fn find_by_span(&self, owner: NodeId, span: Span, claimed: &[NodeId]) -> Option<NodeId> {
        let mut queue: VecDeque<NodeId> = self.nodes[owner.index()].children.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            let node = &self.nodes[id.index()];
            if node.span == span && !claimed.contains(&id) {
                return Some(id);
            }
            if node.span.start <= span.start && span.end <= node.span.end {
                queue.extend(node.children.iter().copied());
            }
        }
        None
    }

    fn resolve_fields(&mut self, id: NodeId) {
        let pending = std::mem::take(&mut self.pending[id.index()]);
        let mut claimed = Vec::new();
        let mut fields = Vec::with_capacity(pending.len());
        for (name, field) in pending {
            let field = match field {
                PendingField::One(span) => match self.find_by_span(id, span, &claimed) {
                    Some(node) => {
                        claimed.push(node);
                        Field::Node(node)
                    }
                    None => continue,
                },
                PendingField::List(spans) => {
                    let mut items = Vec::with_capacity(spans.len());
                    for span in spans {
                        if let Some(node) = self.find_by_span(id, span, &claimed) {
                            claimed.push(node);
                            items.push(node);
                        }
                    }
                    Field::List(items)
                }
                PendingField::ChildOfKind(kind) => {
                    let found = self.nodes[id.index()]
                        .children
                        .iter()
                        .copied()
                        .find(|child| self.nodes[child.index()].kind == kind);
                    match found {
                        Some(node) => Field::Node(node),
                        None => continue,
                    }
                }
            };
            fields.push((name, field));
        }
        self.nodes[id.index()].fields = fields;
    }
}

impl<'a> Visit<'a> for IndexBuilder<'_> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        let parent = self.stack.last().copied();
        let description = self.describe(&kind, parent);
        let span = kind.span();
        let id = NodeId::new(self.nodes.len());

        if span.end as usize > self.source_len || span.start > span.end {
            self.record_error(IndexError::SpanOutOfBounds {
                span,
                len: self.source_len,
            });
        }

        if let Some(parent_id) = parent {
            let parent_node = &self.nodes[parent_id.index()];
            if span.start < parent_node.span.start || span.end > parent_node.span.end {
                let error = IndexError::ChildOutsideParent {
                    child_kind: description.kind.type_name(),
                    child: span,
                    parent_kind: parent_node.kind.type_name(),
                    parent: parent_node.span,
                };
                self.record_error(error);
            }
            self.nodes[parent_id.index()].children.push(id);
        }

        if matches!(
            description.kind,
            NodeKind::StringLiteral
                | NodeKind::NumericLiteral
                | NodeKind::RegExpLiteral
                | NodeKind::TemplateLiteral
                | NodeKind::JSXText
        ) {
            let (end, _) = self
                .opaque
                .entry(span.start)
                .or_insert((span.end, TokenKind::Literal));
            *end = (*end).max(span.end);
        }

        self.nodes.push(SyntaxNode {
            kind: description.kind,
            span,
            parent,
            children: Vec::new(),
            fields: Vec::new(),
            flags: description.flags,
            symbol: description.symbol,
        });
        self.pending.push(description.fields);
        self.stack.push(id);
    }

    fn leave_node(&mut self, _kind: AstKind<'a>) {
        if let Some(id) = self.stack.pop() {
            self.resolve_fields(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::{SourceType, Span};

    use crate::error::IndexError;
    use crate::index::NodeIndex;

    #[test]
    fn test_source_shorter_than_program() {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, "const value = 1;", SourceType::ts()).parse();
        let error = NodeIndex::build(&ret.program, "const", None).unwrap_err();
        assert_eq!(
            error,
            IndexError::SpanOutOfBounds {
                span: Span::new(0, 16),
                len: 5,
            }
        );
    }

    #[test]
    fn test_child_outside_parent() {
        let source = "a;\nb;";
        let allocator = Allocator::default();
        let mut ret = Parser::new(&allocator, source, SourceType::ts()).parse();
        ret.program.span = Span::new(0, 2);
        let error = NodeIndex::build(&ret.program, source, None).unwrap_err();
        assert_eq!(
            error,
            IndexError::ChildOutsideParent {
                child_kind: "ExpressionStatement",
                child: Span::new(3, 5),
                parent_kind: "Program",
                parent: Span::new(0, 2),
            }
        );
    }
}
