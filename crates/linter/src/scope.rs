//! Scope Resolver
//!
//! Answers "where is this declaration read, and in what role" on top of the
//! symbols recorded in the [`NodeIndex`]. Symbol resolution itself comes from
//! `oxc_semantic`; this module only groups and classifies reads.

use std::cell::OnceCell;

use common::is_container_type_alias;
use oxc_syntax::symbol::SymbolId;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::index::{NodeId, NodeIndex, NodeKind};

/// Syntactic context of a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Inside a parameter, or the props type of a `FC<Props>` component
    FunctionParameter,
    /// Inside a function's return type annotation
    ReturnTypePosition,
    /// Named by `export { x }` or `export default x`
    ExportedReexport,
    /// Type argument of a generic type
    GenericTypeArgument,
    /// Inside a variable's initializer
    VariableInitializer,
    Other,
}

/// One read of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// The identifier that reads the binding
    pub identifier: NodeId,
    /// The node that effectively uses the binding. Usually the identifier
    /// itself; for `const C: FC<Props>` it is the `C` declarator.
    pub usage_site: NodeId,
    pub role: Role,
}

/// A named declaration and its reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<'s> {
    pub name: &'s str,
    pub declaration: NodeId,
    pub symbol: SymbolId,
    pub references: Vec<Reference>,
}

/// Result of following `type A = B` aliases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasChain {
    /// Declarations visited, starting with the queried one
    pub declarations: Vec<NodeId>,
    /// Whether the chain came back to a declaration already visited
    pub cycle: bool,
}

impl AliasChain {
    /// The last declaration reached
    pub fn target(&self) -> Option<NodeId> {
        self.declarations.last().copied()
    }
}

pub struct ScopeResolver<'i, 's> {
    index: &'i NodeIndex<'s>,
    reads: OnceCell<FxHashMap<SymbolId, Vec<NodeId>>>,
    declarations: OnceCell<FxHashMap<SymbolId, NodeId>>,
}

impl<'i, 's> ScopeResolver<'i, 's> {
    pub fn new(index: &'i NodeIndex<'s>) -> Self {
        Self {
            index,
            reads: OnceCell::new(),
            declarations: OnceCell::new(),
        }
    }

    fn reads(&self) -> &FxHashMap<SymbolId, Vec<NodeId>> {
        self.reads.get_or_init(|| {
            let mut reads: FxHashMap<SymbolId, Vec<NodeId>> = FxHashMap::default();
            for id in self.index.nodes_of_kind(NodeKind::IdentifierReference) {
                if let Some(symbol) = self.index.symbol(id) {
                    reads.entry(symbol).or_default().push(id);
                }
            }
            reads
        })
    }

    fn declarations(&self) -> &FxHashMap<SymbolId, NodeId> {
        self.declarations.get_or_init(|| {
            let mut declarations = FxHashMap::default();
            for id in self.index.nodes_of_kind(NodeKind::BindingIdentifier) {
                let Some(symbol) = self.index.symbol(id) else {
                    continue;
                };
                let declaration = self
                    .index
                    .find_ancestor(id, Some(3), |node| node.kind.is_declaration())
                    .unwrap_or(id);
                declarations.entry(symbol).or_insert(declaration);
            }
            declarations
        })
    }

    /// The binding identifier a declaration introduces
    pub fn binding_identifier(&self, declaration: NodeId) -> Option<NodeId> {
        let index = self.index;
        let name = match index.kind(declaration) {
            NodeKind::BindingIdentifier => return Some(declaration),
            NodeKind::FormalParameter => index.field_node(declaration, "pattern")?,
            NodeKind::ImportSpecifier
            | NodeKind::ImportDefaultSpecifier
            | NodeKind::ImportNamespaceSpecifier => index.field_node(declaration, "local")?,
            NodeKind::ExportNamedDeclaration | NodeKind::ExportDefaultDeclaration => {
                return self.binding_identifier(index.field_node(declaration, "declaration")?)
            }
            NodeKind::VariableDeclaration => {
                let [only] = index.field_nodes(declaration, "declarations") else {
                    return None;
                };
                return self.binding_identifier(*only);
            }
            _ => index.field_node(declaration, "id")?,
        };
        (index.kind(name) == NodeKind::BindingIdentifier).then_some(name)
    }

    /// Declaration node for a symbol
    pub fn declaration_of(&self, symbol: SymbolId) -> Option<NodeId> {
        self.declarations().get(&symbol).copied()
    }

    pub fn binding(&self, declaration: NodeId) -> Option<Binding<'s>> {
        let identifier = self.binding_identifier(declaration)?;
        let symbol = self.index.symbol(identifier)?;
        Some(Binding {
            name: self.index.text(identifier),
            declaration,
            symbol,
            references: self.references_of(symbol),
        })
    }

    /// Every read of the binding a declaration introduces, in source order.
    /// Empty when the declaration has no resolvable binding.
    pub fn get_references(&self, declaration: NodeId) -> Vec<Reference> {
        self.binding(declaration)
            .map(|binding| binding.references)
            .unwrap_or_default()
    }

    fn references_of(&self, symbol: SymbolId) -> Vec<Reference> {
        self.reads()
            .get(&symbol)
            .map(|reads| reads.iter().map(|id| self.classify(*id)).collect())
            .unwrap_or_default()
    }

    /// Classify a read by walking up from the identifier until a statement
    /// or function boundary
    pub fn classify(&self, identifier: NodeId) -> Reference {
        let reference = |usage_site, role| Reference {
            identifier,
            usage_site,
            role,
        };
        if let Some(declarator) = self.container_alias_declarator(identifier) {
            return reference(declarator, Role::FunctionParameter);
        }

        let index = self.index;
        let mut child = identifier;
        for ancestor in index.ancestors(identifier).skip(1) {
            let role = match index.kind(ancestor) {
                NodeKind::ExportSpecifier => Some(Role::ExportedReexport),
                NodeKind::ExportDefaultDeclaration
                    if index.field_node(ancestor, "declaration") == Some(child) =>
                {
                    Some(Role::ExportedReexport)
                }
                NodeKind::TSTypeParameterInstantiation => Some(Role::GenericTypeArgument),
                NodeKind::FormalParameter => Some(Role::FunctionParameter),
                NodeKind::TSTypeAnnotation
                    if index.parent(ancestor).is_some_and(|parent| {
                        index.kind(parent).is_function()
                            && index.field_node(parent, "returnType") == Some(ancestor)
                    }) =>
                {
                    Some(Role::ReturnTypePosition)
                }
                NodeKind::VariableDeclarator
                    if index.field_node(ancestor, "init") == Some(child) =>
                {
                    Some(Role::VariableInitializer)
                }
                kind if kind.is_function() || kind.is_statement_container() => Some(Role::Other),
                _ if index
                    .parent(ancestor)
                    .is_some_and(|parent| index.kind(parent).is_statement_container()) =>
                {
                    Some(Role::Other)
                }
                _ => None,
            };
            if let Some(role) = role {
                return reference(identifier, role);
            }
            child = ancestor;
        }
        reference(identifier, Role::Other)
    }

    /// For `Props` in `const C: FC<Props> = ...`, the `C` declarator
    fn container_alias_declarator(&self, identifier: NodeId) -> Option<NodeId> {
        let index = self.index;
        let inner = index.parent(identifier)?;
        if index.kind(inner) != NodeKind::TSTypeReference {
            return None;
        }
        let arguments = index.parent(inner)?;
        if index.kind(arguments) != NodeKind::TSTypeParameterInstantiation {
            return None;
        }
        let outer = index.parent(arguments)?;
        if index.kind(outer) != NodeKind::TSTypeReference {
            return None;
        }
        let outer_name = index.field_node(outer, "typeName")?;
        if !is_container_type_alias(index.text(outer_name)) {
            return None;
        }
        let annotation = index.parent(outer)?;
        if index.kind(annotation) != NodeKind::TSTypeAnnotation {
            return None;
        }
        index.find_ancestor_of_kind(annotation, NodeKind::VariableDeclarator, Some(2))
    }

    /// Exactly one read, and neither the declaration nor anything around
    /// the read is exported
    pub fn is_referenced_exactly_once(&self, declaration: NodeId) -> bool {
        let references = self.get_references(declaration);
        let [reference] = references.as_slice() else {
            return false;
        };
        if reference.role == Role::ExportedReexport || self.is_exported(declaration) {
            return false;
        }
        let exported_scope = |node: NodeId| {
            self.index.ancestors(node).any(|ancestor| {
                let kind = self.index.kind(ancestor);
                (kind.is_function() || kind == NodeKind::VariableDeclarator)
                    && self.is_exported(ancestor)
            })
        };
        !exported_scope(reference.identifier) && !exported_scope(reference.usage_site)
    }

    /// Whether the statement holding `declaration` is an export clause
    pub fn is_exported(&self, declaration: NodeId) -> bool {
        self.index
            .statement_of(declaration)
            .is_some_and(|statement| {
                matches!(
                    self.index.kind(statement),
                    NodeKind::ExportNamedDeclaration | NodeKind::ExportDefaultDeclaration
                )
            })
    }

    /// Follow `type A = B` from `declaration` until the aliased type is not a
    /// plain reference to another local alias, or a declaration repeats
    pub fn resolve_alias_chain(&self, declaration: NodeId) -> AliasChain {
        let index = self.index;
        let mut declarations = vec![declaration];
        let mut visited = FxHashSet::default();
        visited.insert(declaration);
        let mut current = declaration;

        loop {
            let next = (index.kind(current) == NodeKind::TSTypeAliasDeclaration)
                .then(|| index.field_node(current, "typeAnnotation"))
                .flatten()
                .filter(|ty| index.kind(*ty) == NodeKind::TSTypeReference)
                .filter(|ty| index.first_child_of_kind(*ty, NodeKind::TSTypeParameterInstantiation).is_none())
                .and_then(|ty| index.field_node(ty, "typeName"))
                .and_then(|name| index.symbol(name))
                .and_then(|symbol| self.declaration_of(symbol));
            let Some(next) = next else {
                return AliasChain {
                    declarations,
                    cycle: false,
                };
            };
            if !visited.insert(next) {
                tracing::trace!(?next, "type alias cycle");
                return AliasChain {
                    declarations,
                    cycle: true,
                };
            }
            declarations.push(next);
            current = next;
        }
    }
}
