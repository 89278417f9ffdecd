//! Lint context for rule execution

use oxc_span::SourceType;

use crate::index::{NodeId, NodeIndex};
use crate::scope::ScopeResolver;
use crate::Diagnostic;

/// Context passed to rules during linting
pub struct LintContext<'i, 's> {
    /// Node index of the file being linted
    index: &'i NodeIndex<'s>,
    /// Reference lookups, built lazily
    scope: ScopeResolver<'i, 's>,
    /// Source type (JS/TS/JSX etc)
    source_type: SourceType,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

impl<'i, 's> LintContext<'i, 's> {
    pub fn new(index: &'i NodeIndex<'s>, source_type: SourceType) -> Self {
        Self {
            index,
            scope: ScopeResolver::new(index),
            source_type,
            diagnostics: Vec::new(),
        }
    }

    pub fn index(&self) -> &'i NodeIndex<'s> {
        self.index
    }

    pub fn scope(&self) -> &ScopeResolver<'i, 's> {
        &self.scope
    }

    /// Get the source text
    pub fn source_text(&self) -> &'s str {
        self.index.source()
    }

    /// Get the source type
    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    /// Check if the source is TypeScript
    pub fn is_typescript(&self) -> bool {
        self.source_type.is_typescript()
    }

    /// Source text of a node
    pub fn text(&self, node: NodeId) -> &'s str {
        self.index.text(node)
    }

    /// Report a diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Consume the context and return all diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Get reference to diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
