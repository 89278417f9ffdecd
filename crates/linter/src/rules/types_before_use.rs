//! types-before-use
//!
//! Top-level type aliases and interfaces should be declared before the
//! first top-level statement that uses them. The fix moves the declaration,
//! together with its doc comments, above that statement.

use crate::diagnostic::{Diagnostic, Fix};
use crate::index::{NodeId, NodeIndex, NodeKind};
use crate::patch::{leading_comment_start, move_statement};
use crate::{LintContext, Rule, RuleCategory, RuleMeta};

const MESSAGE_ID: &str = "usedBeforeDeclared";
const MESSAGE: &str = "Type '{{name}}' is used before it is declared.";

/// types-before-use rule
#[derive(Debug, Clone, Default)]
pub struct TypesBeforeUse;

impl RuleMeta for TypesBeforeUse {
    const NAME: &'static str = "types-before-use";
    const CATEGORY: RuleCategory = RuleCategory::Style;
}

/// Top-level statement containing `node`
fn top_level_statement(index: &NodeIndex<'_>, node: NodeId) -> Option<NodeId> {
    let root = index.root();
    index
        .ancestors(node)
        .find(|ancestor| index.parent(*ancestor) == Some(root))
}

impl TypesBeforeUse {
    pub fn new() -> Self {
        Self
    }

    /// Whether `declaration` reads anything declared between `from` and
    /// itself. Moving it above `from` would then just swap the problem.
    fn depends_on_range(ctx: &LintContext<'_, '_>, declaration: NodeId, from: u32) -> bool {
        let index = ctx.index();
        let until = index.span(declaration).start;
        index
            .descendants(declaration)
            .filter(|id| index.kind(*id) == NodeKind::IdentifierReference)
            .filter_map(|id| index.symbol(id))
            .filter_map(|symbol| ctx.scope().declaration_of(symbol))
            .any(|target| {
                let start = index.span(target).start;
                from <= start && start < until
            })
    }
}

impl Rule for TypesBeforeUse {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn selectors(&self) -> Vec<String> {
        vec![
            "Program > TSTypeAliasDeclaration".to_string(),
            "Program > TSInterfaceDeclaration".to_string(),
        ]
    }

    fn check(&self, node: NodeId, ctx: &mut LintContext<'_, '_>) {
        let index = ctx.index();
        let Some(binding) = ctx.scope().binding(node) else {
            return;
        };
        let declared_at = index.span(node).start;
        let first_use = binding
            .references
            .iter()
            .filter_map(|reference| top_level_statement(index, reference.identifier))
            .filter(|statement| index.span(*statement).start < declared_at)
            .min_by_key(|statement| index.span(*statement).start);
        let Some(first_use) = first_use else {
            return;
        };
        if Self::depends_on_range(ctx, node, index.span(first_use).start) {
            return;
        }

        let Some(id) = index.field_node(node, "id") else {
            return;
        };
        let mut diagnostic = Diagnostic::from_template(
            Self::NAME,
            index.span(id),
            MESSAGE_ID,
            MESSAGE,
            vec![("name", binding.name.to_string())],
        )
        .with_label(index.span(first_use), "first used here");

        let target = leading_comment_start(index, index.span(first_use).start);
        match move_statement(index, node, target) {
            Ok(edits) => {
                diagnostic = diagnostic.with_fix(
                    Fix::from_edits(edits).with_message(format!("Move '{}' above its first use", binding.name)),
                );
            }
            Err(error) => tracing::debug!(%error, "types-before-use fix skipped"),
        }
        ctx.report(diagnostic);
    }
}
