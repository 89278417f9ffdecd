//! no-reexport
//!
//! Disallow re-exporting from other modules, either with `export ... from`
//! or by exporting an imported binding.

use crate::diagnostic::Diagnostic;
use crate::index::{NodeId, NodeKind};
use crate::{LintContext, Rule, RuleCategory, RuleMeta};

const FROM_MESSAGE_ID: &str = "reexportFrom";
const FROM_MESSAGE: &str = "Do not re-export from {{source}}; import from it directly.";
const BINDING_MESSAGE_ID: &str = "reexportBinding";
const BINDING_MESSAGE: &str = "'{{name}}' is imported from another module and re-exported.";

/// no-reexport rule
#[derive(Debug, Clone, Default)]
pub struct NoReexport;

impl RuleMeta for NoReexport {
    const NAME: &'static str = "no-reexport";
    const CATEGORY: RuleCategory = RuleCategory::Style;
}

impl NoReexport {
    pub fn new() -> Self {
        Self
    }

    fn report_imported(&self, identifier: NodeId, ctx: &mut LintContext<'_, '_>) {
        let index = ctx.index();
        let Some(symbol) = index.symbol(identifier) else {
            return;
        };
        let Some(declaration) = ctx.scope().declaration_of(symbol) else {
            return;
        };
        if !index.kind(declaration).is_import_specifier() {
            return;
        }
        ctx.report(
            Diagnostic::from_template(
                Self::NAME,
                index.span(identifier),
                BINDING_MESSAGE_ID,
                BINDING_MESSAGE,
                vec![("name", index.text(identifier).to_string())],
            )
            .with_label(index.span(declaration), "imported here"),
        );
    }
}

impl Rule for NoReexport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn selectors(&self) -> Vec<String> {
        vec![
            "ExportAllDeclaration".to_string(),
            "ExportNamedDeclaration[source]".to_string(),
            "ExportNamedDeclaration[specifiers.length>0] > ExportSpecifier".to_string(),
            "ExportDefaultDeclaration > Identifier".to_string(),
        ]
    }

    fn check(&self, node: NodeId, ctx: &mut LintContext<'_, '_>) {
        let index = ctx.index();
        match index.kind(node) {
            NodeKind::ExportAllDeclaration | NodeKind::ExportNamedDeclaration => {
                let Some(source) = index.field_node(node, "source") else {
                    return;
                };
                ctx.report(Diagnostic::from_template(
                    Self::NAME,
                    index.span(node),
                    FROM_MESSAGE_ID,
                    FROM_MESSAGE,
                    vec![("source", index.text(source).to_string())],
                ));
            }
            NodeKind::ExportSpecifier => {
                let declaration = index.parent(node);
                if declaration.is_some_and(|parent| index.field_node(parent, "source").is_some()) {
                    return;
                }
                if let Some(local) = index.field_node(node, "local") {
                    self.report_imported(local, ctx);
                }
            }
            NodeKind::IdentifierReference => self.report_imported(node, ctx),
            _ => {}
        }
    }
}
