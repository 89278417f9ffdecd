//! max-params
//!
//! Limit the number of parameters a function declares.

use oxc_span::Span;
use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::index::NodeId;
use crate::{LintContext, Rule, RuleCategory, RuleMeta};

const MESSAGE_ID: &str = "exceed";
const MESSAGE: &str =
    "{{name}} has too many parameters ({{count}}). Maximum allowed is {{max}}.";

const FUNCTION_TYPES: &[&str] = &[
    "FunctionDeclaration",
    "FunctionExpression",
    "ArrowFunctionExpression",
    "TSDeclareFunction",
];

fn default_max() -> usize {
    3
}

/// Configuration for max-params
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxParamsConfig {
    /// Largest allowed parameter count
    #[serde(default = "default_max")]
    pub max: usize,
}

impl Default for MaxParamsConfig {
    fn default() -> Self {
        Self { max: default_max() }
    }
}

/// max-params rule
#[derive(Debug, Clone, Default)]
pub struct MaxParams {
    pub config: MaxParamsConfig,
}

impl RuleMeta for MaxParams {
    const NAME: &'static str = "max-params";
    const CATEGORY: RuleCategory = RuleCategory::Pedantic;
}

impl MaxParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MaxParamsConfig) -> Self {
        Self { config }
    }

    pub fn with_max(max: usize) -> Self {
        Self::with_config(MaxParamsConfig { max })
    }
}

impl Rule for MaxParams {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn selectors(&self) -> Vec<String> {
        FUNCTION_TYPES
            .iter()
            .map(|kind| format!("{kind}[params.length>{}]", self.config.max))
            .collect()
    }

    fn check(&self, node: NodeId, ctx: &mut LintContext<'_, '_>) {
        let index = ctx.index();
        let params = index.field_nodes(node, "params");
        let (Some(first), Some(last)) = (params.first(), params.last()) else {
            return;
        };

        let name = index
            .field_node(node, "id")
            .map(|id| format!("Function '{}'", index.text(id)))
            .unwrap_or_else(|| match index.kind(node).type_name() {
                "ArrowFunctionExpression" => "Arrow function".to_string(),
                _ => "Function".to_string(),
            });
        let span = index
            .field_node(node, "id")
            .map_or(index.span(node), |id| index.span(id));

        ctx.report(
            Diagnostic::from_template(
                Self::NAME,
                span,
                MESSAGE_ID,
                MESSAGE,
                vec![
                    ("name", name),
                    ("count", params.len().to_string()),
                    ("max", self.config.max.to_string()),
                ],
            )
            .with_label(
                Span::new(index.span(*first).start, index.span(*last).end),
                "parameters declared here",
            )
            .with_help("Group related parameters into an options object."),
        );
    }
}
