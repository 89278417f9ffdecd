//! prefer-single-line
//!
//! Object literals, type literals and interface bodies that span several
//! lines but fit on one are collapsed onto a single line.

use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Fix};
use crate::index::NodeId;
use crate::patch::{collapse_to_single_line, compute_indent};
use crate::{LintContext, Rule, RuleCategory, RuleMeta};

const MESSAGE_ID: &str = "preferSingleLine";
const MESSAGE: &str = "This {{kind}} fits on a single line.";

/// Configuration for prefer-single-line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferSingleLineConfig {
    /// Longest line the collapsed construct may produce, indentation included
    #[serde(default)]
    pub max_line_length: Option<usize>,
}

/// prefer-single-line rule
#[derive(Debug, Clone, Default)]
pub struct PreferSingleLine {
    pub config: PreferSingleLineConfig,
}

impl RuleMeta for PreferSingleLine {
    const NAME: &'static str = "prefer-single-line";
    const CATEGORY: RuleCategory = RuleCategory::Style;
}

impl PreferSingleLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PreferSingleLineConfig) -> Self {
        Self { config }
    }

    /// Length of the node's line once the node is replaced by `collapsed`
    fn collapsed_line_length(ctx: &LintContext<'_, '_>, node: NodeId, collapsed: &str) -> usize {
        let index = ctx.index();
        let span = index.span(node);
        let indent = compute_indent(index, node);
        let line_start = index.line_start(span.start) as usize + indent.len();
        let before = &ctx.source_text()[line_start..span.start as usize];
        let line_end = index.line_end(span.end) as usize;
        let after = &ctx.source_text()[span.end as usize..line_end];
        indent.chars().count()
            + before.chars().count()
            + collapsed.chars().count()
            + after.chars().count()
    }
}

impl Rule for PreferSingleLine {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn selectors(&self) -> Vec<String> {
        ["ObjectExpression", "TSTypeLiteral", "TSInterfaceBody"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn check(&self, node: NodeId, ctx: &mut LintContext<'_, '_>) {
        let index = ctx.index();
        if !ctx.text(node).contains('\n') {
            return;
        }
        let Some(collapsed) = collapse_to_single_line(index, node) else {
            return;
        };
        if let Some(max) = self.config.max_line_length {
            if Self::collapsed_line_length(ctx, node, &collapsed) > max {
                return;
            }
        }

        let kind = match index.kind(node).type_name() {
            "ObjectExpression" => "object",
            "TSTypeLiteral" => "type literal",
            _ => "interface",
        };
        let span = index.span(node);
        ctx.report(
            Diagnostic::from_template(
                Self::NAME,
                span,
                MESSAGE_ID,
                MESSAGE,
                vec![("kind", kind.to_string())],
            )
            .with_fix(Fix::new(span, collapsed).with_message("Collapse onto one line")),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PreferSingleLineConfig::default();
        assert_eq!(config.max_line_length, None);
    }

    #[test]
    fn test_config_deserialize() {
        let json = r#"{"maxLineLength": 80}"#;
        let config: PreferSingleLineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_line_length, Some(80));
    }
}
