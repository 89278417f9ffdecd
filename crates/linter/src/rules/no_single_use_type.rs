//! no-single-use-type
//!
//! Report local type aliases and interfaces that are referenced exactly once
//! and could be written inline at their only use.

use common::has_ignored_suffix;
use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::index::NodeId;
use crate::scope::Role;
use crate::{LintContext, Rule, RuleCategory, RuleMeta};

const MESSAGE_ID: &str = "singleUse";
const MESSAGE: &str = "Type '{{name}}' is only used once ({{role}}). Consider inlining it.";

/// Configuration for no-single-use-type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoSingleUseTypeConfig {
    /// Type names ending in one of these suffixes are never reported
    #[serde(default)]
    pub ignore_types_with_suffix: Vec<String>,
}

/// no-single-use-type rule
#[derive(Debug, Clone, Default)]
pub struct NoSingleUseType {
    pub config: NoSingleUseTypeConfig,
}

impl RuleMeta for NoSingleUseType {
    const NAME: &'static str = "no-single-use-type";
    const CATEGORY: RuleCategory = RuleCategory::Nursery;
}

fn describe_role(role: Role) -> &'static str {
    match role {
        Role::FunctionParameter => "as a parameter type",
        Role::ReturnTypePosition => "as a return type",
        Role::ExportedReexport => "in an export",
        Role::GenericTypeArgument => "as a type argument",
        Role::VariableInitializer => "in an initializer",
        Role::Other => "in another declaration",
    }
}

impl NoSingleUseType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NoSingleUseTypeConfig) -> Self {
        Self { config }
    }

    pub fn with_ignored_suffixes(suffixes: Vec<String>) -> Self {
        Self::with_config(NoSingleUseTypeConfig {
            ignore_types_with_suffix: suffixes,
        })
    }
}

impl Rule for NoSingleUseType {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn selectors(&self) -> Vec<String> {
        vec![
            "TSTypeAliasDeclaration".to_string(),
            "TSInterfaceDeclaration".to_string(),
        ]
    }

    fn check(&self, node: NodeId, ctx: &mut LintContext<'_, '_>) {
        let index = ctx.index();
        let Some(binding) = ctx.scope().binding(node) else {
            return;
        };
        if has_ignored_suffix(binding.name, &self.config.ignore_types_with_suffix) {
            return;
        }
        if !ctx.scope().is_referenced_exactly_once(node) {
            return;
        }
        // Recursive types cannot be written inline.
        if ctx.scope().resolve_alias_chain(node).cycle {
            return;
        }
        let [reference] = binding.references.as_slice() else {
            return;
        };
        if index
            .ancestors(reference.identifier)
            .any(|ancestor| ancestor == node)
        {
            return;
        }

        let Some(id) = index.field_node(node, "id") else {
            return;
        };
        let role = describe_role(reference.role);
        ctx.report(
            Diagnostic::from_template(
                Self::NAME,
                index.span(id),
                MESSAGE_ID,
                MESSAGE,
                vec![("name", binding.name.to_string()), ("role", role.to_string())],
            )
            .with_label(index.span(reference.usage_site), "only use"),
        );
    }
}
