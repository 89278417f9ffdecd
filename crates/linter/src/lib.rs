//! Lint core for TypeScript/JSX rules
//!
//! The four primitives rules are built from:
//! 1. [`index`]: an arena over the parsed tree with parent links and tokens
//! 2. [`selector`]: CSS-like queries over that arena
//! 3. [`scope`]: reads of a declaration, classified by syntactic role
//! 4. [`patch`]: byte-range text edits and the rewrites built on them
//!
//! [`LintRunner`] walks the arena once and hands every node to the rules
//! whose selectors match it.

pub mod error;
pub mod index;
pub mod patch;
pub mod rules;
pub mod scope;
pub mod selector;
pub mod visitor;
mod context;
mod diagnostic;

pub use context::LintContext;
pub use diagnostic::{render_message, Diagnostic, DiagnosticSeverity, Fix};
pub use error::{ConfigError, IndexError, LintError, PatchError, SelectorError};
pub use rules::*;
pub use visitor::{LintResult, LintRunner, RulesConfig};

use index::NodeId;

/// Rule category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    /// Rules that detect code that is likely to be incorrect
    Correctness,
    /// Rules that suggest improvements
    Pedantic,
    /// Rules that encourage best practices
    Style,
    /// Rules that may have false positives (experimental)
    Nursery,
}

/// Rule metadata
pub trait RuleMeta {
    const NAME: &'static str;
    const CATEGORY: RuleCategory;
}

/// A rule the runner dispatches nodes to
pub trait Rule {
    fn name(&self) -> &'static str;

    /// Selector patterns of the nodes this rule wants to see
    fn selectors(&self) -> Vec<String>;

    /// Inspect one node matched by any of [`Rule::selectors`]
    fn check(&self, node: NodeId, ctx: &mut LintContext<'_, '_>);
}
