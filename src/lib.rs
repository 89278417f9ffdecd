//! TypeScript/JSX lint toolkit
//!
//! Parses a file with oxc, indexes it, runs the selector-driven rules of
//! [`tslint_linter`] and optionally applies their fixes.
//!
//! ## Usage
//!
//! ```rust
//! use tslint_kit::{fix, LintOptions};
//!
//! let source = "const foo = {\n  a: 1,\n};\n";
//! let result = fix(source, Some(LintOptions::default())).unwrap();
//! assert_eq!(result.output, "const foo = { a: 1 };\n");
//! ```

pub use common::LintOptions;
pub use tslint_linter::{
    Diagnostic, DiagnosticSeverity, Fix, LintError, LintResult, LintRunner, RulesConfig,
};

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use tracing::debug;

use tslint_linter::index::NodeIndex;
use tslint_linter::patch::{apply_edits, TextEdit};

/// Result of a fix run
#[derive(Debug)]
pub struct FixOutput {
    /// The source after all applied fixes
    pub output: String,
    /// Number of passes that changed the source
    pub passes: usize,
    /// Diagnostics still reported on `output`
    pub diagnostics: Vec<Diagnostic>,
}

impl FixOutput {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A lint session: options, enabled rules and their compiled selectors
pub struct Linter {
    options: LintOptions,
    runner: LintRunner,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(LintOptions::default(), RulesConfig::default())
    }
}

impl Linter {
    pub fn new(options: LintOptions, config: RulesConfig) -> Self {
        Self {
            options,
            runner: LintRunner::new(config),
        }
    }

    pub fn options(&self) -> &LintOptions {
        &self.options
    }

    /// Lint one file
    pub fn lint_source(&mut self, source: &str) -> Result<LintResult, LintError> {
        let allocator = Allocator::default();
        let source_type = self.options.source_type();

        let ret = Parser::new(&allocator, source, source_type).parse();
        if ret.panicked || !ret.errors.is_empty() {
            let messages = ret.errors.iter().map(|error| error.to_string()).collect();
            return Err(LintError::Parse(messages));
        }

        let semantic = SemanticBuilder::new().build(&ret.program);
        let index = NodeIndex::build(&ret.program, source, Some(semantic.semantic.scoping()))?;
        self.runner.run(&index, source_type)
    }

    /// Lint and fix one file until no fix applies or the pass limit is hit
    pub fn fix_source(&mut self, source: &str) -> Result<FixOutput, LintError> {
        let mut output = source.to_string();
        let mut passes = 0;

        loop {
            let result = self.lint_source(&output)?;
            let edits = if passes < self.options.max_fix_passes {
                select_fixes(&result.diagnostics)
            } else {
                Vec::new()
            };
            if edits.is_empty() {
                debug!(
                    passes,
                    remaining = result.diagnostics.len(),
                    "fix loop finished"
                );
                return Ok(FixOutput {
                    output,
                    passes,
                    diagnostics: result.diagnostics,
                });
            }

            output = apply_edits(&output, &edits)?;
            passes += 1;
            debug!(pass = passes, edits = edits.len(), "applied fixes");
        }
    }
}

/// Edits of the first fix of every diagnostic, skipping fixes that overlap
/// one accepted earlier. Skipped fixes are retried on the next pass.
fn select_fixes(diagnostics: &[Diagnostic]) -> Vec<TextEdit> {
    let mut candidates: Vec<&Fix> = diagnostics
        .iter()
        .filter_map(|diagnostic| diagnostic.fixes.first())
        .collect();
    candidates.sort_by_key(|fix| fix.span().start);

    let mut accepted: Vec<&Fix> = Vec::new();
    for fix in candidates {
        if accepted.iter().any(|other| other.overlaps(fix)) {
            debug!(start = fix.span().start, "fix deferred to next pass");
            continue;
        }
        accepted.push(fix);
    }

    accepted
        .into_iter()
        .flat_map(|fix| fix.edits.iter().cloned())
        .collect()
}

/// Lint source code with default rules
pub fn lint(source: &str, options: Option<LintOptions>) -> Result<LintResult, LintError> {
    Linter::new(options.unwrap_or_default(), RulesConfig::default()).lint_source(source)
}

/// Fix source code with default rules
pub fn fix(source: &str, options: Option<LintOptions>) -> Result<FixOutput, LintError> {
    Linter::new(options.unwrap_or_default(), RulesConfig::default()).fix_source(source)
}
