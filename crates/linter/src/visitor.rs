//! Selector-dispatching runner for all lint rules
//!
//! This module provides a `LintRunner` that walks the node index once and
//! hands every node to the enabled rules whose selectors match it,
//! collecting diagnostics along the way.

use std::sync::Arc;

use indexmap::IndexMap;
use oxc_span::SourceType;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::context::LintContext;
use crate::diagnostic::{Diagnostic, DiagnosticSeverity};
use crate::error::{ConfigError, LintError};
use crate::index::NodeIndex;
use crate::rules::{MaxParams, NoReexport, NoSingleUseType, PreferSingleLine, TypesBeforeUse};
use crate::selector::{Selector, SelectorCache};
use crate::{Rule, RuleMeta};

/// Configuration for which rules are enabled
#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub prefer_single_line: Option<PreferSingleLine>,
    pub max_params: Option<MaxParams>,
    pub no_single_use_type: Option<NoSingleUseType>,
    pub no_reexport: Option<NoReexport>,
    pub types_before_use: Option<TypesBeforeUse>,
    /// Severity overrides keyed by rule name
    pub severities: FxHashMap<&'static str, DiagnosticSeverity>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            prefer_single_line: Some(PreferSingleLine::new()),
            max_params: Some(MaxParams::new()),
            no_single_use_type: Some(NoSingleUseType::new()),
            no_reexport: Some(NoReexport::new()),
            types_before_use: Some(TypesBeforeUse::new()),
            severities: FxHashMap::default(),
        }
    }
}

/// Level of a rule entry in a JSON config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Off,
    On,
    Severity(DiagnosticSeverity),
}

/// Rules without options still reject unknown ones
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

fn parse_level(value: &Value) -> Option<Level> {
    match value {
        Value::Null | Value::Bool(false) => Some(Level::Off),
        Value::Bool(true) => Some(Level::On),
        Value::String(level) => match level.as_str() {
            "off" => Some(Level::Off),
            "on" => Some(Level::On),
            "warn" => Some(Level::Severity(DiagnosticSeverity::Warning)),
            "error" => Some(Level::Severity(DiagnosticSeverity::Error)),
            _ => None,
        },
        Value::Number(level) => match level.as_u64() {
            Some(0) => Some(Level::Off),
            Some(1) => Some(Level::Severity(DiagnosticSeverity::Warning)),
            Some(2) => Some(Level::Severity(DiagnosticSeverity::Error)),
            _ => None,
        },
        _ => None,
    }
}

/// Split a rule entry into its level and its options object.
///
/// Accepted shapes: a level (`false`, `"warn"`, `2`, ...), an options
/// object, or `[level]` / `[level, options]`.
fn parse_setting(rule: &str, value: Value) -> Result<(Level, Value), ConfigError> {
    let invalid = |value: &Value| ConfigError::InvalidSetting {
        rule: rule.to_string(),
        setting: value.to_string(),
    };
    match value {
        Value::Object(_) => Ok((Level::On, value)),
        Value::Array(ref items) => match items.as_slice() {
            [level] => {
                let level = parse_level(level).ok_or_else(|| invalid(&value))?;
                Ok((level, Value::Object(Default::default())))
            }
            [level, options @ Value::Object(_)] => {
                let level = parse_level(level).ok_or_else(|| invalid(&value))?;
                Ok((level, options.clone()))
            }
            _ => Err(invalid(&value)),
        },
        _ => {
            let level = parse_level(&value).ok_or_else(|| invalid(&value))?;
            Ok((level, Value::Object(Default::default())))
        }
    }
}

fn parse_options<T: DeserializeOwned>(rule: &str, options: Value) -> Result<T, ConfigError> {
    serde_json::from_value(options).map_err(|source| ConfigError::InvalidOptions {
        rule: rule.to_string(),
        source,
    })
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn none() -> Self {
        Self {
            prefer_single_line: None,
            max_params: None,
            no_single_use_type: None,
            no_reexport: None,
            types_before_use: None,
            severities: FxHashMap::default(),
        }
    }

    /// Read an ESLint-like object keyed by rule name, e.g.
    /// `{"max-params": ["error", {"max": 2}], "no-reexport": false}`.
    ///
    /// Rules not mentioned keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: serde_json::Map<String, Value> = serde_json::from_str(json)?;
        let mut config = Self::default();

        for (name, value) in entries {
            let (level, options) = parse_setting(&name, value)?;
            let enabled = level != Level::Off;
            let rule: &'static str = match name.as_str() {
                PreferSingleLine::NAME => {
                    config.prefer_single_line = if enabled {
                        Some(PreferSingleLine::with_config(parse_options(&name, options)?))
                    } else {
                        None
                    };
                    PreferSingleLine::NAME
                }
                MaxParams::NAME => {
                    config.max_params = if enabled {
                        Some(MaxParams::with_config(parse_options(&name, options)?))
                    } else {
                        None
                    };
                    MaxParams::NAME
                }
                NoSingleUseType::NAME => {
                    config.no_single_use_type = if enabled {
                        Some(NoSingleUseType::with_config(parse_options(&name, options)?))
                    } else {
                        None
                    };
                    NoSingleUseType::NAME
                }
                NoReexport::NAME => {
                    parse_options::<NoOptions>(&name, options)?;
                    config.no_reexport = enabled.then(NoReexport::new);
                    NoReexport::NAME
                }
                TypesBeforeUse::NAME => {
                    parse_options::<NoOptions>(&name, options)?;
                    config.types_before_use = enabled.then(TypesBeforeUse::new);
                    TypesBeforeUse::NAME
                }
                _ => return Err(ConfigError::UnknownRule(name)),
            };

            match level {
                Level::Severity(severity) => {
                    config.severities.insert(rule, severity);
                }
                Level::On | Level::Off => {
                    config.severities.remove(rule);
                }
            }
        }

        Ok(config)
    }

    pub fn with_prefer_single_line(mut self, rule: PreferSingleLine) -> Self {
        self.prefer_single_line = Some(rule);
        self
    }

    pub fn with_max_params(mut self, rule: MaxParams) -> Self {
        self.max_params = Some(rule);
        self
    }

    pub fn with_no_single_use_type(mut self, rule: NoSingleUseType) -> Self {
        self.no_single_use_type = Some(rule);
        self
    }

    pub fn with_no_reexport(mut self, enabled: bool) -> Self {
        self.no_reexport = enabled.then(NoReexport::new);
        self
    }

    pub fn with_types_before_use(mut self, enabled: bool) -> Self {
        self.types_before_use = enabled.then(TypesBeforeUse::new);
        self
    }

    pub fn with_severity(mut self, rule: &'static str, severity: DiagnosticSeverity) -> Self {
        self.severities.insert(rule, severity);
        self
    }

    /// Enabled rules, in a fixed order
    pub fn enabled_rules(&self) -> Vec<&dyn Rule> {
        let mut rules: Vec<&dyn Rule> = Vec::new();
        if let Some(rule) = &self.prefer_single_line {
            rules.push(rule);
        }
        if let Some(rule) = &self.max_params {
            rules.push(rule);
        }
        if let Some(rule) = &self.no_single_use_type {
            rules.push(rule);
        }
        if let Some(rule) = &self.no_reexport {
            rules.push(rule);
        }
        if let Some(rule) = &self.types_before_use {
            rules.push(rule);
        }
        rules
    }
}

/// Runs all enabled rules during a single walk of the node index.
///
/// The runner owns the selector cache, so compiled selectors are reused
/// across every file linted in one session and dropped with it.
pub struct LintRunner {
    config: RulesConfig,
    cache: SelectorCache,
}

impl LintRunner {
    pub fn new(config: RulesConfig) -> Self {
        Self {
            config,
            cache: SelectorCache::new(),
        }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn cache(&self) -> &SelectorCache {
        &self.cache
    }

    /// Run all enabled rules on the given index
    pub fn run(
        &mut self,
        index: &NodeIndex<'_>,
        source_type: SourceType,
    ) -> Result<LintResult, LintError> {
        let rules = self.config.enabled_rules();

        let mut dispatch: Vec<(usize, Arc<Selector>)> = Vec::new();
        for (position, rule) in rules.iter().enumerate() {
            for pattern in rule.selectors() {
                dispatch.push((position, self.cache.get_or_compile(&pattern)?));
            }
        }
        trace!(
            rules = rules.len(),
            selectors = dispatch.len(),
            "compiled rule selectors"
        );

        let mut ctx = LintContext::new(index, source_type);
        for node in index.descendants(index.root()) {
            for (position, selector) in &dispatch {
                if selector.matches(index, node) {
                    rules[*position].check(node, &mut ctx);
                }
            }
        }

        let mut diagnostics = ctx.into_diagnostics();
        for diagnostic in &mut diagnostics {
            if let Some(severity) = self.config.severities.get(diagnostic.rule.as_str()) {
                diagnostic.severity = *severity;
            }
        }
        diagnostics.sort_by_key(|d| (d.start, d.end));

        debug!(
            nodes = index.len(),
            diagnostics = diagnostics.len(),
            "lint pass finished"
        );
        Ok(LintResult { diagnostics })
    }
}

/// Result of running the linter
#[derive(Debug, Default)]
pub struct LintResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl LintResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d.severity, DiagnosticSeverity::Error))
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d.severity, DiagnosticSeverity::Warning))
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, DiagnosticSeverity::Error))
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, DiagnosticSeverity::Warning))
            .count()
    }

    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.fixes.is_empty()).count()
    }

    /// Diagnostics grouped by rule, in order of first appearance
    pub fn by_rule(&self) -> IndexMap<&str, Vec<&Diagnostic>> {
        let mut groups: IndexMap<&str, Vec<&Diagnostic>> = IndexMap::new();
        for diagnostic in &self.diagnostics {
            groups
                .entry(diagnostic.rule.as_str())
                .or_default()
                .push(diagnostic);
        }
        groups
    }
}

/// Convenience function to lint an index with default configuration
pub fn lint(index: &NodeIndex<'_>, source_type: SourceType) -> Result<LintResult, LintError> {
    LintRunner::new(RulesConfig::default()).run(index, source_type)
}

/// Convenience function to lint an index with custom configuration
pub fn lint_with_config(
    index: &NodeIndex<'_>,
    source_type: SourceType,
    config: RulesConfig,
) -> Result<LintResult, LintError> {
    LintRunner::new(config).run(index, source_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_support::with_index;
    use crate::rules::MaxParamsConfig;

    fn lint_source(source: &str) -> LintResult {
        with_index(source, |index| lint(index, SourceType::tsx()).unwrap())
    }

    fn lint_source_with_config(source: &str, config: RulesConfig) -> LintResult {
        with_index(source, |index| {
            lint_with_config(index, SourceType::tsx(), config).unwrap()
        })
    }

    fn rules_of(result: &LintResult) -> Vec<&str> {
        result.diagnostics.iter().map(|d| d.rule.as_str()).collect()
    }

    #[test]
    fn test_lint_clean_code() {
        let result = lint_source("export function add(a: number, b: number) {\n  return a + b;\n}\n");
        assert!(result.diagnostics.is_empty());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_lint_max_params() {
        let result = lint_source("function f(a, b, c, d) {}\nconst g = (a, b) => a;\n");
        assert_eq!(rules_of(&result), vec!["max-params"]);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.diagnostics[0].data_value("count"), Some("4"));
    }

    #[test]
    fn test_lint_single_line_object() {
        let result = lint_source("const foo = {\n  a: 1,\n};\n");
        assert_eq!(rules_of(&result), vec!["prefer-single-line"]);
        assert_eq!(result.fixable_count(), 1);
    }

    #[test]
    fn test_diagnostics_sorted_by_position() {
        let source = "export const x = foo(1, 2, 3, 4);\nfunction late(a, b, c, d) {}\nconst o = {\n  a: 1,\n};\nfunction early(a, b, c, d) {}\n";
        let result = lint_source(source);
        let starts: Vec<u32> = result.diagnostics.iter().map(|d| d.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(result.diagnostics.len(), 3);
    }

    #[test]
    fn test_disabled_rules_do_not_report() {
        let config = RulesConfig::none().with_no_reexport(true);
        let result = lint_source_with_config("function f(a, b, c, d) {}\n", config);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_custom_rule_config() {
        let config = RulesConfig::none().with_max_params(MaxParams::with_config(MaxParamsConfig {
            max: 1,
        }));
        let result = lint_source_with_config("function f(a, b) {}\n", config);
        assert_eq!(rules_of(&result), vec!["max-params"]);
    }

    #[test]
    fn test_severity_override() {
        let config = RulesConfig::none()
            .with_max_params(MaxParams::with_max(1))
            .with_severity(MaxParams::NAME, DiagnosticSeverity::Error);
        let result = lint_source_with_config("function f(a, b) {}\n", config);
        assert!(result.has_errors());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_runner_reuses_compiled_selectors() {
        let mut runner = LintRunner::new(RulesConfig::default());
        let first = with_index("const a = 1;\n", |index| {
            runner.run(index, SourceType::tsx()).unwrap()
        });
        let compiled = runner.cache().len();
        assert!(compiled > 0);
        with_index("function f(a, b, c, d) {}\n", |index| {
            runner.run(index, SourceType::tsx()).unwrap()
        });
        assert_eq!(runner.cache().len(), compiled);
        assert!(first.diagnostics.is_empty());
    }

    #[test]
    fn test_by_rule_keeps_first_appearance_order() {
        let source = "function f(a, b, c, d) {}\nconst o = {\n  a: 1,\n};\nfunction g(a, b, c, d) {}\n";
        let result = lint_source(source);
        let groups = result.by_rule();
        let names: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(names, vec!["max-params", "prefer-single-line"]);
        assert_eq!(groups["max-params"].len(), 2);
    }

    #[test]
    fn test_from_json() {
        let config =
            RulesConfig::from_json(r#"{"max-params": {"max": 2}, "no-reexport": false}"#).unwrap();
        assert_eq!(config.max_params.as_ref().map(|r| r.config.max), Some(2));
        assert!(config.no_reexport.is_none());
        assert!(config.prefer_single_line.is_some());
        assert!(config.severities.is_empty());
    }

    #[test]
    fn test_from_json_eslint_array_form() {
        let config = RulesConfig::from_json(
            r#"{"max-params": ["error", {"max": 5}], "types-before-use": "off", "no-single-use-type": ["warn"]}"#,
        )
        .unwrap();
        assert_eq!(config.max_params.as_ref().map(|r| r.config.max), Some(5));
        assert_eq!(
            config.severities.get("max-params"),
            Some(&DiagnosticSeverity::Error)
        );
        assert_eq!(
            config.severities.get("no-single-use-type"),
            Some(&DiagnosticSeverity::Warning)
        );
        assert!(config.types_before_use.is_none());
    }

    #[test]
    fn test_from_json_rule_options() {
        let config = RulesConfig::from_json(
            r#"{"no-single-use-type": {"ignoreTypesWithSuffix": ["Props"]}, "prefer-single-line": {"maxLineLength": 80}}"#,
        )
        .unwrap();
        let rule = config.no_single_use_type.unwrap();
        assert_eq!(rule.config.ignore_types_with_suffix, vec!["Props"]);
        assert_eq!(
            config.prefer_single_line.unwrap().config.max_line_length,
            Some(80)
        );
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            RulesConfig::from_json(r#"{"no-such-rule": true}"#),
            Err(ConfigError::UnknownRule(name)) if name == "no-such-rule"
        ));
        assert!(matches!(
            RulesConfig::from_json(r#"{"max-params": {"max": "three"}}"#),
            Err(ConfigError::InvalidOptions { .. })
        ));
        assert!(matches!(
            RulesConfig::from_json(r#"{"no-reexport": {"strict": true}}"#),
            Err(ConfigError::InvalidOptions { .. })
        ));
        assert!(matches!(
            RulesConfig::from_json(r#"{"max-params": "loud"}"#),
            Err(ConfigError::InvalidSetting { .. })
        ));
        assert!(matches!(
            RulesConfig::from_json("[1, 2]"),
            Err(ConfigError::ParseJson(_))
        ));
    }
}
