//! Diagnostic types for lint results

use oxc_span::Span;

use crate::patch::TextEdit;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
    Hint,
}

/// A suggested fix: edits applied together or not at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub edits: Vec<TextEdit>,
    /// Description of what the fix does
    pub message: Option<String>,
}

impl Fix {
    /// Replace a single span
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self::from_edits(vec![TextEdit::replace(span, replacement)])
    }

    pub fn from_edits(edits: Vec<TextEdit>) -> Self {
        Self {
            edits,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Smallest span covering every edit
    pub fn span(&self) -> Span {
        let start = self.edits.iter().map(|e| e.span.start).min().unwrap_or(0);
        let end = self.edits.iter().map(|e| e.span.end).max().unwrap_or(0);
        Span::new(start, end)
    }

    /// Whether any edit of `self` overlaps any edit of `other`
    pub fn overlaps(&self, other: &Fix) -> bool {
        self.edits
            .iter()
            .any(|edit| other.edits.iter().any(|theirs| edit.overlaps(theirs)))
    }
}

/// Fill `{{name}}` placeholders from `data`. Unknown placeholders are kept.
pub fn render_message(template: &str, data: &[(&'static str, String)]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        message.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            message.push_str(&rest[open..]);
            return message;
        };
        let key = after[..close].trim();
        match data.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => message.push_str(value),
            None => message.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    message.push_str(rest);
    message
}

/// A lint diagnostic
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The rule that produced this diagnostic
    pub rule: String,
    /// Identifier of the message in the rule's catalog
    pub message_id: Option<&'static str>,
    /// Start position of the span
    pub start: u32,
    /// End position of the span
    pub end: u32,
    /// Primary message
    pub message: String,
    /// Values the message template was filled with
    pub data: Vec<(&'static str, String)>,
    /// Optional help text
    pub help: Option<String>,
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Optional labels pointing to related locations
    pub labels: Vec<(u32, u32, String)>,
    /// Suggested fixes
    pub fixes: Vec<Fix>,
}

impl Diagnostic {
    pub fn new(rule: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message_id: None,
            start: span.start,
            end: span.end,
            message: message.into(),
            data: Vec::new(),
            help: None,
            severity: DiagnosticSeverity::Warning,
            labels: Vec::new(),
            fixes: Vec::new(),
        }
    }

    /// Diagnostic whose message is rendered from a catalog template
    pub fn from_template(
        rule: impl Into<String>,
        span: Span,
        message_id: &'static str,
        template: &str,
        data: Vec<(&'static str, String)>,
    ) -> Self {
        let mut diagnostic = Self::new(rule, span, render_message(template, &data));
        diagnostic.message_id = Some(message_id);
        diagnostic.data = data;
        diagnostic
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push((span.start, span.end, message.into()));
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn error(rule: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self::new(rule, span, message).with_severity(DiagnosticSeverity::Error)
    }

    pub fn warning(rule: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self::new(rule, span, message).with_severity(DiagnosticSeverity::Warning)
    }

    /// Value of a template placeholder
    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}
