//! Engine options shared by the facade and the linter

use oxc_span::SourceType;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_FIX_PASSES;

/// Options for one lint session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintOptions {
    /// How many lint/fix passes the fixer runs before giving up
    pub max_fix_passes: usize,

    /// Source filename, used to pick the parser's source type
    pub filename: String,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            max_fix_passes: DEFAULT_MAX_FIX_PASSES,
            filename: "input.tsx".to_string(),
        }
    }
}

impl LintOptions {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_max_fix_passes(mut self, passes: usize) -> Self {
        self.max_fix_passes = passes;
        self
    }

    /// Source type derived from the filename, TSX when the extension is unknown
    pub fn source_type(&self) -> SourceType {
        SourceType::from_path(&self.filename).unwrap_or(SourceType::tsx())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LintOptions::default();
        assert_eq!(options.max_fix_passes, 10);
        assert!(options.source_type().is_typescript());
    }

    #[test]
    fn test_deserialize_partial() {
        let options: LintOptions = serde_json::from_str(r#"{"maxFixPasses": 2}"#).unwrap();
        assert_eq!(options.max_fix_passes, 2);
        assert_eq!(options.filename, "input.tsx");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_tsx() {
        let options = LintOptions::default().with_filename("notes.txt");
        assert!(options.source_type().is_jsx());
    }
}
