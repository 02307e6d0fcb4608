//! Settings for top-level parser invocation.

use serde::{Deserialize, Serialize};

/// Controls how [`Parser::parse_with`](crate::Parser::parse_with) and
/// [`Parser::try_parse_with`](crate::Parser::try_parse_with) treat a result.
///
/// Deserializable so hosts can keep it alongside their own settings; missing
/// fields fall back to [`ParseConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Name of the input as shown in diagnostics.
    pub source_name: String,
    /// Fail unless the parser consumed the whole input.
    pub require_eof: bool,
    /// Keep the furthest-failure trail on a successful top-level result.
    pub report_furthest_on_success: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            source_name: "input".to_string(),
            require_eof: true,
            report_furthest_on_success: false,
        }
    }
}

impl ParseConfig {
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn with_require_eof(mut self, require_eof: bool) -> Self {
        self.require_eof = require_eof;
        self
    }

    pub fn with_furthest_on_success(mut self, report: bool) -> Self {
        self.report_furthest_on_success = report;
        self
    }
}
