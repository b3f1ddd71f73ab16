//! Shared regex tables and matching helpers

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

lazy_static! {
    /// "3." at the start of a paragraph
    pub static ref NUMBERED_HEADING: Regex = Regex::new(r"^\d+\.").unwrap();

    /// "4.2" at the start of a paragraph, captured
    pub static ref CLAUSE_NUMBER: Regex = Regex::new(r"^(\d+\.\d+)").unwrap();

    /// Signature lines and execution blocks
    pub static ref SIGNATURE_LINE: Regex =
        Regex::new(r"(?i)signature|signed|date.*signed").unwrap();
}

/// Compile a configured pattern case-insensitively.
///
/// `table` names the configuration table the pattern came from and is only
/// used in the error.
pub fn compile_pattern(table: &str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            table: table.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

pub fn compile_all(table: &str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns.iter().map(|p| compile_pattern(table, p)).collect()
}

/// Zero-based line number of byte `offset` in `text`
pub fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count()
}

/// True when `text` (already lowercase) contains any of `keywords`
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
