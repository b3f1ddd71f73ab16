//! Red flags: vague drafting, missing essentials, ambiguous dates

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentType, Issue, Severity};

use super::{CheckContext, ComplianceCheck};
use crate::error::RuleEngineError;

lazy_static! {
    /// Weak modal phrasing, checked in this order
    static ref AMBIGUOUS_LANGUAGE: Vec<Regex> = vec![
        Regex::new(r"(?i)\bmay\s+(?:be|have|do)").unwrap(),
        Regex::new(r"(?i)\bshould\s+(?:be|have|do)").unwrap(),
        Regex::new(r"(?i)\bmight\s+(?:be|have|do)").unwrap(),
        Regex::new(r"(?i)\bpossibly").unwrap(),
        Regex::new(r"(?i)\bperhaps").unwrap(),
        Regex::new(r"(?i)\bif\s+possible").unwrap(),
    ];

    static ref ESSENTIAL_ARTICLES_INFO: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)share\s+capital").unwrap(), "Share capital information"),
        (Regex::new(r"(?i)registered\s+office").unwrap(), "Registered office address"),
        (Regex::new(r"(?i)objects?\s+of\s+the\s+company").unwrap(), "Company objects"),
    ];

    /// Numeric dates with slashes, then with dashes
    static ref NUMERIC_DATES: Vec<Regex> = vec![
        Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}").unwrap(),
        Regex::new(r"\d{1,2}-\d{1,2}-\d{2,4}").unwrap(),
    ];
}

/// Flags the first modal pattern used more than `threshold` times.
///
/// Counts are per pattern and only the first qualifying pattern is reported,
/// so a document spreading its hedging over several patterns, each at or
/// under the threshold, is not flagged.
pub struct AmbiguousLanguageCheck {
    threshold: usize,
}

impl AmbiguousLanguageCheck {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }
}

impl ComplianceCheck for AmbiguousLanguageCheck {
    fn name(&self) -> &str {
        "ambiguous_language"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
        let qualifying = AMBIGUOUS_LANGUAGE
            .iter()
            .find(|re| re.find_iter(ctx.text).count() > self.threshold);

        Ok(qualifying
            .map(|_| {
                ctx.issue("Excessive use of ambiguous language", Severity::Medium)
                    .with_section("Language Clarity")
                    .with_suggestion(
                        "Use definitive language (shall, will, must) instead of ambiguous terms",
                    )
                    .with_reference("ADGM Drafting Standards")
            })
            .into_iter()
            .collect())
    }
}

/// Articles of Association must state share capital, office and objects
pub struct EssentialInfoCheck;

impl ComplianceCheck for EssentialInfoCheck {
    fn name(&self) -> &str {
        "essential_info"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
        if ctx.document_type != DocumentType::ArticlesOfAssociation {
            return Ok(Vec::new());
        }

        Ok(ESSENTIAL_ARTICLES_INFO
            .iter()
            .filter(|(re, _)| !re.is_match(ctx.text))
            .map(|(_, info)| {
                let lower = info.to_lowercase();
                ctx.issue(format!("Missing {lower}"), Severity::High)
                    .with_section(*info)
                    .with_suggestion(format!("Include {lower} in the document"))
                    .with_reference("ADGM Companies Regulations")
            })
            .collect())
    }
}

/// One issue if any numeric date appears
pub struct DateFormatCheck;

impl ComplianceCheck for DateFormatCheck {
    fn name(&self) -> &str {
        "date_format"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
        if !NUMERIC_DATES.iter().any(|re| re.is_match(ctx.text)) {
            return Ok(Vec::new());
        }
        Ok(vec![ctx
            .issue("Inconsistent date format detected", Severity::Low)
            .with_section("Date Format")
            .with_suggestion("Use consistent date format (DD Month YYYY)")
            .with_reference("ADGM Document Standards")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::StructuredContent;

    fn run(check: &dyn ComplianceCheck, text: &str, document_type: DocumentType) -> Vec<Issue> {
        let structure = StructuredContent::default();
        check
            .check(&CheckContext::new(text, document_type, &structure))
            .unwrap()
    }

    #[test]
    fn test_first_qualifying_pattern_only() {
        let text = "It may be late. It may have ended. It may do so. It may be fine. \
                    Perhaps. Perhaps not. Possibly. Possibly. Possibly. Possibly.";
        let issues = run(&AmbiguousLanguageCheck::new(3), text, DocumentType::Other);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue, "Excessive use of ambiguous language");
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let text = "It may be. It may be. It may be.";
        assert!(run(&AmbiguousLanguageCheck::new(3), text, DocumentType::Other).is_empty());
    }

    #[test]
    fn test_varied_hedging_under_threshold_is_not_flagged() {
        // 3 of each of four patterns: 12 hedges in total, none above 3 alone
        let text = "may be may be may be should be should be should be \
                    might be might be might be perhaps perhaps perhaps";
        assert!(run(&AmbiguousLanguageCheck::new(3), text, DocumentType::Other).is_empty());
    }

    #[test]
    fn test_missing_essentials_for_articles() {
        let issues = run(
            &EssentialInfoCheck,
            "The share capital is AED 1,000.",
            DocumentType::ArticlesOfAssociation,
        );
        let texts: Vec<_> = issues.iter().map(|i| i.issue.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Missing registered office address", "Missing company objects"]
        );
        assert_eq!(issues[1].section.as_deref(), Some("Company objects"));
        assert!(run(&EssentialInfoCheck, "", DocumentType::BoardResolution).is_empty());
    }

    #[test]
    fn test_single_date_issue_for_both_families() {
        let issues = run(
            &DateFormatCheck,
            "Dated 01/02/2024 and effective 03-04-2024",
            DocumentType::Other,
        );
        assert_eq!(issues.len(), 1);
        assert!(run(&DateFormatCheck, "Dated 1 February 2024", DocumentType::Other).is_empty());
    }
}
