//! Dispute-forum checks: documents must point to ADGM Courts

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{Issue, Severity};

use super::{CheckContext, ComplianceCheck};
use crate::error::RuleEngineError;
use crate::patterns::line_of;

const SECTION: &str = "Jurisdiction Clause";

/// A forum phrase that must not appear, unless `unless_followed_by` matches
/// the text right after it
struct DisallowedPhrase {
    pattern: Regex,
    unless_followed_by: Option<Regex>,
}

impl DisallowedPhrase {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            unless_followed_by: None,
        }
    }

    fn unless_followed_by(mut self, pattern: &str) -> Self {
        self.unless_followed_by = Some(Regex::new(pattern).unwrap());
        self
    }
}

lazy_static! {
    static ref INCORRECT_JURISDICTIONS: Vec<DisallowedPhrase> = vec![
        DisallowedPhrase::new(r"(?i)uae\s+federal\s+courts?"),
        DisallowedPhrase::new(r"(?i)dubai\s+courts?"),
        // "Abu Dhabi Courts" but not "Abu Dhabi Courts Global Market"
        DisallowedPhrase::new(r"(?i)abu\s+dhabi\s+courts?")
            .unless_followed_by(r"(?i)^\s+global\s+market"),
        DisallowedPhrase::new(r"(?i)emirates\s+courts?"),
        DisallowedPhrase::new(r"(?i)federal\s+courts?\s+of\s+uae"),
    ];

    static ref ADGM_JURISDICTION: Vec<Regex> = vec![
        Regex::new(r"(?i)adgm\s+courts?").unwrap(),
        Regex::new(r"(?i)abu\s+dhabi\s+global\s+market\s+courts?").unwrap(),
        Regex::new(r"(?i)courts?\s+of\s+adgm").unwrap(),
    ];
}

pub struct JurisdictionCheck;

impl ComplianceCheck for JurisdictionCheck {
    fn name(&self) -> &str {
        "jurisdiction"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
        let mut issues = Vec::new();

        for phrase in INCORRECT_JURISDICTIONS.iter() {
            for m in phrase.pattern.find_iter(ctx.text) {
                let excused = phrase
                    .unless_followed_by
                    .as_ref()
                    .map(|guard| guard.is_match(&ctx.text[m.end()..]))
                    .unwrap_or(false);
                if excused {
                    continue;
                }
                let issue = ctx
                    .issue(
                        format!(
                            "Incorrect jurisdiction reference: '{}'",
                            m.as_str().to_lowercase()
                        ),
                        Severity::High,
                    )
                    .with_section(SECTION)
                    .with_suggestion("Update jurisdiction to reference ADGM Courts")
                    .with_reference("ADGM Companies Regulations 2020, Article 6");
                let line = line_of(ctx.text, m.start());
                issues.push(match ctx.structure.paragraph_of_line(line) {
                    Some(paragraph) => issue.at_position(paragraph),
                    None => issue,
                });
            }
        }

        let has_adgm_forum = ADGM_JURISDICTION.iter().any(|re| re.is_match(ctx.text));
        if !has_adgm_forum && ctx.document_type.is_jurisdiction_sensitive() {
            issues.push(
                ctx.issue("Missing ADGM jurisdiction clause", Severity::High)
                    .with_section(SECTION)
                    .with_suggestion("Add clause specifying ADGM Courts jurisdiction")
                    .with_reference("ADGM Companies Regulations 2020"),
            );
        }

        Ok(issues)
    }
}
