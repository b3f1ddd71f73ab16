use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{Issue, Severity};

use super::{CheckContext, ComplianceCheck};
use crate::error::RuleEngineError;

lazy_static! {
    /// "ADGM-000123", "ADGM 4567", "adgm123"
    static ref REGISTRATION_NUMBER: Regex = Regex::new(r"(?i)adgm\s*-?\s*\d+").unwrap();
    static ref ABBREVIATION: Regex = Regex::new(r"(?i)adgm").unwrap();
    static ref FULL_NAME: Regex = Regex::new(r"(?i)abu\s+dhabi\s+global\s+market").unwrap();
}

/// Registration number format and first-use naming style
pub struct RegistrationCheck;

impl ComplianceCheck for RegistrationCheck {
    fn name(&self) -> &str {
        "registration"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
        let mut issues = Vec::new();

        if ctx.document_type.requires_registration_number()
            && !REGISTRATION_NUMBER.is_match(ctx.text)
        {
            issues.push(
                ctx.issue(
                    "Missing or incorrect ADGM registration number format",
                    Severity::Medium,
                )
                .with_section("Registration Details")
                .with_suggestion("Include proper ADGM registration number (ADGM-XXXXXX)")
                .with_reference("ADGM Registration Requirements"),
            );
        }

        if ABBREVIATION.is_match(ctx.text) && !FULL_NAME.is_match(ctx.text) {
            issues.push(
                ctx.issue("ADGM abbreviation used without full name", Severity::Low)
                    .with_section("ADGM Reference")
                    .with_suggestion(
                        "Use full name 'Abu Dhabi Global Market (ADGM)' on first reference",
                    )
                    .with_reference("ADGM Style Guide"),
            );
        }

        Ok(issues)
    }
}
