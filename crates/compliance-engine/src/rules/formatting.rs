use shared_types::{Issue, Severity};

use super::{CheckContext, ComplianceCheck};
use crate::error::RuleEngineError;

/// Structural requirements: signature block, consistent numbering, and
/// tabular registers
pub struct FormattingCheck;

impl ComplianceCheck for FormattingCheck {
    fn name(&self) -> &str {
        "formatting"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
        let mut issues = Vec::new();
        let structure = ctx.structure;

        if ctx.document_type.requires_signature() && structure.signatures.is_empty() {
            issues.push(
                ctx.issue("Missing signature section", Severity::Medium)
                    .with_section("Signature Section")
                    .with_suggestion("Add proper signature section with date and witness fields")
                    .with_reference("ADGM Document Standards"),
            );
        }

        // Fewer than half of the detected sections carry a number
        let sections = structure.sections.len();
        let numbered = structure.sections.iter().filter(|s| s.numbered).count();
        if sections > 0 && numbered * 2 < sections {
            issues.push(
                ctx.issue("Inconsistent section numbering", Severity::Low)
                    .with_section("Document Structure")
                    .with_suggestion("Use consistent numbering for all sections")
                    .with_reference("ADGM Document Formatting Guidelines"),
            );
        }

        if ctx.document_type.requires_table() && structure.tables.is_empty() {
            issues.push(
                ctx.issue(
                    "Missing tabular format for member/director information",
                    Severity::Medium,
                )
                .with_section("Data Structure")
                .with_suggestion("Use table format for member and director details")
                .with_reference("ADGM Register Requirements"),
            );
        }

        Ok(issues)
    }
}
