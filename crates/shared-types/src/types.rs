use std::fmt;

/// Issue severity, ordered from least to most serious
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Order used by summaries and tallies: most serious first
    pub const DESCENDING: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Visual category used when rendering inline review comments
    pub fn comment_category(&self) -> CommentCategory {
        match self {
            Severity::Critical | Severity::High => CommentCategory::Critical,
            Severity::Medium => CommentCategory::Warning,
            Severity::Low => CommentCategory::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentCategory {
    Critical,
    Warning,
    Info,
}

/// Known corporate document types
///
/// Serialized with their human-readable names so configuration files and
/// reports read naturally (`"Articles of Association"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DocumentType {
    #[serde(rename = "Articles of Association")]
    ArticlesOfAssociation,
    #[serde(rename = "Memorandum of Association")]
    MemorandumOfAssociation,
    #[serde(rename = "Incorporation Application Form")]
    IncorporationApplication,
    #[serde(rename = "UBO Declaration Form")]
    UboDeclaration,
    #[serde(rename = "Board Resolution Templates")]
    BoardResolution,
    #[serde(rename = "Register of Members and Directors")]
    RegisterOfMembersAndDirectors,
    #[serde(rename = "Shareholder Resolution Templates")]
    ShareholderResolution,
    #[serde(rename = "Change of Registered Address Notice")]
    ChangeOfAddressNotice,
    #[serde(rename = "Employment Contract")]
    EmploymentContract,
    #[serde(rename = "Commercial Agreement")]
    CommercialAgreement,
    #[serde(rename = "Compliance Policy")]
    CompliancePolicy,
    #[serde(rename = "License Application Form")]
    LicenseApplicationForm,
    #[serde(rename = "Business Plan")]
    BusinessPlan,
    #[serde(rename = "Financial Projections")]
    FinancialProjections,
    #[serde(rename = "Compliance Manual")]
    ComplianceManual,
    #[serde(rename = "Other")]
    Other,
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::ArticlesOfAssociation => "Articles of Association",
            DocumentType::MemorandumOfAssociation => "Memorandum of Association",
            DocumentType::IncorporationApplication => "Incorporation Application Form",
            DocumentType::UboDeclaration => "UBO Declaration Form",
            DocumentType::BoardResolution => "Board Resolution Templates",
            DocumentType::RegisterOfMembersAndDirectors => "Register of Members and Directors",
            DocumentType::ShareholderResolution => "Shareholder Resolution Templates",
            DocumentType::ChangeOfAddressNotice => "Change of Registered Address Notice",
            DocumentType::EmploymentContract => "Employment Contract",
            DocumentType::CommercialAgreement => "Commercial Agreement",
            DocumentType::CompliancePolicy => "Compliance Policy",
            DocumentType::LicenseApplicationForm => "License Application Form",
            DocumentType::BusinessPlan => "Business Plan",
            DocumentType::FinancialProjections => "Financial Projections",
            DocumentType::ComplianceManual => "Compliance Manual",
            DocumentType::Other => "Other",
        }
    }

    /// Types that must name ADGM Courts as the dispute forum
    pub fn is_jurisdiction_sensitive(&self) -> bool {
        matches!(
            self,
            DocumentType::ArticlesOfAssociation
                | DocumentType::MemorandumOfAssociation
                | DocumentType::CommercialAgreement
        )
    }

    /// Types that must carry a signature block
    pub fn requires_signature(&self) -> bool {
        matches!(
            self,
            DocumentType::ArticlesOfAssociation | DocumentType::BoardResolution
        )
    }

    /// Register-style types whose details belong in a table
    pub fn requires_table(&self) -> bool {
        matches!(self, DocumentType::RegisterOfMembersAndDirectors)
    }

    /// Constitutional types that must quote an ADGM registration number
    pub fn requires_registration_number(&self) -> bool {
        matches!(
            self,
            DocumentType::ArticlesOfAssociation | DocumentType::MemorandumOfAssociation
        )
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Multi-document legal processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProcessType {
    #[serde(rename = "Company Incorporation")]
    CompanyIncorporation,
    #[serde(rename = "License Application")]
    LicenseApplication,
    #[serde(rename = "Employment Setup")]
    EmploymentSetup,
    #[serde(rename = "Commercial Agreement")]
    CommercialAgreement,
    #[serde(rename = "Compliance Filing")]
    ComplianceFiling,
    #[serde(rename = "Other")]
    Other,
}

impl ProcessType {
    pub fn label(&self) -> &'static str {
        match self {
            ProcessType::CompanyIncorporation => "Company Incorporation",
            ProcessType::LicenseApplication => "License Application",
            ProcessType::EmploymentSetup => "Employment Setup",
            ProcessType::CommercialAgreement => "Commercial Agreement",
            ProcessType::ComplianceFiling => "Compliance Filing",
            ProcessType::Other => "Other",
        }
    }

    /// Static filing guidance for the process
    pub fn guidance(&self) -> ProcessGuidance {
        match self {
            ProcessType::CompanyIncorporation => ProcessGuidance::new(
                "Company incorporation in ADGM requires specific documents to establish a legal entity.",
                "2-4 weeks",
                &[
                    "All documents must be properly executed",
                    "UBO declaration must be complete and accurate",
                    "Registered office address must be in ADGM",
                    "Company name must be approved by ADGM RA",
                ],
                &[
                    "Submit complete application to ADGM Registration Authority",
                    "Pay required fees",
                    "Await approval and certificate of incorporation",
                ],
            ),
            ProcessType::LicenseApplication => ProcessGuidance::new(
                "License application for conducting business activities in ADGM.",
                "4-8 weeks",
                &[
                    "Business plan must align with ADGM regulations",
                    "Financial projections must be realistic",
                    "Compliance manual must address all relevant regulations",
                ],
                &[
                    "Submit application to relevant ADGM authority",
                    "Undergo regulatory review",
                    "Address any queries or requirements",
                ],
            ),
            ProcessType::EmploymentSetup => ProcessGuidance::new(
                "Setting up employment arrangements in ADGM.",
                "1-2 weeks",
                &[
                    "Employment contracts must comply with ADGM Employment Regulations",
                    "HR policies must be documented",
                    "Visa and work permit requirements must be addressed",
                ],
                &[
                    "Finalize employment documentation",
                    "Apply for work permits if required",
                    "Register with ADGM authorities",
                ],
            ),
            ProcessType::CommercialAgreement
            | ProcessType::ComplianceFiling
            | ProcessType::Other => ProcessGuidance::new(
                "General ADGM process",
                "Varies",
                &["Ensure all documents comply with ADGM regulations"],
                &["Consult with ADGM authorities for specific requirements"],
            ),
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessGuidance {
    pub description: String,
    pub typical_timeline: String,
    pub key_requirements: Vec<String>,
    pub next_steps: Vec<String>,
}

impl ProcessGuidance {
    fn new(description: &str, timeline: &str, requirements: &[&str], steps: &[&str]) -> Self {
        Self {
            description: description.to_string(),
            typical_timeline: timeline.to_string(),
            key_requirements: requirements.iter().map(|s| s.to_string()).collect(),
            next_steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A compliance problem found in one document
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub document: String,
    pub section: Option<String>,
    pub issue: String,
    pub severity: Severity,
    pub suggestion: Option<String>,
    pub reference: Option<String>,
    pub position: Option<usize>, // Body paragraph where the problem was seen
}

impl Issue {
    pub fn new(document: impl Into<String>, issue: impl Into<String>, severity: Severity) -> Self {
        Self {
            document: document.into(),
            section: None,
            issue: issue.into(),
            severity,
            suggestion: None,
            reference: None,
            position: None,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Identity used for deduplication: (section, issue text, severity)
    pub fn dedup_key(&self) -> (Option<&str>, &str, Severity) {
        (self.section.as_deref(), self.issue.as_str(), self.severity)
    }
}

/// Issue tally by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_categories() {
        assert_eq!(Severity::Critical.comment_category(), CommentCategory::Critical);
        assert_eq!(Severity::High.comment_category(), CommentCategory::Critical);
        assert_eq!(Severity::Medium.comment_category(), CommentCategory::Warning);
        assert_eq!(Severity::Low.comment_category(), CommentCategory::Info);
    }

    #[test]
    fn test_document_type_serializes_as_label() {
        let json = serde_json::to_string(&DocumentType::UboDeclaration).unwrap();
        assert_eq!(json, "\"UBO Declaration Form\"");
        let back: DocumentType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DocumentType::UboDeclaration);
    }

    #[test]
    fn test_dedup_key_ignores_suggestion() {
        let a = Issue::new("Articles of Association", "Missing clause", Severity::High)
            .with_section("Share Capital")
            .with_suggestion("Add it");
        let b = Issue::new("Articles of Association", "Missing clause", Severity::High)
            .with_section("Share Capital");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_severity_counts() {
        let issues = vec![
            Issue::new("d", "a", Severity::High),
            Issue::new("d", "b", Severity::High),
            Issue::new("d", "c", Severity::Low),
        ];
        let counts = SeverityCounts::from_issues(&issues);
        assert_eq!(counts.get(Severity::High), 2);
        assert_eq!(counts.get(Severity::Low), 1);
        assert_eq!(counts.total(), 3);
    }
}
