//! Engine configuration
//!
//! One immutable `EngineConfig` is loaded at start-up (TOML or defaults) and
//! handed by reference to every component when the engine is built. Pattern
//! tables in here are plain strings; they are compiled once by
//! `ComplianceEngine::new`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_types::{DocumentType, ProcessType, Severity};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest accepted input container, in megabytes
    pub max_file_size_mb: u64,
    pub severity_weights: SeverityWeights,
    /// Minimum classifier score for a type to be accepted
    pub type_confidence_threshold: f64,
    /// Minimum checklist coverage for a process to be accepted
    pub process_confidence_threshold: f64,
    /// An ambiguous-language pattern is flagged when its count exceeds this
    pub ambiguous_language_threshold: usize,
    /// Issues listed by name in the in-document summary block
    pub summary_issue_limit: usize,
    pub recommendation_limit: usize,
    pub advisory_timeout_ms: u64,
    pub process_requirements: Vec<ProcessRequirement>,
    pub document_aliases: Vec<DocumentAlias>,
    pub type_patterns: Vec<TypePatternSet>,
    pub required_clauses: Vec<ClauseRequirementSet>,
}

/// Penalty points per issue severity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            low: 1,
            medium: 3,
            high: 7,
            critical: 15,
        }
    }
}

/// Ordered checklist of document types a process needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRequirement {
    pub process: ProcessType,
    pub documents: Vec<DocumentType>,
}

/// Names accepted for a required document.
///
/// `requirement` is matched as a lowercase substring of the required
/// document's name; the first matching entry decides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAlias {
    pub requirement: String,
    pub accepts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePatternSet {
    pub document_type: DocumentType,
    pub patterns: Vec<WeightedPattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPattern {
    pub pattern: String,
    #[serde(default = "default_pattern_weight")]
    pub weight: f64,
}

fn default_pattern_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseRequirementSet {
    pub document_type: DocumentType,
    pub clauses: Vec<ClauseRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseRequirement {
    pub name: String,
    /// Alternatives; the clause is present when any one matches
    pub patterns: Vec<String>,
    pub severity: Severity,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl EngineConfig {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = toml::from_str(s).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges. Pattern syntax is checked when the engine compiles them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("type_confidence_threshold", self.type_confidence_threshold),
            (
                "process_confidence_threshold",
                self.process_confidence_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        if self.max_file_size_mb == 0 {
            return Err(ConfigError::InvalidValue(
                "max_file_size_mb must be positive".to_string(),
            ));
        }
        for set in &self.type_patterns {
            if set.patterns.iter().any(|p| p.weight.is_nan() || p.weight <= 0.0) {
                return Err(ConfigError::InvalidValue(format!(
                    "pattern weights for {} must be positive",
                    set.document_type
                )));
            }
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn advisory_timeout(&self) -> Duration {
        Duration::from_millis(self.advisory_timeout_ms)
    }

    pub fn requirements_for(&self, process: ProcessType) -> &[DocumentType] {
        self.process_requirements
            .iter()
            .find(|r| r.process == process)
            .map(|r| r.documents.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
            severity_weights: SeverityWeights::default(),
            type_confidence_threshold: 0.30,
            process_confidence_threshold: 0.40,
            ambiguous_language_threshold: 3,
            summary_issue_limit: 5,
            recommendation_limit: 10,
            advisory_timeout_ms: 30_000,
            process_requirements: default_process_requirements(),
            document_aliases: default_document_aliases(),
            type_patterns: default_type_patterns(),
            required_clauses: default_required_clauses(),
        }
    }
}

fn default_process_requirements() -> Vec<ProcessRequirement> {
    vec![
        ProcessRequirement {
            process: ProcessType::CompanyIncorporation,
            documents: vec![
                DocumentType::ArticlesOfAssociation,
                DocumentType::MemorandumOfAssociation,
                DocumentType::UboDeclaration,
                DocumentType::RegisterOfMembersAndDirectors,
                DocumentType::BoardResolution,
            ],
        },
        ProcessRequirement {
            process: ProcessType::LicenseApplication,
            documents: vec![
                DocumentType::LicenseApplicationForm,
                DocumentType::BusinessPlan,
                DocumentType::FinancialProjections,
                DocumentType::ComplianceManual,
            ],
        },
    ]
}

fn default_document_aliases() -> Vec<DocumentAlias> {
    let table: &[(&str, &[&str])] = &[
        (
            "articles of association",
            &["articles", "aoa", "articles of association"],
        ),
        (
            "memorandum of association",
            &["memorandum", "moa", "memorandum of association"],
        ),
        (
            "ubo declaration",
            &["ubo", "beneficial owner", "ultimate beneficial owner"],
        ),
        (
            "board resolution",
            &["board resolution", "directors resolution", "resolution"],
        ),
        (
            "register of members and directors",
            &["register", "members register", "directors register"],
        ),
        (
            "shareholder resolution",
            &["shareholder resolution", "shareholders resolution"],
        ),
        (
            "employment contract",
            &["employment", "contract", "employment agreement"],
        ),
        (
            "incorporation application",
            &["incorporation", "application", "registration application"],
        ),
    ];

    table
        .iter()
        .map(|(requirement, accepts)| DocumentAlias {
            requirement: requirement.to_string(),
            accepts: accepts.iter().map(|a| a.to_string()).collect(),
        })
        .collect()
}

fn patterns(list: &[&str]) -> Vec<WeightedPattern> {
    list.iter()
        .map(|p| WeightedPattern {
            pattern: p.to_string(),
            weight: 1.0,
        })
        .collect()
}

/// Classifier tables. Order matters: on equal scores the earlier type wins.
fn default_type_patterns() -> Vec<TypePatternSet> {
    let table: &[(DocumentType, &[&str])] = &[
        (
            DocumentType::ArticlesOfAssociation,
            &[
                r"articles?\s+of\s+association",
                r"company\s+constitution",
                r"share\s+capital",
                r"directors?\s+powers",
                r"general\s+meetings?",
                r"dividend",
                r"winding\s+up",
            ],
        ),
        (
            DocumentType::MemorandumOfAssociation,
            &[
                r"memorandum\s+of\s+association",
                r"objects?\s+of\s+the\s+company",
                r"liability\s+of\s+members",
                r"authorized\s+share\s+capital",
                r"company\s+name",
                r"registered\s+office",
            ],
        ),
        (
            DocumentType::IncorporationApplication,
            &[
                r"incorporation\s+application",
                r"application\s+for\s+registration",
                r"company\s+registration",
                r"proposed\s+company\s+name",
                r"nature\s+of\s+business",
                r"registered\s+address",
            ],
        ),
        (
            DocumentType::UboDeclaration,
            &[
                r"ultimate\s+beneficial\s+owner",
                r"ubo\s+declaration",
                r"beneficial\s+ownership",
                r"controlling\s+interest",
                r"ownership\s+structure",
                r"25%\s+or\s+more",
            ],
        ),
        (
            DocumentType::BoardResolution,
            &[
                r"board\s+resolution",
                r"directors?\s+resolution",
                r"resolved\s+that",
                r"board\s+of\s+directors",
                r"meeting\s+of\s+directors",
                r"quorum\s+present",
            ],
        ),
        (
            DocumentType::RegisterOfMembersAndDirectors,
            &[
                r"register\s+of\s+members",
                r"register\s+of\s+directors",
                r"shareholders?\s+register",
                r"directors?\s+register",
                r"member\s+details",
                r"director\s+details",
            ],
        ),
        (
            DocumentType::ShareholderResolution,
            &[
                r"shareholders?\s+resolution",
                r"general\s+meeting",
                r"extraordinary\s+general\s+meeting",
                r"annual\s+general\s+meeting",
                r"special\s+resolution",
                r"ordinary\s+resolution",
            ],
        ),
        (
            DocumentType::ChangeOfAddressNotice,
            &[
                r"change\s+of\s+address",
                r"registered\s+office\s+address",
                r"new\s+address",
                r"address\s+change",
                r"relocation\s+notice",
                r"office\s+relocation",
            ],
        ),
        (
            DocumentType::EmploymentContract,
            &[
                r"employment\s+contract",
                r"employment\s+agreement",
                r"terms\s+of\s+employment",
                r"job\s+description",
                r"salary",
                r"working\s+hours",
                r"notice\s+period",
            ],
        ),
        (
            DocumentType::CommercialAgreement,
            &[
                r"commercial\s+agreement",
                r"service\s+agreement",
                r"supply\s+agreement",
                r"partnership\s+agreement",
                r"terms\s+and\s+conditions",
                r"payment\s+terms",
            ],
        ),
        (
            DocumentType::CompliancePolicy,
            &[
                r"compliance\s+policy",
                r"risk\s+management",
                r"data\s+protection",
                r"anti.money\s+laundering",
                r"know\s+your\s+customer",
                r"regulatory\s+compliance",
            ],
        ),
        (
            DocumentType::LicenseApplicationForm,
            &[
                r"licen[cs]e\s+application",
                r"application\s+for\s+(?:a\s+)?licen[cs]e",
                r"licen[cs]ed\s+activit(?:y|ies)",
                r"proposed\s+activit(?:y|ies)",
                r"financial\s+services\s+permission",
                r"regulated\s+activit(?:y|ies)",
            ],
        ),
        (
            DocumentType::BusinessPlan,
            &[
                r"business\s+plan",
                r"executive\s+summary",
                r"market\s+analysis",
                r"target\s+market",
                r"competitive\s+(?:landscape|analysis)",
                r"growth\s+strategy",
            ],
        ),
        (
            DocumentType::FinancialProjections,
            &[
                r"financial\s+projections?",
                r"projected\s+revenue",
                r"cash\s+flow",
                r"profit\s+and\s+loss",
                r"balance\s+sheet",
                r"break.even",
            ],
        ),
        (
            DocumentType::ComplianceManual,
            &[
                r"compliance\s+manual",
                r"compliance\s+officer",
                r"money\s+laundering\s+reporting\s+officer",
                r"internal\s+controls?",
                r"reporting\s+obligations",
                r"monitoring\s+(?:programme|program)",
            ],
        ),
    ];

    table
        .iter()
        .map(|(document_type, list)| TypePatternSet {
            document_type: *document_type,
            patterns: patterns(list),
        })
        .collect()
}

fn clause(
    name: &str,
    patterns: &[&str],
    severity: Severity,
    reference: &str,
) -> ClauseRequirement {
    ClauseRequirement {
        name: name.to_string(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        severity,
        suggestion: None,
        reference: Some(reference.to_string()),
    }
}

fn default_required_clauses() -> Vec<ClauseRequirementSet> {
    vec![
        ClauseRequirementSet {
            document_type: DocumentType::ArticlesOfAssociation,
            clauses: vec![
                clause(
                    "Company Name",
                    &[r"company\s+name", r"name\s+of\s+the\s+company"],
                    Severity::High,
                    "ADGM Companies Regulations 2020, Art. 15",
                ),
                clause(
                    "Share Capital",
                    &[r"share\s+capital", r"authorized\s+capital"],
                    Severity::High,
                    "ADGM Companies Regulations 2020, Art. 25",
                ),
                clause(
                    "Directors Powers",
                    &[r"directors?\s+powers?", r"board\s+powers?"],
                    Severity::Medium,
                    "ADGM Companies Regulations 2020, Art. 45",
                ),
            ],
        },
        ClauseRequirementSet {
            document_type: DocumentType::MemorandumOfAssociation,
            clauses: vec![
                clause(
                    "Company Objects",
                    &[r"objects?\s+of\s+the\s+company", r"business\s+objects?"],
                    Severity::High,
                    "ADGM Companies Regulations 2020, Art. 12",
                ),
                clause(
                    "Liability Clause",
                    &[r"liability\s+of\s+members", r"limited\s+liability"],
                    Severity::High,
                    "ADGM Companies Regulations 2020, Art. 18",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_file_size_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.severity_weights.weight(Severity::Critical), 15);
        assert_eq!(
            config.requirements_for(ProcessType::CompanyIncorporation).len(),
            5
        );
        assert!(config.requirements_for(ProcessType::Other).is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            ambiguous_language_threshold = 5
            summary_issue_limit = 3

            [severity_weights]
            low = 2
            medium = 4
            high = 8
            critical = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.ambiguous_language_threshold, 5);
        assert_eq!(config.summary_issue_limit, 3);
        assert_eq!(config.severity_weights.weight(Severity::Low), 2);
        assert_eq!(config.type_confidence_threshold, 0.30);
        assert_eq!(config.type_patterns.len(), 15);
    }

    #[test]
    fn test_toml_tables_use_labels() {
        let config = EngineConfig::from_toml_str(
            r#"
            [[process_requirements]]
            process = "Employment Setup"
            documents = ["Employment Contract"]

            [[required_clauses]]
            document_type = "Employment Contract"

            [[required_clauses.clauses]]
            name = "Probation"
            patterns = ['probation(?:ary)?\s+period']
            severity = "Medium"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.requirements_for(ProcessType::EmploymentSetup),
            &[DocumentType::EmploymentContract]
        );
        assert_eq!(config.required_clauses[0].clauses[0].severity, Severity::Medium);
        assert_eq!(config.required_clauses[0].clauses[0].reference, None);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let err = EngineConfig::from_toml_str("type_confidence_threshold = 1.5").unwrap_err();
        assert!(format!("{err:#}").contains("type_confidence_threshold"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "recommendation_limit = 4\n").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.recommendation_limit, 4);

        assert!(EngineConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
