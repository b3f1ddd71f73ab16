use regex::Regex;
use shared_types::{DocumentType, Issue, Severity};

use super::{CheckContext, ComplianceCheck};
use crate::config::EngineConfig;
use crate::error::{ConfigError, RuleEngineError};
use crate::patterns::compile_all;

struct CompiledClause {
    name: String,
    patterns: Vec<Regex>,
    severity: Severity,
    suggestion: Option<String>,
    reference: Option<String>,
}

/// Per-type required clauses; one issue for each clause none of whose
/// alternative patterns occur
pub struct RequiredClausesCheck {
    tables: Vec<(DocumentType, Vec<CompiledClause>)>,
}

impl RequiredClausesCheck {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let mut tables = Vec::with_capacity(config.required_clauses.len());
        for set in &config.required_clauses {
            let mut clauses = Vec::with_capacity(set.clauses.len());
            for clause in &set.clauses {
                clauses.push(CompiledClause {
                    name: clause.name.clone(),
                    patterns: compile_all("required_clauses", &clause.patterns)?,
                    severity: clause.severity,
                    suggestion: clause.suggestion.clone(),
                    reference: clause.reference.clone(),
                });
            }
            tables.push((set.document_type, clauses));
        }
        Ok(Self { tables })
    }
}

impl ComplianceCheck for RequiredClausesCheck {
    fn name(&self) -> &str {
        "required_clauses"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
        let clauses = self
            .tables
            .iter()
            .filter(|(document_type, _)| *document_type == ctx.document_type)
            .flat_map(|(_, clauses)| clauses.iter());

        let issues = clauses
            .filter(|clause| !clause.patterns.iter().any(|re| re.is_match(ctx.text)))
            .map(|clause| {
                ctx.issue(
                    format!("Missing required clause: {}", clause.name),
                    clause.severity,
                )
                .with_section(clause.name.as_str())
                .with_suggestion(
                    clause
                        .suggestion
                        .clone()
                        .unwrap_or_else(|| format!("Add {} clause", clause.name)),
                )
                .with_reference(
                    clause
                        .reference
                        .clone()
                        .unwrap_or_else(|| "ADGM Regulations".to_string()),
                )
            })
            .collect();

        Ok(issues)
    }
}
