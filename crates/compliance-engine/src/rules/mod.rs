//! Compliance rule engine
//!
//! Each check is an independent pure function of the document text, its
//! type and its structure. The engine runs every check, in order, with no
//! short-circuiting; a check that errors or panics is logged and skipped
//! while the others still contribute.

pub mod clauses;
pub mod formatting;
pub mod jurisdiction;
pub mod red_flags;
pub mod registration;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use shared_types::{DocumentType, Issue, Severity, StructuredContent};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{ConfigError, RuleEngineError};

/// Inputs shared by every check
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub text: &'a str,
    pub document_type: DocumentType,
    pub structure: &'a StructuredContent,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        text: &'a str,
        document_type: DocumentType,
        structure: &'a StructuredContent,
    ) -> Self {
        Self {
            text,
            document_type,
            structure,
        }
    }

    /// Start an issue attributed to this document's type
    pub fn issue(&self, issue: impl Into<String>, severity: Severity) -> Issue {
        Issue::new(self.document_type.label(), issue, severity)
    }
}

pub trait ComplianceCheck: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError>;
}

pub struct RuleEngine {
    checks: Vec<Box<dyn ComplianceCheck>>,
}

impl RuleEngine {
    /// The standard check set, in reporting order
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_checks(vec![
            Box::new(jurisdiction::JurisdictionCheck),
            Box::new(clauses::RequiredClausesCheck::new(config)?),
            Box::new(formatting::FormattingCheck),
            Box::new(red_flags::AmbiguousLanguageCheck::new(
                config.ambiguous_language_threshold,
            )),
            Box::new(red_flags::EssentialInfoCheck),
            Box::new(red_flags::DateFormatCheck),
            Box::new(registration::RegistrationCheck),
        ]))
    }

    pub fn with_checks(checks: Vec<Box<dyn ComplianceCheck>>) -> Self {
        Self { checks }
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn run(&self, ctx: &CheckContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for check in &self.checks {
            match run_isolated(check.as_ref(), ctx) {
                Ok(found) => {
                    debug!("{}: {} issue(s)", check.name(), found.len());
                    issues.extend(found);
                }
                Err(e) => warn!("Skipping check for {}: {}", ctx.document_type, e),
            }
        }
        issues
    }
}

fn run_isolated(
    check: &dyn ComplianceCheck,
    ctx: &CheckContext<'_>,
) -> Result<Vec<Issue>, RuleEngineError> {
    match panic::catch_unwind(AssertUnwindSafe(|| check.check(ctx))) {
        Ok(result) => result,
        Err(payload) => Err(RuleEngineError::Panicked {
            check: check.name().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl ComplianceCheck for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
            Ok(vec![ctx.issue(self.0, Severity::Low)])
        }
    }

    struct Failing;

    impl ComplianceCheck for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn check(&self, _ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
            Err(RuleEngineError::CheckFailed {
                check: "failing".to_string(),
                message: "lookup table missing".to_string(),
            })
        }
    }

    struct Panicking;

    impl ComplianceCheck for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn check(&self, _ctx: &CheckContext<'_>) -> Result<Vec<Issue>, RuleEngineError> {
            panic!("index out of bounds")
        }
    }

    #[test]
    fn test_failures_do_not_suppress_other_checks() {
        let engine = RuleEngine::with_checks(vec![
            Box::new(Fixed("first")),
            Box::new(Failing),
            Box::new(Panicking),
            Box::new(Fixed("last")),
        ]);
        let structure = StructuredContent::default();
        let ctx = CheckContext::new("text", DocumentType::Other, &structure);

        let issues = engine.run(&ctx);
        let texts: Vec<_> = issues.iter().map(|i| i.issue.as_str()).collect();
        assert_eq!(texts, vec!["first", "last"]);
        assert_eq!(issues[0].document, "Other");
    }

    #[test]
    fn test_panic_is_reported_as_error() {
        let structure = StructuredContent::default();
        let ctx = CheckContext::new("", DocumentType::Other, &structure);
        let err = run_isolated(&Panicking, &ctx).unwrap_err();
        assert!(matches!(
            err,
            RuleEngineError::Panicked { ref message, .. } if message == "index out of bounds"
        ));
    }

    #[test]
    fn test_standard_check_order() {
        let engine = RuleEngine::new(&EngineConfig::default()).unwrap();
        assert_eq!(
            engine.check_names(),
            vec![
                "jurisdiction",
                "required_clauses",
                "formatting",
                "ambiguous_language",
                "essential_info",
                "date_format",
                "registration",
            ]
        );
    }
}
