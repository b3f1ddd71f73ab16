//! Optional advisory analysis
//!
//! An `AdvisoryAnalyzer` supplies issues beyond the deterministic rules,
//! typically from retrieval plus a language model. It is never required:
//! `AdvisoryGuard` bounds every call with a timeout and turns any failure
//! into an empty issue list.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::{AdvisoryStatus, DocumentType, Issue};
use tracing::{debug, warn};

use crate::error::AdvisoryError;

pub trait AdvisoryAnalyzer: Send + Sync {
    fn analyze(&self, text: &str, document_type: DocumentType) -> Result<Vec<Issue>, AdvisoryError>;

    fn identify_red_flags(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<Vec<Issue>, AdvisoryError>;
}

/// A ranked passage of reference material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSnippet {
    pub source: String,
    pub text: String,
    pub score: f64,
}

/// Reference material lookup used by advisory analyzers
pub trait ReferenceStore: Send + Sync {
    /// Up to `k` snippets, best first
    fn search(&self, query: &str, k: usize) -> Vec<ReferenceSnippet>;
}

pub struct AdvisoryGuard {
    analyzer: Option<Arc<dyn AdvisoryAnalyzer>>,
    timeout: Duration,
}

impl AdvisoryGuard {
    pub fn disabled() -> Self {
        Self {
            analyzer: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn new(analyzer: Arc<dyn AdvisoryAnalyzer>, timeout: Duration) -> Self {
        Self {
            analyzer: Some(analyzer),
            timeout,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Advisory issues for one document and how the call went.
    /// Never fails: errors and timeouts yield no issues and `Skipped`.
    pub fn run(&self, text: &str, document_type: DocumentType) -> (Vec<Issue>, AdvisoryStatus) {
        let Some(analyzer) = &self.analyzer else {
            return (Vec::new(), AdvisoryStatus::Disabled);
        };

        match call_with_timeout(Arc::clone(analyzer), text.to_string(), document_type, self.timeout)
        {
            Ok(issues) => {
                debug!("Advisory analysis for {}: {} issue(s)", document_type, issues.len());
                let count = issues.len();
                (issues, AdvisoryStatus::Completed { issues: count })
            }
            Err(e) => {
                warn!("Advisory analysis skipped for {}: {}", document_type, e);
                (
                    Vec::new(),
                    AdvisoryStatus::Skipped {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }
}

fn call_with_timeout(
    analyzer: Arc<dyn AdvisoryAnalyzer>,
    text: String,
    document_type: DocumentType,
    timeout: Duration,
) -> Result<Vec<Issue>, AdvisoryError> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("advisory".to_string())
        .spawn(move || {
            let result = analyzer.analyze(&text, document_type).and_then(|mut issues| {
                issues.extend(analyzer.identify_red_flags(&text, document_type)?);
                Ok(issues)
            });
            // receiver is gone after a timeout
            let _ = tx.send(result);
        })
        .map_err(|e| AdvisoryError::Unavailable(e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            Err(AdvisoryError::Timeout(timeout.as_millis() as u64))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(AdvisoryError::Unavailable(
            "advisory worker stopped without a result".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::Severity;

    struct Canned;

    impl AdvisoryAnalyzer for Canned {
        fn analyze(&self, _: &str, document_type: DocumentType) -> Result<Vec<Issue>, AdvisoryError> {
            Ok(vec![Issue::new(document_type.label(), "Unusual indemnity", Severity::Medium)])
        }

        fn identify_red_flags(&self, _: &str, document_type: DocumentType) -> Result<Vec<Issue>, AdvisoryError> {
            Ok(vec![Issue::new(document_type.label(), "Unlimited liability", Severity::High)])
        }
    }

    struct Slow;

    impl AdvisoryAnalyzer for Slow {
        fn analyze(&self, _: &str, _: DocumentType) -> Result<Vec<Issue>, AdvisoryError> {
            thread::sleep(Duration::from_millis(500));
            Ok(Vec::new())
        }

        fn identify_red_flags(&self, _: &str, _: DocumentType) -> Result<Vec<Issue>, AdvisoryError> {
            Ok(Vec::new())
        }
    }

    struct Broken;

    impl AdvisoryAnalyzer for Broken {
        fn analyze(&self, _: &str, _: DocumentType) -> Result<Vec<Issue>, AdvisoryError> {
            Err(AdvisoryError::MalformedResponse("expected JSON".to_string()))
        }

        fn identify_red_flags(&self, _: &str, _: DocumentType) -> Result<Vec<Issue>, AdvisoryError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_disabled_guard() {
        let (issues, status) = AdvisoryGuard::disabled().run("text", DocumentType::Other);
        assert!(issues.is_empty());
        assert_eq!(status, AdvisoryStatus::Disabled);
    }

    #[test]
    fn test_completed_collects_both_calls() {
        let guard = AdvisoryGuard::new(Arc::new(Canned), Duration::from_secs(5));
        let (issues, status) = guard.run("text", DocumentType::CommercialAgreement);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].issue, "Unlimited liability");
        assert_eq!(status, AdvisoryStatus::Completed { issues: 2 });
    }

    #[test]
    fn test_timeout_is_skipped() {
        let guard = AdvisoryGuard::new(Arc::new(Slow), Duration::from_millis(20));
        let (issues, status) = guard.run("text", DocumentType::Other);
        assert!(issues.is_empty());
        assert!(matches!(status, AdvisoryStatus::Skipped { ref reason } if reason.contains("timed out")));
    }

    #[test]
    fn test_error_is_skipped() {
        let guard = AdvisoryGuard::new(Arc::new(Broken), Duration::from_secs(5));
        let (issues, status) = guard.run("text", DocumentType::Other);
        assert!(issues.is_empty());
        assert!(matches!(status, AdvisoryStatus::Skipped { .. }));
    }
}
