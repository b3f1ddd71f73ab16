//! Serializable analysis results for one batch of documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::structure::DocumentMetadata;
use crate::types::{DocumentType, Issue, ProcessGuidance, ProcessType, SeverityCounts};

/// Whether the document's type was recognized with enough certainty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Recognized,
    #[serde(rename = "Needs Review")]
    NeedsReview,
}

impl ReviewStatus {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.5 {
            ReviewStatus::Recognized
        } else {
            ReviewStatus::NeedsReview
        }
    }
}

/// Outcome of the optional advisory analysis for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AdvisoryStatus {
    /// No advisory analyzer configured
    Disabled,
    Completed { issues: usize },
    /// Timed out or failed; rule-engine issues only
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub name: String,
    pub document_type: DocumentType,
    pub type_confidence: f64,
    pub status: ReviewStatus,
    pub word_count: usize,
    pub compliance_score: f64,
    pub issues: Vec<Issue>,
    pub advisory: AdvisoryStatus,
    /// Comment paragraphs placed in the annotated copy
    pub comments_inserted: usize,
    pub metadata: DocumentMetadata,
}

impl DocumentAnalysis {
    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::from_issues(&self.issues)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessIdentification {
    pub process: ProcessType,
    pub confidence: f64,
}

/// Checklist coverage of the identified process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completeness {
    pub process: ProcessType,
    pub total_required: usize,
    pub total_uploaded: usize,
    pub total_present: usize,
    pub completeness_percentage: f64,
    pub present_documents: Vec<DocumentType>,
    pub missing_documents: Vec<DocumentType>,
    pub is_complete: bool,
}

/// A file that could not be ingested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedDocument {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub generated_at: DateTime<Utc>,
    pub process: ProcessIdentification,
    pub completeness: Completeness,
    pub guidance: ProcessGuidance,
    pub documents: Vec<DocumentAnalysis>,
    pub rejected: Vec<RejectedDocument>,
    pub overall_score: f64,
    pub recommendations: Vec<String>,
}

impl ComplianceReport {
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.documents.iter().flat_map(|d| d.issues.iter())
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::from_issues(self.all_issues())
    }

    pub fn average_document_score(&self) -> f64 {
        if self.documents.is_empty() {
            return 0.0;
        }
        let total: f64 = self.documents.iter().map(|d| d.compliance_score).sum();
        total / self.documents.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_status_threshold() {
        assert_eq!(ReviewStatus::from_confidence(0.51), ReviewStatus::Recognized);
        assert_eq!(ReviewStatus::from_confidence(0.5), ReviewStatus::NeedsReview);
    }

    #[test]
    fn test_advisory_status_tagging() {
        let json = serde_json::to_string(&AdvisoryStatus::Skipped {
            reason: "timeout".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"state":"skipped","reason":"timeout"}"#);
    }
}
