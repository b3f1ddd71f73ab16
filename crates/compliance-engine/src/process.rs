//! Process identification and checklist completeness

use shared_types::{Completeness, DocumentType, ProcessIdentification, ProcessType};
use tracing::info;

use crate::config::{DocumentAlias, EngineConfig, ProcessRequirement};

pub struct ProcessIdentifier {
    requirements: Vec<ProcessRequirement>,
    aliases: Vec<DocumentAlias>,
    threshold: f64,
}

impl ProcessIdentifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            requirements: config.process_requirements.clone(),
            aliases: config
                .document_aliases
                .iter()
                .map(|a| DocumentAlias {
                    requirement: a.requirement.to_lowercase(),
                    accepts: a.accepts.iter().map(|s| s.to_lowercase()).collect(),
                })
                .collect(),
            threshold: config.process_confidence_threshold,
        }
    }

    /// Pick the process whose checklist is best covered by `uploaded`
    pub fn identify(&self, uploaded: &[DocumentType]) -> ProcessIdentification {
        let mut best = ProcessIdentification {
            process: ProcessType::Other,
            confidence: 0.0,
        };

        for requirement in &self.requirements {
            if requirement.documents.is_empty() {
                continue;
            }
            let present = requirement
                .documents
                .iter()
                .filter(|required| self.is_present(**required, uploaded))
                .count();
            let score = present as f64 / requirement.documents.len() as f64;
            if score > best.confidence {
                best = ProcessIdentification {
                    process: requirement.process,
                    confidence: score,
                };
            }
        }

        if best.confidence >= self.threshold && best.confidence > 0.0 {
            info!(
                "Identified process {} ({:.0}% of checklist)",
                best.process,
                best.confidence * 100.0
            );
            best
        } else {
            info!("No process identified (best coverage {:.2})", best.confidence);
            ProcessIdentification {
                process: ProcessType::Other,
                confidence: 0.0,
            }
        }
    }

    pub fn completeness(&self, uploaded: &[DocumentType], process: ProcessType) -> Completeness {
        let required: &[DocumentType] = self
            .requirements
            .iter()
            .find(|r| r.process == process)
            .map(|r| r.documents.as_slice())
            .unwrap_or(&[]);

        let (present_documents, missing_documents): (Vec<DocumentType>, Vec<DocumentType>) =
            required
                .iter()
                .partition(|required| self.is_present(**required, uploaded));

        let total_required = required.len();
        let total_present = present_documents.len();
        let completeness_percentage = if total_required == 0 {
            100.0
        } else {
            total_present as f64 / total_required as f64 * 100.0
        };

        Completeness {
            process,
            total_required,
            total_uploaded: uploaded.len(),
            total_present,
            completeness_percentage,
            is_complete: missing_documents.is_empty(),
            present_documents,
            missing_documents,
        }
    }

    fn is_present(&self, required: DocumentType, uploaded: &[DocumentType]) -> bool {
        uploaded
            .iter()
            .any(|u| self.documents_match(required.label(), u.label()))
    }

    /// Whether an uploaded document name satisfies a required document name.
    ///
    /// Exact (case-insensitive) names always match. Otherwise the first alias
    /// entry whose key occurs in the required name decides.
    pub fn documents_match(&self, required: &str, uploaded: &str) -> bool {
        let required = required.trim().to_lowercase();
        let uploaded = uploaded.trim().to_lowercase();

        if required == uploaded {
            return true;
        }

        self.aliases
            .iter()
            .find(|alias| required.contains(alias.requirement.as_str()))
            .map(|alias| alias.accepts.iter().any(|a| uploaded.contains(a.as_str())))
            .unwrap_or(false)
    }
}
