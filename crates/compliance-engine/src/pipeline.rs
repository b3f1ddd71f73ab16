//! Batch analysis
//!
//! Ingest and classify every document, identify the process from the
//! classified batch, then check, score and annotate each document on its
//! own. Per-document stages run on the rayon pool; output order follows
//! input order.

use std::collections::HashSet;

use chrono::Utc;
use rayon::prelude::*;
use shared_docx::{write_docx, DocxError, FlowDocument};
use shared_types::{
    ComplianceReport, Completeness, DocumentAnalysis, ProcessType, RejectedDocument,
    ReviewStatus, Severity, SeverityCounts,
};
use tracing::{info, warn};

use crate::classifier::Classification;
use crate::error::PipelineError;
use crate::ingest::{DocumentInput, IngestedDocument};
use crate::rules::CheckContext;
use crate::scoring::{aggregate_score, compliance_score, deduplicate};
use crate::ComplianceEngine;

/// Reviewed copy of one input document
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    pub name: String,
    /// `reviewed_<name>`, made unique within the batch
    pub output_name: String,
    pub document: FlowDocument,
}

impl AnnotatedDocument {
    pub fn to_docx(&self) -> Result<Vec<u8>, DocxError> {
        write_docx(&self.document)
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub report: ComplianceReport,
    pub annotated: Vec<AnnotatedDocument>,
}

impl ComplianceEngine {
    /// Analyze a batch of containers. Fails only when none can be ingested;
    /// the others are listed in the report as rejected.
    pub fn analyze_batch(&self, inputs: &[DocumentInput]) -> Result<BatchOutcome, PipelineError> {
        let results: Vec<_> = inputs
            .par_iter()
            .map(|input| self.ingestor.ingest(input))
            .collect();

        let mut documents = Vec::new();
        let mut rejected = Vec::new();
        for (input, result) in inputs.iter().zip(results) {
            match result {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    warn!("Rejected {}: {}", input.name, e);
                    rejected.push(RejectedDocument {
                        name: input.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.analyze_ingested(documents, rejected)
    }

    /// Analyze documents that are already ingested
    pub fn analyze_ingested(
        &self,
        documents: Vec<IngestedDocument>,
        rejected: Vec<RejectedDocument>,
    ) -> Result<BatchOutcome, PipelineError> {
        if documents.is_empty() {
            return Err(PipelineError::NoDocuments { rejected });
        }

        let classifications: Vec<Classification> = documents
            .par_iter()
            .map(|doc| {
                let classification = self.classifier.classify(&doc.text);
                info!(
                    "Classified {} as {} ({:.2})",
                    doc.name, classification.document_type, classification.confidence
                );
                classification
            })
            .collect();

        let types: Vec<_> = classifications.iter().map(|c| c.document_type).collect();
        let process = self.process.identify(&types);
        let completeness = self.process.completeness(&types, process.process);

        let (analyses, mut annotated): (Vec<_>, Vec<AnnotatedDocument>) = documents
            .par_iter()
            .zip(classifications.par_iter())
            .map(|(doc, classification)| self.analyze_document(doc, *classification))
            .unzip();

        let output_names = unique_output_names(annotated.iter().map(|a| a.name.as_str()));
        for (doc, output_name) in annotated.iter_mut().zip(output_names) {
            if doc.output_name != output_name {
                warn!(
                    "{} is already taken in this batch, writing {} instead",
                    doc.output_name, output_name
                );
                doc.output_name = output_name;
            }
        }

        let overall_score = aggregate_score(
            &analyses
                .iter()
                .map(|a| (a.compliance_score, a.word_count))
                .collect::<Vec<_>>(),
        );
        let recommendations = recommendations(
            &completeness,
            &SeverityCounts::from_issues(analyses.iter().flat_map(|a| a.issues.iter())),
            overall_score,
            self.config.recommendation_limit,
        );

        info!(
            "Batch done: {} analyzed, {} rejected, overall score {:.1}",
            analyses.len(),
            rejected.len(),
            overall_score
        );

        Ok(BatchOutcome {
            report: ComplianceReport {
                generated_at: Utc::now(),
                process,
                guidance: process.process.guidance(),
                completeness,
                documents: analyses,
                rejected,
                overall_score,
                recommendations,
            },
            annotated,
        })
    }

    fn analyze_document(
        &self,
        doc: &IngestedDocument,
        classification: Classification,
    ) -> (DocumentAnalysis, AnnotatedDocument) {
        let document_type = classification.document_type;
        let ctx = CheckContext::new(&doc.text, document_type, &doc.structure);

        let mut issues = self.rules.run(&ctx);
        let (advisory_issues, advisory) = self.advisory.run(&doc.text, document_type);
        issues.extend(advisory_issues);
        let issues = deduplicate(issues);

        let score = compliance_score(&issues, doc.word_count, &self.config.severity_weights);
        let annotation = self.annotator.annotate(&doc.flow, &issues);
        info!(
            "{}: {} issue(s), score {:.1}, {} comment(s)",
            doc.name,
            issues.len(),
            score,
            annotation.comments_inserted
        );

        let analysis = DocumentAnalysis {
            name: doc.name.clone(),
            document_type,
            type_confidence: classification.confidence,
            status: ReviewStatus::from_confidence(classification.confidence),
            word_count: doc.word_count,
            compliance_score: score,
            issues,
            advisory,
            comments_inserted: annotation.comments_inserted,
            metadata: doc.metadata.clone(),
        };
        let annotated = AnnotatedDocument {
            name: doc.name.clone(),
            output_name: format!("reviewed_{}", doc.name),
            document: annotation.document,
        };
        (analysis, annotated)
    }
}

/// `reviewed_<name>` per input, with `_2`, `_3`, ... ahead of the extension
/// when the name is already taken. Names differing only in case collide.
fn unique_output_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let (stem, extension) = match name.rfind('.') {
                Some(dot) if dot > 0 => name.split_at(dot),
                _ => (name, ""),
            };
            let mut candidate = format!("reviewed_{name}");
            let mut n = 2;
            while !taken.insert(candidate.to_lowercase()) {
                candidate = format!("reviewed_{stem}_{n}{extension}");
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Batch-level advice, most pressing first
pub fn recommendations(
    completeness: &Completeness,
    counts: &SeverityCounts,
    overall_score: f64,
    limit: usize,
) -> Vec<String> {
    let mut out = Vec::new();

    if !completeness.is_complete {
        out.push(format!(
            "Missing {} required document(s) for {}",
            completeness.missing_documents.len(),
            completeness.process
        ));
        out.extend(
            completeness
                .missing_documents
                .iter()
                .take(3)
                .map(|doc| format!("Upload required document: {doc}")),
        );
    }

    let critical = counts.get(Severity::Critical);
    if critical > 0 {
        out.push(format!("Address {critical} critical compliance issue(s)"));
    }
    let high = counts.get(Severity::High);
    if high > 0 {
        out.push(format!("Review {high} high-priority issue(s)"));
    }

    out.push(
        if overall_score < 60.0 {
            "Overall compliance score is below 60% - significant improvements needed"
        } else if overall_score < 80.0 {
            "Overall compliance score could be improved - review flagged issues"
        } else {
            "Good overall compliance score - minor improvements recommended"
        }
        .to_string(),
    );

    if completeness.process == ProcessType::CompanyIncorporation {
        out.extend(
            [
                "Ensure all incorporation documents are properly executed",
                "Verify company name availability with ADGM Registration Authority",
                "Confirm registered office address is within ADGM jurisdiction",
            ]
            .map(String::from),
        );
    }

    out.truncate(limit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::DocumentType;

    fn completeness(missing: Vec<DocumentType>) -> Completeness {
        Completeness {
            process: ProcessType::CompanyIncorporation,
            total_required: 5,
            total_uploaded: 5 - missing.len(),
            total_present: 5 - missing.len(),
            completeness_percentage: (5 - missing.len()) as f64 * 20.0,
            is_complete: missing.is_empty(),
            present_documents: Vec::new(),
            missing_documents: missing,
        }
    }

    #[test]
    fn test_output_names_unique_per_batch() {
        let names = unique_output_names([
            "articles.docx",
            "ubo.docx",
            "articles.docx",
            "Articles.docx",
            "notes",
        ]);
        assert_eq!(
            names,
            vec![
                "reviewed_articles.docx",
                "reviewed_ubo.docx",
                "reviewed_articles_2.docx",
                "reviewed_Articles_3.docx",
                "reviewed_notes",
            ]
        );
    }

    #[test]
    fn test_recommendations_order_and_limit() {
        let missing = vec![
            DocumentType::UboDeclaration,
            DocumentType::RegisterOfMembersAndDirectors,
            DocumentType::BoardResolution,
            DocumentType::IncorporationApplication,
        ];
        let counts = SeverityCounts {
            critical: 0,
            high: 2,
            medium: 1,
            low: 0,
        };
        let recs = recommendations(&completeness(missing), &counts, 72.5, 10);
        assert_eq!(
            recs,
            vec![
                "Missing 4 required document(s) for Company Incorporation",
                "Upload required document: UBO Declaration Form",
                "Upload required document: Register of Members and Directors",
                "Upload required document: Board Resolution Templates",
                "Review 2 high-priority issue(s)",
                "Overall compliance score could be improved - review flagged issues",
                "Ensure all incorporation documents are properly executed",
                "Verify company name availability with ADGM Registration Authority",
                "Confirm registered office address is within ADGM jurisdiction",
            ]
        );

        let short = recommendations(&completeness(vec![]), &counts, 90.0, 2);
        assert_eq!(
            short,
            vec![
                "Review 2 high-priority issue(s)",
                "Good overall compliance score - minor improvements recommended",
            ]
        );
    }
}
