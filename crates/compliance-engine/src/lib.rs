//! ADGM corporate document compliance engine
//!
//! Ingests DOCX documents, classifies them, identifies the filing process
//! they belong to, runs the compliance rules, scores the result and
//! produces an annotated copy of every document.

pub mod advisory;
pub mod annotate;
pub mod classifier;
pub mod config;
pub mod error;
pub mod ingest;
pub mod patterns;
pub mod pipeline;
pub mod process;
pub mod render;
pub mod rules;
pub mod scoring;

use std::sync::Arc;

use shared_docx::{FlowDocument, Paragraph};
use shared_types::{DocumentType, Issue};

pub use advisory::{AdvisoryAnalyzer, AdvisoryGuard, ReferenceSnippet, ReferenceStore};
pub use annotate::{Annotation, Annotator, CommentInsertion};
pub use classifier::{Classification, TypeClassifier};
pub use config::EngineConfig;
pub use error::{
    AdvisoryError, AnnotationError, ConfigError, IngestionError, PipelineError, RuleEngineError,
};
pub use ingest::{DocumentInput, IngestedDocument, Ingestor};
pub use pipeline::{AnnotatedDocument, BatchOutcome};
pub use process::ProcessIdentifier;
pub use rules::{CheckContext, ComplianceCheck, RuleEngine};

/// ComplianceEngine entry point
///
/// Built once from an immutable `EngineConfig`; every pattern table is
/// compiled here.
pub struct ComplianceEngine {
    config: EngineConfig,
    ingestor: Ingestor,
    classifier: TypeClassifier,
    process: ProcessIdentifier,
    rules: RuleEngine,
    annotator: Annotator,
    advisory: AdvisoryGuard,
}

impl ComplianceEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ingestor: Ingestor::new(&config),
            classifier: TypeClassifier::new(&config)?,
            process: ProcessIdentifier::new(&config),
            rules: RuleEngine::new(&config)?,
            annotator: Annotator::new(&config),
            advisory: AdvisoryGuard::disabled(),
            config,
        })
    }

    /// Consult `analyzer` for every document, bounded by the configured timeout
    pub fn with_advisor(mut self, analyzer: Arc<dyn AdvisoryAnalyzer>) -> Self {
        self.advisory = AdvisoryGuard::new(analyzer, self.config.advisory_timeout());
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    pub fn classify(&self, text: &str) -> Classification {
        self.classifier.classify(text)
    }

    /// Rule-engine issues for plain text, one paragraph per line,
    /// deduplicated. No advisory call is made.
    pub fn check_text(&self, text: &str, document_type: DocumentType) -> Vec<Issue> {
        let doc = IngestedDocument::from_flow(
            "text",
            FlowDocument::from_paragraphs(text.lines().map(Paragraph::new)),
        );
        let ctx = CheckContext::new(&doc.text, document_type, &doc.structure);
        scoring::deduplicate(self.rules.run(&ctx))
    }
}
