use shared_docx::DocxError;
use shared_types::RejectedDocument;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Unsupported file format: {0} (only .docx is accepted)")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("Corrupt or unreadable document: {0}")]
    Corrupt(#[from] DocxError),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RuleEngineError {
    #[error("Check '{check}' failed: {message}")]
    CheckFailed { check: String, message: String },

    #[error("Check '{check}' panicked: {message}")]
    Panicked { check: String, message: String },
}

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("No paragraph matches issue '{0}'")]
    NoTarget(String),

    #[error("Document edit failed: {0}")]
    Edit(#[from] DocxError),

    #[error("Invalid highlight pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("Advisory analysis timed out after {0} ms")]
    Timeout(u64),

    #[error("Advisory analyzer unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed advisory response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid pattern '{pattern}' in {table}: {source}")]
    InvalidPattern {
        table: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No documents could be ingested ({} rejected)", rejected.len())]
    NoDocuments { rejected: Vec<RejectedDocument> },
}
