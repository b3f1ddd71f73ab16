pub mod report;
pub mod structure;
pub mod types;

pub use report::{
    AdvisoryStatus, ComplianceReport, Completeness, DocumentAnalysis, ProcessIdentification,
    RejectedDocument, ReviewStatus,
};
pub use structure::{
    ClauseEntry, DocumentMetadata, SectionEntry, SignatureBlock, StructuredContent, TableGrid,
};
pub use types::{
    CommentCategory, DocumentType, Issue, ProcessGuidance, ProcessType, Severity, SeverityCounts,
};
