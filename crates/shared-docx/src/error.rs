use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("Failed to open container: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("Missing container part: {0}")]
    MissingPart(String),

    #[error("Part {0} is not valid UTF-8")]
    Encoding(String),

    #[error("Container exceeds size limit ({size} > {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Paragraph {index} out of range ({count} paragraphs)")]
    ParagraphOutOfRange { index: usize, count: usize },

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocxError {
    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        DocxError::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}
