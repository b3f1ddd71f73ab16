//! Document ingestion
//!
//! Turns a DOCX container into plain text plus a `StructuredContent`
//! bundle. Section, clause and signature positions are indices into the
//! body paragraph sequence of the original document, empty paragraphs
//! included.

use std::fs;
use std::path::Path;

use shared_docx::{read_docx, Block, DocxError, FlowDocument, ReadLimits};
use shared_types::{
    ClauseEntry, DocumentMetadata, SectionEntry, SignatureBlock, StructuredContent, TableGrid,
};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::IngestionError;
use crate::patterns::{CLAUSE_NUMBER, NUMBERED_HEADING, SIGNATURE_LINE};

const SUPPORTED_EXTENSION: &str = "docx";

/// A named container as handed to the engine
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// An ingested document. Never modified after ingestion; annotation works
/// on a clone of `flow`.
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub name: String,
    /// Non-empty paragraph and cell texts, trimmed, one per line
    pub text: String,
    pub word_count: usize,
    pub structure: StructuredContent,
    pub metadata: DocumentMetadata,
    pub flow: FlowDocument,
}

impl IngestedDocument {
    /// Build from an in-memory document without touching a container
    pub fn from_flow(name: impl Into<String>, flow: FlowDocument) -> Self {
        let text = plain_text(&flow);
        let word_count = text.split_whitespace().count();
        let structure = extract_structure(&flow);
        let metadata = flow.properties.clone();
        Self {
            name: name.into(),
            text,
            word_count,
            structure,
            metadata,
            flow,
        }
    }
}

pub struct Ingestor {
    limits: ReadLimits,
}

impl Ingestor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            limits: ReadLimits {
                max_bytes: config.max_file_size_bytes(),
            },
        }
    }

    pub fn ingest(&self, input: &DocumentInput) -> Result<IngestedDocument, IngestionError> {
        check_extension(&input.name)?;
        self.check_size(input.bytes.len() as u64)?;

        let flow = read_docx(&input.bytes, &self.limits).map_err(|e| match e {
            DocxError::TooLarge { size, limit } => IngestionError::TooLarge { size, limit },
            other => IngestionError::Corrupt(other),
        })?;

        let doc = IngestedDocument::from_flow(&input.name, flow);
        info!(
            "Ingested {}: {} words, {} sections, {} tables",
            doc.name,
            doc.word_count,
            doc.structure.sections.len(),
            doc.structure.tables.len()
        );
        Ok(doc)
    }

    /// Read and ingest a file, checking its size before loading it
    pub fn ingest_path(&self, path: &Path) -> Result<IngestedDocument, IngestionError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        check_extension(&name)?;
        self.check_size(fs::metadata(path)?.len())?;

        debug!("Reading {}", path.display());
        let bytes = fs::read(path)?;
        self.ingest(&DocumentInput::new(name, bytes))
    }

    fn check_size(&self, size: u64) -> Result<(), IngestionError> {
        if size > self.limits.max_bytes {
            return Err(IngestionError::TooLarge {
                size,
                limit: self.limits.max_bytes,
            });
        }
        Ok(())
    }
}

fn check_extension(name: &str) -> Result<(), IngestionError> {
    let supported = Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION))
        .unwrap_or(false);
    if supported {
        Ok(())
    } else {
        Err(IngestionError::UnsupportedFormat(name.to_string()))
    }
}

/// Paragraph and table-cell texts in body order, trimmed, empties dropped,
/// each with the index of the body paragraph it came from
fn text_pieces(flow: &FlowDocument) -> Vec<(String, Option<usize>)> {
    let mut pieces = Vec::new();
    let mut paragraph_index = 0;
    for block in &flow.body {
        match block {
            Block::Paragraph(p) => {
                let text = p.text();
                let text = text.trim();
                if !text.is_empty() {
                    pieces.push((text.to_string(), Some(paragraph_index)));
                }
                paragraph_index += 1;
            }
            Block::Table(t) => {
                for cell in t.rows.iter().flatten() {
                    let cell = cell.trim();
                    if !cell.is_empty() {
                        pieces.push((cell.to_string(), None));
                    }
                }
            }
        }
    }
    pieces
}

/// Paragraph and table-cell texts in body order, trimmed, empties dropped
pub fn plain_text(flow: &FlowDocument) -> String {
    text_pieces(flow)
        .into_iter()
        .map(|(text, _)| text)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn extract_structure(flow: &FlowDocument) -> StructuredContent {
    let mut structure = StructuredContent::default();

    // a piece spans as many plain-text lines as it holds line breaks
    structure.line_paragraphs = text_pieces(flow)
        .iter()
        .flat_map(|(text, origin)| text.split('\n').map(move |_| *origin))
        .collect();

    for (position, paragraph) in flow.paragraphs().enumerate() {
        let raw = paragraph.text();
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        let numbered = NUMBERED_HEADING.is_match(text);
        let emphasized = paragraph.is_emphasized();
        if numbered || emphasized {
            structure.sections.push(SectionEntry {
                position,
                text: text.to_string(),
                numbered,
                emphasized,
            });
        }

        if let Some(caps) = CLAUSE_NUMBER.captures(text) {
            structure.clauses.push(ClauseEntry {
                position,
                text: text.to_string(),
                clause_number: caps[1].to_string(),
            });
        }

        if SIGNATURE_LINE.is_match(text) {
            structure.signatures.push(SignatureBlock {
                position,
                text: text.to_string(),
            });
        }
    }

    for (index, table) in flow.tables().enumerate() {
        let cells: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.trim().to_string()).collect())
            .collect();
        structure.tables.push(TableGrid {
            index,
            rows: table.row_count(),
            cols: table.column_count(),
            cells,
        });
    }

    structure
}
