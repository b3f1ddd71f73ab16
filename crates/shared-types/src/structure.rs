//! Structured view of an ingested document
//!
//! Every `position` is the index of a body paragraph in the source document,
//! counting empty paragraphs, so it stays valid for the unmodified original.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredContent {
    pub sections: Vec<SectionEntry>,
    pub clauses: Vec<ClauseEntry>,
    pub tables: Vec<TableGrid>,
    pub signatures: Vec<SignatureBlock>,
    /// Body paragraph behind each line of the plain text; `None` for lines
    /// taken from table cells
    #[serde(default)]
    pub line_paragraphs: Vec<Option<usize>>,
}

impl StructuredContent {
    pub fn paragraph_of_line(&self, line: usize) -> Option<usize> {
        self.line_paragraphs.get(line).copied().flatten()
    }
}

/// A heading-like paragraph: numbered ("3. Directors") or emphasized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub position: usize,
    pub text: String,
    pub numbered: bool,
    pub emphasized: bool,
}

/// A paragraph opening with a clause number such as "4.2"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseEntry {
    pub position: usize,
    pub text: String,
    pub clause_number: String,
}

/// Row-major grid of cell text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGrid {
    pub index: usize,
    pub cells: Vec<Vec<String>>,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureBlock {
    pub position: usize,
    pub text: String,
}

/// Core properties carried by the container, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub category: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}
