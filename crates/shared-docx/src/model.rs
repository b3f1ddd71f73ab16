//! In-memory flow document
//!
//! A document is an ordered body of paragraphs and tables. Paragraph indices
//! count body-level paragraphs only (tables are skipped), which is the
//! coordinate system used by ingestion and annotation.

use std::ops::Range;
use std::sync::Arc;

use shared_types::DocumentMetadata;

use crate::error::DocxError;
use crate::markup;
use crate::reader;

/// Highlight colour name as used by WordprocessingML (`w:highlight`)
pub const HIGHLIGHT_YELLOW: &str = "yellow";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Hex RGB without '#', e.g. "CC0000"
    pub color: Option<String>,
    pub highlight: Option<String>,
    pub size_half_points: Option<u32>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_size(mut self, half_points: u32) -> Self {
        self.size_half_points = Some(half_points);
        self
    }

    fn with_text(&self, text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..self.clone()
        }
    }
}

/// List numbering reference (`w:numPr`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNumbering {
    pub num_id: u32,
    pub level: u32,
}

/// Where a run sits inside its paragraph's source markup. Ranges are byte
/// offsets into `SourceMarkup::xml`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunMarkup {
    pub span: Range<usize>,
    pub open_tag: Range<usize>,
    /// Top-level `w:rPr` of the run
    pub props: Option<Range<usize>>,
    /// Holds nothing but text, tabs, line breaks and properties, so it can
    /// be split and re-serialized without loss
    pub plain: bool,
}

/// The `w:p` element a paragraph was read from
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceMarkup {
    pub xml: String,
    /// One entry per run of `read_as`
    pub runs: Vec<RunMarkup>,
    /// Paragraph content at read time; the markup stands for the paragraph
    /// only while its content still matches
    pub read_as: Paragraph,
}

/// A body paragraph.
///
/// Paragraphs read from a container keep their original `w:p` markup. The
/// writer emits that markup verbatim (drawings, hyperlinks, fields, layout
/// and all) as long as `runs`, `style`, `numbering` and `indent_left` still
/// equal what was read; [`Paragraph::highlighted`] edits the markup itself.
/// Any other change makes the writer re-serialize the paragraph from the
/// model fields alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub style: Option<String>,
    pub numbering: Option<ListNumbering>,
    /// Left indent in twentieths of a point
    pub indent_left: Option<u32>,
    pub(crate) markup: Option<Arc<SourceMarkup>>,
    /// Position among the body blocks of the source document
    pub(crate) origin: Option<usize>,
}

impl Paragraph {
    /// Paragraph with a single unformatted run
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_runs(vec![Run::plain(text)])
    }

    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    pub fn with_indent(mut self, twips: u32) -> Self {
        self.indent_left = Some(twips);
        self
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when any run is bold
    pub fn is_emphasized(&self) -> bool {
        self.runs.iter().any(|r| r.bold)
    }

    fn same_content(&self, other: &Paragraph) -> bool {
        self.runs == other.runs
            && self.style == other.style
            && self.numbering == other.numbering
            && self.indent_left == other.indent_left
    }

    /// Source markup, if it still describes this paragraph
    pub(crate) fn current_markup(&self) -> Option<&SourceMarkup> {
        self.markup
            .as_deref()
            .filter(|m| m.read_as.same_content(self))
    }

    /// True when the writer will emit the markup this paragraph was read from
    pub fn keeps_source_markup(&self) -> bool {
        self.current_markup().is_some()
    }

    /// Mark the byte range `range` of `self.text()` with a highlight colour.
    ///
    /// Runs crossing the range boundaries are split; every piece keeps the
    /// formatting of the run it came from, so the paragraph text is unchanged.
    /// For a paragraph read from a container the edit is made on its source
    /// markup: split pieces copy the original run properties, and runs that
    /// carry more than text (drawings, fields, page breaks) are highlighted
    /// whole instead of being split.
    pub fn highlighted(&self, range: Range<usize>, color: &str) -> Result<Paragraph, DocxError> {
        let text = self.text();
        if range.start >= range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return Err(DocxError::InvalidEdit(format!(
                "highlight range {}..{} does not fit paragraph of {} bytes",
                range.start,
                range.end,
                text.len()
            )));
        }

        if let Some(source) = self.current_markup() {
            let xml = markup::highlight(source, range, color)?;
            let mut marked = reader::parse_paragraph(&xml)?;
            marked.origin = self.origin;
            return Ok(marked);
        }

        let mut runs = Vec::with_capacity(self.runs.len() + 2);
        let mut offset = 0;
        for run in &self.runs {
            let run_start = offset;
            let run_end = offset + run.text.len();
            offset = run_end;

            let start = range.start.clamp(run_start, run_end);
            let end = range.end.clamp(run_start, run_end);
            if start == end {
                runs.push(run.clone());
                continue;
            }

            let (before, rest) = run.text.split_at(start - run_start);
            let (middle, after) = rest.split_at(end - start);
            if !before.is_empty() {
                runs.push(run.with_text(before));
            }
            let mut marked = run.with_text(middle);
            marked.highlight = Some(color.to_string());
            runs.push(marked);
            if !after.is_empty() {
                runs.push(run.with_text(after));
            }
        }

        Ok(Paragraph {
            runs,
            markup: None,
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Row-major cell text; multi-paragraph cells are joined with '\n'
    pub rows: Vec<Vec<String>>,
    /// Original `w:tbl` markup, written back verbatim when present
    pub(crate) raw_xml: Option<String>,
    pub(crate) origin: Option<usize>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            raw_xml: None,
            origin: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    pub(crate) fn origin(&self) -> Option<usize> {
        match self {
            Block::Paragraph(p) => p.origin,
            Block::Table(t) => t.origin,
        }
    }
}

/// Main-part markup around the body blocks of a source document.
///
/// `head` runs up to the body content, `gaps[k]` is everything between
/// source block `k - 1` and block `k` (body-level bookmarks, content control
/// wrappers), and `tail` holds the rest, final section properties included.
/// Concatenating head, gaps interleaved with the blocks, and tail gives back
/// the original part.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BodyLayout {
    pub head: String,
    pub gaps: Vec<String>,
    pub tail: String,
}

/// Parts of the container a document was read from
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePackage {
    pub(crate) parts: Vec<(String, Vec<u8>)>,
    pub(crate) main_part: String,
    pub(crate) layout: BodyLayout,
}

impl SourcePackage {
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowDocument {
    pub body: Vec<Block>,
    pub properties: DocumentMetadata,
    pub(crate) source: Option<Arc<SourcePackage>>,
}

impl FlowDocument {
    pub fn from_blocks(body: Vec<Block>) -> Self {
        Self {
            body,
            ..Default::default()
        }
    }

    pub fn from_paragraphs(paragraphs: impl IntoIterator<Item = Paragraph>) -> Self {
        Self::from_blocks(paragraphs.into_iter().map(Block::Paragraph).collect())
    }

    pub fn source(&self) -> Option<&SourcePackage> {
        self.source.as_deref()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs().nth(index)
    }

    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs().map(|p| p.text()).collect()
    }

    fn body_index(&self, index: usize) -> Result<usize, DocxError> {
        self.body
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Paragraph(_)))
            .nth(index)
            .map(|(i, _)| i)
            .ok_or_else(|| DocxError::ParagraphOutOfRange {
                index,
                count: self.paragraph_count(),
            })
    }

    /// Put `paragraph` in the slot of paragraph `index`; it takes over that
    /// slot's place in the source layout
    pub fn replace_paragraph(
        &mut self,
        index: usize,
        mut paragraph: Paragraph,
    ) -> Result<(), DocxError> {
        let at = self.body_index(index)?;
        paragraph.origin = self.body[at].origin();
        self.body[at] = Block::Paragraph(paragraph);
        Ok(())
    }

    pub fn insert_paragraph_after(
        &mut self,
        index: usize,
        mut paragraph: Paragraph,
    ) -> Result<(), DocxError> {
        let at = self.body_index(index)?;
        paragraph.origin = None;
        self.body.insert(at + 1, Block::Paragraph(paragraph));
        Ok(())
    }

    /// Insert `paragraphs`, in order, ahead of the first paragraph (or at the
    /// start of the body when there are no paragraphs)
    pub fn insert_before_first_paragraph(&mut self, paragraphs: Vec<Paragraph>) {
        let at = self.body_index(0).unwrap_or(0);
        let tail = self.body.split_off(at);
        self.body.extend(paragraphs.into_iter().map(|mut p| {
            p.origin = None;
            Block::Paragraph(p)
        }));
        self.body.extend(tail);
    }
}
