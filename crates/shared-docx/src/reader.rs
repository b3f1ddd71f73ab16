//! DOCX reading: ZIP package -> `FlowDocument`

use std::io::{Cursor, Read};
use std::ops::Range;
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use shared_types::DocumentMetadata;
use tracing::debug;

use crate::error::DocxError;
use crate::model::{
    Block, BodyLayout, FlowDocument, ListNumbering, Paragraph, Run, RunMarkup, SourceMarkup,
    SourcePackage, Table,
};

pub const DEFAULT_MAIN_PART: &str = "word/document.xml";
const CORE_PART: &str = "docProps/core.xml";
const ROOT_RELS_PART: &str = "_rels/.rels";

/// Upper bounds applied while opening a container
#[derive(Debug, Clone, Copy)]
pub struct ReadLimits {
    /// Largest accepted container, and largest accepted uncompressed part
    pub max_bytes: u64,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Read a DOCX container into a flow document
pub fn read_docx(bytes: &[u8], limits: &ReadLimits) -> Result<FlowDocument, DocxError> {
    let size = bytes.len() as u64;
    if size > limits.max_bytes {
        return Err(DocxError::TooLarge {
            size,
            limit: limits.max_bytes,
        });
    }

    let parts = read_parts(bytes, limits)?;
    let main_part = locate_main_part(&parts)?;
    let xml = part_text(&parts, &main_part)?
        .ok_or_else(|| DocxError::MissingPart(main_part.clone()))?;

    let body = parse_body(&xml, &main_part)?;
    let properties = match part_text(&parts, CORE_PART)? {
        Some(core) => parse_core_properties(&core)?,
        None => DocumentMetadata::default(),
    };

    debug!(
        "Read {} body blocks from {} ({} parts)",
        body.blocks.len(),
        main_part,
        parts.len()
    );

    Ok(FlowDocument {
        body: body.blocks,
        properties,
        source: Some(Arc::new(SourcePackage {
            parts,
            main_part,
            layout: body.layout,
        })),
    })
}

fn read_parts(bytes: &[u8], limits: &ReadLimits) -> Result<Vec<(String, Vec<u8>)>, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut parts = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        if file.size() > limits.max_bytes {
            return Err(DocxError::TooLarge {
                size: file.size(),
                limit: limits.max_bytes,
            });
        }
        let name = file.name().to_string();
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        parts.push((name, data));
    }

    Ok(parts)
}

fn part_text(parts: &[(String, Vec<u8>)], name: &str) -> Result<Option<String>, DocxError> {
    match parts.iter().find(|(n, _)| n == name) {
        Some((_, data)) => String::from_utf8(data.clone())
            .map(Some)
            .map_err(|_| DocxError::Encoding(name.to_string())),
        None => Ok(None),
    }
}

/// Resolve the main document part through the package relationships,
/// falling back to the conventional location
fn locate_main_part(parts: &[(String, Vec<u8>)]) -> Result<String, DocxError> {
    if let Some(rels) = part_text(parts, ROOT_RELS_PART)? {
        let mut reader = Reader::from_str(&rels);
        loop {
            match reader
                .read_event()
                .map_err(|e| DocxError::xml(ROOT_RELS_PART, e))?
            {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                    let kind = attr(&e, "Type", ROOT_RELS_PART)?.unwrap_or_default();
                    if kind.ends_with("/officeDocument") {
                        if let Some(target) = attr(&e, "Target", ROOT_RELS_PART)? {
                            return Ok(target.trim_start_matches('/').to_string());
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
    }

    if parts.iter().any(|(n, _)| n == DEFAULT_MAIN_PART) {
        Ok(DEFAULT_MAIN_PART.to_string())
    } else {
        Err(DocxError::MissingPart(DEFAULT_MAIN_PART.to_string()))
    }
}

fn attr(e: &BytesStart<'_>, name: &str, part: &str) -> Result<Option<String>, DocxError> {
    match e
        .try_get_attribute(name)
        .map_err(|err| DocxError::xml(part, err))?
    {
        Some(a) => Ok(Some(
            a.unescape_value()
                .map_err(|err| DocxError::xml(part, err))?
                .into_owned(),
        )),
        None => Ok(None),
    }
}

/// `<w:b/>` is on; `<w:b w:val="0"/>` and friends are off
fn toggle(e: &BytesStart<'_>, part: &str) -> Result<bool, DocxError> {
    Ok(!matches!(
        attr(e, "w:val", part)?.as_deref(),
        Some("0") | Some("false") | Some("off") | Some("none")
    ))
}

pub(crate) struct ParsedBody {
    pub blocks: Vec<Block>,
    pub layout: BodyLayout,
}

#[derive(Default)]
struct TableBuilder {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
}

/// Run markup positions, absolute in the scanned part
#[derive(Default)]
struct RunScan {
    start: usize,
    open_tag: Range<usize>,
    props_start: usize,
    props: Option<Range<usize>>,
    plain: bool,
}

#[derive(Default)]
struct BodyState {
    blocks: Vec<Block>,
    /// Source span of each entry in `blocks`
    spans: Vec<Range<usize>>,
    body_open: Option<Range<usize>>,
    body_close: Option<usize>,

    paragraph: Option<Paragraph>,
    paragraph_start: usize,
    nested_paragraphs: usize,
    numbering: Option<ListNumbering>,
    in_paragraph_props: bool,
    run_markups: Vec<RunMarkup>,

    run: Option<Run>,
    run_scan: RunScan,
    run_props_depth: usize,
    in_text: bool,

    table_depth: usize,
    table_start: usize,
    table: Option<TableBuilder>,
}

impl BodyState {
    fn in_run_props(&self) -> bool {
        self.run_props_depth == 1
    }

    /// Run content that survives re-serialization as plain text
    fn is_plain_run_child(e: &BytesStart<'_>, part: &str) -> Result<bool, DocxError> {
        Ok(match e.name().as_ref() {
            b"w:rPr" | b"w:t" | b"w:tab" | b"w:cr" | b"w:lastRenderedPageBreak" => true,
            b"w:br" => matches!(
                attr(e, "w:type", part)?.as_deref(),
                None | Some("textWrapping")
            ),
            _ => false,
        })
    }

    fn open(
        &mut self,
        e: &BytesStart<'_>,
        start: usize,
        end: usize,
        part: &str,
    ) -> Result<(), DocxError> {
        if self.run.is_some()
            && self.run_props_depth == 0
            && self.run_scan.plain
            && !Self::is_plain_run_child(e, part)?
        {
            self.run_scan.plain = false;
        }

        let name = e.name();
        match name.as_ref() {
            b"w:body" => self.body_open = Some(start..end),
            b"w:tbl" if self.paragraph.is_none() => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table_start = start;
                    self.table = Some(TableBuilder::default());
                }
            }
            b"w:tr" if self.table_depth == 1 && self.paragraph.is_none() => {
                if let Some(t) = self.table.as_mut() {
                    t.row = Vec::new();
                }
            }
            b"w:tc" if self.table_depth == 1 && self.paragraph.is_none() => {
                if let Some(t) = self.table.as_mut() {
                    t.cell = Vec::new();
                }
            }
            b"w:p" => {
                if self.paragraph.is_some() {
                    self.nested_paragraphs += 1;
                } else {
                    self.paragraph = Some(Paragraph::default());
                    self.paragraph_start = start;
                    self.numbering = None;
                    self.run_markups.clear();
                }
            }
            _ if self.nested_paragraphs > 0 => {}
            b"w:pPr" if self.paragraph.is_some() && self.run.is_none() => {
                self.in_paragraph_props = true;
            }
            b"w:pStyle" if self.in_paragraph_props => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.style = attr(e, "w:val", part)?;
                }
            }
            b"w:ilvl" if self.in_paragraph_props => {
                let level = attr(e, "w:val", part)?
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                let n = self.numbering.get_or_insert(ListNumbering {
                    num_id: 0,
                    level: 0,
                });
                n.level = level;
            }
            b"w:numId" if self.in_paragraph_props => {
                let num_id = attr(e, "w:val", part)?
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                let n = self.numbering.get_or_insert(ListNumbering {
                    num_id: 0,
                    level: 0,
                });
                n.num_id = num_id;
            }
            b"w:ind" if self.in_paragraph_props => {
                let left = match attr(e, "w:left", part)? {
                    Some(v) => Some(v),
                    None => attr(e, "w:start", part)?,
                };
                if let Some(p) = self.paragraph.as_mut() {
                    p.indent_left = left.and_then(|v| v.parse().ok());
                }
            }
            b"w:r" if self.paragraph.is_some() && self.run.is_none() => {
                self.run = Some(Run::default());
                self.run_scan = RunScan {
                    start,
                    open_tag: start..end,
                    plain: true,
                    ..Default::default()
                };
            }
            b"w:rPr" if self.run.is_some() => {
                if self.run_props_depth == 0 {
                    self.run_scan.props_start = start;
                }
                self.run_props_depth += 1;
            }
            b"w:b" if self.in_run_props() => {
                let on = toggle(e, part)?;
                if let Some(r) = self.run.as_mut() {
                    r.bold = on;
                }
            }
            b"w:i" if self.in_run_props() => {
                let on = toggle(e, part)?;
                if let Some(r) = self.run.as_mut() {
                    r.italic = on;
                }
            }
            b"w:color" if self.in_run_props() => {
                let color = attr(e, "w:val", part)?.filter(|c| c != "auto");
                if let Some(r) = self.run.as_mut() {
                    r.color = color;
                }
            }
            b"w:highlight" if self.in_run_props() => {
                let color = attr(e, "w:val", part)?.filter(|c| c != "none");
                if let Some(r) = self.run.as_mut() {
                    r.highlight = color;
                }
            }
            b"w:sz" if self.in_run_props() => {
                let size = attr(e, "w:val", part)?.and_then(|v| v.parse().ok());
                if let Some(r) = self.run.as_mut() {
                    r.size_half_points = size;
                }
            }
            b"w:t" if self.run.is_some() => self.in_text = true,
            b"w:tab" if self.run_props_depth == 0 => {
                if let Some(r) = self.run.as_mut() {
                    r.text.push('\t');
                }
            }
            b"w:br" | b"w:cr" => {
                if let Some(r) = self.run.as_mut() {
                    r.text.push('\n');
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8], start: usize, end: usize, xml: &str) {
        match name {
            b"w:body" => self.body_close = Some(start),
            b"w:p" => {
                if self.nested_paragraphs > 0 {
                    self.nested_paragraphs -= 1;
                    return;
                }
                if let Some(mut p) = self.paragraph.take() {
                    p.numbering = self.numbering.take();
                    self.in_paragraph_props = false;
                    if self.table_depth > 0 {
                        if let Some(t) = self.table.as_mut() {
                            t.cell.push(p.text());
                        }
                    } else {
                        let span = self.paragraph_start..end;
                        p.markup = Some(Arc::new(SourceMarkup {
                            xml: xml[span.clone()].to_string(),
                            runs: std::mem::take(&mut self.run_markups),
                            read_as: p.clone(),
                        }));
                        p.origin = Some(self.blocks.len());
                        self.blocks.push(Block::Paragraph(p));
                        self.spans.push(span);
                    }
                }
            }
            _ if self.nested_paragraphs > 0 => {}
            b"w:t" => self.in_text = false,
            b"w:rPr" => {
                if self.run.is_some() && self.run_props_depth > 0 {
                    self.run_props_depth -= 1;
                    if self.run_props_depth == 0 {
                        self.run_scan.props = Some(self.run_scan.props_start..end);
                    }
                }
            }
            b"w:pPr" => self.in_paragraph_props = false,
            b"w:r" => {
                if let (Some(run), Some(p)) = (self.run.take(), self.paragraph.as_mut()) {
                    p.runs.push(run);
                    let base = self.paragraph_start;
                    let scan = std::mem::take(&mut self.run_scan);
                    let shift = |r: Range<usize>| r.start - base..r.end - base;
                    self.run_markups.push(RunMarkup {
                        span: scan.start - base..end - base,
                        open_tag: shift(scan.open_tag),
                        props: scan.props.map(shift),
                        plain: scan.plain,
                    });
                }
                self.run_props_depth = 0;
            }
            b"w:tc" if self.table_depth == 1 && self.paragraph.is_none() => {
                if let Some(t) = self.table.as_mut() {
                    let cell = std::mem::take(&mut t.cell).join("\n");
                    t.row.push(cell);
                }
            }
            b"w:tr" if self.table_depth == 1 && self.paragraph.is_none() => {
                if let Some(t) = self.table.as_mut() {
                    let row = std::mem::take(&mut t.row);
                    t.rows.push(row);
                }
            }
            b"w:tbl" if self.paragraph.is_none() => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    if let Some(t) = self.table.take() {
                        let span = self.table_start..end;
                        self.blocks.push(Block::Table(Table {
                            rows: t.rows,
                            raw_xml: Some(xml[span.clone()].to_string()),
                            origin: Some(self.blocks.len()),
                        }));
                        self.spans.push(span);
                    }
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.in_text && self.nested_paragraphs == 0 {
            if let Some(r) = self.run.as_mut() {
                r.text.push_str(text);
            }
        }
    }
}

fn scan(xml: &str, part: &str) -> Result<BodyState, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut state = BodyState::default();

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| DocxError::xml(part, e))?;
        let end = reader.buffer_position() as usize;
        match event {
            Event::Start(e) => state.open(&e, start, end, part)?,
            Event::Empty(e) => {
                state.open(&e, start, end, part)?;
                state.close(e.name().as_ref(), start, end, xml);
            }
            Event::End(e) => state.close(e.name().as_ref(), start, end, xml),
            Event::Text(t) if state.in_text => {
                let text = t.unescape().map_err(|e| DocxError::xml(part, e))?;
                state.push_text(&text);
            }
            Event::CData(t) if state.in_text => {
                state.push_text(&String::from_utf8_lossy(&t));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(state)
}

/// Parse the main document part into body blocks and the markup around them
pub(crate) fn parse_body(xml: &str, part: &str) -> Result<ParsedBody, DocxError> {
    let state = scan(xml, part)?;
    let body_open = state
        .body_open
        .ok_or_else(|| DocxError::xml(part, "document has no w:body"))?;

    // `<w:body/>` has no content to sit between
    let (head, tail_prefix) = match state.body_close {
        Some(close) if close >= body_open.end => (xml[..body_open.end].to_string(), ""),
        _ => (format!("{}<w:body>", &xml[..body_open.start]), "</w:body>"),
    };

    let mut gaps = Vec::with_capacity(state.spans.len());
    let mut cursor = body_open.end;
    for span in &state.spans {
        gaps.push(xml[cursor..span.start].to_string());
        cursor = span.end;
    }
    let tail = format!("{}{}", tail_prefix, &xml[cursor..]);

    Ok(ParsedBody {
        blocks: state.blocks,
        layout: BodyLayout { head, gaps, tail },
    })
}

/// Parse a single `w:p` element
pub(crate) fn parse_paragraph(xml: &str) -> Result<Paragraph, DocxError> {
    let state = scan(xml, "w:p")?;
    let mut blocks = state.blocks.into_iter();
    match (blocks.next(), blocks.next()) {
        (Some(Block::Paragraph(mut p)), None) => {
            p.origin = None;
            Ok(p)
        }
        _ => Err(DocxError::InvalidEdit(
            "edited markup is not a single paragraph".to_string(),
        )),
    }
}

fn parse_core_properties(xml: &str) -> Result<DocumentMetadata, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut meta = DocumentMetadata::default();
    let mut current: Option<Vec<u8>> = None;

    loop {
        match reader
            .read_event()
            .map_err(|e| DocxError::xml(CORE_PART, e))?
        {
            Event::Start(e) => current = Some(e.local_name().as_ref().to_vec()),
            Event::End(_) => current = None,
            Event::Text(t) => {
                let Some(field) = current.as_deref() else {
                    continue;
                };
                let value = t
                    .unescape()
                    .map_err(|e| DocxError::xml(CORE_PART, e))?
                    .trim()
                    .to_string();
                if value.is_empty() {
                    continue;
                }
                let slot = match field {
                    b"title" => &mut meta.title,
                    b"creator" => &mut meta.author,
                    b"subject" => &mut meta.subject,
                    b"category" => &mut meta.category,
                    b"lastModifiedBy" => &mut meta.last_modified_by,
                    b"revision" => &mut meta.revision,
                    b"created" => &mut meta.created,
                    b"modified" => &mut meta.modified,
                    _ => continue,
                };
                *slot = Some(value);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>1. Definitions</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Disputes &amp; claims </w:t></w:r><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>go to ADGM Courts</w:t></w:r></w:p>
<w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="4"/></w:numPr><w:ind w:left="720"/></w:pPr><w:r><w:t>Listed</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Shares</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p><w:r><w:t>A. Member</w:t></w:r></w:p><w:p><w:r><w:t>Line two</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>100</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p/>
<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>
</w:body></w:document>"#;

    #[test]
    fn test_parse_paragraphs_runs_and_flags() {
        let body = parse_body(BODY, DEFAULT_MAIN_PART).unwrap();
        let paragraphs: Vec<_> = body
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p),
                _ => None,
            })
            .collect();

        assert_eq!(paragraphs.len(), 4);
        assert_eq!(paragraphs[0].text(), "1. Definitions");
        assert!(paragraphs[0].is_emphasized());
        assert_eq!(paragraphs[0].style.as_deref(), Some("Heading1"));
        assert_eq!(paragraphs[1].text(), "Disputes & claims go to ADGM Courts");
        assert!(!paragraphs[1].is_emphasized());
        assert_eq!(
            paragraphs[2].numbering,
            Some(ListNumbering {
                num_id: 4,
                level: 1
            })
        );
        assert_eq!(paragraphs[2].indent_left, Some(720));
        assert_eq!(paragraphs[3].text(), "");
    }

    #[test]
    fn test_parse_table_cells_in_body_order() {
        let body = parse_body(BODY, DEFAULT_MAIN_PART).unwrap();
        let table = body
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .unwrap();

        assert_eq!(
            table.rows,
            vec![
                vec!["Name".to_string(), "Shares".to_string()],
                vec!["A. Member\nLine two".to_string(), "100".to_string()],
            ]
        );
        assert!(matches!(body.blocks[3], Block::Table(_)));
        let raw = table.raw_xml.as_deref().unwrap();
        assert!(raw.starts_with("<w:tbl>") && raw.ends_with("</w:tbl>"));
    }

    #[test]
    fn test_layout_reassembles_part() {
        let body = parse_body(BODY, DEFAULT_MAIN_PART).unwrap();
        assert!(body.layout.head.ends_with("<w:body>"));
        assert_eq!(body.layout.gaps.len(), body.blocks.len());
        assert!(body
            .layout
            .tail
            .starts_with("\n<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/></w:sectPr>"));

        let mut rebuilt = body.layout.head.clone();
        for (gap, block) in body.layout.gaps.iter().zip(&body.blocks) {
            rebuilt.push_str(gap);
            match block {
                Block::Paragraph(p) => rebuilt.push_str(&p.markup.as_ref().unwrap().xml),
                Block::Table(t) => rebuilt.push_str(t.raw_xml.as_deref().unwrap()),
            }
        }
        rebuilt.push_str(&body.layout.tail);
        assert_eq!(rebuilt, BODY);
    }

    #[test]
    fn test_run_markup_marks_plain_runs() {
        let xml = r#"<w:p><w:r w:rsidR="00A1"><w:rPr><w:u w:val="single"/></w:rPr><w:t>Text</w:t></w:r><w:r><w:drawing><wp:inline/></w:drawing></w:r><w:r><w:br w:type="page"/></w:r><w:r><w:t>a</w:t><w:br/><w:t>b</w:t></w:r></w:p>"#;
        let p = parse_paragraph(xml).unwrap();
        let markup = p.markup.as_ref().unwrap();

        assert_eq!(p.text(), "Text\na\nb");
        let plain: Vec<_> = markup.runs.iter().map(|r| r.plain).collect();
        assert_eq!(plain, vec![true, false, false, true]);

        let first = &markup.runs[0];
        assert_eq!(&xml[first.open_tag.clone()], r#"<w:r w:rsidR="00A1">"#);
        assert_eq!(
            &xml[first.props.clone().unwrap()],
            r#"<w:rPr><w:u w:val="single"/></w:rPr>"#
        );
        assert!(p.keeps_source_markup());
    }

    #[test]
    fn test_text_box_paragraphs_stay_inside_their_run() {
        let xml = r#"<w:p><w:r><w:t>Outer</w:t></w:r><w:r><w:drawing><w:txbxContent><w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:txbxContent></w:drawing></w:r></w:p>"#;
        let p = parse_paragraph(xml).unwrap();
        assert_eq!(p.text(), "Outer");
        assert_eq!(p.runs.len(), 2);
    }

    #[test]
    fn test_core_properties() {
        let xml = r#"<cp:coreProperties xmlns:cp="x" xmlns:dc="y" xmlns:dcterms="z">
<dc:title>Articles</dc:title><dc:creator>Registry Desk</dc:creator><cp:revision>3</cp:revision>
<dcterms:created>2024-01-02T00:00:00Z</dcterms:created></cp:coreProperties>"#;
        let meta = parse_core_properties(xml).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Articles"));
        assert_eq!(meta.author.as_deref(), Some("Registry Desk"));
        assert_eq!(meta.revision.as_deref(), Some("3"));
        assert_eq!(meta.created.as_deref(), Some("2024-01-02T00:00:00Z"));
        assert_eq!(meta.subject, None);
    }

    #[test]
    fn test_rejects_oversized_container() {
        let limits = ReadLimits { max_bytes: 4 };
        let err = read_docx(b"0123456789", &limits).unwrap_err();
        assert!(matches!(err, DocxError::TooLarge { size: 10, limit: 4 }));
    }

    #[test]
    fn test_rejects_non_zip() {
        let err = read_docx(b"plain text, not a container", &ReadLimits::default()).unwrap_err();
        assert!(matches!(err, DocxError::Archive(_)));
    }
}
