//! DOCX writing: `FlowDocument` -> ZIP package
//!
//! Documents read from a container are written back into a copy of that
//! container with only the main document part regenerated.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use shared_types::DocumentMetadata;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::DocxError;
use crate::model::{Block, FlowDocument, Paragraph, Run, Table};
use crate::reader::DEFAULT_MAIN_PART;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// Serialize a flow document into a DOCX container
pub fn write_docx(doc: &FlowDocument) -> Result<Vec<u8>, DocxError> {
    let document_xml = render_document(doc);

    let parts: Vec<(String, Vec<u8>)> = match doc.source() {
        Some(source) => source
            .parts
            .iter()
            .map(|(name, data)| {
                if *name == source.main_part {
                    (name.clone(), document_xml.clone().into_bytes())
                } else {
                    (name.clone(), data.clone())
                }
            })
            .collect(),
        None => vec![
            ("[Content_Types].xml".to_string(), CONTENT_TYPES.as_bytes().to_vec()),
            ("_rels/.rels".to_string(), ROOT_RELS.as_bytes().to_vec()),
            (
                "docProps/core.xml".to_string(),
                render_core_properties(&doc.properties).into_bytes(),
            ),
            (DEFAULT_MAIN_PART.to_string(), document_xml.into_bytes()),
        ],
    };

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in &parts {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(data)?;
    }
    let bytes = zip.finish()?.into_inner();

    debug!("Wrote {} parts ({} bytes)", parts.len(), bytes.len());
    Ok(bytes)
}

/// Render the main document part.
///
/// A document read from a container is laid back into the markup it came
/// from: source blocks land between their original gaps, new blocks are
/// written where they sit in the body.
pub(crate) fn render_document(doc: &FlowDocument) -> String {
    let mut out = String::with_capacity(4096);

    let Some(layout) = doc.source().map(|s| &s.layout) else {
        out.push_str(XML_DECLARATION);
        out.push_str(&format!(r#"<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}">"#));
        out.push_str("<w:body>");
        for block in &doc.body {
            write_block(&mut out, block);
        }
        out.push_str("</w:body></w:document>");
        return out;
    };

    out.push_str(&layout.head);
    let mut next_gap = 0;
    for block in &doc.body {
        if let Some(origin) = block.origin() {
            while next_gap <= origin && next_gap < layout.gaps.len() {
                out.push_str(&layout.gaps[next_gap]);
                next_gap += 1;
            }
        }
        write_block(&mut out, block);
    }
    for gap in &layout.gaps[next_gap..] {
        out.push_str(gap);
    }
    out.push_str(&layout.tail);
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(p) => match p.current_markup() {
            Some(markup) => out.push_str(&markup.xml),
            None => write_paragraph(out, p),
        },
        Block::Table(t) => write_table(out, t),
    }
}

fn write_paragraph(out: &mut String, p: &Paragraph) {
    out.push_str("<w:p>");

    if p.style.is_some() || p.numbering.is_some() || p.indent_left.is_some() {
        out.push_str("<w:pPr>");
        if let Some(style) = &p.style {
            out.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape(style.as_str())));
        }
        if let Some(n) = p.numbering {
            out.push_str(&format!(
                r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
                n.level, n.num_id
            ));
        }
        if let Some(left) = p.indent_left {
            out.push_str(&format!(r#"<w:ind w:left="{left}"/>"#));
        }
        out.push_str("</w:pPr>");
    }

    for run in &p.runs {
        write_run(out, run);
    }
    out.push_str("</w:p>");
}

fn write_run(out: &mut String, run: &Run) {
    out.push_str("<w:r>");

    let has_props = run.bold
        || run.italic
        || run.color.is_some()
        || run.size_half_points.is_some()
        || run.highlight.is_some();
    if has_props {
        out.push_str("<w:rPr>");
        if run.bold {
            out.push_str("<w:b/>");
        }
        if run.italic {
            out.push_str("<w:i/>");
        }
        if let Some(color) = &run.color {
            out.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape(color.as_str())));
        }
        if let Some(size) = run.size_half_points {
            out.push_str(&format!(r#"<w:sz w:val="{size}"/>"#));
        }
        if let Some(highlight) = &run.highlight {
            out.push_str(&format!(
                r#"<w:highlight w:val="{}"/>"#,
                escape(highlight.as_str())
            ));
        }
        out.push_str("</w:rPr>");
    }

    write_run_text(out, &run.text);
    out.push_str("</w:r>");
}

/// Run content for `text`: `w:t` pieces with `w:br` for line breaks and
/// `w:tab` for tabs
pub(crate) fn write_run_text(out: &mut String, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        for (j, piece) in line.split('\t').enumerate() {
            if j > 0 {
                out.push_str("<w:tab/>");
            }
            if !piece.is_empty() {
                out.push_str(r#"<w:t xml:space="preserve">"#);
                out.push_str(&escape(piece));
                out.push_str("</w:t>");
            }
        }
    }
}

fn write_table(out: &mut String, table: &Table) {
    if let Some(raw) = &table.raw_xml {
        out.push_str(raw);
        return;
    }

    out.push_str("<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr><w:tblGrid>");
    for _ in 0..table.column_count() {
        out.push_str("<w:gridCol/>");
    }
    out.push_str("</w:tblGrid>");
    for row in &table.rows {
        out.push_str("<w:tr>");
        for cell in row {
            out.push_str("<w:tc>");
            for line in cell.split('\n') {
                write_paragraph(out, &Paragraph::new(line));
            }
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
}

fn render_core_properties(meta: &DocumentMetadata) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push_str(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    );
    let fields = [
        ("dc:title", &meta.title, ""),
        ("dc:subject", &meta.subject, ""),
        ("dc:creator", &meta.author, ""),
        ("cp:category", &meta.category, ""),
        ("cp:lastModifiedBy", &meta.last_modified_by, ""),
        ("cp:revision", &meta.revision, ""),
        ("dcterms:created", &meta.created, r#" xsi:type="dcterms:W3CDTF""#),
        ("dcterms:modified", &meta.modified, r#" xsi:type="dcterms:W3CDTF""#),
    ];
    for (tag, value, extra) in fields {
        if let Some(value) = value {
            out.push_str(&format!("<{tag}{extra}>{}</{tag}>", escape(value.as_str())));
        }
    }
    out.push_str("</cp:coreProperties>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_text_escapes_and_breaks() {
        let mut out = String::new();
        write_run(&mut out, &Run::plain("A & B\nnext\tcol"));
        assert_eq!(
            out,
            r#"<w:r><w:t xml:space="preserve">A &amp; B</w:t><w:br/><w:t xml:space="preserve">next</w:t><w:tab/><w:t xml:space="preserve">col</w:t></w:r>"#
        );
    }

    #[test]
    fn test_run_properties_order() {
        let mut out = String::new();
        let mut run = Run::plain("x")
            .with_bold(true)
            .with_italic(true)
            .with_color("CC0000")
            .with_size(18);
        run.highlight = Some("yellow".to_string());
        write_run(&mut out, &run);
        assert!(out.contains(
            r#"<w:rPr><w:b/><w:i/><w:color w:val="CC0000"/><w:sz w:val="18"/><w:highlight w:val="yellow"/></w:rPr>"#
        ));
    }

    #[test]
    fn test_fresh_document_has_default_root() {
        let doc = FlowDocument::from_paragraphs(vec![Paragraph::new("Hello")]);
        let xml = render_document(&doc);
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(W_NS));
        assert!(xml.ends_with("</w:body></w:document>"));
    }
}
