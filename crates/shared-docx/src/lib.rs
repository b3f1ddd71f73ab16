//! Flow-document model and DOCX (OOXML) container codec
//!
//! Reads the body of a WordprocessingML package into paragraphs, runs and
//! tables, and writes an edited body back into the same package.

pub mod error;
mod markup;
pub mod model;
pub mod reader;
pub mod writer;

pub use error::DocxError;
pub use model::{
    Block, FlowDocument, ListNumbering, Paragraph, Run, SourcePackage, Table, HIGHLIGHT_YELLOW,
};
pub use reader::{read_docx, ReadLimits};
pub use writer::write_docx;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use shared_types::DocumentMetadata;

    fn sample() -> FlowDocument {
        let mut doc = FlowDocument::from_blocks(vec![
            Block::Paragraph(Paragraph::from_runs(vec![
                Run::plain("1. Share Capital").with_bold(true)
            ])),
            Block::Paragraph(Paragraph::new("The authorised capital is AED 150,000 & fixed.")),
            Block::Table(Table::new(vec![
                vec!["Member".to_string(), "Shares".to_string()],
                vec!["A. Holder".to_string(), "100".to_string()],
            ])),
            Block::Paragraph(Paragraph::default()),
            Block::Paragraph(Paragraph::new("Signed by the director").with_indent(720)),
        ]);
        doc.properties = DocumentMetadata {
            title: Some("Articles".to_string()),
            author: Some("Registry Desk".to_string()),
            ..Default::default()
        };
        doc
    }

    #[test]
    fn test_written_document_reads_back() {
        let doc = sample();
        let bytes = write_docx(&doc).unwrap();
        let back = read_docx(&bytes, &ReadLimits::default()).unwrap();

        assert_eq!(back.paragraph_texts(), doc.paragraph_texts());
        assert_eq!(back.properties, doc.properties);
        assert!(back.paragraph(0).unwrap().is_emphasized());
        assert_eq!(back.paragraph(3).unwrap().indent_left, Some(720));

        let table = back.tables().next().unwrap();
        assert_eq!(table.rows, doc.tables().next().unwrap().rows);
    }

    #[test]
    fn test_rewrite_keeps_package_parts_and_tables() {
        let first = read_docx(&write_docx(&sample()).unwrap(), &ReadLimits::default()).unwrap();

        let mut edited = first.clone();
        let marked = edited
            .paragraph(1)
            .unwrap()
            .highlighted(4..14, HIGHLIGHT_YELLOW)
            .unwrap();
        edited.replace_paragraph(1, marked).unwrap();
        edited
            .insert_paragraph_after(1, Paragraph::new("[note]"))
            .unwrap();

        let second = read_docx(&write_docx(&edited).unwrap(), &ReadLimits::default()).unwrap();

        let before: Vec<_> = first.source().unwrap().part_names().collect();
        let after: Vec<_> = second.source().unwrap().part_names().collect();
        assert_eq!(before, after);

        assert_eq!(second.paragraph_count(), first.paragraph_count() + 1);
        assert_eq!(second.paragraph(2).unwrap().text(), "[note]");
        let lit: Vec<_> = second
            .paragraph(1)
            .unwrap()
            .runs
            .iter()
            .filter(|r| r.highlight.as_deref() == Some(HIGHLIGHT_YELLOW))
            .map(|r| r.text.clone())
            .collect();
        assert_eq!(lit, vec!["authorised".to_string()]);
        assert_eq!(
            second.tables().next().unwrap().rows,
            first.tables().next().unwrap().rows
        );
    }

    #[test]
    fn test_part_size_limit() {
        let bytes = write_docx(&sample()).unwrap();
        let limits = ReadLimits {
            max_bytes: bytes.len() as u64,
        };
        assert!(read_docx(&bytes, &limits).is_ok());

        let tiny = ReadLimits { max_bytes: 64 };
        assert!(matches!(
            read_docx(&bytes, &tiny),
            Err(DocxError::TooLarge { .. })
        ));
    }

    const RICH_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><w:body><w:bookmarkStart w:id="0" w:name="top"/><w:p w:rsidR="00B2"><w:pPr><w:jc w:val="center"/><w:spacing w:after="240"/></w:pPr><w:r><w:rPr><w:rFonts w:ascii="Georgia"/><w:u w:val="single"/></w:rPr><w:t xml:space="preserve">Annual Title</w:t></w:r><w:r><w:drawing><wp:inline><wp:extent cx="914400" cy="914400"/><a:graphic><a:graphicData uri="pic"><a:blip r:embed="rId7"/></a:graphicData></a:graphic></wp:inline></w:drawing></w:r><w:hyperlink r:id="rId5"><w:r><w:t>link</w:t></w:r></w:hyperlink><w:r><w:br w:type="page"/></w:r></w:p><w:bookmarkEnd w:id="0"/><w:sdt><w:sdtPr><w:alias w:val="Clause"/></w:sdtPr><w:sdtContent><w:p><w:pPr><w:pStyle w:val="Body"/><w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:pPr><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r><w:r><w:fldChar w:fldCharType="end"/></w:r><w:r><w:t>Governed by ADGM law</w:t></w:r></w:p></w:sdtContent></w:sdt><w:sectPr><w:pgSz w:w="11906" w:h="16838" w:orient="portrait"/></w:sectPr></w:body></w:document>"#;

    fn rich_container() -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let parts: [(&str, &[u8]); 4] = [
            ("[Content_Types].xml", b"<Types/>"),
            (
                "_rels/.rels",
                br#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#,
            ),
            ("word/document.xml", RICH_BODY.as_bytes()),
            ("word/media/image1.png", &[0x89, b'P', b'N', b'G']),
        ];
        for (name, data) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_untouched_document_is_written_back_verbatim() {
        let doc = read_docx(&rich_container(), &ReadLimits::default()).unwrap();
        assert_eq!(
            doc.paragraph_texts(),
            vec!["Annual Titlelink\n", "Governed by ADGM law"]
        );
        assert_eq!(writer::render_document(&doc), RICH_BODY);
    }

    #[test]
    fn test_highlight_and_insert_keep_source_formatting() {
        let mut doc = read_docx(&rich_container(), &ReadLimits::default()).unwrap();
        let target = doc.paragraph(0).unwrap();
        let start = target.text().find("Title").unwrap();
        let marked = target
            .highlighted(start..start + "Titlelink".len(), HIGHLIGHT_YELLOW)
            .unwrap();
        assert!(marked.keeps_source_markup());
        doc.replace_paragraph(0, marked).unwrap();
        doc.insert_paragraph_after(0, Paragraph::new("[note]")).unwrap();
        doc.insert_before_first_paragraph(vec![Paragraph::new("Summary")]);

        let xml = writer::render_document(&doc);
        for kept in [
            r#"<w:p w:rsidR="00B2"><w:pPr><w:jc w:val="center"/><w:spacing w:after="240"/></w:pPr>"#,
            r#"<a:blip r:embed="rId7"/>"#,
            r#"<w:r><w:br w:type="page"/></w:r>"#,
            r#"<w:bookmarkStart w:id="0" w:name="top"/>"#,
            r#"<w:alias w:val="Clause"/>"#,
            r#"<w:instrText xml:space="preserve"> PAGE </w:instrText>"#,
            r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:pPr>"#,
            r#"<w:pgSz w:w="11906" w:h="16838" w:orient="portrait"/>"#,
        ] {
            assert!(xml.contains(kept), "lost {kept}");
        }

        // both halves of the split run carry the original fonts and underline
        assert!(xml.contains(
            r#"<w:r><w:rPr><w:rFonts w:ascii="Georgia"/><w:u w:val="single"/></w:rPr><w:t xml:space="preserve">Annual </w:t></w:r><w:r><w:rPr><w:rFonts w:ascii="Georgia"/><w:highlight w:val="yellow"/><w:u w:val="single"/></w:rPr><w:t xml:space="preserve">Title</w:t></w:r>"#
        ));
        assert!(xml.contains(
            r#"<w:hyperlink r:id="rId5"><w:r><w:rPr><w:highlight w:val="yellow"/></w:rPr><w:t xml:space="preserve">link</w:t></w:r></w:hyperlink>"#
        ));

        let summary = xml.find("Summary").unwrap();
        let bookmark = xml.find("<w:bookmarkStart").unwrap();
        let title = xml.find("Annual ").unwrap();
        let note = xml.find("[note]").unwrap();
        let bookmark_end = xml.find("<w:bookmarkEnd").unwrap();
        assert!(summary < bookmark && bookmark < title && title < note && note < bookmark_end);

        let back = read_docx(&write_docx(&doc).unwrap(), &ReadLimits::default()).unwrap();
        assert_eq!(
            back.paragraph_texts(),
            vec!["Summary", "Annual Titlelink\n", "[note]", "Governed by ADGM law"]
        );
        let parts: Vec<_> = back.source().unwrap().part_names().collect();
        assert!(parts.contains(&"word/media/image1.png"));
    }

    #[test]
    fn test_edited_runs_drop_stale_markup() {
        let mut doc = read_docx(&rich_container(), &ReadLimits::default()).unwrap();
        let mut changed = doc.paragraph(1).unwrap().clone();
        changed.runs.push(Run::plain(" (amended)"));
        assert!(!changed.keeps_source_markup());
        doc.replace_paragraph(1, changed).unwrap();

        let back = read_docx(&write_docx(&doc).unwrap(), &ReadLimits::default()).unwrap();
        assert_eq!(
            back.paragraph(1).unwrap().text(),
            "Governed by ADGM law (amended)"
        );
    }

    proptest! {
        #[test]
        fn prop_paragraph_text_survives_container(
            texts in prop::collection::vec("[A-Za-z0-9 .,&<>'\"]{0,40}", 1..8)
        ) {
            let doc = FlowDocument::from_paragraphs(texts.iter().map(Paragraph::new));
            let back = read_docx(&write_docx(&doc).unwrap(), &ReadLimits::default()).unwrap();
            prop_assert_eq!(back.paragraph_texts(), texts);
        }
    }
}
