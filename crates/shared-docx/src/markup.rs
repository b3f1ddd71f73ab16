//! Edits on source paragraph markup
//!
//! Only the runs an edit touches are rewritten; everything else in the `w:p`
//! element is carried over byte for byte.

use std::ops::Range;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DocxError;
use crate::model::SourceMarkup;
use crate::writer::write_run_text;

const EMPTY_PROPS: &str = "<w:rPr/>";
const PROPS_PART: &str = "w:rPr";

/// `w:rPr` children that come after `w:highlight` in schema order
const AFTER_HIGHLIGHT: &[&[u8]] = &[
    b"u",
    b"effect",
    b"bdr",
    b"shd",
    b"fitText",
    b"vertAlign",
    b"rtl",
    b"cs",
    b"em",
    b"lang",
    b"eastAsianLayout",
    b"specVanish",
    b"oMath",
    b"rPrChange",
];

/// Rewrite `source.xml` with the text range `range` highlighted
pub(crate) fn highlight(
    source: &SourceMarkup,
    range: Range<usize>,
    color: &str,
) -> Result<String, DocxError> {
    let xml = source.xml.as_str();
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();

    let mut offset = 0;
    for (run, markup) in source.read_as.runs.iter().zip(&source.runs) {
        let run_start = offset;
        let run_end = offset + run.text.len();
        offset = run_end;

        let start = range.start.clamp(run_start, run_end);
        let end = range.end.clamp(run_start, run_end);
        if start == end {
            continue;
        }

        let props = markup.props.clone().map(|r| &xml[r]);
        let replacement = if markup.plain {
            let open = &xml[markup.open_tag.clone()];
            let original = props.unwrap_or("");
            let marked = set_highlight(props.unwrap_or(EMPTY_PROPS), color)?;
            let (before, rest) = run.text.split_at(start - run_start);
            let (middle, after) = rest.split_at(end - start);

            let mut out = String::new();
            for (text, props) in [(before, original), (middle, marked.as_str()), (after, original)] {
                if text.is_empty() {
                    continue;
                }
                out.push_str(open);
                out.push_str(props);
                write_run_text(&mut out, text);
                out.push_str("</w:r>");
            }
            out
        } else {
            let run_xml = &xml[markup.span.clone()];
            let base = markup.span.start;
            match &markup.props {
                Some(p) => format!(
                    "{}{}{}",
                    &run_xml[..p.start - base],
                    set_highlight(&xml[p.clone()], color)?,
                    &run_xml[p.end - base..]
                ),
                None => {
                    let at = markup.open_tag.end - base;
                    format!(
                        "{}{}{}",
                        &run_xml[..at],
                        set_highlight(EMPTY_PROPS, color)?,
                        &run_xml[at..]
                    )
                }
            }
        };
        edits.push((markup.span.clone(), replacement));
    }

    let mut out = xml.to_string();
    for (span, replacement) in edits.into_iter().rev() {
        out.replace_range(span, &replacement);
    }
    Ok(out)
}

/// Set `w:highlight` in a `w:rPr` element, replacing any existing one and
/// keeping the other properties in place
pub(crate) fn set_highlight(props: &str, color: &str) -> Result<String, DocxError> {
    let element = format!(r#"<w:highlight w:val="{}"/>"#, escape(color));

    let mut reader = Reader::from_str(props);
    let mut depth = 0usize;
    let mut child: Option<(usize, Vec<u8>)> = None;
    let mut existing: Option<Range<usize>> = None;
    let mut insert_at: Option<usize> = None;
    let mut close_at: Option<usize> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| DocxError::xml(PROPS_PART, e))?;
        let end = reader.buffer_position() as usize;

        let mut visit = |from: usize, to: usize, name: &[u8]| {
            if name == b"highlight" {
                existing = Some(from..to);
            } else if insert_at.is_none() && AFTER_HIGHLIGHT.contains(&name) {
                insert_at = Some(from);
            }
        };

        match event {
            Event::Empty(_) if depth == 0 => return Ok(format!("<w:rPr>{element}</w:rPr>")),
            Event::Empty(e) if depth == 1 => visit(start, end, e.local_name().as_ref()),
            Event::Start(e) => {
                if depth == 1 {
                    child = Some((start, e.local_name().as_ref().to_vec()));
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some((from, name)) = child.take() {
                        visit(from, end, &name);
                    }
                } else if depth == 0 {
                    close_at = Some(start);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let close_at = close_at.ok_or_else(|| {
        DocxError::InvalidEdit(format!("run properties are not an element: {props}"))
    })?;
    let at = insert_at.unwrap_or(close_at);

    Ok(match existing {
        Some(old) if old.start < at => format!(
            "{}{}{}{}",
            &props[..old.start],
            &props[old.end..at],
            element,
            &props[at..]
        ),
        Some(old) => format!(
            "{}{}{}{}",
            &props[..at],
            element,
            &props[at..old.start],
            &props[old.end..]
        ),
        None => format!("{}{}{}", &props[..at], element, &props[at..]),
    })
}
