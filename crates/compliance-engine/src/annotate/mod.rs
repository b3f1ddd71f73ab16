//! Annotated copy of a reviewed document
//!
//! Every issue becomes a comment paragraph placed after the paragraph it
//! concerns, optionally with the triggering keyword highlighted, and a
//! summary block is prepended. Insertions are planned against the original
//! paragraph indices and applied back to front, so no insertion shifts a
//! target that has not been handled yet.

pub mod placement;
pub mod summary;

use std::cmp::Reverse;
use std::ops::Range;

use shared_docx::{FlowDocument, HIGHLIGHT_YELLOW};
use shared_types::{CommentCategory, Issue};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::AnnotationError;

/// A planned comment, positioned against the original paragraph sequence
#[derive(Debug, Clone, PartialEq)]
pub struct CommentInsertion {
    pub paragraph_index: usize,
    pub issue: Issue,
    pub highlight: Option<Range<usize>>,
    pub category: CommentCategory,
    /// Issue order, keeps same-paragraph comments in sequence
    pub seq: usize,
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub document: FlowDocument,
    pub comments_inserted: usize,
}

pub struct Annotator {
    summary_limit: usize,
}

impl Annotator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            summary_limit: config.summary_issue_limit,
        }
    }

    /// Plan one insertion per placeable issue. Issues with no target
    /// paragraph are logged and left out.
    pub fn plan(&self, document: &FlowDocument, issues: &[Issue]) -> Vec<CommentInsertion> {
        let paragraphs = document.paragraph_texts();
        issues
            .iter()
            .enumerate()
            .filter_map(|(seq, issue)| match plan_one(issue, seq, &paragraphs) {
                Ok(insertion) => Some(insertion),
                Err(e) => {
                    warn!("No comment placed: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Produce the annotated copy. `document` itself is left untouched.
    pub fn annotate(&self, document: &FlowDocument, issues: &[Issue]) -> Annotation {
        let mut annotated = document.clone();
        let mut plan = self.plan(document, issues);
        plan.sort_by_key(|c| (Reverse(c.paragraph_index), Reverse(c.seq)));

        let mut comments_inserted = 0;
        for insertion in &plan {
            match apply(&mut annotated, insertion) {
                Ok(()) => comments_inserted += 1,
                Err(e) => warn!(
                    "Skipping comment for '{}' at paragraph {}: {}",
                    insertion.issue.issue, insertion.paragraph_index, e
                ),
            }
        }

        annotated.insert_before_first_paragraph(summary::summary_paragraphs(
            issues,
            self.summary_limit,
        ));
        debug!(
            "Inserted {} of {} comment(s)",
            comments_inserted,
            issues.len()
        );

        Annotation {
            document: annotated,
            comments_inserted,
        }
    }
}

fn plan_one(
    issue: &Issue,
    seq: usize,
    paragraphs: &[String],
) -> Result<CommentInsertion, AnnotationError> {
    let paragraph_index = placement::locate(issue, paragraphs)?;
    let highlight = match placement::highlight_span(issue, &paragraphs[paragraph_index]) {
        Ok(span) => span,
        Err(e) => {
            warn!("No highlight for '{}': {}", issue.issue, e);
            None
        }
    };
    Ok(CommentInsertion {
        paragraph_index,
        issue: issue.clone(),
        highlight,
        category: issue.severity.comment_category(),
        seq,
    })
}

fn apply(document: &mut FlowDocument, insertion: &CommentInsertion) -> Result<(), AnnotationError> {
    let index = insertion.paragraph_index;

    if let Some(range) = &insertion.highlight {
        let target = document
            .paragraph(index)
            .ok_or_else(|| AnnotationError::NoTarget(insertion.issue.issue.clone()))?;
        match target.highlighted(range.clone(), HIGHLIGHT_YELLOW) {
            Ok(marked) => document.replace_paragraph(index, marked)?,
            // the comment still goes in without the highlight
            Err(e) => warn!("Highlight failed at paragraph {}: {}", index, e),
        }
    }

    document.insert_paragraph_after(index, summary::comment_paragraph(&insertion.issue))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_docx::Paragraph;
    use shared_types::Severity;
    use tracing_test::traced_test;

    fn annotator() -> Annotator {
        Annotator::new(&EngineConfig::default())
    }

    fn doc(texts: &[&str]) -> FlowDocument {
        FlowDocument::from_paragraphs(texts.iter().map(|t| Paragraph::new(*t)))
    }

    #[test]
    fn test_no_issues_yields_summary_only() {
        let original = doc(&["1. Name", "The company name is X Ltd."]);
        let result = annotator().annotate(&original, &[]);
        assert_eq!(result.comments_inserted, 0);
        assert_eq!(result.document.paragraph_count(), original.paragraph_count() + 3);
        assert_eq!(
            result.document.paragraph(1).map(|p| p.text()),
            Some(summary::NO_ISSUES_LINE.to_string())
        );
    }

    #[test]
    fn test_comments_follow_targets_in_issue_order() {
        let original = doc(&[
            "Preamble",
            "Disputes are referred to the Dubai Courts.",
            "Signed by the directors",
        ]);
        let issues = vec![
            Issue::new("d", "Incorrect jurisdiction reference: 'dubai courts'", Severity::High)
                .with_section("Jurisdiction Clause"),
            Issue::new("d", "Missing ADGM jurisdiction clause", Severity::High)
                .with_section("Jurisdiction Clause"),
            Issue::new("d", "Missing signature section", Severity::Medium)
                .with_section("Signature Section"),
        ];

        let result = annotator().annotate(&original, &issues);
        assert_eq!(result.comments_inserted, 3);

        // no paragraph names a section word, so the thesaurus decides
        let texts = result.document.paragraph_texts();
        let body = &texts[texts.len() - 6..];
        assert_eq!(body[0], "Preamble");
        assert_eq!(body[1], "Disputes are referred to the Dubai Courts.");
        assert!(body[2].contains("Incorrect jurisdiction reference"));
        assert!(body[3].contains("Missing ADGM jurisdiction clause"));
        assert_eq!(body[4], "Signed by the directors");
        assert!(body[5].contains("Missing signature section"));
    }

    #[test]
    fn test_section_match_and_highlight() {
        let original = doc(&["Intro", "Signature of the director", "End"]);
        let issues = vec![Issue::new("d", "Missing signature section", Severity::Medium)
            .with_section("Signature Section")];

        let result = annotator().annotate(&original, &issues);
        assert_eq!(result.comments_inserted, 1);

        let texts = result.document.paragraph_texts();
        let at = texts
            .iter()
            .position(|t| t == "Signature of the director")
            .unwrap();
        assert!(texts[at + 1].starts_with("[ADGM REVIEW] MEDIUM ISSUE"));

        let target = result.document.paragraph(at).unwrap();
        let marked: Vec<_> = target
            .runs
            .iter()
            .filter(|r| r.highlight.is_some())
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(marked, vec!["Signature"]);
    }

    #[test]
    #[traced_test]
    fn test_unplaceable_issue_is_warned_and_skipped() {
        let original = doc(&["Alpha", "Beta"]);
        let issues = vec![Issue::new(
            "d",
            "Excessive use of ambiguous language",
            Severity::Medium,
        )];

        let result = annotator().annotate(&original, &issues);
        assert_eq!(result.comments_inserted, 0);
        logs_assert(|lines: &[&str]| {
            if lines
                .iter()
                .any(|l| l.contains("WARN") && l.contains("No comment placed"))
            {
                Ok(())
            } else {
                Err("missing warning for the unplaced issue".to_string())
            }
        });
    }

    #[test]
    fn test_original_texts_survive_in_order() {
        let original = doc(&["A share capital clause", "", "Registered office", "Objects"]);
        let issues = vec![
            Issue::new("d", "Missing registered office address", Severity::High)
                .with_section("Registered office address"),
            Issue::new("d", "Missing company objects", Severity::High)
                .with_section("Company objects"),
            Issue::new("d", "Excessive use of ambiguous language", Severity::Medium),
        ];
        let result = annotator().annotate(&original, &issues);
        assert!(result.document.paragraph_count() >= original.paragraph_count());

        let originals = original.paragraph_texts();
        let mut remaining = originals.iter().peekable();
        for text in result.document.paragraph_texts() {
            if remaining.peek().map(|t| **t == text).unwrap_or(false) {
                remaining.next();
            }
        }
        assert!(remaining.next().is_none());
        assert!(original.paragraph(0).unwrap().runs.iter().all(|r| r.highlight.is_none()));
    }
}
