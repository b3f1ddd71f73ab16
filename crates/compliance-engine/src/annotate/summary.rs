//! Comment and summary paragraph rendering

use shared_docx::{Paragraph, Run};
use shared_types::{CommentCategory, Issue, Severity, SeverityCounts};

pub const SUMMARY_TITLE: &str = "ADGM COMPLIANCE REVIEW SUMMARY";
pub const COMMENT_PREFIX: &str = "[ADGM REVIEW]";
pub const NO_ISSUES_LINE: &str =
    "No compliance issues found. Document appears to be compliant with ADGM requirements.";

const TITLE_COLOR: &str = "003366";
const SEPARATOR_COLOR: &str = "808080";
const TITLE_SIZE: u32 = 22;
const SUMMARY_SIZE: u32 = 16;
const COMMENT_SIZE: u32 = 18;
/// Half an inch, in twentieths of a point
const COMMENT_INDENT: u32 = 720;

/// Colour and weight of a comment run per category
fn comment_style(category: CommentCategory) -> (&'static str, bool) {
    match category {
        CommentCategory::Critical => ("CC0000", true),
        CommentCategory::Warning => ("FF6600", true),
        CommentCategory::Info => ("0066CC", false),
    }
}

pub fn comment_text(issue: &Issue) -> String {
    let mut parts = vec![
        format!("{} ISSUE", issue.severity.label().to_uppercase()),
        format!("Issue: {}", issue.issue),
    ];
    if let Some(suggestion) = &issue.suggestion {
        parts.push(format!("Suggestion: {suggestion}"));
    }
    if let Some(reference) = &issue.reference {
        parts.push(format!("Reference: {reference}"));
    }
    parts.join("\n")
}

pub fn comment_paragraph(issue: &Issue) -> Paragraph {
    let (color, bold) = comment_style(issue.severity.comment_category());
    let run = Run::plain(format!("{COMMENT_PREFIX} {}", comment_text(issue)))
        .with_bold(bold)
        .with_italic(true)
        .with_color(color)
        .with_size(COMMENT_SIZE);
    Paragraph::from_runs(vec![run]).with_indent(COMMENT_INDENT)
}

pub fn summary_lines(issues: &[Issue], limit: usize) -> Vec<String> {
    if issues.is_empty() {
        return vec![NO_ISSUES_LINE.to_string()];
    }

    let counts = SeverityCounts::from_issues(issues);
    let mut lines = vec![format!("Total Issues Found: {}", issues.len()), String::new()];

    for severity in Severity::DESCENDING {
        let count = counts.get(severity);
        if count > 0 {
            lines.push(format!("{severity}: {count} issue(s)"));
        }
    }

    lines.push(String::new());
    lines.push("Key Issues:".to_string());
    for (i, issue) in issues.iter().take(limit).enumerate() {
        lines.push(format!("{}. {}", i + 1, issue.issue));
    }
    if issues.len() > limit {
        lines.push(format!("... and {} more issue(s)", issues.len() - limit));
    }

    lines.push(String::new());
    lines.push(
        "Please review the detailed comments throughout the document for specific guidance."
            .to_string(),
    );
    lines
}

/// Title, summary lines and separator, in reading order
pub fn summary_paragraphs(issues: &[Issue], limit: usize) -> Vec<Paragraph> {
    let mut paragraphs = vec![Paragraph::from_runs(vec![Run::plain(SUMMARY_TITLE)
        .with_bold(true)
        .with_color(TITLE_COLOR)
        .with_size(TITLE_SIZE)])];

    paragraphs.extend(summary_lines(issues, limit).into_iter().map(|line| {
        if line.is_empty() {
            Paragraph::default()
        } else {
            Paragraph::from_runs(vec![Run::plain(line).with_size(SUMMARY_SIZE)])
        }
    }));

    paragraphs.push(Paragraph::from_runs(vec![
        Run::plain("=".repeat(80)).with_color(SEPARATOR_COLOR)
    ]));
    paragraphs
}
