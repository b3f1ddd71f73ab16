//! Choosing where a review comment goes, and what to highlight

use std::ops::Range;

use regex::RegexBuilder;
use shared_types::Issue;

use crate::error::AnnotationError;
use crate::patterns::contains_any;

/// Issue-text trigger terms and the paragraph keywords they stand for.
/// A category applies when any of its terms occurs in the issue text.
const THESAURUS: &[&[&str]] = &[
    &["jurisdiction", "court", "adgm", "dubai", "abu dhabi"],
    &["signature", "signed", "signatory", "execution"],
    &["date", "dated", "day of"],
    &["share", "capital", "shares", "authorized"],
    &["director", "board", "directors"],
    &["member", "shareholder", "membership"],
    &["company", "name", "corporation"],
    &["registered", "office", "address"],
    &["objects", "purpose", "business", "activities"],
];

/// Keywords for an issue: thesaurus categories triggered by the issue
/// text, then the words of its section name. Lowercase, first occurrence
/// kept.
pub fn issue_keywords(issue: &Issue) -> Vec<String> {
    let issue_text = issue.issue.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    let triggered = THESAURUS
        .iter()
        .filter(|terms| contains_any(&issue_text, terms))
        .flat_map(|terms| terms.iter().map(|t| t.to_string()));
    let section_words = issue
        .section
        .iter()
        .flat_map(|s| s.to_lowercase().split_whitespace().map(str::to_string).collect::<Vec<_>>());

    for word in triggered.chain(section_words) {
        if !keywords.contains(&word) {
            keywords.push(word);
        }
    }
    keywords
}

/// Index of the paragraph a comment for `issue` belongs after.
///
/// A named section wins: the first paragraph containing any word of it.
/// Failing that, the paragraph with the most keyword hits (earliest on
/// ties). No hit at all means there is no suitable paragraph.
pub fn locate(issue: &Issue, paragraphs: &[String]) -> Result<usize, AnnotationError> {
    let lowered: Vec<String> = paragraphs.iter().map(|p| p.to_lowercase()).collect();

    if let Some(section) = &issue.section {
        let section = section.to_lowercase();
        let words: Vec<&str> = section.split_whitespace().collect();
        if let Some(index) = lowered.iter().position(|p| contains_any(p, &words)) {
            return Ok(index);
        }
    }

    let keywords = issue_keywords(issue);
    let mut best: Option<(usize, usize)> = None;
    for (index, paragraph) in lowered.iter().enumerate() {
        let score = keywords
            .iter()
            .filter(|k| paragraph.contains(k.as_str()))
            .count();
        if score > best.map(|(_, s)| s).unwrap_or(0) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
        .ok_or_else(|| AnnotationError::NoTarget(issue.issue.clone()))
}

/// Byte range of the first keyword (in keyword order) found in
/// `paragraph`, matched case-insensitively
pub fn highlight_span(
    issue: &Issue,
    paragraph: &str,
) -> Result<Option<Range<usize>>, AnnotationError> {
    let lowered = paragraph.to_lowercase();
    for keyword in issue_keywords(issue) {
        if !lowered.contains(keyword.as_str()) {
            continue;
        }
        let re = RegexBuilder::new(&regex::escape(&keyword))
            .case_insensitive(true)
            .build()?;
        if let Some(m) = re.find(paragraph) {
            return Ok(Some(m.range()));
        }
    }
    Ok(None)
}
