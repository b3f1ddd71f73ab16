//! Issue deduplication and compliance scoring

use std::collections::HashSet;

use shared_types::{Issue, Severity};

use crate::config::SeverityWeights;

/// Drop repeated (section, issue, severity) triples, keeping the first
/// occurrence and the original order
pub fn deduplicate(issues: Vec<Issue>) -> Vec<Issue> {
    let mut seen: HashSet<(Option<String>, String, Severity)> = HashSet::new();
    issues
        .into_iter()
        .filter(|issue| {
            seen.insert((issue.section.clone(), issue.issue.clone(), issue.severity))
        })
        .collect()
}

/// Length weight of a document: one unit per hundred words, at least one
pub fn length_weight(word_count: usize) -> f64 {
    (word_count as f64 / 100.0).max(1.0)
}

/// 100 minus the severity-weighted issue density, floored at 0 and
/// rounded to one decimal
pub fn compliance_score(issues: &[Issue], word_count: usize, weights: &SeverityWeights) -> f64 {
    let penalty: u64 = issues
        .iter()
        .map(|i| u64::from(weights.weight(i.severity)))
        .sum();
    let normalized = penalty as f64 / length_weight(word_count);
    round1((100.0 - normalized).max(0.0))
}

/// Length-weighted mean of per-document scores; 0.0 for an empty batch
pub fn aggregate_score(documents: &[(f64, usize)]) -> f64 {
    let (weighted, total) = documents
        .iter()
        .fold((0.0, 0.0), |(weighted, total), &(score, words)| {
            let w = length_weight(words);
            (weighted + score * w, total + w)
        });
    if total > 0.0 {
        round1(weighted / total)
    } else {
        0.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
