//! Keyword-ranked reference store backed by a JSON file

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use compliance_engine::{ReferenceSnippet, ReferenceStore};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct Entry {
    source: String,
    text: String,
}

/// Entries loaded once from a JSON array of `{source, text}` objects
pub struct JsonReferenceStore {
    entries: Vec<(Entry, String)>,
}

impl JsonReferenceStore {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference file: {}", path.display()))?;
        let entries: Vec<Entry> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid reference file: {}", path.display()))?;
        Ok(Self::new(entries))
    }

    fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| {
                    let lowered = e.text.to_lowercase();
                    (e, lowered)
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_lowercase)
    {
        if !terms.contains(&word) {
            terms.push(word);
        }
    }
    terms
}

impl ReferenceStore for JsonReferenceStore {
    /// Score is the share of query terms found in the entry; ties keep
    /// file order
    fn search(&self, query: &str, k: usize) -> Vec<ReferenceSnippet> {
        let terms = query_terms(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ReferenceSnippet> = self
            .entries
            .iter()
            .filter_map(|(entry, lowered)| {
                let hits = terms.iter().filter(|t| lowered.contains(t.as_str())).count();
                (hits > 0).then(|| ReferenceSnippet {
                    source: entry.source.clone(),
                    text: entry.text.clone(),
                    score: hits as f64 / terms.len() as f64,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }
}
