//! FAQ matching and ranking.
//!
//! Retrieval is a linear scan: an entry matches when any query term occurs
//! in its question, answer or stored keywords. Matches are ordered by
//! popularity only.

use crate::types::FaqEntry;

/// Maximum number of entries passed to the answer composer.
pub const MAX_RELATED_FAQS: usize = 5;

/// Lowercased whitespace-separated terms. Stop words are not removed here.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Whether any term is a substring of the entry's question, answer or keywords.
pub fn matches(entry: &FaqEntry, terms: &[String]) -> bool {
    let question = entry.question.to_lowercase();
    let answer = entry.answer.to_lowercase();

    terms.iter().any(|term| {
        question.contains(term.as_str())
            || answer.contains(term.as_str())
            || entry
                .keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(term.as_str()))
    })
}

/// Stable sort by descending view count; equal counts keep their input order.
pub fn sort_by_popularity(entries: &mut [FaqEntry]) {
    entries.sort_by(|a, b| b.view_count.cmp(&a.view_count));
}

/// Select the entries relevant to `query` from a full snapshot.
///
/// `snapshot` must be in store insertion order; that order breaks view-count ties.
pub fn rank_matches(query: &str, snapshot: Vec<FaqEntry>) -> Vec<FaqEntry> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut matched: Vec<FaqEntry> = snapshot
        .into_iter()
        .filter(|entry| matches(entry, &terms))
        .collect();

    sort_by_popularity(&mut matched);
    matched.truncate(MAX_RELATED_FAQS);

    tracing::debug!(
        "Matched {} FAQ entries for {} query terms",
        matched.len(),
        terms.len()
    );

    matched
}
