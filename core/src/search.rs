use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A document matched by one query, borrowing its display data from the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredDocument<'a> {
    pub id: &'a str,
    /// Sum of the frequencies of every matched query token.
    pub score: u32,
    pub link: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub term: String,
    pub wiki: String,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term {}, Wiki: {}", self.term, self.wiki)
    }
}

/// Reject limits that cannot bound a result list.
pub fn check_limit(limit: i64) -> Result<usize> {
    usize::try_from(limit).map_err(|_| IndexError::Query(format!("limit must be non-negative, got {limit}")))
}

/// Score every document that shares at least one token with the query.
///
/// Query tokens are split on whitespace and lowercased but not stopword
/// filtered; a stopword simply has no postings. Tokens missing from the
/// index are skipped. The returned order is unspecified.
pub fn evaluate<'a>(query: &str, index: &'a InvertedIndex) -> Vec<ScoredDocument<'a>> {
    let mut scores: HashMap<&'a str, u32> = HashMap::new();
    for token in query.split_whitespace() {
        let token = token.to_lowercase();
        let Some(postings) = index.postings(&token) else { continue };
        for p in postings {
            *scores.entry(p.doc_id.as_str()).or_insert(0) += p.freq;
        }
    }

    scores
        .into_iter()
        .map(|(id, score)| {
            let (link, body) = index
                .doc(id)
                .map(|m| (m.link.as_str(), m.body.as_str()))
                .unwrap_or(("", ""));
            ScoredDocument { id, score, link, body }
        })
        .collect()
}

/// Order by score descending then ID ascending, keep the first `limit`.
pub fn rank<'a>(mut scored: Vec<ScoredDocument<'a>>, limit: usize) -> Vec<ScoredDocument<'a>> {
    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(b.id)));
    scored.truncate(limit);
    scored
}

/// Evaluate and rank `query`, returning at most `limit` results.
///
/// A negative limit is a [`IndexError::Query`]; the index is never touched
/// by a failed call.
pub fn search(query: &str, index: &InvertedIndex, limit: i64) -> Result<Vec<SearchResult>> {
    let limit = check_limit(limit)?;
    let ranked = rank(evaluate(query, index), limit);
    Ok(ranked
        .into_iter()
        .map(|d| SearchResult { term: d.id.to_string(), wiki: d.link.to_string() })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &'static str, score: u32) -> ScoredDocument<'static> {
        ScoredDocument { id, score, link: "", body: "" }
    }

    #[test]
    fn rank_breaks_ties_by_id() {
        let ranked = rank(vec![scored("b", 2), scored("c", 5), scored("a", 2), scored("aa", 2)], 10);
        let ids: Vec<&str> = ranked.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["c", "a", "aa", "b"]);
    }

    #[test]
    fn rank_truncates() {
        assert_eq!(rank(vec![scored("a", 1), scored("b", 2)], 1).len(), 1);
        assert!(rank(vec![scored("a", 1)], 0).is_empty());
    }

    #[test]
    fn negative_limit_is_query_error() {
        let index = InvertedIndex::default();
        assert!(matches!(search("worm", &index, -1), Err(IndexError::Query(_))));
        assert_eq!(check_limit(3).unwrap(), 3);
    }

    #[test]
    fn result_display_form() {
        let r = SearchResult { term: "doc1".into(), wiki: "w1".into() };
        assert_eq!(r.to_string(), "Term doc1, Wiki: w1");
    }
}
