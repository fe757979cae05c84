use serde::Serialize;
use std::collections::HashMap;

pub type DocId = String;

/// Per-document display data, stored once and shared by every posting of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocMeta {
    pub link: String,
    /// Description after normalization.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub term: String,
    pub doc_id: DocId,
    pub freq: u32, // occurrences of term in the filtered document text
}

/// Term → postings, plus the document store the postings point into.
///
/// Only the merge consumer of a build writes to it; once a build returns the
/// index is read-only and may be shared freely between queries.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>, // order follows arrival, never relied on
    docs: HashMap<DocId, DocMeta>,
}

impl InvertedIndex {
    pub(crate) fn new() -> Self { Self::default() }

    pub(crate) fn add_document(&mut self, id: DocId, meta: DocMeta) {
        self.docs.insert(id, meta);
    }

    pub(crate) fn add_posting(&mut self, posting: Posting) {
        self.postings.entry(posting.term.clone()).or_default().push(posting);
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn doc(&self, id: &str) -> Option<&DocMeta> { self.docs.get(id) }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }
}
