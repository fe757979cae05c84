pub mod build;
pub mod corpus;
pub mod error;
pub mod index;
pub mod search;
pub mod tokenizer;

pub use build::{build_from_corpus, build_index, BuildOptions};
pub use corpus::{read_corpus, Corpus, Document};
pub use error::{IndexError, Result};
pub use index::{DocId, DocMeta, InvertedIndex, Posting};
pub use search::{check_limit, evaluate, rank, search, ScoredDocument, SearchResult};

/// Corpus file read when no path is given.
pub const DEFAULT_CORPUS_PATH: &str = "data.json";
/// Number of results returned when the caller does not ask for a limit.
pub const DEFAULT_RESULT_LIMIT: usize = 10;
