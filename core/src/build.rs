use crate::corpus::{read_corpus, Corpus, Document};
use crate::error::{IndexError, Result};
use crate::index::{DocId, DocMeta, InvertedIndex, Posting};
use crate::tokenizer::{normalize, term_frequencies};
use parking_lot::Mutex;
use std::collections::hash_map;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

type DocQueue = Mutex<hash_map::IntoIter<String, Document>>;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Size of the tokenizer pool. Zero is treated as one.
    pub workers: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        let workers = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
        Self { workers }
    }
}

/// What a worker sends to the merge consumer.
enum Emit {
    Document(DocId, DocMeta),
    Posting(Posting),
}

/// Normalize, split, filter and count one document.
///
/// Returns the document's store entry and one posting per distinct surviving
/// token. Never fails: any string normalizes to some (possibly empty) text.
pub fn tokenize_document(id: &str, doc: &Document) -> (DocMeta, Vec<Posting>) {
    let body = normalize(&doc.description);
    let postings = term_frequencies(&body)
        .into_iter()
        .map(|(term, freq)| Posting { term, doc_id: id.to_string(), freq })
        .collect();
    (DocMeta { link: doc.wiki.clone(), body }, postings)
}

/// Read the corpus at `path` and index every document in it.
pub async fn build_index<P: AsRef<Path>>(path: P, opts: &BuildOptions) -> Result<InvertedIndex> {
    let corpus = read_corpus(path)?;
    build_from_corpus(corpus, opts).await
}

/// Index an in-memory corpus.
///
/// A fixed pool of blocking workers drains a shared document queue and
/// streams postings to this task, which is the only writer of the index.
/// A coordinator owns the pool and the last sender; once every worker has
/// been joined it drops that sender, closing the stream and ending the merge.
/// Returns only when every document has been merged.
pub async fn build_from_corpus(corpus: Corpus, opts: &BuildOptions) -> Result<InvertedIndex> {
    let workers = opts.workers.max(1).min(corpus.len().max(1));
    let queue: Arc<DocQueue> = Arc::new(Mutex::new(corpus.into_iter()));
    let (tx, mut rx) = mpsc::unbounded_channel::<Emit>();

    let mut pool = JoinSet::new();
    for worker in 0..workers {
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        pool.spawn_blocking(move || run_worker(worker, &queue, &tx));
    }

    let coordinator = tokio::spawn(async move {
        let mut failure = None;
        while let Some(joined) = pool.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "indexing worker failed");
                failure.get_or_insert_with(|| err.to_string());
            }
        }
        drop(tx);
        failure
    });

    let mut index = InvertedIndex::new();
    while let Some(emit) = rx.recv().await {
        match emit {
            Emit::Document(id, meta) => index.add_document(id, meta),
            Emit::Posting(posting) => index.add_posting(posting),
        }
    }

    match coordinator.await {
        Ok(None) => {}
        Ok(Some(msg)) => return Err(IndexError::Worker(msg)),
        Err(err) => return Err(IndexError::Worker(err.to_string())),
    }

    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), workers, "index build complete");
    Ok(index)
}

fn run_worker(worker: usize, queue: &DocQueue, tx: &mpsc::UnboundedSender<Emit>) {
    let mut indexed = 0usize;
    loop {
        let next = queue.lock().next();
        let Some((id, doc)) = next else { break };

        let (meta, postings) = tokenize_document(&id, &doc);
        tracing::debug!(worker, doc = %id, terms = postings.len(), "tokenized document");

        // The receiver only goes away if the build future was dropped.
        if tx.send(Emit::Document(id, meta)).is_err() {
            return;
        }
        for posting in postings {
            if tx.send(Emit::Posting(posting)).is_err() {
                return;
            }
        }
        indexed += 1;
    }
    tracing::debug!(worker, indexed, "worker drained queue");
}
