use crate::error::{IndexError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One corpus entry as it appears in the source json.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub description: String,
    pub wiki: String,
}

/// Document ID → document, exactly the shape of the corpus file.
pub type Corpus = HashMap<String, Document>;

/// Load the corpus file into memory with a single read sized from its metadata.
///
/// A read that returns fewer bytes than the reported size is an error; it is
/// not retried.
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| IndexError::Io { path: path.to_path_buf(), source };

    let mut file = File::open(path).map_err(io_err)?;
    let expected = file.metadata().map_err(io_err)?.len();

    let buffer = read_sized(&mut file, expected, path)?;

    let corpus: Corpus = serde_json::from_slice(&buffer)?;
    tracing::debug!(path = %path.display(), bytes = buffer.len(), docs = corpus.len(), "loaded corpus");
    Ok(corpus)
}

/// One `read` into a buffer of `expected` bytes; anything shorter is a [`IndexError::Read`].
fn read_sized<R: Read>(reader: &mut R, expected: u64, path: &Path) -> Result<Vec<u8>> {
    let len = usize::try_from(expected).map_err(|_| IndexError::Read { expected, read: 0 })?;
    let mut buffer = vec![0u8; len];
    let read = reader
        .read(&mut buffer)
        .map_err(|source| IndexError::Io { path: path.to_path_buf(), source })? as u64;
    if read < expected {
        return Err(IndexError::Read { expected, read });
    }
    Ok(buffer)
}
