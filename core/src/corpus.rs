use crate::{DocId, Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One input line, lowercased and split on whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    tokens: Vec<String>,
}

impl Document {
    pub fn tokens(&self) -> &[String] { &self.tokens }
    pub fn len(&self) -> usize { self.tokens.len() }
    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.tokens.iter().map(String::as_str) }
}

/// Tokenize a line: lowercase the whole line, then split on runs of whitespace.
/// Punctuation is kept as part of the token.
pub fn tokenize(line: &str) -> Document {
    let tokens = line
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    Document { tokens }
}

/// All documents of an input file, in line order. The line position is the document id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let documents = lines.into_iter().map(|l| tokenize(l.as_ref())).collect();
        Self { documents }
    }

    /// Read everything from `reader` and tokenize it. `origin` only labels errors.
    pub fn from_reader<R: Read>(mut reader: R, origin: &Path) -> Result<Self> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|source| Error::Read { path: origin.to_path_buf(), source })?;
        Self::from_bytes(&buf, origin)
    }

    fn from_bytes(bytes: &[u8], origin: &Path) -> Result<Self> {
        let documents = split_lines(bytes)
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                std::str::from_utf8(raw)
                    .map(tokenize)
                    .map_err(|_| Error::Decode { path: origin.to_path_buf(), line: i + 1 })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[Document] { &self.documents }
    pub fn get(&self, doc: DocId) -> Option<&Document> { self.documents.get(doc) }
    pub fn len(&self) -> usize { self.documents.len() }
    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    /// Total number of tokens across all documents.
    pub fn token_count(&self) -> usize {
        self.documents.iter().map(Document::len).sum()
    }
}

/// Split on `\n`, `\r\n` or a bare `\r`. A terminator at the very end does not
/// start another line, so "a\nb\n" is two lines.
fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&bytes[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&bytes[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&bytes[start..]);
    }
    lines
}

/// Load and tokenize the file at `path`. The whole file is materialized before returning.
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let file = File::open(&path).map_err(|source| Error::Read { path: path.clone(), source })?;
    let corpus = Corpus::from_reader(file, &path)?;
    tracing::debug!(path = %path.display(), documents = corpus.len(), tokens = corpus.token_count(), "read corpus");
    Ok(corpus)
}
