use crate::pipeline::Stage;
use crate::DocId;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The corpus file could not be opened or read.
    #[error("cannot read corpus {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A line of the corpus is not valid UTF-8.
    #[error("corpus {} is not valid UTF-8 at line {line}", path.display())]
    Decode { path: PathBuf, line: usize },
    /// Counting met a token the vocabulary was not built with.
    #[error("term {term:?} in document {doc} is missing from the vocabulary")]
    UnknownTerm { term: String, doc: DocId },
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn in_stage(self, stage: Stage) -> Self {
        Error::Stage { stage, source: Box::new(self) }
    }
}
