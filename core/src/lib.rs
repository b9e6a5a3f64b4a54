pub mod corpus;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod vocab;
pub mod weighting;

pub use corpus::{read_corpus, tokenize, Corpus, Document};
pub use error::{Error, Result};
pub use matrix::{count_terms, TermDocMatrix};
pub use pipeline::{Clock, NullReporter, Pipeline, PipelineReport, Reporter, Stage, StageTimings, StdoutReporter, SystemClock};
pub use vocab::{VocabOrder, Vocabulary};
pub use weighting::{Match, TfIdf};

pub type TermId = usize;
pub type DocId = usize;
