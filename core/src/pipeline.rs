use crate::{count_terms, read_corpus, Corpus, Error, Result, TermDocMatrix, VocabOrder, Vocabulary};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reading,
    Indexing,
    Counting,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Reading => "Reading",
            Stage::Indexing => "Indexing",
            Stage::Counting => "Counting",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// Monotonic time source; readings are offsets from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self { Self { origin: Instant::now() } }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration { self.origin.elapsed() }
}

/// Receives stage timings and the final shape as the pipeline progresses.
pub trait Reporter {
    fn stage_finished(&mut self, stage: Stage, took: Duration);
    fn shape(&mut self, shape: (usize, usize));
}

/// Prints `<Stage> took <seconds>` per stage, then `(<rows>, <cols>)`.
#[derive(Debug, Default)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn stage_finished(&mut self, stage: Stage, took: Duration) {
        println!("{}", stage_line(stage, took));
    }
    fn shape(&mut self, shape: (usize, usize)) {
        println!("{}", shape_line(shape));
    }
}

#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn stage_finished(&mut self, _: Stage, _: Duration) {}
    fn shape(&mut self, _: (usize, usize)) {}
}

pub fn stage_line(stage: Stage, took: Duration) -> String {
    format!("{} took {}", stage.label(), took.as_secs_f64())
}

pub fn shape_line((rows, cols): (usize, usize)) -> String {
    format!("({rows}, {cols})")
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub reading: Duration,
    pub indexing: Duration,
    pub counting: Duration,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub corpus: Corpus,
    pub vocabulary: Vocabulary,
    pub matrix: TermDocMatrix,
    pub timings: StageTimings,
}

impl PipelineReport {
    pub fn shape(&self) -> (usize, usize) { self.matrix.shape() }
}

/// Read -> index -> count, each stage timed with `C`.
pub struct Pipeline<C: Clock = SystemClock> {
    order: VocabOrder,
    clock: C,
}

impl Pipeline<SystemClock> {
    pub fn new(order: VocabOrder) -> Self { Self::with_clock(order, SystemClock::default()) }
}

impl<C: Clock> Pipeline<C> {
    pub fn with_clock(order: VocabOrder, clock: C) -> Self { Self { order, clock } }

    fn timed<T>(&self, stage: Stage, reporter: &mut dyn Reporter, f: impl FnOnce() -> Result<T>) -> Result<(T, Duration)> {
        let start = self.clock.now();
        let out = f().map_err(|e| e.in_stage(stage))?;
        let took = self.clock.now().saturating_sub(start);
        tracing::info!(%stage, took_s = took.as_secs_f64(), "stage finished");
        reporter.stage_finished(stage, took);
        Ok((out, took))
    }

    pub fn run<P: AsRef<Path>>(&self, path: P, reporter: &mut dyn Reporter) -> Result<PipelineReport> {
        let path = path.as_ref();
        let (corpus, reading) = self.timed(Stage::Reading, reporter, || read_corpus(path))?;
        self.run_rest(corpus, reading, reporter)
    }

    /// Run on an already loaded corpus. Reading is reported as zero.
    pub fn run_corpus(&self, corpus: Corpus, reporter: &mut dyn Reporter) -> Result<PipelineReport> {
        reporter.stage_finished(Stage::Reading, Duration::ZERO);
        self.run_rest(corpus, Duration::ZERO, reporter)
    }

    fn run_rest(&self, corpus: Corpus, reading: Duration, reporter: &mut dyn Reporter) -> Result<PipelineReport> {
        let (vocabulary, indexing) =
            self.timed(Stage::Indexing, reporter, || Ok::<_, Error>(Vocabulary::build(&corpus, self.order)))?;
        let (matrix, counting) = self.timed(Stage::Counting, reporter, || count_terms(&vocabulary, &corpus))?;
        reporter.shape(matrix.shape());
        tracing::info!(
            documents = corpus.len(),
            tokens = corpus.token_count(),
            vocab_size = vocabulary.len(),
            nnz = matrix.nnz(),
            "term-document matrix built"
        );
        Ok(PipelineReport {
            corpus,
            vocabulary,
            matrix,
            timings: StageTimings { reading, indexing, counting },
        })
    }
}
