use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use termdoc_core::{NullReporter, Pipeline, PipelineReport, Reporter, StdoutReporter, TfIdf, VocabOrder};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "termdoc")]
#[command(about = "Build a term-document count matrix from a corpus, one document per line", long_about = None)]
struct Cli {
    /// Input text file, one document per line
    input: PathBuf,
    /// Vocabulary enumeration order
    #[arg(long, value_enum, default_value_t = Order::Sorted)]
    order: Order,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Rank documents against this text with TF-IDF cosine similarity (repeatable)
    #[arg(long)]
    query: Vec<String>,
    /// Maximum number of documents listed per query
    #[arg(long, default_value_t = 5)]
    top_k: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Sorted,
    FirstSeen,
}

impl From<Order> for VocabOrder {
    fn from(o: Order) -> Self {
        match o {
            Order::Sorted => VocabOrder::Sorted,
            Order::FirstSeen => VocabOrder::FirstSeen,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    reading_s: f64,
    indexing_s: f64,
    counting_s: f64,
    shape: (usize, usize),
    nnz: usize,
    documents: usize,
    tokens: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    queries: Vec<QueryResult<'a>>,
}

#[derive(Serialize)]
struct QueryResult<'a> {
    query: &'a str,
    matches: Vec<termdoc_core::Match>,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    tracing::info!(input = %cli.input.display(), queries = cli.query.len(), "building term-document matrix");
    let pipeline = Pipeline::new(cli.order.into());
    let mut reporter: Box<dyn Reporter> = match cli.format {
        Format::Text => Box::new(StdoutReporter),
        Format::Json => Box::new(NullReporter),
    };
    let report = pipeline
        .run(&cli.input, reporter.as_mut())
        .with_context(|| format!("failed to build term-document matrix from {}", cli.input.display()))?;

    let queries = run_queries(&report, &cli.query, cli.top_k);
    match cli.format {
        Format::Text => {
            for q in &queries {
                println!("{}", query_line(q));
            }
        }
        Format::Json => println!("{}", serde_json::to_string(&json_report(&report, queries))?),
    }
    Ok(())
}

fn run_queries<'a>(report: &PipelineReport, queries: &'a [String], k: usize) -> Vec<QueryResult<'a>> {
    if queries.is_empty() {
        return Vec::new();
    }
    let tfidf = TfIdf::fit(&report.matrix);
    queries
        .iter()
        .map(|q| QueryResult { query: q, matches: tfidf.query(&report.vocabulary, q, k) })
        .collect()
}

fn query_line(q: &QueryResult<'_>) -> String {
    if q.matches.is_empty() {
        return format!("query {:?}: no matches", q.query);
    }
    let hits: Vec<String> = q.matches.iter().map(|m| format!("doc {} ({:.4})", m.doc, m.score)).collect();
    format!("query {:?}: {}", q.query, hits.join(", "))
}

fn json_report<'a>(report: &PipelineReport, queries: Vec<QueryResult<'a>>) -> JsonReport<'a> {
    JsonReport {
        reading_s: report.timings.reading.as_secs_f64(),
        indexing_s: report.timings.indexing.as_secs_f64(),
        counting_s: report.timings.counting.as_secs_f64(),
        shape: report.shape(),
        nnz: report.matrix.nnz(),
        documents: report.corpus.len(),
        tokens: report.corpus.token_count(),
        queries,
    }
}
