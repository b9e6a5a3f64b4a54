use crate::{tokenize, DocId, TermDocMatrix, TermId, Vocabulary};
use rustc_hash::FxHashMap;
use serde::Serialize;
use sprs::{CsMat, CsVec};

/// A document ranked against a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Match {
    pub doc: DocId,
    pub score: f64,
}

/// TF-IDF weights derived from a count matrix, same `(terms, documents)` shape.
///
/// tf(w, d) = count(w, d) / len(d), idf(w) = ln(D / df(w)).
#[derive(Debug, Clone)]
pub struct TfIdf {
    weights: CsMat<f64>,
    idf: Vec<f64>,
    /// Euclidean norm of each document column.
    norms: Vec<f64>,
}

impl TfIdf {
    pub fn fit(counts: &TermDocMatrix) -> Self {
        let (n_terms, n_docs) = counts.shape();
        let doc_len = counts.column_sums();

        let mut df = vec![0usize; n_terms];
        for (_, (term, _)) in counts.as_csmat().iter() {
            df[term] += 1;
        }
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| if d == 0 { 0.0 } else { (n_docs as f64 / d as f64).ln() })
            .collect();

        let mut weights: CsMat<f64> = counts.as_csmat().map(|&c| c as f64);
        let mut norms = vec![0.0f64; n_docs];
        for (term, mut row) in weights.outer_iterator_mut().enumerate() {
            for (doc, w) in row.iter_mut() {
                // doc_len[doc] > 0 whenever a count is stored for it
                *w = *w / doc_len[doc] as f64 * idf[term];
                norms[doc] += *w * *w;
            }
        }
        for n in norms.iter_mut() {
            *n = n.sqrt();
        }
        tracing::debug!(terms = n_terms, documents = n_docs, "fitted tf-idf");
        Self { weights, idf, norms }
    }

    pub fn shape(&self) -> (usize, usize) { self.weights.shape() }
    pub fn idf(&self, term: TermId) -> Option<f64> { self.idf.get(term).copied() }

    pub fn weight(&self, term: TermId, doc: DocId) -> f64 {
        self.weights.get(term, doc).copied().unwrap_or(0.0)
    }

    /// Term-count vector of `text` over `vocab`; words outside the vocabulary are dropped.
    pub fn embed(vocab: &Vocabulary, text: &str) -> CsVec<f64> {
        let mut counts: FxHashMap<TermId, f64> = FxHashMap::default();
        for term in tokenize(text).iter().filter_map(|w| vocab.index_of(w)) {
            *counts.entry(term).or_insert(0.0) += 1.0;
        }
        let mut pairs: Vec<(TermId, f64)> = counts.into_iter().collect();
        pairs.sort_unstable_by_key(|&(term, _)| term);
        let (indices, data): (Vec<usize>, Vec<f64>) = pairs.into_iter().unzip();
        CsVec::new(vocab.len(), indices, data)
    }

    /// Rank documents by cosine similarity with `text`, best first, at most `k`.
    /// Ties go to the lower document id; documents scoring zero are left out.
    pub fn query(&self, vocab: &Vocabulary, text: &str, k: usize) -> Vec<Match> {
        let query = Self::embed(vocab, text);
        let q: Vec<(TermId, f64)> = query
            .iter()
            .map(|(term, &count)| (term, count * self.idf(term).unwrap_or(0.0)))
            .filter(|&(_, w)| w != 0.0)
            .collect();
        let q_norm = q.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if q_norm == 0.0 || k == 0 {
            return Vec::new();
        }

        let mut dots: FxHashMap<DocId, f64> = FxHashMap::default();
        for &(term, qw) in &q {
            if let Some(row) = self.weights.outer_view(term) {
                for (doc, &w) in row.iter() {
                    *dots.entry(doc).or_insert(0.0) += w * qw;
                }
            }
        }

        let mut matches: Vec<Match> = dots
            .into_iter()
            .filter(|&(doc, dot)| dot > 0.0 && self.norms[doc] > 0.0)
            .map(|(doc, dot)| Match { doc, score: dot / (self.norms[doc] * q_norm) })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc.cmp(&b.doc)));
        matches.truncate(k);
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{count_terms, Corpus, VocabOrder};

    fn model() -> (Vocabulary, TfIdf) {
        let corpus = Corpus::from_lines(["the cat sat", "the dog sat on the mat", "", "a dog barked"]);
        let vocab = Vocabulary::build(&corpus, VocabOrder::Sorted);
        let counts = count_terms(&vocab, &corpus).unwrap();
        (vocab, TfIdf::fit(&counts))
    }

    #[test]
    fn idf_is_log_of_inverse_document_frequency() {
        let (vocab, tfidf) = model();
        let the = vocab.index_of("the").unwrap();
        let cat = vocab.index_of("cat").unwrap();
        assert!((tfidf.idf(the).unwrap() - (4.0f64 / 2.0).ln()).abs() < 1e-12);
        assert!((tfidf.idf(cat).unwrap() - 4.0f64.ln()).abs() < 1e-12);
        // tf = 1/3
        assert!((tfidf.weight(cat, 0) - 4.0f64.ln() / 3.0).abs() < 1e-12);
        assert_eq!(tfidf.weight(cat, 1), 0.0);
    }

    #[test]
    fn word_in_every_document_has_zero_idf() {
        let corpus = Corpus::from_lines(["x y", "x z"]);
        let vocab = Vocabulary::build(&corpus, VocabOrder::Sorted);
        let tfidf = TfIdf::fit(&count_terms(&vocab, &corpus).unwrap());
        assert_eq!(tfidf.idf(vocab.index_of("x").unwrap()), Some(0.0));
        assert!(tfidf.query(&vocab, "x", 5).is_empty());
    }

    #[test]
    fn query_ranks_the_unique_document_first() {
        let (vocab, tfidf) = model();
        let hits = tfidf.query(&vocab, "CAT", 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc, 0);
        assert!(hits[0].score > 0.0 && hits[0].score <= 1.0 + 1e-12);

        let hits = tfidf.query(&vocab, "dog", 5);
        let docs: Vec<DocId> = hits.iter().map(|m| m.doc).collect();
        assert_eq!(docs.len(), 2);
        assert!(docs.contains(&1) && docs.contains(&3));
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn unknown_or_empty_query_matches_nothing() {
        let (vocab, tfidf) = model();
        assert!(tfidf.query(&vocab, "zebra", 5).is_empty());
        assert!(tfidf.query(&vocab, "   ", 5).is_empty());
        assert!(tfidf.query(&vocab, "cat", 0).is_empty());
    }

    #[test]
    fn embed_counts_known_words() {
        let (vocab, _) = model();
        let v = TfIdf::embed(&vocab, "dog dog unknown cat");
        assert_eq!(v.dim(), vocab.len());
        assert_eq!(v.get(vocab.index_of("dog").unwrap()), Some(&2.0));
        assert_eq!(v.get(vocab.index_of("cat").unwrap()), Some(&1.0));
        assert_eq!(v.nnz(), 2);
    }
}
