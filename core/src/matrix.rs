use crate::{Corpus, DocId, Error, Result, TermId, Vocabulary};
use rustc_hash::FxHashMap;
use sprs::{CsMat, TriMat};

/// Sparse (word, document) -> count matrix of shape `(vocabulary size, document count)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TermDocMatrix {
    counts: CsMat<usize>,
}

impl TermDocMatrix {
    /// Build from parallel coordinate lists. Repeated (row, col) pairs are summed.
    ///
    /// Panics if the lists differ in length or an index falls outside `shape`.
    pub fn from_triplets(shape: (usize, usize), rows: Vec<TermId>, cols: Vec<DocId>, values: Vec<usize>) -> Self {
        let tri = TriMat::from_triplets(shape, rows, cols, values);
        Self { counts: tri.to_csr() }
    }

    pub fn shape(&self) -> (usize, usize) { self.counts.shape() }
    pub fn rows(&self) -> usize { self.counts.rows() }
    pub fn cols(&self) -> usize { self.counts.cols() }
    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize { self.counts.nnz() }
    pub fn as_csmat(&self) -> &CsMat<usize> { &self.counts }

    pub fn get(&self, term: TermId, doc: DocId) -> usize {
        self.counts.get(term, doc).copied().unwrap_or(0)
    }

    /// Occurrences of `term` over the whole corpus.
    pub fn row_sum(&self, term: TermId) -> usize {
        self.counts
            .outer_view(term)
            .map(|row| row.data().iter().sum())
            .unwrap_or(0)
    }

    /// Number of tokens in document `doc`.
    pub fn column_sum(&self, doc: DocId) -> usize {
        self.counts
            .iter()
            .filter(|(_, (_, col))| *col == doc)
            .map(|(v, _)| *v)
            .sum()
    }

    pub fn column_sums(&self) -> Vec<usize> {
        let mut sums = vec![0; self.cols()];
        for (&v, (_, col)) in self.counts.iter() {
            sums[col] += v;
        }
        sums
    }
}

fn count_occurrences(doc: impl Iterator<Item = TermId>) -> FxHashMap<TermId, usize> {
    let mut counts = FxHashMap::default();
    for term in doc {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// Count every word of every document. One triple is emitted per distinct
/// word of a document; absent pairs are implicit zeros.
pub fn count_terms(vocab: &Vocabulary, corpus: &Corpus) -> Result<TermDocMatrix> {
    let mut rows: Vec<TermId> = Vec::new();
    let mut cols: Vec<DocId> = Vec::new();
    let mut values: Vec<usize> = Vec::new();

    for (doc_id, doc) in corpus.documents().iter().enumerate() {
        let ids = doc
            .iter()
            .map(|tok| {
                vocab
                    .index_of(tok)
                    .ok_or_else(|| Error::UnknownTerm { term: tok.to_string(), doc: doc_id })
            })
            .collect::<Result<Vec<TermId>>>()?;

        let mut tally: Vec<(TermId, usize)> = count_occurrences(ids.into_iter()).into_iter().collect();
        tally.sort_unstable_by_key(|&(term, _)| term);
        for (term, count) in tally {
            rows.push(term);
            cols.push(doc_id);
            values.push(count);
        }
    }

    let matrix = TermDocMatrix::from_triplets((vocab.len(), corpus.len()), rows, cols, values);
    tracing::debug!(shape = ?matrix.shape(), nnz = matrix.nnz(), "counted terms");
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VocabOrder;

    #[test]
    fn counts_per_document() {
        let corpus = Corpus::from_lines(["the cat sat", "the dog sat on the mat"]);
        let vocab = Vocabulary::build(&corpus, VocabOrder::Sorted);
        let m = count_terms(&vocab, &corpus).unwrap();
        assert_eq!(m.shape(), (6, 2));
        let the = vocab.index_of("the").unwrap();
        assert_eq!(m.get(the, 0), 1);
        assert_eq!(m.get(the, 1), 2);
        assert_eq!(m.get(vocab.index_of("dog").unwrap(), 0), 0);
        assert_eq!(m.column_sums(), vec![3, 6]);
        assert_eq!(m.column_sum(1), 6);
        assert_eq!(m.row_sum(the), 3);
        assert_eq!(m.nnz(), 8);
    }

    #[test]
    fn duplicate_coordinates_are_summed() {
        let m = TermDocMatrix::from_triplets((2, 2), vec![0, 0, 1], vec![1, 1, 0], vec![2, 3, 1]);
        assert_eq!(m.get(0, 1), 5);
        assert_eq!(m.get(1, 0), 1);
        assert_eq!(m.get(0, 0), 0);
    }

    #[test]
    fn unknown_term_is_an_error() {
        let vocab = Vocabulary::build(&Corpus::from_lines(["a b"]), VocabOrder::Sorted);
        let other = Corpus::from_lines(["a", "b c"]);
        let err = count_terms(&vocab, &other).unwrap_err();
        assert!(matches!(err, Error::UnknownTerm { ref term, doc: 1 } if term == "c"));
    }

    #[test]
    fn empty_corpus_gives_zero_shape() {
        let corpus = Corpus::default();
        let vocab = Vocabulary::build(&corpus, VocabOrder::Sorted);
        let m = count_terms(&vocab, &corpus).unwrap();
        assert_eq!(m.shape(), (0, 0));
        assert!(m.column_sums().is_empty());
    }
}
