use crate::{Corpus, TermId};
use indexmap::IndexSet;
use std::collections::BTreeSet;
use std::fmt;

/// How distinct words are enumerated into indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VocabOrder {
    /// Lexicographic (byte) order of the words.
    #[default]
    Sorted,
    /// Order of first occurrence, documents in line order and tokens left to right.
    FirstSeen,
}

impl fmt::Display for VocabOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabOrder::Sorted => f.write_str("sorted"),
            VocabOrder::FirstSeen => f.write_str("first-seen"),
        }
    }
}

/// Distinct words of a corpus, each with one index in `0..len()`.
///
/// `terms` owns every word exactly once; `get_index_of` is word -> index and
/// `get_index` is index -> word, so the two directions cannot drift apart.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: IndexSet<String>,
    order: VocabOrder,
}

impl Vocabulary {
    pub fn build(corpus: &Corpus, order: VocabOrder) -> Self {
        let tokens = corpus.documents().iter().flat_map(|d| d.iter());
        let terms: IndexSet<String> = match order {
            VocabOrder::Sorted => tokens
                .collect::<BTreeSet<&str>>()
                .into_iter()
                .map(str::to_string)
                .collect(),
            VocabOrder::FirstSeen => {
                let mut terms = IndexSet::new();
                for tok in tokens {
                    if !terms.contains(tok) {
                        terms.insert(tok.to_string());
                    }
                }
                terms
            }
        };
        tracing::debug!(vocab_size = terms.len(), %order, "built vocabulary");
        Self { terms, order }
    }

    pub fn index_of(&self, word: &str) -> Option<TermId> { self.terms.get_index_of(word) }
    pub fn word(&self, index: TermId) -> Option<&str> { self.terms.get_index(index).map(String::as_str) }
    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Words in index order.
    pub fn words(&self) -> impl Iterator<Item = &str> { self.terms.iter().map(String::as_str) }
}

// IndexSet equality ignores order; two vocabularies are equal only when every index maps to the same word.
impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.terms.iter().eq(other.terms.iter())
    }
}

impl Eq for Vocabulary {}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus::from_lines(["the cat sat", "the dog sat on the mat"])
    }

    #[test]
    fn sorted_order_is_lexicographic() {
        let v = Vocabulary::build(&corpus(), VocabOrder::Sorted);
        let words: Vec<&str> = v.words().collect();
        assert_eq!(words, ["cat", "dog", "mat", "on", "sat", "the"]);
    }

    #[test]
    fn first_seen_order_follows_the_corpus() {
        let v = Vocabulary::build(&corpus(), VocabOrder::FirstSeen);
        let words: Vec<&str> = v.words().collect();
        assert_eq!(words, ["the", "cat", "sat", "dog", "on", "mat"]);
    }

    #[test]
    fn mappings_are_inverse() {
        for order in [VocabOrder::Sorted, VocabOrder::FirstSeen] {
            let v = Vocabulary::build(&corpus(), order);
            for i in 0..v.len() {
                let w = v.word(i).unwrap();
                assert_eq!(v.index_of(w), Some(i));
            }
            assert_eq!(v.word(v.len()), None);
            assert_eq!(v.index_of("zebra"), None);
        }
    }

    #[test]
    fn equality_respects_index_order() {
        let ba = Vocabulary::build(&Corpus::from_lines(["b a"]), VocabOrder::FirstSeen);
        let ab = Vocabulary::build(&Corpus::from_lines(["a b"]), VocabOrder::FirstSeen);
        assert_eq!(ba.index_of("a"), Some(1));
        assert_eq!(ab.index_of("a"), Some(0));
        assert_ne!(ba, ab);

        let sorted_ba = Vocabulary::build(&Corpus::from_lines(["b a"]), VocabOrder::Sorted);
        let sorted_ab = Vocabulary::build(&Corpus::from_lines(["a b"]), VocabOrder::Sorted);
        assert_eq!(sorted_ba, sorted_ab);
        assert_ne!(sorted_ab, ab);
    }

    #[test]
    fn empty_corpus_gives_empty_vocabulary() {
        let v = Vocabulary::build(&Corpus::default(), VocabOrder::Sorted);
        assert!(v.is_empty());
    }
}
