//! Tf-idf index with cosine-similarity ranking.
//!
//! Each document is embedded once at build time as an L2-normalized tf-idf
//! weight vector over the corpus vocabulary. Queries are projected into the
//! same vocabulary (terms unseen at build time contribute zero weight) and
//! ranked by cosine similarity, ties broken by lower document id.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::corpus::Document;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("corpus must contain at least one document")]
    EmptyCorpus,
}

pub struct TfidfIndex {
    corpus: Vec<Document>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    weights: Vec<Vec<f32>>,
}

impl TfidfIndex {
    /// Builds the index from `corpus`. The weight vectors are computed once
    /// here and never recomputed; the corpus is fixed for the process
    /// lifetime.
    pub fn build(corpus: Vec<Document>) -> Result<Self, IndexError> {
        if corpus.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        let tokenized: Vec<Vec<String>> =
            corpus.iter().map(|doc| tokenize(&doc.text)).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<u32> = Vec::new();
        for tokens in &tokenized {
            let mut seen: Vec<usize> = Vec::new();
            for token in tokens {
                let next_id = vocabulary.len();
                let term_id = *vocabulary.entry(token.clone()).or_insert(next_id);
                if term_id == document_frequency.len() {
                    document_frequency.push(0);
                }
                if !seen.contains(&term_id) {
                    document_frequency[term_id] += 1;
                    seen.push(term_id);
                }
            }
        }

        // Smoothed idf, so terms present in every document keep a nonzero
        // weight and unseen document counts never divide by zero.
        let doc_count = corpus.len() as f32;
        let idf: Vec<f32> = document_frequency
            .iter()
            .map(|&df| ((1.0 + doc_count) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let weights: Vec<Vec<f32>> = tokenized
            .iter()
            .map(|tokens| {
                let mut vector = term_weights(tokens, &vocabulary, &idf);
                l2_normalize(&mut vector);
                vector
            })
            .collect();

        Ok(Self {
            corpus,
            vocabulary,
            idf,
            weights,
        })
    }

    /// Returns the `min(top_n, len())` most similar documents in descending
    /// similarity order. A similarity of zero is a valid result; a query with
    /// no in-vocabulary terms still returns `top_n` documents in corpus
    /// order.
    pub fn query(&self, text: &str, top_n: usize) -> Vec<&Document> {
        let query_vector = term_weights(&tokenize(text), &self.vocabulary, &self.idf);

        let mut scored: Vec<(usize, f32)> = self
            .weights
            .iter()
            .enumerate()
            .map(|(id, weights)| (id, cosine_similarity(&query_vector, weights)))
            .collect();

        scored.sort_by(|left, right| {
            right
                .1
                .partial_cmp(&left.1)
                .unwrap_or(Ordering::Equal)
                .then(left.0.cmp(&right.0))
        });
        scored.truncate(top_n);

        scored.into_iter().map(|(id, _)| &self.corpus[id]).collect()
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}

/// Lowercased word tokens of two or more word characters.
fn tokenize(text: &str) -> Vec<String> {
    static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        TOKEN_PATTERN.get_or_init(|| Regex::new(r"\w\w+").expect("static pattern is valid"));

    pattern
        .find_iter(&text.to_lowercase())
        .map(|token| token.as_str().to_string())
        .collect()
}

fn term_weights(
    tokens: &[String],
    vocabulary: &HashMap<String, usize>,
    idf: &[f32],
) -> Vec<f32> {
    let mut vector = vec![0.0; vocabulary.len()];
    for token in tokens {
        if let Some(&term_id) = vocabulary.get(token) {
            vector[term_id] += idf[term_id];
        }
    }
    vector
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for weight in vector.iter_mut() {
            *weight /= norm;
        }
    }
}

fn cosine_similarity(query: &[f32], candidate: &[f32]) -> f32 {
    let dot: f32 = query.iter().zip(candidate.iter()).map(|(q, c)| q * c).sum();
    let query_norm = query.iter().map(|w| w * w).sum::<f32>().sqrt();
    let candidate_norm = candidate.iter().map(|w| w * w).sum::<f32>().sqrt();

    if query_norm == 0.0 || candidate_norm == 0.0 {
        return 0.0;
    }

    dot / (query_norm * candidate_norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::builtin_corpus;

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts
            .iter()
            .enumerate()
            .map(|(id, text)| Document {
                id,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(matches!(
            TfidfIndex::build(Vec::new()),
            Err(IndexError::EmptyCorpus)
        ));
    }

    #[test]
    fn mountain_query_ranks_the_everest_document_first() {
        let index = TfidfIndex::build(builtin_corpus()).expect("build should succeed");
        let results = index.query("What is the tallest mountain?", 2);

        assert_eq!(results.len(), 2);
        assert!(results[0].text.contains("Mount Everest"));
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let index = TfidfIndex::build(builtin_corpus()).expect("build should succeed");
        let first: Vec<usize> = index.query("pets and animals", 3).iter().map(|d| d.id).collect();
        let second: Vec<usize> = index.query("pets and animals", 3).iter().map(|d| d.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn result_count_is_bounded_by_corpus_size() {
        let index = TfidfIndex::build(builtin_corpus()).expect("build should succeed");
        assert_eq!(index.query("ocean", 2).len(), 2);
        assert_eq!(index.query("ocean", 100).len(), index.len());
    }

    #[test]
    fn out_of_vocabulary_query_falls_back_to_corpus_order() {
        let index = TfidfIndex::build(builtin_corpus()).expect("build should succeed");
        let results = index.query("zzzqqq xxyyzz", 2);

        let ids: Vec<usize> = results.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn equal_scores_break_ties_by_lower_id() {
        let index = TfidfIndex::build(docs(&[
            "alpha beta gamma",
            "shared words here",
            "shared words here",
        ]))
        .expect("build should succeed");

        let results = index.query("shared words", 2);
        let ids: Vec<usize> = results.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn single_character_tokens_are_ignored() {
        assert_eq!(tokenize("A dog is a pet"), vec!["dog", "is", "pet"]);
    }
}
