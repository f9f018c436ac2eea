//! Term-frequency / inverse-document-frequency features.
//!
//! Tokens are lowercased runs of two or more word characters with English
//! stop words removed. The vocabulary keeps the `max_features` terms with the
//! highest corpus count (ties go alphabetically) and indexes them in
//! alphabetical order. IDF is smoothed, `ln((1 + n) / (1 + df)) + 1`, and every
//! document vector is L2-normalized.

use std::collections::{BTreeMap, HashMap, HashSet};

use ndarray::{Array1, Array2};
use regex::Regex;

use super::stop_words::is_stop_word;
use crate::error::TrainingError;

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    token_re: Regex,
    vocabulary: HashMap<String, usize>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            token_re: Regex::new(TOKEN_PATTERN).expect("token pattern is valid"),
            vocabulary: HashMap::new(),
            idf: Array1::zeros(0),
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    #[cfg(test)]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_re
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !is_stop_word(t))
            .map(str::to_string)
            .collect()
    }

    /// Learns vocabulary and IDF weights, returning the training matrix.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Array2<f64>, TrainingError> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| self.tokenize(d)).collect();

        let mut term_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            let mut seen = HashSet::new();
            for token in tokens {
                *term_counts.entry(token.as_str()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.as_str()).or_insert(0) += 1;
                }
            }
        }

        if term_counts.is_empty() {
            return Err(TrainingError::EmptyVocabulary);
        }

        // BTreeMap iteration is alphabetical and the sort is stable.
        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.max_features);
        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        let n_docs = documents.len() as f64;
        let mut idf = Array1::zeros(kept.len());
        let mut vocabulary = HashMap::with_capacity(kept.len());
        for (idx, term) in kept.iter().enumerate() {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            idf[idx] = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
            vocabulary.insert(term.to_string(), idx);
        }
        self.vocabulary = vocabulary;
        self.idf = idf;

        let mut matrix = Array2::zeros((documents.len(), self.vocabulary.len()));
        for (row, tokens) in tokenized.iter().enumerate() {
            matrix.row_mut(row).assign(&self.weigh(tokens));
        }

        if matrix.iter().all(|v| *v == 0.0) {
            return Err(TrainingError::EmptyVocabulary);
        }
        Ok(matrix)
    }

    /// Feature vector for one document against the fitted vocabulary.
    pub fn transform(&self, document: &str) -> Array1<f64> {
        self.weigh(&self.tokenize(document))
    }

    fn weigh(&self, tokens: &[String]) -> Array1<f64> {
        let mut features = Array1::zeros(self.vocabulary.len());
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                features[idx] += 1.0;
            }
        }
        features *= &self.idf;

        let norm = features.dot(&features).sqrt();
        if norm > 0.0 {
            features /= norm;
        }
        features
    }
}
