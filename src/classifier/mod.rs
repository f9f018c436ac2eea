//! Review classifier: TF-IDF features feeding a binary logistic regression.

mod stop_words;
pub mod tfidf;

use linfa::prelude::*;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Axis};

use crate::error::{ClassificationError, TrainingError};
use crate::models::Label;

use self::tfidf::TfidfVectorizer;

/// Training hyperparameters.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    pub max_features: usize,
    /// L2 penalty strength.
    pub alpha: f64,
    pub max_iterations: u64,
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self {
            max_features: 1000,
            alpha: 1.0,
            max_iterations: 100,
        }
    }
}

impl TextClassifier {
    /// Fits vectorizer and classifier on the whole corpus.
    ///
    /// L-BFGS starts from zero weights and involves no sampling, so the same
    /// corpus always yields the same model.
    pub fn fit(&self, texts: &[String], labels: &[Label]) -> Result<FittedModel, TrainingError> {
        if texts.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                texts: texts.len(),
                labels: labels.len(),
            });
        }
        if !Label::ALL.iter().all(|class| labels.contains(class)) {
            return Err(TrainingError::SingleClass);
        }

        let mut vectorizer = TfidfVectorizer::new(self.max_features);
        let features = vectorizer.fit_transform(texts)?;

        let dataset = Dataset::new(features, Array1::from(labels.to_vec()));
        let model = LogisticRegression::default()
            .alpha(self.alpha)
            .max_iterations(self.max_iterations)
            .fit(&dataset)
            .map_err(|e| TrainingError::Solver(e.to_string()))?;

        Ok(FittedModel { vectorizer, model })
    }
}

/// Read-only fitted pipeline shared by all request handlers.
pub struct FittedModel {
    vectorizer: TfidfVectorizer,
    model: FittedLogisticRegression<f64, Label>,
}

impl FittedModel {
    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer.vocabulary_len()
    }

    /// Probability per class, in `Label::ALL` order.
    pub fn predict_proba(&self, text: &str) -> Result<[f64; 2], ClassificationError> {
        let features = self.vectorizer.transform(text).insert_axis(Axis(0));
        let p_pos = self.model.predict_probabilities(&features)[0];
        if !p_pos.is_finite() {
            return Err(ClassificationError::NonFinite);
        }

        let p_genuine = if self.model.labels().pos.class == Label::Genuine {
            p_pos
        } else {
            1.0 - p_pos
        };
        Ok([1.0 - p_genuine, p_genuine])
    }

    /// Most probable label and its probability.
    ///
    /// An exact tie goes to the first class in `Label::ALL` (`fake`). That
    /// order carries no meaning, it only keeps the result deterministic.
    pub fn predict(&self, text: &str) -> Result<(Label, f64), ClassificationError> {
        let proba = self.predict_proba(text)?;
        let mut best = 0;
        for (idx, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = idx;
            }
        }
        Ok((Label::ALL[best], proba[best]))
    }
}
