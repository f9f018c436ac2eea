//! Request orchestration: validate, classify, persist.

use std::sync::Arc;

use actix_web::web;

use crate::classifier::FittedModel;
use crate::error::{ClassificationError, ServiceError};
use crate::models::{HistoryEntry, Prediction};
use crate::store::PredictionStore;

pub const MAX_REVIEW_CHARS: usize = 1000;
pub const HISTORY_LIMIT: u32 = 20;

pub struct PredictionService {
    model: Arc<FittedModel>,
    store: PredictionStore,
}

impl PredictionService {
    pub fn new(model: FittedModel, store: PredictionStore) -> Self {
        Self {
            model: Arc::new(model),
            store,
        }
    }

    /// Classifies a review and records the result.
    ///
    /// If the write fails the whole request fails; the computed prediction is
    /// only logged.
    pub async fn predict(&self, review: Option<String>) -> Result<Prediction, ServiceError> {
        let review = validate(review)?;

        let model = Arc::clone(&self.model);
        let text = review.clone();
        let (label, confidence) = web::block(move || model.predict(&text))
            .await
            .map_err(|_| ClassificationError::WorkerUnavailable)??;

        let id = self
            .store
            .append(&review, label, confidence)
            .await
            .map_err(|err| {
                log::error!(
                    "prediction {} ({:.4}) computed but not stored: {}",
                    label,
                    confidence,
                    err
                );
                ServiceError::Persist(err)
            })?;

        log::debug!("stored prediction #{id}: {label} ({confidence:.4})");
        Ok(Prediction {
            id,
            label,
            confidence,
        })
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ServiceError> {
        let records = self
            .store
            .recent(HISTORY_LIMIT)
            .await
            .map_err(ServiceError::History)?;
        Ok(records.into_iter().map(HistoryEntry::from).collect())
    }

    pub async fn close_store(&self) {
        self.store.close().await;
    }
}

/// Trims the review and enforces the non-empty and length rules.
pub fn validate(review: Option<String>) -> Result<String, ServiceError> {
    let review = review.unwrap_or_default();
    let trimmed = review.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::EmptyInput);
    }
    if trimmed.chars().count() > MAX_REVIEW_CHARS {
        return Err(ServiceError::InputTooLarge {
            max: MAX_REVIEW_CHARS,
        });
    }
    Ok(trimmed.to_string())
}
