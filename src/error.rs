use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Failures while reading the training corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error reading corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed corpus: {0}")]
    Csv(#[from] csv::Error),

    #[error("Corpus is missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("Not enough training data ({rows} usable rows, need at least 2)")]
    InsufficientData { rows: usize },

    #[error("Labels must be 'fake' or 'genuine', found '{label}'")]
    InvalidLabel { label: String },
}

/// Failures while fitting the classifier.
#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("Got {texts} texts but {labels} labels")]
    LengthMismatch { texts: usize, labels: usize },

    #[error("Training data must contain both classes")]
    SingleClass,

    #[error("Empty vocabulary; the corpus may only contain stop words")]
    EmptyVocabulary,

    #[error("Solver failed: {0}")]
    Solver(String),
}

#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("classifier produced a non-finite probability")]
    NonFinite,

    #[error("classification worker pool is unavailable")]
    WorkerUnavailable,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not open database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("could not create reviews table: {0}")]
    Init(#[source] sqlx::Error),

    #[error("could not store prediction: {0}")]
    Write(#[source] sqlx::Error),

    #[error("could not read predictions: {0}")]
    Read(#[source] sqlx::Error),

    #[error("stored row {id} has unknown prediction '{label}'")]
    CorruptLabel { id: i64, label: String },
}

/// Request-level failures, rendered as `{"error": ...}` bodies.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Review text is required")]
    EmptyInput,

    #[error("Review text is too long (max {max} characters)")]
    InputTooLarge { max: usize },

    #[error("No JSON data provided")]
    MalformedBody,

    #[error("Server error: {0}")]
    Classification(#[from] ClassificationError),

    #[error("Server error: {0}")]
    Persist(#[source] StoreError),

    #[error("Database error: {0}")]
    History(#[source] StoreError),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::EmptyInput
            | ServiceError::InputTooLarge { .. }
            | ServiceError::MalformedBody => StatusCode::BAD_REQUEST,
            ServiceError::Classification(_)
            | ServiceError::Persist(_)
            | ServiceError::History(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
