use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest review text shown in history before it is cut.
pub const HISTORY_PREVIEW_CHARS: usize = 100;

/// Verdict for a review. Variant order is the classifier's class order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Fake,
    Genuine,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Fake, Label::Genuine];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fake => "fake",
            Label::Genuine => "genuine",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fake" => Ok(Label::Fake),
            "genuine" => Ok(Label::Genuine),
            other => Err(other.to_string()),
        }
    }
}

/// One stored row of the predictions table.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: i64,
    pub review: String,
    pub prediction: Label,
    /// Probability in `[0, 1]`.
    pub confidence: f64,
}

/// A freshly computed and persisted prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub id: i64,
    pub label: Label,
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub review: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Label,
    pub confidence: f64,
    pub status: String,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            prediction: p.label,
            confidence: as_percent(p.confidence),
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryEntry {
    pub review: String,
    pub prediction: Label,
    pub confidence: f64,
}

impl From<PredictionRecord> for HistoryEntry {
    fn from(record: PredictionRecord) -> Self {
        Self {
            review: preview(&record.review),
            prediction: record.prediction,
            confidence: as_percent(record.confidence),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Probability to a percentage rounded to two decimals.
///
/// Rounds the exact binary value of the percentage through decimal
/// formatting, so `0.125` becomes `0.12` rather than `0.13`.
pub fn as_percent(probability: f64) -> f64 {
    let percent = probability * 100.0;
    format!("{:.2}", percent).parse().unwrap_or(percent)
}

/// Display form of a stored review; the stored text is never modified.
pub fn preview(review: &str) -> String {
    match review.char_indices().nth(HISTORY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &review[..cut]),
        None => review.to_string(),
    }
}
