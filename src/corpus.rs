//! Labelled training corpus loaded from a CSV file with `review` and `label` columns.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::error::CorpusError;
use crate::models::Label;

#[derive(Debug, Deserialize)]
struct CorpusRow {
    review: Option<String>,
    label: Option<String>,
}

/// Cleaned corpus: parallel text and label lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    pub texts: Vec<String>,
    pub labels: Vec<Label>,
}

impl Corpus {
    pub(crate) fn len(&self) -> usize {
        self.texts.len()
    }
}

pub fn load(path: &Path) -> Result<Corpus, CorpusError> {
    let file = File::open(path)?;
    from_reader(file)
}

/// Rows with an empty or missing field are dropped before any other check.
pub fn from_reader<R: Read>(reader: R) -> Result<Corpus, CorpusError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in ["review", "label"] {
        if !headers.iter().any(|h| h == column) {
            return Err(CorpusError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize::<CorpusRow>() {
        let row = result?;
        let review = row.review.filter(|s| !s.is_empty());
        let label = row.label.filter(|s| !s.is_empty());
        if let (Some(review), Some(label)) = (review, label) {
            rows.push((review, label));
        }
    }

    if rows.len() < 2 {
        return Err(CorpusError::InsufficientData { rows: rows.len() });
    }

    let mut texts = Vec::with_capacity(rows.len());
    let mut labels = Vec::with_capacity(rows.len());
    for (review, raw_label) in rows {
        let label = raw_label
            .parse::<Label>()
            .map_err(|label| CorpusError::InvalidLabel { label })?;
        texts.push(review);
        labels.push(label);
    }

    Ok(Corpus { texts, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_two_column_corpus() {
        let csv = "review,label\ngreat product,genuine\ntotal scam,fake\n";
        let corpus = from_reader(csv.as_bytes()).unwrap();
        assert_eq!(corpus.texts, vec!["great product", "total scam"]);
        assert_eq!(corpus.labels, vec![Label::Genuine, Label::Fake]);
    }

    #[test]
    fn drops_rows_with_missing_fields() {
        let csv = "review,label\n\
                   great product,genuine\n\
                   ,fake\n\
                   no label here,\n\
                   short row\n\
                   total scam,fake\n";
        let corpus = from_reader(csv.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.labels, vec![Label::Genuine, Label::Fake]);
    }

    #[test]
    fn single_row_is_insufficient() {
        let csv = "review,label\ngreat product,genuine\n";
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CorpusError::InsufficientData { rows: 1 }));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let csv = "review,label\ngreat product,genuine\nbuy now,spam\n";
        let err = from_reader(csv.as_bytes()).unwrap_err();
        match err {
            CorpusError::InvalidLabel { label } => assert_eq!(label, "spam"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "text,label\ngreat product,genuine\ntotal scam,fake\n";
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CorpusError::MissingColumn("review")));
    }

    #[test]
    fn extra_columns_and_quoting_are_fine() {
        let csv = "id,review,label\n1,\"Loved it, would buy again\",genuine\n2,\"FREE!!! click\",fake\n";
        let corpus = from_reader(csv.as_bytes()).unwrap();
        assert_eq!(corpus.texts[0], "Loved it, would buy again");
    }

    #[test]
    fn load_reads_from_disk_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "review,label").unwrap();
        writeln!(file, "works as described,genuine").unwrap();
        writeln!(file, "best ever best ever,fake").unwrap();
        drop(file);

        assert_eq!(load(&path).unwrap().len(), 2);
        let err = load(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, CorpusError::Io(_)));
    }
}
