//! Reshape raw ratings into the Personalize interactions CSV
//!
//! Input is the MovieLens `u.data` layout: tab separated
//! `user_id  item_id  rating  timestamp`, no header. Output is a CSV with
//! the columns of the bundled interactions schema.

use crate::error::{Result, TrainError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Column order of the interactions dataset
pub const INTERACTIONS_HEADER: [&str; 5] =
    ["USER_ID", "ITEM_ID", "EVENT_TYPE", "EVENT_VALUE", "TIMESTAMP"];

/// Event type recorded for every rating
pub const DEFAULT_EVENT_TYPE: &str = "rating";

#[derive(Debug, Deserialize)]
struct RatingRow {
    user_id: String,
    item_id: String,
    rating: String,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct Interaction<'a> {
    user_id: &'a str,
    item_id: &'a str,
    event_type: &'a str,
    event_value: &'a str,
    timestamp: i64,
}

impl RatingRow {
    fn validate(&self, line: u64) -> Result<i64> {
        if self.user_id.is_empty() || self.item_id.is_empty() {
            return Err(TrainError::InvalidRating {
                line,
                reason: "user and item ids must not be empty".to_string(),
            });
        }

        if self.rating.parse::<f64>().map(f64::is_finite) != Ok(true) {
            return Err(TrainError::InvalidRating {
                line,
                reason: format!("rating '{}' is not a number", self.rating),
            });
        }

        self.timestamp
            .parse::<i64>()
            .map_err(|_| TrainError::InvalidRating {
                line,
                reason: format!("timestamp '{}' is not an integer", self.timestamp),
            })
    }
}

/// Convert tab-separated ratings into interactions CSV, returning the row count
///
/// The header is always written, even for empty input. Ratings keep their
/// original text so `5` stays `5`.
pub fn reshape_ratings<R: Read, W: Write>(input: R, output: W, event_type: &str) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(INTERACTIONS_HEADER)?;

    let mut rows = 0;
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        // Blank lines are skipped by the reader, so count from the input
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: RatingRow = record.deserialize(None)?;
        let timestamp = row.validate(line)?;

        writer.serialize(Interaction {
            user_id: &row.user_id,
            item_id: &row.item_id,
            event_type,
            event_value: &row.rating,
            timestamp,
        })?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}

/// Reshape `source` and write the CSV to `destination`
///
/// Returns the CSV bytes so they can be uploaded without re-reading the file.
pub fn prepare_training_data(
    source: &Path,
    destination: &Path,
    event_type: &str,
) -> Result<Vec<u8>> {
    debug!(source = %source.display(), "Reading ratings");
    let input = BufReader::new(File::open(source)?);

    let mut csv = Vec::new();
    let rows = reshape_ratings(input, &mut csv, event_type)?;

    let mut file = BufWriter::new(File::create(destination)?);
    file.write_all(&csv)?;
    file.flush()?;

    info!(
        rows,
        destination = %destination.display(),
        "Wrote interactions CSV"
    );

    Ok(csv)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn reshape(input: &str) -> Result<String> {
        let mut out = Vec::new();
        reshape_ratings(input.as_bytes(), &mut out, DEFAULT_EVENT_TYPE)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_reshapes_sample_ratings() {
        let csv = reshape("1\t2\t5\t1000\n1\t3\t3\t1001\n").unwrap();

        assert_eq!(
            csv,
            "USER_ID,ITEM_ID,EVENT_TYPE,EVENT_VALUE,TIMESTAMP\n\
             1,2,rating,5,1000\n\
             1,3,rating,3,1001\n"
        );
    }

    #[test]
    fn test_empty_input_still_has_header() {
        let csv = reshape("").unwrap();
        assert_eq!(csv, "USER_ID,ITEM_ID,EVENT_TYPE,EVENT_VALUE,TIMESTAMP\n");
    }

    #[test]
    fn test_custom_event_type() {
        let mut out = Vec::new();
        let rows = reshape_ratings("196\t242\t3.5\t881250949\n".as_bytes(), &mut out, "watch").unwrap();

        assert_eq!(rows, 1);
        assert!(String::from_utf8(out)
            .unwrap()
            .ends_with("196,242,watch,3.5,881250949\n"));
    }

    #[test]
    fn test_rejects_non_numeric_rating() {
        let err = reshape("1\t2\t5\t1000\n1\t3\tgood\t1001\n").unwrap_err();

        match err {
            TrainError::InvalidRating { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("good"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_line_counts_blank_lines() {
        let err = reshape("1\t2\t5\t1000\n\n\n1\t3\tgood\t1001\n").unwrap_err();
        assert!(matches!(err, TrainError::InvalidRating { line: 4, .. }));
    }

    #[test]
    fn test_rejects_fractional_timestamp() {
        let err = reshape("1\t2\t5\t1000.5\n").unwrap_err();
        assert!(matches!(err, TrainError::InvalidRating { line: 1, .. }));
    }

    #[test]
    fn test_rejects_short_rows() {
        let err = reshape("1\t2\t5\n").unwrap_err();
        assert!(matches!(err, TrainError::Csv(_)));
    }

    #[test]
    fn test_prepare_training_data_writes_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("u.data");
        let destination = dir.path().join("serverless-personalize-example-dev-data.csv");
        std::fs::write(&source, "1\t2\t5\t1000\n").unwrap();

        let bytes = prepare_training_data(&source, &destination, DEFAULT_EVENT_TYPE).unwrap();

        assert_eq!(std::fs::read(&destination).unwrap(), bytes);
        assert!(String::from_utf8(bytes).unwrap().contains("1,2,rating,5,1000"));
    }

    #[test]
    fn test_prepare_training_data_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = prepare_training_data(
            &dir.path().join("missing.data"),
            &dir.path().join("out.csv"),
            DEFAULT_EVENT_TYPE,
        );

        assert!(matches!(result, Err(TrainError::Io(_))));
    }
}
