//! CSV upload parsing

use reviewlens_common::{Result, ReviewLensError};
use tracing::{debug, info, warn};

use crate::types::{ReviewDataset, ReviewRecord, Sentiment};

/// Column holding the review text
pub const REVIEW_COLUMN: &str = "review";

/// Column holding the 0/1 class label
pub const CLASS_COLUMN: &str = "class";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse uploaded CSV bytes into a dataset
///
/// Fails without a partial result when either required column is absent or the
/// bytes are not readable as CSV. Rows whose class is not 0/1 are skipped and
/// counted in [`ReviewDataset::skipped_rows`].
pub fn load_dataset(bytes: &[u8]) -> Result<ReviewDataset> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ReviewLensError::invalid_csv(e.to_string()))?
        .clone();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let (review_idx, class_idx) = match (position(REVIEW_COLUMN), position(CLASS_COLUMN)) {
        (Some(review), Some(class)) => (review, class),
        (review, class) => {
            let missing = [(REVIEW_COLUMN, review), (CLASS_COLUMN, class)]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            let err = ReviewLensError::missing_columns(&[REVIEW_COLUMN, CLASS_COLUMN], missing);
            warn!("Rejected upload: {}", err);
            return Err(err);
        }
    };

    let mut dataset = ReviewDataset::default();

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ReviewLensError::invalid_csv(e.to_string()))?;
        let raw_class = record.get(class_idx).unwrap_or("");

        match Sentiment::from_class_cell(raw_class) {
            Some(label) => {
                let text = record.get(review_idx).unwrap_or("");
                dataset.records.push(ReviewRecord::new(text, label));
            }
            None => {
                // Header is line 1, so data row N sits on line N + 2
                debug!("Skipping line {}: class value {:?} is not 0 or 1", row + 2, raw_class);
                dataset.skipped_rows += 1;
            }
        }
    }

    if dataset.skipped_rows > 0 {
        warn!(
            "Skipped {} row(s) with a class other than 0/1",
            dataset.skipped_rows
        );
    }

    info!(
        "Loaded {} labeled review(s) from {} data row(s)",
        dataset.len(),
        dataset.total_rows()
    );

    Ok(dataset)
}
