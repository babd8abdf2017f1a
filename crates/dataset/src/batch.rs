use tracing::debug;

use crate::types::{ReviewBatches, ReviewDataset, Sentiment};

/// Maximum number of reviews sent per extraction call
pub const REVIEW_BATCH_CAP: usize = 30;

/// Split reviews by label, keeping the first `cap` of each in file order
pub fn select_batches(dataset: &ReviewDataset, cap: usize) -> ReviewBatches {
    let take = |label: Sentiment| -> Vec<String> {
        dataset
            .records
            .iter()
            .filter(|r| r.label == label)
            .take(cap)
            .map(|r| r.text.clone())
            .collect()
    };

    let batches = ReviewBatches {
        positive: take(Sentiment::Positive),
        negative: take(Sentiment::Negative),
    };

    debug!(
        "Selected batches: positive={}, negative={}, cap={}",
        batches.positive.len(),
        batches.negative.len(),
        cap
    );

    batches
}
