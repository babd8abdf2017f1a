use crate::types::{ClassCounts, ReviewDataset, Sentiment};

/// Count records per class label
pub fn count_classes(dataset: &ReviewDataset) -> ClassCounts {
    dataset
        .records
        .iter()
        .fold(ClassCounts::default(), |mut counts, record| {
            match record.label {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Negative => counts.negative += 1,
            }
            counts
        })
}
