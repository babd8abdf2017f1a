//! ReviewLens dataset handling
//!
//! CSV loading, per-class counting and batch selection for theme extraction

mod aggregate;
mod batch;
mod loader;
mod types;

pub use aggregate::count_classes;
pub use batch::{select_batches, REVIEW_BATCH_CAP};
pub use loader::{load_dataset, CLASS_COLUMN, REVIEW_COLUMN};
pub use types::{ClassCounts, ReviewBatches, ReviewDataset, ReviewRecord, Sentiment};
