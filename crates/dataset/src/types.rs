use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary review label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Class 0
    Negative,
    /// Class 1
    Positive,
}

impl Sentiment {
    /// Numeric class value used in the uploaded table
    pub fn class_value(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }

    /// Parse a raw `class` cell
    ///
    /// Accepts `0`/`1` and their float spellings (`0.0`, `1.0`).
    /// Anything else, including an empty cell, yields `None`.
    pub fn from_class_cell(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::Positive),
            "0" => Some(Self::Negative),
            other => match other.parse::<f64>() {
                Ok(v) if v == 1.0 => Some(Self::Positive),
                Ok(v) if v == 0.0 => Some(Self::Negative),
                _ => None,
            },
        }
    }

    /// Label used when prompting the model ("positive"/"negative")
    pub fn label(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Positive => "positive",
        }
    }

    /// Capitalized label used for chart bars
    pub fn title(self) -> &'static str {
        match self {
            Self::Negative => "Negative",
            Self::Positive => "Positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One labeled review row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRecord {
    /// Review text
    pub text: String,

    /// Class label
    pub label: Sentiment,
}

impl ReviewRecord {
    pub fn new(text: impl Into<String>, label: Sentiment) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Reviews loaded from one upload, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDataset {
    /// Rows whose class is 0 or 1
    pub records: Vec<ReviewRecord>,

    /// Rows dropped because their class was neither 0 nor 1
    pub skipped_rows: usize,
}

impl ReviewDataset {
    pub fn new(records: Vec<ReviewRecord>) -> Self {
        Self {
            records,
            skipped_rows: 0,
        }
    }

    /// Number of labeled rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total data rows read from the file, including skipped ones
    pub fn total_rows(&self) -> usize {
        self.records.len() + self.skipped_rows
    }
}

/// Record count per class label
///
/// Both labels are always present; an absent label counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    /// Rows labeled 1
    pub positive: usize,

    /// Rows labeled 0
    pub negative: usize,
}

impl ClassCounts {
    pub fn get(&self, label: Sentiment) -> usize {
        match label {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    /// Larger of the two counts (chart scale)
    pub fn max(&self) -> usize {
        self.positive.max(self.negative)
    }
}

/// Review texts sent to theme extraction, one list per label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewBatches {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl ReviewBatches {
    pub fn get(&self, label: Sentiment) -> &[String] {
        match label {
            Sentiment::Positive => &self.positive,
            Sentiment::Negative => &self.negative,
        }
    }
}
