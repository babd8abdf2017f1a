/// ReviewLens error types
#[derive(Debug, thiserror::Error)]
pub enum ReviewLensError {
    /// Uploaded table lacks one or more required columns
    #[error("CSV must have {} column(s); missing: {}", quoted(.required), quoted(.missing))]
    MissingColumns {
        required: Vec<String>,
        missing: Vec<String>,
    },

    /// Uploaded bytes could not be read as CSV
    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    /// LLM related error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(" and ")
}

impl ReviewLensError {
    /// Create missing-columns error
    pub fn missing_columns(required: &[&str], missing: Vec<String>) -> Self {
        Self::MissingColumns {
            required: required.iter().map(|s| s.to_string()).collect(),
            missing,
        }
    }

    /// Create invalid CSV error
    pub fn invalid_csv<S: Into<String>>(msg: S) -> Self {
        Self::InvalidCsv(msg.into())
    }

    /// Create LLM error
    pub fn llm<S: Into<String>>(msg: S) -> Self {
        Self::Llm(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

// HTTP response conversion
impl ReviewLensError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingColumns { .. } => 422,
            Self::InvalidCsv(_) => 400,
            Self::Config(_) => 500,
            Self::Llm(_) => 502,
            Self::Io(_) => 500,
        }
    }
}
