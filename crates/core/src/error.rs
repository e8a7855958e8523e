use thiserror::Error;

pub type PulseResult<T> = Result<T, PulseError>;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Awaiting input: missing source(s) {}", .sources.join(", "))]
    MissingInput { sources: Vec<String> },

    #[error("Schema error in {source_name}: required column '{column}' not found")]
    Schema { source_name: String, column: String },

    #[error("Date parse error in {source_name} at line {line}: '{value}' is not a day-first date")]
    DateParse {
        source_name: String,
        line: usize,
        value: String,
    },

    #[error("Invalid value in {source_name} at line {line}, column '{column}': '{value}'")]
    InvalidValue {
        source_name: String,
        line: usize,
        column: String,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PulseError {
    pub fn schema(source_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Schema {
            source_name: source_name.into(),
            column: column.into(),
        }
    }

    /// True for the neutral "not all sources supplied yet" state, which the
    /// display layer shows as a prompt rather than a failure.
    pub fn is_awaiting_input(&self) -> bool {
        matches!(self, Self::MissingInput { .. })
    }
}
