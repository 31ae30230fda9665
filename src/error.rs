use std::path::PathBuf;

/// Exit code for missing/unreadable input and bad arguments.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for data that could not be normalized.
pub const EXIT_DATA: u8 = 3;
/// Exit code for terminal and other runtime failures.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures of the input collaborator (reading the delimited source file).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source file not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Missing required column `{column}` in '{}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

/// A timestamp that does not match the fixed `YYYY-MM-DD HH:MM:SS` layout.
///
/// Normalization is all-or-nothing: one bad timestamp fails the whole set.
#[derive(Debug, thiserror::Error)]
#[error("Row {row}: timestamp '{value}' does not match `{format}` ({source})")]
pub struct ParseError {
    /// Zero-based index into the raw rows.
    pub row: usize,
    pub value: String,
    pub format: &'static str,
    #[source]
    pub source: chrono::ParseError,
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::new(EXIT_DATA, err.to_string())
    }
}
