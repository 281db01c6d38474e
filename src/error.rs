use thiserror::Error;

/// Main error type for the statement extractor
#[derive(Error, Debug)]
pub enum StatementError {
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot open PDF document {path}: {message}")]
    DocumentAccess { path: String, message: String },

    #[error("PDF processing failed: {message}")]
    PdfProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Statement header expects {expected} columns but the table has {found}")]
    HeaderMismatch { expected: usize, found: usize },

    #[error("Unsupported output format: {format}")]
    InvalidFormat { format: String },

    #[error("Export to {path} failed")]
    Export {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("File I/O error: {path}")]
    FileIO {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("General error: {0}")]
    General(#[from] anyhow::Error),
}

impl StatementError {
    /// Create a PDF processing error with context
    pub fn pdf_processing(message: impl Into<String>) -> Self {
        Self::PdfProcessing {
            message: message.into(),
            source: None,
        }
    }

    pub fn document_access(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentAccess {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn export(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Export {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Create a file I/O error
    pub fn file_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileIO {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StatementError::FileNotFound { .. })
    }

    /// Get the line printed to the user when a run fails
    pub fn user_message(&self) -> String {
        match self {
            StatementError::FileNotFound { path } => {
                format!("Error: The file '{}' was not found. Please check the name.", path)
            }
            other => format!("An unexpected error occurred: {}", other.describe()),
        }
    }

    /// Error text including the chain of sources, without a backtrace
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}

/// Result type alias for convenience
pub type StatementResult<T> = Result<T, StatementError>;

/// Error context for adding additional information
pub trait ErrorContext<T> {
    fn with_path(self, path: &str) -> StatementResult<T>;
}

impl<T> ErrorContext<T> for Result<T, std::io::Error> {
    fn with_path(self, path: &str) -> StatementResult<T> {
        self.map_err(|e| StatementError::file_io(path, e))
    }
}
