//! Error types for the library API.

use llm::error::LLMError;
use thiserror::Error;

/// An input field that failed validation before any call was made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid '{field}': {message}")]
pub struct ValidationError {
    /// Name of the offending input field.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    /// Keeps the first failing field in name order so the reported field is stable.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .map(|e| match &e.message {
                        Some(m) => m.to_string(),
                        None => format!("failed '{}' check", e.code),
                    })
                    .unwrap_or_else(|| "invalid value".to_string());
                ValidationError::new(field.to_string(), message)
            }
            None => ValidationError::new("input", errors.to_string()),
        }
    }
}

/// Failures of the completion service or of its response.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The completion service itself failed (network, quota, auth, timeout).
    #[error("Completion service error: {0}")]
    Service(String),

    /// The response could not be parsed as the expected JSON.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The response parsed but violates the declared output shape.
    #[error("Response does not match shape '{shape}': {reason}")]
    Shape { shape: String, reason: String },

    /// The model asked for a tool the caller did not attach.
    #[error("Model requested tool '{0}' but no such tool is attached")]
    UnexpectedToolCall(String),

    /// The model kept requesting tool data instead of answering.
    #[error("Model made more than {0} tool calls without answering")]
    ToolRoundsExceeded(usize),

    /// A known citation resolved to a different case.
    #[error("Citation '{citation}' must resolve to '{expected}', got '{got}'")]
    CitationMismatch {
        citation: String,
        expected: String,
        got: String,
    },
}

impl From<LLMError> for GenerationError {
    fn from(err: LLMError) -> Self {
        GenerationError::Service(err.to_string())
    }
}

/// The single failure signal of a flow invocation.
#[derive(Error, Debug)]
pub enum FlowError {
    /// An input field violated its declared constraints.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Neither of two alternative inputs was supplied.
    #[error("{0}")]
    MissingInput(String),

    /// The completion call failed or returned an unusable response.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl FlowError {
    /// True when the failure happened before any external call.
    pub fn is_local(&self) -> bool {
        !matches!(self, FlowError::Generation(_))
    }
}

/// Errors related to the document and blob stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An error occurred during store initialization.
    #[error("Failed to initialize store: {0}")]
    Init(String),

    /// The requested document or blob does not exist.
    #[error("Document '{0}' not found")]
    NotFound(String),

    /// A storage path or filename was rejected.
    #[error("Invalid path '{0}'")]
    InvalidPath(String),

    /// A blob is already stored at this path.
    #[error("Blob '{0}' already exists")]
    AlreadyExists(String),

    /// The document content is not UTF-8 text.
    #[error("Document '{0}' is not a text document")]
    NotText(String),

    /// An underlying file I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or deserialize a document record.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
