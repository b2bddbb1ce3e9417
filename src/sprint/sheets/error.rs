use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error type covering the failures that can occur while fetching sprint
/// statistics or writing them into a spreadsheet.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Raised when reading or writing a local file fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failures from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A remote service answered with a non-success status code.
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The task tracker rejected the credentials or could not be reached.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A response did not carry a field the tool relies on.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// A credentials file could not be read or does not have the expected shape.
    #[error("invalid credentials file {path}: {reason}")]
    Credentials { path: PathBuf, reason: String },

    /// A service endpoint could not be turned into a request URL.
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No spreadsheet document with the requested name is visible to the account.
    #[error("spreadsheet '{0}' not found")]
    SpreadsheetNotFound(String),

    /// The requested worksheet does not exist inside the document.
    #[error("worksheet '{0}' not found")]
    WorksheetNotFound(String),

    /// A header-text search found no matching cell.
    #[error("no cell contains '{0}'")]
    CellNotFound(String),

    /// Raised when a cell operation is attempted before a worksheet is selected.
    #[error("no worksheet selected")]
    NoWorksheetSelected,

    /// Failure while producing the service-account token signature.
    #[error("failed to sign token request: {0}")]
    Signing(String),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a local workbook cannot be used as a sync target.
    #[error("invalid workbook: {0}")]
    InvalidWorkbook(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl SyncError {
    /// Whether repeating the failed call has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Http(error) => error.is_timeout() || error.is_connect(),
            SyncError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
