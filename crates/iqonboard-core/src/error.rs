use thiserror::Error;

/// Errors raised while preparing or driving an onboarding run.
#[derive(Debug, Error)]
pub enum OnboardError {
    #[error("Import file is missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Failed to read import file {path}: {source}")]
    ImportFile {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed import row at line {line}: {source}")]
    MalformedRow {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid credentials: expected user:password")]
    InvalidCredentials,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Failed to load inventory snapshot: {0}")]
    Snapshot(#[source] GatewayError),
}

impl OnboardError {
    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// True for failures detected while validating the import file header.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::MissingColumns { .. })
    }
}

/// Outcome of a failed call against the inventory API.
///
/// The first three variants mean "the server answered but gave us nothing
/// usable"; callers treat them as absence. The last two mean the exchange
/// itself broke.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Not found")]
    NotFound,

    #[error("Empty response body")]
    Empty,

    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Failed to connect to server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// The server answered, but without a usable value.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::NotFound | Self::Empty | Self::Remote { .. })
    }
}

pub type Result<T> = std::result::Result<T, OnboardError>;
