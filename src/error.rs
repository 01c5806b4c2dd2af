//! Error types for indexer operations

use thiserror::Error;

/// Errors surfaced by [`crate::NewznabClient`] operations.
///
/// Field-level problems inside a result row (an unparseable date, a bad
/// integer attribute) never show up here; they degrade to the field's zero
/// value during normalization.
#[derive(Debug, Error)]
pub enum NewznabError {
    /// The HTTP request itself failed (connect, TLS, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The indexer answered with a non-success status and no error envelope.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The body is not well-formed XML or lacks the expected envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The indexer returned an `<error code=".." description=".."/>` envelope.
    #[error("indexer error {code}: {description}")]
    Indexer { code: i32, description: String },

    /// Invalid client configuration (base URL, credentials, env values).
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl NewznabError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the failure happened below the XML layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }

    /// The indexer's error code, if the indexer rejected the request.
    pub fn indexer_code(&self) -> Option<i32> {
        match self {
            Self::Indexer { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for NewznabError {
    fn from(err: quick_xml::Error) -> Self {
        Self::MalformedResponse(format!("XML parse error: {}", err))
    }
}

impl From<url::ParseError> for NewznabError {
    fn from(err: url::ParseError) -> Self {
        Self::Configuration(format!("invalid base URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, NewznabError>;
