//! Error types for the Fyndd client.

use thiserror::Error;

/// Generic message shown when the backend gives no usable explanation.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Generic message shown when a search fails without a server message.
pub const GENERIC_SEARCH_FAILURE_MESSAGE: &str = "Search failed. Please try again.";

/// A shared error type for the entire Fyndd client.
///
/// Variants follow the error taxonomy the views care about: authentication,
/// absence, validation, transport, conflicts and the search-specific
/// failures. Conversions from common error types are provided via `From`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FynddError {
    /// No token, or the backend rejected it (HTTP 401).
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Client-side form check or HTTP 400 from the backend.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// Network failure or timeout before a response was received.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The requested change already holds (e.g. request to an existing friend).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-success HTTP status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A text search was attempted with a blank query.
    #[error("Search query is empty")]
    EmptyQuery,

    /// An image search was attempted with an unusable blob.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// The hybrid-search call failed.
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// A product without any id-family field was used for a cart operation.
    #[error("Product has no identifier and cannot be added to the cart")]
    ProductUnusable,

    /// Client-local persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FynddError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a ValidationFailed error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a NotAuthenticated error
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Converts a backend failure into the search-specific error.
    ///
    /// Client-side validation errors (`EmptyQuery`, `InvalidImage`) and
    /// authentication failures pass through unchanged; everything else becomes
    /// `SearchFailed` carrying the server message when there is one.
    pub fn into_search_failure(self) -> Self {
        match self {
            Self::EmptyQuery
            | Self::InvalidImage(_)
            | Self::SearchFailed(_)
            | Self::NotAuthenticated => self,
            Self::Server { message, .. }
            | Self::ValidationFailed { message, .. }
            | Self::Conflict(message)
                if !message.trim().is_empty() =>
            {
                Self::SearchFailed(message)
            }
            _ => Self::SearchFailed(GENERIC_SEARCH_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Returns the text a view should show for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Please log in to continue.".to_string(),
            Self::NotFound { entity_type, .. } => format!("The {} no longer exists.", entity_type),
            Self::ValidationFailed { message, .. } => message.clone(),
            Self::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Conflict(message) => message.clone(),
            Self::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::EmptyQuery => "Please enter something to search for.".to_string(),
            Self::InvalidImage(reason) => reason.clone(),
            Self::SearchFailed(message) => message.clone(),
            Self::ProductUnusable => {
                "This product cannot be added to the cart right now.".to_string()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for FynddError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for FynddError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for FynddError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for FynddError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for FynddError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            };
        }
        match err.status() {
            Some(status) => Self::Server {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, FynddError>`.
pub type Result<T> = std::result::Result<T, FynddError>;
