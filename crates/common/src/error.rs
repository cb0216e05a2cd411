//! Common error types and handling for the Freehub client

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Route the client falls back to when a read cannot be completed.
pub const LIST_VIEW_ROUTE: &str = "/dashboard";

/// Route for re-authentication.
pub const LOGIN_ROUTE: &str = "/login";

/// Common error type for the Freehub client
///
/// Every variant is terminal for the user action that produced it. Nothing in
/// the client retries on its own.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify a non-2xx response by its status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => Error::Validation(message),
            401 => Error::Authentication(message),
            403 => Error::Authorization(message),
            404 => Error::NotFound(message),
            409 => Error::Conflict(message),
            _ => Error::Server { status, message },
        }
    }

    /// Get the error code for logs and CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Authentication(_) => "AUTHENTICATION_ERROR",
            Error::Authorization(_) => "AUTHORIZATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict(_) => "CONFLICT",
            Error::EmptyCart => "EMPTY_CART",
            Error::Network(_) => "NETWORK_ERROR",
            Error::Server { .. } => "SERVER_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text shown to the user.
    ///
    /// Server-provided messages are passed through verbatim. Variants without a
    /// useful message fall back to a generic sentence.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg)
            | Error::Authentication(msg)
            | Error::Authorization(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::Server { message: msg, .. }
                if !msg.trim().is_empty() =>
            {
                msg.clone()
            }
            Error::Validation(_) => "Please fill all fields".to_string(),
            Error::Authentication(_) => "Please log in to continue".to_string(),
            Error::Authorization(_) => "You are not allowed to do that".to_string(),
            Error::NotFound(_) => "The requested item could not be found".to_string(),
            Error::Conflict(_) => "The item was changed or removed".to_string(),
            Error::EmptyCart => "Cart is empty".to_string(),
            Error::Network(_) => "Could not reach the server".to_string(),
            Error::Server { .. }
            | Error::Storage(_)
            | Error::Serialization(_)
            | Error::Configuration(_)
            | Error::Internal(_) => "Something went wrong, please try again".to_string(),
        }
    }

    /// Where a screen should navigate after a terminal read failure, if anywhere.
    pub fn fallback_route(&self) -> Option<&'static str> {
        match self {
            Error::Authentication(_) => Some(LOGIN_ROUTE),
            Error::NotFound(_) | Error::Authorization(_) => Some(LIST_VIEW_ROUTE),
            _ => None,
        }
    }
}
