//! Typed error handling for the FoodWagen client
//!
//! # Error Categories
//!
//! - [`FoodError::Validation`]: form input rejected before anything is sent
//! - [`FoodError::Transport`]: the remote answered with a non-2xx status
//! - [`FoodError::Network`]: no response at all (connect, DNS, timeout)
//! - [`FoodError::Decode`]: a 2xx response whose body is not the expected JSON
//! - [`FoodError::Normalization`]: a remote record missing its required fields
//! - [`FoodError::Cancelled`]: the caller fired the request's cancel signal
//! - [`FoodError::Config`]: invalid client configuration
//!
//! Transport and network failures look the same to a user (see
//! [`FoodError::user_message`]); only logs and [`FoodError::status`] tell them
//! apart.
//!
//! # Example
//!
//! ```rust,ignore
//! match cache.delete("42", &CancelToken::new()).await {
//!     Ok(()) => println!("deleted"),
//!     Err(FoodError::Transport { status: 404, .. }) => println!("already gone"),
//!     Err(e) => eprintln!("{}", e.user_message(Action::Delete)),
//! }
//! ```

use crate::config::ConfigError;
use crate::core::validation::ValidationErrors;
use std::fmt;

/// Main error type of the crate
#[derive(Debug)]
pub enum FoodError {
    /// Form data failed validation
    Validation(ValidationErrors),

    /// The remote responded with a non-success status code
    Transport {
        method: String,
        path: String,
        status: u16,
    },

    /// The remote could not be reached or the response was cut off
    Network { message: String },

    /// A success response carried a body that could not be decoded
    Decode { message: String },

    /// A remote record could not be normalized
    Normalization(NormalizationError),

    /// The request was cancelled by its caller
    Cancelled,

    /// Client configuration is invalid
    Config(ConfigError),

    /// Internal error (should not happen in normal operation)
    Internal(String),
}

/// Errors raised by the remote schema adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("remote record is not a JSON object")]
    NotAnObject,

    #[error("remote record is missing required field '{field}'")]
    MissingField { field: &'static str },
}

/// What the user was trying to do, used to pick a failure message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Search,
    Save,
    Delete,
}

impl fmt::Display for FoodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodError::Validation(e) => write!(f, "{}", e),
            FoodError::Transport {
                method,
                path,
                status,
            } => write!(f, "HTTP error! status: {} ({} {})", status, method, path),
            FoodError::Network { message } => write!(f, "Network error: {}", message),
            FoodError::Decode { message } => {
                write!(f, "Failed to decode response body: {}", message)
            }
            FoodError::Normalization(e) => write!(f, "{}", e),
            FoodError::Cancelled => write!(f, "Request cancelled"),
            FoodError::Config(e) => write!(f, "{}", e),
            FoodError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for FoodError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FoodError::Validation(e) => Some(e),
            FoodError::Normalization(e) => Some(e),
            FoodError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl FoodError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FoodError::Validation(_) => "VALIDATION_ERROR",
            FoodError::Transport { .. } => "TRANSPORT_ERROR",
            FoodError::Network { .. } => "NETWORK_ERROR",
            FoodError::Decode { .. } => "DECODE_ERROR",
            FoodError::Normalization(_) => "NORMALIZATION_ERROR",
            FoodError::Cancelled => "CANCELLED",
            FoodError::Config(_) => "CONFIG_ERROR",
            FoodError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status of a transport error
    pub fn status(&self) -> Option<u16> {
        match self {
            FoodError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FoodError::Transport { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, FoodError::Network { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FoodError::Cancelled)
    }

    /// Message suitable for a toast or banner
    ///
    /// Never includes status codes or transport details.
    pub fn user_message(&self, action: Action) -> String {
        if let FoodError::Validation(_) = self {
            return "Please fix the highlighted fields.".to_string();
        }
        match action {
            Action::Load => "Failed to load meals. Please try again.".to_string(),
            Action::Search => "Search failed. Please try again.".to_string(),
            Action::Save => "Failed to save meal. Please try again.".to_string(),
            Action::Delete => "Failed to delete meal. Please try again.".to_string(),
        }
    }
}

impl From<ValidationErrors> for FoodError {
    fn from(err: ValidationErrors) -> Self {
        FoodError::Validation(err)
    }
}

impl From<NormalizationError> for FoodError {
    fn from(err: NormalizationError) -> Self {
        FoodError::Normalization(err)
    }
}

impl From<ConfigError> for FoodError {
    fn from(err: ConfigError) -> Self {
        FoodError::Config(err)
    }
}

impl From<serde_json::Error> for FoodError {
    fn from(err: serde_json::Error) -> Self {
        FoodError::Decode {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for FoodWagen operations
pub type FoodResult<T> = Result<T, FoodError>;
