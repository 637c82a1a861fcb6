//! Error handling for the navigation adapter.
//!
//! Cancellation is the only control-flow signal the pipeline distinguishes
//! from normal completion. Everything else that can go wrong surfaces as one
//! of the remaining [`NavigationError`] variants on the navigation's
//! completion handle.
//!
//! Missing mappings and missing view-model registrations are *not* errors:
//! the adapter treats them as "no view-model" and skips the lifecycle hooks.
//!
//! # Examples
//!
//! ```
//! use region_navigator::NavigationError;
//!
//! let err = NavigationError::Cancelled;
//! assert!(err.is_cancelled());
//!
//! let err = NavigationError::invalid_params("'__md__title' is not a string");
//! assert_eq!(err.to_string(), "Invalid parameters: '__md__title' is not a string");
//! ```

use std::fmt;

/// Outcome of a single navigation pipeline run.
pub type NavigationOutcome = Result<(), NavigationError>;

/// Errors a navigation can finish with.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display).
/// The type is `Clone` so a single outcome can be observed by every clone of
/// a shared completion future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The navigation's cancellation token was signalled.
    Cancelled,

    /// A reserved navigation parameter had an unexpected type.
    InvalidParams { message: String },

    /// The pipeline could not run to completion.
    NavigationFailed { message: String },

    /// The adapter was built without a required collaborator.
    Configuration { message: String },

    /// Failure raised by a collaborator hook (view-model, resolver, view factory).
    Custom { message: String },
}

impl NavigationError {
    /// Shorthand for [`NavigationError::InvalidParams`].
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Shorthand for [`NavigationError::NavigationFailed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::NavigationFailed {
            message: message.into(),
        }
    }

    /// Shorthand for [`NavigationError::Custom`].
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Check if this is the cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::Cancelled => write!(f, "Navigation cancelled"),
            NavigationError::InvalidParams { message } => {
                write!(f, "Invalid parameters: {}", message)
            }
            NavigationError::NavigationFailed { message } => {
                write!(f, "Navigation failed: {}", message)
            }
            NavigationError::Configuration { message } => {
                write!(f, "Invalid adapter configuration: {}", message)
            }
            NavigationError::Custom { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for NavigationError {}
