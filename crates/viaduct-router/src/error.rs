//! Error types for routing and dispatch.

use thiserror::Error;

use crate::request::Method;

/// Errors raised while resolving or dispatching a request.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No route matched the request path.
    #[error("no route matched: {method} {path}")]
    PageNotFound {
        /// The request method.
        method: Method,
        /// The request path.
        path: String,
    },

    /// A route matched the path, but not the request method.
    ///
    /// Carries the ordered union of every method accepted for this path,
    /// OPTIONS always included, so the caller can build a complete `Allow`
    /// header.
    #[error("method not allowed: {method} for {path}")]
    MethodNotAllowed {
        /// The rejected request method.
        method: Method,
        /// The request path.
        path: String,
        /// Every method some route accepts for this path.
        allowed: Vec<Method>,
    },

    /// A route template could not be compiled.
    #[error("invalid route pattern: {0}")]
    InvalidPattern(String),

    /// No route is registered under this name.
    #[error("unknown route name: {0}")]
    UnknownRouteName(String),

    /// A handler or URL template required a parameter that was not supplied.
    #[error("missing route parameter: {0}")]
    MissingParameter(String),

    /// No controller factory is registered under this name.
    #[error("unknown controller: {0}")]
    UnknownController(String),

    /// The controller does not expose the named action.
    #[error("unknown action: {controller}::{action}")]
    UnknownAction {
        /// The resolved controller name.
        controller: String,
        /// The requested action name.
        action: String,
    },

    /// No filter is registered under this name.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// An action or filter failed. Passed through untranslated.
    #[error("action failed: {0}")]
    Action(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for routing operations.
pub type Result<T> = std::result::Result<T, RouterError>;
