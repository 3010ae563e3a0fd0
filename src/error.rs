//! Unified error types for chaser-element

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for chaser-element
#[derive(Error, Debug)]
pub enum Error {
    /// The selector never resolved, or a handle-based reference was lost
    #[error("Unknown object: {0}")]
    UnknownObject(String),

    /// A frame could not be located or switched into
    #[error("Unknown frame: {0}")]
    UnknownFrame(String),

    /// Element resolved but is disabled
    #[error("Object disabled: {0}")]
    ObjectDisabled(String),

    /// Element resolved and enabled but read only
    #[error("Object read only: {0}")]
    ObjectReadOnly(String),

    /// A precondition never became true within the deadline
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// The remote side reported the handle as detached from the DOM
    #[error("Stale element reference: {0}")]
    StaleElement(String),

    /// Selector criteria cannot be combined or evaluated
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Attribute accessor is not registered
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The driver cannot perform the requested gesture
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Any other remote protocol error
    #[error("WebDriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new unknown object error
    pub fn unknown_object<S: Into<String>>(msg: S) -> Self {
        Error::UnknownObject(msg.into())
    }

    /// Create a new unknown frame error
    pub fn unknown_frame<S: Into<String>>(msg: S) -> Self {
        Error::UnknownFrame(msg.into())
    }

    /// Create a new object disabled error
    pub fn object_disabled<S: Into<String>>(msg: S) -> Self {
        Error::ObjectDisabled(msg.into())
    }

    /// Create a new object read only error
    pub fn object_read_only<S: Into<String>>(msg: S) -> Self {
        Error::ObjectReadOnly(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new stale element error
    pub fn stale<S: Into<String>>(msg: S) -> Self {
        Error::StaleElement(msg.into())
    }

    /// Create a new invalid selector error
    pub fn invalid_selector<S: Into<String>>(msg: S) -> Self {
        Error::InvalidSelector(msg.into())
    }

    /// Create a new unknown attribute error
    pub fn unknown_attribute<S: Into<String>>(name: S) -> Self {
        Error::UnknownAttribute(name.into())
    }

    /// Create a new not supported error
    pub fn not_supported<S: Into<String>>(msg: S) -> Self {
        Error::NotSupported(msg.into())
    }

    /// Create a new remote protocol error
    pub fn webdriver<E: Into<String>, M: Into<String>>(error: E, message: M) -> Self {
        Error::WebDriver {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// True when the remote side considers the handle detached
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleElement(_))
    }

    /// True when an element or frame could not be found
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::UnknownObject(_) | Error::UnknownFrame(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        assert!(Error::stale("gone").is_stale());
        assert!(!Error::unknown_object("x").is_stale());
        assert!(Error::unknown_object("x").is_not_found());
        assert!(Error::unknown_frame("f").is_not_found());
        assert!(!Error::timeout("t").is_not_found());
    }

    #[test]
    fn test_error_messages_embed_detail() {
        let err = Error::unknown_object(r#"unable to locate element, using {id: "submit"}"#);
        assert_eq!(
            err.to_string(),
            r#"Unknown object: unable to locate element, using {id: "submit"}"#
        );

        let err = Error::webdriver("no such window", "window was closed");
        assert_eq!(err.to_string(), "WebDriver error (no such window): window was closed");
    }
}
