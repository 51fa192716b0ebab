//! The two failure kinds an operator can see.
//!
//! - [`ValidationError`]: required input is missing or not allowed. The
//!   operation is aborted and no state changes.
//! - [`UpstreamError`]: the storage backend failed. Carries the backend's own
//!   message when it gave one.
//!
//! Neither is retried; the operator re-runs the command.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("white label name is required")]
    MissingWlName,
    #[error("white label name '{0}' must not contain '/', '\\' or '..'")]
    InvalidWlName(String),
    #[error("fill in every grid button field (missing: {})", .0.join(", "))]
    IncompleteGridButton(Vec<&'static str>),
    #[error("no files selected")]
    NoFiles,
    #[error("folder '{0}' does not accept links")]
    LinksNotAccepted(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct UpstreamError {
    message: String,
}

impl UpstreamError {
    const FALLBACK: &'static str = "storage request failed";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Use the service-provided message, or a generic one when it is blank.
    pub fn from_service(message: Option<&str>) -> Self {
        match message.map(str::trim) {
            Some(m) if !m.is_empty() => Self::new(m),
            _ => Self::new(Self::FALLBACK),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
