//! Errors raised while constructing a countdown widget.

/// Failures that prevent a countdown widget from being built.
///
/// None of these can occur once a widget exists: lifecycle operations on a
/// constructed widget never fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The configuration or locator handed to the constructor is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The locator is well formed but no element in the document matches it.
    #[error("mount point not found for locator `{0}`")]
    MountNotFound(String),
    /// The locator could not be parsed as a selector.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// The offending locator, verbatim.
        selector: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
