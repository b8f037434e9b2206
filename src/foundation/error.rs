/// Convenience result type used across lightbox.
pub type LightboxResult<T> = Result<T, LightboxError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Expected serving conditions (a missing or still-being-written source) are
/// *not* errors; they are [`crate::ServeOutcome`] variants. This enum covers
/// caller mistakes and genuinely unexpected failures only.
#[derive(thiserror::Error, Debug)]
pub enum LightboxError {
    /// Invalid caller-provided data (addresses, crop rectangles, settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Cache store failures observed at setup time (e.g. an unusable root).
    #[error("cache error: {0}")]
    Cache(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LightboxError {
    /// Build a [`LightboxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LightboxError::Cache`] value.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
