/// Convenience result type used across Shadowcast.
pub type ShadowcastResult<T> = Result<T, ShadowcastError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Steady-state rendering never produces these; they come from configuration and construction
/// boundaries (config files, frame buffers, surface allocation).
#[derive(thiserror::Error, Debug)]
pub enum ShadowcastError {
    /// Invalid user-provided configuration or frame data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while preparing or reading back a draw surface.
    #[error("render error: {0}")]
    Render(String),

    /// Failures reported by an external collaborator (segmentation, source).
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShadowcastError {
    /// Build a [`ShadowcastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShadowcastError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ShadowcastError::Collaborator`] value.
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Build a [`ShadowcastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
