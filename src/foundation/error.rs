/// Convenience result type used across the crate.
pub type ViewfinderResult<T> = Result<T, ViewfinderError>;

/// Top-level error taxonomy used by viewfinder APIs.
///
/// Absence is never an error here: a missing input image, an unset filter
/// chain, or a not-yet-ready surface all degrade to no-ops. These variants
/// cover genuinely invalid data and failed collaborator calls.
#[derive(thiserror::Error, Debug)]
pub enum ViewfinderError {
    /// Invalid user-provided data (filter params, layout files, crop rects).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while compositing a frame through the filter pipeline.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Errors reported by the render surface or its blit target.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ViewfinderError {
    /// Build a [`ViewfinderError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ViewfinderError::Pipeline`] value.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Build a [`ViewfinderError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`ViewfinderError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ViewfinderError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ViewfinderError::pipeline("x")
                .to_string()
                .contains("pipeline error:")
        );
        assert!(
            ViewfinderError::surface("x")
                .to_string()
                .contains("surface error:")
        );
        assert!(
            ViewfinderError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ViewfinderError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
