/// Crate-wide result alias.
pub type StagefxResult<T> = Result<T, StagefxError>;

/// Error taxonomy for the engine.
///
/// Most per-frame paths are infallible by contract; errors surface at construction
/// (invalid configuration), at render time (rasterization), and at the serde boundary.
#[derive(thiserror::Error, Debug)]
pub enum StagefxError {
    /// Invalid configuration or phase table.
    #[error("validation error: {0}")]
    Validation(String),

    /// Animation state errors (clock, behavior selection).
    #[error("animation error: {0}")]
    Animation(String),

    /// Rasterization/drawing failure.
    #[error("render error: {0}")]
    Render(String),

    /// Config (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, preserved with its source chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StagefxError {
    /// Build a [`StagefxError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StagefxError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`StagefxError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StagefxError::Serde`].
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
            StagefxError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            StagefxError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(
            StagefxError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            StagefxError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = StagefxError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
