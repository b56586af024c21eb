use std::path::PathBuf;

/// Result alias used across the crate.
pub type GifMakerResult<T> = Result<T, GifMakerError>;

/// Error type for frame collection and animation encoding.
#[derive(thiserror::Error, Debug)]
pub enum GifMakerError {
    /// A directory mixes sub-directories with frame files, or holds neither.
    #[error("structural violation in '{}': {reason}", dir.display())]
    StructuralViolation {
        /// Directory that broke the layout rule.
        dir: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A frame file could not be decoded.
    #[error("decode error in '{}': {source}", path.display())]
    Decode {
        /// Frame that failed to decode.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// No frames reached the encoder.
    #[error("no frames to encode")]
    EmptyInput,

    /// Invalid configuration or sink misuse.
    #[error("validation error: {0}")]
    Validation(String),

    /// The animation writer failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Anything else, usually I/O with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifMakerError {
    /// Build a [`GifMakerError::StructuralViolation`].
    pub fn structural(dir: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StructuralViolation {
            dir: dir.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`GifMakerError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GifMakerError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
