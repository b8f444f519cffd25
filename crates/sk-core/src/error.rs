//! Error taxonomy for operations that can genuinely fail.
//!
//! Undo past the start, redo past the end, and ids that no longer exist
//! are not errors: those operations return `None` / `false` instead.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// User-supplied input was rejected, e.g. a non-image file.
    InvalidInput(String),
    /// The generation service was called without an API key.
    MissingCredential,
    /// The generation service failed or answered with something unusable.
    Upstream(String),
    /// Image or snapshot bytes could not be decoded.
    Decode(String),
    /// The raster surface could not be created, encoded, or restored.
    Surface(String),
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            SketchError::MissingCredential => f.write_str("an API key is required"),
            SketchError::Upstream(msg) => write!(f, "generation failed: {msg}"),
            SketchError::Decode(msg) => write!(f, "decode failed: {msg}"),
            SketchError::Surface(msg) => write!(f, "surface error: {msg}"),
        }
    }
}

impl std::error::Error for SketchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            SketchError::InvalidInput("please upload an image file".into()).to_string(),
            "invalid input: please upload an image file"
        );
        assert_eq!(
            SketchError::MissingCredential.to_string(),
            "an API key is required"
        );
    }
}
