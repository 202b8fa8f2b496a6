//! Content contract: [`ContentLoader`] and [`ContentError`].

use thiserror::Error;

use crate::render::{Font, Image};

/// Result alias for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Failures surfaced by a content back-end. The runtime never recovers from
/// these; a screen's content either loads completely or the error is
/// returned to the application.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("asset `{0}` not found")]
    NotFound(String),
    #[error("asset `{name}` could not be decoded: {reason}")]
    Decode { name: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Back-end asset loader.
pub trait ContentLoader {
    fn load_font(&mut self, name: &str) -> Result<Font>;

    fn load_image(&mut self, name: &str) -> Result<Image>;

    /// Release everything loaded through this loader.
    fn unload(&mut self);
}
