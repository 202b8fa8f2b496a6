//! Terminal content: fonts are all the terminal's own, images are glyphs
//! registered up front.

use std::collections::HashMap;

use scrim_core::content::Result;
use scrim_core::{ContentError, ContentLoader, Font, Image};

/// Id given to images the terminal has no glyph for.
pub(crate) const BLOCK_IMAGE: u32 = u32::MAX;

/// A registered image: its handle and the glyph that fills it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub(crate) image: Image,
    pub(crate) ch: char,
}

/// Loader handed to the model by
/// [`CrosstermDriver::content_loader`](crate::CrosstermDriver).
#[derive(Debug, Clone, Default)]
pub struct TerminalContent {
    fonts: HashMap<String, Font>,
    images: HashMap<String, Glyph>,
    strict: bool,
}

impl TerminalContent {
    pub(crate) fn new(images: HashMap<String, Glyph>, strict: bool) -> Self {
        Self {
            fonts: HashMap::new(),
            images,
            strict,
        }
    }
}

impl ContentLoader for TerminalContent {
    fn load_font(&mut self, name: &str) -> Result<Font> {
        let next = Font(self.fonts.len() as u32);
        let font = *self.fonts.entry(name.to_string()).or_insert(next);
        log::debug!("font `{name}` -> {font:?}");
        Ok(font)
    }

    fn load_image(&mut self, name: &str) -> Result<Image> {
        if let Some(glyph) = self.images.get(name) {
            log::debug!("image `{name}` -> glyph {:?}", glyph.ch);
            return Ok(glyph.image);
        }
        if self.strict {
            return Err(ContentError::NotFound(name.to_string()));
        }
        log::debug!("image `{name}` not registered, drawing as a block");
        Ok(Image {
            id: BLOCK_IMAGE,
            width: 1,
            height: 1,
        })
    }

    fn unload(&mut self) {
        log::debug!("releasing {} fonts", self.fonts.len());
        self.fonts.clear();
    }
}
