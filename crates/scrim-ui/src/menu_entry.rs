//! A single menu item: text or image, colours, layout box and select handlers.

use std::fmt;

use scrim_core::{
    Color, Destination, DrawParams, Font, Image, PlayerIndex, Rect, Renderer, TextMeasure, Vec2,
};

use crate::screen::{ScreenContext, ScreenId};

/// Horizontal alignment of an entry relative to its position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    /// Fraction of the entry's width that lies left of its position.
    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// Arguments passed to selection handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuSelection {
    /// The player whose input triggered the selection.
    pub player: PlayerIndex,
    /// The menu screen the entry belongs to.
    pub screen: ScreenId,
    pub column: usize,
    pub row: usize,
    /// The entry's text at the time of selection.
    pub text: String,
}

/// A selection handler. Handlers run synchronously in registration order.
pub type SelectHandler = Box<dyn FnMut(&MenuSelection, &mut ScreenContext<'_>)>;

/// A single label in a menu: text, optional background image, colours and
/// the handlers to run when it is chosen.
///
/// `position` and `size` are written by the owning menu's layout pass.
pub struct MenuEntry {
    text: String,
    image: Option<Image>,
    text_color: Color,
    text_selected_color: Color,
    background_color: Color,
    background_selected_color: Color,
    alignment: Alignment,
    padding: f32,
    scale: f32,
    rotation: f32,
    enabled: bool,
    visible: bool,
    position: Vec2,
    size: Vec2,
    handlers: Vec<SelectHandler>,
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEntry")
            .field("text", &self.text)
            .field("enabled", &self.enabled)
            .field("visible", &self.visible)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl MenuEntry {
    /// Create an enabled entry with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
            text_color: Color::WHITE,
            text_selected_color: Color::YELLOW,
            background_color: Color::WHITE,
            background_selected_color: Color::WHITE,
            alignment: Alignment::Center,
            padding: 8.0,
            scale: 1.0,
            rotation: 0.0,
            enabled: true,
            visible: true,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            handlers: Vec::new(),
        }
    }

    /// Create a disabled entry: drawn, but never selectable.
    pub fn label(text: impl Into<String>) -> Self {
        let mut e = Self::new(text);
        e.enabled = false;
        e
    }

    // -- builders --

    /// Register a selection handler (builder).
    pub fn on_selected<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&MenuSelection, &mut ScreenContext<'_>) + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Text colours for the normal and selected states (builder).
    pub fn with_text_colors(mut self, normal: Color, selected: Color) -> Self {
        self.text_color = normal;
        self.text_selected_color = selected;
        self
    }

    /// Background tints for the normal and selected states (builder).
    pub fn with_background_colors(mut self, normal: Color, selected: Color) -> Self {
        self.background_color = normal;
        self.background_selected_color = selected;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    // -- accessors --

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn image(&self) -> Option<Image> {
        self.image
    }

    pub fn set_image(&mut self, image: Option<Image>) {
        self.image = image;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn add_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&MenuSelection, &mut ScreenContext<'_>) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    // -- layout --

    /// Layout position (the alignment anchor, top edge).
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Scaled size from the last layout pass.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub(crate) fn place(&mut self, position: Vec2, size: Vec2) {
        self.position = position;
        self.size = size;
    }

    /// Natural size: the image if there is one, the text otherwise, scaled.
    pub fn measure<M: TextMeasure + ?Sized>(&self, measure: &M, font: Font) -> Vec2 {
        let natural = match self.image {
            Some(img) => img.size(),
            None => measure.measure_text(font, &self.text),
        };
        natural * self.scale
    }

    pub fn width<M: TextMeasure + ?Sized>(&self, measure: &M, font: Font) -> f32 {
        self.measure(measure, font).x
    }

    pub fn height<M: TextMeasure + ?Sized>(&self, measure: &M, font: Font) -> f32 {
        self.measure(measure, font).y
    }

    /// On-screen rectangle from the last layout pass.
    pub fn bounds(&self) -> Rect {
        let left = self.position.x - self.size.x * self.alignment.factor();
        Rect::from_pos_size(Vec2::new(left, self.position.y), self.size)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.bounds().contains(p)
    }

    // -- events --

    /// Run every selection handler, in registration order.
    pub fn fire_selected(&mut self, selection: &MenuSelection, cx: &mut ScreenContext<'_>) {
        for handler in &mut self.handlers {
            handler(selection, cx);
        }
    }

    // -- drawing --

    /// Draw the entry at its layout position plus `offset`, faded by
    /// `alpha`.
    pub fn draw(
        &self,
        renderer: &mut dyn Renderer,
        font: Font,
        offset: Vec2,
        selected: bool,
        alpha: u8,
    ) {
        if !self.visible {
            return;
        }
        let position = self.position + offset;
        let text_color = if selected {
            self.text_selected_color
        } else {
            self.text_color
        };

        match self.image {
            Some(img) => {
                let bg = if selected {
                    self.background_selected_color
                } else {
                    self.background_color
                };
                let origin = Vec2::new(img.size().x * self.alignment.factor(), 0.0);
                renderer.draw_image(
                    Some(img),
                    Destination::Position(position),
                    DrawParams::tinted(bg.faded(alpha))
                        .with_rotation(self.rotation)
                        .with_origin(origin)
                        .with_scale(self.scale),
                );
                // Text centred on the image.
                let text_size = renderer.measure_text(font, &self.text) * self.scale;
                let bounds = self.bounds().translate(offset);
                let text_pos = bounds.min + (bounds.size() - text_size) / 2.0;
                renderer.draw_text(
                    font,
                    &self.text,
                    text_pos,
                    DrawParams::tinted(text_color.faded(alpha))
                        .with_rotation(self.rotation)
                        .with_scale(self.scale),
                );
            }
            None => {
                let natural = renderer.measure_text(font, &self.text);
                let origin = Vec2::new(natural.x * self.alignment.factor(), 0.0);
                renderer.draw_text(
                    font,
                    &self.text,
                    position,
                    DrawParams::tinted(text_color.faded(alpha))
                        .with_rotation(self.rotation)
                        .with_origin(origin)
                        .with_scale(self.scale),
                );
            }
        }
    }
}
