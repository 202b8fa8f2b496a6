//! Rendering contract: resource handles, [`TextMeasure`], [`Renderer`] and
//! the scoped [`Batch`] guard.

use std::ops::{Deref, DerefMut};

use crate::geom::{Rect, Vec2};
use crate::style::Color;

/// Opaque handle to a loaded font.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Font(pub u32);

/// Handle to a loaded image, carrying its pixel dimensions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Image {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

impl Image {
    /// Dimensions as a vector.
    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Where a primitive lands on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Destination {
    /// Draw at natural size with the origin placed at this position.
    Position(Vec2),
    /// Stretch to fill this rectangle.
    Rect(Rect),
}

/// Per-primitive transform and tint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawParams {
    pub tint: Color,
    /// Rotation in radians around `origin`.
    pub rotation: f32,
    /// Pivot, relative to the primitive's top-left corner, before scaling.
    pub origin: Vec2,
    pub scale: f32,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            tint: Color::WHITE,
            rotation: 0.0,
            origin: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl DrawParams {
    /// Default parameters with the given tint.
    pub fn tinted(tint: Color) -> Self {
        Self {
            tint,
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Text measurement, split out from [`Renderer`] so layout can run without
/// a live draw target.
pub trait TextMeasure {
    /// Size of `text` rendered in `font` at scale 1.
    fn measure_text(&self, font: Font, text: &str) -> Vec2;
}

/// Back-end drawing surface.
///
/// Primitives are only valid between [`begin`](Self::begin) and
/// [`end`](Self::end); prefer [`Batch::begin`] which pairs them.
pub trait Renderer: TextMeasure {
    fn begin(&mut self);

    fn end(&mut self);

    /// The full drawable area.
    fn viewport(&self) -> Rect;

    /// Draw an image, or a solid rectangle of `params.tint` when `image` is
    /// `None`.
    fn draw_image(&mut self, image: Option<Image>, dest: Destination, params: DrawParams);

    /// Draw a string with its top-left corner (minus origin) at `position`.
    fn draw_text(&mut self, font: Font, text: &str, position: Vec2, params: DrawParams);
}

/// A begun draw batch; ends the batch when dropped.
pub struct Batch<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
}

impl<'a, R: Renderer + ?Sized> Batch<'a, R> {
    /// Begin a batch on `renderer`.
    pub fn begin(renderer: &'a mut R) -> Self {
        renderer.begin();
        Self { renderer }
    }

    /// Fill `rect` with a solid colour.
    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.renderer
            .draw_image(None, Destination::Rect(rect), DrawParams::tinted(color));
    }
}

impl<R: Renderer + ?Sized> Deref for Batch<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for Batch<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for Batch<'_, R> {
    fn drop(&mut self) {
        self.renderer.end();
    }
}
