//! Colours: [`Color`].

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA colour packed into a `u32` (0xRRGGBBAA).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    pub const YELLOW: Self = Self::from_rgb(255, 255, 0);
    pub const CORAL: Self = Self::from_rgb(255, 127, 80);

    /// Construct an opaque colour from RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 255)
    }

    /// Construct from individual RGBA components.
    #[inline]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red component.
    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }

    /// Green component.
    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Blue component.
    #[inline]
    pub const fn b(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Alpha component.
    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Same RGB with the alpha component replaced.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::from_rgba(self.r(), self.g(), self.b(), a)
    }

    /// Scale every component by `alpha / 255` (premultiplied fade).
    pub fn faded(self, alpha: u8) -> Self {
        let f = |c: u8| ((c as u16 * alpha as u16 + 127) / 255) as u8;
        Self::from_rgba(f(self.r()), f(self.g()), f(self.b()), f(self.a()))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
