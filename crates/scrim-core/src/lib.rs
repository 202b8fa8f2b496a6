//! **scrim-core**: screen-stack UI runtime, core types.
//!
//! This crate provides the foundational types shared across the *scrim*
//! workspace: geometry primitives, colours, the double-buffered input
//! snapshot, the rendering and content contracts that back-ends implement,
//! and the fixed-cadence application loop.

pub mod app;
pub mod content;
pub mod geom;
pub mod input;
pub mod render;
pub mod style;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use app::{App, AppConfig, Driver, Model};
pub use content::{ContentError, ContentLoader};
pub use geom::{Rect, Vec2};
pub use input::{
    Bindings, Button, Control, DeviceState, InputSource, InputState, Key, PlayerIndex,
    PlayerState, PointerButton, PointerState,
};
pub use render::{Batch, Destination, DrawParams, Font, Image, Renderer, TextMeasure};
pub use style::Color;
