//! **scrim-ui**: the screen stack and the menus that live on it.
//!
//! A [`ScreenManager`] owns an ordered stack of [`Screen`]s. Every frame it
//! walks the stack from the top, advancing each screen's transition, giving
//! input to the first screen that is showing and marking the screens below
//! a showing non-popup as covered. Drawing goes the other way, bottom to
//! top, skipping hidden screens.
//!
//! Menus are built from [`MenuEntry`] values arranged in a [`GridMenu`] and
//! shown by a [`MenuScreen`] (or a [`RadialMenuScreen`] for direction-picked
//! rings).

mod error;
mod grid_menu;
mod manager;
mod menu_entry;
mod menu_screen;
mod radial_menu;
mod screen;

pub use error::{Result, ScreenError};
pub use grid_menu::{ColumnMode, GridMenu, Orientation, Selection};
pub use manager::{ManagerConfig, ScreenManager};
pub use menu_entry::{Alignment, MenuEntry, MenuSelection, SelectHandler};
pub use menu_screen::{CancelHandler, MenuScreen};
pub use radial_menu::{RadialMenuScreen, sector};
pub use screen::{
    DrawContext, LoadContext, Screen, ScreenContext, ScreenCore, ScreenId, ScreenState,
    SharedResources,
};
