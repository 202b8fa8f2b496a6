use thiserror::Error;

use scrim_core::ContentError;

/// Result alias for screen and menu operations.
pub type Result<T> = std::result::Result<T, ScreenError>;

/// Errors raised by the screen manager and menus.
///
/// Configuration mistakes are reported at the call that supplied the bad
/// argument; content failures come from the back-end loader.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("a menu needs at least one column")]
    NoColumns,
    #[error("column {column} out of range (menu has {count} columns)")]
    InvalidColumn { column: usize, count: usize },
    #[error("row {row} out of range (column {column} has {len} entries)")]
    InvalidRow { column: usize, row: usize, len: usize },
    #[error("entry at column {column}, row {row} is disabled")]
    DisabledEntry { column: usize, row: usize },
    #[error("content failed to load: {0}")]
    Content(#[from] ContentError),
}
