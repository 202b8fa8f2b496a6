//! Terminal menu demo using crossterm.
//!
//! Run: cargo run --bin menu-demo

use scrim_core::app::{App, AppConfig, DEFAULT_FRAME_TIME};
use scrim_crossterm::CrosstermDriver;
use scrim_demos::{CURSOR, populate};
use scrim_ui::ScreenManager;

fn main() {
    let mut manager = ScreenManager::default();
    if let Err(e) = populate(&mut manager) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let driver = CrosstermDriver::new().with_image(CURSOR, '+', 1, 1);
    let mut app = App::new(AppConfig {
        model: manager,
        driver,
        frame_time: DEFAULT_FRAME_TIME,
        fixed_step: false,
    });

    if let Err(e) = app.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
