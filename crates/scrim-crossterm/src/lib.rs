//! Crossterm terminal driver for scrim.
//!
//! Provides a [`CrosstermDriver`] that implements [`scrim_core::Driver`].
//! One terminal cell is one unit of screen space: text is measured in
//! characters, images are registered glyphs of a whole number of cells and
//! tints are composited into each cell's colours before the frame is
//! diffed against what the terminal already shows.

mod buffer;
mod content;
mod input;

use std::collections::HashMap;
use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor, event, execute, queue,
    style::{self, Color as CtColor, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use scrim_core::{
    ContentLoader, DeviceState, Destination, Driver, DrawParams, Font, Image, InputSource, Rect,
    Renderer, TextMeasure, Vec2,
};

pub use buffer::{Cell, CellBuffer};
pub use content::TerminalContent;

use content::{BLOCK_IMAGE, Glyph};
use input::EventCollector;

fn to_ct_color(c: scrim_core::Color) -> CtColor {
    CtColor::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    }
}

/// A terminal back-end for scrim using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
    strict_content: bool,
    images: HashMap<String, Glyph>,
    glyphs: HashMap<u32, char>,
    frame: CellBuffer,
    shown: CellBuffer,
    events: EventCollector,
    focused: bool,
    quit: bool,
}

impl CrosstermDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            strict_content: false,
            images: HashMap::new(),
            glyphs: HashMap::new(),
            frame: CellBuffer::default(),
            shown: CellBuffer::default(),
            events: EventCollector::default(),
            focused: true,
            quit: false,
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Make loading an unregistered image an error instead of a block.
    pub fn with_strict_content(mut self, strict: bool) -> Self {
        self.strict_content = strict;
        self
    }

    /// Register the image `name`, drawn as `ch` repeated over
    /// `width` x `height` cells.
    pub fn with_image(mut self, name: &str, ch: char, width: u32, height: u32) -> Self {
        let image = Image {
            id: self.glyphs.len() as u32,
            width,
            height,
        };
        self.glyphs.insert(image.id, ch);
        self.images.insert(name.to_string(), Glyph { image, ch });
        self
    }

    /// Draw into an off-screen frame of the given size. [`Driver::init`]
    /// replaces it with the terminal's size.
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.frame.resize(width, height);
        self
    }

    /// The frame being drawn.
    pub fn frame(&self) -> &CellBuffer {
        &self.frame
    }

    fn resize(&mut self, width: u16, height: u16) {
        log::debug!("terminal resized to {width}x{height}");
        self.frame.resize(width, height);
        // Force a full repaint.
        self.shown = CellBuffer::default();
    }

    fn drain_events(&mut self) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(false) => break,
                Ok(true) => {}
                Err(e) => {
                    log::warn!("polling terminal events failed: {e}");
                    break;
                }
            }
            match event::read() {
                Ok(ev) => self.events.apply(&ev),
                Err(e) => {
                    log::warn!("reading terminal event failed: {e}");
                    break;
                }
            }
        }

        if let Some(focused) = self.events.focused.take() {
            self.focused = focused;
        }
        if let Some((w, h)) = self.events.resized.take() {
            self.resize(w, h);
        }
        if self.events.interrupted {
            self.quit = true;
        }
    }

    fn place(&self, image: Option<Image>, dest: Destination, params: DrawParams) -> Rect {
        match dest {
            Destination::Rect(rect) => rect,
            Destination::Position(p) => {
                let size = image.map_or(Vec2::ONE, Image::size);
                let top_left = p - params.origin * params.scale;
                Rect::from_pos_size(top_left, size * params.scale)
            }
        }
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for CrosstermDriver {
    fn poll(&mut self) -> DeviceState {
        self.drain_events();
        self.events.snapshot(self.mouse_enabled)
    }
}

impl TextMeasure for CrosstermDriver {
    fn measure_text(&self, _font: Font, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32, 1.0)
    }
}

// Rotation has no meaning on a character grid and is ignored.
impl Renderer for CrosstermDriver {
    fn begin(&mut self) {}

    fn end(&mut self) {}

    fn viewport(&self) -> Rect {
        self.frame.viewport()
    }

    fn draw_image(&mut self, image: Option<Image>, dest: Destination, params: DrawParams) {
        let rect = self.place(image, dest, params);
        let glyph = image
            .filter(|img| img.id != BLOCK_IMAGE)
            .and_then(|img| self.glyphs.get(&img.id).copied());
        match glyph {
            Some(ch) => {
                let row: String = std::iter::repeat_n(ch, rect.width().round().max(0.0) as usize)
                    .collect();
                let mut y = rect.min.y;
                while y < rect.max.y {
                    self.frame.print(Vec2::new(rect.min.x, y), &row, params.tint);
                    y += 1.0;
                }
            }
            None => self.frame.fill(rect, params.tint),
        }
    }

    fn draw_text(&mut self, _font: Font, text: &str, position: Vec2, params: DrawParams) {
        let top_left = position - params.origin * params.scale;
        self.frame.print(top_left, text, params.tint);
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All),
            event::EnableFocusChange
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        let (w, h) = terminal::size()?;
        self.resize(w, h);
        log::info!("terminal driver ready ({w}x{h})");
        Ok(())
    }

    fn content_loader(&mut self) -> Box<dyn ContentLoader> {
        Box::new(TerminalContent::new(
            self.images.clone(),
            self.strict_content,
        ))
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }

    fn present(&mut self) -> Result<(), Box<dyn Error>> {
        let mut stdout = io::stdout();
        for (x, y, cell) in self.frame.diff(&self.shown) {
            queue!(
                stdout,
                cursor::MoveTo(x, y),
                SetForegroundColor(to_ct_color(cell.fg)),
                SetBackgroundColor(to_ct_color(cell.bg)),
                Print(cell.ch)
            )?;
        }
        stdout.flush()?;
        std::mem::swap(&mut self.frame, &mut self.shown);
        if self.frame.width() != self.shown.width() || self.frame.height() != self.shown.height()
        {
            self.frame.resize(self.shown.width(), self.shown.height());
        } else {
            self.frame.clear();
        }
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(
            stdout,
            event::DisableFocusChange,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
