//! Test doubles for the collaborator contracts: a scripted input source, a
//! fixed-width text measurer, a recording renderer and an in-memory content
//! loader. Enabled for dependents through the `testing` feature.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::content::{ContentError, ContentLoader, Result};
use crate::geom::{Rect, Vec2};
use crate::input::{DeviceState, InputSource};
use crate::render::{Destination, DrawParams, Font, Image, Renderer, TextMeasure};

// ---------------------------------------------------------------------------
// ScriptedInput
// ---------------------------------------------------------------------------

/// Replays queued snapshots; returns an idle snapshot once drained.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<DeviceState>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a snapshot for a future poll.
    pub fn push(&mut self, state: DeviceState) {
        self.frames.push_back(state);
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> DeviceState {
        self.frames.pop_front().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// FixedMeasure
// ---------------------------------------------------------------------------

/// Every character is `char_width` wide and every line `line_height` tall.
#[derive(Copy, Clone, Debug)]
pub struct FixedMeasure {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for FixedMeasure {
    fn default() -> Self {
        Self {
            char_width: 1.0,
            line_height: 1.0,
        }
    }
}

impl TextMeasure for FixedMeasure {
    fn measure_text(&self, _font: Font, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * self.char_width, self.line_height)
    }
}

// ---------------------------------------------------------------------------
// RecordingRenderer
// ---------------------------------------------------------------------------

/// One recorded renderer call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Begin,
    End,
    Image {
        image: Option<Image>,
        dest: Destination,
        params: DrawParams,
    },
    Text {
        font: Font,
        text: String,
        position: Vec2,
        params: DrawParams,
    },
}

/// Renderer that records every call for later inspection.
#[derive(Debug)]
pub struct RecordingRenderer {
    viewport: Rect,
    measure: FixedMeasure,
    calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            measure: FixedMeasure::default(),
            calls: Vec::new(),
        }
    }

    pub fn with_measure(mut self, measure: FixedMeasure) -> Self {
        self.measure = measure;
        self
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Every string drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl TextMeasure for RecordingRenderer {
    fn measure_text(&self, font: Font, text: &str) -> Vec2 {
        self.measure.measure_text(font, text)
    }
}

impl Renderer for RecordingRenderer {
    fn begin(&mut self) {
        self.calls.push(DrawCall::Begin);
    }

    fn end(&mut self) {
        self.calls.push(DrawCall::End);
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn draw_image(&mut self, image: Option<Image>, dest: Destination, params: DrawParams) {
        self.calls.push(DrawCall::Image {
            image,
            dest,
            params,
        });
    }

    fn draw_text(&mut self, font: Font, text: &str, position: Vec2, params: DrawParams) {
        self.calls.push(DrawCall::Text {
            font,
            text: text.to_string(),
            position,
            params,
        });
    }
}

// ---------------------------------------------------------------------------
// MemoryContent
// ---------------------------------------------------------------------------

/// Shared view of what a [`MemoryContent`] loaded and unloaded, usable after
/// the loader itself has been handed away.
#[derive(Clone, Debug, Default)]
pub struct ContentLog {
    loads: Rc<RefCell<Vec<String>>>,
    unloads: Rc<Cell<usize>>,
}

impl ContentLog {
    /// Names passed to every successful load, in order.
    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }

    pub fn unload_count(&self) -> usize {
        self.unloads.get()
    }
}

/// In-memory asset table. Unknown names fail with
/// [`ContentError::NotFound`] unless `lenient` is set.
#[derive(Debug, Default)]
pub struct MemoryContent {
    images: HashMap<String, Image>,
    fonts: HashSet<String>,
    lenient: bool,
    next_id: u32,
    log: ContentLog,
}

impl MemoryContent {
    /// A loader that invents a 1x1 image or a font for any name.
    pub fn lenient() -> Self {
        Self {
            lenient: true,
            ..Self::default()
        }
    }

    /// A loader that only knows the registered assets.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Register an image of the given size.
    pub fn with_image(mut self, name: &str, width: u32, height: u32) -> Self {
        self.next_id += 1;
        self.images.insert(
            name.to_string(),
            Image {
                id: self.next_id,
                width,
                height,
            },
        );
        self
    }

    /// Register a font.
    pub fn with_font(mut self, name: &str) -> Self {
        self.fonts.insert(name.to_string());
        self
    }

    pub fn log(&self) -> ContentLog {
        self.log.clone()
    }
}

impl ContentLoader for MemoryContent {
    fn load_font(&mut self, name: &str) -> Result<Font> {
        if !self.lenient && !self.fonts.contains(name) {
            return Err(ContentError::NotFound(name.to_string()));
        }
        self.next_id += 1;
        self.log.loads.borrow_mut().push(name.to_string());
        Ok(Font(self.next_id))
    }

    fn load_image(&mut self, name: &str) -> Result<Image> {
        let image = match self.images.get(name) {
            Some(img) => *img,
            None if self.lenient => {
                self.next_id += 1;
                Image {
                    id: self.next_id,
                    width: 1,
                    height: 1,
                }
            }
            None => return Err(ContentError::NotFound(name.to_string())),
        };
        self.log.loads.borrow_mut().push(name.to_string());
        Ok(image)
    }

    fn unload(&mut self) {
        self.log.unloads.set(self.log.unloads.get() + 1);
    }
}
