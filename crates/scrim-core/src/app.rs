//! The host frame loop: [`Model`], [`Driver`], [`AppConfig`], [`App`].

use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

use crate::content::ContentLoader;
use crate::input::InputSource;
use crate::render::Renderer;

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// Whatever the frame loop drives; usually a screen manager.
pub trait Model {
    /// Called once after the driver is initialised, with the loader the
    /// model keeps for the rest of its life.
    fn init(&mut self, content: Box<dyn ContentLoader>) -> Result<(), Box<dyn Error>>;

    /// Advance one frame.
    fn update(
        &mut self,
        elapsed: Duration,
        has_focus: bool,
        input: &mut dyn InputSource,
    ) -> Result<(), Box<dyn Error>>;

    /// Render one frame.
    fn draw(&mut self, elapsed: Duration, renderer: &mut dyn Renderer)
    -> Result<(), Box<dyn Error>>;

    /// Whether the loop should stop.
    fn is_finished(&self) -> bool;

    /// Release content before the driver closes.
    fn shutdown(&mut self) {}
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. terminal, window). Supplies input and a draw
/// target every frame.
pub trait Driver: InputSource + Renderer {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn Error>>;

    /// A content loader for the model.
    fn content_loader(&mut self) -> Box<dyn ContentLoader>;

    /// Whether the host window is the active one.
    fn has_focus(&self) -> bool {
        true
    }

    /// Whether the user asked the back-end to quit (e.g. closed the window).
    fn quit_requested(&self) -> bool {
        false
    }

    /// Present the frame drawn since the last call.
    fn present(&mut self) -> Result<(), Box<dyn Error>>;

    /// Clean up / restore the terminal or window.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    /// Target duration of one frame.
    pub frame_time: Duration,
    /// When set, every update receives exactly `frame_time` as elapsed time
    /// instead of the measured wall-clock time.
    pub fixed_step: bool,
}

/// Default target frame time (60 frames per second).
pub const DEFAULT_FRAME_TIME: Duration = Duration::from_nanos(16_666_667);

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    frame_time: Duration,
    fixed_step: bool,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            frame_time: config.frame_time,
            fixed_step: config.fixed_step,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the frame loop.
    ///
    /// 1. Initialises the driver and hands the model its content loader.
    /// 2. Each frame: update → draw → present, then sleeps off the rest of
    ///    the frame budget.
    /// 3. Stops when the model is finished or the driver requests quit.
    ///
    /// The model is shut down and the driver closed on every exit path.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.driver.init()?;
        log::info!("frame loop starting ({:?} per frame)", self.frame_time);
        let res = self.run_frames();
        self.model.shutdown();
        self.driver.close();
        log::info!("frame loop stopped");
        res
    }

    fn run_frames(&mut self) -> Result<(), Box<dyn Error>> {
        self.model.init(self.driver.content_loader())?;

        let mut last = Instant::now();
        while !self.model.is_finished() && !self.driver.quit_requested() {
            let start = Instant::now();
            let elapsed = if self.fixed_step {
                self.frame_time
            } else {
                start - last
            };
            last = start;

            self.step(elapsed)?;

            let spent = start.elapsed();
            if spent < self.frame_time {
                thread::sleep(self.frame_time - spent);
            }
        }
        Ok(())
    }

    /// Run a single update/draw/present cycle.
    pub fn step(&mut self, elapsed: Duration) -> Result<(), Box<dyn Error>> {
        let has_focus = self.driver.has_focus();
        self.model.update(elapsed, has_focus, &mut self.driver)?;
        self.model.draw(elapsed, &mut self.driver)?;
        self.driver.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Rect, Vec2};
    use crate::input::DeviceState;
    use crate::render::{Destination, DrawParams, Font, Image, TextMeasure};
    use crate::testing::MemoryContent;

    #[derive(Default)]
    struct Counter {
        inited: bool,
        updates: u32,
        draws: u32,
        total: Duration,
        shut_down: bool,
    }

    impl Model for Counter {
        fn init(&mut self, _content: Box<dyn ContentLoader>) -> Result<(), Box<dyn Error>> {
            self.inited = true;
            Ok(())
        }

        fn update(
            &mut self,
            elapsed: Duration,
            _has_focus: bool,
            input: &mut dyn InputSource,
        ) -> Result<(), Box<dyn Error>> {
            let _ = input.poll();
            self.updates += 1;
            self.total += elapsed;
            Ok(())
        }

        fn draw(
            &mut self,
            _elapsed: Duration,
            renderer: &mut dyn Renderer,
        ) -> Result<(), Box<dyn Error>> {
            renderer.begin();
            renderer.end();
            self.draws += 1;
            Ok(())
        }

        fn is_finished(&self) -> bool {
            self.updates >= 3
        }

        fn shutdown(&mut self) {
            self.shut_down = true;
        }
    }

    #[derive(Default)]
    struct NullDriver {
        closed: bool,
        presented: u32,
    }

    impl InputSource for NullDriver {
        fn poll(&mut self) -> DeviceState {
            DeviceState::default()
        }
    }

    impl TextMeasure for NullDriver {
        fn measure_text(&self, _font: Font, _text: &str) -> Vec2 {
            Vec2::ZERO
        }
    }

    impl Renderer for NullDriver {
        fn begin(&mut self) {}
        fn end(&mut self) {}
        fn viewport(&self) -> Rect {
            Rect::new(0.0, 0.0, 1.0, 1.0)
        }
        fn draw_image(&mut self, _: Option<Image>, _: Destination, _: DrawParams) {}
        fn draw_text(&mut self, _: Font, _: &str, _: Vec2, _: DrawParams) {}
    }

    impl Driver for NullDriver {
        fn init(&mut self) -> Result<(), Box<dyn Error>> {
            Ok(())
        }
        fn content_loader(&mut self) -> Box<dyn ContentLoader> {
            Box::new(MemoryContent::lenient())
        }
        fn present(&mut self) -> Result<(), Box<dyn Error>> {
            self.presented += 1;
            Ok(())
        }
        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn run_stops_when_model_finishes() {
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver: NullDriver::default(),
            frame_time: Duration::ZERO,
            fixed_step: true,
        });
        app.run().unwrap();
        assert!(app.model().inited);
        assert_eq!(app.model().updates, 3);
        assert_eq!(app.model().draws, 3);
        assert!(app.model().shut_down);
        assert!(app.driver.closed);
        assert_eq!(app.driver.presented, 3);
    }

    #[test]
    fn fixed_step_passes_frame_time() {
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver: NullDriver::default(),
            frame_time: Duration::from_millis(1),
            fixed_step: true,
        });
        app.run().unwrap();
        assert_eq!(app.model().total, Duration::from_millis(3));
    }
}
