//! The [`ScreenManager`]: owns the screen stack, computes focus and
//! coverage each frame, and draws the visible screens back to front.

use std::error::Error;
use std::time::Duration;

use scrim_core::{
    Bindings, Color, ContentLoader, InputSource, InputState, Model, PlayerIndex, Rect, Renderer,
};

use crate::error::Result;
use crate::screen::{
    self, Command, DrawContext, LoadContext, Screen, ScreenContext, ScreenId, ScreenState,
    SharedResources,
};

// ---------------------------------------------------------------------------
// ManagerConfig
// ---------------------------------------------------------------------------

/// Asset names and switches for a [`ScreenManager`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ManagerConfig {
    pub font: String,
    pub small_font: String,
    pub big_font: String,
    /// A plain white image, stretched for overlays.
    pub blank: String,
    /// Log the stack at `trace` level after every update.
    pub trace: bool,
    pub bindings: Bindings,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            font: "ScreenManager/DefaultFont".to_string(),
            small_font: "ScreenManager/SmallFont".to_string(),
            big_font: "ScreenManager/BigFont".to_string(),
            blank: "ScreenManager/blank".to_string(),
            trace: false,
            bindings: Bindings::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScreenManager
// ---------------------------------------------------------------------------

struct Slot {
    id: ScreenId,
    screen: Box<dyn Screen>,
}

/// Owns the screen stack.
///
/// The last screen added is the top of the stack: it is updated first and
/// drawn last. Each update walks a working list of ids from the top down, so
/// screens may add or remove screens (themselves included) from their own
/// callbacks without disturbing the walk.
pub struct ScreenManager {
    config: ManagerConfig,
    screens: Vec<Slot>,
    to_update: Vec<ScreenId>,
    commands: Vec<Command>,
    input: InputState,
    content: Option<Box<dyn ContentLoader>>,
    resources: Option<SharedResources>,
    viewport: Rect,
    next_id: u64,
}

impl Default for ScreenManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

impl ScreenManager {
    pub fn new(config: ManagerConfig) -> Self {
        let input = InputState::with_bindings(config.bindings.clone());
        Self {
            config,
            screens: Vec::new(),
            to_update: Vec::new(),
            commands: Vec::new(),
            input,
            content: None,
            resources: None,
            viewport: Rect::default(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Turn stack tracing on or off.
    pub fn set_trace(&mut self, trace: bool) {
        self.config.trace = trace;
    }

    /// Whether [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.resources.is_some()
    }

    /// Load the shared fonts and blank image, then the content of every
    /// screen already on the stack. The loader is kept for screens added
    /// later.
    pub fn initialize(&mut self, mut content: Box<dyn ContentLoader>) -> Result<()> {
        let resources = SharedResources {
            small_font: content.load_font(&self.config.small_font)?,
            font: content.load_font(&self.config.font)?,
            big_font: content.load_font(&self.config.big_font)?,
            blank: content.load_image(&self.config.blank)?,
        };
        for slot in &mut self.screens {
            slot.screen.load_content(&mut LoadContext {
                content: content.as_mut(),
                resources: &resources,
            })?;
        }
        log::debug!("screen manager initialized with {} screens", self.screens.len());
        self.content = Some(content);
        self.resources = Some(resources);
        Ok(())
    }

    /// Unload every screen's content and then the loader's.
    pub fn unload_content(&mut self) {
        if let Some(content) = self.content.as_mut() {
            for slot in &mut self.screens {
                slot.screen.unload_content(content.as_mut());
            }
            content.unload();
        }
    }

    // -----------------------------------------------------------------------
    // Stack operations
    // -----------------------------------------------------------------------

    /// Push `screen` on top of the stack.
    ///
    /// If the manager is initialized the screen's content is loaded first;
    /// on failure the screen is dropped and the error returned.
    pub fn add_screen(
        &mut self,
        screen: Box<dyn Screen>,
        controlling_player: Option<PlayerIndex>,
    ) -> Result<ScreenId> {
        let id = ScreenId(self.next_id);
        self.next_id += 1;
        self.insert(id, screen, controlling_player)?;
        Ok(id)
    }

    fn insert(
        &mut self,
        id: ScreenId,
        mut screen: Box<dyn Screen>,
        controlling_player: Option<PlayerIndex>,
    ) -> Result<()> {
        screen.core_mut().reset_for_add(controlling_player);
        if let (Some(content), Some(resources)) = (self.content.as_mut(), self.resources.as_ref()) {
            screen.load_content(&mut LoadContext {
                content: content.as_mut(),
                resources,
            })?;
        }
        log::debug!("add screen {} {}", screen.name(), id);
        self.screens.push(Slot { id, screen });
        Ok(())
    }

    /// Remove a screen at once, skipping its exit transition. Returns the
    /// screen, or `None` if `id` is not on the stack.
    pub fn remove_screen(&mut self, id: ScreenId) -> Option<Box<dyn Screen>> {
        let index = self.index_of(id)?;
        let mut slot = self.screens.remove(index);
        self.to_update.retain(|&other| other != id);
        if let Some(content) = self.content.as_mut() {
            slot.screen.unload_content(content.as_mut());
        }
        log::debug!("remove screen {} {}", slot.screen.name(), id);
        Some(slot.screen)
    }

    /// Ask a screen to transition off. It is removed once the transition
    /// completes, or immediately if its off time is zero.
    pub fn exit_screen(&mut self, id: ScreenId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let core = self.screens[index].screen.core_mut();
        if core.transition_off_time().is_zero() {
            self.remove_screen(id);
        } else {
            core.begin_exit();
            log::debug!("exit screen {id}");
        }
    }

    /// Unload and drop every screen.
    pub fn remove_all_screens(&mut self) {
        if let Some(content) = self.content.as_mut() {
            for slot in &mut self.screens {
                slot.screen.unload_content(content.as_mut());
            }
        }
        log::debug!("remove all {} screens", self.screens.len());
        self.screens.clear();
        self.to_update.clear();
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.index_of(id).is_some()
    }

    /// Screen at stack position `index`, 0 being the bottom.
    pub fn screen(&self, index: usize) -> Option<&dyn Screen> {
        self.screens.get(index).map(|s| s.screen.as_ref())
    }

    /// Screen with the given id.
    pub fn get(&self, id: ScreenId) -> Option<&dyn Screen> {
        self.index_of(id).map(|i| self.screens[i].screen.as_ref())
    }

    pub fn get_mut(&mut self, id: ScreenId) -> Option<&mut dyn Screen> {
        let i = self.index_of(id)?;
        Some(self.screens[i].screen.as_mut())
    }

    /// All screens, bottom to top.
    pub fn screens(&self) -> impl DoubleEndedIterator<Item = (ScreenId, &dyn Screen)> {
        self.screens.iter().map(|s| (s.id, s.screen.as_ref()))
    }

    /// Input snapshot from the last update.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Shared fonts and images, once initialized.
    pub fn resources(&self) -> Option<&SharedResources> {
        self.resources.as_ref()
    }

    /// Drawable area as of the last draw.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    fn index_of(&self, id: ScreenId) -> Option<usize> {
        self.screens.iter().position(|s| s.id == id)
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Run one frame of logic.
    ///
    /// Screens are visited top to bottom. Each one's transition is advanced
    /// with the focus and coverage flags gathered so far; the first showing
    /// screen gets the input (only when the host has focus), and every
    /// showing non-popup covers the screens below it.
    pub fn update(
        &mut self,
        elapsed: Duration,
        has_focus: bool,
        source: &mut dyn InputSource,
    ) -> Result<()> {
        self.input.refresh(source);

        self.to_update.clear();
        self.to_update.extend(self.screens.iter().map(|s| s.id));

        let mut other_screen_has_focus = !has_focus;
        let mut covered_by_other_screen = false;
        // A failed add does not stop the walk; the first one is reported.
        let mut failure = None;

        while let Some(id) = self.to_update.pop() {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            let mut cx =
                ScreenContext::new(id, self.viewport, &mut self.commands, &mut self.next_id);
            self.screens[index].screen.update(
                &mut cx,
                elapsed,
                other_screen_has_focus,
                covered_by_other_screen,
            );
            failure = failure.or(self.apply_commands().err());

            // The screen may have removed itself.
            let Some(index) = self.index_of(id) else {
                continue;
            };
            let core = self.screens[index].screen.core();
            if core.exit_complete() {
                self.remove_screen(id);
                continue;
            }
            if !core.state().is_showing() {
                continue;
            }
            let is_popup = core.is_popup();

            if !other_screen_has_focus {
                let mut cx =
                    ScreenContext::new(id, self.viewport, &mut self.commands, &mut self.next_id);
                self.screens[index].screen.handle_input(&mut cx, &self.input);
                other_screen_has_focus = true;
                failure = failure.or(self.apply_commands().err());
            }
            if !is_popup {
                covered_by_other_screen = true;
            }
        }

        if self.config.trace {
            self.trace_screens();
        }
        failure.map_or(Ok(()), Err)
    }

    /// Apply every queued command in order. A screen whose content fails
    /// to load is dropped; the commands after it still run and the first
    /// failure is returned.
    fn apply_commands(&mut self) -> Result<()> {
        let mut first_error = None;
        for command in std::mem::take(&mut self.commands) {
            match command {
                Command::Add {
                    id,
                    screen,
                    controlling_player,
                } => {
                    if let Err(e) = self.insert(id, screen, controlling_player) {
                        log::error!("screen {id} not added: {e}");
                        first_error.get_or_insert(e);
                    }
                }
                Command::Remove(id) => {
                    self.remove_screen(id);
                }
                Command::Exit(id) => self.exit_screen(id),
                Command::RemoveAll => self.remove_all_screens(),
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn trace_screens(&self) {
        let names: Vec<String> = self
            .screens
            .iter()
            .map(|s| format!("{}{}", s.screen.name(), s.id))
            .collect();
        log::trace!("screens: [{}]", names.join(", "));
    }

    /// Draw every screen that is not hidden, bottom to top. Does nothing
    /// before initialization.
    pub fn draw(&mut self, elapsed: Duration, renderer: &mut dyn Renderer) {
        let Some(resources) = self.resources else {
            return;
        };
        self.viewport = renderer.viewport();
        for slot in &mut self.screens {
            if slot.screen.core().state() == ScreenState::Hidden {
                continue;
            }
            let mut cx = DrawContext::new(&mut *renderer, &resources, elapsed);
            slot.screen.draw(&mut cx);
        }
    }

    /// Draw a translucent full-viewport overlay of `color`.
    pub fn fade_back_buffer_to_color(&self, renderer: &mut dyn Renderer, color: Color, alpha: u8) {
        if let Some(resources) = &self.resources {
            screen::fade_back_buffer_to_color(renderer, resources.blank, color, alpha);
        }
    }
}

impl Model for ScreenManager {
    fn init(&mut self, content: Box<dyn ContentLoader>) -> std::result::Result<(), Box<dyn Error>> {
        Ok(self.initialize(content)?)
    }

    fn update(
        &mut self,
        elapsed: Duration,
        has_focus: bool,
        input: &mut dyn InputSource,
    ) -> std::result::Result<(), Box<dyn Error>> {
        Ok(ScreenManager::update(self, elapsed, has_focus, input)?)
    }

    fn draw(
        &mut self,
        elapsed: Duration,
        renderer: &mut dyn Renderer,
    ) -> std::result::Result<(), Box<dyn Error>> {
        ScreenManager::draw(self, elapsed, renderer);
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.screens.is_empty()
    }

    fn shutdown(&mut self) {
        self.unload_content();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenCore;
    use rand::prelude::*;
    use scrim_core::testing::{DrawCall, MemoryContent, RecordingRenderer, ScriptedInput};
    use scrim_core::{ContentError, DeviceState, Key};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;
    type Hook = Box<dyn FnMut(&mut ScreenContext<'_>)>;

    /// A screen that records every callback.
    struct Recorder {
        core: ScreenCore,
        name: &'static str,
        log: Log,
        on_update: Option<Hook>,
        on_input: Option<Hook>,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                core: ScreenCore::new(),
                name,
                log: log.clone(),
                on_update: None,
                on_input: None,
            }
        }

        fn with_core(mut self, core: ScreenCore) -> Self {
            self.core = core;
            self
        }

        fn on_update(mut self, f: impl FnMut(&mut ScreenContext<'_>) + 'static) -> Self {
            self.on_update = Some(Box::new(f));
            self
        }

        fn on_input(mut self, f: impl FnMut(&mut ScreenContext<'_>) + 'static) -> Self {
            self.on_input = Some(Box::new(f));
            self
        }

        fn boxed(self) -> Box<dyn Screen> {
            Box::new(self)
        }
    }

    impl Screen for Recorder {
        fn core(&self) -> &ScreenCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ScreenCore {
            &mut self.core
        }

        fn name(&self) -> &str {
            self.name
        }

        fn load_content(&mut self, cx: &mut LoadContext<'_>) -> std::result::Result<(), ContentError> {
            cx.content.load_image(self.name)?;
            self.log.borrow_mut().push(format!("load {}", self.name));
            Ok(())
        }

        fn unload_content(&mut self, _content: &mut dyn ContentLoader) {
            self.log.borrow_mut().push(format!("unload {}", self.name));
        }

        fn update(
            &mut self,
            cx: &mut ScreenContext<'_>,
            elapsed: Duration,
            other_screen_has_focus: bool,
            covered_by_other_screen: bool,
        ) {
            self.core
                .update(elapsed, other_screen_has_focus, covered_by_other_screen);
            self.log.borrow_mut().push(format!(
                "update {} focus={} covered={}",
                self.name, !other_screen_has_focus, covered_by_other_screen
            ));
            if let Some(f) = &mut self.on_update {
                f(cx);
            }
        }

        fn handle_input(&mut self, cx: &mut ScreenContext<'_>, _input: &InputState) {
            self.log.borrow_mut().push(format!("input {}", self.name));
            if let Some(f) = &mut self.on_input {
                f(cx);
            }
        }

        fn draw(&mut self, cx: &mut DrawContext<'_>) {
            let mut batch = cx.batch();
            batch.draw_text(
                scrim_core::Font(0),
                self.name,
                scrim_core::Vec2::ZERO,
                Default::default(),
            );
        }
    }

    fn half() -> ScreenCore {
        let d = Duration::from_millis(500);
        ScreenCore::new().with_transition_times(d, d)
    }

    fn manager() -> ScreenManager {
        let mut m = ScreenManager::default();
        m.initialize(Box::new(MemoryContent::lenient())).unwrap();
        m
    }

    fn frame(m: &mut ScreenManager, elapsed: Duration) {
        m.update(elapsed, true, &mut ScriptedInput::new()).unwrap();
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    fn inputs(entries: &[String]) -> Vec<&str> {
        entries
            .iter()
            .filter_map(|e| e.strip_prefix("input "))
            .collect()
    }

    #[test]
    fn empty_stack_is_a_no_op() {
        let mut m = manager();
        frame(&mut m, Duration::from_millis(16));
        let mut r = RecordingRenderer::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        m.draw(Duration::ZERO, &mut r);
        assert!(r.calls().is_empty());
        assert!(m.is_empty());
        assert!(Model::is_finished(&m));
    }

    #[test]
    fn top_screen_gets_focus_and_covers() {
        let log = Log::default();
        let mut m = manager();
        m.add_screen(Recorder::new("bottom", &log).boxed(), None).unwrap();
        m.add_screen(Recorder::new("top", &log).boxed(), None).unwrap();
        take(&log);

        frame(&mut m, Duration::ZERO);
        assert_eq!(
            take(&log),
            vec![
                "update top focus=true covered=false",
                "input top",
                "update bottom focus=false covered=true",
            ]
        );
        assert_eq!(m.screen(0).unwrap().core().state(), ScreenState::Hidden);
        assert_eq!(m.screen(1).unwrap().core().state(), ScreenState::Active);
    }

    #[test]
    fn popups_do_not_cover() {
        let log = Log::default();
        let mut m = manager();
        m.add_screen(Recorder::new("game", &log).boxed(), None).unwrap();
        m.add_screen(
            Recorder::new("pause", &log)
                .with_core(ScreenCore::new().popup())
                .boxed(),
            None,
        )
        .unwrap();
        take(&log);

        frame(&mut m, Duration::ZERO);
        let entries = take(&log);
        assert!(entries.contains(&"update game focus=false covered=false".to_string()));
        assert_eq!(inputs(&entries), vec!["pause"]);
        assert_eq!(m.screen(0).unwrap().core().state(), ScreenState::Active);
        assert!(!m.screen(0).unwrap().core().is_active());
    }

    #[test]
    fn no_input_without_host_focus() {
        let log = Log::default();
        let mut m = manager();
        m.add_screen(Recorder::new("only", &log).boxed(), None).unwrap();
        take(&log);
        m.update(Duration::ZERO, false, &mut ScriptedInput::new())
            .unwrap();
        let entries = take(&log);
        assert!(inputs(&entries).is_empty());
        assert_eq!(entries, vec!["update only focus=false covered=false"]);
    }

    #[test]
    fn exactly_one_screen_gets_input() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let log = Log::default();
            let mut m = manager();
            let n = rng.random_range(1..7);
            let mut names = Vec::new();
            for i in 0..n {
                let name: &'static str = ["a", "b", "c", "d", "e", "f"][i];
                let mut core = half();
                if rng.random_bool(0.5) {
                    core = core.popup();
                }
                names.push(name);
                m.add_screen(Recorder::new(name, &log).with_core(core).boxed(), None)
                    .unwrap();
            }
            for _ in 0..rng.random_range(1..10) {
                take(&log);
                let dt = Duration::from_millis(rng.random_range(0..300));
                frame(&mut m, dt);
                let entries = take(&log);
                let got = inputs(&entries);
                assert_eq!(got.len(), 1, "{entries:?}");

                // The receiver is the top-most showing screen.
                let expected = m
                    .screens()
                    .rev()
                    .find(|(_, s)| s.core().state().is_showing())
                    .map(|(_, s)| s.name().to_string());
                assert_eq!(expected.as_deref(), Some(got[0]));
            }
        }
    }

    #[test]
    fn deferred_load_until_initialized() {
        let log = Log::default();
        let mut m = ScreenManager::default();
        m.add_screen(Recorder::new("early", &log).boxed(), None).unwrap();
        assert!(take(&log).is_empty());
        assert!(!m.is_initialized());

        // Drawing before initialize does nothing.
        let mut r = RecordingRenderer::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        m.draw(Duration::ZERO, &mut r);
        assert!(r.calls().is_empty());

        let content = MemoryContent::lenient();
        let content_log = content.log();
        m.initialize(Box::new(content)).unwrap();
        assert_eq!(take(&log), vec!["load early"]);
        assert_eq!(
            content_log.loads(),
            vec![
                "ScreenManager/SmallFont",
                "ScreenManager/DefaultFont",
                "ScreenManager/BigFont",
                "ScreenManager/blank",
                "early",
            ]
        );

        m.add_screen(Recorder::new("late", &log).boxed(), None).unwrap();
        assert_eq!(take(&log), vec!["load late"]);

        m.unload_content();
        assert_eq!(take(&log), vec!["unload early", "unload late"]);
        assert_eq!(content_log.unload_count(), 1);
    }

    #[test]
    fn failed_load_rejects_screen() {
        let log = Log::default();
        let content = MemoryContent::strict()
            .with_font("ScreenManager/DefaultFont")
            .with_font("ScreenManager/SmallFont")
            .with_font("ScreenManager/BigFont")
            .with_image("ScreenManager/blank", 1, 1);
        let mut m = ScreenManager::default();
        m.initialize(Box::new(content)).unwrap();
        let err = m.add_screen(Recorder::new("missing", &log).boxed(), None);
        assert!(err.is_err());
        assert!(m.is_empty());

        let mut m = ScreenManager::default();
        assert!(m.initialize(Box::new(MemoryContent::strict())).is_err());
        assert!(!m.is_initialized());
    }

    #[test]
    fn failed_add_keeps_later_commands() {
        let log = Log::default();
        let content = MemoryContent::strict()
            .with_font("ScreenManager/DefaultFont")
            .with_font("ScreenManager/SmallFont")
            .with_font("ScreenManager/BigFont")
            .with_image("ScreenManager/blank", 1, 1)
            .with_image("menu", 1, 1)
            .with_image("below", 1, 1);
        let mut m = ScreenManager::default();
        m.initialize(Box::new(content)).unwrap();
        let below = m.add_screen(Recorder::new("below", &log).boxed(), None).unwrap();
        let child = log.clone();
        let menu = m
            .add_screen(
                Recorder::new("menu", &log)
                    .with_core(half())
                    .on_input(move |cx| {
                        cx.add_screen(Recorder::new("missing", &child).boxed(), None);
                        cx.exit();
                    })
                    .boxed(),
                None,
            )
            .unwrap();
        take(&log);

        assert!(m.update(Duration::ZERO, true, &mut ScriptedInput::new()).is_err());
        // The exit queued after the failed add still happened, and the walk
        // went on to the screen below.
        assert!(m.get(menu).unwrap().core().is_exiting());
        assert_eq!(m.len(), 2);
        assert!(take(&log).iter().any(|e| e.starts_with("update below")));
        assert!(m.contains(below));
    }

    #[test]
    fn remove_unknown_is_a_no_op() {
        let log = Log::default();
        let mut m = manager();
        let id = m.add_screen(Recorder::new("a", &log).boxed(), None).unwrap();
        assert!(m.remove_screen(id).is_some());
        assert!(m.remove_screen(id).is_none());
        assert!(m.remove_screen(ScreenId(999)).is_none());
        m.exit_screen(ScreenId(999));
        assert!(m.is_empty());
    }

    #[test]
    fn zero_off_time_exit_removes_at_once() {
        let log = Log::default();
        let mut m = manager();
        let id = m.add_screen(Recorder::new("a", &log).boxed(), None).unwrap();
        m.exit_screen(id);
        assert!(!m.contains(id));
        assert!(take(&log).contains(&"unload a".to_string()));
    }

    #[test]
    fn menu_exit_returns_focus_to_background() {
        let log = Log::default();
        let mut m = manager();
        let background = m
            .add_screen(Recorder::new("background", &log).with_core(half()).boxed(), None)
            .unwrap();
        let menu = m
            .add_screen(
                Recorder::new("menu", &log)
                    .with_core(half())
                    .on_input(|cx| cx.exit())
                    .boxed(),
                Some(PlayerIndex::One),
            )
            .unwrap();

        // Nothing asks to exit until the menu first handles input, so this
        // frame both enters and requests the exit.
        frame(&mut m, Duration::from_millis(500));
        let entries = take(&log);
        assert_eq!(inputs(&entries), vec!["menu"]);
        assert!(entries.contains(&"update background focus=false covered=true".to_string()));
        assert!(m.get(menu).unwrap().core().is_exiting());
        assert_eq!(m.get(menu).unwrap().core().state(), ScreenState::Active);

        frame(&mut m, Duration::from_millis(250));
        assert_eq!(
            m.get(menu).unwrap().core().state(),
            ScreenState::TransitionOff
        );

        frame(&mut m, Duration::from_millis(250));
        assert!(!m.contains(menu));
        assert!(take(&log).contains(&"unload menu".to_string()));

        frame(&mut m, Duration::from_millis(16));
        let entries = take(&log);
        assert_eq!(
            entries,
            vec![
                "update background focus=true covered=false",
                "input background",
            ]
        );
        assert_eq!(m.len(), 1);
        assert!(m.contains(background));
    }

    #[test]
    fn screens_added_mid_pass_wait_a_frame() {
        let log = Log::default();
        let mut m = manager();
        let inner = log.clone();
        let mut spawned = false;
        m.add_screen(
            Recorder::new("menu", &log)
                .on_input(move |cx| {
                    if !spawned {
                        spawned = true;
                        cx.add_screen(Recorder::new("options", &inner).boxed(), None);
                    }
                })
                .boxed(),
            None,
        )
        .unwrap();
        take(&log);

        frame(&mut m, Duration::ZERO);
        assert_eq!(
            take(&log),
            vec![
                "update menu focus=true covered=false",
                "input menu",
                "load options",
            ]
        );
        assert_eq!(m.len(), 2);

        frame(&mut m, Duration::ZERO);
        let entries = take(&log);
        assert_eq!(inputs(&entries), vec!["options"]);
        assert_eq!(entries[0], "update options focus=true covered=false");
    }

    #[test]
    fn screen_removed_mid_pass_is_skipped() {
        let log = Log::default();
        let mut m = manager();
        let bottom = m.add_screen(Recorder::new("bottom", &log).boxed(), None).unwrap();
        m.add_screen(
            Recorder::new("top", &log)
                .on_update(move |cx| cx.remove_screen(bottom))
                .boxed(),
            None,
        )
        .unwrap();
        take(&log);

        frame(&mut m, Duration::ZERO);
        assert_eq!(
            take(&log),
            vec![
                "update top focus=true covered=false",
                "unload bottom",
                "input top",
            ]
        );
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn remove_all_from_a_callback() {
        let log = Log::default();
        let mut m = manager();
        m.add_screen(Recorder::new("a", &log).boxed(), None).unwrap();
        m.add_screen(
            Recorder::new("b", &log)
                .on_input(|cx| cx.remove_all_screens())
                .boxed(),
            None,
        )
        .unwrap();
        take(&log);
        frame(&mut m, Duration::ZERO);
        assert!(m.is_empty());
        let entries = take(&log);
        assert!(entries.contains(&"unload a".to_string()));
        assert!(!entries.iter().any(|e| e.starts_with("update a")));
    }

    #[test]
    fn draw_skips_hidden_bottom_to_top() {
        let log = Log::default();
        let mut m = manager();
        m.add_screen(Recorder::new("hidden", &log).boxed(), None).unwrap();
        m.add_screen(Recorder::new("middle", &log).boxed(), None).unwrap();
        m.add_screen(
            Recorder::new("popup", &log)
                .with_core(ScreenCore::new().popup())
                .boxed(),
            None,
        )
        .unwrap();
        frame(&mut m, Duration::ZERO);

        let mut r = RecordingRenderer::new(Rect::new(0.0, 0.0, 40.0, 20.0));
        m.draw(Duration::ZERO, &mut r);
        assert_eq!(r.texts(), vec!["middle", "popup"]);
        assert_eq!(m.viewport(), Rect::new(0.0, 0.0, 40.0, 20.0));
    }

    #[test]
    fn input_reaches_the_snapshot() {
        let mut m = manager();
        let mut source = ScriptedInput::new();
        source.push(DeviceState::default().with_down(PlayerIndex::One, Key::Enter));
        m.update(Duration::ZERO, true, &mut source).unwrap();
        assert_eq!(m.input().is_menu_select(None), Some(PlayerIndex::One));
    }

    #[test]
    fn fade_uses_blank_image() {
        let m = manager();
        let mut r = RecordingRenderer::new(Rect::new(0.0, 0.0, 8.0, 4.0));
        m.fade_back_buffer_to_color(&mut r, Color::BLACK, 128);
        let blank = m.resources().unwrap().blank;
        assert_eq!(
            r.calls()[1],
            DrawCall::Image {
                image: Some(blank),
                dest: scrim_core::Destination::Rect(Rect::new(0.0, 0.0, 8.0, 4.0)),
                params: scrim_core::DrawParams::tinted(Color::BLACK.with_alpha(128)),
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_round_trips() {
        let config = ManagerConfig {
            trace: true,
            ..ManagerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ManagerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: ManagerConfig = serde_json::from_str(r#"{"font":"Mono"}"#).unwrap();
        assert_eq!(partial.font, "Mono");
        assert_eq!(partial.blank, "ScreenManager/blank");
    }
}
