//! Circular countdown widget.
//!
//! The widget renders a background track, a progress arc and an `MM:SS`
//! label into a mount point of a host [`Document`], then counts down once per
//! second. The arc retracts as time runs out; when the label reaches `00:00`
//! the countdown stops, the arc's transition is switched off and the
//! completion callback fires.
//!
//! # Basic Usage
//!
//! ```rust
//! use countdown_widget::countdown::new;
//! use countdown_widget::config::{with_duration, with_size, with_stroke_width};
//! use countdown_widget::document::{Document, ElementRef};
//!
//! let doc = Document::new();
//! doc.body().append_child(ElementRef::new("div").with_class("timer-container"));
//!
//! let timer = new(&doc, ".timer-container", &[
//!     with_duration(20),
//!     with_size(300.0),
//!     with_stroke_width(12.0),
//! ]).unwrap();
//!
//! assert_eq!(timer.time_left(), 20);
//! assert_eq!(timer.label(), "00:20");
//! assert!(timer.running());
//!
//! // Hand this to the bubbletea runtime to receive the first tick.
//! let _cmd = timer.init();
//! ```
//!
//! # bubbletea-rs Integration
//!
//! Ticks arrive as [`TickMsg`] values produced by the command returned from
//! [`Model::init`], [`Model::resume`] and [`Model::reset`]. Forward messages
//! to [`Model::update`] and return whatever command it gives back:
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Msg};
//! use countdown_widget::countdown::{Model, TimeoutMsg};
//!
//! fn handle(timer: &mut Model, msg: Msg) -> Option<Cmd> {
//!     if let Some(done) = msg.downcast_ref::<TimeoutMsg>() {
//!         if done.id == timer.id() {
//!             // countdown finished
//!         }
//!     }
//!     timer.update(msg)
//! }
//! ```
//!
//! # Lifecycle
//!
//! Running and paused states alternate through [`Model::pause`] and
//! [`Model::resume`]. A countdown that reaches zero is completed, which is a
//! paused state with the completion callback already fired. [`Model::reset`]
//! restarts from the configured duration from any state, and
//! [`Model::destroy`] stops ticking and empties the mount for good.

use crate::config::{Config, CountdownOption};
use crate::document::{Document, ElementRef};
use crate::error::{Error, Result};
use crate::format::format_time;
use crate::geometry::{Geometry, StyleParams};
use crate::key::KeyMap;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use lipgloss_extras::lipgloss::{Color, Style};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

// Internal ID management for countdown instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Time between two ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Arc transition while running. Slightly shorter than the tick interval so
/// each animation settles before the next update.
pub const TRANSITION: &str = "stroke-dashoffset 0.95s linear";

/// Class of the wrapper element placed inside the mount.
pub const CONTAINER_CLASS: &str = "countdown__container";
/// Class of the `<svg>` element.
pub const CIRCLE_CLASS: &str = "countdown__circle";
/// Class of the background track circle.
pub const BACKGROUND_CLASS: &str = "countdown__background";
/// Class of the progress arc circle.
pub const PROGRESS_CLASS: &str = "countdown__progress";
/// Class of the label element.
pub const TEXT_CLASS: &str = "countdown__text";

/// Message delivered once per second to a running countdown.
///
/// Each message carries the id of the widget that scheduled it and the tag of
/// the timer generation it belongs to. A widget drops messages whose tag is
/// not its live one, which is how pausing or restarting cancels ticks already
/// in flight.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Widget the tick is addressed to.
    pub id: i64,
    tag: i64,
}

/// Message sent once when a countdown reaches zero.
#[derive(Debug, Clone)]
pub struct TimeoutMsg {
    /// Widget that completed.
    pub id: i64,
}

/// Where a countdown is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Ticking.
    Running,
    /// Stopped by `pause()`, resumable.
    Paused,
    /// Ran down to zero. No timer is live and the completion callback fired.
    Completed,
    /// Torn down by `destroy()`. Terminal.
    Destroyed,
}

/// A circular countdown mounted into a host document.
///
/// `config` stays public: changing `config.duration` and calling
/// [`Model::reset`] restarts the countdown with the new length. No validation
/// happens on mutation.
#[derive(Debug)]
pub struct Model {
    /// Settings the widget was built with; read on every tick and reset.
    pub config: Config,
    /// Keys handled by [`Model::update`].
    pub keymap: KeyMap,
    time_left: u64,
    mount: ElementRef,
    svg: ElementRef,
    background_circle: ElementRef,
    progress_circle: ElementRef,
    text: ElementRef,
    id: i64,
    // Last tag handed out; bumped on every start and every accepted tick.
    tag: i64,
    // Tag of the live timer, if any. At most one exists.
    active_tag: Option<i64>,
    state: State,
}

/// Builds a countdown inside the element `locator` resolves to in `document`.
///
/// The mount's existing content is replaced and the countdown starts at once.
/// Call [`Model::init`] to obtain the command that delivers the first tick.
///
/// # Errors
///
/// * [`Error::Configuration`] when `locator` is empty.
/// * [`Error::InvalidSelector`] when `locator` is not a supported selector.
/// * [`Error::MountNotFound`] when nothing in `document` matches `locator`.
///
/// ```rust
/// use countdown_widget::countdown::new;
/// use countdown_widget::document::Document;
/// use countdown_widget::error::Error;
///
/// let doc = Document::new();
/// assert!(matches!(new(&doc, "", &[]), Err(Error::Configuration(_))));
/// assert!(matches!(new(&doc, "#missing", &[]), Err(Error::MountNotFound(_))));
/// ```
pub fn new(document: &Document, locator: &str, opts: &[CountdownOption]) -> Result<Model> {
    if locator.trim().is_empty() {
        return Err(Error::Configuration("locator missing".to_string()));
    }
    let mount = document
        .query_selector(locator)?
        .ok_or_else(|| Error::MountNotFound(locator.to_string()))?;
    Ok(Model::mount(mount, opts))
}

impl Model {
    /// Builds a countdown directly into `mount`, skipping locator resolution.
    pub fn mount(mount: ElementRef, opts: &[CountdownOption]) -> Self {
        let config = Config::from_options(opts);
        let time_left = config.duration;

        let mut model = Self {
            keymap: KeyMap::default(),
            time_left,
            svg: ElementRef::new("svg").with_class(CIRCLE_CLASS),
            background_circle: ElementRef::new("circle").with_class(BACKGROUND_CLASS),
            progress_circle: ElementRef::new("circle").with_class(PROGRESS_CLASS),
            text: ElementRef::new("div").with_class(TEXT_CLASS),
            mount,
            config,
            id: next_id(),
            tag: 0,
            active_tag: None,
            state: State::Paused,
        };

        model.create_structure();
        model.apply_styles();
        debug!(
            id = model.id,
            duration = model.config.duration,
            "countdown mounted"
        );
        // The first tick command is handed out by init().
        model.arm();
        model
    }

    /// Unique identifier used to route messages to this widget.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Seconds left on the countdown.
    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether a timer is live.
    pub fn running(&self) -> bool {
        self.state == State::Running
    }

    /// Whether the countdown is paused (completed countdowns count as paused).
    pub fn paused(&self) -> bool {
        matches!(self.state, State::Paused | State::Completed)
    }

    /// Whether the countdown ran down to zero.
    pub fn completed(&self) -> bool {
        self.state == State::Completed
    }

    /// Whether `destroy()` was called.
    pub fn destroyed(&self) -> bool {
        self.state == State::Destroyed
    }

    /// The element the widget renders into.
    pub fn mount_point(&self) -> &ElementRef {
        &self.mount
    }

    /// Text currently shown by the label.
    pub fn label(&self) -> String {
        self.text.text_content()
    }

    /// Remaining share of the countdown against the current duration.
    pub fn progress(&self) -> f64 {
        crate::geometry::progress(self.time_left, self.config.duration)
    }

    /// Dash offset for the current state, as it would be rendered now.
    pub fn dashoffset(&self) -> f64 {
        Geometry::from_config(&self.config).dashoffset(self.time_left, self.config.duration)
    }

    /// Visual parameters derived from the current configuration.
    pub fn style_params(&self) -> StyleParams {
        StyleParams::from_config(&self.config)
    }

    fn create_structure(&mut self) {
        let geometry = Geometry::from_config(&self.config);
        let half = geometry.center();
        let size = geometry.size;

        self.svg.set_attribute("width", size.to_string());
        self.svg.set_attribute("height", size.to_string());
        self.svg.set_attribute("viewBox", format!("0 0 {size} {size}"));

        for circle in [&self.background_circle, &self.progress_circle] {
            circle.set_attribute("cx", half.to_string());
            circle.set_attribute("cy", half.to_string());
            circle.set_attribute("r", geometry.radius.to_string());
            circle.set_attribute("stroke-width", geometry.stroke_width.to_string());
        }
        self.progress_circle
            .set_attribute("transform", format!("rotate(-90 {half} {half})"));

        self.text.set_text(format_time(self.time_left));
        self.svg.replace_children(vec![
            self.background_circle.clone(),
            self.progress_circle.clone(),
        ]);

        let container = ElementRef::new("div")
            .with_class(CONTAINER_CLASS)
            .with_child(self.svg.clone())
            .with_child(self.text.clone());
        self.mount.replace_children(vec![container]);
    }

    fn apply_styles(&self) {
        for (name, value) in self.style_params().variables() {
            self.mount.set_style(name, value);
        }
    }

    // Pushes the current time onto the arc and the label.
    fn render(&self) {
        let offset = self.dashoffset();
        self.progress_circle
            .set_style("stroke-dashoffset", offset.to_string());
        self.text.set_text(format_time(self.time_left));
    }

    // Enters the running state with a fresh timer generation. Bumping the tag
    // invalidates every tick of the previous generation.
    fn arm(&mut self) {
        self.tag += 1;
        self.active_tag = Some(self.tag);
        self.state = State::Running;
        self.progress_circle.set_style("transition", TRANSITION);
        debug!(id = self.id, tag = self.tag, time_left = self.time_left, "countdown started");
    }

    // The only place a timer is (re)started.
    fn start(&mut self) -> Cmd {
        self.arm();
        self.tick()
    }

    // Every accepted tick moves the live generation forward, so a duplicate
    // of an already handled tick is stale on arrival.
    fn rearm(&mut self) -> Cmd {
        self.tag += 1;
        self.active_tag = Some(self.tag);
        self.tick()
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(TICK_INTERVAL, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    fn timeout_cmd(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(TimeoutMsg { id }) as Msg
        })
    }

    // One tick: render, advance the countdown, schedule what comes next, then
    // notify. Callback panics are caught and logged, so they never stop the
    // countdown, skip the completion callback or repeat a tick.
    fn step(&mut self) -> Option<Cmd> {
        self.render();

        let remaining = self.time_left;
        let next = if self.time_left > 0 {
            self.time_left -= 1;
            self.rearm()
        } else {
            self.active_tag = None;
            self.state = State::Completed;
            self.progress_circle.set_style("transition", "none");
            debug!(id = self.id, "countdown completed");
            self.timeout_cmd()
        };
        trace!(id = self.id, remaining, "countdown tick");

        if let Some(on_tick) = self.config.on_tick.clone() {
            self.notify("on_tick", || on_tick(remaining));
        }
        if self.completed() {
            if let Some(on_complete) = self.config.on_complete.clone() {
                self.notify("on_complete", || on_complete());
            }
        }
        Some(next)
    }

    fn notify(&self, callback: &str, f: impl FnOnce()) {
        if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
            error!(id = self.id, callback, "countdown callback panicked");
        }
    }

    /// Returns the command that delivers the first tick.
    ///
    /// The countdown is already running once constructed; this only hands
    /// the pending tick to the runtime. Calling it twice yields two copies of
    /// the same tick, and only the first to arrive is processed. Returns a
    /// tick for a stale generation (dropped on arrival) when the widget is no
    /// longer running.
    pub fn init(&self) -> Cmd {
        self.tick()
    }

    /// Stops ticking, leaving the remaining time and the display untouched.
    ///
    /// Idempotent. Pausing a completed countdown keeps it completed.
    pub fn pause(&mut self) {
        if self.destroyed() {
            warn!(id = self.id, "pause() on a destroyed countdown");
            return;
        }
        self.active_tag = None;
        if self.state == State::Running {
            self.state = State::Paused;
            debug!(id = self.id, time_left = self.time_left, "countdown paused");
        }
    }

    /// Restarts ticking from the current remaining time.
    ///
    /// Any live timer is replaced. Resuming a completed countdown runs one
    /// more tick at zero, which completes it again. Returns `None` once
    /// destroyed.
    pub fn resume(&mut self) -> Option<Cmd> {
        if self.destroyed() {
            warn!(id = self.id, "resume() on a destroyed countdown");
            return None;
        }
        Some(self.start())
    }

    /// Pauses a running countdown, resumes any other.
    pub fn toggle(&mut self) -> Option<Cmd> {
        if self.running() {
            self.pause();
            None
        } else {
            self.resume()
        }
    }

    /// Restarts the countdown from `config.duration`.
    ///
    /// The display jumps to the full state immediately, without waiting for a
    /// tick and without firing callbacks. Size, stroke and color changes made
    /// to `config` are picked up as well. Returns `None` once destroyed.
    pub fn reset(&mut self) -> Option<Cmd> {
        if self.destroyed() {
            warn!(id = self.id, "reset() on a destroyed countdown");
            return None;
        }
        self.time_left = self.config.duration;
        self.create_structure();
        self.apply_styles();
        self.render();
        debug!(id = self.id, duration = self.config.duration, "countdown reset");
        Some(self.start())
    }

    /// Stops ticking and removes the rendered structure from the mount.
    ///
    /// No callback fires. Every later lifecycle call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed() {
            return;
        }
        self.active_tag = None;
        self.mount.clear();
        self.state = State::Destroyed;
        debug!(id = self.id, "countdown destroyed");
    }

    /// Processes tick and key messages.
    ///
    /// Ticks for another widget or for a superseded timer are ignored, as
    /// are all messages after `destroy()`.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if tick_msg.id != self.id || self.active_tag != Some(tick_msg.tag) {
                return None;
            }
            return self.step();
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.destroyed() {
                return None;
            }
            if self.keymap.toggle.matches(key_msg) {
                return self.toggle();
            }
            if self.keymap.reset.matches(key_msg) {
                return self.reset();
            }
        }

        None
    }

    /// Markup of everything the widget rendered into its mount.
    ///
    /// Empty after `destroy()`.
    pub fn view(&self) -> String {
        self.mount.inner_html()
    }

    /// The label styled with the progress color, for terminal output.
    pub fn view_label(&self) -> String {
        if self.destroyed() {
            return String::new();
        }
        Style::new()
            .foreground(Color::from(self.config.color.as_str()))
            .render(&self.label())
    }
}

impl BubbleTeaModel for Model {
    /// Runs a default 60 second countdown in a fresh document.
    fn init() -> (Self, Option<Cmd>) {
        let document = Document::new();
        let mount = ElementRef::new("div").with_id("countdown");
        document.body().append_child(mount.clone());

        let model = Model::mount(mount, &[]);
        let cmd = model.init();
        (model, Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    /// A terminal has no use for the SVG markup, so the standalone program
    /// shows the styled label.
    fn view(&self) -> String {
        self.view_label()
    }
}
