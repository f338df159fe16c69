#![warn(missing_docs)]

//! # countdown-widget
//!
//! A circular countdown widget: a background track, a progress arc that
//! retracts as time runs out, and a centered `MM:SS` label. The countdown
//! ticks once per second through [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! commands, calls back on every tick and on completion, and can be paused,
//! resumed, reset and destroyed.
//!
//! ## Overview
//!
//! The widget renders into a mount point of a host [`document::Document`],
//! the way a browser component renders into a page element: the mount is
//! resolved from a selector, its content is replaced with the widget's
//! structure, and the widget's visual parameters are published on the mount
//! as CSS custom properties (`--size`, `--color`, `--background-color`,
//! `--font-size`, `--circumference`) for stylesheets to consume.
//!
//! ## Quick Start
//!
//! ```rust
//! use countdown_widget::prelude::*;
//!
//! let doc = Document::new();
//! doc.body().append_child(ElementRef::new("div").with_id("timer"));
//!
//! let mut timer = countdown_new(&doc, "#timer", &[
//!     with_duration(20),
//!     with_color("#ff6347"),
//!     with_on_complete(|| println!("Countdown complete!")),
//!     with_on_tick(|left| println!("Time left: {left}")),
//! ]).unwrap();
//!
//! assert_eq!(timer.label(), "00:20");
//!
//! timer.pause();
//! let _resume_cmd = timer.resume();
//!
//! timer.config.duration = 30;
//! let _reset_cmd = timer.reset();
//! assert_eq!(timer.label(), "00:30");
//!
//! timer.destroy();
//! assert!(timer.view().is_empty());
//! ```
//!
//! ## Rendered markup
//!
//! ```text
//! <div class="countdown__container">
//!   <svg class="countdown__circle" width=".." height=".." viewBox="0 0 .. ..">
//!     <circle class="countdown__background" cx cy r stroke-width />
//!     <circle class="countdown__progress" cx cy r stroke-width transform="rotate(-90 ..)" />
//!   </svg>
//!   <div class="countdown__text">MM:SS</div>
//! </div>
//! ```
//!
//! ## Logging
//!
//! Lifecycle transitions are reported through [`tracing`] at `debug` level
//! and every tick at `trace` level. The crate never installs a subscriber.

pub mod config;
pub mod countdown;
pub mod document;
pub mod error;
pub mod format;
pub mod geometry;
pub mod key;

pub use config::{Config, CountdownOption};
pub use countdown::{Model as Countdown, State, TickMsg, TimeoutMsg};
pub use document::{Document, ElementRef, Selector};
pub use error::{Error, Result};
pub use format::format_time;
pub use geometry::{Geometry, StyleParams};

/// Everything needed to mount and drive a countdown.
///
/// ```rust
/// use countdown_widget::prelude::*;
///
/// let doc = Document::new();
/// doc.body().append_child(ElementRef::new("div").with_class("timer"));
/// let timer = countdown_new(&doc, ".timer", &[with_duration(5)]).unwrap();
/// assert_eq!(timer.time_left(), 5);
/// ```
pub mod prelude {
    pub use crate::config::{
        with_background_color, with_color, with_duration, with_font_size, with_on_complete,
        with_on_tick, with_size, with_stroke_width, Config, CountdownOption,
    };
    pub use crate::countdown::{new as countdown_new, Model as Countdown, State, TickMsg, TimeoutMsg};
    pub use crate::document::{Document, ElementRef};
    pub use crate::error::{Error, Result};
    pub use crate::format::format_time;
    pub use crate::key::{Binding, KeyMap};
}
