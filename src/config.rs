//! Countdown configuration and the option overlay used to build it.
//!
//! A [`Config`] starts from its defaults and is then overlaid with a slice of
//! [`CountdownOption`] values, one field at a time. Fields the options do not
//! mention keep their defaults.
//!
//! ```rust
//! use countdown_widget::config::{Config, with_duration, with_color};
//!
//! let config = Config::from_options(&[
//!     with_duration(20),
//!     with_color("#ff6347"),
//! ]);
//! assert_eq!(config.duration, 20);
//! assert_eq!(config.color, "#ff6347");
//! assert_eq!(config.size, 200.0); // default kept
//! ```
//!
//! The configuration stays public and mutable after the widget is built:
//! changing `duration` and calling `reset()` restarts the countdown from the
//! new value.

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Default countdown length in seconds.
pub const DEFAULT_DURATION: u64 = 60;
/// Default progress arc color.
pub const DEFAULT_COLOR: &str = "#c39fe0";
/// Default widget diameter in pixels.
pub const DEFAULT_SIZE: f64 = 200.0;
/// Default track color.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#eee";
/// Default stroke width in pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 4.0;
/// Default label font size, as a fraction of the diameter.
pub const DEFAULT_FONT_SIZE: f64 = 0.2;

/// Called once per tick with the remaining seconds, before the decrement.
pub type TickCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Called once when the countdown runs down to zero.
pub type CompleteCallback = Arc<dyn Fn() + Send + Sync>;

/// Everything that shapes a countdown widget.
#[derive(Clone)]
pub struct Config {
    /// Countdown length in seconds.
    pub duration: u64,
    /// Color of the progress arc.
    pub color: String,
    /// Diameter of the widget in pixels.
    pub size: f64,
    /// Color of the background track.
    pub background_color: String,
    /// Stroke width of both circles in pixels.
    pub stroke_width: f64,
    /// Label font size relative to `size`.
    pub font_size: f64,
    /// Invoked when the countdown completes.
    pub on_complete: Option<CompleteCallback>,
    /// Invoked on every tick with the pre-decrement remaining time.
    pub on_tick: Option<TickCallback>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            color: DEFAULT_COLOR.to_string(),
            size: DEFAULT_SIZE,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            on_complete: None,
            on_tick: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("duration", &self.duration)
            .field("color", &self.color)
            .field("size", &self.size)
            .field("background_color", &self.background_color)
            .field("stroke_width", &self.stroke_width)
            .field("font_size", &self.font_size)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_tick", &self.on_tick.is_some())
            .finish()
    }
}

impl Config {
    /// Defaults overlaid with `opts`, applied in order.
    pub fn from_options(opts: &[CountdownOption]) -> Self {
        let mut config = Self::default();
        for opt in opts {
            opt.apply(&mut config);
        }
        config
    }

    /// Opt-in sanity check for values that would render a degenerate widget.
    ///
    /// The widget itself never calls this: a zero duration or a non-positive
    /// size is accepted and simply produces NaN or negative geometry.
    pub fn validate(&self) -> Result<()> {
        if self.duration == 0 {
            return Err(Error::Configuration("duration must be positive".into()));
        }
        if !(self.size > 0.0) {
            return Err(Error::Configuration("size must be positive".into()));
        }
        if !(self.stroke_width >= 0.0) || self.size / 2.0 - self.stroke_width <= 0.0 {
            return Err(Error::Configuration(
                "stroke width must leave a positive radius".into(),
            ));
        }
        Ok(())
    }
}

/// One field of a configuration overlay.
///
/// Build these with the `with_*` functions and pass them to
/// [`crate::countdown::new`] or [`Config::from_options`].
pub enum CountdownOption {
    /// Countdown length in seconds.
    WithDuration(u64),
    /// Progress arc color (any CSS color).
    WithColor(String),
    /// Diameter in pixels.
    WithSize(f64),
    /// Background track color.
    WithBackgroundColor(String),
    /// Stroke width in pixels.
    WithStrokeWidth(f64),
    /// Label font size as a fraction of the diameter.
    WithFontSize(f64),
    /// Completion callback.
    WithOnComplete(CompleteCallback),
    /// Per-tick callback.
    WithOnTick(TickCallback),
}

impl CountdownOption {
    fn apply(&self, c: &mut Config) {
        match self {
            CountdownOption::WithDuration(d) => c.duration = *d,
            CountdownOption::WithColor(color) => c.color = color.clone(),
            CountdownOption::WithSize(size) => c.size = *size,
            CountdownOption::WithBackgroundColor(color) => c.background_color = color.clone(),
            CountdownOption::WithStrokeWidth(w) => c.stroke_width = *w,
            CountdownOption::WithFontSize(ratio) => c.font_size = *ratio,
            CountdownOption::WithOnComplete(f) => c.on_complete = Some(Arc::clone(f)),
            CountdownOption::WithOnTick(f) => c.on_tick = Some(Arc::clone(f)),
        }
    }
}

impl fmt::Debug for CountdownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownOption::WithDuration(d) => f.debug_tuple("WithDuration").field(d).finish(),
            CountdownOption::WithColor(c) => f.debug_tuple("WithColor").field(c).finish(),
            CountdownOption::WithSize(s) => f.debug_tuple("WithSize").field(s).finish(),
            CountdownOption::WithBackgroundColor(c) => {
                f.debug_tuple("WithBackgroundColor").field(c).finish()
            }
            CountdownOption::WithStrokeWidth(w) => f.debug_tuple("WithStrokeWidth").field(w).finish(),
            CountdownOption::WithFontSize(r) => f.debug_tuple("WithFontSize").field(r).finish(),
            CountdownOption::WithOnComplete(_) => f.write_str("WithOnComplete(..)"),
            CountdownOption::WithOnTick(_) => f.write_str("WithOnTick(..)"),
        }
    }
}

/// Sets the countdown length in seconds.
pub fn with_duration(seconds: u64) -> CountdownOption {
    CountdownOption::WithDuration(seconds)
}

/// Sets the progress arc color.
///
/// ```rust
/// use countdown_widget::config::{Config, with_color};
///
/// let config = Config::from_options(&[with_color("tomato")]);
/// assert_eq!(config.color, "tomato");
/// ```
pub fn with_color(color: impl Into<String>) -> CountdownOption {
    CountdownOption::WithColor(color.into())
}

/// Sets the widget diameter in pixels.
pub fn with_size(size: f64) -> CountdownOption {
    CountdownOption::WithSize(size)
}

/// Sets the background track color.
pub fn with_background_color(color: impl Into<String>) -> CountdownOption {
    CountdownOption::WithBackgroundColor(color.into())
}

/// Sets the stroke width of both circles in pixels.
pub fn with_stroke_width(width: f64) -> CountdownOption {
    CountdownOption::WithStrokeWidth(width)
}

/// Sets the label font size as a fraction of the diameter.
pub fn with_font_size(ratio: f64) -> CountdownOption {
    CountdownOption::WithFontSize(ratio)
}

/// Registers a callback fired once when the countdown reaches zero.
///
/// It does not fire on `pause()` or `destroy()`.
pub fn with_on_complete<F>(f: F) -> CountdownOption
where
    F: Fn() + Send + Sync + 'static,
{
    CountdownOption::WithOnComplete(Arc::new(f))
}

/// Registers a callback fired on every tick with the remaining seconds.
///
/// ```rust
/// use countdown_widget::config::{Config, with_on_tick};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let config = Config::from_options(&[with_on_tick(move |t| sink.lock().unwrap().push(t))]);
///
/// (config.on_tick.unwrap())(42);
/// assert_eq!(*seen.lock().unwrap(), vec![42]);
/// ```
pub fn with_on_tick<F>(f: F) -> CountdownOption
where
    F: Fn(u64) + Send + Sync + 'static,
{
    CountdownOption::WithOnTick(Arc::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.duration, 60);
        assert_eq!(config.color, "#c39fe0");
        assert_eq!(config.size, 200.0);
        assert_eq!(config.background_color, "#eee");
        assert_eq!(config.stroke_width, 4.0);
        assert_eq!(config.font_size, 0.2);
        assert!(config.on_complete.is_none());
        assert!(config.on_tick.is_none());
    }

    #[test]
    fn test_overlay_is_field_by_field() {
        let config = Config::from_options(&[
            with_duration(20),
            with_color("#ff6347"),
            with_background_color("#f0f0f0"),
            with_size(300.0),
            with_stroke_width(12.0),
            with_font_size(0.3),
        ]);
        assert_eq!(config.duration, 20);
        assert_eq!(config.color, "#ff6347");
        assert_eq!(config.background_color, "#f0f0f0");
        assert_eq!(config.size, 300.0);
        assert_eq!(config.stroke_width, 12.0);
        assert_eq!(config.font_size, 0.3);

        let partial = Config::from_options(&[with_size(120.0)]);
        assert_eq!(partial.size, 120.0);
        assert_eq!(partial.duration, DEFAULT_DURATION);
        assert_eq!(partial.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_later_options_win() {
        let config = Config::from_options(&[with_duration(5), with_duration(7)]);
        assert_eq!(config.duration, 7);
    }

    #[test]
    fn test_callbacks_are_stored() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let config = Config::from_options(&[with_on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        })]);
        (config.on_complete.as_ref().unwrap())();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(format!("{:?}", config).contains("on_complete: true"));
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::from_options(&[with_duration(0)]).validate().is_err());
        assert!(Config::from_options(&[with_size(0.0)]).validate().is_err());
        assert!(Config::from_options(&[with_size(f64::NAN)]).validate().is_err());
        assert!(Config::from_options(&[with_size(20.0), with_stroke_width(10.0)])
            .validate()
            .is_err());
    }
}
