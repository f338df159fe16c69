//! Circle geometry for the progress arc.
//!
//! The arc is a stroked circle whose dash offset hides the elapsed share of
//! its circumference. Every place that needs the radius goes through
//! [`radius`] so the progress arc always lines up with the background track.

use crate::config::Config;
use std::f64::consts::PI;

/// Radius of both circles: half the diameter minus the stroke width.
pub fn radius(size: f64, stroke_width: f64) -> f64 {
    size / 2.0 - stroke_width
}

/// Circumference of the circle of [`radius`].
pub fn circumference(size: f64, stroke_width: f64) -> f64 {
    2.0 * PI * radius(size, stroke_width)
}

/// Share of the countdown still remaining, 1.0 at the start and 0.0 at the end.
///
/// No guard against a zero duration: `0 / 0` yields NaN.
pub fn progress(time_left: u64, duration: u64) -> f64 {
    time_left as f64 / duration as f64
}

/// Length of arc to hide for the given progress.
pub fn dashoffset(circumference: f64, progress: f64) -> f64 {
    circumference * (1.0 - progress)
}

/// Derived geometry for one widget size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Diameter in pixels.
    pub size: f64,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// Circle radius.
    pub radius: f64,
    /// Circle circumference.
    pub circumference: f64,
}

impl Geometry {
    /// Derives the geometry for a widget of diameter `size`.
    pub fn new(size: f64, stroke_width: f64) -> Self {
        Self {
            size,
            stroke_width,
            radius: radius(size, stroke_width),
            circumference: circumference(size, stroke_width),
        }
    }

    /// Geometry for the size and stroke width of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.size, config.stroke_width)
    }

    /// Center coordinate on both axes.
    pub fn center(&self) -> f64 {
        self.size / 2.0
    }

    /// Dash offset for `time_left` seconds out of `duration`.
    pub fn dashoffset(&self, time_left: u64, duration: u64) -> f64 {
        dashoffset(self.circumference, progress(time_left, duration))
    }
}

/// The visual parameters pushed onto the mount as CSS custom properties.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleParams {
    /// Diameter in pixels.
    pub size: f64,
    /// Progress arc color.
    pub color: String,
    /// Track color.
    pub background_color: String,
    /// Label font-size ratio.
    pub font_size: f64,
    /// Arc circumference, for stylesheets driving `stroke-dasharray`.
    pub circumference: f64,
}

impl StyleParams {
    /// Computes the parameters for `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            size: config.size,
            color: config.color.clone(),
            background_color: config.background_color.clone(),
            font_size: config.font_size,
            circumference: circumference(config.size, config.stroke_width),
        }
    }

    /// Name/value pairs in the order they are applied.
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--size", format!("{}px", self.size)),
            ("--color", self.color.clone()),
            ("--background-color", self.background_color.clone()),
            ("--font-size", self.font_size.to_string()),
            ("--circumference", self.circumference.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{with_size, with_stroke_width};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_radius_and_circumference() {
        assert_eq!(radius(200.0, 4.0), 96.0);
        assert_eq!(radius(300.0, 12.0), 138.0);

        let c = circumference(300.0, 12.0);
        assert!((c - 2.0 * PI * 138.0).abs() < EPS);
        assert!((c - 866.97).abs() < 0.01);
    }

    #[test]
    fn test_dashoffset_endpoints() {
        let g = Geometry::new(300.0, 12.0);
        assert!(g.dashoffset(20, 20).abs() < EPS);
        assert!((g.dashoffset(0, 20) - g.circumference).abs() < EPS);
        assert!((g.dashoffset(10, 20) - g.circumference / 2.0).abs() < EPS);
        assert_eq!(g.center(), 150.0);
    }

    #[test]
    fn test_progress_uses_given_duration() {
        assert_eq!(progress(15, 30), 0.5);
        assert_eq!(progress(30, 30), 1.0);
        assert_eq!(progress(0, 30), 0.0);
    }

    #[test]
    fn test_zero_duration_is_not_guarded() {
        assert!(progress(0, 0).is_nan());
        assert!(Geometry::new(200.0, 4.0).dashoffset(0, 0).is_nan());
    }

    #[test]
    fn test_style_params_variables() {
        let params = StyleParams::from_config(&Config::default());
        let vars = params.variables();
        assert_eq!(vars[0], ("--size", "200px".to_string()));
        assert_eq!(vars[1], ("--color", "#c39fe0".to_string()));
        assert_eq!(vars[2], ("--background-color", "#eee".to_string()));
        assert_eq!(vars[3], ("--font-size", "0.2".to_string()));
        assert_eq!(vars[4].0, "--circumference");
        let c: f64 = vars[4].1.parse().unwrap();
        assert!((c - 2.0 * PI * 96.0).abs() < EPS);
    }

    #[test]
    fn test_style_params_follow_config() {
        let config = Config::from_options(&[with_size(300.0), with_stroke_width(12.0)]);
        let params = StyleParams::from_config(&config);
        assert_eq!(params.size, 300.0);
        assert!((params.circumference - Geometry::from_config(&config).circumference).abs() < EPS);
    }
}
