//! Dashboard configuration
//!
//! Every section has defaults; a TOML file only needs to name what it changes.

use crate::error::ConfigError;
use cw_chart::{Palette, DEFAULT_UNIT_LABEL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Reveal animation
    pub animation: AnimationConfig,
    /// Chart layout and colors
    pub chart: ChartConfig,
    /// Unit shown under the total
    pub unit_label: String,
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With animation duration
    #[inline]
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.animation.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With easing curve
    #[inline]
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.animation.easing = easing;
        self
    }

    /// With slice palette
    #[inline]
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.chart.palette = palette;
        self
    }

    /// With unit label
    #[inline]
    #[must_use]
    pub fn with_unit_label(mut self, unit_label: impl Into<String>) -> Self {
        self.unit_label = unit_label.into();
        self
    }

    /// Parse configuration from TOML text and validate it
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` for malformed TOML and any error from
    /// [`DashboardConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file and validate it
    ///
    /// # Errors
    /// Returns `ConfigError::Io` when the file cannot be read, otherwise the
    /// errors of [`DashboardConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded dashboard config");
        Self::from_toml_str(&text)
    }

    /// Check constraints serde cannot express
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation.duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.animation.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        let chart = &self.chart;
        let radii_ok = chart.inner_radius >= 0.0
            && chart.inner_radius < chart.outer_radius
            && chart.outer_radius <= chart.selected_outer_radius;
        if !radii_ok {
            return Err(ConfigError::InvalidRadii {
                inner: chart.inner_radius,
                outer: chart.outer_radius,
                selected: chart.selected_outer_radius,
            });
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            animation: AnimationConfig::default(),
            chart: ChartConfig::default(),
            unit_label: DEFAULT_UNIT_LABEL.to_string(),
        }
    }
}

/// Reveal animation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Time from progress 0 to 1
    pub duration_ms: u64,
    /// Tick spacing of the frame scheduler
    pub frame_interval_ms: u64,
    /// Progress curve
    pub easing: Easing,
}

impl AnimationConfig {
    /// Duration as [`Duration`]
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Frame interval as [`Duration`]
    #[inline]
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            frame_interval_ms: 16,
            easing: Easing::EaseInOut,
        }
    }
}

/// Monotonic progress curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Cubic ease-in-out
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map a time fraction to progress; both in `[0, 1]`
    #[must_use]
    pub fn apply(self, fraction: f64) -> f64 {
        let t = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Donut layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Slice colors
    pub palette: Palette,
    /// Hole radius
    pub inner_radius: f64,
    /// Slice radius
    pub outer_radius: f64,
    /// Slice radius when selected
    pub selected_outer_radius: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            inner_radius: 60.0,
            outer_radius: 100.0,
            selected_outer_radius: 110.0,
        }
    }
}
