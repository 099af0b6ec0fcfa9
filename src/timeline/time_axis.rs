//! Time-axis mapping between wall-clock time of day and vertical pixel offsets.
//!
//! Offsets are measured from the top of the visible hour range. Times and
//! offsets outside the range clamp to its edges instead of erroring, and
//! `offset_to_time` returns raw (unsnapped) times rounded to the second.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::settings::{ConfigError, TimeRangeSettings, TimelineSettings};
use crate::utils::date::{start_of_day, time_since_day_start};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Visible hour window and its pixel scale for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTimeRange {
    start_hour: u32,
    end_hour: u32,
    pixels_per_hour: f64,
    slot: Duration,
}

impl VisibleTimeRange {
    pub fn new(
        start_hour: u32,
        end_hour: u32,
        pixels_per_hour: f64,
        slot_minutes: i64,
    ) -> Result<Self, ConfigError> {
        Self::from_settings(&TimeRangeSettings {
            start_hour,
            end_hour,
            pixels_per_hour,
            slot_minutes,
        })
    }

    pub fn from_settings(settings: &TimeRangeSettings) -> Result<Self, ConfigError> {
        TimelineSettings {
            time_range: settings.clone(),
            ..TimelineSettings::default()
        }
        .validate()?;

        Ok(Self {
            start_hour: settings.start_hour,
            end_hour: settings.end_hour,
            pixels_per_hour: settings.pixels_per_hour,
            slot: Duration::minutes(settings.slot_minutes),
        })
    }

    /// Same range with a new pixel scale, e.g. after the viewport was zoomed.
    pub fn with_pixels_per_hour(self, pixels_per_hour: f64) -> Result<Self, ConfigError> {
        if !(pixels_per_hour > 0.0) {
            return Err(ConfigError::NonPositivePixelsPerHour(pixels_per_hour));
        }
        Ok(Self {
            pixels_per_hour,
            ..self
        })
    }

    /// Auto-computes the pixel scale so the whole range fills `height`.
    pub fn fit_to_height(self, height: f64) -> Result<Self, ConfigError> {
        let hours = self.visible_hours();
        if hours == 0 {
            return Ok(self);
        }
        self.with_pixels_per_hour(height / f64::from(hours))
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn pixels_per_hour(&self) -> f64 {
        self.pixels_per_hour
    }

    /// Smallest snappable unit.
    pub fn slot(&self) -> Duration {
        self.slot
    }

    pub fn visible_hours(&self) -> u32 {
        self.end_hour - self.start_hour
    }

    /// First visible instant, as time since midnight.
    pub fn visible_start(&self) -> Duration {
        Duration::hours(i64::from(self.start_hour))
    }

    /// End of the visible window, as time since midnight.
    pub fn visible_end(&self) -> Duration {
        Duration::hours(i64::from(self.end_hour))
    }

    pub fn total_height(&self) -> f64 {
        f64::from(self.visible_hours()) * self.pixels_per_hour
    }

    pub fn contains(&self, time_of_day: Duration) -> bool {
        time_of_day >= self.visible_start() && time_of_day <= self.visible_end()
    }

    /// Pixel offset of a time of day (given as time since midnight).
    pub fn time_to_offset(&self, time_of_day: Duration) -> f64 {
        let clamped = time_of_day.clamp(self.visible_start(), self.visible_end());
        let seconds = (clamped - self.visible_start()).num_seconds() as f64;
        seconds / SECONDS_PER_HOUR * self.pixels_per_hour
    }

    /// Time since midnight at a pixel offset, rounded to the nearest second.
    pub fn offset_to_time(&self, offset: f64) -> Duration {
        let offset = if offset.is_nan() {
            0.0
        } else {
            offset.clamp(0.0, self.total_height())
        };
        let seconds = (offset / self.pixels_per_hour * SECONDS_PER_HOUR).round() as i64;
        (self.visible_start() + Duration::seconds(seconds)).min(self.visible_end())
    }

    pub fn duration_to_height(&self, duration: Duration) -> f64 {
        duration.num_seconds() as f64 / SECONDS_PER_HOUR * self.pixels_per_hour
    }

    /// Offset of `moment` in the column for `day`; moments on other days clamp.
    pub fn datetime_to_offset(&self, day: NaiveDate, moment: NaiveDateTime) -> f64 {
        self.time_to_offset(time_since_day_start(day, moment))
    }

    pub fn offset_to_datetime(&self, day: NaiveDate, offset: f64) -> NaiveDateTime {
        start_of_day(day) + self.offset_to_time(offset)
    }

    /// Slot boundaries inside the window, top to bottom (end excluded).
    pub fn slot_times(&self) -> Vec<Duration> {
        let mut slots = Vec::new();
        let mut time = self.visible_start();
        while time < self.visible_end() {
            slots.push(time);
            time += self.slot;
        }
        slots
    }
}

impl Default for VisibleTimeRange {
    fn default() -> Self {
        let settings = TimeRangeSettings::default();
        Self {
            start_hour: settings.start_hour,
            end_hour: settings.end_hour,
            pixels_per_hour: settings.pixels_per_hour,
            slot: Duration::minutes(settings.slot_minutes),
        }
    }
}
