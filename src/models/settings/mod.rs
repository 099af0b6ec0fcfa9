// Settings module
// Read-only engine configuration, fixed before a gesture starts

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Misconfiguration detected while validating settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("hour {0} is outside 0..=24")]
    HourOutOfRange(u32),
    #[error("start hour {start} is after end hour {end}")]
    InvalidHourRange { start: u32, end: u32 },
    #[error("pixels per hour must be positive, got {0}")]
    NonPositivePixelsPerHour(f64),
    #[error("time slot granularity must be positive, got {0} minutes")]
    NonPositiveGranularity(i64),
    #[error("slot granularity of {0} minutes does not divide a day")]
    GranularityDoesNotDivideDay(i64),
    #[error("snap range must not be negative, got {0} minutes")]
    NegativeSnapRange(i64),
    #[error("minimum duration must be positive, got {0} minutes")]
    NonPositiveMinimumDuration(i64),
    #[error("all-day to timed conversion duration must be positive, got {0} minutes")]
    NonPositiveConversionDuration(i64),
    #[error("{name} must not be negative, got {value}")]
    NegativeValue { name: &'static str, value: f64 },
    #[error("{name} must be at most {max}, got {value}")]
    ValueTooLarge {
        name: &'static str,
        value: i64,
        max: i64,
    },
}

/// Upper bound for minute-valued settings (one week).
pub const MAX_MINUTES: i64 = 7 * 24 * 60;
/// Upper bound for delays (one hour).
pub const MAX_DELAY_MS: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRangeSettings {
    pub start_hour: u32,
    /// Exclusive; 24 shows the day through midnight.
    pub end_hour: u32,
    pub pixels_per_hour: f64,
    pub slot_minutes: i64,
}

impl Default for TimeRangeSettings {
    fn default() -> Self {
        Self {
            start_hour: 0,
            end_hour: 24,
            pixels_per_hour: 60.0,
            slot_minutes: 15,
        }
    }
}

/// Tolerance and enabled anchor categories for magnetic snapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    pub range_minutes: i64,
    pub slot_grid: bool,
    pub event_edges: bool,
    pub current_time: bool,
    pub region_edges: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            range_minutes: 5,
            slot_grid: true,
            event_edges: true,
            current_time: true,
            region_edges: false,
        }
    }
}

impl SnapSettings {
    pub fn range(&self) -> Duration {
        Duration::minutes(self.range_minutes)
    }

    /// Settings with every category switched off.
    pub fn disabled() -> Self {
        Self {
            range_minutes: 0,
            slot_grid: false,
            event_edges: false,
            current_time: false,
            region_edges: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub minimum_duration_minutes: i64,
    pub press_delay_ms: i64,
    pub edge_navigation_delay_ms: i64,
    pub all_day_conversion_minutes: i64,
    pub drag_threshold_px: f64,
    pub edge_margin_px: f64,
    pub cross_day_navigation: bool,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            minimum_duration_minutes: 15,
            press_delay_ms: 300,
            edge_navigation_delay_ms: 1200,
            all_day_conversion_minutes: 60,
            drag_threshold_px: 4.0,
            edge_margin_px: 24.0,
            cross_day_navigation: true,
        }
    }
}

impl InteractionSettings {
    pub fn minimum_duration(&self) -> Duration {
        Duration::minutes(self.minimum_duration_minutes)
    }

    pub fn press_delay(&self) -> Duration {
        Duration::milliseconds(self.press_delay_ms)
    }

    pub fn edge_navigation_delay(&self) -> Duration {
        Duration::milliseconds(self.edge_navigation_delay_ms)
    }

    pub fn all_day_conversion_duration(&self) -> Duration {
        Duration::minutes(self.all_day_conversion_minutes)
    }
}

/// Complete engine configuration, typically loaded from `timeline.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub time_range: TimeRangeSettings,
    pub snap: SnapSettings,
    pub interaction: InteractionSettings,
}

impl TimelineSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = &self.time_range;
        for hour in [range.start_hour, range.end_hour] {
            if hour > 24 {
                return Err(ConfigError::HourOutOfRange(hour));
            }
        }
        if range.start_hour > range.end_hour {
            return Err(ConfigError::InvalidHourRange {
                start: range.start_hour,
                end: range.end_hour,
            });
        }
        if !(range.pixels_per_hour > 0.0) {
            return Err(ConfigError::NonPositivePixelsPerHour(range.pixels_per_hour));
        }
        if range.slot_minutes <= 0 {
            return Err(ConfigError::NonPositiveGranularity(range.slot_minutes));
        }
        if (24 * 60) % range.slot_minutes != 0 {
            return Err(ConfigError::GranularityDoesNotDivideDay(range.slot_minutes));
        }

        if self.snap.range_minutes < 0 {
            return Err(ConfigError::NegativeSnapRange(self.snap.range_minutes));
        }

        let interaction = &self.interaction;
        if interaction.minimum_duration_minutes <= 0 {
            return Err(ConfigError::NonPositiveMinimumDuration(
                interaction.minimum_duration_minutes,
            ));
        }
        if interaction.all_day_conversion_minutes <= 0 {
            return Err(ConfigError::NonPositiveConversionDuration(
                interaction.all_day_conversion_minutes,
            ));
        }
        let bounded = [
            ("snap.range_minutes", self.snap.range_minutes, MAX_MINUTES),
            (
                "interaction.minimum_duration_minutes",
                interaction.minimum_duration_minutes,
                MAX_MINUTES,
            ),
            (
                "interaction.all_day_conversion_minutes",
                interaction.all_day_conversion_minutes,
                MAX_MINUTES,
            ),
            ("interaction.press_delay_ms", interaction.press_delay_ms, MAX_DELAY_MS),
            (
                "interaction.edge_navigation_delay_ms",
                interaction.edge_navigation_delay_ms,
                MAX_DELAY_MS,
            ),
        ];
        for (name, value, max) in bounded {
            if value > max {
                return Err(ConfigError::ValueTooLarge { name, value, max });
            }
        }

        let non_negative = [
            ("press_delay_ms", interaction.press_delay_ms as f64),
            ("edge_navigation_delay_ms", interaction.edge_navigation_delay_ms as f64),
            ("drag_threshold_px", interaction.drag_threshold_px),
            ("edge_margin_px", interaction.edge_margin_px),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = TimelineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.snap.range(), Duration::minutes(5));
        assert_eq!(settings.interaction.edge_navigation_delay(), Duration::milliseconds(1200));
    }

    #[test]
    fn test_inverted_hour_range_is_rejected() {
        let mut settings = TimelineSettings::default();
        settings.time_range.start_hour = 18;
        settings.time_range.end_hour = 8;

        assert_eq!(
            settings.validate(),
            Err(ConfigError::InvalidHourRange { start: 18, end: 8 })
        );
    }

    #[test]
    fn test_zero_granularity_is_rejected() {
        let mut settings = TimelineSettings::default();
        settings.time_range.slot_minutes = 0;
        assert_eq!(settings.validate(), Err(ConfigError::NonPositiveGranularity(0)));
    }

    #[test]
    fn test_granularity_must_divide_day() {
        let mut settings = TimelineSettings::default();
        settings.time_range.slot_minutes = 7;
        assert_eq!(
            settings.validate(),
            Err(ConfigError::GranularityDoesNotDivideDay(7))
        );
    }

    #[test]
    fn test_negative_margin_is_rejected() {
        let mut settings = TimelineSettings::default();
        settings.interaction.edge_margin_px = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NegativeValue { name: "edge_margin_px", .. })
        ));
    }

    #[test_case("[snap]\nrange_minutes = 9223372036854775807", "snap.range_minutes" ; "snap range at i64 max")]
    #[test_case("[interaction]\nminimum_duration_minutes = 9223372036854775807", "interaction.minimum_duration_minutes" ; "minimum duration at i64 max")]
    #[test_case("[interaction]\nminimum_duration_minutes = 100000000000000", "interaction.minimum_duration_minutes" ; "minimum duration overflowing date arithmetic")]
    #[test_case("[interaction]\nall_day_conversion_minutes = 10081", "interaction.all_day_conversion_minutes" ; "conversion just over a week")]
    #[test_case("[interaction]\nedge_navigation_delay_ms = 9223372036854775807", "interaction.edge_navigation_delay_ms" ; "dwell at i64 max")]
    fn test_oversized_values_are_rejected(toml_text: &str, field: &str) {
        let settings: TimelineSettings = toml::from_str(toml_text).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValueTooLarge { name, .. }) if name == field
        ));
    }

    #[test]
    fn test_upper_bounds_are_inclusive() {
        let mut settings = TimelineSettings::default();
        settings.snap.range_minutes = MAX_MINUTES;
        settings.interaction.minimum_duration_minutes = MAX_MINUTES;
        settings.interaction.press_delay_ms = MAX_DELAY_MS;
        assert!(settings.validate().is_ok());
        assert_eq!(settings.interaction.minimum_duration(), Duration::weeks(1));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: TimelineSettings = toml::from_str(
            r#"
            [time_range]
            start_hour = 7
            end_hour = 19

            [snap]
            current_time = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.time_range.start_hour, 7);
        assert_eq!(settings.time_range.slot_minutes, 15);
        assert!(!settings.snap.current_time);
        assert!(settings.snap.slot_grid);
        assert_eq!(settings.interaction, InteractionSettings::default());
    }
}
