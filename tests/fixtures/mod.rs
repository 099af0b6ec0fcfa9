// Test fixtures - reusable test data
// Provides consistent events and viewports across the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use timeline_engine::interaction::ViewportGeometry;
use timeline_engine::models::event::CalendarEvent;
use timeline_engine::models::settings::TimelineSettings;
use timeline_engine::timeline::VisibleTimeRange;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday March 10, 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    pub fn at(d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, minute, 0).unwrap()
    }
}

/// Sample events for testing
pub mod events {
    use super::dates::at;
    use super::*;

    pub fn timed(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> CalendarEvent {
        CalendarEvent::new(id, id.to_uppercase(), start, end).unwrap()
    }

    /// 09:00-10:00 on Monday
    pub fn standup() -> CalendarEvent {
        timed("standup", at(10, 9, 0), at(10, 10, 0))
    }

    /// Three overlapping morning events plus one that fits after them
    pub fn busy_morning() -> Vec<CalendarEvent> {
        vec![
            timed("a", at(10, 9, 0), at(10, 10, 0)),
            timed("b", at(10, 9, 30), at(10, 10, 30)),
            timed("c", at(10, 10, 0), at(10, 11, 0)),
            timed("d", at(10, 11, 0), at(10, 11, 30)),
        ]
    }
}

/// Default settings with the press delay disabled, so a press arms at once
pub fn instant_settings() -> TimelineSettings {
    let mut settings = TimelineSettings::default();
    settings.interaction.press_delay_ms = 0;
    settings
}

/// Single-day view: 600px wide, 0-24h at 60px per hour
pub fn day_view(day: NaiveDate) -> ViewportGeometry {
    ViewportGeometry::single_day(day, 600.0, VisibleTimeRange::default())
}

/// Seven-day view starting at `first_day`: 100px per column, 0-24h at 60px per hour
pub fn week_view(first_day: NaiveDate) -> ViewportGeometry {
    ViewportGeometry {
        first_day,
        day_count: 7,
        width: 700.0,
        range: VisibleTimeRange::default(),
    }
}

/// Axis offset of `hour:minute` in [`day_view`] and [`week_view`]
pub fn y(hour: u32, minute: u32) -> f64 {
    f64::from(hour * 60 + minute)
}
