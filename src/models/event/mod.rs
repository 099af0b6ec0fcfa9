// Event module
// Calendar event model consumed by the timeline engine

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::utils::date::{day_after, start_of_day};

/// Opaque, unique event identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A half-open wall-clock interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whole-day interval covering `day` only.
    pub fn whole_day(day: NaiveDate) -> Self {
        Self::new(start_of_day(day), start_of_day(day_after(day)))
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when the two intervals share any instant. Touching edges do not overlap.
    pub fn overlaps(&self, other: &EventInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn shifted(&self, delta: Duration) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }

    /// Number of calendar days spanned by an all-day interval (at least one).
    pub fn whole_days(&self) -> i64 {
        let days = (self.end.date() - self.start.date()).num_days();
        if self.end.time() > chrono::NaiveTime::MIN {
            (days + 1).max(1)
        } else {
            days.max(1)
        }
    }
}

/// Calendar event as delivered by the event store.
///
/// Recurring series are expanded upstream, so every value here is a
/// concrete instance with its own `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub color: Option<String>,
}

impl CalendarEvent {
    /// Create a new timed event with required fields
    ///
    /// # Examples
    /// ```
    /// use timeline_engine::models::event::CalendarEvent;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let end = start + chrono::Duration::hours(1);
    /// let event = CalendarEvent::new("standup", "Team Standup", start, end).unwrap();
    /// assert!(!event.all_day);
    /// ```
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, String> {
        let event = Self {
            id: id.into(),
            title: title.into(),
            description: None,
            location: None,
            start,
            end,
            all_day: false,
            color: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create an all-day event spanning `first_day..=last_day`.
    pub fn all_day(
        id: impl Into<EventId>,
        title: impl Into<String>,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> Result<Self, String> {
        let event = Self {
            id: id.into(),
            title: title.into(),
            description: None,
            location: None,
            start: start_of_day(first_day),
            end: start_of_day(day_after(last_day)),
            all_day: true,
            color: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        // Zero-duration events are tolerated; the lane assigner normalizes them.
        if self.end < self.start {
            return Err("Event end time must not be before start time".to_string());
        }

        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }

    pub fn interval(&self) -> EventInterval {
        EventInterval::new(self.start, self.end)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when any part of the event falls on `day`.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        let day_start = start_of_day(day);
        let day_end = start_of_day(day_after(day));
        if self.start == self.end {
            return self.start >= day_start && self.start < day_end;
        }
        self.start < day_end && self.end > day_start
    }

    /// Copy with interval and type replaced, as written by a committed gesture.
    pub fn with_interval(&self, interval: EventInterval, all_day: bool) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            all_day,
            ..self.clone()
        }
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    id: Option<EventId>,
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    all_day: bool,
    color: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            title: None,
            description: None,
            location: None,
            start: None,
            end: None,
            all_day: false,
            color: None,
        }
    }

    pub fn id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Set the event color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn build(self) -> Result<CalendarEvent, String> {
        let id = self.id.ok_or("Event id is required")?;
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;

        let event = CalendarEvent {
            id,
            title,
            description: self.description,
            location: self.location,
            start,
            end,
            all_day: self.all_day,
            color: self.color,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write intent emitted by a committed gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMutation {
    pub event_id: EventId,
    pub interval: EventInterval,
    pub all_day: bool,
}
