// Time region module
// Highlighted or blocked stretches of the timeline (lunch, off-hours, ...)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::event::EventInterval;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRegion {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Drops and resizes touching a blocking region are rejected.
    #[serde(default)]
    pub block_interaction: bool,
    /// RRULE string, already expanded upstream into concrete regions.
    #[serde(default)]
    pub recurrence_rule: Option<String>,
}

impl TimeRegion {
    pub fn new(id: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            block_interaction: false,
            recurrence_rule: None,
        }
    }

    pub fn blocking(mut self) -> Self {
        self.block_interaction = true;
        self
    }

    pub fn interval(&self) -> EventInterval {
        EventInterval::new(self.start, self.end)
    }

    pub fn blocks(&self, interval: &EventInterval) -> bool {
        self.block_interaction && self.interval().overlaps(interval)
    }
}
