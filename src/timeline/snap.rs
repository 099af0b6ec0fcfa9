//! Magnetic snapping of proposed times to nearby anchors.
//!
//! Anchors come from the slot grid, the edges of other events on the target
//! day, the current time and, optionally, time-region edges. The nearest
//! anchor within its category's tolerance wins; equidistant anchors resolve
//! by category priority (declaration order of [`SnapCategory`]) and then
//! to the earlier time.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::models::event::{CalendarEvent, EventId};
use crate::models::settings::SnapSettings;
use crate::models::time_region::TimeRegion;
use crate::utils::date::start_of_day;

/// Anchor source, ordered from most to least preferred on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SnapCategory {
    SlotGrid,
    EventEdge,
    CurrentTime,
    RegionEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapAnchor {
    pub time: NaiveDateTime,
    pub category: SnapCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapResult {
    pub time: NaiveDateTime,
    /// Category of the anchor that captured the time, `None` when unsnapped.
    pub anchor: Option<SnapCategory>,
}

impl SnapResult {
    pub fn is_snapped(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Per-call inputs besides the proposed time.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    /// Events on the target day; `exclude` is skipped.
    pub events: &'a [CalendarEvent],
    pub exclude: Option<&'a EventId>,
    pub regions: &'a [TimeRegion],
    pub now: Option<NaiveDateTime>,
}

impl<'a> SnapContext<'a> {
    pub fn empty() -> Self {
        Self {
            events: &[],
            exclude: None,
            regions: &[],
            now: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapResolver {
    settings: SnapSettings,
    granularity: Duration,
}

impl SnapResolver {
    pub fn new(settings: SnapSettings, granularity: Duration) -> Self {
        Self {
            settings,
            granularity,
        }
    }

    pub fn settings(&self) -> &SnapSettings {
        &self.settings
    }

    pub fn granularity(&self) -> Duration {
        self.granularity
    }

    /// Capture distance for a category. Grid anchors always reach at least
    /// half a slot, so an enabled grid quantizes to the nearest boundary.
    pub fn tolerance(&self, category: SnapCategory) -> Duration {
        let range = self.settings.range();
        match category {
            SnapCategory::SlotGrid => range.max(self.granularity / 2),
            _ => range,
        }
    }

    /// Enabled anchors around `proposed`. Grid anchors are limited to the two
    /// boundaries enclosing it.
    pub fn candidates(&self, proposed: NaiveDateTime, context: &SnapContext<'_>) -> Vec<SnapAnchor> {
        let mut anchors = Vec::new();

        if self.settings.slot_grid && self.granularity > Duration::zero() {
            let day_start = start_of_day(proposed.date());
            let elapsed = (proposed - day_start).num_seconds();
            let step = self.granularity.num_seconds().max(1);
            let floor = day_start + Duration::seconds(elapsed - elapsed.rem_euclid(step));
            for time in [floor, floor + Duration::seconds(step)] {
                anchors.push(SnapAnchor {
                    time,
                    category: SnapCategory::SlotGrid,
                });
            }
        }

        if self.settings.event_edges {
            for event in context.events {
                if context.exclude == Some(&event.id) || event.all_day {
                    continue;
                }
                for time in [event.start, event.end] {
                    anchors.push(SnapAnchor {
                        time,
                        category: SnapCategory::EventEdge,
                    });
                }
            }
        }

        if self.settings.current_time {
            if let Some(now) = context.now {
                anchors.push(SnapAnchor {
                    time: now,
                    category: SnapCategory::CurrentTime,
                });
            }
        }

        if self.settings.region_edges {
            for region in context.regions {
                for time in [region.start, region.end] {
                    anchors.push(SnapAnchor {
                        time,
                        category: SnapCategory::RegionEdge,
                    });
                }
            }
        }

        anchors
    }

    /// Snap `proposed` to the best anchor, or return it unchanged.
    pub fn snap(&self, proposed: NaiveDateTime, context: &SnapContext<'_>) -> SnapResult {
        let best = self
            .candidates(proposed, context)
            .into_iter()
            .filter_map(|anchor| {
                let distance = (anchor.time - proposed).abs();
                (distance <= self.tolerance(anchor.category))
                    .then_some((distance, anchor.category, anchor.time))
            })
            .min();

        match best {
            Some((_, category, time)) => SnapResult {
                time,
                anchor: Some(category),
            },
            None => SnapResult {
                time: proposed,
                anchor: None,
            },
        }
    }
}
