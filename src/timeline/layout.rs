//! Day layout: lane-annotated events mapped to pixel geometry.
//!
//! This is the hand-off point to the renderer. Timed events are clipped to
//! the day, placed in lanes and positioned on the time axis; all-day events
//! are returned separately for the banner row.

use chrono::NaiveDate;
use serde::Serialize;

use super::lanes::{assign_lanes_to_intervals, LaneAssignment};
use super::time_axis::VisibleTimeRange;
use crate::models::event::{CalendarEvent, EventId, EventInterval};
use crate::utils::date::{day_after, start_of_day};

/// Where a timed event tile goes inside its day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventGeometry {
    pub event_id: EventId,
    pub top: f64,
    pub height: f64,
    pub lane: LaneAssignment,
    /// Horizontal position and width as fractions of the column width.
    pub left_fraction: f64,
    pub width_fraction: f64,
    /// False when the event lies entirely outside the visible hours.
    pub visible: bool,
    /// The event continues from the previous day / into the next day.
    pub continues_before: bool,
    pub continues_after: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEvent<'a> {
    pub event: &'a CalendarEvent,
    pub geometry: EventGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayLayout<'a> {
    pub day: NaiveDate,
    pub timed: Vec<PlacedEvent<'a>>,
    pub all_day: Vec<&'a CalendarEvent>,
}

impl<'a> DayLayout<'a> {
    pub fn geometry_for(&self, id: &EventId) -> Option<&EventGeometry> {
        self.timed
            .iter()
            .map(|placed| &placed.geometry)
            .find(|geometry| &geometry.event_id == id)
    }
}

/// Lay out the events of `day`. Events not occurring on the day are ignored.
pub fn layout_day<'a>(
    events: &'a [CalendarEvent],
    day: NaiveDate,
    range: &VisibleTimeRange,
) -> DayLayout<'a> {
    let day_start = start_of_day(day);
    let day_end = start_of_day(day_after(day));

    let mut all_day = Vec::new();
    let mut timed = Vec::new();
    for event in events.iter().filter(|event| event.occurs_on(day)) {
        if event.all_day {
            all_day.push(event);
            continue;
        }
        let clipped = EventInterval::new(event.start.max(day_start), event.end.min(day_end));
        timed.push((event, clipped));
    }

    let placed = assign_lanes_to_intervals(timed, range.slot())
        .into_iter()
        .map(|laned| {
            let interval = laned.interval;
            let top = range.datetime_to_offset(day, interval.start);
            let bottom = range.datetime_to_offset(day, interval.end);
            let lane = laned.lane;
            let width_fraction = 1.0 / lane.lane_count.max(1) as f64;
            let visible = interval.end > day_start + range.visible_start()
                && interval.start < day_start + range.visible_end();

            PlacedEvent {
                event: laned.event,
                geometry: EventGeometry {
                    event_id: laned.event.id.clone(),
                    top,
                    height: bottom - top,
                    lane,
                    left_fraction: lane.lane_index as f64 * width_fraction,
                    width_fraction,
                    visible,
                    continues_before: laned.event.start < day_start,
                    continues_after: laned.event.end > day_end,
                },
            }
        })
        .collect();

    DayLayout {
        day,
        timed: placed,
        all_day,
    }
}
