//! Overlap detection and lane assignment for the timed events of one day.
//!
//! Events are swept in start order; each takes the lowest lane whose
//! occupant has already ended. Events connected by overlap form a cluster
//! and every member reports the cluster's lane count, so unrelated clusters
//! on the same day keep their own widths.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::models::event::{CalendarEvent, EventInterval};

/// Lane placement of one event inside its overlap cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaneAssignment {
    pub lane_index: usize,
    pub lane_count: usize,
}

/// An event annotated with its lane, borrowed for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LanedEvent<'a> {
    pub event: &'a CalendarEvent,
    /// Interval used for overlap tests (zero-length events are widened).
    pub interval: EventInterval,
    pub lane: LaneAssignment,
    /// Index of the overlap cluster within the day, in start order.
    pub cluster: usize,
}

/// Interval used for overlap: events shorter than zero or of zero length
/// occupy one slot so they still get a well-defined lane.
pub fn effective_interval(interval: EventInterval, granularity: Duration) -> EventInterval {
    if interval.end > interval.start {
        interval
    } else {
        EventInterval::new(interval.start, interval.start + granularity)
    }
}

/// Assign lanes to the timed events in `events`. All-day events are skipped.
///
/// The result is ordered by start time, longest first on ties, then by id.
pub fn assign_lanes<'a, I>(events: I, granularity: Duration) -> Vec<LanedEvent<'a>>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let items = events
        .into_iter()
        .filter(|event| !event.all_day)
        .map(|event| (event, event.interval()))
        .collect();
    assign_lanes_to_intervals(items, granularity)
}

/// Lane assignment over caller-supplied intervals (e.g. clipped to a day).
pub fn assign_lanes_to_intervals<'a>(
    items: Vec<(&'a CalendarEvent, EventInterval)>,
    granularity: Duration,
) -> Vec<LanedEvent<'a>> {
    let mut items: Vec<(&'a CalendarEvent, EventInterval)> = items
        .into_iter()
        .map(|(event, interval)| (event, effective_interval(interval, granularity)))
        .collect();
    items.sort_by(|(a, a_interval), (b, b_interval)| {
        a_interval
            .start
            .cmp(&b_interval.start)
            .then_with(|| b_interval.duration().cmp(&a_interval.duration()))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut laned: Vec<LanedEvent<'a>> = Vec::with_capacity(items.len());
    // lane index -> end of the event currently occupying it
    let mut active: Vec<Option<NaiveDateTime>> = Vec::new();
    let mut cluster = 0;
    let mut cluster_start = 0;
    let mut cluster_lanes = 0;

    for (event, interval) in items {
        for lane in active.iter_mut() {
            if matches!(lane, Some(end) if *end <= interval.start) {
                *lane = None;
            }
        }

        if !laned.is_empty() && active.iter().all(Option::is_none) {
            close_cluster(&mut laned[cluster_start..], cluster_lanes);
            cluster += 1;
            cluster_start = laned.len();
            cluster_lanes = 0;
            active.clear();
        }

        let lane_index = match active.iter().position(Option::is_none) {
            Some(free) => {
                active[free] = Some(interval.end);
                free
            }
            None => {
                active.push(Some(interval.end));
                active.len() - 1
            }
        };
        cluster_lanes = cluster_lanes.max(lane_index + 1);

        laned.push(LanedEvent {
            event,
            interval,
            lane: LaneAssignment {
                lane_index,
                lane_count: 0,
            },
            cluster,
        });
    }

    close_cluster(&mut laned[cluster_start..], cluster_lanes);
    log::trace!(
        "assigned lanes to {} events in {} clusters",
        laned.len(),
        if laned.is_empty() { 0 } else { cluster + 1 }
    );
    laned
}

fn close_cluster(members: &mut [LanedEvent<'_>], lane_count: usize) {
    for member in members {
        member.lane.lane_count = lane_count;
    }
}
