use chrono::{Duration, NaiveDateTime};

use super::session::{InteractionSession, ProposalInputs};
use super::types::{Proposal, ResizeEdge};
use crate::models::event::EventInterval;
use crate::utils::date::days_between;

/// Move one edge of `interval` to `moved`, keeping at least `minimum`
/// between the edges. The opposite edge never moves.
pub fn clamp_to_minimum(
    interval: EventInterval,
    edge: ResizeEdge,
    moved: NaiveDateTime,
    minimum: Duration,
) -> EventInterval {
    match edge {
        ResizeEdge::Start => EventInterval::new(moved.min(interval.end - minimum), interval.end),
        ResizeEdge::End => EventInterval::new(interval.start, moved.max(interval.start + minimum)),
    }
}

/// Resize an all-day interval by whole days; it always keeps one day.
pub(super) fn resize_all_day(interval: EventInterval, edge: ResizeEdge, days: i64) -> EventInterval {
    let moved = edge.of(&interval) + Duration::days(days);
    clamp_to_minimum(interval, edge, moved, Duration::days(1))
}

impl InteractionSession {
    /// Candidate for dragging `edge` to the current pointer position.
    ///
    /// Timed edges follow the pointer's time and day, then snap; the
    /// minimum duration is enforced after snapping so a snap can never
    /// collapse the event. All-day edges move by whole day columns.
    pub(super) fn propose_resize(&self, edge: ResizeEdge, inputs: &ProposalInputs<'_>) -> Proposal {
        let event = &self.event;
        let day_delta = days_between(self.origin_day, self.target_day());

        let interval = if event.all_day {
            resize_all_day(event.interval(), edge, day_delta)
        } else {
            let range = &self.viewport.range;
            let time_delta =
                range.offset_to_time(self.pointer.y) - range.offset_to_time(self.origin.y);
            let proposed = edge.of(&event.interval()) + Duration::days(day_delta) + time_delta;
            let snapped = inputs.snap(proposed, &event.id);
            inputs.clamp_resize(event.interval(), edge, snapped)
        };

        Proposal::Resize { interval, edge }
    }
}
