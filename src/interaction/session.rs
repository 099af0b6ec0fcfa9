//! Per-gesture state and the shared commit path.

use chrono::{NaiveDate, NaiveDateTime};

use crate::interaction::scheduler::TimerHandle;
use crate::interaction::types::{
    CancelReason, Candidate, CommittedChange, GestureEnd, GestureKind, NavigationDirection,
    PointerPosition, Proposal, ResizeEdge, TypeConversion, ViewportGeometry,
};
use crate::models::event::{CalendarEvent, EventId, EventInterval, EventMutation};
use crate::models::settings::InteractionSettings;
use crate::models::time_region::TimeRegion;
use crate::services::event::EventStore;
use crate::timeline::{SnapContext, SnapResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct EdgeTimer {
    pub(super) handle: TimerHandle,
    pub(super) direction: NavigationDirection,
}

/// State of one pointer gesture from the moment it starts dragging.
///
/// The event snapshot taken at start is the baseline for the commit-time
/// race check and is what cancellation reverts the preview to.
#[derive(Debug, Clone)]
pub struct InteractionSession {
    pub(super) event: CalendarEvent,
    pub(super) kind: GestureKind,
    pub(super) viewport: ViewportGeometry,
    pub(super) origin: PointerPosition,
    pub(super) origin_day: NaiveDate,
    pub(super) pointer: PointerPosition,
    pub(super) candidate: Candidate,
    pub(super) last_accepted: Option<Proposal>,
    pub(super) edge_timer: Option<EdgeTimer>,
}

impl InteractionSession {
    pub(super) fn new(
        event: CalendarEvent,
        kind: GestureKind,
        viewport: ViewportGeometry,
        origin: PointerPosition,
    ) -> Self {
        let proposal = unchanged_proposal(&event, kind);
        Self {
            origin_day: viewport.day_at(origin.x),
            event,
            kind,
            viewport,
            origin,
            pointer: origin,
            candidate: Candidate {
                proposal,
                accepted: true,
            },
            last_accepted: None,
            edge_timer: None,
        }
    }

    pub fn event(&self) -> &CalendarEvent {
        &self.event
    }

    pub fn event_id(&self) -> &EventId {
        &self.event.id
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn original_interval(&self) -> EventInterval {
        self.event.interval()
    }

    pub fn origin_day(&self) -> NaiveDate {
        self.origin_day
    }

    /// Original start of the event being dragged.
    pub fn origin_time(&self) -> NaiveDateTime {
        self.event.start
    }

    /// Day column currently under the pointer.
    pub fn target_day(&self) -> NaiveDate {
        self.viewport.day_at(self.pointer.x)
    }

    pub fn first_visible_day(&self) -> NaiveDate {
        self.viewport.first_day
    }

    pub fn viewport(&self) -> &ViewportGeometry {
        &self.viewport
    }

    pub fn pointer(&self) -> PointerPosition {
        self.pointer
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn proposed_interval(&self) -> EventInterval {
        self.candidate.proposal.interval()
    }

    /// Most recent proposal the validator accepted during this gesture.
    pub fn last_accepted(&self) -> Option<&Proposal> {
        self.last_accepted.as_ref()
    }

    pub fn pending_conversion(&self) -> TypeConversion {
        self.candidate.proposal.conversion()
    }

    pub fn edge_navigation_pending(&self) -> Option<NavigationDirection> {
        self.edge_timer.map(|timer| timer.direction)
    }

    pub(super) fn edge_timer_handle(&self) -> Option<TimerHandle> {
        self.edge_timer.map(|timer| timer.handle)
    }

    pub(super) fn record(&mut self, candidate: Candidate) {
        if candidate.accepted {
            self.last_accepted = Some(candidate.proposal);
        }
        self.candidate = candidate;
    }
}

/// Proposal that leaves the event where it is.
pub(super) fn unchanged_proposal(event: &CalendarEvent, kind: GestureKind) -> Proposal {
    match kind {
        GestureKind::Move => Proposal::Move {
            interval: event.interval(),
            all_day: event.all_day,
            conversion: TypeConversion::None,
        },
        GestureKind::Resize(edge) => Proposal::Resize {
            interval: event.interval(),
            edge,
        },
    }
}

/// Read-only inputs for computing a candidate.
pub(super) struct ProposalInputs<'a> {
    pub(super) settings: &'a InteractionSettings,
    pub(super) snap: &'a SnapResolver,
    pub(super) store: &'a dyn EventStore,
    pub(super) regions: &'a [TimeRegion],
    pub(super) now: NaiveDateTime,
}

impl ProposalInputs<'_> {
    /// Snap `proposed` against the day it falls on, ignoring the dragged event.
    pub(super) fn snap(&self, proposed: NaiveDateTime, exclude: &EventId) -> NaiveDateTime {
        let events = self.store.events_for_day(proposed.date());
        let context = SnapContext {
            events: &events,
            exclude: Some(exclude),
            regions: self.regions,
            now: Some(self.now),
        };
        let result = self.snap.snap(proposed, &context);
        if let Some(category) = result.anchor {
            log::trace!("snapped {} to {} ({:?})", proposed, result.time, category);
        }
        result.time
    }

    pub(super) fn clamp_resize(
        &self,
        interval: EventInterval,
        edge: ResizeEdge,
        moved: NaiveDateTime,
    ) -> EventInterval {
        crate::interaction::resize::clamp_to_minimum(
            interval,
            edge,
            moved,
            self.settings.minimum_duration(),
        )
    }
}

/// End a gesture: commit the candidate if it was accepted.
pub(super) fn finish_gesture(
    store: &mut (dyn EventStore + '_),
    baseline: &CalendarEvent,
    candidate: &Candidate,
) -> GestureEnd {
    if !candidate.accepted {
        log::info!("gesture on {} ended on a rejected placement", baseline.id);
        return GestureEnd::Cancelled(CancelReason::Rejected);
    }
    commit(store, baseline, &candidate.proposal)
}

/// Apply `proposal` if the stored event still matches `baseline`.
fn commit(
    store: &mut (dyn EventStore + '_),
    baseline: &CalendarEvent,
    proposal: &Proposal,
) -> GestureEnd {
    let before = EventMutation {
        event_id: baseline.id.clone(),
        interval: baseline.interval(),
        all_day: baseline.all_day,
    };
    let after = EventMutation {
        event_id: baseline.id.clone(),
        interval: proposal.interval(),
        all_day: proposal.all_day(baseline.all_day),
    };

    if before == after {
        log::debug!("gesture on {} left it unchanged", baseline.id);
        return GestureEnd::Cancelled(CancelReason::NoChange);
    }

    match store.event(&baseline.id) {
        None => {
            log::warn!("event {} disappeared during the gesture", baseline.id);
            return GestureEnd::Cancelled(CancelReason::EventMissing);
        }
        Some(current) if current != *baseline => {
            log::warn!("event {} changed during the gesture, discarding", baseline.id);
            return GestureEnd::Cancelled(CancelReason::ConcurrentEdit);
        }
        Some(_) => {}
    }

    match store.apply_mutation(&after) {
        Ok(()) => {
            log::info!(
                "committed {}: {} - {} (all_day: {})",
                baseline.id,
                after.interval.start,
                after.interval.end,
                after.all_day
            );
            GestureEnd::Committed(CommittedChange {
                event_id: baseline.id.clone(),
                before,
                after,
            })
        }
        Err(err) => {
            log::warn!("store rejected change to {}: {}", baseline.id, err);
            GestureEnd::Cancelled(CancelReason::StoreRejected(err.to_string()))
        }
    }
}
