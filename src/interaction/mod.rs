//! Pointer and keyboard interaction state machine.
//!
//! The controller is driven entirely by the host: pointer and key input,
//! timer expiry and cancellation are fed in one call at a time, each
//! returning an [`InteractionOutcome`] the host renders. Store access,
//! validation and timers come in through [`InteractionHost`] so the state
//! machine stays free of any UI toolkit.

mod drag;
mod keyboard;
mod resize;
pub mod scheduler;
mod session;
pub mod types;
pub mod validation;

use std::mem;

use chrono::{Duration, NaiveDateTime};

use crate::models::event::{CalendarEvent, EventId};
use crate::models::settings::{ConfigError, TimelineSettings};
use crate::models::time_region::TimeRegion;
use crate::services::event::EventStore;
use crate::timeline::SnapResolver;

pub use keyboard::{KeyCommand, KeyboardMode, KeyboardSession};
pub use resize::clamp_to_minimum;
pub use scheduler::{ManualScheduler, TimerHandle, TimerScheduler};
pub use session::InteractionSession;
pub use types::{
    CancelReason, Candidate, CommittedChange, GestureEnd, GestureKind, InteractionOutcome,
    InteractionPhase, NavigationDirection, PointerPosition, PointerRegion, Proposal, ResizeEdge,
    TypeConversion, ViewportGeometry,
};
pub use validation::{AcceptAll, AllOf, ProposalValidator, TimeRegionValidator};

use session::{finish_gesture, ProposalInputs};

/// Capabilities the host lends to the controller for one call.
pub struct InteractionHost<'a> {
    pub store: &'a mut dyn EventStore,
    pub validator: &'a dyn ProposalValidator,
    pub scheduler: &'a mut dyn TimerScheduler,
    /// Regions offered as snap targets.
    pub regions: &'a [TimeRegion],
    pub now: NaiveDateTime,
}

impl<'a> InteractionHost<'a> {
    pub fn new(
        store: &'a mut dyn EventStore,
        validator: &'a dyn ProposalValidator,
        scheduler: &'a mut dyn TimerScheduler,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            store,
            validator,
            scheduler,
            regions: &[],
            now,
        }
    }

    pub fn with_regions(mut self, regions: &'a [TimeRegion]) -> Self {
        self.regions = regions;
        self
    }
}

#[derive(Debug, Clone)]
struct PendingPress {
    event: CalendarEvent,
    kind: GestureKind,
    viewport: ViewportGeometry,
    origin: PointerPosition,
    timer: Option<TimerHandle>,
}

#[derive(Debug, Default)]
enum ControllerState {
    #[default]
    Idle,
    Pressed(PendingPress),
    Armed(PendingPress),
    Dragging(InteractionSession),
    Keyboard(KeyboardSession),
}

/// Drives move and resize gestures for one timeline view.
///
/// At most one gesture is active; input for a second one is ignored until
/// the first ends.
#[derive(Debug)]
pub struct InteractionController {
    settings: TimelineSettings,
    snap: SnapResolver,
    state: ControllerState,
}

impl InteractionController {
    pub fn new(settings: TimelineSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let granularity = Duration::minutes(settings.time_range.slot_minutes);
        let snap = SnapResolver::new(settings.snap.clone(), granularity);
        Ok(Self {
            settings,
            snap,
            state: ControllerState::Idle,
        })
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub fn snap_resolver(&self) -> &SnapResolver {
        &self.snap
    }

    pub fn phase(&self) -> InteractionPhase {
        match &self.state {
            ControllerState::Idle => InteractionPhase::Idle,
            ControllerState::Pressed(_) => InteractionPhase::Pressed,
            ControllerState::Armed(_) => InteractionPhase::Armed,
            ControllerState::Dragging(_) => InteractionPhase::Dragging,
            ControllerState::Keyboard(session) => match session.mode() {
                KeyboardMode::Move => InteractionPhase::KeyboardMove,
                KeyboardMode::Resize(_) => InteractionPhase::KeyboardResize,
            },
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ControllerState::Idle)
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        match &self.state {
            ControllerState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn keyboard_session(&self) -> Option<&KeyboardSession> {
        match &self.state {
            ControllerState::Keyboard(session) => Some(session),
            _ => None,
        }
    }

    /// Pointer pressed on an event body (move) or one of its edges (resize).
    pub fn pointer_down(
        &mut self,
        host: &mut InteractionHost<'_>,
        event_id: &EventId,
        kind: GestureKind,
        viewport: ViewportGeometry,
        position: PointerPosition,
    ) -> InteractionOutcome {
        if !self.is_idle() {
            log::debug!("pointer down on {} ignored, gesture already active", event_id);
            return InteractionOutcome::Ignored;
        }
        let Some(event) = host.store.event(event_id) else {
            log::warn!("pointer down on unknown event {}", event_id);
            return InteractionOutcome::Ignored;
        };

        let mut press = PendingPress {
            event,
            kind,
            viewport,
            origin: position,
            timer: None,
        };
        let delay = self.settings.interaction.press_delay();
        if delay <= Duration::zero() {
            log::debug!("armed {:?} on {}", kind, event_id);
            self.state = ControllerState::Armed(press);
            return InteractionOutcome::Armed;
        }

        press.timer = Some(host.scheduler.schedule(delay));
        log::debug!("press on {}, waiting {}ms", event_id, delay.num_milliseconds());
        self.state = ControllerState::Pressed(press);
        InteractionOutcome::Pressed
    }

    /// A timer scheduled through the host's scheduler expired.
    pub fn timer_fired(
        &mut self,
        host: &mut InteractionHost<'_>,
        handle: TimerHandle,
    ) -> InteractionOutcome {
        let press_timer = matches!(
            &self.state,
            ControllerState::Pressed(press) if press.timer == Some(handle)
        );
        let edge_timer = matches!(
            &self.state,
            ControllerState::Dragging(session) if session.edge_timer_handle() == Some(handle)
        );

        if edge_timer {
            return self.navigate(host);
        }
        if !press_timer {
            log::trace!("stale timer {:?} ignored", handle);
            return InteractionOutcome::Ignored;
        }
        if let ControllerState::Pressed(mut press) = mem::take(&mut self.state) {
            press.timer = None;
            log::debug!("armed {:?} on {}", press.kind, press.event.id);
            self.state = ControllerState::Armed(press);
        }
        InteractionOutcome::Armed
    }

    pub fn pointer_moved(
        &mut self,
        host: &mut InteractionHost<'_>,
        position: PointerPosition,
    ) -> InteractionOutcome {
        let threshold = self.settings.interaction.drag_threshold_px;
        match mem::take(&mut self.state) {
            ControllerState::Pressed(press) => {
                if press.origin.distance_to(&position) > threshold {
                    if let Some(timer) = press.timer {
                        host.scheduler.cancel(timer);
                    }
                    log::debug!("pointer left {} before the press delay", press.event.id);
                    InteractionOutcome::Ended(GestureEnd::Cancelled(CancelReason::NotStarted))
                } else {
                    self.state = ControllerState::Pressed(press);
                    InteractionOutcome::Ignored
                }
            }
            ControllerState::Armed(press) => {
                if press.origin.distance_to(&position) <= threshold {
                    self.state = ControllerState::Armed(press);
                    return InteractionOutcome::Ignored;
                }
                log::debug!("dragging {:?} on {}", press.kind, press.event.id);
                let mut session =
                    InteractionSession::new(press.event, press.kind, press.viewport, press.origin);
                let candidate = self.evaluate_pointer(host, &mut session, position);
                self.state = ControllerState::Dragging(session);
                InteractionOutcome::Started(candidate)
            }
            ControllerState::Dragging(mut session) => {
                let previous = *session.candidate();
                let candidate = self.evaluate_pointer(host, &mut session, position);
                self.state = ControllerState::Dragging(session);
                if candidate == previous {
                    InteractionOutcome::Ignored
                } else {
                    InteractionOutcome::Updated(candidate)
                }
            }
            other => {
                self.state = other;
                InteractionOutcome::Ignored
            }
        }
    }

    pub fn pointer_released(&mut self, host: &mut InteractionHost<'_>) -> InteractionOutcome {
        match mem::take(&mut self.state) {
            ControllerState::Pressed(press) => {
                if let Some(timer) = press.timer {
                    host.scheduler.cancel(timer);
                }
                InteractionOutcome::Ended(GestureEnd::Cancelled(CancelReason::NotStarted))
            }
            ControllerState::Armed(_) => {
                InteractionOutcome::Ended(GestureEnd::Cancelled(CancelReason::NotStarted))
            }
            ControllerState::Dragging(session) => {
                Self::stop_edge_timer(host, &session);
                let end = finish_gesture(&mut *host.store, session.event(), session.candidate());
                InteractionOutcome::Ended(end)
            }
            other => {
                self.state = other;
                InteractionOutcome::Ignored
            }
        }
    }

    /// Abandon whatever is active; the store is left untouched.
    pub fn cancel(&mut self, host: &mut InteractionHost<'_>) -> InteractionOutcome {
        match mem::take(&mut self.state) {
            ControllerState::Idle => InteractionOutcome::Ignored,
            ControllerState::Pressed(press) => {
                if let Some(timer) = press.timer {
                    host.scheduler.cancel(timer);
                }
                Self::cancelled()
            }
            ControllerState::Armed(_) | ControllerState::Keyboard(_) => Self::cancelled(),
            ControllerState::Dragging(session) => {
                Self::stop_edge_timer(host, &session);
                log::debug!("drag of {} cancelled", session.event_id());
                Self::cancelled()
            }
        }
    }

    fn cancelled() -> InteractionOutcome {
        InteractionOutcome::Ended(GestureEnd::Cancelled(CancelReason::UserCancelled))
    }

    fn stop_edge_timer(host: &mut InteractionHost<'_>, session: &InteractionSession) {
        if let Some(handle) = session.edge_timer_handle() {
            host.scheduler.cancel(handle);
        }
    }

    fn inputs<'h>(&'h self, host: &'h InteractionHost<'_>) -> ProposalInputs<'h> {
        ProposalInputs {
            settings: &self.settings.interaction,
            snap: &self.snap,
            store: &*host.store,
            regions: host.regions,
            now: host.now,
        }
    }

    /// Recompute and validate the candidate for a new pointer position.
    fn evaluate_pointer(
        &self,
        host: &mut InteractionHost<'_>,
        session: &mut InteractionSession,
        position: PointerPosition,
    ) -> Candidate {
        session.pointer = position;
        let proposal = {
            let inputs = self.inputs(host);
            match session.kind() {
                GestureKind::Move => session.propose_move(&inputs),
                GestureKind::Resize(edge) => session.propose_resize(edge, &inputs),
            }
        };
        let accepted = host.validator.can_accept(&proposal, session.event());
        if !accepted {
            log::debug!("candidate for {} rejected", session.event_id());
        }
        let candidate = Candidate { proposal, accepted };
        session.record(candidate);

        if session.kind() == GestureKind::Move {
            self.update_edge_navigation(host, session);
        }
        candidate
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::event::CalendarEvent;
    use crate::services::event::InMemoryEventStore;
    use crate::timeline::VisibleTimeRange;
    use chrono::{NaiveDate, NaiveDateTime};

    pub(crate) fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    pub(crate) fn at(d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, minute, 0).unwrap()
    }

    /// Single-day view of March 10, 600px wide, 60px per hour over 0-24h.
    pub(crate) fn viewport() -> ViewportGeometry {
        ViewportGeometry::single_day(day(10), 600.0, VisibleTimeRange::default())
    }

    /// Offset of `hour:minute` on the default axis.
    pub(crate) fn y(hour: u32, minute: u32) -> f64 {
        f64::from(hour * 60 + minute)
    }

    pub(crate) fn settings() -> TimelineSettings {
        let mut settings = TimelineSettings::default();
        settings.interaction.press_delay_ms = 0;
        settings
    }

    /// Store, scheduler and validator a test drives the controller with.
    pub(crate) struct Fixture {
        pub(crate) store: InMemoryEventStore,
        pub(crate) scheduler: ManualScheduler,
        pub(crate) validator: Box<dyn ProposalValidator>,
        pub(crate) regions: Vec<TimeRegion>,
        pub(crate) now: NaiveDateTime,
    }

    impl Fixture {
        pub(crate) fn new(events: Vec<CalendarEvent>) -> Self {
            Self {
                store: InMemoryEventStore::from_events(events).unwrap(),
                scheduler: ManualScheduler::new(),
                validator: Box::new(AcceptAll),
                regions: Vec::new(),
                now: at(10, 6, 0),
            }
        }

        pub(crate) fn host(&mut self) -> InteractionHost<'_> {
            InteractionHost::new(
                &mut self.store,
                self.validator.as_ref(),
                &mut self.scheduler,
                self.now,
            )
            .with_regions(&self.regions)
        }
    }
}
