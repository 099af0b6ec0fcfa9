use std::mem;

use chrono::Duration;

use super::session::{EdgeTimer, InteractionSession, ProposalInputs};
use super::types::{
    InteractionOutcome, NavigationDirection, PointerRegion, Proposal, TypeConversion,
};
use super::{ControllerState, InteractionController, InteractionHost};
use crate::models::event::EventInterval;
use crate::utils::date::{add_days, days_between, start_of_day};

enum EdgeTimerUpdate {
    Keep,
    Start(NavigationDirection),
    Stop,
}

impl EdgeTimerUpdate {
    fn between(current: Option<EdgeTimer>, zone: Option<NavigationDirection>) -> Self {
        match (current, zone) {
            (Some(timer), Some(direction)) if timer.direction == direction => Self::Keep,
            (_, Some(direction)) => Self::Start(direction),
            (Some(_), None) => Self::Stop,
            (None, None) => Self::Keep,
        }
    }
}

impl InteractionSession {
    /// Candidate for a move to the current pointer position.
    ///
    /// Timed moves keep the duration and snap the start edge. Crossing into
    /// the all-day area (or out of it) converts the event type.
    pub(super) fn propose_move(&self, inputs: &ProposalInputs<'_>) -> Proposal {
        let event = &self.event;
        let range = &self.viewport.range;
        let pointer_day = self.target_day();
        let day_delta = Duration::days(days_between(self.origin_day, pointer_day));

        match (event.all_day, self.pointer.region) {
            (false, PointerRegion::Timed) => {
                let time_delta =
                    range.offset_to_time(self.pointer.y) - range.offset_to_time(self.origin.y);
                let start = inputs.snap(event.start + day_delta + time_delta, &event.id);
                Proposal::Move {
                    interval: EventInterval::new(start, start + event.duration()),
                    all_day: false,
                    conversion: TypeConversion::None,
                }
            }
            (true, PointerRegion::AllDay) => Proposal::Move {
                interval: event.interval().shifted(day_delta),
                all_day: true,
                conversion: TypeConversion::None,
            },
            (false, PointerRegion::AllDay) => Proposal::Move {
                interval: EventInterval::whole_day(pointer_day),
                all_day: true,
                conversion: TypeConversion::ToAllDay,
            },
            (true, PointerRegion::Timed) => {
                let dropped = start_of_day(pointer_day) + range.offset_to_time(self.pointer.y);
                let start = inputs.snap(dropped, &event.id);
                Proposal::Move {
                    interval: EventInterval::new(
                        start,
                        start + inputs.settings.all_day_conversion_duration(),
                    ),
                    all_day: false,
                    conversion: TypeConversion::ToTimed,
                }
            }
        }
    }
}

impl InteractionController {
    /// Start, keep or stop the edge-navigation timer for the pointer position.
    pub(super) fn update_edge_navigation(
        &self,
        host: &mut InteractionHost<'_>,
        session: &mut InteractionSession,
    ) {
        let interaction = &self.settings.interaction;
        let zone = if interaction.cross_day_navigation {
            session
                .viewport
                .edge_zone(session.pointer.x, interaction.edge_margin_px)
        } else {
            None
        };

        match EdgeTimerUpdate::between(session.edge_timer, zone) {
            EdgeTimerUpdate::Keep => {}
            EdgeTimerUpdate::Start(direction) => {
                if let Some(previous) = session.edge_timer.take() {
                    host.scheduler.cancel(previous.handle);
                }
                let handle = host
                    .scheduler
                    .schedule(interaction.edge_navigation_delay());
                log::debug!("edge navigation {:?} armed", direction);
                session.edge_timer = Some(EdgeTimer { handle, direction });
            }
            EdgeTimerUpdate::Stop => {
                if let Some(previous) = session.edge_timer.take() {
                    host.scheduler.cancel(previous.handle);
                }
            }
        }
    }

    /// Edge timer expired: shift the visible days and re-evaluate the drag.
    pub(super) fn navigate(&mut self, host: &mut InteractionHost<'_>) -> InteractionOutcome {
        let mut session = match mem::take(&mut self.state) {
            ControllerState::Dragging(session) => session,
            other => {
                self.state = other;
                return InteractionOutcome::Ignored;
            }
        };
        let Some(timer) = session.edge_timer.take() else {
            self.state = ControllerState::Dragging(session);
            return InteractionOutcome::Ignored;
        };

        let first_day = add_days(session.viewport.first_day, timer.direction.days());
        session.viewport.first_day = first_day;
        log::debug!(
            "navigated {:?} to {} while dragging {}",
            timer.direction,
            first_day,
            session.event_id()
        );

        let pointer = session.pointer;
        let candidate = self.evaluate_pointer(host, &mut session, pointer);
        self.state = ControllerState::Dragging(session);
        InteractionOutcome::Navigated {
            first_day,
            direction: timer.direction,
            candidate,
        }
    }
}
