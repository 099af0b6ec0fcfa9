//! Keyboard move and resize mode.
//!
//! Up/Down move the timed candidate (or the resized edge) to the adjacent
//! slot boundary, so an off-grid event lands on the grid with its first
//! step. Left/Right step by one day. Nothing is snapped.

use std::mem;

use chrono::Duration;

use super::resize::{clamp_to_minimum, resize_all_day};
use super::session::{finish_gesture, unchanged_proposal};
use super::types::{
    CancelReason, Candidate, GestureEnd, GestureKind, InteractionOutcome, Proposal, ResizeEdge,
    TypeConversion,
};
use super::{ControllerState, InteractionController, InteractionHost};
use crate::models::event::{CalendarEvent, EventId, EventInterval};
use crate::utils::date::step_to_slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardMode {
    Move,
    Resize(ResizeEdge),
}

impl KeyboardMode {
    fn gesture(&self) -> GestureKind {
        match self {
            KeyboardMode::Move => GestureKind::Move,
            KeyboardMode::Resize(edge) => GestureKind::Resize(*edge),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyboardSession {
    event: CalendarEvent,
    mode: KeyboardMode,
    candidate: Candidate,
}

impl KeyboardSession {
    pub fn event(&self) -> &CalendarEvent {
        &self.event
    }

    pub fn mode(&self) -> KeyboardMode {
        self.mode
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// Interval after applying `key`, or `None` when the key does nothing
    /// in this mode.
    fn step(&self, key: KeyCommand, slot: Duration, minimum: Duration) -> Option<EventInterval> {
        let current = self.candidate.proposal.interval();
        let all_day = self.event.all_day;
        let day = Duration::days(1);
        let shift_start = |forward: bool| {
            current.shifted(step_to_slot(current.start, slot, forward) - current.start)
        };

        match (self.mode, key) {
            (KeyboardMode::Move, KeyCommand::Up) if !all_day => Some(shift_start(false)),
            (KeyboardMode::Move, KeyCommand::Down) if !all_day => Some(shift_start(true)),
            (KeyboardMode::Move, KeyCommand::Left) => Some(current.shifted(-day)),
            (KeyboardMode::Move, KeyCommand::Right) => Some(current.shifted(day)),
            (KeyboardMode::Resize(edge), KeyCommand::Up) if !all_day => Some(clamp_to_minimum(
                current,
                edge,
                step_to_slot(edge.of(&current), slot, false),
                minimum,
            )),
            (KeyboardMode::Resize(edge), KeyCommand::Down) if !all_day => Some(clamp_to_minimum(
                current,
                edge,
                step_to_slot(edge.of(&current), slot, true),
                minimum,
            )),
            (KeyboardMode::Resize(edge), KeyCommand::Left) if all_day => {
                Some(resize_all_day(current, edge, -1))
            }
            (KeyboardMode::Resize(edge), KeyCommand::Right) if all_day => {
                Some(resize_all_day(current, edge, 1))
            }
            _ => None,
        }
    }

    fn proposal_for(&self, interval: EventInterval) -> Proposal {
        match self.mode {
            KeyboardMode::Move => Proposal::Move {
                interval,
                all_day: self.event.all_day,
                conversion: TypeConversion::None,
            },
            KeyboardMode::Resize(edge) => Proposal::Resize { interval, edge },
        }
    }
}

impl InteractionController {
    pub fn enter_move_mode(
        &mut self,
        host: &mut InteractionHost<'_>,
        event_id: &EventId,
    ) -> InteractionOutcome {
        self.enter_keyboard_mode(host, event_id, KeyboardMode::Move)
    }

    pub fn enter_resize_mode(
        &mut self,
        host: &mut InteractionHost<'_>,
        event_id: &EventId,
        edge: ResizeEdge,
    ) -> InteractionOutcome {
        self.enter_keyboard_mode(host, event_id, KeyboardMode::Resize(edge))
    }

    fn enter_keyboard_mode(
        &mut self,
        host: &mut InteractionHost<'_>,
        event_id: &EventId,
        mode: KeyboardMode,
    ) -> InteractionOutcome {
        if !self.is_idle() {
            return InteractionOutcome::Ignored;
        }
        let Some(event) = host.store.event(event_id) else {
            log::warn!("keyboard mode requested for unknown event {}", event_id);
            return InteractionOutcome::Ignored;
        };

        let proposal = unchanged_proposal(&event, mode.gesture());
        let candidate = Candidate {
            accepted: host.validator.can_accept(&proposal, &event),
            proposal,
        };
        log::debug!("keyboard {:?} mode on {}", mode, event_id);
        self.state = ControllerState::Keyboard(KeyboardSession {
            event,
            mode,
            candidate,
        });
        InteractionOutcome::Started(candidate)
    }

    pub fn key_pressed(
        &mut self,
        host: &mut InteractionHost<'_>,
        key: KeyCommand,
    ) -> InteractionOutcome {
        let mut session = match mem::take(&mut self.state) {
            ControllerState::Keyboard(session) => session,
            other => {
                self.state = other;
                return InteractionOutcome::Ignored;
            }
        };

        match key {
            KeyCommand::Confirm => {
                let end = finish_gesture(&mut *host.store, &session.event, &session.candidate);
                InteractionOutcome::Ended(end)
            }
            KeyCommand::Cancel => {
                log::debug!("keyboard mode on {} cancelled", session.event.id);
                InteractionOutcome::Ended(GestureEnd::Cancelled(CancelReason::UserCancelled))
            }
            _ => {
                let slot = Duration::minutes(self.settings.time_range.slot_minutes);
                let minimum = self.settings.interaction.minimum_duration();
                let stepped = session
                    .step(key, slot, minimum)
                    .filter(|interval| *interval != session.candidate.proposal.interval());

                let outcome = match stepped {
                    Some(interval) => {
                        let proposal = session.proposal_for(interval);
                        let candidate = Candidate {
                            accepted: host.validator.can_accept(&proposal, &session.event),
                            proposal,
                        };
                        session.candidate = candidate;
                        InteractionOutcome::Updated(candidate)
                    }
                    None => InteractionOutcome::Ignored,
                };
                self.state = ControllerState::Keyboard(session);
                outcome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::*;
    use crate::models::event::{CalendarEvent, EventInterval};
    use crate::services::event::EventStore;
    use pretty_assertions::assert_eq;

    fn meeting() -> CalendarEvent {
        CalendarEvent::new("m", "Meeting", at(10, 9, 0), at(10, 10, 0)).unwrap()
    }

    fn interval_of(outcome: &InteractionOutcome) -> EventInterval {
        outcome.candidate().unwrap().proposal.interval()
    }

    #[test]
    fn test_keyboard_move_steps_and_confirms() {
        let mut fixture = Fixture::new(vec![meeting()]);
        let mut controller = InteractionController::new(settings()).unwrap();

        let outcome = controller.enter_move_mode(&mut fixture.host(), &"m".into());
        assert!(outcome.candidate().unwrap().accepted);
        assert_eq!(controller.phase(), InteractionPhase::KeyboardMove);

        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Down);
        assert_eq!(
            interval_of(&outcome),
            EventInterval::new(at(10, 9, 15), at(10, 10, 15))
        );
        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Right);
        assert_eq!(
            interval_of(&outcome),
            EventInterval::new(at(11, 9, 15), at(11, 10, 15))
        );

        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Confirm);
        assert!(matches!(outcome, InteractionOutcome::Ended(GestureEnd::Committed(_))));
        assert!(controller.is_idle());
        assert_eq!(fixture.store.event(&"m".into()).unwrap().start, at(11, 9, 15));
    }

    #[test]
    fn test_keyboard_steps_align_off_grid_event() {
        let off_grid = CalendarEvent::new("o", "Off grid", at(10, 9, 7), at(10, 10, 7)).unwrap();
        let mut fixture = Fixture::new(vec![off_grid]);
        let mut controller = InteractionController::new(settings()).unwrap();

        controller.enter_move_mode(&mut fixture.host(), &"o".into());
        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Down);
        assert_eq!(
            interval_of(&outcome),
            EventInterval::new(at(10, 9, 15), at(10, 10, 15))
        );
        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Up);
        assert_eq!(
            interval_of(&outcome),
            EventInterval::new(at(10, 9, 0), at(10, 10, 0))
        );
        controller.key_pressed(&mut fixture.host(), KeyCommand::Cancel);

        controller.enter_resize_mode(&mut fixture.host(), &"o".into(), ResizeEdge::End);
        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Up);
        assert_eq!(
            interval_of(&outcome),
            EventInterval::new(at(10, 9, 7), at(10, 10, 0))
        );
    }

    #[test]
    fn test_keyboard_resize_respects_minimum() {
        let mut fixture = Fixture::new(vec![meeting()]);
        let mut controller = InteractionController::new(settings()).unwrap();
        controller.enter_resize_mode(&mut fixture.host(), &"m".into(), ResizeEdge::End);
        assert_eq!(controller.phase(), InteractionPhase::KeyboardResize);

        for _ in 0..3 {
            controller.key_pressed(&mut fixture.host(), KeyCommand::Up);
        }
        assert_eq!(
            controller.keyboard_session().unwrap().candidate().proposal.interval(),
            EventInterval::new(at(10, 9, 0), at(10, 9, 15))
        );
        assert_eq!(
            controller.key_pressed(&mut fixture.host(), KeyCommand::Up),
            InteractionOutcome::Ignored
        );
    }

    #[test]
    fn test_keyboard_keys_that_do_not_apply_are_ignored() {
        let mut fixture = Fixture::new(vec![
            meeting(),
            CalendarEvent::all_day("h", "Holiday", day(10), day(10)).unwrap(),
        ]);
        let mut controller = InteractionController::new(settings()).unwrap();

        controller.enter_resize_mode(&mut fixture.host(), &"m".into(), ResizeEdge::End);
        assert_eq!(
            controller.key_pressed(&mut fixture.host(), KeyCommand::Left),
            InteractionOutcome::Ignored
        );
        controller.key_pressed(&mut fixture.host(), KeyCommand::Cancel);

        controller.enter_move_mode(&mut fixture.host(), &"h".into());
        assert_eq!(
            controller.key_pressed(&mut fixture.host(), KeyCommand::Up),
            InteractionOutcome::Ignored
        );
        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Left);
        assert_eq!(interval_of(&outcome), EventInterval::whole_day(day(9)));
    }

    #[test]
    fn test_keyboard_all_day_resize_by_days() {
        let mut fixture = Fixture::new(vec![CalendarEvent::all_day(
            "h",
            "Holiday",
            day(10),
            day(10),
        )
        .unwrap()]);
        let mut controller = InteractionController::new(settings()).unwrap();
        controller.enter_resize_mode(&mut fixture.host(), &"h".into(), ResizeEdge::End);

        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Right);
        assert_eq!(
            interval_of(&outcome),
            EventInterval::new(at(10, 0, 0), at(12, 0, 0))
        );
        assert_eq!(
            controller.key_pressed(&mut fixture.host(), KeyCommand::Left),
            InteractionOutcome::Updated(Candidate {
                proposal: Proposal::Resize {
                    interval: EventInterval::whole_day(day(10)),
                    edge: ResizeEdge::End,
                },
                accepted: true,
            })
        );
        assert_eq!(
            controller.key_pressed(&mut fixture.host(), KeyCommand::Left),
            InteractionOutcome::Ignored
        );
    }

    #[test]
    fn test_keyboard_confirm_on_rejected_candidate() {
        let mut fixture = Fixture::new(vec![meeting()]);
        fixture.validator =
            Box::new(|proposal: &Proposal, _: &CalendarEvent| proposal.interval().start < at(10, 9, 10));
        let mut controller = InteractionController::new(settings()).unwrap();
        controller.enter_move_mode(&mut fixture.host(), &"m".into());

        let outcome = controller.key_pressed(&mut fixture.host(), KeyCommand::Down);
        assert!(!outcome.candidate().unwrap().accepted);
        assert_eq!(
            controller.key_pressed(&mut fixture.host(), KeyCommand::Confirm),
            InteractionOutcome::Ended(GestureEnd::Cancelled(CancelReason::Rejected))
        );
        assert_eq!(fixture.store.event(&"m".into()).unwrap(), meeting());
    }

    #[test]
    fn test_keys_ignored_outside_keyboard_mode() {
        let mut fixture = Fixture::new(vec![meeting()]);
        let mut controller = InteractionController::new(settings()).unwrap();
        assert_eq!(
            controller.key_pressed(&mut fixture.host(), KeyCommand::Down),
            InteractionOutcome::Ignored
        );
        assert!(controller.is_idle());
    }
}
