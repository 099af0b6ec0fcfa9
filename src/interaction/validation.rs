//! Host-supplied acceptance predicates for candidate placements.

use crate::interaction::types::Proposal;
use crate::models::event::CalendarEvent;
use crate::models::time_region::TimeRegion;

/// Decides whether a candidate placement may be committed.
///
/// Called on every candidate change, so implementations should be cheap.
#[cfg_attr(test, mockall::automock)]
pub trait ProposalValidator {
    fn can_accept(&self, proposal: &Proposal, event: &CalendarEvent) -> bool;
}

impl<F> ProposalValidator for F
where
    F: Fn(&Proposal, &CalendarEvent) -> bool,
{
    fn can_accept(&self, proposal: &Proposal, event: &CalendarEvent) -> bool {
        self(proposal, event)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ProposalValidator for AcceptAll {
    fn can_accept(&self, _proposal: &Proposal, _event: &CalendarEvent) -> bool {
        true
    }
}

/// Rejects timed placements that overlap a blocking time region.
///
/// All-day placements are not checked against regions.
#[derive(Debug, Clone, Default)]
pub struct TimeRegionValidator {
    regions: Vec<TimeRegion>,
}

impl TimeRegionValidator {
    pub fn new(regions: Vec<TimeRegion>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[TimeRegion] {
        &self.regions
    }
}

impl ProposalValidator for TimeRegionValidator {
    fn can_accept(&self, proposal: &Proposal, event: &CalendarEvent) -> bool {
        if proposal.all_day(event.all_day) {
            return true;
        }
        let interval = proposal.interval();
        match self.regions.iter().find(|region| region.blocks(&interval)) {
            Some(region) => {
                log::debug!("placement of {} blocked by region {}", event.id, region.id);
                false
            }
            None => true,
        }
    }
}

/// Accepts only when every inner validator accepts.
#[derive(Default)]
pub struct AllOf {
    validators: Vec<Box<dyn ProposalValidator>>,
}

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V>(mut self, validator: V) -> Self
    where
        V: ProposalValidator + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl ProposalValidator for AllOf {
    fn can_accept(&self, proposal: &Proposal, event: &CalendarEvent) -> bool {
        self.validators
            .iter()
            .all(|validator| validator.can_accept(proposal, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::types::{ResizeEdge, TypeConversion};
    use crate::models::event::EventInterval;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn timed_move(start: NaiveDateTime, end: NaiveDateTime) -> Proposal {
        Proposal::Move {
            interval: EventInterval::new(start, end),
            all_day: false,
            conversion: TypeConversion::None,
        }
    }

    fn lunch_block() -> TimeRegion {
        TimeRegion::new("lunch", at(12, 0), at(13, 0)).blocking()
    }

    #[test]
    fn test_closure_validator() {
        let event = CalendarEvent::new("a", "A", at(9, 0), at(10, 0)).unwrap();
        let before_noon = |proposal: &Proposal, _: &CalendarEvent| proposal.interval().end <= at(12, 0);

        assert!(before_noon.can_accept(&timed_move(at(10, 0), at(11, 0)), &event));
        assert!(!before_noon.can_accept(&timed_move(at(11, 30), at(12, 30)), &event));
    }

    #[test]
    fn test_region_validator_blocks_overlap() {
        let validator = TimeRegionValidator::new(vec![lunch_block()]);
        let event = CalendarEvent::new("a", "A", at(9, 0), at(10, 0)).unwrap();

        assert!(!validator.can_accept(&timed_move(at(12, 30), at(13, 30)), &event));
        assert!(validator.can_accept(&timed_move(at(13, 0), at(14, 0)), &event));
        assert!(!validator.can_accept(
            &Proposal::Resize {
                interval: EventInterval::new(at(9, 0), at(12, 15)),
                edge: ResizeEdge::End,
            },
            &event,
        ));
    }

    #[test]
    fn test_region_validator_ignores_all_day() {
        let validator = TimeRegionValidator::new(vec![lunch_block()]);
        let event = CalendarEvent::new("a", "A", at(9, 0), at(10, 0)).unwrap();
        let to_all_day = Proposal::Move {
            interval: EventInterval::whole_day(at(0, 0).date()),
            all_day: true,
            conversion: TypeConversion::ToAllDay,
        };
        assert!(validator.can_accept(&to_all_day, &event));
    }

    #[test]
    fn test_non_blocking_region_is_advisory() {
        let validator =
            TimeRegionValidator::new(vec![TimeRegion::new("focus", at(12, 0), at(13, 0))]);
        let event = CalendarEvent::new("a", "A", at(9, 0), at(10, 0)).unwrap();
        assert!(validator.can_accept(&timed_move(at(12, 0), at(13, 0)), &event));
    }

    #[test]
    fn test_all_of_requires_every_validator() {
        let event = CalendarEvent::new("a", "A", at(9, 0), at(10, 0)).unwrap();
        let mut never = MockProposalValidator::new();
        never.expect_can_accept().return_const(false);

        let validator = AllOf::new().with(AcceptAll).with(never);
        assert_eq!(validator.len(), 2);
        assert!(!validator.can_accept(&timed_move(at(10, 0), at(11, 0)), &event));
        assert!(AllOf::new().can_accept(&timed_move(at(10, 0), at(11, 0)), &event));
    }
}
