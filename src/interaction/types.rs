//! Shared types for pointer and keyboard interaction.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::event::{EventId, EventInterval, EventMutation};
use crate::timeline::VisibleTimeRange;
use crate::utils::date::add_days;

/// Which edge of the event a resize moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResizeEdge {
    /// Top edge in the timed area, left edge for all-day events
    Start,
    /// Bottom edge in the timed area, right edge for all-day events
    End,
}

impl ResizeEdge {
    pub fn of(&self, interval: &EventInterval) -> NaiveDateTime {
        match self {
            ResizeEdge::Start => interval.start,
            ResizeEdge::End => interval.end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GestureKind {
    Move,
    Resize(ResizeEdge),
}

/// Reclassification requested by a move across the all-day/timed boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TypeConversion {
    #[default]
    None,
    ToAllDay,
    ToTimed,
}

/// Candidate placement handed to the validation predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Proposal {
    Move {
        interval: EventInterval,
        all_day: bool,
        conversion: TypeConversion,
    },
    Resize {
        interval: EventInterval,
        edge: ResizeEdge,
    },
}

impl Proposal {
    pub fn interval(&self) -> EventInterval {
        match self {
            Proposal::Move { interval, .. } | Proposal::Resize { interval, .. } => *interval,
        }
    }

    pub fn kind(&self) -> GestureKind {
        match self {
            Proposal::Move { .. } => GestureKind::Move,
            Proposal::Resize { edge, .. } => GestureKind::Resize(*edge),
        }
    }

    pub fn conversion(&self) -> TypeConversion {
        match self {
            Proposal::Move { conversion, .. } => *conversion,
            Proposal::Resize { .. } => TypeConversion::None,
        }
    }

    /// All-day flag the event would have after commit; resizes keep the type.
    pub fn all_day(&self, original: bool) -> bool {
        match self {
            Proposal::Move { all_day, .. } => *all_day,
            Proposal::Resize { .. } => original,
        }
    }
}

/// A proposal together with the predicate's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub proposal: Proposal,
    pub accepted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PointerRegion {
    AllDay,
    Timed,
}

/// Pointer location in view coordinates.
///
/// `x` runs across the day columns from the left edge of the first one;
/// `y` is the time-axis offset and is ignored in the all-day area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
    pub region: PointerRegion,
}

impl PointerPosition {
    pub fn timed(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            region: PointerRegion::Timed,
        }
    }

    pub fn all_day(x: f64) -> Self {
        Self {
            x,
            y: 0.0,
            region: PointerRegion::AllDay,
        }
    }

    pub fn distance_to(&self, other: &PointerPosition) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NavigationDirection {
    Backward,
    Forward,
}

impl NavigationDirection {
    pub fn days(&self) -> i64 {
        match self {
            NavigationDirection::Backward => -1,
            NavigationDirection::Forward => 1,
        }
    }
}

/// Layout of the day columns at the moment a gesture runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub first_day: NaiveDate,
    pub day_count: u32,
    pub width: f64,
    pub range: VisibleTimeRange,
}

impl ViewportGeometry {
    pub fn single_day(day: NaiveDate, width: f64, range: VisibleTimeRange) -> Self {
        Self {
            first_day: day,
            day_count: 1,
            width,
            range,
        }
    }

    pub fn column_width(&self) -> f64 {
        self.width / f64::from(self.day_count.max(1))
    }

    /// Column under `x`, clamped to the visible columns.
    pub fn column_at(&self, x: f64) -> u32 {
        let last = self.day_count.max(1) - 1;
        let width = self.column_width();
        if !(width > 0.0) || !(x > 0.0) {
            return 0;
        }
        ((x / width).floor() as u32).min(last)
    }

    pub fn day_at(&self, x: f64) -> NaiveDate {
        add_days(self.first_day, i64::from(self.column_at(x)))
    }

    pub fn last_day(&self) -> NaiveDate {
        add_days(self.first_day, i64::from(self.day_count.max(1) - 1))
    }

    /// Direction to navigate when `x` lies within `margin` of a view edge.
    pub fn edge_zone(&self, x: f64, margin: f64) -> Option<NavigationDirection> {
        if margin <= 0.0 {
            return None;
        }
        if x < margin {
            Some(NavigationDirection::Backward)
        } else if x > self.width - margin {
            Some(NavigationDirection::Forward)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CancelReason {
    /// Released or moved away before the gesture was armed.
    NotStarted,
    UserCancelled,
    /// The last candidate was rejected by the validation predicate.
    Rejected,
    /// The candidate equals the original placement.
    NoChange,
    /// The event was deleted while the gesture ran.
    EventMissing,
    /// The event was changed elsewhere while the gesture ran.
    ConcurrentEdit,
    StoreRejected(String),
}

/// Applied change; `before` undoes it when applied to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommittedChange {
    pub event_id: EventId,
    pub before: EventMutation,
    pub after: EventMutation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GestureEnd {
    Committed(CommittedChange),
    Cancelled(CancelReason),
}

/// Result of feeding one input into the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InteractionOutcome {
    Ignored,
    Pressed,
    Armed,
    Started(Candidate),
    Updated(Candidate),
    Navigated {
        first_day: NaiveDate,
        direction: NavigationDirection,
        candidate: Candidate,
    },
    Ended(GestureEnd),
}

impl InteractionOutcome {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            InteractionOutcome::Started(candidate)
            | InteractionOutcome::Updated(candidate)
            | InteractionOutcome::Navigated { candidate, .. } => Some(candidate),
            _ => None,
        }
    }

    pub fn gesture_end(&self) -> Option<&GestureEnd> {
        match self {
            InteractionOutcome::Ended(end) => Some(end),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InteractionPhase {
    Idle,
    /// Pointer is down, press delay still running.
    Pressed,
    Armed,
    Dragging,
    KeyboardMove,
    KeyboardResize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(days: u32) -> ViewportGeometry {
        ViewportGeometry {
            first_day: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            day_count: days,
            width: 700.0,
            range: VisibleTimeRange::default(),
        }
    }

    #[test]
    fn test_column_lookup_clamps() {
        let view = viewport(7);
        assert_eq!(view.column_at(-20.0), 0);
        assert_eq!(view.column_at(150.0), 1);
        assert_eq!(view.column_at(699.0), 6);
        assert_eq!(view.column_at(5000.0), 6);
        assert_eq!(view.day_at(250.0), NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
        assert_eq!(view.last_day(), NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
    }

    #[test]
    fn test_edge_zones() {
        let view = viewport(1);
        assert_eq!(view.edge_zone(10.0, 24.0), Some(NavigationDirection::Backward));
        assert_eq!(view.edge_zone(690.0, 24.0), Some(NavigationDirection::Forward));
        assert_eq!(view.edge_zone(350.0, 24.0), None);
        assert_eq!(view.edge_zone(0.0, 0.0), None);
    }

    #[test]
    fn test_resize_proposal_keeps_type() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let proposal = Proposal::Resize {
            interval: EventInterval::whole_day(day),
            edge: ResizeEdge::End,
        };
        assert!(proposal.all_day(true));
        assert!(!proposal.all_day(false));
        assert_eq!(proposal.conversion(), TypeConversion::None);
        assert_eq!(proposal.kind(), GestureKind::Resize(ResizeEdge::End));
    }
}
