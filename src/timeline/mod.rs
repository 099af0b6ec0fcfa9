//! Pure time geometry for the day timeline: axis mapping, lane assignment,
//! snapping and the per-day layout handed to the renderer.

pub mod lanes;
pub mod layout;
pub mod snap;
pub mod time_axis;

pub use lanes::{assign_lanes, LaneAssignment, LanedEvent};
pub use layout::{layout_day, DayLayout, EventGeometry, PlacedEvent};
pub use snap::{SnapCategory, SnapContext, SnapResolver, SnapResult};
pub use time_axis::VisibleTimeRange;
