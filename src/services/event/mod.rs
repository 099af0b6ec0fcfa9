//! Event store capability.
//!
//! The timeline engine only reads a day's events and, on commit, writes a
//! single mutation. Any backing store (database, sync cache, in-memory map)
//! plugs in through [`EventStore`].

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::event::{CalendarEvent, EventId, EventMutation};

mod memory;

pub use memory::{InMemoryEventStore, StoreChange, SubscriptionId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("event {0} not found")]
    NotFound(EventId),
    #[error("event {0} already exists")]
    Duplicate(EventId),
    #[error("invalid event {id}: {reason}")]
    Invalid { id: EventId, reason: String },
}

#[cfg_attr(test, mockall::automock)]
pub trait EventStore {
    /// Events occurring on `day`, ordered by start then id.
    fn events_for_day(&self, day: NaiveDate) -> Vec<CalendarEvent>;

    fn event(&self, id: &EventId) -> Option<CalendarEvent>;

    /// Apply one committed change atomically.
    fn apply_mutation(&mut self, mutation: &EventMutation) -> Result<(), StoreError>;
}
