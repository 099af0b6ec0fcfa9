use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use super::{EventStore, StoreError};
use crate::models::event::{CalendarEvent, EventId, EventMutation};

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Inserted(EventId),
    Updated(EventId),
    Removed(EventId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreChange)>;

/// Event store kept in memory, keyed by id.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: BTreeMap<EventId, CalendarEvent>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    revision: u64,
}

impl fmt::Debug for InMemoryEventStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryEventStore")
            .field("events", &self.events.len())
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from events, rejecting duplicates and invalid events.
    pub fn from_events<I>(events: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = CalendarEvent>,
    {
        let mut store = Self::new();
        for event in events {
            if store.events.contains_key(&event.id) {
                return Err(StoreError::Duplicate(event.id));
            }
            store.insert(event)?;
        }
        Ok(store)
    }

    /// Insert or replace an event. Returns the replaced event, if any.
    pub fn insert(&mut self, event: CalendarEvent) -> Result<Option<CalendarEvent>, StoreError> {
        event.validate().map_err(|reason| StoreError::Invalid {
            id: event.id.clone(),
            reason,
        })?;

        let id = event.id.clone();
        let previous = self.events.insert(id.clone(), event);
        let change = if previous.is_some() {
            StoreChange::Updated(id)
        } else {
            StoreChange::Inserted(id)
        };
        self.notify(change);
        Ok(previous)
    }

    pub fn remove(&mut self, id: &EventId) -> Option<CalendarEvent> {
        let removed = self.events.remove(id)?;
        self.notify(StoreChange::Removed(id.clone()));
        Some(removed)
    }

    pub fn get(&self, id: &EventId) -> Option<&CalendarEvent> {
        self.events.get(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.values()
    }

    /// Incremented on every change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: StoreChange) {
        self.revision += 1;
        log::debug!("event store change {:?} (revision {})", change, self.revision);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

impl EventStore for InMemoryEventStore {
    fn events_for_day(&self, day: NaiveDate) -> Vec<CalendarEvent> {
        let mut events: Vec<CalendarEvent> = self
            .events
            .values()
            .filter(|event| event.occurs_on(day))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        events
    }

    fn event(&self, id: &EventId) -> Option<CalendarEvent> {
        self.events.get(id).cloned()
    }

    fn apply_mutation(&mut self, mutation: &EventMutation) -> Result<(), StoreError> {
        let current = self
            .events
            .get(&mutation.event_id)
            .ok_or_else(|| StoreError::NotFound(mutation.event_id.clone()))?;

        let updated = current.with_interval(mutation.interval, mutation.all_day);
        updated.validate().map_err(|reason| StoreError::Invalid {
            id: mutation.event_id.clone(),
            reason,
        })?;

        self.events.insert(mutation.event_id.clone(), updated);
        self.notify(StoreChange::Updated(mutation.event_id.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventInterval;
    use chrono::NaiveDateTime;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample_store() -> InMemoryEventStore {
        InMemoryEventStore::from_events(vec![
            CalendarEvent::new("b", "B", at(10, 9), at(10, 10)).unwrap(),
            CalendarEvent::new("a", "A", at(10, 9), at(10, 11)).unwrap(),
            CalendarEvent::new("c", "C", at(11, 9), at(11, 10)).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_events_for_day_are_ordered() {
        let store = sample_store();
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let ids: Vec<_> = store
            .events_for_day(day)
            .into_iter()
            .map(|event| event.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = InMemoryEventStore::from_events(vec![
            CalendarEvent::new("a", "A", at(10, 9), at(10, 10)).unwrap(),
            CalendarEvent::new("a", "A again", at(10, 11), at(10, 12)).unwrap(),
        ]);
        assert_eq!(result.unwrap_err(), StoreError::Duplicate("a".into()));
    }

    #[test]
    fn test_apply_mutation_updates_interval_and_type() {
        let mut store = sample_store();
        let mutation = EventMutation {
            event_id: "c".into(),
            interval: EventInterval::whole_day(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()),
            all_day: true,
        };

        store.apply_mutation(&mutation).unwrap();
        let updated = store.get(&"c".into()).unwrap();
        assert!(updated.all_day);
        assert_eq!(updated.start, at(12, 0));
        assert_eq!(updated.title, "C");
    }

    #[test]
    fn test_apply_mutation_missing_event() {
        let mut store = sample_store();
        let mutation = EventMutation {
            event_id: "zzz".into(),
            interval: EventInterval::new(at(10, 9), at(10, 10)),
            all_day: false,
        };
        assert_eq!(
            store.apply_mutation(&mutation),
            Err(StoreError::NotFound("zzz".into()))
        );
    }

    #[test]
    fn test_apply_mutation_rejects_inverted_interval() {
        let mut store = sample_store();
        let before = store.revision();
        let mutation = EventMutation {
            event_id: "a".into(),
            interval: EventInterval::new(at(10, 12), at(10, 9)),
            all_day: false,
        };

        assert!(matches!(
            store.apply_mutation(&mutation),
            Err(StoreError::Invalid { .. })
        ));
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn test_listeners_see_changes_until_unsubscribed() {
        let mut store = sample_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = store.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        store.remove(&"b".into());
        assert!(store.unsubscribe(subscription));
        store.remove(&"a".into());

        assert_eq!(*seen.borrow(), vec![StoreChange::Removed("b".into())]);
        assert!(!store.unsubscribe(subscription));
    }
}
