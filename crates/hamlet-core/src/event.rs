//! Time-boxed events and the insertion-ordered event queue.
//!
//! Every delayed effect in the game is an [`Event`]: the 1-second production
//! credits, the wood-gathering boost and its cooldown debuff, and building
//! construction. Building events form a sub-queue inside the collection:
//! only the head counts down, the rest wait with no start instant until the
//! event ahead of them completes.

use chrono::{Duration, NaiveDateTime};

use crate::clock::format_duration;
use crate::config::{EVENT_MAX_DURATION_DAYS, EXPIRY_GRACE_SECS};

// ---------------------------------------------------------------------------
// Event identity
// ---------------------------------------------------------------------------

/// Every event the engine can schedule. Closed set; the save format carries
/// the string names below and anything else is rejected at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// One-second food production credit.
    Food,
    /// One-second wood production credit.
    Wood,
    /// Timed wood-gathering boost started by the gather click.
    WoodPlus,
    /// Cooldown after a wood boost pays out.
    WoodPlusDebuff,
    House,
    Granary,
    Storage,
}

impl EventName {
    /// The wire name used in save files.
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Food => "Food",
            EventName::Wood => "Wood",
            EventName::WoodPlus => "WoodPlus",
            EventName::WoodPlusDebuff => "WoodPlusDebuff",
            EventName::House => "House",
            EventName::Granary => "Granary",
            EventName::Storage => "Storage",
        }
    }

    /// Parse a wire name. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Food" => Some(EventName::Food),
            "Wood" => Some(EventName::Wood),
            "WoodPlus" => Some(EventName::WoodPlus),
            "WoodPlusDebuff" => Some(EventName::WoodPlusDebuff),
            "House" => Some(EventName::House),
            "Granary" => Some(EventName::Granary),
            "Storage" => Some(EventName::Storage),
            _ => None,
        }
    }
}

/// Coarse event family. Admission policy and queries key off this, not the
/// name: the building sub-queue applies to every `Building` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Automatic 1-second production credits.
    Production,
    /// Timed resource boosts started by player actions.
    Resource,
    /// Queued construction; at most one active at a time.
    Building,
    /// Action cooldowns.
    Debuff,
}

impl EventCategory {
    /// The wire name used in save files.
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Production => "Production",
            EventCategory::Resource => "Resource",
            EventCategory::Building => "Building",
            EventCategory::Debuff => "Debuff",
        }
    }

    /// Parse a wire name. Returns `None` for unknown categories.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Production" => Some(EventCategory::Production),
            "Resource" => Some(EventCategory::Resource),
            "Building" => Some(EventCategory::Building),
            "Debuff" => Some(EventCategory::Debuff),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A named, time-boxed record of a delayed effect.
///
/// `counter` is the numeric payload: an accumulating reward for resource
/// events, or the queue ordinal for building events. `start` is `None`
/// while a building event waits behind the one under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: EventName,
    pub category: EventCategory,
    pub counter: f64,
    pub start: Option<NaiveDateTime>,
    pub duration: Duration,
}

impl Event {
    /// Create an event starting now. [`EventQueue::push`] may clear the
    /// start again for building events that have to wait.
    pub fn new(
        name: EventName,
        category: EventCategory,
        counter: f64,
        duration: Duration,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            name,
            category,
            counter,
            start: Some(now),
            duration,
        }
    }

    /// The instant this event completes. A waiting event (no start) is
    /// treated as if it started now.
    pub fn end_time(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.start.unwrap_or(now) + self.duration
    }

    /// Whether the event has run its course, with a one-second grace for
    /// tick jitter. Waiting events never expire.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.start.is_some()
            && now >= self.end_time(now) - Duration::seconds(EXPIRY_GRACE_SECS)
    }

    /// Time left until completion, floored at zero.
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        (self.end_time(now) - now).max(Duration::zero())
    }

    /// Extend the duration, capped at ten days.
    pub fn add_time(&mut self, amount: Duration) {
        self.duration =
            (self.duration + amount).min(Duration::days(EVENT_MAX_DURATION_DAYS));
    }

    /// Shorten the duration, floored at zero.
    pub fn subtract_time(&mut self, amount: Duration) {
        self.duration = (self.duration - amount).max(Duration::zero());
    }

    /// Accumulate reward into the counter.
    pub fn add_counter(&mut self, value: f64) {
        self.counter += value;
    }

    /// Countdown label: remaining time for a running event, full duration
    /// for one still waiting in the building queue.
    pub fn format_remaining(&self, now: NaiveDateTime) -> String {
        match self.start {
            Some(_) => format_duration(self.remaining(now)),
            None => format_duration(self.duration),
        }
    }
}

// ---------------------------------------------------------------------------
// EventQueue
// ---------------------------------------------------------------------------

/// Insertion-ordered collection of live events.
///
/// Order is never re-sorted; for same-category events insertion order *is*
/// queue order. Building events additionally carry their position in
/// `counter`, maintained by [`push`](Self::push) and the removal cascade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQueue {
    events: Vec<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Restore a persisted queue verbatim. Admission policy must not re-run
    /// on saved events; building ordinals and start instants are already
    /// correct on the wire.
    pub(crate) fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Insert an event. Building events get their queue ordinal assigned
    /// here: the count of building events already queued. A non-zero
    /// ordinal means something is ahead, so the event waits unstarted.
    pub fn push(&mut self, mut event: Event, now: NaiveDateTime) {
        if event.category == EventCategory::Building {
            let position = self.count_category(EventCategory::Building);
            event.counter = position as f64;
            event.start = if position > 0 { None } else { Some(now) };
        }
        self.events.push(event);
    }

    /// Remove the event at `index` and return it. Removing a building event
    /// shifts every remaining building ordinal down by one; a waiting event
    /// whose ordinal reaches zero becomes the active head and starts now.
    pub fn remove(&mut self, index: usize, now: NaiveDateTime) -> Event {
        let removed = self.events.remove(index);
        if removed.category == EventCategory::Building {
            for event in &mut self.events {
                if event.category == EventCategory::Building {
                    event.counter -= 1.0;
                    if event.counter == 0.0 && event.start.is_none() {
                        event.start = Some(now);
                    }
                }
            }
        }
        removed
    }

    /// Remove the first event with the given name. No-op if absent.
    pub fn remove_by_name(&mut self, name: EventName, now: NaiveDateTime) {
        if let Some(index) = self.events.iter().position(|e| e.name == name) {
            self.remove(index, now);
        }
    }

    /// All currently expired events, in insertion order. Pure query.
    pub fn expired(&self, now: NaiveDateTime) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.is_expired(now))
    }

    /// Remove every event expired at entry through [`remove`](Self::remove)
    /// so the building-queue advancement cascades correctly. Only the entry
    /// snapshot is removed: an event the cascade promotes stays queued even
    /// if it is instantly expired, so its completion is still observable.
    pub fn remove_expired(&mut self, now: NaiveDateTime) {
        let expired: Vec<usize> = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_expired(now))
            .map(|(index, _)| index)
            .collect();
        // Descending order keeps the remaining indices valid.
        for index in expired.into_iter().rev() {
            self.remove(index, now);
        }
    }

    /// Whether any event with this name is live.
    pub fn exists(&self, name: EventName) -> bool {
        self.count(name) > 0
    }

    /// Whether any event of this category is live.
    pub fn exists_category(&self, category: EventCategory) -> bool {
        self.count_category(category) > 0
    }

    /// Number of live events with this name.
    pub fn count(&self, name: EventName) -> usize {
        self.events.iter().filter(|e| e.name == name).count()
    }

    /// Number of live events of this category.
    pub fn count_category(&self, category: EventCategory) -> usize {
        self.events.iter().filter(|e| e.category == category).count()
    }

    /// First event with this name, if any.
    pub fn get(&self, name: EventName) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Mutable access to the first event with this name, if any.
    pub fn get_mut(&mut self, name: EventName) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.name == name)
    }

    /// Building events in true queue order: ordinal 0 is under
    /// construction, the rest wait in ascending position.
    pub fn building_queue(&self) -> Vec<&Event> {
        let mut queue: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.category == EventCategory::Building)
            .collect();
        queue.sort_by(|a, b| a.counter.total_cmp(&b.counter));
        queue
    }

    /// All live events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
