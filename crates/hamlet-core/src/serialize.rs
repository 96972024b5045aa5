//! Save-file schema and JSON encode/decode.
//!
//! The save is a single structured text blob. Numeric event payloads are
//! string-encoded on the wire (the format predates the engine and is kept
//! compatible), and a waiting building event persists an empty
//! `starting_time`. Decode errors are typed here for diagnostics, but the
//! engine always recovers by substituting a fresh game -- a corrupt or
//! partial save is treated as missing, never fatal.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::{format_timestamp, parse_timestamp};
use crate::config::EVENT_MAX_DURATION_DAYS;
use crate::engine::Game;
use crate::event::{Event, EventCategory, EventName, EventQueue};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while encoding a save.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("JSON encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors that can occur while decoding a save. Every variant is recovered
/// by falling back to a fresh game.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown event name `{0}`")]
    UnknownEventName(String),
    #[error("unknown event category `{0}`")]
    UnknownEventCategory(String),
    #[error("invalid counter `{0}`")]
    InvalidCounter(String),
    #[error("invalid duration `{0}`")]
    InvalidDuration(String),
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),
}

// ---------------------------------------------------------------------------
// Wire schema
// ---------------------------------------------------------------------------

/// Top-level save record.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveData {
    pub population: u32,
    pub resource: ResourceRecord,
    pub building: BuildingRecord,
    pub occupation: OccupationRecord,
    /// Last save instant, `YYYY-MM-DDTHH:MM:SS`; empty for a never-saved game.
    pub time: String,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub food: f64,
    pub wood: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub house: u32,
    pub granary: u32,
    pub storage: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OccupationRecord {
    pub harvester: u32,
    pub lumber: u32,
}

/// One persisted event. `counter` and `timedelta` are string-encoded
/// numbers; an empty `starting_time` marks a queued-but-unstarted event.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub counter: String,
    pub starting_time: String,
    pub timedelta: String,
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encode the full game state as the JSON save blob.
pub fn to_json(game: &Game) -> Result<String, SaveError> {
    let data = SaveData {
        population: game.population,
        resource: ResourceRecord {
            food: game.food,
            wood: game.wood,
        },
        building: BuildingRecord {
            house: game.house,
            granary: game.granary,
            storage: game.storage,
        },
        occupation: OccupationRecord {
            harvester: game.harvester,
            lumber: game.lumber,
        },
        time: game.last_saved.map(format_timestamp).unwrap_or_default(),
        events: game.events.iter().map(encode_event).collect(),
    };
    Ok(serde_json::to_string(&data)?)
}

fn encode_event(event: &Event) -> EventRecord {
    EventRecord {
        name: event.name.as_str().to_string(),
        category: event.category.as_str().to_string(),
        counter: event.counter.to_string(),
        starting_time: event.start.map(format_timestamp).unwrap_or_default(),
        timedelta: event.duration.num_seconds().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Scalar state recovered from a save, before a clock is attached.
#[derive(Debug)]
pub(crate) struct DecodedState {
    pub population: u32,
    pub harvester: u32,
    pub lumber: u32,
    pub food: f64,
    pub wood: f64,
    pub house: u32,
    pub granary: u32,
    pub storage: u32,
    pub last_saved: Option<NaiveDateTime>,
    pub events: EventQueue,
}

/// Decode a save blob into engine state. The event queue is restored
/// verbatim -- admission policy must not re-run on persisted events, or
/// the building ordinals and start instants would be clobbered.
pub(crate) fn decode(json: &str) -> Result<DecodedState, LoadError> {
    let data: SaveData = serde_json::from_str(json)?;

    let last_saved = match data.time.as_str() {
        "" => None,
        s => Some(
            parse_timestamp(s).ok_or_else(|| LoadError::InvalidTimestamp(s.to_string()))?,
        ),
    };

    let events = data
        .events
        .iter()
        .map(decode_event)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedState {
        population: data.population,
        harvester: data.occupation.harvester,
        lumber: data.occupation.lumber,
        food: data.resource.food,
        wood: data.resource.wood,
        house: data.building.house,
        granary: data.building.granary,
        storage: data.building.storage,
        last_saved,
        events: EventQueue::from_events(events),
    })
}

fn decode_event(record: &EventRecord) -> Result<Event, LoadError> {
    let name = EventName::parse(&record.name)
        .ok_or_else(|| LoadError::UnknownEventName(record.name.clone()))?;
    let category = EventCategory::parse(&record.category)
        .ok_or_else(|| LoadError::UnknownEventCategory(record.category.clone()))?;
    let counter: f64 = record
        .counter
        .parse()
        .map_err(|_| LoadError::InvalidCounter(record.counter.clone()))?;
    let seconds: i64 = record
        .timedelta
        .parse()
        .map_err(|_| LoadError::InvalidDuration(record.timedelta.clone()))?;
    let start = match record.starting_time.as_str() {
        "" => None,
        s => Some(
            parse_timestamp(s).ok_or_else(|| LoadError::InvalidTimestamp(s.to_string()))?,
        ),
    };

    // The engine never produces a duration outside [0, 10 days]; a save
    // claiming otherwise is clamped back into range rather than trusted
    // (unclamped values overflow chrono arithmetic downstream).
    let max_seconds = Duration::days(EVENT_MAX_DURATION_DAYS).num_seconds();

    Ok(Event {
        name,
        category,
        counter,
        start,
        duration: Duration::seconds(seconds.clamp(0, max_seconds)),
    })
}
