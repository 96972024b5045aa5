//! Tuning constants for the hamlet economy.
//!
//! One self-consistent formula set; nothing here is algorithmic content.
//! Changing a constant rebalances the game, it never changes engine
//! semantics.

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Nominal frames (and therefore engine ticks) per second. The wood-boost
/// accrual converts elapsed seconds into ticks with this rate.
pub const TICKS_PER_SECOND: f64 = 10.0;

/// Grace subtracted from an event's end when testing expiry, in seconds.
/// Tolerates frame jitter around the nominal tick.
pub const EXPIRY_GRACE_SECS: i64 = 1;

/// Hard cap on any gameplay-extended event duration, in days.
pub const EVENT_MAX_DURATION_DAYS: i64 = 10;

/// Interval of one production credit, in seconds. The scheduled event's
/// duration is this interval plus [`EXPIRY_GRACE_SECS`] so the grace does
/// not collapse the interval to zero; the credited amount is exactly one
/// interval of production.
pub const PRODUCTION_EVENT_SECS: i64 = 1;

// ---------------------------------------------------------------------------
// Production
// ---------------------------------------------------------------------------

/// Food eaten per head of population per second, regardless of occupation.
pub const FOOD_UPKEEP_PER_HEAD: f64 = 0.1;

/// Fixed yield multiplier on lumberer production.
pub const LUMBER_YIELD: f64 = 0.8;

/// Workers per synergy step. Every full multiple adds [`SYNERGY_BONUS`] to
/// the production multiplier.
pub const SYNERGY_STEP: u32 = 10;

/// Production multiplier gained per full synergy step.
pub const SYNERGY_BONUS: f64 = 0.5;

/// Flat food from one gather click, before the harvester bonus.
pub const FOOD_CLICK_BASE: f64 = 10.0;

/// Food drops below this before starvation trims the population.
pub const STARVATION_THRESHOLD: f64 = -100.0;

// ---------------------------------------------------------------------------
// Wood boost
// ---------------------------------------------------------------------------

/// Base wait for a wood-gathering boost, in seconds; each assigned lumberer
/// adds one second (the `2*60 + lumber` revision).
pub const WOOD_PLUS_BASE_SECS: i64 = 2 * 60;

/// Seconds shaved off the boost per extra click, credited as accrual.
pub const WOOD_PLUS_CLICK_SECS: i64 = 2;

/// Cooldown after a boost pays out, in seconds.
pub const WOOD_PLUS_DEBUFF_SECS: i64 = 3;

/// The boost accrues `ticks * (1 + round(lumber_production * this, 3))`
/// per tick.
pub const WOOD_PLUS_RATE_FACTOR: f64 = 0.5;

// ---------------------------------------------------------------------------
// Population
// ---------------------------------------------------------------------------

/// Base food cost of the first head of population.
pub const POPULATION_COST_BASE: f64 = 50.0;

/// Geometric growth of the population cost per head already housed.
pub const POPULATION_COST_GROWTH: f64 = 1.1;

/// Population capacity granted by the settlement plus each house.
pub const POPULATION_PER_HOUSE: u32 = 10;

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// Concurrent construction slots. Purchases beyond this are rejected.
pub const MAX_BUILD_SLOTS: usize = 3;

/// Base wood cost of a house and its geometric growth per house committed
/// (built or still queued).
pub const HOUSE_COST_BASE: f64 = 1000.0;
pub const HOUSE_COST_GROWTH: f64 = 1.2;

/// Minutes of construction per house committed, times (committed + 1).
pub const HOUSE_BUILD_MINUTES: i64 = 1;

pub const GRANARY_COST_BASE: f64 = 3000.0;
pub const GRANARY_COST_GROWTH: f64 = 1.2;
pub const GRANARY_BUILD_MINUTES: i64 = 2;

/// Storage cost is linear, not geometric: `base * (1 + committed)`.
pub const STORAGE_COST_BASE: f64 = 8000.0;
pub const STORAGE_BUILD_MINUTES: i64 = 3;

// ---------------------------------------------------------------------------
// Capacity
// ---------------------------------------------------------------------------

/// Food capacity of the settlement plus each granary. Kept above the first
/// granary and storage costs so both stay reachable from the base cap.
pub const FOOD_CAP_PER_GRANARY: f64 = 10_000.0;

/// Wood capacity of the settlement plus each storage.
pub const WOOD_CAP_PER_STORAGE: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// Offline catch-up
// ---------------------------------------------------------------------------

/// Offline production pays at this fraction of the live rate.
pub const OFFLINE_MULTIPLIER: f64 = 0.9;

/// Cap on credited offline time, in seconds (24 hours).
pub const MAX_OFFLINE_SECS: i64 = 60 * 60 * 24;
