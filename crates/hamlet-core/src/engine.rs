//! The game engine: owns all resource, population, and building state and
//! drives the event queue through the per-frame pipeline.
//!
//! # Architecture
//!
//! The `Game` owns:
//! - Scalar resources (`food`, `wood`) with building-driven capacities
//! - Population counters (`population`, `harvester`, `lumber`)
//! - Building counts (`house`, `granary`, `storage`), incremented only when
//!   the matching construction event completes
//! - One [`EventQueue`] and one boxed [`Clock`]
//!
//! Everything runs synchronously inside one frame; the caller serializes
//! one logical tick (`autominer` + `manage_event`) plus any user actions.
//! Production is never applied by direct per-frame mutation: `autominer`
//! schedules 1-second "Food"/"Wood" events and `manage_event` credits them
//! on expiry, so the rate is frame-rate independent and every credit moves
//! through the same expiry machinery as the timed boosts.

use chrono::{Duration, NaiveDateTime};

use crate::clock::{format_duration, Clock, SystemClock};
use crate::config::*;
use crate::event::{Event, EventCategory, EventName, EventQueue};
use crate::format::{format_number, Precision};
use crate::serialize::{self, SaveError};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// A working occupation. Only these two have a production formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Harvester,
    Lumber,
}

/// Round to three decimals; used where accrual rates feed long-running
/// counters and drift would otherwise accumulate.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// All simulation state plus the event queue and the clock.
#[derive(Debug)]
pub struct Game {
    pub(crate) population: u32,
    pub(crate) harvester: u32,
    pub(crate) lumber: u32,
    pub(crate) food: f64,
    pub(crate) wood: f64,
    pub(crate) house: u32,
    pub(crate) granary: u32,
    pub(crate) storage: u32,
    /// Instant of the last persisted save; anchors offline catch-up.
    pub(crate) last_saved: Option<NaiveDateTime>,
    /// Live delayed effects. Public so the display layer can query
    /// `building_queue()` and `exists()` for conditional UI.
    pub events: EventQueue,
    pub(crate) clock: Box<dyn Clock>,
}

impl Game {
    /// Fresh zero-state game on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Fresh zero-state game on the given clock.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            population: 0,
            harvester: 0,
            lumber: 0,
            food: 0.0,
            wood: 0.0,
            house: 0,
            granary: 0,
            storage: 0,
            last_saved: None,
            events: EventQueue::new(),
            clock,
        }
    }

    // -----------------------------------------------------------------------
    // State accessors
    // -----------------------------------------------------------------------

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn harvester(&self) -> u32 {
        self.harvester
    }

    pub fn lumber(&self) -> u32 {
        self.lumber
    }

    pub fn food(&self) -> f64 {
        self.food
    }

    pub fn wood(&self) -> f64 {
        self.wood
    }

    pub fn house(&self) -> u32 {
        self.house
    }

    pub fn granary(&self) -> u32 {
        self.granary
    }

    pub fn storage(&self) -> u32 {
        self.storage
    }

    pub fn last_saved(&self) -> Option<NaiveDateTime> {
        self.last_saved
    }

    /// Population not assigned to any occupation.
    pub fn unemployed(&self) -> u32 {
        self.population.saturating_sub(self.harvester + self.lumber)
    }

    // -----------------------------------------------------------------------
    // Production
    // -----------------------------------------------------------------------

    /// Per-second base production of a role: `w^1.05 * (1 + floor(w/10)*0.5)`.
    /// The multiplier jumps at every full ten workers.
    pub fn production(&self, role: Role) -> f64 {
        let workers = match role {
            Role::Harvester => self.harvester,
            Role::Lumber => self.lumber,
        };
        let synergy = (workers / SYNERGY_STEP) as f64 * SYNERGY_BONUS;
        (workers as f64).powf(1.05) * (1.0 + synergy)
    }

    /// Net food per second: harvester output minus population upkeep.
    /// Goes negative when the settlement outgrows its harvesters.
    pub fn harvester_production(&self) -> f64 {
        self.production(Role::Harvester) - FOOD_UPKEEP_PER_HEAD * self.population as f64
    }

    /// Wood per second at the fixed lumber yield.
    pub fn lumber_production(&self) -> f64 {
        self.production(Role::Lumber) * LUMBER_YIELD
    }

    // -----------------------------------------------------------------------
    // Costs and limits
    // -----------------------------------------------------------------------

    /// Food cost of the next head of population.
    pub fn population_cost(&self) -> f64 {
        (POPULATION_COST_BASE * POPULATION_COST_GROWTH.powi(self.population as i32)).round()
    }

    pub fn population_limit(&self) -> u32 {
        POPULATION_PER_HOUSE * (1 + self.house)
    }

    pub fn food_limit(&self) -> f64 {
        FOOD_CAP_PER_GRANARY * (1.0 + self.granary as f64)
    }

    pub fn wood_limit(&self) -> f64 {
        WOOD_CAP_PER_STORAGE * (1.0 + self.storage as f64)
    }

    /// Houses built plus houses still in the construction queue. Costs key
    /// off this so commitments in flight already raise the next price.
    pub fn house_total(&self) -> u32 {
        self.house + self.events.count(EventName::House) as u32
    }

    pub fn granary_total(&self) -> u32 {
        self.granary + self.events.count(EventName::Granary) as u32
    }

    pub fn storage_total(&self) -> u32 {
        self.storage + self.events.count(EventName::Storage) as u32
    }

    pub fn house_cost(&self) -> f64 {
        (HOUSE_COST_BASE * HOUSE_COST_GROWTH.powi(self.house_total() as i32)).round()
    }

    pub fn granary_cost(&self) -> f64 {
        (GRANARY_COST_BASE * GRANARY_COST_GROWTH.powi(self.granary_total() as i32)).round()
    }

    pub fn storage_cost(&self) -> f64 {
        STORAGE_COST_BASE * (1.0 + self.storage_total() as f64)
    }

    fn house_build_time(&self) -> Duration {
        Duration::minutes((self.house_total() as i64 + 1) * HOUSE_BUILD_MINUTES)
    }

    fn granary_build_time(&self) -> Duration {
        Duration::minutes((self.granary_total() as i64 + 1) * GRANARY_BUILD_MINUTES)
    }

    fn storage_build_time(&self) -> Duration {
        Duration::minutes((self.storage_total() as i64 + 1) * STORAGE_BUILD_MINUTES)
    }

    // -----------------------------------------------------------------------
    // Tick entry points
    // -----------------------------------------------------------------------

    /// First half of the tick. Schedules the 1-second production credits if
    /// none are pending, then runs the starvation check.
    pub fn autominer(&mut self) {
        let now = self.clock.now();
        let interval = Duration::seconds(PRODUCTION_EVENT_SECS + EXPIRY_GRACE_SECS);
        if !self.events.exists(EventName::Food) {
            let credit = self.harvester_production() * PRODUCTION_EVENT_SECS as f64;
            self.events.push(
                Event::new(EventName::Food, EventCategory::Production, credit, interval, now),
                now,
            );
        }
        if !self.events.exists(EventName::Wood) {
            let credit = self.lumber_production() * PRODUCTION_EVENT_SECS as f64;
            self.events.push(
                Event::new(EventName::Wood, EventCategory::Production, credit, interval, now),
                now,
            );
        }
        self.starving();
    }

    /// Famine check. Once food has sunk past the threshold the settlement
    /// loses one head, and if every remaining head is employed the larger
    /// workforce bucket is trimmed (tie broken toward lumber).
    pub fn starving(&mut self) {
        if self.food < STARVATION_THRESHOLD {
            self.food = 0.0;
            self.population = self.population.saturating_sub(1);
            if self.harvester + self.lumber > self.population {
                if self.harvester > self.lumber {
                    self.harvester -= 1;
                } else if self.lumber > 0 {
                    self.lumber -= 1;
                }
            }
        }
    }

    /// Second half of the tick. Credits every expired event, advances the
    /// building queue, and accrues one tick of the in-flight wood boost.
    pub fn manage_event(&mut self) {
        let now = self.clock.now();
        let expired: Vec<(EventName, f64)> = self
            .events
            .expired(now)
            .map(|e| (e.name, e.counter))
            .collect();

        if !expired.is_empty() {
            self.events.remove_expired(now);
            for (name, counter) in expired {
                match name {
                    EventName::Food => {
                        self.food = (self.food + counter).min(self.food_limit());
                    }
                    EventName::Wood => {
                        self.wood = (self.wood + counter).min(self.wood_limit());
                    }
                    EventName::WoodPlus => {
                        self.wood = (self.wood + counter).min(self.wood_limit());
                        self.events.push(
                            Event::new(
                                EventName::WoodPlusDebuff,
                                EventCategory::Debuff,
                                0.0,
                                Duration::seconds(WOOD_PLUS_DEBUFF_SECS),
                                now,
                            ),
                            now,
                        );
                    }
                    EventName::WoodPlusDebuff => {}
                    EventName::House => self.house += 1,
                    EventName::Granary => self.granary += 1,
                    EventName::Storage => self.storage += 1,
                }
            }
        }

        if self.events.exists(EventName::WoodPlus) {
            self.event_wood_plus_production(0, 1);
        }
    }

    // -----------------------------------------------------------------------
    // Click actions
    // -----------------------------------------------------------------------

    /// Food from one gather click at the current harvester count.
    fn food_click_value(&self) -> f64 {
        FOOD_CLICK_BASE + (self.harvester as f64).powf(1.5)
    }

    /// The central gather click. Returns the click value; credits it only
    /// when not a dry run and no wood boost is in progress (the two gather
    /// actions are mutually exclusive).
    pub fn food_gathering(&mut self, dry_run: bool) -> f64 {
        let value = self.food_click_value();
        if !dry_run && !self.events.exists(EventName::WoodPlus) {
            self.food = (self.food + value).min(self.food_limit());
        }
        value
    }

    /// The wood gather click. Starts a timed boost, or speeds up the one in
    /// progress: each extra click credits two seconds of accrual and shaves
    /// two seconds off the wait. Fully blocked during the cooldown debuff.
    pub fn wood_gathering(&mut self) {
        if self.events.exists(EventName::WoodPlusDebuff) {
            return;
        }
        if self.events.exists(EventName::WoodPlus) {
            self.event_wood_plus_production(WOOD_PLUS_CLICK_SECS, 0);
            if let Some(event) = self.events.get_mut(EventName::WoodPlus) {
                event.subtract_time(Duration::seconds(WOOD_PLUS_CLICK_SECS));
            }
        } else {
            let now = self.clock.now();
            let wait = Duration::seconds(WOOD_PLUS_BASE_SECS + self.lumber as i64);
            self.events.push(
                Event::new(EventName::WoodPlus, EventCategory::Resource, 0.0, wait, now),
                now,
            );
        }
    }

    /// Accrue wood-boost reward for elapsed `seconds` plus loose `ticks`.
    /// The rate follows the *current* lumber production, so reassigning
    /// workers mid-countdown changes the eventual payout.
    pub fn event_wood_plus_production(&mut self, seconds: i64, ticks: u32) {
        if !self.events.exists(EventName::WoodPlus) {
            return;
        }
        let rate = 1.0 + round3(self.lumber_production() * WOOD_PLUS_RATE_FACTOR);
        let mult = seconds as f64 * TICKS_PER_SECOND + ticks as f64;
        if let Some(event) = self.events.get_mut(EventName::WoodPlus) {
            event.add_counter(mult * rate);
        }
    }

    // -----------------------------------------------------------------------
    // Population management
    // -----------------------------------------------------------------------

    /// Buy up to `count` heads of population, one at a time. Each purchase
    /// requires the escalating food cost and free housing; the first
    /// unaffordable head stops nothing (later iterations simply no-op).
    pub fn increment_population(&mut self, count: u32) {
        for _ in 0..count {
            let cost = self.population_cost();
            if self.food >= cost && self.population < self.population_limit() {
                self.food -= cost;
                self.population += 1;
            }
        }
    }

    /// Assign up to `count` unemployed heads to harvesting.
    pub fn increment_harvester(&mut self, count: u32) {
        for _ in 0..count {
            if self.unemployed() > 0 {
                self.harvester += 1;
            }
        }
    }

    /// Unassign up to `count` harvesters.
    pub fn decrement_harvester(&mut self, count: u32) {
        for _ in 0..count {
            if self.harvester > 0 {
                self.harvester -= 1;
            }
        }
    }

    /// Assign up to `count` unemployed heads to lumber. Each head moved
    /// extends an in-flight wood boost by one second.
    pub fn increment_lumber(&mut self, count: u32) {
        for _ in 0..count {
            if self.unemployed() > 0 {
                self.lumber += 1;
                if let Some(event) = self.events.get_mut(EventName::WoodPlus) {
                    event.add_time(Duration::seconds(1));
                }
            }
        }
    }

    /// Unassign up to `count` lumberers, shortening an in-flight wood boost
    /// by one second per head.
    pub fn decrement_lumber(&mut self, count: u32) {
        for _ in 0..count {
            if self.lumber > 0 {
                self.lumber -= 1;
                if let Some(event) = self.events.get_mut(EventName::WoodPlus) {
                    event.subtract_time(Duration::seconds(1));
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Building purchases
    // -----------------------------------------------------------------------

    fn purchase_building(&mut self, name: EventName, cost: f64, build_time: Duration, check: bool) {
        if !check
            || self.wood < cost
            || self.events.count_category(EventCategory::Building) >= MAX_BUILD_SLOTS
        {
            return;
        }
        self.wood -= cost;
        let now = self.clock.now();
        self.events.push(
            Event::new(name, EventCategory::Building, 0.0, build_time, now),
            now,
        );
    }

    /// Queue a house. `check` is the caller's go-ahead (the UI's
    /// affordability gate); the engine still enforces wood and slot limits.
    pub fn increment_house(&mut self, check: bool) {
        let cost = self.house_cost();
        let build_time = self.house_build_time();
        self.purchase_building(EventName::House, cost, build_time, check);
    }

    /// Queue a granary; each one built raises the food capacity.
    pub fn increment_granary(&mut self, check: bool) {
        let cost = self.granary_cost();
        let build_time = self.granary_build_time();
        self.purchase_building(EventName::Granary, cost, build_time, check);
    }

    /// Queue a storage; each one built raises the wood capacity.
    pub fn increment_storage(&mut self, check: bool) {
        let cost = self.storage_cost();
        let build_time = self.storage_build_time();
        self.purchase_building(EventName::Storage, cost, build_time, check);
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Stamp the current instant as the last save time. Call right before
    /// [`serialize`](Self::serialize).
    pub fn save_current_time(&mut self) {
        self.last_saved = Some(self.clock.now());
    }

    /// Encode the full state as the JSON save blob.
    pub fn serialize(&self) -> Result<String, SaveError> {
        serialize::to_json(self)
    }

    /// Decode a save blob on the system clock. Any malformed or missing
    /// field yields a fresh zero-state game; errors never surface.
    pub fn deserialize(json: &str) -> Game {
        Self::deserialize_with_clock(json, Box::new(SystemClock))
    }

    /// Decode a save blob on the given clock, applying offline catch-up.
    pub fn deserialize_with_clock(json: &str, clock: Box<dyn Clock>) -> Game {
        match serialize::decode(json) {
            Ok(state) => {
                let mut game = Game {
                    population: state.population,
                    harvester: state.harvester,
                    lumber: state.lumber,
                    food: state.food,
                    wood: state.wood,
                    house: state.house,
                    granary: state.granary,
                    storage: state.storage,
                    last_saved: state.last_saved,
                    events: state.events,
                    clock,
                };
                game.catch_up();
                game
            }
            Err(_) => Game::with_clock(clock),
        }
    }

    /// One-shot offline credit, applied exactly once after reconstruction
    /// from persisted data: capped elapsed time at the offline multiplier,
    /// bypassing the event mechanism, then proportional accrual for a
    /// persisted wood boost (bounded by its own end if it expired while
    /// the game was closed).
    pub(crate) fn catch_up(&mut self) {
        let Some(saved) = self.last_saved else {
            return;
        };
        let now = self.clock.now();
        let elapsed = (now - saved).num_seconds().clamp(0, MAX_OFFLINE_SECS);
        let credited = elapsed as f64 * OFFLINE_MULTIPLIER;
        self.food = (self.food + self.harvester_production() * credited).min(self.food_limit());
        self.wood = (self.wood + self.lumber_production() * credited).min(self.wood_limit());

        if let Some(event) = self.events.get(EventName::WoodPlus) {
            let boost_elapsed = if event.is_expired(now) {
                (event.end_time(now) - saved).num_seconds()
            } else {
                (now - saved).num_seconds()
            };
            if boost_elapsed > 0 {
                self.event_wood_plus_production(boost_elapsed, 0);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Formatted getters (consumed by the display layer)
    // -----------------------------------------------------------------------

    pub fn format_food(&self) -> String {
        format_number(self.food, Precision::Low)
    }

    pub fn format_wood(&self) -> String {
        format_number(self.wood, Precision::Low)
    }

    pub fn format_population(&self) -> String {
        format_number(self.population as f64, Precision::Low)
    }

    pub fn format_harvester(&self) -> String {
        format_number(self.harvester as f64, Precision::Low)
    }

    pub fn format_lumber(&self) -> String {
        format_number(self.lumber as f64, Precision::Low)
    }

    pub fn format_harvester_production(&self) -> String {
        format!(
            "{}/s",
            format_number(self.harvester_production(), Precision::High)
        )
    }

    pub fn format_lumber_production(&self) -> String {
        format!(
            "{}/s",
            format_number(self.lumber_production(), Precision::High)
        )
    }

    /// Preview of the gather click, without mutating anything.
    pub fn format_food_gathering(&self) -> String {
        format_number(self.food_click_value(), Precision::High)
    }

    pub fn format_population_cost(&self) -> String {
        format_number(self.population_cost(), Precision::Low)
    }

    pub fn format_population_limit(&self) -> String {
        format_number(self.population_limit() as f64, Precision::Low)
    }

    /// `<build time> - <cost>` label for the house purchase button.
    pub fn format_house_cost(&self) -> String {
        format!(
            "{} - {}",
            format_duration(self.house_build_time()),
            format_number(self.house_cost(), Precision::Low)
        )
    }

    pub fn format_granary_cost(&self) -> String {
        format!(
            "{} - {}",
            format_duration(self.granary_build_time()),
            format_number(self.granary_cost(), Precision::Low)
        )
    }

    pub fn format_storage_cost(&self) -> String {
        format!(
            "{} - {}",
            format_duration(self.storage_build_time()),
            format_number(self.storage_cost(), Precision::Low)
        )
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
