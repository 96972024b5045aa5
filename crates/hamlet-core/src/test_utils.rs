//! Shared test helpers for unit, integration, and scenario tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so the helpers
//! are available to this crate's tests and, via the `test-utils` feature,
//! to the workspace integration-test crate.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::clock::Clock;
use crate::engine::Game;

// ===========================================================================
// Manual clock
// ===========================================================================

/// A hand-cranked clock. Clones share the same instant, so tests keep one
/// handle and advance it while the engine owns a boxed clone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Rc<Cell<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            current: Rc::new(Cell::new(start)),
        }
    }

    /// Move time forward (or backward, with a negative duration).
    pub fn advance(&self, amount: Duration) {
        self.current.set(self.current.get() + amount);
    }

    pub fn set(&self, instant: NaiveDateTime) {
        self.current.set(instant);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.current.get()
    }
}

/// A fixed reference instant for tests.
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Fresh game on a manual clock at [`epoch`]. Returns the clock handle the
/// test advances.
pub fn game_at_epoch() -> (Game, ManualClock) {
    let clock = ManualClock::new(epoch());
    let game = Game::with_clock(Box::new(clock.clone()));
    (game, clock)
}

// ===========================================================================
// Scenario builder
// ===========================================================================

/// Seeds a game into an arbitrary reachable state without replaying the
/// grind that would produce it.
#[derive(Debug, Default)]
pub struct GameBuilder {
    population: u32,
    harvester: u32,
    lumber: u32,
    food: f64,
    wood: f64,
    house: u32,
    granary: u32,
    storage: u32,
    last_saved: Option<NaiveDateTime>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn population(mut self, value: u32) -> Self {
        self.population = value;
        self
    }

    pub fn harvester(mut self, value: u32) -> Self {
        self.harvester = value;
        self
    }

    pub fn lumber(mut self, value: u32) -> Self {
        self.lumber = value;
        self
    }

    pub fn food(mut self, value: f64) -> Self {
        self.food = value;
        self
    }

    pub fn wood(mut self, value: f64) -> Self {
        self.wood = value;
        self
    }

    pub fn house(mut self, value: u32) -> Self {
        self.house = value;
        self
    }

    pub fn granary(mut self, value: u32) -> Self {
        self.granary = value;
        self
    }

    pub fn storage(mut self, value: u32) -> Self {
        self.storage = value;
        self
    }

    pub fn last_saved(mut self, instant: NaiveDateTime) -> Self {
        self.last_saved = Some(instant);
        self
    }

    /// Build on the given manual clock.
    pub fn build(self, clock: &ManualClock) -> Game {
        let mut game = Game::with_clock(Box::new(clock.clone()));
        game.population = self.population;
        game.harvester = self.harvester;
        game.lumber = self.lumber;
        game.food = self.food;
        game.wood = self.wood;
        game.house = self.house;
        game.granary = self.granary;
        game.storage = self.storage;
        game.last_saved = self.last_saved;
        game
    }
}

// ===========================================================================
// Frame driving
// ===========================================================================

/// One engine tick: the exact call order the presentation loop uses.
pub fn tick(game: &mut Game) {
    game.autominer();
    game.manage_event();
}

/// Run `count` frames at the nominal frame rate, advancing the clock
/// 100 ms per frame.
pub fn run_frames(game: &mut Game, clock: &ManualClock, count: u32) {
    for _ in 0..count {
        clock.advance(Duration::milliseconds(100));
        tick(game);
    }
}
