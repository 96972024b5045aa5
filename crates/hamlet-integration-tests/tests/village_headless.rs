//! Headless playthroughs of the village engine.
//!
//! Each test drives the full public surface the way the presentation loop
//! would: user actions between frames, one `autominer` + `manage_event` tick
//! per frame, and a manual clock advanced 100 ms at a time. Cross-cutting
//! behavior (clicking into production, construction into capacity, saves
//! into offline catch-up) is exercised end to end rather than per module.

use chrono::Duration;
use hamlet_core::engine::Game;
use hamlet_core::event::{EventCategory, EventName};
use hamlet_core::test_utils::*;

/// From nothing to a working harvester economy, by hand.
#[test]
fn early_game_playthrough() {
    let (mut game, clock) = game_at_epoch();

    // Five bare-handed clicks fund the first head of population.
    for _ in 0..5 {
        game.food_gathering(false);
    }
    assert_eq!(game.food(), 50.0);

    game.increment_population(1);
    assert_eq!(game.population(), 1);
    assert_eq!(game.food(), 0.0);

    game.increment_harvester(1);
    assert_eq!(game.unemployed(), 0);

    // Ten seconds of idle play: one harvester nets 0.9 food per second,
    // landing in whole-second credits.
    run_frames(&mut game, &clock, 100);
    let rate = 1f64.powf(1.05) - 0.1;
    assert!(game.food() >= rate * 8.0 && game.food() <= rate * 10.0);

    // The harvester also sweetens the manual click.
    assert_eq!(game.food_gathering(true), 11.0);
}

/// Queue every building type, hit the slot cap, and collect the capacity
/// payoffs as the queue drains in purchase order.
#[test]
fn construction_program_to_slot_cap() {
    let clock = ManualClock::new(epoch());
    let mut game = GameBuilder::new().wood(20_000.0).build(&clock);

    game.increment_house(true);
    game.increment_granary(true);
    game.increment_storage(true);
    assert!((game.wood() - 8_000.0).abs() < 1e-9);

    // All three slots are busy; a fourth order is refused without charge.
    game.increment_house(true);
    assert_eq!(game.events.count_category(EventCategory::Building), 3);
    assert!((game.wood() - 8_000.0).abs() < 1e-9);

    // The house finishes first and unlocks more housing.
    clock.advance(Duration::minutes(1));
    game.manage_event();
    assert_eq!(game.house(), 1);
    assert_eq!(game.population_limit(), 20);

    // The granary's clock only started at its promotion.
    clock.advance(Duration::minutes(2));
    game.manage_event();
    assert_eq!(game.granary(), 1);
    assert_eq!(game.food_limit(), 20_000.0);

    clock.advance(Duration::minutes(3));
    game.manage_event();
    assert_eq!(game.storage(), 1);
    assert_eq!(game.wood_limit(), 20_000.0);
    assert!(game.events.is_empty());

    // With a free slot the second house goes through at the raised price.
    game.increment_house(true);
    assert_eq!(game.events.count(EventName::House), 1);
    assert!((game.wood() - 6_800.0).abs() < 1e-9);
}

/// Save, close the game for ten minutes, reopen, and keep playing.
#[test]
fn save_quit_resume_cycle() {
    let clock = ManualClock::new(epoch());
    let mut game = GameBuilder::new()
        .population(10)
        .harvester(6)
        .lumber(4)
        .food(500.0)
        .wood(500.0)
        .build(&clock);
    game.save_current_time();
    let json = game.serialize().unwrap();

    clock.advance(Duration::seconds(600));
    let mut resumed = Game::deserialize_with_clock(&json, Box::new(clock.clone()));

    // Offline production runs at 90 percent of the live rate.
    let food_rate = 6f64.powf(1.05) - 1.0;
    let wood_rate = 4f64.powf(1.05) * 0.8;
    assert!((resumed.food() - (500.0 + food_rate * 540.0)).abs() < 1e-6);
    assert!((resumed.wood() - (500.0 + wood_rate * 540.0)).abs() < 1e-6);

    // Everything else came back untouched and the game plays on.
    assert_eq!(resumed.population(), 10);
    assert_eq!(resumed.harvester(), 6);
    assert_eq!(resumed.lumber(), 4);

    let before = resumed.food();
    run_frames(&mut resumed, &clock, 50);
    assert!(resumed.food() > before);
}

/// A long absence credits at most one day, however much time has passed.
#[test]
fn week_long_absence_is_capped() {
    let clock = ManualClock::new(epoch());
    let mut game = GameBuilder::new()
        .population(10)
        .harvester(6)
        .lumber(4)
        .granary(49)
        .storage(49)
        .build(&clock);
    game.save_current_time();
    let json = game.serialize().unwrap();

    clock.advance(Duration::days(7));
    let resumed = Game::deserialize_with_clock(&json, Box::new(clock.clone()));

    let food_rate = 6f64.powf(1.05) - 1.0;
    let wood_rate = 4f64.powf(1.05) * 0.8;
    assert!((resumed.food() - food_rate * 86_400.0 * 0.9).abs() < 1e-6);
    assert!((resumed.wood() - wood_rate * 86_400.0 * 0.9).abs() < 1e-6);
    assert!(resumed.food() <= resumed.food_limit());
}

/// The wood boost from first click through payout, cooldown, and restart.
#[test]
fn boost_sprint_full_cycle() {
    let clock = ManualClock::new(epoch());
    let mut game = GameBuilder::new()
        .population(10)
        .lumber(10)
        .build(&clock);

    game.wood_gathering();
    let event = game.events.get(EventName::WoodPlus).unwrap();
    assert_eq!(event.duration, Duration::seconds(130));

    // Two follow-up clicks each bank two seconds of reward and shave two
    // seconds off the wait.
    game.wood_gathering();
    game.wood_gathering();
    let rate = 1.0 + (game.lumber_production() * 0.5 * 1000.0).round() / 1000.0;
    let banked = 2.0 * 2.0 * 10.0 * rate;
    let event = game.events.get(EventName::WoodPlus).unwrap();
    assert_eq!(event.duration, Duration::seconds(126));
    assert!((event.counter - banked).abs() < 1e-9);

    // Food clicks are locked out while the boost runs.
    game.food_gathering(false);
    assert_eq!(game.food(), 0.0);

    // Expiry pays the banked reward and opens the cooldown.
    clock.advance(Duration::seconds(126));
    game.manage_event();
    assert!((game.wood() - banked).abs() < 1e-9);
    assert!(game.events.exists(EventName::WoodPlusDebuff));

    // Clicking into the cooldown does nothing.
    game.wood_gathering();
    assert!(!game.events.exists(EventName::WoodPlus));

    // Once it lapses, a fresh boost can start.
    clock.advance(Duration::seconds(3));
    game.manage_event();
    assert!(!game.events.exists(EventName::WoodPlusDebuff));
    game.wood_gathering();
    assert!(game.events.exists(EventName::WoodPlus));
}

/// An unfed settlement bleeds population until upkeep is sustainable.
#[test]
fn famine_thins_an_idle_settlement() {
    let clock = ManualClock::new(epoch());
    let mut game = GameBuilder::new().population(10).build(&clock);

    // No harvesters: one food per second of pure upkeep. Two minutes of
    // neglect is enough to cross the starvation line at least once.
    run_frames(&mut game, &clock, 1200);

    assert!(game.population() < 10);
    assert!(game.food() > -101.0);
    assert!(game.harvester() + game.lumber() <= game.population());
}

/// A mid-construction save restores the queue with its order intact.
#[test]
fn save_preserves_construction_queue() {
    let clock = ManualClock::new(epoch());
    let mut game = GameBuilder::new().wood(20_000.0).build(&clock);
    game.increment_house(true);
    game.increment_granary(true);
    game.save_current_time();
    let json = game.serialize().unwrap();

    clock.advance(Duration::seconds(30));
    let mut resumed = Game::deserialize_with_clock(&json, Box::new(clock.clone()));

    let queue = resumed.events.building_queue();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].name, EventName::House);
    assert!(queue[0].start.is_some());
    assert_eq!(queue[1].name, EventName::Granary);
    assert!(queue[1].start.is_none());

    // The house still lands on its original schedule.
    clock.advance(Duration::seconds(30));
    resumed.manage_event();
    assert_eq!(resumed.house(), 1);
    assert_eq!(resumed.events.building_queue()[0].name, EventName::Granary);
}
