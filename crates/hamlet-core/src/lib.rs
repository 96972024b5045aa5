//! Hamlet Core -- the simulation engine for an idle village-builder.
//!
//! This crate owns everything with temporal semantics: per-second worker
//! production, the time-boxed event queue that drives delayed effects
//! (resource boosts, cooldown debuffs, multi-slot building construction),
//! and the JSON save contract including offline-production catch-up. The
//! rendering layer, input polling, and the frame loop live outside and
//! consume the imperative API exposed here.
//!
//! # Per-Frame Pipeline
//!
//! The presentation loop drives the engine once per frame:
//!
//! 1. **Produce** -- [`engine::Game::autominer`] schedules the 1-second
//!    "Food"/"Wood" production events and runs the starvation check.
//! 2. **Settle** -- [`engine::Game::manage_event`] credits every expired
//!    event (production ticks, wood boosts, finished buildings) and accrues
//!    the in-flight wood boost.
//! 3. **Act** -- zero or more user actions (`food_gathering`,
//!    `wood_gathering`, purchases, worker reassignment) run in response to
//!    input.
//! 4. **Persist** -- [`engine::Game::serialize`] produces the save blob on
//!    an interval or on exit.
//!
//! # Key Types
//!
//! - [`engine::Game`] -- all resource/population/building state and every
//!   gameplay operation.
//! - [`event::EventQueue`] -- insertion-ordered collection of time-boxed
//!   [`event::Event`]s with building-queue admission and advancement.
//! - [`clock::Clock`] -- injectable wall-clock source; tests drive a manual
//!   clock, the game ships [`clock::SystemClock`].
//! - [`serialize`] -- save-file schema, JSON encode/decode, and the
//!   fresh-game fallback for malformed saves.

pub mod clock;
pub mod config;
pub mod engine;
pub mod event;
pub mod format;
pub mod serialize;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
