//! Deterministic jumper simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Fixed tick order (move, gravity, landing, coins, scroll, termination)
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use collision::{aabb_overlap, lands_on, touches_coin};
pub use state::{Coin, GameEvent, GamePhase, GameState, Platform, Player};
pub use tick::{TickInput, tick};
pub use worldgen::{replenish, seed_world, spawn_platform};
