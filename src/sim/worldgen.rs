//! Procedural world generation
//!
//! Platforms form a ladder above the starting row. Each spawn rolls for a
//! coin centered on the platform. Replenishment keeps vertical gaps inside
//! [GAP_BASE, GAP_BASE + GAP_JITTER] so every row stays reachable from the
//! auto-bounce.

use glam::Vec2;
use rand::Rng;

use super::state::{Coin, GameState, Platform};
use crate::consts::*;

/// Spawn one platform at the given position, rolling for an attached coin.
/// At most one coin per platform.
pub fn spawn_platform(state: &mut GameState, x: f32, y: f32) {
    state.platforms.push(Platform {
        pos: Vec2::new(x, y),
    });
    if state.rng.random_bool(COIN_CHANCE) {
        state.coins.push(Coin {
            pos: Vec2::new(x + COIN_OFFSET_X, y + COIN_OFFSET_Y),
        });
    }
}

/// Build the starting ladder: a guaranteed platform centered under the
/// player, plus rows above it at fixed vertical steps and random x.
pub fn seed_world(state: &mut GameState) {
    spawn_platform(
        state,
        GAME_WIDTH / 2.0 - PLATFORM_WIDTH / 2.0,
        INITIAL_BASE_Y,
    );
    for i in 1..MIN_PLATFORMS {
        let x = state.rng.random_range(0.0..GAME_WIDTH - PLATFORM_WIDTH);
        spawn_platform(state, x, i as f32 * INITIAL_STEP + INITIAL_BASE_Y);
    }
}

/// Top the pool back up after a purge. Each new row sits a randomized gap
/// above the most recently created platform.
pub fn replenish(state: &mut GameState) {
    while state.platforms.len() < MIN_PLATFORMS {
        let last_y = state.platforms.last().map(|p| p.pos.y).unwrap_or(0.0);
        let y = last_y + GAP_BASE + state.rng.random_range(0.0..GAP_JITTER);
        let x = state.rng.random_range(0.0..GAME_WIDTH - PLATFORM_WIDTH);
        spawn_platform(state, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_world_ladder_spacing() {
        let state = GameState::new(1234);
        assert_eq!(state.platforms.len(), MIN_PLATFORMS);
        for (i, p) in state.platforms.iter().enumerate().skip(1) {
            assert_eq!(p.pos.y, i as f32 * INITIAL_STEP + INITIAL_BASE_Y);
            assert!(p.pos.x >= 0.0);
            assert!(p.pos.x <= GAME_WIDTH - PLATFORM_WIDTH);
        }
    }

    #[test]
    fn test_replenish_gap_bounds() {
        let mut state = GameState::new(99);
        // Simulate a heavy purge: keep one survivor
        state.platforms.truncate(1);
        state.coins.clear();
        replenish(&mut state);
        assert_eq!(state.platforms.len(), MIN_PLATFORMS);
        for pair in state.platforms.windows(2) {
            let gap = pair[1].pos.y - pair[0].pos.y;
            assert!(gap >= GAP_BASE, "gap {gap} below minimum");
            assert!(gap <= GAP_BASE + GAP_JITTER, "gap {gap} above maximum");
        }
    }

    #[test]
    fn test_replenish_noop_when_full() {
        let mut state = GameState::new(99);
        let before = state.platforms.len();
        replenish(&mut state);
        assert_eq!(state.platforms.len(), before);
    }

    #[test]
    fn test_coins_sit_on_their_platform() {
        // Spawn many platforms and verify every coin matches one at the
        // fixed offset
        let mut state = GameState::new(555);
        state.platforms.clear();
        state.coins.clear();
        for i in 0..200 {
            let x = state.rng.random_range(0.0..GAME_WIDTH - PLATFORM_WIDTH);
            spawn_platform(&mut state, x, i as f32 * 85.0);
        }
        assert!(!state.coins.is_empty());
        assert!(state.coins.len() < state.platforms.len());
        for coin in &state.coins {
            let attached = state.platforms.iter().any(|p| {
                (coin.pos.x - (p.pos.x + COIN_OFFSET_X)).abs() < f32::EPSILON
                    && (coin.pos.y - (p.pos.y + COIN_OFFSET_Y)).abs() < f32::EPSILON
            });
            assert!(attached);
        }
    }
}
