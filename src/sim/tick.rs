//! Simulation tick
//!
//! One tick is a fully synchronous sequence: horizontal move, gravity,
//! landing, coin collection, scroll/purge/replenish, termination check.
//! There is no suspension inside a tick and no work outside it.

use super::state::{GameEvent, GamePhase, GameState};
use super::{collision, worldgen};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move-left is held this tick
    pub move_left: bool,
    /// Move-right is held this tick
    pub move_right: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the session by one tick.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.push_event(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.push_event(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    // Horizontal movement, clamped to the viewport
    if input.move_left {
        state.player.pos.x -= MOVE_SPEED;
    }
    if input.move_right {
        state.player.pos.x += MOVE_SPEED;
    }
    state.player.pos.x = state.player.pos.x.clamp(0.0, GAME_WIDTH - PLAYER_SIZE);

    // Gravity before integration; positive velocity is upward
    state.player.velocity_y -= GRAVITY;
    state.player.pos.y += state.player.velocity_y;

    land(state);
    collect_coins(state);
    maybe_scroll(state);
    check_game_over(state);
}

/// Resolve landings: snap to the platform top and auto-bounce. The bounce
/// sets velocity positive, so once one platform fires the predicate goes
/// false for the rest of the pool this tick.
fn land(state: &mut GameState) {
    let mut player = state.player;
    let mut bounced = false;
    for platform in &state.platforms {
        if collision::lands_on(&player, platform) {
            player.pos.y = platform.top();
            player.velocity_y = LAUNCH_VELOCITY;
            bounced = true;
        }
    }
    state.player = player;

    if bounced {
        if !state.started {
            state.started = true;
            state.push_event(GameEvent::Started);
        }
        state.push_event(GameEvent::Bounced);
    }
}

/// Collect overlapped coins. Reverse index order so removal during
/// iteration is safe; each coin can pay out at most once.
fn collect_coins(state: &mut GameState) {
    for i in (0..state.coins.len()).rev() {
        if collision::touches_coin(&state.player, &state.coins[i]) {
            state.coins.remove(i);
            state.score += COIN_REWARD;
            state.push_event(GameEvent::CoinCollected { value: COIN_REWARD });
        }
    }
}

/// Scroll the world down when the player climbs past the threshold, purge
/// entities that fell below the floor, and top the pool back up.
fn maybe_scroll(state: &mut GameState) {
    if state.player.pos.y <= SCROLL_THRESHOLD {
        return;
    }

    let offset = state.player.pos.y - SCROLL_THRESHOLD;
    state.player.pos.y = SCROLL_THRESHOLD;
    for platform in &mut state.platforms {
        platform.pos.y -= offset;
    }
    for coin in &mut state.coins {
        coin.pos.y -= offset;
    }

    state.platforms.retain(|p| p.pos.y >= 0.0);
    state.coins.retain(|c| c.pos.y >= 0.0);
    worldgen::replenish(state);

    state.score += CLIMB_REWARD;
    state.push_event(GameEvent::Climbed);
}

/// Session termination: only armed once the first landing has happened, so
/// the pre-start free-fall can never end the session.
fn check_game_over(state: &mut GameState) {
    if state.started && state.player.pos.y < 0.0 {
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::Ended { score: state.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    use crate::sim::state::{Coin, Platform};

    /// Tick with no input held
    fn idle(state: &mut GameState) {
        tick(state, &TickInput::default());
    }

    /// A state with a known platform directly under the player and no coins
    fn bare_state() -> GameState {
        let mut state = GameState::new(1);
        state.platforms.clear();
        state.coins.clear();
        state.platforms.push(Platform {
            pos: Vec2::new(GAME_WIDTH / 2.0 - PLATFORM_WIDTH / 2.0, INITIAL_BASE_Y),
        });
        state
    }

    #[test]
    fn test_gravity_integration() {
        let mut state = bare_state();
        state.platforms.clear();
        let y0 = state.player.pos.y;
        idle(&mut state);
        assert_eq!(state.player.velocity_y, -GRAVITY);
        assert_eq!(state.player.pos.y, y0 - GRAVITY);
    }

    #[test]
    fn test_horizontal_clamp() {
        let mut state = bare_state();
        state.player.pos.x = 2.0;
        tick(
            &mut state,
            &TickInput {
                move_left: true,
                ..Default::default()
            },
        );
        assert_eq!(state.player.pos.x, 0.0);

        state.player.pos.x = GAME_WIDTH - PLAYER_SIZE - 2.0;
        tick(
            &mut state,
            &TickInput {
                move_right: true,
                ..Default::default()
            },
        );
        assert_eq!(state.player.pos.x, GAME_WIDTH - PLAYER_SIZE);
    }

    #[test]
    fn test_landing_bounces_and_starts() {
        let mut state = bare_state();
        // Drop the player to just above the platform top, falling
        state.player.pos.y = INITIAL_BASE_Y + PLATFORM_HEIGHT + 4.0;
        state.player.velocity_y = -1.0;
        idle(&mut state);

        assert_eq!(state.player.pos.y, INITIAL_BASE_Y + PLATFORM_HEIGHT);
        assert_eq!(state.player.velocity_y, LAUNCH_VELOCITY);
        assert!(state.started);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Started));
        assert!(events.contains(&GameEvent::Bounced));

        // A second landing later must not re-emit Started
        state.player.pos.y = INITIAL_BASE_Y + PLATFORM_HEIGHT + 4.0;
        state.player.velocity_y = -1.0;
        idle(&mut state);
        let events = state.drain_events();
        assert!(!events.contains(&GameEvent::Started));
        assert!(events.contains(&GameEvent::Bounced));
    }

    #[test]
    fn test_coin_collection_is_idempotent() {
        let mut state = bare_state();
        state.player.velocity_y = LAUNCH_VELOCITY; // keep clear of the platform band
        let at_player = state.player.pos;
        state.coins.push(Coin { pos: at_player });
        state.coins.push(Coin {
            pos: Vec2::new(at_player.x, at_player.y + 400.0),
        });

        idle(&mut state);
        assert_eq!(state.score, COIN_REWARD);
        assert_eq!(state.coins.len(), 1);

        // The collected coin is gone; ticking again cannot pay out twice
        let score_after_first = state.score;
        idle(&mut state);
        assert_eq!(state.score, score_after_first);
    }

    #[test]
    fn test_scroll_shifts_purges_and_replenishes() {
        let mut state = GameState::new(42);
        state.started = true;
        state.coins.clear();
        // Force the player above the threshold by 40 units, moving up so the
        // landing check stays out of the way
        state.player.pos.y = SCROLL_THRESHOLD + 40.0 - LAUNCH_VELOCITY + GRAVITY;
        state.player.velocity_y = LAUNCH_VELOCITY;
        let tops_before: Vec<f32> = state.platforms.iter().map(|p| p.pos.y).collect();
        let score_before = state.score;

        idle(&mut state);

        assert_eq!(state.player.pos.y, SCROLL_THRESHOLD);
        assert_eq!(state.score, score_before + CLIMB_REWARD);
        assert!(state.platforms.len() >= MIN_PLATFORMS);
        assert!(state.platforms.iter().all(|p| p.pos.y >= 0.0));
        assert!(state.coins.iter().all(|c| c.pos.y >= 0.0));
        // Surviving platforms moved down by exactly the excess
        for (before, after) in tops_before.iter().zip(state.platforms.iter()) {
            if *before - 40.0 >= 0.0 {
                assert!((after.pos.y - (before - 40.0)).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_game_over_only_after_started() {
        let mut state = bare_state();
        state.platforms.clear();
        // Free-fall below the floor without ever landing: session keeps going
        state.player.pos.y = 0.2;
        state.player.velocity_y = -5.0;
        idle(&mut state);
        assert!(state.player.pos.y < 0.0);
        assert_eq!(state.phase, GamePhase::Playing);

        // Same fall after a landing has happened: session ends, score frozen
        state.started = true;
        state.score = 17;
        idle(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().contains(&GameEvent::Ended { score: 17 }));

        // Further ticks are no-ops
        let snapshot_y = state.player.pos.y;
        idle(&mut state);
        assert_eq!(state.player.pos.y, snapshot_y);
        assert_eq!(state.score, 17);
    }

    #[test]
    fn test_pause_resume() {
        let mut state = bare_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let y = state.player.pos.y;

        // Paused ticks advance nothing
        idle(&mut state);
        assert_eq!(state.player.pos.y, y);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_first_landing_scenario() {
        // Land on the starting platform, then remove every platform and let
        // the player fall out: the session must end with the score frozen.
        let mut state = GameState::new(9);
        state.coins.clear();
        for _ in 0..600 {
            idle(&mut state);
            if state.started {
                break;
            }
        }
        assert!(state.started, "player never landed");
        assert_eq!(state.player.velocity_y, LAUNCH_VELOCITY);

        state.platforms.clear();
        state.player.pos.x = 0.0;
        let score = state.score;
        for _ in 0..600 {
            idle(&mut state);
            if state.is_over() {
                break;
            }
        }
        assert!(state.is_over());
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput::default(),
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
        ];

        let mut a = GameState::new(777);
        let mut b = GameState::new(777);
        for i in 0..2_000 {
            let input = inputs[i % inputs.len()];
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.platforms.len(), b.platforms.len());
        for (pa, pb) in a.platforms.iter().zip(&b.platforms) {
            assert_eq!(pa.pos, pb.pos);
        }
    }

    proptest! {
        #[test]
        fn prop_gravity_step(y in 150.0f32..280.0, v in -10.0f32..-0.1) {
            // Below the platform band and the scroll threshold, a free-fall
            // tick is exactly gravity then integration
            let mut state = bare_state();
            state.platforms.clear();
            state.player.pos.y = y;
            state.player.velocity_y = v;
            idle(&mut state);
            prop_assert_eq!(state.player.velocity_y, v - GRAVITY);
            prop_assert_eq!(state.player.pos.y, y + (v - GRAVITY));
        }

        #[test]
        fn prop_scroll_maintenance(excess in 0.1f32..200.0, seed in 0u64..64) {
            let mut state = GameState::new(seed);
            state.player.pos.y = SCROLL_THRESHOLD + excess;
            state.player.velocity_y = 0.0;
            maybe_scroll(&mut state);
            prop_assert_eq!(state.player.pos.y, SCROLL_THRESHOLD);
            prop_assert!(state.platforms.len() >= MIN_PLATFORMS);
            prop_assert!(state.platforms.iter().all(|p| p.pos.y >= 0.0));
            prop_assert!(state.coins.iter().all(|c| c.pos.y >= 0.0));
        }
    }
}
