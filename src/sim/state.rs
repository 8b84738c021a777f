//! Session state and core simulation types
//!
//! One `GameState` per session, reset wholesale on restart. The stepping
//! functions in `tick` take it by reference; nothing here is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Cooperative pause: ticks are skipped, nothing advances
    Paused,
    /// Session ended; irreversible until an explicit reset
    GameOver,
}

/// The player entity
///
/// Position is the bottom-left corner of the bounding box; y is measured
/// upward from the viewport floor, so positive velocity means rising.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub pos: Vec2,
    pub velocity_y: f32,
}

impl Player {
    fn at_start() -> Self {
        Self {
            pos: Vec2::new(GAME_WIDTH / 2.0 - PLAYER_SIZE / 2.0, PLAYER_START_Y),
            velocity_y: 0.0,
        }
    }

    /// Top of the bounding box
    pub fn top(&self) -> f32 {
        self.pos.y + PLAYER_SIZE
    }
}

/// A platform row; dimensions are fixed by `consts`
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub pos: Vec2,
}

impl Platform {
    /// Height the player snaps to when landing
    pub fn top(&self) -> f32 {
        self.pos.y + PLATFORM_HEIGHT
    }
}

/// A collectible coin; destroyed on pickup or when scrolled off-screen
#[derive(Debug, Clone, Copy)]
pub struct Coin {
    pub pos: Vec2,
}

/// Output signals produced by the simulation and drained by the
/// presentation layer. The simulation never renders or plays audio itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// First successful landing of the session
    Started,
    /// Tick loop suspended
    Paused,
    /// Tick loop re-entered
    Resumed,
    /// Landed on a platform and auto-bounced
    Bounced,
    /// Picked up a coin
    CoinCollected { value: u32 },
    /// The world scrolled down past the climb threshold
    Climbed,
    /// Session ended; carries the final score
    Ended { score: u32 },
}

/// Complete per-session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Session RNG; drives platform placement and coin rolls
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Live platform pool, ordered by creation
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub score: u32,
    /// Latched true on the first landing; never reverts within a session
    pub started: bool,
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session: player at the start position, the guaranteed
    /// platform underneath, and the initial ladder above it.
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            player: Player::at_start(),
            platforms: Vec::new(),
            coins: Vec::new(),
            score: 0,
            started: false,
            time_ticks: 0,
            events: Vec::new(),
        };
        super::worldgen::seed_world(&mut state);
        state
    }

    /// Destructive restart: discard all live entities and re-seed
    pub fn reset(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_layout() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.started);
        assert_eq!(state.score, 0);
        assert_eq!(state.platforms.len(), MIN_PLATFORMS);
        // Guaranteed starting platform sits centered under the player
        let first = state.platforms[0];
        assert_eq!(first.pos.x, GAME_WIDTH / 2.0 - PLATFORM_WIDTH / 2.0);
        assert_eq!(first.pos.y, INITIAL_BASE_Y);
        assert_eq!(state.player.pos.y, PLAYER_START_Y);
    }

    #[test]
    fn test_reset_discards_session() {
        let mut state = GameState::new(7);
        state.score = 42;
        state.started = true;
        state.phase = GamePhase::GameOver;
        state.reset(8);
        assert_eq!(state.score, 0);
        assert!(!state.started);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_drain_events_empties_buffer() {
        let mut state = GameState::new(7);
        state.push_event(GameEvent::Climbed);
        assert_eq!(state.drain_events(), vec![GameEvent::Climbed]);
        assert!(state.drain_events().is_empty());
    }
}
