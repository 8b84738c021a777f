//! Don't Fall - an endless auto-bounce jumper
//!
//! Core modules:
//! - `sim`: Deterministic jumper simulation (world generation, physics, scroll)
//! - `sandbox`: Tile sandbox mode (chunked world window, dig/place, snapshots)
//! - `platform`: Key-value storage abstraction
//! - `persistence`: Versioned snapshot envelope for the sandbox world
//! - `highscores` / `settings`: Small persisted values

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sandbox;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical viewport the jumper simulation runs in
    pub const GAME_WIDTH: f32 = 360.0;
    pub const GAME_HEIGHT: f32 = 530.0;

    /// Player bounding box (square) and starting height
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_START_Y: f32 = 150.0;
    /// Horizontal movement per tick while a direction is held
    pub const MOVE_SPEED: f32 = 6.0;

    /// Platform dimensions
    pub const PLATFORM_WIDTH: f32 = 120.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    /// The live pool is topped back up to this count after every scroll
    pub const MIN_PLATFORMS: usize = 6;

    /// Coin bounding box (square) and its offset from the platform origin
    pub const COIN_SIZE: f32 = 20.0;
    pub const COIN_OFFSET_X: f32 = 50.0;
    pub const COIN_OFFSET_Y: f32 = 25.0;
    /// Probability that a freshly spawned platform carries a coin
    pub const COIN_CHANCE: f64 = 0.5;

    /// Downward acceleration per tick (positive velocity = upward)
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity granted by landing on a platform
    pub const LAUNCH_VELOCITY: f32 = 12.0;
    /// Player height above which the world scrolls down
    pub const SCROLL_THRESHOLD: f32 = 300.0;

    /// Score awards
    pub const COIN_REWARD: u32 = 10;
    pub const CLIMB_REWARD: u32 = 1;

    /// Height of the guaranteed starting platform
    pub const INITIAL_BASE_Y: f32 = 100.0;
    /// Vertical spacing of the initial ladder rows
    pub const INITIAL_STEP: f32 = 90.0;
    /// Replenishment gap: base plus up to `GAP_JITTER` extra
    pub const GAP_BASE: f32 = 80.0;
    pub const GAP_JITTER: f32 = 20.0;

    /// Landing probe: how far below the player's bottom edge we look
    pub const LANDING_PROBE: f32 = 5.0;
}
