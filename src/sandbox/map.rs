//! Tile map and terrain generation
//!
//! Row-major grid, y growing downward (screen order). Generation carves a
//! rolling surface line: sky above, a dirt crust, stone underneath, and a
//! sprinkling of coin tiles floating just above ground.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Tile edge length in world units
pub const TILE: f32 = 32.0;
pub const MAP_COLS: usize = 64;
pub const MAP_ROWS: usize = 36;

/// Surface wander band (rows)
const SURFACE_MIN: usize = 16;
const SURFACE_MAX: usize = 24;
/// Dirt crust depth before stone takes over
const CRUST_DEPTH: usize = 3;
/// Chance of a coin tile hovering above the surface, per column
const COIN_TILE_CHANCE: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Dirt,
    Stone,
    Coin,
}

impl Tile {
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Dirt | Tile::Stone)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    rows: Vec<Vec<Tile>>,
}

impl TileMap {
    /// Generate a fresh world from the given RNG.
    pub fn generate(rng: &mut Pcg32) -> Self {
        let mut rows = vec![vec![Tile::Empty; MAP_COLS]; MAP_ROWS];
        let mut surface = (SURFACE_MIN + SURFACE_MAX) / 2;

        for c in 0..MAP_COLS {
            // Let the surface drift one row at a time within its band
            let step: i32 = rng.random_range(-1..=1);
            surface = (surface as i32 + step)
                .clamp(SURFACE_MIN as i32, SURFACE_MAX as i32) as usize;

            for (r, row) in rows.iter_mut().enumerate() {
                if r >= surface + CRUST_DEPTH {
                    row[c] = Tile::Stone;
                } else if r >= surface {
                    row[c] = Tile::Dirt;
                }
            }
            if surface >= 2 && rng.random_bool(COIN_TILE_CHANCE) {
                rows[surface - 2][c] = Tile::Coin;
            }
        }

        Self { rows }
    }

    /// Tile at (row, col); out of bounds reads as Empty.
    pub fn get(&self, r: i32, c: i32) -> Tile {
        if r < 0 || c < 0 {
            return Tile::Empty;
        }
        self.rows
            .get(r as usize)
            .and_then(|row| row.get(c as usize))
            .copied()
            .unwrap_or(Tile::Empty)
    }

    /// Set the tile at (row, col); out of bounds writes are dropped.
    pub fn set(&mut self, r: i32, c: i32, tile: Tile) {
        if r < 0 || c < 0 {
            return;
        }
        if let Some(cell) = self
            .rows
            .get_mut(r as usize)
            .and_then(|row| row.get_mut(c as usize))
        {
            *cell = tile;
        }
    }

    pub fn is_solid_at(&self, r: i32, c: i32) -> bool {
        self.get(r, c).is_solid()
    }

    /// World width/height in world units
    pub fn world_width() -> f32 {
        MAP_COLS as f32 * TILE
    }

    pub fn world_height() -> f32 {
        MAP_ROWS as f32 * TILE
    }
}

/// Resources the player carries between digs and placements
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Inventory {
    pub coins: u32,
    pub dirt: u32,
    pub stone: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        // A few coins to start with, nothing else
        Self {
            coins: 5,
            dirt: 0,
            stone: 0,
        }
    }
}
