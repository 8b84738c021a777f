//! Tile sandbox mode
//!
//! A small side-view sandbox on top of the chunked tile map: run, jump,
//! dig and place tiles, collect coins, stay away from the wanderer. World
//! state is snapshottable and resumable through `persistence`.
//!
//! Unlike the jumper, y grows downward here (screen order), matching the
//! tile grid.

pub mod chunks;
pub mod map;

pub use chunks::{CHUNK_SIZE, ChunkKey, ChunkWindow, Rect};
pub use map::{Inventory, MAP_COLS, MAP_ROWS, TILE, Tile, TileMap};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Player bounding box
pub const PLAYER_W: f32 = 20.0;
pub const PLAYER_H: f32 = 36.0;
/// Run speed and jump impulse (world units per second)
pub const RUN_SPEED: f32 = 150.0;
pub const JUMP_IMPULSE: f32 = 420.0;
/// Downward acceleration; y grows downward in the sandbox
pub const GRAVITY: f32 = 900.0;

pub const ENEMY_SIZE: f32 = 18.0;
pub const ENEMY_SPEED: f32 = 40.0;

/// Spawn tile for the player (col, row)
pub const SPAWN_TILE: (i32, i32) = (3, 3);
pub const MAX_HEALTH: u32 = 5;
/// Score lost when health runs out
pub const DEATH_PENALTY: u32 = 5;
/// Seconds of invulnerability after a hit
pub const HURT_COOLDOWN: f32 = 1.0;
/// Chance a dug tile leaves a coin behind
pub const COIN_DROP_CHANCE: f64 = 0.25;

/// Camera view size in tiles
pub const VIEW_COLS: f32 = 20.0;
pub const VIEW_ROWS: f32 = 12.0;

/// Input for one sandbox step
#[derive(Debug, Clone, Copy, Default)]
pub struct SandboxInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Dig at this world position
    pub dig: Option<(f32, f32)>,
    /// Place this tile at this world position
    pub place: Option<(f32, f32, Tile)>,
}

/// Signals for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxEvent {
    CoinCollected,
    Dug(Tile),
    Placed(Tile),
    Hurt { health: u32 },
    Respawned,
}

#[derive(Debug, Clone, Copy)]
pub struct SandboxPlayer {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: u32,
    pub grounded: bool,
}

impl SandboxPlayer {
    fn at_spawn() -> Self {
        Self {
            pos: Vec2::new(SPAWN_TILE.0 as f32 * TILE, SPAWN_TILE.1 as f32 * TILE),
            vel: Vec2::ZERO,
            health: MAX_HEALTH,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.pos.x,
            y: self.pos.y,
            w: PLAYER_W,
            h: PLAYER_H,
        }
    }
}

/// The wanderer: paces horizontally, flips at walls and edges
#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub dir: f32,
}

impl Enemy {
    fn at_spawn() -> Self {
        Self {
            pos: Vec2::new(12.0 * TILE, 8.0 * TILE),
            vel: Vec2::ZERO,
            dir: 1.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.pos.x,
            y: self.pos.y,
            w: ENEMY_SIZE,
            h: ENEMY_SIZE,
        }
    }
}

/// Resumable world state: everything persisted across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub map: TileMap,
    pub score: u32,
    pub inventory: Inventory,
}

/// Complete sandbox state
#[derive(Debug)]
pub struct SandboxState {
    pub map: TileMap,
    pub window: ChunkWindow,
    pub player: SandboxPlayer,
    pub enemy: Enemy,
    pub score: u32,
    pub inventory: Inventory,
    hurt_timer: f32,
    rng: Pcg32,
    events: Vec<SandboxEvent>,
}

impl SandboxState {
    /// Fresh world from a seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let map = TileMap::generate(&mut rng);
        Self::with_parts(map, 0, Inventory::default(), rng)
    }

    /// Resume from a persisted snapshot
    pub fn from_snapshot(snapshot: Snapshot, seed: u64) -> Self {
        Self::with_parts(
            snapshot.map,
            snapshot.score,
            snapshot.inventory,
            Pcg32::seed_from_u64(seed),
        )
    }

    fn with_parts(map: TileMap, score: u32, inventory: Inventory, rng: Pcg32) -> Self {
        let mut state = Self {
            map,
            window: ChunkWindow::new(),
            player: SandboxPlayer::at_spawn(),
            enemy: Enemy::at_spawn(),
            score,
            inventory,
            hurt_timer: 0.0,
            rng,
            events: Vec::new(),
        };
        let cam = state.camera();
        state.window.refresh(&state.map, &cam);
        state
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            map: self.map.clone(),
            score: self.score,
            inventory: self.inventory,
        }
    }

    pub fn drain_events(&mut self) -> Vec<SandboxEvent> {
        std::mem::take(&mut self.events)
    }

    /// Camera rectangle centered on the player, clamped to the world
    pub fn camera(&self) -> Rect {
        let w = VIEW_COLS * TILE;
        let h = VIEW_ROWS * TILE;
        let x = (self.player.pos.x + PLAYER_W / 2.0 - w / 2.0)
            .clamp(0.0, (TileMap::world_width() - w).max(0.0));
        let y = (self.player.pos.y + PLAYER_H / 2.0 - h / 2.0)
            .clamp(0.0, (TileMap::world_height() - h).max(0.0));
        Rect { x, y, w, h }
    }

    /// Advance the sandbox by `dt` seconds.
    pub fn step(&mut self, input: &SandboxInput, dt: f32) {
        let cam = self.camera();
        self.window.refresh(&self.map, &cam);

        self.step_player(input, dt);
        self.collect_coins();

        if let Some((wx, wy)) = input.dig {
            self.dig_at(wx, wy);
        }
        if let Some((wx, wy, tile)) = input.place {
            self.place_at(wx, wy, tile);
        }

        self.step_enemy(dt);
        self.check_contact(dt);
    }

    fn step_player(&mut self, input: &SandboxInput, dt: f32) {
        let mut vx = 0.0;
        if input.left {
            vx -= RUN_SPEED;
        }
        if input.right {
            vx += RUN_SPEED;
        }
        self.player.vel.x = vx;

        if input.jump && self.player.grounded {
            self.player.vel.y = -JUMP_IMPULSE;
        }
        self.player.vel.y += GRAVITY * dt;

        let mut rect = self.player.rect();
        let dx = self.player.vel.x * dt;
        let dy = self.player.vel.y * dt;

        // Axis-separated resolution against the active chunk colliders
        rect.x += dx;
        for col in self.colliders_around(&rect) {
            if rect.overlaps(&col) {
                rect.x = if dx > 0.0 { col.x - rect.w } else { col.x + col.w };
            }
        }
        rect.x = rect.x.clamp(0.0, TileMap::world_width() - rect.w);

        rect.y += dy;
        self.player.grounded = false;
        for col in self.colliders_around(&rect) {
            if rect.overlaps(&col) {
                if dy > 0.0 {
                    rect.y = col.y - rect.h;
                    self.player.grounded = true;
                } else {
                    rect.y = col.y + col.h;
                }
                self.player.vel.y = 0.0;
            }
        }
        let floor = TileMap::world_height() - rect.h;
        if rect.y >= floor {
            rect.y = floor;
            self.player.grounded = true;
            self.player.vel.y = 0.0;
        }
        rect.y = rect.y.max(0.0);

        self.player.pos = Vec2::new(rect.x, rect.y);
    }

    fn colliders_around(&self, rect: &Rect) -> Vec<Rect> {
        let probe = Rect {
            x: rect.x - TILE,
            y: rect.y - TILE,
            w: rect.w + 2.0 * TILE,
            h: rect.h + 2.0 * TILE,
        };
        self.window.colliders_hitting(&probe).copied().collect()
    }

    /// Coin tiles overlapped by the player turn into score and inventory
    fn collect_coins(&mut self) {
        let rect = self.player.rect();
        let r0 = (rect.y / TILE).floor() as i32;
        let r1 = ((rect.y + rect.h) / TILE).floor() as i32;
        let c0 = (rect.x / TILE).floor() as i32;
        let c1 = ((rect.x + rect.w) / TILE).floor() as i32;
        for r in r0..=r1 {
            for c in c0..=c1 {
                if self.map.get(r, c) == Tile::Coin {
                    self.map.set(r, c, Tile::Empty);
                    self.window.invalidate(&self.map, r, c);
                    self.score += 1;
                    self.inventory.coins += 1;
                    self.events.push(SandboxEvent::CoinCollected);
                }
            }
        }
    }

    /// Dig the tile at a world position. Solid tiles go into the inventory;
    /// a dug cell sometimes leaves a coin behind.
    pub fn dig_at(&mut self, wx: f32, wy: f32) -> bool {
        let (r, c) = tile_at(wx, wy);
        let tile = self.map.get(r, c);
        if !tile.is_solid() {
            return false;
        }
        match tile {
            Tile::Dirt => self.inventory.dirt += 1,
            Tile::Stone => self.inventory.stone += 1,
            _ => {}
        }
        let replacement = if self.rng.random_bool(COIN_DROP_CHANCE) {
            Tile::Coin
        } else {
            Tile::Empty
        };
        self.map.set(r, c, replacement);
        self.window.invalidate(&self.map, r, c);
        self.events.push(SandboxEvent::Dug(tile));
        true
    }

    /// Place a tile from the inventory into an empty cell.
    pub fn place_at(&mut self, wx: f32, wy: f32, tile: Tile) -> bool {
        let (r, c) = tile_at(wx, wy);
        if self.map.get(r, c) != Tile::Empty {
            return false;
        }
        let stock = match tile {
            Tile::Dirt => &mut self.inventory.dirt,
            Tile::Stone => &mut self.inventory.stone,
            _ => return false,
        };
        if *stock == 0 {
            return false;
        }
        *stock -= 1;
        self.map.set(r, c, tile);
        self.window.invalidate(&self.map, r, c);
        self.events.push(SandboxEvent::Placed(tile));
        true
    }

    /// The wanderer paces on the terrain, flipping at walls and map edges
    fn step_enemy(&mut self, dt: f32) {
        self.enemy.vel.x = ENEMY_SPEED * self.enemy.dir;
        self.enemy.vel.y += GRAVITY * dt;

        let mut rect = self.enemy.rect();
        let dx = self.enemy.vel.x * dt;
        let dy = self.enemy.vel.y * dt;
        let mut blocked = false;

        rect.x += dx;
        for col in solid_tiles_near(&self.map, &rect) {
            if rect.overlaps(&col) {
                rect.x = if dx > 0.0 { col.x - rect.w } else { col.x + col.w };
                blocked = true;
            }
        }
        if rect.x <= 0.0 || rect.x >= TileMap::world_width() - rect.w {
            rect.x = rect.x.clamp(0.0, TileMap::world_width() - rect.w);
            blocked = true;
        }

        rect.y += dy;
        for col in solid_tiles_near(&self.map, &rect) {
            if rect.overlaps(&col) {
                if dy > 0.0 {
                    rect.y = col.y - rect.h;
                } else {
                    rect.y = col.y + col.h;
                }
                self.enemy.vel.y = 0.0;
            }
        }
        rect.y = rect.y.clamp(0.0, TileMap::world_height() - rect.h);

        if blocked {
            self.enemy.dir = -self.enemy.dir;
        }
        self.enemy.pos = Vec2::new(rect.x, rect.y);
    }

    /// Enemy contact costs health; running out respawns the player and
    /// docks the score.
    fn check_contact(&mut self, dt: f32) {
        self.hurt_timer = (self.hurt_timer - dt).max(0.0);
        if self.hurt_timer > 0.0 {
            return;
        }
        if !self.player.rect().overlaps(&self.enemy.rect()) {
            return;
        }

        self.hurt_timer = HURT_COOLDOWN;
        self.player.health = self.player.health.saturating_sub(1);
        if self.player.health == 0 {
            let respawned = SandboxPlayer::at_spawn();
            self.player.pos = respawned.pos;
            self.player.vel = Vec2::ZERO;
            self.player.health = MAX_HEALTH;
            self.score = self.score.saturating_sub(DEATH_PENALTY);
            self.events.push(SandboxEvent::Respawned);
        } else {
            self.events.push(SandboxEvent::Hurt {
                health: self.player.health,
            });
        }
    }
}

/// World position to (row, col)
fn tile_at(wx: f32, wy: f32) -> (i32, i32) {
    ((wy / TILE).floor() as i32, (wx / TILE).floor() as i32)
}

/// Solid tiles overlapping the rect, expanded by one tile each way
fn solid_tiles_near(map: &TileMap, rect: &Rect) -> Vec<Rect> {
    let r0 = ((rect.y - TILE) / TILE).floor() as i32;
    let r1 = ((rect.y + rect.h + TILE) / TILE).floor() as i32;
    let c0 = ((rect.x - TILE) / TILE).floor() as i32;
    let c1 = ((rect.x + rect.w + TILE) / TILE).floor() as i32;
    let mut out = Vec::new();
    for r in r0..=r1 {
        for c in c0..=c1 {
            if map.is_solid_at(r, c) {
                out.push(Rect {
                    x: c as f32 * TILE,
                    y: r as f32 * TILE,
                    w: TILE,
                    h: TILE,
                });
            }
        }
    }
    out
}
