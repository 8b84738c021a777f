//! Chunk window maintenance
//!
//! The map is viewed through a window of fixed-size chunks. Each refresh
//! activates the chunks intersecting the camera rectangle plus a one-chunk
//! ring, and drops the ones that left it. Active chunks keep a pooled list
//! of solid-tile collider rects that the physics step queries, so collision
//! work stays proportional to the window, not the map.

use std::collections::HashMap;

use super::map::{MAP_COLS, MAP_ROWS, TILE, TileMap};

/// Chunk edge length in tiles
pub const CHUNK_SIZE: usize = 8;

/// An axis-aligned rectangle, top-left origin, y growing downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    pub cx: i32,
    pub cy: i32,
}

/// Sliding window of active chunks and their collider pools
#[derive(Debug, Default)]
pub struct ChunkWindow {
    active: HashMap<ChunkKey, Vec<Rect>>,
}

impl ChunkWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the active set from the camera rectangle. Chunks entering
    /// the window materialize their colliders; chunks leaving it are freed.
    pub fn refresh(&mut self, map: &TileMap, cam: &Rect) {
        let chunk_span = CHUNK_SIZE as f32 * TILE;
        let max_cx = MAP_COLS.div_ceil(CHUNK_SIZE) as i32 - 1;
        let max_cy = MAP_ROWS.div_ceil(CHUNK_SIZE) as i32 - 1;

        let lc = ((cam.x / chunk_span).floor() as i32 - 1).max(0);
        let rc = (((cam.x + cam.w) / chunk_span).floor() as i32 + 1).min(max_cx);
        let tc = ((cam.y / chunk_span).floor() as i32 - 1).max(0);
        let bc = (((cam.y + cam.h) / chunk_span).floor() as i32 + 1).min(max_cy);

        self.active.retain(|key, _| {
            key.cx >= lc && key.cx <= rc && key.cy >= tc && key.cy <= bc
        });

        for cy in tc..=bc {
            for cx in lc..=rc {
                let key = ChunkKey { cx, cy };
                self.active
                    .entry(key)
                    .or_insert_with(|| materialize(map, key));
            }
        }
    }

    /// Drop and rebuild the chunk containing (row, col), if it is active.
    /// Called after a dig or place mutates the map.
    pub fn invalidate(&mut self, map: &TileMap, r: i32, c: i32) {
        if r < 0 || c < 0 {
            return;
        }
        let key = ChunkKey {
            cx: c / CHUNK_SIZE as i32,
            cy: r / CHUNK_SIZE as i32,
        };
        if self.active.contains_key(&key) {
            self.active.insert(key, materialize(map, key));
        }
    }

    /// Colliders from all active chunks that overlap the probe rectangle
    pub fn colliders_hitting<'a>(&'a self, probe: &'a Rect) -> impl Iterator<Item = &'a Rect> {
        self.active
            .values()
            .flatten()
            .filter(move |r| r.overlaps(probe))
    }

    pub fn active_chunks(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, key: ChunkKey) -> bool {
        self.active.contains_key(&key)
    }
}

/// Collect the solid tiles of one chunk as world-space rects
fn materialize(map: &TileMap, key: ChunkKey) -> Vec<Rect> {
    let start_r = key.cy * CHUNK_SIZE as i32;
    let start_c = key.cx * CHUNK_SIZE as i32;
    let mut rects = Vec::new();
    for r in start_r..start_r + CHUNK_SIZE as i32 {
        for c in start_c..start_c + CHUNK_SIZE as i32 {
            if map.is_solid_at(r, c) {
                rects.push(Rect {
                    x: c as f32 * TILE,
                    y: r as f32 * TILE,
                    w: TILE,
                    h: TILE,
                });
            }
        }
    }
    rects
}
