//! Axis-aligned collision predicates
//!
//! All geometry here is AABB with bottom-left origins. The landing check is
//! the one subtle predicate: it probes a fixed distance below the player's
//! bottom edge and only fires while falling, which is what turns a platform
//! touch into an auto-bounce instead of a floor.

use glam::Vec2;

use super::state::{Coin, Platform, Player};
use crate::consts::*;

/// Overlap test between two boxes given by bottom-left origin and size.
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x + a_size.x > b_pos.x
        && a_pos.x < b_pos.x + b_size.x
        && a_pos.y + a_size.y > b_pos.y
        && a_pos.y < b_pos.y + b_size.y
}

/// Landing predicate: horizontal extents overlap, the probe point just below
/// the player's bottom edge lies strictly inside the platform's vertical
/// band, and the player is falling or stationary.
pub fn lands_on(player: &Player, platform: &Platform) -> bool {
    let probe = player.pos.y - LANDING_PROBE;
    player.pos.x + PLAYER_SIZE > platform.pos.x
        && player.pos.x < platform.pos.x + PLATFORM_WIDTH
        && probe < platform.pos.y + PLATFORM_HEIGHT
        && probe > platform.pos.y
        && player.velocity_y <= 0.0
}

/// Coin pickup: plain bounding-box overlap.
pub fn touches_coin(player: &Player, coin: &Coin) -> bool {
    aabb_overlap(
        player.pos,
        Vec2::splat(PLAYER_SIZE),
        coin.pos,
        Vec2::splat(COIN_SIZE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32, velocity_y: f32) -> Player {
        Player {
            pos: Vec2::new(x, y),
            velocity_y,
        }
    }

    #[test]
    fn test_aabb_overlap_basics() {
        let size = Vec2::splat(10.0);
        assert!(aabb_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(5.0, 5.0),
            size
        ));
        // Touching edges do not overlap
        assert!(!aabb_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(10.0, 0.0),
            size
        ));
        assert!(!aabb_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(0.0, 30.0),
            size
        ));
    }

    #[test]
    fn test_landing_requires_falling() {
        let platform = Platform {
            pos: Vec2::new(100.0, 100.0),
        };
        // Probe at y - 5 inside the band (100, 120)
        let falling = player_at(110.0, 110.0, -3.0);
        assert!(lands_on(&falling, &platform));

        let rising = player_at(110.0, 110.0, 12.0);
        assert!(!lands_on(&rising, &platform));
    }

    #[test]
    fn test_landing_requires_horizontal_overlap() {
        let platform = Platform {
            pos: Vec2::new(100.0, 100.0),
        };
        // Player entirely to the left of the platform
        let miss = player_at(40.0, 110.0, -3.0);
        assert!(!lands_on(&miss, &platform));
        // One unit of overlap on the right edge is enough
        let graze = player_at(100.0 + PLATFORM_WIDTH - 1.0, 110.0, -3.0);
        assert!(lands_on(&graze, &platform));
    }

    #[test]
    fn test_landing_band_is_strict() {
        let platform = Platform {
            pos: Vec2::new(100.0, 100.0),
        };
        // Probe exactly at the platform bottom: outside the open band
        let on_bottom = player_at(110.0, 105.0, -3.0);
        assert!(!lands_on(&on_bottom, &platform));
        // Probe well above the top of the band
        let above = player_at(110.0, 130.0, -3.0);
        assert!(!lands_on(&above, &platform));
    }

    #[test]
    fn test_coin_touch() {
        let coin = Coin {
            pos: Vec2::new(100.0, 100.0),
        };
        assert!(touches_coin(&player_at(90.0, 90.0, 0.0), &coin));
        assert!(!touches_coin(&player_at(0.0, 0.0, 0.0), &coin));
    }
}
