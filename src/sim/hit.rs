//! Click/tap hit testing against falling tiles
//!
//! Tiles are hit-tested as axis-aligned boxes; the visual spin does not
//! change the hit area.

use glam::Vec2;

use super::state::Tile;
use crate::consts::TILE_SIZE;

/// Whether `point` lies inside the tile's box
pub fn tile_contains(tile: &Tile, point: Vec2) -> bool {
    point.x >= tile.pos.x
        && point.x <= tile.pos.x + TILE_SIZE
        && point.y >= tile.pos.y
        && point.y <= tile.pos.y + TILE_SIZE
}

/// Find the tile under `point`, if any.
///
/// When tiles overlap, the most recently spawned one wins, matching the
/// draw order (newest tiles render on top).
pub fn tile_at(tiles: &[Tile], point: Vec2) -> Option<u32> {
    tiles
        .iter()
        .rev()
        .find(|t| tile_contains(t, point))
        .map(|t| t.id)
}
