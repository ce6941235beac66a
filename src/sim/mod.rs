//! Deterministic game logic module
//!
//! Everything gameplay-relevant lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod hit;
pub mod state;
pub mod tick;
pub mod words;

pub use hit::{tile_at, tile_contains};
pub use state::{
    Cloud, Difficulty, GameEvent, GamePhase, GameState, MessageKind, Particle, Tile,
};
pub use tick::{spawn_tile, tick};
pub use words::{WORD_PAIRS, WordPair};
