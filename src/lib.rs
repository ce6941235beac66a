//! Kata Drop - a falling-letter vocabulary game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (tile lifecycle, scoring, word progression)
//! - `renderer`: Canvas2D drawing of the play area
//! - `audio`: Procedural WebAudio feedback jingles
//! - `speech`: Word pronunciation via SpeechSynthesis
//! - `settings`: Preferences and difficulty, persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod speech;

pub use settings::Settings;
pub use sim::Difficulty;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area dimensions (logical pixels)
    pub const PLAY_WIDTH: f32 = 800.0;
    pub const PLAY_HEIGHT: f32 = 600.0;

    /// Letter tile defaults
    pub const TILE_SIZE: f32 = 48.0;
    /// Tiles past this y have escaped and are removed (no penalty)
    pub const TILE_REMOVE_Y: f32 = PLAY_HEIGHT - 50.0;
    /// Vertical fall speed range (pixels/sec)
    pub const TILE_MIN_FALL_SPEED: f32 = 50.0;
    pub const TILE_MAX_FALL_SPEED: f32 = 80.0;
    /// Maximum spin rate (radians/sec, either direction)
    pub const TILE_MAX_SPIN: f32 = 0.9;
    /// Wobble phase advance (radians/sec) and horizontal drift (pixels/sec)
    pub const TILE_WOBBLE_RATE: f32 = 1.6;
    pub const TILE_WOBBLE_DRIFT: f32 = 4.0;

    /// Scoring
    pub const SCORE_CORRECT: u32 = 10;
    pub const SCORE_PENALTY: u32 = 3;

    /// Letters the spawner draws from when not spawning the needed letter.
    /// Space is included because several target words contain spaces.
    pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz ";

    /// Spawner defaults (overridable via `Difficulty`)
    pub const SPAWN_INTERVAL: f32 = 1.2;
    pub const CORRECT_LETTER_BIAS: f32 = 0.8;

    /// Particle burst sizes
    pub const PARTICLES_CORRECT: usize = 15;
    pub const PARTICLES_INCORRECT: usize = 8;
    /// Particle gravity (pixels/sec^2) and life decay (per sec)
    pub const PARTICLE_GRAVITY: f32 = 120.0;
    pub const PARTICLE_DECAY: f32 = 0.4;
    /// Maximum particles
    pub const MAX_PARTICLES: usize = 256;

    /// Background clouds
    pub const CLOUD_COUNT: usize = 4;
}
