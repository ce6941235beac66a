//! Game state and core session types
//!
//! One `GameState` owns everything mutable for the current word/level. All
//! transitions are synchronous methods so the session can be unit tested
//! without a rendering layer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::words::{self, WordPair};
use crate::consts::*;

/// Current phase of a word round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Idle, waiting for Start
    Ready,
    /// Tiles spawning and falling, clicks accepted
    Playing,
    /// Word fully spelled; accepts Next/Reset
    Completed,
}

/// A falling letter tile
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: u32,
    pub letter: char,
    pub pos: Vec2,
    /// Vertical speed (pixels/sec)
    pub fall_speed: f32,
    /// Current rotation (radians)
    pub rotation: f32,
    /// Spin rate (radians/sec)
    pub rotation_speed: f32,
    /// Sine phase driving horizontal wobble
    pub wobble: f32,
}

/// A visual feedback particle (gameplay-neutral)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub size: f32,
    /// Sparkle burst (correct) vs impact burst (incorrect)
    pub sparkle: bool,
}

/// A drifting background cloud (cosmetic)
#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: f32,
    /// Horizontal drift (pixels/sec)
    pub speed: f32,
}

/// Feedback events emitted by session transitions, drained by the
/// presentation layer each frame (sounds, speech, status styling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The needed letter was clicked
    Correct,
    /// A wrong letter was clicked
    Incorrect,
    /// The word was fully spelled
    WordCompleted,
    /// A round started on this source word; spoken only if enabled
    RoundStarted(&'static str),
    /// The source word should be spoken aloud (explicit request)
    Pronounce(&'static str),
}

/// Status message styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Error,
}

/// Difficulty tuning. The letter bias is the knob that matters: how often
/// the spawner drops the letter the player actually needs next.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Difficulty {
    /// Probability (0.0-1.0) that a spawned tile carries the needed letter
    pub correct_letter_bias: f32,
    /// Seconds between tile spawns
    pub spawn_interval: f32,
    /// Vertical fall speed range (pixels/sec)
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            correct_letter_bias: CORRECT_LETTER_BIAS,
            spawn_interval: SPAWN_INTERVAL,
            min_fall_speed: TILE_MIN_FALL_SPEED,
            max_fall_speed: TILE_MAX_FALL_SPEED,
        }
    }
}

impl Difficulty {
    /// Smallest spawn interval the sim accepts (seconds)
    pub const MIN_SPAWN_INTERVAL: f32 = 0.1;

    /// Normalize tuning values so the sim can trust them. The values come
    /// from user-editable LocalStorage JSON: the bias must land in 0..=1,
    /// the interval must stay positive (the spawner catch-up loop never
    /// terminates at zero), and the fall speed range must be non-empty.
    /// Non-finite or out-of-range fields fall back to the defaults.
    pub fn sanitized(mut self) -> Self {
        if !self.correct_letter_bias.is_finite() {
            self.correct_letter_bias = CORRECT_LETTER_BIAS;
        }
        self.correct_letter_bias = self.correct_letter_bias.clamp(0.0, 1.0);
        if !(self.spawn_interval >= Self::MIN_SPAWN_INTERVAL) {
            self.spawn_interval = SPAWN_INTERVAL;
        }
        if !(self.min_fall_speed > 0.0) {
            self.min_fall_speed = TILE_MIN_FALL_SPEED;
        }
        if !(self.max_fall_speed > self.min_fall_speed) {
            self.max_fall_speed = self.min_fall_speed + 1.0;
        }
        self
    }
}

/// Complete session state for the current word/level
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG (tile positions, letters, cloud layout)
    pub rng: Pcg32,
    /// Index into the word list (cyclic)
    pub word_index: usize,
    /// Letters clicked so far; always a prefix of the target while Playing
    pub built_word: String,
    /// Score, never goes negative
    pub score: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Active falling tiles
    pub tiles: Vec<Tile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Background clouds (not gameplay-affecting)
    pub clouds: Vec<Cloud>,
    /// User-facing status line
    pub message: String,
    pub message_kind: MessageKind,
    /// Pending feedback events, drained by the presentation layer
    pub events: Vec<GameEvent>,
    /// Difficulty tuning
    pub difficulty: Difficulty,
    /// Seconds accumulated toward the next tile spawn
    pub(crate) spawn_accum: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed and default difficulty
    pub fn new(seed: u64) -> Self {
        Self::with_difficulty(seed, Difficulty::default())
    }

    /// Create a new session with explicit difficulty tuning. The tuning is
    /// sanitized on the way in; degenerate values never reach the spawner.
    pub fn with_difficulty(seed: u64, difficulty: Difficulty) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            word_index: 0,
            built_word: String::new(),
            score: 0,
            phase: GamePhase::Ready,
            tiles: Vec::new(),
            particles: Vec::new(),
            clouds: Vec::new(),
            message: String::from("点击开始按钮开始游戏！"),
            message_kind: MessageKind::Info,
            events: Vec::new(),
            difficulty: difficulty.sanitized(),
            spawn_accum: 0.0,
            next_id: 1,
        };
        state.spawn_clouds();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The word pair currently being learned
    pub fn current_pair(&self) -> &'static WordPair {
        &words::WORD_PAIRS[self.word_index % words::WORD_PAIRS.len()]
    }

    /// The Malay word being spelled
    pub fn target_word(&self) -> &'static str {
        self.current_pair().target
    }

    /// Level shown to the player (1-based word index)
    pub fn level(&self) -> usize {
        self.word_index + 1
    }

    /// The next letter the player must click, None once the word is done
    pub fn needed_letter(&self) -> Option<char> {
        self.target_word().chars().nth(self.built_word.chars().count())
    }

    /// Start the round: Ready -> Playing. Clears progress and tiles, arms
    /// the spawner, and requests pronunciation of the source word.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        self.built_word.clear();
        self.tiles.clear();
        self.spawn_accum = 0.0;
        self.phase = GamePhase::Playing;
        self.set_message("点击掉落的字母来拼出马来文单词！", MessageKind::Info);
        self.events.push(GameEvent::RoundStarted(self.current_pair().source));
    }

    /// Resolve a click on the tile with the given id.
    ///
    /// Only valid while Playing; otherwise a no-op. The clicked tile is
    /// removed either way, and the score floor at zero is enforced here.
    pub fn tile_clicked(&mut self, id: u32) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(idx) = self.tiles.iter().position(|t| t.id == id) else {
            return;
        };
        let tile = self.tiles.remove(idx);
        let center = tile.pos + Vec2::splat(TILE_SIZE / 2.0);

        if Some(tile.letter) == self.needed_letter() {
            self.built_word.push(tile.letter);
            self.score += SCORE_CORRECT;
            self.spawn_burst(center, true);
            self.set_message("正确！Betul!", MessageKind::Success);
            self.events.push(GameEvent::Correct);

            if self.built_word == self.target_word() {
                self.phase = GamePhase::Completed;
                let msg = format!("完成了！单词: {}", self.target_word());
                self.set_message(&msg, MessageKind::Success);
                self.events.push(GameEvent::WordCompleted);
            }
        } else {
            self.score = self.score.saturating_sub(SCORE_PENALTY);
            self.spawn_burst(center, false);
            self.set_message("错误！Salah!", MessageKind::Error);
            self.events.push(GameEvent::Incorrect);
        }
    }

    /// Reset the current word: any phase -> Ready
    pub fn reset(&mut self) {
        self.built_word.clear();
        self.tiles.clear();
        self.spawn_accum = 0.0;
        self.phase = GamePhase::Ready;
        self.set_message("点击开始按钮开始游戏！", MessageKind::Info);
    }

    /// Advance to the next word (wraps past the end of the list) -> Ready
    pub fn next_word(&mut self) {
        self.word_index = (self.word_index + 1) % words::WORD_PAIRS.len();
        self.built_word.clear();
        self.tiles.clear();
        self.spawn_accum = 0.0;
        self.phase = GamePhase::Ready;
        let msg = format!("第 {} 关！点击开始！", self.level());
        self.set_message(&msg, MessageKind::Info);
    }

    /// Request pronunciation of the current source word again. No state change.
    pub fn repeat(&mut self) {
        self.events.push(GameEvent::Pronounce(self.current_pair().source));
    }

    /// Update the status line
    pub fn set_message(&mut self, text: &str, kind: MessageKind) {
        self.message.clear();
        self.message.push_str(text);
        self.message_kind = kind;
    }

    /// Drain pending feedback events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a feedback particle burst around `center`
    pub fn spawn_burst(&mut self, center: Vec2, sparkle: bool) {
        let count = if sparkle {
            PARTICLES_CORRECT
        } else {
            PARTICLES_INCORRECT
        };
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let offset = Vec2::new(
                self.rng.random_range(-10.0..10.0),
                self.rng.random_range(-10.0..10.0),
            );
            let vel = Vec2::new(
                self.rng.random_range(-80.0..80.0),
                self.rng.random_range(-80.0..80.0) - 40.0,
            );
            self.particles.push(Particle {
                pos: center + offset,
                vel,
                life: 1.0,
                size: self.rng.random_range(5.0..15.0),
                sparkle,
            });
        }
    }

    /// Lay out the background clouds (called once at session creation)
    fn spawn_clouds(&mut self) {
        for _ in 0..CLOUD_COUNT {
            let cloud = Cloud {
                pos: Vec2::new(
                    self.rng.random_range(0.0..PLAY_WIDTH),
                    self.rng.random_range(30.0..180.0),
                ),
                size: self.rng.random_range(25.0..55.0),
                speed: self.rng.random_range(1.0..4.0),
            };
            self.clouds.push(cloud);
        }
    }
}
