//! Fixed timestep simulation tick
//!
//! Three periodic tasks share the tick: the tile spawner (interval-driven),
//! the tile mover, and the cosmetic cloud/particle updates. The gameplay
//! tasks only run while Playing; `reset()`/`next_word()` zero the spawner
//! accumulator, so a torn-down round can never spawn into a fresh one.

use glam::Vec2;
use rand::Rng;

use super::state::{GamePhase, GameState, Tile};
use crate::consts::*;

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    // Cosmetic tasks run in every phase
    drift_clouds(state, dt);
    update_particles(state, dt);

    if state.phase != GamePhase::Playing {
        return;
    }

    // Tile spawner: one tile per interval, catching up if a frame ran long
    state.spawn_accum += dt;
    while state.spawn_accum >= state.difficulty.spawn_interval {
        state.spawn_accum -= state.difficulty.spawn_interval;
        spawn_tile(state);
    }

    // Tile mover: fall, spin, wobble sideways
    for tile in &mut state.tiles {
        tile.pos.y += tile.fall_speed * dt;
        tile.rotation += tile.rotation_speed * dt;
        tile.wobble += TILE_WOBBLE_RATE * dt;
        tile.pos.x += tile.wobble.sin() * TILE_WOBBLE_DRIFT * dt;
    }

    // Tiles past the removal line escaped; no penalty
    state.tiles.retain(|t| t.pos.y < TILE_REMOVE_Y);
}

/// Create one falling tile at a random x with a biased letter
pub fn spawn_tile(state: &mut GameState) {
    let letter = pick_letter(state);
    let id = state.next_entity_id();
    let x = state.rng.random_range(0.0..PLAY_WIDTH - TILE_SIZE);
    let tile = Tile {
        id,
        letter,
        pos: Vec2::new(x, -TILE_SIZE),
        fall_speed: state
            .rng
            .random_range(state.difficulty.min_fall_speed..state.difficulty.max_fall_speed),
        rotation: state.rng.random_range(0.0..std::f32::consts::TAU),
        rotation_speed: state.rng.random_range(-TILE_MAX_SPIN..TILE_MAX_SPIN),
        wobble: state.rng.random_range(0.0..std::f32::consts::TAU),
    };
    state.tiles.push(tile);
}

/// Choose the letter for a new tile: the needed letter with probability
/// `correct_letter_bias`, otherwise uniform over the alphabet.
fn pick_letter(state: &mut GameState) -> char {
    let bias = state.difficulty.correct_letter_bias.clamp(0.0, 1.0) as f64;
    if let Some(needed) = state.needed_letter() {
        if state.rng.random_bool(bias) {
            return needed;
        }
    }
    let letters: Vec<char> = ALPHABET.chars().collect();
    letters[state.rng.random_range(0..letters.len())]
}

/// Drift clouds rightward, wrapping past the play-area edge
fn drift_clouds(state: &mut GameState, dt: f32) {
    for cloud in &mut state.clouds {
        cloud.pos.x += cloud.speed * dt;
        if cloud.pos.x > PLAY_WIDTH {
            cloud.pos.x = -cloud.size;
        }
    }
}

/// Integrate particle motion, apply gravity, fade out and remove dead ones
fn update_particles(state: &mut GameState, dt: f32) {
    for particle in &mut state.particles {
        particle.pos += particle.vel * dt;
        particle.vel.y += PARTICLE_GRAVITY * dt;
        particle.life -= PARTICLE_DECAY * dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Difficulty, GameEvent, MessageKind};
    use proptest::prelude::*;

    /// Drop a tile bearing `letter` into the state and click it
    fn click_letter(state: &mut GameState, letter: char) {
        let id = state.next_entity_id();
        state.tiles.push(Tile {
            id,
            letter,
            pos: Vec2::new(100.0, 100.0),
            fall_speed: 60.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            wobble: 0.0,
        });
        state.tile_clicked(id);
    }

    #[test]
    fn test_start_transitions_to_playing() {
        let mut state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Ready);
        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.built_word.is_empty());
        assert!(state.tiles.is_empty());
        // The start announcement carries the source word; the platform layer
        // decides whether to speak it
        let events = state.take_events();
        assert!(matches!(events[..], [GameEvent::RoundStarted("交通工具")]));
    }

    #[test]
    fn test_start_ignored_unless_ready() {
        let mut state = GameState::new(7);
        state.start();
        state.take_events();
        state.start();
        // No second pronunciation, still Playing
        assert!(state.take_events().is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_correct_click_appends_and_scores() {
        // Mid-word: built "kender", target "kenderaan", click 'a'
        let mut state = GameState::new(7);
        state.start();
        state.built_word = String::from("kender");
        let before = state.score;

        click_letter(&mut state, 'a');
        assert_eq!(state.built_word, "kendera");
        assert_eq!(state.score, before + SCORE_CORRECT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.take_events().contains(&GameEvent::Correct));
    }

    #[test]
    fn test_incorrect_click_floors_score_at_zero() {
        let mut state = GameState::new(7);
        state.start();
        state.score = 2;

        click_letter(&mut state, 'z'); // target starts with 'k'
        assert_eq!(state.score, 0);
        assert_eq!(state.message_kind, MessageKind::Error);
        assert!(state.take_events().contains(&GameEvent::Incorrect));
    }

    #[test]
    fn test_click_removes_tile_either_way() {
        let mut state = GameState::new(7);
        state.start();
        click_letter(&mut state, 'k');
        assert!(state.tiles.is_empty());
        click_letter(&mut state, 'q');
        assert!(state.tiles.is_empty());
    }

    #[test]
    fn test_word_completion_is_terminal_and_emitted_once() {
        let mut state = GameState::new(7);
        state.start();
        state.take_events();
        for ch in "kenderaan".chars() {
            click_letter(&mut state, ch);
        }
        assert_eq!(state.phase, GamePhase::Completed);
        let completions = state
            .take_events()
            .iter()
            .filter(|e| **e == GameEvent::WordCompleted)
            .count();
        assert_eq!(completions, 1);

        // Further clicks are no-ops once Completed
        let score = state.score;
        click_letter(&mut state, 'k');
        assert_eq!(state.score, score);
        assert_eq!(state.built_word, "kenderaan");
    }

    #[test]
    fn test_click_ignored_while_ready() {
        let mut state = GameState::new(7);
        click_letter(&mut state, 'k');
        assert_eq!(state.score, 0);
        assert!(state.built_word.is_empty());
    }

    #[test]
    fn test_next_word_wraps_nine_entry_list() {
        let mut state = GameState::new(7);
        state.word_index = 8;
        state.next_word();
        assert_eq!(state.word_index, 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.phase, GamePhase::Ready);
    }

    #[test]
    fn test_next_word_rederives_target_and_clears_progress() {
        let mut state = GameState::new(7);
        state.start();
        click_letter(&mut state, 'k');
        state.next_word();
        assert_eq!(state.target_word(), "situasi");
        assert!(state.built_word.is_empty());
        assert!(state.tiles.is_empty());
    }

    #[test]
    fn test_reset_from_any_phase_returns_to_ready() {
        let mut state = GameState::new(7);
        state.reset();
        assert_eq!(state.phase, GamePhase::Ready);

        state.start();
        tick(&mut state, 2.0); // spawn a few tiles
        assert!(!state.tiles.is_empty());
        state.reset();
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.tiles.is_empty());
        assert_eq!(state.spawn_accum, 0.0);

        state.start();
        state.built_word = String::from("kenderaa");
        click_letter(&mut state, 'n');
        assert_eq!(state.phase, GamePhase::Completed);
        state.reset();
        assert_eq!(state.phase, GamePhase::Ready);
    }

    #[test]
    fn test_repeat_requests_pronunciation_without_state_change() {
        let mut state = GameState::new(7);
        state.start();
        state.built_word = String::from("ken");
        state.take_events();
        state.repeat();
        // Repeat is an explicit request, distinct from the start announcement
        assert!(matches!(
            state.take_events()[..],
            [GameEvent::Pronounce("交通工具")]
        ));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.built_word, "ken");
    }

    #[test]
    fn test_spawner_only_runs_while_playing() {
        let mut state = GameState::new(7);
        for _ in 0..300 {
            tick(&mut state, SIM_DT);
        }
        assert!(state.tiles.is_empty());

        state.start();
        for _ in 0..300 {
            tick(&mut state, SIM_DT);
        }
        assert!(!state.tiles.is_empty());
    }

    #[test]
    fn test_escaped_tile_removed_on_next_tick() {
        let mut state = GameState::new(7);
        state.start();
        let id = state.next_entity_id();
        state.tiles.push(Tile {
            id,
            letter: 'k',
            pos: Vec2::new(50.0, TILE_REMOVE_Y + 1.0),
            fall_speed: 60.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            wobble: 0.0,
        });
        tick(&mut state, SIM_DT);
        assert!(state.tiles.iter().all(|t| t.id != id));
        // Escape carries no penalty
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_full_bias_always_spawns_needed_letter() {
        let mut state = GameState::with_difficulty(
            7,
            Difficulty {
                correct_letter_bias: 1.0,
                ..Default::default()
            },
        );
        state.start();
        for _ in 0..50 {
            spawn_tile(&mut state);
        }
        assert!(state.tiles.iter().all(|t| t.letter == 'k'));
    }

    #[test]
    fn test_zero_bias_spawns_from_alphabet() {
        let mut state = GameState::with_difficulty(
            99,
            Difficulty {
                correct_letter_bias: 0.0,
                ..Default::default()
            },
        );
        state.start();
        for _ in 0..200 {
            spawn_tile(&mut state);
        }
        assert!(state.tiles.iter().all(|t| ALPHABET.contains(t.letter)));
        // Across 200 draws a uniform pick can't be a single letter
        let first = state.tiles[0].letter;
        assert!(state.tiles.iter().any(|t| t.letter != first));
    }

    #[test]
    fn test_degenerate_difficulty_is_sanitized() {
        // LocalStorage JSON is user-editable; garbage tuning must not reach
        // the spawner
        let mut state = GameState::with_difficulty(
            7,
            Difficulty {
                correct_letter_bias: 4.0,
                spawn_interval: 0.0,
                min_fall_speed: 60.0,
                max_fall_speed: 60.0,
            },
        );
        assert!(state.difficulty.correct_letter_bias <= 1.0);
        assert!(state.difficulty.spawn_interval >= Difficulty::MIN_SPAWN_INTERVAL);
        assert!(state.difficulty.min_fall_speed < state.difficulty.max_fall_speed);

        state.start();
        // An empty fall-speed range would abort the sample here
        for _ in 0..20 {
            spawn_tile(&mut state);
        }
        assert_eq!(state.tiles.len(), 20);
    }

    #[test]
    fn test_nonfinite_difficulty_falls_back_to_defaults() {
        let diff = Difficulty {
            correct_letter_bias: f32::NAN,
            spawn_interval: f32::NAN,
            min_fall_speed: -10.0,
            max_fall_speed: f32::NEG_INFINITY,
        }
        .sanitized();
        assert_eq!(diff.correct_letter_bias, CORRECT_LETTER_BIAS);
        assert_eq!(diff.spawn_interval, SPAWN_INTERVAL);
        assert!(diff.min_fall_speed > 0.0);
        assert!(diff.max_fall_speed > diff.min_fall_speed);
    }

    #[test]
    fn test_nonpositive_spawn_interval_does_not_stall_the_tick() {
        let mut state = GameState::with_difficulty(
            7,
            Difficulty {
                spawn_interval: -1.0,
                ..Default::default()
            },
        );
        state.start();
        // With an unsanitized interval the catch-up loop would never exit
        for _ in 0..120 {
            tick(&mut state, SIM_DT);
        }
        assert!(!state.tiles.is_empty());
        assert!(state.tiles.len() <= 120);
    }

    #[test]
    fn test_spawned_tiles_start_inside_horizontal_bounds() {
        let mut state = GameState::new(7);
        state.start();
        for _ in 0..100 {
            spawn_tile(&mut state);
        }
        for tile in &state.tiles {
            assert!(tile.pos.x >= 0.0);
            assert!(tile.pos.x <= PLAY_WIDTH - TILE_SIZE);
            assert!(tile.pos.y < 0.0);
        }
    }

    #[test]
    fn test_particles_decay_and_die() {
        let mut state = GameState::new(7);
        state.spawn_burst(Vec2::new(100.0, 100.0), true);
        assert_eq!(state.particles.len(), PARTICLES_CORRECT);
        for _ in 0..(3.0 / SIM_DT) as usize {
            tick(&mut state, SIM_DT);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_clouds_wrap_around() {
        let mut state = GameState::new(7);
        state.clouds[0].pos.x = PLAY_WIDTH + 0.5;
        tick(&mut state, SIM_DT);
        assert!(state.clouds[0].pos.x < 0.0);
    }

    #[test]
    fn test_determinism_for_equal_seeds() {
        let mut a = GameState::new(424242);
        let mut b = GameState::new(424242);
        a.start();
        b.start();
        for _ in 0..600 {
            tick(&mut a, SIM_DT);
            tick(&mut b, SIM_DT);
        }
        assert_eq!(a.tiles.len(), b.tiles.len());
        for (ta, tb) in a.tiles.iter().zip(&b.tiles) {
            assert_eq!(ta.letter, tb.letter);
            assert!((ta.pos - tb.pos).length() < 1e-4);
        }
    }

    proptest! {
        /// built_word stays a prefix of the target and the score never goes
        /// negative, no matter which letters get clicked in what order.
        #[test]
        fn prop_prefix_and_score_invariants(
            seed in any::<u64>(),
            picks in proptest::collection::vec(0usize..ALPHABET.len(), 0..120),
        ) {
            let letters: Vec<char> = ALPHABET.chars().collect();
            let mut state = GameState::new(seed);
            state.start();
            for (i, pick) in picks.iter().enumerate() {
                click_letter(&mut state, letters[*pick]);
                if i % 3 == 0 {
                    tick(&mut state, SIM_DT);
                }
                prop_assert!(state.target_word().starts_with(state.built_word.as_str()));
                // score is unsigned; check it tracks the event history instead
                prop_assert!(state.score <= (i as u32 + 1) * SCORE_CORRECT);
                if state.phase != GamePhase::Playing {
                    break;
                }
            }
        }
    }
}
