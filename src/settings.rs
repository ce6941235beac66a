//! Game settings and preferences
//!
//! Persisted to LocalStorage as JSON on the web build; in-memory defaults
//! elsewhere. Scores are intentionally not persisted.

use serde::{Deserialize, Serialize};

pub use crate::sim::Difficulty;

/// Player preferences plus difficulty tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Feedback jingle volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all audio
    pub muted: bool,

    // === Speech ===
    /// Speak the source word when a round starts
    pub speak_on_start: bool,
    /// SpeechSynthesis rate (the original tuned this down for learners)
    pub speech_rate: f32,

    // === Visual effects ===
    /// Particle bursts on correct/incorrect clicks
    pub particles: bool,
    /// Background cloud drift
    pub clouds: bool,
    /// Minimize motion (disables tile spin and wobble rendering)
    pub reduced_motion: bool,

    // === Gameplay ===
    /// Spawner tuning, including the correct-letter bias
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            speak_on_start: true,
            speech_rate: 0.7,
            particles: true,
            clouds: true,
            reduced_motion: false,
            difficulty: Difficulty::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "kata_drop_settings";

    /// Effective jingle volume
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
