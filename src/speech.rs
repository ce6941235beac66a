//! Word pronunciation via the browser's SpeechSynthesis API
//!
//! Fire-and-forget: the controller asks for a word to be spoken and gets
//! start/end/error notifications that only ever drive the status line.
//! A missing or failing speech engine never affects gameplay.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice};

/// Lifecycle of one pronunciation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechStatus {
    Started,
    Ended,
    Failed,
}

/// Thin wrapper over the platform speech engine
#[derive(Clone)]
pub struct Speaker {
    synth: Option<SpeechSynthesis>,
    /// Speaking rate; learners get a slowed-down rendition
    pub rate: f32,
}

impl Speaker {
    pub fn new(rate: f32) -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            log::warn!("SpeechSynthesis unavailable - pronunciation disabled");
        }
        Self { synth, rate }
    }

    /// Pick a Chinese voice if the engine offers one
    fn chinese_voice(synth: &SpeechSynthesis) -> Option<SpeechSynthesisVoice> {
        synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
            .find(|v| v.lang().contains("zh") || v.name().contains("Chinese"))
    }

    /// Speak `text` in Mandarin, reporting lifecycle through `on_status`.
    ///
    /// Any earlier utterance still in flight is cancelled first, so a quick
    /// Repeat press restarts the word instead of queueing it.
    pub fn speak(&self, text: &str, on_status: impl Fn(SpeechStatus) + 'static) {
        let Some(synth) = &self.synth else {
            on_status(SpeechStatus::Failed);
            return;
        };
        synth.cancel();

        let Ok(utterance) = SpeechSynthesisUtterance::new_with_text(text) else {
            on_status(SpeechStatus::Failed);
            return;
        };
        utterance.set_lang("zh-CN");
        utterance.set_rate(self.rate);
        utterance.set_pitch(1.0);
        utterance.set_volume(1.0);
        if let Some(voice) = Self::chinese_voice(synth) {
            utterance.set_voice(Some(&voice));
        }

        let on_status = Rc::new(on_status);

        {
            let on_status = on_status.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_: web_sys::SpeechSynthesisEvent| {
                on_status(SpeechStatus::Started);
            });
            utterance.set_onstart(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        {
            let on_status = on_status.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_: web_sys::SpeechSynthesisEvent| {
                on_status(SpeechStatus::Ended);
            });
            utterance.set_onend(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        {
            let closure =
                Closure::<dyn FnMut(_)>::new(move |_: web_sys::SpeechSynthesisErrorEvent| {
                    on_status(SpeechStatus::Failed);
                });
            utterance.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        synth.speak(&utterance);
    }
}
