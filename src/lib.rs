pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod input;
pub mod instrument;
pub mod keyboard;
pub mod logging;
pub mod notes;
pub mod tuning;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::engine::ToneEngine;
use crate::input::PointerKind;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the pianokeys-core version string.
#[wasm_bindgen(js_name = coreVersion)]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: route `log` output to the browser console.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    logging::init(logging::parse_level(level));
}

/// What the page needs to draw one key element.
#[derive(Serialize)]
struct KeyElement<'a> {
    id: &'a str,
    /// Truncated to 2 decimals, for the data attribute.
    frequency: String,
    hz: f64,
    label: &'a str,
    raised: bool,
}

/// One computer-keyboard shortcut, for key hints.
#[derive(Serialize)]
struct KeyBinding {
    key: char,
    id: &'static str,
}

fn key_bindings_list() -> Vec<KeyBinding> {
    input::bindings()
        .map(|(key, id)| KeyBinding { key, id })
        .collect()
}

/// WASM-exposed: the fixed computer-keyboard table as `[{ key, id }]`.
#[wasm_bindgen(js_name = keyBindings)]
pub fn key_bindings() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&key_bindings_list()).map_err(js_err)
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-exposed tone engine for the piano page.
#[wasm_bindgen]
pub struct PianoEngine {
    engine: ToneEngine,
}

#[wasm_bindgen]
impl PianoEngine {
    /// Build from a config object; `undefined` or `null` gives defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PianoEngine, JsValue> {
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_err)?
        };
        let engine = ToneEngine::new(config).map_err(js_err)?;
        Ok(PianoEngine { engine })
    }

    /// Build from a JSON config string.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<PianoEngine, JsValue> {
        let config = EngineConfig::from_json(json).map_err(js_err)?;
        let engine = ToneEngine::new(config).map_err(js_err)?;
        Ok(PianoEngine { engine })
    }

    /// Current keys, in keyboard order.
    pub fn keys(&self) -> Result<JsValue, JsValue> {
        let keys: Vec<KeyElement> = self
            .engine
            .layout()
            .keys()
            .iter()
            .map(|k| KeyElement {
                id: &k.id,
                frequency: k.display_frequency(),
                hz: k.frequency,
                label: &k.label,
                raised: k.raised,
            })
            .collect();
        serde_wasm_bindgen::to_value(&keys).map_err(js_err)
    }

    /// Layout generation; changes whenever the keys are rebuilt.
    pub fn generation(&self) -> u32 {
        self.engine.layout().generation()
    }

    #[wasm_bindgen(js_name = setReferencePitch)]
    pub fn set_reference_pitch(&mut self, value: &str) -> Result<(), JsValue> {
        self.engine.set_reference_pitch(value).map_err(js_err)
    }

    #[wasm_bindgen(js_name = referencePitchDisplay)]
    pub fn reference_pitch_display(&self) -> String {
        self.engine.tuning().display()
    }

    #[wasm_bindgen(js_name = setInstrument)]
    pub fn set_instrument(&mut self, value: &str) {
        self.engine.set_instrument(value);
    }

    pub fn instrument(&self) -> String {
        self.engine.instrument().id().to_string()
    }

    #[wasm_bindgen(js_name = resumeAudio)]
    pub fn resume_audio(&mut self) {
        self.engine.resume_audio();
    }

    #[wasm_bindgen(js_name = isAudioReady)]
    pub fn is_audio_ready(&self) -> bool {
        self.engine.is_audio_ready()
    }

    #[wasm_bindgen(js_name = noteOn)]
    pub fn note_on(&mut self, id: &str) -> bool {
        self.engine.trigger(id).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = noteOff)]
    pub fn note_off(&mut self, id: &str) -> bool {
        self.engine.release(id)
    }

    /// Forward a DOM pointer/touch event, optionally with the layout
    /// generation the listener was bound under.
    pub fn pointer(&mut self, id: &str, event_type: &str, generation: Option<u32>) -> bool {
        let kind = match event_type.parse::<PointerKind>() {
            Ok(kind) => kind,
            Err(e) => {
                log::debug!("{e}");
                return false;
            }
        };
        self.engine.pointer(id, kind, generation)
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        self.engine.key_down(key, repeat)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) -> bool {
        self.engine.key_up(key)
    }

    /// Whether the key should carry the "active" highlight.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self, id: &str) -> bool {
        self.engine.is_active(id)
    }

    /// Render the next `frames` mono samples for the AudioWorklet.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0_f32; frames];
        self.engine.render(&mut out);
        out
    }

    /// Key ids whose voice has gone away since the last call.
    #[wasm_bindgen(js_name = takeEnded)]
    pub fn take_ended(&mut self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.engine.take_ended()).map_err(js_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_manifest() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }

    fn piano() -> PianoEngine {
        let _ = env_logger::builder().is_test(true).try_init();
        PianoEngine {
            engine: ToneEngine::new(EngineConfig::default()).unwrap(),
        }
    }

    #[test]
    fn calls_before_resume_return_false() {
        let mut p = piano();
        assert!(!p.is_audio_ready());
        assert!(!p.note_on("A4"));
        assert!(!p.pointer("A4", "mousedown", None));
        assert!(!p.key_down("h", false));
        assert!(!p.is_active("A4"));
        assert!(p.render(256).iter().all(|&s| s == 0.0));

        p.resume_audio();
        assert!(p.note_on("A4"));
        assert!(p.is_active("A4"));
    }

    #[test]
    fn bad_input_returns_false() {
        let mut p = piano();
        p.resume_audio();
        assert!(!p.pointer("A4", "click", None));
        assert!(!p.note_on("C9"));
        assert!(!p.note_on("not a key"));
        assert!(!p.note_off("A4"));
        assert!(!p.key_down("Shift", false));

        assert!(p.pointer("A4", "touchstart", Some(p.generation())));
        assert!(!p.note_on("A4"));
        assert!(p.pointer("A4", "mouseup", None));
        assert!(!p.is_active("A4"));
    }

    #[test]
    fn selectors_update_the_engine() {
        let mut p = piano();
        let generation = p.generation();
        p.set_reference_pitch("432").unwrap();
        assert_eq!(p.reference_pitch_display(), "432.000");
        assert_eq!(p.generation(), generation + 1);
        p.set_instrument("trumpet");
        assert_eq!(p.instrument(), "trumpet");
        p.set_instrument("kazoo");
        assert_eq!(p.instrument(), "flute");
    }

    #[test]
    fn key_bindings_serialize_for_the_page() {
        let json = serde_json::to_value(key_bindings_list()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 18);
        assert_eq!(json[0]["key"], "z");
        assert_eq!(json[0]["id"], "A3");
        assert_eq!(json[17]["id"], "D5");
    }

    #[test]
    fn key_elements_serialize_for_the_page() {
        let engine = ToneEngine::new(EngineConfig::default()).unwrap();
        let a4 = engine.layout().get("A4").unwrap();
        let element = KeyElement {
            id: &a4.id,
            frequency: a4.display_frequency(),
            hz: a4.frequency,
            label: &a4.label,
            raised: a4.raised,
        };
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["id"], "A4");
        assert_eq!(json["frequency"], "440.00");
        assert_eq!(json["label"], "Κε");
        assert_eq!(json["raised"], false);
    }
}
