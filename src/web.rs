//! Browser bindings
//!
//! The page owns rendering and its own `requestAnimationFrame` loop. It forwards
//! key events and frame deltas here and reads JSON snapshots back.

use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::session::{ScrollerInput, ScrollerSession, StackerInput, StackerSession};
use crate::settings::Settings;
use crate::tracker::TaskBoard;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Productivity Arcade loaded");
}

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Both games plus the task board
#[wasm_bindgen]
pub struct Arcade {
    scroller: ScrollerSession,
    stacker: StackerSession,
    board: TaskBoard,
}

#[wasm_bindgen]
impl Arcade {
    /// Build from optional settings JSON; invalid settings are reported to JS
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<Arcade, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(to_js)?,
            None => Settings::default(),
        };
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!("Arcade created with seed: {}", seed);
        Ok(Arcade {
            scroller: ScrollerSession::seeded(&settings, seed),
            stacker: StackerSession::seeded(&settings, seed.wrapping_add(1)),
            board: TaskBoard::with_default_tasks(),
        })
    }

    /// Returns true when the key mapped to a side-scroller input
    pub fn scroller_key(&mut self, event: &KeyboardEvent) -> bool {
        match ScrollerInput::from_key(&event.key()) {
            Some(input) => {
                self.scroller.handle(input);
                true
            }
            None => false,
        }
    }

    /// Returns true when the key mapped to a block-stacker input
    pub fn stacker_key(&mut self, event: &KeyboardEvent) -> bool {
        match StackerInput::from_key(&event.key()) {
            Some(input) => {
                self.stacker.handle(input);
                true
            }
            None => false,
        }
    }

    /// Advance both games by the frame delta and update achievements
    pub fn advance(&mut self, dt_ms: f64) {
        let dt = dt_ms.clamp(0.0, 1000.0) as u32;
        // Idle sessions have no armed intervals, so this is a no-op for them
        self.scroller.advance(dt);
        self.stacker.advance(dt);
        self.board.record_scroller(&self.scroller.snapshot());
        self.board.record_stacker(&self.stacker.snapshot());
    }

    pub fn scroller_snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.scroller.snapshot()).map_err(to_js)
    }

    pub fn stacker_snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.stacker.snapshot()).map_err(to_js)
    }

    pub fn tracker_summary(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.board.summary()).map_err(to_js)
    }

    /// Mark a work task done; false if it already was
    pub fn complete_task(&mut self, id: u32) -> Result<bool, JsValue> {
        self.board.complete(id).map_err(to_js)
    }
}
