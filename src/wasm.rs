//! WASM bindings for the engine.
//!
//! Browsers have no save file, so persistence goes through the text
//! document and the page decides where to keep it.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::Game;

#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            inner: Game::new(GameConfig::default()),
        }
    }

    /// Returns true when the move was played.
    #[wasm_bindgen(js_name = playTurn)]
    pub fn play_turn(&mut self, row: i32, col: i32) -> bool {
        self.inner.play_turn(row, col)
    }

    #[wasm_bindgen(js_name = checkPass)]
    pub fn check_pass(&mut self) {
        self.inner.check_pass();
    }

    #[wasm_bindgen(js_name = undoMove)]
    pub fn undo_move(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Full game state as a plain JS object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.state()).map_err(JsValue::from)
    }

    /// Status line text, e.g. "Black's Turn".
    pub fn status(&self) -> String {
        self.inner.status().to_string()
    }

    #[wasm_bindgen(js_name = saveDocument)]
    pub fn save_document(&self) -> String {
        self.inner.save_document()
    }

    /// Loads a saved document. A malformed one resets the game and throws.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner
            .load_document(text)
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
