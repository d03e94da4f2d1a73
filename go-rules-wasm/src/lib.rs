use go_rules::{Engine, GameSettings, Mark, Stone};
use wasm_bindgen::prelude::*;

/// Parse a board size typed by the user. Returns -1 when the input is not a valid size.
#[wasm_bindgen]
pub fn parse_board_size(input: &str) -> i32 {
    GameSettings::parse_size(input)
        .ok()
        .and_then(|size| i32::try_from(size).ok())
        .unwrap_or(-1)
}

#[wasm_bindgen]
pub struct WasmEngine {
    inner: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(size: u32) -> Result<WasmEngine, JsError> {
        let inner = Engine::new(size as usize).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { inner })
    }

    /// Start a game from settings JSON: `{ size?, black_player?, white_player? }`.
    pub fn from_settings(json: &str) -> Result<WasmEngine, JsError> {
        let settings: GameSettings =
            serde_json::from_str(json).map_err(|e| JsError::new(&e.to_string()))?;
        let inner = Engine::from_settings(settings).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { inner })
    }

    // -- Game actions (delegate to Engine) --

    pub fn place_stone(&mut self, x: u32, y: u32) -> bool {
        self.inner.place_stone(x as usize, y as usize)
    }

    pub fn pass_turn(&mut self) -> bool {
        self.inner.pass_turn()
    }

    pub fn mark_territory(&mut self, x: u32, y: u32) {
        self.inner.mark_territory(x as usize, y as usize);
    }

    pub fn auto_find_territory(&mut self) {
        self.inner.auto_find_territory();
    }

    // -- JSON serialization (WASM boundary) --

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.inner.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn moves_json(&self) -> String {
        serde_json::to_string(self.inner.moves()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Returns JSON score object:
    /// {"black":{"territory":n,"dead_stones":n,"captures":n},"white":{...}}
    pub fn score_json(&self) -> String {
        serde_json::to_string(&self.inner.score()).unwrap_or_else(|_| "{}".to_string())
    }

    // -- Engine accessors (WASM-friendly types) --

    pub fn size(&self) -> u32 {
        self.inner.size() as u32
    }

    /// Stone colors in row-major order: 1 = Black, -1 = White, 0 = empty.
    pub fn stones(&self) -> js_sys::Int8Array {
        let cells: Vec<i8> = self
            .inner
            .goban()
            .stones()
            .into_iter()
            .map(|s| s.map_or(0, Stone::to_int))
            .collect();
        js_sys::Int8Array::from(cells.as_slice())
    }

    /// Territory marks in row-major order: 1 = Black, -1 = White, 0 = unmarked.
    pub fn territory(&self) -> js_sys::Int8Array {
        let marks: Vec<i8> = self
            .inner
            .territory()
            .marks()
            .iter()
            .map(|&m| Mark::to_int(m))
            .collect();
        js_sys::Int8Array::from(marks.as_slice())
    }

    pub fn turn(&self) -> i8 {
        self.inner.current_turn_stone().to_int()
    }

    pub fn game_over(&self) -> bool {
        self.inner.is_over()
    }

    pub fn is_legal(&self, x: u32, y: u32) -> bool {
        self.inner.is_legal((x as usize, y as usize))
    }

    pub fn score_black(&self) -> u32 {
        self.inner.score().black.total()
    }

    pub fn score_white(&self) -> u32 {
        self.inner.score().white.total()
    }

    pub fn result(&self) -> String {
        self.inner.score().result()
    }

    pub fn captures_black(&self) -> u32 {
        self.inner.captures().get(Stone::Black)
    }

    pub fn captures_white(&self) -> u32 {
        self.inner.captures().get(Stone::White)
    }

    pub fn has_ko(&self) -> bool {
        self.inner.ko().is_some()
    }

    pub fn ko_x(&self) -> i32 {
        match self.inner.ko() {
            Some(ko) => ko.pos.0 as i32,
            None => -1,
        }
    }

    pub fn ko_y(&self) -> i32 {
        match self.inner.ko() {
            Some(ko) => ko.pos.1 as i32,
            None => -1,
        }
    }

    /// Display name of the player for `stone` (1 = Black, anything else = White).
    pub fn player_name(&self, stone: i8) -> String {
        let stone = if stone > 0 { Stone::Black } else { Stone::White };
        self.inner.player_name(stone).to_string()
    }

    pub fn stage(&self) -> String {
        self.inner.stage().to_string()
    }
}
