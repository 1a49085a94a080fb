use go_board::sgf::CoordCodec;
use go_board::{Board, Content, Coordinate};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Board contents exchanged with the page: row-major cells as 1 / -1 / 0.
#[derive(Serialize, Deserialize)]
struct BoardJson {
    cols: u8,
    rows: u8,
    cells: Vec<i8>,
}

#[wasm_bindgen]
pub struct WasmBoard {
    inner: Board,
    codec: CoordCodec,
}

#[wasm_bindgen]
impl WasmBoard {
    /// Throws for zero dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(cols: u8, rows: u8) -> Result<WasmBoard, JsError> {
        let inner = Board::new(cols, rows)?;
        Ok(Self {
            inner,
            codec: CoordCodec::default(),
        })
    }

    /// Build a square board from row-major codes.
    pub fn from_codes(codes: &[i8]) -> Result<WasmBoard, JsError> {
        Ok(Self {
            inner: Board::from_codes(codes)?,
            codec: CoordCodec::default(),
        })
    }

    /// Use `(col, row)` as the pass sentinel when decoding SGF moves.
    pub fn set_pass_point(&mut self, col: u8, row: u8) {
        self.codec = CoordCodec::new(Coordinate::new(col, row));
    }

    // -- Cells --

    pub fn cols(&self) -> u8 {
        self.inner.cols()
    }

    pub fn rows(&self) -> u8 {
        self.inner.rows()
    }

    /// Effective content at a cell; 0 for off-board points.
    pub fn get(&self, col: u8, row: u8) -> i8 {
        self.inner.get(col, row).map(Content::to_int).unwrap_or(0)
    }

    pub fn set(&mut self, col: u8, row: u8, stone: i8) -> bool {
        self.inner.set(col, row, Content::from_int(stone)).is_ok()
    }

    /// Place a stone from an SGF coordinate such as "pd". Passes are ignored.
    pub fn set_sgf(&mut self, coord: &str, stone: i8) -> bool {
        match self.codec.decode(coord) {
            Ok(p) if self.codec.is_pass(p) => true,
            Ok(p) => self.set(p.x, p.y, stone),
            Err(_) => false,
        }
    }

    pub fn board(&self) -> js_sys::Int8Array {
        let cells: Vec<i8> = self.inner.cells().iter().map(|c| c.to_int()).collect();
        js_sys::Int8Array::from(&cells[..])
    }

    pub fn board_json(&self) -> String {
        let json = BoardJson {
            cols: self.inner.cols(),
            rows: self.inner.rows(),
            cells: self.inner.cells().iter().map(|c| c.to_int()).collect(),
        };
        serde_json::to_string(&json).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the board from `{ cols, rows, cells }`. Returns false on
    /// malformed input and leaves the board untouched.
    pub fn load_json(&mut self, json: &str) -> bool {
        let Ok(parsed) = serde_json::from_str::<BoardJson>(json) else {
            return false;
        };
        if parsed.cells.len() != parsed.cols as usize * parsed.rows as usize {
            return false;
        }
        let Ok(mut board) = Board::new(parsed.cols, parsed.rows) else {
            return false;
        };
        for (i, &code) in parsed.cells.iter().enumerate() {
            let x = (i % parsed.cols as usize) as u8;
            let y = (i / parsed.cols as usize) as u8;
            if board.set(x, y, Content::from_int(code)).is_err() {
                return false;
            }
        }
        self.inner = board;
        true
    }

    pub fn content_hash(&self) -> String {
        format!("{:016x}", self.inner.content_hash())
    }

    // -- Groups --

    pub fn liberties(&mut self, col: u8, row: u8) -> i32 {
        self.inner
            .liberties(col, row)
            .map(|n| n as i32)
            .unwrap_or(-1)
    }

    /// Returns JSON array of [col, row] pairs in the group at `(col, row)`.
    pub fn group_json(&mut self, col: u8, row: u8) -> String {
        match self.inner.group_at(col, row) {
            Ok(group) => points_json(&group.sorted_points()),
            Err(_) => "[]".into(),
        }
    }

    /// Remove every group left without liberties by a stone at `(col, row)`.
    /// Returns the number of stones removed.
    pub fn capture_around(&mut self, col: u8, row: u8) -> u32 {
        match self.inner.captured_groups(col, row) {
            Ok(groups) => self.inner.capture_all(&groups) as u32,
            Err(_) => 0,
        }
    }

    // -- Scoring --

    pub fn is_scoring(&self) -> bool {
        self.inner.is_scoring()
    }

    pub fn set_scoring(&mut self, scoring: bool) -> bool {
        self.inner.set_scoring(scoring)
    }

    pub fn reset_scoring(&mut self) {
        self.inner.reset_scoring();
    }

    pub fn toggle_dead_group(&mut self, col: u8, row: u8) {
        self.inner.set_dead_group(col, row);
    }

    /// Returns JSON score object: {"black":n,"white":n,"result":"W+6.5"}
    pub fn score(&mut self, komi: f64) -> String {
        let territory = self.inner.territory();
        format!(
            r#"{{"black":{},"white":{},"result":"{}"}}"#,
            territory.black,
            territory.white,
            territory.result(komi),
        )
    }

    /// Per-cell scoring snapshot as JSON.
    pub fn scoring_points(&mut self) -> String {
        serde_json::to_string(&self.inner.scoring_points()).unwrap_or_else(|_| "[]".into())
    }

    /// ASCII rendering, one line per row.
    pub fn render(&self) -> String {
        self.inner.to_string()
    }
}

fn points_json(points: &[Coordinate]) -> String {
    let pts: Vec<[u8; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    serde_json::to_string(&pts).unwrap_or_else(|_| "[]".into())
}
