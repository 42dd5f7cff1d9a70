pub mod ai;
pub mod config;
pub mod game;
pub mod logger;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{best_move, AiAgent, AiConfig, AiDecision, SearchResult};
pub use config::{ConfigError, GameConfig};
pub use game::{
    evaluate, Board, BoardError, CellIndex, GameEvent, GameMode, GameState, IntegrityError, Mark,
    Outcome, RuleEngine, RuleError, RuleResolution, Scoreboard,
};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn to_js_error<E: Serialize>(error: E) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(serde_to_js_error)
}

fn resolution_json(state: &GameState, events: Vec<GameEvent>) -> Result<String, JsValue> {
    to_json(&RuleResolution::new(state.clone(), events))
}

fn board_from_js(board: JsValue) -> Result<Board, JsValue> {
    let symbols: Vec<Option<String>> = from_value(board).map_err(JsValue::from)?;
    Board::try_from(symbols).map_err(to_js_error)
}

#[derive(Serialize)]
struct ComputerMoveResponse {
    decision: AiDecision,
    applied: RuleResolution,
}

#[wasm_bindgen]
pub struct TicTacToe {
    state: GameState,
    agent: AiAgent,
    engine: RuleEngine,
}

#[wasm_bindgen]
impl TicTacToe {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<TicTacToe, JsValue> {
        let config = GameConfig::from_optional_json(config_json.as_deref()).map_err(to_js_error)?;
        logger::init_logger("xo");
        logger::set_enabled(config.verbose);
        let agent = match config.seed {
            Some(seed) => AiAgent::with_seed(config.ai_config(), seed),
            None => AiAgent::new(config.ai_config()),
        };
        Ok(TicTacToe {
            state: GameState::from_config(&config),
            agent,
            engine: RuleEngine::new(),
        })
    }

    #[wasm_bindgen(js_name = "stateJson")]
    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(&self.state)
    }

    #[wasm_bindgen(js_name = "setStateJson")]
    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        RuleEngine::ensure_integrity(&state).map_err(to_js_error)?;
        self.state = state;
        Ok(())
    }

    pub fn play(&mut self, index: usize) -> Result<String, JsValue> {
        let events = self
            .engine
            .play(&mut self.state, index)
            .map_err(to_js_error)?;
        resolution_json(&self.state, events)
    }

    #[wasm_bindgen(js_name = "computerMove")]
    pub fn computer_move(&mut self) -> Result<String, JsValue> {
        let (decision, events) = self
            .engine
            .computer_move(&mut self.state)
            .map_err(to_js_error)?;
        let response = ComputerMoveResponse {
            decision,
            applied: RuleResolution::new(self.state.clone(), events),
        };
        to_json(&response)
    }

    /// 等待一段“思考”时间后在状态副本上搜索，返回决策 JSON；不修改当前对局。
    #[wasm_bindgen(js_name = "thinkComputer")]
    pub fn think_computer(&mut self, delay_ms: Option<u32>) -> Promise {
        let state = self.state.clone();
        let delay = delay_ms.unwrap_or_else(|| self.agent.think_delay().as_millis() as u32);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let decision = RuleEngine::plan_computer_move(&state).map_err(to_js_error)?;
            Ok(JsValue::from_str(&to_json(&decision)?))
        })
    }

    #[wasm_bindgen(js_name = "applyDecision")]
    pub fn apply_decision(&mut self, decision_json: &str) -> Result<String, JsValue> {
        let decision: AiDecision =
            serde_json::from_str(decision_json).map_err(serde_to_js_error)?;
        let events = self
            .engine
            .apply_decision(&mut self.state, &decision)
            .map_err(to_js_error)?;
        resolution_json(&self.state, events)
    }

    #[wasm_bindgen(js_name = "newRound")]
    pub fn new_round(&mut self, keep_scores: bool) -> Result<String, JsValue> {
        let events = RuleEngine::new_round(&mut self.state, keep_scores);
        resolution_json(&self.state, events)
    }

    #[wasm_bindgen(js_name = "setMode")]
    pub fn set_mode(&mut self, mode: &str) -> Result<String, JsValue> {
        let mode = config::parse_mode(mode).map_err(to_js_error)?;
        let events = RuleEngine::set_mode(&mut self.state, mode);
        resolution_json(&self.state, events)
    }

    #[wasm_bindgen(js_name = "setStarter")]
    pub fn set_starter(&mut self, mark: &str) -> Result<String, JsValue> {
        let starter = config::parse_mark(mark).map_err(to_js_error)?;
        let events = RuleEngine::set_starter(&mut self.state, starter);
        resolution_json(&self.state, events)
    }

    #[wasm_bindgen(js_name = "isComputerTurn")]
    pub fn is_computer_turn(&self) -> bool {
        self.state.is_computer_turn()
    }
}

/// 判定前端棋盘（9 个 `null` / `"X"` / `"O"`）的状态。
#[wasm_bindgen(js_name = "evaluateBoard")]
pub fn evaluate_board(board: JsValue) -> Result<JsValue, JsValue> {
    let board = board_from_js(board)?;
    to_value(&evaluate(&board)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "bestMove")]
pub fn best_move_js(board: JsValue, player: &str, maximizing: bool) -> Result<JsValue, JsValue> {
    let board = board_from_js(board)?;
    let player = config::parse_mark(player).map_err(to_js_error)?;
    to_value(&best_move(&board, player, maximizing)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "createGameState")]
pub fn create_game_state(config_json: Option<String>) -> Result<JsValue, JsValue> {
    let config = GameConfig::from_optional_json(config_json.as_deref()).map_err(to_js_error)?;
    to_value(&GameState::from_config(&config)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue) -> Result<(), JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    RuleEngine::ensure_integrity(&state).map_err(to_js_error)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
