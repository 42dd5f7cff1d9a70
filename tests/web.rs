#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use xo_game::{
    best_move_js, evaluate_board, validate_state, AiDecision, GameState, Mark, Outcome,
    SearchResult, TicTacToe,
};

wasm_bindgen_test_configure!(run_in_browser);

fn js_board(cells: &[Option<&str>]) -> JsValue {
    serde_wasm_bindgen::to_value(cells).expect("board should convert")
}

#[wasm_bindgen_test]
fn evaluate_board_reports_winning_line() {
    let board = js_board(&[
        Some("O"),
        Some("O"),
        Some("O"),
        Some("X"),
        Some("X"),
        None,
        None,
        None,
        Some("X"),
    ]);
    let outcome: Outcome =
        serde_wasm_bindgen::from_value(evaluate_board(board).expect("evaluate")).expect("outcome");
    assert_eq!(
        outcome,
        Outcome::Win {
            winner: Mark::O,
            line: [0, 1, 2]
        }
    );
}

#[wasm_bindgen_test]
fn evaluate_board_rejects_short_boards() {
    assert!(evaluate_board(js_board(&[None; 4])).is_err());
}

#[wasm_bindgen_test]
fn best_move_completes_line() {
    let board = js_board(&[
        Some("X"),
        Some("X"),
        None,
        Some("O"),
        Some("O"),
        None,
        None,
        None,
        None,
    ]);
    let result: SearchResult =
        serde_wasm_bindgen::from_value(best_move_js(board, "X", true).expect("search"))
            .expect("result");
    assert_eq!(
        result,
        SearchResult {
            index: Some(2),
            score: 10
        }
    );
}

#[wasm_bindgen_test]
fn session_round_trip_through_class() {
    let mut game = TicTacToe::new(Some(r#"{"think_delay_ms":0,"think_jitter_ms":0}"#.into()))
        .expect("game should start");
    game.play(4).expect("human move");
    assert!(game.is_computer_turn());
    game.computer_move().expect("computer move");
    assert!(!game.is_computer_turn());

    let state: GameState =
        serde_json::from_str(&game.state_json().expect("state")).expect("state json");
    assert_eq!(state.board.count(Mark::X), 1);
    assert_eq!(state.board.count(Mark::O), 1);
    validate_state(serde_wasm_bindgen::to_value(&state).expect("state value"))
        .expect("state should be consistent");
}

#[wasm_bindgen_test]
async fn think_computer_resolves_to_decision() {
    let mut game = TicTacToe::new(None).expect("game should start");
    game.play(0).expect("human move");

    let value = wasm_bindgen_futures::JsFuture::from(game.think_computer(Some(1)))
        .await
        .expect("thinking should resolve");
    let json = value.as_string().expect("decision json");
    let decision: AiDecision = serde_json::from_str(&json).expect("decision");
    assert_eq!(decision.mark, Mark::O);
    assert_eq!(decision.index, Some(4));

    game.apply_decision(&json).expect("decision should apply");
    assert!(!game.is_computer_turn());
}

#[wasm_bindgen_test]
async fn decision_from_earlier_round_is_refused() {
    let mut game = TicTacToe::new(None).expect("game should start");
    game.play(1).expect("human move");

    let value = wasm_bindgen_futures::JsFuture::from(game.think_computer(Some(1)))
        .await
        .expect("thinking should resolve");
    let json = value.as_string().expect("decision json");

    game.new_round(true).expect("new round");
    game.play(8).expect("human move in new round");
    assert!(game.apply_decision(&json).is_err());
    assert!(game.is_computer_turn());
}

#[wasm_bindgen_test]
fn bad_setter_values_are_rejected() {
    let mut game = TicTacToe::new(None).expect("game should start");
    assert!(game.set_mode("solo").is_err());
    assert!(game.set_starter("Z").is_err());
    game.set_starter("O").expect("starter");
    assert!(!game.is_computer_turn());
}
