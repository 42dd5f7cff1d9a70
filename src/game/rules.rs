use serde::{Deserialize, Serialize};

use super::{
    board::{Board, CellIndex, Mark, Outcome, BOARD_SIZE},
    state::{GameEvent, GameMode, GameState, IntegrityError},
};
use crate::ai::{AiAgent, AiDecision};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    GameFinished,
    CellOutOfRange { index: CellIndex, size: usize },
    CellOccupied { index: CellIndex, mark: Mark },
    NotPlayerTurn { computer: Mark },
    NotComputerTurn { to_move: Mark },
    ComputerDisabled,
    DecisionMarkMismatch { expected: Mark, actual: Mark },
    StaleDecision { expected: Board, actual: Board },
    NoMoveAvailable,
    IntegrityViolation { error: IntegrityError },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResolution {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl RuleResolution {
    pub fn new(state: GameState, events: Vec<GameEvent>) -> Self {
        let outcome = state.is_finished().then_some(state.outcome);
        Self {
            state,
            events,
            outcome,
        }
    }
}

#[derive(Debug, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    fn ensure_in_progress(state: &GameState) -> Result<(), RuleError> {
        if state.is_finished() {
            return Err(RuleError::GameFinished);
        }
        Ok(())
    }

    fn ensure_open_cell(state: &GameState, index: CellIndex) -> Result<(), RuleError> {
        if index >= BOARD_SIZE {
            return Err(RuleError::CellOutOfRange {
                index,
                size: BOARD_SIZE,
            });
        }
        if let Some(mark) = state.board.get(index) {
            return Err(RuleError::CellOccupied { index, mark });
        }
        Ok(())
    }

    fn ensure_computer_turn(state: &GameState) -> Result<Mark, RuleError> {
        let computer = state.computer_mark().ok_or(RuleError::ComputerDisabled)?;
        Self::ensure_in_progress(state)?;
        if state.to_move != computer {
            return Err(RuleError::NotComputerTurn {
                to_move: state.to_move,
            });
        }
        Ok(computer)
    }

    pub fn ensure_integrity(state: &GameState) -> Result<(), RuleError> {
        state
            .integrity_check()
            .map_err(|error| RuleError::IntegrityViolation { error })
    }

    /// 玩家落子。人机模式下轮到电脑时拒绝。
    pub fn play(
        &mut self,
        state: &mut GameState,
        index: CellIndex,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_in_progress(state)?;
        if let Some(computer) = state.computer_mark() {
            if state.to_move == computer {
                return Err(RuleError::NotPlayerTurn { computer });
            }
        }
        Self::ensure_open_cell(state, index)?;

        let events = state.apply_move(index, false);
        crate::log!(
            "{} played cell {} -> {}",
            state.to_move.opponent(),
            index,
            state.board
        );
        Ok(events)
    }

    /// 只计算电脑的落点，不修改状态。
    pub fn plan_computer_move(state: &GameState) -> Result<AiDecision, RuleError> {
        let computer = Self::ensure_computer_turn(state)?;
        Ok(AiAgent::decide(&state.board, computer))
    }

    /// 电脑走一步。
    pub fn computer_move(
        &mut self,
        state: &mut GameState,
    ) -> Result<(AiDecision, Vec<GameEvent>), RuleError> {
        let decision = Self::plan_computer_move(state)?;
        let events = self.apply_decision(state, &decision)?;
        Ok((decision, events))
    }

    /// 应用事先算好的决策（例如异步思考的结果）。
    ///
    /// 决策必须基于当前棋盘；思考期间开了新回合或换了局面都会被拒绝，
    /// 即使目标格子恰好还空着。
    pub fn apply_decision(
        &mut self,
        state: &mut GameState,
        decision: &AiDecision,
    ) -> Result<Vec<GameEvent>, RuleError> {
        let computer = Self::ensure_computer_turn(state)?;
        if decision.mark != computer {
            return Err(RuleError::DecisionMarkMismatch {
                expected: computer,
                actual: decision.mark,
            });
        }
        if decision.board != state.board {
            return Err(RuleError::StaleDecision {
                expected: state.board,
                actual: decision.board,
            });
        }
        let index = decision.index.ok_or(RuleError::NoMoveAvailable)?;
        Self::ensure_open_cell(state, index)?;

        Ok(state.apply_move(index, true))
    }

    pub fn new_round(state: &mut GameState, keep_scores: bool) -> Vec<GameEvent> {
        state.clear_board();
        let mut events = vec![GameEvent::RoundReset { keep_scores }];
        if !keep_scores {
            state.scores = Default::default();
            events.push(GameEvent::ScoresReset);
        }
        for event in &events {
            state.record_event(event.clone());
        }
        crate::log!("new round, {} to move", state.to_move);
        events
    }

    pub fn set_mode(state: &mut GameState, mode: GameMode) -> Vec<GameEvent> {
        state.mode = mode;
        let mut events = Self::new_round(state, true);
        let changed = GameEvent::ModeChanged { mode };
        state.record_event(changed.clone());
        events.push(changed);
        events
    }

    pub fn set_starter(state: &mut GameState, starter: Mark) -> Vec<GameEvent> {
        state.starter = starter;
        state.clear_board();
        let changed = GameEvent::StarterChanged { starter };
        state.record_event(changed.clone());
        crate::log!("starter is now {}", starter);
        vec![changed]
    }
}
