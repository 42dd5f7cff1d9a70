use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::board::{Board, CellIndex, Mark, Outcome};
use crate::config::GameConfig;

/// 对局模式。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameMode {
    #[default]
    #[serde(rename = "vs-computer")]
    VsComputer,
    #[serde(rename = "two")]
    TwoPlayer,
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vs-computer" | "computer" | "ai" => Ok(GameMode::VsComputer),
            "two" | "two-player" | "pvp" => Ok(GameMode::TwoPlayer),
            _ => Err(()),
        }
    }
}

/// 累计比分，跨回合保留。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scoreboard {
    pub x: u32,
    pub o: u32,
    pub ties: u32,
}

impl Scoreboard {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Win { winner: Mark::X, .. } => self.x += 1,
            Outcome::Win { winner: Mark::O, .. } => self.o += 1,
            Outcome::Draw => self.ties += 1,
            Outcome::InProgress => {}
        }
    }

    pub fn wins(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }
}

/// 游戏事件流。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MovePlayed {
        mark: Mark,
        index: CellIndex,
        by_computer: bool,
    },
    GameWon {
        winner: Mark,
        line: [CellIndex; 3],
    },
    GameDrawn,
    RoundReset {
        keep_scores: bool,
    },
    ScoresReset,
    ModeChanged {
        mode: GameMode,
    },
    StarterChanged {
        starter: Mark,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    MarkCountImbalance { starter: Mark, x: u8, o: u8 },
    TurnMismatch { expected: Mark, actual: Mark },
    MultipleWinners,
    OutcomeMismatch { stored: Outcome, actual: Outcome },
}

/// 一局井字棋的完整状态。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub to_move: Mark,
    #[serde(default)]
    pub mode: GameMode,
    pub starter: Mark,
    #[serde(default)]
    pub scores: Scoreboard,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_log: Vec<GameEvent>,
}

impl GameState {
    pub fn new(mode: GameMode, starter: Mark) -> Self {
        Self {
            board: Board::new(),
            to_move: starter,
            mode,
            starter,
            scores: Scoreboard::default(),
            outcome: Outcome::InProgress,
            event_log: Vec::new(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.mode, config.starter)
    }

    pub fn record_event(&mut self, event: GameEvent) {
        self.event_log.push(event);
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_decided()
    }

    /// 电脑执与先手相反的一方；双人模式下没有电脑。
    pub fn computer_mark(&self) -> Option<Mark> {
        match self.mode {
            GameMode::VsComputer => Some(self.starter.opponent()),
            GameMode::TwoPlayer => None,
        }
    }

    pub fn is_computer_turn(&self) -> bool {
        !self.is_finished() && self.computer_mark() == Some(self.to_move)
    }

    pub fn clear_board(&mut self) {
        self.board = Board::new();
        self.to_move = self.starter;
        self.outcome = Outcome::InProgress;
        self.event_log.clear();
    }

    /// 落子、换手并结算；调用方负责合法性校验。
    pub(crate) fn apply_move(&mut self, index: CellIndex, by_computer: bool) -> Vec<GameEvent> {
        let mark = self.to_move;
        self.board.place(index, mark);
        self.to_move = mark.opponent();

        let mut events = vec![GameEvent::MovePlayed {
            mark,
            index,
            by_computer,
        }];

        self.outcome = self.board.evaluate();
        match self.outcome {
            Outcome::Win { winner, line } => events.push(GameEvent::GameWon { winner, line }),
            Outcome::Draw => events.push(GameEvent::GameDrawn),
            Outcome::InProgress => {}
        }
        self.scores.record(&self.outcome);

        for event in &events {
            self.record_event(event.clone());
        }
        events
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        let x = self.board.count(Mark::X) as u8;
        let o = self.board.count(Mark::O) as u8;
        let (starter_count, other_count) = match self.starter {
            Mark::X => (x, o),
            Mark::O => (o, x),
        };
        if starter_count < other_count || starter_count > other_count + 1 {
            return Err(IntegrityError::MarkCountImbalance {
                starter: self.starter,
                x,
                o,
            });
        }

        let expected = if starter_count == other_count {
            self.starter
        } else {
            self.starter.opponent()
        };
        if self.to_move != expected {
            return Err(IntegrityError::TurnMismatch {
                expected,
                actual: self.to_move,
            });
        }

        let x_won = self.board.completed_lines(Mark::X).next().is_some();
        let o_won = self.board.completed_lines(Mark::O).next().is_some();
        if x_won && o_won {
            return Err(IntegrityError::MultipleWinners);
        }

        let actual = self.board.evaluate();
        if self.outcome != actual {
            return Err(IntegrityError::OutcomeMismatch {
                stored: self.outcome,
                actual,
            });
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
