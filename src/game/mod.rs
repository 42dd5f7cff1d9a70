//! 游戏核心逻辑模块（棋盘判定、对局状态、规则引擎）。

pub mod board;
pub mod rules;
pub mod state;

pub use board::{evaluate, Board, BoardError, CellIndex, Mark, Outcome, BOARD_SIZE, LINES};
pub use rules::{RuleEngine, RuleError, RuleResolution};
pub use state::{GameEvent, GameMode, GameState, IntegrityError, Scoreboard};
