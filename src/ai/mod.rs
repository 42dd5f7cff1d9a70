//! 电脑对手：穷举博弈树搜索。

pub mod minimax;

pub use minimax::{
    best_move, best_move_with_stats, terminal_score, AiAgent, AiConfig, AiDecision, SearchResult,
    SearchStats, DRAW_SCORE, WIN_SCORE,
};
