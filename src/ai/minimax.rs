use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_sys::js_sys::Date;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{Board, CellIndex, Mark, Outcome};

/// X 获胜的分数；O 获胜取负值，平局为 0，与深度无关。
pub const WIN_SCORE: i32 = 10;
pub const DRAW_SCORE: i32 = 0;

#[derive(Debug, Clone, Copy)]
struct Stopwatch {
    started_ms: f64,
}

impl Stopwatch {
    fn start() -> Self {
        Self {
            started_ms: now_ms(),
        }
    }

    fn elapsed(&self) -> Duration {
        let elapsed_ms = (now_ms() - self.started_ms).max(0.0);
        Duration::from_millis(elapsed_ms as u64)
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// 搜索结果。终局节点没有 `index`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<CellIndex>,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MoveCandidate {
    index: CellIndex,
    score: i32,
}

#[derive(Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
}

pub fn terminal_score(outcome: &Outcome) -> Option<i32> {
    match outcome {
        Outcome::InProgress => None,
        Outcome::Win { winner: Mark::X, .. } => Some(WIN_SCORE),
        Outcome::Win { winner: Mark::O, .. } => Some(-WIN_SCORE),
        Outcome::Draw => Some(DRAW_SCORE),
    }
}

/// 穷举博弈树，返回 `player` 的最优落点。`maximizing` 为真时取最高分。
///
/// 不做剪枝；同分时取下标最小的格子。对已分胜负或已下满的棋盘返回没有
/// `index` 的终局分数。
pub fn best_move(board: &Board, player: Mark, maximizing: bool) -> SearchResult {
    best_move_with_stats(board, player, maximizing, &mut SearchStats::default())
}

pub fn best_move_with_stats(
    board: &Board,
    player: Mark,
    maximizing: bool,
    stats: &mut SearchStats,
) -> SearchResult {
    search(*board, player, maximizing, stats)
}

fn search(board: Board, player: Mark, maximizing: bool, stats: &mut SearchStats) -> SearchResult {
    stats.nodes += 1;

    if let Some(score) = terminal_score(&board.evaluate()) {
        return SearchResult { index: None, score };
    }

    let candidates: Vec<MoveCandidate> = board
        .empty_cells()
        .map(|index| {
            let child = board.with_mark(index, player);
            let reply = search(child, player.opponent(), !maximizing, stats);
            MoveCandidate {
                index,
                score: reply.score,
            }
        })
        .collect();

    let mut best: Option<MoveCandidate> = None;
    for candidate in candidates {
        let better = match best {
            None => true,
            Some(current) if maximizing => candidate.score > current.score,
            Some(current) => candidate.score < current.score,
        };
        if better {
            best = Some(candidate);
        }
    }

    match best {
        Some(candidate) => SearchResult {
            index: Some(candidate.index),
            score: candidate.score,
        },
        // evaluate() 已保证非终局棋盘至少有一个空格
        None => SearchResult {
            index: None,
            score: DRAW_SCORE,
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiConfig {
    pub think_delay: Duration,
    pub think_jitter: Duration,
}

impl AiConfig {
    pub fn new(think_delay: Duration, think_jitter: Duration) -> Self {
        Self {
            think_delay,
            think_jitter,
        }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new(Duration::from_millis(380), Duration::from_millis(180))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    pub mark: Mark,
    /// 决策所依据的棋盘，应用前用来识别过期决策。
    pub board: Board,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<CellIndex>,
    pub score: i32,
    pub nodes: u64,
    pub duration_ms: u64,
}

pub struct AiAgent {
    config: AiConfig,
    rng: SmallRng,
}

impl AiAgent {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// 电脑“思考”的停顿时间，只影响节奏，不影响结果。
    pub fn think_delay(&mut self) -> Duration {
        let jitter_ms = self.config.think_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            self.rng.gen_range(0..=jitter_ms)
        };
        self.config.think_delay + Duration::from_millis(jitter)
    }

    /// X 取最大分，O 取最小分。
    pub fn decide(board: &Board, mark: Mark) -> AiDecision {
        let start = Stopwatch::start();
        let mut stats = SearchStats::default();
        let result = best_move_with_stats(board, mark, mark == Mark::X, &mut stats);

        let decision = AiDecision {
            mark,
            board: *board,
            index: result.index,
            score: result.score,
            nodes: stats.nodes,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        crate::log!(
            "computer {} on {}: cell {:?}, score {}, {} nodes in {}ms",
            mark,
            board,
            decision.index,
            decision.score,
            decision.nodes,
            decision.duration_ms
        );
        decision
    }
}
