use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 棋盘格子数量（3×3）。
pub const BOARD_SIZE: usize = 9;

/// 格子下标，按行优先 0–8。
pub type CellIndex = usize;

/// 三行、三列、两条对角线。
pub const LINES: [[CellIndex; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mark {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Mark::X),
            "O" => Ok(Mark::O),
            _ => Err(()),
        }
    }
}

/// 对局结果；只有获胜时才携带连线。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Outcome {
    #[default]
    InProgress,
    Win { winner: Mark, line: [CellIndex; 3] },
    Draw,
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Win { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    pub fn line(&self) -> &[CellIndex] {
        match self {
            Outcome::Win { line, .. } => line,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum BoardError {
    WrongLength { expected: usize, actual: usize },
    UnknownSymbol { index: CellIndex, symbol: String },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::WrongLength { expected, actual } => {
                write!(f, "board must have {expected} cells, got {actual}")
            }
            BoardError::UnknownSymbol { index, symbol } => {
                write!(f, "unknown symbol {symbol:?} at cell {index}")
            }
        }
    }
}

/// 井字棋盘。实现了 `Copy`，搜索的每一层都拿到自己的一份。
///
/// 序列化为 9 格数组；反序列化走 [`Board::from_symbols`]，与前端写法一致。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<Option<String>>")]
pub struct Board([Option<Mark>; BOARD_SIZE]);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Mark>; BOARD_SIZE]) -> Self {
        Self(cells)
    }

    /// 解析前端传来的格子数组：`null`、`""`、`"X"`、`"O"`。
    pub fn from_symbols<S: AsRef<str>>(symbols: &[Option<S>]) -> Result<Self, BoardError> {
        if symbols.len() != BOARD_SIZE {
            return Err(BoardError::WrongLength {
                expected: BOARD_SIZE,
                actual: symbols.len(),
            });
        }

        let mut cells = [None; BOARD_SIZE];
        for (index, symbol) in symbols.iter().enumerate() {
            let symbol: &str = match symbol {
                Some(symbol) => symbol.as_ref(),
                None => continue,
            };
            if symbol.trim().is_empty() {
                continue;
            }
            cells[index] = Some(Mark::from_str(symbol).map_err(|_| BoardError::UnknownSymbol {
                index,
                symbol: symbol.to_string(),
            })?);
        }
        Ok(Self(cells))
    }

    pub fn get(&self, index: CellIndex) -> Option<Mark> {
        self.0.get(index).copied().flatten()
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.0.iter().filter(|cell| **cell == Some(mark)).count()
    }

    /// 返回落子后的新棋盘，原棋盘不变。
    pub fn with_mark(&self, index: CellIndex, mark: Mark) -> Board {
        let mut next = *self;
        next.0[index] = Some(mark);
        next
    }

    pub(crate) fn place(&mut self, index: CellIndex, mark: Mark) {
        self.0[index] = Some(mark);
    }

    /// 所有被 `mark` 占满的连线。
    pub fn completed_lines(&self, mark: Mark) -> impl Iterator<Item = [CellIndex; 3]> + '_ {
        LINES
            .iter()
            .copied()
            .filter(move |line| line.iter().all(|&index| self.0[index] == Some(mark)))
    }

    pub fn evaluate(&self) -> Outcome {
        evaluate(self)
    }
}

impl TryFrom<Vec<Option<String>>> for Board {
    type Error = BoardError;

    fn try_from(symbols: Vec<Option<String>>) -> Result<Self, Self::Error> {
        Board::from_symbols(&symbols)
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// 紧凑写法，例如 `"XX.OO...."`；`.`、`_`、`-` 表示空格。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != BOARD_SIZE {
            return Err(BoardError::WrongLength {
                expected: BOARD_SIZE,
                actual: symbols.len(),
            });
        }

        let mut cells = [None; BOARD_SIZE];
        for (index, symbol) in symbols.into_iter().enumerate() {
            cells[index] = match symbol {
                '.' | '_' | '-' => None,
                'x' | 'X' => Some(Mark::X),
                'o' | 'O' => Some(Mark::O),
                other => {
                    return Err(BoardError::UnknownSymbol {
                        index,
                        symbol: other.to_string(),
                    })
                }
            };
        }
        Ok(Self(cells))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.0 {
            f.write_str(cell.map(Mark::as_str).unwrap_or("."))?;
        }
        Ok(())
    }
}

/// 判定棋盘状态：先查 8 条连线，再看是否下满。
pub fn evaluate(board: &Board) -> Outcome {
    for line in LINES {
        let [a, b, c] = line;
        if let Some(mark) = board.0[a] {
            if board.0[b] == Some(mark) && board.0[c] == Some(mark) {
                return Outcome::Win { winner: mark, line };
            }
        }
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().expect("board literal should parse")
    }

    #[test]
    fn every_line_is_detected_for_both_marks() {
        for mark in [Mark::X, Mark::O] {
            for line in LINES {
                let mut cells = [None; BOARD_SIZE];
                for index in line {
                    cells[index] = Some(mark);
                }
                let outcome = evaluate(&Board::from_cells(cells));
                assert_eq!(outcome, Outcome::Win { winner: mark, line });
                assert_eq!(outcome.line(), &line);
            }
        }
    }

    #[test]
    fn win_reports_line_among_other_marks() {
        let outcome = board("XOX.XO.OX").evaluate();
        assert_eq!(
            outcome,
            Outcome::Win {
                winner: Mark::X,
                line: [0, 4, 8]
            }
        );
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let outcome = board("XOXXOOOXX").evaluate();
        assert_eq!(outcome, Outcome::Draw);
        assert!(outcome.line().is_empty());
        assert!(outcome.winner().is_none());
    }

    #[test]
    fn win_on_last_cell_beats_draw() {
        let outcome = board("XOXOXOOXX").evaluate();
        assert_eq!(outcome.winner(), Some(Mark::X));
    }

    #[test]
    fn open_board_is_in_progress() {
        assert_eq!(Board::new().evaluate(), Outcome::InProgress);
        assert_eq!(board("XO.......").evaluate(), Outcome::InProgress);
        assert_eq!(board("XOXXOO.XO").evaluate(), Outcome::InProgress);
        assert!(board("XOXXOO.XO").evaluate().line().is_empty());
    }

    #[test]
    fn with_mark_leaves_original_untouched() {
        let original = board("X........");
        let next = original.with_mark(4, Mark::O);
        assert_eq!(original.get(4), None);
        assert_eq!(next.get(4), Some(Mark::O));
        assert_eq!(next.empty_cells().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn symbols_from_frontend_are_parsed() {
        let raw = vec![
            Some("X"),
            None,
            Some(""),
            Some("o"),
            None,
            None,
            None,
            None,
            Some("x"),
        ];
        let parsed = Board::from_symbols(&raw).expect("symbols should parse");
        assert_eq!(parsed.to_string(), "X..O....X");
    }

    #[test]
    fn malformed_boards_are_rejected() {
        let short: Vec<Option<&str>> = vec![None; 8];
        assert_eq!(
            Board::from_symbols(&short),
            Err(BoardError::WrongLength {
                expected: 9,
                actual: 8
            })
        );

        let mut odd: Vec<Option<&str>> = vec![None; 9];
        odd[5] = Some("Z");
        assert_eq!(
            Board::from_symbols(&odd),
            Err(BoardError::UnknownSymbol {
                index: 5,
                symbol: "Z".into()
            })
        );

        assert!("XX?......".parse::<Board>().is_err());
    }

    #[test]
    fn board_serializes_as_plain_cell_array() {
        let json = serde_json::to_string(&board("X...O....")).expect("serialize");
        assert_eq!(json, r#"["X",null,null,null,"O",null,null,null,null]"#);
        let back: Board = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, board("X...O...."));
    }

    #[test]
    fn deserializing_accepts_frontend_symbols() {
        let back: Board =
            serde_json::from_str(r#"["x","",null,"","O","","","",""]"#).expect("deserialize");
        assert_eq!(back, board("X...O...."));

        let err = serde_json::from_str::<Board>(r#"["Z",null,null,null,null,null,null,null,null]"#)
            .expect_err("unknown symbol");
        assert!(err.to_string().contains("unknown symbol"));
        assert!(serde_json::from_str::<Board>("[null, null]").is_err());
    }

    #[test]
    fn completed_lines_finds_double_lines() {
        let lines: Vec<_> = board("XXXXOOXOO").completed_lines(Mark::X).collect();
        assert_eq!(lines, vec![[0, 1, 2], [0, 3, 6]]);
    }
}
