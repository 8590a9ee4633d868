//! 棋手、格子与坐标定义

use serde::{Deserialize, Serialize};

/// 棋手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// 黑棋（默认先手）
    Black,
    /// 白棋（默认后手）
    White,
}

impl Player {
    /// 获取对手
    pub fn opponent(&self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// 棋盘文本中的字符
    pub fn to_char(&self) -> char {
        match self {
            Player::Black => 'X',
            Player::White => 'O',
        }
    }

    /// 从棋盘文本字符解析
    pub fn from_char(c: char) -> Option<Player> {
        match c {
            'X' | 'x' => Some(Player::Black),
            'O' | 'o' => Some(Player::White),
            _ => None,
        }
    }

    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Player::Black => "黑棋",
            Player::White => "白棋",
        }
    }
}

/// 格子状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// 空位
    #[default]
    Empty,
    /// 已落子
    Stone(Player),
}

impl Cell {
    /// 是否为空位
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// 获取占据该格的棋手
    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Stone(player) => Some(*player),
        }
    }

    /// 是否被指定棋手占据
    pub fn is_owned_by(&self, player: Player) -> bool {
        *self == Cell::Stone(player)
    }
}

/// 棋盘坐标（0 起始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// 行
    pub row: usize,
    /// 列
    pub col: usize,
}

impl Position {
    /// 创建新坐标（不检查边界）
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 检查坐标是否在 size x size 棋盘内
    pub fn is_within(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// 获取偏移后的坐标，越界返回 None
    pub fn offset(&self, d_row: i32, d_col: i32, size: usize) -> Option<Position> {
        let row = self.row as i64 + d_row as i64;
        let col = self.col as i64 + d_col as i64;
        let size = size as i64;
        if row >= 0 && row < size && col >= 0 && col < size {
            Some(Position {
                row: row as usize,
                col: col as usize,
            })
        } else {
            None
        }
    }

    /// 曼哈顿距离
    pub fn manhattan(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
