//! 走法与走法历史

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::player::{Player, Position};

/// 一次落子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 行（0 起始）
    pub row: usize,
    /// 列（0 起始）
    pub col: usize,
    /// 落子方
    pub player: Player,
}

impl Move {
    /// 创建新走法
    pub fn new(row: usize, col: usize, player: Player) -> Self {
        Self { row, col, player }
    }

    /// 从坐标创建
    pub fn at(pos: Position, player: Player) -> Self {
        Self::new(pos.row, pos.col, player)
    }

    /// 落子坐标
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.player.display_name(), self.position())
    }
}

/// 走法历史
///
/// 只在尾部追加或弹出，顺序即落子顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    /// 创建空历史
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加走法
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// 弹出最后一步
    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    /// 最后一步
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// 在 size x size 空棋盘上重放前 cursor 步（cursor 超出时按全部走法处理）
    ///
    /// 复盘视图只读，不触碰实际对局棋盘。
    pub fn replay(&self, size: usize, cursor: usize) -> Board {
        let mut board = Board::new(size);
        for mv in self.moves.iter().take(cursor) {
            board.set(mv.position(), mv.player);
        }
        board
    }
}

impl From<Vec<Move>> for MoveHistory {
    fn from(moves: Vec<Move>) -> Self {
        Self { moves }
    }
}

impl<'a> IntoIterator for &'a MoveHistory {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
