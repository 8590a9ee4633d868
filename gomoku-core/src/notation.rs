//! 棋盘文本格式
//!
//! 每行一行棋盘，`.` 为空位，`X` 为黑棋，`O` 为白棋，行内空白忽略，空行跳过。
//!
//! 示例（5x5）：
//! ```text
//! . . . . .
//! . X O . .
//! . . X . .
//! . . . . .
//! . . . . .
//! ```

use crate::board::Board;
use crate::error::GameError;
use crate::player::{Cell, Player, Position};

/// 空位字符
pub const EMPTY_CHAR: char = '.';

/// 棋盘文本格式处理
pub struct Notation;

impl Notation {
    /// 解析棋盘文本，行数必须等于每行列数
    pub fn parse(text: &str) -> Result<Board, GameError> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(GameError::InvalidNotation {
                reason: "Empty board text".to_string(),
            });
        }

        let size = rows.len();
        let mut board = Board::new(size);

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(GameError::InvalidNotation {
                    reason: format!("Row {} has {} columns, expected {}", row_idx, row.len(), size),
                });
            }

            for (col_idx, &c) in row.iter().enumerate() {
                if c == EMPTY_CHAR {
                    continue;
                }
                let player = Player::from_char(c).ok_or_else(|| GameError::InvalidNotation {
                    reason: format!("Invalid stone character: {}", c),
                })?;
                board.set(Position::new(row_idx, col_idx), player);
            }
        }

        Ok(board)
    }

    /// 将棋盘转换为文本（格子之间以空格分隔）
    pub fn format(board: &Board) -> String {
        let mut output = String::with_capacity(board.size() * board.size() * 2);
        for row in 0..board.size() {
            let line: Vec<String> = (0..board.size())
                .map(|col| match board.get(Position::new(row, col)) {
                    Some(Cell::Stone(player)) => player.to_char().to_string(),
                    _ => EMPTY_CHAR.to_string(),
                })
                .collect();
            output.push_str(&line.join(" "));
            output.push('\n');
        }
        output
    }
}
