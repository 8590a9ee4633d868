//! 局面评估函数

use gomoku_core::{Board, Cell, Player, Position, DIRECTIONS};

use crate::config::EvaluationStyle;

/// 窗口内己方棋子数对应的基础分
pub const LINE_SCORES: [i32; 6] = [0, 1, 10, 100, 1000, 10000];

/// 一端被堵时的分数除数
const HALF_BLOCKED_DIVISOR: i32 = 2;

/// 中心距离分的上限
const CENTER_BONUS: i32 = 10;

/// 评估器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    win_condition: usize,
    style: EvaluationStyle,
}

impl Evaluator {
    pub fn new(win_condition: usize, style: EvaluationStyle) -> Self {
        Self {
            win_condition,
            style,
        }
    }

    pub fn win_condition(&self) -> usize {
        self.win_condition
    }

    pub fn style(&self) -> EvaluationStyle {
        self.style
    }

    /// 评估从 start 出发、沿 (d_row, d_col) 方向长度为 win_condition 的窗口
    ///
    /// 只沿正方向走 win_condition 格，遇到对方棋子或棋盘边界时停止并记为被堵。
    /// 被堵两次返回 0，被堵一次分数减半。
    pub fn evaluate_line(
        &self,
        board: &Board,
        start: Position,
        d_row: i32,
        d_col: i32,
        player: Player,
    ) -> i32 {
        let size = board.size();
        let mut blocked = 0;
        let mut count = 0usize;
        for step in 0..self.win_condition as i32 {
            let Some(pos) = start.offset(d_row * step, d_col * step, size) else {
                blocked += 1;
                break;
            };
            match board.get(pos) {
                Some(Cell::Stone(owner)) if owner == player => count += 1,
                Some(Cell::Stone(_)) => {
                    blocked += 1;
                    break;
                }
                _ => {}
            }
        }

        if blocked >= 2 {
            return 0;
        }

        let base = LINE_SCORES[count.min(LINE_SCORES.len() - 1)];
        if blocked == 1 {
            base / HALF_BLOCKED_DIVISOR
        } else {
            base
        }
    }

    /// 四个方向上以 start 为起点的窗口分数
    pub fn line_scores(&self, board: &Board, start: Position, player: Player) -> [i32; 4] {
        DIRECTIONS.map(|(d_row, d_col)| self.evaluate_line(board, start, d_row, d_col, player))
    }

    /// 某一方在整个棋盘上的连线总分（不含风格权重）
    pub fn raw_score(&self, board: &Board, player: Player) -> i32 {
        board
            .positions()
            .map(|pos| self.line_scores(board, pos, player).iter().sum::<i32>())
            .sum()
    }

    /// 从 player 视角评估局面：己方连线分与对方连线分按风格加权后相减
    pub fn evaluate_position(&self, board: &Board, player: Player) -> i32 {
        let my_score = self.raw_score(board, player);
        let opponent_score = self.raw_score(board, player.opponent());
        self.apply_style(my_score, opponent_score)
    }

    /// 按战术风格加权（权重以十分之一为单位，保持整数运算）
    pub fn apply_style(&self, my_score: i32, opponent_score: i32) -> i32 {
        match self.style {
            EvaluationStyle::Offensive => (my_score * 13 - opponent_score * 7) / 10,
            EvaluationStyle::Defensive => (my_score * 7 - opponent_score * 13) / 10,
            EvaluationStyle::Balanced => my_score - opponent_score,
        }
    }
}

/// 位置价值：靠近中心加分，四个正方向上距离 1、2 处每有一颗棋子再加分
///
/// 只看棋盘几何，不区分棋子颜色。
pub fn position_value(board: &Board, pos: Position) -> i32 {
    let distance = pos.manhattan(board.center()) as i32;
    let mut value = (CENTER_BONUS - distance).max(0);

    for &(d_row, d_col) in DIRECTIONS.iter() {
        for step in 1..=2 {
            let neighbor = pos.offset(d_row * step, d_col * step, board.size());
            if neighbor.and_then(|p| board.get(p)).is_some_and(|cell| !cell.is_empty()) {
                value += 5 / step;
            }
        }
    }

    value
}
