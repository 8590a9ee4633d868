//! 战术着法与策略表
//!
//! 每种难度和风格对应一个有序的提议者列表，引擎依次询问，第一个给出着法的生效。

use gomoku_core::{Board, Player, Position};
use serde::{Deserialize, Serialize};

use crate::candidates::meaningful_cells;
use crate::config::{Difficulty, EvaluationStyle, SearchConfig};
use crate::evaluate::Evaluator;

/// 简单难度检查必胜/必防的概率
pub const EASY_TACTICS_RATE: f64 = 0.3;

/// 多重威胁：窗口分不低于此值的方向算一个威胁（活三及以上）
pub const THREAT_LINE_SCORE: i32 = 100;

/// 关键防守：对方落子后任一方向窗口分不低于此值（活四）
pub const CRITICAL_LINE_SCORE: i32 = 1000;

/// 预防威胁：对方落子后窗口分至少达到此值才值得预防
pub const PREVENT_MIN_SCORE: i32 = 10;

/// 着法提议者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveProposer {
    /// 立即成五
    ImmediateWin,
    /// 挡住对方的立即成五
    BlockWin,
    /// 一手形成两个以上方向的活三
    MultiThreat,
    /// 抢占对方能形成活四的位置
    CriticalDefense,
    /// 抢占对方连线潜力最大的位置
    PreventThreat,
    /// 单层评估取最高分
    Evaluation,
    /// 迭代加深 Alpha-Beta
    DeepSearch,
    /// 随机空位
    Random,
    /// 兜底选择
    Backup,
}

impl MoveProposer {
    /// 是否属于战术检查（简单难度按概率跳过）
    pub fn is_tactical(&self) -> bool {
        matches!(
            self,
            MoveProposer::ImmediateWin
                | MoveProposer::BlockWin
                | MoveProposer::MultiThreat
                | MoveProposer::CriticalDefense
                | MoveProposer::PreventThreat
        )
    }
}

/// 一次选着使用的提议者顺序
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub proposers: Vec<MoveProposer>,
    /// 战术检查生效的概率，None 表示总是生效
    pub tactics_rate: Option<f64>,
}

impl Strategy {
    pub fn for_config(config: &SearchConfig) -> Self {
        use MoveProposer::*;

        if config.difficulty == Difficulty::Easy {
            return Self {
                proposers: vec![ImmediateWin, BlockWin, Random, Backup],
                tactics_rate: Some(EASY_TACTICS_RATE),
            };
        }

        let fallback = if config.difficulty == Difficulty::Hard {
            DeepSearch
        } else {
            Evaluation
        };

        let proposers = match config.style {
            EvaluationStyle::Offensive => {
                vec![ImmediateWin, MultiThreat, BlockWin, CriticalDefense, fallback, Backup]
            }
            EvaluationStyle::Defensive => {
                vec![ImmediateWin, BlockWin, PreventThreat, fallback, Backup]
            }
            EvaluationStyle::Balanced => vec![ImmediateWin, BlockWin, fallback, Backup],
        };

        Self {
            proposers,
            tactics_rate: None,
        }
    }
}

/// 行优先扫描所有空位，返回第一个能让 player 立即成五的位置
pub fn find_winning_move(board: &Board, player: Player, win_condition: usize) -> Option<Position> {
    board
        .empty_cells()
        .into_iter()
        .find(|&pos| board.check_win(pos, player, win_condition))
}

/// 一手在两个以上方向形成活三的位置
pub fn find_multiple_threat(
    board: &Board,
    player: Player,
    evaluator: &Evaluator,
) -> Option<Position> {
    meaningful_cells(board).into_iter().find(|&pos| {
        let after = board.with_stone(pos, player);
        let threats = evaluator
            .line_scores(&after, pos, player)
            .iter()
            .filter(|&&score| score >= THREAT_LINE_SCORE)
            .count();
        threats >= 2
    })
}

/// 对方落在该处后任一方向能形成活四的位置
pub fn find_critical_defense(
    board: &Board,
    opponent: Player,
    evaluator: &Evaluator,
) -> Option<Position> {
    meaningful_cells(board).into_iter().find(|&pos| {
        let after = board.with_stone(pos, opponent);
        evaluator
            .line_scores(&after, pos, opponent)
            .iter()
            .any(|&score| score >= CRITICAL_LINE_SCORE)
    })
}

/// 对方落在该处后连线分最高的位置（至少 PREVENT_MIN_SCORE，同分取先出现者）
pub fn find_prevent_threat(
    board: &Board,
    opponent: Player,
    evaluator: &Evaluator,
) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;
    for pos in meaningful_cells(board) {
        let after = board.with_stone(pos, opponent);
        let threat = evaluator
            .line_scores(&after, pos, opponent)
            .into_iter()
            .max()
            .unwrap_or(0);
        if threat >= PREVENT_MIN_SCORE && best.map_or(true, |(_, score)| threat > score) {
            best = Some((pos, threat));
        }
    }
    best.map(|(pos, _)| pos)
}

/// 在有意义空位上试落一子，取局面评估最高者
pub fn best_by_evaluation(
    board: &Board,
    player: Player,
    evaluator: &Evaluator,
) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;
    for pos in meaningful_cells(board) {
        let score = evaluator.evaluate_position(&board.with_stone(pos, player), player);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((pos, score));
        }
    }
    best.map(|(pos, _)| pos)
}
