//! 候选着法生成
//!
//! 只考虑已有棋子附近的空位，并按位置价值截断，控制搜索分支数。

use gomoku_core::{Board, Player, Position};

use crate::evaluate::position_value;

/// 有意义空位的最大数量
pub const MAX_MEANINGFUL_CELLS: usize = 20;

/// 棋子数低于此值时邻域半径为 2，否则为 1
pub const EARLY_GAME_STONES: usize = 8;

/// 开局阶段（棋子数不超过此值）只考虑中心附近
const OPENING_STONES: usize = 2;

/// 开局阶段中心区域的半径
const OPENING_RADIUS: usize = 2;

/// 成五着法的排序加分
pub const WIN_PRIORITY: i32 = 1_000_000;

/// 挡住对方成五的排序加分
pub const BLOCK_PRIORITY: i32 = 500_000;

/// 以 center 为中心、半径 radius 的正方形区域内的空位（行优先）
fn empty_cells_around(board: &Board, center: Position, radius: usize) -> Vec<Position> {
    let size = board.size();
    let row_range = center.row.saturating_sub(radius)..=(center.row + radius).min(size - 1);
    let col_range = center.col.saturating_sub(radius)..=(center.col + radius).min(size - 1);

    row_range
        .flat_map(|row| col_range.clone().map(move |col| Position::new(row, col)))
        .filter(|&pos| board.is_empty_at(pos))
        .collect()
}

/// 空位周围 radius 范围内是否有棋子
fn has_neighbor(board: &Board, pos: Position, radius: usize) -> bool {
    let radius = radius as i32;
    (-radius..=radius).any(|d_row| {
        (-radius..=radius).any(|d_col| {
            (d_row, d_col) != (0, 0)
                && pos
                    .offset(d_row, d_col, board.size())
                    .is_some_and(|p| !board.is_empty_at(p))
        })
    })
}

/// 按位置价值保留前 limit 个（同分保持原顺序）
pub fn filter_top_candidates(board: &Board, cells: Vec<Position>, limit: usize) -> Vec<Position> {
    if cells.len() <= limit {
        return cells;
    }
    let mut scored: Vec<(Position, i32)> = cells
        .into_iter()
        .map(|pos| (pos, position_value(board, pos)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(limit);
    scored.into_iter().map(|(pos, _)| pos).collect()
}

/// 有意义的空位
///
/// - 空棋盘：只有中心
/// - 不超过两子：中心 5x5 区域内的空位
/// - 其余：有棋子邻居的空位（棋子少于 8 颗时半径 2，否则半径 1），
///   超过 20 个时按位置价值截断；一个都没有时退回中心 3x3 区域
pub fn meaningful_cells(board: &Board) -> Vec<Position> {
    let stones = board.stone_count();
    let center = board.center();

    if stones == 0 {
        return vec![center];
    }

    if stones <= OPENING_STONES {
        return empty_cells_around(board, center, OPENING_RADIUS);
    }

    let radius = if stones < EARLY_GAME_STONES { 2 } else { 1 };
    let cells: Vec<Position> = board
        .empty_cells()
        .into_iter()
        .filter(|&pos| has_neighbor(board, pos, radius))
        .collect();

    if cells.is_empty() {
        return empty_cells_around(board, center, 1);
    }

    filter_top_candidates(board, cells, MAX_MEANINGFUL_CELLS)
}

/// 搜索节点的分支上限：剩余深度越大，分支越少
pub fn branching_limit(depth: u8) -> usize {
    if depth >= 3 {
        8
    } else if depth >= 2 {
        12
    } else {
        16
    }
}

/// 着法排序分：成五最高，其次是挡住对方成五，再加位置价值
pub fn move_priority(board: &Board, pos: Position, player: Player, win_condition: usize) -> i32 {
    let mut priority = position_value(board, pos);
    if board.check_win(pos, player, win_condition) {
        priority += WIN_PRIORITY;
    }
    if board.check_win(pos, player.opponent(), win_condition) {
        priority += BLOCK_PRIORITY;
    }
    priority
}

/// 按排序分降序排列（同分保持原顺序）
pub fn sort_by_priority(
    board: &Board,
    cells: Vec<Position>,
    player: Player,
    win_condition: usize,
) -> Vec<Position> {
    let mut scored: Vec<(Position, i32)> = cells
        .into_iter()
        .map(|pos| (pos, move_priority(board, pos, player, win_condition)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(pos, _)| pos).collect()
}

/// 搜索节点使用的候选着法：有意义空位排序后按剩余深度截断
pub fn ordered_candidates(
    board: &Board,
    player: Player,
    depth: u8,
    win_condition: usize,
) -> Vec<Position> {
    let mut cells = sort_by_priority(board, meaningful_cells(board), player, win_condition);
    cells.truncate(branching_limit(depth));
    cells
}
