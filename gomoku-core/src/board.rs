//! 棋盘状态与胜负判定

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BOARD_SIZE, DIRECTIONS};
use crate::player::{Cell, Player, Position};

/// 棋盘
///
/// N x N 方阵，索引为 row * N + col。棋盘大小与规则无关，13 / 15 / 19 都走同一套逻辑。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// 创建空棋盘
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// 棋盘边长
    pub fn size(&self) -> usize {
        self.size
    }

    /// 坐标是否在棋盘内
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.is_within(self.size)
    }

    /// 获取格子状态，越界返回 None
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[pos.row * self.size + pos.col])
        } else {
            None
        }
    }

    /// 指定格子是否为空位（越界视为非空）
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    /// 落子（不检查规则，越界忽略）
    pub fn set(&mut self, pos: Position, player: Player) {
        if self.in_bounds(pos) {
            self.cells[pos.row * self.size + pos.col] = Cell::Stone(player);
        }
    }

    /// 清空指定格子
    pub fn clear(&mut self, pos: Position) {
        if self.in_bounds(pos) {
            self.cells[pos.row * self.size + pos.col] = Cell::Empty;
        }
    }

    /// 在副本上落子，原棋盘不变
    pub fn with_stone(&self, pos: Position, player: Player) -> Board {
        let mut board = self.clone();
        board.set(pos, player);
        board
    }

    /// 中心坐标
    pub fn center(&self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    /// 按行优先顺序遍历所有坐标
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
    }

    /// 按行优先顺序遍历所有格子
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// 获取所有空位（行优先）
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// 棋盘上的棋子数
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// 棋盘是否已满
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// 沿 (d_row, d_col) 方向统计连续同色棋子数（不含起点）
    fn count_direction(&self, pos: Position, d_row: i32, d_col: i32, player: Player) -> usize {
        let mut count = 0;
        let mut current = pos;
        while let Some(next) = current.offset(d_row, d_col, self.size) {
            if !self.get(next).is_some_and(|cell| cell.is_owned_by(player)) {
                break;
            }
            count += 1;
            current = next;
        }
        count
    }

    /// 检查在 pos 落下（或已落下）player 的棋子后是否连成 win_condition 子
    ///
    /// 四个轴向各自正反两侧计数，起点本身算 1。长连（超过 win_condition）同样算胜。
    pub fn check_win(&self, pos: Position, player: Player, win_condition: usize) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        DIRECTIONS.iter().any(|&(d_row, d_col)| {
            let count = 1
                + self.count_direction(pos, d_row, d_col, player)
                + self.count_direction(pos, -d_row, -d_col, player);
            count >= win_condition
        })
    }

    /// 检查是否平局（棋盘已满）
    ///
    /// 只在刚落的子没有形成胜利时才有意义。
    pub fn check_draw(&self) -> bool {
        self.is_full()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

/// 检查 (row, col) 处的 player 是否连成 win_condition 子
pub fn check_win(
    board: &Board,
    row: usize,
    col: usize,
    player: Player,
    win_condition: usize,
) -> bool {
    board.check_win(Position::new(row, col), player, win_condition)
}

/// 检查棋盘是否已满
pub fn check_draw(board: &Board) -> bool {
    board.check_draw()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_all(board: &mut Board, stones: &[(usize, usize)], player: Player) {
        for &(row, col) in stones {
            board.set(Position::new(row, col), player);
        }
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new(13);
        assert_eq!(board.size(), 13);
        assert_eq!(board.stone_count(), 0);
        assert_eq!(board.empty_cells().len(), 169);
        assert_eq!(board.center(), Position::new(6, 6));
        assert!(!board.check_draw());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::new(15);
        assert_eq!(board.get(Position::new(15, 0)), None);
        assert_eq!(board.get(Position::new(14, 14)), Some(Cell::Empty));
        assert!(!board.is_empty_at(Position::new(0, 15)));
    }

    #[test]
    fn test_set_and_clear() {
        let mut board = Board::new(15);
        let pos = Position::new(3, 4);
        board.set(pos, Player::White);
        assert_eq!(board.get(pos), Some(Cell::Stone(Player::White)));
        assert_eq!(board.stone_count(), 1);

        board.clear(pos);
        assert!(board.is_empty_at(pos));
    }

    #[test]
    fn test_with_stone_copies() {
        let board = Board::new(15);
        let copy = board.with_stone(Position::new(7, 7), Player::Black);
        assert_eq!(board.stone_count(), 0, "原棋盘不应被修改");
        assert_eq!(copy.stone_count(), 1);
    }

    #[test]
    fn test_check_win_horizontal() {
        let mut board = Board::new(15);
        place_all(&mut board, &[(7, 3), (7, 4), (7, 5), (7, 6), (7, 7)], Player::Black);
        assert!(board.check_win(Position::new(7, 5), Player::Black, 5));
        assert!(!board.check_win(Position::new(7, 5), Player::White, 5));
    }

    #[test]
    fn test_check_win_all_directions() {
        let lines: [[(usize, usize); 5]; 4] = [
            [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
            [(2, 9), (3, 9), (4, 9), (5, 9), (6, 9)],
            [(5, 5), (6, 6), (7, 7), (8, 8), (9, 9)],
            [(10, 4), (11, 3), (12, 2), (13, 1), (14, 0)],
        ];
        for line in lines {
            let mut board = Board::new(15);
            place_all(&mut board, &line, Player::White);
            for &(row, col) in &line {
                assert!(
                    check_win(&board, row, col, Player::White, 5),
                    "({}, {}) 应判定为胜利: {:?}",
                    row,
                    col,
                    line
                );
            }
        }
    }

    #[test]
    fn test_check_win_broken_line() {
        let mut board = Board::new(15);
        place_all(&mut board, &[(7, 3), (7, 4), (7, 6), (7, 7)], Player::Black);
        board.set(Position::new(7, 5), Player::White);
        assert!(!board.check_win(Position::new(7, 4), Player::Black, 5));
    }

    #[test]
    fn test_check_win_overline() {
        let mut board = Board::new(15);
        place_all(
            &mut board,
            &[(4, 0), (4, 1), (4, 2), (4, 3), (4, 4), (4, 5)],
            Player::Black,
        );
        assert!(board.check_win(Position::new(4, 2), Player::Black, 5), "长连也算胜利");
    }

    #[test]
    fn test_check_win_stops_at_edge() {
        let mut board = Board::new(4);
        place_all(&mut board, &[(0, 0), (0, 1), (0, 2), (0, 3)], Player::Black);
        assert!(board.check_win(Position::new(0, 3), Player::Black, 4));
        // 整行只有 4 格，五连不可能
        assert!(!board.check_win(Position::new(0, 3), Player::Black, 5));
    }

    #[test]
    fn test_check_win_other_conditions() {
        let mut board = Board::new(19);
        place_all(&mut board, &[(9, 9), (10, 10), (11, 11), (12, 12)], Player::White);
        assert!(board.check_win(Position::new(12, 12), Player::White, 4));
        assert!(!board.check_win(Position::new(12, 12), Player::White, 5));
        assert!(!board.check_win(Position::new(12, 12), Player::White, 6));
    }

    #[test]
    fn test_check_draw_full_board() {
        let mut board = Board::new(3);
        for pos in board.positions().collect::<Vec<_>>() {
            let player = if (pos.row + pos.col) % 2 == 0 {
                Player::Black
            } else {
                Player::White
            };
            board.set(pos, player);
        }
        assert!(check_draw(&board));

        board.clear(Position::new(1, 1));
        assert!(!check_draw(&board), "还有空位，不是平局");
    }
}
