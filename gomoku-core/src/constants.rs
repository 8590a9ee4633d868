//! 规则常量定义

/// 默认棋盘边长
pub const DEFAULT_BOARD_SIZE: usize = 15;

/// 默认胜利所需连子数
pub const DEFAULT_WIN_CONDITION: usize = 5;

/// 可选棋盘边长（入门 / 标准 / 专业）
pub const BOARD_SIZE_OPTIONS: [usize; 3] = [13, 15, 19];

/// 可选胜利条件（四子 / 五子 / 六子）
pub const WIN_CONDITION_OPTIONS: [usize; 3] = [4, 5, 6];

/// 棋盘边长下限
pub const MIN_BOARD_SIZE: usize = 1;

/// 四个轴向：水平、垂直、主对角线（↘）、反对角线（↙）
///
/// 每个方向只存一个朝向，扫描时正反两侧都要走。
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
