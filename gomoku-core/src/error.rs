//! 错误类型定义

use thiserror::Error;

/// 五子棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 坐标越界
    #[error("Position out of bounds: ({row}, {col}) on a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    /// 目标格已有棋子
    #[error("Cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 当前配置不允许悔棋
    #[error("Undo is disabled by configuration")]
    UndoDisabled,

    /// 没有可撤销的走法
    #[error("No move to undo")]
    NothingToUndo,

    /// 无效的棋盘文本
    #[error("Invalid board notation: {reason}")]
    InvalidNotation { reason: String },

    /// 棋谱与规则不符
    #[error("Invalid game record: {reason}")]
    InvalidRecord { reason: String },

    /// 无效的对局配置
    #[error("Invalid game config: {reason}")]
    InvalidConfig { reason: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, GameError>;
