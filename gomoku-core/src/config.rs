//! 对局配置

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_WIN_CONDITION, MIN_BOARD_SIZE};
use crate::error::{GameError, Result};
use crate::player::Player;

/// 对局配置
///
/// 只能通过 `Game::apply_config` 生效，生效时整局重置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 棋盘边长
    pub board_size: usize,
    /// 胜利所需连子数
    pub win_condition: usize,
    /// 先手
    pub first_player: Player,
    /// 是否允许悔棋
    pub allow_undo: bool,
}

impl GameConfig {
    /// 胜利条件是否可能达成
    ///
    /// 胜利条件超过棋盘边长时规则仍然正常运行，只是永远不会判胜。
    pub fn is_winnable(&self) -> bool {
        self.win_condition <= self.board_size
    }

    /// 检查配置能否建出棋盘
    pub fn validate(&self) -> Result<()> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(GameError::InvalidConfig {
                reason: format!("board size {} is too small", self.board_size),
            });
        }
        if self.win_condition == 0 {
            return Err(GameError::InvalidConfig {
                reason: "win condition must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            win_condition: DEFAULT_WIN_CONDITION,
            first_player: Player::Black,
            allow_undo: true,
        }
    }
}
