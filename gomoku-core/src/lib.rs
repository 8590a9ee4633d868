//! 五子棋规则核心
//!
//! 包含:
//! - 棋手、格子、坐标等核心数据结构
//! - 棋盘与四方向胜负判定
//! - 对局状态机（落子、悔棋、重置、复盘）
//! - 对局配置
//! - 棋谱格式 (JSON) 与棋盘文本格式

mod board;
mod config;
mod constants;
mod error;
mod game;
mod moves;
mod notation;
mod player;
mod record;

pub use board::{check_draw, check_win, Board};
pub use config::GameConfig;
pub use constants::*;
pub use error::{GameError, Result};
pub use game::{Game, GameEvent, GameOutcome, GameSnapshot, PlayerClock, WinReason};
pub use moves::{Move, MoveHistory};
pub use notation::Notation;
pub use player::{Cell, Player, Position};
pub use record::{GameMetadata, GameRecord, RECORD_VERSION};
