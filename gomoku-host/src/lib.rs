//! 五子棋宿主层
//!
//! 包含:
//! - 对局会话（人类落子、异步 AI 回合、悔棋、重开）
//! - 对局计时器
//! - 应用设置
//! - 设置与棋谱存储

pub mod session;
pub mod settings;
pub mod storage;
pub mod timer;

pub use session::{AiRequest, AiThinkingState, Session};
pub use settings::Settings;
pub use storage::{SavedRecordInfo, StorageManager};
pub use timer::{format_time, GameTimer, TimerConfig, TimerMode};
