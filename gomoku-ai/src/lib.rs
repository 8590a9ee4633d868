//! 五子棋 AI 引擎
//!
//! 包含:
//! - 连线窗口评估与战术风格权重
//! - 候选着法生成
//! - 按难度、风格排列的战术提议者
//! - Minimax + Alpha-Beta 搜索
//! - 迭代加深与可替换的时钟

mod candidates;
mod config;
mod deadline;
mod evaluate;
mod search;
mod tactics;

pub use candidates::{meaningful_cells, ordered_candidates};
pub use config::{AiConfig, Difficulty, EvaluationStyle, SearchConfig, MAX_SEARCH_TIME_MS};
pub use deadline::{Clock, Deadline, WallClock};
pub use evaluate::{position_value, Evaluator};
pub use search::{win_score, AiEngine, SearchReport, SearchResult, WIN_SCORE};
pub use tactics::{find_winning_move, MoveProposer, Strategy};
