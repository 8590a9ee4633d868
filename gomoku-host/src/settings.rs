//! 应用设置
//!
//! 对局、AI、计时三组配置保存为一个 JSON 文档，缺失的字段取默认值。

use gomoku_ai::AiConfig;
use gomoku_core::GameConfig;
use serde::{Deserialize, Serialize};

use crate::timer::TimerConfig;

/// 应用设置
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub ai: AiConfig,
    pub timer: TimerConfig,
}

impl Settings {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
