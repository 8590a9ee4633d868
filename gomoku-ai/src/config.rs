//! AI 配置

use std::time::Duration;

use gomoku_core::{Player, DEFAULT_WIN_CONDITION};
use serde::{Deserialize, Serialize};

/// 单次搜索的时间上限（毫秒），无论配置的思考时间多长
pub const MAX_SEARCH_TIME_MS: u64 = 1000;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单：随机落子为主，30% 概率检查必胜/必防
    Easy,
    /// 中等：战术判断 + 单层评估
    Medium,
    /// 困难：战术判断 + 迭代加深 Alpha-Beta
    Hard,
}

impl Difficulty {
    /// 难度预设：(最大搜索深度, 思考时间毫秒)
    pub fn preset(&self) -> (u8, u64) {
        match self {
            Difficulty::Easy => (1, 500),
            Difficulty::Medium => (3, 1000),
            Difficulty::Hard => (4, 1500),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Medium => "中等",
            Difficulty::Hard => "困难",
        }
    }
}

/// 战术风格（评估时己方与对方连线的权重）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStyle {
    /// 进攻型：己方 x1.3，对方 x0.7
    Offensive,
    /// 防守型：己方 x0.7，对方 x1.3
    Defensive,
    /// 平衡型：攻守权重相等
    Balanced,
}

impl EvaluationStyle {
    pub fn display_name(&self) -> &'static str {
        match self {
            EvaluationStyle::Offensive => "进攻型",
            EvaluationStyle::Defensive => "防守型",
            EvaluationStyle::Balanced => "平衡型",
        }
    }
}

/// AI 配置（由外部应用持有，核心只读）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// 是否启用 AI
    pub enabled: bool,
    pub difficulty: Difficulty,
    /// AI 执哪一方
    pub player: Player,
    /// 思考时间（毫秒）
    pub thinking_time_ms: u64,
    pub evaluation_style: EvaluationStyle,
    /// Minimax 最大搜索深度
    pub max_depth: u8,
}

impl AiConfig {
    /// 按难度预设创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::default().with_difficulty(difficulty)
    }

    /// 切换难度，同时套用该难度的深度和思考时间
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        let (max_depth, thinking_time_ms) = difficulty.preset();
        self.difficulty = difficulty;
        self.max_depth = max_depth;
        self.thinking_time_ms = thinking_time_ms;
        self
    }

    pub fn with_style(mut self, style: EvaluationStyle) -> Self {
        self.evaluation_style = style;
        self
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.player = player;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            difficulty: Difficulty::Medium,
            player: Player::White,
            thinking_time_ms: 1000,
            evaluation_style: EvaluationStyle::Balanced,
            max_depth: 3,
        }
    }
}

/// 单次搜索使用的不可变配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub difficulty: Difficulty,
    pub style: EvaluationStyle,
    pub max_depth: u8,
    /// 时间预算，已截断到 MAX_SEARCH_TIME_MS
    pub time_budget: Duration,
    pub win_condition: usize,
}

impl SearchConfig {
    /// 由 AI 配置与胜利条件构建
    pub fn new(ai: &AiConfig, win_condition: usize) -> Self {
        Self {
            difficulty: ai.difficulty,
            style: ai.evaluation_style,
            max_depth: ai.max_depth.max(1),
            time_budget: Duration::from_millis(ai.thinking_time_ms.min(MAX_SEARCH_TIME_MS)),
            win_condition,
        }
    }

    /// 按难度与风格创建（其余参数取预设）
    pub fn from_difficulty(
        difficulty: Difficulty,
        style: EvaluationStyle,
        win_condition: usize,
    ) -> Self {
        Self::new(&AiConfig::from_difficulty(difficulty).with_style(style), win_condition)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(&AiConfig::default(), DEFAULT_WIN_CONDITION)
    }
}
