//! 棋谱记录格式
//!
//! JSON 格式的对局存档，只记录配置、元数据和落子顺序，局面通过重放得到。

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::game::{Game, GameOutcome};
use crate::moves::Move;

/// 棋谱版本
pub const RECORD_VERSION: &str = "1.0";

/// 对局元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    /// 黑方名称
    pub black_player: String,
    /// 白方名称
    pub white_player: String,
    /// 对局日期
    pub date: String,
    /// 对局配置
    pub config: GameConfig,
    /// 对局结果（未结束为 None）
    pub result: Option<GameOutcome>,
    /// AI 难度（人机对局）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_difficulty: Option<String>,
}

/// 完整的棋谱记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// 版本号
    pub version: String,
    /// 元数据
    pub metadata: GameMetadata,
    /// 落子顺序
    pub moves: Vec<Move>,
}

impl GameRecord {
    /// 创建空棋谱
    pub fn new(black_player: String, white_player: String, config: GameConfig) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            metadata: GameMetadata {
                black_player,
                white_player,
                date: Utc::now().format("%Y-%m-%d").to_string(),
                config,
                result: None,
                ai_difficulty: None,
            },
            moves: Vec::new(),
        }
    }

    /// 从对局生成棋谱
    pub fn from_game(game: &Game, black_player: String, white_player: String) -> Self {
        let mut record = Self::new(black_player, white_player, *game.config());
        record.moves = game.history().as_slice().to_vec();
        if game.outcome().is_terminal() {
            record.set_result(game.outcome());
        }
        record
    }

    /// 设置 AI 难度
    pub fn set_ai_difficulty(&mut self, difficulty: &str) {
        self.metadata.ai_difficulty = Some(difficulty.to_string());
    }

    /// 添加走法
    pub fn add_move(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// 设置对局结果
    pub fn set_result(&mut self, result: GameOutcome) {
        self.metadata.result = Some(result);
    }

    /// 按规则重放棋谱，得到对局
    ///
    /// 每一步都走正常的落子流程，棋谱中任何非法走法都会被拒绝。
    /// 超时判负不在落子序列里体现，重放后的对局保持进行中。
    pub fn replay(&self) -> Result<Game> {
        self.metadata.config.validate()?;
        let mut game = Game::new(self.metadata.config);

        for (index, mv) in self.moves.iter().enumerate() {
            if mv.player != game.current_player() {
                return Err(GameError::InvalidRecord {
                    reason: format!(
                        "move {} is played by {:?}, expected {:?}",
                        index,
                        mv.player,
                        game.current_player()
                    ),
                });
            }
            game.try_make_move(mv.row, mv.col)
                .map_err(|e| GameError::InvalidRecord {
                    reason: format!("move {} rejected: {}", index, e),
                })?;
        }
        game.take_events();

        Ok(game)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
