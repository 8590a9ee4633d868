//! 对局会话
//!
//! 把规则核心、AI 引擎和计时器串起来：人类落子、AI 回合、悔棋、重开和应用设置。

use std::time::{Duration, Instant};

use gomoku_ai::{AiConfig, AiEngine};
use gomoku_core::{Board, Game, GameEvent, Move, Player, Result};
use tracing::{debug, info};

use crate::settings::Settings;
use crate::timer::GameTimer;

/// AI 思考状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiThinkingState {
    pub is_thinking: bool,
    pub started_at: Option<Instant>,
    /// 上一次思考用时
    pub last_duration: Option<Duration>,
}

/// 一次待执行的 AI 搜索
///
/// 由 `Session::begin_ai_turn` 发出，搜索结束后交回 `Session::finish_ai_turn`。
#[derive(Debug, Clone)]
pub struct AiRequest {
    pub engine: AiEngine,
    pub board: Board,
    pub player: Player,
    generation: u64,
}

impl AiRequest {
    /// 在后台线程执行搜索
    pub async fn run(&self) -> Option<Move> {
        self.engine.select_move_async(self.board.clone(), self.player).await
    }
}

/// 对局会话
pub struct Session {
    game: Game,
    ai: AiConfig,
    timer: GameTimer,
    thinking: AiThinkingState,
    /// 每次重开、悔棋、改设置递增，用于丢弃过期的 AI 结果
    generation: u64,
}

impl Session {
    /// 按设置创建会话
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.game.validate()?;
        Ok(Self {
            game: Game::new(settings.game),
            ai: settings.ai,
            timer: GameTimer::new(settings.timer, settings.game.first_player),
            thinking: AiThinkingState::default(),
            generation: 0,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn ai_config(&self) -> &AiConfig {
        &self.ai
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    pub fn thinking(&self) -> &AiThinkingState {
        &self.thinking
    }

    /// 取出对局事件
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.game.take_events()
    }

    /// 是否轮到 AI 落子
    pub fn is_ai_turn(&self) -> bool {
        self.ai.enabled && self.game.is_active() && self.game.current_player() == self.ai.player
    }

    /// 人类落子，AI 回合或 AI 思考中拒绝
    pub fn play_human(&mut self, row: usize, col: usize) -> bool {
        if self.is_ai_turn() || self.thinking.is_thinking {
            debug!("AI 回合，忽略人类落子 ({}, {})", row, col);
            return false;
        }
        self.place(row, col)
    }

    /// 开始 AI 回合
    ///
    /// 不是 AI 回合或已有搜索在进行时返回 None。
    pub fn begin_ai_turn(&mut self) -> Option<AiRequest> {
        if !self.is_ai_turn() || self.thinking.is_thinking {
            return None;
        }

        self.thinking.is_thinking = true;
        self.thinking.started_at = Some(Instant::now());
        debug!("AI 开始思考 ({})", self.ai.difficulty.display_name());

        Some(AiRequest {
            engine: AiEngine::from_ai_config(&self.ai, self.game.config().win_condition),
            board: self.game.board().clone(),
            player: self.ai.player,
            generation: self.generation,
        })
    }

    /// 结束 AI 回合并落子，搜索期间局面已变化时丢弃结果
    pub fn finish_ai_turn(&mut self, request: &AiRequest, mv: Option<Move>) -> Option<Move> {
        if request.generation != self.generation {
            debug!("丢弃过期的 AI 着法 {:?}", mv);
            return None;
        }

        self.thinking.is_thinking = false;
        self.thinking.last_duration = self.thinking.started_at.take().map(|start| start.elapsed());

        let mv = mv?;
        if mv.player != self.game.current_player() || !self.place(mv.row, mv.col) {
            return None;
        }
        if let Some(duration) = self.thinking.last_duration {
            info!("AI 落子 {}，用时 {:?}", mv, duration);
        }
        Some(mv)
    }

    /// 完整执行一次 AI 回合
    pub async fn play_ai_turn(&mut self) -> Option<Move> {
        let request = self.begin_ai_turn()?;
        let mv = request.run().await;
        self.finish_ai_turn(&request, mv)
    }

    /// 悔棋一步
    pub fn undo(&mut self) -> bool {
        match self.game.try_undo_move() {
            Ok(mv) => {
                debug!("悔棋 {}", mv);
                self.invalidate_ai();
                self.timer.start(self.game.current_player());
                true
            }
            Err(e) => {
                debug!("悔棋失败: {}", e);
                false
            }
        }
    }

    /// 重新开局
    pub fn reset(&mut self) {
        self.game.reset();
        self.invalidate_ai();
        self.timer.reset(self.game.current_player());
    }

    /// 应用新设置并重新开局
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<()> {
        self.game.apply_config(settings.game)?;
        self.ai = settings.ai;
        self.timer = GameTimer::new(settings.timer, self.game.current_player());
        self.invalidate_ai();
        Ok(())
    }

    fn place(&mut self, row: usize, col: usize) -> bool {
        if !self.game.make_move(row, col) {
            return false;
        }

        // 先问刚走完的一方是否超时，再切换计时
        if self.game.check_clock(&self.timer) || !self.game.is_active() {
            self.timer.stop();
        } else {
            self.timer.switch_turn();
        }
        true
    }

    fn invalidate_ai(&mut self) {
        self.generation += 1;
        self.thinking.is_thinking = false;
        self.thinking.started_at = None;
    }
}
