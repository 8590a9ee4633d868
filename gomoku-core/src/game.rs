//! 对局状态机
//!
//! 唯一允许修改实际棋盘和走法历史的组件。非法操作一律静默拒绝（返回 false 或不做任何事），
//! 需要原因时使用 `try_*` 版本。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::moves::{Move, MoveHistory};
use crate::player::{Player, Position};

/// 胜利原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// 连成指定子数
    Connection,
    /// 对方超时
    Timeout,
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameOutcome {
    /// 进行中
    #[default]
    InProgress,
    /// 一方获胜
    Win { winner: Player, reason: WinReason },
    /// 和棋（棋盘已满）
    Draw,
}

impl GameOutcome {
    /// 是否已结束
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// 获胜方
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::Win { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

/// 对局事件
///
/// 在事实成立的那一刻入队，音效和界面各自消费。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// 落下一子
    MovePlaced(Move),
    /// 轮到某方走棋
    TurnChanged(Player),
    /// 一方获胜
    GameWon { winner: Player, reason: WinReason },
    /// 和棋
    GameDrawn,
}

/// 计时器协作者
///
/// 核心只关心"某方时间是否用完"，计时本身由外部负责。
pub trait PlayerClock {
    fn is_expired(&self, player: Player) -> bool;
}

/// 对局快照（供渲染层读取）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub current_player: Player,
    pub outcome: GameOutcome,
    pub last_move: Option<Move>,
    pub history: Vec<Move>,
}

/// 对局
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    history: MoveHistory,
    current_player: Player,
    outcome: GameOutcome,
    last_move: Option<Move>,
    events: Vec<GameEvent>,
}

impl Game {
    /// 按配置创建新对局
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            board: Board::new(config.board_size),
            history: MoveHistory::new(),
            current_player: config.first_player,
            outcome: GameOutcome::InProgress,
            last_move: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// 当前走子方
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// 最后一步（用于高亮）
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// 对局是否仍在进行
    pub fn is_active(&self) -> bool {
        !self.outcome.is_terminal()
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.winner()
    }

    /// 落子，失败返回 false 且不做任何修改
    pub fn make_move(&mut self, row: usize, col: usize) -> bool {
        match self.try_make_move(row, col) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("拒绝落子 ({}, {}): {}", row, col, e);
                false
            }
        }
    }

    /// 落子，失败时返回原因
    pub fn try_make_move(&mut self, row: usize, col: usize) -> Result<Move> {
        if self.outcome.is_terminal() {
            return Err(GameError::GameOver);
        }

        let pos = Position::new(row, col);
        if !self.board.in_bounds(pos) {
            return Err(GameError::OutOfBounds {
                row,
                col,
                size: self.board.size(),
            });
        }
        if !self.board.is_empty_at(pos) {
            return Err(GameError::Occupied { row, col });
        }

        let mv = Move::at(pos, self.current_player);
        self.board.set(pos, mv.player);
        self.history.push(mv);
        self.last_move = Some(mv);
        self.events.push(GameEvent::MovePlaced(mv));

        // 先判胜，再判和
        if self.board.check_win(pos, mv.player, self.config.win_condition) {
            self.finish(GameOutcome::Win {
                winner: mv.player,
                reason: WinReason::Connection,
            });
        } else if self.board.check_draw() {
            self.finish(GameOutcome::Draw);
        } else {
            self.current_player = mv.player.opponent();
            self.events.push(GameEvent::TurnChanged(self.current_player));
        }

        Ok(mv)
    }

    /// 落子后立即询问计时器
    pub fn make_move_with_clock(
        &mut self,
        row: usize,
        col: usize,
        clock: &impl PlayerClock,
    ) -> bool {
        let placed = self.make_move(row, col);
        self.check_clock(clock);
        placed
    }

    /// 询问计时器：刚走完的一方超时则判负
    ///
    /// 返回本次调用是否因超时结束了对局。
    pub fn check_clock(&mut self, clock: &impl PlayerClock) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }
        let Some(last) = self.last_move else {
            return false;
        };
        if !clock.is_expired(last.player) {
            return false;
        }

        tracing::info!("{} 超时判负", last.player.display_name());
        self.finish(GameOutcome::Win {
            winner: last.player.opponent(),
            reason: WinReason::Timeout,
        });
        true
    }

    /// 悔棋一步，不可悔时什么都不做
    pub fn undo_move(&mut self) {
        if let Err(e) = self.try_undo_move() {
            tracing::debug!("忽略悔棋: {}", e);
        }
    }

    /// 悔棋一步，失败时返回原因
    pub fn try_undo_move(&mut self) -> Result<Move> {
        if !self.config.allow_undo {
            return Err(GameError::UndoDisabled);
        }
        if self.outcome.is_terminal() {
            return Err(GameError::GameOver);
        }
        let mv = self.history.pop().ok_or(GameError::NothingToUndo)?;

        self.board.clear(mv.position());
        self.current_player = mv.player;
        self.last_move = self.history.last().copied();
        self.events.push(GameEvent::TurnChanged(self.current_player));

        Ok(mv)
    }

    /// 重新开局（沿用当前配置）
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// 应用新配置并重新开局
    pub fn apply_config(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        tracing::debug!(
            "应用对局配置: {}x{}, {} 子连线",
            config.board_size,
            config.board_size,
            config.win_condition
        );
        *self = Self::new(config);
        Ok(())
    }

    /// 复盘视图：重放前 cursor 步得到的棋盘
    pub fn review(&self, cursor: usize) -> Board {
        self.history.replay(self.board.size(), cursor)
    }

    /// 取出所有待处理事件
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// 当前对局快照
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            current_player: self.current_player,
            outcome: self.outcome,
            last_move: self.last_move,
            history: self.history.as_slice().to_vec(),
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.outcome = outcome;
        match outcome {
            GameOutcome::Win { winner, reason } => {
                tracing::info!("游戏结束: {} 获胜 ({:?})", winner.display_name(), reason);
                self.events.push(GameEvent::GameWon { winner, reason });
            }
            GameOutcome::Draw => {
                tracing::info!("游戏结束: 和棋");
                self.events.push(GameEvent::GameDrawn);
            }
            GameOutcome::InProgress => {}
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
