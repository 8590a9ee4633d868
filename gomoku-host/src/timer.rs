//! 对局计时器
//!
//! 支持不限时、总时间制、步时制和费舍尔制，实现核心的 `PlayerClock`。

use std::time::Instant;

use gomoku_core::{Player, PlayerClock};
use serde::{Deserialize, Serialize};

/// 计时模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// 不限时
    #[default]
    Unlimited,
    /// 每方总时间
    TotalTime,
    /// 每步时间
    PerMove,
    /// 总时间 + 每步加秒
    Fischer,
}

impl TimerMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            TimerMode::Unlimited => "无限时间",
            TimerMode::TotalTime => "总时间制",
            TimerMode::PerMove => "步时制",
            TimerMode::Fischer => "费舍尔制",
        }
    }

    /// 是否消耗总时间
    fn uses_total_time(&self) -> bool {
        matches!(self, TimerMode::TotalTime | TimerMode::Fischer)
    }
}

/// 计时配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub mode: TimerMode,
    /// 每方总时间（秒）
    pub total_time_secs: u64,
    /// 每步时间（秒）
    pub move_time_secs: u64,
    /// 费舍尔加秒（秒）
    pub increment_secs: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            mode: TimerMode::Unlimited,
            total_time_secs: 30 * 60,
            move_time_secs: 30,
            increment_secs: 10,
        }
    }
}

/// 游戏计时器
#[derive(Debug, Clone)]
pub struct GameTimer {
    config: TimerConfig,
    /// 黑方剩余时间（毫秒）
    black_time_ms: u64,
    /// 白方剩余时间（毫秒）
    white_time_ms: u64,
    /// 当前走子方
    current_turn: Player,
    /// 当前回合开始时间（暂停时为 None）
    turn_start: Option<Instant>,
    /// 本步在暂停前已用的时间（毫秒）
    move_used_ms: u64,
    /// 是否暂停
    paused: bool,
}

impl GameTimer {
    /// 创建计时器，first 方立即开始计时
    pub fn new(config: TimerConfig, first: Player) -> Self {
        let total_ms = config.total_time_secs * 1000;
        Self {
            config,
            black_time_ms: total_ms,
            white_time_ms: total_ms,
            current_turn: first,
            turn_start: Some(Instant::now()),
            move_used_ms: 0,
            paused: false,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// 当前步已用时间（毫秒）
    fn current_move_ms(&self) -> u64 {
        let running = self
            .turn_start
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0);
        self.move_used_ms + running
    }

    fn stored_time_ms(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black_time_ms,
            Player::White => self.white_time_ms,
        }
    }

    fn stored_time_mut(&mut self, player: Player) -> &mut u64 {
        match player {
            Player::Black => &mut self.black_time_ms,
            Player::White => &mut self.white_time_ms,
        }
    }

    /// 获取剩余总时间（毫秒）
    pub fn remaining_ms(&self, player: Player) -> u64 {
        let stored = self.stored_time_ms(player);
        if player == self.current_turn && self.config.mode.uses_total_time() {
            stored.saturating_sub(self.current_move_ms())
        } else {
            stored
        }
    }

    /// 获取本步已用时间（毫秒），非走子方为 0
    pub fn move_elapsed_ms(&self, player: Player) -> u64 {
        if player == self.current_turn {
            self.current_move_ms()
        } else {
            0
        }
    }

    /// 把当前步的用时记到走子方
    fn settle_current_move(&mut self) {
        if self.config.mode.uses_total_time() {
            let remaining = self.remaining_ms(self.current_turn);
            *self.stored_time_mut(self.current_turn) = remaining;
        }
    }

    /// 切换走子方，费舍尔制给刚走完的一方加秒
    pub fn switch_turn(&mut self) {
        self.settle_current_move();
        if self.config.mode == TimerMode::Fischer {
            let increment = self.config.increment_secs * 1000;
            let slot = self.stored_time_mut(self.current_turn);
            *slot = slot.saturating_add(increment);
        }

        self.current_turn = self.current_turn.opponent();
        self.move_used_ms = 0;
        self.turn_start = if self.paused { None } else { Some(Instant::now()) };
    }

    /// 从 player 开始计时（不加秒，用于悔棋后重新对齐）
    pub fn start(&mut self, player: Player) {
        self.settle_current_move();
        self.current_turn = player;
        self.move_used_ms = 0;
        self.turn_start = Some(Instant::now());
        self.paused = false;
    }

    /// 暂停计时器
    pub fn pause(&mut self) {
        if !self.paused {
            self.move_used_ms = self.current_move_ms();
            self.turn_start = None;
            self.paused = true;
        }
    }

    /// 恢复计时器
    pub fn resume(&mut self) {
        if self.paused {
            self.turn_start = Some(Instant::now());
            self.paused = false;
        }
    }

    /// 停止计时器
    pub fn stop(&mut self) {
        self.pause();
    }

    /// 重置为初始时间，first 方开始计时
    pub fn reset(&mut self, first: Player) {
        *self = Self::new(self.config, first);
    }

    /// 检查某方时间是否用完
    pub fn is_time_up(&self, player: Player) -> bool {
        match self.config.mode {
            TimerMode::Unlimited => false,
            TimerMode::TotalTime | TimerMode::Fischer => self.remaining_ms(player) == 0,
            TimerMode::PerMove => self.move_elapsed_ms(player) >= self.config.move_time_secs * 1000,
        }
    }

    /// 获取当前走子方
    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    /// 是否暂停
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// 设置剩余时间（用于恢复存档）
    pub fn set_times(&mut self, black_time_ms: u64, white_time_ms: u64) {
        self.black_time_ms = black_time_ms;
        self.white_time_ms = white_time_ms;
    }
}

impl Default for GameTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default(), Player::Black)
    }
}

impl PlayerClock for GameTimer {
    fn is_expired(&self, player: Player) -> bool {
        self.is_time_up(player)
    }
}

/// 格式化秒数为 mm:ss 或 hh:mm:ss
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn config(mode: TimerMode) -> TimerConfig {
        TimerConfig {
            mode,
            ..TimerConfig::default()
        }
    }

    #[test]
    fn test_timer_initial() {
        let timer = GameTimer::new(config(TimerMode::TotalTime), Player::Black);
        assert_eq!(timer.remaining_ms(Player::White), 30 * 60 * 1000);
        assert_eq!(timer.current_turn(), Player::Black);
        assert!(!timer.is_time_up(Player::Black));
    }

    #[test]
    fn test_unlimited_never_expires() {
        let mut timer = GameTimer::new(config(TimerMode::Unlimited), Player::Black);
        timer.set_times(0, 0);
        assert!(!timer.is_expired(Player::Black));
        assert!(!timer.is_expired(Player::White));
    }

    #[test]
    fn test_total_time_expiry() {
        let mut timer = GameTimer::new(config(TimerMode::TotalTime), Player::Black);
        timer.set_times(0, 5000);
        assert!(timer.is_expired(Player::Black));
        assert!(!timer.is_expired(Player::White));
    }

    #[test]
    fn test_timer_switch() {
        let mut timer = GameTimer::new(config(TimerMode::TotalTime), Player::Black);
        thread::sleep(Duration::from_millis(200));

        // 黑方时间应该减少
        assert!(timer.remaining_ms(Player::Black) < 30 * 60 * 1000);

        timer.switch_turn();
        assert_eq!(timer.current_turn(), Player::White);

        // 黑方时间固定
        let black_after = timer.remaining_ms(Player::Black);
        thread::sleep(Duration::from_millis(100));
        assert_eq!(timer.remaining_ms(Player::Black), black_after);
    }

    #[test]
    fn test_fischer_increment() {
        let mut timer = GameTimer::new(config(TimerMode::Fischer), Player::Black);
        timer.set_times(1000, 1000);
        timer.switch_turn();
        // 加 10 秒，减去本步极短的用时
        let black = timer.remaining_ms(Player::Black);
        assert!(black > 10_000 && black <= 11_000);
        assert_eq!(timer.remaining_ms(Player::White), 1000);
    }

    #[test]
    fn test_per_move_limit() {
        let mut timer = GameTimer::new(
            TimerConfig {
                mode: TimerMode::PerMove,
                move_time_secs: 0,
                ..TimerConfig::default()
            },
            Player::Black,
        );
        assert!(timer.is_expired(Player::Black));
        // 非走子方不计步时
        assert_eq!(timer.move_elapsed_ms(Player::White), 0);

        timer.pause();
        let used = timer.move_elapsed_ms(Player::Black);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(timer.move_elapsed_ms(Player::Black), used);
    }

    #[test]
    fn test_timer_pause_resume() {
        let mut timer = GameTimer::new(config(TimerMode::TotalTime), Player::Black);
        thread::sleep(Duration::from_millis(200));
        timer.pause();

        let time_at_pause = timer.remaining_ms(Player::Black);
        thread::sleep(Duration::from_millis(200));

        // 暂停期间时间不变
        assert_eq!(timer.remaining_ms(Player::Black), time_at_pause);

        timer.resume();
        thread::sleep(Duration::from_millis(200));

        // 恢复后时间继续减少
        assert!(timer.remaining_ms(Player::Black) < time_at_pause);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(30 * 60), "30:00");
        assert_eq!(format_time(3725), "01:02:05");
    }

    #[test]
    fn test_timer_config_json() {
        let config: TimerConfig = serde_json::from_str(r#"{"mode": "fischer"}"#).unwrap();
        assert_eq!(config.mode, TimerMode::Fischer);
        assert_eq!(config.increment_secs, 10);
    }
}
