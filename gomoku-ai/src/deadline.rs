//! 搜索时限
//!
//! 时钟抽象成 trait，测试中可以用手动推进的时钟代替真实时间。

use std::time::{Duration, Instant};

/// 加深下一层前允许消耗的预算比例（百分比）
const DEEPENING_PERCENT: u32 = 80;

/// 节点搜索中止的预算比例（百分比）
const ABORT_PERCENT: u32 = 90;

/// 单调时钟
pub trait Clock {
    /// 搜索开始以来经过的时间
    fn elapsed(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}

/// 真实时钟
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    started_at: Instant,
}

impl WallClock {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// 一次搜索的时间预算
#[derive(Debug, Clone)]
pub struct Deadline<C = WallClock> {
    clock: C,
    budget: Duration,
}

impl Deadline<WallClock> {
    /// 从现在开始计时
    pub fn start(budget: Duration) -> Self {
        Self::with_clock(WallClock::start(), budget)
    }
}

impl<C: Clock> Deadline<C> {
    pub fn with_clock(clock: C, budget: Duration) -> Self {
        Self { clock, budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// 是否还可以开始更深一层的迭代
    pub fn allows_deepening(&self) -> bool {
        self.elapsed() < self.budget * DEEPENING_PERCENT / 100
    }

    /// 节点搜索是否应当立即返回
    pub fn is_exhausted(&self) -> bool {
        self.elapsed() > self.budget * ABORT_PERCENT / 100
    }
}

/// 手动推进的时钟，每次读取后自动前进 step
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualClock {
    now: std::cell::Cell<Duration>,
    step: Duration,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn frozen() -> Self {
        Self::default()
    }

    pub(crate) fn stepping(step: Duration) -> Self {
        Self {
            now: std::cell::Cell::new(Duration::ZERO),
            step,
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}
