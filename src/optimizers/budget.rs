//! 计时与时间预算
//!
//! 搜索只在两轮之间检查时间：已经开始的一轮总会执行完。因此除了总时限以外，
//! 还要记录目前为止最长的一轮用了多久，剩余时间不够再跑一轮时就提前结束，
//! 保证最后写出的结果是完整的。

use std::cell::Cell;
use std::rc::Rc;
use web_time::{Duration, Instant};

/// 默认的收尾阈值：刚写出更优解时，如果剩余时间不超过这个值就直接结束
pub const DEFAULT_FLUSH_THRESHOLD: Duration = Duration::from_millis(50);

pub trait Clock {
    /// 从开始计时到现在经过的时间
    fn elapsed(&self) -> Duration;
}

/// 真实的挂钟时间
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// 手动拨动的时钟，克隆出来的句柄共享同一个时间
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

pub struct TimeBudget {
    clock: Box<dyn Clock>,
    limit: Duration,
    threshold: Duration,
    longest_round: Duration,
}

impl TimeBudget {
    pub fn new(clock: Box<dyn Clock>, limit: Duration, threshold: Duration) -> Self {
        Self {
            clock,
            limit,
            threshold,
            longest_round: Duration::ZERO,
        }
    }

    /// 从现在开始计时的预算
    pub fn starting_now(limit: Duration, threshold: Duration) -> Self {
        Self::new(Box::new(WallClock::new()), limit, threshold)
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    pub fn longest_round(&self) -> Duration {
        self.longest_round
    }

    /// 记下一轮开始的时刻
    pub fn start_round(&self) -> Duration {
        self.elapsed()
    }

    /// 一轮结束，更新最长单轮用时，返回这一轮的用时
    pub fn finish_round(&mut self, started: Duration) -> Duration {
        let duration = self.elapsed().saturating_sub(started);
        self.longest_round = self.longest_round.max(duration);
        duration
    }

    /// 是否应该结束搜索。`just_flushed` 表示刚刚写出了一个更优解
    pub fn should_stop(&self, just_flushed: bool) -> bool {
        let remaining = self.remaining();
        remaining.is_zero()
            || remaining < self.longest_round
            || (just_flushed && remaining <= self.threshold)
    }
}
