//! 目标函数接口，以及默认目标函数的实现
//!

use crate::schedule::{Schedule, Slot};
use metric::Metric;
pub mod default;
pub mod metric;

pub trait Objective {
    /// 从头计算一个排期表的各项指标，不修改排期表
    fn evaluate(&self, schedule: &Schedule) -> Metric;

    /// 交换两个槽位之后分数的变化量，不修改排期表
    fn delta(&self, schedule: &Schedule, first: Slot, second: Slot) -> f64;

    /// 重新计算并缓存分数
    fn rescore(&self, schedule: &mut Schedule) -> Metric {
        let metric = self.evaluate(schedule);
        schedule.set_score(metric.score);
        metric
    }

    /// 交换两个槽位中的论文并增量更新缓存的分数，返回分数的变化量
    ///
    /// 对同一对槽位连续交换两次会得到原来的排期表
    fn swap(&self, schedule: &mut Schedule, first: Slot, second: Slot) -> f64 {
        let delta = self.delta(schedule, first, second);
        schedule.exchange(first, second);
        schedule.add_score(delta);
        delta
    }
}
