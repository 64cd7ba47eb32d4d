//! 算子接口，以及默认操作的实现（随机交换）
//!

use crate::objectives::Objective;
use crate::schedule::{Schedule, Slot};
use rand::Rng;

pub mod default;

pub trait Mutate {
    /// 基于现有的排期表通过随机扰动得到一个新的排期表，返回被交换的两个槽位；
    /// 如果规模上不存在能改变排期的交换，返回 `None`
    fn mutate<O: Objective + ?Sized, R: Rng + ?Sized>(
        &self,
        schedule: &mut Schedule,
        objective: &O,
        rng: &mut R,
    ) -> Option<(Slot, Slot)>;
}
