use super::Mutate;
use crate::objectives::Objective;
use crate::schedule::{Dimensions, Schedule, Slot};
use rand::Rng;

/// 随机选择两个不同场次中的论文并交换它们
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSwap;

impl RandomSwap {
    /// 随机选出两个槽位，保证它们不在同一个场次中。只有一个场次时只能换到别的分会场；
    /// 只有一个分会场且只有一个场次时不存在这样的两个槽位
    pub fn random_pair<R: Rng + ?Sized>(dimensions: Dimensions, rng: &mut R) -> Option<(Slot, Slot)> {
        let Dimensions {
            tracks,
            sessions,
            papers,
        } = dimensions;
        if dimensions.is_trivial() {
            return None;
        }
        let first_track = rng.random_range(0..tracks);
        let mut second_track = rng.random_range(0..tracks);
        let first_session = rng.random_range(0..sessions);
        let mut second_session = rng.random_range(0..sessions);
        if first_track == second_track && first_session == second_session {
            if sessions == 1 {
                while second_track == first_track {
                    second_track = rng.random_range(0..tracks);
                }
            } else {
                while second_session == first_session {
                    second_session = rng.random_range(0..sessions);
                }
            }
        }
        let first = Slot::new(first_track, first_session, rng.random_range(0..papers));
        let second = Slot::new(second_track, second_session, rng.random_range(0..papers));
        Some((first, second))
    }

    /// 连续做 `steps` 次随机交换
    pub fn perturb<O: Objective + ?Sized, R: Rng + ?Sized>(
        &self,
        schedule: &mut Schedule,
        objective: &O,
        rng: &mut R,
        steps: usize,
    ) {
        for _ in 0..steps {
            if self.mutate(schedule, objective, rng).is_none() {
                break;
            }
        }
    }
}

impl Mutate for RandomSwap {
    fn mutate<O: Objective + ?Sized, R: Rng + ?Sized>(
        &self,
        schedule: &mut Schedule,
        objective: &O,
        rng: &mut R,
    ) -> Option<(Slot, Slot)> {
        let (first, second) = Self::random_pair(schedule.dimensions(), rng)?;
        objective.swap(schedule, first, second);
        Some((first, second))
    }
}
