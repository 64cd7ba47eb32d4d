use super::metric::Metric;
use super::Objective;
use crate::data::DistanceMatrix;
use crate::schedule::{Dimensions, Paper, Schedule, Slot};
use itertools::Itertools;

/// 默认目标函数：总分 = 场内相似度 + 权衡系数 × 并行冲突
#[derive(Debug, Clone)]
pub struct DefaultObjective {
    matrix: DistanceMatrix,
    tradeoff: f64,
}

impl DefaultObjective {
    pub fn new(matrix: DistanceMatrix, tradeoff: f64) -> Self {
        Self { matrix, tradeoff }
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// 一个场次内两两论文的相似度之和
    pub fn session_cohesion(&self, schedule: &Schedule, track: usize, session: usize) -> f64 {
        schedule
            .session(track, session)
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| 1.0 - self.matrix.distance(a, b))
            .sum()
    }

    /// 同一时段的两个分会场之间两两论文的距离之和
    pub fn parallel_conflict(
        &self,
        schedule: &Schedule,
        first_track: usize,
        second_track: usize,
        session: usize,
    ) -> f64 {
        let others = schedule.session(second_track, session);
        schedule
            .session(first_track, session)
            .iter()
            .cartesian_product(others)
            .map(|(&a, &b)| self.matrix.distance(a, b))
            .sum()
    }

    /// 假设把 `paper` 放在 `(track, session)` 场次中，它与周围论文（不含两个待交换的槽位）形成的得分
    fn contribution(
        &self,
        schedule: &Schedule,
        paper: Paper,
        track: usize,
        session: usize,
        excluded: [Slot; 2],
    ) -> f64 {
        let Dimensions { tracks, papers, .. } = schedule.dimensions();
        let row = self.matrix.row(paper);
        let mut cohesion = 0.0;
        let mut conflict = 0.0;
        for other_track in 0..tracks {
            for position in 0..papers {
                let slot = Slot::new(other_track, session, position);
                if excluded.contains(&slot) {
                    continue;
                }
                let distance = row[schedule.paper(slot)];
                if other_track == track {
                    cohesion += 1.0 - distance;
                } else {
                    conflict += distance;
                }
            }
        }
        cohesion + self.tradeoff * conflict
    }
}

impl Objective for DefaultObjective {
    fn evaluate(&self, schedule: &Schedule) -> Metric {
        let Dimensions {
            tracks, sessions, ..
        } = schedule.dimensions();
        let mut cohesion = 0.0;
        for track in 0..tracks {
            for session in 0..sessions {
                cohesion += self.session_cohesion(schedule, track, session);
            }
        }
        let mut conflict = 0.0;
        for session in 0..sessions {
            for (first, second) in (0..tracks).tuple_combinations() {
                conflict += self.parallel_conflict(schedule, first, second, session);
            }
        }
        Metric {
            cohesion,
            conflict,
            score: cohesion + self.tradeoff * conflict,
        }
    }

    /// 只有两篇被交换的论文与其他论文之间的关系会变化。两者之间的那一项在交换前后相同，
    /// 因此只需比较两篇论文各自在新旧位置上与其余论文的得分，代价为 O(T·P)
    fn delta(&self, schedule: &Schedule, first: Slot, second: Slot) -> f64 {
        if first.same_session(&second) {
            return 0.0;
        }
        let excluded = [first, second];
        let a = schedule.paper(first);
        let b = schedule.paper(second);
        let before = self.contribution(schedule, a, first.track, first.session, excluded)
            + self.contribution(schedule, b, second.track, second.session, excluded);
        let after = self.contribution(schedule, b, first.track, first.session, excluded)
            + self.contribution(schedule, a, second.track, second.session, excluded);
        after - before
    }
}
