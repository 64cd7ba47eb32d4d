//! 基于交换的局部搜索：最优改进爬山，以及随机重启
//!
//! 爬山的每一步扫描整个邻域，记录使分数增加最多的那次交换，扫描结束后只执行这一次交换。
//! 当邻域中没有任何交换能严格提高分数时，就到达了局部最优。

use super::Problem;
use crate::interfaces::Message;
use crate::objectives::Objective;
use crate::schedule::{Dimensions, Schedule, Slot};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::{debug, info};

/// 小于这个值的分数变化视为浮点误差，不算作改进
pub const IMPROVEMENT_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    /// 任意两个不同场次之间的交换
    CrossSession,
    /// 同一时段、不同分会场之间的交换
    SameTimeSlot,
}

impl Neighborhood {
    /// 对邻域中的每一对槽位调用 `visit`，每一对无序槽位只访问一次
    pub fn for_each_pair(&self, dimensions: Dimensions, mut visit: impl FnMut(Slot, Slot)) {
        let Dimensions {
            tracks,
            sessions,
            papers,
        } = dimensions;
        let mut visit_sessions = |first_track, first_session, second_track, second_session| {
            for first_position in 0..papers {
                for second_position in 0..papers {
                    visit(
                        Slot::new(first_track, first_session, first_position),
                        Slot::new(second_track, second_session, second_position),
                    );
                }
            }
        };
        match self {
            Neighborhood::CrossSession => {
                for first_track in 0..tracks {
                    for first_session in 0..sessions {
                        for second_track in first_track..tracks {
                            let start = if second_track == first_track {
                                first_session + 1
                            } else {
                                0
                            };
                            for second_session in start..sessions {
                                visit_sessions(
                                    first_track,
                                    first_session,
                                    second_track,
                                    second_session,
                                );
                            }
                        }
                    }
                }
            }
            Neighborhood::SameTimeSlot => {
                for session in 0..sessions {
                    for first_track in 0..tracks {
                        for second_track in (first_track + 1)..tracks {
                            visit_sessions(first_track, session, second_track, session);
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimbOutcome {
    Improved { first: Slot, second: Slot, delta: f64 },
    LocalOptimum,
}

/// 最优改进爬山的一步
pub fn climb_step<O: Objective + ?Sized>(
    schedule: &mut Schedule,
    objective: &O,
    neighborhood: Neighborhood,
) -> ClimbOutcome {
    let mut best: Option<(Slot, Slot, f64)> = None;
    neighborhood.for_each_pair(schedule.dimensions(), |first, second| {
        let delta = objective.delta(schedule, first, second);
        let threshold = best.map_or(IMPROVEMENT_EPSILON, |(_, _, x)| x);
        if delta > threshold {
            best = Some((first, second, delta));
        }
    });
    match best {
        Some((first, second, _)) => {
            let delta = objective.swap(schedule, first, second);
            ClimbOutcome::Improved {
                first,
                second,
                delta,
            }
        }
        None => ClimbOutcome::LocalOptimum,
    }
}

/// 只用完整邻域爬到局部最优，不受时间预算约束，返回执行的步数
pub fn climb<O: Objective + ?Sized>(schedule: &mut Schedule, objective: &O) -> usize {
    let mut steps = 0;
    while climb_step(schedule, objective, Neighborhood::CrossSession) != ClimbOutcome::LocalOptimum
    {
        steps += 1;
    }
    steps
}

/// 随机重启爬山：反复生成新的排期并爬到局部最优，保留所有重启中最好的结果
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomRestarts {
    /// 最多重启的次数，不设置时只受时间预算约束
    pub max_restarts: Option<usize>,
    /// 爬山的每一轮以这个概率改做一次随机交换，用于跳出平坦区域；默认为 0
    pub random_swap_probability: Option<f64>,
}

impl RandomRestarts {
    pub fn random_swap_probability(&self) -> f64 {
        self.random_swap_probability.unwrap_or(0.0)
    }

    pub fn solve(&self, problem: &mut Problem) {
        let mut index = 0;
        loop {
            if self.max_restarts.is_some_and(|x| index >= x) || problem.should_stop(false) {
                break;
            }
            // 第一次从初始排期出发，之后每次重新随机生成
            let mut current = if index == 0 {
                problem.state.best().clone()
            } else {
                problem.fresh()
            };
            problem.interface.post(Message::Restart {
                index,
                score: current.score(),
            });
            debug!("第 {index} 次重启，初始分数 {:.6}", current.score());
            let descent = problem.descend(&mut current, self.random_swap_probability());
            problem.interface.post(Message::LocalOptimum {
                index,
                score: current.score(),
                steps: descent.steps,
            });
            let previous = problem.state.best().score();
            let flushed = problem.report(&current);
            if flushed {
                info!("最优分数从 {previous:.6} 提高到 {:.6}", current.score());
            }
            if descent.interrupted || problem.should_stop(flushed) {
                break;
            }
            index += 1;
        }
    }
}
