//! 爬山与集束搜索交替进行的混合方法
//!
//! 先把当前排期爬到局部最优，再以它为种子做一次集束搜索；集束搜索找到更好的排期时从那里继续爬山，
//! 否则从一个新的随机排期重新开始。

use super::beam_search::BeamSearch;
use super::local_search::IMPROVEMENT_EPSILON;
use super::Problem;
use crate::interfaces::Message;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::{debug, info};

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hybrid {
    pub beam_width: Option<usize>,
    pub stall_rounds: Option<usize>,
    pub moves_per_neighbour: Option<usize>,
    /// 最多循环几次，不设置时只受时间预算约束
    pub max_cycles: Option<usize>,
    /// 爬山时改做随机交换的概率，默认为 0
    pub random_swap_probability: Option<f64>,
}

impl Hybrid {
    fn beam(&self) -> BeamSearch {
        BeamSearch {
            beam_width: self.beam_width,
            stall_rounds: self.stall_rounds,
            moves_per_neighbour: self.moves_per_neighbour,
            max_searches: None,
        }
    }

    pub fn solve(&self, problem: &mut Problem) {
        let beam = self.beam();
        let mut current = problem.state.best().clone();
        let mut cycle = 0;
        loop {
            if self.max_cycles.is_some_and(|x| cycle >= x) || problem.should_stop(false) {
                break;
            }
            problem.interface.post(Message::Restart {
                index: cycle,
                score: current.score(),
            });
            let probability = self.random_swap_probability.unwrap_or(0.0);
            let descent = problem.descend(&mut current, probability);
            problem.interface.post(Message::LocalOptimum {
                index: cycle,
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
            let found = beam.search(problem, Some(current.clone()));
            if found.score() > current.score() + IMPROVEMENT_EPSILON {
                debug!(
                    "集束搜索把分数从 {:.6} 提高到 {:.6}，从这里继续爬山",
                    current.score(),
                    found.score()
                );
                current = found;
            } else {
                debug!("集束搜索没有找到更好的排期，随机重新开始");
                current = problem.fresh();
            }
            cycle += 1;
        }
    }
}
