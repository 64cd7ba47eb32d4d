//! 集束搜索
//!
//! 维护 K 个候选排期。每一轮中，每个候选保留自身，并通过独立的随机交换生成 K 个邻居，
//! 共 K·(K+1) 个候选；按分数从高到低排序后保留前 K 个。连续若干轮没有改进时结束。

use super::Problem;
use crate::interfaces::Message;
use crate::objectives::Objective;
use crate::operators::default::RandomSwap;
use crate::schedule::Schedule;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::cmp::Ordering;
use tracing::debug;

pub const DEFAULT_BEAM_WIDTH: usize = 4;
pub const DEFAULT_STALL_ROUNDS: usize = 100;
const PROGRESS_INTERVAL: usize = 100;

/// 集束中的一个候选。分数高者为大；分数相同时生成得早的为大，因此给定随机种子时选择结果是确定的
#[derive(Debug, Clone)]
pub struct Candidate {
    pub schedule: Schedule,
    pub order: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.schedule
            .score()
            .total_cmp(&other.schedule.score())
            .then_with(|| other.order.cmp(&self.order))
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeamSearch {
    /// 集束宽度 K
    pub beam_width: Option<usize>,
    /// 连续这么多轮没有改进就结束
    pub stall_rounds: Option<usize>,
    /// 生成一个邻居时做几次随机交换
    pub moves_per_neighbour: Option<usize>,
    /// 最多从头搜索几次，不设置时只受时间预算约束
    pub max_searches: Option<usize>,
}

impl BeamSearch {
    pub fn beam_width(&self) -> usize {
        self.beam_width.unwrap_or(DEFAULT_BEAM_WIDTH).max(1)
    }

    pub fn stall_rounds(&self) -> usize {
        self.stall_rounds.unwrap_or(DEFAULT_STALL_ROUNDS)
    }

    fn moves_per_neighbour(&self) -> usize {
        self.moves_per_neighbour.unwrap_or(1).max(1)
    }

    /// 扩展一轮：返回按分数从高到低排列的前 K 个候选
    pub fn round<O: Objective + ?Sized, R: Rng + ?Sized>(
        &self,
        beam: &[Schedule],
        objective: &O,
        rng: &mut R,
    ) -> Vec<Schedule> {
        let width = self.beam_width();
        let mut candidates = Vec::with_capacity(beam.len() * (width + 1));
        for member in beam {
            candidates.push(Candidate {
                schedule: member.clone(),
                order: candidates.len(),
            });
            for _ in 0..width {
                let mut neighbour = member.clone();
                RandomSwap.perturb(&mut neighbour, objective, rng, self.moves_per_neighbour());
                candidates.push(Candidate {
                    schedule: neighbour,
                    order: candidates.len(),
                });
            }
        }
        candidates.sort_by(|a, b| b.cmp(a));
        candidates.truncate(width);
        candidates.into_iter().map(|x| x.schedule).collect()
    }

    /// 从给定的种子和若干随机排期组成的集束出发搜索，返回这次搜索中见过的最优排期
    pub fn search(&self, problem: &mut Problem, seed: Option<Schedule>) -> Schedule {
        let width = self.beam_width();
        let mut beam: Vec<Schedule> = seed.into_iter().collect();
        while beam.len() < width {
            beam.push(problem.fresh());
        }
        let mut best = beam
            .iter()
            .max_by(|a, b| a.score().total_cmp(&b.score()))
            .cloned()
            .unwrap_or_else(|| problem.fresh());
        problem.report(&best);
        let mut stall = 0;
        let mut round = 0;
        while stall < self.stall_rounds() && !problem.should_stop(false) {
            let started = problem.budget.start_round();
            beam = self.round(&beam, problem.objective, &mut problem.rng);
            problem.budget.finish_round(started);
            problem.state.iterations += 1;
            round += 1;
            let mut flushed = false;
            if beam[0].score() > best.score() {
                best.clone_from(&beam[0]);
                stall = 0;
                flushed = problem.report(&best);
            } else {
                stall += 1;
            }
            if round % PROGRESS_INTERVAL == 0 {
                problem.interface.post(Message::Progress {
                    round,
                    score: best.score(),
                });
            }
            if flushed && problem.should_stop(true) {
                break;
            }
        }
        debug!("集束搜索结束，共 {round} 轮，最优分数 {:.6}", best.score());
        best
    }

    /// 反复用新的随机集束搜索，直到时间用完
    pub fn solve(&self, problem: &mut Problem) {
        let mut seed = Some(problem.state.best().clone());
        let mut searches = 0;
        while !self.max_searches.is_some_and(|x| searches >= x) && !problem.should_stop(false) {
            self.search(problem, seed.take());
            searches += 1;
        }
    }
}
