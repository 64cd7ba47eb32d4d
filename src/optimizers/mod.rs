//! 优化方法接口，以及若干优化方法的实现
//!
//! 所有方法共享一个 [`Problem`]：它持有目标函数、随机数发生器、时间预算、输出接口和一次运行的搜索状态。
//! 历史最优解一旦严格优于上次写出的解，就立即通过输出接口写出。

use crate::config::SolverConfig;
use crate::initializers::Initializer;
use crate::interfaces::{Interface, Message};
use crate::objectives::default::DefaultObjective;
use crate::objectives::metric::Metric;
use crate::objectives::Objective;
use crate::operators::default::RandomSwap;
use crate::operators::Mutate;
use crate::schedule::{Dimensions, Schedule};
use crate::Error;
use budget::TimeBudget;
use local_search::{climb_step, ClimbOutcome, Neighborhood};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

pub mod beam_search;
pub mod budget;
pub mod hybrid;
pub mod local_search;

pub struct OptimizationResult {
    pub schedule: Schedule,
    pub metric: Metric,
    pub score: f64,
}

/// 一次运行中的搜索状态
#[derive(Debug, Clone)]
pub struct SearchState {
    best: Schedule,
    last_flushed: f64,
    /// 已经执行的搜索轮数（爬山的每一步、集束搜索的每一轮）
    pub iterations: usize,
}

impl SearchState {
    pub fn new(initial: Schedule) -> Self {
        Self {
            best: initial,
            last_flushed: f64::NEG_INFINITY,
            iterations: 0,
        }
    }

    pub fn best(&self) -> &Schedule {
        &self.best
    }

    /// 候选解严格优于历史最优解时替换之，返回是否替换
    pub fn offer(&mut self, candidate: &Schedule) -> bool {
        if candidate.score() > self.best.score() {
            self.best.clone_from(candidate);
            true
        } else {
            false
        }
    }

    /// 历史最优解是否还没有写出过
    pub fn needs_flush(&self) -> bool {
        self.best.score() > self.last_flushed
    }

    fn mark_flushed(&mut self) {
        self.last_flushed = self.best.score();
    }
}

/// 一次爬山的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descent {
    pub steps: usize,
    /// 其中随机交换的次数
    pub random_swaps: usize,
    /// 因时间不足而在到达局部最优之前停止
    pub interrupted: bool,
}

pub struct Problem<'a> {
    pub objective: &'a DefaultObjective,
    pub dimensions: Dimensions,
    pub rng: StdRng,
    pub budget: TimeBudget,
    pub interface: &'a dyn Interface,
    pub state: SearchState,
    seed: u64,
}

impl<'a> Problem<'a> {
    pub fn new(
        objective: &'a DefaultObjective,
        dimensions: Dimensions,
        initializer: Initializer,
        seed: u64,
        budget: TimeBudget,
        interface: &'a dyn Interface,
    ) -> Result<Self, Error> {
        let size = objective.matrix().size();
        if size != dimensions.total() {
            return Err(format!(
                "论文数与槽位数不一致：槽位 {} 个，论文 {size} 篇",
                dimensions.total()
            )
            .into());
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let initial = initializer.initialize(dimensions, objective.matrix(), objective, &mut rng);
        Ok(Self {
            objective,
            dimensions,
            rng,
            budget,
            interface,
            state: SearchState::new(initial),
            seed,
        })
    }

    /// 一个新的随机排期
    pub fn fresh(&mut self) -> Schedule {
        Schedule::shuffled(self.dimensions, self.objective, &mut self.rng)
    }

    /// 交替使用两种邻域做最优改进爬山，直到在完整邻域中也找不到改进，或者时间不足
    ///
    /// 每一轮先扫描开销较小的同时段邻域，没有改进时再扫描完整邻域。`random_swap_probability` 大于 0 时，
    /// 每一轮以这个概率改为随机交换两篇论文；爬山仍然只在找不到改进时结束，所以结果总是局部最优
    pub fn descend(&mut self, schedule: &mut Schedule, random_swap_probability: f64) -> Descent {
        let mut descent = Descent {
            steps: 0,
            random_swaps: 0,
            interrupted: false,
        };
        loop {
            if self.budget.should_stop(false) {
                descent.interrupted = true;
                return descent;
            }
            let started = self.budget.start_round();
            if random_swap_probability > 0.0
                && self.rng.random::<f64>() < random_swap_probability
            {
                RandomSwap.mutate(schedule, self.objective, &mut self.rng);
                self.budget.finish_round(started);
                self.state.iterations += 1;
                descent.steps += 1;
                descent.random_swaps += 1;
                continue;
            }
            let mut outcome = climb_step(schedule, self.objective, Neighborhood::SameTimeSlot);
            if outcome == ClimbOutcome::LocalOptimum {
                outcome = climb_step(schedule, self.objective, Neighborhood::CrossSession);
            }
            self.budget.finish_round(started);
            self.state.iterations += 1;
            match outcome {
                ClimbOutcome::Improved { .. } => descent.steps += 1,
                ClimbOutcome::LocalOptimum => return descent,
            }
        }
    }

    /// 把候选解交给搜索状态，若历史最优解因此变得更好就写出，返回是否写出
    pub fn report(&mut self, candidate: &Schedule) -> bool {
        self.state.offer(candidate);
        self.flush()
    }

    /// 若历史最优解严格优于上次写出的解，写出它
    pub fn flush(&mut self) -> bool {
        if !self.state.needs_flush() {
            return false;
        }
        let best = self.state.best();
        let metric = self.objective.evaluate(best);
        debug!("写出更优排期，分数 {:.6}", best.score());
        self.interface.post(Message::BetterSolution {
            metric,
            organization: best.to_string(),
            elapsed: self.budget.elapsed().as_millis() as u64,
        });
        self.state.mark_flushed();
        true
    }

    pub fn should_stop(&self, just_flushed: bool) -> bool {
        let stop = self.budget.should_stop(just_flushed);
        if stop {
            debug!(
                "剩余时间 {:?}，最长单轮用时 {:?}，结束搜索",
                self.budget.remaining(),
                self.budget.longest_round()
            );
        }
        stop
    }

    /// 写出尚未写出的最优解并结束这次运行
    pub fn finish(mut self) -> OptimizationResult {
        self.flush();
        let elapsed = self.budget.elapsed();
        let schedule = self.state.best().clone();
        let metric = self.objective.evaluate(&schedule);
        info!(
            "搜索结束，共 {} 轮，用时 {:.2} 秒，最优分数 {:.6}",
            self.state.iterations,
            elapsed.as_secs_f64(),
            schedule.score()
        );
        self.interface.post(Message::Finished {
            score: schedule.score(),
            iterations: self.state.iterations,
            elapsed: elapsed.as_millis() as u64,
        });
        OptimizationResult {
            score: schedule.score(),
            schedule,
            metric,
        }
    }
}

impl SolverConfig {
    pub fn solve(&self, mut problem: Problem) -> OptimizationResult {
        let Dimensions {
            tracks,
            sessions,
            papers,
        } = problem.dimensions;
        problem.interface.post(Message::Started {
            papers: problem.dimensions.total(),
            tracks,
            sessions,
            budget: problem.budget.remaining().as_secs_f64(),
            seed: problem.seed,
        });
        info!("开始排期：{tracks} 个分会场，每个分会场 {sessions} 场，每场 {papers} 篇论文");
        problem.flush();
        if problem.dimensions.is_trivial() {
            info!("只有一个分会场和一个场次，任何交换都不会改变分数");
            return problem.finish();
        }
        match self {
            SolverConfig::RandomRestarts(restarts) => restarts.solve(&mut problem),
            SolverConfig::BeamSearch(beam) => beam.solve(&mut problem),
            SolverConfig::Hybrid(hybrid) => hybrid.solve(&mut problem),
        }
        problem.finish()
    }
}
