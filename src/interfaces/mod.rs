use crate::objectives::metric::Metric;
use serde::Serialize;

pub mod command_line;

/// 向用户反馈的消息类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Started {
        papers: usize,
        tracks: usize,
        sessions: usize,
        budget: f64,
        seed: u64,
    },
    Restart {
        index: usize,
        score: f64,
    },
    LocalOptimum {
        index: usize,
        score: f64,
        steps: usize,
    },
    Progress {
        round: usize,
        score: f64,
    },
    /// 找到了比之前写出的都要好的排期，`organization` 是完整的排期表
    BetterSolution {
        metric: Metric,
        organization: String,
        elapsed: u64,
    },
    Finished {
        score: f64,
        iterations: usize,
        elapsed: u64,
    },
}

/// 定义了向用户报告消息的接口，用于统一命令行和测试中的输出方式
///
/// 写出结果的一方只需要实现 post 方法；每次收到 `BetterSolution` 时，其中的排期表都是完整、一致的
pub trait Interface {
    fn post(&self, message: Message);
}
