// 排期表的各项指标以及它们输出到命令行的方式

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// 场内相似度：同一场次内两两论文的 1 - 距离之和
    pub cohesion: f64,
    /// 并行冲突：同一时段不同分会场之间两两论文的距离之和
    pub conflict: f64,
    pub score: f64,
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("场内相似度：{:.4}；", self.cohesion))?;
        f.write_str(&format!("并行冲突：{:.4}；", self.conflict))?;
        f.write_str(&format!("总分：{:.4}\n", self.score))
    }
}
