use crate::initializers::Initializer;
use crate::optimizers::beam_search::BeamSearch;
use crate::optimizers::budget::DEFAULT_FLUSH_THRESHOLD;
use crate::optimizers::hybrid::Hybrid;
use crate::optimizers::local_search::RandomRestarts;
use crate::Error;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fs::read_to_string;
use std::path::Path;
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum SolverConfig {
    RandomRestarts(RandomRestarts),
    BeamSearch(BeamSearch),
    Hybrid(Hybrid),
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig::Hybrid(Hybrid::default())
    }
}

/// 搜索参数，从 YAML 文件读入；问题本身的参数（时限、规模、权衡系数）来自输入文件
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// 随机数种子，不设置时随机选取
    pub seed: Option<u64>,
    #[serde(default)]
    pub initializer: Initializer,
    /// 收尾阈值，单位为秒
    pub flush_threshold: Option<f64>,
    #[serde(default)]
    pub metaheuristic: SolverConfig,
}

impl OptimizationConfig {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = read_to_string(path)
            .map_err(|e| Error::from(format!("无法读取配置文件 {}：{e}", path.display())))?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查所有数值参数，在搜索开始之前报告配置错误
    pub fn validate(&self) -> Result<(), Error> {
        self.flush_threshold()?;
        self.metaheuristic.validate()
    }

    pub fn flush_threshold(&self) -> Result<Duration, Error> {
        match self.flush_threshold {
            None => Ok(DEFAULT_FLUSH_THRESHOLD),
            Some(x) if x.is_finite() && x >= 0.0 => Duration::try_from_secs_f64(x)
                .map_err(|e| format!("收尾阈值 {x} 秒超出了可以表示的范围：{e}").into()),
            Some(x) => Err(format!("收尾阈值必须是非负数，而不是 {x}").into()),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let probability = match self {
            SolverConfig::RandomRestarts(restarts) => restarts.random_swap_probability,
            SolverConfig::Hybrid(hybrid) => hybrid.random_swap_probability,
            SolverConfig::BeamSearch(_) => None,
        };
        match probability {
            Some(x) if !(0.0..1.0).contains(&x) => {
                Err(format!("随机交换的概率必须在 [0, 1) 之间，而不是 {x}").into())
            }
            _ => Ok(()),
        }
    }
}
