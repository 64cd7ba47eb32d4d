//! 输入数据：论文两两之间的距离矩阵，以及读入输入文件得到的问题实例

use crate::schedule::{Dimensions, Paper};
use crate::Error;
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;
use web_time::Duration;

/// 判断矩阵是否对称时允许的误差
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// 对称的 N × N 距离矩阵，按行主序连续存放；对角线不参与计算
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, Error> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(format!(
                    "距离矩阵第 {} 行有 {} 个值，应为 {size} 个",
                    index + 1,
                    row.len()
                )
                .into());
            }
            values.extend(row);
        }
        if let Some(value) = values.iter().find(|x| !x.is_finite()) {
            return Err(format!("距离矩阵中存在非法数值 {value}").into());
        }
        for i in 0..size {
            for j in (i + 1)..size {
                let (a, b) = (values[i * size + j], values[j * size + i]);
                if (a - b).abs() > SYMMETRY_TOLERANCE {
                    return Err(format!("距离矩阵不对称：d({i}, {j}) = {a}，d({j}, {i}) = {b}").into());
                }
            }
        }
        let outside = values.iter().filter(|x| !(0.0..=1.0).contains(*x)).count();
        if outside > 0 {
            warn!("距离矩阵中有 {outside} 个值不在 [0, 1] 范围内");
        }
        Ok(Self { size, values })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn distance(&self, first: Paper, second: Paper) -> f64 {
        self.values[first * self.size + second]
    }

    pub fn row(&self, paper: Paper) -> &[f64] {
        &self.values[paper * self.size..(paper + 1) * self.size]
    }
}

/// 一次排期所需的全部输入
#[derive(Debug, Clone)]
pub struct Instance {
    /// 允许使用的处理时间，单位为分钟
    pub minutes: f64,
    pub dimensions: Dimensions,
    /// 并行冲突项相对于场内相似度项的权重
    pub tradeoff: f64,
    pub matrix: DistanceMatrix,
}

fn parse_scalar<T: FromStr>(line: &str, name: &str) -> Result<T, Error> {
    line.trim()
        .parse()
        .map_err(|_| format!("无法将「{}」解析为{name}", line.trim()).into())
}

impl Instance {
    /// 输入格式：前五行依次是处理时间（分钟）、每场论文数、分会场数、每个分会场的场次数、权衡系数，
    /// 之后是 N 行、每行 N 个用空白分隔的距离值
    pub fn parse(text: &str) -> Result<Self, Error> {
        let lines: Vec<&str> = text.lines().filter(|x| !x.trim().is_empty()).collect();
        if lines.len() < 6 {
            return Err("输入信息不足，请检查输入文件的格式".into());
        }
        let minutes: f64 = parse_scalar(lines[0], "处理时间")?;
        budget_from_minutes(minutes)?;
        let papers: usize = parse_scalar(lines[1], "每场论文数")?;
        let tracks: usize = parse_scalar(lines[2], "分会场数")?;
        let sessions: usize = parse_scalar(lines[3], "场次数")?;
        let tradeoff: f64 = parse_scalar(lines[4], "权衡系数")?;
        if !tradeoff.is_finite() {
            return Err(format!("权衡系数必须是有限数，实际为 {tradeoff}").into());
        }
        let dimensions = Dimensions::new(tracks, sessions, papers)?;
        let rows = lines[5..]
            .iter()
            .map(|line| {
                line.split_whitespace()
                    .map(|value| parse_scalar::<f64>(value, "距离"))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let slots = dimensions.total();
        if rows.len() != slots {
            return Err(format!("论文数与槽位数不一致：槽位 {slots} 个，论文 {} 篇", rows.len()).into());
        }
        let matrix = DistanceMatrix::new(rows)?;
        Ok(Self {
            minutes,
            dimensions,
            tradeoff,
            matrix,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = read_to_string(path)
            .map_err(|e| format!("无法读取输入文件 {}：{e}", path.display()))?;
        Self::parse(&content)
    }

    /// 用新的处理时间替换输入文件中的值
    pub fn set_minutes(&mut self, minutes: f64) -> Result<(), Error> {
        budget_from_minutes(minutes)?;
        self.minutes = minutes;
        Ok(())
    }

    pub fn budget(&self) -> Result<Duration, Error> {
        budget_from_minutes(self.minutes)
    }
}

/// 把以分钟计的处理时间换算为时间预算。负数、非有限数以及大到无法表示的值都是配置错误
pub fn budget_from_minutes(minutes: f64) -> Result<Duration, Error> {
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(format!("处理时间必须是非负数，实际为 {minutes}").into());
    }
    Duration::try_from_secs_f64(minutes * 60.0)
        .map_err(|e| format!("处理时间 {minutes} 分钟超出了可以表示的范围：{e}").into())
}
