use crate::interfaces::{Interface, Message};
use crate::objectives::metric::Metric;
use crate::Error;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs::{create_dir_all, rename, write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// 命令行参数的定义
#[derive(Parser, Clone)]
#[command(name = "会议论文排期")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,
    /// 输出调试信息
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 命令行中所有可用的子命令
#[derive(Subcommand, Clone)]
pub enum Command {
    /// 读入输入文件，在时限内搜索最优的排期
    Optimize {
        /// 输入文件：五行参数，然后是距离矩阵
        input: PathBuf,
        /// 搜索参数的配置文件（YAML）
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// 覆盖输入文件中的处理时间，单位为分钟
        #[arg(short, long)]
        minutes: Option<f64>,
        /// 随机数种子
        #[arg(short, long)]
        seed: Option<u64>,
        /// 输出目录，默认为 output- 加上当前时间
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// 以 JSON 格式逐行输出消息
        #[arg(long)]
        json: bool,
    },
    /// 计算一个已有排期的分数
    Evaluate {
        input: PathBuf,
        /// 排期文件，格式与优化结果相同
        organization: PathBuf,
    },
    /// 随机生成一个输入文件
    Generate {
        /// 处理时间，单位为分钟
        minutes: f64,
        /// 每场论文数
        papers: usize,
        /// 分会场数
        tracks: usize,
        /// 每个分会场的场次数
        sessions: usize,
        /// 权衡系数
        tradeoff: f64,
        #[arg(short, long)]
        seed: Option<u64>,
        /// 输出文件，默认为 input.txt
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// 通过命令行来使用的入口，实现了界面特征
///
/// 每找到一个更好的排期，就把它写到输出目录下的 organization.txt，把评测指标写到 metric.yaml
pub struct CommandLine {
    pub output_dir: PathBuf,
    pub json: bool,
}

impl CommandLine {
    pub fn new(maybe_output_dir: Option<PathBuf>, json: bool) -> Result<Self, Error> {
        let output_dir = maybe_output_dir.unwrap_or_else(|| {
            let time = Local::now().format("%m-%d+%H_%M_%S").to_string();
            PathBuf::from(format!("output-{time}"))
        });
        create_dir_all(&output_dir)?;
        Ok(Self { output_dir, json })
    }

    pub fn organization_path(&self) -> PathBuf {
        self.output_dir.join("organization.txt")
    }

    pub fn metric_path(&self) -> PathBuf {
        self.output_dir.join("metric.yaml")
    }

    /// 先写临时文件再改名，文件中总是一个完整的结果
    fn write_atomically(path: &Path, content: &str) -> Result<(), Error> {
        let mut temporary = path.as_os_str().to_owned();
        temporary.push(".tmp");
        write(&temporary, content)?;
        rename(&temporary, path)?;
        Ok(())
    }

    pub fn write_solution(&self, organization: &str, metric: &Metric) -> Result<(), Error> {
        Self::write_atomically(&self.organization_path(), organization)?;
        Self::write_atomically(&self.metric_path(), &serde_yaml::to_string(metric)?)
    }

    pub fn report_metric(metric: Metric) {
        print!("{metric}");
    }

    fn describe(&self, message: &Message) {
        match message {
            Message::Started {
                papers,
                tracks,
                sessions,
                budget,
                seed,
            } => info!(
                "共 {papers} 篇论文，{tracks} 个分会场，每个分会场 {sessions} 场；时限 {budget:.1} 秒，随机数种子 {seed}"
            ),
            Message::Restart { index, score } => {
                info!("第 {index} 次重启，初始分数 {score:.6}")
            }
            Message::LocalOptimum {
                index,
                score,
                steps,
            } => info!("第 {index} 次重启经过 {steps} 步到达局部最优，分数 {score:.6}"),
            Message::Progress { round, score } => {
                info!("集束搜索已执行 {round} 轮，最优分数 {score:.6}")
            }
            Message::BetterSolution {
                metric, elapsed, ..
            } => info!(
                "{} 毫秒时搜索到了一个更好的排期，评测指标如下：{}",
                elapsed,
                metric.to_string().trim_end()
            ),
            Message::Finished {
                score,
                iterations,
                elapsed,
            } => info!("搜索结束：共 {iterations} 轮，用时 {elapsed} 毫秒，最优分数 {score:.6}"),
        }
    }
}

impl Interface for CommandLine {
    fn post(&self, message: Message) {
        if let Message::BetterSolution {
            metric,
            organization,
            ..
        } = &message
        {
            match self.write_solution(organization, metric) {
                Ok(()) => info!("排期保存于 {} 中", self.organization_path().display()),
                Err(e) => error!("保存排期失败：{e}"),
            }
        }
        if self.json {
            match serde_json::to_string(&message) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("消息序列化失败：{e}"),
            }
        } else {
            self.describe(&message);
        }
    }
}
