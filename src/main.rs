//! sessions: 会议论文排期［命令行版］
//!
//! 用户提供距离矩阵文件，本程序在给定时限内搜索排期，每找到一个更好的排期就立即写入输出目录。

use std::fs::{read_to_string, write};
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sessions::config::OptimizationConfig;
use sessions::data::Instance;
use sessions::generator::random_instance;
use sessions::interfaces::command_line::{Command, CommandLine, CommandLineArgs};
use sessions::objectives::default::DefaultObjective;
use sessions::objectives::Objective;
use sessions::optimizers::budget::TimeBudget;
use sessions::optimizers::Problem;
use sessions::schedule::{Dimensions, Schedule};
use sessions::Error;
use tracing::{info, Level};

fn optimize(
    input: PathBuf,
    config: Option<PathBuf>,
    minutes: Option<f64>,
    seed: Option<u64>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<(), Error> {
    let config = match config {
        Some(path) => OptimizationConfig::from_file(&path)?,
        None => OptimizationConfig::default(),
    };
    let mut instance = Instance::from_file(&input)?;
    if let Some(minutes) = minutes {
        instance.set_minutes(minutes)?;
    }
    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    let budget = TimeBudget::starting_now(instance.budget()?, config.flush_threshold()?);
    let command_line = CommandLine::new(output_dir, json)?;
    let dimensions = instance.dimensions;
    let objective = DefaultObjective::new(instance.matrix, instance.tradeoff);
    let problem = Problem::new(
        &objective,
        dimensions,
        config.initializer,
        seed,
        budget,
        &command_line,
    )?;
    let result = config.metaheuristic.solve(problem);
    info!("结果保存在 {} 中", command_line.output_dir.display());
    println!("organization:");
    print!("{}", result.schedule);
    println!("score:{}", result.score);
    Ok(())
}

fn evaluate(input: PathBuf, organization: PathBuf) -> Result<(), Error> {
    let instance = Instance::from_file(&input)?;
    let text = read_to_string(&organization)
        .map_err(|e| Error::from(format!("无法读取排期文件 {}：{e}", organization.display())))?;
    let objective = DefaultObjective::new(instance.matrix, instance.tradeoff);
    let schedule = Schedule::parse(&text, instance.dimensions, &objective)?;
    CommandLine::report_metric(objective.evaluate(&schedule));
    Ok(())
}

fn main() -> Result<(), Error> {
    let args = CommandLineArgs::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match args.command {
        Command::Optimize {
            input,
            config,
            minutes,
            seed,
            output_dir,
            json,
        } => optimize(input, config, minutes, seed, output_dir, json)?,
        Command::Evaluate {
            input,
            organization,
        } => evaluate(input, organization)?,
        Command::Generate {
            minutes,
            papers,
            tracks,
            sessions,
            tradeoff,
            seed,
            output,
        } => {
            let dimensions = Dimensions::new(tracks, sessions, papers)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let text = random_instance(minutes, dimensions, tradeoff, &mut rng);
            let path = output.unwrap_or(PathBuf::from("input.txt"));
            write(&path, text)?;
            info!(
                "已生成 {} 篇论文的输入文件，保存在 {} 中",
                dimensions.total(),
                path.display()
            );
        }
    }
    Ok(())
}
