//! libsessions 是使用 Rust 实现的会议论文分组排期算法。
//!
//! 所有论文要分配到「分会场 × 场次 × 位置」组成的网格中：同一场中的论文应该彼此相似，
//! 同一时段、不同分会场中的论文应该彼此不同，以免听众需要在两个相近的报告之间取舍。
//! 输入是论文两两之间的距离矩阵，输出是一个完整的排期及其分数。
//!
//! sessions 是使用 libsessions 实现的命令行程序，它能够在给定的时限内搜索排期、评测已有的排期，以及随机生成输入文件。

pub mod config;
pub mod data;
pub mod error;
pub mod generator;
pub mod initializers;
pub mod interfaces;
pub mod objectives;
pub mod operators;
pub mod optimizers;
pub mod schedule;

pub use error::Error;
