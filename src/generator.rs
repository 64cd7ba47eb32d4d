//! 随机生成输入文件，用于测试和性能评估

use crate::schedule::Dimensions;
use itertools::Itertools;
use rand::Rng;

/// 生成一个完整的输入文件：五行参数，然后是对角线为零、取值在 [0, 1) 之间、保留两位小数的对称距离矩阵
pub fn random_instance<R: Rng + ?Sized>(
    minutes: f64,
    dimensions: Dimensions,
    tradeoff: f64,
    rng: &mut R,
) -> String {
    let size = dimensions.total();
    let mut matrix = vec![vec![0.0; size]; size];
    for i in 0..size {
        for j in (i + 1)..size {
            // 先舍入，保证写出的矩阵严格对称
            let value = (rng.random::<f64>() * 100.0).floor() / 100.0;
            matrix[i][j] = value;
            matrix[j][i] = value;
        }
    }
    let header = [
        minutes.to_string(),
        dimensions.papers.to_string(),
        dimensions.tracks.to_string(),
        dimensions.sessions.to_string(),
        tradeoff.to_string(),
    ];
    let rows = matrix
        .iter()
        .map(|row| row.iter().map(|x| format!("{x:.2}")).join(" "));
    header.into_iter().chain(rows).map(|x| x + "\n").collect()
}
