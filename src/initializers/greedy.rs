use crate::data::DistanceMatrix;
use crate::schedule::{Dimensions, Paper, Slot};
use rustc_hash::FxHashSet;

/// 贪心生成初始排期，返回按存储顺序排列的论文编号
///
/// 按时段、分会场的顺序逐个填充场次：先选出与其余未分配论文距离之和最大的论文作为种子，
/// 再依次选出与本场次已放入论文距离之和最小的论文补齐。平局时取编号较小者，因此结果是确定的。
pub fn farthest_point_seeding(dimensions: Dimensions, matrix: &DistanceMatrix) -> Vec<Paper> {
    let total = dimensions.total();
    let mut assigned: FxHashSet<Paper> = FxHashSet::default();
    let mut layout = vec![0; total];
    for session in 0..dimensions.sessions {
        for track in 0..dimensions.tracks {
            let seed = (0..total)
                .filter(|x| !assigned.contains(x))
                .map(|paper| {
                    let spread: f64 = (0..total)
                        .filter(|other| *other != paper && !assigned.contains(other))
                        .map(|other| matrix.distance(paper, other))
                        .sum();
                    (paper, spread)
                })
                .fold(None, |best: Option<(Paper, f64)>, (paper, spread)| match best {
                    Some((_, best_spread)) if best_spread >= spread => best,
                    _ => Some((paper, spread)),
                });
            let Some((seed, _)) = seed else {
                return layout;
            };
            assigned.insert(seed);
            layout[dimensions.index(Slot::new(track, session, 0))] = seed;
            let mut placed = vec![seed];
            for position in 1..dimensions.papers {
                let next = (0..total)
                    .filter(|x| !assigned.contains(x))
                    .map(|paper| {
                        let distance: f64 =
                            placed.iter().map(|&q| matrix.distance(paper, q)).sum();
                        (paper, distance)
                    })
                    .fold(None, |best: Option<(Paper, f64)>, (paper, distance)| match best {
                        Some((_, best_distance)) if best_distance <= distance => best,
                        _ => Some((paper, distance)),
                    });
                let Some((next, _)) = next else {
                    return layout;
                };
                assigned.insert(next);
                layout[dimensions.index(Slot::new(track, session, position))] = next;
                placed.push(next);
            }
        }
    }
    layout
}
