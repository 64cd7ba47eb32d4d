//! 排期表：把论文放进「分会场 × 场次 × 位置」三维槽位的一个完整排列。
//!
//! 所有槽位连续存放在一个按行主序排列的数组里，下标为 `(track * sessions + session) * papers + position`，
//! 因此同一个场次的论文总是一段连续的切片。排期表只能通过合法的排列构造，之后只能通过交换两个槽位来修改，
//! 所以「每篇论文恰好占据一个槽位」这一性质在任何时候都成立。

use crate::objectives::Objective;
use crate::Error;
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 论文编号，取值范围为 `[0, N)`
pub type Paper = usize;

/// 排期表的规模
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// 并行的分会场数
    pub tracks: usize,
    /// 每个分会场的场次数
    pub sessions: usize,
    /// 每个场次的论文数
    pub papers: usize,
}

/// 一个槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub track: usize,
    pub session: usize,
    pub position: usize,
}

impl Slot {
    pub fn new(track: usize, session: usize, position: usize) -> Self {
        Self {
            track,
            session,
            position,
        }
    }

    /// 两个槽位是否属于同一个场次
    pub fn same_session(&self, other: &Slot) -> bool {
        self.track == other.track && self.session == other.session
    }
}

impl Dimensions {
    pub fn new(tracks: usize, sessions: usize, papers: usize) -> Result<Self, Error> {
        if tracks == 0 || sessions == 0 || papers == 0 {
            return Err(format!(
                "分会场数、场次数和每场论文数都必须为正数，实际为 {tracks}、{sessions}、{papers}"
            )
            .into());
        }
        Ok(Self {
            tracks,
            sessions,
            papers,
        })
    }

    /// 槽位总数，也就是论文总数 N
    pub fn total(&self) -> usize {
        self.tracks * self.sessions * self.papers
    }

    /// 只有一个分会场、一个场次时，任何交换都不会改变分数
    pub fn is_trivial(&self) -> bool {
        self.tracks == 1 && self.sessions == 1
    }

    /// 检查下标范围后构造槽位，用于处理来自外部的下标
    pub fn slot(&self, track: usize, session: usize, position: usize) -> Option<Slot> {
        (track < self.tracks && session < self.sessions && position < self.papers)
            .then(|| Slot::new(track, session, position))
    }

    /// 槽位在扁平数组中的下标；越界属于程序错误
    pub fn index(&self, slot: Slot) -> usize {
        assert!(
            slot.track < self.tracks && slot.session < self.sessions && slot.position < self.papers,
            "槽位 {slot:?} 超出了排期表的范围 {self:?}"
        );
        (slot.track * self.sessions + slot.session) * self.papers + slot.position
    }

    /// 按存储顺序遍历所有槽位
    pub fn slots(&self) -> impl Iterator<Item = Slot> {
        let Dimensions {
            tracks,
            sessions,
            papers,
        } = *self;
        (0..tracks).flat_map(move |track| {
            (0..sessions).flat_map(move |session| {
                (0..papers).map(move |position| Slot::new(track, session, position))
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    dimensions: Dimensions,
    papers: Vec<Paper>,
    score: f64,
}

impl Schedule {
    /// 从一个按存储顺序给出的排列构造排期表，并计算其分数
    pub fn from_permutation<O: Objective + ?Sized>(
        dimensions: Dimensions,
        papers: Vec<Paper>,
        objective: &O,
    ) -> Result<Self, Error> {
        let total = dimensions.total();
        if papers.len() != total {
            return Err(format!("排期表需要 {total} 篇论文，实际提供了 {} 篇", papers.len()).into());
        }
        let mut seen = FxHashSet::default();
        for &paper in &papers {
            if paper >= total {
                return Err(format!("论文编号 {paper} 超出范围 [0, {total})").into());
            }
            if !seen.insert(paper) {
                return Err(format!("论文 {paper} 被安排了不止一次").into());
            }
        }
        Ok(Self::from_trusted(dimensions, papers, objective))
    }

    /// 由本 crate 内部已保证是合法排列的布局构造
    pub(crate) fn from_trusted<O: Objective + ?Sized>(
        dimensions: Dimensions,
        papers: Vec<Paper>,
        objective: &O,
    ) -> Self {
        debug_assert_eq!(papers.len(), dimensions.total());
        let mut schedule = Self {
            dimensions,
            papers,
            score: 0.0,
        };
        objective.rescore(&mut schedule);
        schedule
    }

    /// 按编号顺序依次填满所有槽位
    pub fn identity<O: Objective + ?Sized>(dimensions: Dimensions, objective: &O) -> Self {
        Self::from_trusted(dimensions, (0..dimensions.total()).collect(), objective)
    }

    /// 随机打乱后填满所有槽位
    pub fn shuffled<O: Objective + ?Sized, R: Rng + ?Sized>(
        dimensions: Dimensions,
        objective: &O,
        rng: &mut R,
    ) -> Self {
        let mut papers: Vec<Paper> = (0..dimensions.total()).collect();
        papers.shuffle(rng);
        Self::from_trusted(dimensions, papers, objective)
    }

    /// 解析 `Display` 输出的排期表格式：每行一个时段，分会场之间用 `|` 分隔
    pub fn parse<O: Objective + ?Sized>(
        text: &str,
        dimensions: Dimensions,
        objective: &O,
    ) -> Result<Self, Error> {
        let Dimensions {
            tracks,
            sessions,
            papers,
        } = dimensions;
        let lines: Vec<&str> = text.lines().filter(|x| !x.trim().is_empty()).collect();
        if lines.len() != sessions {
            return Err(format!("排期表应有 {sessions} 行，实际为 {} 行", lines.len()).into());
        }
        let mut layout = vec![0; dimensions.total()];
        for (session, line) in lines.iter().enumerate() {
            let groups: Vec<&str> = line.split('|').collect();
            if groups.len() != tracks {
                return Err(format!(
                    "第 {} 行应有 {tracks} 个分会场，实际为 {} 个",
                    session + 1,
                    groups.len()
                )
                .into());
            }
            for (track, group) in groups.iter().enumerate() {
                let values: Vec<&str> = group.split_whitespace().collect();
                if values.len() != papers {
                    return Err(format!(
                        "第 {} 行第 {} 个分会场应有 {papers} 篇论文，实际为 {} 篇",
                        session + 1,
                        track + 1,
                        values.len()
                    )
                    .into());
                }
                for (position, value) in values.iter().enumerate() {
                    let paper: Paper = value
                        .parse()
                        .map_err(|_| format!("无法解析论文编号 {value}"))?;
                    layout[dimensions.index(Slot::new(track, session, position))] = paper;
                }
            }
        }
        Self::from_permutation(dimensions, layout, objective)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// 缓存的分数，每次交换后都会增量更新
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn paper(&self, slot: Slot) -> Paper {
        self.papers[self.dimensions.index(slot)]
    }

    /// 某个场次里的所有论文
    pub fn session(&self, track: usize, session: usize) -> &[Paper] {
        let start = self.dimensions.index(Slot::new(track, session, 0));
        &self.papers[start..start + self.dimensions.papers]
    }

    /// 只交换两个槽位中的论文，分数由调用者负责同步
    pub(crate) fn exchange(&mut self, first: Slot, second: Slot) {
        let i = self.dimensions.index(first);
        let j = self.dimensions.index(second);
        self.papers.swap(i, j);
    }

    pub(crate) fn add_score(&mut self, delta: f64) {
        self.score += delta;
    }

    pub(crate) fn set_score(&mut self, score: f64) {
        self.score = score;
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Dimensions {
            tracks, sessions, ..
        } = self.dimensions;
        for session in 0..sessions {
            let line: Vec<String> = (0..tracks)
                .map(|track| {
                    self.session(track, session)
                        .iter()
                        .map(|x| x.to_string())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            writeln!(f, "{}", line.join(" | "))?;
        }
        Ok(())
    }
}
