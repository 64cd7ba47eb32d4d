//! 初始排期的生成方式：随机打乱，或者确定性的贪心填充
//!

use crate::data::DistanceMatrix;
use crate::objectives::Objective;
use crate::schedule::{Dimensions, Schedule};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod greedy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    #[default]
    Random,
    Greedy,
}

impl Initializer {
    pub fn initialize<O: Objective + ?Sized, R: Rng + ?Sized>(
        &self,
        dimensions: Dimensions,
        matrix: &DistanceMatrix,
        objective: &O,
        rng: &mut R,
    ) -> Schedule {
        match self {
            Initializer::Random => Schedule::shuffled(dimensions, objective, rng),
            Initializer::Greedy => {
                let layout = greedy::farthest_point_seeding(dimensions, matrix);
                Schedule::from_trusted(dimensions, layout, objective)
            }
        }
    }
}
