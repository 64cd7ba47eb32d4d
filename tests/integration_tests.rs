use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sessions::config::{OptimizationConfig, SolverConfig};
use sessions::data::{budget_from_minutes, DistanceMatrix, Instance};
use sessions::generator::random_instance;
use sessions::initializers::greedy::farthest_point_seeding;
use sessions::initializers::Initializer;
use sessions::interfaces::Message;
use sessions::objectives::default::DefaultObjective;
use sessions::objectives::Objective;
use sessions::operators::default::RandomSwap;
use sessions::operators::Mutate;
use sessions::schedule::{Dimensions, Schedule, Slot};

fn random_matrix(size: usize, rng: &mut StdRng) -> DistanceMatrix {
    let mut rows = vec![vec![0.0; size]; size];
    for i in 0..size {
        for j in (i + 1)..size {
            let value: f64 = rng.random();
            rows[i][j] = value;
            rows[j][i] = value;
        }
    }
    DistanceMatrix::new(rows).unwrap()
}

fn random_objective(dimensions: Dimensions, tradeoff: f64, seed: u64) -> DefaultObjective {
    let mut rng = StdRng::seed_from_u64(seed);
    DefaultObjective::new(random_matrix(dimensions.total(), &mut rng), tradeoff)
}

fn assert_permutation(schedule: &Schedule) {
    let mut papers = schedule.papers().to_vec();
    papers.sort_unstable();
    let expected: Vec<usize> = (0..schedule.dimensions().total()).collect();
    assert_eq!(papers, expected);
}

#[test]
fn random_swaps_keep_a_permutation() {
    let dimensions = Dimensions::new(3, 2, 3).unwrap();
    let objective = random_objective(dimensions, 1.0, 1);
    let mut rng = StdRng::seed_from_u64(2);
    let mut schedule = Schedule::shuffled(dimensions, &objective, &mut rng);
    assert_permutation(&schedule);
    for _ in 0..500 {
        RandomSwap.mutate(&mut schedule, &objective, &mut rng).unwrap();
        assert_permutation(&schedule);
    }
    let drift = (schedule.score() - objective.evaluate(&schedule).score).abs();
    assert!(drift < 1e-9, "cached score drifted by {drift}");
}

#[test]
fn delta_matches_full_rescoring() {
    let dimensions = Dimensions::new(3, 3, 2).unwrap();
    let objective = random_objective(dimensions, 0.7, 3);
    let mut rng = StdRng::seed_from_u64(4);
    let schedule = Schedule::shuffled(dimensions, &objective, &mut rng);
    let before = objective.evaluate(&schedule).score;
    for first in dimensions.slots() {
        for second in dimensions.slots() {
            let delta = objective.delta(&schedule, first, second);
            let mut swapped = schedule.clone();
            objective.swap(&mut swapped, first, second);
            let after = objective.evaluate(&swapped).score;
            assert!(
                (after - before - delta).abs() < 1e-9,
                "swapping {first:?} and {second:?}: expected {}, got {delta}",
                after - before
            );
            assert!((swapped.score() - after).abs() < 1e-9);
        }
    }
}

#[test]
fn delta_within_a_session_is_zero() {
    let dimensions = Dimensions::new(2, 2, 3).unwrap();
    let objective = random_objective(dimensions, 1.0, 5);
    let schedule = Schedule::identity(dimensions, &objective);
    let first = Slot::new(1, 0, 0);
    assert_eq!(objective.delta(&schedule, first, first), 0.0);
    assert_eq!(objective.delta(&schedule, first, Slot::new(1, 0, 2)), 0.0);
}

#[test]
fn swap_is_an_involution() {
    let dimensions = Dimensions::new(2, 3, 3).unwrap();
    let objective = random_objective(dimensions, 1.5, 6);
    let mut rng = StdRng::seed_from_u64(7);
    let original = Schedule::shuffled(dimensions, &objective, &mut rng);
    for _ in 0..100 {
        let (first, second) = RandomSwap::random_pair(dimensions, &mut rng).unwrap();
        let mut schedule = original.clone();
        let forward = objective.swap(&mut schedule, first, second);
        let backward = objective.swap(&mut schedule, first, second);
        assert_eq!(schedule.papers(), original.papers());
        assert!((forward + backward).abs() < 1e-9);
        assert!((schedule.score() - original.score()).abs() < 1e-9);
    }
}

#[test]
fn random_pairs_always_span_two_sessions() {
    let mut rng = StdRng::seed_from_u64(8);
    for (tracks, sessions, papers) in [(2, 1, 2), (1, 3, 2), (3, 3, 1), (2, 2, 1)] {
        let dimensions = Dimensions::new(tracks, sessions, papers).unwrap();
        for _ in 0..1000 {
            let (first, second) = RandomSwap::random_pair(dimensions, &mut rng).unwrap();
            assert!(!first.same_session(&second));
            assert!(dimensions.slot(first.track, first.session, first.position).is_some());
            assert!(dimensions.slot(second.track, second.session, second.position).is_some());
        }
    }
    let trivial = Dimensions::new(1, 1, 4).unwrap();
    assert!(RandomSwap::random_pair(trivial, &mut rng).is_none());
}

#[test]
fn single_session_has_no_conflict() {
    let dimensions = Dimensions::new(1, 1, 5).unwrap();
    let objective = random_objective(dimensions, 2.0, 9);
    let mut rng = StdRng::seed_from_u64(10);
    let reference = objective.evaluate(&Schedule::identity(dimensions, &objective));
    for _ in 0..10 {
        let schedule = Schedule::shuffled(dimensions, &objective, &mut rng);
        let metric = objective.evaluate(&schedule);
        assert_eq!(metric.conflict, 0.0);
        assert!((metric.cohesion - reference.cohesion).abs() < 1e-9);
    }
}

#[test]
fn two_tracks_one_paper_each() {
    let dimensions = Dimensions::new(2, 1, 1).unwrap();
    let matrix = DistanceMatrix::new(vec![vec![0.0, 0.2], vec![0.2, 0.0]]).unwrap();
    let objective = DefaultObjective::new(matrix, 1.0);
    for papers in [vec![0, 1], vec![1, 0]] {
        let schedule = Schedule::from_permutation(dimensions, papers, &objective).unwrap();
        let metric = objective.evaluate(&schedule);
        assert_eq!(metric.cohesion, 0.0);
        assert!((metric.conflict - 0.2).abs() < 1e-12);
        assert!((schedule.score() - 0.2).abs() < 1e-12);
    }
}

#[test]
fn greedy_seeding_is_deterministic() {
    let dimensions = Dimensions::new(3, 2, 4).unwrap();
    let objective = random_objective(dimensions, 1.0, 11);
    let first = farthest_point_seeding(dimensions, objective.matrix());
    let second = farthest_point_seeding(dimensions, objective.matrix());
    assert_eq!(first, second);
    let schedule = Schedule::from_permutation(dimensions, first, &objective).unwrap();
    assert_permutation(&schedule);
    let mut rng = StdRng::seed_from_u64(12);
    let initialized =
        Initializer::Greedy.initialize(dimensions, objective.matrix(), &objective, &mut rng);
    assert_eq!(initialized, schedule);
}

#[test]
fn greedy_seeding_starts_from_the_farthest_paper() {
    let dimensions = Dimensions::new(1, 2, 2).unwrap();
    let objective = DefaultObjective::new(paired_matrix(), 1.0);
    // 论文 2 和 3 离其他论文最远，平局时取编号较小的 2；之后的平局也都取编号较小者
    assert_eq!(
        farthest_point_seeding(dimensions, objective.matrix()),
        vec![2, 0, 1, 3]
    );
}

fn paired_matrix() -> DistanceMatrix {
    let mut rows = vec![vec![0.9; 4]; 4];
    for (i, row) in rows.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    rows[0][1] = 0.1;
    rows[1][0] = 0.1;
    DistanceMatrix::new(rows).unwrap()
}

#[test]
fn schedule_display_and_parse() {
    let dimensions = Dimensions::new(2, 2, 2).unwrap();
    let objective = random_objective(dimensions, 1.0, 13);
    let schedule = Schedule::identity(dimensions, &objective);
    let text = schedule.to_string();
    assert_eq!(text, "0 1 | 4 5\n2 3 | 6 7\n");
    let parsed = Schedule::parse(&text, dimensions, &objective).unwrap();
    assert_eq!(parsed.papers(), schedule.papers());
    assert!((parsed.score() - schedule.score()).abs() < 1e-12);
    assert_eq!(schedule.session(1, 0), &[4, 5]);
    assert_eq!(schedule.paper(Slot::new(0, 1, 1)), 3);
}

#[test]
fn invalid_schedules_are_rejected() {
    let dimensions = Dimensions::new(2, 1, 2).unwrap();
    let objective = random_objective(dimensions, 1.0, 14);
    assert!(Schedule::from_permutation(dimensions, vec![0, 1, 2], &objective).is_err());
    assert!(Schedule::from_permutation(dimensions, vec![0, 1, 1, 3], &objective).is_err());
    assert!(Schedule::from_permutation(dimensions, vec![0, 1, 2, 4], &objective).is_err());
    assert!(Schedule::parse("0 1 | 2\n", dimensions, &objective).is_err());
    assert!(Schedule::parse("0 1 2 3\n", dimensions, &objective).is_err());
    assert!(Schedule::parse("0 1 | 2 x\n", dimensions, &objective).is_err());
    assert!(Schedule::parse("0 1 | 1 3\n", dimensions, &objective).is_err());
    assert!(Dimensions::new(0, 1, 1).is_err());
    assert!(dimensions.slot(2, 0, 0).is_none());
}

#[test]
#[should_panic]
fn out_of_range_slot_is_a_programming_error() {
    let dimensions = Dimensions::new(2, 1, 2).unwrap();
    dimensions.index(Slot::new(0, 1, 0));
}

const SMALL_INPUT: &str = "0.5
2
1
2
1.0
0 0.1 0.9 0.9
0.1 0 0.9 0.9
0.9 0.9 0 0.9
0.9 0.9 0.9 0
";

#[test]
fn parse_input_file() {
    let instance = Instance::parse(SMALL_INPUT).unwrap();
    assert_eq!(instance.minutes, 0.5);
    assert_eq!(instance.dimensions, Dimensions::new(1, 2, 2).unwrap());
    assert_eq!(instance.tradeoff, 1.0);
    assert_eq!(instance.matrix.size(), 4);
    assert_eq!(instance.matrix.distance(1, 0), 0.1);
    assert_eq!(instance.budget().unwrap().as_secs(), 30);
}

#[test]
fn malformed_input_is_rejected() {
    // 槽位数为 6，但只有 4 行距离
    let mismatch = SMALL_INPUT.replacen("\n2\n", "\n3\n", 1);
    let error = Instance::parse(&mismatch).unwrap_err();
    assert!(error.message.contains("不一致"));
    assert!(Instance::parse("1\n2\n1\n").is_err());
    assert!(Instance::parse(&SMALL_INPUT.replacen("0.5", "abc", 1)).is_err());
    assert!(Instance::parse(&SMALL_INPUT.replacen("0 0.1 0.9 0.9", "0 0.1 0.9", 1)).is_err());
    assert!(Instance::parse(&SMALL_INPUT.replacen("0 0.1 0.9 0.9", "0 0.3 0.9 0.9", 1)).is_err());
    assert!(DistanceMatrix::new(vec![vec![0.0, f64::NAN], vec![f64::NAN, 0.0]]).is_err());
}

#[test]
fn unrepresentable_time_budget_is_rejected() {
    let huge = SMALL_INPUT.replacen("0.5", "1e300", 1);
    assert!(Instance::parse(&huge).is_err());
    let mut instance = Instance::parse(SMALL_INPUT).unwrap();
    assert!(instance.set_minutes(1e300).is_err());
    assert!(instance.set_minutes(-1.0).is_err());
    assert!(instance.set_minutes(f64::NAN).is_err());
    assert_eq!(instance.minutes, 0.5);
    instance.set_minutes(2.0).unwrap();
    assert_eq!(instance.budget().unwrap().as_secs(), 120);
    assert!(budget_from_minutes(f64::MAX).is_err());
}

#[test]
fn generated_input_is_valid() {
    let dimensions = Dimensions::new(3, 2, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(15);
    let text = random_instance(1.0, dimensions, 0.5, &mut rng);
    let instance = Instance::parse(&text).unwrap();
    assert_eq!(instance.dimensions, dimensions);
    assert_eq!(instance.tradeoff, 0.5);
    for i in 0..dimensions.total() {
        assert_eq!(instance.matrix.distance(i, i), 0.0);
        for j in 0..dimensions.total() {
            let value = instance.matrix.distance(i, j);
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, instance.matrix.distance(j, i));
        }
    }
    let mut again = StdRng::seed_from_u64(15);
    assert_eq!(random_instance(1.0, dimensions, 0.5, &mut again), text);
}

#[test]
fn optimization_config_from_yaml() {
    let config: OptimizationConfig = serde_yaml::from_str(
        "seed: 42\ninitializer: greedy\nmetaheuristic:\n  algorithm: beam_search\n  beam_width: 3\n",
    )
    .unwrap();
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.initializer, Initializer::Greedy);
    match config.metaheuristic {
        SolverConfig::BeamSearch(beam) => {
            assert_eq!(beam.beam_width(), 3);
            assert_eq!(beam.stall_rounds(), 100);
        }
        other => panic!("unexpected solver {other:?}"),
    }
    let default: OptimizationConfig = serde_yaml::from_str("{}").unwrap();
    assert!(matches!(default.metaheuristic, SolverConfig::Hybrid(_)));
    assert_eq!(default.flush_threshold().unwrap().as_millis(), 50);
    let negative: OptimizationConfig = serde_yaml::from_str("flush_threshold: -1.0").unwrap();
    assert!(negative.flush_threshold().is_err());
    let huge: OptimizationConfig = serde_yaml::from_str("flush_threshold: 1e300").unwrap();
    assert!(huge.flush_threshold().is_err());
    assert!(huge.validate().is_err());
}

#[test]
fn random_swap_probability_must_be_below_one() {
    let config: OptimizationConfig = serde_yaml::from_str(
        "metaheuristic:\n  algorithm: random_restarts\n  random_swap_probability: 0.25\n",
    )
    .unwrap();
    config.validate().unwrap();
    match &config.metaheuristic {
        SolverConfig::RandomRestarts(restarts) => {
            assert_eq!(restarts.random_swap_probability(), 0.25)
        }
        other => panic!("unexpected solver {other:?}"),
    }
    for value in ["1.0", "-0.5", ".nan"] {
        let text = format!(
            "metaheuristic:\n  algorithm: hybrid\n  random_swap_probability: {value}\n"
        );
        let config: OptimizationConfig = serde_yaml::from_str(&text).unwrap();
        assert!(config.validate().is_err(), "{value} should be rejected");
    }
}

#[test]
fn messages_serialize_with_a_type_tag() {
    let value = serde_json::to_value(Message::Progress {
        round: 100,
        score: 0.5,
    })
    .unwrap();
    assert_eq!(
        value,
        serde_json::json!({"type": "progress", "round": 100, "score": 0.5})
    );
}
