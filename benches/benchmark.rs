use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sessions::data::Instance;
use sessions::generator::random_instance;
use sessions::objectives::default::DefaultObjective;
use sessions::objectives::Objective;
use sessions::operators::default::RandomSwap;
use sessions::optimizers::local_search::{climb_step, Neighborhood};
use sessions::schedule::{Dimensions, Schedule};
use sessions::Error;

fn prepare(tracks: usize, sessions: usize, papers: usize) -> Result<(DefaultObjective, Schedule), Error> {
    let dimensions = Dimensions::new(tracks, sessions, papers)?;
    let mut rng = StdRng::seed_from_u64(0);
    let instance = Instance::parse(&random_instance(1.0, dimensions, 1.0, &mut rng))?;
    let objective = DefaultObjective::new(instance.matrix, instance.tradeoff);
    let schedule = Schedule::shuffled(dimensions, &objective, &mut rng);
    Ok((objective, schedule))
}

fn timing(name: &str, tracks: usize, sessions: usize, papers: usize, c: &mut Criterion) -> Result<(), Error> {
    let (objective, schedule) = prepare(tracks, sessions, papers)?;
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function(&format!("{name}：交换增量"), |b| {
        b.iter(|| {
            RandomSwap::random_pair(schedule.dimensions(), &mut rng)
                .map(|(first, second)| objective.delta(&schedule, first, second))
        })
    });
    c.bench_function(&format!("{name}：完整邻域扫描"), |b| {
        b.iter(|| {
            let mut current = schedule.clone();
            climb_step(&mut current, &objective, Neighborhood::CrossSession)
        })
    });
    c.bench_function(&format!("{name}：同时段邻域扫描"), |b| {
        b.iter(|| {
            let mut current = schedule.clone();
            climb_step(&mut current, &objective, Neighborhood::SameTimeSlot)
        })
    });
    Ok(())
}

fn small_conference(c: &mut Criterion) {
    timing("小型会议", 3, 4, 3, c).unwrap();
}

fn large_conference(c: &mut Criterion) {
    timing("大型会议", 5, 8, 4, c).unwrap();
}

criterion_group!(benches, small_conference, large_conference);
criterion_main!(benches);
