use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{Rng, SeedableRng};
use solver::{Assignment, Formula, GasatConfig, GasatDriver, Operator};

fn random_3sat(rng: &mut impl Rng, num_variables: usize, num_clauses: usize) -> Formula {
    let mut text = format!("p cnf {} {}\n", num_variables, num_clauses);
    for _ in 0..num_clauses {
        for _ in 0..3 {
            let v = rng.gen_range(1, num_variables + 1);
            let lit = if rng.gen_bool(0.5) { v as i64 } else { -(v as i64) };
            text.push_str(&lit.to_string());
            text.push(' ');
        }
        text.push_str("0\n");
    }
    Formula::from_dimacs(&text).unwrap()
}

fn base_config(seed: u64) -> GasatConfig {
    GasatConfig {
        population_size: 50,
        sub_population_size: 10,
        max_generations: 200,
        max_flip: 500,
        tabu_list_length: 5,
        crossover_operator: Operator::Cc,
        is_rvcf: false,
        is_diversification: false,
        max_false: 5,
        rec: 2,
        k: 3,
        seed,
    }
    .validate()
    .unwrap()
}

fn bench_driver(c: &mut Criterion) {
    let mut group = c.benchmark_group("gasat driver");
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xC0FFEE);

    for &(n, m) in &[(20usize, 80usize), (40, 170), (60, 260)] {
        let formula = random_3sat(&mut rng, n, m);
        group.bench_function(format!("n={} m={}", n, m), |b| {
            b.iter_batched(
                || base_config(rng.gen()),
                |config| {
                    let mut driver = GasatDriver::new(&formula, config);
                    let mut observers: Vec<Box<dyn solver::Observer>> = Vec::new();
                    black_box(driver.run(&mut observers, || false).unwrap())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_tabu_descent(c: &mut Criterion) {
    use solver::tabu::{tabu_local_search, FalseCounts, Standard, TabuParams};

    let mut group = c.benchmark_group("tabu descent");
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xFEED);
    let formula = random_3sat(&mut rng, 40, 170);
    let params = TabuParams {
        max_flip: 500,
        tabu_list_length: 5,
        is_diversification: false,
        max_false: 5,
        rec: 2,
        k: 3,
    };

    group.bench_function("standard", |b| {
        b.iter_batched(
            || {
                let mut seed = Assignment::all_false(formula.num_variables);
                for v in 1..=formula.num_variables {
                    seed.set(v, rng.gen_bool(0.5));
                }
                seed
            },
            |seed| {
                let mut false_counts = FalseCounts::new(formula.num_clauses());
                black_box(
                    tabu_local_search(&formula, seed, &Standard, params, &mut false_counts, &mut rng, || false)
                        .unwrap(),
                )
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_driver, bench_tabu_descent
}
criterion_main!(benches);
