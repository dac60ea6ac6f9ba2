//! Benchmarks for forcing schemes and the equation of state.
//!
//! Run with: `cargo bench --bench forcing_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lbm_kernels::lattice::CS_STANDARD;
use lbm_kernels::{
    BodyForce, CarnahanStarling, ExactDifference, FailFast, ForcingScheme, MacroscopicState,
    NodeContext, VelocitySet,
};

/// Benchmark exact-difference forcing on each lattice.
fn bench_exact_difference(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_difference");
    let ctx = NodeContext::fluid();
    let state = MacroscopicState::new(1.02, [0.04, -0.01, 0.02], 1.03);
    let force = BodyForce::new([1e-5, -2e-5, 3e-6]);

    for (name, set, scheme) in [
        ("d2q9", VelocitySet::d2q9(), ExactDifference::isothermal()),
        ("d3q19", VelocitySet::d3q19(), ExactDifference::isothermal()),
        ("d3q27", VelocitySet::d3q27(), ExactDifference::isothermal()),
        ("d3q27_thermal", VelocitySet::d3q27(), ExactDifference::thermal()),
    ] {
        let mut stage = vec![0.0; set.q()];
        group.bench_with_input(BenchmarkId::new("stage", name), &set, |b, set| {
            b.iter(|| {
                let staged = scheme
                    .stage(
                        &ctx,
                        set,
                        set.full_range(),
                        black_box(&state),
                        black_box(&force),
                        &mut stage,
                        &FailFast,
                    )
                    .unwrap();
                staged.as_slice()[1]
            });
        });
    }

    group.finish();
}

/// Benchmark pressure and pseudopotential over a density sweep.
fn bench_pseudopotential(c: &mut Criterion) {
    let eos = CarnahanStarling::new();
    let densities: Vec<f64> = (0..4096).map(|k| 0.9 * k as f64 / 4096.0).collect();
    let ctx = NodeContext::fluid();

    c.bench_function("eos_fields_4096", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for &rho in &densities {
                if let Some(fields) = eos.eos_fields(&ctx, black_box(rho), CS_STANDARD, &FailFast).unwrap() {
                    total += fields.psi;
                }
            }
            total
        });
    });
}

criterion_group!(benches, bench_exact_difference, bench_pseudopotential);
criterion_main!(benches);
