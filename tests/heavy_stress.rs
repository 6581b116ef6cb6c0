#![cfg(feature = "heavy")]
use dp_control::{ProblemBuilder, ValueEngine};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn heavy_stress_dense_grid() {
    let mut rng = StdRng::seed_from_u64(123);
    let states: Vec<f64> = (0..400).map(|i| f64::from(i) * 0.05).collect();
    let mut builder = ProblemBuilder::new()
        .with_states(states.clone())
        .with_horizon(200)
        .with_initial_state(states[399])
        .with_target_state(0.0);
    for &x in &states {
        let controls: Vec<f64> = (0..8).map(|_| -rng.gen_range(0.0..2.0)).collect();
        builder = builder.with_controls(x, controls);
    }
    let solution = ValueEngine::new(builder.build().unwrap()).run();
    // The final forced drive makes every state feasible at stage K - 1.
    assert!(solution.cost().is_finite());
    assert!(solution.path().is_complete());
}
