use std::time::Instant;

use crate::simulation::forces::MassFocusGravity;
use crate::simulation::scheduler::{StepScheduler, TickSnapshot};
use crate::simulation::states::{Body, NVec3, System};
use crate::simulation::worker::WorkerPool;

/// Helper to build a manual System of size `n`
fn make_system(n: usize) -> System {
    let mut bodies = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0e10,
            (i_f * 0.13).cos() * 5.0e10,
            (i_f * 0.07).sin() * 5.0e10,
        );

        bodies.push(Body {
            x,
            v: NVec3::zeros(),
            m: 1.0e24,
            radius: 1.0e7,
        });
    }

    System::new(bodies)
}

/// Time a full mass-focus acceleration sweep for a range of N
pub fn bench_forces() {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200, 6400, 12800];

    let gravity = MassFocusGravity { G: 6.673e-11 };

    for n in ns {
        let sys = make_system(n);
        let snap = TickSnapshot::capture(&sys);

        // Warm up
        for i in 0..n {
            let _ = gravity.acceleration(i, &snap.masses, &snap.positions);
        }

        let t0 = Instant::now();
        for i in 0..n {
            let _ = gravity.acceleration(i, &snap.masses, &snap.positions);
        }
        let dt_sweep = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, sweep = {dt_sweep:8.6} s");
    }
}

/// Time full parallel ticks for a range of worker counts
/// Paste output directly into a spreadsheet to graph
pub fn bench_tick() {
    let n = 6400;
    let steps = 5;
    let dt = 60.0;

    println!("workers,tick_ms");

    for workers in [1, 2, 4, 8, 16] {
        let mut sys = make_system(n);
        let gravity = MassFocusGravity { G: 6.673e-11 };

        let pool = WorkerPool::spawn(workers, gravity).expect("spawn worker pool");
        let scheduler = StepScheduler::new(workers);

        // Warm up one tick
        scheduler.step(&mut sys, &pool, dt).expect("warm-up tick");

        let t0 = Instant::now();
        for _ in 0..steps {
            scheduler.step(&mut sys, &pool, dt).expect("bench tick");
        }
        let per_step = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{workers},{per_step:.6}");

        pool.shutdown();
    }
}
