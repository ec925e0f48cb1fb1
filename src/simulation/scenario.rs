//! Build fully-initialized simulation scenarios from configuration and run them
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//! - the active force model (`MassFocusGravity`)
//!
//! `run` is the coordinator loop: check the stop token, advance one parallel
//! tick, publish a snapshot, until the end time is reached or the consumer
//! stops the run. Termination is honored only between ticks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::configuration::config::{BodyConfig, GalaxyConfig, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{self, ForceError, MassFocusGravity};
use crate::simulation::params::Parameters;
use crate::simulation::scheduler::{StepScheduler, TickError};
use crate::simulation::snapshot::SnapshotPublisher;
use crate::simulation::states::{Body, NVec3, NonPositiveMass, System};
use crate::simulation::worker::WorkerPool;

/// Anything that stops a run before `t_end`
///
/// Force-model failures abort the whole run: continuing would mean assuming
/// a state the tick never produced
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("tick failed: {0}")]
    Tick(#[from] TickError),

    #[error("initialization failed: {0}")]
    Force(#[from] ForceError),

    #[error("invalid body: {0}")]
    Body(#[from] NonPositiveMass),

    #[error("could not start worker pool: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Fully-initialized runtime bundle for one simulation run
///
/// This is the main runtime bundle constructed from a [`ScenarioConfig`]:
/// it contains the engine settings, parameters, current system state, and
/// the active force model
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub gravity: MassFocusGravity,
}

impl Scenario {
    /// Map a validated [`ScenarioConfig`] into the runtime representation
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimulationError> {
        let gravity = MassFocusGravity {
            G: cfg.parameters.G,
        };

        // normalization scale: explicit, or the synthesized disc's max radius
        let reference_distance = cfg
            .snapshot
            .reference_distance
            .or_else(|| cfg.galaxy.as_ref().map(|g| g.max_distance()))
            .unwrap_or(1.0);

        let bodies = match (&cfg.galaxy, &cfg.bodies) {
            (Some(galaxy), _) => {
                let mut rng = StdRng::seed_from_u64(cfg.parameters.seed);
                synthesize_bodies(galaxy, &gravity, &mut rng)?
            }
            (None, Some(list)) => explicit_bodies(list)?,
            (None, None) => Vec::new(), // rejected by validate(), kept total here
        };

        let engine = Engine {
            workers: cfg.engine.workers.unwrap_or_else(num_cpus::get).max(1),
            chunk_size: cfg.engine.chunk_size,
        };

        let parameters = Parameters {
            timestep: cfg.parameters.timestep,
            t_end: cfg.parameters.t_end,
            seed: cfg.parameters.seed,
            G: cfg.parameters.G,
            reference_distance,
        };

        Ok(Self {
            engine,
            parameters,
            system: System::new(bodies),
            gravity,
        })
    }

    /// Run the coordinator loop until `t_end` or until the consumer stops us
    ///
    /// Returns the number of completed ticks
    pub fn run(mut self, publisher: SnapshotPublisher) -> Result<u64, SimulationError> {
        let pool = WorkerPool::spawn(self.engine.workers, self.gravity.clone())?;
        let scheduler = StepScheduler::new(self.engine.chunk_count(self.system.len()));
        log::info!(
            "starting run: {} bodies, {} workers, dt = {}",
            self.system.len(),
            pool.worker_count(),
            self.parameters.timestep
        );

        let mut ticks: u64 = 0;
        let result = loop {
            // termination is only honored between ticks, never mid-tick
            if publisher.stop_requested() {
                log::info!("stop requested, exiting after {ticks} ticks");
                break Ok(ticks);
            }
            if self.system.t >= self.parameters.t_end {
                log::info!(
                    "reached t_end = {} after {ticks} ticks",
                    self.parameters.t_end
                );
                break Ok(ticks);
            }

            if let Err(err) = scheduler.step(&mut self.system, &pool, self.parameters.timestep) {
                // no partial state to continue from, abort the whole run
                log::error!("tick {ticks} failed: {err}");
                break Err(SimulationError::Tick(err));
            }
            ticks += 1;

            if !publisher.publish(&self.system) {
                log::info!("snapshot consumer gone, exiting after {ticks} ticks");
                break Ok(ticks);
            }
        };

        if !self.system.is_empty() {
            let masses: Vec<f64> = self.system.bodies.iter().map(|b| b.m).collect();
            let positions: Vec<NVec3> = self.system.bodies.iter().map(|b| b.x).collect();
            let velocities: Vec<NVec3> = self.system.bodies.iter().map(|b| b.v).collect();
            log::debug!(
                "shutdown diagnostics: momentum = {:?}, mass focus = {:?}",
                forces::momentum(&masses, &velocities),
                forces::mass_focus(&masses, &positions)
            );
        }

        pool.shutdown();
        result
    }
}

/// Uniform random sign flip
fn random_sign(rng: &mut StdRng) -> f64 {
    if rng.random::<bool>() {
        1.0
    } else {
        -1.0
    }
}

/// Synthesize the anchor plus `body_count` orbiting bodies from the
/// configured distributions
fn synthesize_bodies(
    galaxy: &GalaxyConfig,
    gravity: &MassFocusGravity,
    rng: &mut StdRng,
) -> Result<Vec<Body>, SimulationError> {
    let (min_m, max_m) = (galaxy.mass_range[0], galaxy.mass_range[1]);
    let (min_d, max_d) = (galaxy.min_distance(), galaxy.max_distance());
    let max_z = galaxy.max_z();
    let (min_r, max_r) = (galaxy.radius_range[0], galaxy.radius_range[1]);

    let mut bodies = Vec::with_capacity(galaxy.body_count + 1);

    // The anchor sits at the origin and stays at rest by configuration, not
    // by special casing in the physics
    bodies.push(Body::new(
        NVec3::zeros(),
        NVec3::zeros(),
        galaxy.anchor_mass,
        galaxy.anchor_radius,
    )?);

    for _ in 0..galaxy.body_count {
        let x = rng.random_range(min_d..=max_d) * random_sign(rng);
        // y is bounded so the planar (x, y) distance never exceeds max_d;
        // the lower bound collapses toward that cap when x is near it
        let y_hi = (max_d * max_d - x * x).sqrt();
        let y_lo = min_d.min(y_hi);
        let y = rng.random_range(y_lo..=y_hi) * random_sign(rng);
        let z = rng.random_range(0.0..=max_z) * random_sign(rng);

        let m = rng.random_range(min_m..=max_m);
        let radius = rng.random_range(min_r..=max_r);
        bodies.push(Body::new(NVec3::new(x, y, z), NVec3::zeros(), m, radius)?);
    }

    // Seed a circular orbit around the mass focus excluding each body
    let masses: Vec<f64> = bodies.iter().map(|b| b.m).collect();
    let positions: Vec<NVec3> = bodies.iter().map(|b| b.x).collect();
    let first = if galaxy.anchor_static { 1 } else { 0 };
    for i in first..bodies.len() {
        let direction = gravity.orbital_speed_direction(i, &masses, &positions)?;
        let speed = gravity.orbital_speed_magnitude(i, &masses, &positions)?;
        bodies[i].v = speed * direction;
    }

    Ok(bodies)
}

/// Map explicit body configs into runtime bodies
///
/// Component counts were checked by `ScenarioConfig::validate`
fn explicit_bodies(list: &[BodyConfig]) -> Result<Vec<Body>, SimulationError> {
    list.iter()
        .map(|bc| {
            Body::new(
                NVec3::new(bc.x[0], bc.x[1], bc.x[2]),
                NVec3::new(bc.v[0], bc.v[1], bc.v[2]),
                bc.m,
                bc.radius,
            )
            .map_err(SimulationError::from)
        })
        .collect()
}
