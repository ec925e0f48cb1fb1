//! Numerical and physical parameters for a run
//!
//! `Parameters` holds runtime settings:
//! - tick width and end time,
//! - the gravitational constant `G`,
//! - the synthesis seed and the snapshot reference distance

#![allow(non_snake_case)]

#[derive(Debug, Clone)]
pub struct Parameters {
    pub timestep: f64, // tick width dt
    pub t_end: f64, // simulation time to stop at
    pub seed: u64, // deterministic seed for body synthesis
    pub G: f64, // gravitational constant
    pub reference_distance: f64, // snapshot normalization scale
}
