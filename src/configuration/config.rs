//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – worker pool and chunking options
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`GalaxyConfig`]     – synthesized initial state (distributions + anchor)
//! - [`BodyConfig`]       – explicit initial state for each body
//! - [`SnapshotConfig`]   – snapshot normalization options
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! A scenario gives its initial bodies either as a `galaxy` block (bodies
//! are synthesized from the configured distributions, plus one heavy anchor
//! body at the origin) or as an explicit `bodies` list — exactly one of the
//! two must be present.
//!
//! # YAML format
//! An example synthesized scenario matching these types:
//!
//! ```yaml
//! engine:
//!   workers: 4              # default: available CPU cores
//!   chunk_size: 32          # default: divide bodies evenly over workers
//!
//! parameters:
//!   timestep: 43200.0       # tick width in simulation time units
//!   t_end: 31536000.0       # simulation time to stop at
//!   G: 6.673e-11            # gravitational constant
//!   seed: 42                # makes body synthesis reproducible
//!
//! galaxy:
//!   body_count: 200         # bodies in addition to the anchor
//!   mass_range: [1.0e22, 5.0e24]
//!   distance_range: [5.0e10, 1.5e11, 1.0e10]   # min, max, optional max_z
//!   radius_range: [2.0e6, 7.0e6]
//!   anchor_mass: 1.989e30
//!
//! snapshot:
//!   reference_distance: 1.5e11   # default: the galaxy's max distance
//! ```
//!
//! All ranges are inclusive. Violating `min <= max` (or any other rule
//! below) is a configuration error at startup, reported before any
//! simulation output is produced — never a runtime fault.

#![allow(non_snake_case)]

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::forces::G_CONSTANT;

/// A rejected scenario configuration. Always fatal at startup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name}: min must not exceed max (got {min} .. {max})")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    #[error("{name} must be greater than 0 (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must have {expected} components")]
    BadComponents { name: &'static str, expected: &'static str },

    #[error("{name} must be at least 1")]
    ZeroCount { name: &'static str },

    #[error("scenario needs exactly one of `galaxy` or `bodies`")]
    AmbiguousSystem,

    #[error("body {index}: {reason}")]
    BadBody { index: usize, reason: &'static str },

    #[error("snapshot.reference_distance is required with an explicit body list")]
    MissingReference,
}

/// Worker pool and chunking options
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub workers: Option<usize>, // worker thread count, default = available cores
    #[serde(default)]
    pub chunk_size: Option<usize>, // bodies per chunk, default = evenly over workers
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub timestep: f64, // tick width in simulation time units
    pub t_end: f64,    // simulation time to stop at
    #[serde(default = "default_g")]
    pub G: f64,        // gravitational constant
    #[serde(default = "default_seed")]
    pub seed: u64,     // seed for body synthesis, makes runs reproducible
}

fn default_g() -> f64 {
    G_CONSTANT
}

fn default_seed() -> u64 {
    42
}

/// Synthesized initial state: distributions plus one heavy anchor body at
/// the origin
#[derive(Deserialize, Debug, Clone)]
pub struct GalaxyConfig {
    pub body_count: usize,       // bodies in addition to the anchor
    pub mass_range: Vec<f64>,    // [min, max], inclusive
    pub distance_range: Vec<f64>, // [min, max] or [min, max, max_z]
    pub radius_range: Vec<f64>,  // [min, max]
    pub anchor_mass: f64,        // mass of the central body
    #[serde(default = "default_anchor_radius")]
    pub anchor_radius: f64,      // display radius of the central body
    #[serde(default = "default_true")]
    pub anchor_static: bool,     // keep the anchor at rest instead of seeding an orbit
}

fn default_anchor_radius() -> f64 {
    5.0e9
}

fn default_true() -> bool {
    true
}

impl GalaxyConfig {
    pub fn min_distance(&self) -> f64 {
        self.distance_range.first().copied().unwrap_or(0.0)
    }

    pub fn max_distance(&self) -> f64 {
        self.distance_range.get(1).copied().unwrap_or(0.0)
    }

    /// Optional third component of `distance_range`; 0 keeps the disc flat
    pub fn max_z(&self) -> f64 {
        self.distance_range.get(2).copied().unwrap_or(0.0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.body_count == 0 {
            return Err(ConfigError::ZeroCount {
                name: "galaxy.body_count",
            });
        }

        let (min_m, _) = check_range("galaxy.mass_range", &self.mass_range)?;
        if min_m <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "galaxy.mass_range min",
                value: min_m,
            });
        }

        // distance_range may carry an optional max_z third component
        let (min_d, max_d, max_z) = match self.distance_range[..] {
            [min, max] => (min, max, 0.0),
            [min, max, z] => (min, max, z),
            _ => {
                return Err(ConfigError::BadComponents {
                    name: "galaxy.distance_range",
                    expected: "2 or 3",
                })
            }
        };
        if min_d > max_d {
            return Err(ConfigError::InvalidRange {
                name: "galaxy.distance_range",
                min: min_d,
                max: max_d,
            });
        }
        if min_d <= 0.0 {
            // bodies must not spawn on top of the anchor at the origin
            return Err(ConfigError::NonPositive {
                name: "galaxy.distance_range min",
                value: min_d,
            });
        }
        if max_z < 0.0 {
            return Err(ConfigError::Negative {
                name: "galaxy.distance_range max_z",
                value: max_z,
            });
        }

        let (min_r, _) = check_range("galaxy.radius_range", &self.radius_range)?;
        if min_r < 0.0 {
            return Err(ConfigError::Negative {
                name: "galaxy.radius_range min",
                value: min_r,
            });
        }

        if self.anchor_mass <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "galaxy.anchor_mass",
                value: self.anchor_mass,
            });
        }
        if self.anchor_radius < 0.0 {
            return Err(ConfigError::Negative {
                name: "galaxy.anchor_radius",
                value: self.anchor_radius,
            });
        }
        Ok(())
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // initial position in simulation units
    pub v: Vec<f64>, // initial velocity in simulation units per time unit
    pub m: f64,      // mass of the body
    pub radius: f64, // display radius, used only for visualization scaling
}

/// Snapshot normalization options
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub reference_distance: Option<f64>, // default: the galaxy's max distance
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub galaxy: Option<GalaxyConfig>,
    #[serde(default)]
    pub bodies: Option<Vec<BodyConfig>>,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

impl ScenarioConfig {
    /// Reject invalid scenarios before the simulation starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parameters.timestep <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "parameters.timestep",
                value: self.parameters.timestep,
            });
        }
        if self.parameters.t_end <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "parameters.t_end",
                value: self.parameters.t_end,
            });
        }
        if self.parameters.G <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "parameters.G",
                value: self.parameters.G,
            });
        }

        if self.engine.workers == Some(0) {
            return Err(ConfigError::ZeroCount {
                name: "engine.workers",
            });
        }
        if self.engine.chunk_size == Some(0) {
            return Err(ConfigError::ZeroCount {
                name: "engine.chunk_size",
            });
        }

        if let Some(reference) = self.snapshot.reference_distance {
            if reference <= 0.0 {
                return Err(ConfigError::NonPositive {
                    name: "snapshot.reference_distance",
                    value: reference,
                });
            }
        }

        match (&self.galaxy, &self.bodies) {
            (Some(galaxy), None) => galaxy.validate(),
            (None, Some(bodies)) => {
                if bodies.is_empty() {
                    return Err(ConfigError::ZeroCount { name: "bodies" });
                }
                for (index, body) in bodies.iter().enumerate() {
                    if body.x.len() != 3 {
                        return Err(ConfigError::BadBody {
                            index,
                            reason: "x must have exactly 3 components",
                        });
                    }
                    if body.v.len() != 3 {
                        return Err(ConfigError::BadBody {
                            index,
                            reason: "v must have exactly 3 components",
                        });
                    }
                    if body.m <= 0.0 {
                        return Err(ConfigError::BadBody {
                            index,
                            reason: "mass must be greater than 0",
                        });
                    }
                }
                // a synthesized scenario can default to its max distance, an
                // explicit list has no distance to fall back to
                if self.snapshot.reference_distance.is_none() {
                    return Err(ConfigError::MissingReference);
                }
                Ok(())
            }
            _ => Err(ConfigError::AmbiguousSystem),
        }
    }
}

/// A two-component inclusive range, checked for ordering
fn check_range(name: &'static str, range: &[f64]) -> Result<(f64, f64), ConfigError> {
    let (min, max) = match range[..] {
        [min, max] => (min, max),
        _ => {
            return Err(ConfigError::BadComponents {
                name,
                expected: "exactly 2",
            })
        }
    };
    if min > max {
        return Err(ConfigError::InvalidRange { name, min, max });
    }
    Ok((min, max))
}
