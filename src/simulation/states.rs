//! Core state types for the N-body simulation
//!
//! `Body` is a point mass with position, velocity, mass, and display radius;
//! `System` is the ordered body list plus the current simulation time `t`.
//! A body's identity is its index into the list, and the list never grows or
//! shrinks after initialization. The system is owned and mutated only by the
//! step coordinator; workers operate on read-only per-tick copies.

use nalgebra::Vector3;
use thiserror::Error;

pub type NVec3 = Vector3<f64>;

/// A body index outside the system's body list. Always a caller defect,
/// never a runtime condition to recover from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("body index {0} out of range")]
pub struct InvalidIndex(pub usize);

/// A body created with zero or negative mass
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("body mass must be greater than 0, got {0}")]
pub struct NonPositiveMass(pub f64);

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass, always > 0
    pub radius: f64, // display radius, not used by the physics
}

impl Body {
    /// Create a body, rejecting non-positive mass
    pub fn new(x: NVec3, v: NVec3, m: f64, radius: f64) -> Result<Self, NonPositiveMass> {
        if m <= 0.0 {
            return Err(NonPositiveMass(m));
        }
        Ok(Self { x, v, m, radius })
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // ordered collection, index = identity
    pub t: f64, // time
}

impl System {
    /// System at t = 0
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Body at `index`
    pub fn get(&self, index: usize) -> Result<&Body, InvalidIndex> {
        self.bodies.get(index).ok_or(InvalidIndex(index))
    }

    /// Overwrite position and velocity of the body at `index`
    ///
    /// The values themselves are never validated here; producers must not
    /// pass NaN/Inf
    pub fn apply_update(&mut self, index: usize, x: NVec3, v: NVec3) -> Result<(), InvalidIndex> {
        let body = self.bodies.get_mut(index).ok_or(InvalidIndex(index))?;
        body.x = x;
        body.v = v;
        Ok(())
    }

    /// Sum of all body masses
    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.m).sum()
    }
}
