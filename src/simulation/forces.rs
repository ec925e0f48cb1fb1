//! Mass-focus gravity for the n-body engine
//!
//! The reduced force model used throughout the simulation: for body i the
//! rest of the system is collapsed into a single point mass located at the
//! mass-weighted centroid of every body except i, and the pairwise Newtonian
//! force against that point is taken. O(N) per body and O(N²) per tick, and
//! not physically exact for more than two bodies.
//!
//! Also provides the orbital-speed helpers used once at initialization to
//! seed circular orbits, and small free-standing formula helpers (total
//! mass, momentum, F = m·a).

#![allow(non_snake_case)]

use thiserror::Error;

use crate::simulation::states::NVec3;

/// Default gravitational constant
pub const G_CONSTANT: f64 = 6.673e-11;

/// Raised when the mass-focus computation is undefined
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ForceError {
    /// The remaining mass (system minus body) is not positive: the body is
    /// effectively the entire system, or the index is out of range
    #[error("mass focus undefined for body {0}: remaining mass is not positive")]
    DegenerateSystem(usize),

    /// Zero separation between the body and its attractor
    #[error("body {0} coincides with its attractor")]
    CoincidentBodies(usize),

    /// A mass that must be positive is not
    #[error("mass must be greater than 0, got {0}")]
    NonPositiveMass(f64),
}

/// Sum of all masses
pub fn total_mass(masses: &[f64]) -> f64 {
    masses.iter().sum()
}

/// Mass-weighted centroid of all bodies
pub fn mass_focus(masses: &[f64], positions: &[NVec3]) -> NVec3 {
    debug_assert_eq!(masses.len(), positions.len());
    let mut focus = NVec3::zeros();
    for (m, x) in masses.iter().zip(positions) {
        focus += *m * *x;
    }
    focus / total_mass(masses)
}

/// Mass-weighted centroid of every body except `index`
///
/// This is the attractor of the reduced model. Fails with
/// [`ForceError::DegenerateSystem`] when the remaining mass is not positive
pub fn mass_focus_excluding(
    index: usize,
    masses: &[f64],
    positions: &[NVec3],
) -> Result<NVec3, ForceError> {
    debug_assert_eq!(masses.len(), positions.len());
    let m_i = *masses.get(index).ok_or(ForceError::DegenerateSystem(index))?;
    let remaining = total_mass(masses) - m_i;
    if remaining <= 0.0 {
        return Err(ForceError::DegenerateSystem(index));
    }

    let mut focus = NVec3::zeros();
    for (j, (m, x)) in masses.iter().zip(positions).enumerate() {
        if j == index {
            continue;
        }
        focus += *m * *x;
    }
    Ok(focus / remaining)
}

/// Total momentum of the system, sum of m_i * v_i
pub fn momentum(masses: &[f64], velocities: &[NVec3]) -> NVec3 {
    debug_assert_eq!(masses.len(), velocities.len());
    let mut p = NVec3::zeros();
    for (m, v) in masses.iter().zip(velocities) {
        p += *m * *v;
    }
    p
}

/// Force after Newton, F = m * a, with non-positive mass rejected
pub fn newton_force(mass: f64, acceleration: f64) -> Result<f64, ForceError> {
    if mass <= 0.0 {
        return Err(ForceError::NonPositiveMass(mass));
    }
    Ok(mass * acceleration)
}

/// Reduced-model Newtonian gravity
#[derive(Debug, Clone)]
pub struct MassFocusGravity {
    pub G: f64, // gravitational constant
}

impl MassFocusGravity {
    /// Gravitational force pulling a point mass `m1` at `x1` toward a point
    /// mass `m2` at `x2`
    ///
    /// F = G * m1 * m2 / |Δr|³ * Δr with Δr = x2 - x1. `index` is the body
    /// the force acts on, carried for error attribution
    pub fn gravitational_force(
        &self,
        index: usize,
        m1: f64,
        x1: NVec3,
        m2: f64,
        x2: NVec3,
    ) -> Result<NVec3, ForceError> {
        // Δr points from the attracted body toward the attractor, so the
        // resulting force already pulls the right way
        let delta = x2 - x1;
        let dist = delta.norm();
        if dist == 0.0 {
            return Err(ForceError::CoincidentBodies(index));
        }
        Ok(self.G * m1 * m2 / (dist * dist * dist) * delta)
    }

    /// Net gravitational acceleration on body `index` at the current tick
    ///
    /// The rest of the system is treated as one point mass (total mass minus
    /// the body) at the mass focus excluding the body
    pub fn acceleration(
        &self,
        index: usize,
        masses: &[f64],
        positions: &[NVec3],
    ) -> Result<NVec3, ForceError> {
        let m_i = *masses.get(index).ok_or(ForceError::DegenerateSystem(index))?;
        let remaining = total_mass(masses) - m_i;
        let focus = mass_focus_excluding(index, masses, positions)?;

        let force = self.gravitational_force(index, m_i, positions[index], remaining, focus)?;
        Ok(force / m_i)
    }

    /// Circular-orbit speed for body `index` around the mass focus
    /// excluding it: v = sqrt(G * m_rem / r) * m_rem / m_total
    ///
    /// Only used while seeding initial velocities
    pub fn orbital_speed_magnitude(
        &self,
        index: usize,
        masses: &[f64],
        positions: &[NVec3],
    ) -> Result<f64, ForceError> {
        let m_i = *masses.get(index).ok_or(ForceError::DegenerateSystem(index))?;
        let m_total = total_mass(masses);
        let remaining = m_total - m_i;
        let focus = mass_focus_excluding(index, masses, positions)?;

        let r = (positions[index] - focus).norm();
        if r == 0.0 {
            return Err(ForceError::CoincidentBodies(index));
        }
        Ok((self.G * remaining / r).sqrt() * remaining / m_total)
    }

    /// Unit direction of the circular orbit for body `index`: perpendicular
    /// to the radius vector in the orbital plane (cross product with the
    /// out-of-plane unit vector, normalized)
    pub fn orbital_speed_direction(
        &self,
        index: usize,
        masses: &[f64],
        positions: &[NVec3],
    ) -> Result<NVec3, ForceError> {
        let focus = mass_focus_excluding(index, masses, positions)?;
        let radial = positions[index] - focus;

        let planar = radial.cross(&NVec3::z());
        let norm = planar.norm();
        if norm == 0.0 {
            // the body sits on the out-of-plane axis through the focus, so
            // there is no tangent in the orbital plane
            return Err(ForceError::CoincidentBodies(index));
        }
        Ok(planar / norm)
    }
}
