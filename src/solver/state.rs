//! Macroscopic state of a single node.

/// Macroscopic fields of one node: density, velocity and temperature.
///
/// In 2D the third velocity component stays zero. Temperature is normalized
/// by the reference temperature (1 for isothermal runs).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacroscopicState {
    /// Density ρ (must be positive)
    pub rho: f64,
    /// Velocity (u, v, w) in lattice units
    pub u: [f64; 3],
    /// Normalized temperature θ (must be positive)
    pub temperature: f64,
}

impl Default for MacroscopicState {
    fn default() -> Self {
        Self::rest(1.0)
    }
}

impl MacroscopicState {
    /// Create a new state.
    #[inline(always)]
    pub fn new(rho: f64, u: [f64; 3], temperature: f64) -> Self {
        Self {
            rho,
            u,
            temperature,
        }
    }

    /// Fluid at rest at reference temperature.
    #[inline(always)]
    pub fn rest(rho: f64) -> Self {
        Self::new(rho, [0.0; 3], 1.0)
    }

    /// Isothermal 2D state.
    pub fn planar(rho: f64, u: f64, v: f64) -> Self {
        Self::new(rho, [u, v, 0.0], 1.0)
    }

    /// Velocity components for a `dim`-dimensional lattice.
    #[inline(always)]
    pub fn velocity(&self, dim: usize) -> &[f64] {
        &self.u[..dim]
    }

    /// Momentum density ρu.
    pub fn momentum(&self) -> [f64; 3] {
        [self.rho * self.u[0], self.rho * self.u[1], self.rho * self.u[2]]
    }

    /// Velocity magnitude |u|.
    pub fn speed(&self) -> f64 {
        self.u.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// Kinetic energy density ½ρ|u|².
    pub fn kinetic_energy(&self) -> f64 {
        let s = self.speed();
        0.5 * self.rho * s * s
    }
}
