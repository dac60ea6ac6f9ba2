//! Carnahan-Starling equation of state and the pseudopotential it induces.
//!
//! Multiphase lattice Boltzmann models close the pressure with a non-ideal
//! equation of state and turn the excess over the lattice reference term
//! `ρ / CS²` into a pseudopotential ψ that generates the inter-particle force.
//!
//! ```text
//! P(ρ) = ρ R T (1 + τ + τ² − τ³) / (1 − τ)³ − a ρ²,     τ = b ρ / 4
//! ψ(ρ) = CS · sqrt( 2 (P − ρ / CS²) / G ),               G = sign(P − ρ / CS²)
//! ```
//!
//! Choosing `G` with the sign of the excess keeps the radicand non-negative
//! for every density, so ψ is always real.
//!
//! # Units
//!
//! Lattice units throughout: density in mass per cell, temperature
//! normalized so that `R = 1`.
//!
//! # Coexistence
//!
//! Below the critical temperature `T_c ≈ 0.3773 a / (b R)` the isotherm
//! develops a van der Waals loop and the fluid separates into liquid and
//! vapour phases.

use crate::analysis::ValidityPolicy;
use crate::error::{LbmError, Quantity};
use crate::types::NodeContext;

/// Reduced critical temperature `b R T_c / a` of the Carnahan-Starling EOS.
pub const CRITICAL_TEMPERATURE_RATIO: f64 = 0.377_29;

/// Reduced critical density `b ρ_c` of the Carnahan-Starling EOS.
pub const CRITICAL_DENSITY_RATIO: f64 = 0.521_82;

/// Pressure and pseudopotential of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EosFields {
    /// Non-ideal pressure P
    pub pressure: f64,
    /// Pseudopotential ψ
    pub psi: f64,
}

/// Carnahan-Starling equation of state.
///
/// # Example
///
/// ```
/// use lbm_kernels::equations::CarnahanStarling;
///
/// let eos = CarnahanStarling::new().with_reduced_temperature(0.7);
/// assert!(eos.temperature < eos.critical_temperature());
/// assert_eq!(eos.pressure(0.0), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarnahanStarling {
    /// Attraction parameter
    pub a: f64,
    /// Repulsion (co-volume) parameter
    pub b: f64,
    /// Gas constant
    pub r: f64,
    /// Temperature
    pub temperature: f64,
}

impl Default for CarnahanStarling {
    fn default() -> Self {
        Self::new()
    }
}

impl CarnahanStarling {
    /// Standard lattice parameters `a = 1, b = 4, R = 1`, at `T = 0.7 T_c`.
    pub fn new() -> Self {
        let eos = Self {
            a: 1.0,
            b: 4.0,
            r: 1.0,
            temperature: 0.0,
        };
        eos.with_reduced_temperature(0.7)
    }

    /// Custom EOS constants.
    pub fn with_constants(a: f64, b: f64, r: f64, temperature: f64) -> Self {
        Self {
            a,
            b,
            r,
            temperature,
        }
    }

    /// Set the absolute temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the temperature as a fraction of the critical temperature.
    pub fn with_reduced_temperature(mut self, ratio: f64) -> Self {
        self.temperature = ratio * self.critical_temperature();
        self
    }

    /// Critical temperature `T_c`.
    pub fn critical_temperature(&self) -> f64 {
        CRITICAL_TEMPERATURE_RATIO * self.a / (self.b * self.r)
    }

    /// Critical density `ρ_c`.
    pub fn critical_density(&self) -> f64 {
        CRITICAL_DENSITY_RATIO / self.b
    }

    /// Packing limit `4 / b`; the pressure diverges as ρ approaches it.
    pub fn max_density(&self) -> f64 {
        4.0 / self.b
    }

    /// Non-ideal pressure `P(ρ)`.
    #[inline]
    pub fn pressure(&self, rho: f64) -> f64 {
        let tau = self.b * rho / 4.0;
        let tau2 = tau * tau;
        let repulsive = (1.0 + tau + tau2 - tau2 * tau) / (1.0 - tau).powi(3);
        rho * self.r * self.temperature * repulsive - self.a * rho * rho
    }

    /// Reference term `ρ / CS²` subtracted from the pressure in ψ.
    #[inline(always)]
    pub fn reference_pressure(rho: f64, cs: f64) -> f64 {
        rho / (cs * cs)
    }

    /// Pseudopotential `ψ(ρ, P)` for sound speed `cs`.
    #[inline]
    pub fn psi(rho: f64, pressure: f64, cs: f64) -> f64 {
        let excess = pressure - Self::reference_pressure(rho, cs);
        let g = if excess < 0.0 { -1.0 } else { 1.0 };
        cs * (2.0 * excess / g).sqrt()
    }

    /// Pressure of one node, checked by `policy`.
    ///
    /// Returns `None` on immersed solid nodes.
    pub fn node_pressure<P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        rho: f64,
        policy: &P,
    ) -> Result<Option<f64>, LbmError> {
        if ctx.class.is_solid() {
            return Ok(None);
        }
        let p = self.pressure(rho);
        policy.check(ctx.coords, Quantity::Pressure, p, || {
            format!("rho={rho:e}, a={}, b={}, R={}, T={}", self.a, self.b, self.r, self.temperature)
        })?;
        Ok(Some(p))
    }

    /// Pseudopotential of one node from its pressure, checked by `policy`.
    ///
    /// Returns `None` on immersed solid nodes.
    pub fn node_psi<P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        rho: f64,
        pressure: f64,
        cs: f64,
        policy: &P,
    ) -> Result<Option<f64>, LbmError> {
        if ctx.class.is_solid() {
            return Ok(None);
        }
        let psi = Self::psi(rho, pressure, cs);
        policy.check(ctx.coords, Quantity::Psi, psi, || {
            format!("rho={rho:e}, P={pressure:e}, cs={cs}")
        })?;
        Ok(Some(psi))
    }

    /// Pressure and pseudopotential of one node.
    ///
    /// Returns `None` on immersed solid nodes.
    pub fn eos_fields<P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        rho: f64,
        cs: f64,
        policy: &P,
    ) -> Result<Option<EosFields>, LbmError> {
        let Some(pressure) = self.node_pressure(ctx, rho, policy)? else {
            return Ok(None);
        };
        let Some(psi) = self.node_psi(ctx, rho, pressure, cs, policy)? else {
            return Ok(None);
        };
        Ok(Some(EosFields { pressure, psi }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FailFast, Unchecked};
    use crate::lattice::CS_STANDARD;
    use crate::types::NodeClass;

    #[test]
    fn test_pressure_vanishes_at_zero_density() {
        let eos = CarnahanStarling::new();
        assert_eq!(eos.pressure(0.0), 0.0);
    }

    #[test]
    fn test_psi_finite_below_packing_limit() {
        for ratio in [0.5, 0.7, 1.0, 1.3] {
            let eos = CarnahanStarling::new().with_reduced_temperature(ratio);
            let n = 400;
            for k in 0..n {
                let rho = eos.max_density() * k as f64 / n as f64;
                let p = eos.pressure(rho);
                assert!(p.is_finite(), "P({rho}) = {p}");

                let excess = p - CarnahanStarling::reference_pressure(rho, CS_STANDARD);
                let g = if excess < 0.0 { -1.0 } else { 1.0 };
                assert!(2.0 * excess / g >= 0.0);

                let psi = CarnahanStarling::psi(rho, p, CS_STANDARD);
                assert!(psi.is_finite() && psi >= 0.0, "psi({rho}) = {psi}");
            }
        }
    }

    #[test]
    fn test_psi_value() {
        let eos = CarnahanStarling::new();
        let rho = 0.2;
        let p = eos.pressure(rho);
        let cs2 = CS_STANDARD * CS_STANDARD;

        // excess is negative here, so G = -1
        let excess = p - rho / cs2;
        assert!(excess < 0.0);
        let expected = (2.0 * excess / -1.0).sqrt() * CS_STANDARD;
        let psi = CarnahanStarling::psi(rho, p, CS_STANDARD);
        assert!((psi - expected).abs() < 1e-15);
        assert!((psi - 0.636_78).abs() < 1e-4, "psi = {psi}");

        // a positive excess takes G = +1
        let psi = CarnahanStarling::psi(0.3, 2.0, CS_STANDARD);
        assert!((psi - (2.0_f64 * (2.0 - 0.9)).sqrt() * CS_STANDARD).abs() < 1e-14);
    }

    #[test]
    fn test_ideal_gas_limit() {
        // a = 0 and low density: P ≈ ρ R T
        let eos = CarnahanStarling::with_constants(0.0, 4.0, 1.0, 0.2);
        let rho = 1e-4;
        assert!((eos.pressure(rho) - rho * 0.2).abs() / (rho * 0.2) < 1e-3);
    }

    #[test]
    fn test_critical_point_of_standard_parameters() {
        let eos = CarnahanStarling::new();
        assert!((eos.critical_temperature() - 0.094_32).abs() < 1e-4);
        assert!((eos.critical_density() - 0.130_45).abs() < 1e-4);
        assert!((eos.temperature - 0.7 * eos.critical_temperature()).abs() < 1e-15);
    }

    #[test]
    fn test_subcritical_isotherm_is_non_monotone() {
        let eos = CarnahanStarling::new().with_reduced_temperature(0.7);
        let samples: Vec<f64> = (1..100)
            .map(|k| eos.pressure(0.4 * k as f64 / 100.0))
            .collect();
        assert!(samples.windows(2).any(|w| w[1] < w[0]));

        let eos = CarnahanStarling::new().with_reduced_temperature(1.5);
        let samples: Vec<f64> = (1..100)
            .map(|k| eos.pressure(0.4 * k as f64 / 100.0))
            .collect();
        assert!(samples.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_node_kernels_skip_solid() {
        let eos = CarnahanStarling::new();
        let solid = NodeContext::fluid().with_class(NodeClass::ImmersedSolid);
        assert_eq!(eos.eos_fields(&solid, 0.2, CS_STANDARD, &FailFast).unwrap(), None);

        let fields = eos
            .eos_fields(&NodeContext::fluid(), 0.2, CS_STANDARD, &FailFast)
            .unwrap()
            .unwrap();
        assert_eq!(fields.pressure, eos.pressure(0.2));
        assert_eq!(fields.psi, CarnahanStarling::psi(0.2, fields.pressure, CS_STANDARD));
    }

    #[test]
    fn test_guard_on_pressure_at_packing_limit() {
        let eos = CarnahanStarling::new();
        let ctx = NodeContext::fluid();
        let err = eos.node_pressure(&ctx, eos.max_density(), &FailFast).unwrap_err();
        assert!(err.is_divergence());
        assert!(eos.node_pressure(&ctx, eos.max_density(), &Unchecked).is_ok());
    }
}
