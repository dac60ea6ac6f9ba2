//! Hermite-expanded equilibrium distributions.
//!
//! The Maxwellian is projected onto Hermite polynomials in the normalized
//! velocity `ξ = XI[i]`, with `û = u / CS` and `θ = T / T₀`:
//!
//! ```text
//! feq = w ρ { 1 + ξ·û
//!           + ½ [(ξ·û)² − û² + (θ−1)(ξ² − D)]
//!           + (ξ·û)/6 [(ξ·û)² − 3û² + 3(θ−1)(ξ² − D − 2)]
//!           + 1/24 [(ξ·û)⁴ − 6(ξ·û)²û² + 3û⁴
//!                   + 6(θ−1)((ξ·û)²(ξ² − D − 4) + û²(D + 2 − ξ²))
//!                   + 3(θ−1)²(ξ⁴ − 2(D+2)ξ² + D(D+2))] }
//! ```
//!
//! The isothermal model truncates after the second-order bracket with
//! `θ = 1`; the thermal model keeps all four orders.

use crate::lattice::VelocitySet;
use crate::types::VelocityIndex;

/// Truncation order of the Hermite expansion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EquilibriumOrder {
    /// Isothermal Navier-Stokes level.
    #[default]
    Second,
    /// Adds the third-order velocity correction.
    Third,
    /// Full thermal expansion.
    Fourth,
}

impl EquilibriumOrder {
    /// Numeric order.
    pub const fn as_usize(self) -> usize {
        match self {
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
        }
    }
}

/// Equilibrium population for velocity `i`.
///
/// `u` holds `set.dim()` components in lattice units. Pure; returns NaN or
/// infinity only when the inputs already are.
#[inline]
pub fn equilibrium(
    set: &VelocitySet,
    i: VelocityIndex,
    rho: f64,
    u: &[f64],
    temperature: f64,
    order: EquilibriumOrder,
) -> f64 {
    let xi = set.xi(i);
    let inv_cs = 1.0 / set.cs();

    let mut xu = 0.0;
    let mut uu = 0.0;
    let mut xx = 0.0;
    for (d, &x) in xi.iter().enumerate() {
        let ud = u[d] * inv_cs;
        xu += x * ud;
        uu += ud * ud;
        xx += x * x;
    }

    set.weight(i) * rho * hermite_series(xu, uu, xx, set.dim() as f64, temperature - 1.0, order)
}

/// Equilibrium evaluated at the shifted velocity `u + du`.
///
/// Used by the exact-difference forcing scheme.
#[inline]
pub fn equilibrium_shifted(
    set: &VelocitySet,
    i: VelocityIndex,
    rho: f64,
    u: &[f64],
    du: &[f64],
    temperature: f64,
    order: EquilibriumOrder,
) -> f64 {
    let mut shifted = [0.0; 3];
    for d in 0..set.dim() {
        shifted[d] = u[d] + du[d];
    }
    equilibrium(set, i, rho, &shifted[..set.dim()], temperature, order)
}

/// Fill `out[range]` with equilibria for every velocity of `set`.
///
/// `out` must hold `set.q()` values.
pub fn equilibrium_all(
    set: &VelocitySet,
    rho: f64,
    u: &[f64],
    temperature: f64,
    order: EquilibriumOrder,
    out: &mut [f64],
) {
    for i in VelocityIndex::iter(set.q()) {
        out[i] = equilibrium(set, i, rho, u, temperature, order);
    }
}

/// Bracketed Hermite series `feq / (w ρ)`.
///
/// `xu = ξ·û`, `uu = û²`, `xx = ξ²`, `d` the dimensionality and
/// `dt = θ − 1`.
#[inline(always)]
fn hermite_series(xu: f64, uu: f64, xx: f64, d: f64, dt: f64, order: EquilibriumOrder) -> f64 {
    let xu2 = xu * xu;

    let mut sum = 1.0 + xu + 0.5 * (xu2 - uu + dt * (xx - d));
    if order >= EquilibriumOrder::Third {
        sum += xu / 6.0 * (xu2 - 3.0 * uu + 3.0 * dt * (xx - d - 2.0));
    }
    if order >= EquilibriumOrder::Fourth {
        let velocity = xu2 * xu2 - 6.0 * xu2 * uu + 3.0 * uu * uu;
        let mixed = 6.0 * dt * (xu2 * (xx - d - 4.0) + uu * (d + 2.0 - xx));
        let thermal = 3.0 * dt * dt * (xx * xx - 2.0 * (d + 2.0) * xx + d * (d + 2.0));
        sum += (velocity + mixed + thermal) / 24.0;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn moments(
        set: &VelocitySet,
        rho: f64,
        u: &[f64],
        theta: f64,
        order: EquilibriumOrder,
    ) -> (f64, Vec<f64>) {
        let mut feq = vec![0.0; set.q()];
        equilibrium_all(set, rho, u, theta, order, &mut feq);
        let mass: f64 = feq.iter().sum();
        let momentum = (0..set.dim())
            .map(|d| {
                VelocityIndex::iter(set.q())
                    .map(|i| set.cs() * set.xi_component(i, d) * feq[i.get()])
                    .sum()
            })
            .collect();
        (mass, momentum)
    }

    #[test]
    fn test_rest_state_reproduces_weights() {
        for set in [VelocitySet::d2q9(), VelocitySet::d3q19(), VelocitySet::d3q27()] {
            let u = vec![0.0; set.dim()];
            for i in VelocityIndex::iter(set.q()) {
                let feq = equilibrium(&set, i, 1.0, &u, 1.0, EquilibriumOrder::Second);
                assert_relative_eq!(feq, set.weight(i), epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_mass_and_momentum_second_order() {
        for set in [VelocitySet::d2q9(), VelocitySet::d3q19(), VelocitySet::d3q27()] {
            let u: Vec<f64> = [0.05, -0.03, 0.02][..set.dim()].to_vec();
            let (mass, momentum) = moments(&set, 1.3, &u, 1.0, EquilibriumOrder::Second);
            assert_relative_eq!(mass, 1.3, epsilon = 1e-13);
            for d in 0..set.dim() {
                assert_relative_eq!(momentum[d], 1.3 * u[d], epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn test_mass_and_momentum_fourth_order() {
        // Quadrature of degree 5 is enough for the zeroth and first moments
        // of every term up to fourth order, including θ ≠ 1.
        for set in [VelocitySet::d2q9(), VelocitySet::d3q27()] {
            let u: Vec<f64> = [0.04, 0.01, -0.02][..set.dim()].to_vec();
            for theta in [1.0, 0.95, 1.08] {
                let (mass, momentum) = moments(&set, 0.8, &u, theta, EquilibriumOrder::Fourth);
                assert_relative_eq!(mass, 0.8, epsilon = 1e-13);
                for d in 0..set.dim() {
                    assert_relative_eq!(momentum[d], 0.8 * u[d], epsilon = 1e-13);
                }
            }
        }
    }

    #[test]
    fn test_second_order_matches_textbook_form() {
        // feq = w ρ [1 + 3 e·u + 9/2 (e·u)² − 3/2 u²] for cs² = 1/3
        let set = VelocitySet::d2q9();
        let u = [0.07, -0.02];
        for i in VelocityIndex::iter(9) {
            let e = set.lattice_vector(i);
            let eu = e[0] as f64 * u[0] + e[1] as f64 * u[1];
            let uu = u[0] * u[0] + u[1] * u[1];
            let expected = set.weight(i) * 1.1 * (1.0 + 3.0 * eu + 4.5 * eu * eu - 1.5 * uu);
            let feq = equilibrium(&set, i, 1.1, &u, 1.0, EquilibriumOrder::Second);
            assert_relative_eq!(feq, expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_higher_orders_vanish_at_rest_isothermal() {
        let set = VelocitySet::d3q27();
        let u = [0.0; 3];
        for i in VelocityIndex::iter(set.q()) {
            let second = equilibrium(&set, i, 1.0, &u, 1.0, EquilibriumOrder::Second);
            let fourth = equilibrium(&set, i, 1.0, &u, 1.0, EquilibriumOrder::Fourth);
            assert_relative_eq!(second, fourth, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_shifted_matches_direct() {
        let set = VelocitySet::d3q19();
        let u = [0.01, 0.02, 0.03];
        let du = [0.001, -0.002, 0.0];
        let direct = [0.011, 0.018, 0.03];
        for i in VelocityIndex::iter(set.q()) {
            let a = equilibrium_shifted(&set, i, 1.0, &u, &du, 1.0, EquilibriumOrder::Second);
            let b = equilibrium(&set, i, 1.0, &direct, 1.0, EquilibriumOrder::Second);
            assert_relative_eq!(a, b, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_order_numbers() {
        assert_eq!(EquilibriumOrder::Second.as_usize(), 2);
        assert_eq!(EquilibriumOrder::Fourth.as_usize(), 4);
        assert!(EquilibriumOrder::Fourth > EquilibriumOrder::Third);
    }
}
