//! Exact-difference body forcing.
//!
//! The forcing contribution is the change of the equilibrium when the
//! velocity is shifted by the specific body force:
//!
//! ```text
//! ΔF_i = feq_i(ρ, u + Δu) − feq_i(ρ, u),     Δu = G / ρ
//! ```
//!
//! The time step enters once, through the `tau · rate` factor collision
//! applies to the staged contribution.
//!
//! In 3D this is evaluated literally on fluid, periodic and wall nodes, at
//! the configured expansion order. In 2D it is applied on fluid and periodic
//! nodes through the closed form of the second-order difference:
//!
//! ```text
//! ΔF_i = w ρ [ ξ·Δû + ½ (ξ·Δû)(ξ·(2û + Δû)) − ½ Δû·(2û + Δû) ]
//! ```
//!
//! Remaining non-solid nodes get a zero contribution; immersed solid nodes
//! are left alone.

use crate::analysis::ValidityPolicy;
use crate::equations::{EquilibriumOrder, equilibrium, equilibrium_shifted};
use crate::error::{LbmError, Quantity};
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::types::{NodeClass, NodeContext, VelocityIndex, VelocityRange};

use super::traits::{BodyForce, ForcingScheme, StagedForcing};

/// Exact-difference forcing scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExactDifference {
    /// Expansion order of the 3D difference of equilibria
    pub order: EquilibriumOrder,
}

impl Default for ExactDifference {
    fn default() -> Self {
        Self::isothermal()
    }
}

impl ExactDifference {
    /// Second-order, isothermal.
    pub fn isothermal() -> Self {
        Self {
            order: EquilibriumOrder::Second,
        }
    }

    /// Fourth-order difference at the local temperature (D3Q27 only).
    pub fn thermal() -> Self {
        Self {
            order: EquilibriumOrder::Fourth,
        }
    }

    /// Whether this class receives the exact-difference contribution.
    fn is_forced(dim: usize, class: NodeClass) -> bool {
        match dim {
            3 => class.is_flowing() || class == NodeClass::Wall,
            _ => class.is_flowing(),
        }
    }

    /// Closed-form second-order contribution for one 2D velocity.
    #[inline]
    fn closed_form_2d(
        set: &VelocitySet,
        i: VelocityIndex,
        rho: f64,
        u: &[f64],
        du: &[f64],
    ) -> f64 {
        let inv_cs = 1.0 / set.cs();
        let xi = set.xi(i);

        let mut xi_du = 0.0;
        let mut xi_sum = 0.0;
        let mut du_sum = 0.0;
        for d in 0..2 {
            let uh = u[d] * inv_cs;
            let duh = du[d] * inv_cs;
            xi_du += xi[d] * duh;
            xi_sum += xi[d] * (2.0 * uh + duh);
            du_sum += duh * (2.0 * uh + duh);
        }

        set.weight(i) * rho * (xi_du + 0.5 * xi_du * xi_sum - 0.5 * du_sum)
    }
}

impl ForcingScheme for ExactDifference {
    fn name(&self) -> &'static str {
        "exact-difference"
    }

    fn stage<'a, P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        set: &VelocitySet,
        range: VelocityRange,
        state: &MacroscopicState,
        force: &BodyForce,
        f_stage: &'a mut [f64],
        policy: &P,
    ) -> Result<StagedForcing<'a>, LbmError> {
        set.check_range(range)?;
        set.check_slice("staging buffer", f_stage.len())?;

        if ctx.class.is_solid() {
            return Ok(StagedForcing::new(f_stage, range));
        }

        if !Self::is_forced(set.dim(), ctx.class) {
            for i in range.indices() {
                f_stage[i] = 0.0;
            }
            return Ok(StagedForcing::new(f_stage, range));
        }

        let dim = set.dim();
        let rho = state.rho;
        let u = state.velocity(dim);
        let du_full = force.velocity_shift();
        let du = &du_full[..dim];
        let theta = if self.order == EquilibriumOrder::Second {
            1.0
        } else {
            state.temperature
        };

        for i in range.indices() {
            let value = if dim == 2 {
                Self::closed_form_2d(set, i, rho, u, du)
            } else {
                equilibrium_shifted(set, i, rho, u, du, theta, self.order)
                    - equilibrium(set, i, rho, u, theta, self.order)
            };
            policy.check(ctx.coords, Quantity::BodyForce(i.get()), value, || {
                format!("rho={rho:e}, u={u:?}, du={du:?}")
            })?;
            f_stage[i] = value;
        }

        Ok(StagedForcing::new(f_stage, range))
    }
}
