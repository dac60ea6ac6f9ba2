//! Isothermal BGK collision.
//!
//! Single relaxation time towards the second-order equilibrium at `θ = 1`:
//!
//! ```text
//! rate   = dt / (tau + dt/2)
//! fStage = feq + (1 − rate)(f − feq) + tau · rate · fStage_in     (fluid, periodic)
//! fStage = feq + (1 − rate)(f − feq)                              (other non-solid)
//! ```
//!
//! `fStage_in` is the contribution staged by the forcing phase.

use crate::analysis::ValidityPolicy;
use crate::equations::{EquilibriumOrder, equilibrium};
use crate::error::{LbmError, Quantity};
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::source::StagedForcing;
use crate::types::{NodeContext, VelocityRange};

use super::traits::{CollisionOperator, check_inputs, relaxation_rate};

/// Isothermal BGK operator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bgk {
    /// Relaxation time
    pub tau: f64,
}

impl Bgk {
    /// Create an operator with relaxation time `tau`.
    pub fn new(tau: f64) -> Self {
        Self { tau }
    }

    /// Operator giving kinematic viscosity `nu` at time step `dt`.
    ///
    /// `nu = CS² · tau`, so `tau = nu / CS²`.
    pub fn from_viscosity(nu: f64, cs: f64) -> Self {
        Self { tau: nu / (cs * cs) }
    }

    /// Relaxation rate for time step `dt`.
    pub fn rate(&self, dt: f64) -> f64 {
        relaxation_rate(self.tau, dt)
    }
}

impl CollisionOperator for Bgk {
    fn name(&self) -> &'static str {
        "bgk"
    }

    fn collide<P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        set: &VelocitySet,
        range: VelocityRange,
        state: &MacroscopicState,
        f: &[f64],
        staged: StagedForcing<'_>,
        policy: &P,
    ) -> Result<(), LbmError> {
        check_inputs(set, range, f, &staged)?;
        if ctx.class.is_solid() {
            return Ok(());
        }

        let f_stage = staged.into_inner();
        let rate = self.rate(ctx.dt);
        let flowing = ctx.class.is_flowing();
        let rho = state.rho;
        let u = state.velocity(set.dim());

        for i in range.indices() {
            let feq = equilibrium(set, i, rho, u, 1.0, EquilibriumOrder::Second);
            let mut value = feq + (1.0 - rate) * (f[i] - feq);
            if flowing {
                value += self.tau * rate * f_stage[i];
            }
            policy.check(ctx.coords, Quantity::Population(i.get()), value, || {
                format!(
                    "f={:e}, feq={feq:e}, staged={:e}, rho={rho:e}, u={u:?}, tau={}",
                    f[i], f_stage[i], self.tau
                )
            })?;
            f_stage[i] = value;
        }
        Ok(())
    }

    fn validate(&self, _set: &VelocitySet) -> Result<(), LbmError> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(LbmError::configuration(format!(
                "BGK relaxation time must be positive, got {}",
                self.tau
            )));
        }
        Ok(())
    }
}
