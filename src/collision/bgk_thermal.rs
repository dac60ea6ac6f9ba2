//! Thermal BGK collision.
//!
//! The relaxation time follows the local state, and the equilibrium is the
//! fourth-order expansion at the local temperature:
//!
//! ```text
//! tau    = tauRef / (ρ √θ)
//! rate   = dt / (tau + dt/2)
//! fStage = f + rate (feq − f) + tau · rate · fStage_in     (fluid, periodic)
//! fStage = f + rate (feq − f)                              (other non-solid)
//! ```

use crate::analysis::ValidityPolicy;
use crate::equations::{EquilibriumOrder, equilibrium};
use crate::error::{LbmError, Quantity};
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::source::StagedForcing;
use crate::types::{NodeContext, VelocityRange};

use super::traits::{CollisionOperator, check_inputs, relaxation_rate};

/// Thermal BGK operator with a state-dependent relaxation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BgkThermal {
    /// Reference relaxation time at ρ = 1, θ = 1
    pub tau_ref: f64,
}

impl BgkThermal {
    /// Create an operator with reference relaxation time `tau_ref`.
    pub fn new(tau_ref: f64) -> Self {
        Self { tau_ref }
    }

    /// Local relaxation time `tauRef / (ρ √θ)`.
    #[inline]
    pub fn local_tau(&self, rho: f64, temperature: f64) -> f64 {
        self.tau_ref / (rho * temperature.sqrt())
    }
}

impl CollisionOperator for BgkThermal {
    fn name(&self) -> &'static str {
        "bgk-thermal"
    }

    fn is_thermal(&self) -> bool {
        true
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
        let rho = state.rho;
        let theta = state.temperature;
        let u = state.velocity(set.dim());
        let tau = self.local_tau(rho, theta);
        let rate = relaxation_rate(tau, ctx.dt);
        let flowing = ctx.class.is_flowing();

        for i in range.indices() {
            let feq = equilibrium(set, i, rho, u, theta, EquilibriumOrder::Fourth);
            let mut value = f[i] + rate * (feq - f[i]);
            if flowing {
                value += tau * rate * f_stage[i];
            }
            policy.check(ctx.coords, Quantity::Population(i.get()), value, || {
                format!(
                    "f={:e}, feq={feq:e}, staged={:e}, rho={rho:e}, u={u:?}, theta={theta}, tau={tau}",
                    f[i], f_stage[i]
                )
            })?;
            f_stage[i] = value;
        }
        Ok(())
    }

    fn validate(&self, set: &VelocitySet) -> Result<(), LbmError> {
        if !(self.tau_ref.is_finite() && self.tau_ref > 0.0) {
            return Err(LbmError::configuration(format!(
                "thermal BGK reference relaxation time must be positive, got {}",
                self.tau_ref
            )));
        }
        set.check_thermal()
    }
}
