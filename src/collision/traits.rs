//! Collision operator trait.

use crate::analysis::ValidityPolicy;
use crate::error::LbmError;
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::source::StagedForcing;
use crate::types::{NodeContext, VelocityRange};

/// BGK relaxation rate `dt / (tau + dt/2)`.
#[inline(always)]
pub fn relaxation_rate(tau: f64, dt: f64) -> f64 {
    dt / (tau + 0.5 * dt)
}

/// Trait for collision operators.
///
/// The operator reads the pre-collision populations `f` and the node's
/// macroscopic state, and writes the post-collision populations into the
/// staging slice it receives through the forcing token. Flowing nodes fold
/// the staged forcing contribution in; immersed solid nodes are left
/// untouched.
pub trait CollisionOperator: Send + Sync {
    /// Name of this operator for debugging and logging.
    fn name(&self) -> &'static str;

    /// Whether the operator needs the local temperature.
    fn is_thermal(&self) -> bool {
        false
    }

    /// Collide one node over `range`.
    #[allow(clippy::too_many_arguments)]
    fn collide<P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        set: &VelocitySet,
        range: VelocityRange,
        state: &MacroscopicState,
        f: &[f64],
        staged: StagedForcing<'_>,
        policy: &P,
    ) -> Result<(), LbmError>;

    /// Check the operator against the velocity set it will run on.
    fn validate(&self, set: &VelocitySet) -> Result<(), LbmError> {
        let _ = set;
        Ok(())
    }
}

/// Shared preconditions of every collision call.
pub(crate) fn check_inputs(
    set: &VelocitySet,
    range: VelocityRange,
    f: &[f64],
    staged: &StagedForcing<'_>,
) -> Result<(), LbmError> {
    set.check_range(range)?;
    set.check_slice("distribution", f.len())?;
    set.check_slice("staging buffer", staged.as_slice().len())?;
    staged.expect_range(range)
}
