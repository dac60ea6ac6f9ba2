//! Null forcing.
//!
//! Zeroes the staging slice on fluid and periodic nodes and leaves every
//! other node untouched. Non-flowing nodes therefore keep whatever the
//! driver left in the staging buffer; the driver must zero it once at
//! start-up for the collision of those nodes to see a clean slate.

use crate::analysis::ValidityPolicy;
use crate::error::LbmError;
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::types::{NodeContext, VelocityRange};

use super::traits::{BodyForce, ForcingScheme, StagedForcing};

/// Forcing scheme that applies no force.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoForce;

impl ForcingScheme for NoForce {
    fn name(&self) -> &'static str {
        "none"
    }

    fn stage<'a, P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        set: &VelocitySet,
        range: VelocityRange,
        _state: &MacroscopicState,
        _force: &BodyForce,
        f_stage: &'a mut [f64],
        _policy: &P,
    ) -> Result<StagedForcing<'a>, LbmError> {
        set.check_range(range)?;
        set.check_slice("staging buffer", f_stage.len())?;

        if ctx.class.is_flowing() {
            for i in range.indices() {
                f_stage[i] = 0.0;
            }
        }
        Ok(StagedForcing::new(f_stage, range))
    }
}
