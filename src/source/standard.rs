//! Enum dispatch over the built-in forcing schemes.

use crate::analysis::ValidityPolicy;
use crate::error::LbmError;
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::types::{NodeContext, VelocityRange};

use super::exact_difference::ExactDifference;
use super::no_force::NoForce;
use super::traits::{BodyForce, ForcingScheme, StagedForcing};

/// Forcing scheme selected at configuration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardForcing {
    /// No body force.
    None(NoForce),
    /// Exact-difference method.
    ExactDifference(ExactDifference),
}

impl Default for StandardForcing {
    fn default() -> Self {
        Self::None(NoForce)
    }
}

impl StandardForcing {
    /// No body force.
    pub fn none() -> Self {
        Self::None(NoForce)
    }

    /// Isothermal exact-difference forcing.
    pub fn exact_difference() -> Self {
        Self::ExactDifference(ExactDifference::isothermal())
    }
}

impl From<NoForce> for StandardForcing {
    fn from(scheme: NoForce) -> Self {
        Self::None(scheme)
    }
}

impl From<ExactDifference> for StandardForcing {
    fn from(scheme: ExactDifference) -> Self {
        Self::ExactDifference(scheme)
    }
}

impl ForcingScheme for StandardForcing {
    fn name(&self) -> &'static str {
        match self {
            Self::None(s) => s.name(),
            Self::ExactDifference(s) => s.name(),
        }
    }

    #[inline]
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
        match self {
            Self::None(s) => s.stage(ctx, set, range, state, force, f_stage, policy),
            Self::ExactDifference(s) => s.stage(ctx, set, range, state, force, f_stage, policy),
        }
    }
}
