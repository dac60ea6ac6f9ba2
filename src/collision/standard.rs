//! Enum dispatch over the built-in collision operators.

use crate::analysis::ValidityPolicy;
use crate::error::LbmError;
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::source::StagedForcing;
use crate::types::{NodeContext, VelocityRange};

use super::bgk::Bgk;
use super::bgk_thermal::BgkThermal;
use super::mrt::Mrt;
use super::traits::CollisionOperator;

/// Collision operator selected at configuration time.
///
/// Avoids dynamic dispatch in the per-node loop.
#[derive(Clone, Debug)]
pub enum StandardCollision {
    /// Isothermal BGK
    Bgk(Bgk),
    /// Thermal BGK
    BgkThermal(BgkThermal),
    /// Raw-moment MRT
    Mrt(Mrt),
}

impl StandardCollision {
    /// Isothermal BGK with relaxation time `tau`.
    pub fn bgk(tau: f64) -> Self {
        Self::Bgk(Bgk::new(tau))
    }

    /// Thermal BGK with reference relaxation time `tau_ref`.
    pub fn bgk_thermal(tau_ref: f64) -> Self {
        Self::BgkThermal(BgkThermal::new(tau_ref))
    }
}

impl From<Bgk> for StandardCollision {
    fn from(op: Bgk) -> Self {
        Self::Bgk(op)
    }
}

impl From<BgkThermal> for StandardCollision {
    fn from(op: BgkThermal) -> Self {
        Self::BgkThermal(op)
    }
}

impl From<Mrt> for StandardCollision {
    fn from(op: Mrt) -> Self {
        Self::Mrt(op)
    }
}

impl CollisionOperator for StandardCollision {
    fn name(&self) -> &'static str {
        match self {
            Self::Bgk(op) => op.name(),
            Self::BgkThermal(op) => op.name(),
            Self::Mrt(op) => op.name(),
        }
    }

    fn is_thermal(&self) -> bool {
        match self {
            Self::Bgk(op) => op.is_thermal(),
            Self::BgkThermal(op) => op.is_thermal(),
            Self::Mrt(op) => op.is_thermal(),
        }
    }

    #[inline]
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
        match self {
            Self::Bgk(op) => op.collide(ctx, set, range, state, f, staged, policy),
            Self::BgkThermal(op) => op.collide(ctx, set, range, state, f, staged, policy),
            Self::Mrt(op) => op.collide(ctx, set, range, state, f, staged, policy),
        }
    }

    fn validate(&self, set: &VelocitySet) -> Result<(), LbmError> {
        match self {
            Self::Bgk(op) => op.validate(set),
            Self::BgkThermal(op) => op.validate(set),
            Self::Mrt(op) => op.validate(set),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch() {
        let set = VelocitySet::d3q27();
        let ops = [
            StandardCollision::bgk(0.8),
            StandardCollision::bgk_thermal(0.8),
            Mrt::from_tau(&set, 0.8, 1.0).unwrap().into(),
        ];
        let names: Vec<_> = ops.iter().map(|op| op.name()).collect();
        assert_eq!(names, ["bgk", "bgk-thermal", "mrt"]);
        assert_eq!(ops.iter().filter(|op| op.is_thermal()).count(), 1);
        assert!(ops.iter().all(|op| op.validate(&set).is_ok()));
    }
}
