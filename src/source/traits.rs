//! Body-force coupling: shared types and the forcing-scheme trait.
//!
//! Forcing and collision form an explicit two-phase pipeline. A
//! [`ForcingScheme`] overwrites the forcing contribution into the node's
//! staging slice and hands back a [`StagedForcing`] token; collision
//! operators consume that token and add their term on top:
//!
//! ```text
//! fStage ──ForcingScheme::stage──▶ StagedForcing ──collide──▶ fStage (ready to stream)
//! ```
//!
//! Because the token mutably borrows the staging slice, the borrow checker
//! rules out collision running first or twice on the same forcing.

use crate::analysis::ValidityPolicy;
use crate::error::LbmError;
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::types::{NodeContext, VelocityRange};

/// Per-node body force, given as an acceleration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyForce {
    /// Acceleration (a_x, a_y, a_z); the z component is ignored in 2D
    pub acceleration: [f64; 3],
}

impl BodyForce {
    /// Create a body force from an acceleration vector.
    #[inline(always)]
    pub fn new(acceleration: [f64; 3]) -> Self {
        Self { acceleration }
    }

    /// No force.
    #[inline(always)]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Gravity-like force along one axis.
    pub fn along(axis: usize, magnitude: f64) -> Self {
        let mut acceleration = [0.0; 3];
        acceleration[axis] = magnitude;
        Self { acceleration }
    }

    /// Force density `G = ρ a`.
    #[inline(always)]
    pub fn density(&self, rho: f64) -> [f64; 3] {
        [
            rho * self.acceleration[0],
            rho * self.acceleration[1],
            rho * self.acceleration[2],
        ]
    }

    /// Velocity shift `Δu = G / ρ` of the forced equilibrium.
    ///
    /// With `G = ρ a` this is the acceleration itself, independent of `ρ`
    /// and of the time step.
    #[inline(always)]
    pub fn velocity_shift(&self) -> [f64; 3] {
        self.acceleration
    }

    /// Whether every component is zero.
    pub fn is_zero(&self) -> bool {
        self.acceleration.iter().all(|a| *a == 0.0)
    }
}

/// Staging slice holding a forcing contribution, ready for collision.
///
/// Produced by a [`ForcingScheme`], or by [`StagedForcing::external`] when
/// the driver staged the contribution itself (moment-space forcing for MRT,
/// or a buffer it guarantees to be zero).
#[derive(Debug)]
pub struct StagedForcing<'a> {
    buf: &'a mut [f64],
    range: VelocityRange,
}

impl<'a> StagedForcing<'a> {
    pub(crate) fn new(buf: &'a mut [f64], range: VelocityRange) -> Self {
        Self { buf, range }
    }

    /// Wrap a slice the driver has already filled.
    pub fn external(buf: &'a mut [f64], range: VelocityRange) -> Result<Self, LbmError> {
        range.check_within(buf.len())?;
        Ok(Self { buf, range })
    }

    /// Velocity range the contribution covers.
    pub fn range(&self) -> VelocityRange {
        self.range
    }

    /// Read the staged values.
    pub fn as_slice(&self) -> &[f64] {
        self.buf
    }

    /// Release the staging slice for collision to write into.
    pub fn into_inner(self) -> &'a mut [f64] {
        self.buf
    }

    /// Check that collision is about to run over the range forcing covered.
    pub(crate) fn expect_range(&self, range: VelocityRange) -> Result<(), LbmError> {
        if self.range != range {
            return Err(LbmError::configuration(format!(
                "forcing staged {} but collision runs over {}",
                self.range, range
            )));
        }
        Ok(())
    }
}

/// Trait for body-force coupling schemes.
///
/// Implementations overwrite (never accumulate) the forcing contribution
/// into `f_stage` over `range` and leave immersed solid nodes untouched.
pub trait ForcingScheme: Send + Sync {
    /// Name of this scheme for debugging and logging.
    fn name(&self) -> &'static str;

    /// Write the forcing contribution into `f_stage`.
    #[allow(clippy::too_many_arguments)]
    fn stage<'a, P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        set: &VelocitySet,
        range: VelocityRange,
        state: &MacroscopicState,
        force: &BodyForce,
        f_stage: &'a mut [f64],
        policy: &P,
    ) -> Result<StagedForcing<'a>, LbmError>;
}
