//! Per-node update pipeline.
//!
//! Runs the three kernels of one step in their required order:
//!
//! ```text
//! f ──MomentExtractor──▶ state ──ForcingScheme::stage──▶ StagedForcing ──collide──▶ fStage
//! ```
//!
//! Streaming and boundary conditions stay with the driver.

use std::sync::Arc;

use crate::analysis::{GuardMode, ValidityPolicy};
use crate::collision::{CollisionOperator, StandardCollision};
use crate::equations::EquilibriumOrder;
use crate::error::LbmError;
use crate::lattice::VelocitySet;
use crate::solver::{MacroscopicState, MomentExtractor, NodeFields, SweepSummary, sweep};
use crate::source::{BodyForce, ForcingScheme, StandardForcing};
use crate::types::{NodeClass, NodeContext, NodeCoords, VelocityRange};

/// Configured extract → force → collide pipeline.
///
/// Built by [`PipelineBuilder`](super::PipelineBuilder), which checks that
/// the pieces fit the lattice.
#[derive(Clone, Debug)]
pub struct NodePipeline<P: ValidityPolicy = GuardMode> {
    pub(crate) set: Arc<VelocitySet>,
    pub(crate) collision: StandardCollision,
    pub(crate) forcing: StandardForcing,
    pub(crate) policy: P,
    pub(crate) dt: f64,
    pub(crate) range: VelocityRange,
}

impl<P: ValidityPolicy> NodePipeline<P> {
    /// The lattice.
    pub fn velocity_set(&self) -> &VelocitySet {
        &self.set
    }

    /// The collision operator.
    pub fn collision(&self) -> &StandardCollision {
        &self.collision
    }

    /// The forcing scheme.
    pub fn forcing(&self) -> &StandardForcing {
        &self.forcing
    }

    /// The validity policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Default time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Velocity range every kernel runs over.
    pub fn range(&self) -> VelocityRange {
        self.range
    }

    /// Whether the pipeline recovers and uses the local temperature.
    pub fn is_thermal(&self) -> bool {
        let thermal_forcing = matches!(
            self.forcing,
            StandardForcing::ExactDifference(edm) if edm.order > EquilibriumOrder::Second
        );
        self.collision.is_thermal() || thermal_forcing
    }

    /// Context of a node at the pipeline's time step.
    pub fn context(&self, coords: NodeCoords, class: NodeClass) -> NodeContext {
        NodeContext::new(coords, class, self.dt)
    }

    /// Moment extractor matching this pipeline.
    ///
    /// Drivers use it directly for output, e.g. the half-step corrected
    /// velocity [`MomentExtractor::velocity_forced`].
    pub fn extractor(&self) -> Result<MomentExtractor<'_, &P>, LbmError> {
        Ok(MomentExtractor::new(&self.set, &self.policy)
            .with_range(self.range)?
            .with_temperature(self.is_thermal()))
    }

    /// Update one node.
    ///
    /// `state` receives the moments of `f` (left as is on immersed solid
    /// nodes) and `f_stage` the post-collision populations. The state
    /// holds the raw first moment; the force enters only through the
    /// forcing phase.
    pub fn step(
        &self,
        ctx: &NodeContext,
        f: &[f64],
        force: &BodyForce,
        state: &mut MacroscopicState,
        f_stage: &mut [f64],
    ) -> Result<(), LbmError> {
        self.extractor()?.extract(ctx, f, None, state)?;
        let staged = self.forcing.stage(
            ctx,
            &self.set,
            self.range,
            state,
            force,
            f_stage,
            &self.policy,
        )?;
        self.collision
            .collide(ctx, &self.set, self.range, state, f, staged, &self.policy)
    }

    /// Update every node of a field.
    ///
    /// `forces` holds one force per node, or a single force applied
    /// everywhere.
    pub fn sweep(
        &self,
        fields: NodeFields<'_>,
        forces: &[BodyForce],
    ) -> Result<SweepSummary, LbmError> {
        self.check_fields(&fields, forces)?;
        sweep(fields, |n, ctx, f, stage, state| {
            self.step(ctx, f, force_of(forces, n.get()), state, stage)
        })
    }

    /// Parallel version of [`sweep`](Self::sweep) using Rayon.
    #[cfg(feature = "parallel")]
    pub fn sweep_parallel(
        &self,
        fields: NodeFields<'_>,
        forces: &[BodyForce],
    ) -> Result<SweepSummary, LbmError> {
        self.check_fields(&fields, forces)?;
        crate::solver::sweep_parallel(fields, |n, ctx, f, stage, state| {
            self.step(ctx, f, force_of(forces, n.get()), state, stage)
        })
    }

    fn check_fields(&self, fields: &NodeFields<'_>, forces: &[BodyForce]) -> Result<(), LbmError> {
        if fields.q != self.set.q() {
            return Err(LbmError::configuration(format!(
                "field has {} populations per node, {} has {}",
                fields.q,
                self.set.name(),
                self.set.q()
            )));
        }
        if forces.len() != 1 && forces.len() != fields.n_nodes() {
            return Err(LbmError::configuration(format!(
                "{} forces given for {} nodes",
                forces.len(),
                fields.n_nodes()
            )));
        }
        Ok(())
    }
}

#[inline]
fn force_of(forces: &[BodyForce], n: usize) -> &BodyForce {
    if forces.len() == 1 { &forces[0] } else { &forces[n] }
}
