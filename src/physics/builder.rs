//! Pipeline builder.
//!
//! Collects the lattice, collision operator, forcing scheme and validity
//! policy, and checks on [`build`](PipelineBuilder::build) that they fit
//! together. Wiring mistakes surface here as configuration errors instead
//! of inside the node loop.

use std::sync::Arc;

use crate::analysis::{GuardMode, ValidityPolicy};
use crate::collision::{CollisionOperator, StandardCollision};
use crate::equations::EquilibriumOrder;
use crate::error::LbmError;
use crate::lattice::VelocitySet;
use crate::source::{ForcingScheme, StandardForcing};
use crate::types::VelocityRange;

use super::pipeline::NodePipeline;

/// Builder for [`NodePipeline`].
///
/// # Example
///
/// ```
/// use lbm_kernels::analysis::FailFast;
/// use lbm_kernels::collision::StandardCollision;
/// use lbm_kernels::lattice::VelocitySet;
/// use lbm_kernels::physics::PipelineBuilder;
/// use lbm_kernels::source::StandardForcing;
///
/// let pipeline = PipelineBuilder::new()
///     .with_lattice(VelocitySet::d3q19())
///     .with_collision(StandardCollision::bgk(0.8))
///     .with_forcing(StandardForcing::exact_difference())
///     .with_policy(FailFast)
///     .build()
///     .unwrap();
/// assert_eq!(pipeline.velocity_set().q(), 19);
/// ```
#[derive(Clone, Debug)]
pub struct PipelineBuilder<P: ValidityPolicy = GuardMode> {
    set: Option<Arc<VelocitySet>>,
    collision: Option<StandardCollision>,
    forcing: StandardForcing,
    policy: P,
    dt: f64,
    range: Option<VelocityRange>,
}

impl Default for PipelineBuilder<GuardMode> {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder<GuardMode> {
    /// Start a builder: no forcing, fail-fast guard, `dt = 1`.
    pub fn new() -> Self {
        Self {
            set: None,
            collision: None,
            forcing: StandardForcing::default(),
            policy: GuardMode::default(),
            dt: 1.0,
            range: None,
        }
    }
}

impl<P: ValidityPolicy> PipelineBuilder<P> {
    /// Set the lattice.
    pub fn with_lattice(mut self, set: impl Into<Arc<VelocitySet>>) -> Self {
        self.set = Some(set.into());
        self
    }

    /// Set the collision operator.
    pub fn with_collision(mut self, collision: impl Into<StandardCollision>) -> Self {
        self.collision = Some(collision.into());
        self
    }

    /// Set the forcing scheme.
    pub fn with_forcing(mut self, forcing: impl Into<StandardForcing>) -> Self {
        self.forcing = forcing.into();
        self
    }

    /// Set the validity policy.
    pub fn with_policy<Q: ValidityPolicy>(self, policy: Q) -> PipelineBuilder<Q> {
        PipelineBuilder {
            set: self.set,
            collision: self.collision,
            forcing: self.forcing,
            policy,
            dt: self.dt,
            range: self.range,
        }
    }

    /// Set the default time step.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Restrict every kernel to a sub-range of velocities.
    pub fn with_range(mut self, range: VelocityRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Check the configuration and build the pipeline.
    pub fn build(self) -> Result<NodePipeline<P>, LbmError> {
        let set = self
            .set
            .ok_or_else(|| LbmError::configuration("pipeline needs a lattice"))?;
        let collision = self
            .collision
            .ok_or_else(|| LbmError::configuration("pipeline needs a collision operator"))?;

        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(LbmError::configuration(format!(
                "time step must be positive, got {}",
                self.dt
            )));
        }

        let range = self.range.unwrap_or_else(|| set.full_range());
        set.check_range(range)?;
        if range.is_empty() {
            return Err(LbmError::configuration("velocity range is empty"));
        }
        if matches!(collision, StandardCollision::Mrt(_)) && range != set.full_range() {
            return Err(LbmError::configuration(format!(
                "MRT needs the full velocity range, got {range}"
            )));
        }

        collision.validate(&set)?;
        if let StandardForcing::ExactDifference(edm) = self.forcing
            && edm.order > EquilibriumOrder::Second
        {
            set.check_thermal()?;
        }

        log::debug!(
            "built pipeline: lattice={}, collision={}, forcing={}, range={}, dt={}, guard={}",
            set.name(),
            collision.name(),
            self.forcing.name(),
            range,
            self.dt,
            if self.policy.is_enabled() { "on" } else { "off" }
        );

        Ok(NodePipeline {
            set,
            collision,
            forcing: self.forcing,
            policy: self.policy,
            dt: self.dt,
            range,
        })
    }
}
