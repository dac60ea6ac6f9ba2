//! Macroscopic moment extraction.
//!
//! Recovers the macroscopic fields of a node by summing its populations over
//! a velocity range:
//!
//! ```text
//! ρ   = Σ f[i]
//! u_d = CS · Σ XI[i,d] f[i] / ρ            (+ dt·a_d/2 on flowing nodes)
//! θ   = Σ f[i] |XI[i] − u/CS|² / (D ρ)
//! ```
//!
//! Each kernel computes exactly one scalar and never touches `f`. Immersed
//! solid nodes return `None` so the caller's field keeps its previous value.
//! Every result goes through the validity guard.

use crate::analysis::ValidityPolicy;
use crate::error::{LbmError, Quantity};
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::source::BodyForce;
use crate::types::{NodeContext, VelocityRange};

/// Moment extractor for one velocity set and range.
#[derive(Clone, Debug)]
pub struct MomentExtractor<'a, P: ValidityPolicy> {
    set: &'a VelocitySet,
    range: VelocityRange,
    policy: P,
    thermal: bool,
}

impl<'a, P: ValidityPolicy> MomentExtractor<'a, P> {
    /// Extractor over the full velocity set.
    pub fn new(set: &'a VelocitySet, policy: P) -> Self {
        Self {
            set,
            range: set.full_range(),
            policy,
            thermal: false,
        }
    }

    /// Restrict the sums to `range`.
    pub fn with_range(mut self, range: VelocityRange) -> Result<Self, LbmError> {
        self.set.check_range(range)?;
        self.range = range;
        Ok(self)
    }

    /// Also recover temperature in [`extract`](Self::extract).
    pub fn with_temperature(mut self, thermal: bool) -> Self {
        self.thermal = thermal;
        self
    }

    /// The velocity set.
    pub fn velocity_set(&self) -> &'a VelocitySet {
        self.set
    }

    /// The velocity range summed over.
    pub fn range(&self) -> VelocityRange {
        self.range
    }

    /// Density `Σ f[i]`.
    pub fn density(&self, ctx: &NodeContext, f: &[f64]) -> Result<Option<f64>, LbmError> {
        self.set.check_slice("distribution", f.len())?;
        if ctx.class.is_solid() {
            return Ok(None);
        }
        let rho: f64 = self.range.indices().map(|i| f[i]).sum();
        self.policy
            .check(ctx.coords, Quantity::Density, rho, || {
                format!("sum of f over {}", self.range)
            })?;
        Ok(Some(rho))
    }

    /// Velocity component `d`: `CS · Σ XI[i,d] f[i] / rho`.
    pub fn velocity(
        &self,
        ctx: &NodeContext,
        f: &[f64],
        rho: f64,
        d: usize,
    ) -> Result<Option<f64>, LbmError> {
        self.check_component(f, d)?;
        if ctx.class.is_solid() {
            return Ok(None);
        }
        let u = self.first_moment(f, d) / rho;
        self.policy.check(ctx.coords, Quantity::Velocity(d), u, || {
            format!("rho={rho:e}, range {}", self.range)
        })?;
        Ok(Some(u))
    }

    /// Velocity component `d` with the half-step force correction.
    ///
    /// Adds `dt·a_d/2` on fluid and periodic nodes only; on every other
    /// non-solid node this equals [`velocity`](Self::velocity).
    pub fn velocity_forced(
        &self,
        ctx: &NodeContext,
        f: &[f64],
        rho: f64,
        d: usize,
        force: &BodyForce,
    ) -> Result<Option<f64>, LbmError> {
        self.check_component(f, d)?;
        if ctx.class.is_solid() {
            return Ok(None);
        }
        let mut u = self.first_moment(f, d) / rho;
        if ctx.class.is_flowing() {
            u += 0.5 * ctx.dt * force.acceleration[d];
        }
        self.policy.check(ctx.coords, Quantity::Velocity(d), u, || {
            format!(
                "rho={rho:e}, a[{d}]={:e}, dt={:e}",
                force.acceleration[d], ctx.dt
            )
        })?;
        Ok(Some(u))
    }

    /// Normalized temperature `Σ f |XI − u/CS|² / (D ρ)`.
    pub fn temperature(
        &self,
        ctx: &NodeContext,
        f: &[f64],
        rho: f64,
        u: &[f64],
    ) -> Result<Option<f64>, LbmError> {
        self.set.check_slice("distribution", f.len())?;
        let dim = self.set.dim();
        if u.len() < dim {
            return Err(LbmError::configuration(format!(
                "temperature needs {dim} velocity components, got {}",
                u.len()
            )));
        }
        if ctx.class.is_solid() {
            return Ok(None);
        }
        let inv_cs = 1.0 / self.set.cs();
        let mut energy = 0.0;
        for i in self.range.indices() {
            let xi = self.set.xi(i);
            let c2: f64 = (0..dim)
                .map(|d| {
                    let c = xi[d] - u[d] * inv_cs;
                    c * c
                })
                .sum();
            energy += f[i] * c2;
        }
        let theta = energy / (dim as f64 * rho);
        self.policy.check(ctx.coords, Quantity::Temperature, theta, || {
            format!("rho={rho:e}, u={:?}", &u[..dim])
        })?;
        Ok(Some(theta))
    }

    /// Fill `state` from `f`.
    ///
    /// With a force, velocities are half-step corrected. Temperature is only
    /// recomputed when the extractor was built `with_temperature(true)`.
    /// Leaves `state` untouched on immersed solid nodes.
    pub fn extract(
        &self,
        ctx: &NodeContext,
        f: &[f64],
        force: Option<&BodyForce>,
        state: &mut MacroscopicState,
    ) -> Result<(), LbmError> {
        let Some(rho) = self.density(ctx, f)? else {
            return Ok(());
        };

        let dim = self.set.dim();
        let mut u = [0.0; 3];
        for (d, slot) in u.iter_mut().enumerate().take(dim) {
            let value = match force {
                Some(force) => self.velocity_forced(ctx, f, rho, d, force)?,
                None => self.velocity(ctx, f, rho, d)?,
            };
            *slot = value.unwrap_or(0.0);
        }

        let temperature = if self.thermal {
            self.temperature(ctx, f, rho, &u[..dim])?
                .unwrap_or(state.temperature)
        } else {
            state.temperature
        };

        *state = MacroscopicState::new(rho, u, temperature);
        Ok(())
    }

    fn check_component(&self, f: &[f64], d: usize) -> Result<(), LbmError> {
        self.set.check_slice("distribution", f.len())?;
        if d >= self.set.dim() {
            return Err(LbmError::configuration(format!(
                "velocity component {d} on a {}D lattice",
                self.set.dim()
            )));
        }
        Ok(())
    }

    #[inline]
    fn first_moment(&self, f: &[f64], d: usize) -> f64 {
        let sum: f64 = self
            .range
            .indices()
            .map(|i| self.set.xi_component(i, d) * f[i])
            .sum();
        self.set.cs() * sum
    }
}
