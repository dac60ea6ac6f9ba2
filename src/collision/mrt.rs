//! Moment-space (multiple-relaxation-time) collision.
//!
//! Each raw moment `m_abc = Σ f e_x^a e_y^b e_z^c` relaxes with its own rate
//! towards the product-form equilibrium moment
//!
//! ```text
//! meq_abc = ρ M_a(u) M_b(v) M_c(w),     M_0 = 1,  M_1 = u,  M_2 = u² + CS²
//! ```
//!
//! ```text
//! mStage = m − S∘(m − meq) + mStage_in     (fluid, periodic)
//! mStage = m − S∘(m − meq)                 (other non-solid)
//! ```
//!
//! [`Mrt::collide_moments`] works on moments the caller already transformed.
//! The [`CollisionOperator`] implementation wraps it with the raw-moment
//! transform so that it can stand in for a BGK operator in a pipeline.
//! Moments are differences of signed populations, so only finiteness is
//! checked.

use crate::analysis::ValidityPolicy;
use crate::error::{LbmError, Quantity};
use crate::lattice::VelocitySet;
use crate::solver::MacroscopicState;
use crate::source::StagedForcing;
use crate::types::{NodeContext, VelocityRange};

use super::transform::{MAX_MOMENTS, MomentTransform, exponents, moment_order};
use super::traits::{CollisionOperator, check_inputs, relaxation_rate};

// =============================================================================
// Relaxation rates
// =============================================================================

/// Per-moment relaxation rates `S`, indexed like the raw moments.
#[derive(Clone, Debug, PartialEq)]
pub struct RelaxationRates {
    rates: Vec<f64>,
}

impl RelaxationRates {
    /// Explicit rates, one per moment.
    pub fn new(rates: Vec<f64>) -> Self {
        Self { rates }
    }

    /// Same rate for all `n` moments.
    pub fn uniform(n: usize, rate: f64) -> Self {
        Self {
            rates: vec![rate; n],
        }
    }

    /// Rates for a `dim`-dimensional lattice with BGK-equivalent shear.
    ///
    /// Conserved moments (order 0 and 1) get rate 0, second-order moments
    /// `dt / (tau + dt/2)`, and every higher moment relaxes fully to
    /// equilibrium.
    pub fn from_tau(dim: usize, tau: f64, dt: f64) -> Self {
        let n = 3usize.pow(dim as u32);
        let shear = relaxation_rate(tau, dt);
        let rates = (0..n)
            .map(|k| match moment_order(k, dim) {
                0 | 1 => 0.0,
                2 => shear,
                _ => 1.0,
            })
            .collect();
        Self { rates }
    }

    /// Override the rate of moment `k`.
    pub fn with_rate(mut self, k: usize, rate: f64) -> Result<Self, LbmError> {
        let n = self.rates.len();
        let slot = self.rates.get_mut(k).ok_or_else(|| {
            LbmError::configuration(format!("moment {k} is out of range for {n} rates"))
        })?;
        *slot = rate;
        Ok(self)
    }

    /// Rate of moment `k`.
    #[inline]
    pub fn get(&self, k: usize) -> f64 {
        self.rates[k]
    }

    /// Number of rates.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether there are no rates.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// All rates.
    pub fn as_slice(&self) -> &[f64] {
        &self.rates
    }
}

// =============================================================================
// Equilibrium moments
// =============================================================================

#[inline(always)]
fn hermite_factor(order: usize, u: f64, cs2: f64) -> f64 {
    match order {
        0 => 1.0,
        1 => u,
        _ => u * u + cs2,
    }
}

/// Equilibrium of raw moment `k`.
#[inline]
pub fn equilibrium_moment(k: usize, dim: usize, rho: f64, u: &[f64; 3], cs2: f64) -> f64 {
    let exp = exponents(k, dim);
    let mut m = rho;
    for d in 0..dim {
        m *= hermite_factor(exp[d], u[d], cs2);
    }
    m
}

/// Fill `out` with every equilibrium moment of `state` on `set`.
pub fn equilibrium_moments(set: &VelocitySet, state: &MacroscopicState, out: &mut [f64]) {
    let dim = set.dim();
    let cs2 = set.cs2();
    for (k, slot) in out.iter_mut().enumerate() {
        *slot = equilibrium_moment(k, dim, state.rho, &state.u, cs2);
    }
}

// =============================================================================
// Operator
// =============================================================================

/// Raw-moment MRT operator.
#[derive(Clone, Debug)]
pub struct Mrt {
    rates: RelaxationRates,
    transform: MomentTransform,
}

impl Mrt {
    /// Create an operator for `set` with the given rates.
    pub fn new(set: &VelocitySet, rates: RelaxationRates) -> Result<Self, LbmError> {
        let transform = MomentTransform::new(set)?;
        if rates.len() != transform.len() {
            return Err(LbmError::configuration(format!(
                "{} has {} moments but {} relaxation rates were given",
                set.name(),
                transform.len(),
                rates.len()
            )));
        }
        Ok(Self { rates, transform })
    }

    /// BGK-equivalent operator for `set`, see [`RelaxationRates::from_tau`].
    pub fn from_tau(set: &VelocitySet, tau: f64, dt: f64) -> Result<Self, LbmError> {
        Self::new(set, RelaxationRates::from_tau(set.dim(), tau, dt))
    }

    /// The relaxation rates.
    pub fn rates(&self) -> &RelaxationRates {
        &self.rates
    }

    /// The raw-moment transform.
    pub fn transform(&self) -> &MomentTransform {
        &self.transform
    }

    /// Relax already-transformed moments.
    ///
    /// `m` holds the pre-collision moments; the staged slice holds the
    /// moment-space forcing on entry and the post-collision moments on exit.
    pub fn collide_moments<P: ValidityPolicy>(
        &self,
        ctx: &NodeContext,
        set: &VelocitySet,
        state: &MacroscopicState,
        m: &[f64],
        staged: StagedForcing<'_>,
        policy: &P,
    ) -> Result<(), LbmError> {
        let n = self.rates.len();
        check_inputs(set, VelocityRange::full(n), m, &staged)?;
        if ctx.class.is_solid() {
            return Ok(());
        }

        let m_stage = staged.into_inner();
        let dim = set.dim();
        let cs2 = set.cs2();
        let flowing = ctx.class.is_flowing();

        for k in 0..n {
            let meq = equilibrium_moment(k, dim, state.rho, &state.u, cs2);
            let mut value = m[k] - self.rates.get(k) * (m[k] - meq);
            if flowing {
                value += m_stage[k];
            }
            policy.check(ctx.coords, Quantity::Moment(k), value, || {
                format!(
                    "m={:e}, meq={meq:e}, staged={:e}, S={}",
                    m[k],
                    m_stage[k],
                    self.rates.get(k)
                )
            })?;
            m_stage[k] = value;
        }
        Ok(())
    }
}

impl CollisionOperator for Mrt {
    fn name(&self) -> &'static str {
        "mrt"
    }

    /// Population-space collision through the raw-moment transform.
    ///
    /// The staged population-space forcing is transformed along with `f`,
    /// and the result is transformed back. Only the full range is accepted.
    /// The staging slice is written only when every moment passed the guard.
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
        if range != set.full_range() {
            return Err(LbmError::configuration(format!(
                "MRT collides all velocities at once, got {range}"
            )));
        }
        if ctx.class.is_solid() {
            return Ok(());
        }

        let n = self.transform.len();
        let mut m = [0.0; MAX_MOMENTS];
        self.transform.forward(f, &mut m[..n])?;

        let f_stage = staged.into_inner();
        let mut m_stage = [0.0; MAX_MOMENTS];
        self.transform.forward(f_stage, &mut m_stage[..n])?;
        let moments = StagedForcing::new(&mut m_stage[..n], range);
        self.collide_moments(ctx, set, state, &m[..n], moments, policy)?;
        self.transform.inverse(&m_stage[..n], f_stage)
    }

    fn validate(&self, set: &VelocitySet) -> Result<(), LbmError> {
        if set.q() != self.transform.len() || set.dim() != self.transform.dim() {
            return Err(LbmError::configuration(format!(
                "MRT was built for {} moments in {}D, lattice is {}",
                self.transform.len(),
                self.transform.dim(),
                set.name()
            )));
        }
        if let Some(s) = self.rates.as_slice().iter().find(|s| !s.is_finite()) {
            return Err(LbmError::configuration(format!(
                "MRT relaxation rate must be finite, got {s}"
            )));
        }
        Ok(())
    }
}
