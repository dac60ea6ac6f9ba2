//! Collision operators.
//!
//! Every operator consumes the [`StagedForcing`](crate::source::StagedForcing)
//! produced by the forcing phase and writes post-collision values into the
//! same staging slice, so forcing and collision compose without a second
//! pass over the field.
//!
//! # Operators
//!
//! - [`Bgk`]: isothermal single relaxation time
//! - [`BgkThermal`]: single relaxation time with `tau = tauRef / (ρ √θ)`
//! - [`Mrt`]: raw-moment multiple relaxation time
//! - [`StandardCollision`]: enum for zero-cost dispatch
//!
//! [`transform`] provides the raw-moment transform MRT works in.

pub mod bgk;
pub mod bgk_thermal;
pub mod mrt;
pub mod standard;
pub mod traits;
pub mod transform;

pub use bgk::Bgk;
pub use bgk_thermal::BgkThermal;
pub use mrt::{Mrt, RelaxationRates, equilibrium_moment, equilibrium_moments};
pub use standard::StandardCollision;
pub use traits::{CollisionOperator, relaxation_rate};
pub use transform::{MomentTransform, exponents, moment_order};
