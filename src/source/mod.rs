//! Body-force coupling schemes.
//!
//! A forcing scheme writes a per-node forcing contribution into the staging
//! buffer before collision adds its own term:
//! - Exact difference: ΔF = feq(ρ, u + Δu) − feq(ρ, u)
//! - None: zero on flowing nodes, other nodes left as they are
//!
//! # Submodules
//!
//! - [`traits`]: `BodyForce`, `StagedForcing` and the `ForcingScheme` trait
//! - [`exact_difference`]: exact-difference method
//! - [`no_force`]: null forcing
//! - [`standard`]: enum dispatch for configuration-time selection

pub mod exact_difference;
pub mod no_force;
pub mod standard;
pub mod traits;

pub use exact_difference::ExactDifference;
pub use no_force::NoForce;
pub use standard::StandardForcing;
pub use traits::{BodyForce, ForcingScheme, StagedForcing};
