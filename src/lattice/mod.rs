//! Lattice velocity models.
//!
//! The velocity set is the only lattice geometry the kernels know about:
//! vectors, weights, sound speed and dimensionality. Neighbour topology and
//! streaming belong to the driver.

pub mod velocity_set;

pub use velocity_set::{CS_STANDARD, VelocitySet};
