//! Per-node solver kernels.
//!
//! # Submodules
//!
//! - [`state`]: macroscopic state of one node
//! - [`moments`]: density, velocity and temperature from populations
//! - [`field`]: serial and parallel sweeps over node-major buffers

pub mod field;
pub mod moments;
pub mod state;

pub use field::{NodeFields, SweepSummary, sweep};
#[cfg(feature = "parallel")]
pub use field::sweep_parallel;
pub use moments::MomentExtractor;
pub use state::MacroscopicState;
