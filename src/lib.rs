//! # lbm-kernels
//!
//! Per-node kernels of the lattice Boltzmann collision model.
//!
//! This crate provides the numerical core a lattice Boltzmann driver calls
//! once per node and step:
//! - Discrete velocity sets (D2Q9, D3Q19, D3Q27)
//! - Hermite-expanded equilibria (second to fourth order)
//! - Moment extraction (density, velocity, temperature)
//! - Collision operators (isothermal BGK, thermal BGK, raw-moment MRT)
//! - Body-force schemes (exact difference, none)
//! - Carnahan-Starling equation of state and pseudopotential
//! - A validity guard that stops a run before invalid values are streamed
//!
//! Mesh topology, streaming, boundary conditions and I/O belong to the
//! driver. Kernels see node-local slices and a [`NodeClass`] tag.
//!
//! # Example
//!
//! ```
//! use lbm_kernels::{
//!     BodyForce, MacroscopicState, NodeContext, PipelineBuilder, StandardCollision,
//!     StandardForcing, VelocitySet,
//! };
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_lattice(VelocitySet::d3q19())
//!     .with_collision(StandardCollision::bgk(0.6))
//!     .with_forcing(StandardForcing::exact_difference())
//!     .build()?;
//!
//! let f = pipeline.velocity_set().weights().to_vec();
//! let mut state = MacroscopicState::default();
//! let mut f_stage = vec![0.0; f.len()];
//! pipeline.step(&NodeContext::fluid(), &f, &BodyForce::zero(), &mut state, &mut f_stage)?;
//! assert!((state.rho - 1.0).abs() < 1e-14);
//! # Ok::<(), lbm_kernels::LbmError>(())
//! ```

pub mod analysis;
pub mod collision;
pub mod equations;
pub mod error;
pub mod lattice;
pub mod physics;
pub mod solver;
pub mod source;
pub mod types;

// Re-export main types for convenience
pub use analysis::{FailFast, GuardMode, Unchecked, ValidityPolicy};
pub use collision::{Bgk, BgkThermal, CollisionOperator, Mrt, RelaxationRates, StandardCollision};
pub use equations::{CarnahanStarling, EosFields, EquilibriumOrder, equilibrium};
pub use error::{LbmError, Quantity};
pub use lattice::VelocitySet;
pub use physics::{NodePipeline, PipelineBuilder};
pub use solver::{MacroscopicState, MomentExtractor};
pub use source::{BodyForce, ExactDifference, ForcingScheme, NoForce, StandardForcing};
pub use types::{NodeClass, NodeContext, NodeCoords, VelocityIndex, VelocityRange};
