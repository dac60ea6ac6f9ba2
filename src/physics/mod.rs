//! Configured node pipelines.
//!
//! Ties the kernels together into one update per node and checks at build
//! time that the lattice, collision operator and forcing scheme fit.
//!
//! # Example
//! ```
//! use lbm_kernels::collision::StandardCollision;
//! use lbm_kernels::lattice::VelocitySet;
//! use lbm_kernels::physics::PipelineBuilder;
//! use lbm_kernels::solver::MacroscopicState;
//! use lbm_kernels::source::{BodyForce, StandardForcing};
//! use lbm_kernels::types::NodeContext;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_lattice(VelocitySet::d2q9())
//!     .with_collision(StandardCollision::bgk(0.8))
//!     .with_forcing(StandardForcing::exact_difference())
//!     .build()?;
//!
//! let f = pipeline.velocity_set().weights().to_vec();
//! let mut state = MacroscopicState::default();
//! let mut f_stage = vec![0.0; 9];
//! pipeline.step(&NodeContext::fluid(), &f, &BodyForce::along(1, -1e-5), &mut state, &mut f_stage)?;
//! # Ok::<(), lbm_kernels::LbmError>(())
//! ```

pub mod builder;
pub mod pipeline;

pub use builder::PipelineBuilder;
pub use pipeline::NodePipeline;
