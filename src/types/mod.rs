//! Strongly-typed domain types for safer kernel signatures.
//!
//! - **Index newtypes** keep velocity indices and node indices apart
//! - **`VelocityRange`** names the `(first, last)` slice of a stencil a call covers
//! - **`NodeClass`** is the per-node tag matched once per kernel call
//!
//! # Example
//!
//! ```
//! use lbm_kernels::types::{NodeClass, NodeContext, NodeCoords, VelocityRange};
//!
//! let ctx = NodeContext::new(NodeCoords::planar(4, 2), NodeClass::Fluid, 1.0);
//! assert!(ctx.class.is_flowing());
//!
//! let half = VelocityRange::new(0, 5);
//! assert_eq!(half.len(), 5);
//! ```

mod indices;
mod node;

pub use indices::{NodeIndex, VelocityIndex, VelocityRange};
pub use node::{NodeClass, NodeContext, NodeCoords};
