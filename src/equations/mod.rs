//! Closed-form physics of the collision model.
//!
//! - [`equilibrium`]: Hermite-truncated equilibrium distribution
//! - [`equation_of_state`]: Carnahan-Starling pressure and pseudopotential

mod equation_of_state;
mod equilibrium;

pub use equation_of_state::{
    CRITICAL_DENSITY_RATIO, CRITICAL_TEMPERATURE_RATIO, CarnahanStarling, EosFields,
};
pub use equilibrium::{EquilibriumOrder, equilibrium, equilibrium_all, equilibrium_shifted};
