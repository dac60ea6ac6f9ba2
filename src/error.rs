//! Error types for lattice Boltzmann kernels.

use std::fmt;

use thiserror::Error;

use crate::types::NodeCoords;

/// Physical quantity a kernel produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Density,
    /// Velocity component `d`.
    Velocity(usize),
    Temperature,
    Pressure,
    Psi,
    /// Post-collision population `i`.
    Population(usize),
    /// Forcing contribution for velocity `i`.
    BodyForce(usize),
    /// Post-collision raw moment `k`.
    Moment(usize),
}

impl Quantity {
    /// Whether the quantity must stay strictly positive.
    ///
    /// Body-force and moment outputs are differences and may be negative.
    pub const fn requires_positive(self) -> bool {
        matches!(
            self,
            Self::Density | Self::Temperature | Self::Population(_)
        )
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Density => write!(f, "density"),
            Self::Velocity(d) => write!(f, "velocity[{}]", d),
            Self::Temperature => write!(f, "temperature"),
            Self::Pressure => write!(f, "pressure"),
            Self::Psi => write!(f, "psi"),
            Self::Population(i) => write!(f, "population[{}]", i),
            Self::BodyForce(i) => write!(f, "body force[{}]", i),
            Self::Moment(k) => write!(f, "moment[{}]", k),
        }
    }
}

/// Errors raised by the kernels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LbmError {
    /// A physical quantity became NaN, infinite, or violated its sign.
    ///
    /// Fatal: the driver must abort before the value is streamed to
    /// neighbouring nodes.
    #[error("Numerical divergence at node {node}: {quantity} = {value:e} ({inputs})")]
    NumericalDivergence {
        node: NodeCoords,
        quantity: Quantity,
        value: f64,
        /// Contributing inputs, formatted for the report.
        inputs: String,
    },

    /// Mismatched velocity range, dimensionality, or buffer length.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl LbmError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error is a numerical divergence.
    pub fn is_divergence(&self) -> bool {
        matches!(self, Self::NumericalDivergence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divergence_message_names_node() {
        let err = LbmError::NumericalDivergence {
            node: NodeCoords::new(1, 2, 3),
            quantity: Quantity::Population(4),
            value: -1.0,
            inputs: "rho=1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("(1, 2, 3)"));
        assert!(msg.contains("population[4]"));
        assert!(err.is_divergence());
    }

    #[test]
    fn test_positivity_requirements() {
        assert!(Quantity::Density.requires_positive());
        assert!(Quantity::Population(0).requires_positive());
        assert!(!Quantity::BodyForce(0).requires_positive());
        assert!(!Quantity::Moment(3).requires_positive());
        assert!(!Quantity::Velocity(1).requires_positive());
    }
}
