//! Validity guard for per-node physical quantities.
//!
//! Every kernel runs each value it writes through a [`ValidityPolicy`]. The
//! policy is chosen when the pipeline is configured:
//!
//! - [`FailFast`]: a NaN, an infinity, or a sign violation becomes
//!   [`LbmError::NumericalDivergence`] naming the node, the quantity, and the
//!   inputs that produced it.
//! - [`Unchecked`]: every check is a no-op and inlines away.
//!
//! [`GuardMode`] selects between the two at runtime.
//!
//! # Example
//!
//! ```
//! use lbm_kernels::analysis::{FailFast, Unchecked, ValidityPolicy};
//! use lbm_kernels::error::Quantity;
//! use lbm_kernels::types::NodeCoords;
//!
//! let node = NodeCoords::planar(3, 7);
//! assert!(FailFast.check(node, Quantity::Density, f64::NAN, || "sum(f)".into()).is_err());
//! assert!(Unchecked.check(node, Quantity::Density, f64::NAN, || "sum(f)".into()).is_ok());
//! ```

use crate::error::{LbmError, Quantity};
use crate::types::{NodeClass, NodeCoords};

/// Policy deciding what happens when a kernel writes an invalid value.
///
/// `inputs` is only evaluated when a violation is reported.
pub trait ValidityPolicy: Send + Sync {
    /// Check a freshly computed value.
    fn check<F>(
        &self,
        node: NodeCoords,
        quantity: Quantity,
        value: f64,
        inputs: F,
    ) -> Result<(), LbmError>
    where
        F: FnOnce() -> String;

    /// Whether checks are performed at all.
    fn is_enabled(&self) -> bool;
}

/// Whether `value` is acceptable for `quantity`.
#[inline]
pub fn is_valid(quantity: Quantity, value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    !quantity.requires_positive() || value > 0.0
}

/// Abort on the first invalid value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FailFast;

impl ValidityPolicy for FailFast {
    #[inline]
    fn check<F>(
        &self,
        node: NodeCoords,
        quantity: Quantity,
        value: f64,
        inputs: F,
    ) -> Result<(), LbmError>
    where
        F: FnOnce() -> String,
    {
        if is_valid(quantity, value) {
            return Ok(());
        }
        let inputs = inputs();
        log::error!(
            "numerical divergence at node {}: {} = {:e} ({})",
            node,
            quantity,
            value,
            inputs
        );
        Err(LbmError::NumericalDivergence {
            node,
            quantity,
            value,
            inputs,
        })
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Skip every check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unchecked;

impl ValidityPolicy for Unchecked {
    #[inline(always)]
    fn check<F>(&self, _: NodeCoords, _: Quantity, _: f64, _: F) -> Result<(), LbmError>
    where
        F: FnOnce() -> String,
    {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Runtime selection between [`FailFast`] and [`Unchecked`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardMode {
    /// Validated runs.
    #[default]
    FailFast,
    /// Performance runs.
    Unchecked,
}

impl ValidityPolicy for GuardMode {
    #[inline]
    fn check<F>(
        &self,
        node: NodeCoords,
        quantity: Quantity,
        value: f64,
        inputs: F,
    ) -> Result<(), LbmError>
    where
        F: FnOnce() -> String,
    {
        match self {
            Self::FailFast => FailFast.check(node, quantity, value, inputs),
            Self::Unchecked => Ok(()),
        }
    }

    fn is_enabled(&self) -> bool {
        matches!(self, Self::FailFast)
    }
}

impl<P: ValidityPolicy> ValidityPolicy for &P {
    #[inline(always)]
    fn check<F>(
        &self,
        node: NodeCoords,
        quantity: Quantity,
        value: f64,
        inputs: F,
    ) -> Result<(), LbmError>
    where
        F: FnOnce() -> String,
    {
        (**self).check(node, quantity, value, inputs)
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

// =============================================================================
// Field scan
// =============================================================================

/// Problem found while scanning a whole distribution field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWarning {
    /// Population is NaN or infinite.
    NonFinite {
        node: usize,
        velocity: usize,
        value: f64,
    },
    /// Population is zero or negative.
    NonPositive {
        node: usize,
        velocity: usize,
        value: f64,
    },
}

impl std::fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite {
                node,
                velocity,
                value,
            } => write!(
                f,
                "Non-finite population f[{}] = {} at node {}",
                velocity, value, node
            ),
            Self::NonPositive {
                node,
                velocity,
                value,
            } => write!(
                f,
                "Non-positive population f[{}] = {:.3e} at node {}",
                velocity, value, node
            ),
        }
    }
}

/// Result of scanning a node-major distribution buffer.
#[derive(Debug, Clone, Default)]
pub struct FieldStatus {
    /// Number of nodes scanned (solid nodes excluded).
    pub nodes_checked: usize,
    /// Smallest population seen on checked nodes.
    pub min_population: f64,
    /// Everything found.
    pub warnings: Vec<FieldWarning>,
}

impl FieldStatus {
    /// Whether the field passed.
    pub fn is_valid(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Whether any NaN or infinite population was found.
    pub fn has_non_finite(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, FieldWarning::NonFinite { .. }))
    }
}

/// Scan a node-major buffer of `q` populations per node.
///
/// Intended for drivers that run the kernels with [`Unchecked`] and want an
/// occasional full check. Immersed solid nodes are skipped. Positivity is
/// only enforced when `require_positive` is set (single-relaxation runs).
pub fn scan_populations(
    f: &[f64],
    q: usize,
    classes: &[NodeClass],
    require_positive: bool,
) -> Result<FieldStatus, LbmError> {
    if q == 0 || f.len() != classes.len() * q {
        return Err(LbmError::configuration(format!(
            "field of length {} does not hold {} nodes of {} populations",
            f.len(),
            classes.len(),
            q
        )));
    }

    let mut status = FieldStatus {
        min_population: f64::INFINITY,
        ..FieldStatus::default()
    };

    for (node, (pops, class)) in f.chunks_exact(q).zip(classes).enumerate() {
        if class.is_solid() {
            continue;
        }
        status.nodes_checked += 1;
        for (velocity, &value) in pops.iter().enumerate() {
            if !value.is_finite() {
                status.warnings.push(FieldWarning::NonFinite {
                    node,
                    velocity,
                    value,
                });
                continue;
            }
            status.min_population = status.min_population.min(value);
            if require_positive && value <= 0.0 {
                status.warnings.push(FieldWarning::NonPositive {
                    node,
                    velocity,
                    value,
                });
            }
        }
    }

    Ok(status)
}
