//! Discrete velocity sets.
//!
//! A [`VelocitySet`] is an immutable table built once at startup and shared by
//! reference with every kernel. Velocities are stored normalized by the
//! lattice sound speed, `XI = e / CS`, so the Hermite expansion in
//! `equations::equilibrium` reads directly off the table.
//!
//! Presets:
//! ```text
//!   D2Q9      D3Q19                 D3Q27
//!   6 2 5     rest + 6 face         rest + 6 face
//!   3 0 1     + 12 edge             + 12 edge + 8 corner
//!   7 4 8
//! ```

use crate::error::LbmError;
use crate::types::{VelocityIndex, VelocityRange};

/// Lattice sound speed `1/sqrt(3)` shared by the standard presets.
pub const CS_STANDARD: f64 = 0.577_350_269_189_625_8;

/// D2Q9 lattice vectors.
const D2Q9_E: [[i32; 2]; 9] = [
    [0, 0],   // 0: rest
    [1, 0],   // 1: east
    [0, 1],   // 2: north
    [-1, 0],  // 3: west
    [0, -1],  // 4: south
    [1, 1],   // 5: northeast
    [-1, 1],  // 6: northwest
    [-1, -1], // 7: southwest
    [1, -1],  // 8: southeast
];

/// D3Q19 lattice vectors.
const D3Q19_E: [[i32; 3]; 19] = [
    [0, 0, 0], // 0: rest
    [1, 0, 0], // 1-6: face
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
    [1, 1, 0], // 7-18: edge
    [-1, -1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [1, 0, 1],
    [-1, 0, -1],
    [1, 0, -1],
    [-1, 0, 1],
    [0, 1, 1],
    [0, -1, -1],
    [0, 1, -1],
    [0, -1, 1],
];

/// Weight of a D3Q27 direction by the number of non-zero components.
const D3Q27_W: [f64; 4] = [8.0 / 27.0, 2.0 / 27.0, 1.0 / 54.0, 1.0 / 216.0];

/// Immutable discrete velocity set.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocitySet {
    name: &'static str,
    dim: usize,
    /// Integer lattice vectors, flattened with stride `dim`
    lattice: Vec<i32>,
    /// Normalized velocities `e / cs`, flattened with stride `dim`
    xi: Vec<f64>,
    weights: Vec<f64>,
    cs: f64,
    opposite: Vec<usize>,
}

impl VelocitySet {
    /// Build a velocity set from integer lattice vectors and weights.
    ///
    /// `vectors` is flattened with stride `dim`. Fails if the dimensionality
    /// is not 2 or 3, if the table lengths disagree, if the weights do not
    /// sum to one, or if some vector has no opposite in the set.
    pub fn from_lattice(
        name: &'static str,
        dim: usize,
        vectors: &[i32],
        weights: &[f64],
        cs: f64,
    ) -> Result<Self, LbmError> {
        if dim != 2 && dim != 3 {
            return Err(LbmError::configuration(format!(
                "{name}: dimensionality must be 2 or 3, got {dim}"
            )));
        }
        if vectors.len() != dim * weights.len() || weights.is_empty() {
            return Err(LbmError::configuration(format!(
                "{name}: {} vector components for {} weights in {dim}D",
                vectors.len(),
                weights.len()
            )));
        }
        let weight_sum: f64 = weights.iter().sum();
        if (weight_sum - 1.0).abs() > 1e-12 {
            return Err(LbmError::configuration(format!(
                "{name}: weights sum to {weight_sum}, expected 1"
            )));
        }
        if !(cs.is_finite() && cs > 0.0) {
            return Err(LbmError::configuration(format!(
                "{name}: sound speed must be positive, got {cs}"
            )));
        }

        let q = weights.len();
        let mut opposite = Vec::with_capacity(q);
        for e in vectors.chunks_exact(dim) {
            let opp = vectors
                .chunks_exact(dim)
                .position(|o| o.iter().zip(e).all(|(a, b)| *a == -*b))
                .ok_or_else(|| {
                    LbmError::configuration(format!("{name}: vector {e:?} has no opposite"))
                })?;
            opposite.push(opp);
        }
        debug_assert_eq!(opposite.len(), q);

        Ok(Self {
            name,
            dim,
            lattice: vectors.to_vec(),
            xi: vectors.iter().map(|&e| e as f64 / cs).collect(),
            weights: weights.to_vec(),
            cs,
            opposite,
        })
    }

    /// D2Q9 lattice.
    pub fn d2q9() -> Self {
        let vectors: Vec<i32> = D2Q9_E.iter().flatten().copied().collect();
        let weights: Vec<f64> = D2Q9_E
            .iter()
            .map(|e| match e[0].abs() + e[1].abs() {
                0 => 4.0 / 9.0,
                1 => 1.0 / 9.0,
                _ => 1.0 / 36.0,
            })
            .collect();
        Self::from_preset("D2Q9", 2, &vectors, &weights)
    }

    /// D3Q19 lattice.
    pub fn d3q19() -> Self {
        let vectors: Vec<i32> = D3Q19_E.iter().flatten().copied().collect();
        let weights: Vec<f64> = D3Q19_E
            .iter()
            .map(|e| match e.iter().map(|c| c.abs()).sum::<i32>() {
                0 => 1.0 / 3.0,
                1 => 1.0 / 18.0,
                _ => 1.0 / 36.0,
            })
            .collect();
        Self::from_preset("D3Q19", 3, &vectors, &weights)
    }

    /// D3Q27 lattice: the full tensor product of {-1, 0, 1}³.
    ///
    /// Ordered rest, faces, edges, corners, like D3Q19 extended by the
    /// eight corners.
    pub fn d3q27() -> Self {
        let mut all: Vec<[i32; 3]> = Vec::with_capacity(27);
        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    all.push([x, y, z]);
                }
            }
        }
        let norm1 = |e: &[i32; 3]| e.iter().map(|c| c.abs()).sum::<i32>() as usize;
        let mut ordered: Vec<[i32; 3]> = D3Q19_E.to_vec();
        ordered.extend(all.iter().filter(|e| norm1(e) == 3));

        let vectors: Vec<i32> = ordered.iter().flatten().copied().collect();
        let weights: Vec<f64> = ordered.iter().map(|e| D3Q27_W[norm1(e)]).collect();
        Self::from_preset("D3Q27", 3, &vectors, &weights)
    }

    fn from_preset(name: &'static str, dim: usize, vectors: &[i32], weights: &[f64]) -> Self {
        match Self::from_lattice(name, dim, vectors, weights, CS_STANDARD) {
            Ok(set) => set,
            Err(err) => unreachable!("built-in lattice {name} is inconsistent: {err}"),
        }
    }

    /// Preset name, e.g. `"D2Q9"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Dimensionality `D`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of velocities `Q`.
    #[inline]
    pub fn q(&self) -> usize {
        self.weights.len()
    }

    /// Lattice sound speed `CS`.
    #[inline]
    pub fn cs(&self) -> f64 {
        self.cs
    }

    /// `CS²`.
    #[inline]
    pub fn cs2(&self) -> f64 {
        self.cs * self.cs
    }

    /// Normalized velocity vector `XI[i]` (length `D`).
    #[inline]
    pub fn xi(&self, i: VelocityIndex) -> &[f64] {
        let start = i.get() * self.dim;
        &self.xi[start..start + self.dim]
    }

    /// Component `d` of `XI[i]`.
    #[inline]
    pub fn xi_component(&self, i: VelocityIndex, d: usize) -> f64 {
        self.xi[i.get() * self.dim + d]
    }

    /// Flattened normalized velocities (stride `D`).
    #[inline]
    pub fn xi_flat(&self) -> &[f64] {
        &self.xi
    }

    /// Integer lattice vector `e[i]` (length `D`).
    #[inline]
    pub fn lattice_vector(&self, i: VelocityIndex) -> &[i32] {
        let start = i.get() * self.dim;
        &self.lattice[start..start + self.dim]
    }

    /// Weight `w[i]`.
    #[inline]
    pub fn weight(&self, i: VelocityIndex) -> f64 {
        self.weights[i.get()]
    }

    /// All weights.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Index of the velocity pointing the other way.
    #[inline]
    pub fn opposite(&self, i: VelocityIndex) -> VelocityIndex {
        VelocityIndex::new(self.opposite[i.get()])
    }

    /// The range covering every velocity.
    #[inline]
    pub fn full_range(&self) -> VelocityRange {
        VelocityRange::full(self.q())
    }

    /// Whether the set is the full tensor product `{-1, 0, 1}^D`.
    ///
    /// Raw-moment MRT needs this: it is what makes the 3^D moment set
    /// invertible.
    pub fn is_tensor_product(&self) -> bool {
        self.q() == 3usize.pow(self.dim as u32)
            && self.lattice.iter().all(|c| (-1..=1).contains(c))
    }

    /// Check that `range` addresses velocities of this set.
    pub fn check_range(&self, range: VelocityRange) -> Result<(), LbmError> {
        range.check_within(self.q())
    }

    /// Check that the set has the dimensionality the caller was wired for.
    pub fn check_dimension(&self, dim: usize) -> Result<(), LbmError> {
        if self.dim != dim {
            return Err(LbmError::configuration(format!(
                "{} is {}D but the kernel expects {}D",
                self.name, self.dim, dim
            )));
        }
        Ok(())
    }

    /// Check that the set carries the fourth-order thermal equilibrium.
    ///
    /// Only the 3D tensor-product set (D3Q27) has the quadrature degree for
    /// it; D3Q19 drops the corner velocities it needs.
    pub fn check_thermal(&self) -> Result<(), LbmError> {
        self.check_dimension(3)?;
        if !self.is_tensor_product() {
            return Err(LbmError::configuration(format!(
                "{} lacks the quadrature for the fourth-order equilibrium, use D3Q27",
                self.name
            )));
        }
        Ok(())
    }

    /// Check that a node slice holds one value per velocity.
    pub fn check_slice(&self, what: &str, len: usize) -> Result<(), LbmError> {
        if len != self.q() {
            return Err(LbmError::configuration(format!(
                "{what} holds {len} values, {} needs {}",
                self.name,
                self.q()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn all_sets() -> Vec<VelocitySet> {
        vec![VelocitySet::d2q9(), VelocitySet::d3q19(), VelocitySet::d3q27()]
    }

    #[test]
    fn test_sizes() {
        let d2q9 = VelocitySet::d2q9();
        assert_eq!((d2q9.dim(), d2q9.q()), (2, 9));
        let d3q19 = VelocitySet::d3q19();
        assert_eq!((d3q19.dim(), d3q19.q()), (3, 19));
        let d3q27 = VelocitySet::d3q27();
        assert_eq!((d3q27.dim(), d3q27.q()), (3, 27));
    }

    #[test]
    fn test_weight_moments() {
        // Σ w = 1, Σ w ξ = 0, Σ w ξ_a ξ_b = δ_ab
        for set in all_sets() {
            let d = set.dim();
            let total: f64 = set.weights().iter().sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-14);

            for a in 0..d {
                let first: f64 = VelocityIndex::iter(set.q())
                    .map(|i| set.weight(i) * set.xi_component(i, a))
                    .sum();
                assert!(first.abs() < 1e-14, "{}: first moment {}", set.name(), first);

                for b in 0..d {
                    let second: f64 = VelocityIndex::iter(set.q())
                        .map(|i| set.weight(i) * set.xi_component(i, a) * set.xi_component(i, b))
                        .sum();
                    let expected = if a == b { 1.0 } else { 0.0 };
                    assert_relative_eq!(second, expected, epsilon = 1e-13);
                }
            }
        }
    }

    #[test]
    fn test_opposites() {
        for set in all_sets() {
            for i in VelocityIndex::iter(set.q()) {
                let o = set.opposite(i);
                assert_eq!(set.opposite(o), i);
                for (a, b) in set.lattice_vector(i).iter().zip(set.lattice_vector(o)) {
                    assert_eq!(*a, -*b);
                }
            }
        }
    }

    #[test]
    fn test_d3q27_extends_d3q19() {
        let q19 = VelocitySet::d3q19();
        let q27 = VelocitySet::d3q27();
        for i in VelocityIndex::iter(19) {
            assert_eq!(q19.lattice_vector(i), q27.lattice_vector(i));
        }
        assert_relative_eq!(q27.weight(VelocityIndex::ZERO), 8.0 / 27.0);
    }

    #[test]
    fn test_tensor_product() {
        assert!(VelocitySet::d2q9().is_tensor_product());
        assert!(VelocitySet::d3q27().is_tensor_product());
        assert!(!VelocitySet::d3q19().is_tensor_product());
    }

    #[test]
    fn test_xi_normalization() {
        let set = VelocitySet::d2q9();
        let east = VelocityIndex::new(1);
        assert_relative_eq!(set.xi(east)[0] * set.cs(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(set.cs2(), 1.0 / 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(VelocitySet::from_lattice("bad", 4, &[0; 4], &[1.0], CS_STANDARD).is_err());
        assert!(VelocitySet::from_lattice("bad", 2, &[0, 0, 1], &[1.0], CS_STANDARD).is_err());
        assert!(
            VelocitySet::from_lattice("bad", 2, &[0, 0, 1, 0], &[0.5, 0.5], CS_STANDARD).is_err()
        );
        assert!(VelocitySet::from_lattice("bad", 2, &[0, 0], &[0.9], CS_STANDARD).is_err());
    }

    #[test]
    fn test_checks() {
        let set = VelocitySet::d2q9();
        assert!(set.check_range(VelocityRange::new(2, 9)).is_ok());
        assert!(set.check_range(VelocityRange::new(2, 10)).is_err());
        assert!(set.check_dimension(2).is_ok());
        assert!(set.check_dimension(3).is_err());
        assert!(set.check_slice("f", 9).is_ok());
        assert!(set.check_slice("f", 19).is_err());
    }

    #[test]
    fn test_thermal_needs_d3q27() {
        assert!(VelocitySet::d3q27().check_thermal().is_ok());
        assert!(VelocitySet::d3q19().check_thermal().is_err());
        assert!(VelocitySet::d2q9().check_thermal().is_err());
    }
}
