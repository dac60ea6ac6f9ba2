//! Raw-moment transform for tensor-product velocity sets.
//!
//! The transform matrix M connects populations and raw moments:
//! - M[k,i] = e_x(i)^a · e_y(i)^b · e_z(i)^c, with k = a + 3b + 9c
//! - m = M f
//! - f = M⁻¹ m
//!
//! On `{-1, 0, 1}^D` lattices M is the D-fold Kronecker product of the 1D
//! matrix over `e ∈ {-1, 0, 1}` and exponents `{0, 1, 2}`, so the inverse is
//! the product of the closed-form 1D inverse rows:
//!
//! ```text
//! e = -1:  [0, -½, ½]
//! e =  0:  [1,  0, -1]
//! e = +1:  [0,  ½, ½]
//! ```

use crate::error::LbmError;
use crate::lattice::VelocitySet;
use crate::types::VelocityIndex;

/// Largest number of moments handled (D3Q27).
pub const MAX_MOMENTS: usize = 27;

/// Exponents `(a, b, c)` of raw moment `k`.
#[inline]
pub fn exponents(k: usize, dim: usize) -> [usize; 3] {
    match dim {
        2 => [k % 3, k / 3, 0],
        _ => [k % 3, (k / 3) % 3, k / 9],
    }
}

/// Total order `a + b + c` of raw moment `k`.
#[inline]
pub fn moment_order(k: usize, dim: usize) -> usize {
    exponents(k, dim).iter().sum()
}

#[inline(always)]
fn inverse_row(e: i32) -> [f64; 3] {
    match e {
        -1 => [0.0, -0.5, 0.5],
        0 => [1.0, 0.0, -1.0],
        _ => [0.0, 0.5, 0.5],
    }
}

/// Forward and inverse raw-moment matrices of one velocity set.
#[derive(Clone, Debug)]
pub struct MomentTransform {
    q: usize,
    dim: usize,
    /// M, row-major: m[k] = Σ_i m_mat[k*q + i] f[i]
    m_mat: Vec<f64>,
    /// M⁻¹, row-major: f[i] = Σ_k m_inv[i*q + k] m[k]
    m_inv: Vec<f64>,
}

impl MomentTransform {
    /// Build the transform for a tensor-product velocity set.
    pub fn new(set: &VelocitySet) -> Result<Self, LbmError> {
        if !set.is_tensor_product() {
            return Err(LbmError::configuration(format!(
                "raw-moment transform needs a {{-1,0,1}}^D lattice, {} is not one",
                set.name()
            )));
        }
        let q = set.q();
        let dim = set.dim();

        let mut m_mat = vec![0.0; q * q];
        let mut m_inv = vec![0.0; q * q];
        for i in VelocityIndex::iter(q) {
            let e = set.lattice_vector(i);
            for k in 0..q {
                let exp = exponents(k, dim);
                let mut forward = 1.0;
                let mut inverse = 1.0;
                for d in 0..dim {
                    forward *= f64::from(e[d]).powi(exp[d] as i32);
                    inverse *= inverse_row(e[d])[exp[d]];
                }
                m_mat[k * q + i.get()] = forward;
                m_inv[i.get() * q + k] = inverse;
            }
        }

        Ok(Self {
            q,
            dim,
            m_mat,
            m_inv,
        })
    }

    /// Number of moments (equals the number of velocities).
    pub fn len(&self) -> usize {
        self.q
    }

    /// Whether the transform has no moments.
    pub fn is_empty(&self) -> bool {
        self.q == 0
    }

    /// Dimensionality of the set it was built for.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Populations to moments.
    pub fn forward(&self, f: &[f64], m: &mut [f64]) -> Result<(), LbmError> {
        self.check_lengths(f.len(), m.len())?;
        apply(&self.m_mat, self.q, f, m);
        Ok(())
    }

    /// Moments to populations.
    pub fn inverse(&self, m: &[f64], f: &mut [f64]) -> Result<(), LbmError> {
        self.check_lengths(m.len(), f.len())?;
        apply(&self.m_inv, self.q, m, f);
        Ok(())
    }

    /// Populations to moments, in place.
    pub fn forward_in_place(&self, values: &mut [f64]) -> Result<(), LbmError> {
        self.check_lengths(values.len(), values.len())?;
        let mut f = [0.0; MAX_MOMENTS];
        f[..self.q].copy_from_slice(values);
        apply(&self.m_mat, self.q, &f[..self.q], values);
        Ok(())
    }

    /// Moments to populations, in place.
    pub fn inverse_in_place(&self, values: &mut [f64]) -> Result<(), LbmError> {
        self.check_lengths(values.len(), values.len())?;
        let mut m = [0.0; MAX_MOMENTS];
        m[..self.q].copy_from_slice(values);
        apply(&self.m_inv, self.q, &m[..self.q], values);
        Ok(())
    }

    fn check_lengths(&self, input: usize, output: usize) -> Result<(), LbmError> {
        if input != self.q || output != self.q {
            return Err(LbmError::configuration(format!(
                "moment transform of size {} applied to slices of {} and {}",
                self.q, input, output
            )));
        }
        Ok(())
    }
}

#[inline]
fn apply(matrix: &[f64], n: usize, x: &[f64], y: &mut [f64]) {
    for (row, out) in matrix.chunks_exact(n).zip(y.iter_mut()) {
        *out = row.iter().zip(x).map(|(a, b)| a * b).sum();
    }
}
