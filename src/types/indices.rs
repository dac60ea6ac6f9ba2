//! Strongly-typed index newtypes.
//!
//! These types prevent mixing up the two kinds of indices the kernels see:
//! a discrete velocity within a stencil and a node within a driver-owned
//! field buffer.

use std::fmt;

use crate::error::LbmError;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);

            /// Create an iterator over [0, n) indices.
            pub fn iter(n: usize) -> impl ExactSizeIterator<Item = $name> {
                (0..n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// Discrete velocity index within a stencil.
    ///
    /// # Example
    ///
    /// ```
    /// use lbm_kernels::types::VelocityIndex;
    ///
    /// let i = VelocityIndex::new(5);
    /// assert_eq!(i.get(), 5);
    /// ```
    VelocityIndex,
    "q"
);

define_index!(
    /// Node index within a driver-owned, node-major field buffer.
    ///
    /// # Example
    ///
    /// ```
    /// use lbm_kernels::types::NodeIndex;
    ///
    /// let n = NodeIndex::new(3);
    /// assert_eq!(n.get(), 3);
    /// ```
    NodeIndex,
    "N"
);

/// Contiguous sub-range `first..last` of velocity indices.
///
/// Lets a driver split the Q-loop of a node across several kernel
/// invocations. The range is half-open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VelocityRange {
    /// First velocity index (inclusive)
    pub first: usize,
    /// Last velocity index (exclusive)
    pub last: usize,
}

impl VelocityRange {
    /// Create a new range `first..last`.
    #[inline]
    pub const fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// The full range `0..q`.
    #[inline]
    pub const fn full(q: usize) -> Self {
        Self { first: 0, last: q }
    }

    /// Number of velocities addressed.
    #[inline]
    pub const fn len(&self) -> usize {
        self.last.saturating_sub(self.first)
    }

    /// Whether the range addresses no velocities.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.last <= self.first
    }

    /// Iterate the addressed velocity indices.
    pub fn indices(&self) -> impl ExactSizeIterator<Item = VelocityIndex> {
        (self.first..self.last.max(self.first)).map(VelocityIndex)
    }

    /// Check that the range lies inside a stencil of `q` velocities.
    pub fn check_within(&self, q: usize) -> Result<(), LbmError> {
        if self.first > self.last || self.last > q {
            return Err(LbmError::configuration(format!(
                "velocity range {}..{} does not fit a stencil of {} velocities",
                self.first, self.last, q
            )));
        }
        Ok(())
    }
}

impl fmt::Display for VelocityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}..q{}", self.first, self.last)
    }
}
