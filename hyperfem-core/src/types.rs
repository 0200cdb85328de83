//! Core data types shared by the kernels.
//!
//! Every `dim×dim` tensor is stored in a fixed 3×3 matrix. Two-dimensional
//! problems use the leading 2×2 block and keep the third row and column at
//! zero, so sums, products, traces and contractions need no dimension
//! argument. Only operations that see the identity (identity, determinant,
//! inverse transpose) branch on [`SpatialDim`].

use crate::error::{Error, Result};
use nalgebra::{Matrix3, Vector3};
use std::fmt;

/// Second-order tensor (deformation gradient, stress, strain).
pub type Tensor = Matrix3<f64>;

/// Spatial vector (basis function gradient).
pub type Vector = Vector3<f64>;

/// Spatial dimension of the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialDim {
    /// Plane problems.
    Two,
    /// Solid problems.
    Three,
}

impl SpatialDim {
    /// Number of spatial components.
    #[inline]
    pub fn value(self) -> usize {
        match self {
            SpatialDim::Two => 2,
            SpatialDim::Three => 3,
        }
    }
}

impl TryFrom<usize> for SpatialDim {
    type Error = Error;

    fn try_from(dim: usize) -> Result<Self> {
        match dim {
            2 => Ok(SpatialDim::Two),
            3 => Ok(SpatialDim::Three),
            other => Err(Error::InvalidDimension(other)),
        }
    }
}

impl fmt::Display for SpatialDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.value())
    }
}
