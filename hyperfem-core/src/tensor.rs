//! Fixed-size tensor algebra for 2-D and 3-D kernels.
//!
//! All functions are closed-form and allocation free. Inputs are 3×3
//! matrices with zero padding outside the leading `dim×dim` block (see
//! [`crate::types`]); every function preserves that padding.

use crate::types::{SpatialDim, Tensor};

/// Identity on the leading `dim×dim` block.
#[inline]
pub fn identity(dim: SpatialDim) -> Tensor {
    match dim {
        #[rustfmt::skip]
        SpatialDim::Two => Tensor::new(
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
        ),
        SpatialDim::Three => Tensor::identity(),
    }
}

/// Determinant of the leading `dim×dim` block.
#[inline]
pub fn determinant(dim: SpatialDim, a: &Tensor) -> f64 {
    match dim {
        SpatialDim::Two => a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)],
        SpatialDim::Three => {
            a[(0, 0)] * (a[(1, 1)] * a[(2, 2)] - a[(2, 1)] * a[(1, 2)])
                - a[(0, 1)] * (a[(1, 0)] * a[(2, 2)] - a[(1, 2)] * a[(2, 0)])
                + a[(0, 2)] * (a[(1, 0)] * a[(2, 1)] - a[(1, 1)] * a[(2, 0)])
        }
    }
}

/// Inverse transpose `A⁻ᵀ` via the cofactor matrix.
///
/// A singular `a` yields non-finite entries; callers guarantee a
/// non-degenerate argument.
pub fn inverse_transpose(dim: SpatialDim, a: &Tensor) -> Tensor {
    let inv_det = 1.0 / determinant(dim, a);
    match dim {
        #[rustfmt::skip]
        SpatialDim::Two => Tensor::new(
            a[(1, 1)] * inv_det, -a[(1, 0)] * inv_det, 0.0,
            -a[(0, 1)] * inv_det, a[(0, 0)] * inv_det, 0.0,
            0.0, 0.0, 0.0,
        ),
        SpatialDim::Three => {
            let c00 = a[(1, 1)] * a[(2, 2)] - a[(2, 1)] * a[(1, 2)];
            let c01 = -(a[(1, 0)] * a[(2, 2)] - a[(1, 2)] * a[(2, 0)]);
            let c02 = a[(1, 0)] * a[(2, 1)] - a[(2, 0)] * a[(1, 1)];
            let c10 = -(a[(0, 1)] * a[(2, 2)] - a[(0, 2)] * a[(2, 1)]);
            let c11 = a[(0, 0)] * a[(2, 2)] - a[(0, 2)] * a[(2, 0)];
            let c12 = -(a[(0, 0)] * a[(2, 1)] - a[(2, 0)] * a[(0, 1)]);
            let c20 = a[(0, 1)] * a[(1, 2)] - a[(0, 2)] * a[(1, 1)];
            let c21 = -(a[(0, 0)] * a[(1, 2)] - a[(1, 0)] * a[(0, 2)]);
            let c22 = a[(0, 0)] * a[(1, 1)] - a[(1, 0)] * a[(0, 1)];
            #[rustfmt::skip]
            let cofactor = Tensor::new(
                c00, c01, c02,
                c10, c11, c12,
                c20, c21, c22,
            );
            cofactor * inv_det
        }
    }
}

/// Trace. Padding contributes nothing.
#[inline]
pub fn trace(x: &Tensor) -> f64 {
    x.trace()
}

/// Double contraction `X : Y = Σ X_ij Y_ij`.
#[inline]
pub fn frobenius(x: &Tensor, y: &Tensor) -> f64 {
    x.dot(y)
}

/// `X · Y`.
#[inline]
pub fn product(x: &Tensor, y: &Tensor) -> Tensor {
    x * y
}

/// `α X · Y`.
#[inline]
pub fn scaled_product(alpha: f64, x: &Tensor, y: &Tensor) -> Tensor {
    (x * y) * alpha
}

/// `α Xᵀ · Y`.
#[inline]
pub fn product_tn(alpha: f64, x: &Tensor, y: &Tensor) -> Tensor {
    x.tr_mul(y) * alpha
}

/// `α X · Yᵀ`.
#[inline]
pub fn product_nt(alpha: f64, x: &Tensor, y: &Tensor) -> Tensor {
    (x * y.transpose()) * alpha
}

/// `α Xᵀ · Yᵀ`.
#[inline]
pub fn product_tt(alpha: f64, x: &Tensor, y: &Tensor) -> Tensor {
    (y * x).transpose() * alpha
}

/// `α X + β Y`.
#[inline]
pub fn linear_combination(alpha: f64, x: &Tensor, beta: f64, y: &Tensor) -> Tensor {
    x * alpha + y * beta
}

/// `α X`.
#[inline]
pub fn scale(alpha: f64, x: &Tensor) -> Tensor {
    x * alpha
}

/// Symmetric part `½(X + Xᵀ)`.
#[inline]
pub fn symmetric_part(x: &Tensor) -> Tensor {
    (x + x.transpose()) * 0.5
}
