//! Small-strain linear elasticity.
//!
//! `P = 2μ ε + λ tr(ε) I` with `ε = ½(∇u + ∇uᵀ)`. The law is linear in
//! `∇u`, so the tangent is the same formula applied to `ε(δF)`.

use crate::kinematics::small_strain;
use crate::law::MaterialLaw;
use crate::material::{Material, MaterialModel};
use crate::tensor;
use crate::types::{SpatialDim, Tensor};

/// Isotropic linear elastic law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearElastic {
    mu: f64,
    lambda: f64,
}

/// Quadrature-point state: the strain and the identity of the problem
/// dimension.
#[derive(Debug, Clone, Copy)]
pub struct LinearState {
    identity: Tensor,
    strain: Tensor,
}

impl LinearElastic {
    pub fn new(material: &Material) -> Self {
        Self {
            mu: material.lame_mu(),
            lambda: material.lame_lambda(),
        }
    }

    /// `2μ ε + λ tr(ε) I`.
    #[inline]
    fn hooke(&self, identity: &Tensor, strain: &Tensor) -> Tensor {
        tensor::linear_combination(
            2.0 * self.mu,
            strain,
            self.lambda * tensor::trace(strain),
            identity,
        )
    }
}

impl MaterialLaw for LinearElastic {
    type State = LinearState;

    fn model(&self) -> MaterialModel {
        MaterialModel::Linear
    }

    fn prepare(&self, dim: SpatialDim, grad_u: &Tensor) -> LinearState {
        LinearState {
            identity: tensor::identity(dim),
            strain: small_strain(grad_u),
        }
    }

    fn stress(&self, state: &LinearState) -> Tensor {
        self.hooke(&state.identity, &state.strain)
    }

    fn tangent_stress(&self, state: &LinearState, d_f: &Tensor) -> Tensor {
        self.hooke(&state.identity, &small_strain(d_f))
    }
}
