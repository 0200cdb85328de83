//! Compressible Neo-Hookean hyperelasticity.
//!
//! `P = μ(F − F⁻ᵀ) + λ ln(J) F⁻ᵀ` with `J = det F`.

use crate::kinematics::deformation_gradient;
use crate::law::MaterialLaw;
use crate::material::{Material, MaterialModel};
use crate::tensor;
use crate::types::{SpatialDim, Tensor};

/// Compressible Neo-Hookean law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeoHookean {
    mu: f64,
    lambda: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct NeoHookeanState {
    f: Tensor,
    inv_ft: Tensor,
    log_det: f64,
}

impl NeoHookean {
    pub fn new(material: &Material) -> Self {
        Self {
            mu: material.lame_mu(),
            lambda: material.lame_lambda(),
        }
    }
}

impl MaterialLaw for NeoHookean {
    type State = NeoHookeanState;

    fn model(&self) -> MaterialModel {
        MaterialModel::NeoHookean
    }

    fn prepare(&self, dim: SpatialDim, grad_u: &Tensor) -> NeoHookeanState {
        let f = deformation_gradient(dim, grad_u);
        NeoHookeanState {
            f,
            inv_ft: tensor::inverse_transpose(dim, &f),
            log_det: tensor::determinant(dim, &f).ln(),
        }
    }

    fn stress(&self, state: &NeoHookeanState) -> Tensor {
        tensor::linear_combination(
            self.mu,
            &(state.f - state.inv_ft),
            self.lambda * state.log_det,
            &state.inv_ft,
        )
    }

    fn tangent_stress(&self, state: &NeoHookeanState, d_f: &Tensor) -> Tensor {
        // (μ − λ ln J) F⁻ᵀ δFᵀ F⁻ᵀ
        let spin = tensor::product(
            &tensor::product_nt(self.mu - self.lambda * state.log_det, &state.inv_ft, d_f),
            &state.inv_ft,
        );
        // λ tr(F⁻¹ δF) F⁻ᵀ
        let d_log_det = tensor::trace(&tensor::product_tn(1.0, &state.inv_ft, d_f));
        let volumetric = tensor::scale(self.lambda * d_log_det, &state.inv_ft);
        spin + volumetric + tensor::scale(self.mu, d_f)
    }
}
