//! Neo-Hookean hyperelasticity with a volumetric/isochoric split.
//!
//! ```text
//! P = μ J^(−2/3) (F − ⅓ I_C F⁻ᵀ) + ½ κ (J² − J + ln J) F⁻ᵀ
//! ```
//!
//! with `J = det F`, `I_C = tr(FᵀF)` and `κ = ⅔μ + λ`. The exponent and the
//! `⅓` factor are the three-dimensional ones in every dimension, so in 2-D
//! the undeformed state carries the residual stress `μ/3 I`.
//!
//! The tangent has five terms: the volumetric part plus four isochoric
//! terms. The two contributions proportional to `F⁻ᵀ` from the derivatives
//! of `J^(−2/3)` and `I_C` are merged into one.

use crate::kinematics::deformation_gradient;
use crate::law::MaterialLaw;
use crate::material::{Material, MaterialModel};
use crate::tensor;
use crate::types::{SpatialDim, Tensor};

/// Decoupled Neo-Hookean law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeoHookean2 {
    mu: f64,
    bulk: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct NeoHookean2State {
    f: Tensor,
    inv_ft: Tensor,
    det: f64,
    det_sq: f64,
    log_det: f64,
    /// `J^(−2/3)`
    iso_factor: f64,
    /// `tr(FᵀF)`
    i_c: f64,
}

impl NeoHookean2 {
    pub fn new(material: &Material) -> Self {
        Self {
            mu: material.lame_mu(),
            bulk: material.decoupled_bulk_modulus(),
        }
    }
}

impl MaterialLaw for NeoHookean2 {
    type State = NeoHookean2State;

    fn model(&self) -> MaterialModel {
        MaterialModel::NeoHookean2
    }

    fn prepare(&self, dim: SpatialDim, grad_u: &Tensor) -> NeoHookean2State {
        let f = deformation_gradient(dim, grad_u);
        let det = tensor::determinant(dim, &f);
        let c = tensor::product_tn(1.0, &f, &f);
        NeoHookean2State {
            f,
            inv_ft: tensor::inverse_transpose(dim, &f),
            det,
            det_sq: det.powi(2),
            log_det: det.ln(),
            iso_factor: det.powf(-2.0 / 3.0),
            i_c: tensor::trace(&c),
        }
    }

    fn stress(&self, s: &NeoHookean2State) -> Tensor {
        let isochoric = tensor::linear_combination(1.0, &s.f, -1.0 / 3.0 * s.i_c, &s.inv_ft);
        tensor::linear_combination(
            self.mu * s.iso_factor,
            &isochoric,
            0.5 * self.bulk * (s.det_sq - s.det + s.log_det),
            &s.inv_ft,
        )
    }

    fn tangent_stress(&self, s: &NeoHookean2State, d_f: &Tensor) -> Tensor {
        // F⁻ᵀ : δF = tr(F⁻¹ δF) = δJ / J
        let inv_ft_d_f = tensor::frobenius(&s.inv_ft, d_f);
        let f_d_f = tensor::frobenius(&s.f, d_f);
        // F⁻ᵀ δFᵀ F⁻ᵀ = −δ(F⁻ᵀ)
        let inv_ft_d_ft_inv_ft =
            tensor::product(&tensor::product_nt(1.0, &s.inv_ft, d_f), &s.inv_ft);
        let mu_iso = self.mu * s.iso_factor;

        let vol = tensor::linear_combination(
            0.5 * self.bulk * (2.0 * s.det_sq - s.det + 1.0) * inv_ft_d_f,
            &s.inv_ft,
            0.5 * self.bulk * (-s.det_sq + s.det - s.log_det),
            &inv_ft_d_ft_inv_ft,
        );
        let iso1 = tensor::scale(-2.0 / 3.0 * mu_iso * inv_ft_d_f, &s.f);
        let iso24 = tensor::scale(
            mu_iso * (2.0 / 9.0 * s.i_c * inv_ft_d_f - 2.0 / 3.0 * f_d_f),
            &s.inv_ft,
        );
        let iso3 = tensor::scale(mu_iso, d_f);
        let iso5 = tensor::scale(1.0 / 3.0 * mu_iso * s.i_c, &inv_ft_d_ft_inv_ft);

        vol + iso1 + iso24 + iso3 + iso5
    }
}
