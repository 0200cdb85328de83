//! St. Venant-Kirchhoff hyperelasticity.
//!
//! Hooke's law between the Green strain and the second Piola stress:
//! `S = 2μE + λ tr(E) I`, `P = F·S`. The tangent follows the product rule
//! `dP = δF·S + F·(2μ δE + λ tr(δE) I)`.

use crate::kinematics::{deformation_gradient, directional_green_strain, green_strain};
use crate::law::MaterialLaw;
use crate::material::{Material, MaterialModel};
use crate::tensor;
use crate::types::{SpatialDim, Tensor};

/// St. Venant-Kirchhoff law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StVenantKirchhoff {
    mu: f64,
    lambda: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct StVenantKirchhoffState {
    identity: Tensor,
    f: Tensor,
    /// Second Piola stress at the current state.
    s: Tensor,
}

impl StVenantKirchhoff {
    pub fn new(material: &Material) -> Self {
        Self {
            mu: material.lame_mu(),
            lambda: material.lame_lambda(),
        }
    }

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

impl MaterialLaw for StVenantKirchhoff {
    type State = StVenantKirchhoffState;

    fn model(&self) -> MaterialModel {
        MaterialModel::StVenantKirchhoff
    }

    fn prepare(&self, dim: SpatialDim, grad_u: &Tensor) -> StVenantKirchhoffState {
        let identity = tensor::identity(dim);
        let f = deformation_gradient(dim, grad_u);
        let e = green_strain(dim, &f);
        StVenantKirchhoffState {
            identity,
            f,
            s: self.hooke(&identity, &e),
        }
    }

    fn stress(&self, state: &StVenantKirchhoffState) -> Tensor {
        tensor::product(&state.f, &state.s)
    }

    fn tangent_stress(&self, state: &StVenantKirchhoffState, d_f: &Tensor) -> Tensor {
        let d_e = directional_green_strain(&state.f, d_f);
        let d_s = self.hooke(&state.identity, &d_e);
        tensor::product(d_f, &state.s) + tensor::product(&state.f, &d_s)
    }
}
