//! Stiffened linear elasticity for mesh motion.
//!
//! Linear elasticity whose element contributions are multiplied by
//! `(detJ₀ / detJ_e)^p`, where `detJ₀` is the Jacobian determinant of the
//! first element of the mesh. Small elements become stiffer and resist
//! distortion when the law drives a mesh-moving problem.

use crate::law::linear::{LinearElastic, LinearState};
use crate::law::MaterialLaw;
use crate::material::{Material, MaterialModel};
use crate::types::{SpatialDim, Tensor};

/// Linear elasticity with element volume-ratio stiffening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Semmt {
    linear: LinearElastic,
    stiffening_power: f64,
}

impl Semmt {
    pub fn new(material: &Material, stiffening_power: f64) -> Self {
        Self {
            linear: LinearElastic::new(material),
            stiffening_power,
        }
    }

    /// Exponent `p` of the volume ratio.
    pub fn stiffening_power(&self) -> f64 {
        self.stiffening_power
    }
}

impl MaterialLaw for Semmt {
    type State = LinearState;

    fn model(&self) -> MaterialModel {
        MaterialModel::Semmt
    }

    fn prepare(&self, dim: SpatialDim, grad_u: &Tensor) -> LinearState {
        self.linear.prepare(dim, grad_u)
    }

    fn stress(&self, state: &LinearState) -> Tensor {
        self.linear.stress(state)
    }

    fn tangent_stress(&self, state: &LinearState, d_f: &Tensor) -> Tensor {
        self.linear.tangent_stress(state, d_f)
    }

    fn element_scaling(&self, reference_det: f64, element_det: f64) -> f64 {
        (reference_det / element_det).powf(self.stiffening_power)
    }
}
