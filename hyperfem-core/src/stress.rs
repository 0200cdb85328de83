//! Stress recovery from a displacement field.
//!
//! Evaluates the configured law at every quadrature point of every element
//! and keeps the first Piola-Kirchhoff stress together with the
//! deformation gradient, from which Cauchy and von Mises stresses follow.
//! Elements are processed in parallel.

use crate::assembly::{install, AssemblyInput, AssemblyOptions};
use crate::error::Result;
use crate::kinematics::{deformation_gradient, ElementKinematics};
use crate::law::{ConstitutiveModel, MaterialLaw};
use crate::material::MaterialModel;
use crate::tensor;
use crate::types::{SpatialDim, Tensor};
use log::debug;
use rayon::prelude::*;

/// Stress state at one quadrature point.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureStress {
    /// First Piola-Kirchhoff stress `P`.
    pub first_piola: Tensor,
    /// Deformation gradient `F = I + ∇u`.
    pub deformation_gradient: Tensor,
}

impl QuadratureStress {
    /// Cauchy stress `σ = P Fᵀ / det F`.
    pub fn cauchy(&self, dim: SpatialDim) -> Tensor {
        let f = &self.deformation_gradient;
        let det = tensor::determinant(dim, f);
        tensor::product_nt(1.0 / det, &self.first_piola, f)
    }

    /// Von Mises equivalent of the Cauchy stress.
    ///
    /// In 2-D the out-of-plane components are taken as zero (plane stress).
    pub fn von_mises(&self, dim: SpatialDim) -> f64 {
        let sigma = tensor::symmetric_part(&self.cauchy(dim));
        let deviator = sigma - Tensor::identity() * (sigma.trace() / 3.0);
        (1.5 * deviator.dot(&deviator)).sqrt()
    }
}

/// Stress result for a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStress {
    /// Element index in the mesh.
    pub element_id: usize,
    /// Spatial dimension.
    pub dim: SpatialDim,
    /// Stress at each quadrature point.
    pub quadrature_stresses: Vec<QuadratureStress>,
}

impl ElementStress {
    /// Unweighted mean of `P` over the quadrature points.
    pub fn average_first_piola(&self) -> Tensor {
        if self.quadrature_stresses.is_empty() {
            return Tensor::zeros();
        }
        let sum: Tensor = self.quadrature_stresses.iter().map(|s| s.first_piola).sum();
        sum / self.quadrature_stresses.len() as f64
    }

    /// Maximum von Mises stress among all quadrature points.
    pub fn max_von_mises(&self) -> f64 {
        self.quadrature_stresses
            .iter()
            .map(|s| s.von_mises(self.dim))
            .fold(0.0, f64::max)
    }
}

/// Stress recovery results for the entire mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct StressField {
    /// Element stresses indexed by element ID.
    pub element_stresses: Vec<ElementStress>,
}

impl StressField {
    /// Get stress for a specific element.
    pub fn element(&self, elem_id: usize) -> Option<&ElementStress> {
        self.element_stresses.get(elem_id)
    }

    /// Number of elements with stress data.
    pub fn n_elements(&self) -> usize {
        self.element_stresses.len()
    }

    /// Maximum von Mises stress across all elements.
    pub fn max_von_mises(&self) -> f64 {
        self.element_stresses
            .iter()
            .map(ElementStress::max_von_mises)
            .fold(0.0, f64::max)
    }

    /// Mean first Piola stress of every element.
    pub fn average_first_piola(&self) -> Vec<Tensor> {
        self.element_stresses
            .iter()
            .map(ElementStress::average_first_piola)
            .collect()
    }
}

/// Recover quadrature-point stresses for `model`.
///
/// Takes the same parameters and inputs as [`crate::assembly::assemble`].
pub fn recover_stresses(
    model: MaterialModel,
    params: &[f64],
    input: &AssemblyInput<'_>,
    options: &AssemblyOptions,
) -> Result<StressField> {
    match ConstitutiveModel::from_parameters(model, params)? {
        ConstitutiveModel::Linear(l) => recover_stresses_with_law(&l, input, options),
        ConstitutiveModel::Semmt(l) => recover_stresses_with_law(&l, input, options),
        ConstitutiveModel::StVenantKirchhoff(l) => recover_stresses_with_law(&l, input, options),
        ConstitutiveModel::NeoHookean(l) => recover_stresses_with_law(&l, input, options),
        ConstitutiveModel::NeoHookean2(l) => recover_stresses_with_law(&l, input, options),
    }
}

/// Recover quadrature-point stresses with any [`MaterialLaw`].
pub fn recover_stresses_with_law<L: MaterialLaw>(
    law: &L,
    input: &AssemblyInput<'_>,
    options: &AssemblyOptions,
) -> Result<StressField> {
    let dim = input.dim();
    let n_local = input.n_local();
    let n_quad = input.basis().n_quad();
    debug!(
        "recovering {} stresses for {} elements",
        law.model(),
        input.n_elements()
    );

    let element_stresses: Vec<ElementStress> = install(options, || {
        (0..input.n_elements())
            .into_par_iter()
            .map_init(
                || ElementKinematics::new(n_local, n_quad),
                |kinematics, ie| {
                    kinematics.update(input, ie);
                    let quadrature_stresses = kinematics
                        .displacement_gradients()
                        .iter()
                        .map(|grad_u| QuadratureStress {
                            first_piola: law.stress(&law.prepare(dim, grad_u)),
                            deformation_gradient: deformation_gradient(dim, grad_u),
                        })
                        .collect();
                    ElementStress {
                        element_id: ie,
                        dim,
                        quadrature_stresses,
                    }
                },
            )
            .collect()
    })?;

    Ok(StressField { element_stresses })
}
