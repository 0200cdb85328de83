//! Constitutive laws.
//!
//! The [`MaterialLaw`] trait lets the assembler evaluate stresses and
//! their linearization at a quadrature point without knowing which law it
//! runs. [`ConstitutiveModel`] is the configured, closed set of laws that an
//! assembly call selects once and then dispatches on.
//!
//! # Submodules
//!
//! - [`linear`] - small-strain linear elasticity
//! - [`semmt`] - linear elasticity with volume-ratio stiffening
//! - [`st_venant_kirchhoff`] - St. Venant-Kirchhoff
//! - [`neo_hookean`] - compressible Neo-Hookean
//! - [`neo_hookean2`] - Neo-Hookean with a volumetric/isochoric split

use crate::error::Result;
use crate::material::MaterialModel;
use crate::types::{SpatialDim, Tensor};

pub mod linear;
pub mod neo_hookean;
pub mod neo_hookean2;
pub mod semmt;
pub mod st_venant_kirchhoff;

pub use linear::LinearElastic;
pub use neo_hookean::NeoHookean;
pub use neo_hookean2::NeoHookean2;
pub use semmt::Semmt;
pub use st_venant_kirchhoff::StVenantKirchhoff;

/// Stress and tangent evaluation at one quadrature point.
///
/// Laws must be thread-safe (Send + Sync) so a single instance can be
/// shared by every worker of the element loop.
pub trait MaterialLaw: Send + Sync {
    /// Kinematic state computed once per element and quadrature point and
    /// reused by every test/trial pair.
    type State: Clone + Send;

    /// Model tag of this law.
    fn model(&self) -> MaterialModel;

    /// Build the quadrature-point state from the displacement gradient `∇u`.
    fn prepare(&self, dim: SpatialDim, grad_u: &Tensor) -> Self::State;

    /// First Piola-Kirchhoff stress `P`.
    fn stress(&self, state: &Self::State) -> Tensor;

    /// Directional derivative `dP` of [`Self::stress`] along `δF`.
    fn tangent_stress(&self, state: &Self::State, d_f: &Tensor) -> Tensor;

    /// Factor applied to every stiffness and residual entry of an element.
    ///
    /// `reference_det` is the Jacobian determinant of the first element of
    /// the mesh.
    fn element_scaling(&self, _reference_det: f64, _element_det: f64) -> f64 {
        1.0
    }
}

/// A configured law from the supported set.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstitutiveModel {
    Linear(LinearElastic),
    Semmt(Semmt),
    StVenantKirchhoff(StVenantKirchhoff),
    NeoHookean(NeoHookean),
    NeoHookean2(NeoHookean2),
}

impl ConstitutiveModel {
    /// Build the law for `model` from its parameter vector.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ParameterCount`] if `params` has the wrong
    /// length. Parameter values are not range checked.
    pub fn from_parameters(model: MaterialModel, params: &[f64]) -> Result<Self> {
        let material = model.material(params)?;
        Ok(match model {
            MaterialModel::Linear => ConstitutiveModel::Linear(LinearElastic::new(&material)),
            MaterialModel::Semmt => ConstitutiveModel::Semmt(Semmt::new(&material, params[2])),
            MaterialModel::StVenantKirchhoff => {
                ConstitutiveModel::StVenantKirchhoff(StVenantKirchhoff::new(&material))
            }
            MaterialModel::NeoHookean => ConstitutiveModel::NeoHookean(NeoHookean::new(&material)),
            MaterialModel::NeoHookean2 => {
                ConstitutiveModel::NeoHookean2(NeoHookean2::new(&material))
            }
        })
    }

    /// Model tag.
    pub fn model(&self) -> MaterialModel {
        match self {
            ConstitutiveModel::Linear(law) => law.model(),
            ConstitutiveModel::Semmt(law) => law.model(),
            ConstitutiveModel::StVenantKirchhoff(law) => law.model(),
            ConstitutiveModel::NeoHookean(law) => law.model(),
            ConstitutiveModel::NeoHookean2(law) => law.model(),
        }
    }
}
