//! hyperfem core - hyperelastic finite element kernels
//!
//! Element-level tangent stiffness and residual assembly for nonlinear
//! solid mechanics:
//! - Five constitutive laws: linear, SEMMT mesh-motion, St. Venant-Kirchhoff
//!   and two Neo-Hookean variants
//! - 2-D and 3-D elements with arbitrary local node count and quadrature
//! - Parallel element loop using Rayon, lock-free through disjoint output blocks
//! - Triplet output with CSR conversion (nalgebra-sparse)
//! - Quadrature-point stress recovery
//!
//! # Architecture
//!
//! - [`MaterialLaw`] trait: stress and its linearization at a quadrature point
//! - [`AssemblyInput`]: displacement, connectivity, reference basis and geometry
//! - [`assemble`]: model selection and the parallel element loop
//! - [`AssemblyOutput`]: stiffness and residual triplets per element

pub mod types;
pub mod tensor;
pub mod kinematics;
pub mod mesh;
pub mod material;
pub mod law;
pub mod sparse;
pub mod assembly;
pub mod stress;
pub mod error;

#[cfg(test)]
mod testing;

pub use types::{SpatialDim, Tensor, Vector};
pub use mesh::{Connectivity, ElementGeometry, ReferenceBasis};
pub use material::{Material, MaterialModel};
pub use law::{ConstitutiveModel, MaterialLaw};
pub use assembly::{assemble, assemble_by_name, AssemblyInput, AssemblyOptions, AssemblyOutput};
pub use stress::{recover_stresses, StressField};
pub use sparse::CsrMatrix;
pub use error::{Error, Result};
