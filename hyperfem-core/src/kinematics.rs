//! Kinematics at quadrature points.
//!
//! Physical basis gradients, interpolated displacement gradients and the
//! strain measures derived from them.

use crate::assembly::AssemblyInput;
use crate::tensor;
use crate::types::{SpatialDim, Tensor, Vector};

/// Map a reference shape function gradient to physical space:
/// `∇φ = invJ · ∇̂φ`.
#[inline]
pub fn physical_gradient(inv_jacobian: &Tensor, reference_gradient: &Vector) -> Vector {
    inv_jacobian * reference_gradient
}

/// Displacement gradient `∇u = Σ_k u_k ⊗ ∇φ_k` at one quadrature point.
///
/// `nodes` are the 1-based global node numbers of the element's local
/// nodes and `gradients[k]` the matching physical gradients. Displacement
/// component `c` of node `n` lives at `displacement[n - 1 + c * n_nodes]`.
pub fn interpolate_gradient(
    dim: SpatialDim,
    nodes: &[usize],
    gradients: &[Vector],
    displacement: &[f64],
) -> Tensor {
    let n_nodes = displacement.len() / dim.value();
    let mut grad_u = Tensor::zeros();
    for (&node, grad_phi) in nodes.iter().zip(gradients) {
        for c in 0..dim.value() {
            let u = displacement[node - 1 + c * n_nodes];
            for d in 0..dim.value() {
                grad_u[(c, d)] += u * grad_phi[d];
            }
        }
    }
    grad_u
}

/// `F = I + ∇u`.
#[inline]
pub fn deformation_gradient(dim: SpatialDim, grad_u: &Tensor) -> Tensor {
    tensor::identity(dim) + grad_u
}

/// Infinitesimal strain `ε = ½(∇u + ∇uᵀ)`.
#[inline]
pub fn small_strain(grad_u: &Tensor) -> Tensor {
    tensor::symmetric_part(grad_u)
}

/// Green strain `E = ½(FᵀF − I)`.
#[inline]
pub fn green_strain(dim: SpatialDim, f: &Tensor) -> Tensor {
    (f.tr_mul(f) - tensor::identity(dim)) * 0.5
}

/// Gateaux derivative of the Green strain along `δF`:
/// `δE = ½(δFᵀF + FᵀδF)`.
#[inline]
pub fn directional_green_strain(f: &Tensor, d_f: &Tensor) -> Tensor {
    (d_f.tr_mul(f) + f.tr_mul(d_f)) * 0.5
}

/// Gradient of the vector basis function `φ e_c`: row `c` holds `∇φ`.
#[inline]
pub fn component_gradient(component: usize, grad_phi: &Vector) -> Tensor {
    let mut g = Tensor::zeros();
    g.set_row(component, &grad_phi.transpose());
    g
}

/// Per-element kinematic scratch, reused across the elements a worker
/// processes.
///
/// Holds the physical gradients of every local node at every quadrature
/// point and the displacement gradient at every point.
#[derive(Debug, Clone)]
pub struct ElementKinematics {
    n_local: usize,
    gradients: Vec<Vector>,
    displacement_gradients: Vec<Tensor>,
}

impl ElementKinematics {
    /// Allocate scratch for `n_local` nodes and `n_quad` points.
    pub fn new(n_local: usize, n_quad: usize) -> Self {
        Self {
            n_local,
            gradients: vec![Vector::zeros(); n_local * n_quad],
            displacement_gradients: vec![Tensor::zeros(); n_quad],
        }
    }

    /// Recompute gradients and displacement gradients for element `ie`.
    pub fn update(&mut self, input: &AssemblyInput<'_>, ie: usize) {
        let inv_jacobian = input.geometry().inv_jacobian(ie);
        let nodes = &input.connectivity().element_nodes(ie)[..self.n_local];
        for (q, grad_u) in self.displacement_gradients.iter_mut().enumerate() {
            let at_point = &mut self.gradients[q * self.n_local..(q + 1) * self.n_local];
            for (k, grad_phi) in at_point.iter_mut().enumerate() {
                *grad_phi = physical_gradient(&inv_jacobian, &input.basis().gradient(k, q));
            }
            *grad_u = interpolate_gradient(input.dim(), nodes, at_point, input.displacement());
        }
    }

    /// Physical gradient of local node `k` at point `q`.
    #[inline]
    pub fn gradient(&self, k: usize, q: usize) -> &Vector {
        &self.gradients[q * self.n_local + k]
    }

    /// Displacement gradients, one per quadrature point.
    #[inline]
    pub fn displacement_gradients(&self) -> &[Tensor] {
        &self.displacement_gradients
    }
}
