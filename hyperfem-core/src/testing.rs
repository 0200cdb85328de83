//! Shared fixtures for unit tests.

use crate::assembly::AssemblyInput;
use crate::law::MaterialLaw;
use crate::material::Material;
use crate::mesh::{Connectivity, ElementGeometry, ReferenceBasis};
use crate::tensor;
use crate::types::{SpatialDim, Tensor, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// E = 1000, ν = 0.3.
pub fn test_material() -> Material {
    Material::unchecked(1000.0, 0.3)
}

/// Random tensor with entries in `[-scale, scale]` on the leading block.
pub fn random_tensor<R: Rng>(rng: &mut R, dim: SpatialDim, scale: f64) -> Tensor {
    let mut t = Tensor::zeros();
    for i in 0..dim.value() {
        for j in 0..dim.value() {
            t[(i, j)] = rng.gen_range(-scale..scale);
        }
    }
    t
}

/// Random displacement gradient `∇u` with `F = I + ∇u` close to identity.
pub fn near_identity_gradient<R: Rng>(rng: &mut R, dim: SpatialDim) -> Tensor {
    random_tensor(rng, dim, 0.15)
}

/// Central difference of `f` along `direction`.
pub fn central_difference<F>(f: F, at: &Tensor, direction: &Tensor, h: f64) -> Tensor
where
    F: Fn(&Tensor) -> Tensor,
{
    let plus = f(&(at + direction * h));
    let minus = f(&(at - direction * h));
    (plus - minus) / (2.0 * h)
}

/// Compare the analytic tangent of `law` with a central difference of its
/// stress, for random `F` near identity and random directions.
pub fn check_tangent_consistency<L: MaterialLaw>(law: &L, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for dim in [SpatialDim::Two, SpatialDim::Three] {
        for _ in 0..10 {
            let grad_u = near_identity_gradient(&mut rng, dim);
            let d_f = random_tensor(&mut rng, dim, 1.0);
            let state = law.prepare(dim, &grad_u);
            let analytic = law.tangent_stress(&state, &d_f);
            let numeric =
                central_difference(|g| law.stress(&law.prepare(dim, g)), &grad_u, &d_f, 1e-6);
            let scale = analytic.norm().max(1.0);
            let rel = (analytic - numeric).norm() / scale;
            assert!(
                rel < 1e-6,
                "{} tangent mismatch in {}: rel error {:e}\nanalytic {}\nnumeric {}",
                law.model(),
                dim,
                rel,
                analytic,
                numeric
            );
        }
    }
}

/// At `∇u = 0` the tangent of `law` must be `2μ ε(δF) + λ tr(ε(δF)) I`.
pub fn check_reference_tangent_is_linear<L: MaterialLaw>(
    law: &L,
    material: &Material,
    dims: &[SpatialDim],
    seed: u64,
) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mu = material.lame_mu();
    let lambda = material.lame_lambda();
    for &dim in dims {
        let state = law.prepare(dim, &Tensor::zeros());
        for _ in 0..5 {
            let d_f = random_tensor(&mut rng, dim, 1.0);
            let eps = tensor::symmetric_part(&d_f);
            let expected = eps * (2.0 * mu) + tensor::identity(dim) * (lambda * eps.trace());
            let got = law.tangent_stress(&state, &d_f);
            assert!(
                (got - expected).norm() <= 1e-10 * expected.norm().max(1.0),
                "{} reference tangent in {} differs: {} vs {}",
                law.model(),
                dim,
                got,
                expected
            );
        }
    }
}

/// Owned inputs for a test mesh.
pub struct Fixture {
    pub dim: SpatialDim,
    pub displacement: Vec<f64>,
    pub connectivity: Connectivity,
    pub basis: ReferenceBasis,
    pub geometry: ElementGeometry,
}

impl Fixture {
    pub fn input(&self) -> AssemblyInput<'_> {
        AssemblyInput::new(
            self.dim,
            &self.displacement,
            &self.connectivity,
            &self.basis,
            &self.geometry,
        )
        .expect("valid fixture")
    }
}

/// P1 triangle reference gradients, one quadrature point of weight 1/2.
pub fn p1_triangle_basis() -> ReferenceBasis {
    let grads = [
        Vector::new(-1.0, -1.0, 0.0),
        Vector::new(1.0, 0.0, 0.0),
        Vector::new(0.0, 1.0, 0.0),
    ];
    let per_node: Vec<Vec<Vector>> = grads.iter().map(|g| vec![*g]).collect();
    ReferenceBasis::from_nodal(SpatialDim::Two, &per_node, vec![0.5]).expect("valid basis")
}

/// P1 tetrahedron reference gradients with a 4-point rule.
///
/// Gradients are constant, so repeating them over four points of weight
/// 1/24 exercises the quadrature loop without changing the integral.
pub fn p1_tet_basis() -> ReferenceBasis {
    let grads = [
        Vector::new(-1.0, -1.0, -1.0),
        Vector::new(1.0, 0.0, 0.0),
        Vector::new(0.0, 1.0, 0.0),
        Vector::new(0.0, 0.0, 1.0),
    ];
    let per_node: Vec<Vec<Vector>> = grads.iter().map(|g| vec![*g; 4]).collect();
    ReferenceBasis::from_nodal(SpatialDim::Three, &per_node, vec![1.0 / 24.0; 4])
        .expect("valid basis")
}

/// Single reference triangle with identity geometry.
pub fn single_triangle(displacement: Vec<f64>) -> Fixture {
    let dim = SpatialDim::Two;
    Fixture {
        dim,
        displacement,
        connectivity: Connectivity::from_elements(&[vec![1, 2, 3]]).expect("valid connectivity"),
        basis: p1_triangle_basis(),
        geometry: ElementGeometry::from_tensors(dim, &[tensor::identity(dim)], &[1.0])
            .expect("valid geometry"),
    }
}

/// Two triangles on nodes (0,0) (1,0) (1,1) (0,2).
///
/// The Jacobian determinants are 1 and 2, so volume-ratio scaling is
/// visible between the elements.
pub fn two_triangles(displacement: Vec<f64>) -> Fixture {
    let dim = SpatialDim::Two;
    // Element 1: nodes 1 2 3, J = [x2 - x1, x3 - x1].
    #[rustfmt::skip]
    let j1 = Tensor::new(
        1.0, 1.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 0.0,
    );
    // Element 2: nodes 1 3 4.
    #[rustfmt::skip]
    let j2 = Tensor::new(
        1.0, 0.0, 0.0,
        1.0, 2.0, 0.0,
        0.0, 0.0, 0.0,
    );
    // ∇φ = J⁻ᵀ ∇̂φ, so J⁻ᵀ is what the geometry stores.
    let inv_jacs = [
        tensor::inverse_transpose(dim, &j1),
        tensor::inverse_transpose(dim, &j2),
    ];
    let dets = [tensor::determinant(dim, &j1), tensor::determinant(dim, &j2)];
    Fixture {
        dim,
        displacement,
        connectivity: Connectivity::from_elements(&[vec![1, 2, 3], vec![1, 3, 4]])
            .expect("valid connectivity"),
        basis: p1_triangle_basis(),
        geometry: ElementGeometry::from_tensors(dim, &inv_jacs, &dets).expect("valid geometry"),
    }
}

/// Single reference tetrahedron with identity geometry.
pub fn single_tet(displacement: Vec<f64>) -> Fixture {
    let dim = SpatialDim::Three;
    Fixture {
        dim,
        displacement,
        connectivity: Connectivity::from_elements(&[vec![1, 2, 3, 4]])
            .expect("valid connectivity"),
        basis: p1_tet_basis(),
        geometry: ElementGeometry::from_tensors(dim, &[tensor::identity(dim)], &[1.0])
            .expect("valid geometry"),
    }
}

/// Smooth, moderate displacement field for `n_nodes` nodes.
pub fn wavy_displacement(dim: SpatialDim, n_nodes: usize) -> Vec<f64> {
    (0..n_nodes * dim.value())
        .map(|i| 0.04 * ((i as f64) * 1.3 + 0.2).sin())
        .collect()
}

/// Unit square split into `2 n²` triangles, with interior nodes shifted by
/// up to `distortion` so the elements differ in size and shape.
///
/// The displacement is [`wavy_displacement`].
pub fn triangle_grid(n: usize, distortion: f64) -> Fixture {
    let dim = SpatialDim::Two;
    let side = n + 1;
    let node = |i: usize, j: usize| j * side + i + 1;
    let coords: Vec<(f64, f64)> = (0..side * side)
        .map(|id| {
            let (i, j) = (id % side, id / side);
            let interior = i > 0 && i < n && j > 0 && j < n;
            let shift = if interior { distortion } else { 0.0 };
            let x = i as f64 / n as f64 + shift * ((id as f64) * 2.1).sin();
            let y = j as f64 / n as f64 + shift * ((id as f64) * 0.9).cos();
            (x, y)
        })
        .collect();

    let mut elements = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            elements.push(vec![node(i, j), node(i + 1, j), node(i + 1, j + 1)]);
            elements.push(vec![node(i, j), node(i + 1, j + 1), node(i, j + 1)]);
        }
    }

    let mut inv_jacs = Vec::with_capacity(elements.len());
    let mut dets = Vec::with_capacity(elements.len());
    for elem in &elements {
        let (x1, y1) = coords[elem[0] - 1];
        let (x2, y2) = coords[elem[1] - 1];
        let (x3, y3) = coords[elem[2] - 1];
        #[rustfmt::skip]
        let jac = Tensor::new(
            x2 - x1, x3 - x1, 0.0,
            y2 - y1, y3 - y1, 0.0,
            0.0, 0.0, 0.0,
        );
        inv_jacs.push(tensor::inverse_transpose(dim, &jac));
        dets.push(tensor::determinant(dim, &jac));
    }

    Fixture {
        dim,
        displacement: wavy_displacement(dim, side * side),
        connectivity: Connectivity::from_elements(&elements).expect("valid connectivity"),
        basis: p1_triangle_basis(),
        geometry: ElementGeometry::from_tensors(dim, &inv_jacs, &dets).expect("valid geometry"),
    }
}
