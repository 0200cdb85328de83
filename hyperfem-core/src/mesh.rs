//! Typed mesh, geometry and basis inputs for assembly.
//!
//! The flat layouts match the ones produced by column-major mesh
//! preprocessors, so arrays can be handed over without reshuffling:
//!
//! - connectivity: `nodes[ie * n_rows + k]`, 1-based node numbers
//! - inverse Jacobians: `inv[ie + (d1 + d2 * dim) * n_elements]`
//! - reference gradients: `grad[k + (q + d * n_quad) * n_local]`

use crate::error::{Error, Result};
use crate::types::{SpatialDim, Tensor, Vector};

/// Element-to-node table.
///
/// Each element owns `n_rows` consecutive slots. Only the first
/// `n_local` slots (the basis' local node count) take part in assembly;
/// extra rows such as region tags are carried along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Connectivity {
    n_rows: usize,
    nodes: Vec<usize>,
}

impl Connectivity {
    /// Create a table from the flat column-per-element layout.
    pub fn new(n_rows: usize, nodes: Vec<usize>) -> Result<Self> {
        if n_rows == 0 {
            return Err(Error::Mesh("connectivity needs at least one row".into()));
        }
        if nodes.len() % n_rows != 0 {
            return Err(Error::Mesh(format!(
                "connectivity length {} is not a multiple of {} rows",
                nodes.len(),
                n_rows
            )));
        }
        if let Some(pos) = nodes.iter().position(|&n| n == 0) {
            return Err(Error::Mesh(format!(
                "node index 0 in element {} (indices are 1-based)",
                pos / n_rows
            )));
        }
        Ok(Self { n_rows, nodes })
    }

    /// Create a table from per-element node lists of equal length.
    pub fn from_elements(elements: &[Vec<usize>]) -> Result<Self> {
        let n_rows = elements.first().map_or(1, Vec::len);
        if let Some((ie, elem)) = elements.iter().enumerate().find(|(_, e)| e.len() != n_rows) {
            return Err(Error::Mesh(format!(
                "element {} has {} nodes, expected {}",
                ie,
                elem.len(),
                n_rows
            )));
        }
        Self::new(n_rows, elements.concat())
    }

    /// Slots per element.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of elements.
    pub fn n_elements(&self) -> usize {
        self.nodes.len() / self.n_rows
    }

    /// All slots of element `ie`.
    #[inline]
    pub fn element_nodes(&self, ie: usize) -> &[usize] {
        &self.nodes[ie * self.n_rows..(ie + 1) * self.n_rows]
    }

    /// Largest node index among the first `n_local` slots of every element.
    pub fn max_node(&self, n_local: usize) -> Option<usize> {
        self.nodes
            .chunks(self.n_rows)
            .flat_map(|elem| elem[..n_local.min(self.n_rows)].iter().copied())
            .max()
    }
}

/// Per-element inverse Jacobians and Jacobian determinants.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementGeometry {
    dim: SpatialDim,
    inv_jacobians: Vec<f64>,
    det_jacobians: Vec<f64>,
}

impl ElementGeometry {
    /// Create from flat arrays.
    pub fn new(dim: SpatialDim, inv_jacobians: Vec<f64>, det_jacobians: Vec<f64>) -> Result<Self> {
        let d = dim.value();
        if inv_jacobians.len() != det_jacobians.len() * d * d {
            return Err(Error::Input(format!(
                "{} elements need {} inverse Jacobian entries, got {}",
                det_jacobians.len(),
                det_jacobians.len() * d * d,
                inv_jacobians.len()
            )));
        }
        Ok(Self {
            dim,
            inv_jacobians,
            det_jacobians,
        })
    }

    /// Create from one inverse Jacobian tensor per element.
    pub fn from_tensors(
        dim: SpatialDim,
        inv_jacobians: &[Tensor],
        det_jacobians: &[f64],
    ) -> Result<Self> {
        let d = dim.value();
        let n = inv_jacobians.len();
        let mut flat = vec![0.0; n * d * d];
        for (ie, inv) in inv_jacobians.iter().enumerate() {
            for d1 in 0..d {
                for d2 in 0..d {
                    flat[ie + (d1 + d2 * d) * n] = inv[(d1, d2)];
                }
            }
        }
        Self::new(dim, flat, det_jacobians.to_vec())
    }

    /// Spatial dimension.
    pub fn dim(&self) -> SpatialDim {
        self.dim
    }

    /// Number of elements.
    pub fn n_elements(&self) -> usize {
        self.det_jacobians.len()
    }

    /// Inverse Jacobian of element `ie`, zero padded.
    #[inline]
    pub fn inv_jacobian(&self, ie: usize) -> Tensor {
        let d = self.dim.value();
        let n = self.n_elements();
        let mut inv = Tensor::zeros();
        for d1 in 0..d {
            for d2 in 0..d {
                inv[(d1, d2)] = self.inv_jacobians[ie + (d1 + d2 * d) * n];
            }
        }
        inv
    }

    /// Jacobian determinant of element `ie`.
    #[inline]
    pub fn det_jacobian(&self, ie: usize) -> f64 {
        self.det_jacobians[ie]
    }

    /// Jacobian determinant of the first element.
    pub fn reference_det(&self) -> Option<f64> {
        self.det_jacobians.first().copied()
    }

    /// All Jacobian determinants.
    pub fn det_jacobians(&self) -> &[f64] {
        &self.det_jacobians
    }
}

/// Reference shape function gradients and quadrature weights.
///
/// Shared read-only by every element.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceBasis {
    dim: SpatialDim,
    n_local: usize,
    gradients: Vec<f64>,
    weights: Vec<f64>,
}

impl ReferenceBasis {
    /// Create from the flat gradient array and the quadrature weights.
    pub fn new(
        dim: SpatialDim,
        n_local: usize,
        gradients: Vec<f64>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        if n_local == 0 {
            return Err(Error::Input("basis needs at least one local node".into()));
        }
        let expected = n_local * weights.len() * dim.value();
        if gradients.len() != expected {
            return Err(Error::Input(format!(
                "{} local nodes x {} quadrature points x {} need {} gradient entries, got {}",
                n_local,
                weights.len(),
                dim,
                expected,
                gradients.len()
            )));
        }
        Ok(Self {
            dim,
            n_local,
            gradients,
            weights,
        })
    }

    /// Create from `gradients[k][q]`, one vector per local node and point.
    pub fn from_nodal(
        dim: SpatialDim,
        gradients: &[Vec<Vector>],
        weights: Vec<f64>,
    ) -> Result<Self> {
        let n_local = gradients.len();
        let n_quad = weights.len();
        let d = dim.value();
        let mut flat = vec![0.0; n_local * n_quad * d];
        for (k, per_point) in gradients.iter().enumerate() {
            if per_point.len() != n_quad {
                return Err(Error::Input(format!(
                    "local node {} has {} gradients for {} quadrature points",
                    k,
                    per_point.len(),
                    n_quad
                )));
            }
            for (q, g) in per_point.iter().enumerate() {
                for c in 0..d {
                    flat[k + (q + c * n_quad) * n_local] = g[c];
                }
            }
        }
        Self::new(dim, n_local, flat, weights)
    }

    /// Spatial dimension.
    pub fn dim(&self) -> SpatialDim {
        self.dim
    }

    /// Local nodes per element.
    pub fn n_local(&self) -> usize {
        self.n_local
    }

    /// Quadrature points per element.
    pub fn n_quad(&self) -> usize {
        self.weights.len()
    }

    /// Quadrature weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Reference gradient of local node `k` at point `q`, zero padded.
    #[inline]
    pub fn gradient(&self, k: usize, q: usize) -> Vector {
        let mut g = Vector::zeros();
        for c in 0..self.dim.value() {
            g[c] = self.gradients[k + (q + c * self.n_quad()) * self.n_local];
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_connectivity_creation() {
        let conn = Connectivity::from_elements(&[vec![1, 2, 3], vec![2, 4, 3]]).unwrap();
        assert_eq!(conn.n_rows(), 3);
        assert_eq!(conn.n_elements(), 2);
        assert_eq!(conn.element_nodes(1), &[2, 4, 3]);
        assert_eq!(conn.max_node(3), Some(4));
    }

    #[test]
    fn test_connectivity_extra_rows_ignored_by_max_node() {
        // Fourth row holds a region tag.
        let conn = Connectivity::new(4, vec![1, 2, 3, 99, 2, 4, 3, 99]).unwrap();
        assert_eq!(conn.n_elements(), 2);
        assert_eq!(conn.max_node(3), Some(4));
    }

    #[test]
    fn test_connectivity_rejects_zero_index() {
        let result = Connectivity::from_elements(&[vec![0, 1, 2]]);
        assert!(matches!(result, Err(Error::Mesh(_))));
    }

    #[test]
    fn test_connectivity_rejects_ragged_elements() {
        assert!(Connectivity::from_elements(&[vec![1, 2, 3], vec![1, 2]]).is_err());
        assert!(Connectivity::new(3, vec![1, 2, 3, 4]).is_err());
        assert!(Connectivity::new(0, vec![]).is_err());
    }

    #[test]
    fn test_geometry_layout() {
        #[rustfmt::skip]
        let a = Tensor::new(
            1.0, 2.0, 0.0,
            3.0, 4.0, 0.0,
            0.0, 0.0, 0.0,
        );
        let b = a * 10.0;
        let geom = ElementGeometry::from_tensors(SpatialDim::Two, &[a, b], &[1.0, 2.0]).unwrap();
        assert_eq!(geom.n_elements(), 2);
        assert_eq!(geom.inv_jacobian(0), a);
        assert_eq!(geom.inv_jacobian(1), b);
        assert_relative_eq!(geom.det_jacobian(1), 2.0);
        assert_eq!(geom.reference_det(), Some(1.0));

        // Element index runs fastest in the flat layout.
        let flat = ElementGeometry::new(
            SpatialDim::Two,
            vec![1.0, 10.0, 3.0, 30.0, 2.0, 20.0, 4.0, 40.0],
            vec![1.0, 2.0],
        )
        .unwrap();
        assert_eq!(flat, geom);
    }

    #[test]
    fn test_geometry_length_mismatch() {
        let result = ElementGeometry::new(SpatialDim::Three, vec![0.0; 8], vec![1.0]);
        assert!(matches!(result, Err(Error::Input(_))));
    }

    #[test]
    fn test_basis_layout() {
        let grads = vec![
            vec![Vector::new(-1.0, -1.0, 0.0), Vector::new(-2.0, -2.0, 0.0)],
            vec![Vector::new(1.0, 0.0, 0.0), Vector::new(2.0, 0.0, 0.0)],
            vec![Vector::new(0.0, 1.0, 0.0), Vector::new(0.0, 2.0, 0.0)],
        ];
        let basis = ReferenceBasis::from_nodal(SpatialDim::Two, &grads, vec![0.25, 0.25]).unwrap();
        assert_eq!(basis.n_local(), 3);
        assert_eq!(basis.n_quad(), 2);
        for (k, per_point) in grads.iter().enumerate() {
            for (q, g) in per_point.iter().enumerate() {
                assert_eq!(basis.gradient(k, q), *g);
            }
        }
    }

    #[test]
    fn test_basis_rejects_wrong_length() {
        let result = ReferenceBasis::new(SpatialDim::Two, 3, vec![0.0; 5], vec![0.5]);
        assert!(result.is_err());
        assert!(ReferenceBasis::new(SpatialDim::Two, 0, vec![], vec![0.5]).is_err());
    }
}
