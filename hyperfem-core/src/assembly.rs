//! Parallel element assembly of tangent stiffness and residual triplets.
//!
//! For every element the assembler integrates, over all test functions
//! `(a, i_c)` and trial functions `(b, j_c)`,
//!
//! ```text
//! K[(a,i_c),(b,j_c)] = Σ_q w_q ∇v : dP(∇δu) · detJ_e
//! R[(a,i_c)]         = Σ_q w_q ∇v : P       · detJ_e
//! ```
//!
//! and writes the entries as triplets into caller-visible buffers. Element
//! `ie` owns the stiffness slots `ie·(nln·dim)² ..` and the residual slots
//! `ie·nln·dim ..`; the blocks are disjoint, so elements are processed in
//! parallel without locks. Within a block the order is `a`, `i_c`, `b`,
//! `j_c` (outermost to innermost). Duplicate `(row, col)` pairs across
//! elements are left for the sparse stage to sum.
//!
//! Global degrees of freedom are 1-based: component `c` of node `n` is
//! `n + c · NumNodes`.

use crate::error::{Error, Result};
use crate::kinematics::{component_gradient, ElementKinematics};
use crate::law::{ConstitutiveModel, MaterialLaw};
use crate::material::MaterialModel;
use crate::mesh::{Connectivity, ElementGeometry, ReferenceBasis};
use crate::sparse::{CsrMatrix, ResidualVector, TripletMatrix};
use crate::tensor;
use crate::types::{SpatialDim, Tensor};
use log::{debug, warn};
use nalgebra::DMatrix;
use rayon::prelude::*;
use std::time::Instant;

/// Read-only inputs of one assembly call.
///
/// Only [`AssemblyInput::new`] builds one, so every input reaching the
/// element loop has passed the cross-checks.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    dim: SpatialDim,
    displacement: &'a [f64],
    connectivity: &'a Connectivity,
    basis: &'a ReferenceBasis,
    geometry: &'a ElementGeometry,
}

impl<'a> AssemblyInput<'a> {
    /// Bundle and cross-check the inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions or element counts disagree, the
    /// displacement length is not a multiple of `dim`, the table has fewer
    /// rows than the basis has local nodes, or a node index exceeds the
    /// number of nodes.
    pub fn new(
        dim: SpatialDim,
        displacement: &'a [f64],
        connectivity: &'a Connectivity,
        basis: &'a ReferenceBasis,
        geometry: &'a ElementGeometry,
    ) -> Result<Self> {
        if basis.dim() != dim || geometry.dim() != dim {
            return Err(Error::Input(format!(
                "dimension mismatch: problem {}, basis {}, geometry {}",
                dim,
                basis.dim(),
                geometry.dim()
            )));
        }
        if connectivity.n_elements() != geometry.n_elements() {
            return Err(Error::Input(format!(
                "connectivity has {} elements, geometry has {}",
                connectivity.n_elements(),
                geometry.n_elements()
            )));
        }
        if connectivity.n_rows() < basis.n_local() {
            return Err(Error::Mesh(format!(
                "connectivity has {} rows, basis needs {} local nodes",
                connectivity.n_rows(),
                basis.n_local()
            )));
        }
        if displacement.len() % dim.value() != 0 {
            return Err(Error::Input(format!(
                "displacement length {} is not a multiple of {}",
                displacement.len(),
                dim.value()
            )));
        }
        let n_nodes = displacement.len() / dim.value();
        if let Some(max) = connectivity.max_node(basis.n_local()) {
            if max > n_nodes {
                return Err(Error::Mesh(format!(
                    "node index {} out of bounds (displacement has {} nodes)",
                    max, n_nodes
                )));
            }
        }
        Ok(Self {
            dim,
            displacement,
            connectivity,
            basis,
            geometry,
        })
    }

    /// Spatial dimension.
    pub fn dim(&self) -> SpatialDim {
        self.dim
    }

    /// Nodal displacements, component-major: `u[n - 1 + c * NumNodes]`.
    pub fn displacement(&self) -> &'a [f64] {
        self.displacement
    }

    /// Element-to-node table.
    pub fn connectivity(&self) -> &'a Connectivity {
        self.connectivity
    }

    /// Reference gradients and quadrature weights.
    pub fn basis(&self) -> &'a ReferenceBasis {
        self.basis
    }

    /// Inverse Jacobians and Jacobian determinants.
    pub fn geometry(&self) -> &'a ElementGeometry {
        self.geometry
    }

    /// Number of elements.
    pub fn n_elements(&self) -> usize {
        self.geometry.n_elements()
    }

    /// Local nodes per element.
    pub fn n_local(&self) -> usize {
        self.basis.n_local()
    }

    /// Number of mesh nodes.
    pub fn n_nodes(&self) -> usize {
        self.displacement.len() / self.dim.value()
    }

    /// Number of global degrees of freedom.
    pub fn n_dofs(&self) -> usize {
        self.displacement.len()
    }
}

/// Assembly options.
#[derive(Debug, Clone, Default)]
pub struct AssemblyOptions {
    /// Number of parallel threads (0 = rayon's global pool).
    pub n_threads: usize,
}

/// Stiffness and residual triplets of every element.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOutput {
    /// Stiffness row indices (1-based global dofs).
    pub stiffness_rows: Vec<usize>,
    /// Stiffness column indices (1-based global dofs).
    pub stiffness_cols: Vec<usize>,
    /// Stiffness values.
    pub stiffness_values: Vec<f64>,
    /// Residual row indices (1-based global dofs).
    pub residual_rows: Vec<usize>,
    /// Residual values.
    pub residual_values: Vec<f64>,
    /// Number of global degrees of freedom.
    pub n_dofs: usize,
    local_dofs: usize,
}

impl AssemblyOutput {
    fn zeros(n_elements: usize, local_dofs: usize, n_dofs: usize) -> Self {
        let n_stiffness = n_elements * local_dofs * local_dofs;
        let n_residual = n_elements * local_dofs;
        Self {
            stiffness_rows: vec![0; n_stiffness],
            stiffness_cols: vec![0; n_stiffness],
            stiffness_values: vec![0.0; n_stiffness],
            residual_rows: vec![0; n_residual],
            residual_values: vec![0.0; n_residual],
            n_dofs,
            local_dofs,
        }
    }

    /// Degrees of freedom per element (`nln · dim`).
    pub fn local_dofs(&self) -> usize {
        self.local_dofs
    }

    /// Number of elements covered.
    pub fn n_elements(&self) -> usize {
        if self.local_dofs == 0 {
            0
        } else {
            self.residual_values.len() / self.local_dofs
        }
    }

    /// Dense local stiffness of element `ie`, rows `(a, i_c)` and columns
    /// `(b, j_c)` with the component index running fastest.
    pub fn element_stiffness(&self, ie: usize) -> DMatrix<f64> {
        let n = self.local_dofs;
        let block = &self.stiffness_values[ie * n * n..(ie + 1) * n * n];
        DMatrix::from_row_slice(n, n, block)
    }

    /// Global stiffness matrix with duplicates summed, 0-based.
    pub fn stiffness_csr(&self) -> Result<CsrMatrix> {
        TripletMatrix::from_one_based(
            self.n_dofs,
            &self.stiffness_rows,
            &self.stiffness_cols,
            &self.stiffness_values,
        )?
        .to_csr()
    }

    /// Global residual vector with duplicates summed, 0-based.
    pub fn residual_vector(&self) -> Result<Vec<f64>> {
        let residual = ResidualVector::from_one_based(
            self.n_dofs,
            &self.residual_rows,
            &self.residual_values,
        )?;
        Ok(residual.into_vec())
    }
}

/// Assemble stiffness and residual triplets for `model`.
///
/// This is the main entry point. `params` is `[E, ν]`, or
/// `[E, ν, p]` for [`MaterialModel::Semmt`].
///
/// # Errors
///
/// Fails before touching any element if the parameter count is wrong or
/// the worker pool cannot be built. Physically invalid parameters are not
/// rejected; they surface as non-finite output values.
///
/// # Example
///
/// ```ignore
/// use hyperfem_core::assembly::{assemble, AssemblyInput, AssemblyOptions};
/// use hyperfem_core::material::MaterialModel;
///
/// let input = AssemblyInput::new(dim, &u, &connectivity, &basis, &geometry)?;
/// let options = AssemblyOptions::default();
/// let out = assemble(MaterialModel::NeoHookean, &[1000.0, 0.3], &input, &options)?;
/// let k = out.stiffness_csr()?;
/// ```
pub fn assemble(
    model: MaterialModel,
    params: &[f64],
    input: &AssemblyInput<'_>,
    options: &AssemblyOptions,
) -> Result<AssemblyOutput> {
    let law = ConstitutiveModel::from_parameters(model, params)?;
    assemble_model(&law, input, options)
}

/// Assemble with the model given by name (`"Linear"`, `"SEMMT"`,
/// `"StVenantKirchhoff"`, `"NeoHookean"`, `"NeoHookean2"`).
pub fn assemble_by_name(
    name: &str,
    params: &[f64],
    input: &AssemblyInput<'_>,
    options: &AssemblyOptions,
) -> Result<AssemblyOutput> {
    assemble(name.parse()?, params, input, options)
}

/// Assemble with an already configured law.
pub fn assemble_model(
    law: &ConstitutiveModel,
    input: &AssemblyInput<'_>,
    options: &AssemblyOptions,
) -> Result<AssemblyOutput> {
    match law {
        ConstitutiveModel::Linear(l) => assemble_with_law(l, input, options),
        ConstitutiveModel::Semmt(l) => assemble_with_law(l, input, options),
        ConstitutiveModel::StVenantKirchhoff(l) => assemble_with_law(l, input, options),
        ConstitutiveModel::NeoHookean(l) => assemble_with_law(l, input, options),
        ConstitutiveModel::NeoHookean2(l) => assemble_with_law(l, input, options),
    }
}

/// Assemble with any [`MaterialLaw`].
pub fn assemble_with_law<L: MaterialLaw>(
    law: &L,
    input: &AssemblyInput<'_>,
    options: &AssemblyOptions,
) -> Result<AssemblyOutput> {
    let n_elements = input.n_elements();
    let local_dofs = input.n_local() * input.dim().value();
    debug!(
        "assembling {} elements: model {}, {}, {} local nodes, {} quadrature points, {} threads",
        n_elements,
        law.model(),
        input.dim(),
        input.n_local(),
        input.basis().n_quad(),
        options.n_threads
    );
    let inverted = input
        .geometry
        .det_jacobians()
        .iter()
        .filter(|&&d| !(d > 0.0))
        .count();
    if inverted > 0 {
        warn!("{} elements have a non-positive Jacobian determinant", inverted);
    }

    let start = Instant::now();
    let mut output = AssemblyOutput::zeros(n_elements, local_dofs, input.n_dofs());
    let reference_det = input.geometry().reference_det().unwrap_or(1.0);
    install(options, || fill_blocks(law, input, reference_det, &mut output))?;
    debug!(
        "assembled {} stiffness and {} residual entries in {:.3?}",
        output.stiffness_values.len(),
        output.residual_values.len(),
        start.elapsed()
    );
    Ok(output)
}

/// Run `op` on the configured worker pool.
pub(crate) fn install<R, OP>(options: &AssemblyOptions, op: OP) -> Result<R>
where
    R: Send,
    OP: FnOnce() -> R + Send,
{
    if options.n_threads == 0 {
        return Ok(op());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.n_threads)
        .build()?;
    Ok(pool.install(op))
}

/// Output slots owned by one element.
struct ElementBlock<'o> {
    rows: &'o mut [usize],
    cols: &'o mut [usize],
    values: &'o mut [f64],
    residual_rows: &'o mut [usize],
    residual_values: &'o mut [f64],
}

/// Per-worker scratch: kinematics, law state and stress at every
/// quadrature point of the current element.
struct ElementScratch<S> {
    kinematics: ElementKinematics,
    states: Vec<S>,
    stresses: Vec<Tensor>,
}

impl<S> ElementScratch<S> {
    fn new(n_local: usize, n_quad: usize) -> Self {
        Self {
            kinematics: ElementKinematics::new(n_local, n_quad),
            states: Vec::with_capacity(n_quad),
            stresses: Vec::with_capacity(n_quad),
        }
    }
}

fn fill_blocks<L: MaterialLaw>(
    law: &L,
    input: &AssemblyInput<'_>,
    reference_det: f64,
    output: &mut AssemblyOutput,
) {
    let local_dofs = output.local_dofs;
    if local_dofs == 0 {
        return;
    }
    let block = local_dofs * local_dofs;
    let n_local = input.n_local();
    let n_quad = input.basis().n_quad();

    output
        .stiffness_rows
        .par_chunks_mut(block)
        .zip(output.stiffness_cols.par_chunks_mut(block))
        .zip(output.stiffness_values.par_chunks_mut(block))
        .zip(output.residual_rows.par_chunks_mut(local_dofs))
        .zip(output.residual_values.par_chunks_mut(local_dofs))
        .enumerate()
        .for_each_init(
            || ElementScratch::<L::State>::new(n_local, n_quad),
            |scratch, (ie, ((((rows, cols), values), residual_rows), residual_values))| {
                let mut out = ElementBlock {
                    rows,
                    cols,
                    values,
                    residual_rows,
                    residual_values,
                };
                assemble_element(law, input, ie, reference_det, scratch, &mut out);
            },
        );
}

fn assemble_element<L: MaterialLaw>(
    law: &L,
    input: &AssemblyInput<'_>,
    ie: usize,
    reference_det: f64,
    scratch: &mut ElementScratch<L::State>,
    out: &mut ElementBlock<'_>,
) {
    let dim = input.dim();
    let d = dim.value();
    let n_nodes = input.n_nodes();
    let weights = input.basis().weights();
    let nodes = &input.connectivity().element_nodes(ie)[..input.n_local()];

    scratch.kinematics.update(input, ie);
    scratch.states.clear();
    scratch.states.extend(
        scratch
            .kinematics
            .displacement_gradients()
            .iter()
            .map(|grad_u| law.prepare(dim, grad_u)),
    );
    scratch.stresses.clear();
    scratch
        .stresses
        .extend(scratch.states.iter().map(|state| law.stress(state)));

    let kin = &scratch.kinematics;
    let det = input.geometry().det_jacobian(ie);
    let scaling = law.element_scaling(reference_det, det);

    let mut iii = 0;
    let mut ii = 0;
    for (a, &node_a) in nodes.iter().enumerate() {
        for i_c in 0..d {
            let row = node_a + i_c * n_nodes;

            for (b, &node_b) in nodes.iter().enumerate() {
                for j_c in 0..d {
                    let mut aloc = 0.0;
                    for (q, (state, &w)) in scratch.states.iter().zip(weights).enumerate() {
                        let grad_v = component_gradient(i_c, kin.gradient(a, q));
                        let grad_du = component_gradient(j_c, kin.gradient(b, q));
                        let d_p = law.tangent_stress(state, &grad_du);
                        aloc += tensor::frobenius(&grad_v, &d_p) * w;
                    }
                    out.rows[iii] = row;
                    out.cols[iii] = node_b + j_c * n_nodes;
                    out.values[iii] = aloc * det * scaling;
                    iii += 1;
                }
            }

            let mut rloc = 0.0;
            for (q, (p, &w)) in scratch.stresses.iter().zip(weights).enumerate() {
                let grad_v = component_gradient(i_c, kin.gradient(a, q));
                rloc += tensor::frobenius(&grad_v, p) * w;
            }
            out.residual_rows[ii] = row;
            out.residual_values[ii] = rloc * det * scaling;
            ii += 1;
        }
    }
}
