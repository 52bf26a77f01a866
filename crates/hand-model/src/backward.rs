//! Analytic Jacobian of joint positions with respect to DoFs.
//!
//! For a joint whose chain is `op[0] · op[1] · … · op[n-1]`, the position is
//! `M · o` with `o = (0, 0, 0, 1)`. A DoF that only appears in `op[r]`
//! contributes
//!
//! ```text
//! ∂(M·o)/∂θ = left[r] · D(op[r]) · right[r]
//! left[r]  = op[0] · … · op[r-1]            (prefix, full matrix)
//! right[r] = op[r+1] · … · op[n-1] · o      (suffix, applied to o)
//! ```
//!
//! where `D` is the derivative-mode matrix. Suffixes are kept as vectors, so
//! a chain of length `n` costs `O(n)` matrix products instead of `O(n²)`.
//!
//! Fixed DoFs never get an entry: their column stays exactly zero.

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::error::{HandModelError, Result};
use crate::forward::origin;
use crate::operation::EvalMode;
use crate::resolver::ParameterResolver;
use crate::skeleton::{DOF_COUNT, Dof, JOINT_COUNT, Joint, POSITION_WIDTH};
use crate::topology::Topology;

/// Per-sample table of `∂position[joint] / ∂dof`.
///
/// Entry `(j, d)` is non-zero only when `d` is free and appears in the chain
/// of `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct JacobianTable {
    entries: Vec<Vector3<f64>>,
    free: [bool; DOF_COUNT],
}

impl JacobianTable {
    fn zeros(resolver: &ParameterResolver<'_>) -> Self {
        let mut free = [false; DOF_COUNT];
        for dof in Dof::ALL {
            free[dof.index()] = resolver.is_free(dof);
        }
        Self {
            entries: vec![Vector3::zeros(); JOINT_COUNT * DOF_COUNT],
            free,
        }
    }

    /// Partial derivative of `joint`'s position with respect to `dof`.
    #[must_use]
    pub fn get(&self, joint: Joint, dof: Dof) -> Vector3<f64> {
        self.entries[joint.index() * DOF_COUNT + dof.index()]
    }

    /// All partials of one joint, indexed by DoF.
    #[must_use]
    pub fn joint_row(&self, joint: Joint) -> &[Vector3<f64>] {
        let start = joint.index() * DOF_COUNT;
        &self.entries[start..start + DOF_COUNT]
    }

    fn joint_row_mut(&mut self, joint: Joint) -> &mut [Vector3<f64>] {
        let start = joint.index() * DOF_COUNT;
        &mut self.entries[start..start + DOF_COUNT]
    }

    /// Contract the table with an upstream gradient over joint positions.
    ///
    /// `upstream` is laid out like
    /// [`JointPositions::to_flat`](crate::JointPositions::to_flat). The result
    /// holds one value per DoF; fixed DoFs are exactly zero even if the
    /// upstream gradient is not finite.
    ///
    /// # Errors
    ///
    /// Returns [`HandModelError::GradientWidth`] unless `upstream` holds
    /// [`POSITION_WIDTH`] values.
    pub fn vector_jacobian_product(&self, upstream: &[f64]) -> Result<Vec<f64>> {
        if upstream.len() != POSITION_WIDTH {
            return Err(HandModelError::GradientWidth {
                expected: POSITION_WIDTH,
                actual: upstream.len(),
            });
        }

        let mut grad = vec![0.0; DOF_COUNT];
        for dof in Dof::ALL {
            if !self.free[dof.index()] {
                continue;
            }
            grad[dof.index()] = Joint::ALL
                .iter()
                .zip(upstream.chunks_exact(3))
                .map(|(&joint, g)| self.get(joint, dof).dot(&Vector3::new(g[0], g[1], g[2])))
                .sum();
        }
        Ok(grad)
    }
}

/// Accumulate the partials of one joint into `row` (indexed by DoF).
fn joint_jacobian(
    topology: &Topology,
    resolver: &ParameterResolver<'_>,
    joint: Joint,
    row: &mut [Vector3<f64>],
) {
    let constants = topology.fixed_transforms();
    let chain = topology.chain(joint);
    let values: Vec<Matrix4<f64>> = chain
        .iter()
        .map(|op| op.matrix(resolver, constants, EvalMode::Value))
        .collect();

    let n = chain.len();
    let mut right: Vec<Vector4<f64>> = vec![origin(); n];
    for r in (0..n.saturating_sub(1)).rev() {
        right[r] = values[r + 1] * right[r + 1];
    }

    let mut left = Matrix4::identity();
    for (r, op) in chain.iter().enumerate() {
        if let Some(dof) = op.dof().filter(|&d| resolver.is_free(d)) {
            let derivative = op.matrix(resolver, constants, EvalMode::Derivative);
            row[dof.index()] += (left * (derivative * right[r])).xyz();
        }
        left *= values[r];
    }
}

/// Compute the full Jacobian table for one sample.
#[must_use]
pub fn jacobian(topology: &Topology, resolver: &ParameterResolver<'_>) -> JacobianTable {
    let mut table = JacobianTable::zeros(resolver);
    for joint in Joint::ALL {
        joint_jacobian(topology, resolver, joint, table.joint_row_mut(joint));
    }
    table
}

/// Gradient of a scalar loss with respect to one sample's DoFs.
///
/// # Errors
///
/// Returns [`HandModelError::GradientWidth`] if `upstream` is not
/// [`POSITION_WIDTH`] wide.
pub fn backward(
    topology: &Topology,
    resolver: &ParameterResolver<'_>,
    upstream: &[f64],
) -> Result<Vec<f64>> {
    jacobian(topology, resolver).vector_jacobian_product(upstream)
}
