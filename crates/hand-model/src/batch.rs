//! Batched evaluation over host tensors.
//!
//! Host tensors are [`DMatrix`] values with one sample per row: DoFs are
//! `batch × DOF_COUNT`, joint positions and their upstream gradients are
//! `batch × POSITION_WIDTH`, DoF gradients are `batch × DOF_COUNT`.
//!
//! Samples are independent. When the `parallel` feature is enabled they are
//! evaluated across CPU cores via rayon; otherwise sequentially. Both paths
//! produce identical rows, and every row depends only on its own input row.
//!
//! Shapes are checked before any sample is evaluated, so a shape error never
//! leaves a partially filled output behind.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{HandModelError, Result};
use crate::model::HandModel;
use crate::skeleton::{DOF_COUNT, POSITION_WIDTH};

impl HandModel {
    /// Joint positions for every row of `dofs`.
    ///
    /// # Errors
    ///
    /// Returns [`HandModelError::DofWidth`] if `dofs` does not have
    /// [`DOF_COUNT`] columns.
    pub fn forward_batch(&self, dofs: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        check_width(dofs, DOF_COUNT, |expected, actual| HandModelError::DofWidth {
            expected,
            actual,
        })?;
        let batch = dofs.nrows();
        debug!(batch, parallel = cfg!(feature = "parallel"), "Forward batch");

        let rows = per_sample(batch, |i| {
            let input = row_of(dofs, i);
            self.forward(&input).map(|p| p.to_flat())
        })?;
        Ok(assemble(batch, POSITION_WIDTH, &rows))
    }

    /// DoF gradients for every row, given upstream gradients over joint
    /// positions.
    ///
    /// Fixed DoF columns of the result are exactly zero.
    ///
    /// # Errors
    ///
    /// - [`HandModelError::DofWidth`] if `dofs` does not have [`DOF_COUNT`]
    ///   columns
    /// - [`HandModelError::GradientWidth`] if `upstream` does not have
    ///   [`POSITION_WIDTH`] columns
    /// - [`HandModelError::BatchMismatch`] if the row counts differ
    pub fn backward_batch(
        &self,
        dofs: &DMatrix<f64>,
        upstream: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>> {
        check_width(dofs, DOF_COUNT, |expected, actual| HandModelError::DofWidth {
            expected,
            actual,
        })?;
        check_width(upstream, POSITION_WIDTH, |expected, actual| {
            HandModelError::GradientWidth { expected, actual }
        })?;
        if dofs.nrows() != upstream.nrows() {
            return Err(HandModelError::BatchMismatch {
                inputs: dofs.nrows(),
                gradients: upstream.nrows(),
            });
        }
        let batch = dofs.nrows();
        debug!(batch, parallel = cfg!(feature = "parallel"), "Backward batch");

        let rows = per_sample(batch, |i| {
            let input = row_of(dofs, i);
            let grad = row_of(upstream, i);
            self.backward(&input, &grad)
        })?;
        Ok(assemble(batch, DOF_COUNT, &rows))
    }
}

fn check_width(
    tensor: &DMatrix<f64>,
    expected: usize,
    error: impl FnOnce(usize, usize) -> HandModelError,
) -> Result<()> {
    if tensor.ncols() == expected {
        Ok(())
    } else {
        Err(error(expected, tensor.ncols()))
    }
}

fn row_of(tensor: &DMatrix<f64>, i: usize) -> Vec<f64> {
    tensor.row(i).iter().copied().collect()
}

fn assemble(batch: usize, width: usize, rows: &[Vec<f64>]) -> DMatrix<f64> {
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    DMatrix::from_row_slice(batch, width, &flat)
}

fn per_sample<T, F>(batch: usize, eval: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
        (0..batch).into_par_iter().map(eval).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..batch).map(eval).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::HandConfig;
    use crate::skeleton::Dof;

    fn model() -> HandModel {
        HandModel::new(HandConfig::default()).unwrap()
    }

    #[test]
    fn test_forward_batch_shape() {
        let dofs = DMatrix::zeros(5, DOF_COUNT);
        let out = model().forward_batch(&dofs).unwrap();
        assert_eq!(out.shape(), (5, POSITION_WIDTH));
    }

    #[test]
    fn test_empty_batch() {
        let model = model();
        let out = model.forward_batch(&DMatrix::zeros(0, DOF_COUNT)).unwrap();
        assert_eq!(out.shape(), (0, POSITION_WIDTH));
        let grad = model
            .backward_batch(&DMatrix::zeros(0, DOF_COUNT), &DMatrix::zeros(0, POSITION_WIDTH))
            .unwrap();
        assert_eq!(grad.shape(), (0, DOF_COUNT));
    }

    #[test]
    fn test_rows_match_single_sample() {
        let model = model();
        let mut dofs = DMatrix::zeros(3, DOF_COUNT);
        dofs[(1, Dof::IndexBaseRotX.index())] = 0.4;
        dofs[(2, Dof::GlobalRotZ.index())] = -0.8;

        let out = model.forward_batch(&dofs).unwrap();
        for i in 0..3 {
            let single = model.forward(&row_of(&dofs, i)).unwrap().to_flat();
            assert_eq!(row_of(&out, i), single);
        }
    }

    #[test]
    fn test_width_errors() {
        let model = model();
        let err = model.forward_batch(&DMatrix::zeros(2, 46)).unwrap_err();
        assert_eq!(
            err,
            HandModelError::DofWidth {
                expected: DOF_COUNT,
                actual: 46,
            }
        );

        let err = model
            .backward_batch(&DMatrix::zeros(2, DOF_COUNT), &DMatrix::zeros(2, 90))
            .unwrap_err();
        assert!(matches!(err, HandModelError::GradientWidth { actual: 90, .. }));
    }

    #[test]
    fn test_batch_mismatch() {
        let err = model()
            .backward_batch(&DMatrix::zeros(4, DOF_COUNT), &DMatrix::zeros(3, POSITION_WIDTH))
            .unwrap_err();
        assert_eq!(
            err,
            HandModelError::BatchMismatch {
                inputs: 4,
                gradients: 3,
            }
        );
    }
}
