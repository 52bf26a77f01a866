//! Error types for hand model construction and evaluation.

use crate::skeleton::{Bone, Dof, Joint};

/// Errors raised while building or evaluating a [`HandModel`](crate::HandModel).
///
/// Two families exist. Configuration errors abort model construction and
/// cannot be recovered from. Shape errors reject a single call before any
/// work is done, so no partial output is ever produced.
///
/// Non-finite numbers are not errors: NaN and infinity flow through the
/// kinematics untouched.
///
/// # Example
///
/// ```
/// use hand_model::HandModelError;
///
/// let error = HandModelError::DofWidth { expected: 47, actual: 12 };
/// assert!(error.is_shape());
/// assert!(error.to_string().contains("47"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum HandModelError {
    /// A configuration table has the wrong number of entries.
    #[error("{table} table has {actual} entries, expected {expected}")]
    TableLength {
        /// Name of the table.
        table: &'static str,
        /// Required entry count.
        expected: usize,
        /// Entry count supplied.
        actual: usize,
    },

    /// A bone length is zero, negative or not finite.
    #[error("bone {bone:?} has invalid length {value}")]
    InvalidBoneLength {
        /// The offending bone.
        bone: Bone,
        /// The supplied length.
        value: f64,
    },

    /// A DoF base offset is not finite.
    #[error("base offset of {dof:?} is not finite: {value}")]
    NonFiniteOffset {
        /// The offending DoF.
        dof: Dof,
        /// The supplied offset.
        value: f64,
    },

    /// A joint was reached before the joint it extends.
    #[error("joint {joint:?} declared before its parent {parent:?}")]
    UnbuiltParent {
        /// Joint being built.
        joint: Joint,
        /// Parent that has not been built yet.
        parent: Joint,
    },

    /// A joint chain does not start with its parent's chain.
    #[error("chain of {joint:?} does not extend the chain of {parent:?}")]
    PrefixMismatch {
        /// Joint whose chain is malformed.
        joint: Joint,
        /// Parent whose chain should be the prefix.
        parent: Joint,
    },

    /// A build order left a joint out.
    #[error("joint {0:?} was never built")]
    MissingJoint(Joint),

    /// An input row does not have one value per DoF.
    #[error("DoF input has width {actual}, expected {expected}")]
    DofWidth {
        /// Required width.
        expected: usize,
        /// Width supplied.
        actual: usize,
    },

    /// An upstream gradient row does not match the joint position layout.
    #[error("upstream gradient has width {actual}, expected {expected}")]
    GradientWidth {
        /// Required width.
        expected: usize,
        /// Width supplied.
        actual: usize,
    },

    /// Forward inputs and upstream gradients disagree on batch size.
    #[error("batch size mismatch: {inputs} input rows, {gradients} gradient rows")]
    BatchMismatch {
        /// Rows in the DoF batch.
        inputs: usize,
        /// Rows in the gradient batch.
        gradients: usize,
    },
}

impl HandModelError {
    /// Returns `true` for errors that abort model construction.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::TableLength { .. }
                | Self::InvalidBoneLength { .. }
                | Self::NonFiniteOffset { .. }
                | Self::UnbuiltParent { .. }
                | Self::PrefixMismatch { .. }
                | Self::MissingJoint(_)
        )
    }

    /// Returns `true` for per-call tensor shape errors.
    #[must_use]
    pub const fn is_shape(&self) -> bool {
        matches!(
            self,
            Self::DofWidth { .. } | Self::GradientWidth { .. } | Self::BatchMismatch { .. }
        )
    }
}

/// Result type for hand model operations.
pub type Result<T> = std::result::Result<T, HandModelError>;
