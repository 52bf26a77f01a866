//! Differentiable forward kinematics for an articulated hand skeleton.
//!
//! This crate maps a row of 47 pose parameters (DoFs) to the world positions
//! of 31 hand joints, and computes the exact analytic Jacobian of those
//! positions with respect to the DoFs. It is meant to sit inside a
//! gradient-based training loop as a differentiable layer:
//!
//! - [`HandModel::forward`] / [`HandModel::forward_batch`] - joint positions
//! - [`HandModel::jacobian`] - per-sample `∂position/∂dof` table
//! - [`HandModel::backward`] / [`HandModel::backward_batch`] - DoF gradients
//!   from an upstream gradient over joint positions
//!
//! # Model
//!
//! Every joint owns a chain of elementary [`Operation`]s (rotations and
//! translations driven by DoFs, plus constant bone offsets). A child's chain
//! always starts with its parent's entire chain, which the [`Topology`]
//! verifies once at construction. The forward pass therefore reuses each
//! parent's cumulative transform, and the backward pass uses prefix/suffix
//! partial products so a chain of length `n` costs `O(n)`.
//!
//! DoFs flagged as fixed in the [`HandConfig`] evaluate to their base offset
//! whatever the input holds, and always receive a zero gradient.
//!
//! # Example
//!
//! ```
//! use hand_model::{DOF_COUNT, Dof, HandConfig, HandModel, Joint};
//! use nalgebra::DMatrix;
//!
//! let model = HandModel::new(HandConfig::default())?;
//!
//! // Two samples: rest pose, and a flexed index finger.
//! let mut dofs = DMatrix::zeros(2, DOF_COUNT);
//! dofs[(1, Dof::IndexPipRotX.index())] = 0.8;
//!
//! let positions = model.forward_batch(&dofs)?;
//! assert_eq!(positions.shape(), (2, 93));
//!
//! let table = model.jacobian(&vec![0.0; DOF_COUNT])?;
//! let d_tip = table.get(Joint::IndexTip, Dof::IndexPipRotX);
//! assert!(d_tip.norm() > 0.0);
//! # Ok::<(), hand_model::HandModelError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default): evaluate batch samples across cores with rayon
//! - `serde`: `Serialize`/`Deserialize` for [`HandConfig`] and the
//!   identifier enums

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod backward;
mod batch;
mod config;
mod error;
mod forward;
mod model;
mod operation;
mod resolver;
mod skeleton;
mod topology;

pub use backward::{JacobianTable, backward, jacobian};
pub use config::HandConfig;
pub use error::{HandModelError, Result};
pub use forward::{JointPositions, JointState, forward, forward_states};
pub use model::HandModel;
pub use operation::{EvalMode, Operation, rotation, translation};
pub use resolver::ParameterResolver;
pub use skeleton::{
    Axis, BONE_COUNT, Bone, DOF_COUNT, Dof, FREE_DOF_COUNT, Finger, JOINT_COUNT, Joint,
    POSITION_WIDTH,
};
pub use topology::{FixedTransforms, Topology, TopologyBuilder, local_operations};

// Re-export nalgebra types for convenience
pub use nalgebra::{DMatrix, Matrix4, Vector3};
