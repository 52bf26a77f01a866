//! Forward kinematics: joint world positions from one DoF row.
//!
//! Joints are visited in [`Joint::FORWARD_ORDER`]. Each joint starts from its
//! parent's cumulative transform and right-multiplies only the operations its
//! chain adds on top of the parent's, so shared ancestor work is done once.

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::operation::EvalMode;
use crate::resolver::ParameterResolver;
use crate::skeleton::{JOINT_COUNT, Joint};
use crate::topology::Topology;

/// Homogeneous local origin `(0, 0, 0, 1)`.
pub(crate) fn origin() -> Vector4<f64> {
    Vector4::new(0.0, 0.0, 0.0, 1.0)
}

/// Cumulative root-to-joint transform and the resulting world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointState {
    /// Product of the joint's chain.
    pub transform: Matrix4<f64>,
    /// World position of the joint's local origin.
    pub position: Vector3<f64>,
}

impl JointState {
    fn from_transform(transform: Matrix4<f64>) -> Self {
        Self {
            transform,
            position: (transform * origin()).xyz(),
        }
    }
}

impl Default for JointState {
    fn default() -> Self {
        Self::from_transform(Matrix4::identity())
    }
}

/// World positions of all joints for one sample, in joint id order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPositions {
    positions: [Vector3<f64>; JOINT_COUNT],
}

impl JointPositions {
    /// Position of `joint`.
    #[must_use]
    pub fn position(&self, joint: Joint) -> Vector3<f64> {
        self.positions[joint.index()]
    }

    /// All positions, indexed by joint id.
    #[must_use]
    pub fn as_slice(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    /// Iterator over `(joint, position)` pairs in joint id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Joint, Vector3<f64>)> + '_ {
        Joint::ALL.iter().map(|&j| (j, self.positions[j.index()]))
    }

    /// Flattened `x, y, z` per joint, [`POSITION_WIDTH`](crate::POSITION_WIDTH) values.
    #[must_use]
    pub fn to_flat(&self) -> Vec<f64> {
        self.positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }
}

impl JointPositions {
    /// `states` must hold one entry per joint, as [`forward_states`] returns.
    fn from_states(states: &[JointState]) -> Self {
        Self {
            positions: std::array::from_fn(|i| states[i].position),
        }
    }
}

/// Evaluate every joint's cumulative transform, indexed by joint id.
#[must_use]
pub fn forward_states(topology: &Topology, resolver: &ParameterResolver<'_>) -> Vec<JointState> {
    let constants = topology.fixed_transforms();
    let mut states = vec![JointState::default(); JOINT_COUNT];

    for joint in Joint::FORWARD_ORDER {
        let mut transform = joint
            .parent()
            .map_or_else(Matrix4::identity, |p| states[p.index()].transform);

        for op in topology.own_operations(joint) {
            transform *= op.matrix(resolver, constants, EvalMode::Value);
        }
        states[joint.index()] = JointState::from_transform(transform);
    }

    states
}

/// Evaluate every joint's world position.
#[must_use]
pub fn forward(topology: &Topology, resolver: &ParameterResolver<'_>) -> JointPositions {
    JointPositions::from_states(&forward_states(topology, resolver))
}
