//! Per-joint operation chains, built once per model.
//!
//! Each joint's chain is its parent's chain copied verbatim, followed by the
//! joint's own operations. Joints are built in parent-before-child order so
//! the copy is always available; the prefix property is then re-checked for
//! every joint before the [`Topology`] is handed out.
//!
//! Appended operations per joint:
//!
//! | Joint                         | Own operations                                   |
//! |-------------------------------|--------------------------------------------------|
//! | palm center                   | `Tx Ty Tz` (global), `Rz Rx Ry` (global)         |
//! | wrist left/middle, thumb MCP  | `Rz Rx Ry` (structural), bone                    |
//! | finger MCP                    | `Rz Rx Ry` (structural), bone                    |
//! | thumb PIP                     | `Rz Ry`, bone                                    |
//! | thumb DIP, thumb tip          | `Rz`, bone                                       |
//! | finger base                   | `Rz Rx`, bone                                    |
//! | finger PIP first, DIP         | `Rx`, bone                                       |
//! | finger PIP second, tip        | bone                                             |

use nalgebra::Matrix4;
use tracing::debug;

use crate::config::HandConfig;
use crate::error::{HandModelError, Result};
use crate::operation::{EvalMode, Operation, translation};
use crate::skeleton::{Axis, BONE_COUNT, Bone, Dof, Finger, JOINT_COUNT, Joint};

/// Constant rest transforms, one per bone.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTransforms {
    matrices: Vec<Matrix4<f64>>,
}

impl FixedTransforms {
    /// Translate each bone's rest length along its local axis.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn from_config(config: &HandConfig) -> Result<Self> {
        config.validate()?;
        let matrices = Bone::ALL
            .iter()
            .map(|&bone| {
                let length = bone.direction() * config.bone_length(bone);
                translation(bone.axis(), length, EvalMode::Value)
            })
            .collect();
        Ok(Self { matrices })
    }

    /// The rest transform of `bone`.
    #[must_use]
    pub fn get(&self, bone: Bone) -> &Matrix4<f64> {
        &self.matrices[bone.index()]
    }

    /// Number of stored transforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Whether no transforms are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

/// Operations a joint appends to its parent's chain.
#[must_use]
pub fn local_operations(joint: Joint) -> Vec<Operation> {
    let id = joint.index();
    let mut ops = match joint {
        Joint::PalmCenter => vec![
            Operation::translate(Axis::X, Dof::GlobalTransX),
            Operation::translate(Axis::Y, Dof::GlobalTransY),
            Operation::translate(Axis::Z, Dof::GlobalTransZ),
            Operation::rot_z(Dof::GlobalRotZ),
            Operation::rot_x(Dof::GlobalRotX),
            Operation::rot_y(Dof::GlobalRotY),
        ],
        Joint::WristLeft => palm_fixture(Dof::WristLeftRotX, Dof::WristLeftRotY, Dof::WristLeftRotZ),
        Joint::WristMiddle => palm_fixture(
            Dof::WristMiddleRotX,
            Dof::WristMiddleRotY,
            Dof::WristMiddleRotZ,
        ),
        Joint::ThumbMcp => palm_fixture(Dof::ThumbMcpRotX, Dof::ThumbMcpRotY, Dof::ThumbMcpRotZ),
        Joint::ThumbPip => vec![
            Operation::rot_z(Dof::ThumbPipRotZ),
            Operation::rot_y(Dof::ThumbPipRotY),
        ],
        Joint::ThumbDip => vec![Operation::rot_z(Dof::ThumbDipRotZ)],
        Joint::ThumbTip => vec![Operation::rot_z(Dof::ThumbTipRotZ)],
        Joint::LittleMcp | Joint::RingMcp | Joint::MiddleMcp | Joint::IndexMcp => {
            let finger = Finger::ALL[id - Joint::LittleMcp.index()];
            palm_fixture(
                Dof::mcp_rotation(finger, Axis::X),
                Dof::mcp_rotation(finger, Axis::Y),
                Dof::mcp_rotation(finger, Axis::Z),
            )
        }
        // Finger joints, segment 0 = tip .. 4 = base.
        _ => {
            let finger = Finger::ALL[id / 5];
            match id % 5 {
                4 => vec![
                    Operation::rot_z(Dof::base_rot_z(finger)),
                    Operation::rot_x(Dof::base_rot_x(finger)),
                ],
                3 => vec![Operation::rot_x(Dof::pip_rot_x(finger))],
                1 => vec![Operation::rot_x(Dof::dip_rot_x(finger))],
                _ => Vec::new(),
            }
        }
    };
    if let Some(bone) = joint.bone() {
        ops.push(Operation::Fixed(bone));
    }
    ops
}

fn palm_fixture(x: Dof, y: Dof, z: Dof) -> Vec<Operation> {
    vec![Operation::rot_z(z), Operation::rot_x(x), Operation::rot_y(y)]
}

/// Immutable per-joint chains and bone constants.
///
/// Built once, then shared read-only by every forward and backward call.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    chains: Vec<Vec<Operation>>,
    fixed: FixedTransforms,
}

impl Topology {
    /// Build the reference hand topology.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn build(config: &HandConfig) -> Result<Self> {
        TopologyBuilder::new(config).build()
    }

    /// Assemble a topology from explicit chains, indexed by joint id.
    ///
    /// # Errors
    ///
    /// - [`HandModelError::TableLength`] unless exactly one chain per joint
    ///   is given
    /// - [`HandModelError::PrefixMismatch`] if a chain does not strictly
    ///   extend its parent's chain
    /// - any validation error of `config`
    pub fn from_chains(config: &HandConfig, chains: Vec<Vec<Operation>>) -> Result<Self> {
        let fixed = FixedTransforms::from_config(config)?;
        if chains.len() != JOINT_COUNT {
            return Err(HandModelError::TableLength {
                table: "joint chain",
                expected: JOINT_COUNT,
                actual: chains.len(),
            });
        }
        let topology = Self { chains, fixed };
        topology.verify_prefixes()?;
        Ok(topology)
    }

    /// Keep these chains but take bone constants from `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid or a chain
    /// breaks the prefix property.
    pub fn rebind(self, config: &HandConfig) -> Result<Self> {
        Self::from_chains(config, self.chains)
    }

    /// Check that every chain strictly extends its parent's chain.
    ///
    /// # Errors
    ///
    /// Returns [`HandModelError::PrefixMismatch`] for the first joint that
    /// breaks the property.
    pub fn verify_prefixes(&self) -> Result<()> {
        for joint in Joint::ALL {
            let Some(parent) = joint.parent() else {
                continue;
            };
            let own = self.chain(joint);
            let inherited = self.chain(parent);
            if own.len() <= inherited.len() || !own.starts_with(inherited) {
                return Err(HandModelError::PrefixMismatch { joint, parent });
            }
        }
        Ok(())
    }

    /// Full root-to-joint chain of `joint`.
    #[must_use]
    pub fn chain(&self, joint: Joint) -> &[Operation] {
        &self.chains[joint.index()]
    }

    /// Number of leading operations `joint` shares with its parent.
    #[must_use]
    pub fn parent_chain_len(&self, joint: Joint) -> usize {
        joint.parent().map_or(0, |p| self.chain(p).len())
    }

    /// Operations `joint` adds on top of its parent's chain.
    #[must_use]
    pub fn own_operations(&self, joint: Joint) -> &[Operation] {
        &self.chain(joint)[self.parent_chain_len(joint)..]
    }

    /// Bone rest transforms referenced by [`Operation::Fixed`].
    #[must_use]
    pub fn fixed_transforms(&self) -> &FixedTransforms {
        &self.fixed
    }

    /// Total number of operations over all chains.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }

    /// Joints whose chain depends on `dof`.
    pub fn joints_using(&self, dof: Dof) -> impl Iterator<Item = Joint> + '_ {
        Joint::ALL
            .into_iter()
            .filter(move |&j| self.chain(j).iter().any(|op| op.dof() == Some(dof)))
    }
}

/// Builds chains by walking joints in a given order.
///
/// The default order is [`Joint::FORWARD_ORDER`]. A custom order that visits
/// a joint before its parent is a configuration error.
#[derive(Debug, Clone)]
pub struct TopologyBuilder<'a> {
    config: &'a HandConfig,
    order: Vec<Joint>,
}

impl<'a> TopologyBuilder<'a> {
    /// Builder over the reference order.
    #[must_use]
    pub fn new(config: &'a HandConfig) -> Self {
        Self {
            config,
            order: Joint::FORWARD_ORDER.to_vec(),
        }
    }

    /// Replace the build order.
    #[must_use]
    pub fn with_order(mut self, order: impl IntoIterator<Item = Joint>) -> Self {
        self.order = order.into_iter().collect();
        self
    }

    /// Build the topology.
    ///
    /// # Errors
    ///
    /// - [`HandModelError::UnbuiltParent`] if a joint is visited before its
    ///   parent
    /// - [`HandModelError::MissingJoint`] if the order skips a joint
    /// - any validation error of the configuration
    pub fn build(self) -> Result<Topology> {
        self.config.validate()?;

        let mut built: Vec<Option<Vec<Operation>>> = vec![None; JOINT_COUNT];
        for &joint in &self.order {
            let mut chain = match joint.parent() {
                None => Vec::new(),
                Some(parent) => built[parent.index()]
                    .clone()
                    .ok_or(HandModelError::UnbuiltParent { joint, parent })?,
            };
            chain.extend(local_operations(joint));
            built[joint.index()] = Some(chain);
        }

        let chains = built
            .into_iter()
            .zip(Joint::ALL)
            .map(|(chain, joint)| chain.ok_or(HandModelError::MissingJoint(joint)))
            .collect::<Result<Vec<_>>>()?;

        let topology = Topology::from_chains(self.config, chains)?;
        debug!(
            joints = JOINT_COUNT,
            bones = BONE_COUNT,
            operations = topology.operation_count(),
            "Built hand topology"
        );
        Ok(topology)
    }
}
