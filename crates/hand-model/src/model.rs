//! The differentiable hand model: configuration plus built topology.

use std::sync::Arc;

use tracing::info;

use crate::backward::{JacobianTable, jacobian};
use crate::config::HandConfig;
use crate::error::Result;
use crate::forward::{JointPositions, JointState, forward, forward_states};
use crate::resolver::ParameterResolver;
use crate::topology::Topology;

/// A hand skeleton ready for forward and backward evaluation.
///
/// Configuration and topology are immutable after construction and shared
/// behind [`Arc`], so a model is cheap to clone and can be used from many
/// threads at once. Every call allocates its own per-sample state.
///
/// # Example
///
/// ```
/// use hand_model::{DOF_COUNT, Dof, HandConfig, HandModel, Joint, POSITION_WIDTH};
///
/// let model = HandModel::new(HandConfig::default())?;
///
/// let mut dofs = vec![0.0; DOF_COUNT];
/// dofs[Dof::GlobalTransX.index()] = 5.0;
/// let positions = model.forward(&dofs)?;
/// assert_eq!(positions.position(Joint::PalmCenter).x, 5.0);
///
/// let upstream = vec![1.0; POSITION_WIDTH];
/// let grad = model.backward(&dofs, &upstream)?;
/// assert_eq!(grad.len(), DOF_COUNT);
/// assert_eq!(grad[Dof::WristLeftRotZ.index()], 0.0); // fixed
/// # Ok::<(), hand_model::HandModelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HandModel {
    config: Arc<HandConfig>,
    topology: Arc<Topology>,
}

impl HandModel {
    /// Validate `config` and build the joint chains.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn new(config: HandConfig) -> Result<Self> {
        let topology = Topology::build(&config)?;
        info!(
            free_dofs = config.free_count(),
            operations = topology.operation_count(),
            "Hand model ready"
        );
        Ok(Self {
            config: Arc::new(config),
            topology: Arc::new(topology),
        })
    }

    /// Model over the chains of an already built topology.
    ///
    /// Bone constants are rebuilt from `config`, so the geometry always
    /// matches [`HandModel::config`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid or the topology
    /// breaks the prefix property.
    pub fn with_topology(config: HandConfig, topology: Topology) -> Result<Self> {
        let topology = topology.rebind(&config)?;
        Ok(Self {
            config: Arc::new(config),
            topology: Arc::new(topology),
        })
    }

    /// The configuration this model was built from.
    #[must_use]
    pub fn config(&self) -> &HandConfig {
        &self.config
    }

    /// The joint chains.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Bind one DoF row to this model's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HandModelError::DofWidth`](crate::HandModelError::DofWidth)
    /// if `dofs` is not [`DOF_COUNT`](crate::DOF_COUNT) wide.
    pub fn resolver<'a>(&'a self, dofs: &'a [f64]) -> Result<ParameterResolver<'a>> {
        ParameterResolver::new(&self.config, dofs)
    }

    /// Joint world positions for one sample.
    ///
    /// # Errors
    ///
    /// Returns a shape error if `dofs` is not [`DOF_COUNT`](crate::DOF_COUNT)
    /// wide.
    pub fn forward(&self, dofs: &[f64]) -> Result<JointPositions> {
        Ok(forward(&self.topology, &self.resolver(dofs)?))
    }

    /// Cumulative transforms and positions for one sample, indexed by joint id.
    ///
    /// # Errors
    ///
    /// Returns a shape error if `dofs` is not [`DOF_COUNT`](crate::DOF_COUNT)
    /// wide.
    pub fn forward_states(&self, dofs: &[f64]) -> Result<Vec<JointState>> {
        Ok(forward_states(&self.topology, &self.resolver(dofs)?))
    }

    /// Jacobian table for one sample.
    ///
    /// # Errors
    ///
    /// Returns a shape error if `dofs` is not [`DOF_COUNT`](crate::DOF_COUNT)
    /// wide.
    pub fn jacobian(&self, dofs: &[f64]) -> Result<JacobianTable> {
        Ok(jacobian(&self.topology, &self.resolver(dofs)?))
    }

    /// DoF gradient for one sample given the upstream gradient over joint
    /// positions.
    ///
    /// # Errors
    ///
    /// Returns a shape error if `dofs` is not [`DOF_COUNT`](crate::DOF_COUNT)
    /// wide or `upstream` is not [`POSITION_WIDTH`](crate::POSITION_WIDTH)
    /// wide.
    pub fn backward(&self, dofs: &[f64], upstream: &[f64]) -> Result<Vec<f64>> {
        crate::backward::backward(&self.topology, &self.resolver(dofs)?, upstream)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::HandModelError;
    use crate::skeleton::{Bone, DOF_COUNT, Dof, Joint, POSITION_WIDTH};
    use approx::assert_relative_eq;

    #[test]
    fn test_model_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HandModel>();
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = HandConfig::default().with_bone_length(Bone::ThumbMcpToPip, -1.0);
        let err = HandModel::new(config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_shape_errors() {
        let model = HandModel::new(HandConfig::default()).unwrap();
        assert!(matches!(
            model.forward(&[0.0; 10]).unwrap_err(),
            HandModelError::DofWidth {
                expected: DOF_COUNT,
                actual: 10,
            }
        ));
        assert!(model.jacobian(&[]).unwrap_err().is_shape());
        assert!(matches!(
            model.backward(&[0.0; DOF_COUNT], &[0.0; 3]).unwrap_err(),
            HandModelError::GradientWidth { .. }
        ));
    }

    #[test]
    fn test_with_topology_uses_config_bone_lengths() {
        let topology = Topology::build(&HandConfig::default()).unwrap();
        let config = HandConfig::default().scaled(2.0);
        let model = HandModel::with_topology(config, topology).unwrap();

        let positions = model.forward(&[0.0; DOF_COUNT]).unwrap();
        let segment = positions.position(Joint::ThumbTip) - positions.position(Joint::ThumbDip);
        assert_eq!(model.config().bone_length(Bone::ThumbDipToTip), 48.0);
        assert_relative_eq!(segment.norm(), 48.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clone_shares_topology() {
        let model = HandModel::new(HandConfig::default()).unwrap();
        let copy = model.clone();
        assert!(Arc::ptr_eq(&model.topology, &copy.topology));
    }

    #[test]
    fn test_with_topology() {
        let config = HandConfig::default();
        let topology = Topology::build(&config).unwrap();
        let model = HandModel::with_topology(config, topology).unwrap();

        let dofs = [0.0; DOF_COUNT];
        let states = model.forward_states(&dofs).unwrap();
        let positions = model.forward(&dofs).unwrap();
        assert_eq!(states[Joint::ThumbTip.index()].position, positions.position(Joint::ThumbTip));

        let grad = model.backward(&dofs, &[0.0; POSITION_WIDTH]).unwrap();
        assert!(grad.iter().all(|g| *g == 0.0));
        assert_eq!(model.config().offset(Dof::GlobalRotX), 0.0);
    }
}
