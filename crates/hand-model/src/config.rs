//! Construction-time configuration of the hand skeleton.
//!
//! A [`HandConfig`] holds the three tables a model is built from: one base
//! offset per DoF, one fixed/free flag per DoF, and one rest length per bone.
//! Loading these from files is left to the caller; with the `serde` feature
//! the struct can be deserialized directly.
//!
//! # Example
//!
//! ```
//! use hand_model::{Bone, Dof, HandConfig};
//!
//! let config = HandConfig::default()
//!     .with_offset(Dof::IndexBaseRotX, 0.2)
//!     .with_bone_length(Bone::IndexTipToDip, 17.5)
//!     .with_fixed(Dof::GlobalTransZ, true);
//!
//! assert!(config.validate().is_ok());
//! assert!(config.is_fixed(Dof::GlobalTransZ));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{HandModelError, Result};
use crate::skeleton::{BONE_COUNT, Bone, DOF_COUNT, Dof};

/// Structural angles of the reference rest pose, indexed by [`Dof`].
///
/// Only the palm-fixing rotations carry non-zero values; every trainable DoF
/// starts at zero.
const REFERENCE_OFFSETS: [f64; DOF_COUNT] = [
    // global translation and rotation
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
    // wrist left, wrist middle, thumb MCP (x, y, z)
    0.0, 0.0, 0.55, 0.0, 0.0, 0.0, 0.0, 0.25, -0.65, //
    // thumb PIP y, PIP z, DIP z, tip z
    0.0, 0.0, 0.0, 0.0, //
    // little, ring, middle, index MCP (x, y, z)
    0.0, 0.0, 0.42, 0.0, 0.0, 0.15, 0.0, 0.0, 0.0, 0.0, 0.0, -0.18, //
    // per finger base x, base z, pip x, dip x
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];

/// Rest bone lengths in millimetres, indexed by [`Bone`].
const REFERENCE_BONE_LENGTHS: [f64; BONE_COUNT] = [
    // little, ring, middle, index: tip-dip, dip-pip2, pip2-pip1, pip1-base, base-mcp
    16.0, 5.0, 13.0, 24.0, 8.0, //
    18.0, 5.0, 16.0, 30.0, 8.0, //
    19.0, 5.0, 17.0, 32.0, 8.0, //
    18.0, 5.0, 15.0, 29.0, 8.0, //
    // MCP to palm center
    48.0, 44.0, 42.0, 45.0, //
    // palm center to wrist left, wrist middle, thumb MCP
    40.0, 42.0, 38.0, //
    // thumb MCP-PIP, PIP-DIP, DIP-tip
    32.0, 28.0, 24.0,
];

/// Configuration tables for a hand model.
///
/// Tables are plain vectors so that external loaders can fill them; call
/// [`HandConfig::validate`] (or build a [`HandModel`](crate::HandModel),
/// which does so) before relying on their lengths.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandConfig {
    /// Base offset added to every DoF, one per [`Dof`] (radians or length
    /// units for the global translations).
    pub dof_offsets: Vec<f64>,
    /// Whether each DoF is fixed to its base offset, one per [`Dof`].
    pub fixed: Vec<bool>,
    /// Rest length of each bone, one per [`Bone`].
    pub bone_lengths: Vec<f64>,
}

impl Default for HandConfig {
    /// The reference rest pose: structural DoFs fixed, anatomical bone lengths.
    fn default() -> Self {
        Self {
            dof_offsets: REFERENCE_OFFSETS.to_vec(),
            fixed: Dof::ALL.iter().map(|d| d.is_structural()).collect(),
            bone_lengths: REFERENCE_BONE_LENGTHS.to_vec(),
        }
    }
}

impl HandConfig {
    /// Create a configuration from raw tables, validating them.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a table has the wrong length, an
    /// offset is not finite or a bone length is not strictly positive.
    pub fn new(dof_offsets: Vec<f64>, fixed: Vec<bool>, bone_lengths: Vec<f64>) -> Result<Self> {
        let config = Self {
            dof_offsets,
            fixed,
            bone_lengths,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reference configuration with every DoF free, structural ones included.
    #[must_use]
    pub fn all_free() -> Self {
        Self {
            fixed: vec![false; DOF_COUNT],
            ..Self::default()
        }
    }

    /// Set the base offset of one DoF.
    #[must_use]
    pub fn with_offset(mut self, dof: Dof, offset: f64) -> Self {
        if let Some(slot) = self.dof_offsets.get_mut(dof.index()) {
            *slot = offset;
        }
        self
    }

    /// Mark one DoF as fixed or free.
    #[must_use]
    pub fn with_fixed(mut self, dof: Dof, fixed: bool) -> Self {
        if let Some(slot) = self.fixed.get_mut(dof.index()) {
            *slot = fixed;
        }
        self
    }

    /// Set the rest length of one bone.
    #[must_use]
    pub fn with_bone_length(mut self, bone: Bone, length: f64) -> Self {
        if let Some(slot) = self.bone_lengths.get_mut(bone.index()) {
            *slot = length;
        }
        self
    }

    /// Scale every bone length by `factor`.
    #[must_use]
    pub fn scaled(mut self, factor: f64) -> Self {
        for length in &mut self.bone_lengths {
            *length *= factor;
        }
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// - [`HandModelError::TableLength`] if any table is not sized to its
    ///   enum
    /// - [`HandModelError::NonFiniteOffset`] for a NaN or infinite offset
    /// - [`HandModelError::InvalidBoneLength`] for a non-positive or
    ///   non-finite bone length
    pub fn validate(&self) -> Result<()> {
        check_len("DoF offset", DOF_COUNT, self.dof_offsets.len())?;
        check_len("fixed flag", DOF_COUNT, self.fixed.len())?;
        check_len("bone length", BONE_COUNT, self.bone_lengths.len())?;

        for (dof, &value) in Dof::ALL.iter().zip(&self.dof_offsets) {
            if !value.is_finite() {
                return Err(HandModelError::NonFiniteOffset { dof: *dof, value });
            }
        }

        for (bone, &value) in Bone::ALL.iter().zip(&self.bone_lengths) {
            if !value.is_finite() || value <= 0.0 {
                return Err(HandModelError::InvalidBoneLength { bone: *bone, value });
            }
        }

        Ok(())
    }

    /// Base offset of `dof`.
    ///
    /// # Panics
    ///
    /// Panics if the offset table is shorter than [`DOF_COUNT`]; a validated
    /// configuration never is.
    #[must_use]
    pub fn offset(&self, dof: Dof) -> f64 {
        self.dof_offsets[dof.index()]
    }

    /// Whether `dof` is fixed to its base offset.
    ///
    /// # Panics
    ///
    /// Panics if the flag table is shorter than [`DOF_COUNT`]; a validated
    /// configuration never is.
    #[must_use]
    pub fn is_fixed(&self, dof: Dof) -> bool {
        self.fixed[dof.index()]
    }

    /// Rest length of `bone`.
    ///
    /// # Panics
    ///
    /// Panics if the length table is shorter than [`BONE_COUNT`]; a validated
    /// configuration never is.
    #[must_use]
    pub fn bone_length(&self, bone: Bone) -> f64 {
        self.bone_lengths[bone.index()]
    }

    /// Iterator over the trainable DoFs.
    pub fn free_dofs(&self) -> impl Iterator<Item = Dof> + '_ {
        Dof::ALL.into_iter().filter(|&d| !self.is_fixed(d))
    }

    /// Number of trainable DoFs.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_dofs().count()
    }
}

fn check_len(table: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(HandModelError::TableLength {
            table,
            expected,
            actual,
        })
    }
}
