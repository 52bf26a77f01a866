//! Effective DoF values for one sample.

use crate::config::HandConfig;
use crate::error::{HandModelError, Result};
use crate::operation::EvalMode;
use crate::skeleton::{DOF_COUNT, Dof};

/// Resolves the effective value of each DoF for one input row.
///
/// A free DoF evaluates to `input + offset`; a fixed DoF evaluates to its
/// offset alone, whatever the input holds.
#[derive(Debug, Clone, Copy)]
pub struct ParameterResolver<'a> {
    config: &'a HandConfig,
    inputs: &'a [f64],
}

impl<'a> ParameterResolver<'a> {
    /// Bind a configuration to one input row.
    ///
    /// # Errors
    ///
    /// - a configuration error if `config` does not validate
    /// - [`HandModelError::DofWidth`] unless `inputs` holds exactly
    ///   [`DOF_COUNT`] values
    pub fn new(config: &'a HandConfig, inputs: &'a [f64]) -> Result<Self> {
        config.validate()?;
        if inputs.len() != DOF_COUNT {
            return Err(HandModelError::DofWidth {
                expected: DOF_COUNT,
                actual: inputs.len(),
            });
        }
        Ok(Self { config, inputs })
    }

    /// Resolve `dof` in the given mode.
    ///
    /// In [`EvalMode::Value`] this is the effective value. In
    /// [`EvalMode::Derivative`] it is d(effective value)/d(input): `1` for a
    /// free DoF and exactly `0` for a fixed one.
    #[must_use]
    pub fn resolve(&self, dof: Dof, mode: EvalMode) -> f64 {
        match mode {
            EvalMode::Value => self.value(dof),
            EvalMode::Derivative => {
                if self.is_free(dof) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Effective value of `dof`.
    #[must_use]
    pub fn value(&self, dof: Dof) -> f64 {
        let offset = self.config.offset(dof);
        if self.config.is_fixed(dof) {
            offset
        } else {
            self.inputs[dof.index()] + offset
        }
    }

    /// Whether `dof` is trainable.
    #[must_use]
    pub fn is_free(&self, dof: Dof) -> bool {
        !self.config.is_fixed(dof)
    }
}
