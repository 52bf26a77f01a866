//! Elementary transforms of a joint chain.
//!
//! Every [`Operation`] can be evaluated in two modes. [`EvalMode::Value`]
//! yields the homogeneous transform itself. [`EvalMode::Derivative`] yields
//! the entrywise derivative of that matrix with respect to its own scalar
//! parameter; it is not a transform and its last row is zero.
//!
//! Matrices are built row-major with the following layouts:
//!
//! | Operation   | Value rows (c = cos θ, s = sin θ)                       |
//! |-------------|---------------------------------------------------------|
//! | Rotate X    | `[1,0,0,0] [0,c,-s,0] [0,s,c,0] [0,0,0,1]`              |
//! | Rotate Y    | `[c,0,-s,0] [0,1,0,0] [s,0,c,0] [0,0,0,1]`              |
//! | Rotate Z    | `[c,-s,0,0] [s,c,0,0] [0,0,1,0] [0,0,0,1]`              |
//! | Translate K | identity with cell `(K, 3) = t`                         |

use nalgebra::Matrix4;

use crate::resolver::ParameterResolver;
use crate::skeleton::{Axis, Bone, Dof};
use crate::topology::FixedTransforms;

/// Which matrix an operation evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvalMode {
    /// The transform itself.
    #[default]
    Value,
    /// d(transform)/d(parameter), entry by entry.
    Derivative,
}

/// One elementary step of a joint chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Rotation about a local axis by the angle of a DoF.
    Rotate {
        /// Rotation axis.
        axis: Axis,
        /// DoF supplying the angle in radians.
        dof: Dof,
    },
    /// Translation along a local axis by the value of a DoF.
    Translate {
        /// Translation axis.
        axis: Axis,
        /// DoF supplying the displacement.
        dof: Dof,
    },
    /// Constant rest translation of a bone.
    Fixed(Bone),
}

impl Operation {
    /// Rotation about X driven by `dof`.
    #[must_use]
    pub const fn rot_x(dof: Dof) -> Self {
        Self::Rotate { axis: Axis::X, dof }
    }

    /// Rotation about Y driven by `dof`.
    #[must_use]
    pub const fn rot_y(dof: Dof) -> Self {
        Self::Rotate { axis: Axis::Y, dof }
    }

    /// Rotation about Z driven by `dof`.
    #[must_use]
    pub const fn rot_z(dof: Dof) -> Self {
        Self::Rotate { axis: Axis::Z, dof }
    }

    /// Translation along `axis` driven by `dof`.
    #[must_use]
    pub const fn translate(axis: Axis, dof: Dof) -> Self {
        Self::Translate { axis, dof }
    }

    /// The DoF this operation depends on, if any.
    #[must_use]
    pub const fn dof(&self) -> Option<Dof> {
        match *self {
            Self::Rotate { dof, .. } | Self::Translate { dof, .. } => Some(dof),
            Self::Fixed(_) => None,
        }
    }

    /// Evaluate the operation for one sample.
    ///
    /// A [`Operation::Fixed`] has no parameter, so its derivative is the
    /// zero matrix. So is the derivative of an operation driven by a fixed
    /// DoF.
    #[must_use]
    pub fn matrix(
        &self,
        resolver: &ParameterResolver<'_>,
        constants: &FixedTransforms,
        mode: EvalMode,
    ) -> Matrix4<f64> {
        // d(effective)/d(input) scales the derivative: 1 when free, 0 when fixed.
        let chain = |dof| match mode {
            EvalMode::Value => 1.0,
            EvalMode::Derivative => resolver.resolve(dof, mode),
        };
        match *self {
            Self::Rotate { axis, dof } => rotation(axis, resolver.value(dof), mode) * chain(dof),
            Self::Translate { axis, dof } => {
                translation(axis, resolver.value(dof), mode) * chain(dof)
            }
            Self::Fixed(bone) => match mode {
                EvalMode::Value => *constants.get(bone),
                EvalMode::Derivative => Matrix4::zeros(),
            },
        }
    }
}

/// Homogeneous rotation about `axis` by `theta` radians, or its derivative.
#[must_use]
pub fn rotation(axis: Axis, theta: f64, mode: EvalMode) -> Matrix4<f64> {
    let (s, c) = theta.sin_cos();
    // (a, b, p, q) fill the 2x2 block: value [c, -s; s, c], derivative [-s, -c; c, -s].
    let (a, b, p, q, one) = match mode {
        EvalMode::Value => (c, -s, s, c, 1.0),
        EvalMode::Derivative => (-s, -c, c, -s, 0.0),
    };
    match axis {
        #[rustfmt::skip]
        Axis::X => Matrix4::new(
            one, 0.0, 0.0, 0.0,
            0.0, a,   b,   0.0,
            0.0, p,   q,   0.0,
            0.0, 0.0, 0.0, one,
        ),
        #[rustfmt::skip]
        Axis::Y => Matrix4::new(
            a,   0.0, b,   0.0,
            0.0, one, 0.0, 0.0,
            p,   0.0, q,   0.0,
            0.0, 0.0, 0.0, one,
        ),
        #[rustfmt::skip]
        Axis::Z => Matrix4::new(
            a,   b,   0.0, 0.0,
            p,   q,   0.0, 0.0,
            0.0, 0.0, one, 0.0,
            0.0, 0.0, 0.0, one,
        ),
    }
}

/// Homogeneous translation along `axis` by `amount`, or its derivative.
#[must_use]
pub fn translation(axis: Axis, amount: f64, mode: EvalMode) -> Matrix4<f64> {
    let mut m = match mode {
        EvalMode::Value => Matrix4::identity(),
        EvalMode::Derivative => Matrix4::zeros(),
    };
    m[(axis.index(), 3)] = match mode {
        EvalMode::Value => amount,
        EvalMode::Derivative => 1.0,
    };
    m
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    const AXES: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[test]
    fn test_rotation_is_orthonormal() {
        for axis in AXES {
            let m = rotation(axis, 0.7, EvalMode::Value);
            let r = m.fixed_view::<3, 3>(0, 0).into_owned();
            assert_relative_eq!(r * r.transpose(), nalgebra::Matrix3::identity(), epsilon = 1e-12);
            assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
            assert_eq!(m[(3, 3)], 1.0);
        }
    }

    #[test]
    fn test_rotation_layout() {
        let theta = 0.3_f64;
        let (s, c) = theta.sin_cos();

        let x = rotation(Axis::X, theta, EvalMode::Value);
        assert_eq!(x[(1, 2)], -s);
        assert_eq!(x[(2, 1)], s);

        let y = rotation(Axis::Y, theta, EvalMode::Value);
        assert_eq!(y[(0, 0)], c);
        assert_eq!(y[(0, 2)], -s);
        assert_eq!(y[(2, 0)], s);

        let z = rotation(Axis::Z, theta, EvalMode::Value);
        assert_eq!(z[(0, 1)], -s);
        assert_eq!(z[(1, 0)], s);
        assert_eq!(z[(2, 2)], 1.0);
    }

    #[test]
    fn test_derivative_matches_difference_quotient() {
        let theta = -1.1;
        let h = 1e-6;
        for axis in AXES {
            let analytic = rotation(axis, theta, EvalMode::Derivative);
            let numeric = (rotation(axis, theta + h, EvalMode::Value)
                - rotation(axis, theta - h, EvalMode::Value))
                / (2.0 * h);
            assert_relative_eq!(analytic, numeric, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_derivative_last_row_is_zero() {
        for axis in AXES {
            let d = rotation(axis, 0.4, EvalMode::Derivative);
            assert_eq!(d.row(3).transpose(), Vector4::zeros());
            let t = translation(axis, 12.0, EvalMode::Derivative);
            assert_eq!(t.row(3).transpose(), Vector4::zeros());
        }
    }

    #[test]
    fn test_translation() {
        let m = translation(Axis::Y, 2.5, EvalMode::Value);
        let p = m * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p, Vector4::new(1.0, 3.5, 1.0, 1.0));

        let d = translation(Axis::Z, 2.5, EvalMode::Derivative);
        let mut expected = Matrix4::zeros();
        expected[(2, 3)] = 1.0;
        assert_eq!(d, expected);
    }

    #[test]
    fn test_fixed_dof_has_zero_derivative() {
        let config = crate::config::HandConfig::default();
        let constants = FixedTransforms::from_config(&config).unwrap();
        let inputs = [0.3; crate::skeleton::DOF_COUNT];
        let resolver = ParameterResolver::new(&config, &inputs).unwrap();

        let fixed = Operation::rot_z(Dof::WristLeftRotZ);
        assert_eq!(
            fixed.matrix(&resolver, &constants, EvalMode::Derivative),
            Matrix4::zeros()
        );
        let free = Operation::rot_x(Dof::IndexPipRotX);
        assert_eq!(
            free.matrix(&resolver, &constants, EvalMode::Derivative),
            rotation(Axis::X, 0.3, EvalMode::Derivative)
        );
        assert_eq!(
            Operation::Fixed(Bone::IndexTipToDip).matrix(&resolver, &constants, EvalMode::Value),
            *constants.get(Bone::IndexTipToDip)
        );
    }

    #[test]
    fn test_operation_dof() {
        assert_eq!(
            Operation::rot_x(Dof::IndexPipRotX).dof(),
            Some(Dof::IndexPipRotX)
        );
        assert_eq!(
            Operation::translate(Axis::X, Dof::GlobalTransX).dof(),
            Some(Dof::GlobalTransX)
        );
        assert_eq!(Operation::Fixed(Bone::IndexTipToDip).dof(), None);
    }
}
