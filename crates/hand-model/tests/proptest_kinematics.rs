//! Property-based tests for hand kinematics.
//!
//! Run with: cargo test -p hand-model -- proptest

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use hand_model::{DOF_COUNT, Dof, HandConfig, HandModel, Joint, POSITION_WIDTH};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A full DoF row: translations in ±100, angles in ±π.
fn arb_dofs() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-std::f64::consts::PI..std::f64::consts::PI, DOF_COUNT).prop_map(
        |mut row| {
            for dof in [Dof::GlobalTransX, Dof::GlobalTransY, Dof::GlobalTransZ] {
                row[dof.index()] *= 100.0 / std::f64::consts::PI;
            }
            row
        },
    )
}

fn arb_upstream() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0..1.0f64, POSITION_WIDTH)
}

fn model() -> HandModel {
    HandModel::new(HandConfig::default()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

// =============================================================================
// Property Tests: Forward
// =============================================================================

proptest! {
    /// Every output is finite for finite input.
    #[test]
    fn forward_is_finite(dofs in arb_dofs()) {
        let flat = model().forward(&dofs).unwrap().to_flat();
        prop_assert_eq!(flat.len(), POSITION_WIDTH);
        prop_assert!(flat.iter().all(|v| v.is_finite()));
    }

    /// Bone lengths survive any pose.
    #[test]
    fn bone_lengths_are_preserved(dofs in arb_dofs()) {
        let model = model();
        let positions = model.forward(&dofs).unwrap();
        for joint in Joint::ALL {
            let (Some(parent), Some(bone)) = (joint.parent(), joint.bone()) else {
                continue;
            };
            let length = (positions.position(joint) - positions.position(parent)).norm();
            let expected = model.config().bone_length(bone);
            prop_assert!(close(length, expected), "{:?}: {} vs {}", bone, length, expected);
        }
    }

    /// A global translation moves every joint by the same amount.
    #[test]
    fn translation_equivariance(dofs in arb_dofs(), shift in prop::array::uniform3(-20.0..20.0f64)) {
        let model = model();
        let base = model.forward(&dofs).unwrap();
        let mut moved = dofs.clone();
        moved[Dof::GlobalTransX.index()] += shift[0];
        moved[Dof::GlobalTransY.index()] += shift[1];
        moved[Dof::GlobalTransZ.index()] += shift[2];
        let shifted = model.forward(&moved).unwrap();

        for joint in Joint::ALL {
            let delta = shifted.position(joint) - base.position(joint);
            for axis in 0..3 {
                prop_assert!((delta[axis] - shift[axis]).abs() < 1e-9);
            }
        }
    }

    /// Fixed DoF inputs are ignored.
    #[test]
    fn fixed_inputs_are_ignored(dofs in arb_dofs(), junk in -1e4..1e4f64) {
        let model = model();
        let mut scrambled = dofs.clone();
        for dof in Dof::ALL.iter().filter(|d| model.config().is_fixed(**d)) {
            scrambled[dof.index()] = junk;
        }
        prop_assert_eq!(
            model.forward(&dofs).unwrap().to_flat(),
            model.forward(&scrambled).unwrap().to_flat()
        );
    }
}

// =============================================================================
// Property Tests: Backward
// =============================================================================

proptest! {
    /// Fixed DoFs always receive a zero gradient.
    #[test]
    fn fixed_gradients_are_zero(dofs in arb_dofs(), upstream in arb_upstream()) {
        let model = model();
        let grad = model.backward(&dofs, &upstream).unwrap();
        prop_assert_eq!(grad.len(), DOF_COUNT);
        for dof in Dof::ALL.iter().filter(|d| model.config().is_fixed(**d)) {
            prop_assert_eq!(grad[dof.index()], 0.0);
        }
    }

    /// The backward pass is linear in the upstream gradient.
    #[test]
    fn backward_is_linear(
        dofs in arb_dofs(),
        a in arb_upstream(),
        b in arb_upstream(),
        scale in -3.0..3.0f64,
    ) {
        let model = model();
        let combined: Vec<f64> = a.iter().zip(&b).map(|(x, y)| x + scale * y).collect();
        let ga = model.backward(&dofs, &a).unwrap();
        let gb = model.backward(&dofs, &b).unwrap();
        let gc = model.backward(&dofs, &combined).unwrap();
        for i in 0..DOF_COUNT {
            let expected = ga[i] + scale * gb[i];
            prop_assert!(
                (gc[i] - expected).abs() <= 1e-7 * (1.0 + expected.abs()),
                "dof {}: {} vs {}", i, gc[i], expected
            );
        }
    }

    /// Global translation gradients are the summed upstream components.
    #[test]
    fn translation_gradient_sums_upstream(dofs in arb_dofs(), upstream in arb_upstream()) {
        let grad = model().backward(&dofs, &upstream).unwrap();
        for (axis, dof) in [Dof::GlobalTransX, Dof::GlobalTransY, Dof::GlobalTransZ]
            .into_iter()
            .enumerate()
        {
            let expected: f64 = upstream.chunks_exact(3).map(|g| g[axis]).sum();
            prop_assert!(close(grad[dof.index()], expected));
        }
    }
}
