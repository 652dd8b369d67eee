//! Rigid correction that pins the content offset frame to the anchor

use crate::core::Pose;
use nalgebra::Translation3;

/// New world pose for the offset frame given the anchor's live world pose
/// and the offset frame's current world pose.
///
/// Rotation becomes `inverse(Ra) * Rf` and position `Pf - Pa`.
pub fn compute_correction(anchor: &Pose, offset: &Pose) -> Pose {
    let rotation = anchor.rotation.inverse() * offset.rotation;
    let position = offset.translation.vector - anchor.translation.vector;

    Pose::from_parts(Translation3::from(position), rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{pose_from_yaw, yaw_rotation};
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};

    #[test]
    fn test_correction_formula() {
        let anchor = pose_from_yaw(Vector3::new(3.0, -1.0, 8.0), 150.0);
        let offset = Pose::from_parts(
            Translation3::new(0.5, 0.25, -2.0),
            UnitQuaternion::from_euler_angles(0.1, 0.4, -0.2),
        );

        let corrected = compute_correction(&anchor, &offset);

        assert_relative_eq!(
            corrected.translation.vector,
            Vector3::new(-2.5, 1.25, -10.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            corrected.rotation,
            anchor.rotation.inverse() * offset.rotation,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_identity_offset_takes_inverse_anchor_rotation() {
        let anchor = pose_from_yaw(Vector3::new(1.0, 2.0, 3.0), 90.0);
        let corrected = compute_correction(&anchor, &Pose::identity());

        assert_relative_eq!(corrected.rotation, yaw_rotation(-90.0), epsilon = 1e-12);
        assert_relative_eq!(
            corrected.translation.vector,
            Vector3::new(-1.0, -2.0, -3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_correction_is_deterministic() {
        let anchor = pose_from_yaw(Vector3::new(-4.0, 0.0, 2.0), 33.0);
        let offset = pose_from_yaw(Vector3::new(1.0, 1.0, 1.0), -12.0);

        assert_eq!(compute_correction(&anchor, &offset), compute_correction(&anchor, &offset));
    }

    #[test]
    fn test_anchor_at_origin_is_noop() {
        let offset = pose_from_yaw(Vector3::new(1.0, 0.0, -1.0), 45.0);
        let corrected = compute_correction(&Pose::identity(), &offset);
        assert_relative_eq!(corrected, offset, epsilon = 1e-12);
    }
}
