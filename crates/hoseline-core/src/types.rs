//! Geometric value types shared across the Hoseline crates.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// A position + orientation frame.
///
/// Anchors, nozzles, and attach offsets are all poses.  Composition follows
/// the usual parent-child convention: `parent.compose(&child)` expresses
/// `child` (given in `parent`'s frame) in the parent's parent frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pose at `position` with identity rotation.
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Transform a point from this frame into the enclosing frame.
    pub fn transform_point(&self, point: &Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation * point
    }

    /// Compose with a child pose expressed in this frame.
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.transform_point(&local.position),
            rotation: self.rotation * local.rotation,
        }
    }
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// One rigid segment of a solved chain.
///
/// `position` is the segment's center point; `rotation` maps the nominal
/// (model-space) segment direction onto the segment's realized direction.
/// Produced fresh by every solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Link {
    pub fn new(position: Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }

    /// View this link as a [`Pose`].
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pose_default_is_identity() {
        let pose = Pose::default();
        assert_eq!(pose.position, Vector3::zeros());
        assert_eq!(pose.rotation, UnitQuaternion::identity());
    }

    #[test]
    fn transform_point_translates() {
        let pose = Pose::from_position(Vector3::new(1.0, 2.0, 3.0));
        let p = pose.transform_point(&Vector3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.5, epsilon = 1e-6);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn transform_point_rotates_then_translates() {
        // 90 degree yaw about +z maps +x onto +y
        let pose = Pose::new(
            Vector3::new(1.0, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, std::f32::consts::FRAC_PI_2),
        );
        let p = pose.transform_point(&Vector3::x());
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn compose_chains_frames() {
        let a = Pose::new(
            Vector3::new(0.0, 1.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, std::f32::consts::FRAC_PI_2),
        );
        let b = Pose::from_position(Vector3::x());
        let c = a.compose(&b);
        // b's +x offset is rotated into +y by a's yaw
        assert_relative_eq!(c.position.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(c.position.y, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn compose_with_identity_is_noop() {
        let a = Pose::new(
            Vector3::new(3.0, -1.0, 2.0),
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        );
        let c = a.compose(&Pose::identity());
        assert_relative_eq!((c.position - a.position).norm(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(c.rotation.angle_to(&a.rotation), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn link_pose_view() {
        let link = Link::new(Vector3::new(1.0, 2.0, 3.0), UnitQuaternion::identity());
        let pose = link.pose();
        assert_eq!(pose.position, link.position);
        assert_eq!(pose.rotation, link.rotation);
    }

    #[test]
    fn pose_serde_roundtrip() {
        let pose = Pose::new(
            Vector3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, 1.0),
        );
        let json = serde_json::to_string(&pose).unwrap();
        let back: Pose = serde_json::from_str(&json).unwrap();
        assert_eq!(pose, back);
    }
}
