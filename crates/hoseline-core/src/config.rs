//! Static hose connector definitions.
//!
//! A [`HoseDefinition`] describes everything immutable about one hose model:
//! link count and nominal geometry, nozzle offsets, bend/rigidity limits,
//! the extension budget, and droop constants.  Definitions are loaded from
//! TOML, validated once at load, and never mutated afterwards.

use std::path::Path;

use nalgebra::{Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_max_bend() -> f32 {
    30.0
}
const fn default_droop_connected() -> f32 {
    0.5
}
const fn default_droop_disconnected() -> f32 {
    0.75
}

// ---------------------------------------------------------------------------
// HoseDefinition
// ---------------------------------------------------------------------------

/// Immutable definition of one hose connector model.
///
/// Angles are given in degrees in the file format and converted to radians
/// by the accessor methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoseDefinition {
    /// Number of rigid links available to the chain (N >= 1).
    pub num_links: u32,

    /// Model-space start of the nominal link.
    pub link_start: [f32; 3],

    /// Model-space end of the nominal link.  `link_end - link_start` gives
    /// the nominal link direction and length.
    pub link_end: [f32; 3],

    /// Stowed nozzle position in owner space.
    #[serde(default)]
    pub nozzle_offset: [f32; 3],

    /// Vector from the nozzle to the chain's mobile endpoint.
    #[serde(default)]
    pub nozzle_link_offset: [f32; 3],

    /// Euler rotation offset (degrees, roll/pitch/yaw) applied to the
    /// target's rotation to orient the nozzle back toward the chain.
    #[serde(default)]
    pub attach_rotation: [f32; 3],

    /// Per-axis joint bend limit in degrees (default: 30).
    #[serde(default = "default_max_bend")]
    pub max_bend: f32,

    /// Rigid hoses may bend at most once per side per solve.
    #[serde(default)]
    pub rigid: bool,

    /// Extension budget: maximum permitted increase to the nominal link
    /// length (default: 0, no extension).
    #[serde(default)]
    pub max_extension: f32,

    /// Downward center sag while connected (non-rigid hoses only).
    #[serde(default = "default_droop_connected")]
    pub droop_connected: f32,

    /// Downward center sag while disconnected (non-rigid hoses only).
    #[serde(default = "default_droop_disconnected")]
    pub droop_disconnected: f32,
}

impl HoseDefinition {
    /// Validate the definition.  Returns `Err` on malformed values.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.num_links < 1 {
            return Err(DefinitionError::NoLinks(self.num_links));
        }
        if self.nominal_length() <= f32::EPSILON {
            return Err(DefinitionError::DegenerateLink);
        }
        if self.max_bend < 0.0 {
            return Err(DefinitionError::NegativeBend(self.max_bend));
        }
        if self.max_extension < 0.0 {
            return Err(DefinitionError::NegativeExtension(self.max_extension));
        }
        Ok(())
    }

    /// Load and validate a definition from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let definition: Self = toml::from_str(&content)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Nominal (unextended) link length.
    pub fn nominal_length(&self) -> f32 {
        (self.link_end_vec() - self.link_start_vec()).norm()
    }

    /// Unit direction of an unbent link in model space.
    ///
    /// Only meaningful on a validated definition (non-degenerate link).
    pub fn nominal_dir(&self) -> Unit<Vector3<f32>> {
        Unit::new_normalize(self.link_end_vec() - self.link_start_vec())
    }

    pub fn link_start_vec(&self) -> Vector3<f32> {
        Vector3::from(self.link_start)
    }

    pub fn link_end_vec(&self) -> Vector3<f32> {
        Vector3::from(self.link_end)
    }

    pub fn nozzle_offset_vec(&self) -> Vector3<f32> {
        Vector3::from(self.nozzle_offset)
    }

    pub fn nozzle_link_offset_vec(&self) -> Vector3<f32> {
        Vector3::from(self.nozzle_link_offset)
    }

    /// Per-axis bend limit in radians.
    pub fn max_bend_rad(&self) -> f32 {
        self.max_bend.to_radians()
    }

    /// Attach rotation offset as a quaternion.
    pub fn attach_rotation_quat(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(
            self.attach_rotation[0].to_radians(),
            self.attach_rotation[1].to_radians(),
            self.attach_rotation[2].to_radians(),
        )
    }

    /// Droop applied to the chain's target center.  Rigid hoses never sag.
    pub fn droop(&self, connected: bool) -> f32 {
        if self.rigid {
            0.0
        } else if connected {
            self.droop_connected
        } else {
            self.droop_disconnected
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn basic_definition() -> HoseDefinition {
        HoseDefinition {
            num_links: 3,
            link_start: [0.0, 0.0, 0.0],
            link_end: [1.0, 0.0, 0.0],
            nozzle_offset: [0.0; 3],
            nozzle_link_offset: [0.0; 3],
            attach_rotation: [0.0; 3],
            max_bend: 30.0,
            rigid: false,
            max_extension: 0.0,
            droop_connected: 0.5,
            droop_disconnected: 0.75,
        }
    }

    #[test]
    fn valid_definition_passes() {
        assert!(basic_definition().validate().is_ok());
    }

    #[test]
    fn zero_links_rejected() {
        let mut def = basic_definition();
        def.num_links = 0;
        assert!(matches!(def.validate(), Err(DefinitionError::NoLinks(0))));
    }

    #[test]
    fn degenerate_link_rejected() {
        let mut def = basic_definition();
        def.link_end = def.link_start;
        assert!(matches!(
            def.validate(),
            Err(DefinitionError::DegenerateLink)
        ));
    }

    #[test]
    fn negative_bend_rejected() {
        let mut def = basic_definition();
        def.max_bend = -10.0;
        assert!(matches!(
            def.validate(),
            Err(DefinitionError::NegativeBend(_))
        ));
    }

    #[test]
    fn negative_extension_rejected() {
        let mut def = basic_definition();
        def.max_extension = -0.5;
        assert!(matches!(
            def.validate(),
            Err(DefinitionError::NegativeExtension(_))
        ));
    }

    #[test]
    fn nominal_length_and_dir() {
        let mut def = basic_definition();
        def.link_start = [1.0, 0.0, 0.0];
        def.link_end = [1.0, 0.0, 2.0];
        assert_relative_eq!(def.nominal_length(), 2.0, epsilon = 1e-6);
        let dir = def.nominal_dir();
        assert_relative_eq!(dir.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn droop_respects_rigidity_and_connection() {
        let mut def = basic_definition();
        assert_relative_eq!(def.droop(true), 0.5);
        assert_relative_eq!(def.droop(false), 0.75);
        def.rigid = true;
        assert_relative_eq!(def.droop(true), 0.0);
        assert_relative_eq!(def.droop(false), 0.0);
    }

    #[test]
    fn max_bend_in_radians() {
        let def = basic_definition();
        assert_relative_eq!(
            def.max_bend_rad(),
            30.0_f32.to_radians(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn attach_rotation_quat_yaw() {
        let mut def = basic_definition();
        def.attach_rotation = [0.0, 0.0, 90.0];
        let rotated = def.attach_rotation_quat() * Vector3::x();
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn toml_parse_with_defaults() {
        let toml_src = r#"
            num_links = 4
            link_start = [0.0, 0.0, 0.0]
            link_end = [0.0, 0.0, 0.5]
        "#;
        let def: HoseDefinition = toml::from_str(toml_src).unwrap();
        assert_eq!(def.num_links, 4);
        assert_relative_eq!(def.max_bend, 30.0);
        assert!(!def.rigid);
        assert_relative_eq!(def.max_extension, 0.0);
        assert_relative_eq!(def.droop_connected, 0.5);
        assert_relative_eq!(def.droop_disconnected, 0.75);
        assert!(def.validate().is_ok());
    }

    #[test]
    fn toml_parse_full() {
        let toml_src = r#"
            num_links = 6
            link_start = [0.0, 1.2, 0.0]
            link_end = [0.0, 1.2, 0.4]
            nozzle_offset = [0.3, 1.0, 0.0]
            nozzle_link_offset = [0.0, 0.1, -0.05]
            attach_rotation = [0.0, 0.0, 180.0]
            max_bend = 45.0
            rigid = true
            max_extension = 0.2
        "#;
        let def: HoseDefinition = toml::from_str(toml_src).unwrap();
        assert_eq!(def.num_links, 6);
        assert!(def.rigid);
        assert_relative_eq!(def.max_extension, 0.2);
        assert!(def.validate().is_ok());
    }

    #[test]
    fn missing_required_field_fails() {
        let toml_src = r#"
            link_start = [0.0, 0.0, 0.0]
            link_end = [1.0, 0.0, 0.0]
        "#;
        assert!(toml::from_str::<HoseDefinition>(toml_src).is_err());
    }

    #[test]
    fn from_file_missing_path_reports_io_error() {
        let err = HoseDefinition::from_file("/nonexistent/hose.toml").unwrap_err();
        assert!(matches!(err, DefinitionError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/hose.toml"));
    }
}
