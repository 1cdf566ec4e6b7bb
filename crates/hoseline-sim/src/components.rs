//! ECS components for hose connectors and their attach targets.

use bevy::prelude::*;

use hoseline_core::config::HoseDefinition;
use hoseline_core::error::DefinitionError;
use hoseline_core::types::{Link, Pose};

// ---------------------------------------------------------------------------
// AttachPoint
// ---------------------------------------------------------------------------

/// Marks an entity a hose can attach to, with the receptacle's local pose
/// offset from the entity origin.
#[derive(Component, Debug, Clone, Default)]
pub struct AttachPoint {
    pub offset: Pose,
}

impl AttachPoint {
    pub fn new(offset: Pose) -> Self {
        Self { offset }
    }
}

// ---------------------------------------------------------------------------
// ChainState
// ---------------------------------------------------------------------------

/// Mutable per-connector routing state, rebuilt by the solve system each
/// tick while a target is set.
#[derive(Debug, Clone, Default)]
pub struct ChainState {
    pub(crate) target: Option<Entity>,
    pub(crate) links: Vec<Link>,
    pub(crate) nozzle_pose: Pose,
    pub(crate) link_length: f32,
    pub(crate) leftover: u32,
    pub(crate) connected: bool,
}

// ---------------------------------------------------------------------------
// HoseConnector
// ---------------------------------------------------------------------------

/// A fixed dispensing outlet that routes a link chain to a mobile target.
///
/// Construction validates the definition, so a connector that exists is
/// always routable.  Call [`connect`](Self::connect) to set the target;
/// the solve system refits the chain every tick until the target is
/// cleared, despawned, or becomes unreachable.
#[derive(Component, Debug, Clone)]
pub struct HoseConnector {
    definition: HoseDefinition,
    pub(crate) state: ChainState,
}

impl HoseConnector {
    /// Build a connector from a validated definition.
    pub fn new(definition: HoseDefinition) -> Result<Self, DefinitionError> {
        definition.validate()?;
        let state = ChainState {
            link_length: definition.nominal_length(),
            ..ChainState::default()
        };
        Ok(Self { definition, state })
    }

    /// Request routing to `target`.  The chain appears on the next solve
    /// tick; until then the connector reports disconnected.
    pub fn connect(&mut self, target: Entity) {
        self.state.target = Some(target);
    }

    /// Drop the current target.  The solve system stows the nozzle on the
    /// next tick.
    pub fn disconnect(&mut self) {
        self.state.target = None;
    }

    pub fn definition(&self) -> &HoseDefinition {
        &self.definition
    }

    /// Current target entity, if any.
    pub fn target(&self) -> Option<Entity> {
        self.state.target
    }

    /// Solved link poses, start-to-end.  Empty while disconnected.
    pub fn links(&self) -> &[Link] {
        &self.state.links
    }

    /// World pose of the nozzle: at the target's receptacle while
    /// connected, stowed on the owner otherwise.
    pub fn nozzle_pose(&self) -> Pose {
        self.state.nozzle_pose
    }

    /// Whether the last solve produced a chain.
    pub fn is_connected(&self) -> bool {
        self.state.connected
    }

    /// Links the last solve did not need.
    pub fn leftover_links(&self) -> u32 {
        self.state.leftover
    }

    /// Link length the last solve settled on.
    pub fn link_length(&self) -> f32 {
        self.state.link_length
    }

    /// Reset to the stowed pose: no links, nozzle parked at the owner's
    /// stow offset.  Keeps the target untouched.
    pub(crate) fn stow(&mut self, owner: &Pose) {
        self.state.links.clear();
        self.state.leftover = 0;
        self.state.connected = false;
        self.state.link_length = self.definition.nominal_length();
        self.state.nozzle_pose = Pose::new(
            owner.transform_point(&self.definition.nozzle_offset_vec()),
            owner.rotation,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn def() -> HoseDefinition {
        HoseDefinition {
            num_links: 3,
            link_start: [0.0, 0.0, 0.0],
            link_end: [1.0, 0.0, 0.0],
            nozzle_offset: [0.2, 0.1, 0.0],
            nozzle_link_offset: [0.0, 0.0, 0.0],
            attach_rotation: [0.0, 0.0, 0.0],
            max_bend: 30.0,
            rigid: false,
            max_extension: 0.0,
            droop_connected: 0.5,
            droop_disconnected: 0.75,
        }
    }

    #[test]
    fn new_rejects_invalid_definition() {
        let mut bad = def();
        bad.num_links = 0;
        assert!(HoseConnector::new(bad).is_err());
    }

    #[test]
    fn new_connector_starts_disconnected() {
        let connector = HoseConnector::new(def()).unwrap();
        assert!(!connector.is_connected());
        assert!(connector.links().is_empty());
        assert_eq!(connector.target(), None);
        assert_relative_eq!(connector.link_length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn stow_parks_nozzle_at_owner_offset() {
        let mut connector = HoseConnector::new(def()).unwrap();
        let owner = Pose::from_position(Vector3::new(5.0, 1.0, 0.0));
        connector.stow(&owner);
        let nozzle = connector.nozzle_pose();
        assert_relative_eq!(nozzle.position.x, 5.2, epsilon = 1e-5);
        assert_relative_eq!(nozzle.position.y, 1.1, epsilon = 1e-5);
        assert!(!connector.is_connected());
    }
}
