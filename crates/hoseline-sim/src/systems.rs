//! Per-tick hose routing.

use bevy::ecs::entity::Entities;
use bevy::prelude::*;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use hoseline_core::types::Pose;
use hoseline_solver::{AdapterConfig, LengthAdapter};

use crate::components::{AttachPoint, HoseConnector};

// ---------------------------------------------------------------------------
// Resources and events
// ---------------------------------------------------------------------------

/// Length-adaptation tuning shared by all connectors.
#[derive(Resource, Debug, Clone, Default)]
pub struct HoseSolverConfig(pub AdapterConfig);

/// Connection lifecycle notifications, for replication or audio/FX layers.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoseEvent {
    /// A connector produced its first chain to `target`.
    Connected { connector: Entity, target: Entity },
    /// A connector lost its target (unreachable or despawned).
    Disconnected { connector: Entity },
}

// ---------------------------------------------------------------------------
// Solve system
// ---------------------------------------------------------------------------

/// Refits every connector's chain from current world transforms.
///
/// Runs in [`HoselineSet::Solve`](hoseline_core::HoselineSet::Solve), so a
/// freshly attached hose has a pose before the first publish after the
/// attach.  An infeasible or despawned target clears the connection,
/// emitting [`HoseEvent::Disconnected`] when a connection existed; a
/// target whose components are momentarily unavailable stows the hose for
/// this tick only and is retried next tick.
#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
pub fn hose_solve_system(
    config: Res<HoseSolverConfig>,
    entities: &Entities,
    mut connectors: Query<(Entity, &GlobalTransform, &mut HoseConnector)>,
    targets: Query<(&GlobalTransform, &AttachPoint)>,
    mut events: EventWriter<HoseEvent>,
) {
    let adapter = LengthAdapter::new(config.0.clone());

    for (entity, transform, mut connector) in &mut connectors {
        let owner = pose_of(transform);

        let Some(target) = connector.target() else {
            connector.stow(&owner);
            continue;
        };

        if !entities.contains(target) {
            debug!("hoseline-sim: target of {entity} despawned, disconnecting");
            let was_connected = connector.is_connected();
            connector.disconnect();
            connector.stow(&owner);
            if was_connected {
                events.send(HoseEvent::Disconnected { connector: entity });
            }
            continue;
        }

        let Ok((target_transform, attach)) = targets.get(target) else {
            // Target alive but its pose is not readable this tick; keep
            // the target and retry next tick.
            debug!("hoseline-sim: target pose of {entity} unavailable, stowing for this tick");
            connector.stow(&owner);
            continue;
        };

        let def = connector.definition();
        let fixed = Pose::new(
            owner.transform_point(&def.link_start_vec()),
            owner.rotation,
        );
        let receptacle = pose_of(target_transform).compose(&attach.offset);
        let nozzle = Pose::new(
            receptacle.position,
            receptacle.rotation * def.attach_rotation_quat(),
        );
        let droop = def.droop(true);

        match adapter.solve(def, &fixed, &nozzle, droop) {
            Ok(solution) => {
                let newly_connected = !connector.is_connected();
                let state = &mut connector.state;
                state.links = solution.links;
                state.link_length = solution.link_length;
                state.leftover = solution.leftover;
                state.nozzle_pose = nozzle;
                state.connected = true;
                if newly_connected {
                    events.send(HoseEvent::Connected {
                        connector: entity,
                        target,
                    });
                }
            }
            Err(err) => {
                warn!("hoseline-sim: {entity} cannot reach its target: {err}");
                let was_connected = connector.is_connected();
                connector.disconnect();
                connector.stow(&owner);
                if was_connected {
                    events.send(HoseEvent::Disconnected { connector: entity });
                }
            }
        }
    }
}

/// World pose of a Bevy transform in solver terms.
fn pose_of(transform: &GlobalTransform) -> Pose {
    let t = transform.compute_transform();
    Pose::new(
        Vector3::new(t.translation.x, t.translation.y, t.translation.z),
        UnitQuaternion::from_quaternion(Quaternion::new(
            t.rotation.w,
            t.rotation.x,
            t.rotation.y,
            t.rotation.z,
        )),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
