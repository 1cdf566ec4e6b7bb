//! Bevy integration for hose routing.
//!
//! [`HoseConnectorPlugin`] runs the chain solver once per tick for every
//! [`HoseConnector`] with a target, inside
//! [`HoselineSet::Solve`](hoseline_core::HoselineSet::Solve) so downstream
//! consumers in `HoselineSet::Publish` always observe a pose from the
//! current tick.
//!
//! ```no_run
//! use bevy::prelude::*;
//! use hoseline_sim::HoseConnectorPlugin;
//!
//! App::new().add_plugins(HoseConnectorPlugin).run();
//! ```

use bevy::prelude::*;

use hoseline_core::{HoselineCorePlugin, HoselineSet};

pub mod components;
pub mod systems;

pub use components::{AttachPoint, ChainState, HoseConnector};
pub use systems::{hose_solve_system, HoseEvent, HoseSolverConfig};

/// Adds the per-tick hose solve system, its event, and its config
/// resource.  Pulls in [`HoselineCorePlugin`] if the app lacks it.
pub struct HoseConnectorPlugin;

impl Plugin for HoseConnectorPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<HoselineCorePlugin>() {
            app.add_plugins(HoselineCorePlugin);
        }
        app.init_resource::<HoseSolverConfig>()
            .add_event::<HoseEvent>()
            .add_systems(Update, hose_solve_system.in_set(HoselineSet::Solve));
    }
}

pub mod prelude {
    pub use crate::components::{AttachPoint, HoseConnector};
    pub use crate::systems::{HoseEvent, HoseSolverConfig};
    pub use crate::HoseConnectorPlugin;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_builds() {
        let mut app = App::new();
        app.add_plugins(HoseConnectorPlugin);
        app.finish();
        app.cleanup();
        app.update();
    }

    #[test]
    fn plugin_tolerates_core_plugin_already_added() {
        let mut app = App::new();
        app.add_plugins(HoselineCorePlugin);
        app.add_plugins(HoseConnectorPlugin);
        app.finish();
        app.cleanup();
        app.update();
    }
}
