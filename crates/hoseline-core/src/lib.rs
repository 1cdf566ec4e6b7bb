//! Shared types, configuration, errors, and system ordering for the
//! Hoseline connector sim.

pub mod config;
pub mod error;
pub mod types;

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use config::HoseDefinition;
pub use error::{DefinitionError, HoselineError, SolveError};
pub use types::{Link, Pose};

// ---------------------------------------------------------------------------
// HoselineSet
// ---------------------------------------------------------------------------

/// System-set ordering for the per-tick connector pipeline.
///
/// Configured by [`HoselineCorePlugin`] to run in declaration order within
/// `Update`.  Anchor providers go in `Acquire`, the chain solve runs in
/// `Solve`, and render/replication consumers read poses in `Publish` —
/// guaranteeing a chain never staler than one tick, and that a pose exists
/// before the first render after an attach.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoselineSet {
    /// Update anchor poses (owner and target world transforms).
    Acquire,
    /// Run the length adapter + chain geometry solve per connector.
    Solve,
    /// Read solved poses; emit connection status to consumers.
    Publish,
}

// ---------------------------------------------------------------------------
// HoselineCorePlugin
// ---------------------------------------------------------------------------

/// Core plugin: registers [`HoselineSet`] ordering.
///
/// Add this before any other Hoseline plugin.
pub struct HoselineCorePlugin;

impl Plugin for HoselineCorePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                HoselineSet::Acquire,
                HoselineSet::Solve,
                HoselineSet::Publish,
            )
                .chain(),
        );
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::config::HoseDefinition;
    pub use crate::error::{DefinitionError, HoselineError, SolveError};
    pub use crate::types::{Link, Pose};
    pub use crate::{HoselineCorePlugin, HoselineSet};
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
