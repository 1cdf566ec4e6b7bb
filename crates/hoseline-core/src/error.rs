//! Error types for hose definitions and chain solving.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the Hoseline crates.
#[derive(Debug, Error)]
pub enum HoselineError {
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Solve error: {0}")]
    Solve(#[from] SolveError),
}

/// Errors in a static [`HoseDefinition`](crate::config::HoseDefinition).
///
/// Reported once at definition-load time; a connector with an invalid
/// definition is never routed.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Failed to read the definition file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("hose must have at least 1 link, got {0}")]
    NoLinks(u32),

    #[error("link_start and link_end coincide; nominal link length must be > 0")]
    DegenerateLink,

    #[error("max_bend must be >= 0, got {0}")]
    NegativeBend(f32),

    #[error("max_extension must be >= 0, got {0}")]
    NegativeExtension(f32),
}

/// Chain-solve failures.
///
/// Copy + small payload for cheap propagation in the per-tick path.  Always
/// recovered locally by forcing a disconnect; never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolveError {
    /// No link length within `[nominal, nominal + max_extension]` satisfies
    /// the bend/rigidity constraints for the current anchor separation.
    #[error("no feasible link length within the extension budget (anchor separation {separation})")]
    Infeasible { separation: f32 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
