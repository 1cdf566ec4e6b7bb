//! Chain-fitting solver for multi-link hose connectors.
//!
//! Given two anchor frames and a [`HoseDefinition`](hoseline_core::HoseDefinition),
//! computes an ordered chain of rigid links that connects them, respecting
//! per-joint bend limits, the optional rigidity constraint, and a bounded
//! link-extension budget.
//!
//! # Architecture
//!
//! ```text
//! anchors ──► LengthAdapter ──► attempt_connect ──► ChainSolution
//! ```
//!
//! [`chain`] holds the pure recursive geometry; [`adapter`] wraps it in a
//! bounded bisection search over link length.  Both are free of ECS and I/O
//! concerns: output depends only on the arguments, so solves are re-entrant
//! and may run in parallel across connector instances.

pub mod adapter;
pub mod chain;

pub use adapter::{AdapterConfig, ChainSolution, LengthAdapter};
pub use chain::{attempt_connect, ChainHalves, SideState, SolveContext, CENTER_TOLERANCE};
