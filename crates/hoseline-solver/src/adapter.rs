//! Link-length adaptation around the chain solver.
//!
//! Extensible hoses may stretch each link up to `max_extension` beyond its
//! nominal length.  The adapter first tries the nominal length, then the
//! fully-extended length, then bisects between the shortest known-feasible
//! and longest known-infeasible lengths, returning the tautest chain found
//! within the attempt budget.

use hoseline_core::config::HoseDefinition;
use hoseline_core::error::SolveError;
use hoseline_core::types::{Link, Pose};

use crate::chain::{attempt_connect, ChainHalves, SideState, SolveContext};

// ---------------------------------------------------------------------------
// AdapterConfig
// ---------------------------------------------------------------------------

/// Tuning for [`LengthAdapter`].
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Upper bound on solve attempts per call, bisection included.
    pub max_attempts: u32,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

// ---------------------------------------------------------------------------
// ChainSolution
// ---------------------------------------------------------------------------

/// A fitted chain, ready for publication.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSolution {
    /// Link poses in start-to-end order.
    pub links: Vec<Link>,
    /// Link length the chain was fitted at.
    pub link_length: f32,
    /// Links the fit did not need.
    pub leftover: u32,
    /// Solve attempts spent.
    pub attempts: u32,
}

// ---------------------------------------------------------------------------
// LengthAdapter
// ---------------------------------------------------------------------------

/// Drives [`attempt_connect`] across candidate link lengths.
#[derive(Debug, Clone, Default)]
pub struct LengthAdapter {
    config: AdapterConfig,
}

impl LengthAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    /// Fit a chain between the fixed anchor and the mobile nozzle.
    ///
    /// `droop` is the vertical sag applied to the meeting point; pass the
    /// definition's connected or disconnected droop depending on state.
    /// Fixed-length hoses get exactly one attempt; extensible hoses get up
    /// to `max_attempts`, and the shortest feasible length found wins.
    pub fn solve(
        &self,
        def: &HoseDefinition,
        fixed: &Pose,
        nozzle: &Pose,
        droop: f32,
    ) -> Result<ChainSolution, SolveError> {
        let start_point = fixed.position;
        let end_point = nozzle.position + nozzle.rotation * def.nozzle_link_offset_vec();
        let separation = (end_point - start_point).norm();

        let mut center = (start_point + end_point) * 0.5;
        center.y -= droop;

        let nominal = def.nominal_length();
        let start = SideState::new(start_point, &fixed.rotation);
        let end = SideState::new(end_point, &nozzle.rotation);

        let mut attempts = 0;
        let try_length = |length: f32, attempts: &mut u32| -> Option<ChainHalves> {
            *attempts += 1;
            let ctx = SolveContext {
                nominal_dir: def.nominal_dir(),
                center,
                link_length: length,
                max_bend: def.max_bend_rad(),
                rigid: def.rigid,
            };
            attempt_connect(&ctx, start, end, def.num_links)
        };

        if let Some(halves) = try_length(nominal, &mut attempts) {
            return Ok(Self::solution(halves, nominal, attempts));
        }
        if def.max_extension <= 0.0 || attempts >= self.config.max_attempts {
            return Err(SolveError::Infeasible { separation });
        }

        let extended = nominal + def.max_extension;
        let Some(best) = try_length(extended, &mut attempts) else {
            return Err(SolveError::Infeasible { separation });
        };

        // Bisect between the infeasible nominal length and the feasible
        // extended length, keeping the shortest length that still fits.
        let mut lo = nominal;
        let mut hi = extended;
        let mut best = (best, hi);
        while attempts < self.config.max_attempts {
            let mid = (lo + hi) * 0.5;
            match try_length(mid, &mut attempts) {
                Some(halves) => {
                    best = (halves, mid);
                    hi = mid;
                }
                None => lo = mid,
            }
        }

        let (halves, length) = best;
        Ok(Self::solution(halves, length, attempts))
    }

    fn solution(halves: ChainHalves, link_length: f32, attempts: u32) -> ChainSolution {
        let leftover = halves.leftover;
        ChainSolution {
            links: halves.into_links(),
            link_length,
            leftover,
            attempts,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
