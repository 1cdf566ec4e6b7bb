//! Recursive chain-fitting geometry.
//!
//! Places up to N rigid links between two anchor endpoints so the chain
//! halves meet at a droop-adjusted center point.  Each joint may deviate
//! from the nominal link direction by at most the per-axis bend limit;
//! rigid hoses additionally spend each side's single bend allowance on the
//! first link that side builds.
//!
//! The recursion is a pure function of its arguments: per-side bend state
//! is threaded through [`SideState`] values and links are accumulated in a
//! [`ChainHalves`] value returned by ownership, so a failed branch leaves
//! no trace and identical inputs always produce identical chains.

use nalgebra::{Unit, UnitQuaternion, Vector3};

use hoseline_core::types::Link;

/// Position tolerance for meeting the chain center (length units).
pub const CENTER_TOLERANCE: f32 = 0.1;

// ---------------------------------------------------------------------------
// SolveContext
// ---------------------------------------------------------------------------

/// Immutable per-attempt parameters shared by every recursion level.
#[derive(Debug, Clone)]
pub struct SolveContext {
    /// Unit direction of an unbent link in the solve frame.
    pub nominal_dir: Unit<Vector3<f32>>,
    /// Droop-adjusted point both chain halves grow toward.
    pub center: Vector3<f32>,
    /// Working link length for this attempt.
    pub link_length: f32,
    /// Per-axis joint bend limit (radians).
    pub max_bend: f32,
    /// Rigid hoses consume a side's bend allowance on its first link.
    pub rigid: bool,
}

// ---------------------------------------------------------------------------
// SideState
// ---------------------------------------------------------------------------

/// One end of the chain as the recursion sees it.
///
/// `angles` accumulates the per-axis (roll, pitch, yaw) deviation of this
/// side's entry direction from the nominal link direction; the realized
/// direction of the next link built from this side is the nominal direction
/// rotated by these angles.
#[derive(Debug, Clone, Copy)]
pub struct SideState {
    /// Current endpoint of this side.
    pub point: Vector3<f32>,
    /// Accumulated per-axis bend relative to the nominal direction.
    pub angles: Vector3<f32>,
    /// Whether this side may still introduce a bend.
    pub can_bend: bool,
}

impl SideState {
    /// Side state for an anchor: the entry angles are the anchor rotation's
    /// euler decomposition, and the bend allowance is fresh.
    pub fn new(point: Vector3<f32>, rotation: &UnitQuaternion<f32>) -> Self {
        let (roll, pitch, yaw) = rotation.euler_angles();
        Self {
            point,
            angles: Vector3::new(roll, pitch, yaw),
            can_bend: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ChainHalves
// ---------------------------------------------------------------------------

/// Links accumulated by one solve, kept as two halves until the caller
/// knows the whole solve succeeded.
///
/// Both halves are stored center-outward (the order the recursion unwinds
/// in); [`into_links`](Self::into_links) assembles the final start-to-end
/// order.
#[derive(Debug, Clone, Default)]
pub struct ChainHalves {
    /// Links grown from the start side, center-outward.
    front: Vec<Link>,
    /// Links grown from the end side, center-outward.
    back: Vec<Link>,
    /// Terminal link at the chain center, if one was needed.
    center: Option<Link>,
    /// Links that turned out not to be needed (diagnostic only).
    pub leftover: u32,
}

impl ChainHalves {
    /// Total links placed.
    pub fn len(&self) -> usize {
        self.front.len() + self.back.len() + usize::from(self.center.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assemble the final start-to-end link order.
    pub fn into_links(self) -> Vec<Link> {
        let mut links = Vec::with_capacity(self.len());
        links.extend(self.front.into_iter().rev());
        links.extend(self.center);
        links.extend(self.back);
        links
    }
}

// ---------------------------------------------------------------------------
// attempt_connect
// ---------------------------------------------------------------------------

/// Recursively place links between the two side states, meeting at
/// `ctx.center`.
///
/// Returns `None` when the geometry is infeasible at this link length; no
/// partial chain survives a failed branch.  Recursion depth is bounded by
/// `links_remaining`.
///
/// The terminal link's orientation is aimed from the start-side endpoint
/// toward the end-side endpoint (the fixed direction-combination
/// convention); when those endpoints coincide the start side's bend is
/// kept.  Swapping the anchors therefore mirrors the chain exactly.
pub fn attempt_connect(
    ctx: &SolveContext,
    start: SideState,
    end: SideState,
    links_remaining: u32,
) -> Option<ChainHalves> {
    debug_assert!(links_remaining >= 1);

    if links_remaining == 1 {
        // Terminal case: one link left, which must span the gap at the
        // center.  Each endpoint has to sit within half a link (plus
        // tolerance) of the center for the terminal link to cover it.
        let reach = ctx.link_length * 0.5 + CENTER_TOLERANCE;
        let start_gap = (start.point - ctx.center).norm();
        let end_gap = (end.point - ctx.center).norm();
        if start_gap > reach || end_gap > reach {
            return None;
        }

        let span = end.point - start.point;
        let angles = if span.norm() > f32::EPSILON {
            euler_towards(&ctx.nominal_dir, &span)
        } else {
            start.angles
        };
        let link = Link::new(ctx.center, bend_rotation(&angles));
        return Some(ChainHalves {
            center: Some(link),
            ..ChainHalves::default()
        });
    }

    // Two or more links left: grow the side currently farther from the
    // center.
    let work_from_end = (start.point - ctx.center).norm() < (end.point - ctx.center).norm();
    let working = if work_from_end { end } else { start };

    let to_center = ctx.center - working.point;
    if to_center.norm() <= ctx.link_length + CENTER_TOLERANCE {
        // Already within one link of the center; the remaining links are
        // not needed.
        return Some(ChainHalves {
            leftover: links_remaining,
            ..ChainHalves::default()
        });
    }

    // Aim the next link at the center, clamped by the joint bend limit.
    // A side that has spent its bend allowance is forced straight.
    let desired = euler_towards(&ctx.nominal_dir, &to_center);
    let headroom = if working.can_bend { ctx.max_bend } else { 0.0 };
    let delta = (desired - working.angles)
        .map(wrap_angle)
        .map(|a| a.clamp(-headroom, headroom));
    let angles = working.angles + delta;
    let rotation = bend_rotation(&angles);
    let direction = rotation * ctx.nominal_dir.into_inner();

    let link = Link::new(working.point + direction * (ctx.link_length * 0.5), rotation);
    let advanced = SideState {
        point: working.point + direction * ctx.link_length,
        angles,
        can_bend: working.can_bend && !ctx.rigid,
    };

    let (next_start, next_end) = if work_from_end {
        (start, advanced)
    } else {
        (advanced, end)
    };

    let mut halves = attempt_connect(ctx, next_start, next_end, links_remaining - 1)?;
    if work_from_end {
        halves.back.push(link);
    } else {
        halves.front.push(link);
    }
    Some(halves)
}

// ---------------------------------------------------------------------------
// Angle helpers
// ---------------------------------------------------------------------------

/// Euler angles (roll, pitch, yaw) of the rotation taking `nominal` onto
/// the direction of `target`.
///
/// Antiparallel targets have no unique minimal arc; a half-turn about a
/// deterministic perpendicular axis is used so repeated solves agree.
fn euler_towards(nominal: &Unit<Vector3<f32>>, target: &Vector3<f32>) -> Vector3<f32> {
    let rotation = UnitQuaternion::rotation_between(&nominal.into_inner(), target)
        .unwrap_or_else(|| {
            UnitQuaternion::from_axis_angle(&orthogonal(nominal), std::f32::consts::PI)
        });
    let (roll, pitch, yaw) = rotation.euler_angles();
    Vector3::new(roll, pitch, yaw)
}

/// Rotation realizing an accumulated per-axis bend.
fn bend_rotation(angles: &Vector3<f32>) -> UnitQuaternion<f32> {
    UnitQuaternion::from_euler_angles(angles.x, angles.y, angles.z)
}

/// Any unit vector perpendicular to `v`, chosen deterministically.
fn orthogonal(v: &Unit<Vector3<f32>>) -> Unit<Vector3<f32>> {
    let candidate = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    Unit::new_normalize(v.cross(&candidate))
}

/// Wrap an angle to within a half-turn of zero so deltas across the +-PI
/// seam stay small.  Float rounding in the remainder may land a seam value
/// on either endpoint; -PI and PI are the same half-turn.
fn wrap_angle(a: f32) -> f32 {
    let mut a = a % std::f32::consts::TAU;
    if a > std::f32::consts::PI {
        a -= std::f32::consts::TAU;
    } else if a <= -std::f32::consts::PI {
        a += std::f32::consts::TAU;
    }
    a
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
