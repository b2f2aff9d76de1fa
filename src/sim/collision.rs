//! Ball vs pillar overlap and pass-through queries
//!
//! Coarse sphere-vs-box test: the sphere is treated as its bounding box, so two
//! shapes overlap when the centre distance is below `radius + half_extent` on every
//! axis at once. Corners are slightly generous compared to an exact test.

use glam::Vec3;

use super::state::{Ball, PillarPair, PillarSide};
use crate::within_extent;

/// A ball/pillar contact found this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub pair: usize,
    pub side: PillarSide,
}

/// Coarse sphere vs axis-aligned box overlap
#[inline]
pub fn sphere_box_overlap(
    sphere_center: Vec3,
    radius: f32,
    box_center: Vec3,
    half_extents: Vec3,
) -> bool {
    within_extent(sphere_center, box_center, half_extents + Vec3::splat(radius))
}

/// Which pillar of a pair (if any) the ball overlaps; lower is tested first
pub fn pair_overlap(ball: &Ball, pair: &PillarPair) -> Option<PillarSide> {
    [PillarSide::Lower, PillarSide::Upper].into_iter().find(|&side| {
        let pillar = pair.pillar(side);
        sphere_box_overlap(ball.pos, ball.radius, pillar.center, pillar.half_extents())
    })
}

/// First overlapping pillar in pair order
pub fn find_hit(ball: &Ball, pairs: &[PillarPair]) -> Option<Hit> {
    pairs
        .iter()
        .enumerate()
        .find_map(|(pair, p)| pair_overlap(ball, p).map(|side| Hit { pair, side }))
}

/// True the first tick a not-yet-scored pair's trailing edge is behind the ball
#[inline]
pub fn has_passed(ball: &Ball, pair: &PillarPair) -> bool {
    !pair.passed && pair.trailing_edge() < ball.pos.x
}
