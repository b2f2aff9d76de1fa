//! Pillar pair generation
//!
//! A pair always leaves exactly `pillar_gap` of clearance: the lower height is
//! random, the upper height is whatever remains of the total.

use glam::Vec3;
use rand::Rng;

use super::state::{Pillar, PillarPair};
use crate::physics::{BodyDesc, Shape, World};
use crate::settings::Settings;

/// Draw a lower pillar height from `[min, max)`
pub fn roll_lower_height<R: Rng + ?Sized>(rng: &mut R, settings: &Settings) -> f32 {
    rng.random_range(settings.pillar_min_height..settings.pillar_max_height)
}

/// Upper pillar height for a given lower height
pub fn upper_height(lower: f32, settings: &Settings) -> f32 {
    settings.pillar_total_height - lower - settings.pillar_gap
}

/// Centres and sizes of both pillars at `x`
fn pillar_boxes(x: f32, lower: f32, settings: &Settings) -> [(Vec3, Vec3); 2] {
    let upper = upper_height(lower, settings);
    let w = settings.pillar_width;
    [
        (Vec3::new(x, lower * 0.5, 0.0), Vec3::new(w, lower, w)),
        (
            Vec3::new(x, settings.pillar_total_height - upper * 0.5, 0.0),
            Vec3::new(w, upper, w),
        ),
    ]
}

/// Build a pair with a known lower height and register its bodies
pub fn build_pair(world: &mut World, settings: &Settings, x: f32, lower: f32) -> PillarPair {
    let [lower_box, upper_box] = pillar_boxes(x, lower, settings);
    let mut make = |(center, size): (Vec3, Vec3)| {
        let body = world.add_body(BodyDesc::fixed(
            Shape::Cuboid {
                half_extents: size * 0.5,
            },
            center,
        ));
        Pillar {
            center,
            size,
            body,
            highlight_until: 0,
        }
    };

    PillarPair {
        lower: make(lower_box),
        upper: make(upper_box),
        passed: false,
    }
}

/// Build a pair with a random gap position
pub fn spawn_pair<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    settings: &Settings,
    x: f32,
) -> PillarPair {
    let lower = roll_lower_height(rng, settings);
    build_pair(world, settings, x, lower)
}

/// Redraw the gap of an existing pair in place
pub fn reroll<R: Rng + ?Sized>(
    pair: &mut PillarPair,
    world: &mut World,
    rng: &mut R,
    settings: &Settings,
) {
    let lower = roll_lower_height(rng, settings);
    let boxes = pillar_boxes(pair.x(), lower, settings);
    for (pillar, (center, size)) in [&mut pair.lower, &mut pair.upper].into_iter().zip(boxes) {
        pillar.center = center;
        pillar.size = size;
        world.set_position(pillar.body, center);
        world.set_shape(
            pillar.body,
            Shape::Cuboid {
                half_extents: size * 0.5,
            },
        );
    }
}
