//! Scene graph built from the game state each frame
//!
//! The scene owns no simulation data: every node is derived from [`GameState`]
//! and thrown away after the frame is drawn.

use glam::{Mat4, Vec3};

use super::vertex::colors;
use crate::consts::GROUND_SIZE;
use crate::sim::{GameState, Pillar};

/// Which unit mesh a node draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Sphere,
    Cube,
    Plane,
}

/// Solid, unlit colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub mesh: MeshKind,
    pub transform: Mat4,
    pub material: Material,
    pub visible: bool,
}

impl Node {
    pub fn new(mesh: MeshKind, transform: Mat4, color: [f32; 4]) -> Self {
        Self {
            mesh,
            transform,
            material: Material { color },
            visible: true,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub nodes: Vec<Node>,
    pub clear_color: [f32; 4],
}

impl Scene {
    /// Ground, ball and every pillar
    pub fn from_state(state: &GameState) -> Self {
        let mut nodes = Vec::with_capacity(2 + state.pairs.len() * 2);

        nodes.push(Node::new(
            MeshKind::Plane,
            Mat4::from_scale_rotation_translation(
                Vec3::new(GROUND_SIZE, 1.0, GROUND_SIZE),
                glam::Quat::IDENTITY,
                state.world.body(state.ground).position,
            ),
            colors::GROUND,
        ));

        nodes.push(Node::new(
            MeshKind::Sphere,
            Mat4::from_scale_rotation_translation(
                Vec3::splat(state.ball.radius),
                glam::Quat::IDENTITY,
                state.ball.pos,
            ),
            colors::BALL,
        ));

        for pair in &state.pairs {
            for pillar in [&pair.lower, &pair.upper] {
                nodes.push(pillar_node(pillar, state.time_ticks));
            }
        }

        Self {
            nodes,
            clear_color: colors::SKY,
        }
    }

    /// Visible nodes in draw order
    ///
    /// There is no depth buffer, so flat ground goes first and everything else is
    /// painted back to front from `eye`.
    pub fn draw_order(&self, eye: Vec3) -> Vec<&Node> {
        let (mut flat, mut solid): (Vec<&Node>, Vec<&Node>) = self
            .nodes
            .iter()
            .filter(|n| n.visible)
            .partition(|n| n.mesh == MeshKind::Plane);

        solid.sort_by(|a, b| {
            let da = a.position().distance_squared(eye);
            let db = b.position().distance_squared(eye);
            db.total_cmp(&da)
        });

        flat.append(&mut solid);
        flat
    }
}

fn pillar_node(pillar: &Pillar, now: u64) -> Node {
    let color = if pillar.is_highlighted(now) {
        colors::PILLAR_HIT
    } else {
        colors::PILLAR
    };
    Node::new(
        MeshKind::Cube,
        Mat4::from_scale_rotation_translation(pillar.size, glam::Quat::IDENTITY, pillar.center),
        color,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_scene_mirrors_state() {
        let state = GameState::new(Settings::default(), 1);
        let scene = Scene::from_state(&state);

        assert_eq!(scene.nodes.len(), 12);
        assert_eq!(scene.clear_color, colors::SKY);
        assert_eq!(scene.nodes[0].position(), state.world.body(state.ground).position);
        assert_eq!(scene.nodes[1].position(), state.ball.pos);

        let cubes: Vec<_> = scene
            .nodes
            .iter()
            .filter(|n| n.mesh == MeshKind::Cube)
            .collect();
        assert_eq!(cubes.len(), 10);
        assert_eq!(cubes[0].position(), state.pairs[0].lower.center);
        assert_eq!(cubes[1].position(), state.pairs[0].upper.center);
        assert!(cubes.iter().all(|n| n.material.color == colors::PILLAR));
    }

    #[test]
    fn test_highlighted_pillar_turns_yellow() {
        let mut state = GameState::new(Settings::default(), 1);
        state.time_ticks = 100;
        state.pairs[2].upper.highlight_until = 130;

        let scene = Scene::from_state(&state);
        let node = scene
            .nodes
            .iter()
            .find(|n| n.position() == state.pairs[2].upper.center)
            .unwrap();
        assert_eq!(node.material.color, colors::PILLAR_HIT);

        state.time_ticks = 130;
        let scene = Scene::from_state(&state);
        assert!(
            scene
                .nodes
                .iter()
                .all(|n| n.material.color != colors::PILLAR_HIT)
        );
    }

    #[test]
    fn test_draw_order_back_to_front() {
        let state = GameState::new(Settings::default(), 1);
        let mut scene = Scene::from_state(&state);
        scene.nodes[3].visible = false;

        let eye = state.camera.position;
        let order = scene.draw_order(eye);

        assert_eq!(order.len(), 11);
        assert_eq!(order[0].mesh, MeshKind::Plane);
        let distances: Vec<f32> = order[1..]
            .iter()
            .map(|n| n.position().distance(eye))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(order.last().unwrap().mesh, MeshKind::Sphere);
    }
}
