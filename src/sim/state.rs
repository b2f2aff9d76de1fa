//! Game state and core simulation types
//!
//! Everything the game loop mutates lives in [`GameState`]; the renderer and the
//! collision queries only read it.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacles;
use crate::physics::{BodyDesc, BodyHandle, Shape, World};
use crate::settings::Settings;

/// Things that happened during a tick, drained by the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A pair was passed and the score incremented
    PairPassed { pair: usize, score: u64 },
    /// The ball touched a pillar
    Collision { pair: usize, side: PillarSide },
    /// The run ended with this score and the game was reset
    GameOver { score: u64 },
    /// A pair wrapped from behind the camera to the spawn distance
    Recycled { pair: usize },
}

/// Which member of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PillarSide {
    Lower,
    Upper,
}

/// The player's ball
///
/// Position and velocity are owned by the physics body; `pos` is the visual copy
/// taken after each physics step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub body: BodyHandle,
    pub pos: Vec3,
    pub radius: f32,
    /// Set while resting on the floor, cleared by a jump
    pub can_jump: bool,
}

/// One obstacle box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    pub center: Vec3,
    /// Full width, height and depth
    pub size: Vec3,
    pub body: BodyHandle,
    /// Tick until which the pillar shows the collision colour
    #[serde(default)]
    pub highlight_until: u64,
}

impl Pillar {
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.size.y * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.size.y * 0.5
    }

    pub fn is_highlighted(&self, now: u64) -> bool {
        now < self.highlight_until
    }
}

/// Lower and upper pillar sharing one x-offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarPair {
    pub lower: Pillar,
    pub upper: Pillar,
    /// Already scored during the current pass
    pub passed: bool,
}

impl PillarPair {
    pub fn x(&self) -> f32 {
        self.lower.center.x
    }

    /// Vertical clearance between the two pillars
    pub fn gap(&self) -> f32 {
        self.upper.bottom() - self.lower.top()
    }

    pub fn gap_center(&self) -> f32 {
        (self.lower.top() + self.upper.bottom()) * 0.5
    }

    /// The edge furthest behind in the direction of travel
    pub fn trailing_edge(&self) -> f32 {
        self.x() + self.lower.size.x * 0.5
    }

    pub fn pillar(&self, side: PillarSide) -> &Pillar {
        match side {
            PillarSide::Lower => &self.lower,
            PillarSide::Upper => &self.upper,
        }
    }

    pub fn pillar_mut(&mut self, side: PillarSide) -> &mut Pillar {
        match side {
            PillarSide::Lower => &mut self.lower,
            PillarSide::Upper => &mut self.upper,
        }
    }

    /// Move both pillars, visuals and bodies together
    pub fn set_x(&mut self, x: f32, world: &mut World) {
        for pillar in [&mut self.lower, &mut self.upper] {
            pillar.center.x = x;
            world.set_position(pillar.body, pillar.center);
        }
    }
}

/// Where the camera sits and what it looks at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub world: World,
    pub ground: BodyHandle,
    pub ball: Ball,
    /// Fixed pool, recycled in place
    pub pairs: Vec<PillarPair>,
    pub score: u64,
    /// Simulation tick counter (never reset)
    pub time_ticks: u64,
    /// Completed runs
    pub runs: u64,
    pub camera: CameraRig,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build the world, the ball and the pillar pool
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut world = World::new();
        world.set_gravity(Vec3::new(0.0, settings.gravity, 0.0));

        let ground = world.add_body(BodyDesc::fixed(Shape::Plane, Vec3::ZERO));

        let spawn = settings.ball_spawn();
        let body = world.add_body(BodyDesc {
            mass: settings.ball_mass,
            shape: Shape::Sphere {
                radius: settings.ball_radius,
            },
            position: spawn,
            linear_damping: settings.ball_damping,
        });
        let ball = Ball {
            body,
            pos: spawn,
            radius: settings.ball_radius,
            can_jump: true,
        };

        let pairs = (0..settings.pillar_pairs)
            .map(|i| obstacles::spawn_pair(&mut world, &mut rng, &settings, settings.pair_start_x(i)))
            .collect();

        let camera = CameraRig {
            position: spawn,
            target: spawn + Vec3::X * settings.look_ahead,
        };

        Self {
            settings,
            seed,
            rng,
            world,
            ground,
            ball,
            pairs,
            score: 0,
            time_ticks: 0,
            runs: 0,
            camera,
            events: Vec::new(),
        }
    }

    pub fn ball_velocity(&self) -> Vec3 {
        self.world.body(self.ball.body).velocity
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
