//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec3;

use super::collision;
use super::obstacles;
use super::state::{GameEvent, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump key pressed since the last tick
    pub jump: bool,
    /// Autopilot - the game jumps on its own
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
///
/// The floor clamp runs before the ball and camera are synced, so the visible ball
/// never sits below the floor.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if input.jump || (input.autopilot && autopilot_wants_jump(state)) {
        jump(state);
    }

    state.world.step(dt);
    clamp_to_floor(state);
    sync_ball(state);
    update_camera(state);
    scroll_pillars(state);

    if let Some(hit) = collision::find_hit(&state.ball, &state.pairs) {
        let until = state.time_ticks.saturating_add(state.settings.highlight_ticks);
        state.pairs[hit.pair].pillar_mut(hit.side).highlight_until = until;
        state.push_event(GameEvent::Collision {
            pair: hit.pair,
            side: hit.side,
        });
        game_over(state);
        return;
    }

    score_passed_pairs(state);
}

/// Launch the ball upward
///
/// Returns false when air jumps are disabled and the ball has not landed since the
/// last jump.
pub fn jump(state: &mut GameState) -> bool {
    if !state.settings.allow_air_jump && !state.ball.can_jump {
        return false;
    }
    state.world.body_mut(state.ball.body).velocity.y = state.settings.jump_power;
    state.ball.can_jump = false;
    true
}

/// Report the final score and start over
pub fn game_over(state: &mut GameState) {
    let score = state.score;
    log::info!("Game over after {} ticks, score {}", state.time_ticks, score);
    state.push_event(GameEvent::GameOver { score });
    state.runs += 1;
    reset(state);
}

/// Put score, ball and pillars back to their starting layout
///
/// Heights, highlights and the tick counter are kept.
pub fn reset(state: &mut GameState) {
    state.score = 0;

    let spawn = state.settings.ball_spawn();
    let body = state.world.body_mut(state.ball.body);
    body.position = spawn;
    body.velocity = Vec3::ZERO;
    state.ball.pos = spawn;
    state.ball.can_jump = true;

    let GameState {
        pairs,
        world,
        settings,
        ..
    } = &mut *state;
    for (i, pair) in pairs.iter_mut().enumerate() {
        pair.set_x(settings.pair_start_x(i), world);
        pair.passed = false;
    }

    update_camera(state);
}

/// Autopilot: keep the ball bobbing just under the next gap's centre
pub fn autopilot_wants_jump(state: &GameState) -> bool {
    let ball = &state.ball;
    let next = state
        .pairs
        .iter()
        .filter(|p| p.trailing_edge() >= ball.pos.x - ball.radius)
        .min_by(|a, b| a.x().total_cmp(&b.x()));

    let Some(next) = next else {
        return false;
    };
    state.ball_velocity().y <= 0.0 && ball.pos.y < next.gap_center() - 1.0
}

fn clamp_to_floor(state: &mut GameState) {
    let floor = state.settings.floor_y();
    let body = state.world.body_mut(state.ball.body);
    if body.position.y <= floor {
        body.velocity.y = 0.0;
        if body.position.y < floor {
            body.position.y = floor;
        }
        state.ball.can_jump = true;
    }
}

fn sync_ball(state: &mut GameState) {
    let body = state.world.body_mut(state.ball.body);
    body.position.z = 0.0;
    state.ball.pos = body.position;
}

fn update_camera(state: &mut GameState) {
    state.camera.position = state.ball.pos;
    state.camera.target = state.ball.pos + Vec3::X * state.settings.look_ahead;
}

fn scroll_pillars(state: &mut GameState) {
    let GameState {
        pairs,
        world,
        rng,
        settings,
        ..
    } = &mut *state;

    let recycle_to_x = settings.recycle_target();
    let mut recycled = Vec::new();
    for (i, pair) in pairs.iter_mut().enumerate() {
        let x = pair.x() - settings.scroll_step;
        if x < settings.recycle_below_x {
            pair.set_x(recycle_to_x, world);
            pair.passed = false;
            if settings.reroll_on_recycle {
                obstacles::reroll(pair, world, rng, settings);
            }
            log::debug!("Recycled pair {} to x={}", i, recycle_to_x);
            recycled.push(i);
        } else {
            pair.set_x(x, world);
        }
    }

    for pair in recycled {
        state.push_event(GameEvent::Recycled { pair });
    }
}

fn score_passed_pairs(state: &mut GameState) {
    for i in 0..state.pairs.len() {
        if collision::has_passed(&state.ball, &state.pairs[i]) {
            state.pairs[i].passed = true;
            state.score += 1;
            log::debug!("Passed pair {}, score {}", i, state.score);
            state.push_event(GameEvent::PairPassed {
                pair: i,
                score: state.score,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::state::PillarSide;
    use crate::ui::Hud;
    use proptest::prelude::*;

    fn run(state: &mut GameState, input: &TickInput, ticks: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
            events.extend(state.drain_events());
        }
        events
    }

    fn autopilot() -> TickInput {
        TickInput {
            autopilot: true,
            ..Default::default()
        }
    }

    /// Hold the ball still at the centre of pair 0's gap
    fn park_in_gap(state: &mut GameState) {
        state.world.set_gravity(Vec3::ZERO);
        let pos = Vec3::new(0.0, state.pairs[0].gap_center(), 0.0);
        let body = state.world.body_mut(state.ball.body);
        body.position = pos;
        body.velocity = Vec3::ZERO;
        state.ball.pos = pos;
    }

    #[test]
    fn test_ball_settles_on_floor() {
        let settings = Settings {
            pillar_start_x: 10_000.0,
            ..Default::default()
        };
        let mut state = GameState::new(settings, 1);
        let events = run(&mut state, &TickInput::default(), 120);

        assert!(events.is_empty());
        assert_eq!(state.ball.pos.y, 1.0);
        assert_eq!(state.ball_velocity().y, 0.0);
        assert!(state.ball.can_jump);

        run(&mut state, &TickInput::default(), 60);
        assert_eq!(state.ball.pos.y, 1.0);
        assert_eq!(state.ball_velocity().y, 0.0);
    }

    #[test]
    fn test_pair_scores_once() {
        let mut state = GameState::new(Settings::default(), 9);
        park_in_gap(&mut state);
        let GameState { pairs, world, .. } = &mut state;
        pairs[0].set_x(-0.5, world);

        let events = run(&mut state, &TickInput::default(), 50);

        let passed: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PairPassed { .. }))
            .collect();
        assert_eq!(passed, vec![&GameEvent::PairPassed { pair: 0, score: 1 }]);
        assert_eq!(state.score, 1);
        assert!(state.pairs[0].passed);
        assert!(state.pairs[1..].iter().all(|p| !p.passed));
    }

    #[test]
    fn test_collision_resets_once() {
        let mut state = GameState::new(Settings::default(), 4);
        let mut hud = Hud::new();
        state.score = 3;
        assert_eq!(hud.sync(state.score), Some("Score: 3"));

        let GameState { pairs, world, .. } = &mut state;
        pairs[0].set_x(0.5, world);
        let pos = Vec3::new(0.0, 3.0, 0.0);
        state.world.set_position(state.ball.body, pos);

        let events = run(&mut state, &TickInput::default(), 1);

        assert_eq!(
            events,
            vec![
                GameEvent::Collision {
                    pair: 0,
                    side: PillarSide::Lower
                },
                GameEvent::GameOver { score: 3 },
            ]
        );
        assert_eq!(state.score, 0);
        assert_eq!(state.runs, 1);
        assert_eq!(hud.sync(state.score), Some("Score: 0"));
        assert_eq!(hud.text(), "Score: 0");

        assert_eq!(state.ball.pos, state.settings.ball_spawn());
        assert_eq!(state.ball_velocity(), Vec3::ZERO);
        for (i, pair) in state.pairs.iter().enumerate() {
            assert_eq!(pair.x(), state.settings.pair_start_x(i));
            assert!(!pair.passed);
        }

        let lower = &state.pairs[0].lower;
        assert!(lower.is_highlighted(state.time_ticks));
        assert!(!state.pairs[0].upper.is_highlighted(state.time_ticks));
    }

    #[test]
    fn test_highlight_expires() {
        let mut state = GameState::new(Settings::default(), 4);
        let GameState { pairs, world, .. } = &mut state;
        pairs[0].set_x(0.5, world);
        state
            .world
            .set_position(state.ball.body, Vec3::new(0.0, 3.0, 0.0));

        run(&mut state, &TickInput::default(), 1);
        assert!(state.pairs[0].lower.is_highlighted(state.time_ticks));

        let events = run(&mut state, &TickInput::default(), 29);
        assert!(events.is_empty());
        assert!(state.pairs[0].lower.is_highlighted(state.time_ticks));

        run(&mut state, &TickInput::default(), 1);
        assert!(!state.pairs[0].lower.is_highlighted(state.time_ticks));
    }

    #[test]
    fn test_huge_highlight_duration_saturates() {
        let settings = Settings::from_json(r#"{ "highlight_ticks": 18446744073709551615 }"#).unwrap();
        let mut state = GameState::new(settings, 4);
        let GameState { pairs, world, .. } = &mut state;
        pairs[0].set_x(0.5, world);
        state
            .world
            .set_position(state.ball.body, Vec3::new(0.0, 3.0, 0.0));

        let events = run(&mut state, &TickInput::default(), 1);

        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
        assert_eq!(state.pairs[0].lower.highlight_until, u64::MAX);
        assert!(state.pairs[0].lower.is_highlighted(state.time_ticks));
    }

    #[test]
    fn test_recycled_pairs_keep_loaded_spacing() {
        let settings =
            Settings::from_json(r#"{ "pillar_spacing": 25.0, "reroll_on_recycle": false }"#)
                .unwrap();
        let mut state = GameState::new(settings, 6);
        state.world.set_gravity(Vec3::ZERO);
        let high = Vec3::new(0.0, 100.0, 0.0);
        state.world.set_position(state.ball.body, high);
        state.ball.pos = high;

        let mut recycles = 0;
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            let events = state.drain_events();
            assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
            recycles += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Recycled { .. }))
                .count();

            let mut xs: Vec<f32> = state.pairs.iter().map(|p| p.x()).collect();
            xs.sort_by(f32::total_cmp);
            let closest = xs.windows(2).map(|w| w[1] - w[0]).fold(f32::MAX, f32::min);
            assert!(closest > 24.5, "pairs {:?} closer than the spacing", xs);
        }
        assert!(recycles >= 5);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = GameState::new(Settings::default(), 21);
        run(&mut state, &autopilot(), 400);
        assert!(state.score > 0);

        reset(&mut state);
        let once = (
            state.score,
            state.ball.pos,
            state.ball.can_jump,
            state.ball_velocity(),
            state.pairs.clone(),
            state.camera,
        );

        reset(&mut state);
        let twice = (
            state.score,
            state.ball.pos,
            state.ball.can_jump,
            state.ball_velocity(),
            state.pairs.clone(),
            state.camera,
        );

        assert_eq!(once, twice);
        assert_eq!(state.score, 0);
        assert_eq!(state.ball.pos, Vec3::new(0.0, 5.0, 0.0));
        assert!(state.pairs.iter().all(|p| !p.passed));
    }

    #[test]
    fn test_recycled_pair_scores_again() {
        let mut state = GameState::new(Settings::default(), 33);
        let GameState { pairs, world, .. } = &mut state;
        pairs[0].set_x(-19.95, world);
        pairs[0].passed = true;

        let events = run(&mut state, &autopilot(), 1);
        assert_eq!(events, vec![GameEvent::Recycled { pair: 0 }]);
        assert_eq!(state.pairs[0].x(), state.settings.recycle_target());
        assert!(!state.pairs[0].passed);
        assert!((state.pairs[0].gap() - state.settings.pillar_gap).abs() < 1e-4);

        let events = run(&mut state, &autopilot(), 1000);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::PairPassed { pair: 0, .. }))
        );
    }

    #[test]
    fn test_air_jump_gating() {
        let settings = Settings {
            allow_air_jump: false,
            pillar_start_x: 10_000.0,
            ..Default::default()
        };
        let mut state = GameState::new(settings, 1);

        assert!(jump(&mut state));
        assert_eq!(state.ball_velocity().y, 7.0);
        assert!(!jump(&mut state));

        run(&mut state, &TickInput::default(), 240);
        assert!(state.ball.can_jump);
        assert!(jump(&mut state));

        state.settings.allow_air_jump = true;
        assert!(jump(&mut state));
    }

    #[test]
    fn test_jump_input_lifts_ball() {
        let settings = Settings {
            pillar_start_x: 10_000.0,
            ..Default::default()
        };
        let mut state = GameState::new(settings, 1);
        run(&mut state, &TickInput::default(), 120);
        assert_eq!(state.ball.pos.y, 1.0);

        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        run(&mut state, &input, 1);
        assert!(state.ball.pos.y > 1.0);
        assert!(!state.ball.can_jump);
    }

    #[test]
    fn test_camera_follows_ball() {
        let mut state = GameState::new(Settings::default(), 2);
        run(&mut state, &TickInput::default(), 10);

        assert_eq!(state.camera.position, state.ball.pos);
        assert_eq!(
            state.camera.target,
            state.ball.pos + Vec3::new(5.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_pillars_scroll_with_bodies() {
        let mut state = GameState::new(Settings::default(), 2);
        run(&mut state, &TickInput::default(), 10);

        for (i, pair) in state.pairs.iter().enumerate() {
            assert!((pair.x() - (state.settings.pair_start_x(i) - 1.0)).abs() < 1e-4);
            for pillar in [&pair.lower, &pair.upper] {
                assert_eq!(state.world.body(pillar.body).position, pillar.center);
            }
        }
    }

    #[test]
    fn test_autopilot_survives() {
        let mut state = GameState::new(Settings::default(), 12345);
        let events = run(&mut state, &autopilot(), 1200);

        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
        assert!(state.score >= 4);
        assert_eq!(state.runs, 0);
    }

    #[test]
    fn test_deterministic_replay() {
        let mut a = GameState::new(Settings::default(), 7);
        let mut b = GameState::new(Settings::default(), 7);
        run(&mut a, &autopilot(), 600);
        run(&mut b, &autopilot(), 600);

        assert_eq!(a.score, b.score);
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.pairs, b.pairs);
    }

    proptest! {
        #[test]
        fn prop_ball_never_below_floor(jumps in proptest::collection::vec(any::<bool>(), 1..400)) {
            let mut state = GameState::new(Settings::default(), 77);
            let floor = state.settings.floor_y();
            for jump in jumps {
                let input = TickInput { jump, ..Default::default() };
                tick(&mut state, &input, SIM_DT);
                prop_assert!(state.ball.pos.y >= floor);
                prop_assert_eq!(state.ball.pos.z, 0.0);
            }
        }
    }
}
