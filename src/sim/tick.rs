//! Fixed timestep simulation tick
//!
//! Per-tick ordering: pause handling, one player action, player boundary
//! correction, per-enemy AI update plus boundary correction, collision
//! resolution, stop-condition check.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{EnemyKind, GamePhase, GameState};
use super::{ai, arena, collision};
use crate::consts::*;
use crate::polar_to_ground;

/// A discrete player action, mapped from one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    TurnLeft,
    TurnRight,
    Forward,
    Backward,
    PlaceTrap,
    ToggleView,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// At most one queued action dispatches per tick
    pub action: Option<PlayerAction>,
    /// Pause toggle
    pub pause: bool,
}

/// Populate the opening enemy wave: wanderers and seekers scattered at
/// uniformly random polar coordinates inside the arena.
pub fn spawn_enemies(state: &mut GameState) {
    let mut rng = Pcg32::seed_from_u64(state.seed);
    for _ in 0..WANDERER_COUNT {
        let position = random_ground_position(&mut rng);
        state.spawn_enemy(EnemyKind::Wanderer, position);
    }
    for _ in 0..SEEKER_COUNT {
        let position = random_ground_position(&mut rng);
        state.spawn_enemy(EnemyKind::Seeker, position);
    }
    log::info!(
        "Spawned {} wanderers and {} seekers (seed {})",
        WANDERER_COUNT,
        SEEKER_COUNT,
        state.seed
    );
}

fn random_ground_position(rng: &mut Pcg32) -> glam::Vec3 {
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    let r = rng.random_range(0.0..GROUND_RADIUS);
    polar_to_ground(r, theta)
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::Cleared => {}
        }
    }

    // Don't tick if paused or already cleared
    match state.phase {
        GamePhase::Paused | GamePhase::Cleared => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    let mut rng = state.tick_rng();

    // One queued player action per tick
    if let Some(action) = input.action {
        apply_action(state, action);
    }
    arena::redirect_player(&mut state.player);

    // AI update, then boundary correction, per enemy in id order
    let player_position = state.player.position;
    for enemy in &mut state.enemies {
        match enemy.kind {
            EnemyKind::Wanderer => ai::wander(&mut enemy.pose, &mut rng),
            EnemyKind::Seeker => ai::seek(&mut enemy.pose, player_position, &mut rng),
        }
        arena::redirect_enemy(&mut enemy.pose, &mut rng);
    }

    // Collision resolution over the post-move sets
    let destroyed = collision::resolve_collisions(&mut state.traps, &mut state.enemies);
    for (trap_id, enemy_id) in &destroyed {
        log::info!("Trap {trap_id} destroyed enemy {enemy_id}");
    }

    // Stop condition: the game is cleared once the last enemy dies
    if !destroyed.is_empty() && state.enemies.is_empty() {
        state.phase = GamePhase::Cleared;
        log::info!("All enemies destroyed after {} ticks", state.time_ticks);
    }
}

/// Map one discrete input event to exactly one player operation
fn apply_action(state: &mut GameState, action: PlayerAction) {
    match action {
        PlayerAction::TurnLeft => state.player.turn(TURN_STEP_DEGREES),
        PlayerAction::TurnRight => state.player.turn(-TURN_STEP_DEGREES),
        PlayerAction::Forward => state.player.move_forward(),
        PlayerAction::Backward => state.player.move_backward(),
        PlayerAction::PlaceTrap => {
            let id = state.place_trap(state.player.position);
            log::debug!("Trap {id} placed at {}", state.player.position);
            // Forward thrust while planting: one step at lunge speed
            state.player.speed = LUNGE_SPEED;
            state.player.move_forward();
            state.player.speed = PLAYER_SPEED;
        }
        PlayerAction::ToggleView => state.camera_mode.toggle(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::trap_hits;
    use crate::sim::state::CameraMode;
    use glam::Vec3;

    fn action_input(action: PlayerAction) -> TickInput {
        TickInput {
            action: Some(action),
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_pause_toggle() {
        let mut state = GameState::new(1);
        state.spawn_enemy(EnemyKind::Wanderer, Vec3::new(50.0, 0.0, 0.0));

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks_when_paused = state.time_ticks;

        // A paused world does not advance
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks_when_paused);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_turn_actions_step_five_degrees() {
        let mut state = GameState::new(1);
        tick(&mut state, &action_input(PlayerAction::TurnLeft));
        let expected = 5.0_f32.to_radians();
        let deviation = state.player.heading.dot(Vec3::Z).clamp(-1.0, 1.0).acos();
        assert!((deviation - expected).abs() < 1e-4);

        // Opposite turn restores the original heading
        tick(&mut state, &action_input(PlayerAction::TurnRight));
        assert!(state.player.heading.distance(Vec3::Z) < 1e-5);
    }

    #[test]
    fn test_place_trap_lunges_and_restores_speed() {
        let mut state = GameState::new(1);
        tick(&mut state, &action_input(PlayerAction::PlaceTrap));

        assert_eq!(state.traps.len(), 1);
        // Trap sits where the player stood; the player lunged one step ahead
        assert!(state.traps[0].position.distance(Vec3::ZERO) < 1e-5);
        assert!((state.player.position.z - LUNGE_SPEED).abs() < 1e-5);
        assert!((state.player.speed - PLAYER_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn test_toggle_view_flips_camera_mode() {
        let mut state = GameState::new(1);
        tick(&mut state, &action_input(PlayerAction::ToggleView));
        assert_eq!(state.camera_mode, CameraMode::FirstPerson);
        tick(&mut state, &action_input(PlayerAction::ToggleView));
        assert_eq!(state.camera_mode, CameraMode::ThirdPerson);
    }

    #[test]
    fn test_player_boundary_reversal() {
        let mut state = GameState::new(1);
        state.player.position = Vec3::new(0.0, 0.0, GROUND_RADIUS + 1.0);
        tick(&mut state, &TickInput::default());
        // Exactly reversed: facing -Z
        assert!(state.player.heading.distance(-Vec3::Z) < 1e-5);
    }

    #[test]
    fn test_seeker_closes_on_stationary_player() {
        // The bearing-bounded turn shrinks the offset angle over time, so a
        // seeker homes in on a player who never moves.
        let mut state = GameState::new(9);
        state.spawn_enemy(EnemyKind::Seeker, Vec3::new(40.0, 0.0, 0.0));
        let mut min_distance = 40.0_f32;
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default());
            let distance = state.enemies[0].pose.position.distance(state.player.position);
            min_distance = min_distance.min(distance);
        }
        assert!(
            min_distance < 20.0,
            "seeker never closed in: min distance {min_distance}"
        );
    }

    #[test]
    fn test_trap_destroys_enemy_on_first_overlapping_tick() {
        // End-to-end: wanderer at (10,0,0) walking +Z, trap one step ahead
        let mut state = GameState::new(7);
        state.spawn_enemy(EnemyKind::Wanderer, Vec3::new(10.0, 0.0, 0.0));
        let trap_position = Vec3::new(10.0, 0.0, 1.0);
        state.place_trap(trap_position);

        let mut cleared_tick = None;
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
            if state.enemies.is_empty() {
                // Trap and enemy leave the live sets on the same tick
                assert!(state.traps.is_empty());
                cleared_tick = Some(state.time_ticks);
                break;
            }
            // While the enemy lives it must be outside the trap radius
            assert!(!trap_hits(&state.traps[0], state.enemies[0].pose.position));
        }

        // One tick of ±5° jitter cannot carry the enemy past the radius
        assert_eq!(cleared_tick, Some(1));
        assert_eq!(state.phase, GamePhase::Cleared);
    }

    #[test]
    fn test_cleared_state_freezes() {
        let mut state = GameState::new(7);
        state.spawn_enemy(EnemyKind::Wanderer, Vec3::new(10.0, 0.0, 0.0));
        state.place_trap(Vec3::new(10.0, 0.0, 1.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Cleared);

        let frozen_ticks = state.time_ticks;
        tick(&mut state, &action_input(PlayerAction::Forward));
        assert_eq!(state.time_ticks, frozen_ticks);
        assert!(state.player.position.distance(Vec3::ZERO) < 1e-5);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and inputs stay identical
        let mut state1 = GameState::new(99_999);
        let mut state2 = GameState::new(99_999);
        spawn_enemies(&mut state1);
        spawn_enemies(&mut state2);

        let inputs = [
            action_input(PlayerAction::Forward),
            action_input(PlayerAction::TurnLeft),
            action_input(PlayerAction::PlaceTrap),
            TickInput::default(),
            action_input(PlayerAction::Backward),
        ];

        for input in inputs.iter().cycle().take(250) {
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.traps.len(), state2.traps.len());
        assert!(state1.player.position.distance(state2.player.position) < 1e-6);
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.id, b.id);
            assert!(a.pose.position.distance(b.pose.position) < 1e-6);
        }
    }

    #[test]
    fn test_spawned_enemies_inside_arena() {
        let mut state = GameState::new(4242);
        spawn_enemies(&mut state);
        assert_eq!(state.enemies.len(), WANDERER_COUNT + SEEKER_COUNT);
        for enemy in &state.enemies {
            assert!(enemy.pose.position.length() < GROUND_RADIUS);
            assert!(enemy.pose.position.y.abs() < f32::EPSILON);
        }
    }
}
