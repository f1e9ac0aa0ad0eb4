//! Game state and core simulation types

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pose::Pose;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every enemy has been destroyed
    Cleared,
}

/// Camera mode, consumed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Locked to the player pose, narrow view
    FirstPerson,
    /// Fixed overhead view of the whole arena, wide view
    #[default]
    ThirdPerson,
}

impl CameraMode {
    pub fn toggle(&mut self) {
        *self = match self {
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
        };
    }
}

/// Enemy behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Undirected random-walk drift
    Wanderer,
    /// Turns within the bearing cone toward the player; slower
    Seeker,
}

impl EnemyKind {
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Wanderer => WANDERER_SPEED,
            EnemyKind::Seeker => SEEKER_SPEED,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pose: Pose,
}

/// A static trap marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trap {
    pub id: u32,
    pub position: Vec3,
    pub radius: f32,
    /// Tick the trap was placed on (drives the renderer's glow pulse)
    pub placed_tick: u64,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Flipped by the toggle-view action
    pub camera_mode: CameraMode,
    /// The player pose (exactly one player)
    pub player: Pose,
    /// Live enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Live traps (sorted by id for determinism)
    pub traps: Vec<Trap>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed: the player at the
    /// origin facing +Z, no enemies, no traps yet.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Playing,
            camera_mode: CameraMode::default(),
            player: Pose::new(Vec3::ZERO, Vec3::Z, PLAYER_SPEED),
            enemies: Vec::new(),
            traps: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// RNG for the current tick, derived from the run seed and the tick
    /// counter so serialized state never carries RNG internals.
    pub fn tick_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ self.time_ticks.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Spawn an enemy of the given kind, facing +Z at its kind's speed
    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            kind,
            pose: Pose::new(position, Vec3::Z, kind.speed()),
        });
        id
    }

    /// Place a trap at the given position
    pub fn place_trap(&mut self, position: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.traps.push(Trap {
            id,
            position,
            radius: TRAP_RADIUS,
            placed_tick: self.time_ticks,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_player_at_origin_facing_z() {
        let state = GameState::new(1);
        assert!(state.player.position.distance(Vec3::ZERO) < 1e-6);
        assert!(state.player.heading.distance(Vec3::Z) < 1e-6);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.camera_mode, CameraMode::ThirdPerson);
    }

    #[test]
    fn test_entity_ids_monotonic() {
        let mut state = GameState::new(1);
        let a = state.spawn_enemy(EnemyKind::Wanderer, Vec3::new(1.0, 0.0, 0.0));
        let b = state.spawn_enemy(EnemyKind::Seeker, Vec3::new(2.0, 0.0, 0.0));
        let c = state.place_trap(Vec3::ZERO);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_enemy_kind_speeds() {
        assert!((EnemyKind::Wanderer.speed() - WANDERER_SPEED).abs() < f32::EPSILON);
        assert!((EnemyKind::Seeker.speed() - SEEKER_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn test_camera_toggle_round_trip() {
        let mut mode = CameraMode::ThirdPerson;
        mode.toggle();
        assert_eq!(mode, CameraMode::FirstPerson);
        mode.toggle();
        assert_eq!(mode, CameraMode::ThirdPerson);
    }

    #[test]
    fn test_tick_rng_differs_between_ticks() {
        use rand::Rng;
        let mut state = GameState::new(123);
        let a: u64 = state.tick_rng().random();
        state.time_ticks += 1;
        let b: u64 = state.tick_rng().random();
        assert_ne!(a, b);
    }
}
