//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod arena;
pub mod collision;
pub mod pose;
pub mod state;
pub mod tick;

pub use pose::Pose;
pub use state::{CameraMode, Enemy, EnemyKind, GamePhase, GameState, Trap};
pub use tick::{PlayerAction, TickInput, spawn_enemies, tick};
