//! Onslaught - a circular arena trap-laying action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, AI, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Display preferences

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (30 Hz; movement is expressed in units/tick)
    pub const SIM_DT: f32 = 1.0 / 30.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Radius of the circular ground disc
    pub const GROUND_RADIUS: f32 = 100.0;

    /// Enemy population at game start
    pub const WANDERER_COUNT: usize = 5;
    pub const SEEKER_COUNT: usize = 5;

    /// Movement speeds, units per tick
    pub const PLAYER_SPEED: f32 = 1.0;
    pub const WANDERER_SPEED: f32 = 1.0;
    pub const SEEKER_SPEED: f32 = 0.2;
    /// Forward thrust while planting a trap
    pub const LUNGE_SPEED: f32 = 4.0;

    /// Player turn step per input event (degrees)
    pub const TURN_STEP_DEGREES: f32 = 5.0;
    /// Wanderer heading jitter per tick (degrees, symmetric)
    pub const WANDER_JITTER_DEGREES: f32 = 5.0;

    /// Trap kill radius
    pub const TRAP_RADIUS: f32 = 1.0;

    /// Corrective turn range for enemies straying past the rim (degrees)
    pub const BOUNDARY_TURN_MIN_DEGREES: f32 = 150.0;
    pub const BOUNDARY_TURN_MAX_DEGREES: f32 = 210.0;
}

/// Convert polar ground coordinates (r, theta) to a point on the y = 0 plane
#[inline]
pub fn polar_to_ground(r: f32, theta: f32) -> Vec3 {
    Vec3::new(r * theta.cos(), 0.0, r * theta.sin())
}

/// Project a world position onto the ground plane as (x, z)
#[inline]
pub fn ground_xz(p: Vec3) -> [f32; 2] {
    [p.x, p.z]
}
