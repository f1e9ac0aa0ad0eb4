//! Ground-plane pose and movement primitives
//!
//! Every actor shares one pose: a position, a unit heading on the y = 0
//! plane, and a speed in units per tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, facing direction and per-tick speed of an actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Unit forward direction; y stays 0 for ground-plane motion
    pub heading: Vec3,
    /// Units per tick
    pub speed: f32,
}

impl Pose {
    /// Create a pose; the heading is normalized on construction
    pub fn new(position: Vec3, heading: Vec3, speed: f32) -> Self {
        Self {
            position,
            heading: heading.normalize(),
            speed,
        }
    }

    /// Rotate the heading about the vertical axis by a signed angle in
    /// degrees, then renormalize to guard against drift.
    ///
    /// Sign convention: a +90° turn takes heading (0,0,1) to (1,0,0).
    pub fn turn(&mut self, angle_degrees: f32) {
        let rotation = Quat::from_rotation_y(angle_degrees.to_radians());
        self.heading = (rotation * self.heading).normalize();
    }

    /// One step along the heading
    pub fn move_forward(&mut self) {
        self.position += self.heading * self.speed;
    }

    /// One step against the heading
    pub fn move_backward(&mut self) {
        self.position -= self.heading * self.speed;
    }
}
