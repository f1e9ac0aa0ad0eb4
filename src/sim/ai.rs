//! Enemy behaviors
//!
//! Two variants drive the shared movement primitives: wanderers drift with
//! undirected heading jitter, seekers turn within the bearing cone toward
//! the player.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::pose::Pose;
use crate::consts::WANDER_JITTER_DEGREES;

/// Angle in degrees between the pose's heading and the vector from the pose
/// to `target`. `None` when the two positions coincide and the bearing is
/// undefined.
pub fn bearing_degrees(pose: &Pose, target: Vec3) -> Option<f32> {
    let to_target = target - pose.position;
    let distance = to_target.length();
    if distance <= f32::EPSILON {
        return None;
    }
    // Float overshoot can push the cosine fractionally past ±1, outside
    // acos' domain.
    let cos_beta = (to_target.dot(pose.heading) / (distance * pose.heading.length()))
        .clamp(-1.0, 1.0);
    Some(cos_beta.acos().to_degrees())
}

/// Random-walk update: jitter the heading, then step forward
pub fn wander(pose: &mut Pose, rng: &mut Pcg32) {
    pose.turn(rng.random_range(-WANDER_JITTER_DEGREES..=WANDER_JITTER_DEGREES));
    pose.move_forward();
}

/// Biased pursuit update: turn by a uniform angle within ±β, where β is the
/// bearing to the target, then step forward. The turn is bounded by the
/// bearing, not aligned with it. A coincident target means no turn this
/// tick.
pub fn seek(pose: &mut Pose, target: Vec3, rng: &mut Pcg32) {
    if let Some(beta) = bearing_degrees(pose, target) {
        pose.turn(rng.random_range(-beta..=beta));
    }
    pose.move_forward();
}
