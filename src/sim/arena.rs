//! Circular keep-in boundary
//!
//! Straying actors are turned around, not moved back: the correction
//! adjusts heading only, so an actor can finish a tick outside the rim and
//! re-enter on a later one.

use rand::Rng;
use rand_pcg::Pcg32;

use super::pose::Pose;
use crate::consts::{BOUNDARY_TURN_MAX_DEGREES, BOUNDARY_TURN_MIN_DEGREES, GROUND_RADIUS};

/// True once the pose has reached or passed the arena rim
pub fn outside_arena(pose: &Pose) -> bool {
    pose.position.length() >= GROUND_RADIUS
}

/// Deterministic 180° reversal for the player
pub fn redirect_player(pose: &mut Pose) {
    if outside_arena(pose) {
        pose.turn(180.0);
    }
}

/// Randomized 150°-210° reversal for enemies
pub fn redirect_enemy(pose: &mut Pose, rng: &mut Pcg32) {
    if outside_arena(pose) {
        pose.turn(rng.random_range(BOUNDARY_TURN_MIN_DEGREES..=BOUNDARY_TURN_MAX_DEGREES));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::SeedableRng;

    #[test]
    fn test_rim_triggers_correction() {
        let mut pose = Pose::new(Vec3::new(GROUND_RADIUS, 0.0, 0.0), Vec3::X, 1.0);
        redirect_player(&mut pose);
        // Reversed: now facing back toward the center
        assert!(pose.heading.distance(-Vec3::X) < 1e-5);
        // Position untouched (soft constraint)
        assert!((pose.position.x - GROUND_RADIUS).abs() < 1e-5);
    }

    #[test]
    fn test_inside_rim_no_correction() {
        let mut pose = Pose::new(Vec3::new(99.999, 0.0, 0.0), Vec3::X, 1.0);
        redirect_player(&mut pose);
        assert!(pose.heading.distance(Vec3::X) < 1e-5);
    }

    #[test]
    fn test_enemy_correction_points_back_inward() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let mut pose = Pose::new(Vec3::new(0.0, 0.0, 120.0), Vec3::Z, 1.0);
            redirect_enemy(&mut pose, &mut rng);
            // 150°-210° off outward: the z component must flip negative
            assert!(pose.heading.z < 0.0);
        }
    }

    #[test]
    fn test_enemy_inside_rim_untouched() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pose = Pose::new(Vec3::new(10.0, 0.0, 10.0), Vec3::Z, 1.0);
        redirect_enemy(&mut pose, &mut rng);
        assert!(pose.heading.distance(Vec3::Z) < 1e-5);
    }
}
