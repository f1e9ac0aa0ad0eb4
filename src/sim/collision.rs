//! Trap collision detection and per-tick resolution

use glam::Vec3;

use super::state::{Enemy, Trap};

/// True when `position` lies strictly inside the trap's kill sphere
#[inline]
pub fn trap_hits(trap: &Trap, position: Vec3) -> bool {
    trap.position.distance(position) < trap.radius
}

/// One resolution pass over stable snapshots of the live sets.
///
/// Traps and enemies are scanned in id order; each trap consumes at most one
/// enemy and each enemy dies to at most one trap. Removals are applied after
/// the scan, so a removal never hides a later pair from the same pass.
///
/// Returns the destroyed (trap_id, enemy_id) pairs.
pub fn resolve_collisions(traps: &mut Vec<Trap>, enemies: &mut Vec<Enemy>) -> Vec<(u32, u32)> {
    let mut destroyed: Vec<(u32, u32)> = Vec::new();

    for trap in traps.iter() {
        let hit = enemies.iter().find(|enemy| {
            !destroyed.iter().any(|&(_, eid)| eid == enemy.id)
                && trap_hits(trap, enemy.pose.position)
        });
        if let Some(enemy) = hit {
            destroyed.push((trap.id, enemy.id));
        }
    }

    if !destroyed.is_empty() {
        traps.retain(|t| !destroyed.iter().any(|&(tid, _)| tid == t.id));
        enemies.retain(|e| !destroyed.iter().any(|&(_, eid)| eid == e.id));
    }

    destroyed
}
