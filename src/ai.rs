/// Enemy behaviour: patrol, chase, projectile flight, stun recovery.

use crate::config::Tuning;
use crate::entities::{Enemy, EnemyKind, Platform, Rect};
use crate::physics::ground_under;

/// World extents an enemy lives in.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// Advance one enemy by a frame.
///
/// Stunned enemies stand still and count their stun down instead of moving.
/// Dead enemies are left untouched.
pub fn update_enemy(
    enemy: &mut Enemy,
    platforms: &[Platform],
    bounds: Bounds,
    player: &Rect,
    tuning: &Tuning,
) {
    if !enemy.alive {
        return;
    }

    if enemy.stunned {
        enemy.stunned_timer = enemy.stunned_timer.saturating_sub(1);
        if enemy.stunned_timer == 0 {
            enemy.stunned = false;
        }
        return;
    }

    match enemy.kind {
        EnemyKind::Projectile => fly(enemy, bounds),
        EnemyKind::Chaser => {
            let dx = player.center_x() - enemy.rect().center_x();
            if dx.abs() < tuning.aggro_radius && dx != 0.0 {
                enemy.vx = enemy.vx.abs() * dx.signum();
            }
            walk(enemy, platforms, bounds, tuning.support_tolerance);
        }
        EnemyKind::Patrol => walk(enemy, platforms, bounds, tuning.support_tolerance),
    }
}

/// Stun an enemy for `frames`.  Dead enemies stay dead.
pub fn stun(enemy: &mut Enemy, frames: u32) {
    if enemy.alive && frames > 0 {
        enemy.stunned = true;
        enemy.stunned_timer = frames;
    }
}

fn fly(enemy: &mut Enemy, bounds: Bounds) {
    enemy.x += enemy.vx;
    enemy.y += enemy.vy;
    let body = enemy.rect();
    let gone_sideways = body.right() < 0.0 || body.x > bounds.width;
    let gone_vertically = body.bottom() < 0.0 || body.y > bounds.height;
    if gone_sideways || gone_vertically {
        enemy.alive = false;
    }
}

/// Step horizontally; turn around at ledges, level walls and patrol ends.
fn walk(enemy: &mut Enemy, platforms: &[Platform], bounds: Bounds, tolerance: f32) {
    let feet = enemy.y + enemy.height;
    let supported_before = ground_under(enemy.rect().center_x(), feet, platforms, tolerance);

    enemy.x += enemy.vx;

    let leading_edge = if enemy.vx > 0.0 { enemy.x + enemy.width } else { enemy.x };
    let off_ledge = supported_before && !ground_under(leading_edge, feet, platforms, tolerance);
    // Only turn when heading outward, so an enemy that starts past a limit walks back in.
    let heading_right = enemy.vx > 0.0;
    let at_wall = (enemy.x <= 0.0 && !heading_right)
        || (enemy.x + enemy.width >= bounds.width && heading_right);
    let at_patrol_end = enemy
        .patrol
        .map(|(start, end)| {
            (enemy.x <= start && !heading_right) || (enemy.x >= end && heading_right)
        })
        .unwrap_or(false);

    if off_ledge || at_wall || at_patrol_end {
        enemy.x -= enemy.vx;
        enemy.vx = -enemy.vx;
        enemy.x = enemy.x.clamp(0.0, (bounds.width - enemy.width).max(0.0));
    }
}
