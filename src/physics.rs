/// Physics and collision primitives.
///
/// Free functions over the entity types.  None of them allocate, panic, or
/// fail: degenerate inputs (no platforms, no vines) simply mean "no contact".

use crate::config::Tuning;
use crate::entities::{
    Crumble, Oscillation, Platform, PlatformKind, Player, Rect, SwingGrip, Vine,
};

// ── AABB ──────────────────────────────────────────────────────────────────────

/// Strict overlap test shared by every collision check in the crate.
/// Rectangles that merely touch along an edge do not overlap.
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

fn overlaps_horizontally(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x
}

// ── Player integration ────────────────────────────────────────────────────────

/// `vy += gravity`, clamped to terminal velocity.
pub fn apply_gravity(player: &mut Player, tuning: &Tuning) {
    player.vy = (player.vy + tuning.gravity).min(tuning.terminal_velocity);
}

/// Exponential horizontal decay toward zero.  Never flips the sign.
pub fn apply_friction(player: &mut Player, friction: f32) {
    player.vx *= friction;
}

pub fn integrate(player: &mut Player) {
    player.x += player.vx;
    player.y += player.vy;
}

/// Clamp `x` into `[0, level_width - width]`, zeroing `vx` at either wall.
pub fn clamp_to_level(player: &mut Player, level_width: f32) {
    let max_x = (level_width - player.width).max(0.0);
    if player.x < 0.0 {
        player.x = 0.0;
        player.vx = 0.0;
    } else if player.x > max_x {
        player.x = max_x;
        player.vx = 0.0;
    }
}

// ── Platform landing ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactKind {
    /// Player now rests on the platform.
    Landed,
    /// Bouncy platform launched the player upward.
    Bounced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub platform: usize,
    pub kind: ContactKind,
    /// A crumbling platform's countdown started on this contact.
    pub crumble_started: bool,
}

/// Resolve the player's feet against the platforms.
///
/// `previous_bottom` is the player's bottom edge before this frame's
/// integration.  A platform catches the player when it overlaps
/// horizontally, the player is not moving up, and its top edge lies in
/// `[previous_bottom, previous_bottom + landing_tolerance]`.  The first
/// platform in list order that qualifies wins.
///
/// `on_ground` is always recomputed here.
pub fn resolve_platforms(
    player: &mut Player,
    platforms: &mut [Platform],
    previous_bottom: f32,
    tuning: &Tuning,
) -> Option<Contact> {
    player.on_ground = false;
    if player.vy < 0.0 {
        return None;
    }

    let body = player.rect();
    let (index, platform) = platforms.iter_mut().enumerate().find(|(_, p)| {
        p.is_solid()
            && overlaps_horizontally(&body, &p.rect())
            && p.y >= previous_bottom
            && p.y <= previous_bottom + tuning.landing_tolerance
    })?;

    if let PlatformKind::Bouncy = platform.kind {
        player.vy = -tuning.bounce_velocity;
        return Some(Contact {
            platform: index,
            kind: ContactKind::Bounced,
            crumble_started: false,
        });
    }

    player.y = platform.y - player.height;
    player.vy = 0.0;
    player.on_ground = true;
    player.double_jump_available = true;

    let mut crumble_started = false;
    if let PlatformKind::Crumbling(crumble) = &mut platform.kind {
        if !crumble.triggered {
            crumble.triggered = true;
            crumble.timer = tuning.crumble_delay;
            crumble_started = true;
        }
    }

    Some(Contact {
        platform: index,
        kind: ContactKind::Landed,
        crumble_started,
    })
}

/// Advance moving platforms and crumble countdowns by one frame.
/// Returns the indices of platforms that collapsed this frame.
pub fn advance_platforms(platforms: &mut [Platform]) -> Vec<usize> {
    let mut collapsed = Vec::new();
    for (index, platform) in platforms.iter_mut().enumerate() {
        match &mut platform.kind {
            PlatformKind::Moving(motion) => {
                platform.x = oscillate(platform.x, motion);
            }
            PlatformKind::Crumbling(crumble) => {
                if tick_crumble(crumble) {
                    collapsed.push(index);
                }
            }
            PlatformKind::Ground | PlatformKind::Wood | PlatformKind::Bouncy => {}
        }
    }
    collapsed
}

fn oscillate(x: f32, motion: &mut Oscillation) -> f32 {
    let next = x + motion.speed;
    let end = motion.origin_x + motion.range;
    if next >= end {
        motion.speed = -motion.speed.abs();
        end
    } else if next <= motion.origin_x {
        motion.speed = motion.speed.abs();
        motion.origin_x
    } else {
        next
    }
}

/// Returns true on the frame the platform collapses.
fn tick_crumble(crumble: &mut Crumble) -> bool {
    if !crumble.triggered || crumble.collapsed {
        return false;
    }
    crumble.timer = crumble.timer.saturating_sub(1);
    if crumble.timer == 0 {
        crumble.collapsed = true;
        return true;
    }
    false
}

/// Is there solid ground directly under `x` at the height `feet`?
pub fn ground_under(x: f32, feet: f32, platforms: &[Platform], tolerance: f32) -> bool {
    platforms.iter().any(|p| {
        p.is_solid()
            && x >= p.x
            && x <= p.x + p.width
            && p.y >= feet - tolerance
            && p.y <= feet + tolerance
    })
}

// ── Vines ─────────────────────────────────────────────────────────────────────

/// Free vines sway between `±limit` radians on their own.
pub fn sway_vines(vines: &mut [Vine], limit: f32) {
    for vine in vines.iter_mut() {
        vine.swing_angle += vine.swing_speed;
        if vine.swing_angle.abs() > limit {
            vine.swing_angle = vine.swing_angle.clamp(-limit, limit);
            vine.swing_speed = -vine.swing_speed;
        }
    }
}

/// First vine whose free end lies within `radius` of the player's center.
pub fn find_grabbable_vine(player: &Player, vines: &[Vine], radius: f32) -> Option<usize> {
    let body = player.rect();
    let (cx, cy) = (body.center_x(), body.center_y());
    vines.iter().position(|vine| {
        let (ex, ey) = vine.end();
        let (dx, dy) = (ex - cx, ey - cy);
        (dx * dx + dy * dy).sqrt() <= radius
    })
}

/// One frame of damped pendulum motion for a held vine.
/// `push` is the horizontal input axis (-1, 0, +1).
pub fn swing_step(grip: SwingGrip, vine: &Vine, push: f32, tuning: &Tuning) -> SwingGrip {
    let restoring = -(tuning.gravity / vine.length) * grip.angle.sin();
    let angular_velocity =
        (grip.angular_velocity + restoring + push * tuning.swing_push) * tuning.swing_damping;
    let limit = tuning.swing_max_angle;
    let angle = (grip.angle + angular_velocity).clamp(-limit, limit);
    SwingGrip {
        angular_velocity,
        angle,
        ..grip
    }
}

/// Lock the player's center onto the vine's free end at the grip angle.
pub fn hang_from(player: &mut Player, vine: &Vine, grip: &SwingGrip) {
    let (ex, ey) = vine.end_at(grip.angle);
    player.x = ex - player.width / 2.0;
    player.y = ey - player.height / 2.0;
    player.vx = 0.0;
    player.vy = 0.0;
}

/// Linear launch velocity when letting go of a vine at `angle`.
pub fn release_velocity(angle: f32, tuning: &Tuning) -> (f32, f32) {
    (
        angle.sin() * tuning.release_speed_x,
        -angle.cos() * tuning.release_speed_y,
    )
}
