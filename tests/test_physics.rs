use jungle_platformer::ai::{stun, update_enemy, Bounds};
use jungle_platformer::config::Tuning;
use jungle_platformer::entities::*;
use jungle_platformer::physics::*;

fn make_player(x: f32, y: f32) -> Player {
    Player::new(x, y, 32.0, 40.0, Character::Dk)
}

fn ground(x: f32, y: f32, width: f32) -> Platform {
    Platform::new(x, y, width, 30.0, PlatformKind::Ground)
}

fn bounds() -> Bounds {
    Bounds { width: 1000.0, height: 600.0 }
}

fn far_away() -> Rect {
    Rect::new(5000.0, 5000.0, 32.0, 40.0)
}

// ── AABB ──────────────────────────────────────────────────────────────────────

#[test]
fn aabb_overlap_detects_intersection() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(aabb_overlap(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(aabb_overlap(&a, &Rect::new(2.0, 2.0, 2.0, 2.0)));
    assert!(!aabb_overlap(&a, &Rect::new(20.0, 0.0, 10.0, 10.0)));
}

#[test]
fn aabb_touching_edges_do_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!aabb_overlap(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!aabb_overlap(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
}

// ── integration ───────────────────────────────────────────────────────────────

#[test]
fn gravity_is_capped_at_terminal_velocity() {
    let tuning = Tuning::default();
    let mut p = make_player(0.0, 0.0);
    for _ in 0..100 {
        apply_gravity(&mut p, &tuning);
    }
    assert_eq!(p.vy, tuning.terminal_velocity);
}

#[test]
fn clamp_zeroes_velocity_at_walls() {
    let mut p = make_player(-5.0, 0.0);
    p.vx = -3.0;
    clamp_to_level(&mut p, 500.0);
    assert_eq!(p.x, 0.0);
    assert_eq!(p.vx, 0.0);

    p.x = 490.0;
    p.vx = 4.0;
    clamp_to_level(&mut p, 500.0);
    assert_eq!(p.x, 468.0);
    assert_eq!(p.vx, 0.0);
}

#[test]
fn friction_never_flips_sign() {
    let mut p = make_player(0.0, 0.0);
    p.vx = -6.0;
    for _ in 0..50 {
        apply_friction(&mut p, 0.8);
        assert!(p.vx <= 0.0);
    }
}

// ── landing ───────────────────────────────────────────────────────────────────

#[test]
fn landing_snaps_within_tolerance_window() {
    let tuning = Tuning::default();
    // Previous bottom anywhere in [top - tolerance, top] must snap exactly.
    for offset in [0.0, 0.5, 3.0, 7.25, 14.9, 15.0] {
        let mut platforms = vec![ground(0.0, 400.0, 500.0)];
        let previous_bottom = 400.0 - offset;
        let mut p = make_player(100.0, previous_bottom - 40.0 + 6.0);
        p.vy = 6.0;

        let contact = resolve_platforms(&mut p, &mut platforms, previous_bottom, &tuning);
        assert_eq!(contact.map(|c| c.kind), Some(ContactKind::Landed), "offset {offset}");
        assert_eq!(p.y + p.height, 400.0);
        assert_eq!(p.vy, 0.0);
        assert!(p.on_ground);
        assert!(p.double_jump_available);
    }
}

#[test]
fn no_landing_outside_window_or_while_rising() {
    let tuning = Tuning::default();
    let mut platforms = vec![ground(0.0, 400.0, 500.0)];

    let mut p = make_player(100.0, 330.0);
    p.vy = 3.0;
    assert!(resolve_platforms(&mut p, &mut platforms, 370.0, &tuning).is_none());
    assert!(!p.on_ground);

    let mut rising = make_player(100.0, 355.0);
    rising.vy = -2.0;
    rising.on_ground = true;
    assert!(resolve_platforms(&mut rising, &mut platforms, 397.0, &tuning).is_none());
    assert!(!rising.on_ground);

    // Already below the top: previous bottom past the platform.
    let mut sunk = make_player(100.0, 365.0);
    sunk.vy = 1.0;
    assert!(resolve_platforms(&mut sunk, &mut platforms, 405.0, &tuning).is_none());
}

#[test]
fn no_landing_without_horizontal_overlap() {
    let tuning = Tuning::default();
    let mut platforms = vec![ground(200.0, 400.0, 100.0)];
    let mut p = make_player(168.0, 362.0);
    p.vy = 2.0;
    assert!(resolve_platforms(&mut p, &mut platforms, 400.0, &tuning).is_none());
}

#[test]
fn first_matching_platform_wins() {
    let tuning = Tuning::default();
    let mut platforms = vec![
        ground(500.0, 400.0, 100.0),
        ground(0.0, 410.0, 300.0),
        ground(0.0, 402.0, 300.0),
    ];
    let mut p = make_player(100.0, 365.0);
    p.vy = 5.0;
    let contact = resolve_platforms(&mut p, &mut platforms, 400.0, &tuning).unwrap();
    assert_eq!(contact.platform, 1);
    assert_eq!(p.bottom(), 410.0);
}

#[test]
fn empty_platform_list_means_no_contact() {
    let tuning = Tuning::default();
    let mut p = make_player(0.0, 0.0);
    p.vy = 4.0;
    assert!(resolve_platforms(&mut p, &mut [], 40.0, &tuning).is_none());
    assert!(!p.on_ground);
}

#[test]
fn bouncy_platform_bounces_instead_of_landing() {
    let tuning = Tuning::default();
    let mut platforms = vec![Platform::new(0.0, 400.0, 200.0, 15.0, PlatformKind::Bouncy)];
    let mut p = make_player(50.0, 362.0);
    p.vy = 4.0;
    let contact = resolve_platforms(&mut p, &mut platforms, 398.0, &tuning).unwrap();
    assert_eq!(contact.kind, ContactKind::Bounced);
    assert_eq!(p.vy, -tuning.bounce_velocity);
    assert!(!p.on_ground);
}

#[test]
fn crumble_countdown_starts_once() {
    let tuning = Tuning::default();
    let mut platforms = vec![Platform::new(
        0.0,
        400.0,
        200.0,
        15.0,
        PlatformKind::Crumbling(Crumble::default()),
    )];

    let mut p = make_player(50.0, 361.0);
    p.vy = 1.0;
    let first = resolve_platforms(&mut p, &mut platforms, 400.0, &tuning).unwrap();
    assert!(first.crumble_started);

    advance_platforms(&mut platforms);
    p.vy = 0.6;
    let second = resolve_platforms(&mut p, &mut platforms, 400.0, &tuning).unwrap();
    assert!(!second.crumble_started);
    match platforms[0].kind {
        PlatformKind::Crumbling(c) => assert_eq!(c.timer, tuning.crumble_delay - 1),
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn crumbled_platform_is_skipped() {
    let tuning = Tuning::default();
    let mut platforms = vec![Platform::new(
        0.0,
        400.0,
        200.0,
        15.0,
        PlatformKind::Crumbling(Crumble { timer: 1, triggered: true, collapsed: false }),
    )];
    assert_eq!(advance_platforms(&mut platforms), vec![0]);
    assert!(!platforms[0].is_solid());

    let mut p = make_player(50.0, 361.0);
    p.vy = 1.0;
    assert!(resolve_platforms(&mut p, &mut platforms, 400.0, &tuning).is_none());
    // A collapsed platform never collapses twice.
    assert!(advance_platforms(&mut platforms).is_empty());
}

#[test]
fn moving_platform_oscillates_within_range() {
    let motion = Oscillation { origin_x: 100.0, speed: 3.0, range: 20.0 };
    let mut platforms = vec![Platform::new(100.0, 300.0, 50.0, 15.0, PlatformKind::Moving(motion))];

    let mut reached_end = false;
    for _ in 0..40 {
        advance_platforms(&mut platforms);
        let x = platforms[0].x;
        assert!((100.0..=120.0).contains(&x), "x = {x}");
        reached_end |= x == 120.0;
    }
    assert!(reached_end);
    // 7 frames out, 7 frames back: 40 frames = 2 full trips + 12 frames.
    assert_eq!(platforms[0].x, 105.0);
}

#[test]
fn ground_under_checks_span_and_height() {
    let platforms = vec![ground(100.0, 400.0, 100.0)];
    assert!(ground_under(150.0, 400.0, &platforms, 5.0));
    assert!(ground_under(150.0, 397.0, &platforms, 5.0));
    assert!(!ground_under(250.0, 400.0, &platforms, 5.0));
    assert!(!ground_under(150.0, 380.0, &platforms, 5.0));
}

// ── vines ─────────────────────────────────────────────────────────────────────

fn still_vine() -> Vine {
    Vine { x: 300.0, y: 100.0, length: 150.0, swing_angle: 0.0, swing_speed: 0.0 }
}

#[test]
fn vines_sway_within_limit() {
    let mut vines = vec![Vine { swing_speed: 0.05, ..still_vine() }];
    for _ in 0..200 {
        sway_vines(&mut vines, 0.3);
        assert!(vines[0].swing_angle.abs() <= 0.3);
    }
}

#[test]
fn grab_needs_capture_radius() {
    let vines = vec![still_vine()];
    // Vine end at (300, 250); player centre = (x + 16, y + 20).
    let near = make_player(284.0 + 30.0, 230.0);
    let far = make_player(284.0 + 60.0, 230.0);
    assert_eq!(find_grabbable_vine(&near, &vines, 48.0), Some(0));
    assert_eq!(find_grabbable_vine(&far, &vines, 48.0), None);
    assert_eq!(find_grabbable_vine(&near, &[], 48.0), None);
}

#[test]
fn swing_settles_without_input() {
    let tuning = Tuning::default();
    let vine = still_vine();
    let mut grip = SwingGrip { vine: 0, angle: 0.8, angular_velocity: 0.0 };
    let mut peak: f32 = 0.0;
    for i in 0..2000 {
        grip = swing_step(grip, &vine, 0.0, &tuning);
        if i > 1500 {
            peak = peak.max(grip.angle.abs());
        }
    }
    assert!(peak < 0.8);
}

#[test]
fn swing_angle_is_clamped() {
    let tuning = Tuning::default();
    let vine = still_vine();
    let mut grip = SwingGrip { vine: 0, angle: 1.2, angular_velocity: 0.5 };
    grip = swing_step(grip, &vine, 1.0, &tuning);
    assert_eq!(grip.angle, tuning.swing_max_angle);
}

#[test]
fn release_velocity_follows_angle() {
    let tuning = Tuning::default();
    assert_eq!(release_velocity(0.0, &tuning), (0.0, -8.0));
    let (vx, vy) = release_velocity(0.5, &tuning);
    assert!((vx - 0.5f32.sin() * 12.0).abs() < 1e-6);
    assert!((vy + 0.5f32.cos() * 8.0).abs() < 1e-6);
    let (vx, _) = release_velocity(-0.5, &tuning);
    assert!(vx < 0.0);
}

#[test]
fn hang_from_centres_player_on_vine_end() {
    let vine = still_vine();
    let mut p = make_player(0.0, 0.0);
    p.vx = 3.0;
    p.vy = 7.0;
    hang_from(&mut p, &vine, &SwingGrip { vine: 0, angle: 0.0, angular_velocity: 0.0 });
    assert_eq!(p.rect().center_x(), 300.0);
    assert_eq!(p.rect().center_y(), 250.0);
    assert_eq!((p.vx, p.vy), (0.0, 0.0));
}

// ── enemy AI ──────────────────────────────────────────────────────────────────

fn walker(x: f32, vx: f32, kind: EnemyKind) -> Enemy {
    Enemy::new(x, 370.0, 24.0, 30.0, vx, kind)
}

#[test]
fn patrol_turns_at_ledge() {
    let tuning = Tuning::default();
    let platforms = vec![ground(100.0, 400.0, 100.0)];
    let mut e = walker(170.0, 2.0, EnemyKind::Patrol);
    for _ in 0..20 {
        update_enemy(&mut e, &platforms, bounds(), &far_away(), &tuning);
        assert!(e.x + e.width <= 200.0 + 2.0);
    }
    assert!(e.vx < 0.0 || e.x < 170.0);
}

#[test]
fn patrol_turns_at_level_bounds() {
    let tuning = Tuning::default();
    let platforms = vec![ground(0.0, 400.0, 1000.0)];
    let mut e = walker(2.0, -3.0, EnemyKind::Patrol);
    update_enemy(&mut e, &platforms, bounds(), &far_away(), &tuning);
    assert_eq!(e.vx, 3.0);
    assert!(e.x >= 0.0);
}

#[test]
fn patrol_range_limits_walk() {
    let tuning = Tuning::default();
    let platforms = vec![ground(0.0, 400.0, 1000.0)];
    let mut e = walker(300.0, 1.0, EnemyKind::Patrol);
    e.patrol = Some((280.0, 320.0));
    for _ in 0..200 {
        update_enemy(&mut e, &platforms, bounds(), &far_away(), &tuning);
        assert!((279.0..=321.0).contains(&e.x), "x = {}", e.x);
    }
}

#[test]
fn chaser_turns_toward_nearby_player() {
    let tuning = Tuning::default();
    let platforms = vec![ground(0.0, 400.0, 1000.0)];
    let mut e = walker(500.0, 1.5, EnemyKind::Chaser);
    let player = Rect::new(400.0, 360.0, 32.0, 40.0);
    update_enemy(&mut e, &platforms, bounds(), &player, &tuning);
    assert_eq!(e.vx, -1.5);

    // Out of the aggro radius it keeps its heading.
    let mut e = walker(500.0, 1.5, EnemyKind::Chaser);
    let distant = Rect::new(100.0, 360.0, 32.0, 40.0);
    update_enemy(&mut e, &platforms, bounds(), &distant, &tuning);
    assert_eq!(e.vx, 1.5);
}

#[test]
fn projectile_flies_and_expires() {
    let tuning = Tuning::default();
    let mut e = Enemy::new(20.0, 200.0, 16.0, 10.0, -10.0, EnemyKind::Projectile);
    update_enemy(&mut e, &[], bounds(), &far_away(), &tuning);
    assert_eq!(e.x, 10.0);
    assert!(e.alive);
    for _ in 0..5 {
        update_enemy(&mut e, &[], bounds(), &far_away(), &tuning);
    }
    assert!(!e.alive);
}

#[test]
fn stunned_enemy_holds_still_then_recovers() {
    let tuning = Tuning::default();
    let platforms = vec![ground(0.0, 400.0, 1000.0)];
    let mut e = walker(300.0, 2.0, EnemyKind::Patrol);
    stun(&mut e, 3);
    assert!(!e.is_hostile());

    for _ in 0..2 {
        update_enemy(&mut e, &platforms, bounds(), &far_away(), &tuning);
        assert_eq!(e.x, 300.0);
        assert!(e.stunned);
    }
    update_enemy(&mut e, &platforms, bounds(), &far_away(), &tuning);
    assert!(!e.stunned);
    assert_eq!(e.stunned_timer, 0);

    update_enemy(&mut e, &platforms, bounds(), &far_away(), &tuning);
    assert_eq!(e.x, 302.0);
}

#[test]
fn dead_enemies_are_never_stunned_or_moved() {
    let tuning = Tuning::default();
    let mut e = walker(300.0, 2.0, EnemyKind::Patrol);
    e.alive = false;
    stun(&mut e, 50);
    assert!(!e.stunned);
    update_enemy(&mut e, &[], bounds(), &far_away(), &tuning);
    assert_eq!(e.x, 300.0);
}
