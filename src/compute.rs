/// The simulation controller.
///
/// `Simulation` owns every piece of mutable game state and advances it one
/// fixed frame per `update` call.  Randomness only ever reaches cosmetic
/// output (particles, camera jitter) and comes from a seeded `StdRng`, so a
/// given seed and input sequence always replays identically.
///
/// Side effects outside the core go through the `GameHooks` passed to
/// `update`.  Nothing in here touches the terminal, the filesystem or a clock.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::ai::{self, Bounds};
use crate::camera::{self, ShakeRequest};
use crate::clock::frames_to_duration;
use crate::config::Tuning;
use crate::entities::{
    Camera, Character, Checkpoint, Collectible, CollectibleKind, Enemy, Facing, GameStatus,
    Particle, ParticleKind, Platform, Player, PlayerState, PowerUpKind, SwingGrip, Vine,
};
use crate::error::LevelError;
use crate::events::GameHooks;
use crate::input::{Action, InputState};
use crate::level::LevelDefinition;
use crate::particles::ParticlePool;
use crate::physics::{self, aabb_overlap, ContactKind};

// ── Snapshot handed to renderers ─────────────────────────────────────────────

/// Read-only view of everything a renderer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderSnapshot<'a> {
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub platforms: &'a [Platform],
    pub collectibles: &'a [Collectible],
    pub vines: &'a [Vine],
    pub checkpoints: &'a [Checkpoint],
    pub particles: &'a [Particle],
    pub camera: &'a Camera,
    pub level_name: &'a str,
    pub level_width: f32,
    pub level_height: f32,
    pub goal_x: f32,
    pub score: u32,
    pub lives: u32,
    pub bananas: u32,
    pub status: GameStatus,
    pub elapsed: Duration,
}

// ── Simulation ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Simulation {
    level: LevelDefinition,
    tuning: Tuning,
    rng: StdRng,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub vines: Vec<Vine>,
    pub checkpoints: Vec<Checkpoint>,
    pub camera: Camera,

    pub score: u32,
    pub lives: u32,
    pub bananas: u32,

    particles: ParticlePool,
    shake: ShakeRequest,
    status: GameStatus,
    /// Frames simulated while playing; paused frames do not count.
    frame: u64,
    /// Where the next respawn puts the player's top-left corner.
    respawn: (f32, f32),
    level_completed: bool,
}

impl Simulation {
    /// Validate `level` and build a fresh session on it.
    pub fn new(level: LevelDefinition, tuning: Tuning, seed: u64) -> Result<Self, LevelError> {
        level.validate()?;
        let reach = level.width - tuning.dk.width.max(tuning.diddy.width);
        if level.goal() > reach {
            return Err(LevelError::GoalUnreachable {
                goal: level.goal(),
                reach,
            });
        }
        let entities = level.instantiate();
        let start = (level.start.x, level.start.y);
        let stats = tuning.dk.clone();

        let mut sim = Self {
            rng: StdRng::seed_from_u64(seed),
            player: Player::new(start.0, start.1, stats.width, stats.height, Character::Dk),
            enemies: entities.enemies,
            platforms: entities.platforms,
            collectibles: entities.collectibles,
            vines: entities.vines,
            checkpoints: entities.checkpoints,
            camera: Camera::default(),
            score: 0,
            lives: tuning.starting_lives,
            bananas: 0,
            particles: ParticlePool::new(tuning.max_particles),
            shake: ShakeRequest::default(),
            status: GameStatus::Playing,
            frame: 0,
            respawn: start,
            level_completed: false,
            level,
            tuning,
        };
        sim.snap_camera();
        info!(level = %sim.level.name, seed, "simulation started");
        Ok(sim)
    }

    /// Rebuild the level from its definition and start over.  Tuning and the
    /// RNG stream carry over.
    pub fn restart(&mut self) {
        let entities = self.level.instantiate();
        let start = (self.level.start.x, self.level.start.y);
        let stats = self.tuning.dk.clone();

        self.player = Player::new(start.0, start.1, stats.width, stats.height, Character::Dk);
        self.enemies = entities.enemies;
        self.platforms = entities.platforms;
        self.collectibles = entities.collectibles;
        self.vines = entities.vines;
        self.checkpoints = entities.checkpoints;
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.bananas = 0;
        self.particles.clear();
        self.shake = ShakeRequest::default();
        self.status = GameStatus::Playing;
        self.frame = 0;
        self.respawn = start;
        self.level_completed = false;
        self.snap_camera();
        info!(level = %self.level.name, "level restarted");
    }

    pub fn level(&self) -> &LevelDefinition {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> Duration {
        frames_to_duration(self.frame, self.tuning.frames_per_second)
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    pub fn respawn_point(&self) -> (f32, f32) {
        self.respawn
    }

    pub fn render_snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            player: &self.player,
            enemies: &self.enemies,
            platforms: &self.platforms,
            collectibles: &self.collectibles,
            vines: &self.vines,
            checkpoints: &self.checkpoints,
            particles: self.particles.particles(),
            camera: &self.camera,
            level_name: &self.level.name,
            level_width: self.level.width,
            level_height: self.level.height,
            goal_x: self.level.goal(),
            score: self.score,
            lives: self.lives,
            bananas: self.bananas,
            status: self.status,
            elapsed: self.elapsed(),
        }
    }

    // ── Per-frame update ─────────────────────────────────────────────────────

    /// Advance the simulation by one fixed frame.
    ///
    /// The caller must latch `input` (`InputState::end_frame`) after this
    /// returns.  Paused, completed and game-over sessions only react to the
    /// pause toggle.
    pub fn update(&mut self, input: &InputState, hooks: &mut dyn GameHooks) {
        if input.was_pressed(Action::Pause) {
            self.toggle_pause();
        }
        if self.status != GameStatus::Playing {
            return;
        }
        self.frame += 1;

        // ── 0. Timers and world motion ──────────────────────────────────────
        self.tick_timers();
        for index in physics::advance_platforms(&mut self.platforms) {
            let p = self.platforms[index].rect();
            self.particles.burst(
                &mut self.rng,
                ParticleKind::Debris,
                p.center_x(),
                p.y,
                8,
                2.0,
                2.0,
                40,
            );
            debug!(platform = index, "platform collapsed");
        }
        physics::sway_vines(&mut self.vines, self.tuning.vine_sway_limit);

        if input.was_pressed(Action::SwitchCharacter) && !self.player.state.is_swinging() {
            self.switch_character();
        }

        // ── 1-7. Player movement ─────────────────────────────────────────────
        if let PlayerState::Swinging(grip) = self.player.state {
            self.swing(grip, input);
        } else {
            let impulse = self.control(input);
            self.move_player(impulse);
            self.try_grab(input);
        }

        // ── 8. Fall death ────────────────────────────────────────────────────
        if self.player.y > self.level.death_line() {
            self.fall_death(hooks);
        }

        // ── 9. Enemies ───────────────────────────────────────────────────────
        let bounds = Bounds {
            width: self.level.width,
            height: self.level.height,
        };
        let body = self.player.rect();
        for enemy in self.enemies.iter_mut() {
            ai::update_enemy(enemy, &self.platforms, bounds, &body, &self.tuning);
        }

        // ── 10. Player ↔ enemies ─────────────────────────────────────────────
        self.resolve_enemy_contacts(hooks);

        // ── 11. Collectibles & checkpoints ───────────────────────────────────
        self.collect_items(hooks);
        self.activate_checkpoints(hooks);

        // ── 12. Camera ───────────────────────────────────────────────────────
        let target =
            camera::target(&self.player, self.level.width, self.level.height, &self.tuning);
        camera::update(&mut self.camera, target, &mut self.shake, &self.tuning, &mut self.rng);

        // ── 13. Win / lose ───────────────────────────────────────────────────
        self.check_end_conditions(hooks);

        // ── 14. Particles ────────────────────────────────────────────────────
        self.particles.age(self.tuning.particle_gravity);

        self.derive_state(input);

        debug_assert!(self.player.state != PlayerState::Rolling || self.player.roll_timer > 0);
        debug_assert!(!(self.player.on_ground && self.player.state.is_swinging()));
    }

    fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            other => other,
        };
        info!(status = ?self.status, "pause toggled");
    }

    /// Saturating countdowns, run first thing each playing frame.
    fn tick_timers(&mut self) {
        let p = &mut self.player;
        p.roll_timer = p.roll_timer.saturating_sub(1);
        p.roll_cooldown = p.roll_cooldown.saturating_sub(1);
        p.invulnerable_timer = p.invulnerable_timer.saturating_sub(1);
        p.dash_timer = p.dash_timer.saturating_sub(1);
        p.dash_cooldown = p.dash_cooldown.saturating_sub(1);
        p.speed_boost_timer = p.speed_boost_timer.saturating_sub(1);
        p.regrab_cooldown = p.regrab_cooldown.saturating_sub(1);

        if p.combo_timer > 0 {
            p.combo_timer -= 1;
            if p.combo_timer == 0 {
                p.combo_count = 0;
            }
        }

        if p.state == PlayerState::Rolling && p.roll_timer == 0 {
            p.state = if p.on_ground { PlayerState::Idle } else { PlayerState::Jumping };
        }
    }

    /// Current walk speed, including any speed boost.
    fn walk_speed(&self) -> f32 {
        let base = self.tuning.stats(self.player.character).speed;
        if self.player.speed_boost_timer > 0 {
            base * self.tuning.speed_boost_multiplier
        } else {
            base
        }
    }

    fn switch_character(&mut self) {
        let next = self.player.character.other();
        let stats = self.tuning.stats(next).clone();
        let bottom = self.player.bottom();

        self.player.character = next;
        self.player.width = stats.width;
        self.player.height = stats.height;
        self.player.y = bottom - stats.height;
        physics::clamp_to_level(&mut self.player, self.level.width);

        let body = self.player.rect();
        self.particles
            .ring(ParticleKind::Star, body.center_x(), body.center_y(), 10, 3.0, 30);
        debug!(character = next.name(), "character switched");
    }

    // ── Steps 1-2: horizontal control and special moves ─────────────────────

    /// Returns true when a jump impulse was applied this frame; that frame
    /// skips gravity.
    fn control(&mut self, input: &InputState) -> bool {
        let speed = self.walk_speed();
        let locked = matches!(
            self.player.state,
            PlayerState::Rolling | PlayerState::GroundPounding
        );

        // 1. Horizontal control
        if locked {
            self.player.vx = self.player.direction.sign() * speed * self.tuning.roll_multiplier;
        } else if self.player.dash_timer == 0 {
            let axis = input.horizontal();
            if axis < 0.0 {
                self.player.vx = -speed;
                self.player.direction = Facing::Left;
            } else if axis > 0.0 {
                self.player.vx = speed;
                self.player.direction = Facing::Right;
            } else {
                physics::apply_friction(&mut self.player, self.tuning.friction);
            }
        }

        // 2. Special moves
        if input.was_pressed(Action::Roll)
            && self.player.on_ground
            && self.player.state != PlayerState::Rolling
            && self.player.roll_cooldown == 0
        {
            self.player.state = PlayerState::Rolling;
            self.player.roll_timer = self.tuning.roll_duration;
            self.player.roll_cooldown = self.tuning.roll_cooldown;
            self.player.vx = self.player.direction.sign() * speed * self.tuning.roll_multiplier;
            self.shake.raise(self.tuning.shake.roll);
            self.dust(6);
        }

        let pound_combo = input.is_held(Action::GroundPound)
            && input.is_held(Action::Jump)
            && (input.was_pressed(Action::GroundPound) || input.was_pressed(Action::Jump));
        if pound_combo
            && !self.player.on_ground
            && self.player.state != PlayerState::GroundPounding
        {
            self.player.state = PlayerState::GroundPounding;
            self.player.roll_timer = 0;
            self.player.vy = self.tuning.ground_pound_velocity;
            self.player.vx = self.player.direction.sign() * speed * self.tuning.roll_multiplier;
            debug!("ground pound started");
            return false;
        }

        let mut impulse = false;
        if input.was_pressed(Action::Jump) {
            let jump_power = self.tuning.stats(self.player.character).jump_power;
            if self.player.on_ground {
                self.player.vy = -jump_power;
                self.player.on_ground = false;
                self.player.double_jump_available = true;
                self.player.roll_timer = 0;
                self.player.state = PlayerState::Jumping;
                self.dust(4);
                impulse = true;
            } else if self.player.double_jump_available
                && self.player.state != PlayerState::GroundPounding
            {
                self.player.vy = -jump_power * self.tuning.double_jump_factor;
                self.player.double_jump_available = false;
                self.player.state = PlayerState::Jumping;
                let body = self.player.rect();
                self.particles
                    .ring(ParticleKind::Sparkle, body.center_x(), body.bottom(), 8, 2.0, 20);
                impulse = true;
            }
        }

        if input.was_pressed(Action::Dash) && self.player.dash_cooldown == 0 {
            self.player.vx += self.player.direction.sign() * self.tuning.dash_impulse;
            self.player.dash_timer = self.tuning.dash_duration;
            self.player.dash_cooldown = self.tuning.dash_cooldown;
        }

        impulse
    }

    // ── Steps 3-6: integration and platform collision ───────────────────────

    fn move_player(&mut self, impulse: bool) {
        if !impulse && self.player.state != PlayerState::GroundPounding {
            physics::apply_gravity(&mut self.player, &self.tuning);
        }

        let previous_bottom = self.player.bottom();
        let was_airborne = !self.player.on_ground;
        physics::integrate(&mut self.player);
        physics::clamp_to_level(&mut self.player, self.level.width);

        let Some(contact) = physics::resolve_platforms(
            &mut self.player,
            &mut self.platforms,
            previous_bottom,
            &self.tuning,
        ) else {
            return;
        };

        if contact.crumble_started {
            self.shake.raise(self.tuning.shake.crumble);
        }

        match contact.kind {
            ContactKind::Bounced => {
                if self.player.state == PlayerState::GroundPounding {
                    self.player.state = PlayerState::Jumping;
                }
                let body = self.player.rect();
                self.particles
                    .ring(ParticleKind::Sparkle, body.center_x(), body.bottom(), 6, 2.5, 15);
            }
            ContactKind::Landed => {
                if self.player.state == PlayerState::GroundPounding {
                    self.ground_pound_impact();
                } else if was_airborne {
                    self.dust(5);
                }
            }
        }
    }

    /// Stun every live enemy within the pound radius of the landing point.
    fn ground_pound_impact(&mut self) {
        let center = self.player.rect().center_x();
        let radius = self.tuning.ground_pound_radius;
        let mut stunned = 0;
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            if (enemy.rect().center_x() - center).abs() <= radius {
                ai::stun(enemy, self.tuning.stun_duration);
                stunned += 1;
            }
        }

        self.player.state = PlayerState::Idle;
        self.shake.raise(self.tuning.shake.ground_pound);
        self.dust(16);
        debug!(stunned, "ground pound landed");
    }

    fn dust(&mut self, count: usize) {
        let body = self.player.rect();
        self.particles.burst(
            &mut self.rng,
            ParticleKind::Dust,
            body.center_x(),
            body.bottom(),
            count,
            1.5,
            1.0,
            20,
        );
    }

    // ── Step 7: vines ────────────────────────────────────────────────────────

    fn try_grab(&mut self, input: &InputState) {
        if !input.is_held(Action::Grab)
            || self.player.on_ground
            || self.player.regrab_cooldown > 0
            || self.player.state == PlayerState::GroundPounding
        {
            return;
        }
        let Some(index) =
            physics::find_grabbable_vine(&self.player, &self.vines, self.tuning.vine_capture_radius)
        else {
            return;
        };

        let vine = &self.vines[index];
        let grip = SwingGrip {
            vine: index,
            angle: vine.swing_angle,
            angular_velocity: vine.swing_speed,
        };
        physics::hang_from(&mut self.player, vine, &grip);
        self.player.state = PlayerState::Swinging(grip);
        self.player.roll_timer = 0;
        debug!(vine = index, "vine grabbed");
    }

    /// One frame on a vine: pump with left/right, let go with jump.
    fn swing(&mut self, grip: SwingGrip, input: &InputState) {
        self.player.on_ground = false;

        let axis = input.horizontal();
        if axis < 0.0 {
            self.player.direction = Facing::Left;
        } else if axis > 0.0 {
            self.player.direction = Facing::Right;
        }

        if input.was_pressed(Action::Jump) {
            let (vx, vy) = physics::release_velocity(grip.angle, &self.tuning);
            self.player.vx = vx;
            self.player.vy = vy;
            self.player.state = PlayerState::Jumping;
            self.player.regrab_cooldown = self.tuning.regrab_cooldown;
            // The release frame carries the launch, not gravity.
            self.move_player(true);
            debug!(vine = grip.vine, vx, vy, "vine released");
            return;
        }

        let Some(vine) = self.vines.get(grip.vine) else {
            self.player.state = PlayerState::Jumping;
            return;
        };
        let next = physics::swing_step(grip, vine, axis, &self.tuning);
        physics::hang_from(&mut self.player, vine, &next);
        physics::clamp_to_level(&mut self.player, self.level.width);
        self.player.state = PlayerState::Swinging(next);
    }

    // ── Steps 8-11: damage, defeats, pickups ─────────────────────────────────

    /// Below the death line.  An invulnerable player is put back without
    /// losing a life.
    fn fall_death(&mut self, hooks: &mut dyn GameHooks) {
        if !self.lose_life(hooks) {
            self.respawn_player(0);
        }
    }

    /// Spend a life unless invulnerable.  Returns true if a life was lost.
    fn lose_life(&mut self, hooks: &mut dyn GameHooks) -> bool {
        if self.player.is_invulnerable() {
            return false;
        }

        self.lives = self.lives.saturating_sub(1);
        self.shake.raise(self.tuning.shake.death);
        let body = self.player.rect();
        self.particles.burst(
            &mut self.rng,
            ParticleKind::Star,
            body.center_x(),
            body.center_y(),
            12,
            3.0,
            4.0,
            40,
        );
        debug!(lives = self.lives, x = self.player.x, y = self.player.y, "player died");
        hooks.on_player_died(self.lives);

        if self.lives > 0 {
            self.respawn_player(self.tuning.invulnerability_frames);
        }
        true
    }

    /// Back to the respawn point with motion reset.  Facing and running
    /// power-up timers carry over; invulnerability is never shortened and is
    /// topped up to at least `min_invulnerable`.
    fn respawn_player(&mut self, min_invulnerable: u32) {
        let stats = self.tuning.stats(self.player.character).clone();
        let (x, y) = self.respawn;
        let previous = &self.player;
        let mut player = Player::new(x, y, stats.width, stats.height, previous.character);
        player.direction = previous.direction;
        player.speed_boost_timer = previous.speed_boost_timer;
        player.invulnerable_timer = previous.invulnerable_timer.max(min_invulnerable);
        self.player = player;
    }

    fn resolve_enemy_contacts(&mut self, hooks: &mut dyn GameHooks) {
        // Judged once per frame: one landing stomps every enemy under the
        // feet, even after the first bounce has flipped `vy`.
        let falling = self.player.vy > 0.0;
        for index in 0..self.enemies.len() {
            let body = self.player.rect();
            let enemy = &self.enemies[index];
            if !enemy.alive || !aabb_overlap(&body, &enemy.rect()) {
                continue;
            }

            let rolling = self.player.state == PlayerState::Rolling;
            let pounce = falling && body.center_y() < enemy.rect().center_y();

            if enemy.stunned || rolling || pounce {
                self.defeat_enemy(index, hooks);
                if pounce && !rolling {
                    self.player.vy = -self.tuning.pounce_bounce;
                    if self.player.state == PlayerState::GroundPounding {
                        self.player.state = PlayerState::Jumping;
                    }
                }
            } else if self.lose_life(hooks) {
                // The player has been moved; remaining overlaps are stale.
                break;
            }
        }
    }

    fn defeat_enemy(&mut self, index: usize, hooks: &mut dyn GameHooks) {
        let p = &mut self.player;
        p.combo_count = if p.combo_timer > 0 { p.combo_count + 1 } else { 1 };
        p.combo_timer = self.tuning.combo_window;
        let combo = p.combo_count;

        let bonus = self.tuning.combo_bonus.saturating_mul(combo - 1);
        self.score = self
            .score
            .saturating_add(self.tuning.defeat_score)
            .saturating_add(bonus);

        let enemy = &mut self.enemies[index];
        enemy.alive = false;
        enemy.stunned = false;
        enemy.stunned_timer = 0;
        let body = enemy.rect();

        self.shake.raise(self.tuning.shake.defeat);
        self.particles.burst(
            &mut self.rng,
            ParticleKind::Star,
            body.center_x(),
            body.center_y(),
            10,
            3.0,
            3.0,
            30,
        );
        debug!(enemy = index, combo, score = self.score, "enemy defeated");
        hooks.on_enemy_defeated(&self.enemies[index], combo);
    }

    fn collect_items(&mut self, hooks: &mut dyn GameHooks) {
        let body = self.player.rect();
        for index in 0..self.collectibles.len() {
            let item = &mut self.collectibles[index];
            if item.collected || !aabb_overlap(&body, &item.rect()) {
                continue;
            }
            item.collected = true;
            let (kind, value, rect) = (item.kind, item.value, item.rect());

            self.score = self.score.saturating_add(value);
            match kind {
                CollectibleKind::PowerUp(power) => self.apply_power_up(power),
                _ => self.bananas += 1,
            }

            self.particles.burst(
                &mut self.rng,
                ParticleKind::Sparkle,
                rect.center_x(),
                rect.center_y(),
                6,
                2.0,
                2.0,
                20,
            );
            hooks.on_collect(&self.collectibles[index]);
        }
    }

    fn apply_power_up(&mut self, power: PowerUpKind) {
        let duration = self.tuning.power_up_duration;
        match power {
            PowerUpKind::ExtraLife => {
                self.lives = (self.lives + 1).min(self.tuning.max_lives);
            }
            PowerUpKind::SpeedBoost => self.player.speed_boost_timer = duration,
            PowerUpKind::Invincibility => {
                self.player.invulnerable_timer = self.player.invulnerable_timer.max(duration);
            }
            PowerUpKind::DoubleJump => self.player.double_jump_available = true,
        }
        debug!(?power, "power-up applied");
    }

    fn activate_checkpoints(&mut self, hooks: &mut dyn GameHooks) {
        for checkpoint in self.checkpoints.iter_mut() {
            if checkpoint.activated || self.player.x < checkpoint.x {
                continue;
            }
            checkpoint.activated = true;
            self.respawn = (checkpoint.x, checkpoint.respawn_y);
            self.particles.ring(
                ParticleKind::Confetti,
                checkpoint.x,
                checkpoint.respawn_y,
                12,
                2.5,
                35,
            );
            info!(id = checkpoint.id, "checkpoint reached");
            hooks.on_checkpoint(checkpoint.id);
        }
    }

    // ── Steps 12-13: end conditions ──────────────────────────────────────────

    fn check_end_conditions(&mut self, hooks: &mut dyn GameHooks) {
        if self.lives == 0 {
            self.status = GameStatus::GameOver;
            info!(score = self.score, "game over");
            hooks.on_game_over(self.score);
            return;
        }

        if !self.level_completed && self.player.x >= self.level.goal() {
            self.level_completed = true;
            self.status = GameStatus::LevelComplete;

            let seconds = self.frame / u64::from(self.tuning.frames_per_second.max(1));
            let remaining = u64::from(self.tuning.par_seconds).saturating_sub(seconds);
            let time_bonus = u32::try_from(remaining)
                .unwrap_or(u32::MAX)
                .saturating_mul(self.tuning.time_bonus_per_second);
            self.score = self
                .score
                .saturating_add(self.tuning.level_complete_bonus)
                .saturating_add(time_bonus);

            let body = self.player.rect();
            self.particles.burst(
                &mut self.rng,
                ParticleKind::Confetti,
                body.center_x(),
                body.y,
                30,
                4.0,
                6.0,
                60,
            );
            let elapsed = self.elapsed();
            info!(score = self.score, ?elapsed, "level complete");
            hooks.on_level_complete(self.score, elapsed);
        }
    }

    /// Settle the movement state after the frame's physics.
    fn derive_state(&mut self, input: &InputState) {
        let p = &mut self.player;
        p.state = match p.state {
            PlayerState::Swinging(grip) => PlayerState::Swinging(grip),
            PlayerState::GroundPounding if !p.on_ground => PlayerState::GroundPounding,
            _ if p.roll_timer > 0 => PlayerState::Rolling,
            _ if !p.on_ground => PlayerState::Jumping,
            _ if input.horizontal() != 0.0 => PlayerState::Walking,
            _ => PlayerState::Idle,
        };
    }

    fn snap_camera(&mut self) {
        let (x, y) =
            camera::target(&self.player, self.level.width, self.level.height, &self.tuning);
        self.camera = Camera { x, y, shake: 0.0 };
    }
}
