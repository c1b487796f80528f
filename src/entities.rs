/// All simulation entity types: plain data plus a few geometric accessors.
///
/// Coordinates are world pixels with a top-left origin: `x` grows to the
/// right, `y` grows downward.  Velocities are pixels per fixed frame.

use serde::{Deserialize, Serialize};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Character {
    Dk,
    Diddy,
}

impl Character {
    pub fn other(self) -> Self {
        match self {
            Character::Dk => Character::Diddy,
            Character::Diddy => Character::Dk,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Character::Dk => "DK",
            Character::Diddy => "Diddy",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// `-1.0` for left, `+1.0` for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Hold on a vine while swinging.  Lives inside `PlayerState::Swinging`, so a
/// player can never carry a grip without being in the swinging state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwingGrip {
    /// Index into the level's vine list.
    pub vine: usize,
    /// Pendulum angle in radians, 0 = hanging straight down.
    pub angle: f32,
    /// Radians per frame.
    pub angular_velocity: f32,
}

/// The player's movement state.  Exactly one variant holds at any time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerState {
    Idle,
    Walking,
    Jumping,
    Rolling,
    GroundPounding,
    Swinging(SwingGrip),
}

impl PlayerState {
    pub fn is_swinging(&self) -> bool {
        matches!(self, PlayerState::Swinging(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Walking => "walking",
            PlayerState::Jumping => "jumping",
            PlayerState::Rolling => "rolling",
            PlayerState::GroundPounding => "ground-pound",
            PlayerState::Swinging(_) => "swinging",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Recomputed every frame by platform collision; input never sets it.
    pub on_ground: bool,
    pub direction: Facing,
    pub state: PlayerState,
    pub character: Character,
    pub double_jump_available: bool,

    // Frame countdowns.  All decrement with saturation.
    pub roll_timer: u32,
    pub roll_cooldown: u32,
    pub invulnerable_timer: u32,
    pub dash_timer: u32,
    pub dash_cooldown: u32,
    pub speed_boost_timer: u32,
    /// Frames before a released vine may be grabbed again.
    pub regrab_cooldown: u32,

    pub combo_count: u32,
    pub combo_timer: u32,
}

impl Player {
    /// A fresh, idle player standing at `(x, y)`.
    pub fn new(x: f32, y: f32, width: f32, height: f32, character: Character) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
            on_ground: false,
            direction: Facing::Right,
            state: PlayerState::Idle,
            character,
            double_jump_available: false,
            roll_timer: 0,
            roll_cooldown: 0,
            invulnerable_timer: 0,
            dash_timer: 0,
            dash_cooldown: 0,
            speed_boost_timer: 0,
            regrab_cooldown: 0,
            combo_count: 0,
            combo_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Walks back and forth, turning at ledges, level bounds and patrol ends.
    #[default]
    Patrol,
    /// Patrols, but turns toward the player inside the aggro radius.
    Chaser,
    /// Flies in a straight line and ignores platforms.
    Projectile,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Sign of `vx` is the walking direction.
    pub vx: f32,
    /// Only projectiles use a vertical velocity.
    pub vy: f32,
    pub alive: bool,
    pub stunned: bool,
    pub stunned_timer: u32,
    pub kind: EnemyKind,
    /// Optional `[start, end]` range of `x` the enemy turns around at.
    pub patrol: Option<(f32, f32)>,
}

impl Enemy {
    pub fn new(x: f32, y: f32, width: f32, height: f32, vx: f32, kind: EnemyKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            vx,
            vy: 0.0,
            alive: true,
            stunned: false,
            stunned_timer: 0,
            kind,
            patrol: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Alive and not stunned: the only enemies that can hurt the player.
    pub fn is_hostile(&self) -> bool {
        self.alive && !self.stunned
    }
}

// ── Platforms ─────────────────────────────────────────────────────────────────

/// Horizontal back-and-forth motion between `origin_x` and `origin_x + range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillation {
    pub origin_x: f32,
    /// Signed pixels per frame; flips at either end of the range.
    pub speed: f32,
    pub range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Crumble {
    /// Frames left before collapse, counting only once `triggered`.
    pub timer: u32,
    pub triggered: bool,
    pub collapsed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlatformKind {
    Ground,
    Wood,
    Moving(Oscillation),
    Bouncy,
    Crumbling(Crumble),
}

#[derive(Clone, Debug)]
pub struct Platform {
    /// Current (animated) position; this is the collision rectangle.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self { x, y, width, height, kind }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Collapsed crumbling platforms no longer take part in collision.
    pub fn is_solid(&self) -> bool {
        !matches!(self.kind, PlatformKind::Crumbling(Crumble { collapsed: true, .. }))
    }
}

// ── Collectibles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    ExtraLife,
    SpeedBoost,
    Invincibility,
    DoubleJump,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    #[default]
    Normal,
    /// Golden / secret banana.
    Golden,
    Bonus,
    PowerUp(PowerUpKind),
}

impl CollectibleKind {
    /// Bananas count toward the banana tally; power-ups do not.
    pub fn is_banana(&self) -> bool {
        !matches!(self, CollectibleKind::PowerUp(_))
    }
}

#[derive(Clone, Debug)]
pub struct Collectible {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub collected: bool,
    /// Score granted on pickup.
    pub value: u32,
    pub kind: CollectibleKind,
}

impl Collectible {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Vines ─────────────────────────────────────────────────────────────────────

/// Swing anchor.  Sways on its own whether or not anyone is holding it.
#[derive(Clone, Debug)]
pub struct Vine {
    /// Anchor point.
    pub x: f32,
    pub y: f32,
    pub length: f32,
    /// Radians, 0 = hanging straight down.
    pub swing_angle: f32,
    /// Signed radians per frame.
    pub swing_speed: f32,
}

impl Vine {
    /// Free end of the vine at a given angle.
    pub fn end_at(&self, angle: f32) -> (f32, f32) {
        (
            self.x + angle.sin() * self.length,
            self.y + angle.cos() * self.length,
        )
    }

    /// Free end at the vine's own sway angle.
    pub fn end(&self) -> (f32, f32) {
        self.end_at(self.swing_angle)
    }
}

// ── Checkpoints ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Checkpoint {
    pub id: u32,
    /// Activated once the player's `x` passes this line.
    pub x: f32,
    /// Respawn height (player top edge).
    pub respawn_y: f32,
    pub activated: bool,
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Dust,
    Sparkle,
    Star,
    Confetti,
    Debris,
}

/// Cosmetic, time-boxed effect.  No gameplay influence.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Frames remaining; the particle is dropped the frame this reaches 0.
    pub life: u32,
    pub max_life: u32,
    pub kind: ParticleKind,
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    /// Current shake magnitude; decays geometrically.
    pub shake: f32,
}

// ── Session status ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}
