/// Level definitions: the data a level loader hands to the simulation.
///
/// Levels are JSON documents.  They are validated once, on load; a level
/// that passes `validate` can be simulated without any further checks.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{
    Checkpoint, Collectible, CollectibleKind, Crumble, Enemy, EnemyKind, Oscillation, Platform,
    PlatformKind, PowerUpKind, Vine,
};
use crate::error::{LevelError, LoadError};

// ── Serialized form ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformSpec {
    Ground,
    Wood,
    /// Oscillates between its `x` and `x + range`.
    Moving { speed: f32, range: f32 },
    Bouncy,
    Crumbling,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(flatten)]
    pub kind: PlatformSpec,
}

fn default_enemy_width() -> f32 {
    24.0
}

fn default_enemy_height() -> f32 {
    30.0
}

fn default_enemy_speed() -> f32 {
    -1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_enemy_width")]
    pub width: f32,
    #[serde(default = "default_enemy_height")]
    pub height: f32,
    /// Signed horizontal speed; the sign is the starting direction.
    #[serde(default = "default_enemy_speed")]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    #[serde(default)]
    pub kind: EnemyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patrol: Option<[f32; 2]>,
}

fn default_item_size() -> f32 {
    16.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectibleDef {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_item_size")]
    pub width: f32,
    #[serde(default = "default_item_size")]
    pub height: f32,
    #[serde(default)]
    pub kind: CollectibleKind,
    /// Defaults to the kind's standard value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

fn default_swing_speed() -> f32 {
    0.02
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VineDef {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    #[serde(default)]
    pub swing_angle: f32,
    #[serde(default = "default_swing_speed")]
    pub swing_speed: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckpointDef {
    pub id: u32,
    pub x: f32,
    /// Defaults to the level's start height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respawn_y: Option<f32>,
}

fn default_height() -> f32 {
    500.0
}

fn default_end_margin() -> f32 {
    100.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    /// Reaching this `x` completes the level.  Defaults to `width - end_margin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_x: Option<f32>,
    #[serde(default = "default_end_margin")]
    pub end_margin: f32,
    /// Falling below this `y` costs a life.  Defaults to `height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_y: Option<f32>,
    pub start: Point,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleDef>,
    #[serde(default)]
    pub vines: Vec<VineDef>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointDef>,
}

/// Standard score of a collectible kind when the level does not set one.
pub fn default_value(kind: CollectibleKind) -> u32 {
    match kind {
        CollectibleKind::Normal => 100,
        CollectibleKind::Golden => 500,
        CollectibleKind::Bonus => 1000,
        CollectibleKind::PowerUp(_) => 250,
    }
}

// ── Loading & validation ──────────────────────────────────────────────────────

impl LevelDefinition {
    /// Parse and validate.
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        let level: LevelDefinition = serde_json::from_str(s)?;
        level.validate()?;
        debug!(name = %level.name, platforms = level.platforms.len(), "level parsed");
        Ok(level)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn goal(&self) -> f32 {
        self.goal_x.unwrap_or(self.width - self.end_margin)
    }

    pub fn death_line(&self) -> f32 {
        self.death_y.unwrap_or(self.height)
    }

    /// Reject anything the simulation would otherwise have to clamp or guess at.
    pub fn validate(&self) -> Result<(), LevelError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        if !self.end_margin.is_finite() || self.end_margin < 0.0 {
            return Err(LevelError::InvalidDimension {
                field: "end_margin",
                value: self.end_margin,
            });
        }
        if let Some(death_y) = self.death_y {
            if !death_y.is_finite() {
                return Err(LevelError::InvalidDimension {
                    field: "death_y",
                    value: death_y,
                });
            }
        }

        let goal = self.goal();
        if !goal.is_finite() || goal <= 0.0 || goal > self.width {
            return Err(LevelError::GoalOutOfBounds {
                goal,
                level_width: self.width,
            });
        }

        finite_point("start", 0, self.start.x, self.start.y)?;
        self.inside("start", 0, self.start.x, self.start.y)?;
        self.above_death_line("start", 0, self.start.y)?;

        for (i, p) in self.platforms.iter().enumerate() {
            finite_point("platform", i, p.x, p.y)?;
            sized("platform", i, p.width, p.height)?;
            if p.x >= self.width || p.x + p.width <= 0.0 {
                return Err(self.out_of_bounds("platform", i, p.x));
            }
            self.inside_vertically("platform", i, p.y)?;
            if let PlatformSpec::Moving { speed, range } = p.kind {
                if !speed.is_finite() || speed == 0.0 || !range.is_finite() || range <= 0.0 {
                    return Err(LevelError::InvalidMotion {
                        index: i,
                        range,
                        speed,
                    });
                }
            }
        }

        for (i, e) in self.enemies.iter().enumerate() {
            finite_point("enemy", i, e.x, e.y)?;
            sized("enemy", i, e.width, e.height)?;
            self.inside("enemy", i, e.x, e.y)?;
            if !e.vx.is_finite() || !e.vy.is_finite() {
                return Err(LevelError::NonFinite {
                    entity: "enemy",
                    index: i,
                });
            }
            if let Some([start, end]) = e.patrol {
                if !start.is_finite() || !end.is_finite() || start >= end {
                    return Err(LevelError::InvalidDimension {
                        field: "patrol",
                        value: end - start,
                    });
                }
            }
        }

        for (i, c) in self.collectibles.iter().enumerate() {
            finite_point("collectible", i, c.x, c.y)?;
            sized("collectible", i, c.width, c.height)?;
            self.inside("collectible", i, c.x, c.y)?;
        }

        for (i, v) in self.vines.iter().enumerate() {
            finite_point("vine", i, v.x, v.y)?;
            if !v.length.is_finite() || v.length <= 0.0 {
                return Err(LevelError::InvalidVine {
                    index: i,
                    length: v.length,
                });
            }
            if !v.swing_angle.is_finite() || !v.swing_speed.is_finite() {
                return Err(LevelError::NonFinite {
                    entity: "vine",
                    index: i,
                });
            }
            self.inside("vine", i, v.x, v.y)?;
        }

        let mut ids = HashSet::new();
        for (i, c) in self.checkpoints.iter().enumerate() {
            let respawn_y = c.respawn_y.unwrap_or(self.start.y);
            finite_point("checkpoint", i, c.x, respawn_y)?;
            self.inside("checkpoint", i, c.x, respawn_y)?;
            self.above_death_line("checkpoint", i, respawn_y)?;
            if !ids.insert(c.id) {
                return Err(LevelError::DuplicateCheckpoint { id: c.id });
            }
        }

        Ok(())
    }

    /// `x` in `[0, width)` and `y` in `[0, height)`.
    fn inside(&self, entity: &'static str, index: usize, x: f32, y: f32) -> Result<(), LevelError> {
        if x < 0.0 || x >= self.width {
            return Err(self.out_of_bounds(entity, index, x));
        }
        self.inside_vertically(entity, index, y)
    }

    fn inside_vertically(
        &self,
        entity: &'static str,
        index: usize,
        y: f32,
    ) -> Result<(), LevelError> {
        if y < 0.0 || y >= self.height {
            return Err(LevelError::VerticalOutOfBounds {
                entity,
                index,
                y,
                level_height: self.height,
            });
        }
        Ok(())
    }

    /// A spawn point at or below the death line would kill the player on arrival.
    fn above_death_line(
        &self,
        entity: &'static str,
        index: usize,
        y: f32,
    ) -> Result<(), LevelError> {
        let death_y = self.death_line();
        if y >= death_y {
            return Err(LevelError::SpawnBelowDeathLine {
                entity,
                index,
                y,
                death_y,
            });
        }
        Ok(())
    }

    fn out_of_bounds(&self, entity: &'static str, index: usize, x: f32) -> LevelError {
        LevelError::OutOfBounds {
            entity,
            index,
            x,
            level_width: self.width,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), LevelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LevelError::InvalidDimension { field, value })
    }
}

fn finite_point(entity: &'static str, index: usize, x: f32, y: f32) -> Result<(), LevelError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(LevelError::NonFinite { entity, index })
    }
}

fn sized(entity: &'static str, index: usize, width: f32, height: f32) -> Result<(), LevelError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(LevelError::InvalidSize {
            entity,
            index,
            width,
            height,
        })
    }
}

// ── Instantiation ─────────────────────────────────────────────────────────────

/// Live entities built from a definition.  Rebuilt on every restart, which
/// is what brings back crumbled platforms, eaten bananas and beaten enemies.
#[derive(Clone, Debug)]
pub struct LevelEntities {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub vines: Vec<Vine>,
    pub checkpoints: Vec<Checkpoint>,
}

impl LevelDefinition {
    pub fn instantiate(&self) -> LevelEntities {
        LevelEntities {
            platforms: self.platforms.iter().map(build_platform).collect(),
            enemies: self.enemies.iter().map(build_enemy).collect(),
            collectibles: self.collectibles.iter().map(build_collectible).collect(),
            vines: self
                .vines
                .iter()
                .map(|v| Vine {
                    x: v.x,
                    y: v.y,
                    length: v.length,
                    swing_angle: v.swing_angle,
                    swing_speed: v.swing_speed,
                })
                .collect(),
            checkpoints: self
                .checkpoints
                .iter()
                .map(|c| Checkpoint {
                    id: c.id,
                    x: c.x,
                    respawn_y: c.respawn_y.unwrap_or(self.start.y),
                    activated: false,
                })
                .collect(),
        }
    }
}

fn build_platform(def: &PlatformDef) -> Platform {
    let kind = match def.kind {
        PlatformSpec::Ground => PlatformKind::Ground,
        PlatformSpec::Wood => PlatformKind::Wood,
        PlatformSpec::Moving { speed, range } => PlatformKind::Moving(Oscillation {
            origin_x: def.x,
            speed,
            range,
        }),
        PlatformSpec::Bouncy => PlatformKind::Bouncy,
        PlatformSpec::Crumbling => PlatformKind::Crumbling(Crumble::default()),
    };
    Platform::new(def.x, def.y, def.width, def.height, kind)
}

fn build_enemy(def: &EnemyDef) -> Enemy {
    let mut enemy = Enemy::new(def.x, def.y, def.width, def.height, def.vx, def.kind);
    enemy.vy = def.vy;
    enemy.patrol = def.patrol.map(|[start, end]| (start, end));
    enemy
}

fn build_collectible(def: &CollectibleDef) -> Collectible {
    Collectible {
        x: def.x,
        y: def.y,
        width: def.width,
        height: def.height,
        collected: false,
        value: def.value.unwrap_or_else(|| default_value(def.kind)),
        kind: def.kind,
    }
}

// ── Built-in level ────────────────────────────────────────────────────────────

fn platform(x: f32, y: f32, width: f32, height: f32, kind: PlatformSpec) -> PlatformDef {
    PlatformDef { x, y, width, height, kind }
}

fn kremling(x: f32, vx: f32, kind: EnemyKind, patrol: Option<[f32; 2]>) -> EnemyDef {
    EnemyDef {
        x,
        y: 420.0,
        width: 24.0,
        height: 30.0,
        vx,
        vy: 0.0,
        kind,
        patrol,
    }
}

fn banana(x: f32, y: f32, kind: CollectibleKind) -> CollectibleDef {
    CollectibleDef {
        x,
        y,
        width: 16.0,
        height: 16.0,
        kind,
        value: None,
    }
}

fn vine(x: f32, y: f32, length: f32, swing_angle: f32, swing_speed: f32) -> VineDef {
    VineDef { x, y, length, swing_angle, swing_speed }
}

/// "Jungle Hijinx": a 2400px jungle run with every platform kind, vines,
/// two checkpoints and a mix of kremlings.
pub fn jungle_hijinx() -> LevelDefinition {
    use CollectibleKind::{Bonus, Golden, Normal, PowerUp};
    use PlatformSpec::{Bouncy, Crumbling, Ground, Moving, Wood};

    LevelDefinition {
        name: "Jungle Hijinx".to_owned(),
        width: 2400.0,
        height: 500.0,
        goal_x: Some(2300.0),
        end_margin: default_end_margin(),
        death_y: Some(500.0),
        start: Point { x: 100.0, y: 350.0 },
        platforms: vec![
            platform(0.0, 450.0, 400.0, 30.0, Ground),
            platform(500.0, 450.0, 300.0, 30.0, Ground),
            platform(900.0, 450.0, 400.0, 30.0, Ground),
            platform(1400.0, 450.0, 300.0, 30.0, Ground),
            platform(1800.0, 450.0, 600.0, 30.0, Ground),
            platform(300.0, 350.0, 120.0, 20.0, Wood),
            platform(550.0, 300.0, 100.0, 20.0, Wood),
            platform(750.0, 250.0, 80.0, 20.0, Wood),
            platform(950.0, 200.0, 120.0, 20.0, Wood),
            platform(1200.0, 300.0, 100.0, 20.0, Wood),
            platform(1450.0, 250.0, 150.0, 20.0, Wood),
            platform(1700.0, 200.0, 100.0, 20.0, Wood),
            platform(1950.0, 300.0, 120.0, 20.0, Wood),
            platform(400.0, 380.0, 80.0, 15.0, Moving { speed: 1.0, range: 100.0 }),
            platform(1100.0, 350.0, 80.0, 15.0, Moving { speed: 1.5, range: 120.0 }),
            platform(650.0, 400.0, 60.0, 15.0, Bouncy),
            platform(1340.0, 380.0, 60.0, 15.0, Bouncy),
            platform(850.0, 350.0, 80.0, 15.0, Crumbling),
            platform(1550.0, 320.0, 80.0, 15.0, Crumbling),
        ],
        enemies: vec![
            kremling(350.0, -1.0, EnemyKind::Patrol, Some([300.0, 376.0])),
            kremling(600.0, 1.0, EnemyKind::Patrol, None),
            kremling(1000.0, -1.0, EnemyKind::Chaser, None),
            kremling(1500.0, 1.0, EnemyKind::Patrol, Some([1450.0, 1650.0])),
            kremling(1900.0, -1.2, EnemyKind::Chaser, None),
            EnemyDef {
                x: 2380.0,
                y: 380.0,
                width: 16.0,
                height: 10.0,
                vx: -3.0,
                vy: 0.0,
                kind: EnemyKind::Projectile,
                patrol: None,
            },
        ],
        collectibles: vec![
            banana(250.0, 320.0, Normal),
            banana(380.0, 280.0, Normal),
            banana(580.0, 270.0, Normal),
            banana(780.0, 220.0, Normal),
            banana(980.0, 170.0, Normal),
            banana(1230.0, 270.0, Normal),
            banana(1480.0, 220.0, Normal),
            banana(1730.0, 170.0, Normal),
            banana(1980.0, 270.0, Normal),
            banana(500.0, 200.0, Golden),
            banana(1150.0, 150.0, Golden),
            banana(1850.0, 180.0, Golden),
            banana(350.0, 100.0, Bonus),
            banana(1250.0, 80.0, Bonus),
            banana(2250.0, 300.0, Golden),
            banana(700.0, 360.0, PowerUp(PowerUpKind::DoubleJump)),
            banana(1320.0, 260.0, PowerUp(PowerUpKind::SpeedBoost)),
            banana(1600.0, 410.0, PowerUp(PowerUpKind::Invincibility)),
            banana(2100.0, 410.0, PowerUp(PowerUpKind::ExtraLife)),
        ],
        vines: vec![
            vine(420.0, 100.0, 180.0, 0.1, 0.02),
            vine(680.0, 80.0, 200.0, -0.15, 0.025),
            vine(1050.0, 120.0, 160.0, 0.2, 0.018),
            vine(1380.0, 90.0, 190.0, -0.1, 0.022),
            vine(1750.0, 110.0, 170.0, 0.12, 0.02),
        ],
        checkpoints: vec![
            CheckpointDef { id: 1, x: 800.0, respawn_y: Some(350.0) },
            CheckpointDef { id: 2, x: 1600.0, respawn_y: Some(350.0) },
        ],
    }
}
