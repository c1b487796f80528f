/// Tuning table: every gameplay constant the simulation reads.
///
/// `Tuning::default()` is the canonical table.  A JSON file may override any
/// subset of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::Character;
use crate::error::LoadError;

/// Per-character movement stats and hitbox.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    /// Walk speed, pixels per frame.
    pub speed: f32,
    /// Initial upward velocity of a ground jump.
    pub jump_power: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self::dk()
    }
}

impl CharacterStats {
    pub fn dk() -> Self {
        Self {
            speed: 4.0,
            jump_power: 14.0,
            width: 32.0,
            height: 40.0,
        }
    }

    pub fn diddy() -> Self {
        Self {
            speed: 5.0,
            jump_power: 16.0,
            width: 28.0,
            height: 34.0,
        }
    }
}

/// Screen-shake severities per trigger.  Shake is *set* to these, not added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeTable {
    pub roll: f32,
    pub crumble: f32,
    pub defeat: f32,
    pub ground_pound: f32,
    pub death: f32,
}

impl Default for ShakeTable {
    fn default() -> Self {
        Self {
            roll: 3.0,
            crumble: 2.0,
            defeat: 8.0,
            ground_pound: 15.0,
            death: 25.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed simulation rate every per-frame constant is tuned for.
    pub frames_per_second: u32,

    // Player physics
    pub gravity: f32,
    pub terminal_velocity: f32,
    /// Per-frame horizontal velocity decay with no movement input.
    pub friction: f32,
    pub landing_tolerance: f32,

    // Special moves
    pub roll_multiplier: f32,
    pub roll_duration: u32,
    pub roll_cooldown: u32,
    pub double_jump_factor: f32,
    pub dash_impulse: f32,
    pub dash_duration: u32,
    pub dash_cooldown: u32,
    pub ground_pound_velocity: f32,
    pub ground_pound_radius: f32,

    // Platforms
    pub bounce_velocity: f32,
    pub crumble_delay: u32,

    // Vines
    pub vine_capture_radius: f32,
    /// Free vines sway between `±vine_sway_limit` radians.
    pub vine_sway_limit: f32,
    /// Angular acceleration applied by left/right input while swinging.
    pub swing_push: f32,
    pub swing_damping: f32,
    pub swing_max_angle: f32,
    pub release_speed_x: f32,
    pub release_speed_y: f32,
    pub regrab_cooldown: u32,

    // Enemies & combat
    pub stun_duration: u32,
    pub aggro_radius: f32,
    /// How far below an enemy's feet a platform top may sit and still support it.
    pub support_tolerance: f32,
    pub pounce_bounce: f32,
    pub invulnerability_frames: u32,
    pub combo_window: u32,
    pub defeat_score: u32,
    pub combo_bonus: u32,

    // Power-ups
    pub power_up_duration: u32,
    pub speed_boost_multiplier: f32,

    // Session
    pub starting_lives: u32,
    pub max_lives: u32,
    pub level_complete_bonus: u32,
    pub par_seconds: u32,
    pub time_bonus_per_second: u32,

    // Camera & effects
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub camera_follow: f32,
    pub shake_decay: f32,
    pub shake: ShakeTable,
    pub particle_gravity: f32,
    pub max_particles: usize,

    pub dk: CharacterStats,
    pub diddy: CharacterStats,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            frames_per_second: 60,

            gravity: 0.6,
            terminal_velocity: 15.0,
            friction: 0.8,
            landing_tolerance: 15.0,

            roll_multiplier: 2.5,
            roll_duration: 30,
            roll_cooldown: 60,
            double_jump_factor: 0.8,
            dash_impulse: 12.0,
            dash_duration: 8,
            dash_cooldown: 120,
            ground_pound_velocity: 15.0,
            ground_pound_radius: 120.0,

            bounce_velocity: 18.0,
            crumble_delay: 60,

            vine_capture_radius: 48.0,
            vine_sway_limit: 0.3,
            swing_push: 0.004,
            swing_damping: 0.995,
            swing_max_angle: 1.3,
            release_speed_x: 12.0,
            release_speed_y: 8.0,
            regrab_cooldown: 20,

            stun_duration: 180,
            aggro_radius: 150.0,
            support_tolerance: 5.0,
            pounce_bounce: 10.0,
            invulnerability_frames: 120,
            combo_window: 180,
            defeat_score: 200,
            combo_bonus: 50,

            power_up_duration: 600,
            speed_boost_multiplier: 1.5,

            starting_lives: 3,
            max_lives: 9,
            level_complete_bonus: 1000,
            par_seconds: 300,
            time_bonus_per_second: 10,

            viewport_width: 800.0,
            viewport_height: 500.0,
            camera_follow: 0.1,
            shake_decay: 0.9,
            shake: ShakeTable::default(),
            particle_gravity: 0.2,
            max_particles: 512,

            dk: CharacterStats::dk(),
            diddy: CharacterStats::diddy(),
        }
    }
}

impl Tuning {
    pub fn stats(&self, character: Character) -> &CharacterStats {
        match character {
            Character::Dk => &self.dk,
            Character::Diddy => &self.diddy,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
