/// Error taxonomy for everything that can fail outside the frame loop.
///
/// The per-frame simulation is total and never produces one of these; they
/// only come out of level loading, tuning loading and persistence.

use thiserror::Error;

/// A level definition that cannot be simulated.  Raised once, at load time.
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("level {field} must be positive and finite, got {value}")]
    InvalidDimension { field: &'static str, value: f32 },

    #[error("{entity} #{index} has a non-finite coordinate")]
    NonFinite { entity: &'static str, index: usize },

    #[error("{entity} #{index} has a non-positive size ({width}x{height})")]
    InvalidSize {
        entity: &'static str,
        index: usize,
        width: f32,
        height: f32,
    },

    #[error("{entity} #{index} lies outside the level (x={x}, level width {level_width})")]
    OutOfBounds {
        entity: &'static str,
        index: usize,
        x: f32,
        level_width: f32,
    },

    #[error("{entity} #{index} lies outside the level (y={y}, level height {level_height})")]
    VerticalOutOfBounds {
        entity: &'static str,
        index: usize,
        y: f32,
        level_height: f32,
    },

    #[error("{entity} #{index} spawns at y={y}, at or below the death line {death_y}")]
    SpawnBelowDeathLine {
        entity: &'static str,
        index: usize,
        y: f32,
        death_y: f32,
    },

    #[error("goal x={goal} is past the furthest point a player can reach ({reach})")]
    GoalUnreachable { goal: f32, reach: f32 },

    #[error("moving platform #{index} has an invalid range {range} or speed {speed}")]
    InvalidMotion { index: usize, range: f32, speed: f32 },

    #[error("vine #{index} must have a positive length, got {length}")]
    InvalidVine { index: usize, length: f32 },

    #[error("goal x={goal} must lie inside the level (width {level_width})")]
    GoalOutOfBounds { goal: f32, level_width: f32 },

    #[error("checkpoint id {id} is used more than once")]
    DuplicateCheckpoint { id: u32 },
}

/// Failure to read a level or tuning file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid level: {0}")]
    Invalid(#[from] LevelError),
}

/// Failure of a key-value persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
