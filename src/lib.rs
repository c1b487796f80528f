pub mod ai;
pub mod camera;
pub mod clock;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod input;
pub mod level;
pub mod particles;
pub mod persistence;
pub mod physics;
