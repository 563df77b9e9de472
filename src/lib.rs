//! Spike Arena - a side-view platform arena under a ceiling of spikes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, hazard layout, physics, damage)
//! - `tuning`: Data-driven arena, player and layout configuration

pub mod sim;
pub mod tuning;

pub use tuning::{ArenaConfig, DamageTuning, FloatRange, LayoutConfig, PlayerTuning};

/// Default configuration constants
pub mod consts {
    /// Arena dimensions (world units, y grows downward)
    pub const ARENA_WIDTH: f32 = 640.0;
    pub const ARENA_HEIGHT: f32 = 360.0;
    /// Distance from the bottom of the arena to the floor surface
    pub const FLOOR_INSET: f32 = 36.0;

    /// Player spawn column
    pub const SPAWN_X: f32 = 80.0;

    /// Player defaults (per-tick units)
    pub const PLAYER_RADIUS: f32 = 26.0;
    pub const PLAYER_ACCEL: f32 = 0.55;
    pub const PLAYER_MAX_RUN: f32 = 4.0;
    pub const PLAYER_GRAVITY: f32 = 0.65;
    /// Negative is up
    pub const PLAYER_JUMP_VELOCITY: f32 = -11.0;
    pub const FRICTION_GROUND: f32 = 0.88;
    pub const FRICTION_AIR: f32 = 0.995;

    /// Hazard layout defaults
    pub const LAYOUT_MARGIN: f32 = 8.0;
    pub const SPIKE_MIN_W: f32 = 28.0;
    pub const SPIKE_MAX_W: f32 = 56.0;
    pub const SPIKE_MIN_H: f32 = 20.0;
    pub const SPIKE_MAX_H: f32 = 260.0;
    pub const SPIKE_MIN_GAP: f32 = 22.0;
    pub const SPIKE_MAX_GAP: f32 = 60.0;
    /// Extra randomness added on height rerolls
    pub const HEIGHT_JITTER_MIN: f32 = -10.0;
    pub const HEIGHT_JITTER_MAX: f32 = 10.0;
    /// Rerolled heights never drop below this
    pub const SPIKE_HEIGHT_FLOOR: f32 = 10.0;

    /// Damage feedback durations (ticks)
    pub const HIT_FLASH_TICKS: u32 = 15;
    pub const INVULN_TICKS: u32 = 45;
    /// Player flicker period while invulnerable (ticks)
    pub const FLICKER_PERIOD: u32 = 6;
}
