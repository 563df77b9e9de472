//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (platforms as given, spikes by x)
//! - No rendering or platform dependencies

pub mod damage;
pub mod geometry;
pub mod hazard;
pub mod state;
pub mod tick;

pub use damage::{DamagePhase, DamageState};
pub use geometry::{
    Rect, Triangle, circle_hits_triangle, distance_point_to_segment, point_in_triangle,
    rect_overlap,
};
pub use hazard::{
    Hazard, build_full_layout, rebuild_preserving_locked, reroll_heights, toggle_lock, unlock_all,
};
pub use state::{FrameView, Player, SimEvent, World, default_platforms};
pub use tick::{Command, InputSource, ScriptedInput, TickInput, apply_command, run_frame, tick};
