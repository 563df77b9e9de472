//! Arena tuning and configuration
//!
//! Every value has a default in `crate::consts`; JSON documents may override
//! any subset of fields.

use std::path::Path;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A half-open `[min, max)` sampling range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range is usable when both ends and its span are finite and `min <= max`
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && (self.max - self.min).is_finite()
            && self.min <= self.max
    }

    /// Draw a uniform sample, or `None` for a degenerate range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<f32> {
        if !self.is_valid() {
            return None;
        }
        if self.min == self.max {
            return Some(self.min);
        }
        Some(rng.random_range(self.min..self.max))
    }
}

/// Player movement constants (per-tick units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub accel: f32,
    pub max_run: f32,
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_velocity: f32,
    pub friction_ground: f32,
    pub friction_air: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            accel: PLAYER_ACCEL,
            max_run: PLAYER_MAX_RUN,
            gravity: PLAYER_GRAVITY,
            jump_velocity: PLAYER_JUMP_VELOCITY,
            friction_ground: FRICTION_GROUND,
            friction_air: FRICTION_AIR,
        }
    }
}

/// Ceiling spike layout parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Arena width the layout spans
    pub arena_width: f32,
    /// Empty border kept at both ends of every fill
    pub margin: f32,
    pub width: FloatRange,
    pub height: FloatRange,
    /// Cursor advance between consecutive spikes
    pub gap: FloatRange,
    /// Added to rerolled heights
    pub jitter: FloatRange,
    pub height_floor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            margin: LAYOUT_MARGIN,
            width: FloatRange::new(SPIKE_MIN_W, SPIKE_MAX_W),
            height: FloatRange::new(SPIKE_MIN_H, SPIKE_MAX_H),
            gap: FloatRange::new(SPIKE_MIN_GAP, SPIKE_MAX_GAP),
            jitter: FloatRange::new(HEIGHT_JITTER_MIN, HEIGHT_JITTER_MAX),
            height_floor: SPIKE_HEIGHT_FLOOR,
        }
    }
}

/// Damage feedback durations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTuning {
    pub hit_flash_ticks: u32,
    pub invuln_ticks: u32,
    pub flicker_period: u32,
}

impl Default for DamageTuning {
    fn default() -> Self {
        Self {
            hit_flash_ticks: HIT_FLASH_TICKS,
            invuln_ticks: INVULN_TICKS,
            flicker_period: FLICKER_PERIOD,
        }
    }
}

/// Complete arena configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    /// Distance from the arena bottom up to the floor surface
    pub floor_inset: f32,
    pub spawn_x: f32,
    pub player: PlayerTuning,
    pub layout: LayoutConfig,
    pub damage: DamageTuning,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            floor_inset: FLOOR_INSET,
            spawn_x: SPAWN_X,
            player: PlayerTuning::default(),
            layout: LayoutConfig::default(),
            damage: DamageTuning::default(),
        }
    }
}

impl ArenaConfig {
    /// Y coordinate of the floor surface
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.height - self.floor_inset
    }

    /// Fixed respawn point, one unit above the floor
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.floor_y() - self.player.radius - 1.0)
    }

    /// Parse a (possibly partial) JSON document
    ///
    /// The layout width follows the arena width unless the document sets it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let layout_width_given = value
            .get("layout")
            .and_then(|l| l.get("arena_width"))
            .is_some();
        let mut config: Self = serde_json::from_value(value)?;
        if !layout_width_given {
            config.layout.arena_width = config.width;
        }
        Ok(config)
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded arena config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid arena config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// List configuration problems
    ///
    /// None of these are fatal: degenerate layout ranges only yield an empty
    /// spike set.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let layout = &self.layout;
        for (name, range) in [
            ("width", layout.width),
            ("height", layout.height),
            ("gap", layout.gap),
            ("jitter", layout.jitter),
        ] {
            if !range.is_valid() {
                problems.push(format!(
                    "layout.{name} range is degenerate ({} .. {})",
                    range.min, range.max
                ));
            }
        }
        if layout.width.is_valid() && layout.width.min <= 0.0 {
            problems.push("layout.width must be positive".to_string());
        }
        if layout.arena_width < layout.width.min + 2.0 * layout.margin {
            problems.push(format!(
                "layout arena width {} leaves no room for a spike",
                layout.arena_width
            ));
        }
        let player = &self.player;
        if player.radius <= 0.0 {
            problems.push("player.radius must be positive".to_string());
        } else if self.width < 2.0 * player.radius {
            problems.push(format!(
                "arena width {} is narrower than the player ({})",
                self.width,
                2.0 * player.radius
            ));
        }
        if player.max_run.is_nan() || player.max_run < 0.0 {
            problems.push(format!("player.max_run must be >= 0 (got {})", player.max_run));
        }
        for (name, value) in [
            ("accel", player.accel),
            ("gravity", player.gravity),
            ("jump_velocity", player.jump_velocity),
            ("friction_ground", player.friction_ground),
            ("friction_air", player.friction_air),
        ] {
            if !value.is_finite() {
                problems.push(format!("player.{name} must be finite"));
            }
        }
        if self.floor_inset > self.height {
            problems.push("floor_inset exceeds arena height".to_string());
        }
        problems
    }

    /// Log every validation problem as a warning
    pub fn warn_if_invalid(&self) {
        for problem in self.validate() {
            log::warn!("Arena config: {problem}");
        }
    }
}
