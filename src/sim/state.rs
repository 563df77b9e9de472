//! World state and core simulation types
//!
//! Everything a tick reads or writes lives in `World`; there is no ambient
//! state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::damage::DamageState;
use super::geometry::Rect;
use super::hazard::{self, Hazard};
use crate::tuning::{ArenaConfig, PlayerTuning};

/// The player-controlled body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Set when the last vertical resolution landed on a platform top
    pub grounded: bool,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            radius: tuning.radius,
            grounded: false,
        }
    }

    /// Collision box (square of side 2r around the center)
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.radius)
    }

    /// Back to the spawn point at rest
    pub fn respawn(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SimEvent {
    Jumped,
    /// Grounded after being airborne
    Landed,
    /// Index into the hazard list at the time of the strike
    HazardStruck { hazard: usize },
}

/// Floor across the arena plus four floating ledges
pub fn default_platforms(config: &ArenaConfig) -> Vec<Rect> {
    let floor_y = config.floor_y();
    vec![
        Rect::new(0.0, floor_y, config.width, config.height - floor_y),
        Rect::new(120.0, floor_y - 70.0, 120.0, 12.0),
        Rect::new(300.0, floor_y - 120.0, 90.0, 12.0),
        Rect::new(440.0, floor_y - 180.0, 130.0, 12.0),
        Rect::new(520.0, floor_y - 70.0, 90.0, 12.0),
    ]
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: ArenaConfig,
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Static level geometry, read-only during ticks
    pub platforms: Vec<Rect>,
    /// Ceiling spikes ordered by x
    pub hazards: Vec<Hazard>,
    pub damage: DamageState,
    /// Events from the most recent tick
    pub events: Vec<SimEvent>,
}

impl World {
    /// Default level with a fresh spike layout
    pub fn new(config: ArenaConfig, seed: u64) -> Self {
        let platforms = default_platforms(&config);
        Self::with_platforms(config, platforms, seed)
    }

    pub fn with_platforms(config: ArenaConfig, platforms: Vec<Rect>, seed: u64) -> Self {
        config.warn_if_invalid();
        let mut rng = Pcg32::seed_from_u64(seed);
        let hazards = hazard::build_full_layout(&config.layout, &mut rng);
        let player = Player::new(config.spawn_point(), &config.player);
        log::info!(
            "World created: seed={}, {} platforms, {} spikes",
            seed,
            platforms.len(),
            hazards.len()
        );
        Self {
            config,
            seed,
            rng,
            time_ticks: 0,
            player,
            platforms,
            hazards,
            damage: DamageState::default(),
            events: Vec::new(),
        }
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.config.spawn_point()
    }

    pub fn locked_count(&self) -> usize {
        self.hazards.iter().filter(|h| h.locked).count()
    }

    /// Read-only view for the render collaborator
    pub fn view(&self) -> FrameView<'_> {
        let tuning = &self.config.damage;
        FrameView {
            seed: self.seed,
            tick: self.time_ticks,
            player: &self.player,
            player_visible: self.damage.player_visible(self.time_ticks, tuning),
            platforms: &self.platforms,
            hazards: &self.hazards,
            hit_flash_ticks: self.damage.hit_flash_ticks,
            invuln_ticks: self.damage.invuln_ticks,
            flash_intensity: self.damage.flash_intensity(tuning),
            events: &self.events,
        }
    }
}

/// Per-tick snapshot handed to rendering
#[derive(Debug, Serialize)]
pub struct FrameView<'a> {
    pub seed: u64,
    pub tick: u64,
    pub player: &'a Player,
    pub player_visible: bool,
    pub platforms: &'a [Rect],
    pub hazards: &'a [Hazard],
    pub hit_flash_ticks: u32,
    pub invuln_ticks: u32,
    pub flash_intensity: f32,
    /// Events from the tick that produced this frame
    pub events: &'a [SimEvent],
}
