//! Damage feedback and invulnerability window

use serde::{Deserialize, Serialize};

use crate::tuning::DamageTuning;

/// Whether the player can currently be struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamagePhase {
    Normal,
    /// Strike tests are skipped until the timer runs out
    Invulnerable,
}

/// Hit flash and invulnerability countdowns (ticks)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageState {
    pub hit_flash_ticks: u32,
    pub invuln_ticks: u32,
}

impl DamageState {
    pub fn phase(&self) -> DamagePhase {
        if self.invuln_ticks > 0 {
            DamagePhase::Invulnerable
        } else {
            DamagePhase::Normal
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invuln_ticks > 0
    }

    /// Start the flash and invulnerability windows
    pub fn strike(&mut self, tuning: &DamageTuning) {
        self.hit_flash_ticks = tuning.hit_flash_ticks;
        self.invuln_ticks = tuning.invuln_ticks;
    }

    /// Advance both countdowns by one tick
    pub fn countdown(&mut self) {
        self.hit_flash_ticks = self.hit_flash_ticks.saturating_sub(1);
        self.invuln_ticks = self.invuln_ticks.saturating_sub(1);
    }

    /// Red overlay strength in [0, 1]
    pub fn flash_intensity(&self, tuning: &DamageTuning) -> f32 {
        if tuning.hit_flash_ticks == 0 {
            return 0.0;
        }
        (self.hit_flash_ticks as f32 / tuning.hit_flash_ticks as f32).clamp(0.0, 1.0)
    }

    /// Flicker while invulnerable: visible for the first half of each period
    pub fn player_visible(&self, tick: u64, tuning: &DamageTuning) -> bool {
        if !self.is_invulnerable() || tuning.flicker_period == 0 {
            return true;
        }
        let period = u64::from(tuning.flicker_period);
        tick % period < period.div_ceil(2)
    }
}
