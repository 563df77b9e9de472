//! Fixed-step simulation tick
//!
//! One tick runs input, platform collision, the spike strike test and the
//! damage countdown in that order. Layout commands are applied between ticks.

use std::collections::VecDeque;

use glam::Vec2;

use super::geometry::{circle_hits_triangle, rect_overlap};
use super::hazard;
use super::state::{SimEvent, World};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// -1 left, 0 none, +1 right
    pub horizontal: i8,
    /// Edge-triggered; only acted on while grounded
    pub jump: bool,
}

impl TickInput {
    pub fn new(horizontal: i8, jump: bool) -> Self {
        Self {
            horizontal: horizontal.signum(),
            jump,
        }
    }
}

/// Discrete layout commands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// New heights for unlocked spikes
    Reroll,
    /// New layout around the locked spikes
    RegeneratePreservingLocked,
    /// New layout, all locks cleared
    RegenerateFullReset,
    UnlockAll,
    /// Flip the lock of the spike under a world-space point
    ToggleLock(Vec2),
}

/// Where a frame's input comes from (keyboard, gamepad, script, ...)
pub trait InputSource {
    fn horizontal_axis(&self) -> i8;
    fn jump_pressed(&self) -> bool;
    /// Commands issued since the previous frame, oldest first
    fn drain_commands(&mut self) -> Vec<Command>;

    fn tick_input(&self) -> TickInput {
        TickInput::new(self.horizontal_axis(), self.jump_pressed())
    }
}

/// Apply a layout command; the hazard list is replaced or edited as a whole
pub fn apply_command(world: &mut World, command: Command) {
    let layout = &world.config.layout;
    match command {
        Command::Reroll => {
            hazard::reroll_heights(&mut world.hazards, layout, &mut world.rng);
            log::info!(
                "Rerolled heights ({} locked spikes kept)",
                world.locked_count()
            );
        }
        Command::RegeneratePreservingLocked => {
            world.hazards = hazard::rebuild_preserving_locked(&world.hazards, layout, &mut world.rng);
            log::info!(
                "New layout: {} spikes, {} locked",
                world.hazards.len(),
                world.locked_count()
            );
        }
        Command::RegenerateFullReset => {
            world.hazards = hazard::build_full_layout(layout, &mut world.rng);
            log::info!("Full reset: {} spikes", world.hazards.len());
        }
        Command::UnlockAll => {
            hazard::unlock_all(&mut world.hazards);
            log::info!("Unlocked all spikes");
        }
        Command::ToggleLock(point) => match hazard::toggle_lock(&mut world.hazards, point) {
            Some(index) => log::debug!(
                "Spike {} {}",
                index,
                if world.hazards[index].locked {
                    "locked"
                } else {
                    "unlocked"
                }
            ),
            None => log::debug!("No spike at ({:.1}, {:.1})", point.x, point.y),
        },
    }
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) {
    world.events.clear();
    world.time_ticks += 1;

    let tuning = &world.config.player;
    let player = &mut world.player;
    let was_grounded = player.grounded;

    if input.jump && player.grounded {
        player.vel.y = tuning.jump_velocity;
        player.grounded = false;
        world.events.push(SimEvent::Jumped);
    }

    // Velocity
    player.vel.x += tuning.accel * f32::from(input.horizontal.signum());
    player.vel.x *= if player.grounded {
        tuning.friction_ground
    } else {
        tuning.friction_air
    };
    // Must not panic for a negative max_run
    player.vel.x = player.vel.x.min(tuning.max_run).max(-tuning.max_run);
    player.vel.y += tuning.gravity;

    let mut bounds = player.bounds();

    // Horizontal sweep
    bounds.x += player.vel.x;
    for platform in &world.platforms {
        if rect_overlap(&bounds, platform) {
            if player.vel.x > 0.0 {
                bounds.x = platform.x - bounds.w;
            } else if player.vel.x < 0.0 {
                bounds.x = platform.right();
            }
            player.vel.x = 0.0;
        }
    }

    // Vertical sweep
    bounds.y += player.vel.y;
    player.grounded = false;
    for platform in &world.platforms {
        if rect_overlap(&bounds, platform) {
            if player.vel.y > 0.0 {
                bounds.y = platform.y - bounds.h;
                player.vel.y = 0.0;
                player.grounded = true;
            } else if player.vel.y < 0.0 {
                bounds.y = platform.bottom();
                player.vel.y = 0.0;
            }
        }
    }

    player.pos = bounds.center();
    let radius = player.radius;
    // An arena narrower than the player pins it to the left wall
    player.pos.x = player.pos.x.min(world.config.width - radius).max(radius);

    if player.grounded && !was_grounded {
        world.events.push(SimEvent::Landed);
    }

    // Spike strikes, at most one per tick
    if !world.damage.is_invulnerable() {
        let center = world.player.pos;
        let struck = world
            .hazards
            .iter()
            .position(|h| circle_hits_triangle(center, radius, &h.triangle()));
        if let Some(index) = struck {
            log::debug!(
                "Spike {} struck player at ({:.1}, {:.1})",
                index,
                center.x,
                center.y
            );
            let spawn = world.config.spawn_point();
            world.player.respawn(spawn);
            world.damage.strike(&world.config.damage);
            world.events.push(SimEvent::HazardStruck { hazard: index });
        }
    }

    world.damage.countdown();
}

/// Apply pending commands, then tick once
pub fn run_frame<S: InputSource + ?Sized>(world: &mut World, source: &mut S) {
    for command in source.drain_commands() {
        apply_command(world, command);
    }
    let input = source.tick_input();
    tick(world, &input);
}

/// Pre-recorded input, one entry per frame
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<(TickInput, Vec<Command>)>,
    current: TickInput,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `count` frames of the same held input
    pub fn hold(mut self, input: TickInput, count: usize) -> Self {
        for _ in 0..count {
            self.frames.push_back((input, Vec::new()));
        }
        self
    }

    /// Queue one frame that issues `command` with no movement
    pub fn command(mut self, command: Command) -> Self {
        self.frames.push_back((TickInput::default(), vec![command]));
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn horizontal_axis(&self) -> i8 {
        self.current.horizontal
    }

    fn jump_pressed(&self) -> bool {
        self.current.jump
    }

    /// Advances the script by one frame
    fn drain_commands(&mut self) -> Vec<Command> {
        match self.frames.pop_front() {
            Some((input, commands)) => {
                self.current = input;
                commands
            }
            None => {
                self.current = TickInput::default();
                Vec::new()
            }
        }
    }
}
