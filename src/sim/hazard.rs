//! Ceiling spike layout engine
//!
//! Spikes hang from the ceiling (y = 0) with their apex pointing down. A layout
//! is an x-ordered list of spikes whose `[x, x + w)` intervals never overlap.
//! Locked spikes survive `rebuild_preserving_locked` untouched, and the gaps
//! between them are refilled with fresh random spikes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Triangle;
use crate::tuning::LayoutConfig;

/// A single ceiling spike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    /// Left edge of the base
    pub x: f32,
    /// Base width
    pub w: f32,
    /// Distance the apex hangs below the ceiling
    pub h: f32,
    /// Locked spikes survive layout regeneration and height rerolls
    pub locked: bool,
}

impl Hazard {
    pub fn new(x: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            w,
            h,
            locked: false,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Base corners on the ceiling, apex at mid-base
    pub fn triangle(&self) -> Triangle {
        Triangle::new(
            Vec2::new(self.x, 0.0),
            Vec2::new(self.x + self.w, 0.0),
            Vec2::new(self.x + self.w / 2.0, self.h),
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.triangle().contains(point)
    }
}

/// Append spikes starting at `cursor` while `cursor < open_until`
///
/// With a `right_bound`, the first candidate reaching past it ends the fill.
/// Degenerate ranges and a cursor that stops moving also end it.
fn fill<R: Rng + ?Sized>(
    out: &mut Vec<Hazard>,
    config: &LayoutConfig,
    rng: &mut R,
    mut cursor: f32,
    open_until: f32,
    right_bound: Option<f32>,
) {
    while cursor < open_until {
        let Some(w) = config.width.sample(rng) else {
            break;
        };
        if w <= 0.0 {
            break;
        }
        if right_bound.is_some_and(|bound| cursor + w > bound) {
            break;
        }
        let Some(h) = config.height.sample(rng) else {
            break;
        };
        out.push(Hazard::new(cursor, w, h));

        let Some(gap) = config.gap.sample(rng) else {
            break;
        };
        // Never step back inside the spike just placed
        let next = cursor + gap.max(w);
        if next <= cursor {
            break;
        }
        cursor = next;
    }
}

/// Fresh layout across the whole arena; every spike starts unlocked
pub fn build_full_layout<R: Rng + ?Sized>(config: &LayoutConfig, rng: &mut R) -> Vec<Hazard> {
    let mut hazards = Vec::new();
    fill(
        &mut hazards,
        config,
        rng,
        config.margin,
        config.arena_width - config.margin,
        None,
    );
    hazards
}

/// New heights for every unlocked spike; placement and locks are untouched
pub fn reroll_heights<R: Rng + ?Sized>(hazards: &mut [Hazard], config: &LayoutConfig, rng: &mut R) {
    if !config.height.is_valid() {
        log::warn!("Height range is degenerate, skipping reroll");
        return;
    }
    for hazard in hazards.iter_mut().filter(|h| !h.locked) {
        let Some(base) = config.height.sample(rng) else {
            continue;
        };
        let jitter = config.jitter.sample(rng).unwrap_or(0.0);
        hazard.h = (base + jitter).max(config.height_floor);
    }
}

/// New layout that keeps every locked spike exactly where and how it is
///
/// The gaps left of each locked spike, and right of the last one, are filled
/// with fresh unlocked spikes that never reach into the next locked spike.
pub fn rebuild_preserving_locked<R: Rng + ?Sized>(
    hazards: &[Hazard],
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec<Hazard> {
    let mut locked: Vec<Hazard> = hazards.iter().filter(|h| h.locked).copied().collect();
    locked.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut out = Vec::with_capacity(hazards.len().max(locked.len()));
    let mut cursor = config.margin;

    for spike in &locked {
        fill(
            &mut out,
            config,
            rng,
            cursor,
            spike.x - config.margin,
            Some(spike.x),
        );
        out.push(*spike);
        cursor = spike.right();
    }

    let right_edge = config.arena_width - config.margin;
    fill(
        &mut out,
        config,
        rng,
        cursor,
        right_edge - config.margin,
        Some(right_edge),
    );
    out
}

/// Flip the lock on the spike under `point`, topmost (last) first
///
/// Returns the index of the toggled spike.
pub fn toggle_lock(hazards: &mut [Hazard], point: Vec2) -> Option<usize> {
    let index = hazards.iter().rposition(|h| h.contains(point))?;
    hazards[index].locked = !hazards[index].locked;
    Some(index)
}

pub fn unlock_all(hazards: &mut [Hazard]) {
    for hazard in hazards {
        hazard.locked = false;
    }
}

/// True when x is non-decreasing and no two `[x, x + w)` intervals intersect
pub fn is_non_overlapping(hazards: &[Hazard]) -> bool {
    hazards.windows(2).all(|pair| pair[0].right() <= pair[1].x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::FloatRange;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    /// Every unordered pair, not just neighbours
    fn pairwise_disjoint(hazards: &[Hazard]) -> bool {
        hazards.iter().enumerate().all(|(i, a)| {
            hazards
                .iter()
                .skip(i + 1)
                .all(|b| a.right() <= b.x || b.right() <= a.x)
        })
    }

    #[test]
    fn test_full_layout_fills_arena() {
        let mut rng = Pcg32::seed_from_u64(1);
        let cfg = config();
        let hazards = build_full_layout(&cfg, &mut rng);

        assert!(!hazards.is_empty());
        assert_eq!(hazards[0].x, cfg.margin);
        assert!(is_non_overlapping(&hazards));
        assert!(hazards.iter().all(|h| !h.locked));
        assert!(hazards.iter().all(|h| h.x < cfg.arena_width - cfg.margin));
        for h in &hazards {
            assert!((cfg.width.min..cfg.width.max).contains(&h.w));
            assert!((cfg.height.min..cfg.height.max).contains(&h.h));
        }
    }

    #[test]
    fn test_full_layout_clears_locks() {
        let mut rng = Pcg32::seed_from_u64(2);
        let cfg = config();
        let mut hazards = build_full_layout(&cfg, &mut rng);
        for h in hazards.iter_mut() {
            h.locked = true;
        }
        let hazards = build_full_layout(&cfg, &mut rng);
        assert!(hazards.iter().all(|h| !h.locked));
    }

    #[test]
    fn test_degenerate_ranges_give_empty_layout() {
        let mut rng = Pcg32::seed_from_u64(3);

        let mut cfg = config();
        cfg.width = FloatRange::new(56.0, 28.0);
        assert!(build_full_layout(&cfg, &mut rng).is_empty());

        let mut cfg = config();
        cfg.height = FloatRange::new(f32::NAN, 10.0);
        assert!(build_full_layout(&cfg, &mut rng).is_empty());
        assert!(rebuild_preserving_locked(&[], &cfg, &mut rng).is_empty());
    }

    #[test]
    fn test_narrow_arena_terminates() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut cfg = config();
        cfg.arena_width = 20.0;
        // Only the leading spike fits before the cursor passes the margin
        assert!(build_full_layout(&cfg, &mut rng).len() <= 1);
        assert!(rebuild_preserving_locked(&[], &cfg, &mut rng).is_empty());
    }

    #[test]
    fn test_width_below_cursor_precision_terminates() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut cfg = config();
        cfg.width = FloatRange::new(1e-7, 1e-7);
        cfg.gap = FloatRange::new(0.0, 0.0);

        // 8.0 + 1e-7 rounds back to 8.0, so only one spike is placed
        assert_eq!(build_full_layout(&cfg, &mut rng).len(), 1);
        assert_eq!(rebuild_preserving_locked(&[], &cfg, &mut rng).len(), 1);
    }

    #[test]
    fn test_zero_gap_still_advances() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut cfg = config();
        cfg.gap = FloatRange::new(0.0, 0.0);
        let hazards = build_full_layout(&cfg, &mut rng);
        assert!(!hazards.is_empty());
        assert!(is_non_overlapping(&hazards));
    }

    #[test]
    fn test_rebuild_keeps_single_locked_spike() {
        let mut rng = Pcg32::seed_from_u64(6);
        let cfg = config();
        let mut hazard = Hazard::new(100.0, 30.0, 150.0);
        hazard.locked = true;
        let before = vec![Hazard::new(8.0, 40.0, 70.0), hazard, Hazard::new(300.0, 40.0, 70.0)];

        let after = rebuild_preserving_locked(&before, &cfg, &mut rng);

        let locked: Vec<_> = after.iter().filter(|h| h.locked).collect();
        assert_eq!(locked, vec![&hazard]);
        assert!(is_non_overlapping(&after));

        let right_edge = cfg.arena_width - cfg.margin;
        for h in after.iter().filter(|h| !h.locked) {
            let left_gap = h.x >= 8.0 && h.right() <= 100.0;
            let right_gap = h.x >= 130.0 && h.right() <= right_edge;
            assert!(left_gap || right_gap, "spike {h:?} outside the open gaps");
        }
        // Both gaps are wide enough to start a spike right at their left edge
        assert!(after.iter().any(|h| !h.locked && h.x == 8.0));
        assert!(after.iter().any(|h| !h.locked && h.x == 130.0));
    }

    #[test]
    fn test_rebuild_without_locks_stays_inside_margins() {
        let mut rng = Pcg32::seed_from_u64(7);
        let cfg = config();
        let after = rebuild_preserving_locked(&[], &cfg, &mut rng);
        assert!(!after.is_empty());
        assert!(after.iter().all(|h| !h.locked));
        assert!(after.iter().all(|h| h.x >= cfg.margin));
        assert!(after.iter().all(|h| h.right() <= cfg.arena_width - cfg.margin));
    }

    #[test]
    fn test_adjacent_locked_spikes() {
        let mut rng = Pcg32::seed_from_u64(8);
        let cfg = config();
        let mut a = Hazard::new(200.0, 40.0, 100.0);
        let mut b = Hazard::new(240.0, 40.0, 50.0);
        a.locked = true;
        b.locked = true;

        // Deliberately out of order
        let after = rebuild_preserving_locked(&[b, a], &cfg, &mut rng);
        let locked: Vec<_> = after.iter().filter(|h| h.locked).copied().collect();
        assert_eq!(locked, vec![a, b]);
        assert!(is_non_overlapping(&after));
    }

    #[test]
    fn test_reroll_only_touches_unlocked_heights() {
        let mut rng = Pcg32::seed_from_u64(9);
        let cfg = config();
        let mut hazards = build_full_layout(&cfg, &mut rng);
        hazards[0].locked = true;
        let before = hazards.clone();

        reroll_heights(&mut hazards, &cfg, &mut rng);

        assert_eq!(hazards[0], before[0]);
        for (a, b) in before.iter().zip(&hazards) {
            assert_eq!((a.x, a.w, a.locked), (b.x, b.w, b.locked));
            assert!(b.h >= cfg.height_floor);
        }
        assert!(before.iter().zip(&hazards).skip(1).any(|(a, b)| a.h != b.h));
    }

    #[test]
    fn test_reroll_applies_height_floor() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut cfg = config();
        cfg.height = FloatRange::new(0.0, 5.0);
        cfg.jitter = FloatRange::new(0.0, 0.0);
        let mut hazards = vec![Hazard::new(8.0, 30.0, 100.0); 4];
        reroll_heights(&mut hazards, &cfg, &mut rng);
        assert!(hazards.iter().all(|h| h.h == cfg.height_floor));
    }

    #[test]
    fn test_reroll_with_degenerate_height_range_is_noop() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut cfg = config();
        cfg.height = FloatRange::new(10.0, 1.0);
        let mut hazards = vec![Hazard::new(8.0, 30.0, 100.0)];
        reroll_heights(&mut hazards, &cfg, &mut rng);
        assert_eq!(hazards[0].h, 100.0);
    }

    #[test]
    fn test_toggle_lock_inside_and_outside() {
        let mut hazards = vec![
            Hazard::new(8.0, 40.0, 100.0),
            Hazard::new(60.0, 40.0, 100.0),
            Hazard::new(120.0, 40.0, 100.0),
        ];

        assert_eq!(toggle_lock(&mut hazards, Vec2::new(80.0, 20.0)), Some(1));
        let flags: Vec<_> = hazards.iter().map(|h| h.locked).collect();
        assert_eq!(flags, vec![false, true, false]);

        let before = hazards.clone();
        assert_eq!(toggle_lock(&mut hazards, Vec2::new(54.0, 5.0)), None);
        assert_eq!(toggle_lock(&mut hazards, Vec2::new(80.0, 200.0)), None);
        assert_eq!(hazards, before);

        // Toggling again unlocks
        toggle_lock(&mut hazards, Vec2::new(80.0, 20.0));
        assert!(hazards.iter().all(|h| !h.locked));
    }

    #[test]
    fn test_toggle_lock_prefers_last_on_overlap() {
        let mut hazards = vec![Hazard::new(10.0, 40.0, 100.0), Hazard::new(20.0, 40.0, 100.0)];
        assert_eq!(toggle_lock(&mut hazards, Vec2::new(35.0, 10.0)), Some(1));
        assert!(!hazards[0].locked);
        assert!(hazards[1].locked);
    }

    #[test]
    fn test_unlock_all() {
        let mut hazards = vec![Hazard::new(8.0, 40.0, 100.0); 3];
        hazards[1].locked = true;
        hazards[2].locked = true;
        let layout: Vec<_> = hazards.iter().map(|h| (h.x, h.w, h.h)).collect();

        unlock_all(&mut hazards);

        assert!(hazards.iter().all(|h| !h.locked));
        let after: Vec<_> = hazards.iter().map(|h| (h.x, h.w, h.h)).collect();
        assert_eq!(layout, after);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let cfg = config();
        let a = build_full_layout(&cfg, &mut Pcg32::seed_from_u64(42));
        let b = build_full_layout(&cfg, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_full_layout_disjoint(seed in any::<u64>()) {
            let hazards = build_full_layout(&config(), &mut Pcg32::seed_from_u64(seed));
            prop_assert!(is_non_overlapping(&hazards));
            prop_assert!(pairwise_disjoint(&hazards));
            prop_assert!(hazards.iter().all(|h| !h.locked));
        }

        #[test]
        fn prop_rebuild_preserves_locked(seed in any::<u64>(), mask in any::<u64>()) {
            let cfg = config();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut hazards = build_full_layout(&cfg, &mut rng);
            for (i, h) in hazards.iter_mut().enumerate() {
                h.locked = mask & (1 << (i % 64)) != 0;
            }
            let locked_before: Vec<Hazard> = hazards.iter().filter(|h| h.locked).copied().collect();

            let after = rebuild_preserving_locked(&hazards, &cfg, &mut rng);
            let locked_after: Vec<Hazard> = after.iter().filter(|h| h.locked).copied().collect();

            prop_assert_eq!(locked_before, locked_after);
            prop_assert!(is_non_overlapping(&after));
            prop_assert!(pairwise_disjoint(&after));
        }

        #[test]
        fn prop_reroll_keeps_layout(seed in any::<u64>(), mask in any::<u64>()) {
            let cfg = config();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut hazards = build_full_layout(&cfg, &mut rng);
            for (i, h) in hazards.iter_mut().enumerate() {
                h.locked = mask & (1 << (i % 64)) != 0;
            }
            let before = hazards.clone();

            reroll_heights(&mut hazards, &cfg, &mut rng);

            for (a, b) in before.iter().zip(&hazards) {
                prop_assert_eq!((a.x, a.w, a.locked), (b.x, b.w, b.locked));
                prop_assert!(b.h >= cfg.height_floor);
                if a.locked {
                    prop_assert_eq!(a.h, b.h);
                }
            }
        }
    }
}
