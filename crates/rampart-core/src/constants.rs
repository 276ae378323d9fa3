//! Simulation constants and tuning parameters.
//!
//! Per-level tables are indexed by [`BuildingLevel::index`]. All durations are
//! in seconds, all distances in world units.

use crate::types::BuildingLevel;

/// Default ticker rate (ticks per second).
pub const DEFAULT_TPS: u32 = 60;

// --- Buildings ---

/// Production ceiling: a barrack stops adding soldiers at this count.
pub const MAX_SOLDIERS: u32 = 64;

/// Time an upgrade takes, independent of level (300 frames at 60 TPS).
pub const UPGRADE_DURATION: f32 = 5.0;

/// Soldiers required to start an upgrade from each level. Level 3 is terminal.
const UPGRADE_THRESHOLDS: [Option<u32>; 4] = [Some(5), Some(35), Some(40), None];

/// Soldiers consumed when starting an upgrade from each level.
const UPGRADE_COSTS: [Option<u32>; 4] = [Some(5), Some(35), Some(40), None];

// --- Barracks ---

/// Seconds per produced soldier. Higher levels produce faster.
const PRODUCTION_INTERVALS: [f32; 4] = [2.0, 1.0, 0.5, 1.0 / 6.0];

// --- Towers ---

/// Attack radius per level.
const ATTACK_RANGES: [f32; 4] = [90.0, 120.0, 160.0, 210.0];

/// Seconds between shots per level.
const ATTACK_INTERVALS: [f32; 4] = [2.8, 2.5, 1.7, 1.1];

// --- Troops ---

/// Troop travel speed, chosen by the origin building's level at dispatch.
const TROOP_SPEEDS: [f32; 4] = [60.0, 70.0, 80.0, 90.0];

/// Fraction of a building's soldiers a player sends per command by default.
pub const DEFAULT_ATTACK_RATIO: f32 = 0.25;

// --- Projectiles ---

/// Projectile flight speed.
pub const PROJECTILE_SPEED: f32 = 240.0;

/// Maximum projectile travel, as a multiple of the firing tower's range.
pub const PROJECTILE_RANGE_FACTOR: f32 = 1.10;

/// Damage dealt by one projectile hit (soldiers removed from the troop).
pub const PROJECTILE_DAMAGE: u32 = 1;

// --- Lookups ---

/// Soldiers needed to upgrade from `level`, or `None` at level 3.
#[must_use]
pub const fn upgrade_threshold(level: BuildingLevel) -> Option<u32> {
    UPGRADE_THRESHOLDS[level.index()]
}

/// Soldiers consumed by an upgrade from `level`, or `None` at level 3.
#[must_use]
pub const fn upgrade_cost(level: BuildingLevel) -> Option<u32> {
    UPGRADE_COSTS[level.index()]
}

/// Barrack production interval at `level`.
#[must_use]
pub const fn production_interval(level: BuildingLevel) -> f32 {
    PRODUCTION_INTERVALS[level.index()]
}

/// Tower attack range at `level`.
#[must_use]
pub const fn attack_range(level: BuildingLevel) -> f32 {
    ATTACK_RANGES[level.index()]
}

/// Tower attack interval at `level`.
#[must_use]
pub const fn attack_interval(level: BuildingLevel) -> f32 {
    ATTACK_INTERVALS[level.index()]
}

/// Troop speed for troops dispatched from a building at `level`.
#[must_use]
pub const fn troop_speed(level: BuildingLevel) -> f32 {
    TROOP_SPEEDS[level.index()]
}

/// Level implied by a starting garrison: the lowest level whose upgrade
/// threshold exceeds `soldiers`, or level 3 when every threshold is met.
#[must_use]
pub fn level_for_soldiers(soldiers: u32) -> BuildingLevel {
    let mut level = BuildingLevel::MIN;
    while let Some(threshold) = upgrade_threshold(level) {
        if soldiers < threshold {
            return level;
        }
        match level.next() {
            Some(next) => level = next,
            None => break,
        }
    }
    level
}
