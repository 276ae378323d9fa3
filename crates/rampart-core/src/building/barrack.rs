//! Barrack variant: periodic soldier production.
//!
//! A barrack is active whenever it has an owner. While active and not
//! upgrading, each tick either produces a soldier (when the cooldown has run
//! out) or counts the cooldown down. Production stops at
//! [`MAX_SOLDIERS`](crate::constants::MAX_SOLDIERS).

use serde::{Deserialize, Serialize};

use super::{BuildingBehavior, BuildingCore, FireOrder, UpdateContext};
use crate::constants::production_interval;
use crate::types::BuildingLevel;

/// Production state of a barrack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrackState {
    /// Seconds until the next soldier is produced.
    production_cooldown: f32,
}

impl BarrackState {
    /// Creates the state for a barrack at `level`, with a full cooldown.
    #[must_use]
    pub fn new(level: BuildingLevel) -> Self {
        Self {
            production_cooldown: production_interval(level),
        }
    }

    /// Seconds until the next soldier.
    #[must_use]
    pub const fn production_cooldown(&self) -> f32 {
        self.production_cooldown
    }
}

impl BuildingBehavior for BarrackState {
    fn on_update(&mut self, _core: &BuildingCore, _ctx: &UpdateContext<'_>) {}

    fn is_active(&self, core: &BuildingCore) -> bool {
        !core.team().is_neutral()
    }

    fn action(&mut self, core: &mut BuildingCore, dt: f32) -> Option<FireOrder> {
        if self.production_cooldown <= 0.0 {
            core.produce_soldier();
            self.production_cooldown = production_interval(core.level());
        } else {
            self.production_cooldown -= dt;
        }
        None
    }

    fn on_conquered(&mut self, core: &BuildingCore) {
        self.production_cooldown = production_interval(core.level());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::building::Building;
    use crate::constants::MAX_SOLDIERS;
    use crate::ids::BuildingId;
    use crate::types::{Position, Team};

    fn run(building: &mut Building, ticks: usize, dt: f32) {
        let troops = BTreeMap::new();
        for _ in 0..ticks {
            building.update(&UpdateContext { dt, troops: &troops });
        }
    }

    fn barrack(team: Team, soldiers: u32) -> Building {
        Building::barrack(
            BuildingId::new(0),
            Position::ZERO,
            team,
            soldiers,
            BuildingLevel::MIN,
        )
    }

    #[test]
    fn produces_one_soldier_per_interval() {
        // Level 0: 2 s interval. Four 0.5 s ticks drain the cooldown, the fifth
        // produces.
        let mut b = barrack(Team::Blue, 0);
        run(&mut b, 4, 0.5);
        assert_eq!(b.soldier_count(), 0);
        run(&mut b, 1, 0.5);
        assert_eq!(b.soldier_count(), 1);
        assert_eq!(
            b.as_barrack().map(BarrackState::production_cooldown),
            Some(production_interval(BuildingLevel::MIN))
        );
    }

    #[test]
    fn higher_levels_produce_faster() {
        let mut slow = barrack(Team::Blue, 0);
        let mut fast = Building::barrack(
            BuildingId::new(1),
            Position::ZERO,
            Team::Blue,
            0,
            BuildingLevel::try_from(2).unwrap(),
        );
        run(&mut slow, 40, 0.25);
        run(&mut fast, 40, 0.25);
        assert!(fast.soldier_count() > slow.soldier_count());
    }

    #[test]
    fn neutral_barrack_never_produces() {
        let mut b = barrack(Team::Neutral, 3);
        run(&mut b, 100, 0.5);
        assert_eq!(b.soldier_count(), 3);
        assert!(!b.is_active());
    }

    #[test]
    fn production_stops_at_ceiling() {
        let mut b = barrack(Team::Red, MAX_SOLDIERS - 1);
        run(&mut b, 50, 0.5);
        assert_eq!(b.soldier_count(), MAX_SOLDIERS);
    }

    #[test]
    fn reinforced_garrison_above_ceiling_is_kept() {
        let mut b = barrack(Team::Red, MAX_SOLDIERS);
        b.on_troop_arrival(Team::Red, 6);
        run(&mut b, 50, 0.5);
        assert_eq!(b.soldier_count(), MAX_SOLDIERS + 6);
    }

    #[test]
    fn conquest_restarts_cooldown() {
        let mut b = barrack(Team::Red, 0);
        run(&mut b, 3, 0.5);
        b.on_troop_arrival(Team::Blue, 2);
        assert_eq!(
            b.as_barrack().map(BarrackState::production_cooldown),
            Some(production_interval(BuildingLevel::MIN))
        );
        assert_eq!(b.team(), Team::Blue);
    }
}
