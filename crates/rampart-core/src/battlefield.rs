//! The battlefield: every entity of one match and the per-tick update loop.
//!
//! The battlefield owns all buildings, troops, projectiles and players in
//! `BTreeMap`s keyed by id, so every pass iterates in creation order and the
//! simulation is fully deterministic. Callers only ever hold ids; entities are
//! reached through the accessors, and mutated only through the command
//! methods below.
//!
//! # Tick
//!
//! [`Battlefield::update`] runs these passes in order:
//!
//! 1. **Buildings**: every building updates against the current troop list.
//!    Fire orders become projectiles, completed upgrades become events.
//! 2. **Troops**: every troop walks; arrivals resolve combat at the target.
//! 3. **Projectiles**: every projectile (including the ones fired this tick)
//!    homes on its target; hits remove one soldier.
//! 4. **Events**: arrivals of troops that reached their target alive, then
//!    troops that died in transit.
//! 5. **Removal and tally**: finished troops and projectiles are removed, and
//!    the per-team tally is recomputed from scratch from the live buildings
//!    and troops.
//!
//! # Example
//!
//! ```
//! use rampart_core::battlefield::Battlefield;
//! use rampart_core::config::BuildingPlacement;
//! use rampart_core::types::Team;
//!
//! let mut field = Battlefield::new();
//! let home = field.add_building(&BuildingPlacement::barrack(0.0, 0.0, Team::Blue, 20));
//! let camp = field.add_building(&BuildingPlacement::barrack(60.0, 0.0, Team::Neutral, 2));
//! let player = field.add_player("ada", Team::Blue).unwrap();
//!
//! let troop = field.send_troops(home, camp, player);
//! assert!(troop.is_some());
//! assert_eq!(field.get_building(home).unwrap().soldier_count(), 15);
//!
//! let mut arrivals = 0;
//! for _ in 0..8 {
//!     arrivals += field.update(0.25).iter().filter(|e| e.is_arrival()).count();
//! }
//! assert_eq!(arrivals, 1);
//! assert_eq!(field.get_building(camp).unwrap().team(), Team::Blue);
//! assert_eq!(field.get_building(camp).unwrap().soldier_count(), 3);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::building::{Building, UpdateContext};
use crate::config::{BuildingPlacement, ScenarioConfig};
use crate::error::SetupError;
use crate::event::BattleEvent;
use crate::ids::{BuildingId, PlayerId, ProjectileId, TroopId};
use crate::player::Player;
use crate::projectile::Projectile;
use crate::troop::{Troop, TroopStatus};
use crate::types::{BuildingKind, Team};

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only copy of the full battlefield state, for rendering or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattlefieldSnapshot {
    /// Number of updates run so far.
    pub tick: u64,
    /// Buildings in id order.
    pub buildings: Vec<Building>,
    /// Troops in transit, in id order.
    pub troops: Vec<Troop>,
    /// Projectiles in flight, in id order.
    pub projectiles: Vec<Projectile>,
    /// Registered players, in id order.
    pub players: Vec<Player>,
    /// Soldiers per team after the last update.
    pub soldiers_per_team: BTreeMap<Team, u32>,
}

// =============================================================================
// Battlefield
// =============================================================================

/// All entities of one match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Battlefield {
    buildings: BTreeMap<BuildingId, Building>,
    troops: BTreeMap<TroopId, Troop>,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    players: BTreeMap<PlayerId, Player>,
    soldiers_per_team: BTreeMap<Team, u32>,
    next_building: BuildingId,
    next_troop: TroopId,
    next_projectile: ProjectileId,
    next_player: PlayerId,
    tick: u64,
}

impl Battlefield {
    /// Creates an empty battlefield.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a battlefield with every building of `scenario`, in order.
    #[must_use]
    pub fn from_scenario(scenario: &ScenarioConfig) -> Self {
        let mut field = Self::new();
        for placement in &scenario.buildings {
            field.add_building(placement);
        }
        field
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Adds a building and returns its id. The tally is refreshed right away
    /// so the starting garrison counts before the first update.
    pub fn add_building(&mut self, placement: &BuildingPlacement) -> BuildingId {
        let id = self.next_building.allocate();
        let building = Building::of_kind(
            placement.kind,
            id,
            placement.position(),
            placement.team,
            placement.initial_soldiers,
            placement.level(),
        );
        debug!(
            building = %id,
            kind = %placement.kind,
            team = %placement.team,
            soldiers = placement.initial_soldiers,
            "Building placed"
        );
        self.buildings.insert(id, building);
        self.recompute_tally();
        id
    }

    /// Registers a player.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NeutralPlayer`] if `team` is neutral.
    pub fn add_player(&mut self, name: &str, team: Team) -> Result<PlayerId, SetupError> {
        if team.is_neutral() {
            return Err(SetupError::NeutralPlayer(name.to_owned()));
        }
        let id = self.next_player.allocate();
        self.players.insert(id, Player::new(id, name, team));
        debug!(player = %id, name, team = %team, "Player joined");
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advances the whole battlefield by `dt` seconds and returns what
    /// happened. See the module docs for the pass order.
    ///
    /// # Panics
    ///
    /// Panics if a troop targets a building that does not exist, which
    /// [`Battlefield::send_troops`] never allows.
    pub fn update(&mut self, dt: f32) -> Vec<BattleEvent> {
        let mut events = Vec::new();

        self.update_buildings(dt, &mut events);

        let mut finished: BTreeSet<TroopId> = BTreeSet::new();
        let mut arrivals = Vec::new();
        for troop in self.troops.values_mut() {
            let Some(target) = self.buildings.get_mut(&troop.target()) else {
                panic!("{} targets unknown {}", troop.id(), troop.target());
            };
            match troop.update(dt, target) {
                TroopStatus::InTransit => {}
                TroopStatus::Arrived(outcome) => {
                    finished.insert(troop.id());
                    arrivals.push(BattleEvent::TroopArrived {
                        troop: troop.id(),
                        from: troop.origin(),
                        to: troop.target(),
                        team: troop.team(),
                        outcome,
                    });
                }
                TroopStatus::Destroyed => {
                    finished.insert(troop.id());
                    events.push(BattleEvent::TroopDestroyed {
                        troop: troop.id(),
                        team: troop.team(),
                    });
                }
            }
        }

        let mut resolved = Vec::new();
        for projectile in self.projectiles.values_mut() {
            let target_id = projectile.target();
            let target = if finished.contains(&target_id) {
                None
            } else {
                self.troops.get_mut(&target_id)
            };
            let status = projectile.update(dt, target);
            if status.is_resolved() {
                resolved.push(projectile.id());
                events.push(BattleEvent::ProjectileResolved {
                    projectile: projectile.id(),
                    status,
                });
            }
        }

        events.append(&mut arrivals);
        for troop in self.troops.values() {
            if !troop.is_alive() && finished.insert(troop.id()) {
                debug!(troop = %troop.id(), team = %troop.team(), "Troop destroyed in transit");
                events.push(BattleEvent::TroopDestroyed {
                    troop: troop.id(),
                    team: troop.team(),
                });
            }
        }

        for id in &finished {
            self.troops.remove(id);
        }
        for id in &resolved {
            self.projectiles.remove(id);
        }
        self.recompute_tally();
        self.tick += 1;

        trace!(
            tick = self.tick,
            troops = self.troops.len(),
            projectiles = self.projectiles.len(),
            events = events.len(),
            "Battlefield updated"
        );
        events
    }

    /// Building pass: updates every building, spawns projectiles for fire
    /// orders and records completed upgrades.
    fn update_buildings(&mut self, dt: f32, events: &mut Vec<BattleEvent>) {
        let ctx = UpdateContext {
            dt,
            troops: &self.troops,
        };
        for building in self.buildings.values_mut() {
            let tick = building.update(&ctx);
            if let Some(level) = tick.upgraded {
                events.push(BattleEvent::UpgradeCompleted {
                    building: building.id(),
                    level,
                });
            }
            let (Some(order), Some(range)) = (tick.fire, building.attack_range()) else {
                continue;
            };
            let id = self.next_projectile.allocate();
            self.projectiles.insert(
                id,
                Projectile::launch(
                    id,
                    building.team(),
                    building.id(),
                    building.position(),
                    range,
                    order.target,
                ),
            );
            events.push(BattleEvent::ProjectileFired {
                projectile: id,
                tower: building.id(),
                target: order.target,
            });
        }
    }

    /// Rebuilds the tally from live buildings and troops. Every team seen
    /// before keeps an entry, at zero if it has nothing left.
    fn recompute_tally(&mut self) {
        let mut tally: BTreeMap<Team, u32> =
            self.soldiers_per_team.keys().map(|team| (*team, 0)).collect();
        let garrisons = self
            .buildings
            .values()
            .map(|building| (building.team(), building.soldier_count()));
        let in_transit = self.troops.values().map(|troop| (troop.team(), troop.soldiers()));
        for (team, soldiers) in garrisons.chain(in_transit) {
            let total = tally.entry(team).or_insert(0);
            *total = total.saturating_add(soldiers);
        }
        self.soldiers_per_team = tally;
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Selects `building` on behalf of `player`. No-op for unknown ids and
    /// buildings the player's team does not own.
    ///
    /// Returns whether the building is selected afterwards.
    pub fn select_building_by_id(&mut self, building: BuildingId, player: PlayerId) -> bool {
        let Some(team) = self.players.get(&player).map(Player::team) else {
            return false;
        };
        let Some(building) = self.buildings.get_mut(&building) else {
            return false;
        };
        building.select(team);
        building.is_selected()
    }

    /// Clears every selection owned by `player`'s team.
    pub fn deselect_all_by_player(&mut self, player: PlayerId) {
        let Some(team) = self.players.get(&player).map(Player::team) else {
            return;
        };
        for building in self.buildings.values_mut() {
            building.deselect(team);
        }
    }

    /// Starts an upgrade of `building` on behalf of `player`.
    ///
    /// Returns `true` if the upgrade started.
    pub fn start_upgrade(&mut self, building: BuildingId, player: PlayerId) -> bool {
        let Some(team) = self.players.get(&player).map(Player::team) else {
            return false;
        };
        self.buildings
            .get_mut(&building)
            .is_some_and(|building| building.start_upgrade(team))
    }

    /// Sends troops from `from` to `to` on behalf of `player`.
    ///
    /// The troop carries `floor(garrison × attack ratio)` soldiers, debited
    /// from `from` immediately. No-op when the player or either building is
    /// unknown, when `from` is not owned by the player's team, or when the
    /// computed troop would be empty.
    ///
    /// Returns the new troop's id.
    pub fn send_troops(
        &mut self,
        from: BuildingId,
        to: BuildingId,
        player: PlayerId,
    ) -> Option<TroopId> {
        let player = self.players.get(&player)?;
        let target = self.buildings.get(&to).map(|b| (b.id(), b.position()))?;
        let origin = self.buildings.get_mut(&from)?;
        if origin.team() != player.team() {
            return None;
        }
        let soldiers = player.troops_to_send(origin.soldier_count());
        if soldiers == 0 {
            return None;
        }

        let id = self.next_troop.allocate();
        let troop = Troop::dispatch(id, origin, target, soldiers);
        self.troops.insert(id, troop);
        Some(id)
    }

    // -------------------------------------------------------------------------
    // Lookups and accessors
    // -------------------------------------------------------------------------

    /// Looks up a building.
    #[must_use]
    pub fn get_building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    /// Looks up a building, only if it has the given kind.
    #[must_use]
    pub fn get_building_of_kind(&self, id: BuildingId, kind: BuildingKind) -> Option<&Building> {
        self.get_building(id).filter(|building| building.kind() == kind)
    }

    /// Looks up a troop.
    #[must_use]
    pub fn get_troop(&self, id: TroopId) -> Option<&Troop> {
        self.troops.get(&id)
    }

    /// Looks up a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Buildings in id order.
    pub fn buildings(&self) -> impl Iterator<Item = &Building> + '_ {
        self.buildings.values()
    }

    /// Troops in transit, in id order.
    pub fn troops(&self) -> impl Iterator<Item = &Troop> + '_ {
        self.troops.values()
    }

    /// Projectiles in flight, in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.projectiles.values()
    }

    /// Players in id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.values()
    }

    /// Soldiers per team after the last update (or setup change).
    #[must_use]
    pub const fn soldiers_per_team(&self) -> &BTreeMap<Team, u32> {
        &self.soldiers_per_team
    }

    /// Number of updates run so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Copies the full state for rendering or export.
    #[must_use]
    pub fn snapshot(&self) -> BattlefieldSnapshot {
        BattlefieldSnapshot {
            tick: self.tick,
            buildings: self.buildings.values().cloned().collect(),
            troops: self.troops.values().cloned().collect(),
            projectiles: self.projectiles.values().cloned().collect(),
            players: self.players.values().cloned().collect(),
            soldiers_per_team: self.soldiers_per_team.clone(),
        }
    }

    /// Places a prebuilt troop, bypassing dispatch.
    #[cfg(test)]
    pub(crate) fn insert_troop(&mut self, troop: Troop) {
        while self.next_troop <= troop.id() {
            self.next_troop.allocate();
        }
        self.troops.insert(troop.id(), troop);
        self.recompute_tally();
    }
}

// =============================================================================
// Tests
// =============================================================================
