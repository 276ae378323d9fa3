//! Building state machine shared by every building variant.
//!
//! A [`Building`] pairs a [`BuildingCore`] (ownership, level, garrison,
//! upgrade lifecycle, selection) with a [`BuildingVariant`] holding the
//! variant-specific state. Variants plug into the shared machinery through the
//! [`BuildingBehavior`] trait:
//!
//! - `on_update`: per-tick bookkeeping (cooldown decay, target scan)
//! - `is_active`: activation predicate gating the action
//! - `action`: the variant's periodic action (produce / fire)
//! - optional hooks: `on_conquered`, `on_defended`, `on_reinforced`, `on_upgrade`
//!
//! # States
//!
//! ```text
//! neutral-idle --conquest--> owned-*
//! owned-idle <--activation--> owned-active
//! owned-idle/active --start_upgrade--> owned-upgrading --timer--> owned-idle/active
//! ```
//!
//! Buildings are never destroyed. Conquest reassigns team, level and garrison
//! in place so ids held by troops and by the UI stay valid.
//!
//! # Example
//!
//! ```
//! use rampart_core::building::Building;
//! use rampart_core::ids::BuildingId;
//! use rampart_core::types::{BuildingLevel, Position, Team, TroopArrivalOutcome};
//!
//! let mut barrack = Building::barrack(
//!     BuildingId::new(0),
//!     Position::new(10.0, 20.0),
//!     Team::Blue,
//!     10,
//!     BuildingLevel::MIN,
//! );
//!
//! let outcome = barrack.on_troop_arrival(Team::Red, 14);
//! assert_eq!(outcome, TroopArrivalOutcome::Conquered);
//! assert_eq!(barrack.team(), Team::Red);
//! assert_eq!(barrack.soldier_count(), 4);
//! ```

pub mod barrack;
pub mod tower;

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{self, MAX_SOLDIERS, UPGRADE_DURATION};
use crate::ids::{BuildingId, TroopId};
use crate::troop::Troop;
use crate::types::{BuildingKind, BuildingLevel, Position, Team, TroopArrivalOutcome};

pub use barrack::BarrackState;
pub use tower::TowerState;

// =============================================================================
// Flags
// =============================================================================

bitflags! {
    /// Status flags of a building.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct BuildingFlags: u8 {
        /// An upgrade is in progress; the variant action is suspended.
        const UPGRADING = 1 << 0;
        /// The building may start an upgrade (recomputed every tick).
        const CAN_UPGRADE = 1 << 1;
        /// Selected by the local player as a troop origin.
        const SELECTED = 1 << 2;
        /// The variant's activation predicate held on the last update.
        const ACTIVE = 1 << 3;
    }
}

// =============================================================================
// Behavior Interface
// =============================================================================

/// Read-only context handed to buildings during their update.
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    /// Elapsed time since the previous tick, in seconds.
    pub dt: f32,
    /// Every troop on the battlefield at the start of the building pass.
    pub troops: &'a BTreeMap<TroopId, Troop>,
}

/// Output of a tower action: fire one projectile at `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireOrder {
    /// Troop the projectile homes on.
    pub target: TroopId,
}

/// What happened to a building during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildingTick {
    /// Projectile the battlefield must spawn on behalf of this building.
    pub fire: Option<FireOrder>,
    /// New level, when an upgrade completed this tick.
    pub upgraded: Option<BuildingLevel>,
}

/// Variant-specific behavior plugged into the shared building machinery.
///
/// The shared per-tick algorithm in [`Building::update`] calls these in a
/// fixed order; implementors never touch the upgrade lifecycle or ownership.
pub trait BuildingBehavior {
    /// Per-tick bookkeeping, run first on every update (even while upgrading).
    fn on_update(&mut self, core: &BuildingCore, ctx: &UpdateContext<'_>);

    /// Activation predicate, evaluated right after `on_update`.
    fn is_active(&self, core: &BuildingCore) -> bool;

    /// The periodic action. Only called while active and not upgrading.
    fn action(&mut self, core: &mut BuildingCore, dt: f32) -> Option<FireOrder>;

    /// Called after the building changed hands. `core` already holds the new
    /// team, level 0 and the surviving attackers.
    fn on_conquered(&mut self, _core: &BuildingCore) {}

    /// Called after an enemy attack was repelled.
    fn on_defended(&mut self, _core: &BuildingCore) {}

    /// Called after allied soldiers joined the garrison.
    fn on_reinforced(&mut self, _core: &BuildingCore) {}

    /// Called after an upgrade completed. `core` already holds the new level.
    fn on_upgrade(&mut self, _core: &BuildingCore) {}
}

/// Variant-specific state of a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuildingVariant {
    /// Soldier production state.
    Barrack(BarrackState),
    /// Targeting and attack cooldown state.
    Tower(TowerState),
}

impl BuildingVariant {
    /// Returns the type tag matching this variant.
    #[must_use]
    pub const fn kind(&self) -> BuildingKind {
        match self {
            Self::Barrack(_) => BuildingKind::Barrack,
            Self::Tower(_) => BuildingKind::Tower,
        }
    }

    fn behavior(&self) -> &dyn BuildingBehavior {
        match self {
            Self::Barrack(state) => state,
            Self::Tower(state) => state,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn BuildingBehavior {
        match self {
            Self::Barrack(state) => state,
            Self::Tower(state) => state,
        }
    }
}

// =============================================================================
// Building Core
// =============================================================================

/// State shared by every building variant.
///
/// Fields are private: ownership, garrison and upgrade state only change
/// through [`Building`]'s methods, which keep the invariants below.
///
/// # Invariants
///
/// - A neutral building is never upgrading and never `CAN_UPGRADE`.
/// - A level 3 building is never `CAN_UPGRADE`.
/// - `upgrade_timer` is zero whenever `UPGRADING` is clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingCore {
    position: Position,
    team: Team,
    level: BuildingLevel,
    soldier_count: u32,
    flags: BuildingFlags,
    upgrade_timer: f32,
}

impl BuildingCore {
    fn new(position: Position, team: Team, soldier_count: u32, level: BuildingLevel) -> Self {
        Self {
            position,
            team,
            level,
            soldier_count,
            flags: BuildingFlags::empty(),
            upgrade_timer: 0.0,
        }
    }

    /// Fixed world position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Owning team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Current upgrade tier.
    #[must_use]
    pub const fn level(&self) -> BuildingLevel {
        self.level
    }

    /// Current garrison.
    #[must_use]
    pub const fn soldier_count(&self) -> u32 {
        self.soldier_count
    }

    /// Current status flags.
    #[must_use]
    pub const fn flags(&self) -> BuildingFlags {
        self.flags
    }

    /// Adds one soldier unless the production ceiling is reached.
    ///
    /// Returns `true` if a soldier was added.
    pub(crate) fn produce_soldier(&mut self) -> bool {
        if self.soldier_count < MAX_SOLDIERS {
            self.soldier_count += 1;
            true
        } else {
            false
        }
    }

    fn clear_upgrade(&mut self) {
        self.flags
            .remove(BuildingFlags::UPGRADING | BuildingFlags::CAN_UPGRADE);
        self.upgrade_timer = 0.0;
    }

    /// Recomputes `CAN_UPGRADE` from team, level and garrison.
    fn evaluate_upgrade_option(&mut self) {
        let can_upgrade = !self.team.is_neutral()
            && !self.flags.contains(BuildingFlags::UPGRADING)
            && constants::upgrade_threshold(self.level)
                .is_some_and(|threshold| self.soldier_count >= threshold);
        self.flags.set(BuildingFlags::CAN_UPGRADE, can_upgrade);
    }
}

// =============================================================================
// Building
// =============================================================================

/// A building on the battlefield: shared core plus variant state.
///
/// # Per-tick algorithm
///
/// 1. Run the variant's `on_update` hook and evaluate its activation predicate.
/// 2. Recompute `CAN_UPGRADE`.
/// 3. If upgrading, count the upgrade timer down and finish the level-up when
///    it expires. The variant action is skipped for the whole tick.
/// 4. Otherwise, if active, run the variant action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    id: BuildingId,
    kind: BuildingKind,
    core: BuildingCore,
    variant: BuildingVariant,
}

impl Building {
    /// Creates a building from its variant state.
    #[must_use]
    pub fn new(
        id: BuildingId,
        position: Position,
        team: Team,
        soldier_count: u32,
        level: BuildingLevel,
        variant: BuildingVariant,
    ) -> Self {
        Self {
            id,
            kind: variant.kind(),
            core: BuildingCore::new(position, team, soldier_count, level),
            variant,
        }
    }

    /// Creates a barrack.
    #[must_use]
    pub fn barrack(
        id: BuildingId,
        position: Position,
        team: Team,
        soldier_count: u32,
        level: BuildingLevel,
    ) -> Self {
        Self::new(
            id,
            position,
            team,
            soldier_count,
            level,
            BuildingVariant::Barrack(BarrackState::new(level)),
        )
    }

    /// Creates a tower.
    #[must_use]
    pub fn tower(
        id: BuildingId,
        position: Position,
        team: Team,
        soldier_count: u32,
        level: BuildingLevel,
    ) -> Self {
        Self::new(
            id,
            position,
            team,
            soldier_count,
            level,
            BuildingVariant::Tower(TowerState::new(level)),
        )
    }

    /// Creates a building of the given kind.
    #[must_use]
    pub fn of_kind(
        kind: BuildingKind,
        id: BuildingId,
        position: Position,
        team: Team,
        soldier_count: u32,
        level: BuildingLevel,
    ) -> Self {
        match kind {
            BuildingKind::Barrack => Self::barrack(id, position, team, soldier_count, level),
            BuildingKind::Tower => Self::tower(id, position, team, soldier_count, level),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Unique id.
    #[must_use]
    pub const fn id(&self) -> BuildingId {
        self.id
    }

    /// Immutable type tag.
    #[must_use]
    pub const fn kind(&self) -> BuildingKind {
        self.kind
    }

    /// Shared state.
    #[must_use]
    pub const fn core(&self) -> &BuildingCore {
        &self.core
    }

    /// Variant-specific state.
    #[must_use]
    pub const fn variant(&self) -> &BuildingVariant {
        &self.variant
    }

    /// Fixed world position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.core.position
    }

    /// Owning team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.core.team
    }

    /// Current upgrade tier.
    #[must_use]
    pub const fn level(&self) -> BuildingLevel {
        self.core.level
    }

    /// Current garrison.
    #[must_use]
    pub const fn soldier_count(&self) -> u32 {
        self.core.soldier_count
    }

    /// Current status flags.
    #[must_use]
    pub const fn flags(&self) -> BuildingFlags {
        self.core.flags
    }

    /// Whether an upgrade is in progress.
    #[must_use]
    pub const fn is_upgrading(&self) -> bool {
        self.core.flags.contains(BuildingFlags::UPGRADING)
    }

    /// Whether an upgrade may be started (as of the last update).
    #[must_use]
    pub const fn can_upgrade(&self) -> bool {
        self.core.flags.contains(BuildingFlags::CAN_UPGRADE)
    }

    /// Whether the local player selected this building.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.core.flags.contains(BuildingFlags::SELECTED)
    }

    /// Whether the activation predicate held on the last update.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.core.flags.contains(BuildingFlags::ACTIVE)
    }

    /// Seconds left on the running upgrade, zero when idle.
    #[must_use]
    pub const fn upgrade_remaining(&self) -> f32 {
        self.core.upgrade_timer
    }

    /// Barrack state, if this is a barrack.
    #[must_use]
    pub const fn as_barrack(&self) -> Option<&BarrackState> {
        match &self.variant {
            BuildingVariant::Barrack(state) => Some(state),
            BuildingVariant::Tower(_) => None,
        }
    }

    /// Tower state, if this is a tower.
    #[must_use]
    pub const fn as_tower(&self) -> Option<&TowerState> {
        match &self.variant {
            BuildingVariant::Tower(state) => Some(state),
            BuildingVariant::Barrack(_) => None,
        }
    }

    /// Attack range, if this is a tower.
    #[must_use]
    pub fn attack_range(&self) -> Option<f32> {
        self.as_tower().map(TowerState::attack_range)
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advances the building by one tick.
    ///
    /// See the type-level docs for the algorithm. The returned
    /// [`BuildingTick`] carries a fire order for the battlefield to turn into a
    /// projectile, and the new level when an upgrade finished.
    pub fn update(&mut self, ctx: &UpdateContext<'_>) -> BuildingTick {
        let mut tick = BuildingTick::default();

        self.variant.behavior_mut().on_update(&self.core, ctx);
        let active = self.variant.behavior().is_active(&self.core);
        self.core.flags.set(BuildingFlags::ACTIVE, active);

        self.core.evaluate_upgrade_option();

        if self.is_upgrading() {
            self.core.upgrade_timer -= ctx.dt;
            if self.core.upgrade_timer <= 0.0 {
                tick.upgraded = Some(self.finish_upgrade());
            }
            return tick;
        }

        if active {
            tick.fire = self.variant.behavior_mut().action(&mut self.core, ctx.dt);
        }
        tick
    }

    fn finish_upgrade(&mut self) -> BuildingLevel {
        debug_assert!(!self.core.level.is_max(), "upgrade running at max level");
        if let Some(next) = self.core.level.next() {
            self.core.level = next;
        }
        self.core.clear_upgrade();
        self.variant.behavior_mut().on_upgrade(&self.core);
        info!(
            building = %self.id,
            team = %self.core.team,
            new_level = %self.core.level,
            "Upgrade completed"
        );
        self.core.level
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Starts an upgrade on behalf of `team`.
    ///
    /// No-op unless `team` owns the building, `CAN_UPGRADE` is set, the level is
    /// below 3, no upgrade is running and the garrison still covers the cost.
    /// The cost is deducted immediately.
    ///
    /// Returns `true` if the upgrade started.
    pub fn start_upgrade(&mut self, team: Team) -> bool {
        if !self.is_selectable_by(team) || !self.can_upgrade() || self.is_upgrading() {
            return false;
        }
        let Some(cost) = constants::upgrade_cost(self.core.level) else {
            return false;
        };
        if self.core.soldier_count < cost {
            return false;
        }

        self.core.soldier_count -= cost;
        self.core.flags.insert(BuildingFlags::UPGRADING);
        self.core.flags.remove(BuildingFlags::CAN_UPGRADE);
        self.core.upgrade_timer = UPGRADE_DURATION;
        info!(
            building = %self.id,
            team = %team,
            from_level = %self.core.level,
            cost,
            "Upgrade started"
        );
        true
    }

    /// Resolves a troop arriving at this building.
    ///
    /// - Same team: the garrison grows by `attacking_soldiers`; ownership, level
    ///   and upgrade state are untouched.
    /// - Enemy, garrison ≥ attackers: the garrison shrinks, upgrade is cancelled.
    /// - Enemy, attackers > garrison: the attacker takes the building with the
    ///   surplus soldiers at level 0, upgrade and selection are cleared.
    pub fn on_troop_arrival(
        &mut self,
        attacking_team: Team,
        attacking_soldiers: u32,
    ) -> TroopArrivalOutcome {
        if self.core.team == attacking_team {
            self.core.soldier_count = self.core.soldier_count.saturating_add(attacking_soldiers);
            self.variant.behavior_mut().on_reinforced(&self.core);
            return TroopArrivalOutcome::Reinforced;
        }

        if let Some(survivors) = self.core.soldier_count.checked_sub(attacking_soldiers) {
            self.core.soldier_count = survivors;
            self.core.clear_upgrade();
            self.variant.behavior_mut().on_defended(&self.core);
            debug!(
                building = %self.id,
                attacker = %attacking_team,
                survivors,
                "Attack repelled"
            );
            return TroopArrivalOutcome::Defended;
        }

        let previous = self.core.team;
        self.core.team = attacking_team;
        self.core.soldier_count = attacking_soldiers - self.core.soldier_count;
        self.core.level = BuildingLevel::MIN;
        self.core.clear_upgrade();
        self.core.flags.remove(BuildingFlags::SELECTED);
        self.variant.behavior_mut().on_conquered(&self.core);
        info!(
            building = %self.id,
            kind = %self.kind,
            from = %previous,
            to = %attacking_team,
            soldiers = self.core.soldier_count,
            "Building conquered"
        );
        TroopArrivalOutcome::Conquered
    }

    /// Removes up to `amount` soldiers from the garrison, returning how many
    /// were actually removed.
    pub(crate) fn debit_soldiers(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.core.soldier_count);
        self.core.soldier_count -= taken;
        taken
    }

    /// Whether `team` may select, deselect or upgrade this building.
    #[must_use]
    pub fn is_selectable_by(&self, team: Team) -> bool {
        !self.core.team.is_neutral() && self.core.team == team
    }

    /// Marks the building selected. No-op unless `team` owns it.
    pub fn select(&mut self, team: Team) {
        if self.is_selectable_by(team) {
            self.core.flags.insert(BuildingFlags::SELECTED);
        }
    }

    /// Clears the selection. No-op unless `team` owns it.
    pub fn deselect(&mut self, team: Team) {
        if self.is_selectable_by(team) {
            self.core.flags.remove(BuildingFlags::SELECTED);
        }
    }

    /// Flips the selection. No-op unless `team` owns it.
    pub fn toggle_selection(&mut self, team: Team) {
        if self.is_selectable_by(team) {
            self.core.flags.toggle(BuildingFlags::SELECTED);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
