//! Match orchestration for the local player.
//!
//! A [`Game`] owns one [`Battlefield`] and the id of the local player. Each
//! tick it advances the battlefield, copies the fresh per-team tally,
//! evaluates victory or defeat, and notifies its observers. It also holds the
//! one outstanding "selected origin" used to build send-troops commands from
//! input intents.
//!
//! The game never stops the clock itself: once [`Game::result`] is terminal,
//! the driver (see [`Ticker`](crate::ticker::Ticker)) is expected to stop.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::battlefield::Battlefield;
use crate::config::ScenarioConfig;
use crate::error::SetupError;
use crate::event::BattleEvent;
use crate::ids::{BuildingId, ObserverId, PlayerId, TroopId};
use crate::player::Player;
use crate::ticker::TickListener;
use crate::types::Team;

// =============================================================================
// Result and Intents
// =============================================================================

/// State of the match from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GameResult {
    /// Nobody has won yet.
    #[default]
    Ongoing,
    /// No other team has soldiers left.
    Victory {
        /// The local player's team.
        winner: Team,
    },
    /// The local team has no soldiers left.
    Defeat,
}

impl GameResult {
    /// Whether the match is decided.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Input intents produced by the gesture layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Single click on a building: select it as origin, send troops to it
    /// from the selected origin, or deselect it if it is the origin.
    PrimarySelect(BuildingId),
    /// Double click on a building: try to upgrade it.
    RequestUpgrade(BuildingId),
    /// Click on empty ground: drop the selection.
    ClearSelection,
}

/// Evaluates the match from `local`'s point of view.
///
/// - `local` absent from the tally or at zero: defeat.
/// - No other team (neutral included) above zero: victory for `local`.
/// - Otherwise ongoing.
#[must_use]
pub fn evaluate_outcome(local: Team, tally: &BTreeMap<Team, u32>) -> GameResult {
    match tally.get(&local) {
        None | Some(0) => GameResult::Defeat,
        Some(_) => {
            let contested = tally
                .iter()
                .any(|(team, soldiers)| *team != local && *soldiers > 0);
            if contested {
                GameResult::Ongoing
            } else {
                GameResult::Victory { winner: local }
            }
        }
    }
}

// =============================================================================
// Game
// =============================================================================

type Observer = Box<dyn FnMut()>;

/// One match played by the local player.
pub struct Game {
    battlefield: Battlefield,
    local_player: PlayerId,
    local_team: Team,
    soldiers_per_team: BTreeMap<Team, u32>,
    result: GameResult,
    /// Win or loss already credited to the local player.
    outcome_recorded: bool,
    selected_origin: Option<BuildingId>,
    observers: BTreeMap<ObserverId, Observer>,
    next_observer: ObserverId,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("battlefield", &self.battlefield)
            .field("local_player", &self.local_player)
            .field("local_team", &self.local_team)
            .field("result", &self.result)
            .field("selected_origin", &self.selected_origin)
            .field("observers", &format!("[{} observers]", self.observers.len()))
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Starts a match on `scenario` for a local player named `player_name`
    /// playing `team`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NeutralPlayer`] if `team` is neutral.
    pub fn new(player_name: &str, team: Team, scenario: &ScenarioConfig) -> Result<Self, SetupError> {
        let mut battlefield = Battlefield::from_scenario(scenario);
        let local_player = battlefield.add_player(player_name, team)?;
        info!(
            player = player_name,
            team = %team,
            buildings = scenario.buildings.len(),
            "Match started"
        );
        Ok(Self {
            soldiers_per_team: battlefield.soldiers_per_team().clone(),
            battlefield,
            local_player,
            local_team: team,
            result: GameResult::Ongoing,
            outcome_recorded: false,
            selected_origin: None,
            observers: BTreeMap::new(),
            next_observer: ObserverId::default(),
        })
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advances the match by `dt` seconds and returns the battlefield events
    /// of this tick.
    ///
    /// Irregular deltas are fine; zero is a valid delta.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is negative, NaN or infinite.
    pub fn update(&mut self, dt: f32) -> Vec<BattleEvent> {
        assert!(
            dt.is_finite() && dt >= 0.0,
            "tick delta must be finite and non-negative, got {dt}"
        );

        let events = self.battlefield.update(dt);
        self.soldiers_per_team.clone_from(self.battlefield.soldiers_per_team());

        let local_total = self
            .soldiers_per_team
            .get(&self.local_team)
            .copied()
            .unwrap_or(0);
        if let Some(player) = self.battlefield.player_mut(self.local_player) {
            player.set_total_soldiers(local_total);
        }

        self.result = evaluate_outcome(self.local_team, &self.soldiers_per_team);
        self.record_outcome();

        for observer in self.observers.values_mut() {
            observer();
        }
        events
    }

    fn record_outcome(&mut self) {
        if self.outcome_recorded || !self.result.is_terminal() {
            return;
        }
        self.outcome_recorded = true;
        let tick = self.battlefield.tick();
        let Some(player) = self.battlefield.player_mut(self.local_player) else {
            return;
        };
        match self.result {
            GameResult::Victory { winner } => {
                player.mark_win();
                info!(team = %winner, tick, "Victory: every other team is out of soldiers");
            }
            GameResult::Defeat => {
                player.mark_loss();
                info!(team = %self.local_team, tick, "Defeat: no soldiers left");
            }
            GameResult::Ongoing => {}
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Starts an upgrade if the building belongs to the local team.
    ///
    /// Returns `true` if the upgrade started.
    pub fn try_upgrade(&mut self, building: BuildingId) -> bool {
        self.battlefield.start_upgrade(building, self.local_player)
    }

    /// Clears any selection, then selects `building` as the origin of the
    /// next send-troops command if the local team owns it.
    ///
    /// Returns whether the building is now the selected origin.
    pub fn select_origin(&mut self, building: BuildingId) -> bool {
        self.reset_selection();
        if self.battlefield.select_building_by_id(building, self.local_player) {
            self.selected_origin = Some(building);
            true
        } else {
            false
        }
    }

    /// Drops the selected origin and clears every local selection flag.
    pub fn reset_selection(&mut self) {
        self.battlefield.deselect_all_by_player(self.local_player);
        self.selected_origin = None;
    }

    /// Sends troops from the selected origin to `target`, then clears the
    /// selection.
    ///
    /// No-op without a selected origin or when `target` is the origin.
    pub fn send_troops(&mut self, target: BuildingId) -> Option<TroopId> {
        let origin = self.selected_origin?;
        if origin == target {
            return None;
        }
        let troop = self.battlefield.send_troops(origin, target, self.local_player);
        self.reset_selection();
        troop
    }

    /// Applies an input intent.
    pub fn handle_intent(&mut self, intent: Intent) {
        debug!(?intent, "Intent");
        match intent {
            Intent::PrimarySelect(building) => match self.selected_origin {
                Some(origin) if origin == building => self.reset_selection(),
                Some(_) => {
                    self.send_troops(building);
                }
                None => {
                    self.select_origin(building);
                }
            },
            Intent::RequestUpgrade(building) => {
                self.try_upgrade(building);
            }
            Intent::ClearSelection => self.reset_selection(),
        }
    }

    /// Sets the local player's attack ratio (clamped to `[0, 1]`).
    pub fn set_attack_ratio(&mut self, ratio: f32) {
        if let Some(player) = self.battlefield.player_mut(self.local_player) {
            player.set_attack_ratio(ratio);
        }
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Registers a callback run once after every tick.
    pub fn on_update(&mut self, observer: impl FnMut() + 'static) -> ObserverId {
        let id = self.next_observer.allocate();
        self.observers.insert(id, Box::new(observer));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn off_update(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The battlefield, read-only.
    #[must_use]
    pub const fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    /// The local player.
    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.battlefield.player(self.local_player)
    }

    /// Id of the local player.
    #[must_use]
    pub const fn player_id(&self) -> PlayerId {
        self.local_player
    }

    /// Team of the local player.
    #[must_use]
    pub const fn local_team(&self) -> Team {
        self.local_team
    }

    /// Result after the last tick.
    #[must_use]
    pub const fn result(&self) -> GameResult {
        self.result
    }

    /// Tally copied after the last tick.
    #[must_use]
    pub const fn soldiers_per_team(&self) -> &BTreeMap<Team, u32> {
        &self.soldiers_per_team
    }

    /// Currently selected origin, if any.
    #[must_use]
    pub const fn selected_origin(&self) -> Option<BuildingId> {
        self.selected_origin
    }
}

impl TickListener for Game {
    fn on_tick(&mut self, dt: f32) {
        self.update(dt);
    }
}
