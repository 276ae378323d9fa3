//! Per-player bookkeeping.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ATTACK_RATIO;
use crate::ids::PlayerId;
use crate::types::Team;

/// A player taking part in a match.
///
/// Players are created once per match and never removed. The team is never
/// [`Team::Neutral`]; [`Battlefield::add_player`](crate::battlefield::Battlefield::add_player)
/// rejects neutral players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    team: Team,
    wins: u32,
    losses: u32,
    total_soldiers: u32,
    attack_ratio: f32,
}

impl Player {
    pub(crate) fn new(id: PlayerId, name: impl Into<String>, team: Team) -> Self {
        debug_assert!(!team.is_neutral(), "players cannot be neutral");
        Self {
            id,
            name: name.into(),
            team,
            wins: 0,
            losses: 0,
            total_soldiers: 0,
            attack_ratio: DEFAULT_ATTACK_RATIO,
        }
    }

    /// Unique id.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Team the player controls.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Matches won.
    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    /// Matches lost.
    #[must_use]
    pub const fn losses(&self) -> u32 {
        self.losses
    }

    /// Soldiers the player's team had after the last tick.
    #[must_use]
    pub const fn total_soldiers(&self) -> u32 {
        self.total_soldiers
    }

    /// Fraction of an origin garrison committed per send-troops command.
    #[must_use]
    pub const fn attack_ratio(&self) -> f32 {
        self.attack_ratio
    }

    /// Records a win.
    pub fn mark_win(&mut self) {
        self.wins = self.wins.saturating_add(1);
    }

    /// Records a loss.
    pub fn mark_loss(&mut self) {
        self.losses = self.losses.saturating_add(1);
    }

    /// Sets the attack ratio, clamped to `[0, 1]`. Non-finite values are
    /// ignored.
    pub fn set_attack_ratio(&mut self, ratio: f32) {
        if ratio.is_finite() {
            self.attack_ratio = ratio.clamp(0.0, 1.0);
        }
    }

    /// Updates the soldier statistic.
    pub fn set_total_soldiers(&mut self, total: u32) {
        self.total_soldiers = total;
    }

    /// Soldiers a send-troops command takes from a garrison of `garrison`.
    #[must_use]
    pub fn troops_to_send(&self, garrison: u32) -> u32 {
        // Exact for every garrison a match can reach.
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let sent = (garrison as f32 * self.attack_ratio).floor() as u32;
        sent.min(garrison)
    }
}
