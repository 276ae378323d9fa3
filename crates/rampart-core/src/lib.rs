//! # Rampart Core
//!
//! Deterministic, tick-driven simulation core for Rampart, a territorial
//! conquest game.
//!
//! Teams own buildings that passively produce soldiers. The local player
//! dispatches troops between buildings, and every arrival is resolved as a
//! reinforcement, a successful defense, or a conquest. Towers shoot homing
//! projectiles at enemy troops in transit.
//!
//! ## Architecture
//!
//! - **Buildings**: shared state machine ([`building::Building`]) with two
//!   variants, barracks (production) and towers (ranged attack)
//! - **Mobile entities**: [`troop::Troop`] and [`projectile::Projectile`]
//! - **Battlefield**: owns every entity, advances them once per tick and keeps
//!   the per-team soldier tally
//! - **Game**: wraps one battlefield and the local player, evaluates victory
//!   and defeat, and notifies observers
//!
//! All cross references between entities are ids resolved through the
//! battlefield, so removing a troop can never leave a dangling reference.
//!
//! ## Usage
//!
//! ```
//! use rampart_core::config::ScenarioConfig;
//! use rampart_core::game::{Game, GameResult};
//! use rampart_core::types::Team;
//!
//! let mut game = Game::new("player1", Team::Blue, &ScenarioConfig::default()).unwrap();
//! for _ in 0..60 {
//!     game.update(1.0 / 60.0);
//! }
//! assert_eq!(game.result(), GameResult::Ongoing);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod battlefield;
pub mod building;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod game;
pub mod ids;
pub mod player;
pub mod projectile;
pub mod ticker;
pub mod troop;
pub mod types;

// Re-exports for convenience
pub use battlefield::{Battlefield, BattlefieldSnapshot};
pub use building::{Building, BuildingFlags};
pub use config::{BuildingPlacement, ScenarioConfig};
pub use error::{ConfigError, SetupError};
pub use event::BattleEvent;
pub use game::{Game, GameResult, Intent};
pub use ids::{BuildingId, ObserverId, PlayerId, ProjectileId, TroopId};
pub use player::Player;
pub use projectile::{Projectile, ProjectileStatus};
pub use ticker::{TickListener, Ticker};
pub use troop::{Troop, TroopStatus};
pub use types::{BuildingKind, BuildingLevel, Position, Team, TroopArrivalOutcome};

#[cfg(test)]
mod tests;
