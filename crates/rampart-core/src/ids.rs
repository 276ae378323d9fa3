//! Stable identifiers for simulation entities.
//!
//! Every entity kind gets its own newtype over `u64` so a troop id can never
//! be passed where a building id is expected. Ids are allocated monotonically
//! by their owner ([`Battlefield`](crate::battlefield::Battlefield) for
//! entities and players, [`Game`](crate::game::Game) for observers) and never
//! reused within a match.
//!
//! # Ordering
//!
//! Ids are ordered by their numeric value. Entity maps are `BTreeMap`s keyed by
//! id, so iteration order is creation order and fully deterministic.
//!
//! # Example
//!
//! ```
//! use rampart_core::ids::TroopId;
//!
//! let first = TroopId::new(1);
//! let second = TroopId::new(2);
//!
//! assert!(first < second);
//! assert_eq!(second.as_u64(), 2);
//! assert_eq!(first.to_string(), "troop#1");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates an id from a raw `u64` value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw `u64` value of this id.
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            /// Returns this id and advances `self` to the next one.
            pub(crate) fn allocate(&mut self) -> Self {
                let id = *self;
                self.0 += 1;
                id
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self::new(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a building. Buildings are never destroyed, so a building
    /// id stays valid for the whole match.
    BuildingId,
    "building"
);

define_id!(
    /// Identifier of a troop in transit.
    TroopId,
    "troop"
);

define_id!(
    /// Identifier of a projectile in flight.
    ProjectileId,
    "projectile"
);

define_id!(
    /// Identifier of a player registered on a battlefield.
    PlayerId,
    "player"
);

define_id!(
    /// Handle returned when registering a tick observer, used to remove it.
    ObserverId,
    "observer"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_monotonic() {
        let mut next = BuildingId::new(0);
        let a = next.allocate();
        let b = next.allocate();
        let c = next.allocate();
        assert_eq!(
            (a, b, c),
            (BuildingId::new(0), BuildingId::new(1), BuildingId::new(2))
        );
        assert_eq!(next, BuildingId::new(3));
    }

    #[test]
    fn debug_and_display_name_the_kind() {
        assert_eq!(format!("{:?}", PlayerId::new(4)), "PlayerId(4)");
        assert_eq!(ProjectileId::new(9).to_string(), "projectile#9");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&TroopId::new(12)).unwrap();
        assert_eq!(json, "12");
        let id: BuildingId = serde_json::from_str("3").unwrap();
        assert_eq!(u64::from(id), 3);
    }
}
