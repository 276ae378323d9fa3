//! Cross-module tests for the simulation.
//!
//! - `integration.rs`: end-to-end scenarios through `Battlefield` and `Game`
//! - `determinism.rs`: identical inputs produce identical state
//! - `properties.rs`: property-based checks of the tally and combat rules
//! - `helpers.rs`: scenario builders and state inspectors

mod helpers;
mod integration;

// Re-export for convenience
pub use helpers::*;
