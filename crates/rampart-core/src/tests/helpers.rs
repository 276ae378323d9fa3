//! Test helpers for building battlefields and inspecting their state.

use std::collections::BTreeMap;

use crate::battlefield::Battlefield;
use crate::config::{BuildingPlacement, ScenarioConfig};
use crate::ids::{BuildingId, PlayerId};
use crate::types::{BuildingLevel, Team};

// =============================================================================
// Scenario Setup
// =============================================================================

/// A level-0 barrack placement.
pub fn barrack(x: f32, y: f32, team: Team, soldiers: u32) -> BuildingPlacement {
    BuildingPlacement::barrack(x, y, team, soldiers).with_level(BuildingLevel::MIN)
}

/// A tower placement at an explicit level.
pub fn tower(x: f32, y: f32, team: Team, soldiers: u32, level: u8) -> BuildingPlacement {
    BuildingPlacement::tower(x, y, team, soldiers)
        .with_level(BuildingLevel::try_from(level).unwrap())
}

/// A scenario with the given placements.
pub fn scenario(buildings: Vec<BuildingPlacement>) -> ScenarioConfig {
    ScenarioConfig { buildings }
}

/// Builds a battlefield and registers a player for `team`.
pub fn battlefield_with_player(
    buildings: Vec<BuildingPlacement>,
    team: Team,
) -> (Battlefield, PlayerId) {
    let mut field = Battlefield::from_scenario(&scenario(buildings));
    let player = field.add_player("tester", team).unwrap();
    (field, player)
}

/// Four corner barracks, one per playable team, plus two neutral towers in
/// the middle. Used by the determinism and bench-like tests.
pub fn crossroads() -> ScenarioConfig {
    scenario(vec![
        barrack(0.0, 0.0, Team::Blue, 30),
        barrack(300.0, 0.0, Team::Red, 30),
        barrack(0.0, 300.0, Team::Green, 30),
        barrack(300.0, 300.0, Team::Magenta, 30),
        tower(150.0, 100.0, Team::Neutral, 4, 1),
        tower(150.0, 200.0, Team::Neutral, 4, 2),
        barrack(150.0, 150.0, Team::Neutral, 10),
    ])
}

/// Sends troops from every owned corner to the centre and to the next corner,
/// using one player per team.
pub fn launch_crossroads_waves(field: &mut Battlefield, players: &[(Team, PlayerId)]) {
    let corners: Vec<BuildingId> = (0..4).map(BuildingId::new).collect();
    let centre = BuildingId::new(6);
    for (i, corner) in corners.iter().enumerate() {
        let Some(team) = field.get_building(*corner).map(crate::building::Building::team) else {
            continue;
        };
        let Some((_, player)) = players.iter().find(|(t, _)| *t == team) else {
            continue;
        };
        field.send_troops(*corner, centre, *player);
        field.send_troops(*corner, corners[(i + 1) % 4], *player);
    }
}

// =============================================================================
// Inspectors
// =============================================================================

/// Recomputes the tally the slow way, from every building and troop.
pub fn expected_tally(field: &Battlefield) -> BTreeMap<Team, u32> {
    let mut tally = BTreeMap::new();
    for building in field.buildings() {
        *tally.entry(building.team()).or_insert(0) += building.soldier_count();
    }
    for troop in field.troops() {
        *tally.entry(troop.team()).or_insert(0) += troop.soldiers();
    }
    tally
}

/// Asserts that the stored tally agrees with [`expected_tally`], treating
/// missing entries as zero.
pub fn assert_tally_consistent(field: &Battlefield) {
    let expected = expected_tally(field);
    let stored = field.soldiers_per_team();
    for (team, soldiers) in &expected {
        assert_eq!(
            stored.get(team).copied().unwrap_or(0),
            *soldiers,
            "tally mismatch for {team} at tick {}",
            field.tick()
        );
    }
    for (team, soldiers) in stored {
        assert_eq!(
            expected.get(team).copied().unwrap_or(0),
            *soldiers,
            "stale tally entry for {team} at tick {}",
            field.tick()
        );
    }
}
