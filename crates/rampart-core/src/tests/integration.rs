//! End-to-end tests through the battlefield and game APIs.

use crate::battlefield::Battlefield;
use crate::event::BattleEvent;
use crate::game::{Game, GameResult, Intent};
use crate::ids::BuildingId;
use crate::projectile::ProjectileStatus;
use crate::types::{BuildingLevel, Team, TroopArrivalOutcome};

use super::helpers::{
    assert_tally_consistent, barrack, battlefield_with_player, scenario, tower,
};

fn arrivals(events: &[BattleEvent]) -> Vec<BattleEvent> {
    events.iter().copied().filter(BattleEvent::is_arrival).collect()
}

// =============================================================================
// Upgrades
// =============================================================================

#[test]
fn barrack_upgrade_lifecycle() {
    let (mut field, player) =
        battlefield_with_player(vec![barrack(0.0, 0.0, Team::Blue, 5)], Team::Blue);
    let id = BuildingId::new(0);

    field.update(0.25);
    assert!(field.get_building(id).unwrap().can_upgrade());

    assert!(field.start_upgrade(id, player));
    let building = field.get_building(id).unwrap();
    assert_eq!(building.soldier_count(), 0);
    assert!(building.is_upgrading());

    let mut completed = Vec::new();
    for _ in 0..20 {
        for event in field.update(0.25) {
            if let BattleEvent::UpgradeCompleted { building, level } = event {
                completed.push((building, level));
            }
        }
    }

    assert_eq!(completed, vec![(id, BuildingLevel::try_from(1).unwrap())]);
    let building = field.get_building(id).unwrap();
    assert!(!building.is_upgrading());
    assert_eq!(building.level().get(), 1);
}

#[test]
fn defended_building_loses_its_upgrade() {
    let (mut field, blue) = battlefield_with_player(
        vec![
            barrack(0.0, 0.0, Team::Blue, 40),
            barrack(60.0, 0.0, Team::Red, 10),
        ],
        Team::Blue,
    );
    let red = field.add_player("rival", Team::Red).unwrap();
    let (home, rival) = (BuildingId::new(0), BuildingId::new(1));

    field.update(0.25);
    assert!(field.start_upgrade(home, blue));
    // 35 left after the upgrade cost; red sends 2.
    field.send_troops(rival, home, red);

    let mut outcome = None;
    for _ in 0..4 {
        for event in arrivals(&field.update(0.25)) {
            if let BattleEvent::TroopArrived { outcome: o, .. } = event {
                outcome = Some(o);
            }
        }
    }

    assert_eq!(outcome, Some(TroopArrivalOutcome::Defended));
    let building = field.get_building(home).unwrap();
    assert_eq!(building.soldier_count(), 33);
    assert!(!building.is_upgrading());
    assert_eq!(building.level(), BuildingLevel::MIN);
}

// =============================================================================
// Combat
// =============================================================================

#[test]
fn tower_shoots_down_passing_troop() {
    let (mut field, player) = battlefield_with_player(
        vec![
            tower(0.0, 0.0, Team::Red, 0, 3),
            barrack(-200.0, 30.0, Team::Blue, 12),
            barrack(200.0, 30.0, Team::Neutral, 0),
        ],
        Team::Blue,
    );
    let target = BuildingId::new(2);
    let troop = field.send_troops(BuildingId::new(1), target, player).unwrap();
    assert_eq!(field.get_troop(troop).unwrap().soldiers(), 3);

    let mut events = Vec::new();
    for _ in 0..40 {
        events.extend(field.update(0.25));
        assert_tally_consistent(&field);
    }

    let hits = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                BattleEvent::ProjectileResolved {
                    status: ProjectileStatus::Hit,
                    ..
                }
            )
        })
        .count();
    assert_eq!(hits, 3);
    assert!(arrivals(&events).is_empty());
    assert!(events.contains(&BattleEvent::TroopDestroyed {
        troop,
        team: Team::Blue
    }));
    assert!(field.get_troop(troop).is_none());

    let untouched = field.get_building(target).unwrap();
    assert_eq!(untouched.team(), Team::Neutral);
    assert_eq!(untouched.soldier_count(), 0);
}

#[test]
fn friendly_tower_holds_fire() {
    let (mut field, player) = battlefield_with_player(
        vec![
            tower(0.0, 0.0, Team::Blue, 0, 3),
            barrack(-100.0, 0.0, Team::Blue, 20),
            barrack(100.0, 0.0, Team::Blue, 0),
        ],
        Team::Blue,
    );
    field.send_troops(BuildingId::new(1), BuildingId::new(2), player);

    for _ in 0..20 {
        let events = field.update(0.25);
        assert!(!events
            .iter()
            .any(|e| matches!(e, BattleEvent::ProjectileFired { .. })));
    }
    assert!(!field.get_building(BuildingId::new(0)).unwrap().is_active());
}

#[test]
fn conquest_and_reinforcement_through_troops() {
    let (mut field, player) = battlefield_with_player(
        vec![
            barrack(0.0, 0.0, Team::Blue, 40),
            barrack(60.0, 0.0, Team::Green, 4),
            barrack(0.0, 60.0, Team::Blue, 1),
        ],
        Team::Blue,
    );
    let (home, green, ally) = (BuildingId::new(0), BuildingId::new(1), BuildingId::new(2));

    field.send_troops(home, green, player); // 10 soldiers
    field.send_troops(home, ally, player); // 7 soldiers

    let mut outcomes = Vec::new();
    for _ in 0..4 {
        for event in arrivals(&field.update(0.25)) {
            if let BattleEvent::TroopArrived { to, outcome, .. } = event {
                outcomes.push((to, outcome));
            }
        }
    }

    assert_eq!(
        outcomes,
        vec![
            (green, TroopArrivalOutcome::Conquered),
            (ally, TroopArrivalOutcome::Reinforced),
        ]
    );
    let conquered = field.get_building(green).unwrap();
    assert_eq!(conquered.team(), Team::Blue);
    assert_eq!(conquered.soldier_count(), 6);
    assert_eq!(conquered.level(), BuildingLevel::MIN);
    assert_eq!(field.get_building(ally).unwrap().soldier_count(), 8);
    assert_eq!(field.soldiers_per_team().get(&Team::Green), Some(&0));
}

#[test]
fn projectile_in_flight_resolves_after_troop_dies() {
    // Two towers fire at the same single-soldier troop in the same tick; the
    // first projectile kills it and the second one fizzles.
    let (mut field, player) = battlefield_with_player(
        vec![
            tower(0.0, 50.0, Team::Red, 0, 0),
            tower(0.0, -50.0, Team::Red, 0, 0),
            barrack(-60.0, 0.0, Team::Blue, 4),
            barrack(60.0, 0.0, Team::Neutral, 0),
        ],
        Team::Blue,
    );
    let troop = field
        .send_troops(BuildingId::new(2), BuildingId::new(3), player)
        .unwrap();
    assert_eq!(field.get_troop(troop).unwrap().soldiers(), 1);

    let mut statuses = Vec::new();
    for _ in 0..8 {
        for event in field.update(0.25) {
            if let BattleEvent::ProjectileResolved { status, .. } = event {
                statuses.push(status);
            }
        }
    }

    assert_eq!(statuses, vec![ProjectileStatus::Hit, ProjectileStatus::Fizzled]);
    assert_eq!(field.projectiles().count(), 0);
    assert!(field.get_troop(troop).is_none());
}

// =============================================================================
// Game
// =============================================================================

#[test]
fn send_troops_scenario_through_game() {
    let mut game = Game::new(
        "ada",
        Team::Blue,
        &scenario(vec![
            barrack(0.0, 0.0, Team::Blue, 20),
            barrack(90.0, 0.0, Team::Red, 10),
        ]),
    )
    .unwrap();

    game.handle_intent(Intent::PrimarySelect(BuildingId::new(0)));
    game.handle_intent(Intent::PrimarySelect(BuildingId::new(1)));

    let field = game.battlefield();
    let troops: Vec<_> = field.troops().collect();
    assert_eq!(troops.len(), 1);
    assert_eq!(troops[0].soldiers(), 5);
    assert_eq!(field.get_building(BuildingId::new(0)).unwrap().soldier_count(), 15);
}

#[test]
fn full_match_ends_in_victory() {
    let mut game = Game::new(
        "ada",
        Team::Blue,
        &scenario(vec![
            barrack(0.0, 0.0, Team::Blue, 30),
            barrack(60.0, 0.0, Team::Red, 3),
            barrack(0.0, 60.0, Team::Green, 2),
        ]),
    )
    .unwrap();
    game.set_attack_ratio(0.5);

    game.handle_intent(Intent::PrimarySelect(BuildingId::new(0)));
    game.handle_intent(Intent::PrimarySelect(BuildingId::new(1)));
    game.handle_intent(Intent::PrimarySelect(BuildingId::new(0)));
    game.handle_intent(Intent::PrimarySelect(BuildingId::new(2)));
    assert_eq!(game.battlefield().troops().count(), 2);

    let mut ticks = 0;
    while !game.result().is_terminal() && ticks < 100 {
        game.update(0.25);
        ticks += 1;
    }

    assert_eq!(game.result(), GameResult::Victory { winner: Team::Blue });
    assert_eq!(ticks, 4);
    assert_eq!(game.player().unwrap().wins(), 1);
}

#[test]
fn snapshot_survives_json() {
    let mut field = Battlefield::from_scenario(&super::helpers::crossroads());
    let players: Vec<_> = Team::PLAYABLE
        .iter()
        .map(|team| (*team, field.add_player("p", *team).unwrap()))
        .collect();
    super::helpers::launch_crossroads_waves(&mut field, &players);
    for _ in 0..10 {
        field.update(0.1);
    }

    let snapshot = field.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: crate::battlefield::BattlefieldSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(back, snapshot);
    assert!(json.contains("\"soldiers_per_team\""));
}
