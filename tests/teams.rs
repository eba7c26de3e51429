//! Integration tests for team registration, fees, and rosters.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tournament_manager_web::{
    draw_groups, generate_all_fixtures, Position, Tournament, TournamentError, MAX_SQUAD_SIZE,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

#[test]
fn team_names_are_unique_case_insensitive() {
    let mut t = Tournament::new("Cup", 4, 2);
    t.add_team("Red Star").unwrap();
    assert_eq!(
        t.add_team("red star").unwrap_err(),
        TournamentError::DuplicateTeamName
    );
    assert_eq!(
        t.add_team("   ").unwrap_err(),
        TournamentError::InvalidTeamName
    );
}

#[test]
fn rename_respects_uniqueness() {
    let mut t = Tournament::new("Cup", 4, 2);
    let a = t.add_team("Alpha").unwrap();
    t.add_team("Beta").unwrap();
    assert_eq!(
        t.rename_team(a, "BETA").unwrap_err(),
        TournamentError::DuplicateTeamName
    );
    t.rename_team(a, "Gamma").unwrap();
    assert_eq!(t.team(a).unwrap().name, "Gamma");
}

#[test]
fn removal_is_blocked_once_matches_reference_the_team() {
    let mut t = Tournament::new("Cup", 4, 2);
    let mut ids = Vec::new();
    for i in 0..4 {
        let id = t.add_team(format!("Team {i}")).unwrap();
        t.set_entry_fee(id, 50.0, None).unwrap();
        t.mark_fee_paid(id, now()).unwrap();
        ids.push(id);
    }
    // Before any fixtures the team can still be withdrawn.
    t.remove_team(ids[3]).unwrap();
    let replacement = t.add_team("Team 4").unwrap();
    t.set_entry_fee(replacement, 50.0, None).unwrap();
    t.mark_fee_paid(replacement, now()).unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    draw_groups(&mut t, &mut StdRng::seed_from_u64(1), today).unwrap();
    generate_all_fixtures(&mut t, now());

    assert_eq!(
        t.remove_team(ids[0]).unwrap_err(),
        TournamentError::TeamHasMatches(ids[0])
    );
}

#[test]
fn shirt_numbers_are_unique_within_a_team() {
    let mut t = Tournament::new("Cup", 4, 2);
    let id = t.add_team("Red Star").unwrap();
    t.add_squad_member(id, "Keeper", 1, Position::Goalkeeper).unwrap();
    assert_eq!(
        t.add_squad_member(id, "Impostor", 1, Position::Defender)
            .unwrap_err(),
        TournamentError::DuplicateShirtNumber { number: 1 }
    );
    // Same number on another team is fine.
    let other = t.add_team("Blue Moon").unwrap();
    t.add_squad_member(other, "Keeper", 1, Position::Goalkeeper).unwrap();
}

#[test]
fn squad_size_is_capped() {
    let mut t = Tournament::new("Cup", 4, 2);
    let id = t.add_team("Red Star").unwrap();
    for n in 0..MAX_SQUAD_SIZE {
        t.add_squad_member(id, format!("Player {n}"), n as u8 + 1, Position::Midfielder)
            .unwrap();
    }
    assert_eq!(
        t.add_squad_member(id, "One Too Many", 99, Position::Forward)
            .unwrap_err(),
        TournamentError::SquadFull
    );
}

#[test]
fn fee_update_preserves_an_existing_payment() {
    let mut t = Tournament::new("Cup", 4, 2);
    let id = t.add_team("Red Star").unwrap();
    t.set_entry_fee(id, 100.0, None).unwrap();
    t.mark_fee_paid(id, now()).unwrap();

    let deadline = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    t.set_entry_fee(id, 150.0, Some(deadline)).unwrap();

    let fee = t.entry_fees.get(&id).unwrap();
    assert_eq!(fee.amount, 150.0);
    assert_eq!(fee.deadline, Some(deadline));
    assert!(fee.paid);
    assert!(fee.paid_at.is_some());
}
