//! Integration tests for the eligibility gate and the group draw.

use chrono::{NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tournament_manager_web::{draw_groups, is_eligible, EntryFee, Tournament, TournamentError};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

fn tournament_with_paid_teams(n: usize) -> Tournament {
    let mut t = Tournament::new("Spring Cup", 4, 2);
    for i in 0..n {
        let id = t.add_team(format!("Team {i}")).unwrap();
        t.set_entry_fee(id, 100.0, None).unwrap();
        t.mark_fee_paid(id, Utc.with_ymd_and_hms(2026, 5, 20, 10, 0, 0).unwrap())
            .unwrap();
    }
    t
}

#[test]
fn gate_blocks_team_without_fee_record() {
    assert!(!is_eligible(None, today()));
}

#[test]
fn gate_without_deadline_uses_paid_flag_alone() {
    let mut fee = EntryFee::new(100.0, None);
    assert!(!is_eligible(Some(&fee), today()));
    fee.paid = true;
    assert!(is_eligible(Some(&fee), today()));
}

#[test]
fn gate_deadline_is_inclusive() {
    let mut fee = EntryFee::new(100.0, Some(today()));
    fee.paid = true;
    assert!(is_eligible(Some(&fee), today()));

    fee.deadline = Some(today().pred_opt().unwrap());
    assert!(!is_eligible(Some(&fee), today()));

    // An open deadline does not help an unpaid fee.
    let unpaid = EntryFee::new(100.0, Some(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
    assert!(!is_eligible(Some(&unpaid), today()));
}

#[test]
fn draw_rejects_when_any_team_is_unsettled() {
    let mut t = tournament_with_paid_teams(4);
    t.add_team("Latecomers").unwrap(); // no fee record at all

    let mut rng = StdRng::seed_from_u64(1);
    let err = draw_groups(&mut t, &mut rng, today()).unwrap_err();
    assert_eq!(
        err,
        TournamentError::IneligibleTeams(vec!["Latecomers".to_string()])
    );

    // No partial write: nobody got a group or a number.
    for team in &t.teams {
        assert_eq!(team.group, None);
        assert_eq!(team.number, None);
    }
    assert!(t.groups.is_empty());
}

#[test]
fn draw_partitions_teams_into_ceil_groups() {
    let mut t = tournament_with_paid_teams(10);
    let mut rng = StdRng::seed_from_u64(2);
    let groups = draw_groups(&mut t, &mut rng, today()).unwrap();

    // ceil(10 / 4) = 3 groups
    assert_eq!(groups.len(), 3);
    assert_eq!(t.groups.len(), 3);
    let names: Vec<&str> = t.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Group A", "Group B", "Group C"]);

    let mut sizes: HashMap<_, usize> = HashMap::new();
    for team in &t.teams {
        let group = team.group.expect("every team is assigned");
        *sizes.entry(group).or_default() += 1;
        let number = team.number.expect("every team gets a number");
        assert!((1..=99).contains(&number));
    }
    let mut counts: Vec<usize> = sizes.values().copied().collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![3, 3, 4]);
}

#[test]
fn draw_is_reproducible_with_a_seed() {
    let t = tournament_with_paid_teams(8);
    let mut a = t.clone();
    let mut b = t;
    draw_groups(&mut a, &mut StdRng::seed_from_u64(42), today()).unwrap();
    draw_groups(&mut b, &mut StdRng::seed_from_u64(42), today()).unwrap();

    for (x, y) in a.teams.iter().zip(b.teams.iter()) {
        let gx = a.groups.iter().position(|g| Some(g.id) == x.group);
        let gy = b.groups.iter().position(|g| Some(g.id) == y.group);
        assert_eq!(gx, gy);
        assert_eq!(x.number, y.number);
    }
}

#[test]
fn redraw_reuses_groups_by_label() {
    let mut t = tournament_with_paid_teams(10);
    draw_groups(&mut t, &mut StdRng::seed_from_u64(3), today()).unwrap();
    draw_groups(&mut t, &mut StdRng::seed_from_u64(4), today()).unwrap();
    assert_eq!(t.groups.len(), 3);
}

#[test]
fn drawing_no_teams_is_a_no_op() {
    let mut t = Tournament::new("Empty Cup", 4, 2);
    let groups = draw_groups(&mut t, &mut StdRng::seed_from_u64(5), today()).unwrap();
    assert!(groups.is_empty());
    assert!(t.groups.is_empty());
}
