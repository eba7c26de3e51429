//! Integration tests for result recording and group tables.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tournament_manager_web::{
    draw_groups, generate_group_fixtures, group_table, record_result, Group, StandingsRow, Team,
    TeamId, Tournament, TournamentError,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

/// One group of four named teams with all six fixtures scheduled.
fn group_of_four() -> Tournament {
    let mut t = Tournament::new("Cup", 4, 2);
    for name in ["A", "B", "C", "D"] {
        let id = t.add_team(name).unwrap();
        t.set_entry_fee(id, 50.0, None).unwrap();
        t.mark_fee_paid(id, now()).unwrap();
    }
    let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    draw_groups(&mut t, &mut StdRng::seed_from_u64(1), today).unwrap();
    let group = t.groups[0].id;
    generate_group_fixtures(&mut t, group, now()).unwrap();
    t
}

fn team_id(t: &Tournament, name: &str) -> TeamId {
    t.teams.iter().find(|x| x.name == name).unwrap().id
}

fn team<'a>(t: &'a Tournament, id: TeamId) -> &'a Team {
    t.teams.iter().find(|x| x.id == id).unwrap()
}

/// Record a result between two named teams, orienting the scores to however
/// the fixture was scheduled.
fn record_between(t: &mut Tournament, a: &str, b: &str, goals_a: u32, goals_b: u32) {
    let (a, b) = (team_id(t, a), team_id(t, b));
    let m = t
        .matches
        .iter()
        .find(|m| (m.home == a && m.away == b) || (m.home == b && m.away == a))
        .unwrap();
    let (id, s1, s2) = if m.home == a {
        (m.id, goals_a, goals_b)
    } else {
        (m.id, goals_b, goals_a)
    };
    record_result(t, id, s1, s2).unwrap();
}

fn row<'a>(t: &'a Tournament, name: &str) -> &'a StandingsRow {
    let id = team_id(t, name);
    t.standings.iter().find(|r| r.team == id).unwrap()
}

fn assert_invariants(t: &Tournament) {
    for r in &t.standings {
        assert_eq!(r.points, 3 * r.wins + r.draws);
        assert_eq!(r.played, r.wins + r.draws + r.losses);
    }
}

#[test]
fn full_group_round_scenario() {
    let mut t = group_of_four();
    record_between(&mut t, "A", "B", 2, 1);
    record_between(&mut t, "A", "C", 3, 0);
    record_between(&mut t, "A", "D", 1, 1);
    record_between(&mut t, "B", "C", 2, 2);
    record_between(&mut t, "B", "D", 0, 1);
    record_between(&mut t, "C", "D", 1, 1);

    let a = row(&t, "A");
    assert_eq!((a.points, a.wins, a.draws, a.losses), (7, 2, 1, 0));
    assert_eq!((a.goals_for, a.goals_against), (6, 2));
    let d = row(&t, "D");
    assert_eq!((d.points, d.wins, d.draws, d.losses), (5, 1, 2, 0));
    let c = row(&t, "C");
    assert_eq!((c.points, c.goal_difference()), (2, -3));
    let b = row(&t, "B");
    assert_eq!((b.points, b.goal_difference()), (1, -2));

    let table = group_table(&t, t.groups[0].id);
    let order: Vec<&str> = table.iter().map(|r| team(&t, r.team).name.as_str()).collect();
    assert_eq!(order, vec!["A", "D", "C", "B"]);
    assert_invariants(&t);
}

#[test]
fn invariants_hold_after_every_update() {
    let mut t = group_of_four();
    let results = [("A", "B", 4, 0), ("C", "D", 2, 2), ("A", "C", 1, 3), ("B", "D", 0, 0)];
    for (x, y, gx, gy) in results {
        record_between(&mut t, x, y, gx, gy);
        assert_invariants(&t);
    }
}

#[test]
fn results_are_write_once() {
    let mut t = group_of_four();
    record_between(&mut t, "A", "B", 2, 0);
    let snapshot = t.standings.clone();
    let id = t.matches.iter().find(|m| m.score.is_some()).unwrap().id;

    assert_eq!(
        record_result(&mut t, id, 5, 5).unwrap_err(),
        TournamentError::DuplicateResult
    );
    // The rejected attempt left both the score and the standings alone.
    assert_eq!(t.standings, snapshot);
    assert_eq!(
        t.matches.iter().find(|m| m.id == id).unwrap().score,
        Some((2, 0))
    );
}

#[test]
fn unknown_match_is_an_error() {
    let mut t = group_of_four();
    let bogus = uuid::Uuid::new_v4();
    assert_eq!(
        record_result(&mut t, bogus, 1, 0).unwrap_err(),
        TournamentError::MatchNotFound(bogus)
    );
}

#[test]
fn rows_appear_only_once_a_team_has_played() {
    let mut t = group_of_four();
    assert!(t.standings.is_empty());
    record_between(&mut t, "A", "B", 1, 0);
    assert_eq!(t.standings.len(), 2);
}

#[test]
fn ranking_is_points_then_goal_difference() {
    let mut t = Tournament::new("Cup", 4, 2);
    let group = Group::new("Group A");
    let gid = group.id;
    t.groups.push(group);

    // A: 6 pts, +3. B: 6 pts, +1. C: 4 pts, +5.
    let ids: Vec<TeamId> = ["C", "B", "A"]
        .iter()
        .map(|name| t.add_team(*name).unwrap())
        .collect();
    let results: [(&str, &[(u32, u32)]); 3] = [
        ("C", &[(6, 1), (0, 0)]),
        ("B", &[(1, 0), (1, 0), (0, 1)]),
        ("A", &[(3, 0), (1, 0), (0, 1)]),
    ];
    for (i, (_, games)) in results.iter().enumerate() {
        let mut row = StandingsRow::new(gid, ids[i]);
        for &(gf, ga) in games.iter() {
            row.apply(gf, ga);
        }
        t.standings.push(row);
    }

    let table = group_table(&t, gid);
    let order: Vec<&str> = table.iter().map(|r| team(&t, r.team).name.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn ties_beyond_goal_difference_keep_first_result_order() {
    let mut t = Tournament::new("Cup", 4, 2);
    let group = Group::new("Group A");
    let gid = group.id;
    t.groups.push(group);

    for name in ["First", "Second"] {
        let id = t.add_team(name).unwrap();
        let mut row = StandingsRow::new(gid, id);
        row.apply(2, 1);
        t.standings.push(row);
    }
    let table = group_table(&t, gid);
    let order: Vec<&str> = table.iter().map(|r| team(&t, r.team).name.as_str()).collect();
    assert_eq!(order, vec!["First", "Second"]);
}
