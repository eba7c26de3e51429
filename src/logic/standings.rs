//! Standings: write-once result recording and ranked group tables.

use crate::models::{GroupId, MatchId, StandingsRow, TeamId, Tournament, TournamentError};

/// Record a finished group match. Results are write-once: a match that
/// already has a score rejects the attempt and standings stay untouched.
/// Each side's row gets one atomic delta (played, outcome counter, goals,
/// points 3/1/0); a missing row is created zeroed first.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score1: u32,
    score2: u32,
) -> Result<(), TournamentError> {
    let idx = tournament
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if tournament.matches[idx].score.is_some() {
        return Err(TournamentError::DuplicateResult);
    }
    tournament.matches[idx].score = Some((score1, score2));
    let (home, away, group) = {
        let game = &tournament.matches[idx];
        (game.home, game.away, game.group)
    };
    apply_to_row(tournament, group, home, score1, score2);
    apply_to_row(tournament, group, away, score2, score1);
    Ok(())
}

fn apply_to_row(tournament: &mut Tournament, group: GroupId, team: TeamId, scored: u32, conceded: u32) {
    match tournament
        .standings
        .iter_mut()
        .find(|r| r.group == group && r.team == team)
    {
        Some(row) => row.apply(scored, conceded),
        None => {
            let mut row = StandingsRow::new(group, team);
            row.apply(scored, conceded);
            tournament.standings.push(row);
        }
    }
}

/// Ranked table for one group: points descending, then goal difference
/// descending. The sort is stable, so ties beyond goal difference keep their
/// first-result order.
pub fn group_table(tournament: &Tournament, group: GroupId) -> Vec<&StandingsRow> {
    let mut rows: Vec<&StandingsRow> = tournament
        .standings
        .iter()
        .filter(|r| r.group == group)
        .collect();
    rows.sort_by(|a, b| b.ranking_key().cmp(&a.ranking_key()));
    rows
}
