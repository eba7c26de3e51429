//! Fixture generation: single round-robin inside each group.

use crate::models::{GroupId, GroupMatch, MatchId, Tournament, TournamentError};
use chrono::{DateTime, Duration, Utc};

/// First kickoff lands this long after generation.
const FIRST_KICKOFF_DELAY_HOURS: i64 = 24;
/// Matches share one venue timeline, spaced this far apart.
const MATCH_SPACING_HOURS: i64 = 2;

/// Generate this group's round-robin: every unordered pair once, n(n-1)/2
/// matches, no return leg. A group with fewer than two teams, or one whose
/// fixtures already exist, yields an empty list rather than an error.
pub fn generate_group_fixtures(
    tournament: &mut Tournament,
    group: GroupId,
    now: DateTime<Utc>,
) -> Result<Vec<MatchId>, TournamentError> {
    if tournament.group(group).is_none() {
        return Err(TournamentError::GroupNotFound(group));
    }
    Ok(schedule_group(
        tournament,
        group,
        now + Duration::hours(FIRST_KICKOFF_DELAY_HOURS),
    ))
}

/// Generate the whole group-stage calendar in one pass, threading a single
/// serial timeline across all groups. Returns the number of matches created.
pub fn generate_all_fixtures(tournament: &mut Tournament, now: DateTime<Utc>) -> usize {
    let group_ids: Vec<GroupId> = tournament.groups.iter().map(|g| g.id).collect();
    let mut start = now + Duration::hours(FIRST_KICKOFF_DELAY_HOURS);
    let mut created = 0;
    for group in group_ids {
        let ids = schedule_group(tournament, group, start);
        start += Duration::hours(MATCH_SPACING_HOURS * ids.len() as i64);
        created += ids.len();
    }
    created
}

/// Pair members i<j in membership order, one kickoff slot per match.
fn schedule_group(tournament: &mut Tournament, group: GroupId, start: DateTime<Utc>) -> Vec<MatchId> {
    if tournament.matches.iter().any(|m| m.group == group) {
        return Vec::new();
    }
    let members = tournament.group_members(group);
    if members.len() < 2 {
        return Vec::new();
    }
    let mut kickoff = start;
    let mut ids = Vec::with_capacity(members.len() * (members.len() - 1) / 2);
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            let game = GroupMatch::new(members[i], members[j], group, kickoff);
            ids.push(game.id);
            tournament.matches.push(game);
            kickoff += Duration::hours(MATCH_SPACING_HOURS);
        }
    }
    ids
}
