//! Group draw: partition eligible teams into lettered groups.

use crate::logic::eligibility::is_eligible;
use crate::models::{Group, GroupId, Tournament, TournamentError};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

/// Spreadsheet-style letters: A..Z, then AA, AB, ...
fn group_label(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = String::new();
    while n > 0 {
        n -= 1;
        letters.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    format!("Group {}", letters)
}

/// Draw every registered team into a group.
///
/// 1. Gate all teams; any failure aborts with the offending names and no
///    mutation at all.
/// 2. Group count = ceil(teams / teams_per_group); groups are created by
///    label, reusing an existing group with the same label.
/// 3. Shuffle the team order, assign team i to group i % count, and give each
///    team a display number from the configured range (not unique).
///
/// Returns the groups used by this draw, in label order.
pub fn draw_groups<R: Rng>(
    tournament: &mut Tournament,
    rng: &mut R,
    today: NaiveDate,
) -> Result<Vec<GroupId>, TournamentError> {
    let ineligible: Vec<String> = tournament
        .teams
        .iter()
        .filter(|team| !is_eligible(tournament.entry_fees.get(&team.id), today))
        .map(|team| team.name.clone())
        .collect();
    if !ineligible.is_empty() {
        return Err(TournamentError::IneligibleTeams(ineligible));
    }
    if tournament.teams.is_empty() {
        return Ok(Vec::new());
    }

    let per_group = tournament.teams_per_group.max(1);
    let group_count = tournament.teams.len().div_ceil(per_group);

    let mut group_ids = Vec::with_capacity(group_count);
    for i in 0..group_count {
        let label = group_label(i);
        let id = match tournament.group_by_name(&label) {
            Some(existing) => existing.id,
            None => {
                let group = Group::new(label);
                let id = group.id;
                tournament.groups.push(group);
                id
            }
        };
        group_ids.push(id);
    }

    let mut order: Vec<usize> = (0..tournament.teams.len()).collect();
    order.shuffle(rng);

    let (lo, hi) = tournament.number_range;
    let hi = hi.max(lo);
    for (i, &team_idx) in order.iter().enumerate() {
        let team = &mut tournament.teams[team_idx];
        team.group = Some(group_ids[i % group_count]);
        team.number = Some(rng.gen_range(lo..=hi));
    }

    Ok(group_ids)
}
