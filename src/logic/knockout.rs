//! Knockout bracket: seeding from group tables and round-by-round progression.

use crate::logic::standings::group_table;
use crate::models::{
    KnockoutMatch, KnockoutRound, MatchId, MatchStatus, OddQualifierPolicy, TeamId, Tournament,
    TournamentError,
};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// First-round kickoffs land this long after bracket generation.
const BRACKET_DELAY_DAYS: i64 = 7;
const MATCH_SPACING_HOURS: i64 = 2;

/// Seed the bracket from the final group tables.
///
/// Each group contributes its top `qualifiers_per_group` teams in table
/// order; a group with no recorded results contributes none (logged, not
/// fatal). The pool is shuffled and consecutive entries paired into
/// first-round slots. An odd pool follows the tournament's
/// `OddQualifierPolicy`: a bye into the next round, or an explicit drop.
///
/// Standings are not consulted again once the bracket exists; a second call
/// is refused.
pub fn generate_bracket<R: Rng>(
    tournament: &mut Tournament,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Vec<MatchId>, TournamentError> {
    if tournament.bracket_first_round.is_some() || !tournament.knockout.is_empty() {
        return Err(TournamentError::BracketAlreadyExists);
    }

    let mut pool: Vec<TeamId> = Vec::new();
    for group in &tournament.groups {
        let table = group_table(tournament, group.id);
        if table.is_empty() {
            log::warn!(
                "group {} has no recorded results and contributes no qualifiers",
                group.name
            );
            continue;
        }
        pool.extend(
            table
                .iter()
                .take(tournament.qualifiers_per_group)
                .map(|row| row.team),
        );
    }
    if pool.len() < 2 {
        log::warn!("only {} qualifier(s); no bracket seeded", pool.len());
        return Ok(Vec::new());
    }

    pool.shuffle(rng);

    let odd = pool.len() % 2 == 1;
    let entrants = if odd && tournament.odd_qualifier_policy == OddQualifierPolicy::Drop {
        pool.len() - 1
    } else {
        pool.len()
    };
    let first = KnockoutRound::first_for_pool(entrants);
    let pairs = pool.len() / 2;
    let mut kickoff = now + Duration::days(BRACKET_DELAY_DAYS);
    let mut ids = Vec::with_capacity(pairs);
    for slot in 0..pairs {
        let game =
            KnockoutMatch::with_teams(first, slot, pool[2 * slot], pool[2 * slot + 1], kickoff);
        ids.push(game.id);
        tournament.knockout.push(game);
        kickoff += Duration::hours(MATCH_SPACING_HOURS);
    }
    tournament.bracket_first_round = Some(first);
    tournament.bracket_slot_count = pairs;

    if odd {
        let leftover = pool[pool.len() - 1];
        match tournament.odd_qualifier_policy {
            OddQualifierPolicy::Drop => {
                let name = tournament
                    .team(leftover)
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                log::warn!("odd qualifier pool: {} is left out of the bracket", name);
            }
            OddQualifierPolicy::Bye => {
                // The leftover occupies a virtual first-round slot and moves
                // straight into its next-round pairing.
                tournament.bracket_slot_count = pairs + 1;
                advance_winner(tournament, first, pairs, leftover, now);
            }
        }
    }

    Ok(ids)
}

/// Record a knockout result and advance the winner.
///
/// Equal scores are rejected (the decider happens before this call), as is a
/// second result for a completed match or a match still missing a feeder.
/// Semifinal losers feed the third-place match. The Final's winner ends the
/// bracket; no further round is created.
pub fn record_knockout_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score1: u32,
    score2: u32,
    now: DateTime<Utc>,
) -> Result<TeamId, TournamentError> {
    let idx = tournament
        .knockout
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    let (home, away, round, slot) = {
        let game = &tournament.knockout[idx];
        if game.status == MatchStatus::Completed {
            return Err(TournamentError::DuplicateResult);
        }
        let (Some(home), Some(away)) = (game.home, game.away) else {
            return Err(TournamentError::MatchNotReady);
        };
        (home, away, game.round, game.slot)
    };
    if score1 == score2 {
        return Err(TournamentError::UnresolvedTie);
    }

    let (winner, loser) = if score1 > score2 { (home, away) } else { (away, home) };
    {
        let game = &mut tournament.knockout[idx];
        game.score = Some((score1, score2));
        game.winner = Some(winner);
        game.status = MatchStatus::Completed;
    }

    match round {
        KnockoutRound::Final | KnockoutRound::ThirdPlace => {}
        KnockoutRound::Semifinal => {
            if slot < 2 {
                place_in_third_place(tournament, slot, loser, now);
            }
            advance_winner(tournament, round, slot, winner, now);
        }
        _ => advance_winner(tournament, round, slot, winner, now),
    }

    Ok(winner)
}

/// Put the winner of (round, slot) into side slot%2 of next-round slot
/// slot/2, creating the match lazily. If the opposing feeder subtree is
/// empty the placed team advances by walkover.
fn advance_winner(
    tournament: &mut Tournament,
    round: KnockoutRound,
    slot: usize,
    team: TeamId,
    now: DateTime<Utc>,
) {
    let Some(next) = round.next() else { return };
    let parent_slot = slot / 2;
    let side = slot % 2;

    let idx = match tournament
        .knockout
        .iter()
        .position(|m| m.round == next && m.slot == parent_slot)
    {
        Some(i) => i,
        None => {
            let kickoff = now
                + Duration::days(1)
                + Duration::hours(MATCH_SPACING_HOURS * parent_slot as i64);
            tournament
                .knockout
                .push(KnockoutMatch::new(next, parent_slot, kickoff));
            tournament.knockout.len() - 1
        }
    };
    {
        let game = &mut tournament.knockout[idx];
        if side == 0 {
            game.home = Some(team);
        } else {
            game.away = Some(team);
        }
        if game.home.is_some() && game.away.is_some() {
            return;
        }
    }
    if feeder_occupied(tournament, round, slot ^ 1) {
        return;
    }

    // No opponent can ever arrive: walkover into the round after.
    {
        let game = &mut tournament.knockout[idx];
        game.winner = Some(team);
        game.status = MatchStatus::Completed;
    }
    if next != KnockoutRound::Final {
        advance_winner(tournament, next, parent_slot, team, now);
    }
}

/// Will (round, slot) ever produce a winner? First-round slots are occupied
/// contiguously from 0 (including the bye slot), so a node is live exactly
/// when its subtree reaches back into that range.
fn feeder_occupied(tournament: &Tournament, round: KnockoutRound, slot: usize) -> bool {
    let (Some(first), Some(level)) = (tournament.bracket_first_round, round.level()) else {
        return false;
    };
    let Some(first_level) = first.level() else {
        return false;
    };
    let depth = level.saturating_sub(first_level);
    (slot << depth) < tournament.bracket_slot_count
}

/// Semifinal losers meet in the parallel third-place match.
fn place_in_third_place(tournament: &mut Tournament, semi_slot: usize, loser: TeamId, now: DateTime<Utc>) {
    let idx = match tournament
        .knockout
        .iter()
        .position(|m| m.round == KnockoutRound::ThirdPlace)
    {
        Some(i) => i,
        None => {
            tournament.knockout.push(KnockoutMatch::new(
                KnockoutRound::ThirdPlace,
                0,
                now + Duration::days(1),
            ));
            tournament.knockout.len() - 1
        }
    };
    let game = &mut tournament.knockout[idx];
    if semi_slot == 0 {
        game.home = Some(loser);
    } else {
        game.away = Some(loser);
    }
}
