//! Per-team standings row, maintained incrementally per recorded result.

use crate::models::group::GroupId;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// One row of a group table, keyed by (group, team) within a tournament.
/// Invariants: points == 3*wins + draws, played == wins + draws + losses.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub group: GroupId,
    pub team: TeamId,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl StandingsRow {
    /// Zeroed row, created when a team's first result comes in.
    pub fn new(group: GroupId, team: TeamId) -> Self {
        Self {
            group,
            team,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
        }
    }

    /// Apply one finished match from this team's perspective.
    pub fn apply(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        if scored > conceded {
            self.wins += 1;
            self.points += 3;
        } else if scored == conceded {
            self.draws += 1;
            self.points += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Ranking key: points first, then goal difference. Nothing further;
    /// remaining ties keep their existing order.
    pub fn ranking_key(&self) -> (u32, i64) {
        (self.points, self.goal_difference())
    }
}
