//! Knockout (single-elimination) rounds and matches.

use crate::models::game::MatchId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Knockout round, in play order. The third-place match runs parallel to the
/// final and sorts after it for display.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutRound {
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
    ThirdPlace,
}

impl KnockoutRound {
    /// Position in the elimination chain (ThirdPlace sits outside it).
    pub fn level(self) -> Option<u8> {
        match self {
            KnockoutRound::RoundOf16 => Some(0),
            KnockoutRound::Quarterfinal => Some(1),
            KnockoutRound::Semifinal => Some(2),
            KnockoutRound::Final => Some(3),
            KnockoutRound::ThirdPlace => None,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(KnockoutRound::RoundOf16),
            1 => Some(KnockoutRound::Quarterfinal),
            2 => Some(KnockoutRound::Semifinal),
            3 => Some(KnockoutRound::Final),
            _ => None,
        }
    }

    /// Round the winners advance into; None for Final and ThirdPlace.
    pub fn next(self) -> Option<Self> {
        self.level().and_then(|l| Self::from_level(l + 1))
    }

    /// First round for a qualifier pool of the given size.
    pub fn first_for_pool(pool: usize) -> Self {
        if pool > 8 {
            KnockoutRound::RoundOf16
        } else if pool > 4 {
            KnockoutRound::Quarterfinal
        } else if pool > 2 {
            KnockoutRound::Semifinal
        } else {
            KnockoutRound::Final
        }
    }
}

impl std::fmt::Display for KnockoutRound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            KnockoutRound::RoundOf16 => "Round of 16",
            KnockoutRound::Quarterfinal => "Quarter-final",
            KnockoutRound::Semifinal => "Semi-final",
            KnockoutRound::Final => "Final",
            KnockoutRound::ThirdPlace => "Third place",
        };
        write!(f, "{}", label)
    }
}

/// Lifecycle of a knockout match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Completed,
}

/// A knockout match. `slot` is the bracket position within the round: the
/// winner of slot s feeds slot s/2 of the next round, on side s%2.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnockoutMatch {
    pub id: MatchId,
    pub round: KnockoutRound,
    pub slot: usize,
    /// None while the feeder pairing is still undecided.
    pub home: Option<TeamId>,
    pub away: Option<TeamId>,
    pub kickoff: DateTime<Utc>,
    pub score: Option<(u32, u32)>,
    pub winner: Option<TeamId>,
    pub status: MatchStatus,
}

impl KnockoutMatch {
    /// New empty match slot awaiting its feeders.
    pub fn new(round: KnockoutRound, slot: usize, kickoff: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            slot,
            home: None,
            away: None,
            kickoff,
            score: None,
            winner: None,
            status: MatchStatus::Scheduled,
        }
    }

    /// New first-round match with both teams already drawn.
    pub fn with_teams(
        round: KnockoutRound,
        slot: usize,
        home: TeamId,
        away: TeamId,
        kickoff: DateTime<Utc>,
    ) -> Self {
        Self {
            home: Some(home),
            away: Some(away),
            ..Self::new(round, slot, kickoff)
        }
    }
}
