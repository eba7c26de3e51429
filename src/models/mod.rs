//! Data structures for the tournament: teams, groups, fees, matches, standings.

mod eligibility;
mod game;
mod group;
mod knockout;
mod standings;
mod team;
mod tournament;

pub use eligibility::EntryFee;
pub use game::{GroupMatch, MatchId};
pub use group::{Group, GroupId};
pub use knockout::{KnockoutMatch, KnockoutRound, MatchStatus};
pub use standings::StandingsRow;
pub use team::{Position, SquadMember, SquadMemberId, Team, TeamId, MAX_SQUAD_SIZE};
pub use tournament::{OddQualifierPolicy, Tournament, TournamentError, TournamentId};
