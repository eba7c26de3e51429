//! Tournament organizer web app: library with models and scheduling logic.

pub mod logic;
pub mod models;

pub use logic::{
    draw_groups, generate_all_fixtures, generate_bracket, generate_group_fixtures, group_table,
    is_eligible, record_knockout_result, record_result,
};
pub use models::{
    EntryFee, Group, GroupId, GroupMatch, KnockoutMatch, KnockoutRound, MatchId, MatchStatus,
    OddQualifierPolicy, Position, SquadMember, SquadMemberId, StandingsRow, Team, TeamId,
    Tournament, TournamentError, TournamentId, MAX_SQUAD_SIZE,
};
