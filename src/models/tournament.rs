//! Tournament aggregate and TournamentError.

use crate::models::eligibility::EntryFee;
use crate::models::game::{GroupMatch, MatchId};
use crate::models::group::{Group, GroupId};
use crate::models::knockout::{KnockoutMatch, KnockoutRound};
use crate::models::standings::StandingsRow;
use crate::models::team::{Position, SquadMember, SquadMemberId, Team, TeamId, MAX_SQUAD_SIZE};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Draw attempted while one or more teams have not settled their entry
    /// fee; carries the offending team names. Nothing is mutated.
    IneligibleTeams(Vec<String>),
    /// Team name is empty after trimming.
    InvalidTeamName,
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    /// Team not found in this tournament.
    TeamNotFound(TeamId),
    /// Team cannot be removed while matches reference it.
    TeamHasMatches(TeamId),
    /// Group not found in this tournament.
    GroupNotFound(GroupId),
    /// Match not found in this tournament.
    MatchNotFound(MatchId),
    /// The match already has a recorded result; results are write-once.
    DuplicateResult,
    /// Equal scores are not a valid terminal state for a knockout match.
    UnresolvedTie,
    /// Knockout match still waiting for a feeder result on one side.
    MatchNotReady,
    /// A bracket has already been generated for this tournament.
    BracketAlreadyExists,
    /// Shirt number already taken within the team.
    DuplicateShirtNumber { number: u8 },
    /// Roster is at its maximum size.
    SquadFull,
    /// Squad member not found on the team.
    SquadMemberNotFound(SquadMemberId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::IneligibleTeams(names) => {
                write!(f, "Teams not eligible (entry fee unsettled): {}", names.join(", "))
            }
            TournamentError::InvalidTeamName => write!(f, "Team name cannot be empty"),
            TournamentError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::TeamHasMatches(_) => {
                write!(f, "Team cannot be removed while matches reference it")
            }
            TournamentError::GroupNotFound(_) => write!(f, "Group not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::DuplicateResult => write!(f, "Match already has a recorded result"),
            TournamentError::UnresolvedTie => {
                write!(f, "A knockout match cannot end level; decide it before recording")
            }
            TournamentError::MatchNotReady => {
                write!(f, "Match is still waiting for a qualifier from an earlier round")
            }
            TournamentError::BracketAlreadyExists => {
                write!(f, "The knockout bracket has already been generated")
            }
            TournamentError::DuplicateShirtNumber { number } => {
                write!(f, "Shirt number {} is already taken in this team", number)
            }
            TournamentError::SquadFull => {
                write!(f, "Squad limit of {} players reached", MAX_SQUAD_SIZE)
            }
            TournamentError::SquadMemberNotFound(_) => write!(f, "Player not found in this team"),
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// What to do with the last qualifier when the pool has odd size.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddQualifierPolicy {
    /// Seed the leftover team straight into its next-round slot.
    #[default]
    Bye,
    /// Leave the leftover team out of the bracket (logged, not silent).
    Drop,
}

fn default_number_range() -> (u8, u8) {
    (1, 99)
}

/// Full tournament state: teams, groups, fees, fixtures, standings, bracket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Group size used by the draw (group count = ceil(teams / this)).
    pub teams_per_group: usize,
    /// Teams advancing from each group into the knockout stage.
    pub qualifiers_per_group: usize,
    /// Display-number range assigned at draw time.
    #[serde(default = "default_number_range")]
    pub number_range: (u8, u8),
    #[serde(default)]
    pub odd_qualifier_policy: OddQualifierPolicy,
    pub teams: Vec<Team>,
    pub groups: Vec<Group>,
    /// At most one fee record per team; absence blocks eligibility.
    pub entry_fees: HashMap<TeamId, EntryFee>,
    /// Group-stage fixtures.
    pub matches: Vec<GroupMatch>,
    /// One row per (group, team) with at least one recorded result.
    pub standings: Vec<StandingsRow>,
    pub knockout: Vec<KnockoutMatch>,
    /// First bracket round; set once when the bracket is generated.
    pub bracket_first_round: Option<KnockoutRound>,
    /// First-round slot count including a bye slot, for feeder bookkeeping.
    #[serde(default)]
    pub bracket_slot_count: usize,
}

impl Tournament {
    /// Create a new tournament with the given draw/qualification configuration.
    pub fn new(name: impl Into<String>, teams_per_group: usize, qualifiers_per_group: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            teams_per_group: teams_per_group.max(1),
            qualifiers_per_group: qualifiers_per_group.max(1),
            number_range: default_number_range(),
            odd_qualifier_policy: OddQualifierPolicy::default(),
            teams: Vec::new(),
            groups: Vec::new(),
            entry_fees: HashMap::new(),
            matches: Vec::new(),
            standings: Vec::new(),
            knockout: Vec::new(),
            bracket_first_round: None,
            bracket_slot_count: 0,
        }
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Ids of the teams drawn into the given group, in registration order.
    pub fn group_members(&self, group: GroupId) -> Vec<TeamId> {
        self.teams
            .iter()
            .filter(|t| t.group == Some(group))
            .map(|t| t.id)
            .collect()
    }

    /// Register a team. Names are trimmed and unique (case-insensitive).
    pub fn add_team(&mut self, name: impl Into<String>) -> Result<TeamId, TournamentError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TournamentError::InvalidTeamName);
        }
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(trimmed)) {
            return Err(TournamentError::DuplicateTeamName);
        }
        let team = Team::new(trimmed);
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    /// Rename a team (same uniqueness rule as registration).
    pub fn rename_team(&mut self, id: TeamId, name: impl Into<String>) -> Result<(), TournamentError> {
        let name = name.into();
        let trimmed = name.trim().to_string();
        if trimmed.is_empty() {
            return Err(TournamentError::InvalidTeamName);
        }
        if self
            .teams
            .iter()
            .any(|t| t.id != id && t.name.eq_ignore_ascii_case(&trimmed))
        {
            return Err(TournamentError::DuplicateTeamName);
        }
        let team = self.team_mut(id).ok_or(TournamentError::TeamNotFound(id))?;
        team.name = trimmed;
        Ok(())
    }

    /// Remove a team. Refused once any match (group or knockout) references it.
    pub fn remove_team(&mut self, id: TeamId) -> Result<(), TournamentError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == id)
            .ok_or(TournamentError::TeamNotFound(id))?;
        let in_group_stage = self.matches.iter().any(|m| m.home == id || m.away == id);
        let in_bracket = self
            .knockout
            .iter()
            .any(|m| m.home == Some(id) || m.away == Some(id));
        if in_group_stage || in_bracket {
            return Err(TournamentError::TeamHasMatches(id));
        }
        self.teams.remove(idx);
        self.entry_fees.remove(&id);
        Ok(())
    }

    /// Set (or update) a team's entry fee and deadline. An existing paid flag
    /// and payment timestamp are preserved.
    pub fn set_entry_fee(
        &mut self,
        team: TeamId,
        amount: f64,
        deadline: Option<NaiveDate>,
    ) -> Result<(), TournamentError> {
        if self.team(team).is_none() {
            return Err(TournamentError::TeamNotFound(team));
        }
        self.entry_fees
            .entry(team)
            .and_modify(|fee| {
                fee.amount = amount;
                fee.deadline = deadline;
            })
            .or_insert_with(|| EntryFee::new(amount, deadline));
        Ok(())
    }

    /// Mark a team's entry fee as paid at the given time.
    pub fn mark_fee_paid(&mut self, team: TeamId, now: DateTime<Utc>) -> Result<(), TournamentError> {
        let fee = self
            .entry_fees
            .get_mut(&team)
            .ok_or(TournamentError::TeamNotFound(team))?;
        fee.paid = true;
        fee.paid_at = Some(now);
        Ok(())
    }

    /// Add a player to a team's roster. Shirt numbers are unique within the
    /// team and the squad is capped.
    pub fn add_squad_member(
        &mut self,
        team: TeamId,
        name: impl Into<String>,
        number: u8,
        position: Position,
    ) -> Result<SquadMemberId, TournamentError> {
        let team = self.team_mut(team).ok_or(TournamentError::TeamNotFound(team))?;
        if team.players.iter().any(|p| p.number == number) {
            return Err(TournamentError::DuplicateShirtNumber { number });
        }
        if team.players.len() >= MAX_SQUAD_SIZE {
            return Err(TournamentError::SquadFull);
        }
        let member = SquadMember::new(name, number, position);
        let id = member.id;
        team.players.push(member);
        Ok(id)
    }

    pub fn remove_squad_member(
        &mut self,
        team: TeamId,
        member: SquadMemberId,
    ) -> Result<(), TournamentError> {
        let team = self.team_mut(team).ok_or(TournamentError::TeamNotFound(team))?;
        let idx = team
            .players
            .iter()
            .position(|p| p.id == member)
            .ok_or(TournamentError::SquadMemberNotFound(member))?;
        team.players.remove(idx);
        Ok(())
    }

    /// Knockout matches ordered for display: by round, then bracket slot.
    pub fn bracket(&self) -> Vec<&KnockoutMatch> {
        let mut rounds: Vec<&KnockoutMatch> = self.knockout.iter().collect();
        rounds.sort_by_key(|m| (m.round, m.slot));
        rounds
    }
}
