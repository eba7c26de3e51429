//! Team and squad roster data structures.

use crate::models::group::GroupId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches, standings and lookups).
pub type TeamId = Uuid;

/// Unique identifier for a squad member.
pub type SquadMemberId = Uuid;

/// Maximum roster size per team.
pub const MAX_SQUAD_SIZE: usize = 30;

/// Field position of a squad member.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Coach,
    Substitute,
}

/// A registered player on a team's roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SquadMember {
    pub id: SquadMemberId,
    pub name: String,
    /// Shirt number; unique within the team.
    pub number: u8,
    pub position: Position,
}

impl SquadMember {
    pub fn new(name: impl Into<String>, number: u8, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            number,
            position,
        }
    }
}

/// A team entered into a tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Group the team was drawn into; None until a draw has run.
    pub group: Option<GroupId>,
    /// Display number assigned at draw time (not a key, uniqueness not enforced).
    pub number: Option<u8>,
    /// Roster; capped at MAX_SQUAD_SIZE, shirt numbers unique per team.
    pub players: Vec<SquadMember>,
}

impl Team {
    /// Create a new team with the given name. Undrawn, empty roster.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            group: None,
            number: None,
            players: Vec::new(),
        }
    }
}
