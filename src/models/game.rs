//! Group-stage match with a write-once score.

use crate::models::group::GroupId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match (group stage or knockout).
pub type MatchId = Uuid;

/// A single group-stage match. Home/away ordering is for display only;
/// scoring treats both sides symmetrically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupMatch {
    pub id: MatchId,
    pub home: TeamId,
    pub away: TeamId,
    pub group: GroupId,
    pub kickoff: DateTime<Utc>,
    /// None until played; Some((home, away)) once recorded. Results are
    /// write-once, there is no partially-scored state.
    pub score: Option<(u32, u32)>,
}

impl GroupMatch {
    pub fn new(home: TeamId, away: TeamId, group: GroupId, kickoff: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            home,
            away,
            group,
            kickoff,
            score: None,
        }
    }
}
