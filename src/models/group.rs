//! Group entity for the round-robin stage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// A lettered group ("Group A", "Group B", ...). Immutable after creation;
/// membership lives on `Team::group`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
