//! Entry-fee record: the payment fact participation is gated on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The fee a team owes to take part. At most one per team; a team with no
/// record at all is treated as not eligible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryFee {
    pub amount: f64,
    pub paid: bool,
    /// Payment deadline; None means the paid flag alone decides.
    pub deadline: Option<NaiveDate>,
    /// When the fee was marked paid.
    pub paid_at: Option<DateTime<Utc>>,
}

impl EntryFee {
    /// New unpaid fee with an optional deadline.
    pub fn new(amount: f64, deadline: Option<NaiveDate>) -> Self {
        Self {
            amount,
            paid: false,
            deadline,
            paid_at: None,
        }
    }
}
