//! Eligibility gate: may a team take part in the draw?

use crate::models::EntryFee;
use chrono::NaiveDate;

/// Pure predicate over the team's entry-fee record. A team with no record is
/// blocked. With a record and no deadline the paid flag alone decides; with a
/// deadline the fee must be paid and the deadline not yet passed (inclusive).
///
/// Evaluated live right before a draw; payment can happen at any time, so the
/// verdict is never cached.
pub fn is_eligible(fee: Option<&EntryFee>, today: NaiveDate) -> bool {
    match fee {
        None => false,
        Some(fee) => match fee.deadline {
            None => fee.paid,
            Some(deadline) => fee.paid && deadline >= today,
        },
    }
}
