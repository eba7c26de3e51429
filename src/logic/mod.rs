//! Tournament scheduling logic: eligibility, draw, fixtures, standings, knockout.

mod draw;
mod eligibility;
mod fixtures;
mod knockout;
mod standings;

pub use draw::draw_groups;
pub use eligibility::is_eligible;
pub use fixtures::{generate_all_fixtures, generate_group_fixtures};
pub use knockout::{generate_bracket, record_knockout_result};
pub use standings::{group_table, record_result};
