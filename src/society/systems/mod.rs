//! Per-step simulation systems

pub mod economy;
pub mod generation;
pub mod learning;
pub mod resolution;
pub mod sanctions;
pub mod voting;

pub use economy::{apply_attribution_bias, collect_and_redistribute_tax, update_wealth_and_power};
pub use generation::build_members;
pub use learning::{run_class_mobility, run_ideology_conversion, run_imitation};
pub use resolution::run_round_event;
pub use sanctions::apply_ideology_sanctions;
pub use voting::run_policy_votes;
