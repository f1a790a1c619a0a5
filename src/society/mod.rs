//! Synthetic society simulation
//!
//! A fixed population of members interacts over discrete rounds through
//! stochastic events, biased reward attribution, taxation, social
//! sanctions, imitation learning, ideology conversion and elite
//! policy-making. Produces one serializable snapshot per round.

pub mod events;
pub mod member;
pub mod policy;
pub mod population;
pub mod simulation;
pub mod snapshot;
pub mod stats;
pub mod systems;

pub use events::{EventKind, EventLog, SimEvent};
pub use member::{Member, SanctionEffect};
pub use policy::{PolicyLever, PolicyLevers};
pub use population::Society;
pub use simulation::{simulate, Simulation};
pub use snapshot::{MemberRecord, RoundSnapshot, SimulationOutput, SimulationSummary};
pub use stats::Statistics;
