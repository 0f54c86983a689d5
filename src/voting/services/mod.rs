//! Application services for both voting subsystems.

mod binary;
mod session;

pub use binary::{BinaryResolution, BinaryVotingService};
pub use session::{SessionOutcome, SessionVotingService};
