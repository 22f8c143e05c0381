//! The play pipeline, one decision per run.
//!
//! The pipeline is strictly linear:
//!
//! 1. **Read** the session from the contract and check it accepts choices
//! 2. **Resolve** the current stage (contract stages are one-based)
//! 3. **Fetch** the stage's narrative content from the session URI
//! 4. **Prompt** the completion service with the stage lore and paths
//! 5. **Validate** the reply into a bounded [`gofp_core::Decision`]
//! 6. **Submit** the one-based path on-chain, unless this is a dry run
//!
//! Every remote call is made at most once. Any failure ends the run.

pub mod player;
#[cfg(test)]
mod test_helpers;

pub use player::{PlayOutcome, Player};
