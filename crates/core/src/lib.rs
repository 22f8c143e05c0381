//! # GOFP Core
//!
//! Domain types, collaborator traits, and error definitions for the
//! Garden of Forking Paths bot. This crate has **no I/O**: it defines the
//! domain model and the decision logic that every other crate builds on.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (the on-chain contract, the content URI, the
//! completion service) is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping a live service for a canned one (mock mode)
//! - Easy testing with scripted in-memory collaborators
//! - Clean dependency graph (all crates depend inward on core)
//!
//! The two pieces of real logic also live here: [`prompt::build_prompt`]
//! renders the active stage into an instruction, and
//! [`decision::extract_decision`] turns the untrusted reply back into a
//! bounded [`Decision`].

pub mod completion;
pub mod content;
pub mod contract;
pub mod decision;
pub mod error;
pub mod prompt;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use completion::{ChatMessage, CompletionProvider, CompletionRequest, Role};
pub use content::ContentSource;
pub use contract::{Address, GardenContract, TransactionConfig, TxHash, U256};
pub use decision::{Decision, extract_decision};
pub use error::{Error, Result};
pub use prompt::build_prompt;
pub use session::{PathData, SessionData, SessionInfo, StageData};
