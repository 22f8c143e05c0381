//! Garden of Forking Paths contract client.
//!
//! Bindings are generated from the contract interface with `alloy::sol!`.
//! Reads go through `eth_call`. The path choice is signed locally with a
//! keystore or private-key account and broadcast with
//! `eth_sendRawTransaction`, so any public node can carry it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌───────────────────┐
//! │ GardenClient │───▶│ alloy provider    │───▶ node
//! │ (IGarden)    │    │ + EthereumWallet  │
//! └──────────────┘    └───────────────────┘
//!        ▲
//!        │ PrivateKeySigner
//! ┌──────────────┐
//! │ signer       │ keystore file / private key
//! └──────────────┘
//! ```

mod garden;
pub mod signer;

pub use garden::{GardenClient, IGarden};
