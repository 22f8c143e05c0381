//! Session domain types.
//!
//! [`SessionInfo`] is the on-chain snapshot of a session; [`SessionData`] is
//! the narrative content fetched from the session's URI. Stage and path
//! indices are positional: the order of `stages` and `paths` in the content
//! document defines the index space, not any identifier embedded in it.

use serde::Deserialize;

use crate::contract::{Address, U256};
use crate::error::{ContentError, SessionError};

/// Snapshot of a session's on-chain configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub player_token_address: Address,
    pub payment_token_address: Address,
    pub payment_amount: U256,
    pub is_active: bool,
    pub is_choosing_active: bool,
    pub uri: String,
    pub stages: Vec<U256>,
    pub is_forgiving: bool,
}

impl SessionInfo {
    /// Fail unless the session is live and accepting path choices.
    pub fn ensure_playable(&self, session_id: u64) -> Result<(), SessionError> {
        if !self.is_active {
            return Err(SessionError::Inactive { session_id });
        }
        if !self.is_choosing_active {
            return Err(SessionError::ChoosingInactive { session_id });
        }
        Ok(())
    }
}

/// Narrative content of a whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub title: String,
    pub lore: String,
    pub image_url: String,
    pub stages: Vec<StageData>,
}

/// One stage's narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageData {
    /// Zero-based stage index
    pub stage: usize,
    pub title: String,
    pub lore: String,
    pub image_url: String,
    pub paths: Vec<PathData>,
}

/// One selectable branch within a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathData {
    /// Zero-based position within the stage's paths
    pub path: usize,
    pub title: String,
    pub lore: String,
    pub image_url: String,
}

// --- Wire format of the content document ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSession {
    title: String,
    lore: String,
    image_url: String,
    stages: Vec<RawStage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStage {
    title: String,
    lore: String,
    image_url: String,
    paths: Vec<RawPath>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPath {
    title: String,
    lore: String,
    image_url: String,
}

impl SessionData {
    /// Build session content from the JSON document served at the session URI.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ContentError> {
        let raw: RawSession =
            serde_json::from_value(value).map_err(|e| ContentError::Malformed(e.to_string()))?;

        let stages = raw
            .stages
            .into_iter()
            .enumerate()
            .map(|(stage, s)| StageData {
                stage,
                title: s.title,
                lore: s.lore,
                image_url: s.image_url,
                paths: s
                    .paths
                    .into_iter()
                    .enumerate()
                    .map(|(path, p)| PathData {
                        path,
                        title: p.title,
                        lore: p.lore,
                        image_url: p.image_url,
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            title: raw.title,
            lore: raw.lore,
            image_url: raw.image_url,
            stages,
        })
    }

    /// Resolve the stage the contract reports as current.
    ///
    /// The contract numbers stages from 1 (0 means the game has not started);
    /// the returned stage carries the zero-based index used everywhere else.
    pub fn current_stage(
        &self,
        session_id: u64,
        one_based_stage: u64,
    ) -> Result<&StageData, SessionError> {
        let Some(stage) = one_based_stage.checked_sub(1) else {
            return Err(SessionError::NoActiveStage { session_id });
        };
        let stage = usize::try_from(stage).unwrap_or(usize::MAX);
        self.stages.get(stage).ok_or(SessionError::StageOutOfRange {
            stage,
            available: self.stages.len(),
        })
    }
}
