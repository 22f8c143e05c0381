//! Scripted collaborators for pipeline tests.

use gofp_core::completion::{CompletionProvider, CompletionRequest};
use gofp_core::content::ContentSource;
use gofp_core::contract::{Address, GardenContract, TransactionConfig, TxHash, U256};
use gofp_core::error::{ContentError, ContractError, ProviderError};
use gofp_core::session::{PathData, SessionData, SessionInfo, StageData};
use std::sync::Mutex;

/// A single-choice completion response carrying `content`.
pub fn reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop",
            "index": 0
        }]
    })
}

/// A contract with a fixed session that records every submission.
pub struct ScriptedContract {
    session: SessionInfo,
    stage: u64,
    has_signer: bool,
    stage_reads: Mutex<usize>,
    submissions: Mutex<Vec<(u64, Vec<u64>, Vec<u64>)>>,
}

impl ScriptedContract {
    pub fn with_flags(is_active: bool, is_choosing_active: bool) -> Self {
        Self {
            session: SessionInfo {
                player_token_address: Address::repeat_byte(1),
                payment_token_address: Address::ZERO,
                payment_amount: U256::ZERO,
                is_active,
                is_choosing_active,
                uri: "https://example.com/session.json".into(),
                stages: vec![U256::from(3)],
                is_forgiving: false,
            },
            stage: 1,
            has_signer: true,
            stage_reads: Mutex::new(0),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn playable() -> Self {
        Self::with_flags(true, true)
    }

    pub fn at_stage(mut self, stage: u64) -> Self {
        self.stage = stage;
        self
    }

    /// A contract client with no signing account.
    pub fn without_signer(mut self) -> Self {
        self.has_signer = false;
        self
    }

    pub fn stage_reads(&self) -> usize {
        *self.stage_reads.lock().unwrap()
    }

    pub fn submissions(&self) -> Vec<(u64, Vec<u64>, Vec<u64>)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GardenContract for ScriptedContract {
    async fn get_session(&self, _session_id: u64) -> Result<SessionInfo, ContractError> {
        Ok(self.session.clone())
    }

    async fn get_current_stage(&self, _session_id: u64) -> Result<u64, ContractError> {
        *self.stage_reads.lock().unwrap() += 1;
        Ok(self.stage)
    }

    async fn choose_current_stage_paths(
        &self,
        session_id: u64,
        token_ids: &[u64],
        paths: &[u64],
        _config: &TransactionConfig,
    ) -> Result<TxHash, ContractError> {
        if !self.has_signer {
            return Err(ContractError::MissingSender);
        }
        self.submissions
            .lock()
            .unwrap()
            .push((session_id, token_ids.to_vec(), paths.to_vec()));
        Ok(TxHash::repeat_byte(0xab))
    }
}

/// Content with one stage of three paths, or a failing fetch.
pub struct ScriptedContent {
    data: Option<SessionData>,
    fetches: Mutex<usize>,
}

impl ScriptedContent {
    pub fn three_paths() -> Self {
        let paths = ["Copper hound", "Iron hound", "Glass owl"]
            .iter()
            .enumerate()
            .map(|(path, title)| PathData {
                path,
                title: (*title).into(),
                lore: format!("The {title} waits."),
                image_url: format!("https://example.com/{path}.png"),
            })
            .collect();

        Self {
            data: Some(SessionData {
                title: "The Garden".into(),
                lore: "A garden of forking paths.".into(),
                image_url: "https://example.com/garden.png".into(),
                stages: vec![StageData {
                    stage: 0,
                    title: "The Gate".into(),
                    lore: "Three beasts wait at the gate.".into(),
                    image_url: "https://example.com/gate.png".into(),
                    paths,
                }],
            }),
            fetches: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            data: None,
            fetches: Mutex::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ContentSource for ScriptedContent {
    async fn fetch(&self, uri: &str) -> Result<SessionData, ContentError> {
        *self.fetches.lock().unwrap() += 1;
        self.data.clone().ok_or_else(|| ContentError::Status {
            uri: uri.to_string(),
            status_code: 404,
        })
    }
}

/// A provider returning one scripted response and remembering the request.
pub struct ScriptedProvider {
    response: Option<serde_json::Value>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(response: serde_json::Value) -> Self {
        Self {
            response: Some(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.response.clone().ok_or(ProviderError::RateLimited)
    }
}
