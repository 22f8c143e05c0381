//! Error types for the bot's domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each stage of the play pipeline has its own error enum so operators can
//! tell a dead session from a flaky service from a non-compliant reply.

use thiserror::Error;

/// The top-level error type for all bot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Session-state errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    // --- Content fetch errors ---
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    // --- Completion service errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Reply shape errors ---
    #[error("Decision error: {0}")]
    Decision(#[from] DecisionError),

    // --- Chain errors ---
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session {session_id} is not active")]
    Inactive { session_id: u64 },

    #[error("Session {session_id} is not ready to accept choosing")]
    ChoosingInactive { session_id: u64 },

    #[error("Session {session_id} has no active stage yet")]
    NoActiveStage { session_id: u64 },

    #[error("Stage {stage} is out of range, content has {available} stage(s)")]
    StageOutOfRange { stage: usize, available: usize },
}

#[derive(Debug, Clone, Error)]
pub enum ContentError {
    #[error("Unable to get response from URI {uri}: {reason}")]
    Network { uri: String, reason: String },

    #[error("URI {uri} returned status {status_code}")]
    Status { uri: String, status_code: u16 },

    #[error("Malformed session content: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response body is not JSON: {0}")]
    InvalidResponse(String),
}

/// Failures of the response validator.
///
/// The first two variants mean the service answered in a structurally odd
/// way; `MalformedReply` means it answered once but ignored the format;
/// `PathOutOfRange` means the format was fine but the answer names no path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("Completion response contains no choices")]
    EmptyChoices,

    #[error("Expected exactly one textual reply, got {count}")]
    UnexpectedReplyCount { count: usize },

    #[error("Reply is not in the agreed format ({reason}): {reply}")]
    MalformedReply { reply: String, reason: String },

    #[error("Path {path} is out of range, stage has {available} path(s)")]
    PathOutOfRange { path: i128, available: usize },
}

#[derive(Debug, Clone, Error)]
pub enum ContractError {
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC transport failed: {0}")]
    Transport(String),

    #[error("Unexpected contract data: {0}")]
    Abi(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unable to load signing account: {0}")]
    Signer(String),

    #[error("No signing account configured for the transaction")]
    MissingSender,
}
