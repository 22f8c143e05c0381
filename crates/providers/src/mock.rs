//! Canned completion provider used by `--mock`.
//!
//! Returns a fixed, recorded chat-completion response without touching the
//! network, so the rest of the pipeline can be exercised offline.

use async_trait::async_trait;
use gofp_core::completion::{CompletionProvider, CompletionRequest};
use gofp_core::error::ProviderError;
use serde_json::json;
use tracing::debug;

/// Choice content of the canned response.
pub const CANNED_REPLY: &str = "{\n    \"answer\": 0,\n    \"description\": \"I would back the Copper hound because it has a useful skill that people could benefit from by sniffing out copper deposits. Additionally, they seem to be domesticated dogs so they may be more manageable than some of the other creatures. The downside is that they are not the most pleasant smelling animals and can be quite loud.\"\n}";

/// The recorded response object.
pub fn canned_response() -> serde_json::Value {
    json!({
        "id": "chatcmpl-422",
        "object": "chat.completion",
        "created": 1681311158,
        "model": "gpt-3.5-turbo-0301",
        "usage": {"prompt_tokens": 825, "completion_tokens": 78, "total_tokens": 903},
        "choices": [
            {
                "message": {
                    "role": "assistant",
                    "content": CANNED_REPLY,
                },
                "finish_reason": "stop",
                "index": 0,
            }
        ],
    })
}

/// Provider that always answers with [`canned_response`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedProvider;

#[async_trait]
impl CompletionProvider for CannedProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<serde_json::Value, ProviderError> {
        debug!(model = %request.model, "Answering with canned completion");
        Ok(canned_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gofp_core::decision::extract_decision;

    #[tokio::test]
    async fn canned_response_chooses_first_path() {
        let raw = CannedProvider
            .complete(CompletionRequest::prompt("gpt-3.5-turbo", "anything"))
            .await
            .unwrap();
        assert_eq!(raw["id"], "chatcmpl-422");
        assert_eq!(raw["choices"].as_array().unwrap().len(), 1);

        let decision = extract_decision(&raw, 3).unwrap();
        assert_eq!(decision.path, 0);
        assert!(decision.description.starts_with("I would back the Copper hound"));
    }
}
