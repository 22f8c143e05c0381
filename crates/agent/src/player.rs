//! The play pipeline implementation.

use std::sync::Arc;

use gofp_core::completion::{CompletionProvider, CompletionRequest};
use gofp_core::content::ContentSource;
use gofp_core::contract::{GardenContract, TransactionConfig, TxHash};
use gofp_core::decision::{Decision, extract_decision};
use gofp_core::prompt::build_prompt;
use tracing::{debug, info, warn};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The choice was submitted on-chain.
    Submitted { decision: Decision, tx_hash: TxHash },

    /// Dry run: the choice that would have been submitted.
    DryRun { decision: Decision },
}

impl PlayOutcome {
    pub fn decision(&self) -> &Decision {
        match self {
            PlayOutcome::Submitted { decision, .. } | PlayOutcome::DryRun { decision } => decision,
        }
    }
}

/// Plays one stage of a session on behalf of a token.
pub struct Player {
    /// The on-chain game
    contract: Arc<dyn GardenContract>,

    /// Where session content is fetched from
    content: Arc<dyn ContentSource>,

    /// The completion backend (live or canned)
    provider: Arc<dyn CompletionProvider>,

    /// The model to request
    model: String,

    /// Sender and fee settings for the write call
    transaction: TransactionConfig,

    /// Skip the write call
    dry_run: bool,
}

impl Player {
    /// Create a new player.
    pub fn new(
        contract: Arc<dyn GardenContract>,
        content: Arc<dyn ContentSource>,
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            contract,
            content,
            provider,
            model: model.into(),
            transaction: TransactionConfig::default(),
            dry_run: false,
        }
    }

    /// Set the transaction settings used when submitting.
    pub fn with_transaction_config(mut self, config: TransactionConfig) -> Self {
        self.transaction = config;
        self
    }

    /// Decide without submitting.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the pipeline once. The first failing step ends the run.
    pub async fn play(&self, session_id: u64, token_id: u64) -> gofp_core::Result<PlayOutcome> {
        let session = self.contract.get_session(session_id).await?;
        session.ensure_playable(session_id)?;

        info!(
            session_id,
            stages = ?session.stages,
            uri = %session.uri,
            "Fetched session"
        );

        let stage_number = self.contract.get_current_stage(session_id).await?;
        debug!(session_id, stage_number, "Current stage (one-based)");

        let content = self.content.fetch(&session.uri).await?;
        if content.stages.len() != session.stages.len() {
            warn!(
                on_chain = session.stages.len(),
                in_content = content.stages.len(),
                "Stage count differs between contract and content"
            );
        }

        let stage = content.current_stage(session_id, stage_number)?;
        info!(
            session_id,
            stage = stage.stage,
            title = %content.title,
            stage_title = %stage.title,
            "Fetched session content"
        );

        let prompt = build_prompt(stage);
        debug!(%prompt, "Prompt for completion service");

        info!(provider = self.provider.name(), model = %self.model, "Asking to choose path");
        let raw = self
            .provider
            .complete(CompletionRequest::prompt(&self.model, prompt))
            .await?;

        let decision = extract_decision(&raw, stage.paths.len())?;
        info!(
            path = decision.path,
            description = %decision.description,
            "Bot answer"
        );

        if self.dry_run {
            info!(
                session_id,
                token_id,
                path = decision.one_based_path(),
                "Dry run, transaction not sent"
            );
            return Ok(PlayOutcome::DryRun { decision });
        }

        let tx_hash = self
            .contract
            .choose_current_stage_paths(
                session_id,
                &[token_id],
                &[decision.one_based_path()],
                &self.transaction,
            )
            .await?;
        info!(%tx_hash, "Successfully sent transaction");

        Ok(PlayOutcome::Submitted { decision, tx_hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedContent, ScriptedContract, ScriptedProvider, reply};
    use gofp_core::Error;
    use gofp_core::error::{ContentError, DecisionError, ProviderError, SessionError};
    use gofp_providers::CannedProvider;

    struct Fixture {
        contract: Arc<ScriptedContract>,
        content: Arc<ScriptedContent>,
        provider: Arc<ScriptedProvider>,
    }

    impl Fixture {
        fn new(provider: ScriptedProvider) -> Self {
            Self {
                contract: Arc::new(ScriptedContract::playable()),
                content: Arc::new(ScriptedContent::three_paths()),
                provider: Arc::new(provider),
            }
        }

        fn player(&self) -> Player {
            Player::new(
                self.contract.clone(),
                self.content.clone(),
                self.provider.clone(),
                "gpt-3.5-turbo",
            )
            .with_transaction_config(TransactionConfig {
                gas_limit: Some(300_000),
                ..TransactionConfig::default()
            })
        }
    }

    #[tokio::test]
    async fn submits_one_based_path() {
        let fx = Fixture::new(ScriptedProvider::new(reply(
            r#"{"answer": 2, "description": "the owl sees far"}"#,
        )));
        let outcome = fx.player().play(1, 42).await.unwrap();

        assert_eq!(outcome.decision().path, 2);
        assert!(matches!(outcome, PlayOutcome::Submitted { .. }));
        assert_eq!(fx.contract.submissions(), vec![(1, vec![42], vec![3])]);
    }

    #[tokio::test]
    async fn prompt_lists_current_stage_paths() {
        let fx = Fixture::new(ScriptedProvider::new(reply(
            r#"{"answer": 0, "description": "x"}"#,
        )));
        fx.player().play(1, 42).await.unwrap();

        let request = fx.provider.last_request().unwrap();
        assert_eq!(request.model, "gpt-3.5-turbo");
        let prompt = &request.messages[0].content;
        assert!(prompt.contains("- Path 0 - Copper hound"));
        assert!(prompt.contains("- Path 2 - Glass owl"));
        assert!(prompt.contains("The lore: Three beasts wait at the gate."));
    }

    #[tokio::test]
    async fn dry_run_never_writes() {
        let fx = Fixture::new(ScriptedProvider::new(reply(
            r#"{"answer": 1, "description": "x"}"#,
        )));
        let outcome = fx.player().with_dry_run(true).play(1, 42).await.unwrap();

        assert_eq!(
            outcome,
            PlayOutcome::DryRun {
                decision: Decision {
                    path: 1,
                    description: "x".into()
                }
            }
        );
        assert!(fx.contract.submissions().is_empty());
    }

    #[tokio::test]
    async fn inactive_session_stops_before_any_fetch() {
        let fx = Fixture {
            contract: Arc::new(ScriptedContract::with_flags(false, true)),
            ..Fixture::new(ScriptedProvider::new(reply("{}")))
        };
        let err = fx.player().play(1, 42).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Session(SessionError::Inactive { session_id: 1 })
        ));
        assert_eq!(fx.contract.stage_reads(), 0);
        assert_eq!(fx.content.fetches(), 0);
        assert_eq!(fx.provider.calls(), 0);
        assert!(fx.contract.submissions().is_empty());
    }

    #[tokio::test]
    async fn choosing_inactive_session_stops() {
        let fx = Fixture {
            contract: Arc::new(ScriptedContract::with_flags(true, false)),
            ..Fixture::new(ScriptedProvider::new(reply("{}")))
        };
        let err = fx.player().play(1, 42).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Session(SessionError::ChoosingInactive { .. })
        ));
        assert_eq!(fx.content.fetches(), 0);
        assert_eq!(fx.provider.calls(), 0);
    }

    #[tokio::test]
    async fn content_failure_stops_before_completion() {
        let fx = Fixture {
            content: Arc::new(ScriptedContent::failing()),
            ..Fixture::new(ScriptedProvider::new(reply("{}")))
        };
        let err = fx.player().play(1, 42).await.unwrap_err();

        assert!(matches!(err, Error::Content(ContentError::Status { .. })));
        assert_eq!(fx.provider.calls(), 0);
    }

    #[tokio::test]
    async fn provider_failure_stops_before_submission() {
        let fx = Fixture::new(ScriptedProvider::failing());
        let err = fx.player().play(1, 42).await.unwrap_err();

        assert!(matches!(err, Error::Provider(ProviderError::RateLimited)));
        assert!(fx.contract.submissions().is_empty());
    }

    #[tokio::test]
    async fn malformed_reply_never_writes() {
        let fx = Fixture::new(ScriptedProvider::new(reply("The Copper hound, obviously.")));
        let err = fx.player().play(1, 42).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Decision(DecisionError::MalformedReply { .. })
        ));
        assert!(fx.contract.submissions().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_answer_never_writes() {
        let fx = Fixture::new(ScriptedProvider::new(reply(
            r#"{"answer": 3, "description": "the fourth beast"}"#,
        )));
        let err = fx.player().play(1, 42).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Decision(DecisionError::PathOutOfRange {
                path: 3,
                available: 3
            })
        ));
        assert!(fx.contract.submissions().is_empty());
    }

    #[tokio::test]
    async fn unstarted_game_has_no_stage() {
        let fx = Fixture {
            contract: Arc::new(ScriptedContract::playable().at_stage(0)),
            ..Fixture::new(ScriptedProvider::new(reply("{}")))
        };
        let err = fx.player().play(1, 42).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Session(SessionError::NoActiveStage { .. })
        ));
        assert_eq!(fx.provider.calls(), 0);
    }

    #[tokio::test]
    async fn canned_provider_picks_first_path() {
        let contract = Arc::new(ScriptedContract::playable());
        let player = Player::new(
            contract.clone(),
            Arc::new(ScriptedContent::three_paths()),
            Arc::new(CannedProvider),
            "gpt-3.5-turbo",
        )
        .with_dry_run(true);

        let outcome = player.play(1, 42).await.unwrap();
        assert_eq!(outcome.decision().path, 0);
        assert!(contract.submissions().is_empty());
    }

    #[tokio::test]
    async fn submission_failure_propagates() {
        let fx = Fixture::new(ScriptedProvider::new(reply(
            r#"{"answer": 0, "description": "x"}"#,
        )));
        let fx = Fixture {
            contract: Arc::new(ScriptedContract::playable().without_signer()),
            ..fx
        };
        let err = fx.player().play(1, 42).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Contract(gofp_core::error::ContractError::MissingSender)
        ));
    }
}
