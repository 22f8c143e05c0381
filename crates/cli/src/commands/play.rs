use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;
use clap::Args;
use gofp_agent::{PlayOutcome, Player};
use gofp_config::AppConfig;
use gofp_contracts::{GardenClient, signer};
use gofp_core::completion::CompletionProvider;
use gofp_core::contract::{Address, TransactionConfig, parse_amount};
use gofp_core::error::ContractError;
use gofp_providers::{CannedProvider, HttpContentSource, OpenAiCompatProvider};
use tracing::info;

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Network name from the config, or an RPC URL
    #[arg(short, long)]
    pub network: String,

    /// Garden contract address
    #[arg(short, long)]
    pub address: Address,

    /// Session ID
    #[arg(short, long)]
    pub session: u64,

    /// Token ID to choose the path for
    #[arg(short, long)]
    pub token: u64,

    /// Use a canned completion response instead of the live service
    #[arg(long)]
    pub mock: bool,

    /// Decide but do not submit the transaction
    #[arg(long)]
    pub dry_run: bool,

    /// Keystore account to send the transaction from (name or file path)
    #[arg(long)]
    pub sender: Option<String>,

    /// Keystore password
    #[arg(long, env = "GCB_KEYSTORE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Hex private key to sign with when no keystore account is given
    #[arg(long, env = "GCB_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Gas limit for the transaction
    #[arg(long)]
    pub gas_limit: Option<u64>,

    /// Legacy gas price, e.g. "40 gwei"
    #[arg(long, value_parser = parse_amount)]
    pub gas_price: Option<u128>,

    /// EIP-1559 max fee per gas, e.g. "60 gwei"
    #[arg(long, value_parser = parse_amount)]
    pub max_fee_per_gas: Option<u128>,

    /// EIP-1559 max priority fee per gas, e.g. "2 gwei"
    #[arg(long, value_parser = parse_amount)]
    pub max_priority_fee_per_gas: Option<u128>,

    /// Explicit account nonce
    #[arg(long)]
    pub nonce: Option<u64>,
}

impl PlayArgs {
    /// Command-line settings over config defaults.
    fn transaction_config(&self, config: &AppConfig) -> TransactionConfig {
        TransactionConfig {
            gas_limit: self.gas_limit.or(config.transaction.gas_limit),
            gas_price: self.gas_price,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            nonce: self.nonce,
        }
    }

    /// The signing account: `--sender`, then `--private-key`, then the
    /// config's default keystore account.
    fn load_signer(
        &self,
        config: &AppConfig,
        chain_id: Option<u64>,
    ) -> Result<Option<PrivateKeySigner>, ContractError> {
        let keystore = |sender: &str| {
            let password = self.password.as_deref().ok_or_else(|| {
                ContractError::Signer(format!(
                    "keystore {sender} needs a password (--password or GCB_KEYSTORE_PASSWORD)"
                ))
            })?;
            signer::from_keystore(&config.keystore_path(sender), password, chain_id)
        };

        if let Some(sender) = &self.sender {
            return keystore(sender).map(Some);
        }
        if let Some(key) = &self.private_key {
            return signer::from_private_key(key, chain_id).map(Some);
        }
        config.transaction.sender.as_deref().map(keystore).transpose()
    }
}

pub async fn run(config: &AppConfig, args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let transaction = args.transaction_config(config);
    let network = config.resolve_network(&args.network)?;

    let signer = if args.dry_run {
        None
    } else {
        let signer = args
            .load_signer(config, network.chain_id)?
            .ok_or(ContractError::MissingSender)?;
        info!(sender = %signer.address(), "Signing with local account");
        Some(signer)
    };

    info!(
        network = %args.network,
        rpc_url = %network.rpc_url,
        contract = %args.address,
        "Connecting to Garden contract"
    );

    let contract = GardenClient::connect(&network.rpc_url, args.address, signer)?;
    let content = HttpContentSource::new(config.content_timeout())?;

    let provider: Arc<dyn CompletionProvider> = if args.mock {
        info!("Using canned completion response");
        Arc::new(CannedProvider)
    } else {
        Arc::new(OpenAiCompatProvider::new(
            "openai",
            &config.completion.base_url,
            config.require_api_key()?,
            config.completion_timeout(),
        )?)
    };

    let player = Player::new(
        Arc::new(contract),
        Arc::new(content),
        provider,
        &config.completion.model,
    )
    .with_transaction_config(transaction)
    .with_dry_run(args.dry_run);

    match player.play(args.session, args.token).await? {
        PlayOutcome::Submitted { decision, tx_hash } => {
            println!(
                "Chose path {} for token {}: {}",
                decision.one_based_path(),
                args.token,
                decision.description
            );
            println!("Transaction: {tx_hash}");
        }
        PlayOutcome::DryRun { decision } => {
            println!(
                "Would choose path {} for token {}: {}",
                decision.one_based_path(),
                args.token,
                decision.description
            );
        }
    }

    Ok(())
}
