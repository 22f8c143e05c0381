//! The Garden of Forking Paths contract over an alloy provider.

use alloy::contract::Error as CallError;
use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
use gofp_core::contract::{GardenContract, TransactionConfig};
use gofp_core::error::ContractError;
use gofp_core::{Address, SessionInfo, TxHash, U256};
use reqwest::Url;
use tracing::{debug, info};

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    interface IGarden {
        struct Session {
            address playerTokenAddress;
            address paymentTokenAddress;
            uint256 paymentAmount;
            bool isActive;
            bool isChoosingActive;
            string uri;
            uint256[] stages;
            bool isForgiving;
        }

        function getSession(uint256 sessionId) external view returns (Session memory);

        function getCurrentStage(uint256 sessionId) external view returns (uint256);

        function chooseCurrentStagePaths(
            uint256 sessionId,
            uint256[] memory tokenIds,
            uint256[] memory paths
        ) external;
    }
}

/// Client for one deployed Garden contract.
pub struct GardenClient {
    contract: IGarden::IGardenInstance<DynProvider>,

    /// Address of the local signer, if any
    sender: Option<Address>,
}

impl GardenClient {
    /// Connect to the contract at `address` through the node at `rpc_url`.
    ///
    /// Without a signer the client can read but every submission fails with
    /// [`ContractError::MissingSender`].
    pub fn connect(
        rpc_url: &str,
        address: Address,
        signer: Option<PrivateKeySigner>,
    ) -> Result<Self, ContractError> {
        let url: Url = rpc_url
            .parse()
            .map_err(|e| ContractError::Transport(format!("invalid RPC URL {rpc_url}: {e}")))?;

        let (provider, sender) = match signer {
            Some(signer) => {
                let sender = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(url)
                    .erased();
                (provider, Some(sender))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };

        Ok(Self {
            contract: IGarden::new(address, provider),
            sender,
        })
    }
}

fn call_error(e: CallError) -> ContractError {
    match e {
        CallError::TransportError(e) => match e.as_error_resp() {
            Some(payload) => ContractError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            },
            None => ContractError::Transport(e.to_string()),
        },
        other => ContractError::Abi(other.to_string()),
    }
}

fn session_info(session: IGarden::Session) -> SessionInfo {
    SessionInfo {
        player_token_address: session.playerTokenAddress,
        payment_token_address: session.paymentTokenAddress,
        payment_amount: session.paymentAmount,
        is_active: session.isActive,
        is_choosing_active: session.isChoosingActive,
        uri: session.uri,
        stages: session.stages,
        is_forgiving: session.isForgiving,
    }
}

#[async_trait]
impl GardenContract for GardenClient {
    async fn get_session(&self, session_id: u64) -> Result<SessionInfo, ContractError> {
        let session = self
            .contract
            .getSession(U256::from(session_id))
            .call()
            .await
            .map_err(call_error)?;
        Ok(session_info(session))
    }

    async fn get_current_stage(&self, session_id: u64) -> Result<u64, ContractError> {
        let stage = self
            .contract
            .getCurrentStage(U256::from(session_id))
            .call()
            .await
            .map_err(call_error)?;
        u64::try_from(stage).map_err(|_| ContractError::Abi(format!("stage number {stage} too large")))
    }

    async fn choose_current_stage_paths(
        &self,
        session_id: u64,
        token_ids: &[u64],
        paths: &[u64],
        config: &TransactionConfig,
    ) -> Result<TxHash, ContractError> {
        let sender = self.sender.ok_or(ContractError::MissingSender)?;

        let mut call = self
            .contract
            .chooseCurrentStagePaths(
                U256::from(session_id),
                token_ids.iter().copied().map(U256::from).collect(),
                paths.iter().copied().map(U256::from).collect(),
            )
            .from(sender);
        if let Some(gas) = config.gas_limit {
            call = call.gas(gas);
        }
        if let Some(price) = config.gas_price {
            call = call.gas_price(price);
        }
        if let Some(fee) = config.max_fee_per_gas {
            call = call.max_fee_per_gas(fee);
        }
        if let Some(fee) = config.max_priority_fee_per_gas {
            call = call.max_priority_fee_per_gas(fee);
        }
        if let Some(nonce) = config.nonce {
            call = call.nonce(nonce);
        }

        debug!(session_id, ?token_ids, ?paths, %sender, "Submitting path choice");
        let pending = call.send().await.map_err(call_error)?;
        let hash = *pending.tx_hash();
        info!(%hash, "Transaction submitted");
        Ok(hash)
    }
}
