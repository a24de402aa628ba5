use crate::batch::AtomicIxBatch;
use crate::types::AsyncAtomicRpcClient;
use hyperwarp_utils::poll::{FixedIntervalPoller, PollError};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::client_error::Error as ClientError;
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::{Transaction, TransactionError};

/// Errors from sending transactions to Solana
#[derive(Debug, thiserror::Error)]
pub enum TowerError {
    /// RPC request failed
    #[error("rpc client error: {0}")]
    Client(#[from] ClientError),

    /// The transaction landed but its execution failed
    #[error("Transaction {signature} failed: {err}")]
    TransactionFailed {
        /// Failed transaction
        signature: Signature,
        /// Execution error reported by the cluster
        err: TransactionError,
    },

    /// The transaction did not reach the configured commitment in time
    #[error("Transaction {signature} was not confirmed: {source}")]
    NotConfirmed {
        /// Unconfirmed transaction
        signature: Signature,
        /// Why polling gave up
        source: PollError,
    },
}

/// A tower that manages functionalities of the Solana network
#[derive(Clone)]
pub struct SolanaTower {
    client: AsyncAtomicRpcClient,
}

impl SolanaTower {
    /// Create a new instance of [SolanaTower]
    pub fn new(client: AsyncAtomicRpcClient) -> Self {
        Self { client }
    }

    /// Get the RPC client
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Send and confirm a transaction composed of [AtomicIxBatch] with extra signers
    #[tracing::instrument(skip_all)]
    pub async fn send_and_confirm(
        &self,
        ixs: &AtomicIxBatch,
        payer: &Keypair,
        extra_signers: &[&Keypair],
        poller: &FixedIntervalPoller,
    ) -> Result<Signature, TowerError> {
        let blockhash = self.client.get_latest_blockhash().await?;
        let tx = ixs.compose_solana_tx(payer, extra_signers, blockhash);

        self.send_raw_and_confirm(&tx, poller).await
    }

    /// Send an already signed transaction with preflight checks enabled and
    /// wait until it reaches the client commitment.
    #[tracing::instrument(skip_all, fields(signature = ?tx.signatures.first()))]
    pub async fn send_raw_and_confirm(
        &self,
        tx: &Transaction,
        poller: &FixedIntervalPoller,
    ) -> Result<Signature, TowerError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: false,
            preflight_commitment: Some(CommitmentLevel::Confirmed),
            ..Default::default()
        };

        let signature = self
            .client
            .send_transaction_with_config(tx, config)
            .await?;
        tracing::info!("Sent tx: {}", signature);

        self.confirm(&signature, poller).await?;

        Ok(signature)
    }

    /// Poll the signature status until it reaches the client commitment and
    /// surface any execution error.
    pub async fn confirm(
        &self,
        signature: &Signature,
        poller: &FixedIntervalPoller,
    ) -> Result<(), TowerError> {
        let commitment = self.client.commitment();

        let status = poller
            .poll_until(|| async move {
                let status = self
                    .client
                    .get_signature_status_with_commitment(signature, commitment)
                    .await?;
                Ok::<_, anyhow::Error>(status)
            })
            .await
            .map_err(|source| TowerError::NotConfirmed {
                signature: *signature,
                source,
            })?;

        match status {
            Ok(()) => Ok(()),
            Err(err) => Err(TowerError::TransactionFailed {
                signature: *signature,
                err,
            }),
        }
    }
}
