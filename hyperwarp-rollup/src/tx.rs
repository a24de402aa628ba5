use serde::{Deserialize, Serialize};

use crate::call::RuntimeCall;
use crate::config::RollupConfig;
use crate::signer::RollupSigner;

/// Fee and replay protection settings of a transaction
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TxDetails {
    /// Priority fee in basis points
    pub max_priority_fee_bips: u64,
    /// Maximum fee paid
    pub max_fee: u128,
    /// Multi-dimensional gas limit, unlimited when unset
    pub gas_limit: Option<[u64; 2]>,
    /// Chain the transaction is valid on
    pub chain_id: u64,
}

impl From<&RollupConfig> for TxDetails {
    fn from(config: &RollupConfig) -> Self {
        Self {
            max_priority_fee_bips: config.max_priority_fee_bips,
            max_fee: config.max_fee,
            gas_limit: config.gas_limit,
            chain_id: config.chain_id,
        }
    }
}

/// A runtime call with its fee settings, before signing
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UnsignedTransaction {
    /// Call executed by the runtime
    pub runtime_call: RuntimeCall,
    /// Uniqueness nonce, unix time in milliseconds unless set explicitly
    pub generation: u64,
    /// Fee settings
    pub details: TxDetails,
}

impl UnsignedTransaction {
    /// Transaction with a generation taken from the clock
    pub fn new(runtime_call: RuntimeCall, details: TxDetails) -> Self {
        Self::with_generation(runtime_call, details, current_generation())
    }

    /// Transaction with an explicit generation
    pub fn with_generation(runtime_call: RuntimeCall, details: TxDetails, generation: u64) -> Self {
        Self {
            runtime_call,
            generation,
            details,
        }
    }

    /// Bytes covered by the signature
    pub fn signing_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Sign the [signing bytes](Self::signing_bytes) with `signer`
    pub fn sign(self, signer: &RollupSigner) -> serde_json::Result<Transaction> {
        let signature = signer.sign(&self.signing_bytes()?);

        Ok(Transaction {
            pub_key: hex::encode(signer.public_key()),
            signature: hex::encode(signature.as_ref()),
            unsigned: self,
        })
    }
}

fn current_generation() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// A signed transaction, keys and signature hex encoded
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Signer public key
    pub pub_key: String,
    /// ed25519 signature of the signing bytes
    pub signature: String,
    /// Signed content
    pub unsigned: UnsignedTransaction,
}

impl Transaction {
    /// Request body of the sequencer submission endpoint
    pub fn to_submit_body(&self) -> serde_json::Result<SubmitTxBody> {
        Ok(SubmitTxBody {
            body: base64::encode(serde_json::to_vec(self)?),
        })
    }
}

/// Body of `POST /sequencer/txs`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmitTxBody {
    /// Base64 of the JSON encoded [Transaction]
    pub body: String,
}
