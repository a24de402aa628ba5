use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

/// An atomic batch of instructions that is composed into a single transaction
pub struct AtomicIxBatch(Vec<Instruction>);

impl AtomicIxBatch {
    /// Create a new [AtomicIxBatch] from a list of [Instruction]s
    pub fn new(ixs: Vec<Instruction>) -> Self {
        Self(ixs)
    }

    /// Compose a [Transaction] paid by `payer` and signed by `payer` and every extra signer
    pub fn compose_solana_tx(
        &self,
        payer: &Keypair,
        extra_signers: &[&Keypair],
        blockhash: Hash,
    ) -> Transaction {
        let message = Message::new(&self.0, Some(&payer.pubkey()));

        let mut signers: Vec<&Keypair> = Vec::with_capacity(extra_signers.len() + 1);
        signers.push(payer);
        signers.extend(
            extra_signers
                .iter()
                .filter(|signer| signer.pubkey() != payer.pubkey()),
        );

        Transaction::new(signers.as_slice(), message, blockhash)
    }
}
