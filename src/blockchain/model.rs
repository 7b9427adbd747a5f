use log::debug;

use super::Block;
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// In-memory append-only chain plus the pool of not-yet-sealed transactions.
///
/// Callers share one `Ledger` behind a single lock; nothing here hands out
/// mutable access to the chain itself.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Initialize a new ledger holding only the genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
        }
    }

    /// Seal the whole pending pool into a new block and append it.
    pub fn create_block(&mut self, proof: u64, previous_hash: String) -> &Block {
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        debug!(
            "LEDGER - sealing block #{} with {} txs (proof={})",
            index,
            transactions.len(),
            proof
        );
        self.chain.push(Block::new(index, proof, previous_hash, transactions));
        &self.chain[self.chain.len() - 1]
    }

    pub fn tip(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Queue a transaction and predict the index of the block that will
    /// hold it. The prediction is void if another block is sealed first.
    ///
    /// Counted from the chain length, like `create_block`, not from the tip's
    /// `index` field: an adopted chain's indexes are not trusted.
    pub fn queue_transaction(
        &mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
    ) -> Result<u64> {
        self.tip()?;
        let next_index = self.chain.len() as u64 + 1;
        self.pending.push(Transaction::new(sender, receiver, amount));
        Ok(next_index)
    }

    /// Swap in an already-validated chain wholesale.
    pub fn replace_entire_chain(&mut self, new_chain: Vec<Block>) {
        debug!(
            "LEDGER - replacing chain: {} -> {} blocks",
            self.chain.len(),
            new_chain.len()
        );
        self.chain = new_chain;
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}
