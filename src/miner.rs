use std::sync::Mutex;

use log::{debug, info};

use crate::blockchain::{Block, Ledger, ProofOfWork};
use crate::config::NodeConfig;
use crate::error::{LedgerError, Result};

/// Transaction appended to every block this node mines.
#[derive(Debug, Clone)]
pub struct Reward {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

/// Runs the proof search against the current tip and seals the block.
#[derive(Debug, Clone, Default)]
pub struct Miner {
    reward: Option<Reward>,
    max_attempts: Option<u64>,
}

impl Miner {
    pub fn new(reward: Option<Reward>, max_attempts: Option<u64>) -> Self {
        Self {
            reward,
            max_attempts,
        }
    }

    pub fn from_config(cfg: &NodeConfig) -> Self {
        let reward = cfg.mining_reward.map(|amount| Reward {
            sender: cfg.node_address.clone(),
            receiver: cfg.reward_receiver.clone(),
            amount,
        });
        Self::new(reward, cfg.pow_max_attempts)
    }

    /// Blocking. The search runs without the ledger lock; if the tip moves
    /// meanwhile (another block or a chain swap) the search restarts
    /// against the new tip.
    pub fn mine(&self, ledger: &Mutex<Ledger>) -> Result<Block> {
        self.mine_with(ledger, |previous_proof| self.search(previous_proof))
    }

    fn mine_with<S>(&self, ledger: &Mutex<Ledger>, mut search: S) -> Result<Block>
    where
        S: FnMut(u64) -> Result<u64>,
    {
        loop {
            let (previous_proof, previous_hash) = {
                let ledger = ledger.lock().expect("mutex poisoned");
                let tip = ledger.tip()?;
                (tip.proof, tip.hash())
            };

            let proof = search(previous_proof)?;

            let mut ledger = ledger.lock().expect("mutex poisoned");
            if ledger.tip()?.hash() != previous_hash {
                debug!("MINER - tip moved during search, restarting");
                continue;
            }
            if let Some(r) = &self.reward {
                ledger.queue_transaction(r.sender.clone(), r.receiver.clone(), r.amount)?;
            }
            let block = ledger.create_block(proof, previous_hash).clone();
            info!(
                "MINER - sealed block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(block);
        }
    }

    fn search(&self, previous_proof: u64) -> Result<u64> {
        match self.max_attempts {
            None => Ok(ProofOfWork::solve(previous_proof)),
            Some(attempts) => ProofOfWork::solve_bounded(previous_proof, attempts)
                .ok_or(LedgerError::ProofNotFound { attempts }),
        }
    }
}
