use crate::blockchain::{Block, Ledger};
use crate::config::NodeConfig;
use crate::consensus::{HttpPeerFetcher, NodeSet};
use crate::miner::Miner;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state: one ledger, one peer set, both lock-guarded.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub nodes: Mutex<NodeSet>,
    pub miner: Miner,
    pub fetcher: HttpPeerFetcher,
}

impl AppState {
    pub fn new(cfg: &NodeConfig) -> reqwest::Result<Self> {
        Ok(Self {
            ledger: Mutex::new(Ledger::new()),
            nodes: Mutex::new(NodeSet::new()),
            miner: Miner::from_config(cfg),
            fetcher: HttpPeerFetcher::new(cfg.peer_timeout)?,
        })
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub block: Block,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub message: &'static str,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_invalid_index: Option<usize>,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Peer API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ConsensusResponse {
    pub message: &'static str,
    pub replaced: bool,
    pub chain: Vec<Block>,
}
