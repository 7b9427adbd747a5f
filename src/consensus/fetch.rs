use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::{LedgerError, Result};

/// A replica's chain as published by its chain endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainSnapshot {
    pub fn of(chain: &[Block]) -> Self {
        Self {
            chain: chain.to_vec(),
            length: chain.len(),
        }
    }
}

/// Capability to obtain a peer's current chain. Any failure, including a
/// non-success status, is reported as `PeerUnreachable`.
pub trait PeerChainFetcher {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<ChainSnapshot>>;
}

/// Path every replica serves its chain on.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// Fetches peer chains over plain HTTP.
#[derive(Debug, Clone)]
pub struct HttpPeerFetcher {
    client: reqwest::Client,
}

impl HttpPeerFetcher {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl PeerChainFetcher for HttpPeerFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot> {
        let url = format!("http://{peer}{CHAIN_PATH}");
        let fail = |reason: String| LedgerError::PeerUnreachable {
            peer: peer.to_string(),
            reason,
        };

        debug!("FETCH - GET {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fail(format!("status {status}")));
        }

        resp.json::<ChainSnapshot>()
            .await
            .map_err(|e| fail(format!("bad chain body: {e}")))
    }
}
