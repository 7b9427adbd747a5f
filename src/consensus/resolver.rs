use std::cmp::Reverse;
use std::sync::Mutex;

use actix_web::web;
use futures::future::join_all;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use super::fetch::{ChainSnapshot, PeerChainFetcher};
use crate::blockchain::{Block, ChainValidator, Ledger};
use crate::error::{LedgerError, Result};

/// A chain reported by one peer.
#[derive(Debug, Clone)]
pub struct PeerChain {
    pub peer: String,
    pub snapshot: ChainSnapshot,
}

/// Result of a fork-choice round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub replaced: bool,
    pub chain: Vec<Block>,
}

pub struct ConsensusResolver;

impl ConsensusResolver {
    /// Longest valid chain wins, but only if strictly longer than `local`.
    /// Equal-length winners are ordered by smallest tip hash so the result
    /// does not depend on the order peers were visited in.
    pub fn select_best(local: &[Block], candidates: Vec<PeerChain>) -> Resolution {
        let certified: Vec<PeerChain> = candidates
            .into_par_iter()
            .filter_map(|candidate| match Self::certify(&candidate) {
                Ok(()) => Some(candidate),
                Err(e) => {
                    warn!("CONSENSUS - dropping candidate: {}", e);
                    None
                }
            })
            .collect();

        let best = certified
            .into_iter()
            .filter(|c| c.snapshot.length > local.len())
            .map(|c| {
                let tip_hash = c.snapshot.chain.last().map(Block::hash).unwrap_or_default();
                (c, tip_hash)
            })
            .max_by_key(|(c, tip_hash)| (c.snapshot.length, Reverse(tip_hash.clone())));

        match best {
            Some((winner, _)) => {
                info!(
                    "CONSENSUS - {} offers a longer valid chain ({} > {})",
                    winner.peer,
                    winner.snapshot.length,
                    local.len()
                );
                Resolution {
                    replaced: true,
                    chain: winner.snapshot.chain,
                }
            }
            None => Resolution {
                replaced: false,
                chain: local.to_vec(),
            },
        }
    }

    /// A candidate qualifies when its declared length matches its blocks
    /// and every link validates.
    fn certify(candidate: &PeerChain) -> Result<()> {
        let snapshot = &candidate.snapshot;
        if snapshot.length != snapshot.chain.len() {
            return Err(LedgerError::ChainInvalid {
                peer: candidate.peer.clone(),
                index: snapshot.chain.len(),
            });
        }
        match ChainValidator::validate(&snapshot.chain).first_invalid_index {
            None => Ok(()),
            Some(index) => Err(LedgerError::ChainInvalid {
                peer: candidate.peer.clone(),
                index,
            }),
        }
    }
}

/// Fetch every peer's chain, choose the best, and swap it into `ledger`.
///
/// Fetching and validation run without holding the ledger lock, validation
/// on the blocking pool. The swap re-checks the live chain length so blocks
/// mined meanwhile are never discarded for a chain that is no longer longer.
pub async fn resolve<F: PeerChainFetcher>(
    ledger: &Mutex<Ledger>,
    peers: &[String],
    fetcher: &F,
) -> Resolution {
    let local = {
        let ledger = ledger.lock().expect("mutex poisoned");
        ledger.chain().to_vec()
    };

    let fetched = join_all(peers.iter().map(|peer| async move {
        let result = fetcher.fetch_chain(peer).await;
        (peer.clone(), result)
    }))
    .await;

    let candidates: Vec<PeerChain> = fetched
        .into_iter()
        .filter_map(|(peer, result)| match result {
            Ok(snapshot) => Some(PeerChain { peer, snapshot }),
            Err(e) => {
                warn!("CONSENSUS - {}", e);
                None
            }
        })
        .collect();

    let decision =
        match web::block(move || ConsensusResolver::select_best(&local, candidates)).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!("CONSENSUS - validation worker failed: {}", e);
                Resolution {
                    replaced: false,
                    chain: Vec::new(),
                }
            }
        };

    let mut ledger = ledger.lock().expect("mutex poisoned");
    if decision.replaced && decision.chain.len() > ledger.len() {
        ledger.replace_entire_chain(decision.chain.clone());
        info!("CONSENSUS - chain replaced, length now {}", ledger.len());
        decision
    } else {
        if decision.replaced {
            info!("CONSENSUS - local chain grew during resolution, keeping it");
        }
        Resolution {
            replaced: false,
            chain: ledger.chain().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::blockchain::ProofOfWork;
    use crate::miner::Miner;

    fn mine(ledger: &mut Ledger, times: usize) {
        for _ in 0..times {
            let tip = ledger.tip().unwrap();
            let proof = ProofOfWork::solve(tip.proof);
            let previous_hash = tip.hash();
            ledger.create_block(proof, previous_hash);
        }
    }

    fn chain_of(blocks: usize) -> Vec<Block> {
        let mut ledger = Ledger::new();
        mine(&mut ledger, blocks);
        ledger.chain().to_vec()
    }

    fn candidate(peer: &str, chain: Vec<Block>) -> PeerChain {
        PeerChain {
            peer: peer.to_string(),
            snapshot: ChainSnapshot::of(&chain),
        }
    }

    /// Serves canned snapshots; unknown peers are unreachable.
    struct CannedFetcher(HashMap<String, ChainSnapshot>);

    impl PeerChainFetcher for CannedFetcher {
        async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot> {
            self.0
                .get(peer)
                .cloned()
                .ok_or_else(|| LedgerError::PeerUnreachable {
                    peer: peer.to_string(),
                    reason: "connection refused".into(),
                })
        }
    }

    #[test]
    fn strictly_longer_valid_chain_wins() {
        let local = chain_of(1);
        let longer = chain_of(3);
        let res = ConsensusResolver::select_best(&local, vec![candidate("x:1", longer.clone())]);
        assert!(res.replaced);
        assert_eq!(res.chain, longer);
    }

    #[test]
    fn equal_length_is_ignored() {
        let local = chain_of(2);
        let res = ConsensusResolver::select_best(&local, vec![candidate("x:1", chain_of(2))]);
        assert!(!res.replaced);
        assert_eq!(res.chain, local);
    }

    #[test]
    fn invalid_longer_chain_is_ignored() {
        let local = chain_of(1);
        let mut forged = chain_of(3);
        forged[2].previous_hash = "forged".into();
        let res = ConsensusResolver::select_best(&local, vec![candidate("x:1", forged)]);
        assert!(!res.replaced);
        assert_eq!(res.chain, local);
    }

    #[test]
    fn lying_about_length_is_rejected() {
        let local = chain_of(1);
        let mut c = candidate("x:1", chain_of(2));
        c.snapshot.length = 10;
        let res = ConsensusResolver::select_best(&local, vec![c]);
        assert!(!res.replaced);
    }

    #[test]
    fn longest_of_several_wins_and_never_shrinks() {
        let local = chain_of(2);
        let res = ConsensusResolver::select_best(
            &local,
            vec![
                candidate("a:1", chain_of(1)),
                candidate("b:1", chain_of(4)),
                candidate("c:1", chain_of(3)),
            ],
        );
        assert!(res.replaced);
        assert_eq!(res.chain.len(), 5);
    }

    #[test]
    fn ties_break_on_smallest_tip_hash_regardless_of_order() {
        let local = chain_of(0);
        let a = chain_of(2);
        let b = chain_of(2);
        let expected = if a[2].hash() <= b[2].hash() { a.clone() } else { b.clone() };

        let forward = ConsensusResolver::select_best(
            &local,
            vec![candidate("a:1", a.clone()), candidate("b:1", b.clone())],
        );
        let backward =
            ConsensusResolver::select_best(&local, vec![candidate("b:1", b), candidate("a:1", a)]);
        assert_eq!(forward.chain, expected);
        assert_eq!(backward.chain, expected);
    }

    #[actix_web::test]
    async fn replica_adopts_longer_peer_chain() {
        let x = Mutex::new(Ledger::new());
        let y = Mutex::new(Ledger::new());
        mine(&mut x.lock().unwrap(), 3);
        mine(&mut y.lock().unwrap(), 1);

        let fetcher = CannedFetcher(HashMap::from([
            (
                "x:5001".to_string(),
                ChainSnapshot::of(x.lock().unwrap().chain()),
            ),
            (
                "y:5002".to_string(),
                ChainSnapshot::of(y.lock().unwrap().chain()),
            ),
        ]));

        let res = resolve(&y, &["x:5001".to_string()], &fetcher).await;
        assert!(res.replaced);
        assert_eq!(y.lock().unwrap().chain(), x.lock().unwrap().chain());

        // X sees nothing longer than itself.
        let res = resolve(&x, &["y:5002".to_string()], &fetcher).await;
        assert!(!res.replaced);
        assert_eq!(res.chain.len(), 4);
    }

    /// Serves `served`, but lets the local node mine `blocks` first, as if
    /// mining had raced with the fetch.
    struct RacingFetcher<'a> {
        local: &'a Mutex<Ledger>,
        blocks: usize,
        served: ChainSnapshot,
    }

    impl PeerChainFetcher for RacingFetcher<'_> {
        async fn fetch_chain(&self, _peer: &str) -> Result<ChainSnapshot> {
            let miner = Miner::default();
            for _ in 0..self.blocks {
                miner.mine(self.local)?;
            }
            Ok(self.served.clone())
        }
    }

    #[actix_web::test]
    async fn local_growth_during_fetch_wins_over_stale_decision() {
        let y = Mutex::new(Ledger::new());
        mine(&mut y.lock().unwrap(), 1);
        let fetcher = RacingFetcher {
            local: &y,
            blocks: 3,
            served: ChainSnapshot::of(&chain_of(3)),
        };

        let res = resolve(&y, &["x:5001".to_string()], &fetcher).await;
        assert!(!res.replaced);
        assert_eq!(res.chain.len(), 5);
        assert_eq!(res.chain, y.lock().unwrap().chain());
        assert!(ChainValidator::validate(&res.chain).valid);
    }

    #[actix_web::test]
    async fn unreachable_peers_are_skipped() {
        let y = Mutex::new(Ledger::new());
        let fetcher = CannedFetcher(HashMap::new());
        let res = resolve(&y, &["gone:1".to_string()], &fetcher).await;
        assert!(!res.replaced);
        assert_eq!(res.chain.len(), 1);
    }
}
