use std::env;
use std::time::Duration;

use log::warn;
use uuid::Uuid;

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Identity of this replica; sender of mining rewards.
    pub node_address: String,
    pub reward_receiver: String,
    /// When set, every mined block ends with a reward transaction.
    pub mining_reward: Option<f64>,
    pub peer_timeout: Duration,
    /// Upper bound on proof candidates per mining attempt; unbounded if unset.
    pub pow_max_attempts: Option<u64>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            node_address: Uuid::new_v4().simple().to_string(),
            reward_receiver: "miner".to_string(),
            mining_reward: None,
            peer_timeout: Duration::from_secs(5),
            pow_max_attempts: None,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("HOST") {
            cfg.host = host;
        }
        if let Some(port) = parsed(&lookup, "PORT") {
            cfg.port = port;
        }
        if let Some(addr) = lookup("NODE_ADDRESS").filter(|a| !a.trim().is_empty()) {
            cfg.node_address = addr;
        }
        if let Some(receiver) = lookup("REWARD_RECEIVER") {
            cfg.reward_receiver = receiver;
        }
        cfg.mining_reward = parsed_amount(&lookup, "MINING_REWARD");
        if let Some(secs) = parsed(&lookup, "PEER_TIMEOUT_SECS") {
            cfg.peer_timeout = Duration::from_secs(secs);
        }
        cfg.pow_max_attempts = parsed(&lookup, "POW_MAX_ATTEMPTS");

        cfg
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("CONFIG - ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}

/// Amounts end up in block JSON, which has no encoding for NaN or infinity.
fn parsed_amount<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let amount: f64 = parsed(lookup, key)?;
    if amount.is_finite() {
        Some(amount)
    } else {
        warn!("CONFIG - ignoring non-finite {}={}", key, amount);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> NodeConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = from_map(&[]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.node_address.len(), 32);
        assert!(!cfg.node_address.contains('-'));
        assert_eq!(cfg.mining_reward, None);
        assert_eq!(cfg.peer_timeout, Duration::from_secs(5));
        assert_eq!(cfg.pow_max_attempts, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = from_map(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "5002"),
            ("NODE_ADDRESS", "node-b"),
            ("REWARD_RECEIVER", "alice"),
            ("MINING_REWARD", "100"),
            ("PEER_TIMEOUT_SECS", "2"),
            ("POW_MAX_ATTEMPTS", "1000000"),
        ]);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5002);
        assert_eq!(cfg.node_address, "node-b");
        assert_eq!(cfg.reward_receiver, "alice");
        assert_eq!(cfg.mining_reward, Some(100.0));
        assert_eq!(cfg.peer_timeout, Duration::from_secs(2));
        assert_eq!(cfg.pow_max_attempts, Some(1_000_000));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let cfg = from_map(&[("PORT", "eighty"), ("MINING_REWARD", "lots")]);
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.mining_reward, None);

        for raw in ["NaN", "inf", "-inf", "infinity"] {
            let cfg = from_map(&[("MINING_REWARD", raw)]);
            assert_eq!(cfg.mining_reward, None, "{raw} should be rejected");
        }
    }
}
