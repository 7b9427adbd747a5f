use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A sealed block of transactions linked to its predecessor by hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // local wall clock, "YYYY-MM-DD HH:MM:SS.ffffff"
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// The hard-coded first block of every ledger.
    pub fn genesis() -> Self {
        Self::new(1, GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string(), Vec::new())
    }

    /// Build a block stamped with the current time.
    pub fn new(
        index: u64,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            timestamp: now_timestamp(),
            proof,
            previous_hash,
            transactions,
        }
    }

    /// Deterministic serialization: JSON with object keys sorted at every
    /// level, so structurally-equal blocks always produce identical bytes.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let value = serde_json::to_value(self).expect("serialize block");
        serde_json::to_vec(&sorted(value)).expect("serialize canonical block")
    }

    /// Lowercase hex SHA-256 of `canonical_bytes`.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes());
        hex::encode(hasher.finalize())
    }
}

fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = Map::new();
            for (k, v) in entries {
                out.insert(k, sorted(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}
