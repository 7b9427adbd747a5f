use serde::Serialize;

use super::{Block, ProofOfWork};

/// Outcome of walking a chain. `first_invalid_index` is the zero-based
/// position of the first block whose link or proof failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainValidity {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_invalid_index: Option<usize>,
}

impl ChainValidity {
    fn ok() -> Self {
        Self {
            valid: true,
            first_invalid_index: None,
        }
    }

    fn failed_at(index: usize) -> Self {
        Self {
            valid: false,
            first_invalid_index: Some(index),
        }
    }
}

pub struct ChainValidator;

impl ChainValidator {
    /// Check hash continuity and proof-of-work for every link, stopping at
    /// the first failure. Chains of zero or one block are trivially valid.
    pub fn validate(chain: &[Block]) -> ChainValidity {
        for (i, pair) in chain.windows(2).enumerate() {
            let (previous, block) = (&pair[0], &pair[1]);
            if block.previous_hash != previous.hash()
                || !ProofOfWork::is_valid(block.proof, previous.proof)
            {
                return ChainValidity::failed_at(i + 1);
            }
        }
        ChainValidity::ok()
    }
}
