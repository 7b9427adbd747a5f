pub mod block;
pub mod model;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use model::Ledger;
pub use pow::ProofOfWork;
pub use validator::ChainValidator;

/// Leading hex digits every proof digest must start with (fixed, no retargeting).
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Proof stored in the genesis block.
pub const GENESIS_PROOF: u64 = 1;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
