use thiserror::Error;

/// Failures surfaced by ledger, peer and request handling.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("invalid peer address: {0}")]
    InvalidPeerAddress(String),

    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    #[error("chain from {peer} is invalid at block {index}")]
    ChainInvalid { peer: String, index: usize },

    #[error("chain has no blocks")]
    EmptyChain,

    #[error("no proof found after {attempts} attempts")]
    ProofNotFound { attempts: u64 },
}

impl LedgerError {
    /// Errors caused by the caller's input rather than by node state.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LedgerError::MalformedRequest(_) | LedgerError::InvalidPeerAddress(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
