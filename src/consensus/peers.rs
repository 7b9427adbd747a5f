use std::collections::BTreeSet;

use log::debug;
use url::Url;

use crate::error::{LedgerError, Result};

/// Known peer replicas, keyed by normalized `host:port`.
#[derive(Debug, Default)]
pub struct NodeSet {
    nodes: BTreeSet<String>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every address or none: a single bad entry rejects the batch.
    pub fn register<I, S>(&mut self, addresses: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = addresses
            .into_iter()
            .map(|a| normalize_address(a.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        for addr in normalized {
            if self.nodes.insert(addr.clone()) {
                debug!("PEERS - registered {}", addr);
            }
        }
        Ok(self.addresses())
    }

    pub fn addresses(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }
}

/// Reduce `http://host:port/anything` or bare `host:port` to `host:port`.
/// A missing port takes the scheme default.
pub fn normalize_address(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidPeerAddress(raw.to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let url =
        Url::parse(&candidate).map_err(|_| LedgerError::InvalidPeerAddress(raw.to_string()))?;

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LedgerError::InvalidPeerAddress(raw.to_string()))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| LedgerError::InvalidPeerAddress(raw.to_string()))?;

    Ok(format!("{}:{}", host.to_ascii_lowercase(), port))
}
