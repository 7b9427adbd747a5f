use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// A value transfer recorded in a block. No signature or balance checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}

/// Incoming submission body. Every field is optional at the wire level so
/// that a missing key is reported as a malformed request instead of a
/// generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct NewTransactionRequest {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<f64>,
}

impl NewTransactionRequest {
    pub fn into_transaction(self) -> Result<Transaction> {
        let mut missing = Vec::new();
        if self.sender.is_none() {
            missing.push("sender");
        }
        if self.receiver.is_none() {
            missing.push("receiver");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }

        match (self.sender, self.receiver, self.amount) {
            (Some(sender), Some(receiver), Some(amount)) => {
                Ok(Transaction::new(sender, receiver, amount))
            }
            _ => Err(LedgerError::MalformedRequest(format!(
                "missing transaction fields: {}",
                missing.join(", ")
            ))),
        }
    }
}
