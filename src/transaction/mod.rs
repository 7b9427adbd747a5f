pub mod model;

pub use model::{NewTransactionRequest, Transaction};
