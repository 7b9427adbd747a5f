pub mod fetch;
pub mod peers;
pub mod resolver;

pub use fetch::{ChainSnapshot, HttpPeerFetcher};
pub use peers::NodeSet;
pub use resolver::resolve;
