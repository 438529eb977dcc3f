use alloy_primitives::{Address, B256, U256};

use crate::Transaction;

/// The header fields this subsystem reads. Everything else a full header
/// carries (receipts root, ommers hash, extra data, seal fields) is opaque
/// here and lives with the block validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Block height.
    pub number: u64,
    /// Block timestamp, seconds since the epoch.
    pub time: u64,
    /// Beneficiary of the block's fees.
    pub coinbase: Address,
    /// Proof-of-work difficulty.
    pub difficulty: U256,
    /// Maximum cumulative gas the block's transactions may consume.
    pub gas_limit: u64,
    /// Hash of this header, computed by the block validator.
    pub hash: B256,
    /// Hash of the parent header.
    pub parent_hash: B256,
}

/// A block as seen by the processor: its header, its transactions in
/// inclusion order, and its uncle headers (passed through untouched to the
/// consensus engine's finalization).
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// The block header.
    pub header: Header,
    /// Transactions in inclusion order.
    pub transactions: Vec<Transaction>,
    /// Uncle headers.
    pub uncles: Vec<Header>,
}

impl Block {
    /// The block's hash.
    pub const fn hash(&self) -> B256 {
        self.header.hash
    }

    /// The block's height.
    pub const fn number(&self) -> u64 {
        self.header.number
    }
}
