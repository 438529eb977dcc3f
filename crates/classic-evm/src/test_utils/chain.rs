use std::{cell::Cell, collections::BTreeMap, rc::Rc};

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::{ChainContext, ConsensusEngine, Header, StateDb, Transaction};

/// Deterministic header fixture at the given height: hashes derive from
/// the height alone, so `header_at(n + 1).parent_hash == header_at(n).hash`.
pub fn header_at(number: u64) -> Header {
    Header {
        number,
        time: 1_500_000_000 + number * 14,
        coinbase: Address::repeat_byte(0xc0),
        difficulty: U256::from(131_072u64),
        gas_limit: 8_000_000,
        hash: hash_at(number),
        parent_hash: if number == 0 { B256::ZERO } else { hash_at(number - 1) },
    }
}

fn hash_at(number: u64) -> B256 {
    keccak256(number.to_be_bytes())
}

/// A [`ChainContext`] over a fixed set of headers.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    by_hash: BTreeMap<B256, Header>,
    by_number: BTreeMap<u64, Header>,
}

impl MockChain {
    /// A chain holding [`header_at`] fixtures from genesis through `tip`.
    pub fn with_ancestry(tip: u64) -> Self {
        let mut chain = Self::default();
        for number in 0..=tip {
            chain.insert(header_at(number));
        }
        chain
    }

    /// Adds a header.
    pub fn insert(&mut self, header: Header) {
        self.by_hash.insert(header.hash, header.clone());
        self.by_number.insert(header.number, header);
    }

    /// Drops the header at `number`, leaving a gap.
    pub fn remove(&mut self, number: u64) {
        if let Some(header) = self.by_number.remove(&number) {
            self.by_hash.remove(&header.hash);
        }
    }
}

impl ChainContext for MockChain {
    fn header_by_hash(&self, hash: B256) -> Option<Header> {
        self.by_hash.get(&hash).cloned()
    }

    fn header_by_number(&self, number: u64) -> Option<Header> {
        self.by_number.get(&number).cloned()
    }
}

/// A consensus engine that finalizes blocks without touching state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEngine;

impl ConsensusEngine for NoopEngine {
    fn finalize(
        &self,
        _chain: &dyn ChainContext,
        _header: &Header,
        _state: &mut dyn StateDb,
        _transactions: &[Transaction],
        _uncles: &[Header],
    ) {
    }
}

/// A consensus engine that counts its `finalize` invocations. Clones
/// share the counter.
#[derive(Debug, Clone, Default)]
pub struct CountingEngine {
    calls: Rc<Cell<usize>>,
}

impl CountingEngine {
    /// Creates a fresh engine with a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `finalize` has run.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ConsensusEngine for CountingEngine {
    fn finalize(
        &self,
        _chain: &dyn ChainContext,
        _header: &Header,
        _state: &mut dyn StateDb,
        _transactions: &[Transaction],
        _uncles: &[Header],
    ) {
        self.calls.set(self.calls.get() + 1);
    }
}
