use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};

use crate::{Log, StateDb};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Account {
    nonce: u64,
    balance: U256,
    code: Bytes,
    storage: BTreeMap<B256, B256>,
    suicided: bool,
}

impl Account {
    fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance.is_zero() && self.code.is_empty()
    }
}

/// An in-memory [`StateDb`] for tests.
///
/// Mutations apply immediately; `finalise` only processes deletions
/// (suicided accounts, and empty accounts when `delete_empty` is set).
/// `intermediate_root` hashes the full post-commit state, so equal states
/// produce equal roots and any mutation changes the root.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateDb {
    accounts: BTreeMap<Address, Account>,
    logs: BTreeMap<B256, Vec<Log>>,
    tx_hash: B256,
    block_hash: B256,
    tx_index: u32,
}

impl MemoryStateDb {
    /// Creates an account with the given balance.
    pub fn funded(address: Address, balance: U256) -> Self {
        let mut state = Self::default();
        state.set_balance(address, balance);
        state
    }

    fn entry(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }
}

impl StateDb for MemoryStateDb {
    fn exists(&self, address: Address) -> bool {
        self.accounts.contains_key(&address)
    }

    fn nonce(&self, address: Address) -> u64 {
        self.accounts.get(&address).map(|account| account.nonce).unwrap_or_default()
    }

    fn balance(&self, address: Address) -> U256 {
        self.accounts.get(&address).map(|account| account.balance).unwrap_or_default()
    }

    fn code(&self, address: Address) -> Bytes {
        self.accounts.get(&address).map(|account| account.code.clone()).unwrap_or_default()
    }

    fn storage(&self, address: Address, key: B256) -> B256 {
        self.accounts
            .get(&address)
            .and_then(|account| account.storage.get(&key).copied())
            .unwrap_or_default()
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        self.entry(address).balance = balance;
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) {
        self.entry(address).nonce = nonce;
    }

    fn set_code(&mut self, address: Address, code: Bytes) {
        self.entry(address).code = code;
    }

    fn set_state(&mut self, address: Address, key: B256, value: B256) {
        self.entry(address).storage.insert(key, value);
    }

    fn add_balance(&mut self, address: Address, amount: U256) {
        let account = self.entry(address);
        account.balance += amount;
    }

    fn suicide(&mut self, address: Address) {
        let account = self.entry(address);
        account.suicided = true;
        account.balance = U256::ZERO;
    }

    fn add_log(&mut self, log: Log) {
        self.logs.entry(self.tx_hash).or_default().push(log);
    }

    fn logs_for(&self, tx_hash: B256) -> Vec<Log> {
        self.logs.get(&tx_hash).cloned().unwrap_or_default()
    }

    fn prepare(&mut self, tx_hash: B256, block_hash: B256, tx_index: u32) {
        self.tx_hash = tx_hash;
        self.block_hash = block_hash;
        self.tx_index = tx_index;
    }

    fn finalise(&mut self, delete_empty: bool) {
        self.accounts
            .retain(|_, account| !account.suicided && !(delete_empty && account.is_empty()));
    }

    fn intermediate_root(&mut self, delete_empty: bool) -> B256 {
        self.finalise(delete_empty);
        let mut preimage = Vec::new();
        for (address, account) in &self.accounts {
            preimage.extend_from_slice(address.as_slice());
            preimage.extend_from_slice(&account.nonce.to_be_bytes());
            preimage.extend_from_slice(&account.balance.to_be_bytes::<32>());
            preimage.extend_from_slice(keccak256(&account.code).as_slice());
            for (key, value) in &account.storage {
                preimage.extend_from_slice(key.as_slice());
                preimage.extend_from_slice(value.as_slice());
            }
        }
        keccak256(&preimage)
    }

    fn tx_index(&self) -> u32 {
        self.tx_index
    }

    fn block_hash(&self) -> B256 {
        self.block_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_are_scoped_by_prepare() {
        let tx_a = B256::repeat_byte(0xaa);
        let tx_b = B256::repeat_byte(0xbb);
        let mut state = MemoryStateDb::default();

        state.prepare(tx_a, B256::ZERO, 0);
        state.add_log(Log { address: Address::ZERO, ..Default::default() });
        state.prepare(tx_b, B256::ZERO, 1);
        state.add_log(Log { address: Address::repeat_byte(1), ..Default::default() });
        state.add_log(Log { address: Address::repeat_byte(2), ..Default::default() });

        assert_eq!(state.logs_for(tx_a).len(), 1);
        assert_eq!(state.logs_for(tx_b).len(), 2);
        assert_eq!(state.tx_index(), 1);
    }

    #[test]
    fn suicided_accounts_disappear_at_finalise() {
        let victim = Address::repeat_byte(0x05);
        let mut state = MemoryStateDb::funded(victim, U256::from(10u64));
        state.suicide(victim);
        assert!(state.exists(victim));
        state.finalise(false);
        assert!(!state.exists(victim));
    }

    #[test]
    fn root_is_deterministic_and_mutation_sensitive() {
        let account = Address::repeat_byte(0x07);
        let mut a = MemoryStateDb::funded(account, U256::from(1u64));
        let mut b = MemoryStateDb::funded(account, U256::from(1u64));
        assert_eq!(a.intermediate_root(false), b.intermediate_root(false));

        b.add_balance(account, U256::from(1u64));
        assert_ne!(a.intermediate_root(false), b.intermediate_root(false));
    }

    #[test]
    fn delete_empty_sweeps_empty_accounts() {
        let empty = Address::repeat_byte(0x09);
        let mut state = MemoryStateDb::default();
        state.add_balance(empty, U256::ZERO);
        assert!(state.exists(empty));
        state.finalise(true);
        assert!(!state.exists(empty));
    }
}
