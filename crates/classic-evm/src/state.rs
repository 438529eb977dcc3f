use alloy_primitives::{Address, Bytes, B256, U256};
use auto_impl::auto_impl;

use crate::Log;

/// The mutable world-state consumed by the processor.
///
/// Implementations are expected to be journaled: `finalise` commits the
/// changes accumulated since the last commit point, and
/// `intermediate_root` additionally computes the state-trie root after
/// this transaction. `prepare` scopes subsequent [`add_log`] calls to a
/// transaction so [`logs_for`] can attribute them.
///
/// The processor owns the state exclusively for the duration of a block;
/// no concurrent access occurs.
///
/// [`add_log`]: StateDb::add_log
/// [`logs_for`]: StateDb::logs_for
#[auto_impl(&mut, Box)]
pub trait StateDb {
    /// Whether an account exists at `address`.
    fn exists(&self, address: Address) -> bool;

    /// Nonce of the account at `address`, zero for absent accounts.
    fn nonce(&self, address: Address) -> u64;

    /// Balance of the account at `address`, zero for absent accounts.
    fn balance(&self, address: Address) -> U256;

    /// Code of the account at `address`, empty for absent accounts.
    fn code(&self, address: Address) -> Bytes;

    /// Storage word of `address` at `key`, zero when unset.
    fn storage(&self, address: Address, key: B256) -> B256;

    /// Overwrites the balance of `address`, creating the account if
    /// needed.
    fn set_balance(&mut self, address: Address, balance: U256);

    /// Overwrites the nonce of `address`.
    fn set_nonce(&mut self, address: Address, nonce: u64);

    /// Overwrites the code of `address`.
    fn set_code(&mut self, address: Address, code: Bytes);

    /// Writes one storage word.
    fn set_state(&mut self, address: Address, key: B256, value: B256);

    /// Credits `amount` to `address`, creating the account if needed.
    fn add_balance(&mut self, address: Address, amount: U256);

    /// Marks `address` for deletion at the next commit and zeroes its
    /// balance.
    fn suicide(&mut self, address: Address);

    /// Appends a log under the scope installed by [`prepare`].
    ///
    /// [`prepare`]: StateDb::prepare
    fn add_log(&mut self, log: Log);

    /// All logs appended under the scope of `tx_hash`, in order.
    fn logs_for(&self, tx_hash: B256) -> Vec<Log>;

    /// Installs the transaction scope for subsequent log appends.
    fn prepare(&mut self, tx_hash: B256, block_hash: B256, tx_index: u32);

    /// Commits pending changes without computing a root. `delete_empty`
    /// additionally drops touched-but-empty accounts (EIP-161).
    fn finalise(&mut self, delete_empty: bool);

    /// Commits pending changes and returns the state root after this
    /// transaction.
    fn intermediate_root(&mut self, delete_empty: bool) -> B256;

    /// Transaction index installed by the current scope.
    fn tx_index(&self) -> u32;

    /// Block hash installed by the current scope.
    fn block_hash(&self) -> B256;
}
