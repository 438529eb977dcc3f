use alloy_primitives::{Address, Bytes, TxKind, B256, U256};

use crate::Patch;

/// A data requirement raised by [`StepVm::fire`].
///
/// The loop driving the VM is single-threaded and cooperative: the VM is
/// the only active party, suspending on every unsatisfied requirement,
/// and the host is purely reactive. All numeric protocol values are
/// 256-bit words on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmRequire {
    /// Execution is complete; leave the loop.
    None,
    /// The VM needs the full account (nonce, balance, code) at the
    /// address.
    Account(Address),
    /// The VM needs only the code at the address.
    AccountCode(Address),
    /// The VM needs one storage word.
    AccountStorage(Address, U256),
    /// The VM needs the hash of the block at the given height.
    Blockhash(U256),
}

/// One storage slot in an account change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageItem {
    /// Slot key.
    pub key: U256,
    /// Slot value.
    pub value: U256,
}

/// One post-execution account mutation reported by the VM.
///
/// Changes are applied to the state database in the order the VM reports
/// them; the ordering is part of the canonical state-root computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountChange {
    /// Credit `amount` to the account.
    IncreaseBalance {
        /// Affected account.
        address: Address,
        /// Amount credited.
        amount: U256,
    },
    /// Debit `amount` from the account. The VM has already checked the
    /// balance covers the debit.
    DecreaseBalance {
        /// Affected account.
        address: Address,
        /// Amount debited.
        amount: U256,
    },
    /// Delete the account.
    Removed {
        /// Affected account.
        address: Address,
    },
    /// Overwrite the account and the storage slots it changed.
    Full {
        /// Affected account.
        address: Address,
        /// New nonce.
        nonce: U256,
        /// New balance.
        balance: U256,
        /// New code.
        code: Bytes,
        /// Only the slots execution changed.
        changed_storage: Vec<StorageItem>,
    },
    /// Create the account with its complete storage set.
    Create {
        /// Affected account.
        address: Address,
        /// New nonce.
        nonce: U256,
        /// New balance.
        balance: U256,
        /// New code.
        code: Bytes,
        /// The full storage set of the new account.
        storage: Vec<StorageItem>,
    },
}

/// A log emitted by the external VM, in its wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmLog {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<B256>,
    /// Unindexed payload.
    pub data: Bytes,
}

/// One external VM instance, executing a single transaction.
///
/// The instance and its patch are externally allocated resources; the
/// binding layer ties their destructors to `Drop`, so ownership passing
/// through the adapter guarantees release on every exit path.
pub trait StepVm {
    /// Advances execution until it either completes
    /// ([`VmRequire::None`]) or suspends on a data requirement.
    fn fire(&mut self) -> VmRequire;

    /// Satisfies an [`VmRequire::Account`] requirement for an existing
    /// account.
    fn commit_account(&mut self, address: Address, nonce: U256, balance: U256, code: Bytes);

    /// Satisfies a [`VmRequire::AccountCode`] requirement for an existing
    /// account.
    fn commit_account_code(&mut self, address: Address, code: Bytes);

    /// Satisfies a [`VmRequire::AccountStorage`] requirement for an
    /// existing account.
    fn commit_account_storage(&mut self, address: Address, key: U256, value: U256);

    /// Satisfies an account, code, or storage requirement for an address
    /// with no account behind it.
    fn commit_nonexist(&mut self, address: Address);

    /// Satisfies a [`VmRequire::Blockhash`] requirement.
    fn commit_blockhash(&mut self, number: U256, hash: B256);

    /// The post-execution account change set, in application order. Only
    /// meaningful after [`fire`](StepVm::fire) returned
    /// [`VmRequire::None`].
    fn account_changes(&self) -> Vec<AccountChange>;

    /// Logs emitted during execution, in emission order.
    fn logs(&self) -> Vec<VmLog>;

    /// Total gas consumed by the transaction.
    fn used_gas(&self) -> U256;

    /// Whether execution failed. Every abort mode of the external VM —
    /// revert included — surfaces here; there is no mid-flight error
    /// channel.
    fn failed(&self) -> bool;
}

/// Constructor for external VM instances.
pub trait StepVmFactory {
    /// Creates a VM instance for one transaction under the given patch
    /// and header parameters.
    fn create(
        &self,
        patch: &Patch,
        tx: &VmTransaction,
        header: &VmHeaderParams,
    ) -> Box<dyn StepVm>;
}

/// The transaction parameters handed to the external VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmTransaction {
    /// Recovered sender.
    pub caller: Address,
    /// Price per unit of gas.
    pub gas_price: U256,
    /// Gas limit granted by the sender.
    pub gas_limit: U256,
    /// Recipient, or [`TxKind::Create`] for contract creation.
    pub action: TxKind,
    /// Value transferred.
    pub value: U256,
    /// Call data or init code.
    pub input: Bytes,
    /// Sender nonce carried by the transaction.
    pub nonce: U256,
}

/// The header parameters handed to the external VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmHeaderParams {
    /// Fee beneficiary.
    pub beneficiary: Address,
    /// Block timestamp.
    pub timestamp: u64,
    /// Block height.
    pub number: U256,
    /// Block difficulty.
    pub difficulty: U256,
    /// Block gas limit.
    pub gas_limit: U256,
}
