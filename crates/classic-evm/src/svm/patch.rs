use alloy_primitives::{Address, U256};

use crate::{
    constants::{CALL_CREATE_DEPTH, CREATE_GAS, MAX_CODE_SIZE},
    ChainConfig, Rules,
};

/// The account-model parameters of a [`Patch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPatch {
    /// Nonce newly created accounts start from.
    pub initial_nonce: U256,
    /// Nonce newly created *contract* accounts start from; 1 once
    /// EIP-161 is active.
    pub initial_create_nonce: U256,
    /// Whether an empty account counts as existing. Off once EIP-161
    /// state clearing is active.
    pub empty_considered_exists: bool,
    /// Whether the VM may report changed-only storage deltas instead of
    /// full account snapshots.
    pub allow_partial_change: bool,
}

/// The parameter bundle configuring the external VM for one transaction:
/// fork-dependent gas costs, feature toggles, the enabled precompile set,
/// and the account-model semantics.
///
/// Built once per transaction from the rule record at the block height,
/// handed to [`StepVmFactory::create`](crate::StepVmFactory::create), and
/// released with the VM instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Maximum deployed code size; zero means unlimited.
    pub code_deposit_limit: u64,
    /// Maximum call/create stack depth.
    pub call_stack_limit: u64,
    /// EXTCODECOPY / EXTCODESIZE gas.
    pub gas_extcode: U256,
    /// BALANCE gas.
    pub gas_balance: U256,
    /// SLOAD gas.
    pub gas_sload: U256,
    /// SELFDESTRUCT base gas.
    pub gas_suicide: U256,
    /// SELFDESTRUCT surcharge for sending the balance to a new account.
    pub gas_suicide_new_account: U256,
    /// CALL family base gas.
    pub gas_call: U256,
    /// EXP per-byte gas.
    pub gas_expbyte: U256,
    /// Upfront gas for contract-creation transactions.
    pub gas_transaction_create: U256,
    /// Deposit code even when the deposit gas cannot be paid
    /// (pre-Homestead behavior).
    pub force_code_deposit: bool,
    /// DELEGATECALL available.
    pub has_delegate_call: bool,
    /// STATICCALL available.
    pub has_static_call: bool,
    /// REVERT available.
    pub has_revert: bool,
    /// RETURNDATASIZE / RETURNDATACOPY available.
    pub has_return_data: bool,
    /// SHL / SHR / SAR available.
    pub has_bitwise_shift: bool,
    /// CREATE2 available.
    pub has_create2: bool,
    /// EXTCODEHASH available.
    pub has_extcodehash: bool,
    /// EIP-1283 net SSTORE gas metering.
    pub has_reduced_sstore_gas_metering: bool,
    /// Error when a call passes more gas than remains
    /// (pre-EIP-150 behavior).
    pub err_on_call_with_more_gas: bool,
    /// Forward all-but-one-64th of remaining gas on call/create
    /// (EIP-150).
    pub call_create_l64_after_gas: bool,
    /// VM memory ceiling; effectively unbounded.
    pub memory_limit: u64,
    /// Addresses of the enabled precompiled contracts.
    pub enabled_contracts: Vec<Address>,
    /// Account-model semantics.
    pub account: AccountPatch,
}

impl Patch {
    /// Builds the patch for `config` at block height `number`.
    pub fn for_block(config: &ChainConfig, number: u64) -> Self {
        let rules = config.rules(number);
        let gas_table = config.gas_table(number);

        // Zero == unlimited.
        let code_deposit_limit = if rules.eip170 { MAX_CODE_SIZE } else { 0 };

        // The upfront CREATE cost only exists from Homestead on.
        let gas_transaction_create = if rules.eip2 { CREATE_GAS } else { 0 };

        Self {
            code_deposit_limit,
            call_stack_limit: CALL_CREATE_DEPTH,
            gas_extcode: U256::from(gas_table.ext_code_copy),
            gas_balance: U256::from(gas_table.balance),
            gas_sload: U256::from(gas_table.sload),
            gas_suicide: U256::from(gas_table.suicide),
            gas_suicide_new_account: U256::from(gas_table.create_by_suicide),
            gas_call: U256::from(gas_table.calls),
            gas_expbyte: U256::from(gas_table.exp_byte),
            gas_transaction_create: U256::from(gas_transaction_create),
            force_code_deposit: !rules.eip2,
            has_delegate_call: rules.eip7,
            has_static_call: rules.eip214,
            has_revert: rules.eip140,
            has_return_data: rules.eip211,
            has_bitwise_shift: rules.eip145,
            has_create2: rules.eip1014,
            has_extcodehash: rules.eip1052,
            has_reduced_sstore_gas_metering: rules.eip1283,
            err_on_call_with_more_gas: !rules.eip150,
            call_create_l64_after_gas: rules.eip150,
            memory_limit: u64::MAX,
            enabled_contracts: enabled_precompiles(&rules),
            account: AccountPatch {
                initial_nonce: U256::ZERO,
                initial_create_nonce: if rules.eip161 { U256::from(1u64) } else { U256::ZERO },
                empty_considered_exists: !rules.eip161,
                allow_partial_change: true,
            },
        }
    }
}

/// The precompile set enabled under `rules`: ecrecover, sha256, ripemd160
/// and identity always; modexp with EIP-198; alt_bn128 add/mul with
/// EIP-213; alt_bn128 pairing with EIP-212.
fn enabled_precompiles(rules: &Rules) -> Vec<Address> {
    let mut contracts = vec![
        Address::with_last_byte(1),
        Address::with_last_byte(2),
        Address::with_last_byte(3),
        Address::with_last_byte(4),
    ];
    if rules.eip198 {
        contracts.push(Address::with_last_byte(5));
    }
    if rules.eip213 {
        contracts.push(Address::with_last_byte(6));
        contracts.push(Address::with_last_byte(7));
    }
    if rules.eip212 {
        contracts.push(Address::with_last_byte(8));
    }
    contracts
}
