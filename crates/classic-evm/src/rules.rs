//! Flat protocol-rule records derived from a [`ChainConfig`](crate::ChainConfig)
//! at a block height.
//!
//! The record is computed once per transaction (or hoisted once per block)
//! and is the single source of truth afterwards; nothing calls back into
//! the resolver mid-execution.

/// The set of protocol rules active at a given block height.
///
/// Every field is a plain boolean keyed by the EIP identifier used in the
/// protocol documents, so downstream consumers (the receipt policy, the
/// external-VM patch builder) read activation state without consulting the
/// chain configuration again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rules {
    /// Chain identifier bound into replay-protected signatures.
    pub chain_id: u64,
    /// Homestead gas repricing, upfront CREATE cost, and s-value bound.
    pub eip2: bool,
    /// DELEGATECALL.
    pub eip7: bool,
    /// Tangerine Whistle IO gas repricing.
    pub eip150: bool,
    /// Replay protection via chain-id-bound signatures.
    pub eip155: bool,
    /// EXP byte cost increase.
    pub eip160: bool,
    /// State clearing of empty accounts.
    pub eip161: bool,
    /// Deployed code size limit.
    pub eip170: bool,
    /// REVERT.
    pub eip140: bool,
    /// Modexp precompile.
    pub eip198: bool,
    /// RETURNDATASIZE / RETURNDATACOPY.
    pub eip211: bool,
    /// alt_bn128 pairing precompile.
    pub eip212: bool,
    /// alt_bn128 add/mul precompiles.
    pub eip213: bool,
    /// STATICCALL.
    pub eip214: bool,
    /// Receipt status codes in place of intermediate state roots.
    pub eip658: bool,
    /// Bitwise shifting instructions.
    pub eip145: bool,
    /// CREATE2.
    pub eip1014: bool,
    /// EXTCODEHASH.
    pub eip1052: bool,
    /// Net gas metering for SSTORE.
    pub eip1283: bool,
}

/// Per-opcode gas constants that vary by fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasTable {
    /// EXTCODESIZE.
    pub ext_code_size: u64,
    /// EXTCODECOPY.
    pub ext_code_copy: u64,
    /// BALANCE.
    pub balance: u64,
    /// SLOAD.
    pub sload: u64,
    /// CALL family base cost.
    pub calls: u64,
    /// SELFDESTRUCT base cost.
    pub suicide: u64,
    /// EXP cost per exponent byte.
    pub exp_byte: u64,
    /// Surcharge when SELFDESTRUCT sends the remaining balance to a
    /// previously nonexistent account.
    pub create_by_suicide: u64,
}

/// Gas table in force from Frontier through Homestead.
pub const GAS_TABLE_HOMESTEAD: GasTable = GasTable {
    ext_code_size: 20,
    ext_code_copy: 20,
    balance: 20,
    sload: 50,
    calls: 40,
    suicide: 0,
    exp_byte: 10,
    create_by_suicide: 0,
};

/// Gas table introduced by EIP-150 (Tangerine Whistle).
pub const GAS_TABLE_EIP150: GasTable = GasTable {
    ext_code_size: 700,
    ext_code_copy: 700,
    balance: 400,
    sload: 200,
    calls: 700,
    suicide: 5000,
    exp_byte: 10,
    create_by_suicide: 25000,
};

/// Gas table introduced by EIP-160, identical to EIP-150 except for the
/// EXP byte cost.
pub const GAS_TABLE_EIP160: GasTable = GasTable {
    ext_code_size: 700,
    ext_code_copy: 700,
    balance: 400,
    sload: 200,
    calls: 700,
    suicide: 5000,
    exp_byte: 50,
    create_by_suicide: 25000,
};
