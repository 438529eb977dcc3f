//! Protocol constants shared across the processor.

/// Maximum deployed contract code size, enforced once EIP-170 activates.
pub const MAX_CODE_SIZE: u64 = 24576;

/// Maximum depth of the call/create stack.
pub const CALL_CREATE_DEPTH: u64 = 1024;

/// Upfront gas charged for a contract-creation transaction once EIP-2
/// (Homestead) activates. Frontier charged nothing upfront for CREATE.
pub const CREATE_GAS: u64 = 32000;

/// Base gas charged for every transaction.
pub const TX_GAS: u64 = 21000;

/// Base gas charged for a contract-creation transaction post-Homestead.
pub const TX_GAS_CONTRACT_CREATION: u64 = 53000;

/// Gas charged per zero byte of transaction input.
pub const TX_DATA_ZERO_GAS: u64 = 4;

/// Gas charged per non-zero byte of transaction input.
pub const TX_DATA_NON_ZERO_GAS: u64 = 68;

/// Number of recent blocks whose hashes are visible to the BLOCKHASH
/// host function. Anything older resolves to zero.
pub const BLOCKHASH_WINDOW: u64 = 256;
