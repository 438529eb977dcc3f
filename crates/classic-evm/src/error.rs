use alloy_primitives::{Address, U256};

/// Errors that abort the application of a transaction — and with it the
/// whole block, since a transaction inside a canonical block must be
/// executable.
///
/// A bytecode `revert` is deliberately *not* represented here: it surfaces
/// as `status_failed` on the receipt and block processing continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The signer could not recover a sender from the transaction
    /// signature.
    #[error(transparent)]
    InvalidSignature(#[from] SignerError),
    /// The transaction nonce is ahead of the sender account.
    #[error("nonce too high: address {address}, tx nonce {tx_nonce}, state nonce {state_nonce}")]
    NonceTooHigh {
        /// The recovered sender.
        address: Address,
        /// Nonce carried by the transaction.
        tx_nonce: u64,
        /// Current nonce of the sender account.
        state_nonce: u64,
    },
    /// The transaction nonce is behind the sender account.
    #[error("nonce too low: address {address}, tx nonce {tx_nonce}, state nonce {state_nonce}")]
    NonceTooLow {
        /// The recovered sender.
        address: Address,
        /// Nonce carried by the transaction.
        tx_nonce: u64,
        /// Current nonce of the sender account.
        state_nonce: u64,
    },
    /// The sender cannot cover the upfront gas purchase
    /// (`gas_limit * gas_price`).
    #[error("insufficient balance to pay for gas: address {address}, have {have}, want {want}")]
    InsufficientBalanceForGas {
        /// The recovered sender.
        address: Address,
        /// Sender balance.
        have: U256,
        /// Required gas purchase.
        want: U256,
    },
    /// The block's gas budget cannot admit this transaction.
    #[error("gas limit reached")]
    GasLimitReached,
    /// The interpreter signalled a non-revert abort.
    #[error("vm abort: {0}")]
    VmAbort(String),
    /// The `"svm"` backend was selected but no external VM factory is
    /// configured.
    #[error("external vm backend selected but not configured")]
    SvmUnavailable,
}

/// Errors produced while recovering a transaction sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    /// The signature's v, r, s values are out of range for the signer.
    #[error("invalid transaction v, r, s values")]
    InvalidSignatureValues,
    /// The transaction is replay-protected for a different chain.
    #[error("invalid chain id for signer: tx {tx}, signer {signer}")]
    InvalidChainId {
        /// Chain id derived from the transaction's v value.
        tx: u64,
        /// Chain id the signer is bound to.
        signer: u64,
    },
    /// Point recovery failed for a structurally valid signature.
    #[error("signature recovery failed")]
    RecoveryFailed,
}
