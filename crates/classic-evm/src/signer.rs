use alloy_primitives::{Address, B256};
use auto_impl::auto_impl;

use crate::{ChainConfig, SignerError, Transaction};

/// Sender recovery for signed transactions.
///
/// The cryptographic recovery itself lives with the host, like the state
/// database and the consensus engine; the processor only consumes it.
/// Implementations are expected to apply the regime selected by
/// [`SignerKind::for_block`] for the chain configuration at the current
/// block height.
#[auto_impl(&, Box, Arc)]
pub trait Signer {
    /// Recovers the sender address of `tx`.
    fn sender(&self, tx: &Transaction) -> Result<Address, SignerError>;
}

/// The signature regime in force at a block height.
///
/// The ladder mirrors the protocol's signature rules: Frontier accepts
/// malleable signatures, Homestead adds the low-`s` bound, and EIP-155
/// binds the chain id into `v`. Replay-unprotected transactions remain
/// valid after EIP-155 and fall back to the Homestead rules. Selection is
/// a branch, not a polymorphism hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerKind {
    /// Launch rules: `v` is 27 or 28, any `s` below the curve order.
    Frontier,
    /// Homestead rules: additionally rejects `s` above half the curve
    /// order.
    Homestead,
    /// EIP-155 rules: `v` folds in the chain id (`35 + 2 * chain_id`,
    /// plus the recovery parity).
    Eip155 {
        /// The chain id this regime accepts.
        chain_id: u64,
    },
}

impl SignerKind {
    /// Selects the regime in force for `config` at block `number`.
    pub fn for_block(config: &ChainConfig, number: u64) -> Self {
        if config.is_eip155_active_at_block(number) {
            Self::Eip155 { chain_id: config.chain_id }
        } else if config.is_homestead_active_at_block(number) {
            Self::Homestead
        } else {
            Self::Frontier
        }
    }

    /// The hash a sender must sign to authorize `tx` under this regime.
    pub fn signature_hash(&self, tx: &Transaction) -> B256 {
        match *self {
            Self::Frontier | Self::Homestead => tx.signature_hash(None),
            Self::Eip155 { chain_id } => tx.signature_hash(Some(chain_id)),
        }
    }
}

/// Whether a transaction `v` value carries EIP-155 replay protection.
pub const fn is_protected_v(v: u64) -> bool {
    v != 27 && v != 28
}
