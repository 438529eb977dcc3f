use alloy_primitives::{Address, Bytes, TxKind, U256};

use crate::{Signer, SignerError, Transaction};

/// The execution-level view of a transaction: the recovered sender plus
/// the fields the VM consumes, free of signature material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Recovered sender.
    pub from: Address,
    /// Recipient, or [`TxKind::Create`] for contract creation.
    pub to: TxKind,
    /// Sender nonce carried by the transaction.
    pub nonce: u64,
    /// Value transferred.
    pub value: U256,
    /// Gas limit granted by the sender.
    pub gas_limit: u64,
    /// Price per unit of gas.
    pub gas_price: U256,
    /// Call data or init code.
    pub input: Bytes,
    /// Whether the nonce must match the sender account. Always set for
    /// transactions taken from a block; internal calls clear it.
    pub check_nonce: bool,
}

impl Message {
    /// Decodes `tx` into a message, recovering the sender with `signer`.
    pub fn from_transaction(tx: &Transaction, signer: &dyn Signer) -> Result<Self, SignerError> {
        Ok(Self {
            from: signer.sender(tx)?,
            to: tx.to,
            nonce: tx.nonce,
            value: tx.value,
            gas_limit: tx.gas_limit,
            gas_price: tx.gas_price,
            input: tx.input.clone(),
            check_nonce: true,
        })
    }

    /// Whether this message creates a contract.
    pub const fn is_create(&self) -> bool {
        matches!(self.to, TxKind::Create)
    }
}
