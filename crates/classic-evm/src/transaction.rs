use alloy_primitives::{keccak256, Bytes, TxKind, B256, U256};
use alloy_rlp::{Encodable, Header as RlpHeader};

/// A signed transaction as it appears in a block body.
///
/// Only the legacy wire shape exists on Classic-lineage chains: nine RLP
/// fields, with replay protection folded into `v` once EIP-155 activates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Sender account nonce at authoring time.
    pub nonce: u64,
    /// Price per unit of gas.
    pub gas_price: U256,
    /// Maximum gas the sender grants this transaction.
    pub gas_limit: u64,
    /// Recipient, or [`TxKind::Create`] for contract creation.
    pub to: TxKind,
    /// Value transferred to the recipient or endowed to the new contract.
    pub value: U256,
    /// Call data or init code.
    pub input: Bytes,
    /// Signature recovery value, possibly chain-id-folded per EIP-155.
    pub v: u64,
    /// Signature r value.
    pub r: U256,
    /// Signature s value.
    pub s: U256,
}

impl Transaction {
    /// The transaction hash: keccak of the full nine-field RLP encoding.
    pub fn hash(&self) -> B256 {
        let encoded = encode_fields(&[
            &self.nonce,
            &self.gas_price,
            &self.gas_limit,
            &self.to,
            &self.value,
            &self.input,
            &self.v,
            &self.r,
            &self.s,
        ]);
        keccak256(&encoded)
    }

    /// Whether this transaction creates a contract.
    pub const fn is_create(&self) -> bool {
        matches!(self.to, TxKind::Create)
    }

    /// The hash the sender signed. Without a chain id this is the
    /// six-field pre-EIP-155 payload; with one, the nine-field payload of
    /// EIP-155 with zeroed r and s placeholders.
    pub fn signature_hash(&self, chain_id: Option<u64>) -> B256 {
        let encoded = match chain_id {
            None => encode_fields(&[
                &self.nonce,
                &self.gas_price,
                &self.gas_limit,
                &self.to,
                &self.value,
                &self.input,
            ]),
            Some(chain_id) => encode_fields(&[
                &self.nonce,
                &self.gas_price,
                &self.gas_limit,
                &self.to,
                &self.value,
                &self.input,
                &chain_id,
                &0u8,
                &0u8,
            ]),
        };
        keccak256(&encoded)
    }
}

/// RLP-encodes a heterogeneous list of fields.
fn encode_fields(fields: &[&dyn Encodable]) -> Vec<u8> {
    let payload_length: usize = fields.iter().map(|field| field.length()).sum();
    let mut out = Vec::with_capacity(payload_length + 9);
    RlpHeader { list: true, payload_length }.encode(&mut out);
    for field in fields {
        field.encode(&mut out);
    }
    out
}
