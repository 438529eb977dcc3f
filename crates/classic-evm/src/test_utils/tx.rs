use alloy_primitives::{keccak256, Address, U256};
use k256::ecdsa::SigningKey;

use crate::{SignerKind, Transaction};

/// A fixed development key for signing test transactions.
pub const DEV_KEY: [u8; 32] = [
    0x59, 0xc6, 0x99, 0x5e, 0x99, 0x8f, 0x97, 0xa5, 0xa0, 0x04, 0x49, 0x66, 0xf0, 0x94, 0x53,
    0x89, 0xdc, 0x9e, 0x86, 0xda, 0xe8, 0x8c, 0x7a, 0x84, 0x12, 0xf4, 0x60, 0x3b, 0x6b, 0x78,
    0x69, 0x0d,
];

/// The address controlled by [`DEV_KEY`].
pub fn dev_address() -> Address {
    key_address(&DEV_KEY)
}

/// The address controlled by a raw private key.
pub fn key_address(key: &[u8; 32]) -> Address {
    let signing_key = SigningKey::from_slice(key).expect("valid private key");
    let public = signing_key.verifying_key().to_encoded_point(false);
    Address::from_slice(&keccak256(&public.as_bytes()[1..])[12..])
}

/// Signs `tx` with [`DEV_KEY`] under the given signature regime.
pub fn dev_signed_transaction(tx: Transaction, kind: SignerKind) -> Transaction {
    signed_transaction(&DEV_KEY, tx, kind)
}

/// Signs `tx` with `key` under the given signature regime, filling in the
/// `v`, `r`, `s` fields.
pub fn signed_transaction(key: &[u8; 32], mut tx: Transaction, kind: SignerKind) -> Transaction {
    let signing_key = SigningKey::from_slice(key).expect("valid private key");
    let sighash = kind.signature_hash(&tx);
    let (signature, recovery_id) = signing_key
        .sign_prehash_recoverable(sighash.as_slice())
        .expect("prehash signing cannot fail");

    tx.r = U256::from_be_slice(signature.r().to_bytes().as_slice());
    tx.s = U256::from_be_slice(signature.s().to_bytes().as_slice());
    tx.v = match kind {
        SignerKind::Frontier | SignerKind::Homestead => 27 + u64::from(recovery_id.to_byte()),
        SignerKind::Eip155 { chain_id } => 35 + 2 * chain_id + u64::from(recovery_id.to_byte()),
    };
    tx
}
