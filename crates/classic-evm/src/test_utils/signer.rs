use alloy_primitives::{Address, Signature, B256, U256};

use crate::{is_protected_v, ChainConfig, Signer, SignerError, SignerKind, Transaction};

/// Order of the secp256k1 curve,
/// `0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141`.
const SECP256K1_N: U256 = U256::from_limbs([
    0xbfd25e8cd0364141,
    0xbaaedce6af48a03b,
    0xfffffffffffffffe,
    0xffffffffffffffff,
]);

/// Half the curve order; Homestead rejects signatures with `s` above this.
const SECP256K1_HALF_N: U256 = U256::from_limbs([
    0xdfe92f46681b20a0,
    0x5d576e7357a4501d,
    0xffffffffffffffff,
    0x7fffffffffffffff,
]);

/// A [`Signer`] performing real secp256k1 point recovery under a fixed
/// [`SignerKind`], so fixtures can round-trip transactions produced by
/// [`signed_transaction`](crate::test_utils::signed_transaction).
///
/// A node supplies its own [`Signer`]; this one stands in for it in
/// tests.
#[derive(Debug, Clone, Copy)]
pub struct RecoveringSigner {
    kind: SignerKind,
}

impl RecoveringSigner {
    /// A signer applying the regime `kind`.
    pub const fn new(kind: SignerKind) -> Self {
        Self { kind }
    }

    /// A signer applying the regime in force for `config` at block
    /// `number`.
    pub fn for_block(config: &ChainConfig, number: u64) -> Self {
        Self::new(SignerKind::for_block(config, number))
    }

    /// The regime this signer applies.
    pub const fn kind(&self) -> SignerKind {
        self.kind
    }
}

impl Signer for RecoveringSigner {
    fn sender(&self, tx: &Transaction) -> Result<Address, SignerError> {
        match self.kind {
            SignerKind::Frontier => recover_unprotected(tx, false),
            SignerKind::Homestead => recover_unprotected(tx, true),
            SignerKind::Eip155 { chain_id } => {
                if !is_protected_v(tx.v) {
                    // Pre-155 transactions stay valid on 155 chains.
                    return recover_unprotected(tx, true);
                }
                let tx_chain_id = (tx.v - 35) / 2;
                if tx_chain_id != chain_id {
                    return Err(SignerError::InvalidChainId { tx: tx_chain_id, signer: chain_id });
                }
                let parity = (tx.v - 35) % 2 == 1;
                recover(tx, tx.signature_hash(Some(chain_id)), parity, true)
            }
        }
    }
}

fn recover_unprotected(tx: &Transaction, homestead: bool) -> Result<Address, SignerError> {
    if is_protected_v(tx.v) {
        return Err(SignerError::InvalidSignatureValues);
    }
    recover(tx, tx.signature_hash(None), tx.v == 28, homestead)
}

fn recover(
    tx: &Transaction,
    sighash: B256,
    parity: bool,
    homestead: bool,
) -> Result<Address, SignerError> {
    if !validate_signature_values(tx.r, tx.s, homestead) {
        return Err(SignerError::InvalidSignatureValues);
    }
    Signature::new(tx.r, tx.s, parity)
        .recover_address_from_prehash(&sighash)
        .map_err(|_| SignerError::RecoveryFailed)
}

/// Range-checks the signature scalars. Both must be nonzero and below the
/// curve order; Homestead additionally bounds `s` to the lower half of the
/// curve to remove signature malleability.
fn validate_signature_values(r: U256, s: U256, homestead: bool) -> bool {
    if r.is_zero() || s.is_zero() {
        return false;
    }
    if homestead && s > SECP256K1_HALF_N {
        return false;
    }
    r < SECP256K1_N && s < SECP256K1_N
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{dev_address, dev_signed_transaction, DEV_KEY};
    use alloy_primitives::TxKind;

    fn transfer_fields() -> Transaction {
        Transaction {
            nonce: 0,
            gas_price: U256::from(1u64),
            gas_limit: 21000,
            to: TxKind::Call(Address::repeat_byte(0x11)),
            value: U256::from(1u64),
            ..Default::default()
        }
    }

    #[test]
    fn homestead_round_trip() {
        let signer = RecoveringSigner::new(SignerKind::Homestead);
        let tx = dev_signed_transaction(transfer_fields(), SignerKind::Homestead);
        assert_eq!(signer.sender(&tx).unwrap(), dev_address());
    }

    #[test]
    fn eip155_round_trip_and_chain_binding() {
        let kind = SignerKind::Eip155 { chain_id: 64 };
        let tx = dev_signed_transaction(transfer_fields(), kind);
        assert!(tx.v == 163 || tx.v == 164, "v must fold in the chain id, got {}", tx.v);
        assert_eq!(RecoveringSigner::new(kind).sender(&tx).unwrap(), dev_address());

        // The same transaction is rejected by a signer bound to another chain.
        let other = RecoveringSigner::new(SignerKind::Eip155 { chain_id: 61 });
        assert_eq!(
            other.sender(&tx),
            Err(SignerError::InvalidChainId { tx: 64, signer: 61 })
        );
    }

    #[test]
    fn eip155_signer_accepts_unprotected_transactions() {
        let homestead_tx = dev_signed_transaction(transfer_fields(), SignerKind::Homestead);
        let signer = RecoveringSigner::new(SignerKind::Eip155 { chain_id: 64 });
        assert_eq!(signer.sender(&homestead_tx).unwrap(), dev_address());
    }

    #[test]
    fn homestead_rejects_the_malleable_twin() {
        let signer = RecoveringSigner::new(SignerKind::Homestead);
        let tx = dev_signed_transaction(transfer_fields(), SignerKind::Homestead);

        // Flip the signature to its high-s twin; it recovers the same key
        // under Frontier rules but Homestead rejects it outright.
        let mut twin = tx.clone();
        twin.s = SECP256K1_N - tx.s;
        twin.v = if tx.v == 27 { 28 } else { 27 };

        assert_eq!(signer.sender(&twin), Err(SignerError::InvalidSignatureValues));
        assert_eq!(
            RecoveringSigner::new(SignerKind::Frontier).sender(&twin).unwrap(),
            dev_address()
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let signer = RecoveringSigner::new(SignerKind::Homestead);
        let mut tx = dev_signed_transaction(transfer_fields(), SignerKind::Homestead);
        tx.v = 31; // protected-range v on an unprotected regime
        assert_eq!(signer.sender(&tx), Err(SignerError::InvalidSignatureValues));

        let mut tx = dev_signed_transaction(transfer_fields(), SignerKind::Homestead);
        tx.r = U256::ZERO;
        assert_eq!(signer.sender(&tx), Err(SignerError::InvalidSignatureValues));

        let mut tx = dev_signed_transaction(transfer_fields(), SignerKind::Homestead);
        tx.s = SECP256K1_N;
        assert_eq!(signer.sender(&tx), Err(SignerError::InvalidSignatureValues));
    }

    #[test]
    fn dev_key_is_usable() {
        // Guards the fixture itself: the hard-coded key must stay in sync
        // with the derived address.
        assert_eq!(DEV_KEY.len(), 32);
        assert_ne!(dev_address(), Address::ZERO);
    }
}
