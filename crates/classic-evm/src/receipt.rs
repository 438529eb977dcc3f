use alloy_consensus::Eip658Value;
use alloy_primitives::{Address, Bloom, BloomInput, Bytes, B256};

/// A log record emitted during transaction execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Log {
    /// Address of the contract that emitted the log.
    pub address: Address,
    /// Indexed topics, at most four.
    pub topics: Vec<B256>,
    /// Unindexed payload.
    pub data: Bytes,
    /// Height of the block the log was emitted in.
    pub block_number: u64,
}

/// The receipt produced by applying one transaction.
///
/// The `outcome` field carries the intermediate state root before the
/// receipt-status rule (EIP-658) activates and the success flag
/// afterwards; the two are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Post-transaction state root or success flag, depending on the
    /// rule phase.
    pub outcome: Eip658Value,
    /// Running gas total of the block up to and including this
    /// transaction.
    pub cumulative_gas_used: u64,
    /// Hash of the transaction this receipt belongs to.
    pub tx_hash: B256,
    /// Address of the created contract, for creation transactions.
    pub contract_address: Option<Address>,
    /// Logs emitted by this transaction, in emission order.
    pub logs: Vec<Log>,
    /// Bloom filter over the `logs` addresses and topics.
    pub logs_bloom: Bloom,
    /// Gas consumed by this transaction alone.
    pub gas_used: u64,
    /// Hash of the enclosing block.
    pub block_hash: B256,
    /// Height of the enclosing block.
    pub block_number: u64,
    /// Position of the transaction within the block.
    pub transaction_index: u32,
}

impl Receipt {
    /// The intermediate state root, present only before EIP-658.
    pub fn post_state_root(&self) -> Option<B256> {
        match &self.outcome {
            Eip658Value::PostState(root) => Some(*root),
            Eip658Value::Eip658(_) => None,
        }
    }

    /// Whether execution failed. Only meaningful once EIP-658 is active;
    /// root-carrying receipts report `false`.
    pub fn is_failed(&self) -> bool {
        match &self.outcome {
            Eip658Value::Eip658(success) => !success,
            Eip658Value::PostState(_) => false,
        }
    }
}

/// Builds the 2048-bit bloom filter over a transaction's logs: every log
/// address and every topic is accrued.
pub fn logs_bloom<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Bloom {
    let mut bloom = Bloom::ZERO;
    for log in logs {
        bloom.accrue(BloomInput::Raw(log.address.as_slice()));
        for topic in &log.topics {
            bloom.accrue(BloomInput::Raw(topic.as_slice()));
        }
    }
    bloom
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, bytes};

    #[test]
    fn bloom_contains_every_address_and_topic() {
        let logs = [
            Log {
                address: address!("00000000000000000000000000000000000000aa"),
                topics: vec![
                    b256!("1111111111111111111111111111111111111111111111111111111111111111"),
                    b256!("2222222222222222222222222222222222222222222222222222222222222222"),
                ],
                data: bytes!("deadbeef"),
                block_number: 1,
            },
            Log {
                address: address!("00000000000000000000000000000000000000bb"),
                topics: vec![],
                data: Bytes::new(),
                block_number: 1,
            },
        ];
        let bloom = logs_bloom(&logs);

        for log in &logs {
            assert!(bloom.contains_input(BloomInput::Raw(log.address.as_slice())));
            for topic in &log.topics {
                assert!(bloom.contains_input(BloomInput::Raw(topic.as_slice())));
            }
        }
        // Data is not accrued.
        assert!(!bloom.contains_input(BloomInput::Raw(b"deadbeef")));
    }

    #[test]
    fn empty_log_set_yields_the_zero_bloom() {
        assert_eq!(logs_bloom([]), Bloom::ZERO);
    }

    #[test]
    fn outcome_accessors_are_mutually_exclusive() {
        let root = b256!("3333333333333333333333333333333333333333333333333333333333333333");
        let pre = Receipt {
            outcome: Eip658Value::PostState(root),
            cumulative_gas_used: 21000,
            tx_hash: B256::ZERO,
            contract_address: None,
            logs: vec![],
            logs_bloom: Bloom::ZERO,
            gas_used: 21000,
            block_hash: B256::ZERO,
            block_number: 1,
            transaction_index: 0,
        };
        assert_eq!(pre.post_state_root(), Some(root));
        assert!(!pre.is_failed());

        let post = Receipt { outcome: Eip658Value::Eip658(false), ..pre };
        assert_eq!(post.post_state_root(), None);
        assert!(post.is_failed());
    }
}
