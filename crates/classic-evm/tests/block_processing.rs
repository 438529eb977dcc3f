//! End-to-end tests for the block processor on the native interpreter
//! path: receipt layout across the EIP-658 boundary, gas accounting
//! against the block budget, the DAO irregular state change, and the
//! all-or-nothing failure policy.

use std::sync::Arc;

use alloy_hardforks::ForkCondition;
use alloy_primitives::{bytes, Address, BloomInput, Bytes, TxKind, B256, U256};
use classic_evm::{
    test_utils::{
        dev_address, dev_signed_transaction, header_at, CountingEngine, MemoryStateDb, MockChain,
        NoopEngine, RecoveringSigner, ScriptedInterpreter, ScriptedOutcome, TransferInterpreter,
    },
    Block, ChainConfig, ExecutionError, Log, SignerKind, StateDb, StateProcessor, Transaction,
    VmConfig, DAO_HARDFORK_BENEFICIARY,
};

const RECIPIENT: Address = Address::repeat_byte(0x22);

fn native_config() -> VmConfig {
    VmConfig::new(Arc::new(TransferInterpreter::default()))
}

fn pre_658() -> ChainConfig {
    ChainConfig { eip658: ForkCondition::Never, ..ChainConfig::default() }
}

fn processor<E: classic_evm::ConsensusEngine>(
    config: &ChainConfig,
    engine: E,
) -> StateProcessor<MockChain, E, RecoveringSigner> {
    let signer = RecoveringSigner::for_block(config, 1);
    StateProcessor::new(config.clone(), MockChain::with_ancestry(5), engine, signer)
}

fn block_at(number: u64, transactions: Vec<Transaction>) -> Block {
    Block { header: header_at(number), transactions, uncles: Vec::new() }
}

fn transfer(nonce: u64, value: U256, gas_limit: u64, config: &ChainConfig) -> Transaction {
    let tx = Transaction {
        nonce,
        gas_price: U256::from(1u64),
        gas_limit,
        to: TxKind::Call(RECIPIENT),
        value,
        input: Bytes::new(),
        ..Default::default()
    };
    dev_signed_transaction(tx, SignerKind::for_block(config, 1))
}

#[test]
fn empty_block_finalizes_once_and_yields_nothing() {
    let engine = CountingEngine::new();
    let processor = processor(&ChainConfig::default(), engine.clone());
    let mut state = MemoryStateDb::default();

    let output = processor.process(&block_at(1, Vec::new()), &mut state, &native_config()).unwrap();

    assert!(output.receipts.is_empty());
    assert!(output.logs.is_empty());
    assert_eq!(output.gas_used, 0);
    assert_eq!(engine.calls(), 1);
}

#[test]
fn pure_transfer_pre_658_carries_an_intermediate_root() {
    let config = pre_658();
    let tx = transfer(0, U256::from(10u64).pow(U256::from(17u64)), 21000, &config);
    let block = block_at(1, vec![tx.clone()]);
    let processor = processor(&config, NoopEngine);

    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    let output = processor.process(&block, &mut state, &native_config()).unwrap();

    let receipt = &output.receipts[0];
    assert_eq!(receipt.gas_used, 21000);
    assert_eq!(receipt.cumulative_gas_used, 21000);
    assert_eq!(output.gas_used, 21000);
    assert!(receipt.post_state_root().is_some());
    assert!(!receipt.is_failed());
    assert!(receipt.logs.is_empty());
    assert_eq!(receipt.contract_address, None);
    assert_eq!(receipt.tx_hash, tx.hash());
    assert_eq!(receipt.block_hash, block.hash());
    assert_eq!(receipt.block_number, 1);
    assert_eq!(receipt.transaction_index, 0);

    // The money moved: value to the recipient, the fee to the coinbase,
    // the rest refunded.
    let value = U256::from(10u64).pow(U256::from(17u64));
    let spent = value + U256::from(21000u64);
    assert_eq!(state.balance(RECIPIENT), value);
    assert_eq!(state.balance(block.header.coinbase), U256::from(21000u64));
    assert_eq!(
        state.balance(dev_address()),
        U256::from(10u64).pow(U256::from(18u64)) - spent
    );
    assert_eq!(state.nonce(dev_address()), 1);
}

#[test]
fn contract_creation_post_658_derives_the_authored_nonce_address() {
    let config = ChainConfig::default();
    let init_code = bytes!("6001600155");
    let tx = dev_signed_transaction(
        Transaction {
            nonce: 5,
            gas_price: U256::from(1u64),
            gas_limit: 100_000,
            to: TxKind::Create,
            value: U256::ZERO,
            input: init_code,
            ..Default::default()
        },
        SignerKind::for_block(&config, 1),
    );
    let block = block_at(1, vec![tx]);
    let processor = processor(&config, NoopEngine);

    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    state.set_nonce(dev_address(), 5);
    let output = processor.process(&block, &mut state, &native_config()).unwrap();

    let receipt = &output.receipts[0];
    assert_eq!(receipt.contract_address, Some(dev_address().create(5)));
    assert_eq!(receipt.post_state_root(), None);
    assert!(!receipt.is_failed());
    // Creation base cost plus five non-zero init-code bytes.
    assert_eq!(receipt.gas_used, 53000 + 5 * 68);
}

#[test]
fn reverted_transaction_still_receives_a_receipt() {
    let config = ChainConfig::default();
    let tx = transfer(0, U256::ZERO, 50_000, &config);
    let block = block_at(1, vec![tx]);
    let processor = processor(&config, NoopEngine);

    // The interpreter reverts after consuming 30_000 gas; logs emitted
    // before the revert are discarded with the rest of the frame.
    let interpreter = ScriptedInterpreter::new([ScriptedOutcome {
        gas_used: 30_000,
        failed: true,
        logs: vec![Log { address: RECIPIENT, ..Default::default() }],
        error: None,
    }]);
    let vm_config = VmConfig::new(Arc::new(interpreter));

    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    let output = processor.process(&block, &mut state, &vm_config).unwrap();

    let receipt = &output.receipts[0];
    assert!(receipt.is_failed());
    assert_eq!(receipt.gas_used, 30_000);
    assert!(receipt.logs.is_empty());
    assert!(output.logs.is_empty());
}

#[test]
fn dao_hook_fires_before_the_first_transaction() {
    let victim = Address::repeat_byte(0x77);
    let config = ChainConfig {
        dao_fork: ForkCondition::Block(5),
        dao_fork_support: true,
        dao_drain_list: vec![victim],
        ..pre_658()
    };
    let value = U256::from(1000u64);
    let tx = transfer(0, value, 21000, &config);
    let block = block_at(5, vec![tx]);
    let processor = processor(&config, NoopEngine);

    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    state.set_balance(victim, U256::from(5555u64));
    processor.process(&block, &mut state, &native_config()).unwrap();

    // Both the irregular state change and the normal transfer landed.
    assert_eq!(state.balance(DAO_HARDFORK_BENEFICIARY), U256::from(5555u64));
    assert_eq!(state.balance(victim), U256::ZERO);
    assert_eq!(state.balance(RECIPIENT), value);
}

#[test]
fn overflowing_the_block_budget_aborts_the_whole_block() {
    let config = ChainConfig::default();
    let mut header = header_at(1);
    header.gas_limit = 100_000;
    let limit = header.gas_limit * 3 / 4;
    let block = Block {
        header,
        transactions: vec![
            transfer(0, U256::ZERO, limit, &config),
            transfer(1, U256::ZERO, limit, &config),
        ],
        uncles: Vec::new(),
    };
    let processor = processor(&config, NoopEngine);

    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    let err = processor.process(&block, &mut state, &native_config()).unwrap_err();
    assert_eq!(err, ExecutionError::GasLimitReached);
}

#[test]
fn a_block_exactly_filling_its_budget_is_admitted() {
    let config = ChainConfig::default();
    let mut header = header_at(1);
    header.gas_limit = 42_000;
    let transactions = vec![
        transfer(0, U256::ZERO, 21_000, &config),
        transfer(1, U256::ZERO, 21_000, &config),
    ];

    let block = Block { header: header.clone(), transactions: transactions.clone(), uncles: vec![] };
    let processor = processor(&config, NoopEngine);
    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    let output = processor.process(&block, &mut state, &native_config()).unwrap();
    assert_eq!(output.gas_used, 42_000);

    // One unit less of headroom rejects the second transaction.
    let mut short_header = header;
    short_header.gas_limit = 41_999;
    let block = Block { header: short_header, transactions, uncles: vec![] };
    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    let err = processor.process(&block, &mut state, &native_config()).unwrap_err();
    assert_eq!(err, ExecutionError::GasLimitReached);
}

#[test]
fn receipts_and_logs_keep_inclusion_order() {
    let config = ChainConfig::default();
    let log_a = Log {
        address: Address::repeat_byte(0xa1),
        topics: vec![B256::repeat_byte(0x01)],
        data: bytes!("aa"),
        block_number: 0,
    };
    let log_b = Log {
        address: Address::repeat_byte(0xb2),
        topics: vec![B256::repeat_byte(0x02), B256::repeat_byte(0x03)],
        data: bytes!("bb"),
        block_number: 0,
    };
    let interpreter = ScriptedInterpreter::new([
        ScriptedOutcome { gas_used: 30_000, logs: vec![log_a.clone()], ..Default::default() },
        ScriptedOutcome { gas_used: 40_000, logs: vec![log_b.clone()], ..Default::default() },
    ]);
    let vm_config = VmConfig::new(Arc::new(interpreter));

    let block = block_at(
        1,
        vec![
            transfer(0, U256::ZERO, 50_000, &config),
            transfer(1, U256::ZERO, 50_000, &config),
        ],
    );
    let processor = processor(&config, NoopEngine);
    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    let output = processor.process(&block, &mut state, &vm_config).unwrap();

    assert_eq!(output.receipts.len(), 2);
    assert_eq!(output.receipts[0].transaction_index, 0);
    assert_eq!(output.receipts[1].transaction_index, 1);
    assert_eq!(output.receipts[0].cumulative_gas_used, 30_000);
    assert_eq!(output.receipts[1].cumulative_gas_used, 70_000);
    assert_eq!(output.gas_used, 70_000);

    // allLogs is the in-order concatenation of the receipts' logs.
    let concatenated: Vec<_> = output
        .receipts
        .iter()
        .flat_map(|receipt| receipt.logs.iter().cloned())
        .collect();
    assert_eq!(output.logs, concatenated);
    assert_eq!(output.logs[0].address, log_a.address);
    assert_eq!(output.logs[1].address, log_b.address);

    // Every (address, topic) pair of a receipt's logs is in its bloom.
    for receipt in &output.receipts {
        for log in &receipt.logs {
            assert!(receipt.logs_bloom.contains_input(BloomInput::Raw(log.address.as_slice())));
            for topic in &log.topics {
                assert!(receipt.logs_bloom.contains_input(BloomInput::Raw(topic.as_slice())));
            }
        }
    }
}

#[test]
fn processing_is_deterministic() {
    let config = pre_658();
    let block = block_at(
        1,
        vec![
            transfer(0, U256::from(1234u64), 21000, &config),
            transfer(1, U256::from(5678u64), 21000, &config),
        ],
    );
    let pre_state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));

    let processor = processor(&config, NoopEngine);
    let mut state_a = pre_state.clone();
    let first = processor.process(&block, &mut state_a, &native_config()).unwrap();
    let mut state_b = pre_state;
    let second = processor.process(&block, &mut state_b, &native_config()).unwrap();

    assert_eq!(first.receipts, second.receipts);
    assert_eq!(first.logs, second.logs);
    assert_eq!(first.gas_used, second.gas_used);
    assert_eq!(
        state_a.intermediate_root(false),
        state_b.intermediate_root(false)
    );
}

#[test]
fn receipt_scope_matches_the_prepared_state_scope() {
    let config = ChainConfig::default();
    let tx = transfer(0, U256::ZERO, 21000, &config);
    let hash = tx.hash();
    let block = block_at(1, vec![tx]);
    let processor = processor(&config, NoopEngine);
    let mut state = MemoryStateDb::funded(dev_address(), U256::from(10u64).pow(U256::from(18u64)));
    let output = processor.process(&block, &mut state, &native_config()).unwrap();

    assert_eq!(output.receipts[0].tx_hash, hash);
    assert_eq!(output.receipts[0].block_hash, block.hash());
    assert_eq!(state.logs_for(hash), Vec::new());
}
