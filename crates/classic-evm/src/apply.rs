use alloy_consensus::Eip658Value;
use alloy_primitives::Address;

use crate::{
    apply_svm_transaction, logs_bloom, ChainConfig, ChainContext, EvmContext, ExecutionError,
    GasPool, Header, Interpreter, Message, Receipt, Signer, StateDb, Transaction, VmConfig,
};

/// Applies one transaction with the backend selected by `vm_config` and
/// returns its receipt and gas consumption.
///
/// The two backends share this signature and diverge in nearly every
/// internal step — finalisation flags and error surfacing included — so
/// the dispatch happens here and nowhere deeper.
#[allow(clippy::too_many_arguments)]
pub fn apply_transaction(
    config: &ChainConfig,
    chain: &dyn ChainContext,
    author: Option<Address>,
    gas_pool: &mut GasPool,
    state: &mut dyn StateDb,
    header: &Header,
    tx: &Transaction,
    used_gas: &mut u64,
    vm_config: &VmConfig,
    signer: &dyn Signer,
) -> Result<(Receipt, u64), ExecutionError> {
    if vm_config.uses_svm() {
        let factory = vm_config.external.as_deref().ok_or(ExecutionError::SvmUnavailable)?;
        return apply_svm_transaction(
            config, chain, author, gas_pool, state, header, tx, used_gas, factory, signer,
        );
    }
    apply_native_transaction(
        config,
        chain,
        author,
        gas_pool,
        state,
        header,
        tx,
        used_gas,
        vm_config.native.as_ref(),
        signer,
    )
}

/// Applies one transaction through the in-process interpreter.
#[allow(clippy::too_many_arguments)]
pub fn apply_native_transaction(
    config: &ChainConfig,
    chain: &dyn ChainContext,
    author: Option<Address>,
    gas_pool: &mut GasPool,
    state: &mut dyn StateDb,
    header: &Header,
    tx: &Transaction,
    used_gas: &mut u64,
    interpreter: &dyn Interpreter,
    signer: &dyn Signer,
) -> Result<(Receipt, u64), ExecutionError> {
    let msg = Message::from_transaction(tx, signer)?;

    let ctx = EvmContext::new(&msg, header, chain, author);

    // The interpreter owns the whole message lifecycle: intrinsic gas, the
    // upfront gas purchase, bytecode, the refund, and the coinbase fee. A
    // revert comes back as `failed`, not as an error.
    let message_outcome = interpreter.apply_message(&ctx, state, &msg, gas_pool)?;

    let outcome = if config.is_eip658_active_at_block(header.number) {
        state.finalise(config.is_eip161_active_at_block(header.number));
        Eip658Value::Eip658(!message_outcome.failed)
    } else {
        Eip658Value::PostState(
            state.intermediate_root(config.is_eip161_active_at_block(header.number)),
        )
    };

    *used_gas += message_outcome.gas_used;

    let logs = state.logs_for(tx.hash());
    let receipt = Receipt {
        outcome,
        cumulative_gas_used: *used_gas,
        tx_hash: tx.hash(),
        // The created contract lives at the address derived from the
        // sender and the authored (pre-increment) nonce.
        contract_address: msg.is_create().then(|| msg.from.create(tx.nonce)),
        logs_bloom: logs_bloom(&logs),
        logs,
        gas_used: message_outcome.gas_used,
        block_hash: state.block_hash(),
        block_number: header.number,
        transaction_index: state.tx_index(),
    };

    Ok((receipt, message_outcome.gas_used))
}
