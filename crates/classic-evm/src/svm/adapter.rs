use alloy_consensus::Eip658Value;
use alloy_primitives::{Address, B256, U256};

use crate::{
    block_hash_fn, logs_bloom, AccountChange, ChainConfig, ChainContext, ExecutionError, GasPool,
    Header, Log, Message, Patch, Receipt, Signer, StateDb, StepVmFactory, Transaction,
    VmHeaderParams, VmRequire, VmTransaction,
};

/// Applies one transaction through the external stepwise VM and emits its
/// receipt.
///
/// The external core requires an already-valid transaction, so the host
/// validates nonce, balance, and block gas headroom before constructing
/// the VM. The shared gas pool is not debited on this path; the
/// `used_gas` headroom check is the adapter's admission control.
#[allow(clippy::too_many_arguments)]
pub fn apply_svm_transaction(
    config: &ChainConfig,
    chain: &dyn ChainContext,
    _author: Option<Address>,
    _gas_pool: &mut GasPool,
    state: &mut dyn StateDb,
    header: &Header,
    tx: &Transaction,
    used_gas: &mut u64,
    factory: &dyn StepVmFactory,
    signer: &dyn Signer,
) -> Result<(Receipt, u64), ExecutionError> {
    let msg = Message::from_transaction(tx, signer)?;
    precheck(&*state, header, &msg, *used_gas)?;

    let patch = Patch::for_block(config, header.number);
    let vm_tx = VmTransaction {
        caller: msg.from,
        gas_price: tx.gas_price,
        gas_limit: U256::from(tx.gas_limit),
        action: tx.to,
        value: tx.value,
        input: tx.input.clone(),
        nonce: U256::from(tx.nonce),
    };
    let vm_header = VmHeaderParams {
        beneficiary: header.coinbase,
        timestamp: header.time,
        number: U256::from(header.number),
        difficulty: header.difficulty,
        gas_limit: U256::from(header.gas_limit),
    };

    let mut vm = factory.create(&patch, &vm_tx, &vm_header);
    let ancestor_hash = block_hash_fn(header, chain);

    // Request-satisfaction loop: the VM suspends on every unsatisfied data
    // requirement and the host replies until execution completes.
    loop {
        match vm.fire() {
            VmRequire::None => break,
            VmRequire::Account(address) => {
                if state.exists(address) {
                    vm.commit_account(
                        address,
                        U256::from(state.nonce(address)),
                        state.balance(address),
                        state.code(address),
                    );
                } else {
                    vm.commit_nonexist(address);
                }
            }
            VmRequire::AccountCode(address) => {
                if state.exists(address) {
                    vm.commit_account_code(address, state.code(address));
                } else {
                    vm.commit_nonexist(address);
                }
            }
            VmRequire::AccountStorage(address, key) => {
                if state.exists(address) {
                    let value = state.storage(address, B256::from(key));
                    vm.commit_account_storage(address, key, U256::from_be_bytes(value.0));
                } else {
                    vm.commit_nonexist(address);
                }
            }
            VmRequire::Blockhash(number) => {
                let hash = ancestor_hash(number.saturating_to());
                vm.commit_blockhash(number, hash);
            }
        }
    }

    // Execution is finished; reconcile the VM's view back into the state
    // database, preserving the reported order.
    for change in vm.account_changes() {
        apply_account_change(state, change);
    }
    for log in vm.logs() {
        state.add_log(Log {
            address: log.address,
            topics: log.topics,
            data: log.data,
            block_number: header.number,
        });
    }

    let outcome = if config.is_eip658_active_at_block(header.number) {
        // This path always deletes empty accounts at the commit,
        // regardless of the EIP-161 height.
        state.finalise(true);
        Eip658Value::Eip658(!vm.failed())
    } else {
        Eip658Value::PostState(
            state.intermediate_root(config.is_eip161_active_at_block(header.number)),
        )
    };

    let gas = vm.used_gas().saturating_to::<u64>();
    *used_gas += gas;

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
        gas_used: gas,
        block_hash: state.block_hash(),
        block_number: header.number,
        transaction_index: state.tx_index(),
    };

    Ok((receipt, gas))
}

/// Validates `msg` before the external VM is constructed.
fn precheck(
    state: &dyn StateDb,
    header: &Header,
    msg: &Message,
    used_gas: u64,
) -> Result<(), ExecutionError> {
    if msg.check_nonce {
        let state_nonce = state.nonce(msg.from);
        if state_nonce < msg.nonce {
            return Err(ExecutionError::NonceTooHigh {
                address: msg.from,
                tx_nonce: msg.nonce,
                state_nonce,
            });
        }
        if state_nonce > msg.nonce {
            return Err(ExecutionError::NonceTooLow {
                address: msg.from,
                tx_nonce: msg.nonce,
                state_nonce,
            });
        }
    }

    let gas_purchase = U256::from(msg.gas_limit).saturating_mul(msg.gas_price);
    let balance = state.balance(msg.from);
    if balance < gas_purchase {
        return Err(ExecutionError::InsufficientBalanceForGas {
            address: msg.from,
            have: balance,
            want: gas_purchase,
        });
    }

    if used_gas.saturating_add(msg.gas_limit) > header.gas_limit {
        return Err(ExecutionError::GasLimitReached);
    }

    Ok(())
}

/// Applies one account-change record to the state database.
fn apply_account_change(state: &mut dyn StateDb, change: AccountChange) {
    match change {
        AccountChange::IncreaseBalance { address, amount } => {
            state.add_balance(address, amount);
        }
        AccountChange::DecreaseBalance { address, amount } => {
            // The VM has already checked the balance covers the debit.
            let balance = state.balance(address).saturating_sub(amount);
            state.set_balance(address, balance);
        }
        AccountChange::Removed { address } => {
            state.suicide(address);
        }
        AccountChange::Full { address, nonce, balance, code, changed_storage } => {
            state.set_balance(address, balance);
            state.set_nonce(address, nonce.saturating_to());
            state.set_code(address, code);
            for item in changed_storage {
                state.set_state(address, B256::from(item.key), B256::from(item.value));
            }
        }
        AccountChange::Create { address, nonce, balance, code, storage } => {
            state.set_balance(address, balance);
            state.set_nonce(address, nonce.saturating_to());
            state.set_code(address, code);
            for item in storage {
                state.set_state(address, B256::from(item.key), B256::from(item.value));
            }
        }
    }
}
