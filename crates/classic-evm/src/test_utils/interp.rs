use std::{cell::RefCell, collections::VecDeque};

use alloy_primitives::{Bytes, TxKind, U256};

use crate::{
    constants::{TX_DATA_NON_ZERO_GAS, TX_DATA_ZERO_GAS, TX_GAS, TX_GAS_CONTRACT_CREATION},
    EvmContext, ExecutionError, GasPool, Interpreter, Log, Message, MessageOutcome, StateDb,
};

/// An [`Interpreter`] covering plain value transfers and bytecode-free
/// creations, with the real money flow of a message: nonce check, upfront
/// gas purchase, intrinsic gas, value transfer, refund of unused gas, and
/// the coinbase fee.
///
/// No bytecode runs; a creation simply deposits its init code as the
/// deployed code. That is enough to exercise the applier end to end with
/// exact gas numbers.
#[derive(Debug, Clone, Copy)]
pub struct TransferInterpreter {
    /// Whether Homestead intrinsic-gas rules apply (higher creation
    /// cost).
    pub homestead: bool,
}

impl Default for TransferInterpreter {
    fn default() -> Self {
        Self { homestead: true }
    }
}

impl TransferInterpreter {
    fn intrinsic_gas(&self, msg: &Message) -> u64 {
        let mut gas = if msg.is_create() && self.homestead {
            TX_GAS_CONTRACT_CREATION
        } else {
            TX_GAS
        };
        for byte in msg.input.iter() {
            gas += if *byte == 0 { TX_DATA_ZERO_GAS } else { TX_DATA_NON_ZERO_GAS };
        }
        gas
    }
}

impl Interpreter for TransferInterpreter {
    fn apply_message(
        &self,
        ctx: &EvmContext<'_>,
        state: &mut dyn StateDb,
        msg: &Message,
        gas_pool: &mut GasPool,
    ) -> Result<MessageOutcome, ExecutionError> {
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

        // Buy gas: the pool admits the full gas limit, the sender pays
        // for it upfront.
        let gas_purchase = U256::from(msg.gas_limit) * msg.gas_price;
        let balance = state.balance(msg.from);
        if balance < gas_purchase {
            return Err(ExecutionError::InsufficientBalanceForGas {
                address: msg.from,
                have: balance,
                want: gas_purchase,
            });
        }
        gas_pool.sub_gas(msg.gas_limit)?;
        state.set_balance(msg.from, balance - gas_purchase);

        let intrinsic = self.intrinsic_gas(msg);
        if intrinsic > msg.gas_limit {
            return Err(ExecutionError::VmAbort("intrinsic gas exceeds gas limit".into()));
        }

        if state.balance(msg.from) < msg.value {
            return Err(ExecutionError::VmAbort("insufficient balance for transfer".into()));
        }

        state.set_nonce(msg.from, state.nonce(msg.from) + 1);
        state.set_balance(msg.from, state.balance(msg.from) - msg.value);
        match msg.to {
            TxKind::Call(to) => state.add_balance(to, msg.value),
            TxKind::Create => {
                let contract = msg.from.create(msg.nonce);
                state.add_balance(contract, msg.value);
                state.set_code(contract, msg.input.clone());
            }
        }

        // Refund what bytecode never consumed, pay the fee.
        let gas_left = msg.gas_limit - intrinsic;
        state.add_balance(msg.from, U256::from(gas_left) * msg.gas_price);
        state.add_balance(ctx.coinbase, U256::from(intrinsic) * msg.gas_price);

        Ok(MessageOutcome { return_data: Bytes::new(), gas_used: intrinsic, failed: false })
    }
}

/// One scripted interpreter response.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOutcome {
    /// Gas the message reports as consumed.
    pub gas_used: u64,
    /// Whether the message reverts. A reverting message discards its
    /// logs, matching interpreter behavior.
    pub failed: bool,
    /// Logs appended to the state under the prepared scope (unless the
    /// message reverts).
    pub logs: Vec<Log>,
    /// An abort to surface instead of an outcome.
    pub error: Option<ExecutionError>,
}

/// An [`Interpreter`] that replays a fixed script of outcomes, one per
/// applied message in order. It still debits the gas pool, so admission
/// behavior stays realistic.
#[derive(Debug, Default)]
pub struct ScriptedInterpreter {
    script: RefCell<VecDeque<ScriptedOutcome>>,
}

impl ScriptedInterpreter {
    /// Creates an interpreter replaying `outcomes` in order.
    pub fn new(outcomes: impl IntoIterator<Item = ScriptedOutcome>) -> Self {
        Self { script: RefCell::new(outcomes.into_iter().collect()) }
    }
}

impl Interpreter for ScriptedInterpreter {
    fn apply_message(
        &self,
        ctx: &EvmContext<'_>,
        state: &mut dyn StateDb,
        msg: &Message,
        gas_pool: &mut GasPool,
    ) -> Result<MessageOutcome, ExecutionError> {
        let outcome =
            self.script.borrow_mut().pop_front().expect("scripted interpreter ran out of outcomes");
        if let Some(error) = outcome.error {
            return Err(error);
        }
        gas_pool.sub_gas(msg.gas_limit)?;
        if !outcome.failed {
            for log in outcome.logs {
                state.add_log(Log { block_number: ctx.number, ..log });
            }
        }
        Ok(MessageOutcome {
            return_data: Bytes::new(),
            gas_used: outcome.gas_used,
            failed: outcome.failed,
        })
    }
}
