use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    block_hash_fn, BlockHashFn, ChainContext, ExecutionError, GasPool, Header, Message, StateDb,
    StepVmFactory,
};

/// The block-level environment handed to the in-process interpreter for
/// one message.
pub struct EvmContext<'a> {
    /// Sender of the top-level message; `ORIGIN` for the whole call tree.
    pub origin: Address,
    /// Gas price of the top-level message.
    pub gas_price: U256,
    /// Fee beneficiary, `COINBASE`.
    pub coinbase: Address,
    /// Current block height, `NUMBER`.
    pub number: u64,
    /// Current block timestamp, `TIMESTAMP`.
    pub time: u64,
    /// Current block difficulty, `DIFFICULTY`.
    pub difficulty: U256,
    /// Current block gas limit, `GASLIMIT`.
    pub gas_limit: u64,
    /// Resolver for the `BLOCKHASH` host function.
    pub block_hash: BlockHashFn<'a>,
}

impl<'a> EvmContext<'a> {
    /// Builds the execution context for `msg` on top of `header`.
    ///
    /// `author` overrides the fee beneficiary; block sealers pass the
    /// verified author, everyone else passes `None` to use the header's
    /// coinbase.
    pub fn new(
        msg: &Message,
        header: &Header,
        chain: &'a dyn ChainContext,
        author: Option<Address>,
    ) -> Self {
        Self {
            origin: msg.from,
            gas_price: msg.gas_price,
            coinbase: author.unwrap_or(header.coinbase),
            number: header.number,
            time: header.time,
            difficulty: header.difficulty,
            gas_limit: header.gas_limit,
            block_hash: block_hash_fn(header, chain),
        }
    }
}

impl core::fmt::Debug for EvmContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EvmContext")
            .field("origin", &self.origin)
            .field("coinbase", &self.coinbase)
            .field("number", &self.number)
            .finish_non_exhaustive()
    }
}

/// What the in-process interpreter reports back for one applied message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOutcome {
    /// Bytes returned by the outermost frame.
    pub return_data: Bytes,
    /// Gas consumed by the message, intrinsic cost included.
    pub gas_used: u64,
    /// Whether execution ended in a revert. A reverted message still
    /// produces a receipt; it is not an error.
    pub failed: bool,
}

/// The in-process virtual machine driven by the native transaction
/// applier.
///
/// One call covers the whole message lifecycle: charging intrinsic gas,
/// debiting the upfront gas purchase, running bytecode against `state`,
/// refunding unused gas, and crediting the fee to the coinbase. Logs are
/// accumulated directly on `state` under the prepared transaction scope.
pub trait Interpreter {
    /// Applies `msg` against `state` within `ctx`, debiting `gas_pool` by
    /// the message's gas limit.
    fn apply_message(
        &self,
        ctx: &EvmContext<'_>,
        state: &mut dyn StateDb,
        msg: &Message,
        gas_pool: &mut GasPool,
    ) -> Result<MessageOutcome, ExecutionError>;
}

/// Selects and carries the execution backends for a block.
#[derive(Clone)]
pub struct VmConfig {
    /// Backend selector. The value [`VmConfig::SVM_INTERPRETER`] routes
    /// transactions through the external stepwise VM; any other value
    /// selects the in-process interpreter. No other values are
    /// recognized.
    pub interpreter: String,
    /// The in-process interpreter.
    pub native: Arc<dyn Interpreter>,
    /// Factory for external stepwise VM instances, when that backend is
    /// available.
    pub external: Option<Arc<dyn StepVmFactory>>,
}

impl VmConfig {
    /// Selector value routing execution through the external stepwise VM.
    pub const SVM_INTERPRETER: &'static str = "svm";

    /// A configuration using the in-process interpreter.
    pub fn new(native: Arc<dyn Interpreter>) -> Self {
        Self { interpreter: String::new(), native, external: None }
    }

    /// Registers the external VM factory.
    pub fn with_external(mut self, external: Arc<dyn StepVmFactory>) -> Self {
        self.external = Some(external);
        self
    }

    /// Sets the backend selector.
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Whether the external stepwise VM is selected.
    pub fn uses_svm(&self) -> bool {
        self.interpreter == Self::SVM_INTERPRETER
    }
}

impl core::fmt::Debug for VmConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VmConfig")
            .field("interpreter", &self.interpreter)
            .field("external", &self.external.is_some())
            .finish_non_exhaustive()
    }
}
