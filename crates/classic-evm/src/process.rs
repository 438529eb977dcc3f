use crate::{
    apply_dao_hard_fork, apply_transaction, Block, ChainConfig, ChainContext, ConsensusEngine,
    ExecutionError, GasPool, Log, Receipt, Signer, StateDb, VmConfig,
};

/// Everything a fully processed block yields.
#[derive(Debug, Clone, Default)]
pub struct BlockOutput {
    /// One receipt per transaction, in inclusion order.
    pub receipts: Vec<Receipt>,
    /// The receipts' logs, concatenated in inclusion order.
    pub logs: Vec<Log>,
    /// Cumulative gas consumed by the block.
    pub gas_used: u64,
}

/// Drives the full pass over a block: the pre-block hard-fork hook, the
/// per-transaction apply loop, and the consensus engine's finalization.
#[derive(Debug)]
pub struct StateProcessor<C, E, S> {
    config: ChainConfig,
    chain: C,
    engine: E,
    signer: S,
}

impl<C, E, S> StateProcessor<C, E, S>
where
    C: ChainContext,
    E: ConsensusEngine,
    S: Signer,
{
    /// Creates a processor for the given chain configuration, canonical
    /// chain access, consensus engine, and sender recovery.
    pub const fn new(config: ChainConfig, chain: C, engine: E, signer: S) -> Self {
        Self { config, chain, engine, signer }
    }

    /// The processor's chain configuration.
    pub const fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Transitions `state` across `block`, returning the receipts, their
    /// logs, and the total gas used.
    ///
    /// A transaction inside a canonical block must be executable, so any
    /// per-transaction error aborts the whole block and no partial
    /// receipts are returned. The consensus engine's `finalize` runs
    /// exactly once after the last transaction.
    pub fn process(
        &self,
        block: &Block,
        state: &mut dyn StateDb,
        vm_config: &VmConfig,
    ) -> Result<BlockOutput, ExecutionError> {
        let header = &block.header;
        let mut receipts = Vec::with_capacity(block.transactions.len());
        let mut logs = Vec::new();
        let mut used_gas = 0u64;
        let mut gas_pool = GasPool::new(header.gas_limit);

        // The one state mutation outside of transaction execution.
        if self.config.applies_dao_hard_fork(header.number) {
            apply_dao_hard_fork(state, &self.config.dao_drain_list);
        }

        for (index, tx) in block.transactions.iter().enumerate() {
            state.prepare(tx.hash(), header.hash, index as u32);
            let (receipt, _gas) = apply_transaction(
                &self.config,
                &self.chain,
                None,
                &mut gas_pool,
                state,
                header,
                tx,
                &mut used_gas,
                vm_config,
                &self.signer,
            )?;
            logs.extend(receipt.logs.iter().cloned());
            receipts.push(receipt);
        }

        self.engine.finalize(&self.chain, header, state, &block.transactions, &block.uncles);

        Ok(BlockOutput { receipts, logs, gas_used: used_gas })
    }
}
