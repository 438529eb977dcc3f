use auto_impl::auto_impl;

use crate::{ChainContext, Header, StateDb, Transaction};

/// The consensus engine's post-block hook.
///
/// Applies block rewards and any other consensus-specific state writes
/// after the last transaction. The processor treats this as opaque and
/// infallible; reward schedules never belong to the processor itself.
#[auto_impl(&, Box, Arc)]
pub trait ConsensusEngine {
    /// Finalizes `header`'s block against `state`.
    fn finalize(
        &self,
        chain: &dyn ChainContext,
        header: &Header,
        state: &mut dyn StateDb,
        transactions: &[Transaction],
        uncles: &[Header],
    );
}
