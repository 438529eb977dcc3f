//! Block transaction processor for Ethereum Classic lineage chains.
//!
//! Given a validated block header and an ordered list of transactions, the
//! processor transitions a world-state from a pre-block snapshot to a
//! post-block snapshot, producing per-transaction receipts, cumulative gas
//! accounting, log blooms, and — when configured — the one-time irregular
//! state change at the DAO hard-fork height.
//!
//! Transactions can be applied by either of two backends sharing a single
//! dispatch point:
//!
//! - the **native path**, which drives an in-process [`Interpreter`], and
//! - the **external path**, which drives a stepwise VM core over its
//!   request/response protocol (see [`StepVm`]).
//!
//! The world-state, canonical-chain access, sender recovery internals, and
//! the consensus engine are external collaborators consumed behind traits.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod apply;
pub use apply::*;

mod chain;
pub use chain::*;

mod config;
pub use config::*;

mod dao;
pub use dao::*;

mod engine;
pub use engine::*;

mod error;
pub use error::*;

mod evm;
pub use evm::*;

mod gas;
pub use gas::*;

mod message;
pub use message::*;

mod process;
pub use process::*;

mod receipt;
pub use receipt::*;

mod rules;
pub use rules::*;

mod signer;
pub use signer::*;

mod state;
pub use state::*;

mod svm;
pub use svm::*;

mod transaction;
pub use transaction::*;

mod types;
pub use types::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
