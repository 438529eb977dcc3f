//! Test utilities for the block transaction processor.

mod chain;
pub use chain::*;

mod interp;
pub use interp::*;

mod signer;
pub use signer::*;

mod state;
pub use state::*;

mod tx;
pub use tx::*;

mod vm;
pub use vm::*;
