//! The external stepwise VM backend.
//!
//! The VM core lives behind a foreign-function boundary and pulls
//! account, code, storage, and historical-blockhash data from the host on
//! demand: every [`StepVm::fire`] either finishes execution or suspends on
//! one data requirement, and the host replies with the matching
//! `commit_*` call. After execution the host drains the VM's account
//! change set and reconciles it against the state database.
//!
//! The module splits into the request protocol ([`vm`]), the
//! per-transaction configuration bundle ([`patch`]), and the driver that
//! applies one transaction end to end ([`adapter`]).
//!
//! [`vm`]: crate::StepVm
//! [`patch`]: crate::Patch
//! [`adapter`]: crate::apply_svm_transaction

mod adapter;
pub use adapter::*;

mod patch;
pub use patch::*;

mod vm;
pub use vm::*;
