use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use alloy_primitives::{Address, Bytes, B256, U256};

use crate::{
    AccountChange, Patch, StepVm, StepVmFactory, VmHeaderParams, VmLog, VmRequire, VmTransaction,
};

/// One reply recorded by a [`ScriptedVm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmCommit {
    /// Reply to an account requirement.
    Account {
        /// Requested address.
        address: Address,
        /// Committed nonce.
        nonce: U256,
        /// Committed balance.
        balance: U256,
        /// Committed code.
        code: Bytes,
    },
    /// Reply to a code requirement.
    AccountCode {
        /// Requested address.
        address: Address,
        /// Committed code.
        code: Bytes,
    },
    /// Reply to a storage requirement.
    AccountStorage {
        /// Requested address.
        address: Address,
        /// Requested key.
        key: U256,
        /// Committed value.
        value: U256,
    },
    /// Reply that no account exists at the address.
    Nonexist(Address),
    /// Reply to a blockhash requirement.
    Blockhash {
        /// Requested height.
        number: U256,
        /// Committed hash.
        hash: B256,
    },
}

/// The script backing one [`ScriptedVm`] instance.
#[derive(Debug, Clone, Default)]
pub struct VmScript {
    /// Requirements raised by successive `fire` calls; once exhausted,
    /// `fire` reports completion.
    pub requires: Vec<VmRequire>,
    /// The post-execution account change set.
    pub changes: Vec<AccountChange>,
    /// Logs emitted during execution.
    pub logs: Vec<VmLog>,
    /// Total gas consumed.
    pub used_gas: u64,
    /// Whether execution failed.
    pub failed: bool,
}

/// A [`StepVm`] that raises a scripted sequence of requirements and
/// reports a fixed change set, recording every host reply for
/// inspection.
#[derive(Debug)]
pub struct ScriptedVm {
    requires: VecDeque<VmRequire>,
    changes: Vec<AccountChange>,
    logs: Vec<VmLog>,
    used_gas: U256,
    failed: bool,
    commits: Rc<RefCell<Vec<VmCommit>>>,
}

impl StepVm for ScriptedVm {
    fn fire(&mut self) -> VmRequire {
        self.requires.pop_front().unwrap_or(VmRequire::None)
    }

    fn commit_account(&mut self, address: Address, nonce: U256, balance: U256, code: Bytes) {
        self.commits.borrow_mut().push(VmCommit::Account { address, nonce, balance, code });
    }

    fn commit_account_code(&mut self, address: Address, code: Bytes) {
        self.commits.borrow_mut().push(VmCommit::AccountCode { address, code });
    }

    fn commit_account_storage(&mut self, address: Address, key: U256, value: U256) {
        self.commits.borrow_mut().push(VmCommit::AccountStorage { address, key, value });
    }

    fn commit_nonexist(&mut self, address: Address) {
        self.commits.borrow_mut().push(VmCommit::Nonexist(address));
    }

    fn commit_blockhash(&mut self, number: U256, hash: B256) {
        self.commits.borrow_mut().push(VmCommit::Blockhash { number, hash });
    }

    fn account_changes(&self) -> Vec<AccountChange> {
        self.changes.clone()
    }

    fn logs(&self) -> Vec<VmLog> {
        self.logs.clone()
    }

    fn used_gas(&self) -> U256 {
        self.used_gas
    }

    fn failed(&self) -> bool {
        self.failed
    }
}

/// A [`StepVmFactory`] handing out [`ScriptedVm`]s, one queued script per
/// created instance. Construction parameters and all host replies are
/// recorded for assertions.
#[derive(Debug, Default)]
pub struct ScriptedVmFactory {
    scripts: RefCell<VecDeque<VmScript>>,
    commits: Rc<RefCell<Vec<VmCommit>>>,
    created: RefCell<Vec<(Patch, VmTransaction, VmHeaderParams)>>,
}

impl ScriptedVmFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the script for the next created VM.
    pub fn push(&self, script: VmScript) {
        self.scripts.borrow_mut().push_back(script);
    }

    /// Every reply the driver loop has committed, across all instances.
    pub fn commits(&self) -> Vec<VmCommit> {
        self.commits.borrow().clone()
    }

    /// The construction parameters of every created VM.
    pub fn created(&self) -> Vec<(Patch, VmTransaction, VmHeaderParams)> {
        self.created.borrow().clone()
    }
}

impl StepVmFactory for ScriptedVmFactory {
    fn create(
        &self,
        patch: &Patch,
        tx: &VmTransaction,
        header: &VmHeaderParams,
    ) -> Box<dyn StepVm> {
        self.created.borrow_mut().push((patch.clone(), tx.clone(), header.clone()));
        let script = self.scripts.borrow_mut().pop_front().expect("no VM script queued");
        Box::new(ScriptedVm {
            requires: script.requires.into(),
            changes: script.changes,
            logs: script.logs,
            used_gas: U256::from(script.used_gas),
            failed: script.failed,
            commits: Rc::clone(&self.commits),
        })
    }
}
