use alloy_hardforks::ForkCondition;
use alloy_primitives::Address;

use crate::{Rules, GasTable, GAS_TABLE_EIP150, GAS_TABLE_EIP160, GAS_TABLE_HOMESTEAD};

/// Chain configuration: one activation condition per protocol rule.
///
/// Each rule activates at the block height carried by its
/// [`ForkCondition`]; [`ForkCondition::Never`] leaves a rule permanently
/// disabled, which is how Classic-lineage chains opt out of state clearing
/// or the DAO irregular state change. The configuration is assembled by
/// the chainspec layer; this crate only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainConfig {
    /// Chain identifier bound into replay-protected signatures (EIP-155).
    pub chain_id: u64,
    /// Homestead transition.
    pub homestead: ForkCondition,
    /// The DAO hard-fork transition.
    pub dao_fork: ForkCondition,
    /// Whether this chain applies the DAO irregular state change at the
    /// fork block. Chains that rejected the fork keep the block height for
    /// fork-id purposes but leave this unset.
    pub dao_fork_support: bool,
    /// Accounts drained into the refund contract by the DAO irregular
    /// state change. Populated from the chainspec on chains that support
    /// the fork, empty everywhere else.
    pub dao_drain_list: Vec<Address>,
    /// Homestead gas repricing and upfront CREATE cost (EIP-2).
    pub eip2: ForkCondition,
    /// DELEGATECALL (EIP-7).
    pub eip7: ForkCondition,
    /// Tangerine Whistle IO repricing (EIP-150).
    pub eip150: ForkCondition,
    /// Replay protection (EIP-155).
    pub eip155: ForkCondition,
    /// EXP byte cost increase (EIP-160).
    pub eip160: ForkCondition,
    /// State clearing of empty accounts (EIP-161).
    pub eip161: ForkCondition,
    /// Deployed code size limit (EIP-170).
    pub eip170: ForkCondition,
    /// REVERT (EIP-140).
    pub eip140: ForkCondition,
    /// Modexp precompile (EIP-198).
    pub eip198: ForkCondition,
    /// RETURNDATA opcodes (EIP-211).
    pub eip211: ForkCondition,
    /// alt_bn128 pairing precompile (EIP-212).
    pub eip212: ForkCondition,
    /// alt_bn128 add/mul precompiles (EIP-213).
    pub eip213: ForkCondition,
    /// STATICCALL (EIP-214).
    pub eip214: ForkCondition,
    /// Receipt status codes (EIP-658).
    pub eip658: ForkCondition,
    /// Bitwise shifting instructions (EIP-145).
    pub eip145: ForkCondition,
    /// CREATE2 (EIP-1014).
    pub eip1014: ForkCondition,
    /// EXTCODEHASH (EIP-1052).
    pub eip1052: ForkCondition,
    /// Net gas metering for SSTORE (EIP-1283).
    pub eip1283: ForkCondition,
}

impl Default for ChainConfig {
    /// A configuration with every supported rule active from genesis and
    /// no DAO fork. Useful as a starting point for tests and dev chains;
    /// real networks override individual heights.
    fn default() -> Self {
        Self {
            chain_id: 1,
            homestead: ForkCondition::Block(0),
            dao_fork: ForkCondition::Never,
            dao_fork_support: false,
            dao_drain_list: Vec::new(),
            eip2: ForkCondition::Block(0),
            eip7: ForkCondition::Block(0),
            eip150: ForkCondition::Block(0),
            eip155: ForkCondition::Block(0),
            eip160: ForkCondition::Block(0),
            eip161: ForkCondition::Block(0),
            eip170: ForkCondition::Block(0),
            eip140: ForkCondition::Block(0),
            eip198: ForkCondition::Block(0),
            eip211: ForkCondition::Block(0),
            eip212: ForkCondition::Block(0),
            eip213: ForkCondition::Block(0),
            eip214: ForkCondition::Block(0),
            eip658: ForkCondition::Block(0),
            eip145: ForkCondition::Block(0),
            eip1014: ForkCondition::Block(0),
            eip1052: ForkCondition::Block(0),
            eip1283: ForkCondition::Block(0),
        }
    }
}

impl ChainConfig {
    /// Returns `true` if the Homestead rules are active at `number`.
    pub fn is_homestead_active_at_block(&self, number: u64) -> bool {
        self.homestead.active_at_block(number)
    }

    /// Returns `true` if EIP-155 replay protection is active at `number`.
    pub fn is_eip155_active_at_block(&self, number: u64) -> bool {
        self.eip155.active_at_block(number)
    }

    /// Returns `true` if EIP-161 state clearing is active at `number`.
    pub fn is_eip161_active_at_block(&self, number: u64) -> bool {
        self.eip161.active_at_block(number)
    }

    /// Returns `true` if EIP-658 receipt status codes are active at
    /// `number`.
    pub fn is_eip658_active_at_block(&self, number: u64) -> bool {
        self.eip658.active_at_block(number)
    }

    /// Returns `true` if the DAO irregular state change fires at `number`,
    /// i.e. the chain supports the fork and `number` is exactly the fork
    /// block.
    pub fn applies_dao_hard_fork(&self, number: u64) -> bool {
        self.dao_fork_support && matches!(self.dao_fork, ForkCondition::Block(dao) if dao == number)
    }

    /// Resolves the flat rule record for `number`.
    pub fn rules(&self, number: u64) -> Rules {
        Rules {
            chain_id: self.chain_id,
            eip2: self.eip2.active_at_block(number),
            eip7: self.eip7.active_at_block(number),
            eip150: self.eip150.active_at_block(number),
            eip155: self.eip155.active_at_block(number),
            eip160: self.eip160.active_at_block(number),
            eip161: self.eip161.active_at_block(number),
            eip170: self.eip170.active_at_block(number),
            eip140: self.eip140.active_at_block(number),
            eip198: self.eip198.active_at_block(number),
            eip211: self.eip211.active_at_block(number),
            eip212: self.eip212.active_at_block(number),
            eip213: self.eip213.active_at_block(number),
            eip214: self.eip214.active_at_block(number),
            eip658: self.eip658.active_at_block(number),
            eip145: self.eip145.active_at_block(number),
            eip1014: self.eip1014.active_at_block(number),
            eip1052: self.eip1052.active_at_block(number),
            eip1283: self.eip1283.active_at_block(number),
        }
    }

    /// Resolves the gas table in force at `number`. The EIP-160 table
    /// supersedes the EIP-150 table, which supersedes the launch table.
    pub fn gas_table(&self, number: u64) -> GasTable {
        if self.eip160.active_at_block(number) {
            return GAS_TABLE_EIP160;
        }
        if self.eip150.active_at_block(number) {
            return GAS_TABLE_EIP150;
        }
        GAS_TABLE_HOMESTEAD
    }
}
