use alloy_primitives::{address, Address, U256};

use crate::StateDb;

/// The refund contract receiving every drained DAO balance.
pub const DAO_HARDFORK_BENEFICIARY: Address =
    address!("bf4ed7b27f1d666546e30d74d50d173d20bca754");

/// Applies the DAO hard-fork irregular state change: the full balance of
/// every account in `drain` moves to [`DAO_HARDFORK_BENEFICIARY`].
///
/// This is the only state mutation the processor performs outside of
/// transaction execution, and it is infallible.
pub fn apply_dao_hard_fork(state: &mut dyn StateDb, drain: &[Address]) {
    // Touch the refund contract so it exists even if the drain list is
    // empty at this height.
    state.add_balance(DAO_HARDFORK_BENEFICIARY, U256::ZERO);

    for address in drain {
        let balance = state.balance(*address);
        state.add_balance(DAO_HARDFORK_BENEFICIARY, balance);
        state.set_balance(*address, U256::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStateDb;

    #[test]
    fn drains_every_listed_account_into_the_beneficiary() {
        let drained = [Address::repeat_byte(0x01), Address::repeat_byte(0x02)];
        let untouched = Address::repeat_byte(0x03);

        let mut state = MemoryStateDb::default();
        state.set_balance(drained[0], U256::from(100u64));
        state.set_balance(drained[1], U256::from(250u64));
        state.set_balance(untouched, U256::from(7u64));

        apply_dao_hard_fork(&mut state, &drained);

        assert_eq!(state.balance(DAO_HARDFORK_BENEFICIARY), U256::from(350u64));
        assert_eq!(state.balance(drained[0]), U256::ZERO);
        assert_eq!(state.balance(drained[1]), U256::ZERO);
        assert_eq!(state.balance(untouched), U256::from(7u64));
    }

    #[test]
    fn empty_drain_list_still_touches_the_beneficiary() {
        let mut state = MemoryStateDb::default();
        apply_dao_hard_fork(&mut state, &[]);
        assert!(state.exists(DAO_HARDFORK_BENEFICIARY));
    }
}
