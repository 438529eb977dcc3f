use alloy_primitives::B256;
use auto_impl::auto_impl;

use crate::{constants::BLOCKHASH_WINDOW, Header};

/// Read access to canonical headers, used only to serve the BLOCKHASH
/// host function.
#[auto_impl(&, Box, Arc)]
pub trait ChainContext {
    /// The header with the given hash, if known.
    fn header_by_hash(&self, hash: B256) -> Option<Header>;

    /// The canonical header at the given height, if known.
    fn header_by_number(&self, number: u64) -> Option<Header>;
}

/// The BLOCKHASH host function for blocks executed on top of `header`.
pub type BlockHashFn<'a> = Box<dyn Fn(u64) -> B256 + 'a>;

/// Returns a closure resolving ancestor hashes of `header` by walking
/// parent links through `chain`.
///
/// Heights at or above the current block, or more than
/// [`BLOCKHASH_WINDOW`] blocks back, resolve to the zero hash — as does a
/// gap in the chain context.
pub fn block_hash_fn<'a>(header: &Header, chain: &'a dyn ChainContext) -> BlockHashFn<'a> {
    let number = header.number;
    let parent_hash = header.parent_hash;
    Box::new(move |n: u64| {
        if n >= number || number - n > BLOCKHASH_WINDOW {
            return B256::ZERO;
        }
        // `parent_hash` names block `number - 1`; walk down to `n`.
        let mut hash = parent_hash;
        let mut height = number - 1;
        while height > n {
            let Some(ancestor) = chain.header_by_hash(hash) else {
                return B256::ZERO;
            };
            hash = ancestor.parent_hash;
            height -= 1;
        }
        hash
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockChain;

    #[test]
    fn resolves_ancestors_within_the_window() {
        let chain = MockChain::with_ancestry(300);
        let header = chain.header_by_number(300).unwrap();
        let hashes = block_hash_fn(&header, &chain);

        assert_eq!(hashes(299), chain.header_by_number(299).unwrap().hash);
        assert_eq!(hashes(250), chain.header_by_number(250).unwrap().hash);
        // Exactly at the window edge.
        assert_eq!(hashes(44), chain.header_by_number(44).unwrap().hash);
    }

    #[test]
    fn out_of_window_heights_resolve_to_zero() {
        let chain = MockChain::with_ancestry(300);
        let header = chain.header_by_number(300).unwrap();
        let hashes = block_hash_fn(&header, &chain);

        assert_eq!(hashes(300), B256::ZERO); // current block
        assert_eq!(hashes(301), B256::ZERO); // future block
        assert_eq!(hashes(43), B256::ZERO); // one past the window
    }

    #[test]
    fn a_gap_in_the_chain_resolves_to_zero() {
        let mut chain = MockChain::with_ancestry(10);
        let header = chain.header_by_number(10).unwrap();
        chain.remove(7);
        let hashes = block_hash_fn(&header, &chain);

        // Walking to 5 passes through the missing header at 7.
        assert_eq!(hashes(5), B256::ZERO);
        // Heights above the gap are unaffected.
        assert_ne!(hashes(8), B256::ZERO);
    }
}
