//! CIDR block minimization.
//!
//! Reduces a set of blocks to the unique smallest set with the same union.
//! The merge itself is `ipnet`'s aggregation: blocks contained in another
//! are absorbed and adjacent ranges are re-cut into the fewest aligned
//! prefixes. This module keeps the result in canonical block order.

use ipnet::IpNet;

use crate::aggregate::{CountryCidrSet, VersionedBlocks};
use crate::CidrBlock;

/// Minimize a collection of blocks.
///
/// The result is sorted ascending by (version, network address), has no
/// overlapping blocks and no two blocks that form a larger aligned block.
/// It does not depend on input order, and minimizing it again returns it
/// unchanged. Mixed IPv4/IPv6 input is minimized per version.
///
/// # Examples
/// ```
/// use cidre::{minimize, CidrBlock};
///
/// let blocks: Vec<CidrBlock> = ["10.0.0.128/25", "10.0.0.0/25", "10.0.0.0/26"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let merged = minimize(blocks);
/// assert_eq!(merged, vec!["10.0.0.0/24".parse::<CidrBlock>().unwrap()]);
/// ```
pub fn minimize<I>(blocks: I) -> Vec<CidrBlock>
where
    I: IntoIterator<Item = CidrBlock>,
{
    let nets: Vec<IpNet> = blocks.into_iter().map(|b| b.ipnet()).collect();
    if nets.is_empty() {
        return Vec::new();
    }

    let mut merged: Vec<CidrBlock> = IpNet::aggregate(&nets)
        .into_iter()
        .map(CidrBlock::from_aggregate)
        .collect();
    merged.sort_unstable();
    merged
}

/// Minimize both versions of one country.
pub fn minimize_blocks(blocks: &VersionedBlocks) -> VersionedBlocks {
    VersionedBlocks {
        ipv4: minimize(blocks.ipv4.iter().copied()).into_iter().collect(),
        ipv6: minimize(blocks.ipv6.iter().copied()).into_iter().collect(),
    }
}

/// Minimize every country of an aggregated set.
pub fn minimize_set(set: &CountryCidrSet) -> CountryCidrSet {
    let mut minimized = CountryCidrSet::new();
    for (country, blocks) in set.iter() {
        minimized.set_country(country, minimize_blocks(blocks));
    }
    minimized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IpVersion;

    fn blocks(items: &[&str]) -> Vec<CidrBlock> {
        items.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn text(blocks: &[CidrBlock]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_siblings_merge() {
        let merged = minimize(blocks(&["10.0.0.0/25", "10.0.0.128/25"]));
        assert_eq!(text(&merged), vec!["10.0.0.0/24"]);
    }

    #[test]
    fn test_contained_block_absorbed() {
        let merged = minimize(blocks(&["10.0.0.0/24", "10.0.0.0/25"]));
        assert_eq!(text(&merged), vec!["10.0.0.0/24"]);

        let merged = minimize(blocks(&["10.0.0.64/26", "10.0.0.0/24"]));
        assert_eq!(text(&merged), vec!["10.0.0.0/24"]);
    }

    #[test]
    fn test_adjacent_non_siblings_stay_apart() {
        let merged = minimize(blocks(&["10.0.0.128/25", "10.0.1.0/25"]));
        assert_eq!(text(&merged), vec!["10.0.0.128/25", "10.0.1.0/25"]);
    }

    #[test]
    fn test_cascading_merge() {
        let merged = minimize(blocks(&[
            "10.0.0.192/26",
            "10.0.0.0/25",
            "10.0.1.0/24",
            "10.0.0.128/26",
        ]));
        assert_eq!(text(&merged), vec!["10.0.0.0/23"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let merged = minimize(blocks(&["192.0.2.0/24", "192.0.2.0/24"]));
        assert_eq!(text(&merged), vec!["192.0.2.0/24"]);
    }

    #[test]
    fn test_output_sorted() {
        let merged = minimize(blocks(&["203.0.113.0/24", "10.0.0.0/8", "192.0.2.0/24"]));
        assert_eq!(
            text(&merged),
            vec!["10.0.0.0/8", "192.0.2.0/24", "203.0.113.0/24"]
        );
    }

    #[test]
    fn test_ipv6() {
        let merged = minimize(blocks(&["2001:db8::/33", "2001:db8:8000::/33", "2001:db8::/48"]));
        assert_eq!(text(&merged), vec!["2001:db8::/32"]);

        let merged = minimize(blocks(&["::/1", "8000::/1"]));
        assert_eq!(text(&merged), vec!["::/0"]);
    }

    #[test]
    fn test_mixed_versions_not_merged_together() {
        let merged = minimize(blocks(&["0.0.0.0/1", "128.0.0.0/1", "::/1"]));
        assert_eq!(text(&merged), vec!["0.0.0.0/0", "::/1"]);
    }

    #[test]
    fn test_empty() {
        assert!(minimize(Vec::new()).is_empty());
    }

    #[test]
    fn test_minimize_set() {
        let mut set = CountryCidrSet::new();
        set.insert_all("NL", blocks(&["10.0.0.0/25", "10.0.0.128/25", "2001:db8::/32"]));
        set.insert_all("BE", blocks(&["192.0.2.0/24"]));

        let minimized = minimize_set(&set);
        assert_eq!(text(&minimized.blocks("NL", IpVersion::V4)), vec!["10.0.0.0/24"]);
        assert_eq!(text(&minimized.blocks("NL", IpVersion::V6)), vec!["2001:db8::/32"]);
        assert_eq!(text(&minimized.blocks("BE", IpVersion::V4)), vec!["192.0.2.0/24"]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decompose::decompose_range;
    use crate::IpVersion;
    use proptest::prelude::*;

    /// Strategy for IPv4 blocks clustered in 10.0.0.0/16 so merges happen
    fn ipv4_block_strategy() -> impl Strategy<Value = CidrBlock> {
        (0u32..=0xffff, 16u8..=32).prop_map(|(offset, prefix)| {
            let host_bits = 32 - prefix as u32;
            let addr = (0x0a00_0000 | offset) >> host_bits << host_bits;
            CidrBlock::from_bits(IpVersion::V4, addr as u128, prefix)
        })
    }

    /// Strategy for IPv6 blocks clustered in 2001:db8::/112
    fn ipv6_block_strategy() -> impl Strategy<Value = CidrBlock> {
        (0u128..=0xffff, 112u8..=128).prop_map(|(offset, prefix)| {
            let host_bits = 128 - prefix as u32;
            let base = 0x2001_0db8_u128 << 96;
            let addr = (base | offset) >> host_bits << host_bits;
            CidrBlock::from_bits(IpVersion::V6, addr, prefix)
        })
    }

    fn ipv4_block_vec_strategy(max_size: usize) -> impl Strategy<Value = Vec<CidrBlock>> {
        prop::collection::vec(ipv4_block_strategy(), 0..max_size)
    }

    fn ipv6_block_vec_strategy(max_size: usize) -> impl Strategy<Value = Vec<CidrBlock>> {
        prop::collection::vec(ipv6_block_strategy(), 0..max_size)
    }

    /// Blocks of either version (one version per case).
    fn block_vec_strategy(max_size: usize) -> impl Strategy<Value = Vec<CidrBlock>> {
        prop_oneof![
            ipv4_block_vec_strategy(max_size),
            ipv6_block_vec_strategy(max_size),
        ]
    }

    /// Union-equivalent canonical form: merge intervals, then decompose.
    fn canonical(blocks: &[CidrBlock]) -> Vec<CidrBlock> {
        let Some(version) = blocks.first().map(CidrBlock::version) else {
            return Vec::new();
        };
        let mut intervals: Vec<(u128, u128)> =
            blocks.iter().map(|b| (b.first(), b.last())).collect();
        intervals.sort();
        let mut merged: Vec<(u128, u128)> = Vec::new();
        for (first, last) in intervals {
            match merged.last_mut() {
                Some((_, end)) if first <= end.saturating_add(1) => *end = (*end).max(last),
                _ => merged.push((first, last)),
            }
        }
        merged
            .into_iter()
            .flat_map(|(first, last)| decompose_range(version, first, last))
            .collect()
    }

    proptest! {
        /// Minimizing twice is the same as minimizing once
        #[test]
        fn prop_idempotent(input in block_vec_strategy(60)) {
            let once = minimize(input);
            let twice = minimize(once.clone());
            prop_assert_eq!(once, twice);
        }

        /// Input order does not matter
        #[test]
        fn prop_permutation_invariant(
            (input, shuffled) in block_vec_strategy(60)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            prop_assert_eq!(minimize(input), minimize(shuffled));
        }

        /// Union is preserved and the result is the canonical minimal cover
        #[test]
        fn prop_matches_canonical_cover(input in block_vec_strategy(60)) {
            prop_assert_eq!(minimize(input.clone()), canonical(&input));
        }

        /// Same blocks as ipnet's aggregation of the raw networks, in block order
        #[test]
        fn prop_matches_ipnet_aggregate(input in block_vec_strategy(60)) {
            let nets: Vec<IpNet> = input.iter().map(CidrBlock::ipnet).collect();
            let mut expected: Vec<CidrBlock> = IpNet::aggregate(&nets)
                .into_iter()
                .map(|net| CidrBlock::from_ipnet(net).unwrap())
                .collect();
            expected.sort();
            prop_assert_eq!(minimize(input), expected);
        }

        /// Never more blocks than the input
        #[test]
        fn prop_never_grows(input in block_vec_strategy(60)) {
            let merged = minimize(input.clone());
            prop_assert!(merged.len() <= input.len());
        }

        /// Output is disjoint and has no combinable neighbours
        #[test]
        fn prop_disjoint_and_irreducible(input in block_vec_strategy(60)) {
            let merged = minimize(input);
            for pair in merged.windows(2) {
                prop_assert!(pair[0].last() < pair[1].first());
                prop_assert!(!pair[0].is_sibling_of(&pair[1]));
            }
        }
    }
}
