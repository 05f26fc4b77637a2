//! Exact address counting.

use num_bigint::BigUint;
use std::collections::BTreeMap;

use crate::aggregate::CountryCidrSet;
use crate::minimize::minimize;
use crate::CidrBlock;

/// Count the distinct addresses covered by `blocks`.
///
/// Overlapping or duplicate blocks are counted once. An empty input yields
/// zero; telling "no blocks" apart from "no data" is up to the caller.
///
/// # Examples
/// ```
/// use cidre::{count_addresses, CidrBlock};
/// use num_bigint::BigUint;
///
/// let all: CidrBlock = "::/0".parse().unwrap();
/// assert_eq!(count_addresses([all]), BigUint::from(1u8) << 128);
/// ```
pub fn count_addresses<I>(blocks: I) -> BigUint
where
    I: IntoIterator<Item = CidrBlock>,
{
    minimize(blocks)
        .iter()
        .map(CidrBlock::num_addresses)
        .sum()
}

/// Address totals per country, both versions combined.
pub fn count_set(set: &CountryCidrSet) -> BTreeMap<String, BigUint> {
    set.iter()
        .map(|(country, blocks)| {
            let total = count_addresses(blocks.ipv4.iter().copied())
                + count_addresses(blocks.ipv6.iter().copied());
            (country.to_string(), total)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(items: &[&str]) -> Vec<CidrBlock> {
        items.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_count_single_block() {
        assert_eq!(count_addresses(blocks(&["10.0.0.0/24"])), BigUint::from(256u32));
    }

    #[test]
    fn test_count_whole_ipv6_space() {
        let expected = BigUint::from(u128::MAX) + BigUint::from(1u8);
        assert_eq!(count_addresses(blocks(&["::/0"])), expected);
    }

    #[test]
    fn test_count_empty_is_zero() {
        assert_eq!(count_addresses(Vec::new()), BigUint::default());
    }

    #[test]
    fn test_overlaps_not_double_counted() {
        let total = count_addresses(blocks(&["10.0.0.0/24", "10.0.0.0/25", "10.0.0.0/24"]));
        assert_eq!(total, BigUint::from(256u32));
    }

    #[test]
    fn test_mixed_versions_add_up() {
        let total = count_addresses(blocks(&["0.0.0.0/0", "2001:db8::/96"]));
        assert_eq!(total, BigUint::from((1u64 << 32) * 2));
    }

    #[test]
    fn test_count_set() {
        let mut set = CountryCidrSet::new();
        set.insert_all("JP", blocks(&["1.0.0.0/24", "2001:db8::/120"]));
        set.insert_all("CN", blocks(&["1.0.1.0/24", "1.0.2.0/23"]));
        let totals = count_set(&set);
        assert_eq!(totals["JP"], BigUint::from(512u32));
        assert_eq!(totals["CN"], BigUint::from(768u32));
    }
}
