//! Per-country aggregation of decomposed blocks.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use crate::{CidrBlock, IpVersion};

/// IPv4 and IPv6 blocks of one country, each kept sorted and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionedBlocks {
    pub ipv4: BTreeSet<CidrBlock>,
    pub ipv6: BTreeSet<CidrBlock>,
}

impl VersionedBlocks {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks of one version, ascending by network address.
    pub fn get(&self, version: IpVersion) -> &BTreeSet<CidrBlock> {
        match version {
            IpVersion::V4 => &self.ipv4,
            IpVersion::V6 => &self.ipv6,
        }
    }

    fn get_mut(&mut self, version: IpVersion) -> &mut BTreeSet<CidrBlock> {
        match version {
            IpVersion::V4 => &mut self.ipv4,
            IpVersion::V6 => &mut self.ipv6,
        }
    }

    /// Insert a block into the set of its version.
    ///
    /// Returns `false` if the block was already present.
    pub fn insert(&mut self, block: CidrBlock) -> bool {
        self.get_mut(block.version()).insert(block)
    }

    /// Total number of blocks across both versions.
    pub fn len(&self) -> usize {
        self.ipv4.len() + self.ipv6.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }
}

/// Country code → per-version unique, sorted block sets.
///
/// Countries are kept in code order. Codes are stored exactly as they
/// appear in the source records, including blank or sentinel codes.
///
/// # Examples
/// ```
/// use cidre::{CidrBlock, CountryCidrSet, IpVersion};
///
/// let mut set = CountryCidrSet::new();
/// let block: CidrBlock = "1.0.0.0/24".parse().unwrap();
/// assert!(set.insert("JP", block));
/// assert!(!set.insert("JP", block));
/// assert_eq!(set.blocks("JP", IpVersion::V4), vec![block]);
/// assert!(set.blocks("US", IpVersion::V4).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCidrSet {
    countries: BTreeMap<String, VersionedBlocks>,
}

impl CountryCidrSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one block for a country.
    ///
    /// The country's container is created on its first block. Returns
    /// `false` if the block was already present.
    pub fn insert(&mut self, country: &str, block: CidrBlock) -> bool {
        match self.countries.get_mut(country) {
            Some(blocks) => blocks.insert(block),
            None => {
                let mut blocks = VersionedBlocks::new();
                blocks.insert(block);
                self.countries.insert(country.to_string(), blocks);
                true
            }
        }
    }

    /// Insert many blocks for a country.
    pub fn insert_all<I>(&mut self, country: &str, blocks: I)
    where
        I: IntoIterator<Item = CidrBlock>,
    {
        for block in blocks {
            self.insert(country, block);
        }
    }

    /// Replace a country's blocks wholesale.
    pub fn set_country(&mut self, country: &str, blocks: VersionedBlocks) {
        self.countries.insert(country.to_string(), blocks);
    }

    /// Blocks of one country, if any were seen.
    pub fn get(&self, country: &str) -> Option<&VersionedBlocks> {
        self.countries.get(country)
    }

    /// Ordered blocks of one country and version.
    ///
    /// Empty both for unknown countries and for countries with no blocks of
    /// that version.
    pub fn blocks(&self, country: &str, version: IpVersion) -> Vec<CidrBlock> {
        self.countries
            .get(country)
            .map(|b| b.get(version).iter().copied().collect())
            .unwrap_or_default()
    }

    /// Country codes in order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    /// Iterate countries with their blocks.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VersionedBlocks)> {
        self.countries.iter().map(|(cc, b)| (cc.as_str(), b))
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Total number of blocks across all countries and versions.
    pub fn block_count(&self) -> usize {
        self.countries.values().map(VersionedBlocks::len).sum()
    }
}

impl IntoIterator for CountryCidrSet {
    type Item = (String, VersionedBlocks);
    type IntoIter = btree_map::IntoIter<String, VersionedBlocks>;

    fn into_iter(self) -> Self::IntoIter {
        self.countries.into_iter()
    }
}

impl<S: AsRef<str>> Extend<(S, CidrBlock)> for CountryCidrSet {
    fn extend<I: IntoIterator<Item = (S, CidrBlock)>>(&mut self, iter: I) {
        for (country, block) in iter {
            self.insert(country.as_ref(), block);
        }
    }
}

impl<S: AsRef<str>> FromIterator<(S, CidrBlock)> for CountryCidrSet {
    fn from_iter<I: IntoIterator<Item = (S, CidrBlock)>>(iter: I) -> Self {
        let mut set = CountryCidrSet::new();
        set.extend(iter);
        set
    }
}
