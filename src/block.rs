//! CIDR block type.

use ipnet::IpNet;
use num_bigint::BigUint;
use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::BlockError;
use crate::IpVersion;

/// A CIDR block whose network address has no host bits set.
///
/// Blocks order by IP version, then network address, then prefix length,
/// so sorted collections come out ascending by network address.
///
/// # Examples
/// ```
/// use cidre::CidrBlock;
///
/// let block: CidrBlock = "203.0.113.0/24".parse().unwrap();
/// assert_eq!(block.prefix_len(), 24);
/// assert!("203.0.113.1/24".parse::<CidrBlock>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CidrBlock {
    net: IpNet,
}

impl CidrBlock {
    /// Create a block from a network address and prefix length.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, BlockError> {
        let version = match addr {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        };
        let net = IpNet::new(addr, prefix_len).map_err(|_| BlockError::PrefixOutOfRange {
            version: version.as_str(),
            prefix: prefix_len,
        })?;
        Self::from_ipnet(net)
    }

    /// Wrap an [`IpNet`], rejecting it if host bits are set.
    pub fn from_ipnet(net: IpNet) -> Result<Self, BlockError> {
        if net.trunc() != net {
            return Err(BlockError::HostBitsSet(net.to_string()));
        }
        Ok(Self { net })
    }

    /// Build a block from an integer network address.
    ///
    /// Used by the decomposer and minimizer, whose arithmetic guarantees
    /// alignment. A violation is a defect in that arithmetic, so it panics.
    pub(crate) fn from_bits(version: IpVersion, network: u128, prefix_len: u8) -> Self {
        assert!(
            network <= version.max_address(),
            "network {network:#x} outside {version} address space"
        );
        let addr = match version {
            IpVersion::V4 => IpAddr::V4(Ipv4Addr::from(network as u32)),
            IpVersion::V6 => IpAddr::V6(Ipv6Addr::from(network)),
        };
        match Self::new(addr, prefix_len) {
            Ok(block) => block,
            Err(e) => panic!("CIDR block invariant violated: {e}"),
        }
    }

    /// Wrap a network produced by `IpNet::aggregate`, which is always
    /// truncated to its prefix.
    pub(crate) fn from_aggregate(net: IpNet) -> Self {
        match Self::from_ipnet(net) {
            Ok(block) => block,
            Err(e) => panic!("CIDR block invariant violated: {e}"),
        }
    }

    /// IP version of this block.
    pub fn version(&self) -> IpVersion {
        match self.net {
            IpNet::V4(_) => IpVersion::V4,
            IpNet::V6(_) => IpVersion::V6,
        }
    }

    /// Network address.
    pub fn network(&self) -> IpAddr {
        self.net.network()
    }

    /// Prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// The underlying [`IpNet`].
    pub fn ipnet(&self) -> IpNet {
        self.net
    }

    /// Number of host bits (`bits - prefix`).
    pub fn host_bits(&self) -> u8 {
        self.version().bits() - self.prefix_len()
    }

    /// First address as an integer.
    pub fn first(&self) -> u128 {
        match self.net.network() {
            IpAddr::V4(v4) => u32::from(v4) as u128,
            IpAddr::V6(v6) => u128::from(v6),
        }
    }

    /// Last address as an integer.
    pub fn last(&self) -> u128 {
        self.first() | host_mask(self.host_bits())
    }

    /// Exact number of addresses covered.
    pub fn num_addresses(&self) -> BigUint {
        BigUint::from(1u8) << usize::from(self.host_bits())
    }
}

/// Mask with the low `host_bits` bits set.
pub(crate) fn host_mask(host_bits: u8) -> u128 {
    if host_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    }
}

impl Ord for CidrBlock {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version()
            .cmp(&other.version())
            .then_with(|| self.first().cmp(&other.first()))
            .then_with(|| self.prefix_len().cmp(&other.prefix_len()))
    }
}

impl PartialOrd for CidrBlock {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

impl FromStr for CidrBlock {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let net = s
            .trim()
            .parse::<IpNet>()
            .map_err(|_| BlockError::InvalidNotation(s.to_string()))?;
        Self::from_ipnet(net)
    }
}

/// Block relations used to check decomposition and minimization results.
#[cfg(test)]
impl CidrBlock {
    /// Check if `other` lies entirely within this block.
    pub(crate) fn contains(&self, other: &CidrBlock) -> bool {
        self.version() == other.version()
            && self.first() <= other.first()
            && other.last() <= self.last()
    }

    /// The enclosing block one bit shorter, or `None` at prefix 0.
    pub(crate) fn parent(&self) -> Option<CidrBlock> {
        let prefix = self.prefix_len().checked_sub(1)?;
        let host_bits = self.version().bits() - prefix;
        let network = self.first() & !host_mask(host_bits);
        Some(CidrBlock::from_bits(self.version(), network, prefix))
    }

    /// Check if both blocks are the two halves of the same parent.
    pub(crate) fn is_sibling_of(&self, other: &CidrBlock) -> bool {
        self.version() == other.version()
            && self.prefix_len() == other.prefix_len()
            && self.first() != other.first()
            && self.parent().is_some()
            && self.parent() == other.parent()
    }
}
