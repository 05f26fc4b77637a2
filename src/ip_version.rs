//! IP version of delegations and blocks.

use std::fmt;

/// IpVersion selects the 32-bit or 128-bit address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpVersion {
    /// 32-bit address space
    V4,
    /// 128-bit address space
    V6,
}

impl IpVersion {
    /// Both versions, in storage order.
    pub const ALL: [IpVersion; 2] = [IpVersion::V4, IpVersion::V6];

    /// Parse the `type` field of a delegation record.
    ///
    /// Returns `None` for anything other than `ipv4`/`ipv6` (e.g. `asn`).
    pub fn from_record_type(s: &str) -> Option<Self> {
        match s {
            "ipv4" => Some(IpVersion::V4),
            "ipv6" => Some(IpVersion::V6),
            _ => None,
        }
    }

    /// Width of the address space in bits.
    pub fn bits(self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 128,
        }
    }

    /// Highest address of this version as a `u128`.
    pub fn max_address(self) -> u128 {
        match self {
            IpVersion::V4 => u32::MAX as u128,
            IpVersion::V6 => u128::MAX,
        }
    }

    /// Name used in record fields and store directories.
    pub fn as_str(&self) -> &'static str {
        match self {
            IpVersion::V4 => "ipv4",
            IpVersion::V6 => "ipv6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
