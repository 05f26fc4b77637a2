//! Delegation record parser.
//!
//! RIR extended delegation files are pipe-delimited:
//!
//! ```text
//! registry|cc|type|start|value|date|status[|opaque-id|...]
//! apnic|JP|ipv4|1.0.16.0|4096|20110412|allocated|A92D9378
//! ripencc|DE|ipv6|2001:db8::|32|20050101|allocated|...
//! ```
//!
//! Only the first seven fields are read. For `ipv4` rows `value` is the
//! number of addresses; for `ipv6` rows it is the prefix length, which the
//! parser turns into an address count so that every record carries a count.

use std::fmt;
use std::net::IpAddr;

use crate::IpVersion;

const FIELD_DELIMITER: char = '|';
const MIN_FIELDS: usize = 7;

/// Delegation status. Rows with any other status are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Allocated,
    Assigned,
}

impl Status {
    /// Exact, case-sensitive match against the record's status field.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "allocated" => Some(Status::Allocated),
            "assigned" => Some(Status::Assigned),
            _ => None,
        }
    }
}

/// One validated delegation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRecord {
    /// Registry name from the first field (e.g. `apnic`)
    pub registry: String,
    /// ISO 3166-1 alpha-2 code, or whatever sentinel the registry uses
    pub country: String,
    pub version: IpVersion,
    pub start: IpAddr,
    /// Number of addresses, at least 1
    pub count: u128,
    pub status: Status,
}

impl DelegationRecord {
    /// First address as an integer.
    pub fn first(&self) -> u128 {
        ip_to_bits(self.start)
    }

    /// Last address as an integer (`start + count - 1`).
    pub fn last(&self) -> u128 {
        // Parsing guarantees count >= 1 and no overflow.
        self.first() + (self.count - 1)
    }
}

/// Why a line did not yield a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Fewer than seven fields (headers, summaries, blank lines)
    TooFewFields,
    /// Status other than `allocated`/`assigned`
    Status,
    /// Record type other than `ipv4`/`ipv6` (e.g. `asn`)
    UnknownType,
    /// Start address does not parse
    BadAddress,
    /// Start address is of the other IP version
    VersionMismatch,
    /// Value field does not parse, or is an impossible IPv6 prefix length
    BadCount,
    /// Zero addresses
    ZeroCount,
    /// Range runs past the end of the address space
    RangeOverflow,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::TooFewFields => "too few fields",
            SkipReason::Status => "status not allocated/assigned",
            SkipReason::UnknownType => "not an IP record",
            SkipReason::BadAddress => "unparsable start address",
            SkipReason::VersionMismatch => "address does not match record type",
            SkipReason::BadCount => "unparsable value",
            SkipReason::ZeroCount => "zero addresses",
            SkipReason::RangeOverflow => "range exceeds address space",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse one raw line, returning `None` for anything that should be skipped.
///
/// # Examples
/// ```
/// use cidre::record::parse_line;
///
/// let record = parse_line("apnic|JP|ipv4|1.0.0.0|256|20110811|allocated").unwrap();
/// assert_eq!(record.country, "JP");
/// assert_eq!(record.count, 256);
/// assert!(parse_line("apnic|JP|ipv4|1.0.0.0|256|20110811|available").is_none());
/// ```
pub fn parse_line(line: &str) -> Option<DelegationRecord> {
    parse_record(line).ok()
}

/// Parse one raw line, reporting why it was skipped.
pub fn parse_record(line: &str) -> Result<DelegationRecord, SkipReason> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() < MIN_FIELDS {
        return Err(SkipReason::TooFewFields);
    }

    let registry = fields[0];
    let country = fields[1];
    let record_type = fields[2];
    let start = fields[3];
    let value = fields[4];
    let status = fields[6];

    let status = Status::parse(status).ok_or(SkipReason::Status)?;
    let version = IpVersion::from_record_type(record_type).ok_or(SkipReason::UnknownType)?;

    let start: IpAddr = start.parse().map_err(|_| SkipReason::BadAddress)?;
    match (version, start) {
        (IpVersion::V4, IpAddr::V4(_)) | (IpVersion::V6, IpAddr::V6(_)) => {}
        _ => return Err(SkipReason::VersionMismatch),
    }

    let count = match version {
        IpVersion::V4 => value.parse::<u128>().map_err(|_| SkipReason::BadCount)?,
        IpVersion::V6 => {
            let prefix_len = value.parse::<u8>().map_err(|_| SkipReason::BadCount)?;
            if prefix_len > 128 {
                return Err(SkipReason::BadCount);
            }
            if prefix_len == 0 {
                // 2^128 addresses cannot be represented as a count.
                return Err(SkipReason::RangeOverflow);
            }
            1u128 << (128 - prefix_len)
        }
    };
    if count == 0 {
        return Err(SkipReason::ZeroCount);
    }

    let first = ip_to_bits(start);
    match first.checked_add(count - 1) {
        Some(last) if last <= version.max_address() => {}
        _ => return Err(SkipReason::RangeOverflow),
    }

    Ok(DelegationRecord {
        registry: registry.to_string(),
        country: country.to_string(),
        version,
        start,
        count,
        status,
    })
}

pub(crate) fn ip_to_bits(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u32::from(v4) as u128,
        IpAddr::V6(v6) => u128::from(v6),
    }
}
