//! Range-to-CIDR decomposition.
//!
//! Splits an inclusive address interval into the minimal ordered list of
//! aligned CIDR blocks covering it. At every step the largest block that is
//! both aligned at the current address and still inside the interval is
//! emitted, so an interval yields at most `2 * bits` blocks.

use crate::block::host_mask;
use crate::record::DelegationRecord;
use crate::{CidrBlock, IpVersion};

/// Decompose `count` addresses starting at `start`.
///
/// Returns an empty list for `count == 0` or when the range would run past
/// the end of the address space.
///
/// # Examples
/// ```
/// use cidre::{decompose, IpVersion};
///
/// let start = u32::from(std::net::Ipv4Addr::new(1, 0, 16, 0)) as u128;
/// let blocks = decompose(IpVersion::V4, start, 192);
/// let text: Vec<String> = blocks.iter().map(|b| b.to_string()).collect();
/// assert_eq!(text, ["1.0.16.0/25", "1.0.16.128/26"]);
/// ```
pub fn decompose(version: IpVersion, start: u128, count: u128) -> Vec<CidrBlock> {
    if count == 0 {
        return Vec::new();
    }
    match start.checked_add(count - 1) {
        Some(last) if last <= version.max_address() => decompose_range(version, start, last),
        _ => Vec::new(),
    }
}

/// Decompose the inclusive interval `[first, last]`.
///
/// Returns an empty list if `first > last`.
pub fn decompose_range(version: IpVersion, first: u128, last: u128) -> Vec<CidrBlock> {
    let bits = version.bits();
    let mut blocks = Vec::new();
    if first > last || last > version.max_address() {
        return blocks;
    }

    let mut start = first;
    loop {
        // Largest block aligned at `start`.
        let align = (start.trailing_zeros() as u8).min(bits);
        // Largest block that fits in what remains.
        let span = last - start;
        let fit = if span == u128::MAX {
            128
        } else {
            (127 - (span + 1).leading_zeros()) as u8
        };
        let host_bits = align.min(fit);

        blocks.push(CidrBlock::from_bits(version, start, bits - host_bits));

        let block_last = start | host_mask(host_bits);
        if block_last >= last {
            break;
        }
        start = block_last + 1;
    }

    blocks
}

/// Decompose the range covered by a delegation record.
pub fn decompose_record(record: &DelegationRecord) -> Vec<CidrBlock> {
    decompose(record.version, record.first(), record.count)
}
