//! Cidre - compiles RIR delegation data into per-country CIDR sets.
//!
//! Each Regional Internet Registry publishes a "delegated extended" file
//! listing which address ranges were handed to which country. This crate
//! turns those files into CIDR blocks grouped by country and address
//! family, optionally merged into the smallest equivalent set.
//!
//! # Pipeline
//!
//! 1. **Parse**: each line becomes a [`record::DelegationRecord`] or is skipped
//! 2. **Decompose**: a range becomes the fewest aligned [`CidrBlock`]s covering it
//! 3. **Aggregate**: blocks are grouped into a [`CountryCidrSet`]
//! 4. **Minimize** (optional): contained blocks are absorbed, siblings merged
//! 5. **Count**: exact address totals as arbitrary-precision integers
//!
//! # Quick Start
//!
//! ```
//! use cidre::{count_addresses, Compiler, IpVersion, NullReporter, Registry, RegistrySource};
//!
//! let source = RegistrySource::from_text(
//!     Registry::RipeNcc,
//!     "ripencc|NL|ipv4|192.0.2.0|128|20100101|allocated\n\
//!      ripencc|NL|ipv4|192.0.2.128|128|20100101|assigned",
//! );
//!
//! let set = Compiler::new(&NullReporter).with_merge(true).compile(&[source]);
//! let blocks = set.blocks("NL", IpVersion::V4);
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].to_string(), "192.0.2.0/24");
//! assert_eq!(count_addresses(blocks).to_string(), "256");
//! ```
//!
//! # Storage and firewalls
//!
//! Compiled sets are written by [`FsCidrStore`] as one `.cidr` file per
//! country and family. [`CidrCounter`] reads them back for totals, and
//! [`firewall::Firewall`] turns them into `ufw` or `iptables`/`ipset` rules.

mod error;

pub mod aggregate;
pub mod block;
pub mod compile;
pub mod config;
pub mod count;
pub mod counter;
pub mod countries;
pub mod decompose;
pub mod fetch;
pub mod firewall;
pub mod ip_version;
pub mod metadata;
pub mod minimize;
pub mod record;
pub mod registry;
pub mod reporter;
pub mod store;

// Re-export core types
pub use block::CidrBlock;
pub use error::{BlockError, Error, Result};
pub use ip_version::IpVersion;
pub use registry::Registry;

// Re-export the pipeline
pub use aggregate::{CountryCidrSet, VersionedBlocks};
pub use compile::{Compiler, RegistrySource};
pub use count::{count_addresses, count_set};
pub use decompose::{decompose, decompose_range, decompose_record};
pub use minimize::{minimize, minimize_set};
pub use reporter::{CollectingReporter, LogReporter, NullReporter, RegistrySummary, Reporter};

// Re-export storage, fetching and configuration
pub use config::Config;
pub use counter::{CidrCounter, CountryCount};
pub use fetch::RirFetcher;
pub use metadata::PullMetadata;
pub use store::FsCidrStore;

// Re-export firewall types
pub use firewall::{Action, Firewall, FirewallBackend, FirewallKind};
