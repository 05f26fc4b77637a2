//! Compile registry delegation files into per-country CIDR sets.
//!
//! Registries are parsed and decomposed in parallel, each into its own
//! list of blocks. The lists are then folded into one [`CountryCidrSet`]
//! sequentially, and minimized if merging was requested.

use rayon::prelude::*;

use crate::aggregate::CountryCidrSet;
use crate::decompose::decompose_record;
use crate::minimize::minimize_set;
use crate::record::parse_record;
use crate::reporter::{RegistrySummary, Reporter};
use crate::{CidrBlock, Registry};

/// Raw lines of one registry's delegation file.
///
/// A registry that could not be fetched is represented by an empty source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySource {
    pub registry: Registry,
    pub lines: Vec<String>,
}

impl RegistrySource {
    /// Create a source from already split lines.
    pub fn new(registry: Registry, lines: Vec<String>) -> Self {
        Self { registry, lines }
    }

    /// Create a source by splitting a whole file body into lines.
    pub fn from_text(registry: Registry, text: &str) -> Self {
        Self {
            registry,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// A source contributing nothing.
    pub fn empty(registry: Registry) -> Self {
        Self {
            registry,
            lines: Vec::new(),
        }
    }
}

/// Blocks decomposed from one record, tagged with its country.
type CountryBlocks = (String, Vec<CidrBlock>);

/// Compiles registry sources into a [`CountryCidrSet`].
///
/// # Example
///
/// ```
/// use cidre::{Compiler, IpVersion, NullReporter, Registry, RegistrySource};
///
/// let source = RegistrySource::from_text(
///     Registry::Apnic,
///     "apnic|JP|ipv4|1.0.16.0|128|20110412|allocated\n\
///      apnic|JP|ipv4|1.0.16.128|128|20110412|assigned\n",
/// );
/// let set = Compiler::new(&NullReporter).with_merge(true).compile(&[source]);
/// let blocks: Vec<String> = set
///     .blocks("JP", IpVersion::V4)
///     .iter()
///     .map(|b| b.to_string())
///     .collect();
/// assert_eq!(blocks, ["1.0.16.0/24"]);
/// ```
pub struct Compiler<'r> {
    merge: bool,
    reporter: &'r dyn Reporter,
}

impl<'r> Compiler<'r> {
    /// Create a compiler reporting to `reporter`, with merging disabled.
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self {
            merge: false,
            reporter,
        }
    }

    /// Enable or disable minimization of the result.
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Whether the result will be minimized.
    pub fn merge(&self) -> bool {
        self.merge
    }

    /// Compile all sources into one set.
    pub fn compile(&self, sources: &[RegistrySource]) -> CountryCidrSet {
        let parsed: Vec<Vec<CountryBlocks>> = sources
            .par_iter()
            .map(|source| self.decompose_source(source))
            .collect();

        let mut set = CountryCidrSet::new();
        for (country, blocks) in parsed.into_iter().flatten() {
            set.insert_all(&country, blocks);
        }
        log::debug!(
            "Aggregated {} blocks across {} countries",
            set.block_count(),
            set.len()
        );

        if self.merge {
            minimize_set(&set)
        } else {
            set
        }
    }

    /// Parse and decompose one registry's lines.
    fn decompose_source(&self, source: &RegistrySource) -> Vec<CountryBlocks> {
        let mut summary = RegistrySummary {
            lines: source.lines.len(),
            ..RegistrySummary::default()
        };
        let mut decomposed = Vec::new();

        for (idx, line) in source.lines.iter().enumerate() {
            match parse_record(line) {
                Ok(record) => {
                    let blocks = decompose_record(&record);
                    summary.records += 1;
                    summary.blocks += blocks.len();
                    decomposed.push((record.country, blocks));
                }
                Err(reason) => {
                    summary.skipped += 1;
                    self.reporter
                        .skipped_line(source.registry, idx + 1, line, reason);
                }
            }
        }

        self.reporter.registry_done(source.registry, &summary);
        decomposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SkipReason;
    use crate::reporter::CollectingReporter;
    use crate::IpVersion;

    const APNIC: &str = "\
2|apnic|20240101|5|19830613|20231231|+1000
apnic|*|ipv4|*|3|summary
apnic|JP|ipv4|1.0.16.0|192|20110412|allocated
apnic|JP|ipv4|1.0.16.0|128|20110412|allocated
apnic|CN|ipv4|1.0.1.0|256|20110414|available
apnic|AU|ipv6|2001:db8::|32|20050101|assigned
apnic|JP|asn|173|1|20020801|allocated
";

    const RIPE: &str = "\
ripencc|NL|ipv4|192.0.2.0|128|19930901|allocated
ripencc|NL|ipv4|192.0.2.128|128|19930901|assigned
ripencc|JP|ipv4|1.0.16.128|64|20110412|assigned
ripencc|DE|ipv4|not-an-ip|256|19930901|allocated
";

    fn text(blocks: &[CidrBlock]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    fn sources() -> Vec<RegistrySource> {
        vec![
            RegistrySource::from_text(Registry::Apnic, APNIC),
            RegistrySource::from_text(Registry::RipeNcc, RIPE),
        ]
    }

    #[test]
    fn test_compile_without_merge() {
        let reporter = CollectingReporter::new();
        let set = Compiler::new(&reporter).compile(&sources());

        assert_eq!(
            text(&set.blocks("JP", IpVersion::V4)),
            vec!["1.0.16.0/25", "1.0.16.128/26"]
        );
        assert_eq!(
            text(&set.blocks("NL", IpVersion::V4)),
            vec!["192.0.2.0/25", "192.0.2.128/25"]
        );
        assert_eq!(text(&set.blocks("AU", IpVersion::V6)), vec!["2001:db8::/32"]);
        // `available` rows contribute nothing.
        assert!(set.get("CN").is_none());
        assert!(set.get("DE").is_none());
    }

    #[test]
    fn test_compile_with_merge() {
        let set = Compiler::new(&crate::NullReporter)
            .with_merge(true)
            .compile(&sources());
        assert_eq!(text(&set.blocks("NL", IpVersion::V4)), vec!["192.0.2.0/24"]);
        assert_eq!(
            text(&set.blocks("JP", IpVersion::V4)),
            vec!["1.0.16.0/25", "1.0.16.128/26"]
        );
    }

    #[test]
    fn test_skips_reported() {
        let reporter = CollectingReporter::new();
        Compiler::new(&reporter).compile(&sources());

        assert_eq!(
            reporter.skipped(),
            vec![
                (Registry::Apnic, 1, SkipReason::Status),
                (Registry::Apnic, 2, SkipReason::TooFewFields),
                (Registry::Apnic, 5, SkipReason::Status),
                (Registry::Apnic, 7, SkipReason::UnknownType),
                (Registry::RipeNcc, 4, SkipReason::BadAddress),
            ]
        );

        let apnic = reporter.summary(Registry::Apnic).unwrap();
        assert_eq!(apnic.lines, 7);
        assert_eq!(apnic.records, 3);
        assert_eq!(apnic.skipped, 4);
        assert_eq!(apnic.blocks, 4);
    }

    #[test]
    fn test_empty_sources_tolerated() {
        let set = Compiler::new(&crate::NullReporter).compile(&[
            RegistrySource::empty(Registry::Arin),
            RegistrySource::empty(Registry::Lacnic),
        ]);
        assert!(set.is_empty());
        assert!(Compiler::new(&crate::NullReporter).compile(&[]).is_empty());
    }

    #[test]
    fn test_source_order_does_not_matter() {
        let mut reversed = sources();
        reversed.reverse();
        let a = Compiler::new(&crate::NullReporter).compile(&sources());
        let b = Compiler::new(&crate::NullReporter).compile(&reversed);
        assert_eq!(a, b);
    }
}
