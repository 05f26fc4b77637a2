//! Plain-text CIDR store.
//!
//! Layout under the base directory:
//!
//! ```text
//! <base>/ipv4/<cc>.cidr
//! <base>/ipv6/<cc>.cidr
//! <base>/pull.meta
//! ```
//!
//! Each `.cidr` file holds one block per line in CIDR notation, in the order
//! they were written. Country codes are lower-cased in file names.

use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::aggregate::{CountryCidrSet, VersionedBlocks};
use crate::metadata::PullMetadata;
use crate::{CidrBlock, Error, IpVersion, Result};

const CIDR_EXTENSION: &str = "cidr";
const METADATA_FILE: &str = "pull.meta";

/// Write blocks one per line.
pub fn write_blocks<W: Write>(writer: W, blocks: &[CidrBlock]) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for block in blocks {
        writeln!(writer, "{}", block)?;
    }
    writer.flush()
}

/// Read blocks written by [`write_blocks`].
///
/// Blank lines are ignored. `origin` is only used in error messages.
pub fn read_blocks<R: BufRead>(reader: R, origin: &Path) -> Result<Vec<CidrBlock>> {
    let mut blocks = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let value = line.trim();
        if value.is_empty() {
            continue;
        }
        let block = value.parse::<CidrBlock>().map_err(|_| Error::InvalidCidr {
            path: origin.to_path_buf(),
            line: idx + 1,
            value: value.to_string(),
        })?;
        blocks.push(block);
    }
    Ok(blocks)
}

/// Filesystem store of per-country, per-version CIDR files.
#[derive(Debug, Clone)]
pub struct FsCidrStore {
    base: PathBuf,
}

impl FsCidrStore {
    /// Create a store rooted at `base`. Nothing is touched until saving.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of the file for one country and version.
    pub fn path(&self, country: &str, version: IpVersion) -> PathBuf {
        self.base
            .join(version.as_str())
            .join(format!("{}.{}", country.to_lowercase(), CIDR_EXTENSION))
    }

    /// Save every country of `set`, both versions.
    ///
    /// A version with no blocks is written as an empty file. Country codes
    /// that cannot be used as a file name (blank, or not alphanumeric) are
    /// skipped with a warning. Returns the number of files written.
    pub fn save(&self, set: &CountryCidrSet) -> Result<usize> {
        log::info!("Saving CIDRs into {}/*", self.base.display());
        let mut written = 0;
        for (country, blocks) in set.iter() {
            if !is_storable_code(country) {
                log::warn!("Not storing {} blocks for country code {:?}", blocks.len(), country);
                continue;
            }
            for version in IpVersion::ALL {
                let blocks: Vec<CidrBlock> = blocks.get(version).iter().copied().collect();
                self.save_blocks(country, version, &blocks)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Atomically write one country/version file.
    pub fn save_blocks(
        &self,
        country: &str,
        version: IpVersion,
        blocks: &[CidrBlock],
    ) -> Result<()> {
        let path = self.path(country, version);
        let dir = self.base.join(version.as_str());
        fs::create_dir_all(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        write_blocks(temp.as_file_mut(), blocks)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;

        log::debug!("Data saved to {}", path.display());
        Ok(())
    }

    /// Load one country/version file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load(&self, country: &str, version: IpVersion) -> Result<Option<Vec<CidrBlock>>> {
        let path = self.path(country, version);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        read_blocks(BufReader::new(file), &path).map(Some)
    }

    /// Load both versions of a country.
    ///
    /// Returns `Ok(None)` if neither file exists.
    pub fn load_country(&self, country: &str) -> Result<Option<VersionedBlocks>> {
        let ipv4 = self.load(country, IpVersion::V4)?;
        let ipv6 = self.load(country, IpVersion::V6)?;
        if ipv4.is_none() && ipv6.is_none() {
            return Ok(None);
        }
        Ok(Some(VersionedBlocks {
            ipv4: ipv4.unwrap_or_default().into_iter().collect(),
            ipv6: ipv6.unwrap_or_default().into_iter().collect(),
        }))
    }

    /// Path of the pull metadata file.
    pub fn metadata_path(&self) -> PathBuf {
        self.base.join(METADATA_FILE)
    }

    /// Record metadata about the last pull.
    pub fn save_metadata(&self, meta: &PullMetadata) -> Result<()> {
        fs::create_dir_all(&self.base)?;
        meta.save(self.metadata_path())
    }

    /// Metadata of the last pull, default if none was recorded.
    pub fn load_metadata(&self) -> Result<PullMetadata> {
        PullMetadata::load(self.metadata_path())
    }
}

fn is_storable_code(country: &str) -> bool {
    !country.is_empty() && country.chars().all(|c| c.is_ascii_alphanumeric())
}
