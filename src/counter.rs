//! Address totals per country, read back from the CIDR store.

use num_bigint::BigUint;

use crate::count::count_addresses;
use crate::countries::ISO_3166_1_ALPHA_2_CODES;
use crate::store::FsCidrStore;
use crate::{IpVersion, Result};

/// Total addresses of one country (IPv4 and IPv6 combined).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCount {
    pub country: String,
    pub addresses: BigUint,
}

/// Counts addresses of stored countries.
pub struct CidrCounter<'a> {
    store: &'a FsCidrStore,
}

impl<'a> CidrCounter<'a> {
    pub fn new(store: &'a FsCidrStore) -> Self {
        Self { store }
    }

    /// Count the given countries, or every ISO country if `countries` is empty.
    ///
    /// Countries with no stored file for either version are left out, so
    /// an empty result means nothing was found. Results are sorted by
    /// total descending, then by country code.
    pub fn count<S: AsRef<str>>(&self, countries: &[S]) -> Result<Vec<CountryCount>> {
        let codes: Vec<String> = if countries.is_empty() {
            ISO_3166_1_ALPHA_2_CODES.iter().map(|c| c.to_string()).collect()
        } else {
            countries.iter().map(|c| c.as_ref().to_uppercase()).collect()
        };

        let mut totals = Vec::new();
        for country in codes {
            let Some(blocks) = self.store.load_country(&country)? else {
                log::debug!("No CIDR files for {}", country);
                continue;
            };
            let addresses = count_addresses(blocks.get(IpVersion::V4).iter().copied())
                + count_addresses(blocks.get(IpVersion::V6).iter().copied());
            totals.push(CountryCount { country, addresses });
        }

        totals.sort_by(|a, b| {
            b.addresses
                .cmp(&a.addresses)
                .then_with(|| a.country.cmp(&b.country))
        });
        Ok(totals)
    }
}
