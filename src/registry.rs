//! Regional Internet Registries publishing delegation data.

use std::fmt;
use std::str::FromStr;

/// One of the five RIRs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Registry {
    Afrinic,
    Apnic,
    Arin,
    Lacnic,
    RipeNcc,
}

impl Registry {
    /// All registries, in fetch order.
    pub const ALL: [Registry; 5] = [
        Registry::Afrinic,
        Registry::Apnic,
        Registry::Arin,
        Registry::Lacnic,
        Registry::RipeNcc,
    ];

    /// Name as it appears in the first field of a delegation record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Registry::Afrinic => "afrinic",
            Registry::Apnic => "apnic",
            Registry::Arin => "arin",
            Registry::Lacnic => "lacnic",
            Registry::RipeNcc => "ripencc",
        }
    }

    /// URL of the registry's extended delegation file.
    pub fn default_url(&self) -> &'static str {
        match self {
            Registry::Afrinic => {
                "https://ftp.afrinic.net/pub/stats/afrinic/delegated-afrinic-extended-latest"
            }
            Registry::Apnic => {
                "https://ftp.apnic.net/pub/stats/apnic/delegated-apnic-extended-latest"
            }
            Registry::Arin => "https://ftp.arin.net/pub/stats/arin/delegated-arin-extended-latest",
            Registry::Lacnic => {
                "https://ftp.lacnic.net/pub/stats/lacnic/delegated-lacnic-extended-latest"
            }
            Registry::RipeNcc => {
                "https://ftp.ripe.net/pub/stats/ripencc/delegated-ripencc-extended-latest"
            }
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Registry {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Registry::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_round_trip() {
        for registry in Registry::ALL {
            assert_eq!(registry.as_str().parse::<Registry>(), Ok(registry));
        }
        assert_eq!("iana".parse::<Registry>(), Err(()));
        assert_eq!("RIPENCC".parse::<Registry>(), Err(()));
    }

    #[test]
    fn test_default_urls() {
        for registry in Registry::ALL {
            let url = registry.default_url();
            assert!(url.starts_with("https://"));
            assert!(url.ends_with(&format!("delegated-{}-extended-latest", registry)));
        }
    }
}
