//! iptables backend (uses ipset so each country/version is a single rule).

use super::{Action, FirewallBackend, FwCommand};
use crate::{CidrBlock, IpVersion};

/// Loads blocks into a `hash:net` ipset and matches it with one rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct IptablesBackend;

impl IptablesBackend {
    /// ipset name for a country and version, e.g. `cidre_jp_blocklist_ipv4`.
    pub fn set_name(country: &str, version: IpVersion) -> String {
        format!("cidre_{}_blocklist_{}", country.to_lowercase(), version)
    }

    fn target(action: Action) -> &'static str {
        match action {
            Action::Allow => "ACCEPT",
            Action::Deny => "DROP",
            Action::Reject => "REJECT",
        }
    }
}

impl FirewallBackend for IptablesBackend {
    fn name(&self) -> &'static str {
        "iptables"
    }

    fn required_programs(&self, version: IpVersion) -> &'static [&'static str] {
        match version {
            IpVersion::V4 => &["ipset", "iptables"],
            IpVersion::V6 => &["ipset", "ip6tables"],
        }
    }

    fn plan(
        &self,
        action: Action,
        country: &str,
        version: IpVersion,
        blocks: &[CidrBlock],
    ) -> Vec<FwCommand> {
        if blocks.is_empty() {
            return Vec::new();
        }

        let set = Self::set_name(country, version);
        let family = match version {
            IpVersion::V4 => "inet",
            IpVersion::V6 => "inet6",
        };
        let mut plan = Vec::with_capacity(blocks.len() + 3);

        plan.push(FwCommand::new(
            "ipset",
            ["create", set.as_str(), "hash:net", "family", family, "-exist"],
        ));
        plan.push(FwCommand::new("ipset", ["flush", set.as_str()]));
        for block in blocks {
            plan.push(FwCommand::new(
                "ipset",
                ["add".to_string(), set.clone(), block.to_string(), "-exist".to_string()],
            ));
        }

        let program = match version {
            IpVersion::V4 => "iptables",
            IpVersion::V6 => "ip6tables",
        };
        plan.push(FwCommand::new(
            program,
            [
                "-I",
                "INPUT",
                "-m",
                "set",
                "--match-set",
                set.as_str(),
                "src",
                "-j",
                Self::target(action),
            ],
        ));
        plan
    }
}
