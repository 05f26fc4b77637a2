//! Firewall rule generation from stored CIDR files.
//!
//! A [`FirewallBackend`] turns one country's blocks into the commands of a
//! particular tool; a [`CommandRunner`] executes them. Keeping the two apart
//! lets rule plans be inspected or dry-run without root.

mod iptables;
mod runner;
mod ufw;

pub use iptables::IptablesBackend;
pub use runner::{CommandRunner, DryRunRunner, SystemRunner};
pub use ufw::UfwBackend;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::store::FsCidrStore;
use crate::{CidrBlock, Error, IpVersion, Result};

/// What to do with traffic from a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Allow,
    Deny,
    Reject,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Deny => "deny",
            Action::Reject => "reject",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(Action::Allow),
            "deny" => Ok(Action::Deny),
            "reject" => Ok(Action::Reject),
            other => Err(Error::Firewall(format!("unknown action: {}", other))),
        }
    }
}

/// Supported firewall tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FirewallKind {
    #[default]
    Ufw,
    Iptables,
}

impl FirewallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FirewallKind::Ufw => "ufw",
            FirewallKind::Iptables => "iptables",
        }
    }

    /// Backend implementing this kind.
    pub fn backend(&self) -> Box<dyn FirewallBackend> {
        match self {
            FirewallKind::Ufw => Box::new(UfwBackend),
            FirewallKind::Iptables => Box::new(IptablesBackend),
        }
    }
}

impl fmt::Display for FirewallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FwCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl FwCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for FwCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Translates a country's blocks into firewall commands.
pub trait FirewallBackend: Send + Sync {
    /// Tool name, for messages.
    fn name(&self) -> &'static str;

    /// Programs that must be installed to apply a plan for `version`.
    fn required_programs(&self, version: IpVersion) -> &'static [&'static str];

    /// Commands applying `action` to `blocks` of one country and version.
    ///
    /// An empty block list yields no commands.
    fn plan(
        &self,
        action: Action,
        country: &str,
        version: IpVersion,
        blocks: &[CidrBlock],
    ) -> Vec<FwCommand>;
}

/// Applies stored country blocks through a backend and runner.
pub struct Firewall<'a> {
    backend: Box<dyn FirewallBackend>,
    runner: &'a dyn CommandRunner,
    store: &'a FsCidrStore,
}

impl<'a> Firewall<'a> {
    pub fn new(
        backend: Box<dyn FirewallBackend>,
        runner: &'a dyn CommandRunner,
        store: &'a FsCidrStore,
    ) -> Self {
        Self {
            backend,
            runner,
            store,
        }
    }

    /// Apply `action` to every listed country.
    ///
    /// Fails before running anything if a country has no stored CIDR files
    /// or a program needed by the planned IP versions is missing. Returns
    /// the number of commands run.
    pub fn apply<S: AsRef<str>>(&self, action: Action, countries: &[S]) -> Result<usize> {
        let mut plan = Vec::new();
        let mut versions = BTreeSet::new();
        for country in countries {
            let country = country.as_ref().to_uppercase();
            let blocks = self.store.load_country(&country)?.ok_or_else(|| {
                Error::Firewall(format!(
                    "CIDR files not found for {}; pull them with `cidre pull --merge`",
                    country
                ))
            })?;

            for version in IpVersion::ALL {
                let blocks: Vec<CidrBlock> = blocks.get(version).iter().copied().collect();
                if blocks.is_empty() {
                    log::warn!("No CIDR blocks found for {} in {}", country, version);
                    continue;
                }
                log::info!(
                    "{}: {} {} {} blocks of {}",
                    self.backend.name(),
                    action,
                    blocks.len(),
                    version,
                    country
                );
                plan.extend(self.backend.plan(action, &country, version, &blocks));
                versions.insert(version);
            }
        }

        for version in versions {
            for program in self.backend.required_programs(version) {
                if !self.runner.is_available(program) {
                    return Err(Error::Firewall(format!(
                        "{} is not installed on this system",
                        program
                    )));
                }
            }
        }

        for command in &plan {
            log::debug!("Executing: {}", command);
            self.runner.run(command)?;
        }
        Ok(plan.len())
    }
}
