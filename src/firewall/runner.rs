//! Execution of planned firewall commands.

use std::env;
use std::path::Path;
use std::process::Command;

use parking_lot::Mutex;

use super::FwCommand;
use crate::{Error, Result};

/// Runs external commands on behalf of a firewall backend.
pub trait CommandRunner: Send + Sync {
    /// Execute a command, failing on a non-zero exit status.
    fn run(&self, command: &FwCommand) -> Result<()>;

    /// Whether `program` can be found.
    fn is_available(&self, program: &str) -> bool;
}

/// Runs commands on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &FwCommand) -> Result<()> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|e| Error::Firewall(format!("failed to run {}: {}", command.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Firewall(format!(
                "`{}` exited with {}: {}",
                command,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn is_available(&self, program: &str) -> bool {
        let Some(paths) = env::var_os("PATH") else {
            return false;
        };
        env::split_paths(&paths).any(|dir| is_executable(&dir.join(program)))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Records commands instead of running them.
///
/// Used by `--dry-run` and by tests.
#[derive(Debug)]
pub struct DryRunRunner {
    commands: Mutex<Vec<FwCommand>>,
    missing: Vec<String>,
}

impl DryRunRunner {
    /// A runner that reports every program as installed.
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            missing: Vec::new(),
        }
    }

    /// A runner that reports the given programs as missing.
    pub fn with_missing(programs: &[&str]) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            missing: programs.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Commands recorded so far, in order.
    pub fn commands(&self) -> Vec<FwCommand> {
        self.commands.lock().clone()
    }
}

impl Default for DryRunRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &FwCommand) -> Result<()> {
        self.commands.lock().push(command.clone());
        Ok(())
    }

    fn is_available(&self, program: &str) -> bool {
        !self.missing.iter().any(|m| m == program)
    }
}
