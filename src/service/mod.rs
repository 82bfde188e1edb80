// src/service/mod.rs
//! Thin wrapper over the host's service-control commands, in the upstart
//! style: `service <name> <verb>` for lifecycle, `update-rc.d` for boot-time
//! enablement. No state of its own; every verb shells out and reports what
//! the command said.

use anyhow::{Context, Result};
use std::process::Command;

/// Runs a command line and reports its exit code or captured stdout.
pub trait CommandRunner: Send + Sync {
    fn retcode(&self, program: &str, args: &[&str]) -> Result<i32>;
    fn output(&self, program: &str, args: &[&str]) -> Result<String>;
}

/// Runner backed by `std::process::Command`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn retcode(&self, program: &str, args: &[&str]) -> Result<i32> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("running {program}"))?;
        Ok(status.code().unwrap_or(-1))
    }

    fn output(&self, program: &str, args: &[&str]) -> Result<String> {
        let out = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("running {program}"))?;
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

pub struct ServiceManager<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl ServiceManager<SystemRunner> {
    pub fn new() -> Self {
        Self {
            runner: SystemRunner,
        }
    }
}

impl Default for ServiceManager<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> ServiceManager<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Start the named service.
    pub fn start(&self, name: &str) -> Result<bool> {
        Ok(self.runner.retcode("service", &[name, "start"])? == 0)
    }

    /// Stop the named service.
    pub fn stop(&self, name: &str) -> Result<bool> {
        Ok(self.runner.retcode("service", &[name, "stop"])? == 0)
    }

    /// Restart the named service.
    pub fn restart(&self, name: &str) -> Result<bool> {
        Ok(self.runner.retcode("service", &[name, "restart"])? == 0)
    }

    /// Whether the named service reports itself running.
    pub fn status(&self, name: &str) -> Result<bool> {
        Ok(self
            .runner
            .output("service", &[name, "status"])?
            .contains("start/running"))
    }

    /// Enable the named service to start at boot.
    pub fn enable(&self, name: &str) -> Result<bool> {
        Ok(self
            .runner
            .retcode("update-rc.d", &["-n", "-f", name, "defaults"])?
            == 0)
    }

    /// Disable the named service from starting at boot.
    pub fn disable(&self, name: &str) -> Result<bool> {
        Ok(self
            .runner
            .retcode("update-rc.d", &["-n", "-f", name, "defaults"])?
            == 0)
    }
}
