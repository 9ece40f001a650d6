//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::domain::descriptor::VirtualMachineDescriptor;
use crate::domain::stack::StackOutputs;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Invocation parameters for an external tool process.
pub struct ExecSpec<'a> {
    /// Program name, resolved through PATH (possibly an overridden one).
    pub program: &'a str,
    /// Arguments, already split.
    pub args: &'a [&'a str],
    /// Working directory, `None` to inherit.
    pub cwd: Option<&'a Path>,
    /// Environment entries set on the child. Never mutates this process.
    pub env: &'a [(String, String)],
}

impl<'a> ExecSpec<'a> {
    #[must_use]
    pub fn new(program: &'a str, args: &'a [&'a str]) -> Self {
        Self {
            program,
            args,
            cwd: None,
            env: &[],
        }
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, spec: &ExecSpec<'_>) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        spec: &ExecSpec<'_>,
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Provisioner Port ──────────────────────────────────────────────────────────

/// Stack lifecycle operations: bring the stack up, tear it down.
///
/// Callers guarantee that `destroy` runs exactly once per `apply`
/// (successful or failed), on every exit path.
#[allow(async_fn_in_trait)]
pub trait Provisioner {
    /// Provision the stack and return the resource names it reported.
    ///
    /// # Errors
    ///
    /// Returns an error when provisioning fails or the outputs are
    /// incomplete. A failed apply may still have created resources.
    async fn apply(&self) -> Result<StackOutputs>;
    /// Tear the stack down.
    ///
    /// # Errors
    ///
    /// Returns an error when the teardown command fails. Callers record the
    /// failure rather than letting it mask an earlier verification result.
    async fn destroy(&self) -> Result<()>;
}

// ── Resource Inspector Port ───────────────────────────────────────────────────

/// Read-only, idempotent queries against the cloud control plane.
/// Retry policy is the implementation's concern, not the sequence's.
#[allow(async_fn_in_trait)]
pub trait ResourceInspector {
    /// Whether a virtual machine with this name exists in the resource group.
    async fn virtual_machine_exists(&self, name: &str, resource_group: &str) -> Result<bool>;
    /// Whether a network interface with this name exists in the resource group.
    async fn network_interface_exists(&self, name: &str, resource_group: &str) -> Result<bool>;
    /// Fetch the provider-reported snapshot of a virtual machine.
    async fn describe_virtual_machine(
        &self,
        name: &str,
        resource_group: &str,
    ) -> Result<VirtualMachineDescriptor>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
