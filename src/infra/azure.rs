//! Infrastructure implementation of the `ResourceInspector` port.
//!
//! `AzureCli<R>` routes all control-plane queries through the `az` CLI via a
//! `CommandRunner`. Queries are read-only; a non-zero exit from `az ... show`
//! is treated as resource absence.

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ExecSpec, ResourceInspector};
use crate::domain::descriptor::VirtualMachineDescriptor;
use crate::infra::command_runner::{DEFAULT_QUERY_TIMEOUT, TokioCommandRunner};

/// Adapter querying Azure through the `az` CLI, scoped to one subscription.
pub struct AzureCli<R: CommandRunner> {
    runner: R,
    subscription: String,
    env: Vec<(String, String)>,
}

impl<R: CommandRunner> AzureCli<R> {
    /// Create an adapter with an explicit runner instance.
    pub fn new(runner: R, subscription: String, env: Vec<(String, String)>) -> Self {
        Self {
            runner,
            subscription,
            env,
        }
    }

    async fn show(
        &self,
        resource: &str,
        name: &str,
        resource_group: &str,
    ) -> Result<std::process::Output> {
        // `resource` is the az command group, e.g. "vm" or "network nic".
        let mut args: Vec<&str> = resource.split_whitespace().collect();
        args.extend_from_slice(&[
            "show",
            "--name",
            name,
            "--resource-group",
            resource_group,
            "--subscription",
            &self.subscription,
            "--output",
            "json",
        ]);
        self.runner
            .run(&ExecSpec {
                program: "az",
                args: &args,
                cwd: None,
                env: &self.env,
            })
            .await
            .with_context(|| format!("az {resource} show"))
    }
}

impl AzureCli<TokioCommandRunner> {
    /// Production constructor.
    #[must_use]
    pub fn from_subscription(subscription: String, env: Vec<(String, String)>) -> Self {
        Self::new(
            TokioCommandRunner::new(DEFAULT_QUERY_TIMEOUT),
            subscription,
            env,
        )
    }
}

impl<R: CommandRunner> ResourceInspector for AzureCli<R> {
    async fn virtual_machine_exists(&self, name: &str, resource_group: &str) -> Result<bool> {
        let output = self.show("vm", name, resource_group).await?;
        Ok(output.status.success())
    }

    async fn network_interface_exists(&self, name: &str, resource_group: &str) -> Result<bool> {
        let output = self.show("network nic", name, resource_group).await?;
        Ok(output.status.success())
    }

    async fn describe_virtual_machine(
        &self,
        name: &str,
        resource_group: &str,
    ) -> Result<VirtualMachineDescriptor> {
        let output = self.show("vm", name, resource_group).await?;
        anyhow::ensure!(
            output.status.success(),
            "az vm show failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).context("invalid JSON from az vm show")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::cell::RefCell;
    use std::process::Output;

    use anyhow::Result;

    use super::*;

    fn exit_status(code: i32) -> std::process::ExitStatus {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            std::process::ExitStatus::from_raw(code << 8)
        }
        #[cfg(not(unix))]
        {
            use std::os::windows::process::ExitStatusExt;
            std::process::ExitStatus::from_raw(code as u32)
        }
    }

    struct RunnerSpy {
        args_seen: RefCell<Vec<Vec<String>>>,
        output: Output,
    }

    impl RunnerSpy {
        fn returning(output: Output) -> Self {
            Self {
                args_seen: RefCell::new(Vec::new()),
                output,
            }
        }
    }

    impl CommandRunner for RunnerSpy {
        async fn run(&self, spec: &ExecSpec<'_>) -> Result<Output> {
            assert_eq!(spec.program, "az");
            self.args_seen
                .borrow_mut()
                .push(spec.args.iter().map(ToString::to_string).collect());
            Ok(Output {
                status: self.output.status,
                stdout: self.output.stdout.clone(),
                stderr: self.output.stderr.clone(),
            })
        }
        async fn run_with_timeout(
            &self,
            spec: &ExecSpec<'_>,
            _: std::time::Duration,
        ) -> Result<Output> {
            self.run(spec).await
        }
    }

    fn ok(stdout: &[u8]) -> Output {
        Output {
            status: exit_status(0),
            stdout: stdout.to_vec(),
            stderr: Vec::new(),
        }
    }

    fn not_found() -> Output {
        Output {
            status: exit_status(3),
            stdout: Vec::new(),
            stderr: b"ResourceNotFound".to_vec(),
        }
    }

    fn azure(spy: RunnerSpy) -> AzureCli<RunnerSpy> {
        AzureCli::new(spy, "sub-1".to_string(), Vec::new())
    }

    #[tokio::test]
    async fn vm_exists_builds_the_show_query() {
        let az = azure(RunnerSpy::returning(ok(b"{}")));
        assert!(az.virtual_machine_exists("demo-vm", "demo-rg").await.expect("query"));
        let args = az.runner.args_seen.borrow();
        assert_eq!(
            args[0],
            vec![
                "vm",
                "show",
                "--name",
                "demo-vm",
                "--resource-group",
                "demo-rg",
                "--subscription",
                "sub-1",
                "--output",
                "json",
            ]
        );
    }

    #[tokio::test]
    async fn nic_query_uses_network_nic_group() {
        let az = azure(RunnerSpy::returning(ok(b"{}")));
        assert!(az.network_interface_exists("demo-nic", "demo-rg").await.expect("query"));
        let args = az.runner.args_seen.borrow();
        assert_eq!(&args[0][..2], ["network", "nic"]);
    }

    #[tokio::test]
    async fn nonzero_exit_means_absent() {
        let az = azure(RunnerSpy::returning(not_found()));
        assert!(!az.virtual_machine_exists("demo-vm", "demo-rg").await.expect("query"));
    }

    #[tokio::test]
    async fn describe_parses_the_descriptor() {
        let json = br#"{"name": "demo-vm", "storageProfile": {"imageReference": {"sku": "22_04-lts-gen2"}}}"#;
        let az = azure(RunnerSpy::returning(ok(json)));
        let descriptor = az
            .describe_virtual_machine("demo-vm", "demo-rg")
            .await
            .expect("describe");
        assert_eq!(descriptor.name.as_deref(), Some("demo-vm"));
        assert_eq!(
            descriptor.image_reference().and_then(|i| i.sku.as_deref()),
            Some("22_04-lts-gen2")
        );
    }

    #[tokio::test]
    async fn describe_fails_on_nonzero_exit() {
        let az = azure(RunnerSpy::returning(not_found()));
        let err = az
            .describe_virtual_machine("demo-vm", "demo-rg")
            .await
            .expect_err("describe fails");
        assert!(err.to_string().contains("az vm show failed"), "got: {err}");
    }

    #[tokio::test]
    async fn describe_fails_on_invalid_json() {
        let az = azure(RunnerSpy::returning(ok(b"not json")));
        let err = az
            .describe_virtual_machine("demo-vm", "demo-rg")
            .await
            .expect_err("describe fails");
        assert!(err.to_string().contains("invalid JSON"), "got: {err}");
    }
}
