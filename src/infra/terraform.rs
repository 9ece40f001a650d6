//! Infrastructure implementation of the `Provisioner` port.
//!
//! `TerraformCli<R>` routes all terraform CLI calls through a `CommandRunner`.
//! Generic over the runner so tests can inject a spy without spawning
//! real processes.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ExecSpec, Provisioner};
use crate::domain::config::{StackConfig, VAR_LABEL_PREFIX};
use crate::domain::error::ProvisionError;
use crate::domain::stack::StackOutputs;
use crate::infra::command_runner::{
    DEFAULT_LIFECYCLE_TIMEOUT, DEFAULT_QUERY_TIMEOUT, TokioCommandRunner,
};

const TERRAFORM_MIN_VERSION: semver::Version = semver::Version::new(1, 0, 0);

/// Adapter driving the `terraform` CLI against one root module directory.
pub struct TerraformCli<R: CommandRunner> {
    lifecycle_runner: R,
    query_runner: R,
    working_dir: PathBuf,
    vars: Vec<(String, String)>,
    env: Vec<(String, String)>,
}

impl<R: CommandRunner> TerraformCli<R> {
    /// Create an adapter with explicit runner instances.
    pub fn new(
        lifecycle_runner: R,
        query_runner: R,
        working_dir: PathBuf,
        vars: Vec<(String, String)>,
        env: Vec<(String, String)>,
    ) -> Self {
        Self {
            lifecycle_runner,
            query_runner,
            working_dir,
            vars,
            env,
        }
    }

    /// Check that the terraform binary is runnable and recent enough.
    /// Called before `apply` so a missing binary never triggers a
    /// pointless destroy.
    ///
    /// # Errors
    ///
    /// Returns an error when the binary cannot run, reports unparseable
    /// version JSON, or is older than the minimum supported release.
    pub async fn check_prerequisites(&self) -> Result<()> {
        let output = self
            .query_runner
            .run(&self.spec(&["version", "-json"]))
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "terraform not available. Install it from https://developer.hashicorp.com/terraform/install or add its directory to extra_path."
                )
            })?;
        let version: serde_json::Value =
            serde_json::from_slice(&output.stdout).context("parsing terraform version")?;
        let ver_str = version
            .get("terraform_version")
            .and_then(|v| v.as_str())
            .context("terraform version output has no terraform_version")?;
        let ver = semver::Version::parse(ver_str).context("parsing terraform version number")?;
        if ver < TERRAFORM_MIN_VERSION {
            return Err(ProvisionError::UnsupportedVersion {
                required: TERRAFORM_MIN_VERSION.to_string(),
                found: ver.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn spec<'a>(&'a self, args: &'a [&'a str]) -> ExecSpec<'a> {
        ExecSpec {
            program: "terraform",
            args,
            cwd: Some(&self.working_dir),
            env: &self.env,
        }
    }

    /// `-var key=value` pairs for every configured variable.
    fn var_args(&self) -> Vec<String> {
        self.vars
            .iter()
            .flat_map(|(key, value)| ["-var".to_string(), format!("{key}={value}")])
            .collect()
    }
}

impl TerraformCli<TokioCommandRunner> {
    /// Production constructor from resolved configuration.
    #[must_use]
    pub fn from_config(config: &StackConfig) -> Self {
        Self::new(
            TokioCommandRunner::new(DEFAULT_LIFECYCLE_TIMEOUT),
            TokioCommandRunner::new(DEFAULT_QUERY_TIMEOUT),
            config.stack_dir.clone(),
            vec![(VAR_LABEL_PREFIX.to_string(), config.label_prefix.clone())],
            config.env_overrides.clone(),
        )
    }
}

impl<R: CommandRunner> Provisioner for TerraformCli<R> {
    async fn apply(&self) -> Result<StackOutputs> {
        let output = self
            .lifecycle_runner
            .run(&self.spec(&["init", "-input=false", "-no-color"]))
            .await
            .context("terraform init")?;
        fail_on_status("init", &output)?;

        let var_args = self.var_args();
        let mut args = vec!["apply", "-auto-approve", "-input=false", "-no-color"];
        args.extend(var_args.iter().map(String::as_str));
        let output = self
            .lifecycle_runner
            .run(&self.spec(&args))
            .await
            .context("terraform apply")?;
        fail_on_status("apply", &output)?;

        let output = self
            .query_runner
            .run(&self.spec(&["output", "-json"]))
            .await
            .context("terraform output")?;
        fail_on_status("output", &output)?;
        let json = String::from_utf8_lossy(&output.stdout);
        Ok(StackOutputs::from_output_json(&json)?)
    }

    async fn destroy(&self) -> Result<()> {
        let var_args = self.var_args();
        let mut args = vec!["destroy", "-auto-approve", "-input=false", "-no-color"];
        args.extend(var_args.iter().map(String::as_str));
        let output = self
            .lifecycle_runner
            .run(&self.spec(&args))
            .await
            .context("terraform destroy")?;
        fail_on_status("destroy", &output)?;
        Ok(())
    }
}

fn fail_on_status(phase: &'static str, output: &std::process::Output) -> Result<()> {
    if !output.status.success() {
        return Err(ProvisionError::CommandFailed {
            phase,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;
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

    fn ok(stdout: &[u8]) -> Output {
        Output {
            status: exit_status(0),
            stdout: stdout.to_vec(),
            stderr: Vec::new(),
        }
    }

    fn fail(stderr: &[u8]) -> Output {
        Output {
            status: exit_status(1),
            stdout: Vec::new(),
            stderr: stderr.to_vec(),
        }
    }

    /// Records every invocation and replays canned outputs in order.
    struct RunnerSpy {
        calls: RefCell<Vec<RecordedCall>>,
        outputs: RefCell<Vec<Output>>,
    }

    struct RecordedCall {
        args: Vec<String>,
        cwd: Option<PathBuf>,
        env: Vec<(String, String)>,
    }

    impl RunnerSpy {
        fn replaying(outputs: Vec<Output>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                outputs: RefCell::new(outputs),
            }
        }
    }

    impl CommandRunner for RunnerSpy {
        async fn run(&self, spec: &ExecSpec<'_>) -> Result<Output> {
            assert_eq!(spec.program, "terraform");
            self.calls.borrow_mut().push(RecordedCall {
                args: spec.args.iter().map(ToString::to_string).collect(),
                cwd: spec.cwd.map(Path::to_path_buf),
                env: spec.env.to_vec(),
            });
            let mut outputs = self.outputs.borrow_mut();
            if outputs.is_empty() {
                anyhow::bail!("no more canned outputs")
            }
            Ok(outputs.remove(0))
        }
        async fn run_with_timeout(
            &self,
            spec: &ExecSpec<'_>,
            _: std::time::Duration,
        ) -> Result<Output> {
            self.run(spec).await
        }
    }

    /// Single spy shared by lifecycle and query roles so call order is
    /// observable across both.
    struct SharedSpy<'a>(&'a RunnerSpy);
    impl CommandRunner for SharedSpy<'_> {
        async fn run(&self, spec: &ExecSpec<'_>) -> Result<Output> {
            self.0.run(spec).await
        }
        async fn run_with_timeout(
            &self,
            spec: &ExecSpec<'_>,
            timeout: std::time::Duration,
        ) -> Result<Output> {
            self.0.run_with_timeout(spec, timeout).await
        }
    }

    const OUTPUT_JSON: &[u8] = br#"{
        "vm_name": {"value": "demo-vm"},
        "resource_group_name": {"value": "demo-rg"},
        "nic_name": {"value": "demo-nic"}
    }"#;

    fn terraform<'a>(spy: &'a RunnerSpy) -> TerraformCli<SharedSpy<'a>> {
        TerraformCli::new(
            SharedSpy(spy),
            SharedSpy(spy),
            PathBuf::from("infra/stack"),
            vec![(VAR_LABEL_PREFIX.to_string(), "yao00043".to_string())],
            vec![("PATH".to_string(), "/opt/tf/bin:/usr/bin".to_string())],
        )
    }

    #[tokio::test]
    async fn apply_runs_init_apply_output_in_order() {
        let spy = RunnerSpy::replaying(vec![ok(b""), ok(b""), ok(OUTPUT_JSON)]);
        let outputs = terraform(&spy).apply().await.expect("apply");
        assert_eq!(outputs.vm_name, "demo-vm");

        let calls = spy.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].args[0], "init");
        assert_eq!(calls[1].args[0], "apply");
        assert_eq!(calls[2].args, vec!["output", "-json"]);
    }

    #[tokio::test]
    async fn apply_passes_vars_cwd_and_env() {
        let spy = RunnerSpy::replaying(vec![ok(b""), ok(b""), ok(OUTPUT_JSON)]);
        terraform(&spy).apply().await.expect("apply");

        let calls = spy.calls.borrow();
        let apply = &calls[1];
        assert!(apply.args.contains(&"-auto-approve".to_string()));
        let var_pos = apply.args.iter().position(|a| a == "-var").expect("-var");
        assert_eq!(apply.args[var_pos + 1], "labelPrefix=yao00043");
        assert_eq!(apply.cwd.as_deref(), Some(Path::new("infra/stack")));
        assert_eq!(apply.env[0].0, "PATH");
    }

    #[tokio::test]
    async fn failed_apply_surfaces_stderr() {
        let spy = RunnerSpy::replaying(vec![ok(b""), fail(b"quota exceeded")]);
        let err = terraform(&spy).apply().await.expect_err("apply fails");
        let msg = format!("{err:#}");
        assert!(msg.contains("apply"), "got: {msg}");
        assert!(msg.contains("quota exceeded"), "got: {msg}");
    }

    #[tokio::test]
    async fn destroy_passes_vars() {
        let spy = RunnerSpy::replaying(vec![ok(b"")]);
        terraform(&spy).destroy().await.expect("destroy");

        let calls = spy.calls.borrow();
        assert_eq!(calls[0].args[0], "destroy");
        assert!(calls[0].args.contains(&"labelPrefix=yao00043".to_string()));
    }

    #[tokio::test]
    async fn prerequisites_accept_supported_version() {
        let spy = RunnerSpy::replaying(vec![ok(br#"{"terraform_version": "1.9.5"}"#)]);
        terraform(&spy).check_prerequisites().await.expect("recent enough");
    }

    #[tokio::test]
    async fn prerequisites_reject_old_version() {
        let spy = RunnerSpy::replaying(vec![ok(br#"{"terraform_version": "0.12.31"}"#)]);
        let err = terraform(&spy)
            .check_prerequisites()
            .await
            .expect_err("too old");
        assert!(err.to_string().contains("too old"), "got: {err}");
    }
}
