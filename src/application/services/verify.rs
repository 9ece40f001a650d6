//! The verification sequence: provision the stack, assert the deployed
//! topology against expectations, always tear the stack down.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{ProgressReporter, Provisioner, ResourceInspector};
use crate::domain::descriptor::VirtualMachineDescriptor;
use crate::domain::report::{
    CheckFailure, CheckKind, CheckResult, ResourceKind, RunState, TeardownOutcome,
    VerificationReport,
};
use crate::domain::stack::StackOutputs;
use crate::domain::topology::ExpectedImage;

/// Run the full sequence: apply, verify, destroy.
///
/// The stack is the only shared mutable resource; the sequence owns it from
/// apply until destroy and releases it on every control-flow path. Check
/// failures land in the report; inspector transport faults abort remaining
/// checks and are recorded as a run fault. Teardown runs exactly once per
/// successful apply, whatever the verification outcome.
///
/// # Errors
///
/// Returns an error only when provisioning itself fails. After a failed
/// apply a best-effort destroy runs first: a partial apply may have left
/// resources behind.
pub async fn run(
    provisioner: &impl Provisioner,
    inspector: &impl ResourceInspector,
    expected: &ExpectedImage,
    reporter: &impl ProgressReporter,
) -> Result<VerificationReport> {
    let started_at = Utc::now();

    reporter.step("provisioning stack...");
    let stack = match provisioner.apply().await {
        Ok(stack) => stack,
        Err(apply_err) => {
            reporter.warn("provisioning failed, cleaning up partial stack...");
            if let Err(destroy_err) = provisioner.destroy().await {
                reporter.warn(&format!("cleanup failed: {destroy_err:#}"));
            }
            return Err(apply_err);
        }
    };
    reporter.success(&format!(
        "stack provisioned: {} / {}",
        stack.resource_group_name, stack.vm_name
    ));

    reporter.step("verifying topology...");
    let (checks, fault) = match run_checks(inspector, &stack, expected).await {
        Ok(checks) => (checks, None),
        Err(aborted) => (aborted.checks, Some(aborted.message)),
    };
    let state = if fault.is_none() {
        RunState::Verified
    } else {
        RunState::Provisioned
    };

    reporter.step("destroying stack...");
    let (state, teardown) = match provisioner.destroy().await {
        Ok(()) => (RunState::Destroyed, TeardownOutcome::Destroyed),
        Err(e) => (
            state,
            TeardownOutcome::Failed {
                error: format!("{e:#}"),
            },
        ),
    };
    match &teardown {
        TeardownOutcome::Destroyed => reporter.success("stack destroyed"),
        TeardownOutcome::Failed { error } => reporter.warn(&format!("teardown failed: {error}")),
    }

    Ok(VerificationReport {
        stack,
        checks,
        fault,
        state,
        teardown,
        started_at,
        finished_at: Utc::now(),
    })
}

/// Checks aborted before completion. Carries the results gathered so far.
struct ChecksAborted {
    checks: Vec<CheckResult>,
    message: String,
}

async fn run_checks(
    inspector: &impl ResourceInspector,
    stack: &StackOutputs,
    expected: &ExpectedImage,
) -> Result<Vec<CheckResult>, ChecksAborted> {
    let mut checks = Vec::new();
    let rg = stack.resource_group_name.as_str();

    let vm_found = match inspector.virtual_machine_exists(&stack.vm_name, rg).await {
        Ok(found) => found,
        Err(e) => return Err(abort(checks, &e)),
    };
    if !vm_found {
        checks.push(CheckResult::failed(
            CheckKind::VmExists,
            CheckFailure::ResourceMissing {
                kind: ResourceKind::VirtualMachine,
                name: stack.vm_name.clone(),
                resource_group: rg.to_string(),
            },
        ));
        return Ok(checks);
    }
    checks.push(CheckResult::passed(CheckKind::VmExists));

    match inspector.network_interface_exists(&stack.nic_name, rg).await {
        Ok(true) => checks.push(CheckResult::passed(CheckKind::NicExists)),
        Ok(false) => checks.push(CheckResult::failed(
            CheckKind::NicExists,
            CheckFailure::ResourceMissing {
                kind: ResourceKind::NetworkInterface,
                name: stack.nic_name.clone(),
                resource_group: rg.to_string(),
            },
        )),
        Err(e) => return Err(abort(checks, &e)),
    }

    let descriptor = match inspector.describe_virtual_machine(&stack.vm_name, rg).await {
        Ok(descriptor) => descriptor,
        Err(e) => return Err(abort(checks, &e)),
    };

    // Missing interface list is an incomplete provider shape, fatal to the
    // remaining topology checks.
    if descriptor.nic_references().is_none() {
        checks.push(CheckResult::failed(
            CheckKind::NicAttached,
            CheckFailure::MalformedDescriptor {
                vm: stack.vm_name.clone(),
                field: "network interface list",
            },
        ));
        return Ok(checks);
    }
    if descriptor.references_nic(&stack.nic_name) {
        checks.push(CheckResult::passed(CheckKind::NicAttached));
    } else {
        checks.push(CheckResult::failed(
            CheckKind::NicAttached,
            CheckFailure::AttachmentMismatch {
                nic: stack.nic_name.clone(),
                vm: stack.vm_name.clone(),
            },
        ));
    }

    let Some(image) = descriptor.image_reference() else {
        checks.push(CheckResult::failed(
            CheckKind::ImageReference,
            CheckFailure::MalformedDescriptor {
                vm: stack.vm_name.clone(),
                field: "image reference",
            },
        ));
        return Ok(checks);
    };
    checks.push(CheckResult::passed(CheckKind::ImageReference));

    // Each image field is evaluated independently; one mismatch never stops
    // the others from being reported.
    checks.push(check_image_field(
        &descriptor,
        CheckKind::ImagePublisher,
        "publisher",
        &expected.publisher,
        image.publisher.as_deref(),
    ));
    checks.push(check_image_field(
        &descriptor,
        CheckKind::ImageOffer,
        "offer",
        &expected.offer,
        image.offer.as_deref(),
    ));
    checks.push(check_image_field(
        &descriptor,
        CheckKind::ImageSku,
        "sku",
        &expected.sku,
        image.sku.as_deref(),
    ));
    if let Some(expected_version) = &expected.version {
        checks.push(check_image_field(
            &descriptor,
            CheckKind::ImageVersion,
            "version",
            expected_version,
            image.version.as_deref(),
        ));
    }

    Ok(checks)
}

fn check_image_field(
    descriptor: &VirtualMachineDescriptor,
    check: CheckKind,
    field: &'static str,
    expected: &str,
    actual: Option<&str>,
) -> CheckResult {
    let vm = descriptor.name.clone().unwrap_or_default();
    match actual {
        Some(actual) if actual == expected => CheckResult::passed(check),
        Some(actual) => CheckResult::failed(
            check,
            CheckFailure::Mismatch {
                field,
                expected: expected.to_string(),
                actual: actual.to_string(),
            },
        ),
        None => CheckResult::failed(check, CheckFailure::MalformedDescriptor { vm, field }),
    }
}

fn abort(checks: Vec<CheckResult>, error: &anyhow::Error) -> ChecksAborted {
    ChecksAborted {
        checks,
        message: format!("resource inspector unavailable: {error:#}"),
    }
}
