//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod report;
pub mod stack;
pub mod topology;

#[allow(unused_imports)]
pub use config::{
    CliOverrides, FileConfig, StackConfig, VerifyConfig, validate_label_prefix,
};
#[allow(unused_imports)]
pub use descriptor::{ImageReference, VirtualMachineDescriptor};
#[allow(unused_imports)]
pub use error::{ConfigError, ProvisionError};
#[allow(unused_imports)]
pub use report::{
    CheckFailure, CheckKind, CheckResult, ResourceKind, RunState, TeardownOutcome,
    VerificationReport,
};
#[allow(unused_imports)]
pub use stack::StackOutputs;
#[allow(unused_imports)]
pub use topology::ExpectedImage;
