//! Infrastructure layer — concrete adapters behind the application ports.
//!
//! Implementations here spawn real processes; nothing above this layer does.

pub mod azure;
pub mod command_runner;
pub mod terraform;

#[allow(unused_imports)]
pub use azure::AzureCli;
#[allow(unused_imports)]
pub use command_runner::{
    DEFAULT_LIFECYCLE_TIMEOUT, DEFAULT_QUERY_TIMEOUT, TokioCommandRunner,
};
#[allow(unused_imports)]
pub use terraform::TerraformCli;
