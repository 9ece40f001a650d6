//! Stack outputs — the names Terraform reports for the provisioned resources.

use serde::Serialize;

use crate::domain::error::ProvisionError;

/// Output key for the virtual machine name.
pub const OUTPUT_VM_NAME: &str = "vm_name";
/// Output key for the resource group name.
pub const OUTPUT_RESOURCE_GROUP: &str = "resource_group_name";
/// Output key for the network interface name.
pub const OUTPUT_NIC_NAME: &str = "nic_name";

/// Resource names read back from a successful apply. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackOutputs {
    pub vm_name: String,
    pub resource_group_name: String,
    pub nic_name: String,
}

impl StackOutputs {
    /// Parse `terraform output -json`, which wraps every output in a
    /// `{"sensitive":..,"type":..,"value":..}` object.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::MalformedOutputs` when the payload is not a
    /// JSON object, or `ProvisionError::MissingOutput` when an expected
    /// output key is absent or its value is not a string.
    pub fn from_output_json(json: &str) -> Result<Self, ProvisionError> {
        let outputs: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ProvisionError::MalformedOutputs(e.to_string()))?;
        if !outputs.is_object() {
            return Err(ProvisionError::MalformedOutputs(
                "expected a JSON object of outputs".to_string(),
            ));
        }
        Ok(Self {
            vm_name: string_output(&outputs, OUTPUT_VM_NAME)?,
            resource_group_name: string_output(&outputs, OUTPUT_RESOURCE_GROUP)?,
            nic_name: string_output(&outputs, OUTPUT_NIC_NAME)?,
        })
    }
}

fn string_output(outputs: &serde_json::Value, key: &str) -> Result<String, ProvisionError> {
    outputs
        .get(key)
        .and_then(|entry| entry.get("value"))
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ProvisionError::MissingOutput(key.to_string()))
}
