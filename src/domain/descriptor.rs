//! Provider-reported virtual machine snapshot, as returned by `az vm show`.
//!
//! Every nested field is optional: the control plane omits sections it has
//! no data for, and an incomplete shape must surface as a check failure,
//! never a deserialization panic.

use serde::Deserialize;

/// Snapshot of a deployed virtual machine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachineDescriptor {
    pub name: Option<String>,
    pub network_profile: Option<NetworkProfile>,
    pub storage_profile: Option<StorageProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkProfile {
    pub network_interfaces: Option<Vec<NicReference>>,
}

/// Reference to an attached network interface. The `id` is a full resource
/// path, e.g. `/subscriptions/<s>/resourceGroups/<g>/providers/Microsoft.Network/networkInterfaces/<name>`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NicReference {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageProfile {
    pub image_reference: Option<ImageReference>,
}

/// Base image identity of the VM's OS disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageReference {
    pub publisher: Option<String>,
    pub offer: Option<String>,
    pub sku: Option<String>,
    pub version: Option<String>,
}

impl VirtualMachineDescriptor {
    /// The attached NIC references, or `None` when the provider omitted the
    /// network profile or its interface list.
    #[must_use]
    pub fn nic_references(&self) -> Option<&[NicReference]> {
        self.network_profile
            .as_ref()?
            .network_interfaces
            .as_deref()
    }

    /// Whether any attached NIC reference contains `nic_name`. The provider
    /// encodes the interface name as the suffix of a full resource path, so
    /// this is substring containment, not equality.
    #[must_use]
    pub fn references_nic(&self, nic_name: &str) -> bool {
        self.nic_references().is_some_and(|refs| {
            refs.iter()
                .any(|r| r.id.as_deref().is_some_and(|id| id.contains(nic_name)))
        })
    }

    /// The base image reference, or `None` when the provider omitted the
    /// storage profile or its image section.
    #[must_use]
    pub fn image_reference(&self) -> Option<&ImageReference> {
        self.storage_profile.as_ref()?.image_reference.as_ref()
    }
}
