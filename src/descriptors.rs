//! Descriptor discovery across loaded packs
//!
//! Overrides are declared as JSON files under the
//! [`OVERRIDE_DIRECTORY`](crate::ident::OVERRIDE_DIRECTORY) of any loaded
//! pack. The collector walks the selected packs in priority order and
//! returns the raw JSON per descriptor id, pre-merged so that later packs
//! override earlier ones.

use indexmap::IndexMap;
use serde_json::Value;

use crate::ident::{OVERRIDE_DIRECTORY, ResourceId, ResourceKind};
use crate::pack::PackRegistry;

/// Supplies the raw descriptor resources for one reload cycle.
pub trait DescriptorCollector {
    /// Every descriptor found this cycle, keyed by its directory-stripped,
    /// extension-stripped identifier.
    fn collect(&self) -> IndexMap<ResourceId, Value>;
}

/// Collects descriptors from the selected packs of a [`PackRegistry`].
pub struct PackDescriptorCollector<'a> {
    registry: &'a PackRegistry,
}

impl<'a> PackDescriptorCollector<'a> {
    /// Create a collector over the registry's selected packs.
    pub fn new(registry: &'a PackRegistry) -> Self {
        Self { registry }
    }
}

impl DescriptorCollector for PackDescriptorCollector<'_> {
    fn collect(&self) -> IndexMap<ResourceId, Value> {
        let mut descriptors = IndexMap::new();
        for pack in self.registry.selected().values() {
            let Some(handle) = pack.open() else {
                tracing::warn!(pack = pack.id(), "skipping unopenable pack during descriptor collection");
                continue;
            };
            for namespace in handle.namespaces(ResourceKind::Client) {
                for file_id in
                    handle.list_resources(ResourceKind::Client, &namespace, OVERRIDE_DIRECTORY)
                {
                    let Some(descriptor_id) = descriptor_id(&file_id) else {
                        continue;
                    };
                    let bytes = match handle.read_resource(ResourceKind::Client, &file_id) {
                        Ok(bytes) => bytes,
                        Err(error) => {
                            tracing::error!(
                                pack = pack.id(),
                                descriptor = %file_id,
                                %error,
                                "failed to read descriptor"
                            );
                            continue;
                        }
                    };
                    match serde_json::from_slice::<Value>(&bytes) {
                        Ok(json) => {
                            // later packs override earlier ones
                            descriptors.insert(descriptor_id, json);
                        }
                        Err(error) => {
                            tracing::error!(
                                pack = pack.id(),
                                descriptor = %file_id,
                                %error,
                                "descriptor is not valid JSON"
                            );
                        }
                    }
                }
            }
        }
        descriptors
    }
}

/// Strip the override directory prefix and `.json` extension from a file
/// id, yielding the descriptor id generation publishes under.
fn descriptor_id(file_id: &ResourceId) -> Option<ResourceId> {
    let path = file_id
        .path()
        .strip_prefix(OVERRIDE_DIRECTORY)?
        .strip_prefix('/')?
        .strip_suffix(".json")?;
    ResourceId::new(file_id.namespace(), path).ok()
}
