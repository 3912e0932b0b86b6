//! Pack sources, handles, and the selected/unselected registry
//!
//! A [`PackSource`] is a reference to an installed asset pack that may or
//! may not be openable; opening it yields a [`PackHandle`] scoped to one
//! read operation (handles are never held between reload cycles). The
//! [`PackRegistry`] partitions the installed packs into the host's
//! currently-selected set and the remainder, which is what the
//! required-pack policy resolves against.

mod directory;
mod memory;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::ident::{ResourceId, ResourceKind};

pub use directory::DirectoryPack;
pub use memory::MemoryPack;

/// An open, readable view into a pack's contents.
pub trait PackHandle {
    /// The namespaces this pack carries resources under.
    fn namespaces(&self, kind: ResourceKind) -> Vec<String>;

    /// Whether the pack contains the given resource.
    fn has_resource(&self, kind: ResourceKind, id: &ResourceId) -> bool;

    /// Read a resource's raw bytes, or a typed not-found error.
    fn read_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<Vec<u8>>;

    /// List the resources under `directory` within one namespace.
    fn list_resources(&self, kind: ResourceKind, namespace: &str, directory: &str)
    -> Vec<ResourceId>;
}

/// A reference to an installed pack, looked up by id.
pub trait PackSource: Send + Sync {
    /// The pack's id, unique within the registry.
    fn id(&self) -> &str;

    /// Open a readable handle, or `None` if the pack cannot be opened.
    fn open(&self) -> Option<Box<dyn PackHandle + '_>>;
}

/// The live pack list, split into selected packs and the installed-but-
/// unselected remainder.
///
/// Iteration order follows the order packs were supplied in, which the host
/// treats as pack priority.
pub struct PackRegistry {
    selected: IndexMap<String, Arc<dyn PackSource>>,
    unselected: IndexMap<String, Arc<dyn PackSource>>,
}

impl PackRegistry {
    /// Build a registry from the selected packs and the full available set.
    ///
    /// Any available pack whose id is also selected is dropped from the
    /// unselected side, so the two maps never overlap.
    pub fn new(selected: Vec<Arc<dyn PackSource>>, available: Vec<Arc<dyn PackSource>>) -> Self {
        let selected: IndexMap<String, Arc<dyn PackSource>> = selected
            .into_iter()
            .map(|pack| (pack.id().to_string(), pack))
            .collect();
        let unselected = available
            .into_iter()
            .filter(|pack| !selected.contains_key(pack.id()))
            .map(|pack| (pack.id().to_string(), pack))
            .collect();
        Self {
            selected,
            unselected,
        }
    }

    /// The currently-selected packs, in priority order.
    pub fn selected(&self) -> &IndexMap<String, Arc<dyn PackSource>> {
        &self.selected
    }

    /// Installed packs that are not currently selected.
    pub fn unselected(&self) -> &IndexMap<String, Arc<dyn PackSource>> {
        &self.unselected
    }

    /// Whether a pack id exists anywhere, selected or not.
    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains_key(id) || self.unselected.contains_key(id)
    }

    /// All selected pack ids, for diagnostics.
    pub fn selected_ids(&self) -> Vec<&str> {
        self.selected.keys().map(String::as_str).collect()
    }

    /// All unselected pack ids, for diagnostics.
    pub fn unselected_ids(&self) -> Vec<&str> {
        self.unselected.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(id: &str) -> Arc<dyn PackSource> {
        Arc::new(MemoryPack::new(id))
    }

    #[test]
    fn test_registry_partitions_available_packs() {
        let registry = PackRegistry::new(
            vec![pack("vanilla"), pack("extras")],
            vec![pack("vanilla"), pack("extras"), pack("nightvision")],
        );
        assert_eq!(registry.selected_ids(), vec!["vanilla", "extras"]);
        assert_eq!(registry.unselected_ids(), vec!["nightvision"]);
        assert!(registry.contains("nightvision"));
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_selected_packs_never_appear_unselected() {
        let registry = PackRegistry::new(vec![pack("vanilla")], vec![pack("vanilla")]);
        assert!(registry.unselected().is_empty());
    }
}
