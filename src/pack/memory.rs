//! In-memory pack source, for tests and hosts that synthesize packs

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ident::{ResourceId, ResourceKind};

use super::{PackHandle, PackSource};

/// A pack whose contents live entirely in memory.
#[derive(Clone)]
pub struct MemoryPack {
    id: String,
    resources: Arc<HashMap<(ResourceKind, ResourceId), Vec<u8>>>,
    openable: bool,
}

impl MemoryPack {
    /// Create an empty pack with the given id.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            resources: Arc::new(HashMap::new()),
            openable: true,
        }
    }

    /// Add a resource, returning the pack for chaining.
    pub fn with_resource(mut self, kind: ResourceKind, id: ResourceId, bytes: Vec<u8>) -> Self {
        Arc::make_mut(&mut self.resources).insert((kind, id), bytes);
        self
    }

    /// Mark the pack as refusing to open, for failure-path testing.
    pub fn unopenable(mut self) -> Self {
        self.openable = false;
        self
    }
}

impl PackSource for MemoryPack {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> Option<Box<dyn PackHandle + '_>> {
        self.openable.then(|| {
            Box::new(MemoryHandle {
                resources: Arc::clone(&self.resources),
            }) as Box<dyn PackHandle>
        })
    }
}

struct MemoryHandle {
    resources: Arc<HashMap<(ResourceKind, ResourceId), Vec<u8>>>,
}

impl PackHandle for MemoryHandle {
    fn namespaces(&self, kind: ResourceKind) -> Vec<String> {
        let mut namespaces: Vec<String> = self
            .resources
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| id.namespace().to_string())
            .collect();
        namespaces.sort_unstable();
        namespaces.dedup();
        namespaces
    }

    fn has_resource(&self, kind: ResourceKind, id: &ResourceId) -> bool {
        self.resources.contains_key(&(kind, id.clone()))
    }

    fn read_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<Vec<u8>> {
        self.resources
            .get(&(kind, id.clone()))
            .cloned()
            .ok_or_else(|| Error::not_found(kind, id))
    }

    fn list_resources(
        &self,
        kind: ResourceKind,
        namespace: &str,
        directory: &str,
    ) -> Vec<ResourceId> {
        let prefix = format!("{directory}/");
        let mut ids: Vec<ResourceId> = self
            .resources
            .keys()
            .filter(|(k, id)| {
                *k == kind && id.namespace() == namespace && id.path().starts_with(&prefix)
            })
            .map(|(_, id)| id.clone())
            .collect();
        ids.sort_unstable();
        ids
    }
}
