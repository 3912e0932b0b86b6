//! The synthetic, read-only asset container
//!
//! [`AutopalettePack`] is the in-memory pack that exposes generated
//! textures and their carried-forward metadata to the host. It owns a
//! version-stamped resource table that is replaced wholesale at the end of
//! each reload cycle; readers always observe either the prior complete
//! table or the new one, never an interleaving.
//!
//! The reload contract is two-phase: generation runs synchronously on the
//! calling (main) thread *before* [`AutopalettePack::reload`] returns,
//! because the host's texture assembly queries the container during the
//! barrier's worker phase, while generation itself depends on
//! main-thread-only state (the live pack list). The returned future then
//! performs the worker-phase placeholder, awaits the barrier, and completes
//! on the main execution context.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::Barrier;

use crate::descriptors::DescriptorCollector;
use crate::error::{Error, Result};
use crate::ident::{PACK_NAMESPACE, ResourceId, ResourceKind};
use crate::pack::PackRegistry;
use crate::pipeline::{GenerationPipeline, ResourceTable};

/// The pack format version advertised in the pack-level metadata.
pub const PACK_FORMAT: u32 = 6;

/// Pack-level metadata, unrelated to per-texture metadata entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMetadata {
    /// Human-readable pack description.
    pub description: String,
    /// Pack format version.
    pub pack_format: u32,
}

/// Which pack-level metadata section is being requested.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    /// The pack description section.
    Pack,
    /// The resource filter section (never present in this container).
    Filter,
}

/// The suspended remainder of a reload cycle.
pub type ReloadFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// The two execution contexts a reload cycle schedules onto.
#[derive(Clone)]
pub struct ReloadExecutors {
    /// Off-thread preparation context.
    pub worker: Handle,
    /// The designated main-thread context.
    pub main: Handle,
}

/// The synthetic asset container holding generated textures.
pub struct AutopalettePack {
    info: PackMetadata,
    table: RwLock<Arc<ResourceTable>>,
    version: AtomicU64,
}

impl AutopalettePack {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            info: PackMetadata {
                description: "Automatic palette-swapped textures".to_string(),
                pack_format: PACK_FORMAT,
            },
            table: RwLock::new(Arc::new(ResourceTable::new())),
            version: AtomicU64::new(0),
        }
    }

    /// The container's display name.
    pub fn name(&self) -> &'static str {
        "Autopalette Textures"
    }

    /// The number of reload cycles that have published so far.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// A consistent snapshot of the current resource table.
    pub fn snapshot(&self) -> Arc<ResourceTable> {
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Whether the container currently holds the given resource.
    pub fn has_resource(&self, kind: ResourceKind, id: &ResourceId) -> bool {
        kind == ResourceKind::Client && self.snapshot().contains_key(id)
    }

    /// Read a generated resource's bytes.
    ///
    /// A miss is the normal negative-result path for any id the container
    /// doesn't own, reported as the typed not-found error.
    pub fn get_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<Vec<u8>> {
        if kind != ResourceKind::Client {
            return Err(Error::not_found(kind, id));
        }
        self.snapshot()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(kind, id))
    }

    /// The namespaces this container serves.
    ///
    /// Always the single fixed namespace: the host registers namespaces
    /// before the reload cycle runs, so nothing discovered during
    /// generation could ever be picked up.
    pub fn namespaces(&self, _kind: ResourceKind) -> &'static [&'static str] {
        &[PACK_NAMESPACE]
    }

    /// Listing is deliberately inert; only direct lookup is supported.
    pub fn list_resources(
        &self,
        _kind: ResourceKind,
        _namespace: &str,
        _directory: &str,
    ) -> Vec<ResourceId> {
        Vec::new()
    }

    /// The fixed pack-level metadata, if the requested section exists.
    pub fn metadata_section(&self, kind: MetadataKind) -> Option<&PackMetadata> {
        match kind {
            MetadataKind::Pack => Some(&self.info),
            MetadataKind::Filter => None,
        }
    }

    /// The container has no root resources (no pack icon, for instance).
    pub fn root_resource(&self, name: &str) -> Result<Vec<u8>> {
        Err(Error::RootResourceNotFound(name.to_string()))
    }

    /// Atomically replace the resource table with a freshly generated one.
    pub fn publish(&self, table: ResourceTable) {
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Run one reload cycle.
    ///
    /// Generation runs to completion and publishes before this returns.
    /// The returned future holds the single suspension region of the
    /// cycle: a placeholder task on the worker context, the barrier wait,
    /// and a no-result completion on the main context. Cancellation is not
    /// supported; a started cycle always publishes.
    pub fn reload(
        &self,
        barrier: Arc<Barrier>,
        collector: &dyn DescriptorCollector,
        registry: &PackRegistry,
        executors: &ReloadExecutors,
    ) -> ReloadFuture {
        let mut pipeline = GenerationPipeline::new();
        let table = pipeline.run(collector, registry);
        self.publish(table);

        let worker = executors.worker.clone();
        let main = executors.main.clone();
        Box::pin(async move {
            // worker-phase placeholder, then wait for every reload
            // participant to reach the barrier
            let _ = worker.spawn(async {}).await;
            barrier.wait().await;
            let _ = main.spawn(async {}).await;
        })
    }
}

impl Default for AutopalettePack {
    fn default() -> Self {
        Self::new()
    }
}
