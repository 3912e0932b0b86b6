//! # autopalette
//!
//! Generates palette-swapped textures from other asset packs at reload
//! time and serves them through a synthetic, read-only resource pack.
//!
//! A palette override is a small JSON descriptor naming a parent texture,
//! the pack to source it from, and an exact-match color substitution
//! table. Once per reload cycle the pipeline parses every descriptor,
//! resolves each override's source pack (honoring the required-pack
//! policy), remaps the parent texture's pixels, carries companion metadata
//! forward, and publishes everything under derived identities.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use autopalette::prelude::*;
//!
//! // the host's pack list, split into selected and available
//! let vanilla: Arc<dyn PackSource> = Arc::new(DirectoryPack::new("vanilla", "packs/vanilla"));
//! let registry = PackRegistry::new(vec![Arc::clone(&vanilla)], vec![vanilla]);
//!
//! // generate and publish outside of a host reload cycle
//! let container = AutopalettePack::new();
//! let collector = PackDescriptorCollector::new(&registry);
//! let mut pipeline = GenerationPipeline::new();
//! container.publish(pipeline.run(&collector, &registry));
//!
//! let texture: ResourceId = "autopalette:textures/block/ruby.png".parse()?;
//! let bytes = container.get_resource(ResourceKind::Client, &texture)?;
//! # Ok::<(), autopalette::Error>(())
//! ```
//!
//! ## Descriptor format
//!
//! One JSON file per generated texture, under `autotextures/` in any
//! loaded pack:
//!
//! ```json
//! {
//!     "pack": "vanilla",
//!     "require_pack": false,
//!     "parent": "block/stone",
//!     "palette": { "7F7F7F": "FF0000FF" }
//! }
//! ```

pub mod color;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod ident;
pub mod pack;
pub mod palette;
pub mod pipeline;
pub mod transform;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::color::{decode_hex, encode_hex, flip_rgba};
    pub use crate::container::{
        AutopalettePack, MetadataKind, PackMetadata, ReloadExecutors, ReloadFuture,
    };
    pub use crate::descriptors::{DescriptorCollector, PackDescriptorCollector};
    pub use crate::error::{Error, Result};
    pub use crate::ident::{PACK_NAMESPACE, ResourceId, ResourceKind};
    pub use crate::pack::{DirectoryPack, MemoryPack, PackHandle, PackRegistry, PackSource};
    pub use crate::palette::{PaletteOverride, PaletteMap, ParsedOverride};
    pub use crate::pipeline::{GenerationPipeline, ReloadState, ResourceTable};
    pub use crate::transform::apply_palette;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
