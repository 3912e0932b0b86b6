//! The texture generation pipeline, run once per reload cycle
//!
//! Collect raw descriptors, parse and validate them, resolve each
//! override's source pack, load and decode the parent texture, apply the
//! palette, and carry companion metadata forward. Every per-override
//! failure is absorbed: it is logged with enough context to trace and the
//! override simply contributes no entry this cycle. The pipeline always
//! completes and returns a full (possibly empty) table.

use std::io::Cursor;

use image::ImageFormat;
use indexmap::IndexMap;
use serde_json::Value;

use crate::descriptors::DescriptorCollector;
use crate::ident::{ResourceId, ResourceKind};
use crate::pack::{PackHandle, PackRegistry};
use crate::palette::PaletteOverride;
use crate::transform::apply_palette;

/// The states a reload cycle moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    /// No cycle running.
    Idle,
    /// Gathering raw descriptor resources.
    Collecting,
    /// Parsing and validating descriptors.
    Resolving,
    /// Resolving packs, reading textures, transforming.
    Generating,
    /// The new table has been handed off.
    Published,
}

/// The complete set of derived resources produced by one cycle, keyed by
/// derived identifier. Replaced wholesale each reload, never mutated after
/// publication.
pub type ResourceTable = IndexMap<ResourceId, Vec<u8>>;

/// One reload cycle's worth of generation work.
pub struct GenerationPipeline {
    state: ReloadState,
}

impl GenerationPipeline {
    /// A fresh pipeline in the idle state.
    pub fn new() -> Self {
        Self {
            state: ReloadState::Idle,
        }
    }

    /// The pipeline's current state.
    pub fn state(&self) -> ReloadState {
        self.state
    }

    /// Run the full cycle and return the new resource table.
    ///
    /// Overrides are independent of each other; if two descriptors derive
    /// to the same identifier the last one processed wins silently.
    pub fn run(
        &mut self,
        collector: &dyn DescriptorCollector,
        registry: &PackRegistry,
    ) -> ResourceTable {
        tracing::info!("starting autopalette texture generation");

        self.state = ReloadState::Collecting;
        let raw = collector.collect();

        self.state = ReloadState::Resolving;
        let overrides = parse_descriptors(raw);

        self.state = ReloadState::Generating;
        let mut table = ResourceTable::new();
        for (id, override_) in &overrides {
            let Some((texture, metadata)) = generate_image(id, override_, registry) else {
                continue;
            };
            let texture_id = id.texture_id();
            if let Some(metadata) = metadata {
                table.insert(texture_id.metadata_id(), metadata);
            }
            table.insert(texture_id, texture);
        }

        self.state = ReloadState::Published;
        tracing::info!(
            entries = table.len(),
            overrides = overrides.len(),
            "concluded autopalette texture generation"
        );
        table
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse every collected descriptor, skipping (and logging) the broken
/// ones. Partial palette failures keep their valid entries.
fn parse_descriptors(raw: IndexMap<ResourceId, Value>) -> Vec<(ResourceId, PaletteOverride)> {
    let mut overrides = Vec::with_capacity(raw.len());
    for (id, json) in raw {
        match PaletteOverride::parse(&json) {
            Ok(parsed) => {
                if !parsed.palette_errors.is_empty() {
                    tracing::error!(
                        descriptor = %id,
                        errors = ?parsed.palette_errors,
                        "palette parsed with errors; keeping valid entries"
                    );
                }
                overrides.push((id, parsed.value));
            }
            Err(error) => {
                tracing::error!(descriptor = %id, %error, "skipping unparseable descriptor");
            }
        }
    }
    overrides
}

/// Generate one override's derived texture and optional companion
/// metadata, or `None` if this override contributes nothing this cycle.
fn generate_image(
    id: &ResourceId,
    override_: &PaletteOverride,
    registry: &PackRegistry,
) -> Option<(Vec<u8>, Option<Vec<u8>>)> {
    let parent = override_.parent();
    let pack_id = override_.pack();

    let Some(source) = override_.resolve_pack(registry) else {
        if registry.contains(pack_id) {
            // installed, but excluded by the require_pack policy
            tracing::debug!(
                descriptor = %id,
                pack = pack_id,
                "source pack is not selected and the override requires it"
            );
        } else {
            tracing::error!(
                descriptor = %id,
                parent = %parent,
                pack = pack_id,
                "cannot override texture: pack does not exist"
            );
            tracing::error!(selected = ?registry.selected_ids(), "available selected packs");
            tracing::error!(unselected = ?registry.unselected_ids(), "available unselected packs");
        }
        return None;
    };

    let Some(handle) = source.open() else {
        tracing::error!(
            descriptor = %id,
            parent = %parent,
            pack = pack_id,
            "cannot override texture: pack cannot be opened"
        );
        return None;
    };

    let parent_file = parent.texture_id();
    let bytes = match handle.read_resource(ResourceKind::Client, &parent_file) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!(
                descriptor = %id,
                parent = %parent,
                pack = pack_id,
                %error,
                "cannot override texture: error getting texture"
            );
            return None;
        }
    };

    let mut image = match image::load_from_memory_with_format(&bytes, ImageFormat::Png) {
        Ok(decoded) => decoded.into_rgba8(),
        Err(error) => {
            tracing::error!(
                descriptor = %id,
                parent = %parent,
                pack = pack_id,
                %error,
                "cannot override texture: error decoding texture"
            );
            return None;
        }
    };

    apply_palette(&mut image, override_.palette());

    let mut encoded = Cursor::new(Vec::new());
    if let Err(error) = image.write_to(&mut encoded, ImageFormat::Png) {
        tracing::error!(
            descriptor = %id,
            parent = %parent,
            pack = pack_id,
            %error,
            "cannot override texture: error encoding generated texture"
        );
        return None;
    }

    // metadata is read eagerly, while the pack handle is still open;
    // absence is not an error
    let metadata = read_metadata(handle.as_ref(), &parent_file);

    Some((encoded.into_inner(), metadata))
}

fn read_metadata(handle: &dyn PackHandle, parent_file: &ResourceId) -> Option<Vec<u8>> {
    let metadata_id = parent_file.metadata_id();
    if !handle.has_resource(ResourceKind::Client, &metadata_id) {
        return None;
    }
    match handle.read_resource(ResourceKind::Client, &metadata_id) {
        Ok(bytes) => Some(bytes),
        Err(error) => {
            tracing::warn!(metadata = %metadata_id, %error, "failed to read companion metadata");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{MemoryPack, PackSource};
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct FixedCollector(IndexMap<ResourceId, Value>);

    impl DescriptorCollector for FixedCollector {
        fn collect(&self) -> IndexMap<ResourceId, Value> {
            self.0.clone()
        }
    }

    fn id(s: &str) -> ResourceId {
        s.parse().unwrap()
    }

    fn png(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, pixel);
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn decode(bytes: &[u8]) -> RgbaImage {
        image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .unwrap()
            .into_rgba8()
    }

    fn stone_pack(pack_id: &str) -> MemoryPack {
        MemoryPack::new(pack_id).with_resource(
            ResourceKind::Client,
            id("autopalette:textures/block/stone.png"),
            png(16, 16, Rgba([0x7F, 0x7F, 0x7F, 0xFF])),
        )
    }

    fn descriptor(pack: Option<&str>, require: bool) -> Value {
        let mut json = serde_json::json!({
            "require_pack": require,
            "parent": "block/stone",
            "palette": { "7F7F7F": "FF0000FF" }
        });
        if let Some(pack) = pack {
            json["pack"] = pack.into();
        }
        json
    }

    fn run(
        descriptors: IndexMap<ResourceId, Value>,
        selected: Vec<Arc<dyn PackSource>>,
        available: Vec<Arc<dyn PackSource>>,
    ) -> ResourceTable {
        let registry = PackRegistry::new(selected, available);
        GenerationPipeline::new().run(&FixedCollector(descriptors), &registry)
    }

    #[test]
    fn test_gray_stone_becomes_red() {
        let mut descriptors = IndexMap::new();
        descriptors.insert(id("autopalette:block/ruby"), descriptor(None, false));
        let table = run(
            descriptors,
            vec![Arc::new(stone_pack("vanilla"))],
            Vec::new(),
        );

        let texture = &table[&id("autopalette:textures/block/ruby.png")];
        let generated = decode(texture);
        assert_eq!(generated.dimensions(), (16, 16));
        assert!(
            generated
                .pixels()
                .all(|p| *p == Rgba([0xFF, 0x00, 0x00, 0xFF]))
        );
    }

    #[test]
    fn test_metadata_carried_forward_verbatim() {
        let meta = br#"{"animation":{"frametime":2}}"#.to_vec();
        let pack = stone_pack("vanilla").with_resource(
            ResourceKind::Client,
            id("autopalette:textures/block/stone.png.mcmeta"),
            meta.clone(),
        );
        let mut descriptors = IndexMap::new();
        descriptors.insert(id("autopalette:block/ruby"), descriptor(None, false));
        let table = run(descriptors, vec![Arc::new(pack)], Vec::new());

        assert_eq!(
            table[&id("autopalette:textures/block/ruby.png.mcmeta")],
            meta
        );
    }

    #[test]
    fn test_absent_metadata_produces_no_entry() {
        let mut descriptors = IndexMap::new();
        descriptors.insert(id("autopalette:block/ruby"), descriptor(None, false));
        let table = run(
            descriptors,
            vec![Arc::new(stone_pack("vanilla"))],
            Vec::new(),
        );
        assert_eq!(table.len(), 1);
        assert!(!table.contains_key(&id("autopalette:textures/block/ruby.png.mcmeta")));
    }

    #[test]
    fn test_required_pack_policy_skips_unselected_source() {
        let mut descriptors = IndexMap::new();
        descriptors.insert(
            id("autopalette:block/ruby"),
            descriptor(Some("nightvision"), true),
        );
        let table = run(
            descriptors,
            Vec::new(),
            vec![Arc::new(stone_pack("nightvision"))],
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_unselected_pack_is_valid_fallback_when_not_required() {
        let mut descriptors = IndexMap::new();
        descriptors.insert(
            id("autopalette:block/ruby"),
            descriptor(Some("nightvision"), false),
        );
        let table = run(
            descriptors,
            Vec::new(),
            vec![Arc::new(stone_pack("nightvision"))],
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_one_broken_override_never_voids_the_others() {
        let mut descriptors = IndexMap::new();
        descriptors.insert(id("autopalette:block/broken"), serde_json::json!({}));
        descriptors.insert(
            id("autopalette:block/missing"),
            descriptor(Some("ghost"), false),
        );
        descriptors.insert(id("autopalette:block/ruby"), descriptor(None, false));

        let table = run(
            descriptors,
            vec![Arc::new(stone_pack("vanilla"))],
            Vec::new(),
        );
        assert_eq!(table.len(), 1);
        assert!(table.contains_key(&id("autopalette:textures/block/ruby.png")));
    }

    #[test]
    fn test_unopenable_pack_skips_override() {
        let mut descriptors = IndexMap::new();
        descriptors.insert(id("autopalette:block/ruby"), descriptor(None, false));
        let table = run(
            descriptors,
            vec![Arc::new(stone_pack("vanilla").unopenable())],
            Vec::new(),
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_undecodable_texture_skips_override() {
        let pack = MemoryPack::new("vanilla").with_resource(
            ResourceKind::Client,
            id("autopalette:textures/block/stone.png"),
            b"not a png".to_vec(),
        );
        let mut descriptors = IndexMap::new();
        descriptors.insert(id("autopalette:block/ruby"), descriptor(None, false));
        let table = run(descriptors, vec![Arc::new(pack)], Vec::new());
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_cycle_publishes_empty_table() {
        let table = run(IndexMap::new(), Vec::new(), Vec::new());
        assert!(table.is_empty());
    }

    #[test]
    fn test_state_progression() {
        let mut pipeline = GenerationPipeline::new();
        assert_eq!(pipeline.state(), ReloadState::Idle);
        let registry = PackRegistry::new(Vec::new(), Vec::new());
        pipeline.run(&FixedCollector(IndexMap::new()), &registry);
        assert_eq!(pipeline.state(), ReloadState::Published);
    }
}
