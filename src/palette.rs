//! Palette override descriptors: parse, validate, resolve
//!
//! A descriptor declares one texture transformation:
//!
//! ```json
//! {
//!     "pack": "vanilla",
//!     "require_pack": false,
//!     "parent": "block/stone",
//!     "palette": { "7F7F7F": "FF0000FF" }
//! }
//! ```
//!
//! Palette parsing is accumulating rather than fail-fast: one typo in a
//! 50-entry palette voids that entry alone, not the other 49. The valid
//! entries are returned together with the list of errors so the caller can
//! log the partial failure.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::color::{decode_hex, encode_hex};
use crate::error::{Error, Result};
use crate::ident::ResourceId;
use crate::pack::{PackRegistry, PackSource};

/// The pack id sourced when a descriptor names none.
pub const DEFAULT_PACK: &str = "vanilla";

/// The pixel-value substitution table, keyed and valued in native packed
/// order. Lookups are by exact value only.
pub type PaletteMap = HashMap<u32, u32>;

/// A parsed, validated palette override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteOverride {
    pack: String,
    require_pack: bool,
    parent: ResourceId,
    palette: PaletteMap,
}

/// The outcome of parsing a descriptor: the override itself plus any
/// palette entries that failed to parse (a partial success when non-empty).
#[derive(Debug)]
pub struct ParsedOverride {
    /// The usable override, containing every well-formed palette entry.
    pub value: PaletteOverride,
    /// Accumulated palette-entry errors, one message per malformed pair.
    pub palette_errors: Vec<String>,
}

impl PaletteOverride {
    /// Build an override directly; used by tests and programmatic callers.
    pub fn new(pack: &str, require_pack: bool, parent: ResourceId, palette: PaletteMap) -> Self {
        Self {
            pack: pack.to_string(),
            require_pack,
            parent,
            palette,
        }
    }

    /// Parse a descriptor from its raw JSON form.
    ///
    /// Missing or mistyped `parent`/`palette` fields, or a malformed parent
    /// identifier, fail the whole descriptor. Malformed palette entries are
    /// accumulated into [`ParsedOverride::palette_errors`] instead.
    pub fn parse(json: &Value) -> Result<ParsedOverride> {
        let object = json.as_object().ok_or(Error::DescriptorNotObject)?;

        let pack = match object.get("pack") {
            None => DEFAULT_PACK.to_string(),
            Some(value) => value
                .as_str()
                .ok_or(Error::DescriptorFieldType {
                    field: "pack",
                    expected: "a string",
                })?
                .to_string(),
        };

        let require_pack = match object.get("require_pack") {
            None => false,
            Some(value) => value.as_bool().ok_or(Error::DescriptorFieldType {
                field: "require_pack",
                expected: "a boolean",
            })?,
        };

        let parent: ResourceId = object
            .get("parent")
            .ok_or(Error::DescriptorMissingField { field: "parent" })?
            .as_str()
            .ok_or(Error::DescriptorFieldType {
                field: "parent",
                expected: "a string identifier",
            })?
            .parse()?;

        let raw_palette = object
            .get("palette")
            .ok_or(Error::DescriptorMissingField { field: "palette" })?
            .as_object()
            .ok_or(Error::DescriptorFieldType {
                field: "palette",
                expected: "an object of color pairs",
            })?;

        let mut palette = PaletteMap::with_capacity(raw_palette.len());
        let mut palette_errors = Vec::new();
        for (key, value) in raw_palette {
            let Some(value) = value.as_str() else {
                palette_errors.push(format!("palette value for {key:?} is not a string"));
                continue;
            };
            let decoded_key = match decode_hex(key) {
                Ok(decoded) => decoded,
                Err(error) => {
                    palette_errors.push(format!("palette key: {error}"));
                    continue;
                }
            };
            let decoded_value = match decode_hex(value) {
                Ok(decoded) => decoded,
                Err(error) => {
                    palette_errors.push(format!("palette value: {error}"));
                    continue;
                }
            };
            palette.insert(decoded_key, decoded_value);
        }

        Ok(ParsedOverride {
            value: Self {
                pack,
                require_pack,
                parent,
                palette,
            },
            palette_errors,
        })
    }

    /// The id of the pack the parent texture is sourced from.
    pub fn pack(&self) -> &str {
        &self.pack
    }

    /// Whether the source pack must be currently selected.
    pub fn require_pack(&self) -> bool {
        self.require_pack
    }

    /// The identifier of the base texture this override transforms.
    pub fn parent(&self) -> &ResourceId {
        &self.parent
    }

    /// The substitution table.
    pub fn palette(&self) -> &PaletteMap {
        &self.palette
    }

    /// Resolve which concrete pack supplies the parent texture.
    ///
    /// A selected pack always wins. If the pack is not selected and
    /// `require_pack` is set, resolution fails even when the pack is
    /// installed; otherwise the installed-but-unselected set is an
    /// acceptable fallback.
    pub fn resolve_pack<'a>(&self, registry: &'a PackRegistry) -> Option<&'a Arc<dyn PackSource>> {
        let selected = registry.selected().get(&self.pack);
        if selected.is_some() || self.require_pack {
            selected
        } else {
            registry.unselected().get(&self.pack)
        }
    }

    /// Encode the palette back to `RRGGBBAA` string pairs, the inverse of
    /// the descriptor form.
    pub fn encode_palette(&self) -> IndexMap<String, String> {
        let mut pairs: Vec<(String, String)> = self
            .palette
            .iter()
            .map(|(key, value)| (encode_hex(*key), encode_hex(*value)))
            .collect();
        pairs.sort_unstable();
        pairs.into_iter().collect()
    }
}
