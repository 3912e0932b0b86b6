//! Namespaced resource identifiers and the derived-identity scheme
//!
//! Every resource a pack can serve is addressed by a [`ResourceId`], a
//! `namespace:path` pair. Generated textures are published under a *derived*
//! identity computed from the descriptor's identifier: the path is prefixed
//! into the texture directory and suffixed `.png`, and companion metadata
//! uses the same path with [`METADATA_SUFFIX`] appended.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// The single namespace the synthetic pack serves.
///
/// Namespace registration happens before the reload cycle runs, so a
/// namespace discovered only during generation would never be picked up by
/// the host. All overrides therefore live under this fixed namespace.
pub const PACK_NAMESPACE: &str = "autopalette";

/// Directory (inside a pack's namespace) that holds override descriptors.
pub const OVERRIDE_DIRECTORY: &str = "autotextures";

/// Directory prefix under which generated textures are published.
pub const TEXTURE_DIRECTORY: &str = "textures/";

/// Suffix for a texture's companion metadata resource.
pub const METADATA_SUFFIX: &str = ".mcmeta";

/// Which side of a pack a resource belongs to.
///
/// The synthetic container only ever serves [`ResourceKind::Client`]
/// resources; the server kind exists so pack handles can share the same
/// addressing scheme as the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Client-side resources (textures, metadata).
    Client,
    /// Server-side data.
    Server,
}

impl ResourceKind {
    /// The top-level directory this kind maps to inside a pack.
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Client => "assets",
            Self::Server => "data",
        }
    }
}

/// A namespaced resource identifier, rendered as `namespace:path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Create an identifier, validating both components.
    ///
    /// Namespaces may contain `a-z`, `0-9`, `_`, `.` and `-`; paths
    /// additionally allow `/`.
    pub fn new(namespace: &str, path: &str) -> Result<Self> {
        if namespace.is_empty() || !namespace.chars().all(is_namespace_char) {
            return Err(Error::InvalidIdentifier(format!("{namespace}:{path}")));
        }
        if path.is_empty() || !path.chars().all(is_path_char) {
            return Err(Error::InvalidIdentifier(format!("{namespace}:{path}")));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// The namespace component.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The derived identity a generated texture is published under:
    /// `textures/<path>.png` in the same namespace.
    pub fn texture_id(&self) -> ResourceId {
        ResourceId {
            namespace: self.namespace.clone(),
            path: format!("{TEXTURE_DIRECTORY}{}.png", self.path),
        }
    }

    /// The companion metadata identity for this resource.
    pub fn metadata_id(&self) -> ResourceId {
        ResourceId {
            namespace: self.namespace.clone(),
            path: format!("{}{METADATA_SUFFIX}", self.path),
        }
    }
}

fn is_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl FromStr for ResourceId {
    type Err = Error;

    /// Parse `namespace:path`; a bare `path` defaults to [`PACK_NAMESPACE`].
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(PACK_NAMESPACE, s),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
