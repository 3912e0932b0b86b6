//! On-disk pack source rooted at a directory
//!
//! Layout follows the standard pack convention: resources live under
//! `<root>/<kind dir>/<namespace>/<path>`, e.g.
//! `my_pack/assets/autopalette/textures/block/ruby.png`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::ident::{ResourceId, ResourceKind};

use super::{PackHandle, PackSource};

/// A pack backed by a directory tree on disk.
pub struct DirectoryPack {
    id: String,
    root: PathBuf,
}

impl DirectoryPack {
    /// Create a pack reference for the given root directory.
    pub fn new(id: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.to_string(),
            root: root.into(),
        }
    }
}

impl PackSource for DirectoryPack {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> Option<Box<dyn PackHandle + '_>> {
        self.root.is_dir().then(|| {
            Box::new(DirectoryHandle {
                root: self.root.clone(),
            }) as Box<dyn PackHandle>
        })
    }
}

struct DirectoryHandle {
    root: PathBuf,
}

impl DirectoryHandle {
    fn resource_path(&self, kind: ResourceKind, id: &ResourceId) -> PathBuf {
        self.root
            .join(kind.directory())
            .join(id.namespace())
            .join(id.path())
    }
}

impl PackHandle for DirectoryHandle {
    fn namespaces(&self, kind: ResourceKind) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.root.join(kind.directory())) else {
            return Vec::new();
        };
        let mut namespaces: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        namespaces.sort_unstable();
        namespaces
    }

    fn has_resource(&self, kind: ResourceKind, id: &ResourceId) -> bool {
        self.resource_path(kind, id).is_file()
    }

    fn read_resource(&self, kind: ResourceKind, id: &ResourceId) -> Result<Vec<u8>> {
        let path = self.resource_path(kind, id);
        if !path.is_file() {
            return Err(Error::not_found(kind, id));
        }
        Ok(std::fs::read(path)?)
    }

    fn list_resources(
        &self,
        kind: ResourceKind,
        namespace: &str,
        directory: &str,
    ) -> Vec<ResourceId> {
        let namespace_root = self.root.join(kind.directory()).join(namespace);
        let search_root = namespace_root.join(directory);
        let mut ids = Vec::new();
        for entry in WalkDir::new(search_root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            if let Some(id) = path_to_id(namespace, &namespace_root, entry.path()) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        ids
    }
}

/// Convert an absolute file path back to a namespaced id, skipping files
/// whose names fall outside the identifier character set.
fn path_to_id(namespace: &str, namespace_root: &Path, file: &Path) -> Option<ResourceId> {
    let relative = file.strip_prefix(namespace_root).ok()?;
    let mut path = String::new();
    for component in relative.components() {
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(component.as_os_str().to_str()?);
    }
    ResourceId::new(namespace, &path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ResourceId {
        s.parse().unwrap()
    }

    fn write(root: &Path, relative: &str, bytes: &[u8]) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_read_resource_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "assets/ns/textures/block/ruby.png", b"png-bytes");

        let pack = DirectoryPack::new("disk", dir.path());
        let handle = pack.open().unwrap();
        assert!(handle.has_resource(ResourceKind::Client, &id("ns:textures/block/ruby.png")));
        assert_eq!(
            handle
                .read_resource(ResourceKind::Client, &id("ns:textures/block/ruby.png"))
                .unwrap(),
            b"png-bytes"
        );
    }

    #[test]
    fn test_missing_root_cannot_open() {
        let pack = DirectoryPack::new("ghost", "/nonexistent/pack/root");
        assert!(pack.open().is_none());
    }

    #[test]
    fn test_list_and_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "assets/ns/autotextures/block/a.json", b"{}");
        write(dir.path(), "assets/ns/autotextures/item/b.json", b"{}");
        write(dir.path(), "assets/other/textures/c.png", b"");

        let pack = DirectoryPack::new("disk", dir.path());
        let handle = pack.open().unwrap();
        assert_eq!(handle.namespaces(ResourceKind::Client), vec!["ns", "other"]);
        assert_eq!(
            handle.list_resources(ResourceKind::Client, "ns", "autotextures"),
            vec![
                id("ns:autotextures/block/a.json"),
                id("ns:autotextures/item/b.json"),
            ]
        );
    }
}
