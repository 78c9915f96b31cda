//! Media entities created from legacy inline images.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::file_type::detect_mime_type;
use super::image_handler::InlineImage;
use crate::error::{AddCalError, AddCalResult};

/// An image media entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntity {
    pub uuid: Uuid,
    /// The `src` the image had in the legacy markup
    pub original_ref: String,
    pub filename: String,
    pub uri: PathBuf,
    pub mime_type: String,
    pub size: u64,
    pub alt: String,
    pub title: String,
    pub owner_id: u64,
}

/// Where inline images become media entities.
pub trait MediaLibrary {
    /// Find a media entity previously created for this `src`.
    fn find_by_original_ref(&self, src: &str) -> Option<Uuid>;

    /// Create a media entity for the image. `Ok(None)` when the legacy file
    /// does not exist.
    fn import_image(&mut self, image: &InlineImage) -> AddCalResult<Option<Uuid>>;
}

/// Copies legacy files into a destination directory and keeps the media
/// index in memory, optionally persisted as a JSON manifest.
#[derive(Debug)]
pub struct FileMediaLibrary {
    source_dir: PathBuf,
    dest_dir: PathBuf,
    owner_id: u64,
    entities: HashMap<String, MediaEntity>,
}

impl FileMediaLibrary {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>, owner_id: u64) -> Self {
        FileMediaLibrary {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            owner_id,
            entities: HashMap::new(),
        }
    }

    /// Load previously created entities so repeated runs reuse them.
    pub fn load_manifest(&mut self, path: &Path) -> AddCalResult<()> {
        if !path.exists() {
            return Ok(());
        }

        let json = std::fs::read_to_string(path)?;
        let entities: Vec<MediaEntity> = serde_json::from_str(&json).map_err(|e| {
            AddCalError::Serialization(format!("Failed to parse {}: {e}", path.display()))
        })?;

        for entity in entities {
            self.entities.insert(entity.original_ref.clone(), entity);
        }
        Ok(())
    }

    pub fn save_manifest(&self, path: &Path) -> AddCalResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut entities: Vec<&MediaEntity> = self.entities.values().collect();
        entities.sort_by(|a, b| a.original_ref.cmp(&b.original_ref));

        std::fs::write(path, serde_json::to_string_pretty(&entities)?)?;
        Ok(())
    }

    pub fn entities(&self) -> impl Iterator<Item = &MediaEntity> {
        self.entities.values()
    }

    /// Legacy `src` values are site-absolute paths. Returns the path
    /// relative to the site root, or `None` if it climbs out of it.
    fn relative_src(src: &str) -> Option<PathBuf> {
        let mut relative = PathBuf::new();
        for component in Path::new(src).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => return None,
            }
        }

        (!relative.as_os_str().is_empty()).then_some(relative)
    }
}

impl MediaLibrary for FileMediaLibrary {
    fn find_by_original_ref(&self, src: &str) -> Option<Uuid> {
        self.entities.get(src).map(|entity| entity.uuid)
    }

    fn import_image(&mut self, image: &InlineImage) -> AddCalResult<Option<Uuid>> {
        let Some(relative) = Self::relative_src(&image.src) else {
            warn!(src = %image.src, "image path leaves the legacy directory, skipping");
            return Ok(None);
        };

        let source = self.source_dir.join(&relative);
        if !source.is_file() {
            debug!(src = %image.src, path = %source.display(), "legacy image not found");
            return Ok(None);
        }

        let destination = self.dest_dir.join(&relative);
        if let Some(dir) = destination.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let size = std::fs::copy(&source, &destination).map_err(|e| {
            AddCalError::MediaImport(format!(
                "Could not copy {} to {}: {e}",
                source.display(),
                destination.display()
            ))
        })?;

        let filename = Path::new(&image.src)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.src.clone());

        let entity = MediaEntity {
            uuid: Uuid::new_v4(),
            original_ref: image.src.clone(),
            filename,
            uri: destination,
            mime_type: detect_mime_type(&source),
            size,
            alt: image.alt.clone(),
            title: image.title.clone(),
            owner_id: self.owner_id,
        };
        info!(src = %image.src, uuid = %entity.uuid, "created media entity");

        let uuid = entity.uuid;
        self.entities.insert(entity.original_ref.clone(), entity);
        Ok(Some(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(src: &str) -> InlineImage {
        InlineImage {
            tag: format!("<img src=\"{src}\">"),
            src: src.to_string(),
            alt: "A cat".to_string(),
            title: String::new(),
        }
    }

    #[test]
    fn test_import_copies_file_and_registers_entity() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(source.path().join("files/2019")).unwrap();
        std::fs::write(source.path().join("files/2019/cat.gif"), b"GIF89a...").unwrap();

        let mut library = FileMediaLibrary::new(source.path(), dest.path(), 1);
        let uuid = library
            .import_image(&image("/files/2019/cat.gif"))
            .unwrap()
            .unwrap();

        assert!(dest.path().join("files/2019/cat.gif").is_file());
        assert_eq!(library.find_by_original_ref("/files/2019/cat.gif"), Some(uuid));

        let entity = library.entities().next().unwrap();
        assert_eq!(entity.filename, "cat.gif");
        assert_eq!(entity.mime_type, "image/gif");
        assert_eq!(entity.size, 9);
        assert_eq!(entity.alt, "A cat");
        assert_eq!(entity.owner_id, 1);
    }

    #[test]
    fn test_import_missing_file_is_none() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let mut library = FileMediaLibrary::new(source.path(), dest.path(), 1);

        assert_eq!(library.import_image(&image("/nope.jpg")).unwrap(), None);
        assert_eq!(library.entities().count(), 0);
    }

    #[test]
    fn test_import_refuses_paths_outside_source_dir() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("legacy/private");
        let dest = root.path().join("legacy/public");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(root.path().join("secret.gif"), b"GIF89a").unwrap();

        let mut library = FileMediaLibrary::new(&source, &dest, 1);

        assert_eq!(library.import_image(&image("/../../secret.gif")).unwrap(), None);
        assert_eq!(library.import_image(&image("/files/../../secret.gif")).unwrap(), None);
        assert_eq!(library.entities().count(), 0);
        assert!(!dest.exists());
    }

    #[test]
    fn test_relative_src_drops_root_and_dot() {
        assert_eq!(
            FileMediaLibrary::relative_src("/files/./2019/cat.gif"),
            Some(PathBuf::from("files/2019/cat.gif"))
        );
        assert_eq!(FileMediaLibrary::relative_src("/"), None);
        assert_eq!(FileMediaLibrary::relative_src("a/../b.gif"), None);
    }

    #[test]
    fn test_manifest_round_trip() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("dog.jpg"), b"\xFF\xD8\xFFjpeg").unwrap();
        let manifest = dest.path().join("media.json");

        let mut library = FileMediaLibrary::new(source.path(), dest.path(), 3);
        let uuid = library.import_image(&image("/dog.jpg")).unwrap();
        library.save_manifest(&manifest).unwrap();

        let mut reloaded = FileMediaLibrary::new(source.path(), dest.path(), 3);
        reloaded.load_manifest(&manifest).unwrap();
        assert_eq!(reloaded.find_by_original_ref("/dog.jpg"), uuid);
    }

    #[test]
    fn test_load_missing_manifest_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = FileMediaLibrary::new(dir.path(), dir.path(), 1);
        library.load_manifest(&dir.path().join("absent.json")).unwrap();
        assert_eq!(library.entities().count(), 0);
    }
}
