//! Photo albums read straight from a directory tree.
//!
//! Every immediate subdirectory of the gallery root is an album named by
//! its folder (the slug). An optional `metadata.json` inside the album
//! supplies names, captions and the cover image. Problems are logged and
//! degrade to empty results; nothing here fails the caller.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];
pub const METADATA_FILE: &str = "metadata.json";
pub const PLACEHOLDER_COVER: &str = "/placeholder-album.svg";
const COVER_HINTS: [&str; 3] = ["cover", "thumb", "preview"];
const DEFAULT_CATEGORY: &str = "Misc";

#[derive(Debug, Error)]
pub enum GalleryError {
  #[error("cannot read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("malformed {path}: {source}")]
  Metadata {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
  pub name: String,
  pub slug: String,
  pub cover_image: String,
  pub photo_count: usize,
  pub description: String,
  pub category: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Photo {
  pub id: String,
  pub src: String,
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// year taken; the current year when metadata has none
  pub date: String,
  pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlbumDetail {
  pub album: Album,
  pub photos: Vec<Photo>,
}

#[derive(Clone, Debug, Deserialize)]
struct AlbumMetadata {
  album: AlbumInfo,
  #[serde(default)]
  photos: HashMap<String, PhotoMetadata>,
}

#[derive(Clone, Debug, Deserialize)]
struct AlbumInfo {
  name: String,
  description: String,
  category: String,
  #[serde(default)]
  cover: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PhotoMetadata {
  title: Option<String>,
  description: Option<String>,
  date: Option<String>,
  tags: Option<Vec<String>>,
}

/// "photo-flower_1" -> "Photo Flower 1"
pub fn format_title(stem: &str) -> String {
  let mut out = String::with_capacity(stem.len());
  let mut at_word_start = true;
  for c in stem.chars() {
    let c = if c == '-' || c == '_' { ' ' } else { c };
    if c.is_alphanumeric() {
      if at_word_start {
        out.extend(c.to_uppercase());
      } else {
        out.push(c);
      }
      at_word_start = false;
    } else {
      out.push(c);
      at_word_start = true;
    }
  }
  out
}

pub fn is_image_file(name: &str) -> bool {
  Path::new(name)
    .extension()
    .and_then(|e| e.to_str())
    .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
}

fn is_valid_slug(slug: &str) -> bool {
  !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

fn photo_src(slug: &str, filename: &str) -> String {
  format!("/gallery/{slug}/{filename}")
}

/// Image file names in `dir`, in directory enumeration order.
fn image_files(dir: &Path) -> Result<Vec<String>, GalleryError> {
  let entries = fs::read_dir(dir).map_err(|source| GalleryError::Io {
    path: dir.to_path_buf(),
    source,
  })?;
  let mut names = Vec::new();
  for entry in entries.flatten() {
    if !entry.file_type().is_ok_and(|t| t.is_file()) {
      continue;
    }
    if let Some(name) = entry.file_name().to_str() {
      if is_image_file(name) {
        names.push(name.to_string());
      }
    }
  }
  Ok(names)
}

fn read_metadata(dir: &Path) -> Result<Option<AlbumMetadata>, GalleryError> {
  let path = dir.join(METADATA_FILE);
  if !path.is_file() {
    return Ok(None);
  }
  let json = fs::read_to_string(&path).map_err(|source| GalleryError::Io {
    path: path.clone(),
    source,
  })?;
  serde_json::from_str(&json)
    .map(Some)
    .map_err(|source| GalleryError::Metadata { path, source })
}

/// Cover resolution: the metadata's choice if it is one of the photos, then
/// the first file hinting at a cover, then the first photo.
fn pick_cover(slug: &str, files: &[String], metadata: Option<&AlbumMetadata>) -> String {
  if files.is_empty() {
    return PLACEHOLDER_COVER.to_string();
  }
  if let Some(cover) = metadata.and_then(|m| m.album.cover.as_deref()) {
    if files.iter().any(|f| f == cover) {
      return photo_src(slug, cover);
    }
  }
  let hinted = files.iter().find(|f| {
    let lower = f.to_lowercase();
    COVER_HINTS.iter().any(|h| lower.contains(h))
  });
  photo_src(slug, hinted.unwrap_or(&files[0]))
}

fn build_photos(slug: &str, files: &[String], metadata: Option<&AlbumMetadata>) -> Vec<Photo> {
  let fallback_tag = metadata
    .map(|m| m.album.category.to_lowercase())
    .unwrap_or_else(|| "photo".to_string());
  let this_year = chrono::Local::now().year().to_string();

  files
    .iter()
    .enumerate()
    .map(|(i, filename)| {
      let meta = metadata.and_then(|m| m.photos.get(filename));
      let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
      Photo {
        id: format!("{slug}-{}", i + 1),
        src: photo_src(slug, filename),
        title: meta
          .and_then(|m| m.title.clone())
          .filter(|t| !t.is_empty())
          .unwrap_or_else(|| format_title(stem)),
        description: Some(
          meta
            .and_then(|m| m.description.clone())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Photograph from the {slug} album")),
        ),
        date: meta
          .and_then(|m| m.date.clone())
          .filter(|d| !d.is_empty())
          .unwrap_or_else(|| this_year.clone()),
        tags: meta
          .and_then(|m| m.tags.clone())
          .unwrap_or_else(|| vec![slug.to_string(), fallback_tag.clone()]),
      }
    })
    .collect()
}

pub struct Gallery {
  root: PathBuf,
}

impl Gallery {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn metadata_or_warn(&self, dir: &Path) -> Option<AlbumMetadata> {
    match read_metadata(dir) {
      Ok(m) => m,
      Err(e) => {
        log::warn!("ignoring album metadata: {e}");
        None
      }
    }
  }

  /// Album summary plus photos, or `None` if the folder holds no images.
  fn load(&self, slug: &str) -> Option<AlbumDetail> {
    let dir = self.root.join(slug);
    let files = match image_files(&dir) {
      Ok(files) => files,
      Err(e) => {
        log::warn!("skipping album {slug}: {e}");
        return None;
      }
    };
    if files.is_empty() {
      return None;
    }
    let metadata = self.metadata_or_warn(&dir);
    let photos = build_photos(slug, &files, metadata.as_ref());
    let cover_image = pick_cover(slug, &files, metadata.as_ref());

    let (name, description, category) = match &metadata {
      Some(m) => (
        m.album.name.clone(),
        m.album.description.clone(),
        m.album.category.clone(),
      ),
      None => (
        format_title(slug),
        format!("Photo collection {slug}"),
        DEFAULT_CATEGORY.to_string(),
      ),
    };

    Some(AlbumDetail {
      album: Album {
        name,
        slug: slug.to_string(),
        cover_image,
        photo_count: photos.len(),
        description,
        category,
      },
      photos,
    })
  }

  /// All non-empty albums, sorted by display name.
  pub fn albums(&self) -> Vec<Album> {
    let entries = match fs::read_dir(&self.root) {
      Ok(entries) => entries,
      Err(e) => {
        log::warn!("gallery root {} unavailable: {e}", self.root.display());
        return Vec::new();
      }
    };

    let mut albums: Vec<Album> = entries
      .flatten()
      .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
      .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
      .filter_map(|slug| self.load(&slug))
      .map(|detail| detail.album)
      .collect();

    albums.sort_by(|a, b| {
      a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
    });
    albums
  }

  /// One album with its photos; `None` plays the role of "not found".
  pub fn album(&self, slug: &str) -> Option<AlbumDetail> {
    if !is_valid_slug(slug) || !self.root.join(slug).is_dir() {
      return None;
    }
    self.load(slug)
  }

  pub fn photos(&self, slug: &str) -> Vec<Photo> {
    self.album(slug).map(|d| d.photos).unwrap_or_default()
  }

  /// Split an album's photo sources into files present on disk and files
  /// that are not. Unknown albums yield an empty check.
  pub fn validate_images(&self, slug: &str) -> ImageCheck {
    let mut check = ImageCheck::default();
    for photo in self.photos(slug) {
      let filename = photo.src.rsplit('/').next().unwrap_or_default();
      if self.root.join(slug).join(filename).is_file() {
        check.valid.push(photo.src);
      } else {
        check.missing.push(photo.src);
      }
    }
    if !check.missing.is_empty() {
      log::warn!("album {slug}: {} missing images", check.missing.len());
    }
    check
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ImageCheck {
  pub valid: Vec<String>,
  pub missing: Vec<String>,
}
