//! Object storage: folder setup and image uploads.
//!
//! ## Key Layout
//!
//! Every white label owns one namespace in the bucket:
//!
//! ```text
//! app/<wl_name>/home/
//! ├── banners_principais/topo/
//! ├── banners_principais/horizontal/
//! ├── extra_mini_buttons/
//! ├── mini_banners/
//! ├── normal_banners/
//! ├── logo_images/
//! └── email_template/
//! ```
//!
//! ## Image URLs
//!
//! Images are served through the CDN, addressed by a base64-encoded JSON
//! reference to the object rather than by path:
//!
//! ```text
//! <cdn_domain> + base64({"bucket": "<bucket>", "key": "app/acme/home/mini_banners/a.png"})
//! ```
//!
//! ## Backends
//!
//! Storage operations go through [`ObjectStorage`]. [`LocalBucket`] keeps
//! objects as files under a root directory, one path per key.

use crate::category::FolderCategory;
use crate::config::ToolConfig;
use crate::error::{UpstreamError, ValidationError};
use crate::naming;
use crate::types::UploadedFile;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("IO error reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Operations the tool needs from an object store.
pub trait ObjectStorage: Send + Sync {
    /// Verify the store is reachable and the credentials are usable.
    fn check_connection(&self) -> Result<(), UpstreamError>;
    /// Create an empty folder marker for `key`.
    fn create_folder(&self, key: &str) -> Result<(), UpstreamError>;
    /// Store `data` under `key`, replacing any existing object.
    fn put_object(&self, key: &str, data: &[u8]) -> Result<(), UpstreamError>;
}

/// A bucket kept on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalBucket {
    root: PathBuf,
}

impl LocalBucket {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem path of `key`. Keys with `.` or `..` segments are refused
    /// so every object stays under the root.
    fn path_for(&self, key: &str) -> Result<PathBuf, UpstreamError> {
        let mut path = self.root.clone();
        for part in key.split('/').filter(|part| !part.is_empty()) {
            if part == "." || part == ".." || part.contains('\\') {
                return Err(UpstreamError::new(format!("invalid object key {key}")));
            }
            path.push(part);
        }
        Ok(path)
    }
}

impl ObjectStorage for LocalBucket {
    fn check_connection(&self) -> Result<(), UpstreamError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            UpstreamError::new(format!("bucket {} unavailable: {e}", self.root.display()))
        })
    }

    fn create_folder(&self, key: &str) -> Result<(), UpstreamError> {
        fs::create_dir_all(self.path_for(key)?)
            .map_err(|e| UpstreamError::new(format!("failed to create folder {key}: {e}")))
    }

    fn put_object(&self, key: &str, data: &[u8]) -> Result<(), UpstreamError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| UpstreamError::new(format!("failed to upload {key}: {e}")))?;
        }
        fs::write(&path, data)
            .map_err(|e| UpstreamError::new(format!("failed to upload {key}: {e}")))
    }
}

/// Root of a white label's namespace.
pub fn base_path(wl_name: &str) -> String {
    format!("app/{wl_name}/home")
}

pub fn folder_key(wl_name: &str, category: FolderCategory) -> String {
    format!("{}/{}", base_path(wl_name), category.key())
}

pub fn object_key(wl_name: &str, category: FolderCategory, filename: &str) -> String {
    format!("{}/{}", folder_key(wl_name, category), filename)
}

/// CDN URL for an object: the domain followed by the base64 reference.
pub fn cdn_url(cdn_domain: &str, bucket: &str, key: &str) -> String {
    // Same separators as the CDN's reference encoder: `{"bucket": ..., "key": ...}`.
    let reference = format!(
        r#"{{"bucket": {}, "key": {}}}"#,
        serde_json::Value::from(bucket),
        serde_json::Value::from(key)
    );
    format!("{cdn_domain}{}", STANDARD.encode(reference))
}

/// A file to upload: its client-side name and contents.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadSource {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        let data = fs::read(path).map_err(|source| StorageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = naming::file_name(path).unwrap_or_default().to_string();
        Ok(Self { name, data })
    }
}

/// Outcome of one upload request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<UploadedFile>,
    /// Client names that were not uploaded: disallowed extension, unusable
    /// name, or replaced by a later file with the same sanitized name.
    #[serde(skip)]
    pub skipped: Vec<String>,
}

/// Result of folder setup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupResponse {
    pub message: String,
    pub base_path: String,
}

/// Folder setup and uploads on top of an [`ObjectStorage`] backend.
pub struct StorageService<S> {
    storage: S,
    bucket: String,
    cdn_domain: String,
    allowed_extensions: Vec<String>,
}

impl<S: ObjectStorage> StorageService<S> {
    pub fn new(storage: S, config: &ToolConfig) -> Self {
        Self {
            storage,
            bucket: config.storage.bucket.clone(),
            cdn_domain: config.storage.cdn_domain.clone(),
            allowed_extensions: config.uploads.allowed_extensions.clone(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn check_connection(&self) -> Result<(), StorageError> {
        self.storage.check_connection()?;
        debug!("storage connection ok");
        Ok(())
    }

    /// Create the folder structure for `wl_name`.
    pub fn setup_folders(&self, wl_name: &str) -> Result<SetupResponse, StorageError> {
        let wl_name = naming::wl_name(wl_name)?;
        for category in FolderCategory::ALL {
            let key = folder_key(wl_name, category);
            self.storage.create_folder(&format!("{key}/")).map_err(|e| {
                UpstreamError::new(format!("failed to create folder {category}: {}", e.message()))
            })?;
            debug!(%key, "folder created");
        }
        let base_path = base_path(wl_name);
        info!(wl_name, %base_path, "folder structure created");
        Ok(SetupResponse {
            message: "folder structure created".to_string(),
            base_path,
        })
    }

    /// Upload `sources` into `category` for `wl_name`.
    ///
    /// Files with a disallowed extension are skipped. Accepted files keep
    /// their input order in the response, and each filename appears once.
    pub fn upload_images(
        &self,
        wl_name: &str,
        category: FolderCategory,
        sources: &[UploadSource],
    ) -> Result<UploadResponse, StorageError> {
        let wl_name = naming::wl_name(wl_name)?;
        if sources.is_empty() || sources.iter().all(|s| s.name.is_empty()) {
            return Err(ValidationError::NoFiles.into());
        }

        let mut accepted: Vec<(String, &UploadSource)> = Vec::new();
        let mut skipped = Vec::new();
        for source in sources {
            let filename = naming::secure_filename(&source.name);
            if !naming::is_allowed(&source.name, &self.allowed_extensions) || filename.is_empty() {
                warn!(file = %source.name, "skipping file: not an allowed image");
                skipped.push(source.name.clone());
                continue;
            }
            // Names that sanitize alike share one key: the last source wins,
            // at the position of the first.
            match accepted.iter().position(|(name, _)| *name == filename) {
                Some(i) => {
                    let replaced = accepted[i].1;
                    warn!(file = %replaced.name, replaced_by = %source.name, %filename, "duplicate filename");
                    skipped.push(replaced.name.clone());
                    accepted[i].1 = source;
                }
                None => accepted.push((filename, source)),
            }
        }

        let files = accepted
            .par_iter()
            .map(|(filename, source)| -> Result<UploadedFile, UpstreamError> {
                let key = object_key(wl_name, category, filename);
                self.storage.put_object(&key, &source.data)?;
                debug!(%key, bytes = source.data.len(), "uploaded");
                Ok(UploadedFile {
                    filename: filename.clone(),
                    url: cdn_url(&self.cdn_domain, &self.bucket, &key),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(wl_name, %category, uploaded = files.len(), skipped = skipped.len(), "upload finished");
        Ok(UploadResponse {
            message: format!("{} files uploaded", files.len()),
            files,
            skipped,
        })
    }
}
