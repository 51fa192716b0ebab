//! Output generation.
//!
//! Turns an [`Assembly`] into the three files handed to the app team:
//!
//! ```text
//! dist/
//! ├── <wl>-config.json     # main document: slides, grid buttons, banners
//! ├── <wl>-logo.json       # { "<logo name>": "<url>", ... }
//! └── <wl>-template.json   # { "<template name>": "<url>", ... }
//! ```
//!
//! Logo and template maps keep upload order. A name that appears twice maps
//! to the URL of its last record.

use crate::assemble::{Assembly, ConfigurationDocument};
use crate::error::ValidationError;
use crate::naming;
use crate::types::ImageRecord;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The three generated payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bundle {
    pub json_data: ConfigurationDocument,
    pub logo_data: Map<String, Value>,
    pub template_data: Map<String, Value>,
}

/// Which payload a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Config,
    Logo,
    Template,
}

impl OutputKind {
    pub const ALL: [OutputKind; 3] = [OutputKind::Config, OutputKind::Logo, OutputKind::Template];

    /// File name for `wl_name`'s payload of this kind.
    pub fn file_name(self, wl_name: &str) -> String {
        let suffix = match self {
            OutputKind::Config => "config",
            OutputKind::Logo => "logo",
            OutputKind::Template => "template",
        };
        format!("{wl_name}-{suffix}.json")
    }
}

/// A file written by [`write_bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub kind: OutputKind,
    pub path: PathBuf,
    pub entries: usize,
}

/// Map each record's name to its image URL.
fn name_to_image(records: &[ImageRecord]) -> Map<String, Value> {
    let mut map = Map::new();
    for record in records {
        map.insert(record.name.clone(), Value::String(record.image.clone()));
    }
    map
}

/// Build the payloads from an assembly.
pub fn generate(assembly: &Assembly) -> Bundle {
    Bundle {
        json_data: assembly.document.clone(),
        logo_data: name_to_image(&assembly.logo_images),
        template_data: name_to_image(&assembly.email_templates),
    }
}

/// Serialize with two-space indentation and a trailing newline.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write the three payload files for `wl_name` into `output_dir`.
pub fn write_bundle(
    bundle: &Bundle,
    wl_name: &str,
    output_dir: &Path,
) -> Result<Vec<WrittenFile>, GenerateError> {
    let wl_name = naming::wl_name(wl_name)?;
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(OutputKind::ALL.len());
    for kind in OutputKind::ALL {
        let (json, entries) = match kind {
            OutputKind::Config => (
                to_pretty_json(&bundle.json_data)?,
                bundle.json_data.image_count() + bundle.json_data.grid_buttons.len(),
            ),
            OutputKind::Logo => (to_pretty_json(&bundle.logo_data)?, bundle.logo_data.len()),
            OutputKind::Template => (
                to_pretty_json(&bundle.template_data)?,
                bundle.template_data.len(),
            ),
        };
        let path = output_dir.join(kind.file_name(wl_name));
        fs::write(&path, json)?;
        info!(path = %path.display(), entries, "wrote payload");
        written.push(WrittenFile {
            kind,
            path,
            entries,
        });
    }
    Ok(written)
}
