//! Operator session state.
//!
//! A [`SessionState`] holds everything the operator has entered for one white
//! label: uploaded files per folder, links per image, and grid buttons. It is
//! an immutable value; each edit returns a new state, so a state handed to
//! [`SessionState::assemble`] can never change underneath it.
//!
//! ## Session File
//!
//! The CLI reads a session from JSON:
//!
//! ```json
//! {
//!   "wlName": "acme",
//!   "uploads": {
//!     "mini_banners": [{"filename": "a.png", "url": "https://cdn/..."}]
//!   },
//!   "links": {
//!     "mini_banners": {"a.png": {"urlType": "external", "url": "https://ext"}}
//!   },
//!   "gridButtons": [
//!     {"name": "start-home.buttons.streaming", "image": "res://home_streaming_icon",
//!      "urlType": "internal", "url": "/streaming", "size": 25}
//!   ]
//! }
//! ```
//!
//! `uploads` holds upload responses verbatim. `links` is nested by folder and
//! then filename, so a filename can never be confused with a folder boundary.
//! Loading replays every entry through the same operations an interactive
//! edit would use, so the same validation applies.

use crate::assemble::{self, Assembly, LinkKey, Links, Uploads};
use crate::category::FolderCategory;
use crate::error::ValidationError;
use crate::grid::{self, GridButtonDraft};
use crate::naming;
use crate::types::{GridButton, LinkMetadata, UploadedFile};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid button {index}: {source}")]
    GridButton {
        index: usize,
        source: ValidationError,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Everything entered for one white label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    wl_name: String,
    uploads: Uploads,
    links: Links,
    grid_buttons: Vec<GridButton>,
}

impl SessionState {
    pub fn new(wl_name: &str) -> Result<Self, ValidationError> {
        let wl_name = naming::wl_name(wl_name)?;
        Ok(Self {
            wl_name: wl_name.to_string(),
            ..Self::default()
        })
    }

    pub fn wl_name(&self) -> &str {
        &self.wl_name
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn grid_buttons(&self) -> &[GridButton] {
        &self.grid_buttons
    }

    /// Files currently recorded for `category`, in upload order.
    pub fn files(&self, category: FolderCategory) -> &[UploadedFile] {
        self.uploads.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Link metadata recorded for one image.
    pub fn link(&self, category: FolderCategory, filename: &str) -> Option<&LinkMetadata> {
        self.links.get(&LinkKey::new(category, filename))
    }

    /// Record an upload response for `category`, replacing earlier uploads.
    ///
    /// A filename repeated in `files` keeps its first position and the URL of
    /// its last occurrence.
    pub fn with_uploads(&self, category: FolderCategory, files: Vec<UploadedFile>) -> Self {
        let mut unique: Vec<UploadedFile> = Vec::with_capacity(files.len());
        for file in files {
            match unique.iter_mut().find(|f| f.filename == file.filename) {
                Some(existing) => *existing = file,
                None => unique.push(file),
            }
        }
        let mut next = self.clone();
        next.uploads.insert(category, unique);
        next
    }

    /// Set (or overwrite) the link of one image.
    pub fn with_link(
        &self,
        category: FolderCategory,
        filename: &str,
        metadata: LinkMetadata,
    ) -> Result<Self, ValidationError> {
        if !category.accepts_links() {
            return Err(ValidationError::LinksNotAccepted(category.key().to_string()));
        }
        let mut next = self.clone();
        next.links.insert(LinkKey::new(category, filename), metadata);
        Ok(next)
    }

    /// Validate `draft` and append it to the grid buttons.
    pub fn with_grid_button(&self, draft: GridButtonDraft) -> Result<Self, ValidationError> {
        let grid_buttons = grid::add_grid_button(&self.grid_buttons, draft)?;
        Ok(Self {
            grid_buttons,
            ..self.clone()
        })
    }

    /// Assemble the current state into the output payloads.
    pub fn assemble(&self) -> Assembly {
        assemble::assemble(&self.uploads, &self.links, &self.grid_buttons)
    }

    /// Number of images across all folders.
    pub fn image_count(&self) -> usize {
        self.uploads.values().map(Vec::len).sum()
    }
}

/// Raw session file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionFile {
    pub wl_name: String,
    pub uploads: BTreeMap<FolderCategory, Vec<UploadedFile>>,
    pub links: BTreeMap<FolderCategory, BTreeMap<String, LinkMetadata>>,
    pub grid_buttons: Vec<GridButtonDraft>,
}

impl SessionFile {
    /// Replay the file into a validated session.
    pub fn into_state(self) -> Result<SessionState, SessionError> {
        let mut state = SessionState::new(&self.wl_name)?;
        for (category, files) in self.uploads {
            state = state.with_uploads(category, files);
        }
        for (category, entries) in self.links {
            for (filename, metadata) in entries {
                state = state.with_link(category, &filename, metadata)?;
            }
        }
        for (index, draft) in self.grid_buttons.into_iter().enumerate() {
            state = state
                .with_grid_button(draft)
                .map_err(|source| SessionError::GridButton {
                    index: index + 1,
                    source,
                })?;
        }
        Ok(state)
    }
}

/// Parse a session from JSON text.
pub fn parse_session(json: &str) -> Result<SessionState, SessionError> {
    let file: SessionFile = serde_json::from_str(json)?;
    file.into_state()
}

/// Load a session file from disk.
pub fn load_session(path: &Path) -> Result<SessionState, SessionError> {
    let content = fs::read_to_string(path)?;
    parse_session(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Link, UrlType};
    use serde_json::json;
    use tempfile::TempDir;

    fn file(name: &str, url: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            url: url.to_string(),
        }
    }

    fn acme() -> SessionState {
        SessionState::new("acme").unwrap()
    }

    #[test]
    fn new_session_requires_name() {
        assert_eq!(
            SessionState::new("   "),
            Err(ValidationError::MissingWlName)
        );
        assert_eq!(SessionState::new(" acme ").unwrap().wl_name(), "acme");
    }

    #[test]
    fn new_session_rejects_path_like_name() {
        assert_eq!(
            SessionState::new("../acme"),
            Err(ValidationError::InvalidWlName("../acme".into()))
        );
    }

    #[test]
    fn later_upload_replaces_folder_contents() {
        let state = acme()
            .with_uploads(FolderCategory::TopSlides, vec![file("old.png", "u1")])
            .with_uploads(FolderCategory::TopSlides, vec![file("new.png", "u2")]);
        assert_eq!(
            state.files(FolderCategory::TopSlides),
            &[file("new.png", "u2")]
        );
    }

    #[test]
    fn uploads_to_other_folders_are_independent() {
        let state = acme()
            .with_uploads(FolderCategory::TopSlides, vec![file("a.png", "u1")])
            .with_uploads(FolderCategory::LogoImages, vec![file("b.png", "u2")]);
        assert_eq!(state.files(FolderCategory::TopSlides).len(), 1);
        assert_eq!(state.files(FolderCategory::LogoImages).len(), 1);
        assert_eq!(state.image_count(), 2);
        assert!(state.files(FolderCategory::NormalBanners).is_empty());
    }

    #[test]
    fn duplicate_filenames_keep_last_url_at_first_position() {
        let state = acme().with_uploads(
            FolderCategory::NormalBanners,
            vec![
                file("a.png", "first"),
                file("b.png", "b"),
                file("a.png", "second"),
            ],
        );
        assert_eq!(
            state.files(FolderCategory::NormalBanners),
            &[file("a.png", "second"), file("b.png", "b")]
        );
    }

    #[test]
    fn edits_do_not_touch_the_original_state() {
        let original = acme().with_uploads(FolderCategory::SmallBanners, vec![file("a.png", "u")]);
        let before = original.assemble();

        let edited = original
            .with_link(
                FolderCategory::SmallBanners,
                "a.png",
                LinkMetadata::new(UrlType::External, "https://ext"),
            )
            .unwrap();

        assert_eq!(original.assemble(), before);
        assert_eq!(
            edited.assemble().document.formatted_banners.small_images[0].link,
            Some(Link::External("https://ext".into()))
        );
    }

    #[test]
    fn link_overwrites_previous_value() {
        let state = acme()
            .with_link(
                FolderCategory::TopSlides,
                "a.png",
                LinkMetadata::new(UrlType::Internal, "/one"),
            )
            .unwrap()
            .with_link(
                FolderCategory::TopSlides,
                "a.png",
                LinkMetadata::new(UrlType::External, "https://two"),
            )
            .unwrap();
        assert_eq!(
            state.link(FolderCategory::TopSlides, "a.png"),
            Some(&LinkMetadata::new(UrlType::External, "https://two"))
        );
        assert_eq!(state.links().len(), 1);
    }

    #[test]
    fn logo_and_template_links_are_rejected() {
        for category in [FolderCategory::LogoImages, FolderCategory::EmailTemplate] {
            let result = acme().with_link(category, "x.png", LinkMetadata::default());
            assert_eq!(
                result,
                Err(ValidationError::LinksNotAccepted(category.key().to_string()))
            );
        }
    }

    #[test]
    fn rejected_grid_button_leaves_state_unchanged() {
        let state = acme()
            .with_grid_button(GridButtonDraft::new("a", "res://a", UrlType::Internal, "/a"))
            .unwrap();
        let draft = GridButtonDraft::new("", "res://b", UrlType::Internal, "/b");
        let result = state.with_grid_button(draft);
        assert!(result.is_err());
        assert_eq!(state.grid_buttons().len(), 1);
    }

    #[test]
    fn parse_full_session_file() {
        let json = json!({
            "wlName": "acme",
            "uploads": {
                "mini_banners": [{"filename": "a.png", "url": "https://s3/a.png"}],
                "logo_images": [{"filename": "logo.png", "url": "https://s3/logo.png"}]
            },
            "links": {
                "mini_banners": {"a.png": {"urlType": "external", "url": "https://ext"}}
            },
            "gridButtons": [
                {"name": "btn", "image": "res://btn", "urlType": "external", "url": "https://x", "size": "30"}
            ]
        });
        let state = parse_session(&json.to_string()).unwrap();
        let assembly = state.assemble();

        assert_eq!(
            serde_json::to_value(&assembly.document).unwrap(),
            json!({
                "slides": [],
                "gridButtons": [
                    {"name": "btn", "image": "res://btn", "size": 30, "externalUrl": "https://x"}
                ],
                "banners": [],
                "formattedBanners": {
                    "smallImages": [
                        {"name": "a.png", "image": "https://s3/a.png", "externalUrl": "https://ext"}
                    ],
                    "normalImages": []
                },
                "miniExtraButtons": []
            })
        );
        assert_eq!(assembly.logo_images.len(), 1);
    }

    #[test]
    fn parse_rejects_unknown_folder() {
        let json = r#"{"wlName": "acme", "uploads": {"banners": []}}"#;
        let err = parse_session(json).unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
        assert!(err.to_string().contains("unknown folder"));
    }

    #[test]
    fn parse_reports_invalid_grid_button_position() {
        let json = r#"{
            "wlName": "acme",
            "gridButtons": [
                {"name": "ok", "image": "res://ok", "url": "/ok"},
                {"name": "broken", "image": "res://b"}
            ]
        }"#;
        let err = parse_session(json).unwrap_err();
        assert!(matches!(err, SessionError::GridButton { index: 2, .. }));
    }

    #[test]
    fn parse_requires_wl_name() {
        let err = parse_session("{}").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::MissingWlName)
        ));
    }

    #[test]
    fn load_session_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, r#"{"wlName": "acme"}"#).unwrap();
        let state = load_session(&path).unwrap();
        assert_eq!(state.wl_name(), "acme");
        assert_eq!(state.image_count(), 0);

        let missing = load_session(&tmp.path().join("nope.json"));
        assert!(matches!(missing, Err(SessionError::Io(_))));
    }
}
