//! Configuration assembly.
//!
//! Folds the uploaded files of every folder, the operator's link metadata and
//! the grid buttons into the document the client app consumes:
//!
//! ```text
//! uploads[category][file] ──┐
//! links[(category, file)] ──┼─► ImageRecord ─► bucket(category)
//!                           │
//! grid_buttons ─────────────┴─────────────────► gridButtons (verbatim)
//! ```
//!
//! Assembly is a pure function of its inputs: nothing is cached between calls,
//! so editing a link after assembling never changes a document already built.
//!
//! ## Link resolution
//!
//! - metadata with both `urlType` and `url` → `internalUrl` or `externalUrl`
//! - otherwise, for folders that accept links → `internalUrl: ""`
//! - otherwise (logos, email templates) → no url key at all
//!
//! The empty `internalUrl` keeps the record schema stable for clients that
//! always read the key.

use crate::category::{Bucket, FolderCategory};
use crate::types::{GridButton, ImageRecord, Link, LinkMetadata, UploadedFile};
use serde::Serialize;
use std::collections::BTreeMap;

/// Uploaded files per folder, each list in upload order.
pub type Uploads = BTreeMap<FolderCategory, Vec<UploadedFile>>;

/// Link metadata keyed by `(folder, filename)`.
pub type Links = BTreeMap<LinkKey, LinkMetadata>;

/// Composite key identifying one uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkKey {
    pub category: FolderCategory,
    pub filename: String,
}

impl LinkKey {
    pub fn new(category: FolderCategory, filename: impl Into<String>) -> Self {
        Self {
            category,
            filename: filename.into(),
        }
    }
}

/// The main configuration document (`<wl>-config.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDocument {
    pub slides: Vec<ImageRecord>,
    pub grid_buttons: Vec<GridButton>,
    pub banners: Vec<ImageRecord>,
    pub formatted_banners: FormattedBanners,
    pub mini_extra_buttons: Vec<ImageRecord>,
}

impl ConfigurationDocument {
    /// Number of image records across all buckets of the document.
    pub fn image_count(&self) -> usize {
        self.slides.len()
            + self.banners.len()
            + self.formatted_banners.small_images.len()
            + self.formatted_banners.normal_images.len()
            + self.mini_extra_buttons.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedBanners {
    pub small_images: Vec<ImageRecord>,
    pub normal_images: Vec<ImageRecord>,
}

/// Result of one assembly: the main document plus the two buckets that ship
/// as separate payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub document: ConfigurationDocument,
    pub logo_images: Vec<ImageRecord>,
    pub email_templates: Vec<ImageRecord>,
}

impl Assembly {
    /// Records routed into `bucket`.
    pub fn records(&self, bucket: Bucket) -> &[ImageRecord] {
        match bucket {
            Bucket::Slides => &self.document.slides,
            Bucket::Banners => &self.document.banners,
            Bucket::SmallImages => &self.document.formatted_banners.small_images,
            Bucket::NormalImages => &self.document.formatted_banners.normal_images,
            Bucket::MiniExtraButtons => &self.document.mini_extra_buttons,
            Bucket::LogoImages => &self.logo_images,
            Bucket::EmailTemplates => &self.email_templates,
        }
    }

    fn records_mut(&mut self, bucket: Bucket) -> &mut Vec<ImageRecord> {
        match bucket {
            Bucket::Slides => &mut self.document.slides,
            Bucket::Banners => &mut self.document.banners,
            Bucket::SmallImages => &mut self.document.formatted_banners.small_images,
            Bucket::NormalImages => &mut self.document.formatted_banners.normal_images,
            Bucket::MiniExtraButtons => &mut self.document.mini_extra_buttons,
            Bucket::LogoImages => &mut self.logo_images,
            Bucket::EmailTemplates => &mut self.email_templates,
        }
    }
}

/// Build the image record for one uploaded file.
pub fn image_record(
    category: FolderCategory,
    file: &UploadedFile,
    metadata: Option<&LinkMetadata>,
) -> ImageRecord {
    let link = match metadata.and_then(LinkMetadata::link) {
        Some(link) => Some(link),
        None if category.accepts_links() => Some(Link::Internal(String::new())),
        None => None,
    };
    ImageRecord {
        name: file.filename.clone(),
        image: file.url.clone(),
        link,
    }
}

/// Assemble uploads, link metadata and grid buttons into the final payloads.
pub fn assemble(uploads: &Uploads, links: &Links, grid_buttons: &[GridButton]) -> Assembly {
    let mut assembly = Assembly::default();

    for (&category, files) in uploads {
        let bucket = assembly.records_mut(category.bucket());
        for file in files {
            let metadata = links.get(&LinkKey::new(category, file.filename.as_str()));
            bucket.push(image_record(category, file, metadata));
        }
    }

    assembly.document.grid_buttons = grid_buttons.to_vec();
    assembly
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UrlType;
    use serde_json::json;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            url: format!("https://s3/{name}"),
        }
    }

    fn uploads(entries: &[(FolderCategory, &[&str])]) -> Uploads {
        entries
            .iter()
            .map(|(category, names)| (*category, names.iter().map(|n| file(n)).collect()))
            .collect()
    }

    #[test]
    fn small_banner_without_metadata_gets_empty_internal_url() {
        let uploads = uploads(&[(FolderCategory::SmallBanners, &["a.png"])]);
        let assembly = assemble(&uploads, &Links::new(), &[]);

        assert_eq!(
            serde_json::to_value(&assembly.document.formatted_banners.small_images).unwrap(),
            json!([{"name": "a.png", "image": "https://s3/a.png", "internalUrl": ""}])
        );
    }

    #[test]
    fn external_metadata_replaces_internal_default() {
        let uploads = uploads(&[(FolderCategory::SmallBanners, &["a.png"])]);
        let mut links = Links::new();
        links.insert(
            LinkKey::new(FolderCategory::SmallBanners, "a.png"),
            LinkMetadata::new(UrlType::External, "https://ext"),
        );
        let assembly = assemble(&uploads, &links, &[]);

        assert_eq!(
            serde_json::to_value(&assembly.document.formatted_banners.small_images).unwrap(),
            json!([{"name": "a.png", "image": "https://s3/a.png", "externalUrl": "https://ext"}])
        );
    }

    #[test]
    fn every_linkable_folder_defaults_to_empty_internal_url() {
        const NAMES: &[&str] = &["x.png"];
        let all: Vec<(FolderCategory, &[&str])> =
            FolderCategory::ALL.into_iter().map(|c| (c, NAMES)).collect();
        let assembly = assemble(&uploads(&all), &Links::new(), &[]);

        for category in FolderCategory::ALL {
            let records = assembly.records(category.bucket());
            assert_eq!(records.len(), 1, "{category}");
            let expected = category
                .accepts_links()
                .then(|| Link::Internal(String::new()));
            assert_eq!(records[0].link, expected, "{category}");
        }
    }

    #[test]
    fn logo_and_template_records_have_no_default_link() {
        let uploads = uploads(&[
            (FolderCategory::LogoImages, &["logo.png"]),
            (FolderCategory::EmailTemplate, &["header.png"]),
        ]);
        let assembly = assemble(&uploads, &Links::new(), &[]);

        assert_eq!(
            serde_json::to_value(&assembly.logo_images).unwrap(),
            json!([{"name": "logo.png", "image": "https://s3/logo.png"}])
        );
        assert_eq!(
            serde_json::to_value(&assembly.email_templates).unwrap(),
            json!([{"name": "header.png", "image": "https://s3/header.png"}])
        );
    }

    #[test]
    fn malformed_metadata_degrades_to_default() {
        let uploads = uploads(&[(FolderCategory::TopSlides, &["s.png"])]);
        let mut links = Links::new();
        links.insert(
            LinkKey::new(FolderCategory::TopSlides, "s.png"),
            LinkMetadata {
                url_type: Some(UrlType::External),
                url: None,
            },
        );
        let assembly = assemble(&uploads, &links, &[]);
        assert_eq!(
            assembly.document.slides[0].link,
            Some(Link::Internal(String::new()))
        );
    }

    #[test]
    fn metadata_only_applies_to_its_own_folder() {
        let uploads = uploads(&[
            (FolderCategory::TopSlides, &["same.png"]),
            (FolderCategory::HorizontalBanners, &["same.png"]),
        ]);
        let mut links = Links::new();
        links.insert(
            LinkKey::new(FolderCategory::HorizontalBanners, "same.png"),
            LinkMetadata::new(UrlType::Internal, "/offers"),
        );
        let assembly = assemble(&uploads, &links, &[]);

        assert_eq!(
            assembly.document.slides[0].link,
            Some(Link::Internal(String::new()))
        );
        assert_eq!(
            assembly.document.banners[0].link,
            Some(Link::Internal("/offers".into()))
        );
    }

    #[test]
    fn upload_order_is_preserved() {
        let uploads = uploads(&[(FolderCategory::NormalBanners, &["c.png", "a.png", "b.png"])]);
        let assembly = assemble(&uploads, &Links::new(), &[]);
        let names: Vec<&str> = assembly
            .document
            .formatted_banners
            .normal_images
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["c.png", "a.png", "b.png"]);
    }

    #[test]
    fn grid_buttons_are_copied_verbatim() {
        let buttons = vec![
            GridButton {
                name: "one".into(),
                image: "res://one".into(),
                size: 25,
                link: Link::Internal("/one".into()),
            },
            GridButton {
                name: "two".into(),
                image: "res://two".into(),
                size: 50,
                link: Link::External("https://two".into()),
            },
        ];
        let assembly = assemble(&Uploads::new(), &Links::new(), &buttons);
        assert_eq!(assembly.document.grid_buttons, buttons);
    }

    #[test]
    fn empty_input_yields_every_bucket_empty() {
        let assembly = assemble(&Uploads::new(), &Links::new(), &[]);
        assert_eq!(
            serde_json::to_value(&assembly.document).unwrap(),
            json!({
                "slides": [],
                "gridButtons": [],
                "banners": [],
                "formattedBanners": {"smallImages": [], "normalImages": []},
                "miniExtraButtons": []
            })
        );
        assert!(assembly.logo_images.is_empty());
        assert!(assembly.email_templates.is_empty());
    }

    #[test]
    fn assembling_twice_is_identical() {
        let uploads = uploads(&[
            (FolderCategory::TopSlides, &["1.png", "2.png"]),
            (FolderCategory::MiniExtraButtons, &["b.png"]),
            (FolderCategory::LogoImages, &["logo.png"]),
        ]);
        let mut links = Links::new();
        links.insert(
            LinkKey::new(FolderCategory::TopSlides, "2.png"),
            LinkMetadata::new(UrlType::External, "https://two"),
        );
        let first = assemble(&uploads, &links, &[]);
        let second = assemble(&uploads, &links, &[]);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.document).unwrap(),
            serde_json::to_string(&second.document).unwrap()
        );
    }

    #[test]
    fn document_key_order_matches_client_schema() {
        let json = serde_json::to_string(&ConfigurationDocument::default()).unwrap();
        assert_eq!(
            json,
            r#"{"slides":[],"gridButtons":[],"banners":[],"formattedBanners":{"smallImages":[],"normalImages":[]},"miniExtraButtons":[]}"#
        );
    }
}
