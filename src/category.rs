//! Folder categories and their fixed routing into the configuration document.
//!
//! Every uploaded image belongs to exactly one storage folder under
//! `app/<wl_name>/home/`. The folder decides two things:
//!
//! - which bucket of the assembled document the image lands in
//! - whether the image can carry a link (logos and email templates never do)
//!
//! ```text
//! banners_principais/topo        → slides
//! banners_principais/horizontal  → banners
//! mini_banners                   → formattedBanners.smallImages
//! normal_banners                 → formattedBanners.normalImages
//! extra_mini_buttons             → miniExtraButtons
//! logo_images                    → logoImages      (separate payload)
//! email_template                 → emailTemplates  (separate payload)
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown folder '{0}' (run `wl-config folders` to list valid keys)")]
pub struct UnknownFolder(pub String);

/// A storage folder an image can be uploaded into.
///
/// Variant order is the order folders are created in during setup and the
/// order categories are iterated during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FolderCategory {
    TopSlides,
    HorizontalBanners,
    MiniExtraButtons,
    SmallBanners,
    NormalBanners,
    LogoImages,
    EmailTemplate,
}

/// Output location of an image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Slides,
    Banners,
    SmallImages,
    NormalImages,
    MiniExtraButtons,
    LogoImages,
    EmailTemplates,
}

impl FolderCategory {
    pub const ALL: [FolderCategory; 7] = [
        FolderCategory::TopSlides,
        FolderCategory::HorizontalBanners,
        FolderCategory::MiniExtraButtons,
        FolderCategory::SmallBanners,
        FolderCategory::NormalBanners,
        FolderCategory::LogoImages,
        FolderCategory::EmailTemplate,
    ];

    /// Folder key, used both as the storage sub-path and in session files.
    pub fn key(self) -> &'static str {
        match self {
            FolderCategory::TopSlides => "banners_principais/topo",
            FolderCategory::HorizontalBanners => "banners_principais/horizontal",
            FolderCategory::MiniExtraButtons => "extra_mini_buttons",
            FolderCategory::SmallBanners => "mini_banners",
            FolderCategory::NormalBanners => "normal_banners",
            FolderCategory::LogoImages => "logo_images",
            FolderCategory::EmailTemplate => "email_template",
        }
    }

    /// Human-readable label shown by the CLI.
    pub fn label(self) -> &'static str {
        match self {
            FolderCategory::TopSlides => "Main banners - top (slides)",
            FolderCategory::HorizontalBanners => "Main banners - horizontal",
            FolderCategory::MiniExtraButtons => "Extra mini buttons",
            FolderCategory::SmallBanners => "Mini banners (small images)",
            FolderCategory::NormalBanners => "Normal banners",
            FolderCategory::LogoImages => "Logo images",
            FolderCategory::EmailTemplate => "Email template",
        }
    }

    pub fn bucket(self) -> Bucket {
        match self {
            FolderCategory::TopSlides => Bucket::Slides,
            FolderCategory::HorizontalBanners => Bucket::Banners,
            FolderCategory::MiniExtraButtons => Bucket::MiniExtraButtons,
            FolderCategory::SmallBanners => Bucket::SmallImages,
            FolderCategory::NormalBanners => Bucket::NormalImages,
            FolderCategory::LogoImages => Bucket::LogoImages,
            FolderCategory::EmailTemplate => Bucket::EmailTemplates,
        }
    }

    /// Whether images in this folder can be linked to a destination URL.
    pub fn accepts_links(self) -> bool {
        !matches!(
            self,
            FolderCategory::LogoImages | FolderCategory::EmailTemplate
        )
    }
}

impl Bucket {
    /// Dotted path of the bucket inside the generated payloads.
    pub fn path(self) -> &'static str {
        match self {
            Bucket::Slides => "slides",
            Bucket::Banners => "banners",
            Bucket::SmallImages => "formattedBanners.smallImages",
            Bucket::NormalImages => "formattedBanners.normalImages",
            Bucket::MiniExtraButtons => "miniExtraButtons",
            Bucket::LogoImages => "logoImages",
            Bucket::EmailTemplates => "emailTemplates",
        }
    }

    /// True for buckets that ship in the main config document.
    pub fn in_main_document(self) -> bool {
        !matches!(self, Bucket::LogoImages | Bucket::EmailTemplates)
    }
}

impl fmt::Display for FolderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FolderCategory {
    type Err = UnknownFolder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FolderCategory::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| UnknownFolder(s.to_string()))
    }
}

impl Serialize for FolderCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for FolderCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}
