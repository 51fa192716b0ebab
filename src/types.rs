//! Value types shared by the session, assembler, storage and generator.
//!
//! Field names on the wire are camelCase because the mobile client consumes
//! the generated JSON directly.

use serde::{Deserialize, Serialize};

/// A file accepted by object storage: `{filename, url}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub url: String,
}

/// Which key a link destination is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlType {
    #[default]
    Internal,
    External,
}

/// A resolved link destination. Serializes as a single `internalUrl` or
/// `externalUrl` entry when flattened into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Link {
    #[serde(rename = "internalUrl")]
    Internal(String),
    #[serde(rename = "externalUrl")]
    External(String),
}

impl Link {
    pub fn new(url_type: UrlType, url: impl Into<String>) -> Self {
        match url_type {
            UrlType::Internal => Link::Internal(url.into()),
            UrlType::External => Link::External(url.into()),
        }
    }
}

/// Operator-entered link for one uploaded image.
///
/// Both fields are optional because the operator fills them in separately;
/// a half-filled entry is kept as-is and simply yields no link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkMetadata {
    #[serde(default)]
    pub url_type: Option<UrlType>,
    #[serde(default)]
    pub url: Option<String>,
}

impl LinkMetadata {
    pub fn new(url_type: UrlType, url: impl Into<String>) -> Self {
        Self {
            url_type: Some(url_type),
            url: Some(url.into()),
        }
    }

    /// The link this metadata describes, if both halves are filled in.
    pub fn link(&self) -> Option<Link> {
        match (self.url_type, self.url.as_deref()) {
            (Some(url_type), Some(url)) if !url.is_empty() => Some(Link::new(url_type, url)),
            _ => None,
        }
    }
}

/// One image entry of the generated configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub name: String,
    pub image: String,
    #[serde(flatten)]
    pub link: Option<Link>,
}

/// A home-screen grid button. Always carries exactly one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridButton {
    pub name: String,
    pub image: String,
    pub size: i64,
    #[serde(flatten)]
    pub link: Link,
}
