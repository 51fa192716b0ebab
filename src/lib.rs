//! # wl-config
//!
//! Builds the home screen configuration of a white-label app. Operators upload
//! images into fixed folders of the white label's storage namespace, attach a
//! link to each image, define the grid buttons, and the tool compiles it all
//! into the JSON documents the client app reads at startup.
//!
//! # Architecture: Upload, Assemble, Generate
//!
//! ```text
//! 1. Upload     files       →  storage + [{filename, url}]   (per folder)
//! 2. Assemble   session     →  Assembly                       (pure)
//! 3. Generate   Assembly    →  dist/<wl>-{config,logo,template}.json
//! ```
//!
//! The session ties the stages together: it records upload responses, link
//! metadata and grid buttons, and is loaded from a JSON file by the CLI.
//! Every edit returns a new session value, so an assembly can never observe a
//! half-applied change.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`category`] | The seven upload folders, their storage keys and output buckets |
//! | [`types`] | Wire types: uploaded files, link metadata, image records, grid buttons |
//! | [`assemble`] | Folds uploads, links and grid buttons into the configuration document |
//! | [`grid`] | Grid button drafts: validation and size defaulting |
//! | [`session`] | Immutable session state and the session file loader |
//! | [`storage`] | Folder setup and uploads over an [`storage::ObjectStorage`] backend |
//! | [`generate`] | Splits an assembly into the three output payloads and writes them |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`naming`] | Upload filename sanitizing and extension checks |
//! | [`error`] | Errors shared by the stages: operator input and upstream failures |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Records Always Carry a Link Key
//!
//! Images in folders that accept links are emitted with `internalUrl: ""`
//! when the operator set no link. Clients read the key unconditionally, so
//! the empty value keeps every record the same shape. Logos and email
//! templates never carry a link.
//!
//! ## Links Keyed by Folder and Filename
//!
//! The same filename may be uploaded into two folders with different links.
//! Link metadata is keyed by [`assemble::LinkKey`], a `(folder, filename)`
//! pair, so the two never collide.
//!
//! ## CDN References Instead of Paths
//!
//! Image URLs point at the CDN with a base64-encoded `{bucket, key}` reference
//! appended, the format the image service resolves. See [`storage::cdn_url`].

pub mod assemble;
pub mod category;
pub mod config;
pub mod error;
pub mod generate;
pub mod grid;
pub mod naming;
pub mod output;
pub mod session;
pub mod storage;
pub mod types;
