//! CLI output formatting for every command.
//!
//! Each entity is shown as a header line (positional index + name) followed
//! by indented context lines, the same shape across commands:
//!
//! ## Upload
//!
//! ```text
//! Mini banners (small images) (2 images)
//! 001 a.png
//!     URL: https://d1jc1l746atx5b.cloudfront.net/eyJidWNr...
//! 002 b.png
//!     URL: https://d1jc1l746atx5b.cloudfront.net/eyJidWNr...
//! Skipped: notes.txt
//! ```
//!
//! ## Check
//!
//! ```text
//! White label: acme
//!
//! slides (1 image)
//!     001 top.png
//!         Link: internal (empty)
//!
//! formattedBanners.smallImages (1 image)
//!     001 a.png
//!         Link: external https://ext
//!
//! gridButtons (1 button)
//!     001 start-home.buttons.streaming (size 25)
//!         Link: internal /streaming
//! ```
//!
//! ## Generate
//!
//! ```text
//! acme-config.json (3 entries) → dist/acme-config.json
//! acme-logo.json (1 entry) → dist/acme-logo.json
//! acme-template.json (0 entries) → dist/acme-template.json
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::assemble::Assembly;
use crate::category::{Bucket, FolderCategory};
use crate::generate::WrittenFile;
use crate::session::SessionState;
use crate::storage::{SetupResponse, UploadResponse};
use crate::types::{ImageRecord, Link};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 image`, `2 images`.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

fn describe_link(link: Option<&Link>) -> String {
    match link {
        Some(Link::Internal(url)) if url.is_empty() => "internal (empty)".to_string(),
        Some(Link::Internal(url)) => format!("internal {url}"),
        Some(Link::External(url)) => format!("external {url}"),
        None => "none".to_string(),
    }
}

fn record_lines(records: &[ImageRecord], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, record) in records.iter().enumerate() {
        lines.push(format!(
            "{}{} {}",
            indent(depth),
            format_index(i + 1),
            record.name
        ));
        lines.push(format!(
            "{}Link: {}",
            indent(depth + 1),
            describe_link(record.link.as_ref())
        ));
    }
    lines
}

// ============================================================================
// Folders
// ============================================================================

/// List every folder with its storage key and output bucket.
pub fn format_folders() -> Vec<String> {
    let mut lines = Vec::new();
    for (i, category) in FolderCategory::ALL.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), category.label()));
        lines.push(format!("{}Folder: {}", indent(1), category.key()));
        let bucket = category.bucket();
        if bucket.in_main_document() {
            lines.push(format!("{}Bucket: {}", indent(1), bucket.path()));
        } else {
            lines.push(format!("{}Bucket: {} (separate file)", indent(1), bucket.path()));
        }
        if !category.accepts_links() {
            lines.push(format!("{}Links: not accepted", indent(1)));
        }
    }
    lines
}

pub fn print_folders() {
    for line in format_folders() {
        println!("{}", line);
    }
}

// ============================================================================
// Setup
// ============================================================================

pub fn format_setup_output(wl_name: &str, response: &SetupResponse) -> Vec<String> {
    let mut lines = vec![format!("White label: {wl_name}")];
    for category in FolderCategory::ALL {
        lines.push(format!("{}{}/{}/", indent(1), response.base_path, category.key()));
    }
    lines.push(format!("Setup complete: {}", response.message));
    lines
}

pub fn print_setup_output(wl_name: &str, response: &SetupResponse) {
    for line in format_setup_output(wl_name, response) {
        println!("{}", line);
    }
}

// ============================================================================
// Upload
// ============================================================================

pub fn format_upload_output(category: FolderCategory, response: &UploadResponse) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        category.label(),
        count(response.files.len(), "image", "images")
    )];
    for (i, file) in response.files.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), file.filename));
        lines.push(format!("{}URL: {}", indent(1), file.url));
    }
    if !response.skipped.is_empty() {
        lines.push(format!("Skipped: {}", response.skipped.join(", ")));
    }
    lines
}

pub fn print_upload_output(category: FolderCategory, response: &UploadResponse) {
    for line in format_upload_output(category, response) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Summarize an assembled session: every non-empty bucket, then grid buttons.
pub fn format_check_output(session: &SessionState, assembly: &Assembly) -> Vec<String> {
    let mut lines = vec![format!("White label: {}", session.wl_name())];

    for category in FolderCategory::ALL {
        let bucket: Bucket = category.bucket();
        let records = assembly.records(bucket);
        if records.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{} ({})", bucket.path(), count(records.len(), "image", "images")));
        lines.extend(record_lines(records, 1));
    }

    let buttons = &assembly.document.grid_buttons;
    if !buttons.is_empty() {
        lines.push(String::new());
        lines.push(format!("gridButtons ({})", count(buttons.len(), "button", "buttons")));
        for (i, button) in buttons.iter().enumerate() {
            lines.push(format!(
                "{}{} {} (size {})",
                indent(1),
                format_index(i + 1),
                button.name,
                button.size
            ));
            lines.push(format!(
                "{}Link: {}",
                indent(2),
                describe_link(Some(&button.link))
            ));
        }
    }

    if session.image_count() == 0 && buttons.is_empty() {
        lines.push("Nothing uploaded yet".to_string());
    }
    lines
}

pub fn print_check_output(session: &SessionState, assembly: &Assembly) {
    for line in format_check_output(session, assembly) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_output(written: &[WrittenFile]) -> Vec<String> {
    written
        .iter()
        .map(|file| {
            let name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            format!(
                "{} ({}) → {}",
                name,
                count(file.entries, "entry", "entries"),
                file.path.display()
            )
        })
        .collect()
}

pub fn print_generate_output(written: &[WrittenFile]) {
    for line in format_generate_output(written) {
        println!("{}", line);
    }
}
