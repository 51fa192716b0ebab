//! Filename handling for uploads.
//!
//! Uploaded files keep their own name inside the folder, so the name becomes
//! part of an object key and of the CDN URL. Before that it is reduced to a
//! safe ASCII form:
//!
//! - `My Banner (1).png` → `My_Banner_1.png`
//! - `../../etc/passwd` → `etc_passwd`
//! - `promoção.jpg` → `promocao.jpg`
//!
//! Only images with an allowed extension are uploaded; everything else is
//! skipped without error.
//!
//! The white label name is a path segment too (of every key and of the
//! generated file names), so it is checked with [`wl_name`] before use.

use crate::error::ValidationError;
use deunicode::deunicode;
use std::path::Path;

/// Reduce a client-supplied filename to `[A-Za-z0-9_.-]`.
///
/// Accented letters are transliterated first (`ç` → `c`). Path separators
/// turn into word breaks, other characters outside the set are dropped,
/// whitespace runs become a single `_`, and leading/trailing `.` and `_` are
/// trimmed. May return an empty string.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = deunicode(name)
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Lowercased extension of `name`, if it has one.
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Whether `name` ends in one of `allowed` (case-insensitive).
pub fn is_allowed(name: &str, allowed: &[String]) -> bool {
    extension(name).is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
}

/// Trim and check a white label name.
///
/// Rejects an empty name and any name that could leave its namespace: path
/// separators and `..`.
pub fn wl_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingWlName);
    }
    if trimmed.contains(['/', '\\']) || trimmed.contains("..") {
        return Err(ValidationError::InvalidWlName(trimmed.to_string()));
    }
    Ok(trimmed)
}

/// The final path component of `path` as a string, if it is valid UTF-8.
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        ["png", "jpg", "jpeg", "gif", "webp"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn plain_name_is_unchanged() {
        assert_eq!(secure_filename("banner-01.png"), "banner-01.png");
    }

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(secure_filename("My Banner (1).png"), "My_Banner_1.png");
        assert_eq!(secure_filename("a   b.png"), "a_b.png");
    }

    #[test]
    fn path_components_are_flattened() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\images\\logo.png"), "C_images_logo.png");
    }

    #[test]
    fn accented_letters_are_transliterated() {
        assert_eq!(secure_filename("promoção.jpg"), "promocao.jpg");
        assert_eq!(secure_filename("çã.png"), "ca.png");
        assert_eq!(secure_filename("Férias de Verão.PNG"), "Ferias_de_Verao.PNG");
    }

    #[test]
    fn leading_dots_and_underscores_are_trimmed() {
        assert_eq!(secure_filename(".hidden.png"), "hidden.png");
        assert_eq!(secure_filename("__init__.png"), "init__.png");
    }

    #[test]
    fn unusable_name_becomes_empty() {
        assert_eq!(secure_filename("../"), "");
        assert_eq!(secure_filename("(*)"), "");
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension("Photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension("README"), None);
    }

    #[test]
    fn allowed_extensions_are_case_insensitive() {
        let allowed = allowed();
        assert!(is_allowed("a.PNG", &allowed));
        assert!(is_allowed("a.webp", &allowed));
        assert!(!is_allowed("a.svg", &allowed));
        assert!(!is_allowed("png", &allowed));
    }

    #[test]
    fn wl_name_is_trimmed() {
        assert_eq!(wl_name("  acme "), Ok("acme"));
        assert_eq!(wl_name("acme-br.v2"), Ok("acme-br.v2"));
    }

    #[test]
    fn wl_name_rejects_empty_and_path_like_names() {
        assert_eq!(wl_name("   "), Err(ValidationError::MissingWlName));
        for bad in ["../escaped", "a/b", "a\\b", "..", "acme.."] {
            assert_eq!(
                wl_name(bad),
                Err(ValidationError::InvalidWlName(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn file_name_takes_last_component() {
        assert_eq!(file_name(Path::new("dir/sub/a.png")), Some("a.png"));
        assert_eq!(file_name(Path::new("/")), None);
    }
}
