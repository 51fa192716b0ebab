//! Grid buttons: operator drafts and the validation gate that turns them into
//! [`GridButton`]s.
//!
//! A draft carries the link as a `(urlType, url)` pair. Accepting it moves
//! the url under `internalUrl` or `externalUrl` and drops both draft fields.
//! The button list is append-only; [`add_grid_button`] returns a new list and
//! leaves the current one untouched, whether or not the draft is accepted.

use crate::error::ValidationError;
use crate::types::{GridButton, Link, UrlType};
use serde::Deserialize;

/// Size used when the entered size is not a usable integer.
pub const DEFAULT_SIZE: i64 = 25;

/// Size as the operator typed it: a JSON number or free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SizeInput {
    Number(i64),
    Float(f64),
    Text(String),
}

impl Default for SizeInput {
    fn default() -> Self {
        SizeInput::Number(DEFAULT_SIZE)
    }
}

impl SizeInput {
    /// Resolve to a size, falling back to [`DEFAULT_SIZE`] for text without a
    /// leading integer and for zero. Fractions are truncated toward zero.
    pub fn resolve(&self) -> i64 {
        let parsed = match self {
            SizeInput::Number(n) => Some(*n),
            SizeInput::Float(f) => truncate(*f),
            SizeInput::Text(text) => leading_integer(text),
        };
        match parsed {
            Some(n) if n != 0 => n,
            _ => DEFAULT_SIZE,
        }
    }
}

/// Integer part of `f`, if it fits in an `i64`.
fn truncate(f: f64) -> Option<i64> {
    let t = f.trunc();
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

/// Parse the integer prefix of `text`: `" 30px"` → 30, `"-4"` → -4, `"px"` → None.
fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..sign_len + digits_len].parse().ok()
}

/// A grid button as entered, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GridButtonDraft {
    pub name: String,
    pub image: String,
    pub url_type: UrlType,
    pub url: String,
    pub size: SizeInput,
}

impl GridButtonDraft {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        url_type: UrlType,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            url_type,
            url: url.into(),
            size: SizeInput::default(),
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("image", &self.image),
            ("url", &self.url),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Validate the draft into a button.
    pub fn into_button(self) -> Result<GridButton, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::IncompleteGridButton(missing));
        }
        let size = self.size.resolve();
        Ok(GridButton {
            name: self.name,
            image: self.image,
            size,
            link: Link::new(self.url_type, self.url),
        })
    }
}

/// Append a validated draft to `current`, returning the new list.
pub fn add_grid_button(
    current: &[GridButton],
    draft: GridButtonDraft,
) -> Result<Vec<GridButton>, ValidationError> {
    let button = draft.into_button()?;
    let mut buttons = Vec::with_capacity(current.len() + 1);
    buttons.extend_from_slice(current);
    buttons.push(button);
    Ok(buttons)
}
