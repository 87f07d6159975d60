//! Manifest decoding.
//!
//! The gallery manifest is a UTF-8 JSON array of descriptor objects:
//! `[{"file": "img/a.jpg", "title": "...", "alt": "..."}, ...]`. Only `file`
//! is required; unrecognized fields are ignored. Entries without a usable
//! `file` are skipped, not treated as errors. Array order is render order.

use serde_json::Value;

use crate::error::{Error, Result};

/// Alt text used when a descriptor carries neither `alt` nor `title`.
pub const ALT_PLACEHOLDER: &str = "Bild";

/// A single validated manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Relative path to the image resource
    pub file: String,
    /// Optional human-readable title
    pub title: Option<String>,
    /// Optional alt text; falls back to `title`, then [`ALT_PLACEHOLDER`]
    pub alt: Option<String>,
}

impl ImageDescriptor {
    /// Trimmed title, or the empty string when absent
    pub fn display_title(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or("")
    }

    /// Trimmed alt text, falling back to the title and then the placeholder
    pub fn display_alt(&self) -> &str {
        if let Some(alt) = self.alt.as_deref() {
            return alt.trim();
        }
        let title = self.display_title();
        if title.is_empty() {
            ALT_PLACEHOLDER
        } else {
            title
        }
    }
}

/// Decoded manifest: ordered descriptors plus the count of skipped entries
#[derive(Debug, Clone)]
pub struct Manifest {
    pub entries: Vec<ImageDescriptor>,
    pub skipped: usize,
}

/// Decode a manifest body.
///
/// The top-level value must be a JSON array; anything else is a format error.
/// Individual entries that are not objects or lack a non-empty `file` are
/// skipped and counted in [`Manifest::skipped`].
pub fn parse_manifest(body: &str) -> Result<Manifest> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| Error::Format(format!("invalid JSON: {}", e)))?;

    let items = value
        .as_array()
        .ok_or_else(|| Error::Format("expected a JSON array of image descriptors".to_string()))?;

    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for item in items {
        match descriptor_from_value(item) {
            Some(desc) => entries.push(desc),
            None => skipped += 1,
        }
    }

    Ok(Manifest { entries, skipped })
}

// Non-string `title`/`alt` values are treated as absent; only a missing or
// empty `file` disqualifies the entry.
fn descriptor_from_value(value: &Value) -> Option<ImageDescriptor> {
    let obj = value.as_object()?;
    let file = obj.get("file")?.as_str()?;
    if file.is_empty() {
        return None;
    }
    Some(ImageDescriptor {
        file: file.to_string(),
        title: obj.get("title").and_then(Value::as_str).map(str::to_string),
        alt: obj.get("alt").and_then(Value::as_str).map(str::to_string),
    })
}
