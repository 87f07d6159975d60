//! Headless Gallery
//!
//! A headless image gallery renderer: load a hosting HTML page, fetch its
//! JSON image manifest, and populate the page's gallery list with
//! link-wrapped, lazily-loaded image markup.
//!
//! The renderer works on an in-memory node tree instead of a live browser
//! DOM, so the same render semantics are available to server-side tooling,
//! tests, and static generators: locate `div.gallery ul.results`, fetch
//! `data/images.json` (cache bypassed), validate the payload, then clear and
//! repopulate the list in one operation. Any manifest failure replaces the
//! list contents with a single fallback entry.
//!
//! # Example
//!
//! ```no_run
//! use headless_gallery::{GalleryRenderer, RendererConfig};
//!
//! # fn main() -> headless_gallery::Result<()> {
//! let config = RendererConfig {
//!     manifest_path: "data/images.json".to_string(),
//!     timeout_ms: 10_000,
//!     ..Default::default()
//! };
//!
//! let mut renderer = GalleryRenderer::new(config)?;
//! let report = renderer.load_page("http://localhost:8000/")?;
//! println!("{:?}", report.outcome);
//! println!("{}", renderer.container_html().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use serde::Serialize;

pub mod error;
pub use error::{Error, Result};

pub mod manifest;
pub mod markup;
pub mod renderer;

// Re-export the renderer surface at the crate root for ergonomic use
pub use manifest::{ImageDescriptor, Manifest, ALT_PLACEHOLDER};
pub use renderer::{GalleryList, GalleryRenderer, FALLBACK_MESSAGE};

/// Configuration for the gallery renderer
///
/// The defaults mirror the original deployment: the manifest lives at
/// `data/images.json` relative to the page URL, and requests identify
/// themselves with a browser-compatible user agent.
///
/// # Examples
///
/// ```
/// let cfg = headless_gallery::RendererConfig::default();
/// assert_eq!(cfg.manifest_path, "data/images.json");
/// ```
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// User agent string to send with requests
    pub user_agent: String,
    /// Timeout for page and manifest requests in milliseconds
    pub timeout_ms: u64,
    /// Manifest location, resolved relative to the page URL
    pub manifest_path: String,
    /// Custom HTTP headers added to the manifest request
    pub headers: HashMap<String, String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            user_agent:
                "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/115.0 HeadlessGallery/0.1"
                    .to_string(),
            timeout_ms: 30000,
            manifest_path: "data/images.json".to_string(),
            headers: HashMap::new(),
        }
    }
}

/// Result surface of one render pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    /// Fully resolved manifest URL the pass fetched
    pub manifest_url: String,
    /// What ended up in the container
    pub outcome: RenderOutcome,
}

/// What a render pass left in the gallery list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOutcome {
    /// The manifest was valid; the container holds one item per descriptor
    Rendered {
        /// Items attached to the container
        items: usize,
        /// Manifest entries skipped for lacking a usable `file`
        skipped: usize,
    },
    /// The manifest could not be loaded; the container holds the fallback entry
    Fallback {
        /// Display form of the underlying error
        reason: String,
    },
}
