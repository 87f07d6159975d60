//! Error types for the gallery renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a page or rendering the gallery
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the renderer
    #[error("Renderer initialization failed: {0}")]
    Initialization(String),

    /// Failed to load the host page
    #[error("Failed to load page: {0}")]
    Load(String),

    /// A render was requested before any page was loaded
    #[error("No page loaded")]
    PageNotLoaded,

    /// The host page has no gallery list element to render into
    #[error("Gallery list (div.gallery ul.results) not found in page")]
    MissingContainer,

    /// Transport-level failure while fetching the manifest
    #[error("Network error: {0}")]
    Network(String),

    /// The manifest request completed with a non-success status
    #[error("HTTP error: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// The manifest body is not a JSON array of descriptors
    #[error("Unexpected manifest format: {0}")]
    Format(String),
}
