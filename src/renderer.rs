//! The gallery renderer.
//!
//! One render pass: locate the mount point in the host page, fetch the JSON
//! manifest, build one `<li class="result"><a><img></a></li>` per valid
//! descriptor into an off-container buffer, and attach the buffer in a single
//! operation. Any manifest failure clears the container and installs exactly
//! one fallback entry instead.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{Html, Selector};

use crate::error::{Error, Result};
use crate::manifest::{parse_manifest, ImageDescriptor, Manifest};
use crate::markup::{encode_uri, Element, Node};
use crate::{RenderOutcome, RenderReport, RendererConfig};

type OnRenderHandler = Arc<dyn Fn(&RenderReport) + Send + Sync>;

/// Structural selector for the gallery mount point
const GALLERY_LIST_SELECTOR: &str = "div.gallery ul.results";

/// User-facing entry installed when the manifest cannot be loaded
pub const FALLBACK_MESSAGE: &str = "Fehler beim Laden der Galerie. Bitte später erneut versuchen.";

/// The gallery mount point: the matched list element of the host page.
///
/// The renderer owns the only mutable handle to it between render passes;
/// each pass clears and repopulates the children as a unit, never merging.
#[derive(Debug, Clone)]
pub struct GalleryList {
    element: Element,
}

impl GalleryList {
    fn new(element: Element) -> Self {
        Self { element }
    }

    /// Number of child elements currently attached
    pub fn len(&self) -> usize {
        self.element.child_elements().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child elements in render order
    pub fn items(&self) -> impl Iterator<Item = &Element> {
        self.element.child_elements()
    }

    /// Serialize the list element and its children to HTML
    pub fn to_html(&self) -> String {
        self.element.to_html()
    }

    fn clear(&mut self) {
        self.element.clear_children();
    }

    fn attach(&mut self, nodes: Vec<Node>) {
        for node in nodes {
            self.element.push(node);
        }
    }
}

/// Headless image gallery renderer
///
/// # Example
///
/// ```no_run
/// use headless_gallery::{GalleryRenderer, RendererConfig};
///
/// # fn main() -> headless_gallery::Result<()> {
/// let mut renderer = GalleryRenderer::new(RendererConfig::default())?;
/// let report = renderer.load_page("http://localhost:8000/")?;
/// println!("{:?}", report.outcome);
/// println!("{}", renderer.container_html().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct GalleryRenderer {
    client: Client,
    config: RendererConfig,
    page_html: Option<String>,
    page_url: Option<String>,
    container: Option<GalleryList>,
    on_render: Option<OnRenderHandler>,
}

impl GalleryRenderer {
    /// Create a new renderer with the given configuration
    pub fn new(config: RendererConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Initialization(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            page_html: None,
            page_url: None,
            container: None,
            on_render: None,
        })
    }

    /// Fetch the host page and run one render pass against it.
    ///
    /// Rendering is triggered automatically once the page is available, the
    /// way the original page-ready hook fires once per page lifecycle.
    pub fn load_page(&mut self, url: &str) -> Result<RenderReport> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", self.config.user_agent.clone())
            .send()
            .map_err(|e| Error::Load(format!("failed to fetch {}: {}", url, e)))?;

        let body = resp
            .text()
            .map_err(|e| Error::Load(format!("failed to read response body: {}", e)))?;

        self.install_page(body, url)
    }

    /// Use an already-obtained host document instead of fetching one.
    ///
    /// `base_url` is what relative manifest and image paths resolve against.
    pub fn load_page_html(&mut self, html: &str, base_url: &str) -> Result<RenderReport> {
        self.install_page(html.to_string(), base_url)
    }

    fn install_page(&mut self, html: String, url: &str) -> Result<RenderReport> {
        self.page_html = Some(html);
        self.page_url = Some(url.to_string());
        self.container = None;
        self.render()
    }

    /// Run one full render pass.
    ///
    /// Re-running against the same page and manifest yields the same container
    /// contents; previous items never accumulate.
    pub fn render(&mut self) -> Result<RenderReport> {
        if self.page_url.is_none() {
            return Err(Error::PageNotLoaded);
        }

        let mut list = match self.container.take() {
            Some(list) => list,
            None => {
                let html = self.page_html.as_deref().ok_or(Error::PageNotLoaded)?;
                match locate_gallery_list(html) {
                    Some(list) => list,
                    None => {
                        log::error!(
                            "gallery list ({}) not found in page",
                            GALLERY_LIST_SELECTOR
                        );
                        return Err(Error::MissingContainer);
                    }
                }
            }
        };

        let manifest_url = self.manifest_url();
        let outcome = match self.fetch_manifest(&manifest_url) {
            Ok(manifest) => {
                // The container is only touched once the payload has been
                // fetched and validated.
                list.clear();
                let mut buffer: Vec<Node> = Vec::with_capacity(manifest.entries.len());
                for desc in &manifest.entries {
                    buffer.push(Node::Element(build_result_item(desc)));
                }
                let items = buffer.len();
                list.attach(buffer);
                log::debug!(
                    "rendered {} gallery item(s) from {} ({} skipped)",
                    items,
                    manifest_url,
                    manifest.skipped
                );
                RenderOutcome::Rendered {
                    items,
                    skipped: manifest.skipped,
                }
            }
            Err(err) => {
                log::error!("failed to load gallery manifest from {}: {}", manifest_url, err);
                list.clear();
                list.attach(vec![Node::Element(fallback_item())]);
                RenderOutcome::Fallback {
                    reason: err.to_string(),
                }
            }
        };

        self.container = Some(list);
        let report = RenderReport {
            manifest_url,
            outcome,
        };

        if let Some(cb) = &self.on_render {
            cb(&report);
        }

        Ok(report)
    }

    /// Register a callback invoked with the report of every render pass
    pub fn on_render<F>(&mut self, cb: F)
    where
        F: Fn(&RenderReport) + Send + Sync + 'static,
    {
        self.on_render = Some(Arc::new(cb));
    }

    /// Remove a previously registered on_render callback if any
    pub fn clear_on_render(&mut self) {
        self.on_render = None;
    }

    /// The gallery list as left by the last render pass
    pub fn container(&self) -> Option<&GalleryList> {
        self.container.as_ref()
    }

    /// Serialized HTML of the gallery list, if a render pass has run
    pub fn container_html(&self) -> Option<String> {
        self.container.as_ref().map(GalleryList::to_html)
    }

    fn manifest_url(&self) -> String {
        let base = self.page_url.as_deref().unwrap_or_default();
        if let Ok(base) = url::Url::parse(base) {
            base.join(&self.config.manifest_path)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| self.config.manifest_path.clone())
        } else {
            self.config.manifest_path.clone()
        }
    }

    fn fetch_manifest(&self, manifest_url: &str) -> Result<Manifest> {
        let mut request = self
            .client
            .get(manifest_url)
            .header("User-Agent", self.config.user_agent.clone())
            // Mirror of the original's cache bypass on the manifest request
            .header("Cache-Control", "no-store");
        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let resp = request
            .send()
            .map_err(|e| Error::Network(format!("failed to fetch {}: {}", manifest_url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| Error::Network(format!("failed to read response body: {}", e)))?;

        parse_manifest(&body)
    }
}

fn locate_gallery_list(html: &str) -> Option<GalleryList> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(GALLERY_LIST_SELECTOR).unwrap();
    document
        .select(&selector)
        .next()
        .map(|node| GalleryList::new(Element::from_element_ref(node)))
}

/// Build the `li.result > a > img` subtree for one descriptor.
///
/// Link target and image source carry the identically encoded file path; the
/// image is marked for lazy loading and asynchronous decoding.
pub fn build_result_item(desc: &ImageDescriptor) -> Element {
    let target = encode_uri(&desc.file);
    let title = desc.display_title();

    let mut img = Element::new("img");
    img.set_attr("src", &target);
    img.set_attr("alt", desc.display_alt());
    img.set_attr("loading", "lazy");
    img.set_attr("decoding", "async");

    let mut link = Element::new("a");
    link.set_attr("href", &target);
    if !title.is_empty() {
        link.set_attr("title", title);
    }
    link.push(Node::Element(img));

    let mut item = Element::new("li");
    item.set_attr("class", "result");
    item.push(Node::Element(link));
    item
}

fn fallback_item() -> Element {
    let mut item = Element::new("li");
    item.set_attr("class", "result");
    item.push(Node::Text(FALLBACK_MESSAGE.to_string()));
    item
}
