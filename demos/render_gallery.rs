//! Render a hosted gallery page and print the resulting list markup.
//!
//! Serve a page containing `div.gallery ul.results` plus its
//! `data/images.json` manifest, then:
//!
//! ```sh
//! cargo run --example render_gallery http://localhost:8000/
//! ```

use headless_gallery::{GalleryRenderer, RendererConfig};

fn main() -> headless_gallery::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8000/".to_string());

    let mut renderer = GalleryRenderer::new(RendererConfig::default())?;
    renderer.on_render(|report| eprintln!("render pass: {:?}", report.outcome));

    renderer.load_page(&url)?;
    if let Some(html) = renderer.container_html() {
        println!("{}", html);
    }
    Ok(())
}
