use clap::Parser;
use headless_gallery::{GalleryRenderer, RenderOutcome, RendererConfig};

/// Render the image gallery of a hosted page and print the resulting markup
#[derive(Parser, Debug)]
#[command(name = "headless-gallery", version, about)]
struct Args {
    /// URL of the hosting page
    page_url: String,

    /// Manifest location, resolved relative to the page URL
    #[arg(long, default_value = "data/images.json")]
    manifest_path: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 30000)]
    timeout_ms: u64,

    /// User agent sent with requests
    #[arg(long)]
    user_agent: Option<String>,

    /// Emit the render report and container markup as JSON
    #[arg(long)]
    json: bool,
}

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    report: &'a headless_gallery::RenderReport,
    container_html: Option<String>,
}

fn main() {
    let args = Args::parse();

    let mut config = RendererConfig {
        manifest_path: args.manifest_path,
        timeout_ms: args.timeout_ms,
        ..Default::default()
    };
    if let Some(ua) = args.user_agent {
        config.user_agent = ua;
    }

    let mut renderer = match GalleryRenderer::new(config) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("headless-gallery: {}", e);
            std::process::exit(1);
        }
    };

    match renderer.load_page(&args.page_url) {
        Ok(report) => {
            if args.json {
                let output = JsonOutput {
                    report: &report,
                    container_html: renderer.container_html(),
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output)
                        .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
                );
                return;
            }
            match &report.outcome {
                RenderOutcome::Rendered { items, skipped } => eprintln!(
                    "rendered {} item(s), {} skipped ({})",
                    items, skipped, report.manifest_url
                ),
                RenderOutcome::Fallback { reason } => {
                    eprintln!("gallery fallback shown: {}", reason)
                }
            }
            if let Some(html) = renderer.container_html() {
                println!("{}", html);
            }
        }
        Err(e) => {
            eprintln!("headless-gallery: {}", e);
            std::process::exit(1);
        }
    }
}
