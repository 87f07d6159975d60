//! Integration tests for the gallery renderer

use headless_gallery::{
    Error, GalleryList, GalleryRenderer, RenderOutcome, RendererConfig, ALT_PLACEHOLDER,
    FALLBACK_MESSAGE,
};
use std::sync::Once;
use tiny_http::{Response, Server};

static INIT: Once = Once::new();

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Bildergalerie</title></head>
<body>
<div class="gallery">
  <h1>Bildergalerie</h1>
  <ul class="results">
    <li class="result">Lade Galerie&hellip;</li>
  </ul>
</div>
</body>
</html>"#;

const PAGE_WITHOUT_GALLERY: &str = r#"<!DOCTYPE html>
<html>
<head><title>Keine Galerie</title></head>
<body><p>Hier gibt es nichts zu sehen.</p></body>
</html>"#;

/// Start the shared fixture server
fn start_test_server() -> String {
    INIT.call_once(|| {
        std::thread::spawn(|| {
            let server = Server::http("127.0.0.1:18091").unwrap();
            for request in server.incoming_requests() {
                let path = request.url().to_string();
                let response = match path.as_str() {
                    "/" => Response::from_string(PAGE),
                    "/nogallery" => Response::from_string(PAGE_WITHOUT_GALLERY),
                    "/data/images.json" => Response::from_string(
                        r#"[
                            {"file": "img/alpha.jpg", "title": "Alpha"},
                            {"file": "img/beta.jpg", "title": "Beta"},
                            {"file": "img/gamma.jpg", "title": "Gamma"}
                        ]"#,
                    ),
                    "/manifests/mixed.json" => Response::from_string(
                        r#"[
                            {"file": "img/first.jpg"},
                            null,
                            {},
                            {"file": ""},
                            {"title": "kein Bild"},
                            {"file": "img/last.jpg"}
                        ]"#,
                    ),
                    "/manifests/attrs.json" => Response::from_string(
                        r#"[
                            {"file": "a.jpg", "title": "Erstes Bild"},
                            {"file": "b.jpg"},
                            {"file": "c.jpg", "alt": "Nur Alt"},
                            {"file": "d.jpg", "title": "  Titel  ", "alt": ""}
                        ]"#,
                    ),
                    "/manifests/encode.json" => Response::from_string(
                        r#"[
                            {"file": "img/my photo #1.jpg"},
                            {"file": "img/straße.jpg"}
                        ]"#,
                    ),
                    "/manifests/empty.json" => Response::from_string("[]"),
                    "/manifests/notarray.json" => {
                        Response::from_string(r#"{"not": "an array"}"#)
                    }
                    _ => Response::from_string("Not Found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });
        // Give the server time to start
        std::thread::sleep(std::time::Duration::from_millis(100));
    });

    "http://127.0.0.1:18091".to_string()
}

fn renderer_for(manifest_path: &str) -> GalleryRenderer {
    let config = RendererConfig {
        manifest_path: manifest_path.to_string(),
        ..Default::default()
    };
    GalleryRenderer::new(config).expect("Failed to create renderer")
}

/// The `a` element of the nth rendered list item
fn nth_link(list: &GalleryList, n: usize) -> &headless_gallery::markup::Element {
    list.items()
        .nth(n)
        .and_then(|li| li.child_elements().next())
        .expect("list item without link")
}

/// The `img` element of the nth rendered list item
fn nth_image(list: &GalleryList, n: usize) -> &headless_gallery::markup::Element {
    nth_link(list, n)
        .child_elements()
        .next()
        .expect("link without image")
}

#[test]
fn rendered_items_preserve_manifest_order() {
    let base = start_test_server();

    let mut renderer = renderer_for("data/images.json");
    let report = renderer.load_page(&format!("{}/", base)).expect("load");

    assert_eq!(
        report.outcome,
        RenderOutcome::Rendered { items: 3, skipped: 0 }
    );

    let list = renderer.container().expect("container");
    assert_eq!(list.len(), 3);
    let hrefs: Vec<_> = (0..3).map(|n| nth_link(list, n).attr("href").unwrap()).collect();
    assert_eq!(hrefs, ["img/alpha.jpg", "img/beta.jpg", "img/gamma.jpg"]);
    for item in list.items() {
        assert_eq!(item.attr("class"), Some("result"));
    }
}

#[test]
fn descriptors_without_file_contribute_no_items() {
    let base = start_test_server();

    let mut renderer = renderer_for("manifests/mixed.json");
    let report = renderer.load_page(&format!("{}/", base)).expect("load");

    assert_eq!(
        report.outcome,
        RenderOutcome::Rendered { items: 2, skipped: 4 }
    );

    let list = renderer.container().expect("container");
    assert_eq!(list.len(), 2);
    assert_eq!(nth_link(list, 0).attr("href"), Some("img/first.jpg"));
    assert_eq!(nth_link(list, 1).attr("href"), Some("img/last.jpg"));
}

#[test]
fn link_title_attribute_follows_descriptor_title() {
    let base = start_test_server();

    let mut renderer = renderer_for("manifests/attrs.json");
    renderer.load_page(&format!("{}/", base)).expect("load");

    let list = renderer.container().expect("container");
    assert_eq!(nth_link(list, 0).attr("title"), Some("Erstes Bild"));
    assert_eq!(nth_link(list, 1).attr("title"), None);
    assert_eq!(nth_link(list, 2).attr("title"), None);
    // Titles are trimmed before use
    assert_eq!(nth_link(list, 3).attr("title"), Some("Titel"));
}

#[test]
fn alt_text_falls_back_to_title_then_placeholder() {
    let base = start_test_server();

    let mut renderer = renderer_for("manifests/attrs.json");
    renderer.load_page(&format!("{}/", base)).expect("load");

    let list = renderer.container().expect("container");
    assert_eq!(nth_image(list, 0).attr("alt"), Some("Erstes Bild"));
    assert_eq!(nth_image(list, 1).attr("alt"), Some(ALT_PLACEHOLDER));
    assert_eq!(nth_image(list, 2).attr("alt"), Some("Nur Alt"));
    // An explicitly empty alt stays empty
    assert_eq!(nth_image(list, 3).attr("alt"), Some(""));
}

#[test]
fn image_markup_is_lazy_and_async() {
    let base = start_test_server();

    let mut renderer = renderer_for("data/images.json");
    renderer.load_page(&format!("{}/", base)).expect("load");

    let list = renderer.container().expect("container");
    for n in 0..list.len() {
        let img = nth_image(list, n);
        assert_eq!(img.attr("loading"), Some("lazy"));
        assert_eq!(img.attr("decoding"), Some("async"));
    }
}

#[test]
fn file_paths_are_encoded_identically_in_link_and_image() {
    let base = start_test_server();

    let mut renderer = renderer_for("manifests/encode.json");
    renderer.load_page(&format!("{}/", base)).expect("load");

    let list = renderer.container().expect("container");
    assert_eq!(list.len(), 2);

    let href = nth_link(list, 0).attr("href").unwrap();
    let src = nth_image(list, 0).attr("src").unwrap();
    assert_eq!(href, "img/my%20photo%20#1.jpg");
    assert_eq!(href, src);

    let href = nth_link(list, 1).attr("href").unwrap();
    let src = nth_image(list, 1).attr("src").unwrap();
    assert_eq!(href, "img/stra%C3%9Fe.jpg");
    assert_eq!(href, src);
}

#[test]
fn http_error_shows_single_fallback_entry() {
    let base = start_test_server();

    let mut renderer = renderer_for("manifests/missing.json");
    let report = renderer.load_page(&format!("{}/", base)).expect("load");

    assert!(matches!(report.outcome, RenderOutcome::Fallback { .. }));
    if let RenderOutcome::Fallback { reason } = &report.outcome {
        assert!(reason.contains("404"), "unexpected reason: {}", reason);
    }

    let list = renderer.container().expect("container");
    assert_eq!(list.len(), 1);
    let item = list.items().next().unwrap();
    assert_eq!(item.attr("class"), Some("result"));
    assert_eq!(item.text(), FALLBACK_MESSAGE);
}

#[test]
fn non_array_payload_shows_single_fallback_entry() {
    let base = start_test_server();

    let mut renderer = renderer_for("manifests/notarray.json");
    renderer.load_page(&format!("{}/", base)).expect("load");

    let list = renderer.container().expect("container");
    assert_eq!(list.len(), 1);
    assert_eq!(list.items().next().unwrap().text(), FALLBACK_MESSAGE);
}

#[test]
fn empty_manifest_renders_empty_container() {
    let base = start_test_server();

    let mut renderer = renderer_for("manifests/empty.json");
    let report = renderer.load_page(&format!("{}/", base)).expect("load");

    assert_eq!(
        report.outcome,
        RenderOutcome::Rendered { items: 0, skipped: 0 }
    );

    let list = renderer.container().expect("container");
    assert!(list.is_empty());
    assert!(!list.to_html().contains(FALLBACK_MESSAGE));
}

#[test]
fn rendering_twice_does_not_accumulate_items() {
    let base = start_test_server();

    let mut renderer = renderer_for("data/images.json");
    renderer.load_page(&format!("{}/", base)).expect("load");
    let first = renderer.container_html().expect("html after first render");

    renderer.render().expect("second render");
    let second = renderer.container_html().expect("html after second render");

    assert_eq!(first, second);
    assert_eq!(renderer.container().unwrap().len(), 3);
}

#[test]
fn missing_container_aborts_without_rendering() {
    let base = start_test_server();

    let mut renderer = renderer_for("data/images.json");
    let err = renderer
        .load_page(&format!("{}/nogallery", base))
        .unwrap_err();

    assert!(matches!(err, Error::MissingContainer));
    assert!(renderer.container_html().is_none());
}

#[test]
fn manifest_url_is_resolved_against_page_url() {
    let base = start_test_server();

    let mut renderer = renderer_for("data/images.json");
    let report = renderer.load_page(&format!("{}/", base)).expect("load");

    assert_eq!(report.manifest_url, format!("{}/data/images.json", base));
}

#[test]
fn unreachable_page_is_a_load_error() {
    // Nothing listens on this port
    let mut renderer = renderer_for("data/images.json");
    let err = renderer.load_page("http://127.0.0.1:59123/").unwrap_err();
    assert!(matches!(err, Error::Load(_)));
}
