//! End-to-end analysis scenarios against a mock site

use crate::support::{build_analyzer, test_config, unreachable_runner, FakeBrowser};
use serde_json::{json, Value};
use site_lens::audit::{AccessibilityResult, PerformanceResult};
use site_lens::render::{ColorPalette, MAX_PALETTE_COLORS};
use site_lens::{AnalysisOutcome, AnalysisRequest};
use std::sync::atomic::Ordering;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHOP_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Acme Widgets</title>
    <meta name="description" content="Hand-made widgets shipped worldwide.">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta property="og:site_name" content="Acme">
    <link rel="canonical" href="https://acme.example/">
    <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
</head>
<body>
    <h1>Widgets for everyone</h1>
    <h2>Catalog</h2>
    <p>Widgets widgets widgets. Every widget is tested by hand before shipping.</p>
    <img src="/hero.png" alt="A widget">
    <img src="/banner.png">
    <a href="/catalog">Catalog</a>
    <a href="https://twitter.com/acme">Twitter</a>
    <a href="https://www.linkedin.com/company/acme">LinkedIn</a>
</body>
</html>"#;

async fn mount_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_analysis_of_mock_site() {
    let server = MockServer::start().await;
    mount_page(&server, SHOP_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset></urlset>"))
        .mount(&server)
        .await;

    let config = test_config();
    let browser = FakeBrowser::working(&["rgb(17, 17, 17)", "rgb(255, 255, 255)"]);
    let runner = unreachable_runner();
    let analyzer = build_analyzer(&config, &browser, &runner);

    let outcome = analyzer.analyze(&server.uri()).await;
    let report = outcome.report().expect("report expected");

    assert_eq!(report.url, format!("{}/", server.uri()));
    assert_eq!(report.html_metrics.title, "Acme Widgets");
    assert_eq!(report.html_metrics.h1_count, 1);
    assert_eq!(report.html_metrics.h2_count, 1);
    assert_eq!(report.html_metrics.image_count, 2);
    assert_eq!(report.html_metrics.images_missing_alt, 1);
    assert_eq!(report.html_metrics.lang.as_deref(), Some("en"));
    assert!(report.html_metrics.viewport_present);
    assert_eq!(report.html_metrics.structured_data_count, 1);

    assert!(report.site_signals.robots_txt_present);
    assert!(report.site_signals.crawl_allowed);
    assert_eq!(
        report.site_signals.sitemap_url,
        Some(format!("{}/sitemap.xml", server.uri()))
    );

    assert_eq!(report.keywords.first().map(String::as_str), Some("widgets"));
    assert_eq!(report.social_links.len(), 2);

    assert_eq!(report.accessibility.violation_count, 1);
    assert_eq!(report.accessibility.violation_details[0].id, "html-has-lang");
    assert_eq!(report.colors.palette.len(), 2);
    assert!(report.colors.primary_contrast > 18.0);

    // No browser for the page-speed audit, so it reports zeros
    assert_eq!(report.performance, PerformanceResult::default());
    assert_eq!(runner.calls.load(Ordering::SeqCst), 0);

    assert_eq!(browser.launches(), 1);
    assert_eq!(browser.shutdowns(), 1);
}

#[tokio::test]
async fn test_report_json_shape() {
    let server = MockServer::start().await;
    mount_page(&server, SHOP_PAGE).await;

    let config = test_config();
    let browser = FakeBrowser::working(&["#000000"]);
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;

    let value: Value = serde_json::from_str(&outcome.to_json_pretty().unwrap()).unwrap();
    let object = value.as_object().expect("object");
    for key in [
        "schemaVersion",
        "url",
        "htmlMetrics",
        "metadata",
        "siteSignals",
        "accessibility",
        "performance",
        "keywords",
        "colors",
        "socialLinks",
        "analyzedAt",
    ] {
        assert!(object.contains_key(key), "missing section {}", key);
    }
    assert!(!object.contains_key("error"));
    assert_eq!(value["schemaVersion"], json!(1));
    assert_eq!(value["performance"]["measured"], json!(false));
    assert_eq!(value["colors"]["primaryContrast"], json!(0.0));
}

#[tokio::test]
async fn test_fetch_failure_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config();
    let browser = FakeBrowser::working(&[]);
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;

    assert_eq!(outcome, AnalysisOutcome::fetch_failed());
    let value: Value = serde_json::from_str(&outcome.to_json_pretty().unwrap()).unwrap();
    assert_eq!(value, json!({"error": "Page could not be fetched"}));
    assert_eq!(browser.launches(), 0);
    assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_failure_on_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>gone</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config();
    let browser = FakeBrowser::working(&[]);
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;

    assert!(!outcome.is_report());
    assert_eq!(browser.launches(), 0);
}

#[tokio::test]
async fn test_fetch_failure_on_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = test_config();
    config.fetcher.timeout_secs = 1;
    let browser = FakeBrowser::working(&[]);
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;

    assert_eq!(outcome, AnalysisOutcome::fetch_failed());
    assert_eq!(browser.launches(), 0);
}

#[tokio::test]
async fn test_browser_launch_failure_keeps_report() {
    let server = MockServer::start().await;
    mount_page(&server, SHOP_PAGE).await;

    let config = test_config();
    let browser = FakeBrowser::broken();
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;
    let report = outcome.report().expect("report expected");

    assert_eq!(report.accessibility, AccessibilityResult::default());
    assert_eq!(report.colors, ColorPalette::default());
    assert_eq!(report.html_metrics.title, "Acme Widgets");
    assert!(!report.keywords.is_empty());
}

#[tokio::test]
async fn test_robots_sitemap_directive_wins() {
    let server = MockServer::start().await;
    mount_page(&server, SHOP_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: *\nDisallow: /\nSitemap: https://cdn.acme.example/map.xml\n",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config();
    let browser = FakeBrowser::working(&[]);
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;
    let signals = &outcome.report().expect("report expected").site_signals;

    assert!(signals.robots_txt_present);
    assert!(!signals.crawl_allowed);
    assert_eq!(
        signals.sitemap_url.as_deref(),
        Some("https://cdn.acme.example/map.xml")
    );
}

#[tokio::test]
async fn test_missing_robots_and_sitemap() {
    let server = MockServer::start().await;
    mount_page(&server, "<html><body><p>plain</p></body></html>").await;

    let config = test_config();
    let browser = FakeBrowser::working(&[]);
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;
    let report = outcome.report().expect("report expected");

    assert!(!report.site_signals.robots_txt_present);
    assert!(report.site_signals.crawl_allowed);
    assert_eq!(report.site_signals.sitemap_url, None);
    assert_eq!(report.html_metrics.image_count, 0);
    assert_eq!(report.html_metrics.images_missing_alt, 0);
}

#[tokio::test]
async fn test_palette_is_capped() {
    let server = MockServer::start().await;
    mount_page(&server, SHOP_PAGE).await;

    let colors: Vec<String> = (0..15).map(|i| format!("rgb({}, 0, 0)", i * 10)).collect();
    let color_refs: Vec<&str> = colors.iter().map(String::as_str).collect();

    let config = test_config();
    let browser = FakeBrowser::working(&color_refs);
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;
    let palette = &outcome.report().expect("report expected").colors.palette;

    assert_eq!(palette.len(), MAX_PALETTE_COLORS);
    assert_eq!(palette[0], "rgb(0, 0, 0)");
}

#[tokio::test]
async fn test_disabled_branches() {
    let server = MockServer::start().await;
    mount_page(&server, SHOP_PAGE).await;

    let mut config = test_config();
    config.render.enabled = false;
    config.performance.enabled = false;
    let browser = FakeBrowser::working(&["#fff", "#000"]);
    let runner = unreachable_runner();
    let outcome = build_analyzer(&config, &browser, &runner)
        .analyze(&server.uri())
        .await;
    let report = outcome.report().expect("report expected");

    assert_eq!(report.accessibility, AccessibilityResult::default());
    assert_eq!(report.colors, ColorPalette::default());
    assert_eq!(browser.launches(), 0);
}

#[tokio::test]
async fn test_static_sections_are_stable_across_runs() {
    let server = MockServer::start().await;
    mount_page(&server, SHOP_PAGE).await;

    let config = test_config();
    let browser = FakeBrowser::working(&["#000000", "#ffffff"]);
    let runner = unreachable_runner();
    let analyzer = build_analyzer(&config, &browser, &runner);

    let first = analyzer.analyze(&server.uri()).await;
    let second = analyzer.analyze(&server.uri()).await;
    let (first, second) = (first.report().unwrap(), second.report().unwrap());

    assert_eq!(first.html_metrics, second.html_metrics);
    assert_eq!(first.metadata, second.metadata);
    assert_eq!(first.keywords, second.keywords);
    assert_eq!(first.social_links, second.social_links);
    assert_eq!(browser.launches(), 2);
    assert_eq!(browser.shutdowns(), 2);
}

#[test]
fn test_scheme_is_added_to_bare_host() {
    let request = AnalysisRequest::new("example.com").unwrap();
    assert_eq!(request.target_url().as_str(), "https://example.com/");
    assert_eq!(
        request.robots_url().as_str(),
        "https://example.com/robots.txt"
    );
}
