//! Integration Tests für die generierte Weboberfläche
//!
//! Prüft das echte Template der Firmware, so wie build.rs es rendert.

use light_core::web::{TemplateError, WEBSOCKET_PORT_PLACEHOLDER, render_index_html};

const INDEX_TEMPLATE: &str = include_str!("../../light-firmware/src/web/index.html");

fn render(port: u16) -> String {
    let mut html = String::new();
    render_index_html(INDEX_TEMPLATE, port, &mut html).unwrap();
    html
}

#[test]
fn test_template_has_placeholder_in_websocket_url() {
    assert!(INDEX_TEMPLATE.contains("ws://${location.hostname}:{{WEBSOCKET_PORT}}/"));
}

#[test]
fn test_default_port_rendered() {
    let html = render(81);

    assert!(html.contains("ws://${location.hostname}:81/"));
    assert!(!html.contains(WEBSOCKET_PORT_PLACEHOLDER));
    assert!(!html.contains("{{"));
}

#[test]
fn test_custom_port_rendered() {
    let html = render(8081);

    assert!(html.contains(":8081/"));
    assert!(!html.contains(":81/"));
}

#[test]
fn test_rest_of_page_unchanged() {
    let html = render(81);
    assert_eq!(
        html.len(),
        INDEX_TEMPLATE.len() - WEBSOCKET_PORT_PLACEHOLDER.len() + "81".len()
    );
    assert!(html.contains("fetch('/state')"));
}

#[test]
fn test_template_without_placeholder_rejected() {
    let mut html = String::new();
    assert_eq!(
        render_index_html("<html></html>", 81, &mut html),
        Err(TemplateError::MissingPlaceholder)
    );
}
