// HTTP Server Task - Serviert die Weboberfläche und den aktuellen Zustand
use alloc::string::String;
use defmt::info;
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::response::{IntoResponse, Response, StatusCode};
use picoserve::routing::get;

use light_core::protocol::encode_state;

use crate::config::*;
use crate::current_state;
use crate::web::INDEX_HTML;

/// Timeouts für HTTP- und WebSocket-Server
pub(crate) fn server_config() -> picoserve::Config<Duration> {
    picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive()
}

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// - `GET /` liefert die generierte index.html
/// - `GET /state` liefert den aktuellen Zustand als JSON
///
/// **Task Pool:** `HTTP_WORKERS` Instanzen, damit Seite und Zustand
/// gleichzeitig geladen werden können.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
#[embassy_executor::task(pool_size = HTTP_WORKERS)]
pub async fn http_server_task(task_id: usize, stack: &'static Stack<'static>) {
    info!(
        "HTTP: Server task {} starting on port {}...",
        task_id, HTTP_SERVER_PORT
    );

    let app = picoserve::Router::new()
        .route("/", get(serve_html))
        .route("/state", get(serve_state));

    let config = server_config();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(
            task_id,
            *stack,
            HTTP_SERVER_PORT,
            &mut rx_buffer,
            &mut tx_buffer,
        )
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// Serviert die HTML-Hauptseite
async fn serve_html() -> impl IntoResponse {
    Response::new(StatusCode::OK, INDEX_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// Serviert den aktuellen Licht-Zustand als JSON
async fn serve_state() -> impl IntoResponse {
    let mut json_buffer = [0u8; JSON_BUFFER_SIZE];
    let json = encode_state(&current_state(), &mut json_buffer)
        .ok()
        .and_then(|len| core::str::from_utf8(&json_buffer[..len]).ok());

    let (status, content_type, body) = match json {
        Some(json) => (StatusCode::OK, "application/json", String::from(json)),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "text/plain",
            String::from("State encoding failed"),
        ),
    };

    Response::new(status, body).with_header("Content-Type", content_type)
}
