// WebSocket Server Task - Bidirektionale Steuerung aus dem Browser
use core::future::pending;
use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use picoserve::response::{IntoResponse, Response, StatusCode, WebSocketUpgrade, ws};
use picoserve::{io::embedded_io_async, routing::get};

use light_core::protocol::{decode_command, encode_ws_error, encode_ws_state, error_message};

use super::http::server_config;
use crate::config::*;
use crate::{LightCommandSender, LightState, LightStateChannel, LightStateSubscriber, current_state};

/// Response-Enum für den WebSocket-Endpoint
/// Entweder Upgrade oder HTTP 503, falls `subscriber()` keinen Slot liefert
enum WebSocketResponse {
    Upgrade(
        ws::UpgradedWebSocket<ws::UnspecifiedProtocol, ws::CallbackNotUsingState<WebSocketHandler>>,
    ),
    ServiceUnavailable,
}

impl IntoResponse for WebSocketResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            WebSocketResponse::Upgrade(ws) => ws.write_to(connection, response_writer).await,
            WebSocketResponse::ServiceUnavailable => {
                Response::new(
                    StatusCode::new(503),
                    "Service Unavailable: Too many WebSocket connections",
                )
                .with_header("Retry-After", "5")
                .write_to(connection, response_writer)
                .await
            }
        }
    }
}

/// WebSocket Server Task - läuft parallel zu anderen Tasks
///
/// Lauscht auf `WEBSOCKET_PORT`. Jede Instanz bedient genau eine Verbindung,
/// daher bestimmt `WEBSOCKET_WORKERS` die maximale Anzahl Browser-Clients.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `state_channel`: PubSub Channel, pro Verbindung wird ein Subscriber erstellt
/// - `command_sender`: Channel Sender für Kommandos an den Light-Task
#[embassy_executor::task(pool_size = WEBSOCKET_WORKERS)]
pub async fn websocket_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    state_channel: &'static LightStateChannel,
    command_sender: LightCommandSender,
) {
    info!(
        "WS: Server task {} starting on port {}...",
        task_id, WEBSOCKET_PORT
    );

    let app = picoserve::Router::new().route(
        "/",
        get(move |upgrade: WebSocketUpgrade| async move {
            // Jeder Worker hält höchstens einen Slot (STATE_SUBSCRIBERS)
            match state_channel.subscriber() {
                Ok(state_subscriber) => {
                    info!("WS: Upgrade requested, subscriber created");
                    WebSocketResponse::Upgrade(upgrade.on_upgrade(WebSocketHandler {
                        command_sender,
                        state_subscriber,
                    }))
                }
                Err(_) => {
                    warn!("WS: No subscriber slots available, sending HTTP 503");
                    WebSocketResponse::ServiceUnavailable
                }
            }
        }),
    );

    let config = server_config();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(
            task_id,
            *stack,
            WEBSOCKET_PORT,
            &mut rx_buffer,
            &mut tx_buffer,
        )
        .await;

    info!("WS: Server task {} ended", task_id);
}

/// WebSocket-Handler State
struct WebSocketHandler {
    command_sender: LightCommandSender,
    state_subscriber: LightStateSubscriber,
}

impl ws::WebSocketCallback for WebSocketHandler {
    async fn run<R: embedded_io_async::Read, W: embedded_io_async::Write<Error = R::Error>>(
        mut self,
        mut rx: ws::SocketRx<R>,
        mut tx: ws::SocketTx<W>,
    ) -> Result<(), W::Error> {
        info!("WS: Connection established");

        let mut buffer = [0u8; WEBSOCKET_BUFFER_SIZE];

        // Neue Clients bekommen sofort den aktuellen Zustand
        send_state(&mut tx, &current_state()).await?;

        let close_reason = loop {
            match select(
                rx.next_message(&mut buffer, pending()),
                self.state_subscriber.next_message_pure(),
            )
            .await
            {
                // Nachricht vom Browser
                Either::First(ws_result) => match ws_result?.ignore_never_b() {
                    Ok(ws::Message::Text(data)) => match decode_command(data.as_bytes()) {
                        Ok(command) => {
                            info!("WS: Command received: {}", command);
                            // Antwort kommt als Broadcast, sobald der Light-Task den Zustand geändert hat
                            self.command_sender.send(command).await;
                        }
                        Err(e) => {
                            warn!("WS: Invalid command: {}", e);
                            send_error(&mut tx, error_message(e)).await?;
                        }
                    },
                    Ok(ws::Message::Binary(data)) => {
                        info!("WS: Received binary message: {} bytes (ignored)", data.len());
                    }
                    Ok(ws::Message::Ping(data)) => tx.send_pong(data).await?,
                    Ok(ws::Message::Pong(_)) => {}
                    Ok(ws::Message::Close(_)) => {
                        info!("WS: Close received");
                        break None;
                    }
                    Err(error) => {
                        warn!("WS: Protocol error");
                        break Some((error.code(), "WebSocket Error"));
                    }
                },
                // Zustands-Broadcast vom Light-Task
                Either::Second(state) => send_state(&mut tx, &state).await?,
            }
        };

        info!("WS: Connection closed");
        tx.close(close_reason).await
    }
}

/// Sendet `{"type":"state",...}` an den Client
async fn send_state<W: embedded_io_async::Write>(
    tx: &mut ws::SocketTx<W>,
    state: &LightState,
) -> Result<(), W::Error> {
    let mut json_buffer = [0u8; JSON_BUFFER_SIZE];
    send_json(tx, encode_ws_state(state, &mut json_buffer).ok(), &json_buffer).await
}

/// Sendet `{"type":"error","message":...}` an den Client
async fn send_error<W: embedded_io_async::Write>(
    tx: &mut ws::SocketTx<W>,
    message: &str,
) -> Result<(), W::Error> {
    let mut json_buffer = [0u8; JSON_BUFFER_SIZE];
    send_json(tx, encode_ws_error(message, &mut json_buffer).ok(), &json_buffer).await
}

async fn send_json<W: embedded_io_async::Write>(
    tx: &mut ws::SocketTx<W>,
    len: Option<usize>,
    json_buffer: &[u8],
) -> Result<(), W::Error> {
    let Some(json) = len.and_then(|len| core::str::from_utf8(&json_buffer[..len]).ok()) else {
        warn!("WS: JSON encoding failed, message dropped");
        return Ok(());
    };
    tx.send_text(json).await
}
