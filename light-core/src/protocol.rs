//! JSON-Protokoll für MQTT, HTTP und WebSocket
//!
//! Zustand (MQTT State-Topic, HTTP `/state`):
//! `{"state":"ON","brightness":64,"color":{"r":255,"g":255,"b":255},"effect":"solid"}`
//!
//! Kommandos (MQTT Command-Topic, WebSocket Client → Server) nutzen dieselben
//! Keys, alle optional. Zusätzlich werden nackte `ON`/`OFF` Payloads akzeptiert.
//!
//! WebSocket Server → Client Nachrichten tragen zusätzlich ein `type` Feld
//! (`"state"` oder `"error"`).

use rgb::RGB8;
use serde::{Deserialize, Serialize};

use crate::types::{Effect, LightCommand, LightState, PowerState};

/// Buffer-Größe, die für jede Zustands-Nachricht reicht
/// Längste Form: {"type":"state","state":"OFF","brightness":255,"color":{"r":255,"g":255,"b":255},"effect":"rainbow"}
pub const STATE_JSON_MAX_LEN: usize = 128;

/// Fehler-Typ für das JSON-Protokoll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Payload ist kein gültiges Kommando-JSON
    InvalidJson,
    /// Gültiges JSON, aber kein bekanntes Feld gesetzt
    EmptyCommand,
    /// Ausgabe-Buffer zu klein
    BufferTooSmall,
}

/// RGB-Struct für JSON-Serialisierung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<RGB8> for RgbColor {
    fn from(color: RGB8) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

impl From<RgbColor> for RGB8 {
    fn from(color: RgbColor) -> Self {
        RGB8 {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

#[derive(Serialize)]
struct StatePayload {
    state: PowerState,
    brightness: u8,
    color: RgbColor,
    effect: Effect,
}

impl From<&LightState> for StatePayload {
    fn from(state: &LightState) -> Self {
        Self {
            state: state.power,
            brightness: state.brightness,
            color: state.color.into(),
            effect: state.effect,
        }
    }
}

/// Kommando-Payload vom Broker oder Browser
#[derive(Deserialize)]
struct CommandPayload {
    #[serde(default)]
    state: Option<PowerState>,
    #[serde(default)]
    brightness: Option<u8>,
    #[serde(default)]
    color: Option<RgbColor>,
    #[serde(default)]
    effect: Option<Effect>,
}

/// Server → Client Nachrichten auf dem WebSocket
#[derive(Serialize)]
#[serde(tag = "type")]
enum WsServerMessage<'a> {
    #[serde(rename = "state")]
    State {
        state: PowerState,
        brightness: u8,
        color: RgbColor,
        effect: Effect,
    },
    #[serde(rename = "error")]
    Error { message: &'a str },
}

/// Serialisiert den Zustand für MQTT und HTTP
///
/// Gibt die Anzahl geschriebener Bytes zurück.
pub fn encode_state(state: &LightState, buf: &mut [u8]) -> Result<usize, ProtocolError> {
    to_slice(&StatePayload::from(state), buf)
}

/// Serialisiert den Zustand als WebSocket-Nachricht (`"type":"state"`)
pub fn encode_ws_state(state: &LightState, buf: &mut [u8]) -> Result<usize, ProtocolError> {
    let message = WsServerMessage::State {
        state: state.power,
        brightness: state.brightness,
        color: state.color.into(),
        effect: state.effect,
    };
    to_slice(&message, buf)
}

/// Serialisiert eine Fehlermeldung als WebSocket-Nachricht (`"type":"error"`)
pub fn encode_ws_error(message: &str, buf: &mut [u8]) -> Result<usize, ProtocolError> {
    to_slice(&WsServerMessage::Error { message }, buf)
}

/// Dekodiert ein Kommando aus einer MQTT- oder WebSocket-Payload
pub fn decode_command(payload: &[u8]) -> Result<LightCommand, ProtocolError> {
    let trimmed = payload.trim_ascii();
    if trimmed.eq_ignore_ascii_case(b"ON") {
        return Ok(LightCommand::power(PowerState::On));
    }
    if trimmed.eq_ignore_ascii_case(b"OFF") {
        return Ok(LightCommand::power(PowerState::Off));
    }

    let (payload, _) = serde_json_core::from_slice::<CommandPayload>(trimmed)
        .map_err(|_| ProtocolError::InvalidJson)?;

    let command = LightCommand {
        power: payload.state,
        brightness: payload.brightness,
        color: payload.color.map(RGB8::from),
        effect: payload.effect,
    };

    if command.is_empty() {
        return Err(ProtocolError::EmptyCommand);
    }
    Ok(command)
}

/// Kurzbeschreibung eines Dekodier-Fehlers für den Client
pub fn error_message(error: ProtocolError) -> &'static str {
    match error {
        ProtocolError::InvalidJson => "JSON parse error",
        ProtocolError::EmptyCommand => "Command contains no known field",
        ProtocolError::BufferTooSmall => "Response too large",
    }
}

fn to_slice<T: Serialize>(value: &T, buf: &mut [u8]) -> Result<usize, ProtocolError> {
    serde_json_core::to_slice(value, buf).map_err(|_| ProtocolError::BufferTooSmall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_len_fits_longest_message() {
        let state = LightState {
            power: PowerState::Off,
            brightness: 255,
            color: RGB8 {
                r: 255,
                g: 255,
                b: 255,
            },
            effect: Effect::Rainbow,
        };
        let mut buf = [0u8; STATE_JSON_MAX_LEN];
        assert!(encode_ws_state(&state, &mut buf).is_ok());
    }

    #[test]
    fn test_encode_into_small_buffer() {
        let mut buf = [0u8; 8];
        assert_eq!(
            encode_state(&LightState::new(), &mut buf),
            Err(ProtocolError::BufferTooSmall)
        );
    }

    #[test]
    fn test_bare_power_payloads() {
        assert_eq!(
            decode_command(b" on\n"),
            Ok(LightCommand::power(PowerState::On))
        );
        assert_eq!(
            decode_command(b"OFF"),
            Ok(LightCommand::power(PowerState::Off))
        );
    }
}
