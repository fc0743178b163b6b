//! Light Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Build-Zeit-Konfiguration, den Licht-Zustand,
//! die Effekt-Berechnung, das JSON-Protokoll für MQTT und WebSocket
//! sowie das HTML-Template der Weboberfläche.

#![no_std]

pub mod config;
pub mod device_id;
pub mod keep_alive;
pub mod logic;
pub mod protocol;
pub mod traits;
pub mod types;
pub mod web;

// Re-exports für einfachen Zugriff
pub use config::{ConfigError, LightConfig, PortKind};
pub use device_id::{DeviceId, DeviceIdError, Hostname};
pub use keep_alive::KeepAlive;
pub use logic::{LightController, color_wheel, render_frame, rotate_color, scale_brightness};
pub use protocol::ProtocolError;
pub use traits::{LedError, SmartLedWriter};
pub use types::{Effect, LightCommand, LightState, PowerState};
