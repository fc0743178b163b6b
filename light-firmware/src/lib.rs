// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Heap (picoserve baut HTTP-Bodies als alloc::string::String)
extern crate alloc;

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports von light-core
pub use light_core::{
    DeviceId, Hostname, LedError, LightCommand, LightController, LightState, SmartLedWriter,
};

use core::cell::Cell;

use config::STATE_SUBSCRIBERS;

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};

// ============================================================================
// Aktueller Licht-Zustand
// ============================================================================
//
// Der Light-Task ist der einzige Schreiber. Leser sind alle, die den Zustand
// sofort brauchen und nicht auf den nächsten Broadcast warten können:
// neue WebSocket-Clients, MQTT nach Reconnect, HTTP GET /state.

static CURRENT_STATE: Mutex<CriticalSectionRawMutex, Cell<LightState>> =
    Mutex::new(Cell::new(LightState::new()));

/// Liest den zuletzt vom Light-Task gemeldeten Zustand
pub fn current_state() -> LightState {
    CURRENT_STATE.lock(|state| state.get())
}

/// Spiegelt einen neuen Zustand (nur vom Light-Task aufrufen)
pub fn set_current_state(new_state: LightState) {
    CURRENT_STATE.lock(|state| state.set(new_state));
}

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Publisher<'static, NoopRawMutex, LightState, 4, STATE_SUBSCRIBERS, 1>
// Nutze:  LightStatePublisher

/// PubSubChannel für Zustands-Broadcasts
/// - 4: Nachrichten-Kapazität im Queue
/// - STATE_SUBSCRIBERS: 1 MQTT + WEBSOCKET_WORKERS
/// - 1: Publisher (nur der Light-Task)
pub type LightStateChannel = PubSubChannel<NoopRawMutex, LightState, 4, STATE_SUBSCRIBERS, 1>;

/// Publisher für Zustands-Broadcasts
pub type LightStatePublisher =
    Publisher<'static, NoopRawMutex, LightState, 4, STATE_SUBSCRIBERS, 1>;

/// Subscriber für Zustands-Broadcasts
pub type LightStateSubscriber =
    Subscriber<'static, NoopRawMutex, LightState, 4, STATE_SUBSCRIBERS, 1>;

/// Channel für Kommandos (MQTT / WebSocket → Light-Task)
/// - 4: Nachrichten-Kapazität, mehrere Quellen können gleichzeitig senden
pub type LightCommandChannel = Channel<NoopRawMutex, LightCommand, 4>;

/// Sender für Kommandos
pub type LightCommandSender = Sender<'static, NoopRawMutex, LightCommand, 4>;

/// Receiver für Kommandos (nur der Light-Task)
pub type LightCommandReceiver = Receiver<'static, NoopRawMutex, LightCommand, 4>;
