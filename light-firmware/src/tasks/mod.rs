// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Kommandos fließen über einen Channel zum Light-Task (MQTT, WebSocket → Light),
// Zustände per PubSub zurück (Light → MQTT, WebSocket).

pub mod http;
pub mod light;
pub mod mdns;
pub mod mqtt;
pub mod websocket;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use http::http_server_task;
pub use light::light_task;
pub use mdns::mdns_responder_task;
pub use mqtt::mqtt_task;
pub use websocket::websocket_task;
pub use wifi::{connection_task, dhcp_task, net_task};
