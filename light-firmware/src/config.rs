// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Die Licht-Konfiguration (ID, LEDs, MQTT, Ports) kommt zur Build-Zeit aus
// .env bzw. Environment (siehe build.rs) und wird hier als LIGHT_CONFIG
// zusammengesetzt. Eine ungültige Konfiguration bricht den Build ab.
#![allow(dead_code)]

use light_core::LightConfig;
use light_core::config::{parse_u8, parse_u16, parse_usize};

// ============================================================================
// Licht-Konfiguration (Build-Zeit)
// ============================================================================

/// Präfix der Device-ID, ergänzt um die letzten 3 MAC-Bytes
pub const ID_PREFIX: &str = env!("ID_PREFIX");

/// Anzahl der LEDs im Strip/Ring
pub const NUM_LEDS: usize = parse_usize(env!("NUM_LEDS"));

/// GPIO-Nummer für die LED-Datenleitung
/// Standard: GPIO8 (Onboard-LED des ESP32-C6 DevKit)
pub const DATA_PIN: u8 = parse_u8(env!("DATA_PIN"));

/// MQTT Broker Port
/// Standard: 1883 (unverschlüsselt), 8883 (TLS)
pub const MQTT_PORT: u16 = parse_u16(env!("MQTT_PORT"));

/// MQTT Broker Hostname oder IP-Adresse
pub const MQTT_SERVER: &str = env!(
    "MQTT_SERVER",
    "MQTT Server nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Zugangsdaten (leer = anonym)
pub const MQTT_USER: &str = env!("MQTT_USER");
pub const MQTT_PASSWORD: &str = env!("MQTT_PASSWORD");

/// Topic für Zustands-Meldungen (ausgehend, retained)
pub const MQTT_STATE_TOPIC: &str = env!("MQTT_STATE_TOPIC");

/// Topic für Kommandos (eingehend)
pub const MQTT_COMMAND_TOPIC: &str = env!("MQTT_COMMAND_TOPIC");

/// HTTP-Port für die Weboberfläche
pub const HTTP_SERVER_PORT: u16 = parse_u16(env!("HTTP_SERVER_PORT"));

/// WebSocket-Port
/// Wird von build.rs auch in die generierte index.html eingesetzt
pub const WEBSOCKET_PORT: u16 = parse_u16(env!("WEBSOCKET_PORT"));

/// Gesamte Licht-Konfiguration
pub const LIGHT_CONFIG: LightConfig = LightConfig {
    id_prefix: ID_PREFIX,
    num_leds: NUM_LEDS,
    data_pin: DATA_PIN,
    mqtt_port: MQTT_PORT,
    mqtt_server: MQTT_SERVER,
    mqtt_user: MQTT_USER,
    mqtt_password: MQTT_PASSWORD,
    mqtt_state_topic: MQTT_STATE_TOPIC,
    mqtt_command_topic: MQTT_COMMAND_TOPIC,
    http_server_port: HTTP_SERVER_PORT,
    websocket_port: WEBSOCKET_PORT,
};

// Compile-Zeit-Prüfung: ungültige Werte in .env → Build-Fehler
const _: () = LIGHT_CONFIG.assert_valid();

// ============================================================================
// LED Konfiguration
// ============================================================================

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// RMT Buffer-Größe: 24 Pulse pro LED (3 Farben * 8 Bits) + 1 Reset
pub const LED_BUFFER_SIZE: usize = NUM_LEDS * 24 + 1;

/// Frame-Intervall für Effekte in Millisekunden (25 FPS)
pub const FRAME_INTERVAL_MS: u64 = 40;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach WiFi-Fehler vor erneutem Versuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Reconnect Delay in Sekunden
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

/// MQTT Keep-Alive in Sekunden
/// Ping wird nach der Hälfte der Zeit gesendet
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// MQTT Buffer-Größe in Bytes
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// TCP Buffer-Größe für die Broker-Verbindung
pub const MQTT_TCP_BUFFER_SIZE: usize = 2048;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS TTL (Time To Live) in Sekunden
pub const MDNS_TTL_SECS: u32 = 120;

/// mDNS Reconnect Delay in Sekunden
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// mDNS Port laut RFC 6762
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 Multicast-Adresse laut RFC 6762
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX in Bytes)
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Receive/Send Buffer-Größen in Bytes (Standard-MTU)
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;

// ============================================================================
// HTTP / WebSocket Server Konfiguration
// ============================================================================

/// Anzahl paralleler HTTP-Server-Tasks
pub const HTTP_WORKERS: usize = 2;

/// Anzahl paralleler WebSocket-Verbindungen
pub const WEBSOCKET_WORKERS: usize = 4;

/// Subscriber-Slots im Zustands-Channel: ein Slot pro WebSocket-Worker plus MQTT
pub const STATE_SUBSCRIBERS: usize = WEBSOCKET_WORKERS + 1;

/// HTTP Buffer-Größe in Bytes
/// 1024 Bytes reicht dank Chunked Transfer Encoding
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX/TX Buffer-Größen in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// WebSocket Message Buffer-Größe in Bytes
/// Kommandos sind < 128 Bytes
pub const WEBSOCKET_BUFFER_SIZE: usize = 512;

/// JSON Buffer für Status- und Fehler-Nachrichten
pub const JSON_BUFFER_SIZE: usize = light_core::protocol::STATE_JSON_MAX_LEN;
