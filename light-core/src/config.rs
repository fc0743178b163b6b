//! Build-Zeit-Konfiguration der Leuchte
//!
//! `LightConfig` wird in der Firmware als `const` aus Environment-Variablen
//! zusammengesetzt (siehe `build.rs`) und schon beim Kompilieren geprüft.
//! Alle Funktionen hier sind `const fn`, damit eine ungültige Konfiguration
//! als Build-Fehler auffällt und nicht erst auf der Hardware.

use crate::device_id::{DEVICE_ID_CAPACITY, MAC_SUFFIX_LEN};

/// Maximale Länge von `id_prefix`, damit die Device-ID in ihren Buffer passt
pub const MAX_ID_PREFIX_LEN: usize = DEVICE_ID_CAPACITY - MAC_SUFFIX_LEN;

/// Welcher Port in einem `ConfigError` gemeint ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortKind {
    Mqtt,
    Http,
    WebSocket,
}

/// Fehler-Typ für ungültige Konfigurationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyIdPrefix,
    IdPrefixTooLong,
    NoLeds,
    InvalidDataPin(u8),
    EmptyMqttServer,
    ZeroPort(PortKind),
    /// HTTP- und WebSocket-Server würden auf denselben Port binden
    PortConflict,
    EmptyTopic,
    /// `+` oder `#` in einem Topic (wir publishen/subscriben nur exakte Topics)
    WildcardInTopic,
    DuplicateTopic,
}

/// Statische Konfiguration der Leuchte
///
/// Wird zur Build-Zeit festgelegt und ist zur Laufzeit unveränderlich.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightConfig {
    /// Präfix der Device-ID (z.B. "LIGHT-")
    pub id_prefix: &'static str,
    /// Anzahl der LEDs im Strip/Ring
    pub num_leds: usize,
    /// GPIO-Nummer der LED-Datenleitung
    pub data_pin: u8,
    pub mqtt_port: u16,
    pub mqtt_server: &'static str,
    /// Leer = anonyme Anmeldung
    pub mqtt_user: &'static str,
    pub mqtt_password: &'static str,
    /// Topic für ausgehende Zustands-Meldungen
    pub mqtt_state_topic: &'static str,
    /// Topic für eingehende Kommandos
    pub mqtt_command_topic: &'static str,
    pub http_server_port: u16,
    /// Wird per `build.rs` auch in die index.html eingesetzt
    pub websocket_port: u16,
}

impl LightConfig {
    /// Prüft alle Invarianten der Konfiguration
    ///
    /// Liefert den ersten gefundenen Fehler zurück.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.id_prefix.is_empty() {
            return Err(ConfigError::EmptyIdPrefix);
        }
        if self.id_prefix.len() > MAX_ID_PREFIX_LEN {
            return Err(ConfigError::IdPrefixTooLong);
        }
        if self.num_leds == 0 {
            return Err(ConfigError::NoLeds);
        }
        if !is_output_capable_pin(self.data_pin) {
            return Err(ConfigError::InvalidDataPin(self.data_pin));
        }
        if self.mqtt_server.is_empty() {
            return Err(ConfigError::EmptyMqttServer);
        }
        if self.mqtt_port == 0 {
            return Err(ConfigError::ZeroPort(PortKind::Mqtt));
        }
        if self.http_server_port == 0 {
            return Err(ConfigError::ZeroPort(PortKind::Http));
        }
        if self.websocket_port == 0 {
            return Err(ConfigError::ZeroPort(PortKind::WebSocket));
        }
        // Der MQTT-Port ist der Port des Brokers, nicht lokal gebunden
        if self.http_server_port == self.websocket_port {
            return Err(ConfigError::PortConflict);
        }
        if self.mqtt_state_topic.is_empty() || self.mqtt_command_topic.is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if has_wildcard(self.mqtt_state_topic) || has_wildcard(self.mqtt_command_topic) {
            return Err(ConfigError::WildcardInTopic);
        }
        if str_eq(self.mqtt_state_topic, self.mqtt_command_topic) {
            return Err(ConfigError::DuplicateTopic);
        }
        Ok(())
    }

    /// Wie `validate()`, bricht aber mit lesbarer Meldung ab
    ///
    /// In einem `const _: () = CONFIG.assert_valid();` Item verwendet
    /// wird daraus ein Compile-Fehler.
    pub const fn assert_valid(&self) {
        match self.validate() {
            Ok(()) => {}
            Err(ConfigError::EmptyIdPrefix) => panic!("ID_PREFIX darf nicht leer sein"),
            Err(ConfigError::IdPrefixTooLong) => panic!("ID_PREFIX ist zu lang (max. 26 Zeichen)"),
            Err(ConfigError::NoLeds) => panic!("NUM_LEDS muss größer als 0 sein"),
            Err(ConfigError::InvalidDataPin(_)) => {
                panic!("DATA_PIN ist kein nutzbarer Ausgangs-Pin (GPIO0-11, GPIO14-23)")
            }
            Err(ConfigError::EmptyMqttServer) => panic!("MQTT_SERVER darf nicht leer sein"),
            Err(ConfigError::ZeroPort(PortKind::Mqtt)) => panic!("MQTT_PORT darf nicht 0 sein"),
            Err(ConfigError::ZeroPort(PortKind::Http)) => {
                panic!("HTTP_SERVER_PORT darf nicht 0 sein")
            }
            Err(ConfigError::ZeroPort(PortKind::WebSocket)) => {
                panic!("WEBSOCKET_PORT darf nicht 0 sein")
            }
            Err(ConfigError::PortConflict) => {
                panic!("HTTP_SERVER_PORT und WEBSOCKET_PORT müssen verschieden sein")
            }
            Err(ConfigError::EmptyTopic) => panic!("MQTT Topics dürfen nicht leer sein"),
            Err(ConfigError::WildcardInTopic) => {
                panic!("MQTT Topics dürfen keine Wildcards (+, #) enthalten")
            }
            Err(ConfigError::DuplicateTopic) => {
                panic!("MQTT_STATE_TOPIC und MQTT_COMMAND_TOPIC müssen verschieden sein")
            }
        }
    }

    /// true wenn Zugangsdaten für den Broker gesetzt sind
    pub const fn has_mqtt_credentials(&self) -> bool {
        !self.mqtt_user.is_empty()
    }
}

/// Prüft ob ein GPIO des ESP32-C6 als LED-Datenleitung taugt
///
/// GPIO24-30 hängen am SPI-Flash, GPIO12/13 sind USB D-/D+
/// (darüber läuft die defmt-Ausgabe).
pub const fn is_output_capable_pin(pin: u8) -> bool {
    matches!(pin, 0..=11 | 14..=23)
}

/// Parst einen dezimalen `u8` aus einem Build-Zeit-String
pub const fn parse_u8(value: &str) -> u8 {
    let parsed = parse_decimal(value);
    if parsed > u8::MAX as u32 {
        panic!("Konfigurationswert ist zu groß für u8");
    }
    parsed as u8
}

/// Parst einen dezimalen `u16` aus einem Build-Zeit-String
pub const fn parse_u16(value: &str) -> u16 {
    let parsed = parse_decimal(value);
    if parsed > u16::MAX as u32 {
        panic!("Konfigurationswert ist zu groß für u16");
    }
    parsed as u16
}

/// Parst einen dezimalen `usize` aus einem Build-Zeit-String
pub const fn parse_usize(value: &str) -> usize {
    parse_decimal(value) as usize
}

const fn parse_decimal(value: &str) -> u32 {
    let bytes = value.as_bytes();
    if bytes.is_empty() {
        panic!("Leerer Zahlenwert in der Konfiguration");
    }

    let mut result: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            panic!("Konfigurationswert ist keine Dezimalzahl");
        }
        result = match result.checked_mul(10) {
            Some(v) => v,
            None => panic!("Konfigurationswert ist zu groß"),
        };
        result = match result.checked_add((digit - b'0') as u32) {
            Some(v) => v,
            None => panic!("Konfigurationswert ist zu groß"),
        };
        i += 1;
    }
    result
}

const fn has_wildcard(topic: &str) -> bool {
    let bytes = topic.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'+' || bytes[i] == b'#' {
            return true;
        }
        i += 1;
    }
    false
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::EmptyIdPrefix => defmt::write!(fmt, "Empty id prefix"),
            ConfigError::IdPrefixTooLong => defmt::write!(fmt, "Id prefix too long"),
            ConfigError::NoLeds => defmt::write!(fmt, "No LEDs"),
            ConfigError::InvalidDataPin(pin) => defmt::write!(fmt, "Invalid data pin GPIO{}", pin),
            ConfigError::EmptyMqttServer => defmt::write!(fmt, "Empty MQTT server"),
            ConfigError::ZeroPort(kind) => defmt::write!(fmt, "Port 0 for {}", kind),
            ConfigError::PortConflict => defmt::write!(fmt, "HTTP/WebSocket port conflict"),
            ConfigError::EmptyTopic => defmt::write!(fmt, "Empty topic"),
            ConfigError::WildcardInTopic => defmt::write!(fmt, "Wildcard in topic"),
            ConfigError::DuplicateTopic => defmt::write!(fmt, "Duplicate topic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: LightConfig = LightConfig {
        id_prefix: "LIGHT-",
        num_leds: 8,
        data_pin: 8,
        mqtt_port: 1883,
        mqtt_server: "mymqttserver.com",
        mqtt_user: "user",
        mqtt_password: "password",
        mqtt_state_topic: "light",
        mqtt_command_topic: "light-set",
        http_server_port: 80,
        websocket_port: 81,
    };

    // Muss zur Compile-Zeit durchlaufen
    const _: () = VALID.assert_valid();

    #[test]
    fn test_valid_config() {
        assert_eq!(VALID.validate(), Ok(()));
    }

    #[test]
    fn test_first_error_wins() {
        let config = LightConfig {
            id_prefix: "",
            num_leds: 0,
            ..VALID
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyIdPrefix));
    }

    #[test]
    fn test_id_prefix_length_limit() {
        let at_limit = LightConfig {
            id_prefix: "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            ..VALID
        };
        assert_eq!(at_limit.id_prefix.len(), MAX_ID_PREFIX_LEN);
        assert_eq!(at_limit.validate(), Ok(()));

        let too_long = LightConfig {
            id_prefix: "ABCDEFGHIJKLMNOPQRSTUVWXYZ-",
            ..VALID
        };
        assert_eq!(too_long.validate(), Err(ConfigError::IdPrefixTooLong));
    }

    #[test]
    fn test_wildcard_topics_rejected() {
        let config = LightConfig {
            mqtt_command_topic: "light/+/set",
            ..VALID
        };
        assert_eq!(config.validate(), Err(ConfigError::WildcardInTopic));

        let config = LightConfig {
            mqtt_state_topic: "light/#",
            ..VALID
        };
        assert_eq!(config.validate(), Err(ConfigError::WildcardInTopic));
    }

    #[test]
    fn test_output_capable_pins() {
        assert!(is_output_capable_pin(0));
        assert!(is_output_capable_pin(8));
        assert!(is_output_capable_pin(23));
        assert!(!is_output_capable_pin(12));
        assert!(!is_output_capable_pin(13));
        assert!(!is_output_capable_pin(24));
        assert!(!is_output_capable_pin(255));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_u8("8"), 8);
        assert_eq!(parse_u8("255"), 255);
        assert_eq!(parse_u16("1883"), 1883);
        assert_eq!(parse_u16("65535"), 65535);
        assert_eq!(parse_usize("0"), 0);
        assert_eq!(parse_usize("007"), 7);
    }

    #[test]
    #[should_panic]
    fn test_parse_u16_overflow() {
        parse_u16("65536");
    }

    #[test]
    #[should_panic]
    fn test_parse_rejects_non_digits() {
        parse_u8("D2");
    }

    #[test]
    #[should_panic]
    fn test_parse_rejects_empty() {
        parse_usize("");
    }
}
