//! Integration Tests für die Build-Zeit-Konfiguration
//!
//! Werte entsprechen den Werkseinstellungen aus build.rs, ergänzt um
//! Broker-Adresse und Zugangsdaten, die build.rs ohne Default verlangt bzw.
//! leer lässt.

use light_core::config::{parse_u16, parse_u8, parse_usize};
use light_core::{ConfigError, DeviceId, LightConfig, PortKind};

/// Auslieferungszustand mit gesetzten Broker-Zugangsdaten
const DEFAULT_CONFIG: LightConfig = LightConfig {
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

#[test]
fn test_default_config_is_valid() {
    assert_eq!(DEFAULT_CONFIG.validate(), Ok(()));
    assert!(DEFAULT_CONFIG.has_mqtt_credentials());
}

#[test]
fn test_empty_id_prefix() {
    let config = LightConfig {
        id_prefix: "",
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Err(ConfigError::EmptyIdPrefix));
}

#[test]
fn test_zero_leds() {
    let config = LightConfig {
        num_leds: 0,
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Err(ConfigError::NoLeds));
}

#[test]
fn test_flash_pin_rejected() {
    let config = LightConfig {
        data_pin: 27,
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Err(ConfigError::InvalidDataPin(27)));
}

#[test]
fn test_empty_mqtt_server() {
    let config = LightConfig {
        mqtt_server: "",
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Err(ConfigError::EmptyMqttServer));
}

#[test]
fn test_zero_ports() {
    let cases = [
        (
            LightConfig {
                mqtt_port: 0,
                ..DEFAULT_CONFIG
            },
            PortKind::Mqtt,
        ),
        (
            LightConfig {
                http_server_port: 0,
                ..DEFAULT_CONFIG
            },
            PortKind::Http,
        ),
        (
            LightConfig {
                websocket_port: 0,
                ..DEFAULT_CONFIG
            },
            PortKind::WebSocket,
        ),
    ];

    for (config, kind) in cases {
        assert_eq!(config.validate(), Err(ConfigError::ZeroPort(kind)));
    }
}

#[test]
fn test_http_and_websocket_port_conflict() {
    let config = LightConfig {
        websocket_port: 80,
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Err(ConfigError::PortConflict));
}

#[test]
fn test_mqtt_port_may_equal_local_port() {
    // Broker-Port ist remote, kollidiert nicht mit lokalen Listenern
    let config = LightConfig {
        mqtt_port: 80,
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_duplicate_topics() {
    let config = LightConfig {
        mqtt_command_topic: "light",
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Err(ConfigError::DuplicateTopic));
}

#[test]
fn test_empty_topic() {
    let config = LightConfig {
        mqtt_state_topic: "",
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Err(ConfigError::EmptyTopic));
}

#[test]
fn test_anonymous_mqtt() {
    let config = LightConfig {
        mqtt_user: "",
        mqtt_password: "",
        ..DEFAULT_CONFIG
    };
    assert_eq!(config.validate(), Ok(()));
    assert!(!config.has_mqtt_credentials());
}

#[test]
#[should_panic(expected = "NUM_LEDS")]
fn test_assert_valid_reports_field() {
    LightConfig {
        num_leds: 0,
        ..DEFAULT_CONFIG
    }
    .assert_valid();
}

#[test]
fn test_env_style_values() {
    assert_eq!(parse_u16("8883"), 8883);
    assert_eq!(parse_u8("4"), 4);
    assert_eq!(parse_usize("144"), 144);
}

#[test]
fn test_device_id_from_config_prefix() {
    let id = DeviceId::new(DEFAULT_CONFIG.id_prefix, [0, 0, 0, 0x12, 0xab, 0x0f]).unwrap();
    assert_eq!(id.as_str(), "LIGHT-12ab0f");
    assert_eq!(id.hostname().as_str(), "light-12ab0f");
}
