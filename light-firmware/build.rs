// Build-Script: Wird vor dem Kompilieren ausgeführt
// Lädt die Licht-Konfiguration, erzeugt index.html und konfiguriert den Linker

use std::path::PathBuf;

use light_core::web::{TemplateError, render_index_html};

/// Konfigurationswerte mit Werkseinstellung
/// Können per .env oder Environment überschrieben werden
const DEFAULTS: &[(&str, &str)] = &[
    ("ID_PREFIX", "LIGHT-"),
    ("NUM_LEDS", "8"),
    ("DATA_PIN", "8"),
    ("MQTT_PORT", "1883"),
    ("MQTT_USER", ""),
    ("MQTT_PASSWORD", ""),
    ("MQTT_STATE_TOPIC", "light"),
    ("MQTT_COMMAND_TOPIC", "light-set"),
    ("HTTP_SERVER_PORT", "80"),
    ("WEBSOCKET_PORT", "81"),
];

/// Werte ohne Default - config.rs bricht mit env!() ab wenn sie fehlen
const REQUIRED: &[&str] = &["WIFI_SSID", "WIFI_PASSWORD", "MQTT_SERVER"];

fn main() {
    // Lade .env file für Credentials und Konfiguration
    // Fehler ignorieren wenn .env nicht existiert (dann müssen ENV vars gesetzt sein)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!("   Setze WIFI_SSID, WIFI_PASSWORD und MQTT_SERVER als Environment-Variablen");
    }

    // Gebe Konfiguration an Rust-Compiler weiter
    // Die Werte werden zur Compile-Zeit in den Code eingebacken
    for &(key, _) in DEFAULTS {
        println!("cargo:rerun-if-env-changed={}", key);
        println!("cargo:rustc-env={}={}", key, config_value(key));
    }
    for &key in REQUIRED {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }

    generate_index_html();

    // Registriere hilfsbereiten Error-Handler für Linker-Fehler
    linker_be_nice();

    // Füge Linker-Skripte hinzu:

    // 1. defmt.x - defmt Logging-Support
    //    Definiert Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // 2. linkall.x - ESP32 Memory-Layout
    //    WICHTIG: Muss als LETZTES kommen (sonst Probleme mit flip-link)
    //    Definiert Flash/RAM-Layout und Startup-Code
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Wert aus Environment/.env, sonst Default aus DEFAULTS
fn config_value(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, default)| default.to_string())
            .unwrap_or_default()
    })
}

// Erzeugt OUT_DIR/index.html aus src/web/index.html
// Der WebSocket-Port kommt aus derselben Quelle wie WEBSOCKET_PORT in config.rs,
// die Seite kann also nicht mehr auseinanderlaufen
fn generate_index_html() {
    let template_path = "src/web/index.html";
    println!("cargo:rerun-if-changed={}", template_path);

    let template = std::fs::read_to_string(template_path)
        .unwrap_or_else(|e| panic!("{} nicht lesbar: {}", template_path, e));
    let port = config_value("WEBSOCKET_PORT");
    let websocket_port: u16 = port
        .parse()
        .unwrap_or_else(|_| panic!("WEBSOCKET_PORT '{}' ist kein gültiger Port", port));

    let mut html = String::with_capacity(template.len());
    match render_index_html(&template, websocket_port, &mut html) {
        Ok(()) => {}
        Err(TemplateError::MissingPlaceholder) => {
            panic!("{} enthält keinen {{{{WEBSOCKET_PORT}}}} Platzhalter", template_path)
        }
        Err(TemplateError::Write) => panic!("index.html konnte nicht erzeugt werden"),
    }

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    std::fs::write(out_dir.join("index.html"), html).unwrap();
}

// Error-Handler: Zeigt hilfreiche Tipps bei Linker-Fehlern
// Wird vom Linker als "--error-handling-script" aufgerufen
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    // Wenn vom Linker aufgerufen (mit Error-Typ und Symbol-Name)
    if args.len() > 1 {
        let kind = &args[1]; // Fehler-Typ (z.B. "undefined-symbol")
        let what = &args[2]; // Symbol-Name (z.B. "_defmt_...")

        match kind.as_str() {
            "undefined-symbol" => match what.as_str() {
                what if what.starts_with("_defmt_") => {
                    eprintln!();
                    eprintln!(
                        "💡 `defmt` not found - make sure `defmt.x` is added as a linker script and you have included `use defmt_rtt as _;`"
                    );
                    eprintln!();
                }
                "_stack_start" => {
                    eprintln!();
                    eprintln!("💡 Is the linker script `linkall.x` missing?");
                    eprintln!();
                }
                what if what.starts_with("esp_rtos_") => {
                    eprintln!();
                    eprintln!(
                        "💡 `esp-radio` has no scheduler enabled. Make sure you have initialized `esp-rtos` or provided an external scheduler."
                    );
                    eprintln!();
                }
                "free" | "malloc" | "calloc" | "get_free_internal_heap_size" | "malloc_internal"
                | "realloc_internal" | "calloc_internal" | "free_internal" => {
                    eprintln!();
                    eprintln!(
                        "💡 Did you forget the `esp-alloc` dependency or didn't enable the `compat` feature on it?"
                    );
                    eprintln!();
                }
                _ => (),
            },
            _ => {
                std::process::exit(1);
            }
        }

        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
