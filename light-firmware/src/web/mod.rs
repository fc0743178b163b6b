// Web-Modul: Statische Assets für den HTTP Server
//
// index.html wird von build.rs aus src/web/index.html erzeugt. Der Platzhalter
// {{WEBSOCKET_PORT}} wird dabei durch WEBSOCKET_PORT aus der Konfiguration
// ersetzt, damit Seite und Firmware immer denselben Port verwenden.

/// Generierte HTML-Hauptseite (zur Compile-Zeit ins Binary eingebettet)
pub const INDEX_HTML: &str = include_str!(concat!(env!("OUT_DIR"), "/index.html"));
