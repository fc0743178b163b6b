//! HTML-Template der Weboberfläche
//!
//! build.rs setzt den WebSocket-Port aus derselben Konfiguration ein, die
//! auch die Firmware bindet. Seite und Server können so nicht auseinanderlaufen.

use core::fmt::Write;

/// Platzhalter im Template (src/web/index.html der Firmware)
pub const WEBSOCKET_PORT_PLACEHOLDER: &str = "{{WEBSOCKET_PORT}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateError {
    /// Template enthält keinen `{{WEBSOCKET_PORT}}` Platzhalter
    MissingPlaceholder,
    /// Ausgabe konnte nicht geschrieben werden
    Write,
}

/// Ersetzt jeden `{{WEBSOCKET_PORT}}` im Template durch `websocket_port`
pub fn render_index_html<W: Write>(
    template: &str,
    websocket_port: u16,
    out: &mut W,
) -> Result<(), TemplateError> {
    if !template.contains(WEBSOCKET_PORT_PLACEHOLDER) {
        return Err(TemplateError::MissingPlaceholder);
    }

    let mut parts = template.split(WEBSOCKET_PORT_PLACEHOLDER);
    if let Some(first) = parts.next() {
        out.write_str(first).map_err(|_| TemplateError::Write)?;
    }
    for part in parts {
        write!(out, "{}{}", websocket_port, part).map_err(|_| TemplateError::Write)?;
    }
    Ok(())
}
