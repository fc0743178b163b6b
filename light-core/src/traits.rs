//! Schnittstelle zum LED-Strip
//!
//! Die Render-Logik kennt nur diesen Trait. Die Firmware setzt ihn mit dem
//! RMT Peripheral um, die Host-Tests mit einem Mock, der Frames mitschreibt.

use rgb::RGB8;

/// Ein Frame konnte nicht auf den Strip geschrieben werden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Ausgabe eines kompletten Frames auf WS2812/Neopixel LEDs
pub trait SmartLedWriter: Send {
    /// `pixels[i]` ist die Farbe der i-ten LED, bereits mit Helligkeit skaliert.
    ///
    /// Bei `Err` gilt der Frame als nicht angezeigt und wird erneut gezeichnet.
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError>;
}
