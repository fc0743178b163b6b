//! Device-ID aus Präfix und MAC-Adresse
//!
//! Format: `<id_prefix><letzte 3 MAC-Bytes als Hex>`, z.B. "LIGHT-a1b2c3".
//! Die ID dient als MQTT Client-ID, die Hostname-Variante als mDNS-Name.

use core::fmt::Write;

use heapless::String;

/// Buffer-Größe der Device-ID in Bytes
pub const DEVICE_ID_CAPACITY: usize = 32;

/// Länge des Hex-Suffix (3 MAC-Bytes = 6 Hex-Zeichen)
pub const MAC_SUFFIX_LEN: usize = 6;

/// DNS-tauglicher Hostname (ohne .local Suffix)
pub type Hostname = String<DEVICE_ID_CAPACITY>;

/// Fehler-Typ für die Device-ID Erzeugung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceIdError {
    EmptyPrefix,
    TooLong,
}

/// Eindeutige Kennung dieses Geräts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId {
    id: String<DEVICE_ID_CAPACITY>,
}

impl DeviceId {
    /// Erstellt die Device-ID aus Präfix und Factory-MAC
    pub fn new(prefix: &str, mac: [u8; 6]) -> Result<Self, DeviceIdError> {
        if prefix.is_empty() {
            return Err(DeviceIdError::EmptyPrefix);
        }

        let mut id = String::new();
        id.push_str(prefix).map_err(|_| DeviceIdError::TooLong)?;
        write!(id, "{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5])
            .map_err(|_| DeviceIdError::TooLong)?;

        Ok(Self { id })
    }

    pub fn as_str(&self) -> &str {
        self.id.as_str()
    }

    /// DNS-taugliche Variante der ID
    ///
    /// Kleinbuchstaben, alles außer `[a-z0-9-]` wird zu `-`.
    /// "LIGHT_Küche-a1b2c3" → "light-k-che-a1b2c3"
    pub fn hostname(&self) -> Hostname {
        let mut hostname = Hostname::new();
        for c in self.id.chars() {
            let c = c.to_ascii_lowercase();
            let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            };
            // Ersetzt wird 1:1 (oder kürzer bei Multibyte), passt also immer
            let _ = hostname.push(c);
        }
        hostname
    }
}

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}
