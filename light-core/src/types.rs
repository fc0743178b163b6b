//! Core Types für die Licht-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;
use serde::{Deserialize, Serialize};

/// Standard-Helligkeit nach dem Boot
/// Wert ist gedimmt für Augenschonung
pub const DEFAULT_BRIGHTNESS: u8 = 64;

/// Ein/Aus-Zustand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    On,
    Off,
}

/// Licht-Effekt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Alle LEDs in der Grundfarbe
    Solid,
    /// Grundfarbe rotiert zyklisch: Rot → Grün → Blau → Rot
    Cycle,
    /// Regenbogen läuft über den Strip
    Rainbow,
}

impl Effect {
    /// true wenn der Effekt jeden Frame neu gezeichnet werden muss
    pub const fn is_animated(self) -> bool {
        !matches!(self, Effect::Solid)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Effect::Solid => "solid",
            Effect::Cycle => "cycle",
            Effect::Rainbow => "rainbow",
        }
    }
}

/// Aktueller Zustand der Leuchte
///
/// Wird vom Light-Task an MQTT, HTTP und WebSocket verteilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightState {
    pub power: PowerState,
    pub brightness: u8,
    pub color: RGB8,
    pub effect: Effect,
}

impl LightState {
    /// Zustand nach dem Boot: an, weiß, gedimmt
    pub const fn new() -> Self {
        Self {
            power: PowerState::On,
            brightness: DEFAULT_BRIGHTNESS,
            color: RGB8 {
                r: 255,
                g: 255,
                b: 255,
            },
            effect: Effect::Solid,
        }
    }

    pub const fn is_on(&self) -> bool {
        matches!(self.power, PowerState::On)
    }

    /// Wendet ein Kommando an
    ///
    /// Regeln:
    /// - Farbe ohne Effekt → Effekt `Solid`
    /// - Helligkeit 0 → aus (gespeicherte Helligkeit bleibt)
    /// - Helligkeit > 0, Farbe oder Effekt ohne expliziten `power` → an
    /// - Expliziter `power` gewinnt immer
    ///
    /// Gibt `true` zurück wenn sich der Zustand geändert hat.
    pub fn apply(&mut self, command: &LightCommand) -> bool {
        let before = *self;
        let mut implied_power = None;

        match command.brightness {
            Some(0) => implied_power = Some(PowerState::Off),
            Some(brightness) => {
                self.brightness = brightness;
                implied_power = Some(PowerState::On);
            }
            None => {}
        }

        if let Some(color) = command.color {
            self.color = color;
            if command.effect.is_none() {
                self.effect = Effect::Solid;
            }
            implied_power = Some(PowerState::On);
        }

        if let Some(effect) = command.effect {
            self.effect = effect;
            implied_power = Some(PowerState::On);
        }

        if let Some(power) = command.power.or(implied_power) {
            self.power = power;
        }

        *self != before
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

/// Kommando zur Änderung des Licht-Zustands
///
/// Kommt von MQTT oder vom WebSocket und wird an den Light-Task gesendet.
/// Nicht gesetzte Felder bleiben unverändert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightCommand {
    pub power: Option<PowerState>,
    pub brightness: Option<u8>,
    pub color: Option<RGB8>,
    pub effect: Option<Effect>,
}

impl LightCommand {
    pub const fn power(power: PowerState) -> Self {
        Self {
            power: Some(power),
            brightness: None,
            color: None,
            effect: None,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.power.is_none()
            && self.brightness.is_none()
            && self.color.is_none()
            && self.effect.is_none()
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for LightState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "LightState {{ power: {}, brightness: {}, rgb: ({}, {}, {}), effect: {} }}",
            if self.is_on() { "ON" } else { "OFF" },
            self.brightness,
            self.color.r,
            self.color.g,
            self.color.b,
            self.effect.as_str()
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LightCommand {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "LightCommand {{ power: {}, brightness: {}, color: {}, effect: {} }}",
            self.power.map(|p| matches!(p, PowerState::On)),
            self.brightness,
            self.color.map(|c| (c.r, c.g, c.b)),
            self.effect.map(Effect::as_str)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };

    #[test]
    fn test_color_implies_solid_and_on() {
        let mut state = LightState {
            power: PowerState::Off,
            effect: Effect::Rainbow,
            ..LightState::new()
        };
        let changed = state.apply(&LightCommand {
            color: Some(RED),
            ..Default::default()
        });

        assert!(changed);
        assert_eq!(state.color, RED);
        assert_eq!(state.effect, Effect::Solid);
        assert!(state.is_on());
    }

    #[test]
    fn test_color_with_effect_keeps_effect() {
        let mut state = LightState::new();
        state.apply(&LightCommand {
            color: Some(RED),
            effect: Some(Effect::Cycle),
            ..Default::default()
        });
        assert_eq!(state.effect, Effect::Cycle);
    }

    #[test]
    fn test_brightness_zero_turns_off() {
        let mut state = LightState::new();
        let changed = state.apply(&LightCommand {
            brightness: Some(0),
            ..Default::default()
        });

        assert!(changed);
        assert!(!state.is_on());
        assert_eq!(state.brightness, DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn test_explicit_power_wins() {
        let mut state = LightState::new();
        state.apply(&LightCommand {
            power: Some(PowerState::Off),
            brightness: Some(200),
            ..Default::default()
        });

        assert!(!state.is_on());
        assert_eq!(state.brightness, 200);
    }

    #[test]
    fn test_unchanged_state() {
        let mut state = LightState::new();
        assert!(!state.apply(&LightCommand::power(PowerState::On)));
        assert!(!state.apply(&LightCommand::default()));
    }

    #[test]
    fn test_effect_animation_flags() {
        assert!(!Effect::Solid.is_animated());
        assert!(Effect::Cycle.is_animated());
        assert!(Effect::Rainbow.is_animated());
    }
}
