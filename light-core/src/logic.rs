//! Pure Business Logic Functions
//!
//! Effekt-Berechnung und Licht-Controller ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::traits::{LedError, SmartLedWriter};
use crate::types::{Effect, LightCommand, LightState};

/// Anzahl Frames pro Farbschritt im `Cycle` Effekt
/// Bei 40 ms Frame-Intervall ≈ 1 Sekunde pro Farbe
pub const CYCLE_STEP_FRAMES: u32 = 25;

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Rotiert RGB-Farbwerte zyklisch: Rot → Grün → Blau → Rot
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use light_core::rotate_color;
/// let mut color = RGB8 { r: 10, g: 0, b: 0 };  // Rot
/// color = rotate_color(color);                  // → Grün
/// assert_eq!(color, RGB8 { r: 0, g: 10, b: 0 });
/// ```
pub fn rotate_color(color: RGB8) -> RGB8 {
    RGB8 {
        r: color.b,
        g: color.r,
        b: color.g,
    }
}

/// Skaliert eine Farbe mit der globalen Helligkeit
///
/// 255 lässt die Farbe unverändert, 0 ergibt Schwarz.
pub fn scale_brightness(color: RGB8, brightness: u8) -> RGB8 {
    let scale = |channel: u8| ((channel as u16 * (brightness as u16 + 1)) >> 8) as u8;
    RGB8 {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}

/// Farbrad mit 256 Positionen: Rot → Grün → Blau → Rot
pub fn color_wheel(position: u8) -> RGB8 {
    let pos = position as u16;
    match position {
        0..=84 => RGB8 {
            r: (255 - pos * 3) as u8,
            g: (pos * 3) as u8,
            b: 0,
        },
        85..=169 => {
            let pos = pos - 85;
            RGB8 {
                r: 0,
                g: (255 - pos * 3) as u8,
                b: (pos * 3) as u8,
            }
        }
        _ => {
            let pos = pos - 170;
            RGB8 {
                r: (pos * 3) as u8,
                g: 0,
                b: (255 - pos * 3) as u8,
            }
        }
    }
}

/// Berechnet einen Frame für den gesamten Strip
///
/// `frame` ist ein fortlaufender Zähler, der die Animation antreibt.
pub fn render_frame(state: &LightState, frame: u32, pixels: &mut [RGB8]) {
    if !state.is_on() {
        pixels.fill(BLACK);
        return;
    }

    match state.effect {
        Effect::Solid => pixels.fill(scale_brightness(state.color, state.brightness)),
        Effect::Cycle => {
            let mut color = state.color;
            for _ in 0..(frame / CYCLE_STEP_FRAMES) % 3 {
                color = rotate_color(color);
            }
            pixels.fill(scale_brightness(color, state.brightness));
        }
        Effect::Rainbow => {
            let len = pixels.len().max(1);
            for (i, pixel) in pixels.iter_mut().enumerate() {
                let offset = (i * 256 / len) as u32;
                let position = offset.wrapping_add(frame) as u8;
                *pixel = scale_brightness(color_wheel(position), state.brightness);
            }
        }
    }
}

/// Licht-Controller - Single Source of Truth für den Licht-Zustand
///
/// Hält Zustand und Frame-Zähler. Der Light-Task in der Firmware
/// wendet Kommandos an und ruft periodisch `render_next()` auf.
pub struct LightController {
    state: LightState,
    frame: u32,
    dirty: bool,
}

impl LightController {
    pub const fn new(state: LightState) -> Self {
        Self {
            state,
            frame: 0,
            dirty: true,
        }
    }

    pub fn state(&self) -> LightState {
        self.state
    }

    /// Wendet ein Kommando an, `true` wenn sich der Zustand geändert hat
    pub fn apply(&mut self, command: &LightCommand) -> bool {
        let changed = self.state.apply(command);
        self.dirty |= changed;
        changed
    }

    /// true wenn der nächste Frame auf die LEDs geschrieben werden muss
    pub fn needs_redraw(&self) -> bool {
        self.dirty || (self.state.is_on() && self.state.effect.is_animated())
    }

    /// Berechnet den nächsten Frame und schreibt ihn auf die LEDs
    ///
    /// Ohne Änderung und ohne Animation wird nichts geschrieben.
    /// Bei einem Schreibfehler bleibt der Frame "dirty" und wird
    /// beim nächsten Aufruf wiederholt.
    pub fn render_next<L: SmartLedWriter>(
        &mut self,
        led: &mut L,
        pixels: &mut [RGB8],
    ) -> Result<bool, LedError> {
        if !self.needs_redraw() {
            return Ok(false);
        }

        render_frame(&self.state, self.frame, pixels);
        self.frame = self.frame.wrapping_add(1);

        led.write(pixels)?;
        self.dirty = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerState;

    #[test]
    fn test_rotate_color_full_cycle() {
        let mut color = RGB8 { r: 10, g: 0, b: 0 };
        color = rotate_color(color); // Rot → Grün
        assert_eq!(color, RGB8 { r: 0, g: 10, b: 0 });
        color = rotate_color(color); // Grün → Blau
        assert_eq!(color, RGB8 { r: 0, g: 0, b: 10 });
        color = rotate_color(color); // Blau → Rot
        assert_eq!(color, RGB8 { r: 10, g: 0, b: 0 });
    }

    #[test]
    fn test_scale_brightness_bounds() {
        let white = RGB8 {
            r: 255,
            g: 255,
            b: 255,
        };
        assert_eq!(scale_brightness(white, 255), white);
        assert_eq!(scale_brightness(white, 0), BLACK);
        assert_eq!(scale_brightness(white, 127), RGB8 { r: 127, g: 127, b: 127 });
    }

    #[test]
    fn test_color_wheel_primaries() {
        assert_eq!(color_wheel(0), RGB8 { r: 255, g: 0, b: 0 });
        assert_eq!(color_wheel(85), RGB8 { r: 0, g: 255, b: 0 });
        assert_eq!(color_wheel(170), RGB8 { r: 0, g: 0, b: 255 });
        assert_eq!(color_wheel(255), RGB8 { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn test_render_off_is_black() {
        let state = LightState {
            power: PowerState::Off,
            ..LightState::new()
        };
        let mut pixels = [RGB8 { r: 1, g: 2, b: 3 }; 4];
        render_frame(&state, 7, &mut pixels);
        assert!(pixels.iter().all(|p| *p == BLACK));
    }

    #[test]
    fn test_render_cycle_steps() {
        let state = LightState {
            brightness: 255,
            color: RGB8 { r: 10, g: 0, b: 0 },
            effect: Effect::Cycle,
            ..LightState::new()
        };
        let mut pixels = [BLACK; 2];

        render_frame(&state, 0, &mut pixels);
        assert_eq!(pixels[0], RGB8 { r: 10, g: 0, b: 0 });

        render_frame(&state, CYCLE_STEP_FRAMES, &mut pixels);
        assert_eq!(pixels[1], RGB8 { r: 0, g: 10, b: 0 });

        render_frame(&state, 3 * CYCLE_STEP_FRAMES, &mut pixels);
        assert_eq!(pixels[0], RGB8 { r: 10, g: 0, b: 0 });
    }

    #[test]
    fn test_render_rainbow_spreads_over_strip() {
        let state = LightState {
            brightness: 255,
            effect: Effect::Rainbow,
            ..LightState::new()
        };
        let mut pixels = [BLACK; 3];
        render_frame(&state, 0, &mut pixels);

        assert_eq!(pixels[0], color_wheel(0));
        assert_eq!(pixels[1], color_wheel(85));
        assert_eq!(pixels[2], color_wheel(170));
    }
}
