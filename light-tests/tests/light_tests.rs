//! Integration Tests für Licht-Zustand und Controller
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockLedWriter

use light_core::{
    Effect, LedError, LightCommand, LightController, LightState, PowerState, SmartLedWriter,
    scale_brightness,
};
use rgb::RGB8;

const NUM_LEDS: usize = 8;
const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_frame: Option<Vec<RGB8>>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_frame = Some(pixels.to_vec());
        self.write_count += 1;
        Ok(())
    }
}

fn red_command() -> LightCommand {
    LightCommand {
        color: Some(RGB8 { r: 255, g: 0, b: 0 }),
        brightness: Some(255),
        ..Default::default()
    }
}

// ============================================================================
// Tests: MockLedWriter
// ============================================================================

#[test]
fn test_mock_led_writer_fail() {
    let mut mock = MockLedWriter::new();
    mock.fail_next_write = true;

    let result = mock.write(&[RGB8 { r: 10, g: 0, b: 0 }]);
    assert_eq!(result, Err(LedError::WriteFailed));
    assert_eq!(mock.write_count, 0);
    assert_eq!(mock.last_frame, None);
}

// ============================================================================
// Tests: LightController
// ============================================================================

#[test]
fn test_initial_frame_is_written() {
    let mut controller = LightController::new(LightState::new());
    let mut led = MockLedWriter::new();
    let mut pixels = [BLACK; NUM_LEDS];

    assert_eq!(controller.render_next(&mut led, &mut pixels), Ok(true));

    let expected = scale_brightness(LightState::new().color, LightState::new().brightness);
    let frame = led.last_frame.as_ref().unwrap();
    assert_eq!(frame.len(), NUM_LEDS);
    assert!(frame.iter().all(|p| *p == expected));
}

#[test]
fn test_solid_state_is_not_redrawn() {
    let mut controller = LightController::new(LightState::new());
    let mut led = MockLedWriter::new();
    let mut pixels = [BLACK; NUM_LEDS];

    controller.render_next(&mut led, &mut pixels).unwrap();
    assert_eq!(controller.render_next(&mut led, &mut pixels), Ok(false));
    assert_eq!(controller.render_next(&mut led, &mut pixels), Ok(false));
    assert_eq!(led.write_count, 1);
}

#[test]
fn test_command_triggers_redraw() {
    let mut controller = LightController::new(LightState::new());
    let mut led = MockLedWriter::new();
    let mut pixels = [BLACK; NUM_LEDS];
    controller.render_next(&mut led, &mut pixels).unwrap();

    assert!(controller.apply(&red_command()));
    assert!(controller.needs_redraw());
    controller.render_next(&mut led, &mut pixels).unwrap();

    assert_eq!(led.write_count, 2);
    assert_eq!(led.last_frame.as_ref().unwrap()[0], RGB8 { r: 255, g: 0, b: 0 });
}

#[test]
fn test_repeated_command_does_not_redraw() {
    let mut controller = LightController::new(LightState::new());
    let mut led = MockLedWriter::new();
    let mut pixels = [BLACK; NUM_LEDS];

    controller.apply(&red_command());
    controller.render_next(&mut led, &mut pixels).unwrap();

    assert!(!controller.apply(&red_command()));
    assert!(!controller.needs_redraw());
}

#[test]
fn test_animated_effect_redraws_every_frame() {
    let mut controller = LightController::new(LightState::new());
    let mut led = MockLedWriter::new();
    let mut pixels = [BLACK; NUM_LEDS];

    controller.apply(&LightCommand {
        effect: Some(Effect::Rainbow),
        ..Default::default()
    });
    for _ in 0..5 {
        assert_eq!(controller.render_next(&mut led, &mut pixels), Ok(true));
    }
    assert_eq!(led.write_count, 5);
}

#[test]
fn test_off_stops_animation_after_black_frame() {
    let mut controller = LightController::new(LightState::new());
    let mut led = MockLedWriter::new();
    let mut pixels = [BLACK; NUM_LEDS];

    controller.apply(&LightCommand {
        effect: Some(Effect::Cycle),
        ..Default::default()
    });
    controller.render_next(&mut led, &mut pixels).unwrap();

    controller.apply(&LightCommand::power(PowerState::Off));
    assert_eq!(controller.render_next(&mut led, &mut pixels), Ok(true));
    assert!(led.last_frame.as_ref().unwrap().iter().all(|p| *p == BLACK));

    assert_eq!(controller.render_next(&mut led, &mut pixels), Ok(false));
    assert_eq!(controller.state().effect, Effect::Cycle);
}

#[test]
fn test_failed_write_is_retried() {
    let mut controller = LightController::new(LightState::new());
    let mut led = MockLedWriter::new();
    let mut pixels = [BLACK; NUM_LEDS];
    led.fail_next_write = true;

    assert_eq!(
        controller.render_next(&mut led, &mut pixels),
        Err(LedError::WriteFailed)
    );
    assert!(controller.needs_redraw());

    assert_eq!(controller.render_next(&mut led, &mut pixels), Ok(true));
    assert_eq!(led.write_count, 1);
}

#[test]
fn test_turn_on_via_brightness() {
    let mut controller = LightController::new(LightState {
        power: PowerState::Off,
        ..LightState::new()
    });

    assert!(controller.apply(&LightCommand {
        brightness: Some(10),
        ..Default::default()
    }));
    let state = controller.state();
    assert!(state.is_on());
    assert_eq!(state.brightness, 10);
}
