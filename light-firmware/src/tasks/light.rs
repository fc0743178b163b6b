// Light Task - Rendert den Licht-Zustand über RMT auf den LED-Strip
use defmt::{error, info};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Ticker};
use esp_hal::gpio::AnyPin;
use esp_hal_smartled::smart_led_buffer;
use rgb::RGB8;

use crate::config::{FRAME_INTERVAL_MS, NUM_LEDS, RMT_CLOCK_MHZ};
use crate::hal::RmtLedWriter;
use crate::{
    LightCommandReceiver, LightController, LightStatePublisher, SmartLedWriter, current_state,
    set_current_state,
};

/// Light Logic - Testbare Steuerungs-Logik ohne Hardware-Abhängigkeit
///
/// - Empfängt Kommandos von MQTT und WebSocket
/// - Wendet sie auf den `LightController` an (Single Source of Truth)
/// - Meldet Zustands-Änderungen an alle Subscribers
/// - Zeichnet animierte Effekte alle `FRAME_INTERVAL_MS`
///
/// # Trait-basierte Abstraktion
/// `L: SmartLedWriter` ist auf dem Gerät der `RmtLedWriter`. Die Host-Tests in
/// light-tests treiben nicht diese Funktion, sondern den `LightController`
/// direkt mit `MockLedWriter`.
pub async fn light_logic<L: SmartLedWriter>(
    mut led: L,
    state_publisher: LightStatePublisher,
    command_receiver: LightCommandReceiver,
) -> ! {
    let mut controller = LightController::new(current_state());
    let mut pixels = [RGB8::default(); NUM_LEDS];
    let mut ticker = Ticker::every(Duration::from_millis(FRAME_INTERVAL_MS));

    // Startzustand melden (MQTT retained + offene WebSockets)
    state_publisher.publish_immediate(controller.state());
    info!("LED: Initial state {}", controller.state());

    loop {
        // Kommando oder nächster Frame, je nachdem was zuerst kommt
        if let Either::First(command) = select(command_receiver.receive(), ticker.next()).await {
            info!("LED: Command received: {}", command);

            if controller.apply(&command) {
                let state = controller.state();
                set_current_state(state);
                state_publisher.publish_immediate(state);
                info!("LED: Published {}", state);
            }
        }

        if let Err(e) = controller.render_next(&mut led, &mut pixels) {
            error!("LED: Failed to write frame: {}", e);
        }
    }
}

/// Light Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung und ruft dann `light_logic()` auf.
///
/// # Parameter
/// - `data_pin`: GPIO für die LED-Datenleitung (DATA_PIN aus config.rs)
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `state_publisher`: PubSub Publisher für Zustands-Broadcasts
/// - `command_receiver`: Channel Receiver für Kommandos
#[embassy_executor::task]
pub async fn light_task(
    data_pin: AnyPin<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    state_publisher: LightStatePublisher,
    command_receiver: LightCommandReceiver,
) {
    // Buffer für SmartLED Daten (NUM_LEDS LEDs)
    let mut rmt_buffer = smart_led_buffer!(NUM_LEDS);

    match RmtLedWriter::new(data_pin, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => light_logic(led, state_publisher, command_receiver).await,
        Err(e) => error!("LED: RMT initialization failed: {}", e),
    }
}
