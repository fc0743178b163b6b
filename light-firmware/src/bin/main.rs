// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi und picoserve benötigen dynamischen Speicher)
extern crate alloc;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, DhcpConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::efuse::Efuse;
use esp_hal::gpio::AnyPin;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use wifi_light::config::{
    DATA_PIN, EXTRA_HEAP_SIZE, HTTP_WORKERS, ID_PREFIX, WEBSOCKET_WORKERS, WIFI_HEAP_SIZE,
};
use wifi_light::tasks::{
    connection_task, dhcp_task, http_server_task, light_task, mdns_responder_task, mqtt_task,
    net_task, websocket_task,
};
use wifi_light::{DeviceId, Hostname, LightCommandChannel, LightStateChannel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi und Channels, spawnt alle Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Zwei Heap-Bereiche: reclaimed RAM + extra
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Device-ID: Präfix + letzte 3 MAC-Bytes (z.B. "LIGHT-a1b2c3")
    // Das Präfix ist zur Build-Zeit geprüft, new() kann hier nicht fehlschlagen
    static DEVICE_ID: static_cell::StaticCell<DeviceId> = static_cell::StaticCell::new();
    let device_id = &*DEVICE_ID.init(
        DeviceId::new(ID_PREFIX, Efuse::mac_address()).expect("ID_PREFIX validated at build time"),
    );
    info!("Device ID: {}", device_id);

    static HOSTNAME: static_cell::StaticCell<Hostname> = static_cell::StaticCell::new();
    let hostname: &'static str = HOSTNAME.init(device_id.hostname());

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Der Router sieht dieselbe ID wie mDNS
    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname = hostname.try_into().ok();
    if dhcp_config.hostname.is_none() {
        warn!("WiFi: Hostname '{}' not usable for DHCP", hostname);
    }

    // Sockets: MQTT (1) + HTTP_WORKERS + WEBSOCKET_WORKERS + DNS/mDNS + Reserve
    static RESOURCES: static_cell::StaticCell<StackResources<12>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(dhcp_config),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Zustands-Channel (Light → MQTT + WebSocket), Broadcast an alle Subscribers
    static STATE_CHANNEL: static_cell::StaticCell<LightStateChannel> =
        static_cell::StaticCell::new();
    let state_channel = &*STATE_CHANNEL.init(LightStateChannel::new());
    let state_publisher = state_channel
        .publisher()
        .expect("first publisher on a fresh channel");

    // Kommando-Channel (MQTT + WebSocket → Light)
    static COMMAND_CHANNEL: static_cell::StaticCell<LightCommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = COMMAND_CHANNEL.init(LightCommandChannel::new());
    let command_sender = command_channel.sender();
    let command_receiver = command_channel.receiver();

    // SAFETY: DATA_PIN ist zur Build-Zeit als Ausgangs-Pin geprüft und wird
    // außer vom Light-Task von nichts anderem verwendet.
    let data_pin = unsafe { AnyPin::steal(DATA_PIN) };

    spawner
        .spawn(light_task(
            data_pin,
            peripherals.RMT,
            state_publisher,
            command_receiver,
        ))
        .unwrap();

    // WiFi Tasks
    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // MQTT (eigener Subscriber für Zustands-Updates)
    let mqtt_subscriber = state_channel
        .subscriber()
        .expect("subscriber slot for MQTT");
    spawner
        .spawn(mqtt_task(stack, mqtt_subscriber, command_sender, device_id))
        .unwrap();

    // HTTP Server Tasks (Seite + /state)
    for task_id in 0..HTTP_WORKERS {
        spawner.spawn(http_server_task(task_id, stack)).unwrap();
    }

    // WebSocket Tasks, Subscriber werden pro Verbindung erstellt
    for task_id in 0..WEBSOCKET_WORKERS {
        spawner
            .spawn(websocket_task(task_id, stack, state_channel, command_sender))
            .unwrap();
    }

    // mDNS Responder (<device-id>.local)
    spawner.spawn(mdns_responder_task(stack, hostname)).unwrap();

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
