// MQTT Task - Meldet den Licht-Zustand und empfängt Kommandos vom Broker
use defmt::{Debug2Format, debug, error, info, warn};
use embassy_futures::select::{Either3, select3};
use embassy_net::{IpAddress, Stack, dns::DnsQueryType, tcp, tcp::TcpSocket};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Timer, with_timeout};

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;

use light_core::KeepAlive;
use light_core::protocol::{decode_command, encode_state};

use super::wifi::wait_for_network;
use crate::config::*;
use crate::{DeviceId, LightCommandSender, LightState, LightStateSubscriber, current_state};

/// MQTT Task - läuft parallel zu anderen Tasks
///
/// - Wartet auf Netzwerk-Verbindung
/// - Verbindet sich mit dem Broker (Client-ID = Device-ID)
/// - Abonniert `MQTT_COMMAND_TOPIC` und leitet Kommandos an den Light-Task
/// - Published jeden neuen Zustand retained auf `MQTT_STATE_TOPIC`
/// - Automatisches Reconnect bei Fehlern
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `state_subscriber`: PubSub Subscriber für Zustands-Broadcasts
/// - `command_sender`: Channel Sender für Kommandos an den Light-Task
/// - `device_id`: Device-ID aus Präfix + MAC
#[embassy_executor::task]
pub async fn mqtt_task(
    stack: &'static Stack<'static>,
    mut state_subscriber: LightStateSubscriber,
    command_sender: LightCommandSender,
    device_id: &'static DeviceId,
) {
    info!("MQTT: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("MQTT: Network ready");

    loop {
        match mqtt_session(stack, &mut state_subscriber, command_sender, device_id).await {
            Ok(_) => warn!("MQTT: Connection closed normally"),
            Err(e) => error!("MQTT: Error: {}", e),
        }
        info!("MQTT: Reconnecting in {}s...", MQTT_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)).await;
    }
}

/// Eine komplette Broker-Sitzung
///
/// 1. DNS-Auflösung des Broker-Hostnames
/// 2. TCP-Verbindung aufbauen
/// 3. MQTT CONNECT (optional mit Benutzer/Passwort)
/// 4. Command-Topic abonnieren, aktuellen Zustand publishen
/// 5. Kommandos, Zustands-Updates und Keep-Alive bedienen
///
/// Ein begonnenes `receive_message` wird nie abgebrochen: die Schleife wartet
/// nur darauf, dass Daten im Socket liegen, und liest das Paket dann komplett.
/// Keep-Alive läuft über den retained Zustand statt PINGREQ, damit kein
/// Antwortpaket mit eingehenden Kommandos konkurriert.
///
/// Bei jedem Fehler endet die Sitzung und der Haupt-Loop verbindet neu.
async fn mqtt_session(
    stack: &'static Stack<'static>,
    state_subscriber: &mut LightStateSubscriber,
    command_sender: LightCommandSender,
    device_id: &'static DeviceId,
) -> Result<(), MqttError> {
    // DNS Lookup
    info!("MQTT: Resolving '{}'...", MQTT_SERVER);
    let broker_ip = resolve_hostname(stack, MQTT_SERVER).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    // TCP Connect
    let mut rx_buffer = [0u8; MQTT_TCP_BUFFER_SIZE];
    let mut tx_buffer = [0u8; MQTT_TCP_BUFFER_SIZE];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(
        MQTT_KEEP_ALIVE_SECS as u64 * 2,
    )));

    socket
        .connect((broker_ip, MQTT_PORT))
        .await
        .map_err(|_| MqttError::ConnectionFailed)?;
    info!("MQTT: TCP connected");

    // Client und Session-Schleife teilen sich den Socket
    let socket = Mutex::<NoopRawMutex, _>::new(socket);

    // MQTT Client Configuration
    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, CountingRng(20000));
    config.add_client_id(device_id.as_str());
    if LIGHT_CONFIG.has_mqtt_credentials() {
        config.add_username(MQTT_USER);
        config.add_password(MQTT_PASSWORD);
    }
    config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];

    let mut client = MqttClient::<_, 5, _>::new(
        BrokerConnection { socket: &socket },
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );

    client
        .connect_to_broker()
        .await
        .map_err(|_| MqttError::ProtocolError)?;
    info!("MQTT: Connected to broker as '{}'", device_id);

    client
        .subscribe_to_topic(MQTT_COMMAND_TOPIC)
        .await
        .map_err(|_| MqttError::SubscribeFailed)?;
    info!("MQTT: Subscribed to '{}'", MQTT_COMMAND_TOPIC);

    let mut keep_alive = KeepAlive::new(
        Duration::from_secs(MQTT_KEEP_ALIVE_SECS as u64 / 2).as_millis(),
        Instant::now().as_millis(),
    );
    let mut json_buffer = [0u8; JSON_BUFFER_SIZE];

    // Nach (Re-)Connect sofort den aktuellen Zustand melden (retained)
    let mut pending_state = Some(current_state());

    loop {
        if let Some(state) = pending_state.take() {
            client
                .send_message(
                    MQTT_STATE_TOPIC,
                    state_payload(&state, &mut json_buffer)?,
                    QualityOfService::QoS0,
                    true,
                )
                .await
                .map_err(|_| MqttError::PublishFailed)?;
            keep_alive.record_send(Instant::now().as_millis());
            debug!("MQTT: Published {}", state);
        }

        // Nur Warten wird abgebrochen, nie ein angefangenes Lesen
        let event = select3(
            wait_read_ready(&socket),
            state_subscriber.next_message_pure(),
            Timer::at(Instant::from_millis(keep_alive.deadline_ms())),
        )
        .await;

        match event {
            // Daten vom Broker: Paket vollständig lesen
            Either3::First(()) => {
                let (topic, payload) = client
                    .receive_message()
                    .await
                    .map_err(|_| MqttError::ReceiveFailed)?;
                if topic != MQTT_COMMAND_TOPIC {
                    warn!("MQTT: Ignoring message on '{}'", topic);
                    continue;
                }

                match decode_command(payload) {
                    Ok(command) => {
                        info!("MQTT: Command received: {}", command);
                        command_sender.send(command).await;
                    }
                    Err(e) => warn!("MQTT: Invalid command payload: {}", e),
                }
            }
            // Neuer Zustand vom Light-Task
            Either3::Second(state) => pending_state = Some(state),
            // Keep-Alive fällig: aktuellen Zustand erneut melden
            Either3::Third(()) => pending_state = Some(current_state()),
        }
    }
}

async fn wait_read_ready(socket: &Mutex<NoopRawMutex, TcpSocket<'_>>) {
    socket.lock().await.wait_read_ready().await
}

/// Socket-Zugriff für den MQTT Client
///
/// Jeder Lese-/Schreibvorgang sperrt den Socket nur für seine Dauer, damit
/// die Session-Schleife zwischen zwei Paketen auf Daten warten kann.
struct BrokerConnection<'a, 's> {
    socket: &'a Mutex<NoopRawMutex, TcpSocket<'s>>,
}

impl embedded_io_async::ErrorType for BrokerConnection<'_, '_> {
    type Error = tcp::Error;
}

impl embedded_io_async::Read for BrokerConnection<'_, '_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.socket.lock().await.read(buf).await
    }
}

impl embedded_io_async::Write for BrokerConnection<'_, '_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.socket.lock().await.write(buf).await
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.socket.lock().await.flush().await
    }
}

/// Serialisiert den Zustand für `MQTT_STATE_TOPIC`
fn state_payload<'a>(state: &LightState, buf: &'a mut [u8]) -> Result<&'a [u8], MqttError> {
    let len = encode_state(state, buf).map_err(|_| MqttError::EncodeFailed)?;
    Ok(&buf[..len])
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<embassy_net::Ipv4Address, MqttError> {
    // IP-Literale ohne DNS-Query
    if let Ok(ip) = hostname.parse() {
        return Ok(ip);
    }

    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(MqttError::DnsResolutionFailed),
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

/// MQTT Fehler-Typen
///
/// Jeder Fehler beendet die Sitzung und führt zu einem Reconnect.
#[derive(Debug)]
enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    ProtocolError,
    SubscribeFailed,
    ReceiveFailed,
    EncodeFailed,
    PublishFailed,
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::SubscribeFailed => defmt::write!(fmt, "Subscribe failed"),
            MqttError::ReceiveFailed => defmt::write!(fmt, "Receive failed"),
            MqttError::EncodeFailed => defmt::write!(fmt, "State encoding failed"),
            MqttError::PublishFailed => defmt::write!(fmt, "Publish failed"),
        }
    }
}
