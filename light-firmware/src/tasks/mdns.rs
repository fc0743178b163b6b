// mDNS Responder Task - Advertised Hostname via Multicast DNS
//
// Dieser Task implementiert einen mDNS (Multicast DNS) Responder nach RFC 6762.
// Das Licht wird damit unter seiner Device-ID (z.B. "light-a1b2c3.local")
// im lokalen Netzwerk erreichbar, ohne dass ein DNS-Server benötigt wird.
//
// Nur A-Records (IPv4), kein Service Discovery.

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use core::net::{Ipv4Addr, SocketAddr};
use core::sync::atomic::{AtomicU32, Ordering};

use edge_mdns::{HostAnswersMdnsHandler, buf::VecBufAccess, domain::base::Ttl, host::Host, io};
use edge_nal::{MulticastV4, UdpBind, UdpSplit};
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use super::wifi::wait_for_network;
use crate::config::{
    MDNS_MULTICAST_ADDR, MDNS_PACKET_BUFFER_SIZE, MDNS_PORT, MDNS_RECONNECT_DELAY_SECS,
    MDNS_TTL_SECS, MDNS_UDP_BUFFER_SIZE,
};

/// UDP-Buffers für einen Socket (TX/RX je `MDNS_UDP_BUFFER_SIZE`)
type MdnsUdpBuffers = UdpBuffers<1, MDNS_UDP_BUFFER_SIZE, MDNS_UDP_BUFFER_SIZE>;

// Zähler statt echter Zufallszahlen: edge-mdns braucht nur eindeutige IDs
static RNG_COUNTER: AtomicU32 = AtomicU32::new(0);

fn mdns_rng(buf: &mut [u8]) {
    for chunk in buf.chunks_mut(4) {
        let bytes = RNG_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}

/// mDNS Responder Task
///
/// Advertised das Licht unter `<hostname>.local`. Der Hostname wird in
/// main.rs aus der Device-ID abgeleitet (`DeviceId::hostname()`), damit
/// mehrere Lichter im selben Netz nicht kollidieren.
///
/// # Ablauf
/// 1. Wartet auf WiFi-Link und DHCP-Adresse
/// 2. Bindet `0.0.0.0:MDNS_PORT` und joined `MDNS_MULTICAST_ADDR`
/// 3. Beantwortet A-Record Queries mit TTL `MDNS_TTL_SECS`
/// 4. Bei Fehlern: Neustart nach `MDNS_RECONNECT_DELAY_SECS`
///
/// ```bash
/// avahi-resolve -n light-a1b2c3.local
/// curl http://light-a1b2c3.local/state
/// ```
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Operationen
/// - `hostname`: Hostname ohne .local Suffix
#[embassy_executor::task]
pub async fn mdns_responder_task(stack: &'static Stack<'static>, hostname: &'static str) {
    info!("mDNS: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("mDNS: Network ready");

    let udp_buffers = MdnsUdpBuffers::new();

    loop {
        match run_mdns_responder(stack, hostname, &udp_buffers).await {
            Ok(_) => warn!("mDNS: Responder stopped normally"),
            Err(e) => error!("mDNS: Error: {}", e),
        }
        info!("mDNS: Reconnecting in {}s...", MDNS_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MDNS_RECONNECT_DELAY_SECS)).await;
    }
}

/// Führt mDNS Responder Loop aus
///
/// Die UDP-Buffers gehören dem Task und werden bei jedem Reconnect
/// wiederverwendet.
///
/// # Returns
/// - `Ok(())` - Responder gestoppt (normalerweise blocking)
/// - `Err(MdnsError)` - Socket-, Multicast- oder Responder-Fehler
async fn run_mdns_responder(
    stack: &'static Stack<'static>,
    hostname: &'static str,
    udp_buffers: &MdnsUdpBuffers,
) -> Result<(), MdnsError> {
    // IP-Adresse vom DHCP holen (kann nach Disconnect wieder fehlen)
    let our_ip = stack
        .config_v4()
        .ok_or(MdnsError::NoAddress)?
        .address
        .address();
    info!("mDNS: Using IP {}", Debug2Format(&our_ip));

    // UDP Adapter erstellen (edge-nal-embassy → embassy-net)
    let udp_stack = Udp::new(*stack, udp_buffers);

    // 0.0.0.0:MDNS_PORT, nur ein Interface (WiFi STA)
    let mut socket = udp_stack
        .bind(SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), MDNS_PORT))
        .await
        .map_err(|_| MdnsError::SocketBindFailed)?;

    socket
        .join_v4(Ipv4Addr::from(MDNS_MULTICAST_ADDR), Ipv4Addr::UNSPECIFIED)
        .await
        .map_err(|_| MdnsError::MulticastJoinFailed)?;

    let (recv, send) = socket.split();

    let host = Host {
        hostname,
        ipv4: our_ip.into(),
        // kein proto-ipv6 im Stack
        ipv6: [0u8; 16].into(),
        ttl: Ttl::from_secs(MDNS_TTL_SECS),
    };

    let recv_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();
    let send_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();

    // Broadcast-Signal wird nie ausgelöst, die API verlangt es trotzdem
    let signal = Signal::<NoopRawMutex, ()>::new();

    let mdns = io::Mdns::new(
        Some(our_ip),
        None,
        recv,
        send,
        recv_buf,
        send_buf,
        mdns_rng,
        &signal,
    );

    info!("mDNS: Responder running, advertising '{}.local'", hostname);

    mdns.run(HostAnswersMdnsHandler::new(&host))
        .await
        .map_err(|_| MdnsError::ResponderFailed)?;

    Ok(())
}

/// mDNS Fehler-Typen, jeder Fehler führt zu einem Neustart des Responders
#[derive(Debug)]
enum MdnsError {
    NoAddress,
    SocketBindFailed,
    MulticastJoinFailed,
    ResponderFailed,
}

impl defmt::Format for MdnsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MdnsError::NoAddress => defmt::write!(fmt, "No IPv4 address"),
            MdnsError::SocketBindFailed => defmt::write!(fmt, "Socket bind failed"),
            MdnsError::MulticastJoinFailed => defmt::write!(fmt, "Multicast join failed"),
            MdnsError::ResponderFailed => defmt::write!(fmt, "Responder failed"),
        }
    }
}
