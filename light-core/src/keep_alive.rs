//! Keep-Alive Zeitplan für die Broker-Verbindung
//!
//! Der Broker trennt, wenn der Client länger als das Keep-Alive-Intervall
//! nichts sendet. Empfangene Pakete zählen dabei nicht. Die Frist hängt also
//! nur am letzten eigenen Sendevorgang.

/// Frist für das nächste ausgehende Paket (Zeiten in Millisekunden)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    interval_ms: u64,
    last_sent_ms: u64,
}

impl KeepAlive {
    /// `now_ms` ist der Zeitpunkt des CONNECT
    pub const fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sent_ms: now_ms,
        }
    }

    /// Nach jedem gesendeten Paket aufrufen
    pub fn record_send(&mut self, now_ms: u64) {
        self.last_sent_ms = self.last_sent_ms.max(now_ms);
    }

    /// Spätester Zeitpunkt für das nächste Paket
    pub const fn deadline_ms(&self) -> u64 {
        self.last_sent_ms.saturating_add(self.interval_ms)
    }

    pub const fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.deadline_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_follows_last_send() {
        let mut keep_alive = KeepAlive::new(15_000, 1_000);
        assert_eq!(keep_alive.deadline_ms(), 16_000);

        keep_alive.record_send(10_000);
        assert_eq!(keep_alive.deadline_ms(), 25_000);
        assert!(!keep_alive.is_due(24_999));
        assert!(keep_alive.is_due(25_000));
    }

    #[test]
    fn test_send_never_moves_deadline_backwards() {
        let mut keep_alive = KeepAlive::new(15_000, 10_000);
        keep_alive.record_send(5_000);
        assert_eq!(keep_alive.deadline_ms(), 25_000);
    }

    #[test]
    fn test_deadline_saturates() {
        let keep_alive = KeepAlive::new(15_000, u64::MAX - 1);
        assert_eq!(keep_alive.deadline_ms(), u64::MAX);
    }
}
