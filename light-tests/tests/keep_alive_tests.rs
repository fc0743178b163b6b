//! Integration Tests für den Keep-Alive Zeitplan der Broker-Sitzung
//!
//! Die Sitzung sendet spätestens zur Frist den retained Zustand erneut.
//! Empfangene Kommandos verschieben die Frist nicht.

use light_core::KeepAlive;

/// Halbes Keep-Alive von 30s
const INTERVAL_MS: u64 = 15_000;

#[test]
fn test_first_deadline_after_connect() {
    let keep_alive = KeepAlive::new(INTERVAL_MS, 2_000);
    assert_eq!(keep_alive.deadline_ms(), 17_000);
    assert!(!keep_alive.is_due(16_999));
}

#[test]
fn test_state_publish_postpones_deadline() {
    let mut keep_alive = KeepAlive::new(INTERVAL_MS, 0);

    // Zustands-Update vom Light-Task kurz vor der Frist
    keep_alive.record_send(14_000);
    assert!(!keep_alive.is_due(15_000));
    assert_eq!(keep_alive.deadline_ms(), 29_000);
}

#[test]
fn test_incoming_commands_do_not_postpone_deadline() {
    let keep_alive = KeepAlive::new(INTERVAL_MS, 0);

    // Kommandos werden nur gelesen, record_send wird nicht aufgerufen
    for now_ms in [1_000, 5_000, 14_999] {
        assert!(!keep_alive.is_due(now_ms));
    }
    assert!(keep_alive.is_due(INTERVAL_MS));
}

#[test]
fn test_heartbeat_sequence() {
    let mut keep_alive = KeepAlive::new(INTERVAL_MS, 0);
    let mut now_ms = 0;

    for _ in 0..3 {
        now_ms = keep_alive.deadline_ms();
        assert!(keep_alive.is_due(now_ms));
        keep_alive.record_send(now_ms);
    }

    assert_eq!(now_ms, 3 * INTERVAL_MS);
    assert_eq!(keep_alive.deadline_ms(), 4 * INTERVAL_MS);
}
