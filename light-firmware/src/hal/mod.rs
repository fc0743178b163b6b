// Hardware Abstraction Layer (HAL) Module
//
// Kapselt Hardware-Zugriffe hinter den Traits aus light-core.

pub mod led_writer;

pub use led_writer::RmtLedWriter;
