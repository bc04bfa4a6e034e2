//! Platform services the orchestrator needs from its host

use neurolink_core::Clock;

/// Console and delay services of a port or board, on top of its clock
///
/// None of these may be called from inside a module tick; the orchestrator
/// only uses them during setup and for tick measurement.
pub trait Platform: Clock {
    /// Bring up the diagnostic console
    fn init_console(&mut self, baud_rate: u32);

    /// Busy or sleeping wait, only used before boot
    fn delay_ms(&mut self, millis: u32);

    /// Emit one line on the diagnostic console
    fn write_line(&mut self, line: &str);
}
