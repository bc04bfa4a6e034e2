#![no_std]
#![no_main]

//! Neurolink control unit firmware for the ESP32-S3
//!
//! Brings the console up, waits for it to settle, prints the boot banner and
//! then sweeps all subsystems forever. A halted boot parks the core; a fatal
//! fault during the loop dumps the recent lifecycle trace and resets the chip.

use embedded_hal::delay::DelayNs;
use esp_backtrace as _;
use esp_hal::{delay::Delay, prelude::*};
use esp_println::println;

use neurolink_core::{Clock, SystemState};
use neurolink_sched::{Orchestrator, OrchestratorConfig, Platform};
use neurolink_trace::SharedTrace;

static TRACE: SharedTrace<64> = SharedTrace::new();

struct Esp32s3 {
    delay: Delay,
}

impl Clock for Esp32s3 {
    fn now_us(&self) -> u64 {
        esp_hal::time::now().duration_since_epoch().to_micros()
    }
}

impl Platform for Esp32s3 {
    fn init_console(&mut self, baud_rate: u32) {
        // UART0 is left at its ROM bootloader rate, which matches the default.
        esp_println::logger::init_logger(log::LevelFilter::Info);
        log::debug!("console at {baud_rate} baud");
    }

    fn delay_ms(&mut self, millis: u32) {
        DelayNs::delay_ms(&mut self.delay, millis);
    }

    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

fn dump_trace() {
    while let Some(record) = TRACE.pop() {
        println!("  {}", record);
    }
}

#[entry]
fn main() -> ! {
    let _peripherals = esp_hal::init(esp_hal::Config::default());
    let platform = Esp32s3 {
        delay: Delay::new(),
    };

    // The ring keeps roughly the last three sweeps.
    let mut hook = &TRACE;

    let mut nl = Orchestrator::new(OrchestratorConfig::default(), platform);
    let err = match nl.setup(&mut hook) {
        Ok(()) => nl.run(&mut hook),
        Err(err) => err,
    };

    println!("neurolink: {}", err);
    dump_trace();

    if nl.state() == SystemState::Halted {
        // Rebooting would fail the same setup again.
        loop {
            nl.platform_mut().delay_ms(1_000);
        }
    }

    esp_hal::reset::software_reset();
    loop {}
}
