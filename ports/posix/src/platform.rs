//! Host platform backed by `std`

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use neurolink_core::Clock;
use neurolink_sched::Platform;

/// Platform that writes console lines to any `Write` sink
///
/// The clock counts microseconds since construction.
pub struct StdPlatform<W: Write> {
    start: Instant,
    out: W,
}

impl StdPlatform<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StdPlatform<W> {
    pub fn new(out: W) -> Self {
        Self {
            start: Instant::now(),
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clock for StdPlatform<W> {
    fn now_us(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

impl<W: Write> Platform for StdPlatform<W> {
    fn init_console(&mut self, baud_rate: u32) {
        // A host console has no line rate; keep the value for the log only.
        log::debug!("console ready ({baud_rate} baud requested)");
    }

    fn delay_ms(&mut self, millis: u32) {
        thread::sleep(Duration::from_millis(u64::from(millis)));
    }

    fn write_line(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            log::warn!("console write failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_line_appends_newline() {
        let mut platform = StdPlatform::new(Vec::new());
        platform.write_line("hello");
        platform.write_line("world");
        assert_eq!(platform.into_inner(), b"hello\nworld\n");
    }

    #[test]
    fn test_delay_advances_clock() {
        let mut platform = StdPlatform::new(io::sink());
        let before = platform.now_us();
        platform.delay_ms(2);
        assert!(platform.now_us() >= before + 2_000);
    }
}
