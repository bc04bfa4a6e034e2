//! Run statistics

use core::fmt;

use neurolink_core::{ModuleId, Report};

/// Counters accumulated by the orchestrator across boot and all sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Sweeps that finished without a fatal fault
    pub sweeps: u64,
    pub transient_faults: u64,
    pub overruns: u64,
    pub disabled_modules: u32,
    /// Slowest leaf tick seen so far, in microseconds
    pub longest_tick: Option<(ModuleId, u64)>,
}

impl RunStats {
    pub(crate) fn record_boot(&mut self, report: &Report) {
        self.disabled_modules = self.disabled_modules.saturating_add(report.disabled);
        self.absorb(report);
    }

    pub(crate) fn record_sweep(&mut self, report: &Report, completed: bool) {
        if completed {
            self.sweeps = self.sweeps.wrapping_add(1);
        }
        self.absorb(report);
    }

    fn absorb(&mut self, report: &Report) {
        self.transient_faults = self
            .transient_faults
            .saturating_add(u64::from(report.transient_faults));
        self.overruns = self.overruns.saturating_add(u64::from(report.overruns));
        if let Some((module, elapsed)) = report.longest_tick {
            if self.longest_tick.map_or(true, |(_, longest)| elapsed > longest) {
                self.longest_tick = Some((module, elapsed));
            }
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sweeps={} transient_faults={} overruns={} disabled={}",
            self.sweeps, self.transient_faults, self.overruns, self.disabled_modules
        )?;
        if let Some((module, elapsed)) = self.longest_tick {
            write!(f, " longest_tick={module}:{elapsed}us")?;
        }
        Ok(())
    }
}
