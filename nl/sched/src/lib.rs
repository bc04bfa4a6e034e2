#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # Neurolink Cooperative Orchestrator
//!
//! The root of the lifecycle tree. One [`Orchestrator`] owns the four
//! subsystem aggregators, runs a single initialization pass over them, and
//! then sweeps them in fixed order once per loop iteration. There is no
//! preemption and no yield point inside a sweep: a module that keeps `tick`
//! busy delays every module after it.
//!
//! ```text
//! Booting --boot ok--> Running --fatal fault--> Faulted
//!    |
//!    +--setup failure (halt policy)--> Halted
//! ```

mod config;
mod platform;
mod stats;

pub use config::{
    OrchestratorConfig, OrchestratorConfigBuilder, DEFAULT_BANNER, DEFAULT_BAUD_RATE,
    DEFAULT_BOOT_DELAY_MS,
};
pub use platform::Platform;
pub use stats::RunStats;

use neurolink_core::{
    Context, LifecycleHook, ModuleStatus, NlError, NlResult, Supervised, SystemState, TickCount,
};
use neurolink_modules::{HardwareSubsystem, NetworkSubsystem, SoftwareSubsystem, SupportSubsystem};

/// Root orchestrator driving the init-then-loop lifecycle
pub struct Orchestrator<P: Platform> {
    config: OrchestratorConfig,
    platform: P,
    state: SystemState,
    iteration: TickCount,
    stats: RunStats,
    last_error: Option<NlError>,
    hardware: Supervised<HardwareSubsystem>,
    software: Supervised<SoftwareSubsystem>,
    support: Supervised<SupportSubsystem>,
    network: Supervised<NetworkSubsystem>,
}

impl<P: Platform> Orchestrator<P> {
    /// Construct every module eagerly; the system starts in `Booting`
    pub fn new(config: OrchestratorConfig, platform: P) -> Self {
        Self {
            config,
            platform,
            state: SystemState::Booting,
            iteration: TickCount::ZERO,
            stats: RunStats::default(),
            last_error: None,
            hardware: Supervised::new(HardwareSubsystem::new()),
            software: Supervised::new(SoftwareSubsystem::new()),
            support: Supervised::new(SupportSubsystem::new()),
            network: Supervised::new(NetworkSubsystem::new()),
        }
    }

    /// Console bring-up, startup delay, banner, then [`Orchestrator::boot`]
    pub fn setup(&mut self, hook: &mut dyn LifecycleHook) -> NlResult<()> {
        if self.state != SystemState::Booting {
            return Err(NlError::InvalidState(self.state));
        }

        self.platform.init_console(self.config.baud_rate);
        self.platform.delay_ms(self.config.boot_delay_ms);
        self.platform.write_line(self.config.banner);
        self.boot(hook)
    }

    /// Initialize hardware, software, support, and network, in that order
    pub fn boot(&mut self, hook: &mut dyn LifecycleHook) -> NlResult<()> {
        if self.state != SystemState::Booting {
            return Err(NlError::InvalidState(self.state));
        }

        log::info!("booting subsystems");
        let mut ctx = Context::new(&self.platform, hook)
            .with_policy(self.config.policy)
            .with_budget(self.config.tick_budget);
        let result = self
            .hardware
            .initialize(&mut ctx)
            .and_then(|()| self.software.initialize(&mut ctx))
            .and_then(|()| self.support.initialize(&mut ctx))
            .and_then(|()| self.network.initialize(&mut ctx));
        self.stats.record_boot(ctx.report());

        match result {
            Ok(()) => {
                self.state = SystemState::Running;
                if self.stats.disabled_modules > 0 {
                    log::warn!(
                        "boot complete, degraded: {} module(s) disabled",
                        self.stats.disabled_modules
                    );
                } else {
                    log::info!("boot complete");
                }
                Ok(())
            }
            Err(err) => {
                self.state = SystemState::Halted;
                self.last_error = Some(err);
                log::error!("boot halted: {err}");
                Err(err)
            }
        }
    }

    /// One loop iteration over all four subsystems
    pub fn sweep(&mut self, hook: &mut dyn LifecycleHook) -> NlResult<()> {
        if self.state != SystemState::Running {
            return Err(NlError::InvalidState(self.state));
        }

        self.iteration.increment();
        let mut ctx = Context::new(&self.platform, hook)
            .with_policy(self.config.policy)
            .with_budget(self.config.tick_budget)
            .at_iteration(self.iteration);
        let result = self
            .hardware
            .tick(&mut ctx)
            .and_then(|()| self.software.tick(&mut ctx))
            .and_then(|()| self.support.tick(&mut ctx))
            .and_then(|()| self.network.tick(&mut ctx));
        self.stats.record_sweep(ctx.report(), result.is_ok());

        if let Err(err) = result {
            self.state = SystemState::Faulted;
            self.last_error = Some(err);
            log::error!("fatal fault at {}: {err}", self.iteration);
            return Err(err);
        }
        Ok(())
    }

    /// Run `iterations` sweeps, stopping early on a fatal fault
    pub fn run_for(&mut self, iterations: u64, hook: &mut dyn LifecycleHook) -> NlResult<()> {
        for _ in 0..iterations {
            self.sweep(hook)?;
        }
        Ok(())
    }

    /// Sweep until `stop` returns true; checked between sweeps only
    pub fn run_until(
        &mut self,
        hook: &mut dyn LifecycleHook,
        mut stop: impl FnMut() -> bool,
    ) -> NlResult<()> {
        while !stop() {
            self.sweep(hook)?;
        }
        Ok(())
    }

    /// Sweep forever
    ///
    /// Returns only with the error that ended the running state.
    pub fn run(&mut self, hook: &mut dyn LifecycleHook) -> NlError {
        loop {
            if let Err(err) = self.sweep(hook) {
                return err;
            }
        }
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Number of sweeps started so far
    pub fn iteration(&self) -> TickCount {
        self.iteration
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Error that moved the system to `Halted` or `Faulted`
    pub fn last_error(&self) -> Option<NlError> {
        self.last_error
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Tear the orchestrator down and hand back its platform
    pub fn into_platform(self) -> P {
        self.platform
    }

    pub fn hardware(&self) -> &HardwareSubsystem {
        self.hardware.inner()
    }

    pub fn software(&self) -> &SoftwareSubsystem {
        self.software.inner()
    }

    pub fn support(&self) -> &SupportSubsystem {
        self.support.inner()
    }

    pub fn network(&self) -> &NetworkSubsystem {
        self.network.inner()
    }

    /// Status of the four aggregators in root order
    pub fn subsystem_statuses(&self) -> [ModuleStatus; 4] {
        [
            self.hardware.status(),
            self.software.status(),
            self.support.status(),
            self.network.status(),
        ]
    }

    /// Status of all sixteen leaves in global declared order
    pub fn leaf_statuses(&self) -> [ModuleStatus; 16] {
        let mut out = [self.hardware.status(); 16];
        let leaves = self
            .hardware()
            .statuses()
            .into_iter()
            .chain(self.software().statuses())
            .chain(self.support().statuses())
            .chain(self.network().statuses());
        for (slot, status) in out.iter_mut().zip(leaves) {
            *slot = status;
        }
        out
    }
}

#[cfg(test)]
mod tests;
