//! Restart supervisor for the host run loop
//!
//! The firmware answers a fatal fault with a software reset. On a host the
//! equivalent is a controlled restart: the faulted orchestrator is dropped
//! and a fresh one, with fresh modules, goes through setup again. The stop
//! flag and the iteration limit are checked between sweeps only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use neurolink_core::{LifecycleHook, ModuleStatus, NlError};
use neurolink_sched::{Orchestrator, OrchestratorConfig, Platform, RunStats};

use crate::HostError;

/// Settings for [`run_host`]
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    pub orchestrator: OrchestratorConfig,
    /// Total successful sweeps across restarts; `None` runs until stopped
    pub iterations: Option<u64>,
    /// Controlled restarts allowed after fatal faults
    pub max_restarts: u32,
}

/// Outcome of a host run that ended without an unrecoverable error
pub struct HostReport<P> {
    /// Successful sweeps across all runs
    pub sweeps: u64,
    pub restarts: u32,
    /// Set when the stop flag ended the run
    pub interrupted: bool,
    /// Fault that caused the most recent restart
    pub last_fault: Option<NlError>,
    /// Statistics of the final run
    pub stats: RunStats,
    pub leaf_statuses: [ModuleStatus; 16],
    /// Platform of the final run
    pub platform: P,
}

enum RunEnd {
    Completed,
    Stopped,
    Faulted(NlError),
}

/// Install a Ctrl-C handler that raises the returned flag
pub fn install_stop_handler() -> Result<Arc<AtomicBool>, HostError> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;
    Ok(stop)
}

/// Set up and sweep, restarting after fatal faults up to the configured limit
///
/// `make_platform` is called once per run. A halted boot is not retried:
/// the same setup would fail the same way.
pub fn run_host<P, F>(
    config: &HostConfig,
    mut make_platform: F,
    hook: &mut dyn LifecycleHook,
    stop: &AtomicBool,
) -> Result<HostReport<P>, HostError>
where
    P: Platform,
    F: FnMut() -> P,
{
    let mut sweeps: u64 = 0;
    let mut restarts: u32 = 0;
    let mut last_fault = None;

    loop {
        let mut nl = Orchestrator::new(config.orchestrator.clone(), make_platform());
        nl.setup(hook).map_err(HostError::Boot)?;

        let end = loop {
            if stop.load(Ordering::Relaxed) {
                break RunEnd::Stopped;
            }
            if config.iterations.is_some_and(|limit| sweeps >= limit) {
                break RunEnd::Completed;
            }
            match nl.sweep(hook) {
                Ok(()) => sweeps += 1,
                Err(err) => break RunEnd::Faulted(err),
            }
        };

        let err = match end {
            RunEnd::Faulted(err) => err,
            RunEnd::Completed | RunEnd::Stopped => {
                log::info!("run finished: {}", nl.stats());
                let stats = *nl.stats();
                let leaf_statuses = nl.leaf_statuses();
                return Ok(HostReport {
                    sweeps,
                    restarts,
                    interrupted: matches!(end, RunEnd::Stopped),
                    last_fault,
                    stats,
                    leaf_statuses,
                    platform: nl.into_platform(),
                });
            }
        };

        if restarts >= config.max_restarts {
            return Err(HostError::RestartLimit {
                restarts,
                last: err,
            });
        }
        restarts += 1;
        last_fault = Some(err);
        log::warn!(
            "controlled restart {restarts}/{} after: {err}",
            config.max_restarts
        );
    }
}
