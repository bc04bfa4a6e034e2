//! POSIX port of the Neurolink runtime
//!
//! Hosts the cooperative orchestrator on Linux/Unix: a [`StdPlatform`] that
//! maps the console onto any `Write` sink and the clock onto `Instant`, a
//! Ctrl-C stop flag, and a restart supervisor standing in for the software
//! reset the firmware performs after a fatal fault.
//!
//! ```no_run
//! use neurolink_core::NoHook;
//! use neurolink_posix::{install_stop_handler, run_host, HostConfig, StdPlatform};
//!
//! let stop = install_stop_handler()?;
//! let report = run_host(&HostConfig::default(), StdPlatform::stdout, &mut NoHook, &stop)?;
//! println!("{}", report.stats);
//! # Ok::<(), neurolink_posix::HostError>(())
//! ```

mod platform;
mod supervisor;

pub use platform::StdPlatform;
pub use supervisor::{install_stop_handler, run_host, HostConfig, HostReport};

use neurolink_core::NlError;
use thiserror::Error;

/// Errors that end a host run
#[derive(Debug, Error)]
pub enum HostError {
    #[error("boot halted: {0}")]
    Boot(NlError),
    #[error("giving up after {restarts} restart(s): {last}")]
    RestartLimit { restarts: u32, last: NlError },
    #[error("failed to install stop handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
