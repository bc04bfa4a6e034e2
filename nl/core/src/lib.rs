#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # Neurolink Core
//!
//! Core types, traits, and abstractions for the Neurolink lifecycle runtime.
//! Every unit of the control device, leaf module or subsystem aggregator,
//! follows the same two-phase contract: initialize exactly once, then tick
//! once per cooperative loop iteration.

use core::fmt;

pub mod ids;
pub mod lifecycle;
pub mod states;
pub mod time;

pub use ids::*;
pub use lifecycle::*;
pub use states::*;
pub use time::*;

#[cfg(test)]
mod tests;

/// Neurolink runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the Neurolink runtime
pub type NlResult<T> = Result<T, NlError>;

/// Underlying reason attached to a module fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCause {
    /// Peripheral or bus did not respond as expected
    Device,
    /// Operation did not complete in time
    Timeout,
    /// Invalid or missing configuration
    Config,
    /// A required resource is exhausted or unavailable
    Resource,
    /// Module-specific error code
    Code(u16),
}

impl fmt::Display for FaultCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultCause::Device => write!(f, "device error"),
            FaultCause::Timeout => write!(f, "timeout"),
            FaultCause::Config => write!(f, "configuration error"),
            FaultCause::Resource => write!(f, "resource unavailable"),
            FaultCause::Code(code) => write!(f, "error code {code}"),
        }
    }
}

/// Error types for lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NlError {
    /// A module could not complete its one-time setup
    SetupFailure { module: ModuleId, cause: FaultCause },
    /// Recoverable tick fault; the module is skipped for this iteration
    TransientFault { module: ModuleId, cause: FaultCause },
    /// Unrecoverable tick fault; the whole runtime must restart
    FatalFault { module: ModuleId, cause: FaultCause },
    /// `initialize` was called on a module that already left `Created`
    AlreadyInitialized(ModuleId),
    /// `tick` was called on a module that was never initialized
    NotInitialized(ModuleId),
    /// Root operation requested in the wrong system state
    InvalidState(SystemState),
}

impl NlError {
    /// Module the error originates from, if any
    pub fn module(&self) -> Option<ModuleId> {
        match *self {
            NlError::SetupFailure { module, .. }
            | NlError::TransientFault { module, .. }
            | NlError::FatalFault { module, .. } => Some(module),
            NlError::AlreadyInitialized(module) | NlError::NotInitialized(module) => Some(module),
            NlError::InvalidState(_) => None,
        }
    }

    /// Whether the cooperative loop may skip the module and keep running
    pub fn is_transient(&self) -> bool {
        matches!(self, NlError::TransientFault { .. })
    }
}

impl fmt::Display for NlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NlError::SetupFailure { module, cause } => {
                write!(f, "{module}: setup failed ({cause})")
            }
            NlError::TransientFault { module, cause } => {
                write!(f, "{module}: transient fault ({cause})")
            }
            NlError::FatalFault { module, cause } => write!(f, "{module}: fatal fault ({cause})"),
            NlError::AlreadyInitialized(module) => write!(f, "{module}: already initialized"),
            NlError::NotInitialized(module) => write!(f, "{module}: ticked before initialization"),
            NlError::InvalidState(state) => write!(f, "operation not allowed while {state}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NlError {}

#[cfg(feature = "defmt")]
impl defmt::Format for FaultCause {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            FaultCause::Device => defmt::write!(fmt, "Device"),
            FaultCause::Timeout => defmt::write!(fmt, "Timeout"),
            FaultCause::Config => defmt::write!(fmt, "Config"),
            FaultCause::Resource => defmt::write!(fmt, "Resource"),
            FaultCause::Code(code) => defmt::write!(fmt, "Code({})", code),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NlError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            NlError::SetupFailure { module, cause } => {
                defmt::write!(fmt, "SetupFailure({}, {})", module, cause)
            }
            NlError::TransientFault { module, cause } => {
                defmt::write!(fmt, "TransientFault({}, {})", module, cause)
            }
            NlError::FatalFault { module, cause } => {
                defmt::write!(fmt, "FatalFault({}, {})", module, cause)
            }
            NlError::AlreadyInitialized(module) => defmt::write!(fmt, "AlreadyInitialized({})", module),
            NlError::NotInitialized(module) => defmt::write!(fmt, "NotInitialized({})", module),
            NlError::InvalidState(state) => defmt::write!(fmt, "InvalidState({})", state),
        }
    }
}
