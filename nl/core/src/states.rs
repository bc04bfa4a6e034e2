//! Module and system lifecycle states

use core::fmt;

/// Lifecycle state of a single supervised module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, `initialize` not yet completed
    Created,
    /// Initialized and accepting ticks
    Ready,
    /// Setup failed under the degrade policy; ticks are skipped
    Disabled,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Created => write!(f, "Created"),
            LifecycleState::Ready => write!(f, "Ready"),
            LifecycleState::Disabled => write!(f, "Disabled"),
        }
    }
}

/// State of the root orchestrator
///
/// `Booting` is entered at construction and left exactly once. `Running` is
/// terminal unless a fatal fault moves the system to `Faulted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// Initialization pass not yet finished
    Booting,
    /// Tick sweeps are executing
    Running,
    /// Boot stopped on a setup failure
    Halted,
    /// A fatal tick fault ended the running state
    Faulted,
}

impl SystemState {
    /// Whether no further lifecycle calls will be accepted
    pub fn is_stopped(&self) -> bool {
        matches!(self, SystemState::Halted | SystemState::Faulted)
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemState::Booting => write!(f, "Booting"),
            SystemState::Running => write!(f, "Running"),
            SystemState::Halted => write!(f, "Halted"),
            SystemState::Faulted => write!(f, "Faulted"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LifecycleState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LifecycleState::Created => defmt::write!(fmt, "Created"),
            LifecycleState::Ready => defmt::write!(fmt, "Ready"),
            LifecycleState::Disabled => defmt::write!(fmt, "Disabled"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SystemState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SystemState::Booting => defmt::write!(fmt, "Booting"),
            SystemState::Running => defmt::write!(fmt, "Running"),
            SystemState::Halted => defmt::write!(fmt, "Halted"),
            SystemState::Faulted => defmt::write!(fmt, "Faulted"),
        }
    }
}
