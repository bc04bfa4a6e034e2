#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! Lifecycle tracing for the Neurolink runtime
//!
//! Records which module was initialized or ticked, which faults the
//! supervisors handled, and which ticks exceeded their budget. Both
//! [`TraceBuffer`] and a shared [`SharedTrace`] implement
//! [`LifecycleHook`], so either can be handed straight to the orchestrator.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use neurolink_trace::SharedTrace;
//!
//! static TRACE: SharedTrace<256> = SharedTrace::new();
//!
//! let mut hook = &TRACE;
//! orchestrator.setup(&mut hook)?;
//!
//! // Elsewhere, e.g. an idle task or a host thread
//! while let Some(record) = TRACE.pop() {
//!     println!("{record}");
//! }
//! ```

mod buffer;

pub use buffer::TraceBuffer;

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use neurolink_core::{LifecycleHook, ModuleId, NlError, NlResult, TickCount};

/// One lifecycle trace record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRecord {
    Initialize { module: ModuleId },
    Tick { module: ModuleId, iteration: TickCount },
    Fault { error: NlError },
    Overrun { module: ModuleId, elapsed_us: u64 },
}

impl TraceRecord {
    /// Module the record refers to, if any
    pub fn module(&self) -> Option<ModuleId> {
        match self {
            TraceRecord::Initialize { module }
            | TraceRecord::Tick { module, .. }
            | TraceRecord::Overrun { module, .. } => Some(*module),
            TraceRecord::Fault { error } => error.module(),
        }
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceRecord::Initialize { module } => write!(f, "INIT    {module}"),
            TraceRecord::Tick { module, iteration } => write!(f, "TICK    {module} {iteration}"),
            TraceRecord::Fault { error } => write!(f, "FAULT   {error}"),
            TraceRecord::Overrun { module, elapsed_us } => {
                write!(f, "OVERRUN {module} {elapsed_us}us")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TraceRecord {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TraceRecord::Initialize { module } => defmt::write!(fmt, "INIT {}", module),
            TraceRecord::Tick { module, iteration } => {
                defmt::write!(fmt, "TICK {} {}", module, iteration)
            }
            TraceRecord::Fault { error } => defmt::write!(fmt, "FAULT {}", error),
            TraceRecord::Overrun { module, elapsed_us } => {
                defmt::write!(fmt, "OVERRUN {} {}us", module, elapsed_us)
            }
        }
    }
}

/// Trace buffer that can live in a `static` and be drained from another context
pub struct SharedTrace<const N: usize> {
    inner: Mutex<RefCell<TraceBuffer<N>>>,
}

impl<const N: usize> SharedTrace<N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(TraceBuffer::new())),
        }
    }

    /// Run `f` with exclusive access to the buffer
    pub fn with<R>(&self, f: impl FnOnce(&mut TraceBuffer<N>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Take the oldest record
    pub fn pop(&self) -> Option<TraceRecord> {
        self.with(|buf| buf.pop())
    }

    pub fn len(&self) -> usize {
        self.with(|buf| buf.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> Default for SharedTrace<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LifecycleHook for &SharedTrace<N> {
    fn on_initialize(&mut self, module: ModuleId) -> NlResult<()> {
        self.with(|buf| buf.on_initialize(module))
    }

    fn on_tick(&mut self, module: ModuleId, iteration: TickCount) -> NlResult<()> {
        self.with(|buf| buf.on_tick(module, iteration))
    }

    fn on_fault(&mut self, error: &NlError) {
        self.with(|buf| buf.on_fault(error))
    }

    fn on_overrun(&mut self, module: ModuleId, elapsed_us: u64) {
        self.with(|buf| buf.on_overrun(module, elapsed_us))
    }
}
