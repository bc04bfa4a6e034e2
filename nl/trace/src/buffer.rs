//! Bounded trace record storage

use heapless::Deque;
use neurolink_core::{LifecycleHook, ModuleId, NlError, NlResult, TickCount};

use crate::TraceRecord;

/// Ring buffer of lifecycle trace records
///
/// When full, the oldest record is dropped to make room and counted in
/// [`TraceBuffer::dropped`]. A per-module filter mask decides which modules
/// are recorded; faults without a module are always kept.
pub struct TraceBuffer<const N: usize> {
    records: Deque<TraceRecord, N>,
    /// Bit per `ModuleId::raw()`, all ON by default
    filter: u32,
    dropped: u32,
    total: u64,
}

impl<const N: usize> TraceBuffer<N> {
    /// Create an empty buffer recording every module
    pub const fn new() -> Self {
        Self {
            records: Deque::new(),
            filter: u32::MAX,
            dropped: 0,
            total: 0,
        }
    }

    /// Enable or disable recording for one module
    pub fn set_filter(&mut self, module: ModuleId, enable: bool) {
        if enable {
            self.filter |= module.mask();
        } else {
            self.filter &= !module.mask();
        }
    }

    /// Set the filter mask directly
    pub fn set_filter_mask(&mut self, mask: u32) {
        self.filter = mask;
    }

    pub fn filter_mask(&self) -> u32 {
        self.filter
    }

    /// Record one entry, evicting the oldest one when full
    pub fn push(&mut self, record: TraceRecord) {
        if let Some(module) = record.module() {
            if self.filter & module.mask() == 0 {
                return;
            }
        }

        self.total = self.total.wrapping_add(1);
        if self.records.is_full() {
            self.records.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        // Cannot fail: a slot was freed above when full.
        let _ = self.records.push_back(record);
    }

    /// Take the oldest record
    pub fn pop(&mut self) -> Option<TraceRecord> {
        self.records.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Records evicted because the buffer was full since the last clear
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Records accepted since the last clear, including evicted ones
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Drop every record and reset the drop and total counters
    pub fn clear(&mut self) {
        self.records.clear();
        self.dropped = 0;
        self.total = 0;
    }
}

impl<const N: usize> Default for TraceBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LifecycleHook for TraceBuffer<N> {
    fn on_initialize(&mut self, module: ModuleId) -> NlResult<()> {
        self.push(TraceRecord::Initialize { module });
        Ok(())
    }

    fn on_tick(&mut self, module: ModuleId, iteration: TickCount) -> NlResult<()> {
        self.push(TraceRecord::Tick { module, iteration });
        Ok(())
    }

    fn on_fault(&mut self, error: &NlError) {
        self.push(TraceRecord::Fault { error: *error });
    }

    fn on_overrun(&mut self, module: ModuleId, elapsed_us: u64) {
        self.push(TraceRecord::Overrun { module, elapsed_us });
    }
}
