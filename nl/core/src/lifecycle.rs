//! Lifecycle contract, supervision, and instrumentation hooks
//!
//! Every lifecycle-bearing unit implements [`Lifecycle`]. Owners never call
//! a unit directly; they hold it inside a [`Supervised`] wrapper which
//! enforces the initialize-once-then-tick ordering, applies the fault
//! policy where a fault originates, and measures how long each tick kept
//! the cooperative loop busy.

use crate::{Clock, LifecycleState, ModuleId, NlError, NlResult, TickBudget, TickCount};

/// Two-phase lifecycle shared by leaf modules and aggregators
pub trait Lifecycle {
    /// Identifier of this unit
    fn id(&self) -> ModuleId;

    /// One-time setup, called before the first `tick`
    fn initialize(&mut self, ctx: &mut Context<'_>) -> NlResult<()>;

    /// Periodic work, called once per loop iteration
    ///
    /// Must return promptly: every other module waits until it does.
    fn tick(&mut self, ctx: &mut Context<'_>) -> NlResult<()>;
}

/// Observer invoked on entry of every supervised lifecycle call
///
/// An error returned from `on_initialize` or `on_tick` is treated as the
/// module's own result, which makes hooks usable for fault injection.
pub trait LifecycleHook {
    fn on_initialize(&mut self, _module: ModuleId) -> NlResult<()> {
        Ok(())
    }

    fn on_tick(&mut self, _module: ModuleId, _iteration: TickCount) -> NlResult<()> {
        Ok(())
    }

    /// Called for every fault the supervisor handles or propagates
    fn on_fault(&mut self, _error: &NlError) {}

    /// Called when a leaf tick exceeds the configured budget
    fn on_overrun(&mut self, _module: ModuleId, _elapsed_us: u64) {}
}

/// Hook that observes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHook;

impl LifecycleHook for NoHook {}

impl<H: LifecycleHook + ?Sized> LifecycleHook for &mut H {
    fn on_initialize(&mut self, module: ModuleId) -> NlResult<()> {
        (**self).on_initialize(module)
    }

    fn on_tick(&mut self, module: ModuleId, iteration: TickCount) -> NlResult<()> {
        (**self).on_tick(module, iteration)
    }

    fn on_fault(&mut self, error: &NlError) {
        (**self).on_fault(error)
    }

    fn on_overrun(&mut self, module: ModuleId, elapsed_us: u64) {
        (**self).on_overrun(module, elapsed_us)
    }
}

/// Pairs of hooks are both invoked, first one first
impl<A: LifecycleHook, B: LifecycleHook> LifecycleHook for (A, B) {
    fn on_initialize(&mut self, module: ModuleId) -> NlResult<()> {
        self.0.on_initialize(module)?;
        self.1.on_initialize(module)
    }

    fn on_tick(&mut self, module: ModuleId, iteration: TickCount) -> NlResult<()> {
        self.0.on_tick(module, iteration)?;
        self.1.on_tick(module, iteration)
    }

    fn on_fault(&mut self, error: &NlError) {
        self.0.on_fault(error);
        self.1.on_fault(error);
    }

    fn on_overrun(&mut self, module: ModuleId, elapsed_us: u64) {
        self.0.on_overrun(module, elapsed_us);
        self.1.on_overrun(module, elapsed_us);
    }
}

/// What to do when a module cannot complete its setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPolicy {
    /// Stop the boot; the root enters `Halted`
    Halt,
    /// Disable the module and keep booting the rest
    Degrade,
}

/// Fault handling policy applied by [`Supervised`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultPolicy {
    pub on_setup_failure: BootPolicy,
    /// Extra setup attempts before the boot policy applies
    pub setup_retries: u8,
}

impl FaultPolicy {
    pub const fn halt() -> Self {
        Self {
            on_setup_failure: BootPolicy::Halt,
            setup_retries: 0,
        }
    }

    pub const fn degrade() -> Self {
        Self {
            on_setup_failure: BootPolicy::Degrade,
            setup_retries: 0,
        }
    }

    pub const fn with_retries(mut self, retries: u8) -> Self {
        self.setup_retries = retries;
        self
    }
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self::halt()
    }
}

/// Fault and timing tallies collected while a context is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    pub transient_faults: u32,
    pub overruns: u32,
    pub disabled: u32,
    /// Slowest leaf tick observed, with its duration in microseconds
    pub longest_tick: Option<(ModuleId, u64)>,
}

impl Report {
    fn note_tick(&mut self, module: ModuleId, elapsed_us: u64) {
        match self.longest_tick {
            Some((_, longest)) if longest >= elapsed_us => {}
            _ => self.longest_tick = Some((module, elapsed_us)),
        }
    }
}

/// Per-pass context handed down the ownership tree
pub struct Context<'a> {
    iteration: TickCount,
    policy: FaultPolicy,
    budget: Option<TickBudget>,
    clock: &'a dyn Clock,
    hook: &'a mut dyn LifecycleHook,
    report: Report,
}

impl<'a> Context<'a> {
    pub fn new(clock: &'a dyn Clock, hook: &'a mut dyn LifecycleHook) -> Self {
        Self {
            iteration: TickCount::ZERO,
            policy: FaultPolicy::default(),
            budget: None,
            clock,
            hook,
            report: Report::default(),
        }
    }

    pub fn with_policy(mut self, policy: FaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_budget(mut self, budget: Option<TickBudget>) -> Self {
        self.budget = budget;
        self
    }

    pub fn at_iteration(mut self, iteration: TickCount) -> Self {
        self.iteration = iteration;
        self
    }

    /// Iteration being swept; zero during the initialization pass
    pub fn iteration(&self) -> TickCount {
        self.iteration
    }

    pub fn policy(&self) -> FaultPolicy {
        self.policy
    }

    pub fn budget(&self) -> Option<TickBudget> {
        self.budget
    }

    pub fn now_us(&self) -> u64 {
        self.clock.now_us()
    }

    pub fn hook(&mut self) -> &mut (dyn LifecycleHook + 'a) {
        &mut *self.hook
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    fn observe_tick(&mut self, module: ModuleId, started_us: u64) {
        let elapsed = self.now_us().saturating_sub(started_us);
        self.report.note_tick(module, elapsed);
        if let Some(budget) = self.budget {
            if budget.is_exceeded_by(elapsed) {
                log::warn!(
                    "{module}: tick took {elapsed}us, budget {budget} ({})",
                    self.iteration
                );
                self.report.overruns = self.report.overruns.saturating_add(1);
                self.hook.on_overrun(module, elapsed);
            }
        }
    }
}

/// Snapshot of one supervised unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleStatus {
    pub id: ModuleId,
    pub state: LifecycleState,
    pub ticks: u64,
    pub faults: u32,
}

/// Wrapper enforcing the lifecycle contract around one owned unit
pub struct Supervised<M> {
    module: M,
    state: LifecycleState,
    ticks: u64,
    faults: u32,
}

impl<M: Lifecycle> Supervised<M> {
    pub const fn new(module: M) -> Self {
        Self {
            module,
            state: LifecycleState::Created,
            ticks: 0,
            faults: 0,
        }
    }

    pub fn id(&self) -> ModuleId {
        self.module.id()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Number of `tick` calls the wrapped unit completed without a fault
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of faults raised by the wrapped unit itself
    pub fn faults(&self) -> u32 {
        self.faults
    }

    pub fn status(&self) -> ModuleStatus {
        ModuleStatus {
            id: self.id(),
            state: self.state,
            ticks: self.ticks,
            faults: self.faults,
        }
    }

    pub fn inner(&self) -> &M {
        &self.module
    }

    /// Run the one-time setup, applying retries and the boot policy
    pub fn initialize(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        let id = self.module.id();
        if self.state != LifecycleState::Created {
            return Err(NlError::AlreadyInitialized(id));
        }

        let policy = ctx.policy();
        let mut attempt: u8 = 0;
        loop {
            log::trace!("{id}: initialize");
            let result = ctx
                .hook()
                .on_initialize(id)
                .and_then(|()| self.module.initialize(ctx));

            let err = match result {
                Ok(()) => {
                    self.state = LifecycleState::Ready;
                    return Ok(());
                }
                // Already handled by the supervisor of the unit that raised it.
                Err(err) if err.module() != Some(id) => return Err(err),
                Err(err) => err,
            };

            self.faults = self.faults.saturating_add(1);
            ctx.hook().on_fault(&err);

            if attempt < policy.setup_retries {
                attempt += 1;
                log::warn!("{err}, retry {attempt}/{}", policy.setup_retries);
                continue;
            }

            return match policy.on_setup_failure {
                BootPolicy::Halt => {
                    log::error!("{err}, halting boot");
                    Err(err)
                }
                BootPolicy::Degrade => {
                    log::error!("{err}, module disabled");
                    self.state = LifecycleState::Disabled;
                    ctx.report.disabled = ctx.report.disabled.saturating_add(1);
                    Ok(())
                }
            };
        }
    }

    /// Run one tick; transient faults are absorbed, anything else propagates
    pub fn tick(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        let id = self.module.id();
        match self.state {
            LifecycleState::Created => return Err(NlError::NotInitialized(id)),
            LifecycleState::Disabled => return Ok(()),
            LifecycleState::Ready => {}
        }

        let iteration = ctx.iteration();
        let started = ctx.now_us();
        let result = ctx
            .hook()
            .on_tick(id, iteration)
            .and_then(|()| self.module.tick(ctx));
        if id.is_leaf() {
            ctx.observe_tick(id, started);
        }

        match result {
            Ok(()) => {
                self.ticks = self.ticks.wrapping_add(1);
                Ok(())
            }
            Err(err) if err.is_transient() => {
                self.faults = self.faults.saturating_add(1);
                log::warn!("{err}, skipped for {iteration}");
                ctx.report.transient_faults = ctx.report.transient_faults.saturating_add(1);
                ctx.hook().on_fault(&err);
                Ok(())
            }
            Err(err) if err.module() != Some(id) => Err(err),
            Err(err) => {
                self.faults = self.faults.saturating_add(1);
                log::error!("{err} at {iteration}");
                ctx.hook().on_fault(&err);
                Err(err)
            }
        }
    }
}
