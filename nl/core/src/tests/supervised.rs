use std::cell::Cell;

use crate::{
    Clock, Context, FaultCause, FaultPolicy, Lifecycle, LifecycleHook, LifecycleState, ModuleId,
    NlError, NlResult, NoHook, NullClock, Supervised, TickBudget, TickCount,
};

struct Probe {
    id: ModuleId,
    init_failures: u8,
    tick_error: Option<NlError>,
    inits: u32,
    ticks: u32,
}

impl Probe {
    fn new(id: ModuleId) -> Self {
        Self {
            id,
            init_failures: 0,
            tick_error: None,
            inits: 0,
            ticks: 0,
        }
    }
}

impl Lifecycle for Probe {
    fn id(&self) -> ModuleId {
        self.id
    }

    fn initialize(&mut self, _ctx: &mut Context<'_>) -> NlResult<()> {
        self.inits += 1;
        if self.init_failures > 0 {
            self.init_failures -= 1;
            return Err(NlError::SetupFailure {
                module: self.id,
                cause: FaultCause::Device,
            });
        }
        Ok(())
    }

    fn tick(&mut self, _ctx: &mut Context<'_>) -> NlResult<()> {
        self.ticks += 1;
        match self.tick_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Advances by a fixed step on every read
struct StepClock {
    now: Cell<u64>,
    step: u64,
}

impl Clock for StepClock {
    fn now_us(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

#[derive(Default)]
struct Counting {
    faults: u32,
    overruns: u32,
    fail_ticks: bool,
}

impl LifecycleHook for Counting {
    fn on_tick(&mut self, module: ModuleId, _iteration: TickCount) -> NlResult<()> {
        if self.fail_ticks {
            return Err(NlError::TransientFault {
                module,
                cause: FaultCause::Timeout,
            });
        }
        Ok(())
    }

    fn on_fault(&mut self, _error: &NlError) {
        self.faults += 1;
    }

    fn on_overrun(&mut self, _module: ModuleId, _elapsed_us: u64) {
        self.overruns += 1;
    }
}

#[test]
fn initialize_then_tick() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook);
    let mut unit = Supervised::new(Probe::new(ModuleId::SensorSuite));

    assert_eq!(unit.state(), LifecycleState::Created);
    unit.initialize(&mut ctx).unwrap();
    assert_eq!(unit.state(), LifecycleState::Ready);

    unit.tick(&mut ctx).unwrap();
    unit.tick(&mut ctx).unwrap();
    assert_eq!(unit.ticks(), 2);
    assert_eq!(unit.inner().inits, 1);
    assert_eq!(unit.inner().ticks, 2);
}

#[test]
fn second_initialize_is_rejected() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook);
    let mut unit = Supervised::new(Probe::new(ModuleId::OsLayer));

    unit.initialize(&mut ctx).unwrap();
    assert_eq!(
        unit.initialize(&mut ctx),
        Err(NlError::AlreadyInitialized(ModuleId::OsLayer))
    );
    assert_eq!(unit.inner().inits, 1);
}

#[test]
fn tick_before_initialize_is_rejected() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook);
    let mut unit = Supervised::new(Probe::new(ModuleId::AppLayer));

    assert_eq!(
        unit.tick(&mut ctx),
        Err(NlError::NotInitialized(ModuleId::AppLayer))
    );
    assert_eq!(unit.inner().ticks, 0);
}

#[test]
fn setup_failure_halts_by_default() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook);
    let mut probe = Probe::new(ModuleId::PowerManagement);
    probe.init_failures = 1;
    let mut unit = Supervised::new(probe);

    let err = unit.initialize(&mut ctx).unwrap_err();
    assert_eq!(err.module(), Some(ModuleId::PowerManagement));
    assert_eq!(unit.state(), LifecycleState::Created);
    assert_eq!(unit.faults(), 1);
}

#[test]
fn degrade_disables_the_module() {
    let clock = NullClock;
    let mut hook = Counting::default();
    let mut ctx = Context::new(&clock, &mut hook).with_policy(FaultPolicy::degrade());
    let mut probe = Probe::new(ModuleId::HmiUnit);
    probe.init_failures = 1;
    let mut unit = Supervised::new(probe);

    unit.initialize(&mut ctx).unwrap();
    assert_eq!(unit.state(), LifecycleState::Disabled);
    assert_eq!(ctx.report().disabled, 1);

    unit.tick(&mut ctx).unwrap();
    assert_eq!(unit.inner().ticks, 0);
    assert_eq!(unit.ticks(), 0);
    drop(ctx);
    assert_eq!(hook.faults, 1);
}

#[test]
fn retries_recover_a_flaky_setup() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook).with_policy(FaultPolicy::halt().with_retries(2));
    let mut probe = Probe::new(ModuleId::CommunicationModule);
    probe.init_failures = 2;
    let mut unit = Supervised::new(probe);

    unit.initialize(&mut ctx).unwrap();
    assert_eq!(unit.state(), LifecycleState::Ready);
    assert_eq!(unit.inner().inits, 3);
}

#[test]
fn retries_exhausted_still_halt() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook).with_policy(FaultPolicy::halt().with_retries(1));
    let mut probe = Probe::new(ModuleId::CommunicationModule);
    probe.init_failures = 3;
    let mut unit = Supervised::new(probe);

    assert!(unit.initialize(&mut ctx).is_err());
    assert_eq!(unit.inner().inits, 2);
}

#[test]
fn transient_fault_is_absorbed() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook);
    let mut probe = Probe::new(ModuleId::ProtocolStack);
    probe.tick_error = Some(NlError::TransientFault {
        module: ModuleId::ProtocolStack,
        cause: FaultCause::Timeout,
    });
    let mut unit = Supervised::new(probe);

    unit.initialize(&mut ctx).unwrap();
    unit.tick(&mut ctx).unwrap();
    unit.tick(&mut ctx).unwrap();
    assert_eq!(unit.faults(), 2);
    assert_eq!(unit.ticks(), 0);
    assert_eq!(ctx.report().transient_faults, 2);
    assert_eq!(unit.state(), LifecycleState::Ready);
}

#[test]
fn fatal_fault_propagates() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook);
    let fatal = NlError::FatalFault {
        module: ModuleId::SecurityFramework,
        cause: FaultCause::Code(7),
    };
    let mut probe = Probe::new(ModuleId::SecurityFramework);
    probe.tick_error = Some(fatal);
    let mut unit = Supervised::new(probe);

    unit.initialize(&mut ctx).unwrap();
    assert_eq!(unit.tick(&mut ctx), Err(fatal));
    // The body ran but did not complete.
    assert_eq!(unit.inner().ticks, 1);
    assert_eq!(unit.ticks(), 0);
    assert_eq!(unit.faults(), 1);
}

#[test]
fn hook_error_counts_as_module_result() {
    let clock = NullClock;
    let mut hook = Counting {
        fail_ticks: true,
        ..Counting::default()
    };
    let mut ctx = Context::new(&clock, &mut hook);
    let mut unit = Supervised::new(Probe::new(ModuleId::Middleware));

    unit.initialize(&mut ctx).unwrap();
    unit.tick(&mut ctx).unwrap();
    // The module body is skipped when the hook fails first.
    assert_eq!(unit.inner().ticks, 0);
    assert_eq!(unit.ticks(), 0);
    assert_eq!(ctx.report().transient_faults, 1);
}

#[test]
fn foreign_failure_passes_through_untouched() {
    let clock = NullClock;
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook).with_policy(FaultPolicy::degrade().with_retries(3));
    // The error carries the id of a child the aggregator owns.
    let mut probe = Probe::new(ModuleId::HardwareSubsystem);
    probe.tick_error = Some(NlError::FatalFault {
        module: ModuleId::SensorSuite,
        cause: FaultCause::Device,
    });
    let mut unit = Supervised::new(probe);

    unit.initialize(&mut ctx).unwrap();
    assert_eq!(
        unit.tick(&mut ctx),
        Err(NlError::FatalFault {
            module: ModuleId::SensorSuite,
            cause: FaultCause::Device,
        })
    );
    assert_eq!(unit.faults(), 0);
}

#[test]
fn slow_leaf_tick_is_reported_as_overrun() {
    let clock = StepClock {
        now: Cell::new(0),
        step: 500,
    };
    let mut hook = Counting::default();
    let mut ctx = Context::new(&clock, &mut hook).with_budget(Some(TickBudget::from_micros(100)));
    let mut unit = Supervised::new(Probe::new(ModuleId::SensorSuite));

    unit.initialize(&mut ctx).unwrap();
    unit.tick(&mut ctx).unwrap();
    assert_eq!(ctx.report().overruns, 1);
    assert_eq!(ctx.report().longest_tick, Some((ModuleId::SensorSuite, 500)));
    drop(ctx);
    assert_eq!(hook.overruns, 1);
}

#[test]
fn aggregator_ticks_are_not_budgeted() {
    let clock = StepClock {
        now: Cell::new(0),
        step: 500,
    };
    let mut hook = NoHook;
    let mut ctx = Context::new(&clock, &mut hook).with_budget(Some(TickBudget::from_micros(100)));
    let mut unit = Supervised::new(Probe::new(ModuleId::NetworkSubsystem));

    unit.initialize(&mut ctx).unwrap();
    unit.tick(&mut ctx).unwrap();
    assert_eq!(ctx.report().overruns, 0);
    assert_eq!(ctx.report().longest_tick, None);
}
