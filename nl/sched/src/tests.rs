use neurolink_core::{
    BootPolicy, Clock, FaultCause, LifecycleHook, LifecycleState, ModuleId, NlError, NlResult,
    NoHook, SystemState, TickCount,
};

use crate::{Orchestrator, OrchestratorConfig, Platform, DEFAULT_BANNER};

#[derive(Default)]
struct Console {
    baud: Option<u32>,
    delayed_ms: u32,
    lines: Vec<String>,
}

impl Clock for Console {
    fn now_us(&self) -> u64 {
        0
    }
}

impl Platform for Console {
    fn init_console(&mut self, baud_rate: u32) {
        self.baud = Some(baud_rate);
    }

    fn delay_ms(&mut self, millis: u32) {
        self.delayed_ms += millis;
    }

    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

struct FailAt {
    module: ModuleId,
    on_iteration: Option<TickCount>,
    error: fn(ModuleId) -> NlError,
}

impl LifecycleHook for FailAt {
    fn on_initialize(&mut self, module: ModuleId) -> NlResult<()> {
        if self.on_iteration.is_none() && module == self.module {
            return Err((self.error)(module));
        }
        Ok(())
    }

    fn on_tick(&mut self, module: ModuleId, iteration: TickCount) -> NlResult<()> {
        if Some(iteration) == self.on_iteration && module == self.module {
            return Err((self.error)(module));
        }
        Ok(())
    }
}

fn setup_failure(module: ModuleId) -> NlError {
    NlError::SetupFailure {
        module,
        cause: FaultCause::Config,
    }
}

fn fatal(module: ModuleId) -> NlError {
    NlError::FatalFault {
        module,
        cause: FaultCause::Device,
    }
}

fn transient(module: ModuleId) -> NlError {
    NlError::TransientFault {
        module,
        cause: FaultCause::Timeout,
    }
}

fn orchestrator(config: OrchestratorConfig) -> Orchestrator<Console> {
    Orchestrator::new(config, Console::default())
}

#[test]
fn setup_emits_banner_after_delay() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    nl.setup(&mut NoHook).unwrap();

    let console = nl.platform();
    assert_eq!(console.baud, Some(115_200));
    assert_eq!(console.delayed_ms, 200);
    assert_eq!(console.lines, vec![DEFAULT_BANNER.to_string()]);
    assert_eq!(nl.state(), SystemState::Running);
}

#[test]
fn second_setup_is_rejected_without_output() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    nl.setup(&mut NoHook).unwrap();

    assert_eq!(
        nl.setup(&mut NoHook),
        Err(NlError::InvalidState(SystemState::Running))
    );
    let console = nl.platform();
    assert_eq!(console.lines.len(), 1);
    assert_eq!(console.delayed_ms, 200);
    assert_eq!(nl.state(), SystemState::Running);
}

#[test]
fn fault_on_first_sweep_completes_nothing() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    let mut hook = FailAt {
        module: ModuleId::HmiUnit,
        on_iteration: Some(TickCount::new(1)),
        error: fatal,
    };

    nl.boot(&mut hook).unwrap();
    assert_eq!(nl.sweep(&mut hook), Err(fatal(ModuleId::HmiUnit)));

    assert_eq!(nl.stats().sweeps, 0);
    let [protection, power, hmi, comm, _, _] = nl.hardware().statuses();
    assert_eq!(protection.ticks, 1);
    assert_eq!(power.ticks, 1);
    assert_eq!(hmi.ticks, 0);
    assert_eq!(hmi.faults, 1);
    assert_eq!(comm.ticks, 0);
    assert_eq!(nl.subsystem_statuses()[0].ticks, 0);
}

#[test]
fn sweep_before_boot_is_rejected() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    assert_eq!(
        nl.sweep(&mut NoHook),
        Err(NlError::InvalidState(SystemState::Booting))
    );
    assert_eq!(nl.iteration(), TickCount::ZERO);
}

#[test]
fn second_boot_is_rejected() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    nl.boot(&mut NoHook).unwrap();
    assert_eq!(
        nl.boot(&mut NoHook),
        Err(NlError::InvalidState(SystemState::Running))
    );
}

#[test]
fn setup_failure_halts_the_system() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    let mut hook = FailAt {
        module: ModuleId::SecurityFramework,
        on_iteration: None,
        error: setup_failure,
    };

    let err = nl.boot(&mut hook).unwrap_err();
    assert_eq!(err.module(), Some(ModuleId::SecurityFramework));
    assert_eq!(nl.state(), SystemState::Halted);
    assert_eq!(nl.last_error(), Some(err));

    // Nothing after the failed module was initialized.
    let support = nl.support().statuses();
    assert!(support.iter().all(|s| s.state == LifecycleState::Created));
    let [hardware, software, support, network] = nl.subsystem_statuses();
    assert_eq!(hardware.state, LifecycleState::Ready);
    assert_eq!(software.state, LifecycleState::Created);
    assert_eq!(support.state, LifecycleState::Created);
    assert_eq!(network.state, LifecycleState::Created);

    assert_eq!(
        nl.sweep(&mut NoHook),
        Err(NlError::InvalidState(SystemState::Halted))
    );
}

#[test]
fn degrade_policy_keeps_booting() {
    let config = OrchestratorConfig::builder()
        .on_setup_failure(BootPolicy::Degrade)
        .build();
    let mut nl = orchestrator(config);
    let mut hook = FailAt {
        module: ModuleId::TrainingSystem,
        on_iteration: None,
        error: setup_failure,
    };

    nl.boot(&mut hook).unwrap();
    nl.run_for(5, &mut hook).unwrap();

    assert_eq!(nl.state(), SystemState::Running);
    assert_eq!(nl.stats().disabled_modules, 1);
    for status in nl.leaf_statuses() {
        if status.id == ModuleId::TrainingSystem {
            assert_eq!(status.state, LifecycleState::Disabled);
            assert_eq!(status.ticks, 0);
        } else {
            assert_eq!(status.ticks, 5);
        }
    }
}

#[test]
fn fatal_fault_ends_the_loop() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    let mut hook = FailAt {
        module: ModuleId::NetworkManagement,
        on_iteration: Some(TickCount::new(3)),
        error: fatal,
    };

    nl.boot(&mut hook).unwrap();
    let err = nl.run(&mut hook);

    assert_eq!(err, fatal(ModuleId::NetworkManagement));
    assert_eq!(nl.state(), SystemState::Faulted);
    assert_eq!(nl.iteration(), TickCount::new(3));
    // The faulted third sweep is not counted as done.
    assert_eq!(nl.stats().sweeps, 2);
    // The data distribution service never got its third tick.
    let [_, _, dds] = nl.network().statuses();
    assert_eq!(dds.ticks, 2);
}

#[test]
fn transient_fault_keeps_running() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    let mut hook = FailAt {
        module: ModuleId::SensorSuite,
        on_iteration: Some(TickCount::new(2)),
        error: transient,
    };

    nl.boot(&mut hook).unwrap();
    nl.run_for(4, &mut hook).unwrap();

    assert_eq!(nl.state(), SystemState::Running);
    assert_eq!(nl.stats().transient_faults, 1);
    let [_, _, _, _, sensors, cpu] = nl.hardware().statuses();
    assert_eq!(sensors.faults, 1);
    assert_eq!(cpu.ticks, 4);
}

#[test]
fn run_until_checks_between_sweeps() {
    let mut nl = orchestrator(OrchestratorConfig::default());
    nl.boot(&mut NoHook).unwrap();

    let mut remaining = 7;
    nl.run_until(&mut NoHook, || {
        if remaining == 0 {
            return true;
        }
        remaining -= 1;
        false
    })
    .unwrap();

    assert_eq!(nl.stats().sweeps, 7);
}
